//! API endpoint handlers for the relay service.

pub mod transfer;
