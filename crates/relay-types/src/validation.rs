//! Configuration validation framework.
//!
//! Pluggable implementations describe the shape of their TOML configuration
//! with a [`Schema`]: required and optional fields, each with a type and an
//! optional custom validator. Factories validate configuration before
//! constructing the implementation, so bad config fails loudly at startup.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field is present but holds an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A field has the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// The TOML type expected for a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional inclusive bounds.
	Integer {
		min: Option<i64>,
		max: Option<i64>,
	},
	/// A boolean value.
	Boolean,
	/// An array; element structure is left to custom validators.
	Array,
}

/// Custom validator run after the type check passes.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// One field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl Field {
	/// Creates a field with the given name and expected type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

/// Validation schema for a TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a schema from required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Checks presence of required fields, the TOML type of every present
	/// field, and runs custom validators where attached.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			Self::check_field(field, value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				Self::check_field(field, value)?;
			}
		}

		Ok(())
	}

	fn check_field(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
		let mismatch = |expected: &str| ValidationError::TypeMismatch {
			field: field.name.clone(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		};

		match &field.field_type {
			FieldType::String => {
				if !value.is_str() {
					return Err(mismatch("string"));
				}
			},
			FieldType::Integer { min, max } => {
				let int_val = value.as_integer().ok_or_else(|| mismatch("integer"))?;
				if min.is_some_and(|m| int_val < m) || max.is_some_and(|m| int_val > m) {
					return Err(ValidationError::InvalidValue {
						field: field.name.clone(),
						message: format!("Value {} is out of bounds", int_val),
					});
				}
			},
			FieldType::Boolean => {
				if !value.is_bool() {
					return Err(mismatch("boolean"));
				}
			},
			FieldType::Array => {
				if !value.is_array() {
					return Err(mismatch("array"));
				}
			},
		}

		if let Some(validator) = &field.validator {
			validator(value).map_err(|msg| ValidationError::InvalidValue {
				field: field.name.clone(),
				message: msg,
			})?;
		}

		Ok(())
	}
}

/// A configuration schema that can validate TOML values.
///
/// Each pluggable implementation returns its own schema through this trait
/// so the builder can validate per-implementation configuration uniformly.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("name", FieldType::String)],
			vec![Field::new(
				"port",
				FieldType::Integer {
					min: Some(1),
					max: Some(65535),
				},
			)],
		)
	}

	#[test]
	fn test_valid_config_passes() {
		let config: toml::Value = toml::from_str("name = \"x\"\nport = 8080").unwrap();
		assert!(schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let config: toml::Value = toml::from_str("port = 8080").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::MissingField(f)) if f == "name"
		));
	}

	#[test]
	fn test_out_of_bounds_integer() {
		let config: toml::Value = toml::from_str("name = \"x\"\nport = 0").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_type_mismatch() {
		let config: toml::Value = toml::from_str("name = 12").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::TypeMismatch { .. })
		));
	}

	#[test]
	fn test_custom_validator_runs() {
		let schema = Schema::new(
			vec![Field::new("key", FieldType::String).with_validator(|v| {
				if v.as_str().is_some_and(|s| s.starts_with("0x")) {
					Ok(())
				} else {
					Err("must start with 0x".to_string())
				}
			})],
			vec![],
		);

		let good: toml::Value = toml::from_str("key = \"0xab\"").unwrap();
		assert!(schema.validate(&good).is_ok());

		let bad: toml::Value = toml::from_str("key = \"ab\"").unwrap();
		assert!(matches!(
			schema.validate(&bad),
			Err(ValidationError::InvalidValue { .. })
		));
	}
}
