//! Argument validation.
//!
//! Anything implementing [`Validator`] can be passed to
//! [`RequestContext::validate`](crate::context::RequestContext::validate).
//! [`JsonSchemaValidator`] checks arguments against a tool's input schema
//! with the `jsonschema` crate. Closures of the right shape are validators
//! too.

use std::sync::Arc;

use jsonschema::ValidationError;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use serde_json::Value;
use tracing::warn;

pub use switchboard_protocol::FieldError;

/// `validate(data) -> value | field errors`
pub trait Validator: Send + Sync {
    fn validate(&self, data: &Value) -> Result<Value, Vec<FieldError>>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<Value, Vec<FieldError>> + Send + Sync,
{
    fn validate(&self, data: &Value) -> Result<Value, Vec<FieldError>> {
        self(data)
    }
}

/// Validates data against a JSON Schema compiled once at construction
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator {
    compiled: Result<Arc<jsonschema::Validator>, String>,
}

impl JsonSchemaValidator {
    pub fn new(schema: Value) -> Self {
        let compiled = jsonschema::validator_for(&schema)
            .map(Arc::new)
            .map_err(|e| e.to_string());
        if let Err(err) = &compiled {
            warn!("Input schema does not compile: {}", err);
        }
        Self { compiled }
    }
}

impl Validator for JsonSchemaValidator {
    fn validate(&self, data: &Value) -> Result<Value, Vec<FieldError>> {
        let validator = match &self.compiled {
            Ok(validator) => validator,
            Err(err) => {
                return Err(vec![FieldError::new(
                    "",
                    format!("The input schema is invalid: {}", err),
                )]);
            }
        };

        let errors: Vec<FieldError> = validator.iter_errors(data).map(field_error).collect();
        if errors.is_empty() {
            Ok(data.clone())
        } else {
            Err(errors)
        }
    }
}

/// `/address/city` becomes `address.city`
fn dotted(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

fn field_error(error: ValidationError<'_>) -> FieldError {
    let path = dotted(&error.instance_path.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map_or_else(|| property.to_string(), str::to_string);
            let field = if path.is_empty() {
                name
            } else {
                format!("{}.{}", path, name)
            };
            let message = format!("The {} field is required.", field);
            FieldError::new(field, message)
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(expected),
        } if !path.is_empty() => {
            let expected = with_article(&expected.to_string());
            let message = format!("The {} field must be {}.", path, expected);
            FieldError::new(path, message)
        }
        _ if path.is_empty() => {
            FieldError::new("", format!("The given data is invalid: {}", error))
        }
        _ => {
            let message = format!("The {} field is invalid: {}", path, error);
            FieldError::new(path, message)
        }
    }
}

fn with_article(noun: &str) -> String {
    if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
        format!("an {}", noun)
    } else {
        format!("a {}", noun)
    }
}
