//! Environment variable expansion for configuration values.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use serde_json::Value;

use crate::SourceError;

/// Expand environment variable references in every string of a document.
///
/// Only values are expanded, never keys. `field` is the path of `value`
/// inside the document and is used to label errors.
pub(crate) fn expand_value(value: &mut Value, field: &str) -> Result<(), SourceError> {
    match value {
        Value::String(s) => {
            if let Some(expanded) = expand_env(s, field)? {
                *s = expanded;
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                expand_value(item, &format!("{field}[{i}]"))?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let child = if field.is_empty() {
                    key.clone()
                } else {
                    format!("{field}.{key}")
                };
                expand_value(item, &child)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

/// Expand environment variable references in a string.
///
/// Returns `None` if no `${}` patterns are present.
fn expand_env(value: &str, field: &str) -> Result<Option<String>, SourceError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(None);
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(|cow| Some(cow.into_owned()))
    .map_err(|e| SourceError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}
