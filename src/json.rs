//! JSON rendering
//!
//! Every control implements `serde::Serialize` by projecting itself onto a borrowed view
//! with the omission and masking rules applied, so composite structs simply derive it.
use crate::HmcError;
use serde::Serialize;

/// Renders `value` as compact JSON
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, HmcError> {
    Ok(serde_json::to_string(value)?)
}

/// Renders `value` as indented JSON
pub fn to_json_string_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, HmcError> {
    Ok(serde_json::to_string_pretty(value)?)
}
