//! Coercion of raw JSON values to canonical field types.
//!
//! In lax mode numeric and boolean fields accept the usual textual spellings
//! (`"45"`, `"true"`, `"off"`); strings and objects are never coerced. Strict mode
//! only accepts the exact JSON type, except that an integer is always a valid float.

use crate::CheckError;
use recval_core::FieldType;
use serde_json::{Number, Value};

/// Returns the JSON type name of a raw value, as used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerces `value` to `field_type`, returning its canonical form.
pub fn coerce(value: &Value, field_type: FieldType, strict: bool) -> Result<Value, CheckError> {
    let coerced = match field_type {
        FieldType::String => value.as_str().map(|s| Value::String(s.to_string())),
        FieldType::Integer => coerce_integer(value, strict),
        FieldType::Float => coerce_float(value, strict),
        FieldType::Boolean => {
            if strict {
                value.as_bool().map(Value::Bool)
            } else {
                lax_bool(value).map(Value::Bool)
            }
        }
        FieldType::Object => value.is_object().then(|| value.clone()),
    };

    coerced.ok_or_else(|| CheckError::type_mismatch(field_type, json_type_name(value)))
}

fn coerce_integer(value: &Value, strict: bool) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Value::Number(n.clone())),
        Value::Number(n) if !strict => {
            let f = n.as_f64()?;
            // i64::MAX is not exactly representable; the bound must stay exclusive
            let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
            (f.fract() == 0.0 && in_range).then(|| Value::from(f as i64))
        }
        Value::String(s) if !strict => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_float(value: &Value, strict: bool) -> Option<Value> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !strict => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Number::from_f64(f).map(Value::Number)
}

/// Reads a boolean the way lax mode does.
///
/// Accepts JSON booleans, the integers `0`/`1`, and (case-insensitively) the strings
/// `true/false`, `yes/no`, `on/off`, `t/f`, `y/n`, `1/0`.
pub fn lax_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "t" | "y" | "1" => Some(true),
            "false" | "no" | "off" | "f" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a number the way lax mode does: JSON numbers or numeric strings.
pub fn lax_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
