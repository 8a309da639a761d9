//! Tool argument parsing.
//!
//! Every parser returns the user-facing validation message on failure; the
//! `arg!` macro turns that into an `Outcome::Invalid` return from the tool.

use serde_json::Value;

pub(crate) type ArgResult<T> = Result<T, String>;

/// Unwrap a parsed argument or return `Ok(Outcome::Invalid(message))`.
macro_rules! arg {
    ($parsed:expr) => {
        match $parsed {
            Ok(value) => value,
            Err(message) => return Ok(lawcorp::Outcome::invalid(message)),
        }
    };
}
pub(crate) use arg;

fn missing(name: &str) -> String {
    format!("Missing required argument '{name}'.")
}

fn present<'a>(args: &'a Value, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

/// Ids are positive integers, given as JSON numbers or numeric strings.
fn parse_id(value: &Value, name: &str) -> ArgResult<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    id.filter(|&id| id > 0)
        .ok_or_else(|| format!("Invalid {name}: must be a positive integer."))
}

pub(crate) fn required_id(args: &Value, name: &str) -> ArgResult<u64> {
    present(args, name)
        .ok_or_else(|| missing(name))
        .and_then(|v| parse_id(v, name))
}

pub(crate) fn optional_id(args: &Value, name: &str) -> ArgResult<Option<u64>> {
    present(args, name).map(|v| parse_id(v, name)).transpose()
}

pub(crate) fn optional_str(args: &Value, name: &str) -> ArgResult<Option<String>> {
    match present(args, name) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(format!("Invalid {name}: expected a string.")),
    }
}

pub(crate) fn required_str(args: &Value, name: &str) -> ArgResult<String> {
    optional_str(args, name)?.ok_or_else(|| missing(name))
}

pub(crate) fn optional_bool(args: &Value, name: &str) -> ArgResult<Option<bool>> {
    match present(args, name) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(format!("Invalid {name}: expected true or false.")),
        },
        Some(_) => Err(format!("Invalid {name}: expected true or false.")),
    }
}

pub(crate) fn optional_u32(args: &Value, name: &str) -> ArgResult<Option<u32>> {
    let Some(value) = present(args, name) else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| format!("Invalid {name}: must be a non-negative integer."))
}
