//! Wire-string encoding of values
//!
//! The remote-driver protocol carries every value as a flat string with a
//! one-character type tag:
//!
//! ```text
//! null            null
//! bool            true | false
//! i32             I<decimal>          I42
//! i64             L<decimal>          L9000000000
//! f32             F<decimal>          F1.5
//! f64             D<decimal>          D2.25
//! string          "<raw>"             "hello"
//! list            JSON array of encoded element strings
//! map             JSON object of encoded value strings, keys unchanged
//! live object     @<handle>           @17
//! ```
//!
//! Two quirks are compatibility contracts with the existing drivers, kept
//! deliberately:
//!
//! - Strings are wrapped in quotes without escaping; decode strips exactly
//!   one quote from each end and performs no unescaping.
//! - Containers are double-encoded: the JSON array/object holds the *wire
//!   strings* of its elements, not raw JSON values, so the decoder recurses
//!   with the same entry point at every level.
//!
//! Encoding a live object allocates a fresh handle in [`Memory`] every time;
//! aliasing detection is intentionally out of scope.

use std::collections::HashMap;

use crate::error::{BridgeError, Result};
use crate::memory::Memory;
use crate::value::Value;

/// Encode a value into its wire-string form.
///
/// Pure except for [`Memory::add`], which is invoked for every `Object`
/// encountered (including objects nested inside containers).
pub fn encode(value: &Value, memory: &Memory) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(v) => Ok(if *v { "true" } else { "false" }.to_string()),
        Value::Int(v) => Ok(format!("I{}", v)),
        Value::Long(v) => Ok(format!("L{}", v)),
        Value::Float(v) => Ok(format!("F{}", v)),
        Value::Double(v) => Ok(format!("D{}", v)),
        // No escaping: compatibility contract, see module docs
        Value::String(v) => Ok(format!("\"{}\"", v)),
        Value::List(items) => {
            let encoded: Vec<String> = items
                .iter()
                .map(|item| encode(item, memory))
                .collect::<Result<_>>()?;
            Ok(serde_json::to_string(&encoded)?)
        }
        Value::Map(map) => {
            let mut encoded: HashMap<&str, String> = HashMap::with_capacity(map.len());
            for (key, val) in map {
                encoded.insert(key, encode(val, memory)?);
            }
            Ok(serde_json::to_string(&encoded)?)
        }
        Value::Object(_) => Ok(memory.add(value.clone())),
    }
}

/// Decode a wire string back into a value.
///
/// Handles (`@...`) resolve through [`Memory::get`] and fail with
/// `HandleNotFound` when stale; anything that matches no rule of the
/// grammar fails with `InvalidWireValue`.
pub fn decode(raw: &str, memory: &Memory) -> Result<Value> {
    if raw == "null" {
        return Ok(Value::Null);
    }
    if raw.starts_with('@') {
        return memory.get(raw);
    }
    if raw == "true" {
        return Ok(Value::Bool(true));
    }
    if raw == "false" {
        return Ok(Value::Bool(false));
    }
    if raw.starts_with('{') {
        let encoded: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()))?;
        let mut map = HashMap::with_capacity(encoded.len());
        for (key, val) in encoded {
            map.insert(key, decode(&val, memory)?);
        }
        return Ok(Value::Map(map));
    }
    if raw.starts_with('[') {
        let encoded: Vec<String> = serde_json::from_str(raw)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()))?;
        let items = encoded
            .iter()
            .map(|item| decode(item, memory))
            .collect::<Result<_>>()?;
        return Ok(Value::List(items));
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        // Strip one quote from each end, nothing else
        return Ok(Value::String(raw[1..raw.len() - 1].to_string()));
    }
    if let Some(rest) = raw.strip_prefix('I') {
        return rest
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()));
    }
    if let Some(rest) = raw.strip_prefix('L') {
        return rest
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()));
    }
    if let Some(rest) = raw.strip_prefix('F') {
        return rest
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()));
    }
    if let Some(rest) = raw.strip_prefix('D') {
        return rest
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| BridgeError::InvalidWireValue(raw.to_string()));
    }

    Err(BridgeError::InvalidWireValue(raw.to_string()))
}
