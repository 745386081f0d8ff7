use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use super::EncodedPayload;
use crate::error::{Error, Result};

/// Largest integer a JSON number may carry here (2^53 - 1).
///
/// Anything wider is rejected rather than emitted: verifiers parse numbers as
/// doubles, so amounts beyond this range must travel as decimal strings.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Serializes a JSON tree into its canonical byte form.
///
/// Object keys are sorted byte-wise at every level, arrays keep their order,
/// and no insignificant whitespace is emitted. Two trees that are equal as
/// JSON values always produce identical bytes.
pub fn canonicalize(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    write_value(&mut out, value)?;
    Ok(out)
}

/// Canonicalizes any serializable value.
///
/// Values that do not map onto JSON (non-string map keys, failing `Serialize`
/// impls) surface as [`Error::Encoding`]. Fields skipped during serialization
/// are absent from the output; `None` fields that are serialized become `null`.
pub fn canonicalize_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let tree = serde_json::to_value(value).map_err(|e| Error::Encoding(e.to_string()))?;
    canonicalize(&tree)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(number) => write_number(out, number)?,
        Value::String(string) => write_string(out, string)?,
        Value::Array(items) => {
            out.push(b'[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            // Map iteration order depends on serde_json features; sort explicitly.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

            out.push(b'{');
            for (index, (key, item)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(b',');
                }
                write_string(out, key)?;
                out.push(b':');
                write_value(out, item)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, string: &str) -> Result<()> {
    serde_json::to_writer(out, string).map_err(|e| Error::Encoding(e.to_string()))
}

fn write_number(out: &mut Vec<u8>, number: &Number) -> Result<()> {
    if let Some(int) = number.as_i64() {
        if int.unsigned_abs() > MAX_SAFE_INTEGER {
            return Err(unsafe_number(number));
        }
        out.extend_from_slice(int.to_string().as_bytes());
        return Ok(());
    }
    if number.is_u64() {
        // Only values above i64::MAX get here.
        return Err(unsafe_number(number));
    }

    let float = number
        .as_f64()
        .ok_or_else(|| Error::Encoding(format!("unrepresentable number {number}")))?;
    if !float.is_finite() {
        return Err(unsafe_number(number));
    }
    if float.fract() == 0.0 {
        if float.abs() > MAX_SAFE_INTEGER as f64 {
            return Err(unsafe_number(number));
        }
        // 1.0 -> "1", -0.0 -> "0"
        out.extend_from_slice((float as i64).to_string().as_bytes());
    } else {
        out.extend_from_slice(number.to_string().as_bytes());
    }
    Ok(())
}

fn unsafe_number(number: &Number) -> Error {
    Error::Encoding(format!(
        "number {number} is outside the safe integer range; encode it as a string"
    ))
}

/// Encodes payloads as canonical JSON with a SHA-256 digest.
pub struct CanonicalJsonEncoder;

impl CanonicalJsonEncoder {
    pub fn encode(&self, payload: &Value) -> Result<EncodedPayload> {
        let data = canonicalize(payload)?;
        let digest = Sha256::digest(&data).to_vec();
        Ok(EncodedPayload { data, digest })
    }

    pub fn name(&self) -> &str {
        "canonical-json"
    }
}
