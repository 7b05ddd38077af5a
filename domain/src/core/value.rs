//! Data values flowing through retrieval, aggregation and tally.

use serde::{Deserialize, Serialize};

/// A retrieved, aggregated or tallied value.
///
/// Bytes are carried as lowercase hex in serialized form.
///
/// # Example
///
/// ```
/// use witness_domain::Value;
///
/// let v = Value::Integer(42);
/// assert!(v.is_numeric());
/// assert_eq!(v.type_name(), "integer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
}

impl Value {
    const TAG_BOOLEAN: u8 = 0;
    const TAG_INTEGER: u8 = 1;
    const TAG_FLOAT: u8 = 2;
    const TAG_STRING: u8 = 3;
    const TAG_BYTES: u8 = 4;

    /// Short lowercase name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Appends the stable binary encoding of this value to `out`.
    ///
    /// Layout: one tag byte, then a fixed-width big-endian payload for
    /// booleans, integers and floats (IEEE-754 bits), or a 4-byte big-endian
    /// length followed by the raw bytes for strings and byte strings.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Value::Boolean(b) => {
                out.push(Self::TAG_BOOLEAN);
                out.push(u8::from(*b));
            }
            Value::Integer(i) => {
                out.push(Self::TAG_INTEGER);
                out.extend_from_slice(&i.to_be_bytes());
            }
            Value::Float(f) => {
                out.push(Self::TAG_FLOAT);
                out.extend_from_slice(&f.to_bits().to_be_bytes());
            }
            Value::String(s) => {
                out.push(Self::TAG_STRING);
                Self::encode_len_prefixed(s.as_bytes(), out);
            }
            Value::Bytes(b) => {
                out.push(Self::TAG_BYTES);
                Self::encode_len_prefixed(b, out);
            }
        }
    }

    /// Stable binary encoding of this value.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_len_prefixed(bytes: &[u8], out: &mut Vec<u8>) {
        // Lengths beyond u32 are not produced by any source; saturate rather than wrap.
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_layout() {
        assert_eq!(Value::Boolean(true).encode(), vec![0, 1]);
        assert_eq!(
            Value::Integer(1).encode(),
            vec![1, 0, 0, 0, 0, 0, 0, 0, 1]
        );
        assert_eq!(
            Value::String("ab".to_string()).encode(),
            vec![3, 0, 0, 0, 2, b'a', b'b']
        );
        assert_eq!(Value::Bytes(vec![0xff]).encode(), vec![4, 0, 0, 0, 1, 0xff]);
    }

    #[test]
    fn test_encoding_distinguishes_types() {
        // Same payload bytes, different tags
        let s = Value::String("x".to_string()).encode();
        let b = Value::Bytes(b"x".to_vec()).encode();
        assert_ne!(s, b);
    }

    #[test]
    fn test_float_encoding_uses_bits() {
        let enc = Value::Float(1.5).encode();
        assert_eq!(enc[0], 2);
        assert_eq!(&enc[1..], &1.5f64.to_bits().to_be_bytes());
    }

    #[test]
    fn test_bytes_serialize_as_hex() {
        let json = serde_json::to_value(Value::Bytes(vec![0xde, 0xad])).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bytes", "value": "dead"}));

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, Value::Bytes(vec![0xde, 0xad]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bytes(vec![0x0a]).to_string(), "0x0a");
        assert_eq!(Value::String("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Boolean(true).as_f64(), None);
        assert!(!Value::String(String::new()).is_numeric());
    }
}
