//! Source descriptors
//!
//! A source descriptor names one external data provider and says how its raw
//! output is interpreted. Retrieval itself is done by adapters outside the
//! domain layer; this module only holds the description and the
//! interpretation of raw bytes.

use crate::core::error::FetchError;
use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// Default number of bytes produced by a randomness source.
pub const DEFAULT_RANDOM_SIZE: u16 = 32;

/// Largest randomness source accepted by a request.
pub const MAX_RANDOM_SIZE: u16 = 1024;

/// One external data provider.
///
/// # Example
///
/// ```
/// use witness_domain::SourceDescriptor;
///
/// let src = SourceDescriptor::random();
/// assert_eq!(src.kind_name(), "random");
/// assert!(src.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceDescriptor {
    /// A randomness generator yielding `size` random bytes.
    Random {
        #[serde(default = "default_random_size")]
        size: u16,
    },
    /// An HTTP GET whose response body is interpreted as `interpret`.
    HttpGet {
        url: String,
        #[serde(default)]
        interpret: ValueKind,
    },
}

fn default_random_size() -> u16 {
    DEFAULT_RANDOM_SIZE
}

impl SourceDescriptor {
    /// A 32-byte randomness source.
    pub fn random() -> Self {
        SourceDescriptor::Random {
            size: DEFAULT_RANDOM_SIZE,
        }
    }

    pub fn http_get(url: impl Into<String>, interpret: ValueKind) -> Self {
        SourceDescriptor::HttpGet {
            url: url.into(),
            interpret,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SourceDescriptor::Random { .. } => "random",
            SourceDescriptor::HttpGet { .. } => "http_get",
        }
    }

    /// Check the descriptor's parameters, returning a reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SourceDescriptor::Random { size } => {
                if *size == 0 || *size > MAX_RANDOM_SIZE {
                    return Err(format!(
                        "random size must be within 1..={}, got {}",
                        MAX_RANDOM_SIZE, size
                    ));
                }
                Ok(())
            }
            SourceDescriptor::HttpGet { url, .. } => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("url must be http(s), got '{}'", url));
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceDescriptor::Random { size } => write!(f, "random({} bytes)", size),
            SourceDescriptor::HttpGet { url, interpret } => {
                write!(f, "http_get({}) as {}", url, interpret)
            }
        }
    }
}

/// How raw source output is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bytes,
    #[default]
    String,
    Integer,
    Float,
    Boolean,
}

impl ValueKind {
    /// Convert raw source output into a [`Value`].
    ///
    /// Textual kinds are parsed from trimmed UTF-8. Floats must be finite.
    pub fn interpret(&self, raw: &[u8]) -> Result<Value, FetchError> {
        match self {
            ValueKind::Bytes => Ok(Value::Bytes(raw.to_vec())),
            ValueKind::String => Ok(Value::String(utf8(raw)?.to_string())),
            ValueKind::Integer => utf8(raw)?
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| FetchError::Malformed(format!("not an integer: {}", e))),
            ValueKind::Float => {
                let x = utf8(raw)?
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| FetchError::Malformed(format!("not a float: {}", e)))?;
                if !x.is_finite() {
                    return Err(FetchError::Malformed(format!("not a finite float: {}", x)));
                }
                Ok(Value::Float(x))
            }
            ValueKind::Boolean => match utf8(raw)?.trim().to_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                other => Err(FetchError::Malformed(format!(
                    "not a boolean: '{}'",
                    other
                ))),
            },
        }
    }
}

fn utf8(raw: &[u8]) -> Result<&str, FetchError> {
    std::str::from_utf8(raw).map_err(|e| FetchError::Malformed(format!("not utf-8: {}", e)))
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Bytes => "bytes",
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}
