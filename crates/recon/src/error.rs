use std::fmt;

/// Configuration errors. Reconciliation itself never fails; all input
/// problems degrade to zero amounts or skipped comparisons.
#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate field, empty candidates, bad rate, etc.).
    ConfigValidation(String),
    /// A preference list references a field the field table doesn't define.
    UnknownField(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownField(msg) => write!(f, "unknown field: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
