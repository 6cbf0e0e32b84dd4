//! Domain error types.

/// Top-level error type for signalsim.
#[derive(Debug, thiserror::Error)]
pub enum SignalsimError {
    #[error("invalid type for {name}: expected {expected}, got {found}")]
    InvalidInputType {
        name: String,
        expected: String,
        found: String,
    },

    #[error("{name} out of range: {reason}")]
    InvalidInputRange { name: String, reason: String },

    #[error("unsupported method '{method}' (expected one of bollinger, macd, roc, rsi)")]
    InvalidMethod { method: String },

    #[error("{name} must be an integer greater than 1, got {value}")]
    InvalidWindow { name: String, value: i64 },

    #[error(
        "invalid MACD windows ({short_window}, {long_window}, {signal_window}): \
         short_window must be below long_window and signal_window must not exceed short_window"
    )]
    InvalidWindowRelationship {
        short_window: usize,
        long_window: usize,
        signal_window: usize,
    },

    #[error("length mismatch: {prices} prices but {signals} signals")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalsimError {
    pub(crate) fn range(name: &str, reason: impl Into<String>) -> Self {
        SignalsimError::InvalidInputRange {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the malformed-input family raised by the core entry points.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SignalsimError::InvalidInputType { .. }
                | SignalsimError::InvalidInputRange { .. }
                | SignalsimError::InvalidMethod { .. }
                | SignalsimError::InvalidWindow { .. }
                | SignalsimError::InvalidWindowRelationship { .. }
                | SignalsimError::LengthMismatch { .. }
        )
    }
}

impl From<&SignalsimError> for std::process::ExitCode {
    fn from(err: &SignalsimError) -> Self {
        let code: u8 = match err {
            e if e.is_input_error() => 3,
            SignalsimError::ConfigParse { .. }
            | SignalsimError::ConfigMissing { .. }
            | SignalsimError::ConfigInvalid { .. } => 2,
            SignalsimError::NoData { .. } | SignalsimError::Data { .. } => 5,
            _ => 1,
        };
        std::process::ExitCode::from(code)
    }
}
