use thiserror::Error;

/// Result type alias using PrintwatchError
pub type Result<T> = std::result::Result<T, PrintwatchError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and process exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Validation
    InvalidConfig,
    InvalidTolerance,
    /// A recorded log line is not a JSON object
    InvalidRecord,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    /// A downstream event sink refused or failed a delivery
    ExternalService,
    /// The snapshot hand-off queue was closed underneath a sender
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidTolerance => "ERR_INVALID_TOLERANCE",
            ExErrorKind::InvalidRecord => "ERR_INVALID_RECORD",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and enough
/// context (operation, file, line, field) to point a user at bad input.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line number context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add snapshot field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for printwatch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrintwatchError {
    // ===== Configuration Errors =====
    /// A `field:threshold` tolerance could not be parsed
    #[error("Invalid tolerance '{spec}': {reason}")]
    InvalidTolerance { spec: String, reason: String },

    /// A percentage threshold outside 0..=100
    #[error("Invalid percentage threshold {value}: must be within 0..=100")]
    InvalidThreshold { value: i64 },

    /// Any other configuration inconsistency detected at startup
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Log Input Errors =====
    /// The recorded log could not be opened or read
    #[error("Cannot read log {path}: {reason}")]
    LogUnreadable { path: String, reason: String },

    /// A log record is not a JSON object
    #[error("Malformed log record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    // ===== Persistence Errors =====
    /// The session checkpoint exists but could not be decoded
    #[error("Corrupt checkpoint {path}: {reason}")]
    CheckpointCorrupt { path: String, reason: String },

    /// Filesystem failure outside of log reading
    #[error("IO error during {op}: {message}")]
    Io { op: String, message: String },

    // ===== Delivery Errors =====
    /// An event sink failed to accept an event
    #[error("Dispatch of {event_kind} failed: {reason}")]
    DispatchFailed { event_kind: String, reason: String },

    /// The processing loop is gone
    #[error("Snapshot queue closed")]
    ChannelClosed,
}

impl From<PrintwatchError> for ExError {
    fn from(err: PrintwatchError) -> Self {
        match err {
            PrintwatchError::InvalidTolerance { spec, reason } => {
                ExError::new(ExErrorKind::InvalidTolerance)
                    .with_op("parse_tolerance")
                    .with_message(format!("'{}': {}", spec, reason))
            }

            PrintwatchError::InvalidThreshold { value } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("resolve_config")
                .with_field("report_percentages")
                .with_message(format!("threshold {} outside 0..=100", value)),

            PrintwatchError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("resolve_config")
                .with_message(reason),

            PrintwatchError::LogUnreadable { path, reason } => ExError::new(ExErrorKind::Io)
                .with_op("read_log")
                .with_path(path)
                .with_message(reason),

            PrintwatchError::MalformedRecord { line, reason } => {
                ExError::new(ExErrorKind::InvalidRecord)
                    .with_op("parse_log")
                    .with_line(line)
                    .with_message(reason)
            }

            PrintwatchError::CheckpointCorrupt { path, reason } => {
                ExError::new(ExErrorKind::Persistence)
                    .with_op("load_checkpoint")
                    .with_path(path)
                    .with_message(reason)
            }

            PrintwatchError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),

            PrintwatchError::DispatchFailed { event_kind, reason } => {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("dispatch_event")
                    .with_message(format!("{}: {}", event_kind, reason))
            }

            PrintwatchError::ChannelClosed => ExError::new(ExErrorKind::Concurrency)
                .with_op("submit_snapshot")
                .with_message("processing loop has shut down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (ExErrorKind::InvalidTolerance, "ERR_INVALID_TOLERANCE"),
            (ExErrorKind::InvalidRecord, "ERR_INVALID_RECORD"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
            (ExErrorKind::Concurrency, "ERR_CONCURRENCY"),
            (ExErrorKind::Io, "ERR_IO"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
            (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_malformed_record_carries_line() {
        let err: ExError = PrintwatchError::MalformedRecord {
            line: 7,
            reason: "expected value".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidRecord);
        assert_eq!(err.line(), Some(7));
        assert!(err.to_string().contains("(line: 7)"));
    }

    #[test]
    fn test_threshold_error_names_field() {
        let err: ExError = PrintwatchError::InvalidThreshold { value: 140 }.into();
        assert_eq!(err.code(), "ERR_INVALID_CONFIG");
        assert_eq!(err.field(), Some("report_percentages"));
    }
}
