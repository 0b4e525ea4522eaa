use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid logger format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("journald is not available on this platform or the feature is disabled")]
    JournaldNotSupported,
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger initialization failed: {0}")]
    InitializationFailed(String),
}
