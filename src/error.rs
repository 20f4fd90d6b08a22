//! Error handling for the PM1006 exporter crate.

/// A specialized `Result` type for PM1006 exporter operations.
pub type Result<T> = std::result::Result<T, SensorError>;

/// The main error type for sensor acquisition and metrics serving.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened or enumerated
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The byte source reported end of stream
    #[error("Sensor stream closed")]
    StreamClosed,

    /// Port discovery found nothing to open
    #[error("No serial ports found")]
    NoPortsFound,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// A background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

impl SensorError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new task error
    pub fn task_error(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Whether this error ends frame acquisition for good.
    pub fn is_fatal_stream_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Serial(_) | Self::StreamClosed)
    }
}
