//! Error types shared across the crate.

/// Errors raised while decoding an encoded pattern or value.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("invalid color string {0:?}")]
    InvalidColor(String),

    #[error("invalid frame string {0:?}")]
    InvalidFrame(String),

    #[error("unrecognized pattern string {0:?}")]
    UnrecognizedString(String),

    #[error("missing pattern type")]
    MissingType,

    #[error("invalid pattern type")]
    InvalidType,

    #[error("pattern type {0:?} not found")]
    UnknownType(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("expected a string or an object, got {0}")]
    UnexpectedJson(&'static str),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid image: {0}")]
    Image(#[from] image::ImageError),
}

/// Error reported by an [`OutputDriver`](crate::OutputDriver) write.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

impl DriverError {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Errors returned by the [`Painter`](crate::painter::Painter) control path.
#[derive(thiserror::Error, Debug)]
pub enum PainterError {
    #[error("invalid pattern: {0}")]
    Decode(#[from] DecodeError),

    #[error("painter is closed")]
    Closed,

    #[error("painter control channel is full")]
    Busy,

    #[error("failed to spawn painter worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors returned while handling a command message.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("unknown topic {0:?}")]
    UnknownTopic(String),

    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Painter(#[from] PainterError),
}

impl From<DecodeError> for CommandError {
    fn from(err: DecodeError) -> Self {
        Self::Painter(PainterError::Decode(err))
    }
}
