use thiserror::Error;

/// Errors surfaced by adapters and the streaming layer.
///
/// Callers can branch on kind: [`Error::Unsupported`] means the venue lacks
/// the capability, [`Error::Validation`] means the input never left the
/// process, and the transport variants mean the round trip itself failed.
/// Transport failures on `place_order`/`cancel_order` are never retried by
/// this crate; the outcome is ambiguous and a retry risks duplicates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("operation not supported by this venue: {0}")]
    Unsupported(&'static str),

    /// The venue answered the HTTP round trip but rejected the request.
    #[error("venue error {code}: {message}")]
    Vendor { code: i64, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    /// A venue response field could not be parsed into the canonical model.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("failed to read config file: {0}")]
    ConfigRead(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] value.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
