/// Core error type for the homework bot.
///
/// Adapter crates map their specific errors into this type. Every variant except
/// `Config` and `Io` is recoverable: the poll loop reports it and retries on the
/// next tick.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API returned HTTP status {0}")]
    BadStatus(u16),

    #[error("API returned a body that is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("unexpected API response: {0}")]
    MalformedResponse(String),

    #[error("homework record has no \"{0}\" field")]
    MissingField(&'static str),

    #[error("unknown homework status \"{0}\"")]
    UnknownStatus(String),

    #[error("message delivery failed: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, Error>;
