use std::fmt;

use crate::types::AcMode;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    /// Bridge answered with a non-success status and no recognized body.
    Remote { status: u16, body: String },
    Timeout,
    InvalidRequestedMode(String),
    TemperatureOutOfRange {
        mode: AcMode,
        celsius: f64,
        min: f64,
        max: f64,
    },
    TemperatureNotAdjustable(AcMode),
    Unsupported(String),
    Config(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Remote { status, body } if body.is_empty() => {
                write!(f, "bridge rejected command: status {status}")
            }
            Error::Remote { status, body } => {
                write!(f, "bridge rejected command: status {status}: {body}")
            }
            Error::Timeout => write!(f, "bridge request timed out"),
            Error::InvalidRequestedMode(msg) => write!(f, "invalid requested mode: {msg}"),
            Error::TemperatureOutOfRange {
                mode,
                celsius,
                min,
                max,
            } => write!(
                f,
                "temperature {celsius}\u{00b0}C out of range for {mode:?} ({min}..={max})"
            ),
            Error::TemperatureNotAdjustable(mode) => {
                write!(f, "temperature is fixed in {mode:?} mode")
            }
            Error::Unsupported(what) => write!(f, "unsupported: {what}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(e)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
