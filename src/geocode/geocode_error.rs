use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GeocodeError {
    InvalidArgument(String),
    Transport(String),
    Api(String),
    MalformedResponse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            GeocodeError::Transport(msg) => write!(f, "Transport error: {msg}"),
            GeocodeError::Api(msg) => write!(f, "Geocoding API error: {msg}"),
            GeocodeError::MalformedResponse(msg) => write!(f, "Malformed API response: {msg}"),
        }
    }
}

impl Error for GeocodeError {}
