use std::fmt::{self, Debug, Display, Formatter};
use std::{io, result};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    InvalidConfig(String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "terminal i/o failed: {}", e),
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

pub type Result<T = ()> = result::Result<T, Error>;
