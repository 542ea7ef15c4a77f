use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InframanError {
    Environment(String),
    Io(#[from] std::io::Error),
    Filesystem(String),
    Parse(String),
    NotFound(String),
    Ambiguous(String),
    Command(String),
    Other(#[from] anyhow::Error),
}

impl Display for InframanError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            InframanError::Environment(s) => write!(f, "Environment error: {}", s),
            InframanError::Io(e) => write!(f, "I/O error: {}", e),
            InframanError::Filesystem(s) => write!(f, "Filesystem error: {}", s),
            InframanError::Parse(s) => write!(f, "Parse error: {}", s),
            InframanError::NotFound(s) => write!(f, "Not found: {}", s),
            InframanError::Ambiguous(s) => write!(f, "Ambiguous target: {}", s),
            InframanError::Command(s) => write!(f, "Command failed: {}", s),
            InframanError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_json::Error> for InframanError {
    fn from(err: serde_json::Error) -> Self {
        InframanError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InframanError>;
