//! Error types for the macwatch-probe crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("arp-scan not found at path: {path}")]
    NotFound { path: String },

    #[error("arp-scan exited with code {code}: {stderr}")]
    ScanFailed { code: i32, stderr: String },

    #[error("Invalid probe target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("arp-scan produced non-UTF-8 output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
