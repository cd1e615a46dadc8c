use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a fuzz session.
#[derive(Debug, Error)]
pub enum FuzzError {
    #[error("ERROR: No URI provided. See 'c-fuzz -h' for more information.")]
    InvalidUri(#[source] url::ParseError),

    #[error("cannot write session log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write report: {0}")]
    Output(#[source] io::Error),
}

/// Transport-level failure of a single request.
///
/// The `Display` text is what the report shows after `Response:`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URI: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("unsupported scheme '{0}', only http is supported")]
    UnsupportedScheme(String),

    #[error("URI has no host")]
    MissingHost,

    #[error("connection failed: {0}")]
    Connect(#[from] io::Error),

    #[error("request failed: {0}")]
    Http(#[from] hyper::Error),

    #[error("cannot build request: {0}")]
    Request(#[from] http::Error),
}
