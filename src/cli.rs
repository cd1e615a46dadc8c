use clap::{ArgAction, Parser};

use crate::error::FuzzError;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "c-fuzz",
    version,
    disable_version_flag = true,
    about = "Replaces every '#' in a URI with boundary values and GETs each result."
)]
pub struct Args {
    /// Endpoint URI; each '#' marks a position to fuzz.
    pub uri: Option<String>,

    /// Write the session transcript to result.txt in the current directory.
    #[arg(short, long, requires = "uri")]
    pub log: bool,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// Rejects input that is not an absolute URI before anything is expanded.
pub fn validate(uri: &str) -> Result<(), FuzzError> {
    url::Url::parse(uri)
        .map(|_| ())
        .map_err(FuzzError::InvalidUri)
}
