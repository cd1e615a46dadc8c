//! Expands a URI template over a fixed catalog of boundary values and GETs
//! every permutation, reporting pass/fail per request.

pub mod cli;
pub mod error;
pub mod fetch;
pub mod permute;
pub mod report;
pub mod runner;

pub use error::{FetchError, FuzzError};
pub use fetch::{Fetch, HttpFetcher, Reply};
pub use permute::{expand, CATALOG, MARKER};
pub use report::{Console, Report, SessionLog, Status, TestResult, LOG_FILE};
pub use runner::{Runner, Summary};
