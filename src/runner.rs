use http::Method;
use log::{debug, warn};

use crate::error::FuzzError;
use crate::fetch::Fetch;
use crate::report::{Report, Status, TestResult};

/// Pass/fail tally of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Sends one request per candidate, strictly in order, and reports each.
pub struct Runner<F> {
    fetcher: F,
    method: Method,
}

impl<F: Fetch> Runner<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            method: Method::GET,
        }
    }

    pub async fn run<R: Report>(
        &self,
        uris: &[String],
        sink: &mut R,
    ) -> Result<Summary, FuzzError> {
        let mut summary = Summary::default();

        for (i, uri) in uris.iter().enumerate() {
            let result = self.test(i + 1, uri).await;

            if result.passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }

            sink.report(&result)?;
        }

        Ok(summary)
    }

    async fn test(&self, number: usize, uri: &str) -> TestResult {
        debug!("test {number}: {} {uri}", self.method);

        let (status, response) = match self.fetcher.get(uri).await {
            Ok(reply) if reply.status.is_success() => (Status::Code(reply.status), None),
            Ok(reply) => (Status::Code(reply.status), Some(reply.body)),
            Err(err) => {
                warn!("test {number}: {uri}: {err}");
                (Status::Transport, Some(err.to_string()))
            }
        };

        TestResult {
            number,
            status,
            method: self.method.clone(),
            uri: uri.to_string(),
            response,
        }
    }
}
