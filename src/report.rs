//! Test results and the places they are written to.
//!
//! Every sink renders the same text through [`TestResult::render`]; only the
//! console adds color on top of it.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::FuzzError;

/// Where the session log goes when `--log` is given.
pub const LOG_FILE: &str = "result.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Code(StatusCode),
    /// The request never produced a response.
    Transport,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Code(code) => write!(f, "{}", code.as_u16()),
            Status::Transport => f.write_str("---"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub number: usize,
    pub status: Status,
    pub method: Method,
    pub uri: String,
    pub response: Option<String>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        matches!(self.status, Status::Code(code) if code.is_success())
    }

    /// Report text without a trailing newline.
    pub fn render(&self) -> String {
        let mut text = format!(
            "Test {}: {} [{}] {}",
            self.number, self.status, self.method, self.uri
        );
        if let Some(response) = self.response.as_deref().filter(|r| !r.is_empty()) {
            text.push_str("\nResponse: ");
            text.push_str(response);
        }
        text
    }
}

/// A place test results are written to.
///
/// Failing to write is fatal for the run.
pub trait Report {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError>;
}

impl<R: Report + ?Sized> Report for &mut R {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError> {
        (**self).report(result)
    }
}

impl<R: Report> Report for Option<R> {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError> {
        match self {
            Some(inner) => inner.report(result),
            None => Ok(()),
        }
    }
}

/// Writes to both sinks, first one first.
impl<A: Report, B: Report> Report for (A, B) {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError> {
        self.0.report(result)?;
        self.1.report(result)
    }
}

/// Colored report lines, green for passes and red for failures.
pub struct Console<W> {
    out: W,
}

impl Console<StandardStream> {
    /// Stdout, colored only when it is a terminal.
    pub fn stdout() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        self.out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        writeln!(self.out, "{}", text)?;
        self.out.reset()?;
        self.out.flush()
    }
}

impl<W: WriteColor> Report for Console<W> {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError> {
        let color = if result.passed() { Color::Green } else { Color::Red };
        self.write_colored(color, &result.render())
            .map_err(FuzzError::Output)
    }
}

/// Plain-text transcript of one run.
///
/// The file is reopened for every entry and closed again, so whatever was
/// reported before a crash is already on disk.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Truncates `path` and writes the session header.
    pub fn create(
        path: impl Into<PathBuf>,
        input: &str,
        started: DateTime<Utc>,
    ) -> Result<Self, FuzzError> {
        let path = path.into();
        let header = format!(
            "{}\nInput: {}\n",
            started.format("%A, %B %-d, %Y %H:%M:%S UTC"),
            input
        );

        File::create(&path)
            .and_then(|mut file| {
                file.write_all(header.as_bytes())?;
                file.flush()
            })
            .map_err(|source| FuzzError::Log {
                path: path.clone(),
                source,
            })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Report for SessionLog {
    fn report(&mut self, result: &TestResult) -> Result<(), FuzzError> {
        OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(file, "{}", result.render())?;
                file.flush()
            })
            .map_err(|source| FuzzError::Log {
                path: self.path.clone(),
                source,
            })
    }
}
