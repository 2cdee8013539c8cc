//! Layout engines.
//!
//! A [`RenderEngine`] turns a DOT document into artifact bytes. The pipeline
//! treats it as an opaque, blocking and possibly failing call bounded by a
//! [`RenderBudget`]; the default implementation runs the Graphviz `dot`
//! executable as a child process and kills it once the budget runs out.

use std::{
    io::{self, Read, Write},
    process::{Command, Stdio},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::render::OutputFormat;

/// How often a running `dot` process is checked against its budget.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Classified engine failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine could not be started or did not produce a result.
    #[error("{0}")]
    Unavailable(String),

    /// The engine refused the document as malformed.
    #[error("{0}")]
    Rejected(String),
}

/// Time an engine may spend on one document.
///
/// The budget runs out when its deadline passes or when the invoker cancels
/// it. Engines poll [`RenderBudget::is_exhausted`] and abandon their work,
/// including any child processes, once it returns `true`.
#[derive(Debug, Clone)]
pub struct RenderBudget {
    /// `None` when the timeout is too large to represent.
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl RenderBudget {
    /// A budget that runs out `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Ends the budget early. Every clone observes the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_exhausted(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// A blocking layout/rasterization engine.
pub trait RenderEngine: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Lays out `source` and returns the artifact bytes in `format`.
    ///
    /// Implementations stop working and return promptly once `budget` is
    /// exhausted.
    fn render(
        &self,
        source: &str,
        format: OutputFormat,
        budget: &RenderBudget,
    ) -> Result<Vec<u8>, EngineError>;
}

/// Graphviz `dot`, invoked as an external process.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphvizEngine;

impl GraphvizEngine {
    pub fn new() -> Self {
        Self
    }

    fn format_flag(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "-Tpng",
            OutputFormat::Svg => "-Tsvg",
            OutputFormat::Pdf => "-Tpdf",
            OutputFormat::Jpeg => "-Tjpg",
            OutputFormat::Dot => "-Tdot",
        }
    }
}

impl RenderEngine for GraphvizEngine {
    fn name(&self) -> &str {
        "graphviz"
    }

    fn render(
        &self,
        source: &str,
        format: OutputFormat,
        budget: &RenderBudget,
    ) -> Result<Vec<u8>, EngineError> {
        // `dot` reads the document from a file, not stdin.
        let mut input = NamedTempFile::new().map_err(classify)?;
        input
            .write_all(source.as_bytes())
            .and_then(|()| input.flush())
            .map_err(classify)?;

        debug!(format:%; "Invoking graphviz");
        let mut child = Command::new("dot")
            .arg(Self::format_flag(format))
            .arg(input.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(classify)?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            if budget.is_exhausted() {
                if let Err(err) = child.kill() {
                    warn!(err:%; "Failed to stop graphviz");
                }
                let _ = child.wait();
                debug!(pid = child.id(); "Graphviz stopped after its budget ran out");
                return Err(EngineError::Unavailable(
                    "`dot` was stopped after exceeding the render timeout".to_string(),
                ));
            }

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(classify(err));
                }
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if status.success() {
            Ok(stdout)
        } else {
            Err(classify(io::Error::other(
                String::from_utf8_lossy(&stderr).into_owned(),
            )))
        }
    }
}

/// Reads a child pipe to the end on its own thread so the child never stalls
/// on a full pipe.
fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// Maps a failed `dot` invocation onto an [`EngineError`].
fn classify(err: io::Error) -> EngineError {
    if err.kind() == io::ErrorKind::NotFound {
        return EngineError::Unavailable(
            "the `dot` executable was not found; install Graphviz and make sure it is on PATH"
                .to_string(),
        );
    }

    let message = err.to_string();
    if message.contains("syntax error") {
        EngineError::Rejected(message)
    } else {
        EngineError::Unavailable(message)
    }
}
