//! Render invocation.
//!
//! [`RenderInvoker`] serializes a [`ResolvedGraph`] to DOT, hands it to a
//! [`RenderEngine`] on a worker thread, waits at most the configured timeout,
//! cancels the engine's [`RenderBudget`] if it is exceeded, and writes the
//! artifact atomically: bytes go to a temporary file next to
//! the destination, which is then persisted over it. A failed render never
//! leaves a partial file behind, and rendering the same graph to the same path
//! twice overwrites it with identical content.

mod engine;
mod viewer;

pub use engine::{EngineError, GraphvizEngine, RenderBudget, RenderEngine};

use std::{
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::Duration,
};

use log::{debug, info, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{export::dot, resolved::ResolvedGraph};

/// Default time allowed for the layout engine.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How long a cancelled engine gets to wind down before it is reported as
/// stuck.
const CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Artifact format, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Svg,
    Pdf,
    Jpeg,
    /// The DOT document itself; written without invoking the engine.
    Dot,
}

impl OutputFormat {
    /// Picks the format for `path` from its extension. A path without an
    /// extension renders as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let Some(extension) = path.extension() else {
            return Ok(Self::Png);
        };

        match extension.to_string_lossy().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "dot" | "gv" => Ok(Self::Dot),
            other => Err(RenderError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Jpeg => "jpeg",
            Self::Dot => "dot",
        };
        f.write_str(name)
    }
}

/// Render-time failures, surfaced verbatim and never retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout engine `{engine}` is not available: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    #[error("cannot write output `{}`: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported output format `.{extension}` for `{}`", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("rendered `{}` but could not open a viewer: {source}", path.display())]
    Viewer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A successfully written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    path: PathBuf,
    format: OutputFormat,
    bytes: usize,
}

impl RenderOutput {
    /// Final location of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Size of the artifact in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Drives a [`RenderEngine`] for resolved graphs.
#[derive(Clone)]
pub struct RenderInvoker {
    engine: Arc<dyn RenderEngine>,
    timeout: Duration,
}

impl fmt::Debug for RenderInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderInvoker")
            .field("engine", &self.engine.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for RenderInvoker {
    fn default() -> Self {
        Self::new(Arc::new(GraphvizEngine::new()))
    }
}

impl RenderInvoker {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets how long to wait for the engine before giving up.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Renders `graph` to `output`.
    ///
    /// The format follows the extension of `output` (see
    /// [`OutputFormat::from_path`]). When the graph's options ask for it, the
    /// artifact is opened in the platform viewer afterwards.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UnsupportedFormat`] for an unknown extension
    /// - [`RenderError::OutputUnwritable`] if the destination cannot be written
    /// - [`RenderError::EngineUnavailable`] if the engine cannot run, fails, or
    ///   exceeds the timeout
    /// - [`RenderError::Viewer`] if the artifact was written but the viewer
    ///   could not be launched
    ///
    /// # Panics
    ///
    /// Panics if the engine rejects the serialized document as malformed;
    /// compiled graphs always serialize to valid DOT.
    pub fn render(
        &self,
        graph: &ResolvedGraph,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutput, RenderError> {
        let path = output.as_ref();
        let format = OutputFormat::from_path(path)?;
        info!(path:% = path.display(), format:%, engine = self.engine.name(); "Rendering diagram");

        // Claim the destination directory before spending time in the engine.
        let mut staging = staging_file(path)?;

        let source = dot::to_dot(graph);
        let bytes = match format {
            OutputFormat::Dot => source.into_bytes(),
            _ => self.invoke(source, format)?,
        };

        staging
            .write_all(&bytes)
            .and_then(|()| staging.flush())
            .map_err(|source| unwritable(path, source))?;
        staging
            .persist(path)
            .map_err(|err| unwritable(path, err.error))?;

        info!(path:% = path.display(), bytes = bytes.len(); "Diagram rendered");

        if graph.options().show() {
            viewer::open(path).map_err(|source| RenderError::Viewer {
                path: path.to_path_buf(),
                source,
            })?;
        }

        Ok(RenderOutput {
            path: path.to_path_buf(),
            format,
            bytes: bytes.len(),
        })
    }

    /// Runs the engine on a worker thread and waits for it with a timeout.
    ///
    /// On timeout the budget is cancelled and the worker is given
    /// [`CANCEL_GRACE`] to stop before the error is returned.
    fn invoke(&self, source: String, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        let engine_name = self.engine.name().to_string();
        let unavailable = |reason: String| RenderError::EngineUnavailable {
            engine: engine_name.clone(),
            reason,
        };

        let budget = RenderBudget::new(self.timeout);
        let (sender, receiver) = mpsc::channel();
        let engine = Arc::clone(&self.engine);
        let worker_budget = budget.clone();
        thread::Builder::new()
            .name("rampart-render".to_string())
            .spawn(move || {
                // The receiver is gone if the caller stopped waiting.
                let _ = sender.send(engine.render(&source, format, &worker_budget));
            })
            .map_err(|err| unavailable(format!("cannot start render worker: {err}")))?;

        debug!(timeout:? = self.timeout; "Waiting for layout engine");
        let timed_out = || unavailable(format!("no result within {:?}", self.timeout));
        let outcome = match receiver.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                budget.cancel();
                if let Err(RecvTimeoutError::Timeout) = receiver.recv_timeout(CANCEL_GRACE) {
                    warn!(engine = engine_name.as_str(); "Layout engine ignored cancellation");
                }
                return Err(timed_out());
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(unavailable(
                    "render worker stopped without a result".to_string(),
                ));
            }
        };

        match outcome {
            Ok(bytes) => Ok(bytes),
            // The engine gave up on its own once the deadline passed.
            Err(EngineError::Unavailable(_)) if budget.is_exhausted() => Err(timed_out()),
            Err(EngineError::Unavailable(reason)) => Err(unavailable(reason)),
            Err(EngineError::Rejected(reason)) => panic!(
                "layout engine `{engine_name}` rejected a compiled graph as malformed: {reason}"
            ),
        }
    }
}

/// Creates the temporary file the artifact is staged in, beside `path`.
fn staging_file(path: &Path) -> Result<NamedTempFile, RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|source| unwritable(path, source))
}

fn unwritable(path: &Path, source: io::Error) -> RenderError {
    RenderError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    }
}
