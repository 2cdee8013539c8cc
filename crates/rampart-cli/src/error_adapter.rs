//! Error adapter for converting RampartError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Manifest errors
//! carry the manifest source and, for syntax errors, the offending span.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use rampart::{BuildError, RampartError, manifest::ManifestError, render::RenderError};

/// Adapter for a manifest error with its source.
pub struct DiagnosticAdapter<'a> {
    err: &'a ManifestError,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(err: &'a ManifestError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("rampart::parse"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

/// Adapter for non-manifest [`RampartError`] variants.
pub struct ErrorAdapter<'a>(pub &'a RampartError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            RampartError::Io(_) => "rampart::io",
            RampartError::Parse { .. } => "rampart::parse",
            RampartError::Build(_) => "rampart::build",
            RampartError::Render(_) => "rampart::render",
            RampartError::Config(_) => "rampart::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            RampartError::Build(err) => build_help(err.root_cause()),
            RampartError::Render(err) => render_help(err),
            RampartError::Config(_) => {
                "see the [layout], [style] and [render] sections of the configuration"
            }
            RampartError::Io(_) | RampartError::Parse { .. } => return None,
        };
        Some(Box::new(help))
    }
}

fn build_help(err: &BuildError) -> &'static str {
    match err {
        BuildError::DuplicateKey { .. } => {
            "node keys are unique across the whole diagram, regions included"
        }
        BuildError::MissingAsset { .. } => {
            "custom-icon assets are resolved relative to the manifest's directory"
        }
        BuildError::ScopeViolation { .. } => {
            "regions must be closed innermost first, each exactly once"
        }
        BuildError::UnknownNode { .. } => "declare the node before connecting it",
        BuildError::DuplicateRegion { .. } => "sibling regions need distinct labels",
        BuildError::SessionAborted { .. } => "fix the first error reported for this diagram",
    }
}

fn render_help(err: &RenderError) -> &'static str {
    match err {
        RenderError::EngineUnavailable { .. } => {
            "install Graphviz, or render to a `.dot` file to skip the layout engine"
        }
        RenderError::OutputUnwritable { .. } => {
            "check that the output directory exists and is writable"
        }
        RenderError::UnsupportedFormat { .. } => "use one of .png, .svg, .pdf, .jpg or .dot",
        RenderError::Viewer { .. } => "the artifact was written; open it manually",
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A manifest error with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`RampartError`] into a list of reportable errors.
///
/// Manifest errors keep their source so miette can show the snippet; every
/// other variant becomes a single plain error.
pub fn to_reportables(err: &RampartError) -> Vec<Reportable<'_>> {
    match err {
        RampartError::Parse { err, src } => {
            vec![Reportable::Diagnostic(DiagnosticAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
