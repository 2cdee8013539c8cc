//! Rampart - declarative security-architecture diagrams.
//!
//! A diagram is built in a [`Session`]: nodes are declared into nested
//! regions, connected by styled edges, and the session is compiled into a
//! [`ResolvedGraph`]. The graph is exported to Graphviz DOT and handed to the
//! layout engine by a [`render::RenderInvoker`].
//!
//! Diagrams can be written in code or as TOML manifests (see [`manifest`]).

pub mod asset;
pub mod config;
pub mod export;
pub mod manifest;
pub mod options;
pub mod render;
pub mod resolved;
pub mod structure;

mod error;
mod session;

pub use rampart_core::{color, identifier, kind, layout, style};

pub use error::{BuildError, RampartError};
pub use resolved::ResolvedGraph;
pub use session::Session;

use std::{path::Path, sync::Arc};

use log::{debug, info, trace};

use config::AppConfig;
use options::DiagramOptions;
use render::{GraphvizEngine, RenderEngine, RenderInvoker, RenderOutput};

/// Entry point for building and rendering diagrams with shared defaults.
///
/// # Examples
///
/// ```rust,no_run
/// use rampart::{DiagramBuilder, config::AppConfig, kind::NodeKind, style::EdgeStyle};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let mut session = builder.begin("Edge").expect("valid config");
/// session.declare("waf", "L7 Firewall", NodeKind::SecurityControl, None)?;
/// session.declare("alb", "ALB", NodeKind::Network, None)?;
/// session.connect("waf", "alb", EdgeStyle::default())?;
///
/// let graph = session.compile()?;
/// builder.render(&graph, "edge.png").expect("Failed to render");
/// # Ok::<(), rampart::BuildError>(())
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Starts a session using the configured diagram options.
    ///
    /// # Errors
    ///
    /// Returns [`RampartError::Config`] if the configuration is invalid.
    pub fn begin(&self, title: &str) -> Result<Session, RampartError> {
        Ok(Session::begin(title, self.config.diagram_options()?))
    }

    /// Loads a manifest and compiles it.
    ///
    /// Custom-icon assets named by the manifest resolve relative to
    /// `base_dir`, normally the manifest's own directory.
    ///
    /// # Errors
    ///
    /// Returns [`RampartError::Parse`] for malformed manifests and
    /// [`RampartError::Build`] for construction or compilation errors.
    pub fn parse(
        &self,
        source: &str,
        base_dir: impl AsRef<Path>,
    ) -> Result<ResolvedGraph, RampartError> {
        self.parse_with(source, base_dir, self.config.diagram_options()?)
    }

    /// Like [`DiagramBuilder::parse`], but starts from `defaults` instead of
    /// the configured options. The manifest's own `[options]` still win.
    pub fn parse_with(
        &self,
        source: &str,
        base_dir: impl AsRef<Path>,
        defaults: DiagramOptions,
    ) -> Result<ResolvedGraph, RampartError> {
        info!("Parsing diagram manifest");

        let session = manifest::load(source, base_dir, defaults)?;
        let graph = session.compile()?;

        debug!("Diagram manifest compiled");
        trace!(graph:?; "Compiled diagram");

        Ok(graph)
    }

    /// Renders `graph` to `output` with the Graphviz engine.
    ///
    /// # Errors
    ///
    /// Returns [`RampartError::Render`] if the artifact cannot be produced.
    pub fn render(
        &self,
        graph: &ResolvedGraph,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutput, RampartError> {
        self.render_with(Arc::new(GraphvizEngine::new()), graph, output)
    }

    /// Renders `graph` to `output` with a caller-supplied engine.
    pub fn render_with(
        &self,
        engine: Arc<dyn RenderEngine>,
        graph: &ResolvedGraph,
        output: impl AsRef<Path>,
    ) -> Result<RenderOutput, RampartError> {
        let invoker = RenderInvoker::new(engine).with_timeout(self.config.render().timeout());
        Ok(invoker.render(graph, output)?)
    }
}
