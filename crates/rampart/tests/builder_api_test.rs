//! Integration tests for the session and DiagramBuilder APIs.

use std::{fs, sync::Arc};

use rampart::{
    BuildError, DiagramBuilder, RampartError, Session,
    asset::AssetCatalog,
    color::Color,
    config::AppConfig,
    export::dot,
    identifier::Id,
    kind::NodeKind,
    options::DiagramOptions,
    render::{EngineError, OutputFormat, RenderBudget, RenderEngine, RenderInvoker},
    structure::FlatEntry,
    style::{EdgeStyle, LineStyle},
};

fn session(title: &str) -> Session {
    Session::begin(title, DiagramOptions::default())
        .with_assets(AssetCatalog::new().with("auth0.png", "/icons/auth0.png"))
}

/// Hands the DOT document back as the artifact.
struct EchoEngine;

impl RenderEngine for EchoEngine {
    fn name(&self) -> &str {
        "echo"
    }

    fn render(
        &self,
        source: &str,
        _format: OutputFormat,
        _budget: &RenderBudget,
    ) -> Result<Vec<u8>, EngineError> {
        Ok(source.as_bytes().to_vec())
    }
}

fn purple() -> Color {
    Color::new("purple").unwrap()
}

#[test]
fn test_edge_security_region() {
    let mut s = session("Edge");

    let edge = s.open_region("Edge Security").unwrap();
    s.declare("route53", "Global DNS", NodeKind::Network, None)
        .unwrap();
    s.declare("shield", "DDoS Protection", NodeKind::SecurityControl, None)
        .unwrap();
    s.declare("cloudfront", "CDN", NodeKind::Network, None)
        .unwrap();
    s.declare("waf", "L7 Firewall", NodeKind::SecurityControl, None)
        .unwrap();
    s.connect("route53", "shield", EdgeStyle::default()).unwrap();
    s.connect("shield", "cloudfront", EdgeStyle::default())
        .unwrap();
    s.connect("cloudfront", "waf", EdgeStyle::default()).unwrap();
    s.close_region(edge).unwrap();

    s.declare("auth0", "Auth0", NodeKind::CustomIcon, Some("auth0.png"))
        .unwrap();
    // The OIDC edge needs its target to exist.
    s.declare("alb", "App Load Balancer", NodeKind::Network, None)
        .unwrap();
    s.connect(
        "auth0",
        "alb",
        EdgeStyle::dashed(purple()).with_label("OIDC Auth"),
    )
    .unwrap();

    let graph = s.compile().unwrap();
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.region_count(), 1);
    assert_eq!(
        graph.region_nodes("Edge Security"),
        Some(
            ["route53", "shield", "cloudfront", "waf"]
                .map(Id::new)
                .to_vec()
        )
    );

    let oidc = graph.edges_between("auth0", "alb");
    assert_eq!(oidc.len(), 1);
    assert_eq!(oidc[0].style().color(), purple());
    assert_eq!(oidc[0].style().line(), LineStyle::Dashed);
    assert_eq!(oidc[0].style().label(), Some("OIDC Auth"));
}

#[test]
fn test_unknown_endpoint_leaves_edges_unchanged() {
    let mut s = session("Ghost");
    s.declare("alb", "ALB", NodeKind::Network, None).unwrap();
    s.declare("waf", "WAF", NodeKind::SecurityControl, None)
        .unwrap();
    s.connect("waf", "alb", EdgeStyle::default()).unwrap();

    let before = s.edge_count();
    let err = s
        .connect("ghost", "alb", EdgeStyle::dashed(purple()))
        .unwrap_err();

    assert_eq!(
        err,
        BuildError::UnknownNode {
            key: "ghost".to_string()
        }
    );
    assert_eq!(s.edge_count(), before);
}

#[test]
fn test_cycle_compiles_and_renders() {
    let mut s = session("Loop");
    for key in ["a", "b", "c"] {
        s.declare(key, key, NodeKind::Compute, None).unwrap();
    }
    s.connect("a", "b", EdgeStyle::default()).unwrap();
    s.connect("b", "c", EdgeStyle::default()).unwrap();
    s.connect("c", "a", EdgeStyle::bold(Color::new("red").unwrap()))
        .unwrap();

    let graph = s.compile().unwrap();
    assert_eq!(graph.edge_count(), 3);

    let document = dot::to_dot(&graph);
    assert_eq!(document.matches("->").count(), 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.svg");
    let output = RenderInvoker::new(Arc::new(EchoEngine))
        .render(&graph, &path)
        .unwrap();

    assert_eq!(output.format(), OutputFormat::Svg);
    assert_eq!(fs::read_to_string(&path).unwrap(), document);
}

#[test]
fn test_parallel_edges_stay_distinct() {
    let mut s = session("Parallel");
    s.declare("eks", "EKS", NodeKind::Compute, None).unwrap();
    s.declare("siem", "SIEM", NodeKind::ExternalSaas, None)
        .unwrap();
    s.connect(
        "eks",
        "siem",
        EdgeStyle::dotted(Color::new("gray").unwrap()).with_label("Auth Logs"),
    )
    .unwrap();
    s.connect(
        "eks",
        "siem",
        EdgeStyle::dashed(purple()).with_label("OIDC Auth"),
    )
    .unwrap();

    let graph = s.compile().unwrap();
    let labels: Vec<_> = graph
        .edges_between("eks", "siem")
        .iter()
        .map(|edge| edge.style().label())
        .collect();
    assert_eq!(labels, vec![Some("Auth Logs"), Some("OIDC Auth")]);

    let document = dot::to_dot(&graph);
    assert!(document.contains("Auth Logs"));
    assert!(document.contains("OIDC Auth"));
}

#[test]
fn test_sibling_order_is_preserved() {
    let mut s = session("Order");
    s.region("VPC", |s| {
        s.declare("nat", "NAT", NodeKind::Network, None)?;
        s.region("Private Subnet", |s| {
            s.declare("eks", "EKS", NodeKind::Compute, None)?;
            Ok(())
        })?;
        s.declare("alb", "ALB", NodeKind::Network, None)?;
        Ok(())
    })
    .unwrap();

    let graph = s.compile().unwrap();
    let order: Vec<String> = graph
        .layout()
        .iter()
        .map(|entry| match entry {
            FlatEntry::Node { key, .. } => key.to_string(),
            FlatEntry::Region { label, .. } => format!("[{label}]"),
        })
        .collect();
    assert_eq!(order, ["[VPC]", "nat", "[Private Subnet]", "eks", "alb"]);
}

#[test]
fn test_builder_parses_manifest() {
    let source = r#"
        title = "Builder"
        members = [
            { key = "waf", label = "WAF", kind = "security-control" },
            { key = "alb", label = "ALB", kind = "network" },
        ]
        edges = [{ from = "waf", to = "alb", style = "dotted" }]
    "#;

    let builder = DiagramBuilder::default();
    let graph = builder.parse(source, ".").expect("Failed to parse manifest");
    assert_eq!(graph.title(), "Builder");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_builder_applies_config_defaults() {
    let config: AppConfig = toml::from_str("[layout]\norientation = \"TB\"").unwrap();
    let builder = DiagramBuilder::new(config);

    let session = builder.begin("Configured").unwrap();
    assert_eq!(
        session.options().orientation(),
        rampart::layout::Orientation::TB
    );
}

#[test]
fn test_builder_reports_build_errors() {
    let source = r#"
        title = "Broken"
        members = [{ key = "prowler", kind = "custom-icon", asset = "missing/prowler.png" }]
    "#;

    let err = DiagramBuilder::default().parse(source, ".").unwrap_err();
    assert!(matches!(
        err,
        RampartError::Build(BuildError::MissingAsset { ref key, .. }) if key == "prowler"
    ));
}
