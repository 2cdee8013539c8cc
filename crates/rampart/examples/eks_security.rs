//! Example: Building the EKS security architecture in code
//!
//! This builds the same diagram as `demos/eks_security_architecture_v2.toml`
//! through the session API and renders it. Pass an output path to choose the
//! format; a `.dot` path skips Graphviz and writes the DOT document.
//!
//! ```text
//! cargo run -p rampart --example eks_security -- eks.svg
//! ```

use std::{env, path::PathBuf};

use rampart::{
    DiagramBuilder, Session,
    asset::FsAssetResolver,
    color::Color,
    kind::NodeKind,
    options::DiagramOptions,
    style::EdgeStyle,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = env::args()
        .nth(1)
        .unwrap_or_else(|| "eks_security_architecture_v2.png".to_string());

    // Icons live next to the demo manifest.
    let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos");

    let mut s = Session::begin(
        "EKS Integrated Security Architecture v2",
        DiagramOptions::default(),
    )
    .with_assets(FsAssetResolver::new(demos));

    let color = |name: &str| Color::new(name);
    let darkblue = color("darkblue")?;

    // Development
    s.region("Development\nShift-Left Security", |s| {
        s.declare("github", "GitHub", NodeKind::ExternalSaas, None)?;
        s.declare(
            "checkov",
            "Checkov\nIaC Scanning",
            NodeKind::CustomIcon,
            Some("architecture/checkov.png"),
        )?;
        s.connect("github", "checkov", EdgeStyle::bold(darkblue))?;
        Ok(())
    })?;

    // Edge security
    s.region("Edge Security", |s| {
        s.declare("route53", "Global DNS", NodeKind::Network, None)?;
        s.declare("shield", "DDoS Protection", NodeKind::SecurityControl, None)?;
        s.declare("cloudfront", "CDN", NodeKind::Network, None)?;
        s.declare("waf", "L7 Firewall", NodeKind::SecurityControl, None)?;
        s.connect("route53", "shield", EdgeStyle::default())?;
        s.connect("shield", "cloudfront", EdgeStyle::default())?;
        s.connect("cloudfront", "waf", EdgeStyle::default())?;
        Ok(())
    })?;

    // Authentication
    s.declare(
        "auth0",
        "Auth0\n(OIDC/Auth0)",
        NodeKind::CustomIcon,
        Some("architecture/auth0.png"),
    )?;

    // VPC and compute
    s.region("VPC", |s| {
        s.region("Public Subnet", |s| {
            s.declare("alb", "ALB\n(OIDC/Auth0)", NodeKind::Network, None)?;
            Ok(())
        })?;
        s.region("Private Subnet", |s| {
            s.declare("eks", "EKS Cluster", NodeKind::Compute, None)?;
            Ok(())
        })?;
        s.connect("alb", "eks", EdgeStyle::default())?;
        Ok(())
    })?;

    // Governance
    let firebrick = color("firebrick")?;
    let darkorange = color("darkorange")?;
    s.region("Security Governance\nCentralized Monitoring", |s| {
        s.declare(
            "guardduty",
            "GuardDuty\nThreat Detection",
            NodeKind::SecurityControl,
            None,
        )?;
        s.declare(
            "inspector",
            "Inspector\nVuln Scanning",
            NodeKind::SecurityControl,
            None,
        )?;
        s.declare(
            "prowler",
            "Prowler\nAWS Auditing",
            NodeKind::CustomIcon,
            Some("architecture/prowler.png"),
        )?;
        s.declare(
            "security_hub",
            "Security Hub\nCentralized Monitoring",
            NodeKind::SecurityControl,
            None,
        )?;
        s.connect("guardduty", "security_hub", EdgeStyle::new(firebrick))?;
        s.connect("inspector", "security_hub", EdgeStyle::new(firebrick))?;
        s.connect("prowler", "security_hub", EdgeStyle::dashed(darkorange))?;
        Ok(())
    })?;

    // Observability
    s.region("Observability\nSIEM & Analytics", |s| {
        s.declare("datadog", "Datadog\nSIEM", NodeKind::ExternalSaas, None)?;
        Ok(())
    })?;

    // Automation and response
    s.region("Auto-Response\nIncident Automation", |s| {
        s.declare("eventbridge", "EventBridge", NodeKind::Integration, None)?;
        s.declare("lambda", "Lambda\nAuto-Response", NodeKind::Compute, None)?;
        s.declare("slack", "Slack\nNotification", NodeKind::ExternalSaas, None)?;
        Ok(())
    })?;

    // Cross-region flows, including the detection and response loop back to
    // the firewall.
    let red = color("red")?;
    let flows = [
        ("checkov", "eks", EdgeStyle::bold(darkblue).with_label("IaC Deploy")),
        ("waf", "alb", EdgeStyle::default()),
        ("auth0", "alb", EdgeStyle::dashed(color("purple")?).with_label("OIDC Auth")),
        ("auth0", "datadog", EdgeStyle::dotted(color("dodgerblue")?).with_label("Auth Logs")),
        ("eks", "guardduty", EdgeStyle::dotted(firebrick)),
        ("eks", "inspector", EdgeStyle::dotted(firebrick)),
        ("security_hub", "datadog", EdgeStyle::bold(darkorange).with_label("Findings")),
        ("guardduty", "eventbridge", EdgeStyle::bold(red).with_label("Threat Event")),
        ("eventbridge", "lambda", EdgeStyle::bold(red)),
        ("lambda", "waf", EdgeStyle::bold(red).with_label("Auto-Block/Update IP Set")),
        ("lambda", "slack", EdgeStyle::dashed(color("orange")?).with_label("Alert")),
    ];
    for (source, target, style) in flows {
        s.connect(source, target, style)?;
    }

    let graph = s.compile()?;
    println!(
        "Compiled {} nodes, {} edges in {} regions",
        graph.node_count(),
        graph.edge_count(),
        graph.region_count()
    );

    let rendered = DiagramBuilder::default().render(&graph, &output)?;
    println!("Wrote {} ({} bytes)", rendered.path().display(), rendered.bytes());

    Ok(())
}
