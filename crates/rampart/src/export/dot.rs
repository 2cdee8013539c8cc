//! DOT serialization.
//!
//! The resolved graph is turned into a [`dot_structures::Graph`] and printed
//! with the `graphviz-rust` printer. Regions become `cluster_<n>` subgraphs so
//! that Graphviz draws their bounding boxes; the tree is walked depth-first in
//! declaration order. Edges are emitted afterwards as one flat list, which is
//! why cycles need no special handling.
//!
//! Nodes are identified as `n<index>` by declaration position rather than by
//! key, so keys that differ only in characters DOT cannot carry still map to
//! distinct nodes. The key travels along as the node's `id` attribute.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::debug;

use rampart_core::{color::Color, identifier::Id};

use crate::{
    resolved::ResolvedGraph,
    structure::{ClusterTree, Edge, Member, Node},
};

/// Prints `graph` as a DOT document.
///
/// # Panics
///
/// Panics if the graph's region layout cannot be re-nested. Compilation
/// guarantees a consistent layout, so this indicates a bug.
pub fn to_dot(graph: &ResolvedGraph) -> String {
    let document = to_graph(graph).print(&mut PrinterContext::default());
    debug!(bytes = document.len(); "DOT document serialized");
    document
}

/// Builds the DOT syntax tree for `graph`.
///
/// # Panics
///
/// See [`to_dot`].
pub fn to_graph(graph: &ResolvedGraph) -> Graph {
    let tree = graph
        .tree()
        .unwrap_or_else(|err| panic!("resolved graph has an inconsistent region layout: {err}"));

    let mut stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(
        graph_attributes(graph),
    ))];

    members_into(graph, &tree, tree.root(), &mut stmts);
    stmts.extend(graph.edges().iter().map(|edge| edge_stmt(graph, edge)));

    Graph::DiGraph {
        id: escaped(graph.title()),
        // Parallel edges between the same pair must stay distinct.
        strict: false,
        stmts,
    }
}

fn graph_attributes(graph: &ResolvedGraph) -> Vec<Attribute> {
    let options = graph.options();
    vec![
        attr("label", escaped(graph.title())),
        attr("labelloc", plain("t")),
        attr("fontsize", plain(options.font_size())),
        attr("bgcolor", color(options.background())),
        attr("rankdir", plain(options.orientation().to_dot_value())),
        attr("splines", plain(options.splines().to_dot_value())),
        attr("nodesep", plain(options.node_spacing())),
        attr("ranksep", plain(options.rank_spacing())),
    ]
}

fn members_into(
    graph: &ResolvedGraph,
    tree: &ClusterTree,
    members: &[Member],
    stmts: &mut Vec<Stmt>,
) {
    for member in members {
        match *member {
            Member::Node(key) => {
                let node = graph
                    .node(&key.to_string())
                    .unwrap_or_else(|| panic!("region layout names undeclared node `{key}`"));
                stmts.push(node_stmt(graph, node));
            }
            Member::Region(handle) => {
                let region = tree.region(handle).unwrap_or_else(|| {
                    panic!("region layout names unknown region #{}", handle.index())
                });

                let mut inner = vec![
                    Stmt::Attribute(attr("label", escaped(region.label()))),
                    Stmt::Attribute(attr("labeljust", plain("l"))),
                    Stmt::Attribute(attr("style", plain("rounded"))),
                ];
                members_into(graph, tree, region.children(), &mut inner);

                stmts.push(Stmt::Subgraph(Subgraph {
                    id: plain(format!("cluster_{}", handle.index())),
                    stmts: inner,
                }));
            }
        }
    }
}

fn node_stmt(graph: &ResolvedGraph, node: &Node) -> Stmt {
    let presentation = node.kind().presentation();
    let mut attributes = vec![
        attr("id", escaped(node.key())),
        attr("label", escaped(node.label())),
        attr("shape", plain(presentation.shape)),
    ];

    if let Some(fill) = presentation.fill {
        attributes.push(attr("style", escaped("filled,rounded")));
        attributes.push(attr("fillcolor", escaped(fill)));
    }

    if let Some(asset) = node.asset() {
        attributes.push(attr("image", escaped(asset.location().display())));
        attributes.push(attr("imagescale", plain("true")));
        attributes.push(attr("labelloc", plain("b")));
    }

    Stmt::Node(DotNode {
        id: node_id(graph, node.key()),
        attributes,
    })
}

fn edge_stmt(graph: &ResolvedGraph, edge: &Edge) -> Stmt {
    let style = edge.style();
    let mut attributes = vec![
        attr("color", color(style.color())),
        attr("style", plain(style.line().to_dot_value())),
    ];
    if let Some(label) = style.label() {
        attributes.push(attr("label", escaped(label)));
        attributes.push(attr("fontcolor", color(style.color())));
    }

    Stmt::Edge(DotEdge {
        ty: EdgeTy::Pair(
            Vertex::N(node_id(graph, edge.source())),
            Vertex::N(node_id(graph, edge.target())),
        ),
        attributes,
    })
}

fn node_id(graph: &ResolvedGraph, key: Id) -> NodeId {
    let index = graph
        .node_index(key)
        .unwrap_or_else(|| panic!("edge or layout names undeclared node `{key}`"));
    NodeId(plain(format!("n{index}")), None)
}

fn attr(key: &str, value: DotId) -> Attribute {
    Attribute(plain(key), value)
}

fn plain(value: impl ToString) -> DotId {
    DotId::Plain(value.to_string())
}

fn color(value: Color) -> DotId {
    escaped(value.to_hex())
}

/// Quotes `value` as a DOT string, escaping quotes, backslashes and newlines.
fn escaped(value: impl ToString) -> DotId {
    let value = value.to_string();
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    DotId::Escaped(quoted)
}

#[cfg(test)]
mod tests {
    use rampart_core::{color::Color, kind::NodeKind, style::EdgeStyle};

    use super::*;
    use crate::{Session, asset::AssetCatalog, options::DiagramOptions};

    fn compiled() -> ResolvedGraph {
        let mut s = Session::begin("EKS \"v2\"", DiagramOptions::default())
            .with_assets(AssetCatalog::new().with("auth0.png", "/icons/auth0.png"));
        s.region("Edge Security", |s| {
            s.declare("waf", "L7 Firewall", NodeKind::SecurityControl, None)?;
            Ok(())
        })
        .unwrap();
        s.declare("auth0", "Auth0\n(OIDC/Auth0)", NodeKind::CustomIcon, Some("auth0.png"))
            .unwrap();
        s.connect(
            "auth0",
            "waf",
            EdgeStyle::dashed(Color::new("purple").unwrap()).with_label("OIDC Auth"),
        )
        .unwrap();
        s.connect("waf", "auth0", EdgeStyle::default()).unwrap();
        s.compile().unwrap()
    }

    #[test]
    fn test_escaped_quotes_and_newlines() {
        assert_eq!(
            escaped("Auth0\n(\"OIDC\")"),
            DotId::Escaped("\"Auth0\\n(\\\"OIDC\\\")\"".to_string())
        );
        assert_eq!(escaped("a\\b"), DotId::Escaped("\"a\\\\b\"".to_string()));
    }

    #[test]
    fn test_graph_is_non_strict_digraph() {
        match to_graph(&compiled()) {
            Graph::DiGraph { strict, id, .. } => {
                assert!(!strict);
                assert_eq!(id, DotId::Escaped("\"EKS \\\"v2\\\"\"".to_string()));
            }
            Graph::Graph { .. } => panic!("expected a digraph"),
        }
    }

    #[test]
    fn test_statement_layout() {
        let Graph::DiGraph { stmts, .. } = to_graph(&compiled()) else {
            panic!("expected a digraph");
        };

        // graph attributes, one cluster, one root node, two edges
        assert_eq!(stmts.len(), 5);
        assert!(matches!(stmts[0], Stmt::GAttribute(GraphAttributes::Graph(_))));
        assert!(matches!(
            &stmts[1],
            Stmt::Subgraph(Subgraph { id: DotId::Plain(id), .. }) if id == "cluster_0"
        ));
        assert!(matches!(stmts[2], Stmt::Node(_)));
        assert!(matches!(stmts[3], Stmt::Edge(_)));
        assert!(matches!(stmts[4], Stmt::Edge(_)));
    }

    #[test]
    fn test_nodes_use_declaration_index() {
        let dot = to_dot(&compiled());

        // waf is declared first, auth0 second
        assert!(dot.contains("n1 -> n0"));
        assert!(dot.contains("n0 -> n1"));
        assert!(dot.contains("id=\"waf\""));
    }

    #[test]
    fn test_keys_differing_in_carriage_return_stay_distinct() {
        let mut s = Session::begin("CR", DiagramOptions::default());
        s.declare("a", "A", NodeKind::Compute, None).unwrap();
        s.declare("a\r", "A again", NodeKind::Compute, None).unwrap();
        s.connect("a", "a\r", EdgeStyle::default()).unwrap();
        let graph = s.compile().unwrap();
        assert_eq!(graph.node_count(), 2);

        let dot = to_dot(&graph);
        assert!(dot.contains("n0 -> n1"));
        assert_eq!(dot.matches("->").count(), 1);
        assert!(dot.contains("id=\"a\r\""));
    }

    #[test]
    fn test_document_contents() {
        let dot = to_dot(&compiled());

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("cluster_0"));
        assert!(dot.contains("\"Edge Security\""));
        assert!(dot.contains("\"OIDC Auth\""));
        assert!(dot.contains("\"Auth0\\n(OIDC/Auth0)\""));
        assert!(dot.contains("/icons/auth0.png"));
        assert!(dot.contains("dashed"));
        assert!(dot.contains("rankdir"));
        assert_eq!(dot.matches("->").count(), 2);
    }
}
