//! Graphviz Dot export.  A tree is rendered by a pre-order walk that
//! emits one record-shaped node statement per visited node, followed by
//! one edge statement per link to a visited child.

use crate::{error::Result, node::Node, node_id::NodeId};
#[cfg(feature = "graphviz")] use crate::error::Error;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::convert::Infallible;
#[cfg(feature = "graphviz")] use std::path::{Path, PathBuf};


/// Graph-level export settings together with the statements of the graph.
/// The settings can be loaded with any serde format; statements are not
/// serialized.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DotGraph {
    /// The background color
    pub bgcolor: Option<String>,
    /// The rank direction
    pub rankdir: Option<DotRankDir>,
    /// Attributes applied to every node of the graph
    pub node_attrs: DotAttrs,
    #[serde(skip)]
    pub stmts: Vec<DotStmt>,
}

impl Default for DotGraph {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl DotGraph {
    pub fn new() -> Self {
        let node_attrs = DotAttrs::from_iter([
            ("color", "lightblue"),
            ("fillcolor", "lightblue"),
            ("fontcolor", "black"),
            ("shape", "record"),
            ("style", "\"filled, rounded\""),
        ]);
        Self {
            bgcolor: None,
            rankdir: Some(DotRankDir::default()),
            node_attrs,
            stmts: vec![],
        }
    }

    pub fn add(&mut self, stmt: impl Into<DotStmt>) {
        self.stmts.push(stmt.into());
    }

    pub fn count_nodes(&self) -> usize {
        self.stmts.iter().filter(|stmt| matches!(stmt, DotStmt::Node(_))).count()
    }

    pub fn count_edges(&self) -> usize {
        self.stmts.iter().filter(|stmt| matches!(stmt, DotStmt::Edge(_))).count()
    }

    /// Check `self` with the Graphviz parser.
    #[cfg(feature = "graphviz")]
    pub fn parse(&self) -> Result<dot_structures::Graph> {
        graphviz_rust::parse(&self.to_string()).map_err(Error::GraphvizParse)
    }

    /// Render `self` to `{dirpath}/{stem}.svg` using the `dot` executable.
    #[cfg(feature = "graphviz")]
    pub fn write_to_svg(&self, dirpath: &Path, stem: &str) -> Result<PathBuf> {
        use graphviz_rust::{cmd::Format, exec, printer::PrinterContext};
        let graph = self.parse()?;
        let mut pctx = PrinterContext::default();
        let svg = exec(graph, &mut pctx, vec![Format::Svg.into()])?;
        let svg_filepath = dirpath.join(format!("{stem}.svg"));
        std::fs::write(&svg_filepath, svg)?;
        tracing::debug!(path = %svg_filepath.display(), "wrote svg");
        Ok(svg_filepath)
    }
}

impl std::fmt::Display for DotGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "digraph {{")?;
        if let Some(bg) = &self.bgcolor {
            writeln!(f, "  bgcolor=\"{bg}\";")?;
        }
        if let Some(rankdir) = &self.rankdir {
            writeln!(f, "  rankdir={rankdir};")?;
        }
        if !self.node_attrs.is_empty() {
            writeln!(f, "  node [{}];", self.node_attrs)?;
        }
        for stmt in &self.stmts {
            writeln!(f, "  {stmt}")?;
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}


#[rustfmt::skip]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    derive_more::From
)]
pub enum DotStmt {
    Node(DotNode),
    Edge(DotEdge),
}

impl std::fmt::Display for DotStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(node) => write!(f, "{node};"),
            Self::Edge(edge) => write!(f, "{edge};"),
        }
    }
}

/// A record-shaped node with a left port `l`, a value port `v`
/// and a right port `r`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotNode {
    pub id: NodeId,
    pub label: String,
    pub attrs: DotAttrs,
}

impl std::fmt::Display for DotNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = escape_record_label(&self.label);
        write!(f, "{} [label=\"<l>|<v> {label}|<r>\"", self.id)?;
        if !self.attrs.is_empty() {
            write!(f, " {}", self.attrs)?;
        }
        write!(f, "]")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, displaydoc::Display)]
/// {src}:{port} -> {dst}:v
pub struct DotEdge {
    pub src: NodeId,
    pub port: DotPort,
    pub dst: NodeId,
}

#[rustfmt::skip]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    displaydoc::Display,
)]
pub enum DotPort {
    /// l
    Left,
    /// r
    Right,
}

#[rustfmt::skip]
#[derive(
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    displaydoc::Display,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum DotRankDir {
    #[default]
    /// TB
    TopToBottom,
    /// BT
    BottomToTop,
    /// LR
    LeftToRight,
    /// RL
    RightToLeft,
}

/// An open set of Dot attributes.  Values are emitted verbatim, so a
/// value containing spaces or commas must carry its own quotes.
#[rustfmt::skip]
#[derive(
    Default,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    derive_more::Deref,
    derive_more::DerefMut,
)]
#[serde(transparent)]
pub struct DotAttrs(BTreeMap<String, String>);

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DotAttrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl std::fmt::Display for DotAttrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let attrs = self.0.iter().map(|(name, value)| format!("{name}={value}"));
        write!(f, "{}", attrs.format(" "))
    }
}

fn escape_record_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\' | '|' | '{' | '}' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}


impl<T: std::fmt::Display> Node<T> {
    /// Build the Dot representation of the tree below `self`, using the
    /// default graph settings.
    pub fn to_dot_graph(&self) -> DotGraph {
        self.to_dot_graph_with(DotGraph::default())
    }

    /// Build the Dot representation of the tree below `self` into `graph`,
    /// keeping its settings.  Nodes pruned by the skip predicates of `self`
    /// are left out together with the edges leading to them.
    pub fn to_dot_graph_with(&self, mut graph: DotGraph) -> DotGraph {
        let Ok(()) = self.walk_pre_order(|node| {
            graph.add(DotNode {
                id: node.id(),
                label: node.value.to_string(),
                attrs: node.attributes().clone(),
            });
            let children = [(DotPort::Left, node.left()), (DotPort::Right, node.right())];
            for (port, child) in children {
                let Some(child) = child else { continue };
                if self.should_skip(child) {
                    continue;
                }
                graph.add(DotEdge { src: node.id(), port, dst: child.id() });
            }
            Ok::<(), Infallible>(())
        });
        tracing::debug!(
            root = %self.id(),
            nodes = graph.count_nodes(),
            edges = graph.count_edges(),
            "built dot graph"
        );
        graph
    }

    /// Write the Dot representation of the tree below `self` to `w`.
    pub fn write_dot(&self, w: &mut impl std::io::Write) -> Result<()> {
        write!(w, "{}", self.to_dot_graph())?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bintree;

    //   1__
    //  /   \
    // 2     3
    //      / \
    //     4   5
    fn make_tree() -> Node<i32> {
        bintree!(1, (2), (3, (4), (5)))
    }

    #[test]
    fn write_dot() -> Result<()> {
        let root = make_tree();
        let mut buf: Vec<u8> = vec![];
        root.write_dot(&mut buf)?;
        let output = String::from_utf8_lossy(&buf);
        assert!(output.starts_with("digraph {\n"));
        assert!(output.ends_with("}\n"));
        assert_eq!(output.matches('{').count(), output.matches('}').count());

        let node_lines = output.lines().filter(|l| l.contains("[label=")).count();
        let edge_lines = output.lines().filter(|l| l.contains("->")).count();
        assert_eq!(node_lines, root.size());
        assert_eq!(edge_lines, root.size() - 1);
        Ok(())
    }

    #[test]
    fn statements_follow_pre_order() {
        let root = make_tree();
        let graph = root.to_dot_graph();
        let ids: Vec<NodeId> = root.pre_order().map(Node::id).collect();
        let node_ids: Vec<NodeId> = graph.stmts.iter()
            .filter_map(|stmt| match stmt {
                DotStmt::Node(node) => Some(node.id),
                DotStmt::Edge(_) => None,
            })
            .collect();
        assert_eq!(node_ids, ids);
        assert!(node_ids.iter().all_unique());
    }

    #[test]
    fn node_and_edge_lines() {
        let mut root = bintree!(1, (2), _);
        root.add_attribute("color", "green");
        let (root_id, child_id) = (root.id(), root.left().map(Node::id));
        let graph = root.to_dot_graph();
        assert_eq!(
            graph.stmts[0].to_string(),
            format!("{root_id} [label=\"<l>|<v> 1|<r>\" color=green];")
        );
        assert_eq!(
            graph.stmts[1].to_string(),
            format!("{root_id}:l -> {}:v;", child_id.map(|id| id.to_string()).unwrap_or_default())
        );
        assert_eq!(graph.count_nodes(), 2);
        assert_eq!(graph.count_edges(), 1);
    }

    #[test]
    fn skipped_nodes_and_their_edges_are_left_out() {
        let mut root = make_tree();
        root.add_skip_node_fn(|node| node.value == 3);
        let graph = root.to_dot_graph();
        assert_eq!(graph.count_nodes(), 2);
        assert_eq!(graph.count_edges(), 1);
    }

    #[test]
    fn record_labels_are_escaped() {
        let root = Node::new("a|b <c>");
        let graph = root.to_dot_graph();
        assert_eq!(
            graph.stmts[0].to_string(),
            format!("{} [label=\"<l>|<v> a\\|b \\<c\\>|<r>\"];", root.id())
        );
    }

    #[test]
    fn default_settings() {
        let graph = DotGraph::default();
        let output = graph.to_string();
        assert_eq!(
            output,
            "digraph {\n  rankdir=TB;\n  node [color=lightblue fillcolor=lightblue \
             fontcolor=black shape=record style=\"filled, rounded\"];\n}\n"
        );
    }

    #[test]
    fn settings_from_json() -> std::result::Result<(), serde_json::Error> {
        let json = r#"{ "bgcolor": "white", "rankdir": "LeftToRight", "node_attrs": { "shape": "record" } }"#;
        let settings: DotGraph = serde_json::from_str(json)?;
        assert_eq!(settings.bgcolor.as_deref(), Some("white"));
        assert_eq!(settings.rankdir, Some(DotRankDir::LeftToRight));
        assert_eq!(settings.node_attrs.to_string(), "shape=record");

        let graph = Node::new(1).to_dot_graph_with(settings);
        let output = graph.to_string();
        assert!(output.contains("  bgcolor=\"white\";\n"));
        assert!(output.contains("  rankdir=LR;\n"));

        let partial: DotGraph = serde_json::from_str("{}")?;
        assert_eq!(partial, DotGraph::default());
        Ok(())
    }

    #[cfg(feature = "graphviz")]
    #[test]
    fn graphviz_accepts_output() -> Result<()> {
        let mut root = bintree!("root", ("left", ("a|b"), _), ("right"));
        root.add_attribute("color", "green");
        root.to_dot_graph().parse()?;
        Ok(())
    }
}
