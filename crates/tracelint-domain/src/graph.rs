//! Relationship graph derived from a snapshot of artifacts and trace links
//!
//! The graph is an arena: nodes live in a `Vec` and refer to each other by
//! index. It is built once per snapshot and never mutated afterwards, so
//! [`ArtifactNode`] handles are plain borrows of the graph.

use crate::artifact::{types_match, Artifact, ArtifactId, Snapshot, TraceLink};
use crate::error::{DanglingReferenceError, MissingEndpoint};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct NodeData {
    id: ArtifactId,
    artifact_type: String,
    /// Artifacts tracing to this one
    children: Vec<usize>,
    /// Artifacts this one traces to
    parents: Vec<usize>,
}

/// Directed graph of artifacts, keyed by artifact id
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    nodes: Vec<NodeData>,
    index: HashMap<ArtifactId, usize>,
    edge_count: usize,
}

/// Result of building a graph: the graph plus every link that was skipped
#[derive(Debug, Clone)]
pub struct GraphBuild {
    /// The graph built from all resolvable visible links
    pub graph: RelationshipGraph,

    /// Visible links whose endpoints were missing from the artifact set
    pub skipped: Vec<DanglingReferenceError>,
}

impl RelationshipGraph {
    /// Build a graph from artifacts and trace links
    ///
    /// Invisible links are ignored. A visible link naming an unknown artifact
    /// is recorded in [`GraphBuild::skipped`] and left out; the build itself
    /// never fails. Repeating the same visible link adds a single edge, and an
    /// artifact id listed twice keeps its first type.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelint_domain::{Artifact, ArtifactId, RelationshipGraph, TraceLink};
    ///
    /// let req = ArtifactId::new();
    /// let design = ArtifactId::new();
    /// let artifacts = vec![
    ///     Artifact::new(req, "Requirement"),
    ///     Artifact::new(design, "Design"),
    /// ];
    /// let links = vec![TraceLink::new(design, req)];
    ///
    /// let build = RelationshipGraph::build(&artifacts, &links);
    /// let node = build.graph.node(req).unwrap();
    /// assert_eq!(node.children_of_type("design").len(), 1);
    /// assert!(build.skipped.is_empty());
    /// ```
    pub fn build(artifacts: &[Artifact], trace_links: &[TraceLink]) -> GraphBuild {
        let mut graph = RelationshipGraph {
            nodes: Vec::with_capacity(artifacts.len()),
            index: HashMap::with_capacity(artifacts.len()),
            edge_count: 0,
        };

        for artifact in artifacts {
            if graph.index.contains_key(&artifact.id) {
                warn!("Duplicate artifact {} in snapshot, keeping first entry", artifact.id);
                continue;
            }
            graph.index.insert(artifact.id, graph.nodes.len());
            graph.nodes.push(NodeData {
                id: artifact.id,
                artifact_type: artifact.artifact_type.clone(),
                children: Vec::new(),
                parents: Vec::new(),
            });
        }

        let mut skipped = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for link in trace_links.iter().filter(|l| l.visible) {
            let source = graph.index.get(&link.source_id).copied();
            let target = graph.index.get(&link.target_id).copied();

            let (source, target) = match (source, target) {
                (Some(s), Some(t)) => (s, t),
                (s, t) => {
                    let missing = match (s, t) {
                        (None, None) => MissingEndpoint::Both,
                        (None, _) => MissingEndpoint::Source,
                        _ => MissingEndpoint::Target,
                    };
                    let err = DanglingReferenceError {
                        source_id: link.source_id,
                        target_id: link.target_id,
                        missing,
                    };
                    warn!("{}", err);
                    skipped.push(err);
                    continue;
                }
            };

            if !seen.insert((source, target)) {
                continue;
            }
            graph.nodes[target].children.push(source);
            graph.nodes[source].parents.push(target);
            graph.edge_count += 1;
        }

        debug!(
            "Built relationship graph: {} nodes, {} edges, {} skipped links",
            graph.nodes.len(),
            graph.edge_count,
            skipped.len()
        );

        GraphBuild { graph, skipped }
    }

    /// Build a graph from a snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> GraphBuild {
        Self::build(&snapshot.artifacts, &snapshot.trace_links)
    }

    /// Look up a node by artifact id
    pub fn node(&self, id: ArtifactId) -> Option<ArtifactNode<'_>> {
        self.index.get(&id).map(|&index| ArtifactNode { graph: self, index })
    }

    /// All nodes, in the order their artifacts were supplied
    pub fn nodes(&self) -> impl Iterator<Item = ArtifactNode<'_>> + '_ {
        (0..self.nodes.len()).map(move |index| ArtifactNode { graph: self, index })
    }

    /// All nodes of the given type (case-insensitive), in input order
    pub fn nodes_of_type<'g>(
        &'g self,
        artifact_type: &'g str,
    ) -> impl Iterator<Item = ArtifactNode<'g>> + 'g {
        self.nodes().filter(move |n| n.is_type(artifact_type))
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn handle(&self, index: usize) -> ArtifactNode<'_> {
        ArtifactNode { graph: self, index }
    }
}

/// A borrowed view of one node in a [`RelationshipGraph`]
#[derive(Clone, Copy)]
pub struct ArtifactNode<'g> {
    graph: &'g RelationshipGraph,
    index: usize,
}

impl fmt::Debug for ArtifactNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactNode")
            .field("id", &self.id())
            .field("type", &self.artifact_type())
            .finish()
    }
}

impl PartialEq for ArtifactNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.index == other.index
    }
}

impl Eq for ArtifactNode<'_> {}

impl<'g> ArtifactNode<'g> {
    fn data(&self) -> &'g NodeData {
        &self.graph.nodes[self.index]
    }

    /// Artifact id
    pub fn id(&self) -> ArtifactId {
        self.data().id
    }

    /// Artifact type name as supplied
    pub fn artifact_type(&self) -> &'g str {
        &self.data().artifact_type
    }

    /// Whether this node's type matches `artifact_type` (case-insensitive)
    pub fn is_type(&self, artifact_type: &str) -> bool {
        types_match(&self.data().artifact_type, artifact_type)
    }

    /// Artifacts tracing to this node
    pub fn children(&self) -> Vec<ArtifactNode<'g>> {
        let graph = self.graph;
        self.data().children.iter().map(|&i| graph.handle(i)).collect()
    }

    /// Artifacts this node traces to
    pub fn parents(&self) -> Vec<ArtifactNode<'g>> {
        let graph = self.graph;
        self.data().parents.iter().map(|&i| graph.handle(i)).collect()
    }

    /// Children of all parents, excluding this node, without duplicates
    pub fn siblings(&self) -> Vec<ArtifactNode<'g>> {
        let mut seen = HashSet::new();
        let mut siblings = Vec::new();
        for &parent in &self.data().parents {
            for &child in &self.graph.nodes[parent].children {
                if child != self.index && seen.insert(child) {
                    siblings.push(self.graph.handle(child));
                }
            }
        }
        siblings
    }

    /// Parents followed by children, without duplicates
    pub fn neighbors(&self) -> Vec<ArtifactNode<'g>> {
        let data = self.data();
        let mut seen = HashSet::new();
        data.parents
            .iter()
            .chain(data.children.iter())
            .filter(|&&i| seen.insert(i))
            .map(|&i| self.graph.handle(i))
            .collect()
    }

    /// Children whose type matches `artifact_type`
    pub fn children_of_type(&self, artifact_type: &str) -> Vec<ArtifactNode<'g>> {
        self.children()
            .into_iter()
            .filter(|n| n.is_type(artifact_type))
            .collect()
    }

    /// Siblings whose type matches `artifact_type`
    pub fn siblings_of_type(&self, artifact_type: &str) -> Vec<ArtifactNode<'g>> {
        self.siblings()
            .into_iter()
            .filter(|n| n.is_type(artifact_type))
            .collect()
    }

    /// Ids of parents, children and siblings whose type is in `types`
    ///
    /// Type names are compared case-insensitively; each id appears once.
    pub fn neighborhood_of_type(&self, types: &HashSet<String>) -> Vec<ArtifactId> {
        let wanted: HashSet<String> = types.iter().map(|t| t.to_lowercase()).collect();
        let mut seen = HashSet::new();

        self.neighbors()
            .into_iter()
            .chain(self.siblings())
            .filter(|n| wanted.contains(&n.artifact_type().to_lowercase()))
            .filter(|n| seen.insert(n.index))
            .map(|n| n.id())
            .collect()
    }
}
