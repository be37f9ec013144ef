//! lumion-graph: In-memory petgraph view over extracted artifacts.
//!
//! Relationships are soft references, so endpoints without an entity record
//! become placeholder nodes instead of being rejected.

use lumion_core::{Entity, EntityType, LumionError, Relationship};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// A node of the artifact graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    /// `None` for ids only referenced by relationships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl GraphNode {
    fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            entity_type: None,
            file_path: None,
        }
    }

    fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            name: Some(entity.name.clone()),
            entity_type: Some(entity.entity_type),
            file_path: Some(entity.file_path.clone()),
        }
    }

    /// True when no entity record exists for this id.
    pub fn is_placeholder(&self) -> bool {
        self.entity_type.is_none()
    }
}

/// The nodes around a center node and the edges among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub center: String,
    pub depth: usize,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Relationship>,
}

/// The whole graph, or the part of it restricted to some entity types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Relationship>,
}

/// Summary counts over the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Nodes that exist only as relationship endpoints.
    pub dangling: usize,
    pub by_entity_type: BTreeMap<String, usize>,
    pub by_relationship_type: BTreeMap<String, usize>,
}

/// Directed graph over entity ids.
pub struct ArtifactGraph {
    graph: DiGraph<String, usize>,
    id_to_index: HashMap<String, NodeIndex>,
    nodes: HashMap<String, GraphNode>,
    /// Relationships in artifact order; edge weights index into this list.
    edges: Vec<Relationship>,
}

impl ArtifactGraph {
    /// Build a graph from artifact tables. When several entities share an id
    /// (same-named functions in different files), the first one describes the node.
    pub fn from_artifacts(entities: &[Entity], relationships: &[Relationship]) -> Self {
        let mut engine = Self {
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
            nodes: HashMap::new(),
            edges: Vec::with_capacity(relationships.len()),
        };

        for entity in entities {
            if !engine.nodes.contains_key(&entity.id) {
                engine.insert_node(GraphNode::from_entity(entity));
            }
        }

        for rel in relationships {
            let src = engine.ensure_node(&rel.source);
            let dst = engine.ensure_node(&rel.target);
            engine.graph.add_edge(src, dst, engine.edges.len());
            engine.edges.push(rel.clone());
        }

        engine
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Nodes within `depth` hops of `id`, following edges in either
    /// direction, and every edge with both endpoints in that set.
    pub fn neighbors(&self, id: &str, depth: usize) -> Result<Neighborhood, LumionError> {
        let start = *self
            .id_to_index
            .get(id)
            .ok_or_else(|| LumionError::NotFound(format!("Node {id}")))?;

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut order: Vec<NodeIndex> = Vec::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((current, hops)) = queue.pop_front() {
            if hops == depth {
                continue;
            }
            for neighbor in self.graph.neighbors_undirected(current) {
                if visited.insert(neighbor) {
                    order.push(neighbor);
                    queue.push_back((neighbor, hops + 1));
                }
            }
        }

        let nodes = order
            .iter()
            .filter_map(|idx| self.graph.node_weight(*idx))
            .filter_map(|node_id| self.get_node(node_id))
            .cloned()
            .collect();

        let mut edge_indices: Vec<usize> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                (visited.contains(&a) && visited.contains(&b))
                    .then(|| self.graph.edge_weight(e).copied())
                    .flatten()
            })
            .collect();
        edge_indices.sort_unstable();
        let edges = edge_indices
            .into_iter()
            .map(|i| self.edges[i].clone())
            .collect();

        Ok(Neighborhood {
            center: id.to_string(),
            depth,
            nodes,
            edges,
        })
    }

    /// All nodes in insertion order and all edges in artifact order.
    ///
    /// A non-empty `types` keeps only nodes of those entity types (placeholders
    /// are dropped) and the edges between kept nodes.
    pub fn export(&self, types: &[EntityType]) -> GraphExport {
        let keep = |node: &GraphNode| {
            types.is_empty() || node.entity_type.is_some_and(|t| types.contains(&t))
        };
        let nodes: Vec<GraphNode> = self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .filter_map(|id| self.get_node(id))
            .filter(|node| keep(node))
            .cloned()
            .collect();
        let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges = self
            .edges
            .iter()
            .filter(|rel| kept.contains(rel.source.as_str()) && kept.contains(rel.target.as_str()))
            .cloned()
            .collect();
        GraphExport { nodes, edges }
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            ..GraphStats::default()
        };
        for node in self.nodes.values() {
            match node.entity_type {
                Some(t) => *stats.by_entity_type.entry(t.to_string()).or_insert(0) += 1,
                None => stats.dangling += 1,
            }
        }
        for rel in &self.edges {
            *stats
                .by_relationship_type
                .entry(rel.relationship_type.to_string())
                .or_insert(0) += 1;
        }
        stats
    }

    fn insert_node(&mut self, node: GraphNode) -> NodeIndex {
        let idx = self.graph.add_node(node.id.clone());
        self.id_to_index.insert(node.id.clone(), idx);
        self.nodes.insert(node.id.clone(), node);
        idx
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        match self.id_to_index.get(id) {
            Some(&idx) => idx,
            None => self.insert_node(GraphNode::placeholder(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumion_core::RelationshipType;

    fn entity(id: &str, t: EntityType) -> Entity {
        Entity::new(id, id, t, "/p/a.ts")
    }

    fn sample() -> ArtifactGraph {
        let entities = vec![
            entity("file_a_ts", EntityType::File),
            entity("fn_Card", EntityType::Function),
            entity("cmp_Card", EntityType::Component),
        ];
        let relationships = vec![
            Relationship::new("file_a_ts", "fn_Card", RelationshipType::Contains),
            Relationship::new("file_a_ts", "cmp_Card", RelationshipType::Contains),
            Relationship::new("cmp_Card", "cmp_Title", RelationshipType::Renders),
            Relationship::new("fn_Card", "fn_format", RelationshipType::Calls),
        ];
        ArtifactGraph::from_artifacts(&entities, &relationships)
    }

    #[test]
    fn dangling_endpoints_become_placeholders() {
        let graph = sample();
        assert_eq!(graph.node_count(), 5);
        assert!(graph.get_node("cmp_Title").unwrap().is_placeholder());
        assert!(!graph.get_node("cmp_Card").unwrap().is_placeholder());
    }

    #[test]
    fn depth_one_neighbors_follow_both_directions() {
        let graph = sample();
        let hood = graph.neighbors("cmp_Card", 1).unwrap();
        let mut ids: Vec<&str> = hood.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["cmp_Title", "file_a_ts"]);
        assert_eq!(
            hood.edges,
            vec![
                Relationship::new("file_a_ts", "cmp_Card", RelationshipType::Contains),
                Relationship::new("cmp_Card", "cmp_Title", RelationshipType::Renders),
            ]
        );
    }

    #[test]
    fn depth_two_reaches_siblings() {
        let graph = sample();
        let hood = graph.neighbors("cmp_Card", 2).unwrap();
        let ids: HashSet<&str> = hood.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(ids.contains("fn_Card"));
        assert!(!ids.contains("fn_format"));
        assert!(!ids.contains("cmp_Card"), "center is not its own neighbor");
    }

    #[test]
    fn depth_zero_is_empty() {
        let graph = sample();
        let hood = graph.neighbors("fn_Card", 0).unwrap();
        assert!(hood.nodes.is_empty());
        assert!(hood.edges.is_empty());
    }

    #[test]
    fn unknown_node_is_not_found() {
        let graph = sample();
        assert!(matches!(
            graph.neighbors("fn_missing", 1),
            Err(LumionError::NotFound(_))
        ));
    }

    #[test]
    fn colliding_entities_share_one_node() {
        let entities = vec![
            Entity::new("fn_format", "format", EntityType::Function, "/p/one.ts"),
            Entity::new("fn_format", "format", EntityType::Function, "/p/two.ts"),
        ];
        let graph = ArtifactGraph::from_artifacts(&entities, &[]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(
            graph.get_node("fn_format").unwrap().file_path.as_deref(),
            Some("/p/one.ts")
        );
    }

    #[test]
    fn export_keeps_everything_in_order() {
        let export = sample().export(&[]);
        let ids: Vec<&str> = export.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["file_a_ts", "fn_Card", "cmp_Card", "cmp_Title", "fn_format"]
        );
        assert_eq!(export.edges.len(), 4);
        assert_eq!(export.edges[0].target, "fn_Card");
    }

    #[test]
    fn export_filtered_by_type_drops_placeholders() {
        let export = sample().export(&[EntityType::File, EntityType::Component]);
        let ids: Vec<&str> = export.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["file_a_ts", "cmp_Card"]);
        assert_eq!(
            export.edges,
            vec![Relationship::new("file_a_ts", "cmp_Card", RelationshipType::Contains)]
        );
    }

    #[test]
    fn stats_count_types_and_dangling() {
        let stats = sample().stats();
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.dangling, 2);
        assert_eq!(stats.by_entity_type["Function"], 1);
        assert_eq!(stats.by_relationship_type["CONTAINS"], 2);
    }

    #[test]
    fn neighborhood_serializes_placeholders_compactly() {
        let graph = sample();
        let hood = graph.neighbors("cmp_Card", 1).unwrap();
        let json = serde_json::to_value(&hood).unwrap();
        let title = json["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["id"] == "cmp_Title")
            .unwrap();
        assert!(title.get("type").is_none());
    }
}
