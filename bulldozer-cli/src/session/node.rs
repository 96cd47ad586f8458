//! Data source nodes and the ordered registry the select screen works on

use std::collections::HashSet;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// A selectable data source the user may include in the migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataNode {
    pub id: String,
    pub label: String,
    /// Whether the node is marked for migration
    #[serde(default)]
    pub checked: bool,
}

impl DataNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            checked: false,
        }
    }
}

/// Ordered collection of data nodes, in the order the source enumerated them
///
/// Order drives row order on screen and is never changed by bulk operations.
///
/// Serialized as a plain array of nodes; deserializing goes through `new`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DataNode>", into = "Vec<DataNode>")]
pub struct NodeRegistry {
    nodes: Vec<DataNode>,
}

impl NodeRegistry {
    /// Build a registry, rejecting duplicate node ids
    pub fn new(nodes: Vec<DataNode>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                bail!("duplicate data node id '{}'", node.id);
            }
        }
        Ok(Self { nodes })
    }

    /// Nodes in enumeration order
    pub fn list(&self) -> &[DataNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&DataNode> {
        self.nodes.first()
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&DataNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Row index of a node
    pub fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Set every node's checked flag in one pass
    pub fn set_all_checked(&mut self, value: bool) {
        for node in &mut self.nodes {
            node.checked = value;
        }
    }

    /// Set a single node's checked flag. Returns false if the id is unknown.
    pub fn set_checked(&mut self, id: &str, value: bool) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.checked = value;
                true
            }
            None => false,
        }
    }

    /// Flip a node's checked flag, returning the new value
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let node = self.nodes.iter_mut().find(|n| n.id == id)?;
        node.checked = !node.checked;
        Some(node.checked)
    }

    /// Nodes marked for migration, in order
    pub fn checked_nodes(&self) -> impl Iterator<Item = &DataNode> {
        self.nodes.iter().filter(|n| n.checked)
    }

    pub fn checked_count(&self) -> usize {
        self.checked_nodes().count()
    }
}

impl TryFrom<Vec<DataNode>> for NodeRegistry {
    type Error = anyhow::Error;

    fn try_from(nodes: Vec<DataNode>) -> anyhow::Result<Self> {
        Self::new(nodes)
    }
}

impl From<NodeRegistry> for Vec<DataNode> {
    fn from(registry: NodeRegistry) -> Self {
        registry.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeRegistry {
        NodeRegistry::new(vec![
            DataNode::new("1", "Customers"),
            DataNode::new("2", "Orders"),
            DataNode::new("3", "Invoices"),
        ])
        .unwrap()
    }

    fn ids(registry: &NodeRegistry) -> Vec<&str> {
        registry.list().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = NodeRegistry::new(vec![
            DataNode::new("1", "Customers"),
            DataNode::new("1", "Customers again"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bulk_operations_preserve_order() {
        let mut registry = sample();
        registry.set_all_checked(true);
        registry.toggle("2");
        registry.set_all_checked(false);
        registry.set_all_checked(true);
        assert_eq!(ids(&registry), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_select_then_unselect_all_clears_everything() {
        let mut registry = sample();
        registry.toggle("1");
        registry.toggle("3");
        registry.set_all_checked(true);
        registry.set_all_checked(false);
        assert!(registry.list().iter().all(|n| !n.checked));
        assert_eq!(registry.checked_count(), 0);
    }

    #[test]
    fn test_empty_registry_bulk_is_noop() {
        let mut registry = NodeRegistry::default();
        registry.set_all_checked(true);
        assert!(registry.is_empty());
        assert!(registry.first().is_none());
    }

    #[test]
    fn test_toggle_and_set_checked() {
        let mut registry = sample();
        assert_eq!(registry.toggle("2"), Some(true));
        assert_eq!(registry.toggle("2"), Some(false));
        assert_eq!(registry.toggle("missing"), None);

        assert!(registry.set_checked("3", true));
        assert!(!registry.set_checked("missing", true));
        let checked: Vec<_> = registry.checked_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(checked, vec!["3"]);
        assert_eq!(registry.position("3"), Some(2));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut registry = sample();
        registry.set_checked("1", true);
        let json = serde_json::to_value(&registry).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "1");
        assert_eq!(json[0]["checked"], true);
        assert_eq!(json[1]["checked"], false);
    }

    #[test]
    fn test_deserialize_keeps_order_and_checked_flags() {
        let json = r#"[{"id":"b","label":"B","checked":true},{"id":"a","label":"A"}]"#;
        let registry: NodeRegistry = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = registry.list().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(registry.checked_count(), 1);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"[{"id":"1","label":"Customers"},{"id":"1","label":"Again"}]"#;
        let err = serde_json::from_str::<NodeRegistry>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate data node id '1'"));
    }
}
