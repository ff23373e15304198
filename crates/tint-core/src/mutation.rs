//! Page mutation batches
//!
//! The page adapter flattens each DOM mutation record into plain data: the
//! kind of change, a summary of the target node and summaries of any added
//! nodes. A summary carries the node's own id plus the ids of its ancestors
//! and descendants, which is all the relevance filter needs to decide
//! whether the navigation container was involved.

use crate::config::TintConfig;

/// What the observer is asked to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Report added/removed children
    pub child_list: bool,
    /// Watch the whole subtree, not only the root
    pub subtree: bool,
    /// Report attribute changes
    pub attributes: bool,
    /// Restrict attribute reports to these names
    pub attribute_filter: Vec<String>,
}

impl ObserveOptions {
    /// Options watching the whole body for structure and attribute changes
    #[must_use]
    pub fn from_config(config: &TintConfig) -> Self {
        Self {
            child_list: true,
            subtree: true,
            attributes: true,
            attribute_filter: config.observed_attributes.clone(),
        }
    }
}

/// Kind of mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Children added or removed
    ChildList,
    /// An attribute changed
    Attributes { name: Option<String> },
}

/// Flattened view of a DOM node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSummary {
    /// Whether this is an element node
    pub element: bool,
    /// The node's own id
    pub id: Option<String>,
    /// Ids of ancestor elements
    pub ancestor_ids: Vec<String>,
    /// Ids of descendant elements
    pub descendant_ids: Vec<String>,
}

impl NodeSummary {
    /// Element node without id
    #[inline]
    #[must_use]
    pub fn element() -> Self {
        Self {
            element: true,
            ..Self::default()
        }
    }

    /// Element node with id
    #[inline]
    #[must_use]
    pub fn element_with_id(id: impl Into<String>) -> Self {
        Self {
            element: true,
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Non-element node (text, comment)
    #[inline]
    #[must_use]
    pub fn text() -> Self {
        Self::default()
    }

    /// With ancestor ids
    #[inline]
    #[must_use]
    pub fn with_ancestors<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestor_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With descendant ids
    #[inline]
    #[must_use]
    pub fn with_descendants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descendant_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Element is `id` or sits inside it
    #[must_use]
    pub fn within(&self, id: &str) -> bool {
        self.element && (self.id.as_deref() == Some(id) || self.ancestor_ids.iter().any(|a| a == id))
    }

    /// Element is `id` or contains it
    #[must_use]
    pub fn is_or_contains(&self, id: &str) -> bool {
        self.element
            && (self.id.as_deref() == Some(id) || self.descendant_ids.iter().any(|d| d == id))
    }
}

/// A single observed change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Kind of change
    pub kind: MutationKind,
    /// Node the change happened on
    pub target: NodeSummary,
    /// Nodes added by a child-list change
    pub added_nodes: Vec<NodeSummary>,
}

impl MutationRecord {
    /// Child-list change
    #[inline]
    #[must_use]
    pub fn child_list(target: NodeSummary, added_nodes: Vec<NodeSummary>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes,
        }
    }

    /// Attribute change
    #[inline]
    #[must_use]
    pub fn attribute(target: NodeSummary, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes {
                name: Some(name.into()),
            },
            target,
            added_nodes: Vec::new(),
        }
    }

    /// Check if this record involves the container `id`
    #[must_use]
    pub fn touches_container(&self, id: &str) -> bool {
        if self.target.within(id) {
            return true;
        }
        matches!(self.kind, MutationKind::ChildList)
            && self.added_nodes.iter().any(|node| node.is_or_contains(id))
    }
}

/// Records delivered together by one observer callback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    /// Records in delivery order
    pub records: Vec<MutationRecord>,
}

impl MutationBatch {
    /// Create batch
    #[inline]
    #[must_use]
    pub fn new(records: Vec<MutationRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if any record involves the container `id`
    #[must_use]
    pub fn touches_container(&self, id: &str) -> bool {
        self.records.iter().any(|record| record.touches_container(id))
    }
}

impl From<Vec<MutationRecord>> for MutationBatch {
    fn from(records: Vec<MutationRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: &str = "awsc-nav-header";

    #[test]
    fn target_inside_container_is_relevant() {
        let target = NodeSummary::element().with_ancestors(["root", NAV]);
        let batch = MutationBatch::new(vec![MutationRecord::attribute(target, "class")]);
        assert!(batch.touches_container(NAV));
    }

    #[test]
    fn container_itself_is_relevant() {
        let record = MutationRecord::attribute(NodeSummary::element_with_id(NAV), "style");
        assert!(record.touches_container(NAV));
    }

    #[test]
    fn added_node_containing_container_is_relevant() {
        let added = NodeSummary::element_with_id("shell").with_descendants([NAV, "x"]);
        let record = MutationRecord::child_list(NodeSummary::element_with_id("body"), vec![added]);
        assert!(record.touches_container(NAV));
    }

    #[test]
    fn added_container_is_relevant() {
        let record = MutationRecord::child_list(
            NodeSummary::element(),
            vec![NodeSummary::text(), NodeSummary::element_with_id(NAV)],
        );
        assert!(record.touches_container(NAV));
    }

    #[test]
    fn unrelated_changes_are_ignored() {
        let batch = MutationBatch::new(vec![
            MutationRecord::attribute(NodeSummary::element().with_ancestors(["main"]), "class"),
            MutationRecord::child_list(
                NodeSummary::element_with_id("main"),
                vec![NodeSummary::element().with_descendants(["sidebar"])],
            ),
        ]);
        assert!(!batch.touches_container(NAV));
        assert!(!MutationBatch::default().touches_container(NAV));
    }

    #[test]
    fn text_nodes_never_match() {
        let text = NodeSummary {
            element: false,
            id: None,
            ancestor_ids: vec![NAV.to_string()],
            descendant_ids: vec![],
        };
        assert!(!text.within(NAV));
        assert!(!text.is_or_contains(NAV));
    }

    #[test]
    fn options_follow_config() {
        let options = ObserveOptions::from_config(&TintConfig::default());
        assert!(options.child_list && options.subtree && options.attributes);
        assert_eq!(options.attribute_filter, vec!["style", "class", "id"]);
    }
}
