//! nested configuration tree
//!
//! [Node] is one unit of the output structure. Maps preserve insertion
//! order, so rendering the same tree twice produces byte-identical text.
//! Lists may contain [Node::Empty] holes for indices that were never
//! written; holes render as empty blocks.
//!
//! A key keeps a single node kind for its lifetime unless a later row
//! addresses it as a different kind. That conflict resolves uniformly as
//! overwrite-and-warn: the most recent row wins and the clobbered value is
//! logged.
use crate::path::Segment;
use crate::value::Scalar;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::Serializer;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// ordered mapping from segment name to child
    Map(IndexMap<String, Node>),
    /// 0-indexed children, may contain `Empty` holes
    List(Vec<Node>),
    Scalar(Scalar),
    /// unwritten list slot; rendered as an empty block
    Empty,
}

impl Default for Node {
    fn default() -> Self {
        Node::Map(IndexMap::new())
    }
}

impl Node {
    /// Apply one `(path, value)` pair, creating structure as needed.
    ///
    /// `self` must be a map node. Descending creates intermediate maps and
    /// lists; lists grow with [Node::Empty] up to the highest index
    /// requested, so indices may arrive in any order. Applying the same path
    /// twice keeps the later value (last-write-wins). An empty path applies
    /// nothing.
    pub fn apply(&mut self, path: &[Segment], value: Scalar) {
        let Some((segment, rest)) = path.split_first() else {
            return;
        };
        let Node::Map(entries) = self else {
            debug_assert!(false, "apply target must be a map node");
            return;
        };

        if rest.is_empty() {
            match segment.index {
                None => {
                    if matches!(
                        entries.get(&segment.name),
                        Some(Node::Map(_) | Node::List(_))
                    ) {
                        tracing::warn!(key = %segment.name, "scalar overwrites a structured value");
                    }
                    // IndexMap keeps the first-seen position for existing keys
                    entries.insert(segment.name.clone(), Node::Scalar(value));
                }
                Some(index) => {
                    let items = Self::list_entry(entries, &segment.name);
                    Self::grow(items, index);
                    items[index] = Node::Scalar(value);
                }
            }
            return;
        }

        let child = match segment.index {
            None => Self::map_entry(entries, &segment.name),
            Some(index) => {
                let items = Self::list_entry(entries, &segment.name);
                Self::grow(items, index);
                let slot = &mut items[index];
                match slot {
                    Node::Map(_) => {}
                    Node::Empty => *slot = Node::default(),
                    _ => {
                        tracing::warn!(
                            key = %segment.name,
                            index,
                            "descending replaces a non-map list slot"
                        );
                        *slot = Node::default();
                    }
                }
                slot
            }
        };

        child.apply(rest, value);
    }

    /// Read the node at `path`, if present.
    pub fn get(&self, path: &[Segment]) -> Option<&Node> {
        let Some((segment, rest)) = path.split_first() else {
            return Some(self);
        };
        let Node::Map(entries) = self else {
            return None;
        };

        let mut node = entries.get(&segment.name)?;
        if let Some(index) = segment.index {
            let Node::List(items) = node else {
                return None;
            };
            node = items.get(index)?;
        }

        node.get(rest)
    }

    /// Ensure a map child at `key` and return it.
    ///
    /// `self` must be a map node. A prior non-map value at `key` is
    /// overwritten with an empty map (and the conflict logged).
    pub fn entry_map(&mut self, key: &str) -> &mut Node {
        if !matches!(self, Node::Map(_)) {
            debug_assert!(false, "entry_map target must be a map node");
            *self = Node::default();
        }
        let Node::Map(entries) = self else {
            unreachable!()
        };
        Self::map_entry(entries, key)
    }

    fn map_entry<'a>(entries: &'a mut IndexMap<String, Node>, key: &str) -> &'a mut Node {
        let node = entries.entry(key.to_string()).or_default();
        if !matches!(node, Node::Map(_)) {
            tracing::warn!(key, "map overwrites a non-map value");
            *node = Node::default();
        }
        node
    }

    fn list_entry<'a>(entries: &'a mut IndexMap<String, Node>, key: &str) -> &'a mut Vec<Node> {
        let node = entries
            .entry(key.to_string())
            .or_insert_with(|| Node::List(Vec::new()));
        if !matches!(node, Node::List(_)) {
            tracing::warn!(key, "list overwrites a non-list value");
            *node = Node::List(Vec::new());
        }
        let Node::List(items) = node else {
            unreachable!()
        };
        items
    }

    /// List growth is monotonic: only ever lengthen, never shrink.
    fn grow(items: &mut Vec<Node>, index: usize) {
        while items.len() <= index {
            items.push(Node::Empty);
        }
    }
}

impl serde::ser::Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Map(entries) => {
                let mut ser = serializer.serialize_map(Some(entries.len()))?;
                for (key, child) in entries {
                    ser.serialize_entry(key, child)?;
                }
                ser.end()
            }
            Node::List(items) => {
                let mut ser = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    ser.serialize_element(item)?;
                }
                ser.end()
            }
            Node::Scalar(value) => value.serialize(serializer),
            // holes serialize like they render: an empty map
            Node::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path;
    use pretty_assertions::assert_eq;

    fn apply(node: &mut Node, path_str: &str, value: impl Into<Scalar>) {
        node.apply(&path::parse(path_str), value.into());
    }

    fn get<'a>(node: &'a Node, path_str: &str) -> Option<&'a Node> {
        node.get(&path::parse(path_str))
    }

    #[test]
    fn round_trip() {
        let mut tree = Node::default();
        apply(&mut tree, "tags.Name", "web");
        apply(&mut tree, "root_block_device[0].volume_size", 20i64);

        assert_eq!(
            get(&tree, "tags.Name"),
            Some(&Node::Scalar(Scalar::String("web".to_string())))
        );
        assert_eq!(
            get(&tree, "root_block_device[0].volume_size"),
            Some(&Node::Scalar(Scalar::Integer(20)))
        );
        assert_eq!(get(&tree, "tags.Missing"), None);
    }

    #[test]
    fn idempotent_reapplication() {
        let mut once = Node::default();
        apply(&mut once, "a.b", 1i64);

        let mut twice = Node::default();
        apply(&mut twice, "a.b", 1i64);
        apply(&mut twice, "a.b", 1i64);

        assert_eq!(once, twice);
    }

    #[test]
    fn last_write_wins() {
        let mut tree = Node::default();
        apply(&mut tree, "a.b", 1i64);
        apply(&mut tree, "a.b", 2i64);

        assert_eq!(get(&tree, "a.b"), Some(&Node::Scalar(Scalar::Integer(2))));
    }

    #[test]
    fn out_of_order_indices_leave_holes() {
        let mut tree = Node::default();
        apply(&mut tree, "list.2", "v2");
        apply(&mut tree, "list.0", "v0");

        let expected = Node::List(vec![
            Node::Scalar(Scalar::String("v0".to_string())),
            Node::Empty,
            Node::Scalar(Scalar::String("v2".to_string())),
        ]);
        assert_eq!(get(&tree, "list"), Some(&expected));
    }

    #[test]
    fn list_growth_is_monotonic() {
        let mut tree = Node::default();
        apply(&mut tree, "list.3", "far");
        apply(&mut tree, "list.1", "near");

        let Some(Node::List(items)) = get(&tree, "list") else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn descending_materializes_holes_as_maps() {
        let mut tree = Node::default();
        apply(&mut tree, "devices.1.size", 20i64);

        let expected = Node::List(vec![Node::Empty, {
            let mut slot = Node::default();
            slot.apply(&path::parse("size"), Scalar::Integer(20));
            slot
        }]);
        assert_eq!(get(&tree, "devices"), Some(&expected));
    }

    #[test]
    fn scalar_overwrites_map_on_conflict() {
        // the documented resolution: overwrite-and-warn, uniformly
        let mut tree = Node::default();
        apply(&mut tree, "a.b", 1i64);
        apply(&mut tree, "a", 2i64);

        assert_eq!(get(&tree, "a"), Some(&Node::Scalar(Scalar::Integer(2))));
    }

    #[test]
    fn list_overwrites_scalar_on_conflict() {
        let mut tree = Node::default();
        apply(&mut tree, "a", 1i64);
        apply(&mut tree, "a.0", 2i64);

        let expected = Node::List(vec![Node::Scalar(Scalar::Integer(2))]);
        assert_eq!(get(&tree, "a"), Some(&expected));
    }

    #[test]
    fn map_overwrites_scalar_on_conflict() {
        let mut tree = Node::default();
        apply(&mut tree, "a", 1i64);
        apply(&mut tree, "a.b", 2i64);

        assert_eq!(get(&tree, "a.b"), Some(&Node::Scalar(Scalar::Integer(2))));
    }

    #[test]
    fn empty_path_applies_nothing() {
        let mut tree = Node::default();
        tree.apply(&[], Scalar::Integer(1));
        assert_eq!(tree, Node::default());
    }
}
