//! Arena-based document tree for rendered schema documentation.
//!
//! This module provides the mutable tree that the reference resolver operates
//! on. The arena layout enables fast traversal and id lookup: all nodes live in
//! a contiguous vector, parent/child/sibling relationships are indices, and
//! element ids are pre-extracted into a map at creation time.
//!
//! Nodes are never deallocated. `detach` only unlinks a subtree from its
//! parent; the arena slot stays valid so a detached definition can be inserted
//! somewhere else later. The id map keeps pointing at the original node for an
//! id across relocations, which is exactly what the resolver relies on.

use std::collections::HashMap;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the document tree.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with tag name and attributes.
    Element {
        tag: String,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast lookup.
        id: Option<String>,
        /// Pre-extracted classes for fast role matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (rendered XML source includes comment display blocks).
    Comment(String),
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node in the document tree.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based document tree.
///
/// All nodes are stored in a contiguous vector, with indices for every
/// relationship. The id map is populated when elements are created and is
/// deliberately *not* updated on `detach`: after a definition has been
/// relocated, lookups by id still find the original node.
pub struct DocTree {
    /// All nodes in the arena.
    nodes: Vec<Node>,
    /// Document root ID.
    document: NodeId,
    /// Map from id attribute to node ID for fast lookup.
    id_map: HashMap<String, NodeId>,
}

impl DocTree {
    /// Create a new empty tree with a document root.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            id_map: HashMap::new(),
        };
        tree.document = tree.alloc(Node::new(NodeData::Document));
        tree
    }

    /// Allocate a new node in the arena.
    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    ///
    /// The element is allocated detached; use [`append`](Self::append) or one
    /// of the insert methods to place it. If the attributes carry an `id`, the
    /// element is registered in the id map.
    pub fn create_element(&mut self, tag: impl Into<String>, attrs: Vec<Attribute>) -> NodeId {
        // Pre-extract id and class for fast matching
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name == "id" {
                id = Some(attr.value.clone());
            } else if attr.name == "class" {
                classes = attr
                    .value
                    .split_whitespace()
                    .map(|s| s.to_string())
                    .collect();
            }
        }

        let node_id = self.alloc(Node::new(NodeData::Element {
            tag: tag.into(),
            attrs,
            id: id.clone(),
            classes,
        }));

        // Register in id map
        if let Some(id_str) = id {
            self.id_map.insert(id_str, node_id);
        }

        node_id
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.into())))
    }

    /// Append a child as the last child of a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if last_child.is_some() {
            if let Some(last_node) = self.get_mut(last_child) {
                last_node.next_sibling = child;
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a node immediately after a sibling.
    ///
    /// This is the splice primitive of the resolver: a materialized definition
    /// lands directly after the reference node that pulled it in.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let next = self
            .get(sibling)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = sibling;
            new.next_sibling = next;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.next_sibling = new_node;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.last_child = new_node;
        }
    }

    /// Unlink a node (and its subtree) from its parent.
    ///
    /// The arena slot stays valid and the node keeps its children; only the
    /// links to parent and siblings are severed. The id map is left alone, so
    /// the node remains addressable by id after relocation.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Deep-copy a subtree, returning the detached root of the copy.
    ///
    /// Cloned elements are stripped of their `id` attribute and are never
    /// registered in the id map: a clone cannot be found by id lookup and so
    /// cannot be referenced again.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = match self.get(id) {
            Some(n) => match &n.data {
                NodeData::Element {
                    tag,
                    attrs,
                    classes,
                    ..
                } => NodeData::Element {
                    tag: tag.clone(),
                    attrs: attrs.iter().filter(|a| a.name != "id").cloned().collect(),
                    id: None,
                    classes: classes.clone(),
                },
                other => other.clone(),
            },
            None => return NodeId::NONE,
        };

        let copy = self.alloc(Node::new(data));

        let mut child = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        while child.is_some() {
            let child_copy = self.clone_subtree(child);
            self.append(copy, child_copy);
            child = self
                .get(child)
                .map(|n| n.next_sibling)
                .unwrap_or(NodeId::NONE);
        }

        copy
    }

    /// Append text to an existing trailing text child, or create a new text
    /// node if the last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child) {
            if let NodeData::Text(existing) = &mut last.data {
                existing.push_str(text);
                return;
            }
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Check if `descendant` sits anywhere inside `ancestor`'s subtree.
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.get(descendant).map(|n| n.parent).unwrap_or(NodeId::NONE);
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Get node by id attribute.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (only has the document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildrenIter {
            tree: self,
            current: first,
        }
    }

    /// Collect the descendants of `start` (excluding `start` itself) that
    /// match a predicate, in document order.
    pub fn find_all_within<F>(&self, start: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(start).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    found.push(id);
                }
                // Push children in reverse order for left-to-right traversal
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        found
    }

    /// Collect all descendants of `start` carrying a class, in document order.
    ///
    /// This is the "all nodes of display role X" selector the resolver and the
    /// visibility toggles are built on.
    pub fn find_all_by_class_within(&self, start: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all_within(start, |node| match &node.data {
            NodeData::Element { classes, .. } => classes.iter().any(|c| c == class),
            _ => false,
        })
    }

    /// Collect all nodes in the document carrying a class, in document order.
    pub fn find_all_by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all_by_class_within(self.document, class)
    }
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    tree: &'a DocTree,
    current: NodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .tree
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element nodes.
impl DocTree {
    /// Get element's tag name.
    pub fn element_tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Set an attribute value, adding the attribute if absent.
    ///
    /// Setting `id` or `class` keeps the pre-extracted caches (and the id map
    /// for `id`) coherent.
    pub fn set_attr(&mut self, node_id: NodeId, attr_name: &str, value: &str) {
        let mut old_id = None;
        let mut id_changed = false;
        if let Some(node) = self.get_mut(node_id) {
            if let NodeData::Element {
                attrs, id, classes, ..
            } = &mut node.data
            {
                match attrs.iter_mut().find(|a| a.name == attr_name) {
                    Some(attr) => attr.value = value.to_string(),
                    None => attrs.push(Attribute::new(attr_name, value)),
                }
                if attr_name == "id" {
                    old_id = id.take();
                    *id = Some(value.to_string());
                    id_changed = true;
                } else if attr_name == "class" {
                    *classes = value.split_whitespace().map(|s| s.to_string()).collect();
                }
            }
        }
        if id_changed {
            if let Some(old) = old_id {
                if self.id_map.get(&old) == Some(&node_id) {
                    self.id_map.remove(&old);
                }
            }
            self.id_map.insert(value.to_string(), node_id);
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, node_id: NodeId, attr_name: &str) {
        let mut old_id = None;
        if let Some(node) = self.get_mut(node_id) {
            if let NodeData::Element {
                attrs, id, classes, ..
            } = &mut node.data
            {
                attrs.retain(|a| a.name != attr_name);
                if attr_name == "id" {
                    old_id = id.take();
                } else if attr_name == "class" {
                    classes.clear();
                }
            }
        }
        if let Some(old) = old_id {
            if self.id_map.get(&old) == Some(&node_id) {
                self.id_map.remove(&old);
            }
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if an element carries a class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Add a class to an element, keeping the `class` attribute in sync.
    pub fn add_class(&mut self, node_id: NodeId, class: &str) {
        if self.has_class(node_id, class) {
            return;
        }
        let mut classes: Vec<String> = self.element_classes(node_id).to_vec();
        classes.push(class.to_string());
        self.set_attr(node_id, "class", &classes.join(" "));
    }

    /// Remove a class from an element, keeping the `class` attribute in sync.
    pub fn remove_class(&mut self, node_id: NodeId, class: &str) {
        if !self.has_class(node_id, class) {
            return;
        }
        let classes: Vec<String> = self
            .element_classes(node_id)
            .iter()
            .filter(|c| c.as_str() != class)
            .cloned()
            .collect();
        self.set_attr(node_id, "class", &classes.join(" "));
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Replace the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeData::Text(s) = &mut node.data {
                *s = text.to_string();
            }
        }
    }

    /// Replace an element's children with a single text node.
    pub fn set_element_text(&mut self, id: NodeId, text: &str) {
        let mut child = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        while child.is_some() {
            let next = self
                .get(child)
                .map(|n| n.next_sibling)
                .unwrap_or(NodeId::NONE);
            self.detach(child);
            child = next;
        }
        let text_node = self.create_text(text);
        self.append(id, text_node);
    }

    /// Concatenate all text content in a subtree, in document order.
    pub fn collect_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(s) = self.text_content(id) {
            out.push_str(s);
        }
        for descendant in self.find_all_within(id, |n| matches!(n.data, NodeData::Text(_))) {
            if let Some(s) = self.text_content(descendant) {
                out.push_str(s);
            }
        }
        out
    }
}
