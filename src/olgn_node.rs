// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Layout Tree
///
/// Arena-backed tree of layout nodes. Children are owned through the arena in
/// order; the parent link is a plain index used only for walking scopes toward
/// the root (template lookup, keysym rule merging, geometry filename lookup).
///
/// Template containers live in the tree only while a document is being
/// resolved and are purged before the tree is handed out.

use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeMap, HashMap};

use crate::olgt_types::{
    Attributes, KeyAction, KeyCode, KeyType, Labels, Modifier, Rect, StickyBehavior,
};

// ============================================================================
// SECTION 1: Node types
// ============================================================================

/// Index of a node inside its `LayoutTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Keysym code → override attributes (usually just "label")
pub type KeysymRules = BTreeMap<u32, Attributes>;

/// Element kinds a template can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    Key,
}

/// (template id, kind) → raw attributes
pub type TemplateMap = HashMap<(String, TemplateKind), Attributes>;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub horizontal: bool,
    pub spacing: f64,
}

impl Default for BoxLayout {
    fn default() -> Self {
        BoxLayout { horizontal: true, spacing: 1.0 }
    }
}

/// Fully resolved key properties
#[derive(Debug, Clone, PartialEq)]
pub struct KeyProps {
    /// Full id including the theme suffix, e.g. "DELE.numpad"
    pub theme_id: String,
    pub key_type: KeyType,
    pub code: KeyCode,
    pub action: Option<KeyAction>,
    pub modifier: Option<Modifier>,
    pub sticky: bool,
    pub sticky_behavior: Option<StickyBehavior>,
    pub scannable: bool,
    pub scan_priority: Option<i32>,
    pub label_x_align: Option<f64>,
    pub label_y_align: Option<f64>,
    pub tooltip: Option<String>,
    pub image_filename: Option<String>,
    pub labels: Labels,
    pub border_rect: Rect,
    pub color_scheme: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Panel,
    Box(BoxLayout),
    Key(Box<KeyProps>),
    Templates(TemplateMap),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Panel => "panel",
            NodeKind::Box(_) => "box",
            NodeKind::Key(_) => "key",
            NodeKind::Templates(_) => "templates",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: Option<String>,
    pub group: Option<String>,
    pub layer_id: Option<String>,
    pub filename: Option<String>,
    pub visible: bool,
    pub border: f64,
    pub expand: bool,
    /// None: no rules declared here. Some(empty) is a distinct, declared state.
    pub keysym_rules: Option<KeysymRules>,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl LayoutNode {
    pub fn new(kind: NodeKind) -> Self {
        LayoutNode {
            id: None,
            group: None,
            layer_id: None,
            filename: None,
            visible: true,
            border: 0.0,
            expand: true,
            keysym_rules: None,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn panel() -> Self {
        Self::new(NodeKind::Panel)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Template containers never render
    pub fn is_visible(&self) -> bool {
        match self.kind {
            NodeKind::Templates(_) => false,
            _ => self.visible,
        }
    }

    pub fn key(&self) -> Option<&KeyProps> {
        match &self.kind {
            NodeKind::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn key_mut(&mut self) -> Option<&mut KeyProps> {
        match &mut self.kind {
            NodeKind::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn templates(&self) -> Option<&TemplateMap> {
        match &self.kind {
            NodeKind::Templates(map) => Some(map),
            _ => None,
        }
    }

    /// Merge rules into this node's own set; same keysym is replaced
    pub fn update_keysym_rules(&mut self, rules: KeysymRules) {
        self.keysym_rules.get_or_insert_with(KeysymRules::new).extend(rules);
    }
}

// ============================================================================
// SECTION 2: Arena tree
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    root: NodeId,
}

impl LayoutTree {
    pub fn new(root: LayoutNode) -> Self {
        LayoutTree { nodes: vec![root], root: NodeId(0) }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &LayoutNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Add `node` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, mut node: LayoutNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// `id` followed by each of its ancestors up to the root
    pub fn iter_to_root(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// Pre-order over everything reachable from the root
    pub fn iter_depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    pub fn iter_keys(&self) -> impl Iterator<Item = (NodeId, &KeyProps)> + '_ {
        self.iter_depth_first()
            .into_iter()
            .filter_map(move |id| self.node(id).key().map(|k| (id, k)))
    }

    pub fn len(&self) -> usize {
        self.iter_depth_first().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Geometry filename of the closest node on the way to the root that names one
    pub fn find_filename(&self, id: NodeId) -> Option<&str> {
        self.iter_to_root(id).find_map(|n| self.node(n).filename.as_deref())
    }

    /// Move every child of `other`'s root, with its subtree, below `parent`.
    /// `other`'s root itself is discarded.
    pub fn graft_children(&mut self, parent: NodeId, other: LayoutTree) {
        let mut slots: Vec<Option<LayoutNode>> = other.nodes.into_iter().map(Some).collect();
        let top: Vec<NodeId> = slots[other.root.0]
            .as_ref()
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in top {
            self.graft_subtree(parent, child, &mut slots);
        }
    }

    fn graft_subtree(&mut self, parent: NodeId, id: NodeId, slots: &mut [Option<LayoutNode>]) {
        if let Some(node) = slots[id.0].take() {
            let grandchildren = node.children.clone();
            let new_id = self.append(parent, node);
            for child in grandchildren {
                self.graft_subtree(new_id, child, slots);
            }
        }
    }

    /// Unlink all template containers and compact the arena
    pub fn purge_templates(&mut self) {
        let templates: Vec<NodeId> = self
            .iter_depth_first()
            .into_iter()
            .filter(|&id| self.node(id).templates().is_some())
            .collect();

        for id in templates {
            if let Some(parent) = self.nodes[id.0].parent.take() {
                self.nodes[parent.0].children.retain(|&c| c != id);
            }
        }

        self.compact();
    }

    /// Drop nodes no longer reachable from the root, preserving order
    fn compact(&mut self) {
        let order = self.iter_depth_first();
        let mut remap = vec![None; self.nodes.len()];
        for (new_index, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new_index));
        }

        let mut old_nodes: Vec<Option<LayoutNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        for old in &order {
            if let Some(mut node) = old_nodes[old.0].take() {
                node.parent = node.parent.and_then(|p| remap[p.0]);
                node.children = node.children.iter().filter_map(|c| remap[c.0]).collect();
                self.nodes.push(node);
            }
        }
        self.root = NodeId(0);
    }

    /// Deterministic text rendering, one node per line
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.kind.name());
        if let Some(ref node_id) = node.id {
            out.push_str(&format!(" id={}", node_id));
        }
        if let Some(ref layer) = node.layer_id {
            out.push_str(&format!(" layer={:?}", layer));
        }
        if let Some(ref filename) = node.filename {
            out.push_str(&format!(" filename={}", filename));
        }
        if !node.visible {
            out.push_str(" hidden");
        }
        if let NodeKind::Box(ref b) = node.kind {
            let orientation = if b.horizontal { "horizontal" } else { "vertical" };
            out.push_str(&format!(" {} spacing={}", orientation, b.spacing));
        }
        if let Some(key) = node.key() {
            out.push_str(&format!(" {}={} rect={}", key.key_type.as_str(), key.code, key.border_rect));
            if let Some(ref group) = node.group {
                out.push_str(&format!(" group={}", group));
            }
            for (mask, label) in &key.labels {
                out.push_str(&format!(" [{}]={:?}", mask, label.as_deref().unwrap_or("")));
            }
        }
        out.push('\n');
        for &child in self.children(id) {
            self.dump_node(child, depth + 1, out);
        }
    }
}

// ============================================================================
// SECTION 3: Immutable root with query caching
// ============================================================================

/// Finished layout handed to the renderer. Wraps the tree once and memoizes
/// repeated geometry and id queries.
#[derive(Debug)]
pub struct LayoutRoot {
    tree: LayoutTree,
    bounds: RefCell<HashMap<NodeId, Option<Rect>>>,
    key_index: OnceCell<HashMap<String, NodeId>>,
}

impl LayoutRoot {
    pub fn new(tree: LayoutTree) -> Self {
        LayoutRoot { tree, bounds: RefCell::new(HashMap::new()), key_index: OnceCell::new() }
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Union of all key rectangles at or below `id`
    pub fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        if let Some(cached) = self.bounds.borrow().get(&id) {
            return *cached;
        }

        let own = self.tree.node(id).key().map(|k| k.border_rect);
        let rect = self
            .tree
            .children(id)
            .iter()
            .filter_map(|&c| self.bounding_rect(c))
            .fold(own, |acc, r| Some(acc.map_or(r, |a| a.union(&r))));

        self.bounds.borrow_mut().insert(id, rect);
        rect
    }

    /// First key in tree order with the given (base) id
    pub fn find_key(&self, key_id: &str) -> Option<NodeId> {
        let index = self.key_index.get_or_init(|| {
            let mut index = HashMap::new();
            for (id, _) in self.tree.iter_keys() {
                if let Some(ref name) = self.tree.node(id).id {
                    index.entry(name.clone()).or_insert(id);
                }
            }
            index
        });
        index.get(key_id).copied()
    }
}
