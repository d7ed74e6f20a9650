// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Layout Loading
/// Reads a layout document and builds the resolved layout tree
///
/// This module handles:
/// - Format detection and dispatch to the modern or legacy builder
/// - Recursive descent over box / panel / key / templates / keysym_rule / include
/// - Key geometry lookup through the per-load geometry cache
/// - Post-processing: template purge and LayoutRoot wrapping

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::olgc_config::LayoutSettings;
use crate::olgd_dom::XmlElement;
use crate::olge_error::LayoutError;
use crate::olgk_key::{KeyContext, KeyResolver};
use crate::olgn_node::{
    BoxLayout, KeysymRules, LayoutNode, LayoutRoot, LayoutTree, NodeId, NodeKind, TemplateKind,
    TemplateMap,
};
use crate::olgr_scope::{find_template, merge_keysym_rules, parse_rule_keysym, split_id};
use crate::olgs_svg::GeometryCache;
use crate::olgt_types::FormatVersion;
use crate::olgx_context::{KeyboardDriver, LayoutFinder, NoTranslation, Translator};

pub const ROOT_ID: &str = "__root__";

// ============================================================================
// SECTION 1: Public entry point
// ============================================================================

/// Loads layout documents. Holds only read-only collaborators; all per-load
/// state lives in a `LoadSession` created by each `load` call.
pub struct LayoutLoader<'a> {
    settings: &'a LayoutSettings,
    finder: &'a dyn LayoutFinder,
    translator: &'a dyn Translator,
}

impl<'a> LayoutLoader<'a> {
    /// Loader resolving includes through the settings' search paths
    pub fn new(settings: &'a LayoutSettings) -> Self {
        LayoutLoader { settings, finder: settings, translator: &NoTranslation }
    }

    pub fn with_finder(mut self, finder: &'a dyn LayoutFinder) -> Self {
        self.finder = finder;
        self
    }

    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Load a layout with everything resolved. Ok(None) if the document
    /// describes no items at all.
    pub fn load(
        &self,
        driver: Option<&dyn KeyboardDriver>,
        path: &Path,
        color_scheme: Option<&str>,
    ) -> Result<Option<LayoutRoot>, LayoutError> {
        let ctx = KeyContext {
            driver,
            settings: self.settings,
            translator: self.translator,
            color_scheme,
        };
        let mut session = LoadSession::new(ctx, self.finder);
        let tree = session.load_document(path)?;
        debug!("LAYOUT: {} geometry files read for {}", session.cache.len(), path.display());

        Ok(tree.map(|mut tree| {
            tree.purge_templates();
            LayoutRoot::new(tree)
        }))
    }
}

// ============================================================================
// SECTION 2: Load session
// ============================================================================

/// Document currently being resolved; includes get their own
pub(crate) struct Document<'p> {
    pub(crate) path: &'p Path,
    pub(crate) dir: PathBuf,
    pub(crate) format: FormatVersion,
}

/// State of one top-level load. Dropped when the load returns, which frees the
/// geometry cache on every exit path.
pub(crate) struct LoadSession<'a> {
    pub(crate) ctx: KeyContext<'a>,
    finder: &'a dyn LayoutFinder,
    pub(crate) cache: GeometryCache,
    include_stack: Vec<PathBuf>,
}

impl<'a> LoadSession<'a> {
    pub(crate) fn new(ctx: KeyContext<'a>, finder: &'a dyn LayoutFinder) -> Self {
        LoadSession { ctx, finder, cache: GeometryCache::new(), include_stack: Vec::new() }
    }

    /// Load the top-level document or an included one
    pub(crate) fn load_document(&mut self, path: &Path) -> Result<Option<LayoutTree>, LayoutError> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.include_stack.contains(&canonical) {
            return Err(LayoutError::format(path, "layout includes itself"));
        }

        self.include_stack.push(canonical);
        let result = self.load_document_tree(path);
        self.include_stack.pop();
        result
    }

    fn load_document_tree(&mut self, path: &Path) -> Result<Option<LayoutTree>, LayoutError> {
        let dom = XmlElement::load(path)?;

        // no format version means legacy layout
        let format = dom.attr("format").map(FormatVersion::parse).unwrap_or(FormatVersion::LEGACY);
        let doc = Document {
            path,
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            format,
        };

        let mut tree = LayoutTree::new(LayoutNode::panel().with_id(ROOT_ID));
        let root = tree.root();

        if format >= FormatVersion::LAYOUT_TREE {
            self.parse_children(&doc, &dom, &mut tree, root)?;
        } else {
            warn!("LAYOUT: loading legacy layout, format '{}'. Please consider upgrading to current format '{}'",
                format, FormatVersion::CURRENT);
            self.build_legacy_layout(&doc, &dom, &mut tree)?;
        }

        if tree.is_empty() {
            Ok(None)
        } else {
            Ok(Some(tree))
        }
    }

    // ========================================================================
    // Recursive descent
    // ========================================================================

    fn parse_children(
        &mut self,
        doc: &Document,
        element: &XmlElement,
        tree: &mut LayoutTree,
        parent: NodeId,
    ) -> Result<(), LayoutError> {
        for child in &element.children {
            match child.local_name() {
                "include" => self.parse_include(doc, child, tree, parent)?,
                "templates" => {
                    let templates = parse_templates(doc, child)?;
                    tree.append(parent, templates);
                }
                "keysym_rule" => parse_keysym_rule(doc, child, tree, parent)?,
                "box" => {
                    let mut node = LayoutNode::new(NodeKind::Box(parse_box_layout(doc, child)?));
                    parse_common(doc, child, &mut node)?;
                    let id = tree.append(parent, node);
                    self.parse_children(doc, child, tree, id)?;
                }
                "panel" => {
                    let mut node = LayoutNode::panel();
                    parse_common(doc, child, &mut node)?;
                    let id = tree.append(parent, node);
                    self.parse_children(doc, child, tree, id)?;
                }
                "key" => {
                    if let Some(id) = self.parse_key(doc, child, tree, parent)? {
                        self.parse_children(doc, child, tree, id)?;
                    }
                }
                other => debug!("LAYOUT: ignoring unknown element <{}>", other),
            }
        }
        Ok(())
    }

    fn parse_include(
        &mut self,
        doc: &Document,
        element: &XmlElement,
        tree: &mut LayoutTree,
        parent: NodeId,
    ) -> Result<(), LayoutError> {
        let name = element.attr("file")
            .ok_or_else(|| LayoutError::format(doc.path, "include without 'file' attribute"))?;
        let path = self.finder.find_layout_filename(name, "layout include")?;
        info!("LAYOUT: including layout from {}", name);

        if let Some(included) = self.load_document(&path)? {
            let rules = included.node(included.root()).keysym_rules.clone();
            tree.graft_children(parent, included);
            if let Some(rules) = rules {
                tree.node_mut(parent).update_keysym_rules(rules);
            }
        }
        Ok(())
    }

    /// Resolve a key element below `parent`. Keys without geometry are
    /// dropped with a warning and yield Ok(None).
    pub(crate) fn parse_key(
        &mut self,
        doc: &Document,
        element: &XmlElement,
        tree: &mut LayoutTree,
        parent: NodeId,
    ) -> Result<Option<NodeId>, LayoutError> {
        let mut node = LayoutNode::panel();
        parse_common(doc, element, &mut node)?;

        // template attributes first, the element's own override them
        let mut attributes = match element.attr("id") {
            Some(id) => find_template(tree, parent, TemplateKind::Key, &split_id(id)),
            None => Default::default(),
        };
        attributes.extend(element.attribute_map());

        let keysym_rules = merge_keysym_rules(tree, parent);
        let resolver = KeyResolver::new(self.ctx, doc.format, doc.path);
        let resolved = resolver.resolve(&attributes, &keysym_rules)?;

        let filename = match node.filename.as_deref().or_else(|| tree.find_filename(parent)) {
            Some(f) => f.to_string(),
            None => {
                warn!("LAYOUT: ignoring key '{}', no svg filename defined", resolved.props.theme_id);
                return Ok(None);
            }
        };

        let rect = match self.cache.get(&doc.dir, &filename)?.get(&resolved.id) {
            Some(rect) => *rect,
            None => {
                warn!("LAYOUT: ignoring key '{}', not found in '{}'", resolved.props.theme_id, filename);
                return Ok(None);
            }
        };

        let mut props = resolved.props;
        props.border_rect = rect;
        node.id = Some(resolved.id);
        node.group = Some(resolved.group);
        node.kind = NodeKind::Key(Box::new(props));
        Ok(Some(tree.append(parent, node)))
    }
}

// ============================================================================
// SECTION 3: Element parsers
// ============================================================================

/// Attributes shared by box, panel and key
pub(crate) fn parse_common(doc: &Document, element: &XmlElement, node: &mut LayoutNode) -> Result<(), LayoutError> {
    for (key, value) in &element.attributes {
        match key.as_str() {
            "id" => node.id = Some(value.clone()),
            "group" => node.group = Some(value.clone()),
            "layer" => node.layer_id = Some(value.clone()),
            "filename" => node.filename = Some(value.clone()),
            "visible" => node.visible = value == "true",
            "expand" => node.expand = value == "true",
            "border" => {
                node.border = parse_length(doc, "border", value)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Finite, non-negative distance such as border or spacing
fn parse_length(doc: &Document, name: &str, value: &str) -> Result<f64, LayoutError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(LayoutError::format(doc.path, format!("invalid {} '{}'", name, value))),
    }
}

fn parse_box_layout(doc: &Document, element: &XmlElement) -> Result<BoxLayout, LayoutError> {
    let mut layout = BoxLayout::default();
    if let Some(orientation) = element.attr("orientation") {
        layout.horizontal = orientation.to_lowercase() == "horizontal";
    }
    if let Some(spacing) = element.attr("spacing") {
        layout.spacing = parse_length(doc, "spacing", spacing)?;
    }
    Ok(layout)
}

/// Templates are partially defined items; later items with a matching id
/// inherit their attributes.
fn parse_templates(doc: &Document, element: &XmlElement) -> Result<LayoutNode, LayoutError> {
    let mut templates = TemplateMap::new();
    for child in &element.children {
        match child.local_name() {
            "key" => {
                let id = child.attr("id").filter(|id| !id.is_empty()).ok_or_else(|| {
                    LayoutError::format(doc.path, format!("'id' attribute required for template {:?}", child.attributes))
                })?;
                templates.insert((id.to_string(), TemplateKind::Key), child.attribute_map());
            }
            other => {
                return Err(LayoutError::format(doc.path,
                    format!("unrecognized template '{} {:?}'", other, child.attributes)));
            }
        }
    }
    Ok(LayoutNode::new(NodeKind::Templates(templates)))
}

/// Keysym rules link attributes like labels to keysyms. They attach to the
/// enclosing element.
fn parse_keysym_rule(doc: &Document, element: &XmlElement, tree: &mut LayoutTree, parent: NodeId) -> Result<(), LayoutError> {
    let mut attributes = element.attribute_map();
    let Some(value) = attributes.remove("keysym") else {
        return Err(LayoutError::format(doc.path, "keysym_rule without 'keysym' attribute"));
    };

    match parse_rule_keysym(&value).map_err(|e| LayoutError::format(doc.path, e))? {
        Some(keysym) if keysym != 0 => {
            tree.node_mut(parent).update_keysym_rules(KeysymRules::from([(keysym, attributes)]));
        }
        _ => debug!("LAYOUT: ignoring keysym_rule for symbolic keysym '{}'", value),
    }
    Ok(())
}
