// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Legacy Pane Layouts
///
/// Documents without a format attribute (or older than the layout tree
/// format) describe a flat list of panes. They are migrated into a layout
/// tree on load:
///
///   __root__
///     box (border 1, spacing 2)
///       panel layer_area        one panel per pane, layer "layer {i}"
///       box (vertical)          generated hide / move / layer{i} buttons
///
/// Old builds switched panes with automatic tab keys; the generated layer
/// buttons stand in for them.

use log::debug;

use crate::olgb_build::{Document, LoadSession};
use crate::olgd_dom::XmlElement;
use crate::olge_error::LayoutError;
use crate::olgk_key::KeyResolver;
use crate::olgn_node::{BoxLayout, KeysymRules, LayoutNode, LayoutTree, NodeId, NodeKind};
use crate::olgt_types::{Attributes, KeyCode, KeyType, Rect};

pub const LAYER_AREA_ID: &str = "layer_area";
pub const LAYER_BUTTON_GROUP: &str = "__layer_buttons__";

const DEFAULT_KEY_WIDTH: f64 = 18.0;
const LAYER_BUTTON_HEIGHT: f64 = 20.0;
const NARROW_BUTTON_FACTOR: f64 = 1.4;

/// Keys renamed after the pane format was retired; both became buttons
const RENAMED_KEYS: [(&str, &str); 2] = [
    ("middleClick", "middleclick"),
    ("secondaryClick", "secondaryclick"),
];

impl<'a> LoadSession<'a> {
    pub(crate) fn build_legacy_layout(
        &mut self,
        doc: &Document,
        dom: &XmlElement,
        tree: &mut LayoutTree,
    ) -> Result<(), LayoutError> {
        let root = tree.root();
        let mut outer = LayoutNode::new(NodeKind::Box(BoxLayout { horizontal: true, spacing: 2.0 }));
        outer.border = 1.0;
        let outer = tree.append(root, outer);
        let layer_area = tree.append(outer, LayoutNode::panel().with_id(LAYER_AREA_ID));

        // ====================================================================
        // Panes
        // ====================================================================

        let mut pane_ids = Vec::new();
        let mut is_scan = false;

        for (i, pane_element) in dom.descendants("pane").into_iter().enumerate() {
            let required = |name: &str| {
                pane_element.attr(name).map(str::to_string).ok_or_else(|| {
                    LayoutError::format(doc.path, format!("pane {} without '{}' attribute", i, name))
                })
            };

            let pane_id = required("id")?;
            let mut pane = LayoutNode::panel().with_id(&pane_id);
            pane.filename = Some(required("filename")?);
            pane.layer_id = Some(format!("layer {}", i));
            pane_ids.push(pane_id);
            let pane = tree.append(layer_area, pane);

            for key_element in pane_element.descendants("key") {
                if let Some(key) = self.parse_key(doc, key_element, tree, pane)? {
                    rename_legacy_key(tree, key);
                }
            }

            if !pane_element.descendants("column").is_empty() {
                is_scan = true;
            }
        }

        // ====================================================================
        // Layer switching buttons
        // ====================================================================

        let widths: Vec<f64> = tree.iter_keys().map(|(_, key)| key.border_rect.w).collect();
        let width = most_frequent_width(&widths);
        let widen = if is_scan { 1.0 } else { NARROW_BUTTON_FACTOR };
        let rect = Rect::new(0.0, 0.0, width * widen, LAYER_BUTTON_HEIGHT);
        debug!("LAYOUT: {} legacy panes, layer buttons {}", pane_ids.len(), rect);

        let column = tree.append(outer, LayoutNode::new(NodeKind::Box(BoxLayout { horizontal: false, ..Default::default() })));
        let resolver = KeyResolver::new(self.ctx, doc.format, doc.path);

        for (id, image) in [("hide", "close.svg"), ("move", "move.svg")] {
            let attributes = button_attributes(&[
                ("id", id),
                ("image", image),
                ("scannable", "false"),
            ]);
            tree.append(column, button_node(&resolver, &attributes, rect)?);
        }

        if pane_ids.len() > 1 {
            for (i, pane_id) in pane_ids.iter().enumerate() {
                let id = format!("layer{}", i);
                let attributes = button_attributes(&[("id", &id), ("label", pane_id)]);
                tree.append(column, button_node(&resolver, &attributes, rect)?);
            }
        }

        Ok(())
    }
}

fn button_attributes(pairs: &[(&str, &str)]) -> Attributes {
    let mut attributes: Attributes = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    attributes.insert("group".into(), LAYER_BUTTON_GROUP.into());
    attributes.insert("button".into(), "true".into());
    attributes
}

fn button_node(resolver: &KeyResolver, attributes: &Attributes, rect: Rect) -> Result<LayoutNode, LayoutError> {
    let resolved = resolver.resolve(attributes, &KeysymRules::new())?;
    let mut props = resolved.props;
    props.border_rect = rect;

    let mut node = LayoutNode::new(NodeKind::Key(Box::new(props)));
    node.id = Some(resolved.id);
    node.group = Some(resolved.group);
    Ok(node)
}

fn rename_legacy_key(tree: &mut LayoutTree, key: NodeId) {
    let node = tree.node_mut(key);
    let Some(new_id) = RENAMED_KEYS.iter()
        .find(|(old, _)| node.id.as_deref() == Some(*old))
        .map(|(_, new)| *new)
    else {
        return;
    };

    node.id = Some(new_id.to_string());
    if let Some(props) = node.key_mut() {
        props.theme_id = new_id.to_string();
        props.key_type = KeyType::Button;
        props.code = KeyCode::Text(new_id.to_string());
    }
}

/// Most common key width; ties go to the wider key
pub fn most_frequent_width(widths: &[f64]) -> f64 {
    let mut histogram: Vec<(f64, usize)> = Vec::new();
    for &w in widths {
        match histogram.iter_mut().find(|(hw, _)| *hw == w) {
            Some(entry) => entry.1 += 1,
            None => histogram.push((w, 1)),
        }
    }

    histogram
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.total_cmp(&b.0)))
        .map_or(DEFAULT_KEY_WIDTH, |(w, _)| w)
}
