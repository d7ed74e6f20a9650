// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Scoped Lookups
///
/// Templates and keysym rules are both scoped by tree position:
/// - templates are searched from a node outward to the root, nearest scope
///   first and, among siblings, the last declared container first
/// - keysym rules are merged from the root down, so rules declared deeper
///   override rules for the same keysym further up

use crate::olgn_node::{KeysymRules, LayoutTree, NodeId, TemplateKind};
use crate::olgt_types::Attributes;

/// Candidate template ids for a key id, most specific first.
/// "DELE.numpad" yields ["DELE.numpad", "DELE"]; "DELE" yields ["DELE"].
pub fn split_id(full_id: &str) -> Vec<String> {
    let base = full_id.split('.').next().unwrap_or(full_id);
    if base == full_id {
        vec![full_id.to_string()]
    } else {
        vec![full_id.to_string(), base.to_string()]
    }
}

/// Base id (before the first '.') of a full key id
pub fn base_id(full_id: &str) -> &str {
    full_id.split('.').next().unwrap_or(full_id)
}

/// Find the template attributes for the first matching candidate id,
/// scanning scopes from `start` to the root. Misses yield an empty set.
pub fn find_template(tree: &LayoutTree, start: NodeId, kind: TemplateKind, ids: &[String]) -> Attributes {
    for scope in tree.iter_to_root(start) {
        for &child in tree.children(scope).iter().rev() {
            let templates = match tree.node(child).templates() {
                Some(t) if !t.is_empty() => t,
                _ => continue,
            };
            for id in ids {
                if let Some(attrs) = templates.get(&(id.clone(), kind)) {
                    return attrs.clone();
                }
            }
        }
    }
    Attributes::new()
}

/// Merge the keysym rules on the path from the root down to `node`
pub fn merge_keysym_rules(tree: &LayoutTree, node: NodeId) -> KeysymRules {
    let path: Vec<NodeId> = tree.iter_to_root(node).collect();
    let mut merged = KeysymRules::new();
    for &id in path.iter().rev() {
        if let Some(ref rules) = tree.node(id).keysym_rules {
            merged.extend(rules.iter().map(|(k, v)| (*k, v.clone())));
        }
    }
    merged
}

/// Keysym code of a keysym_rule. Hex ("0x..") and decimal codes are
/// understood; symbolic names are not and yield None.
pub fn parse_rule_keysym(value: &str) -> Result<Option<u32>, String> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16)
            .map(Some)
            .map_err(|_| format!("invalid keysym '{}'", value));
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<u32>()
            .map(Some)
            .map_err(|_| format!("invalid keysym '{}'", value));
    }
    Ok(None)
}
