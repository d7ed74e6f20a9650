// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Key Resolution
/// Turns the merged attribute set of a key element into resolved key properties
///
/// Attribute layers, lowest precedence first: template, element, keysym rules.
/// The type source is taken in fixed order (char, keysym, keypress_name, macro,
/// script, keycode, button, draw_only, legacy modifier); a key with none of
/// them is a format error. Labels are built afterwards from the driver,
/// snippets, legacy label attributes, keysym rules and label overrides.

use std::path::Path;

use log::{debug, warn};

use crate::olgc_config::LayoutSettings;
use crate::olge_error::LayoutError;
use crate::olgn_node::{KeyProps, KeysymRules};
use crate::olgr_scope::base_id;
use crate::olgt_types::{
    Attributes, FormatVersion, KeyAction, KeyCode, KeyType, Labels, Modifier, Rect,
    StickyBehavior, CANONICAL_LABEL_MASKS, LABEL_MODIFIER_MASKS,
};
use crate::olgx_context::{KeyboardDriver, Translator};

// ============================================================================
// SECTION 1: Constants
// ============================================================================

/// Keys whose labels never come from the keyboard driver
const DRIVER_LABEL_EXCLUDED: &[&str] = &["BKSP"];
const SPACE_KEY_ID: &str = "SPCE";
const CAPS_KEY_ID: &str = "CAPS";

const NO_DRIVER_LABEL: &str = "?";
const NO_DRIVER_SPACE_LABEL: &str = "No X keyboard found, retrying...";
const UNASSIGNED_SNIPPET_LABEL: &str = "     --     ";

pub const DEFAULT_GROUP: &str = "_default";

/// Legacy per-attribute labels and the modifier mask each one fills
const LEGACY_LABEL_ATTRIBUTES: [(&str, u32); 5] = [
    ("label", 0),
    ("cap_label", 1),
    ("shift_label", 2),
    ("altgr_label", 128),
    ("altgrNshift_label", 129),
];

// ============================================================================
// SECTION 2: Resolver
// ============================================================================

/// Read-only collaborators shared by every key of one load
#[derive(Clone, Copy)]
pub struct KeyContext<'a> {
    pub driver: Option<&'a dyn KeyboardDriver>,
    pub settings: &'a LayoutSettings,
    pub translator: &'a dyn Translator,
    pub color_scheme: Option<&'a str>,
}

/// Result of resolving one key; geometry is attached by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKey {
    /// Base id, e.g. "DELE" for "DELE.numpad"
    pub id: String,
    pub group: String,
    pub props: KeyProps,
}

pub struct KeyResolver<'a> {
    ctx: KeyContext<'a>,
    format: FormatVersion,
    layout_path: &'a Path,
}

impl<'a> KeyResolver<'a> {
    pub fn new(ctx: KeyContext<'a>, format: FormatVersion, layout_path: &'a Path) -> Self {
        KeyResolver { ctx, format, layout_path }
    }

    fn error(&self, message: String) -> LayoutError {
        LayoutError::format(self.layout_path, message)
    }

    pub fn resolve(&self, attributes: &Attributes, keysym_rules: &KeysymRules) -> Result<ResolvedKey, LayoutError> {
        let theme_id = attributes.get("id")
            .ok_or_else(|| self.error(format!("key without 'id' attribute {:?}", attributes)))?
            .clone();
        let id = base_id(&theme_id).to_string();

        let modifier = match attributes.get("modifier").filter(|v| !v.is_empty()) {
            Some(name) => Some(Modifier::from_name(name).ok_or_else(|| {
                self.error(format!("unrecognized modifier '{}' in definition of '{}'", name, theme_id))
            })?),
            None => None,
        };

        let action = match attributes.get("action").filter(|v| !v.is_empty()) {
            Some(name) => Some(KeyAction::from_name(name).ok_or_else(|| {
                self.error(format!("unrecognized key action '{}' in definition of '{}'", name, theme_id))
            })?),
            None => None,
        };

        let (key_type, code) = self.resolve_type(attributes, &id, &theme_id, modifier)?;

        let mut group = attributes.get("group").cloned().unwrap_or_else(|| DEFAULT_GROUP.to_string());
        let mut tooltip = None;
        let labels = self.resolve_labels(attributes, keysym_rules, &id, key_type, &code, &mut tooltip, &mut group)?;

        let sticky = match attributes.get("sticky").map(|v| v.to_lowercase()) {
            None => false,
            Some(ref v) if v == "true" => true,
            Some(ref v) if v == "false" => false,
            Some(v) => return Err(self.error(format!("invalid value '{}' for 'sticky' attribute of key '{}'", v, id))),
        };

        // Older documents hard-coded lock-only behavior for caps lock
        let mut sticky_behavior = None;
        if self.format < FormatVersion::V2_2 && id == CAPS_KEY_ID {
            sticky_behavior = Some(StickyBehavior::LockOnly);
        }
        if let Some(value) = attributes.get("sticky_behavior").filter(|v| !v.is_empty()) {
            sticky_behavior = Some(StickyBehavior::from_name(value).ok_or_else(|| {
                self.error(format!("unrecognized sticky behavior '{}' in definition of '{}'", value, theme_id))
            })?);
        }

        let scannable = attributes.get("scannable")
            .map_or(true, |v| v.to_lowercase() != "false");

        let scan_priority = match attributes.get("scan_priority") {
            Some(v) => Some(v.trim().parse::<i32>()
                .map_err(|_| self.error(format!("invalid scan_priority '{}' of key '{}'", v, id)))?),
            None => None,
        };

        if let Some(text) = attributes.get("tooltip") {
            tooltip = Some(text.clone());
        }

        let props = KeyProps {
            theme_id,
            key_type,
            code,
            action,
            modifier,
            sticky,
            sticky_behavior,
            scannable,
            scan_priority,
            label_x_align: self.parse_float(attributes, "label_x_align", &id)?,
            label_y_align: self.parse_float(attributes, "label_y_align", &id)?,
            tooltip,
            image_filename: attributes.get("image").cloned(),
            labels,
            border_rect: Rect::default(),
            color_scheme: self.ctx.color_scheme.map(str::to_string),
        };

        Ok(ResolvedKey { id, group, props })
    }

    fn parse_float(&self, attributes: &Attributes, name: &str, id: &str) -> Result<Option<f64>, LayoutError> {
        match attributes.get(name) {
            Some(v) => v.trim().parse::<f64>()
                .map(Some)
                .map_err(|_| self.error(format!("invalid {} '{}' of key '{}'", name, v, id))),
            None => Ok(None),
        }
    }

    fn parse_number(&self, value: &str, what: &str, id: &str) -> Result<u32, LayoutError> {
        let value = value.trim();
        let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse::<u32>(),
        };
        parsed.map_err(|_| self.error(format!("invalid {} '{}' of key '{}'", what, value, id)))
    }

    // ========================================================================
    // Type and code
    // ========================================================================

    fn resolve_type(
        &self,
        attributes: &Attributes,
        id: &str,
        theme_id: &str,
        modifier: Option<Modifier>,
    ) -> Result<(KeyType, KeyCode), LayoutError> {
        if let Some(v) = attributes.get("char") {
            Ok((KeyType::Char, KeyCode::Text(v.clone())))
        } else if let Some(v) = attributes.get("keysym") {
            Ok((KeyType::Keysym, KeyCode::Number(self.parse_number(v, "keysym", id)?)))
        } else if let Some(v) = attributes.get("keypress_name") {
            Ok((KeyType::KeypressName, KeyCode::Text(v.clone())))
        } else if let Some(v) = attributes.get("macro") {
            Ok((KeyType::Macro, KeyCode::Text(v.clone())))
        } else if let Some(v) = attributes.get("script") {
            Ok((KeyType::Script, KeyCode::Text(v.clone())))
        } else if let Some(v) = attributes.get("keycode") {
            let keycode = v.trim().parse::<u32>()
                .map_err(|_| self.error(format!("invalid keycode '{}' of key '{}'", v, id)))?;
            Ok((KeyType::Keycode, KeyCode::Number(keycode)))
        } else if attributes.contains_key("button") {
            Ok((KeyType::Button, KeyCode::Text(id.to_string())))
        } else if attributes.get("draw_only").is_some_and(|v| v.to_lowercase() == "true") {
            Ok((KeyType::Undefined, KeyCode::None))
        } else if modifier.is_some() {
            Ok((KeyType::LegacyModifier, KeyCode::None))
        } else {
            Err(self.error(format!("key '{}' does not have a type defined", theme_id)))
        }
    }

    // ========================================================================
    // Labels
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn resolve_labels(
        &self,
        attributes: &Attributes,
        keysym_rules: &KeysymRules,
        id: &str,
        key_type: KeyType,
        code: &KeyCode,
        tooltip: &mut Option<String>,
        group: &mut String,
    ) -> Result<Labels, LayoutError> {
        let mut labels = Labels::new();

        match (key_type, code) {
            (KeyType::Keycode, KeyCode::Number(keycode)) if !DRIVER_LABEL_EXCLUDED.contains(&id) => {
                labels = self.driver_labels(*keycode, id);
            }
            (KeyType::Macro, KeyCode::Text(text)) => {
                let number = text.trim().parse::<u32>()
                    .map_err(|_| self.error(format!("invalid macro '{}' of key '{}'", text, id)))?;
                let mut tip = format!("Snippet {}", number);
                match self.ctx.settings.snippets.get(&number).filter(|s| !s.label.is_empty()) {
                    Some(snippet) => {
                        labels.insert(0, Some(snippet.label.replace("\\n", "\n")));
                    }
                    None => {
                        labels.insert(0, Some(UNASSIGNED_SNIPPET_LABEL.to_string()));
                        tip.push_str(&self.ctx.translator.translate(", unassigned"));
                    }
                }
                *tooltip = Some(tip);
            }
            _ => {}
        }

        let layout_labels = legacy_labels(attributes);
        if !layout_labels.is_empty() {
            labels = layout_labels;
        }

        if let (KeyType::Keycode, KeyCode::Number(keycode), Some(driver)) = (key_type, code, self.ctx.driver) {
            let masks: &[u32] = &LABEL_MODIFIER_MASKS;
            match driver.keysyms_from_keycode(*keycode, masks) {
                Ok(keysyms) => {
                    for (mask, keysym) in masks.iter().zip(keysyms) {
                        if let Some(label) = keysym_rules.get(&keysym).and_then(|rule| rule.get("label")) {
                            labels.insert(*mask, Some(label.clone()));
                        }
                    }
                }
                Err(e) => debug!("KEY: no keysyms for '{}': {}", id, e),
            }
        }

        // Empty labels stay empty; translating "" yields catalog headers
        let mut labels: Labels = labels.into_iter()
            .map(|(mask, label)| {
                let label = label.filter(|l| !l.is_empty()).map(|l| self.ctx.translator.translate(&l));
                (mask, label)
            })
            .collect();

        if let Some(o) = self.ctx.settings.label_overrides.get(id) {
            if !o.label.is_empty() {
                labels = Labels::from([(0, Some(o.label.clone()))]);
                if !o.group.is_empty() {
                    *group = o.group.clone();
                }
            }
        }

        Ok(labels)
    }

    fn driver_labels(&self, keycode: u32, id: &str) -> Labels {
        if let Some(driver) = self.ctx.driver {
            let masks: &[u32] = &LABEL_MODIFIER_MASKS;
            match driver.labels_from_keycode(keycode, masks) {
                Ok(labels) => {
                    return masks.iter().copied().zip(labels.into_iter().map(Some)).collect();
                }
                Err(e) => warn!("KEY: driver labels unavailable for '{}': {}", id, e),
            }
        }

        let placeholder = if id.to_uppercase() == SPACE_KEY_ID { NO_DRIVER_SPACE_LABEL } else { NO_DRIVER_LABEL };
        CANONICAL_LABEL_MASKS.iter().map(|&m| (m, Some(placeholder.to_string()))).collect()
    }
}

/// Labels from the pre-keysym-rule label attributes; empty unless "label" is set
fn legacy_labels(attributes: &Attributes) -> Labels {
    let mut labels = Labels::new();
    if attributes.contains_key("label") {
        for (name, mask) in LEGACY_LABEL_ATTRIBUTES {
            if let Some(value) = attributes.get(name) {
                labels.insert(mask, Some(value.clone()));
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olgc_config::{LabelOverride, Snippet};
    use crate::olge_error::DriverError;
    use crate::olgx_context::NoTranslation;

    struct FakeDriver;

    impl KeyboardDriver for FakeDriver {
        fn labels_from_keycode(&self, keycode: u32, masks: &[u32]) -> Result<Vec<String>, DriverError> {
            Ok(masks.iter().map(|m| format!("k{}m{}", keycode, m)).collect())
        }

        fn keysyms_from_keycode(&self, _keycode: u32, masks: &[u32]) -> Result<Vec<u32>, DriverError> {
            // mask 0 → 'a', everything else → 'A'
            Ok(masks.iter().map(|&m| if m == 0 { 0x61 } else { 0x41 }).collect())
        }
    }

    struct BrokenDriver;

    impl KeyboardDriver for BrokenDriver {
        fn labels_from_keycode(&self, _: u32, _: &[u32]) -> Result<Vec<String>, DriverError> {
            Err(DriverError("gone".to_string()))
        }

        fn keysyms_from_keycode(&self, _: u32, _: &[u32]) -> Result<Vec<u32>, DriverError> {
            Err(DriverError("gone".to_string()))
        }
    }

    struct Upper;

    impl Translator for Upper {
        fn translate(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn resolve_with(
        settings: &LayoutSettings,
        driver: Option<&dyn KeyboardDriver>,
        format: FormatVersion,
        pairs: &[(&str, &str)],
    ) -> Result<ResolvedKey, LayoutError> {
        let ctx = KeyContext { driver, settings, translator: &NoTranslation, color_scheme: Some("dark") };
        KeyResolver::new(ctx, format, Path::new("test.onboard")).resolve(&attrs(pairs), &KeysymRules::new())
    }

    fn resolve(pairs: &[(&str, &str)]) -> Result<ResolvedKey, LayoutError> {
        resolve_with(&LayoutSettings::default(), None, FormatVersion::CURRENT, pairs)
    }

    fn assert_type(pairs: &[(&str, &str)], key_type: KeyType, code: KeyCode) {
        let key = resolve(pairs).unwrap();
        assert_eq!(key.props.key_type, key_type, "{:?}", pairs);
        assert_eq!(key.props.code, code, "{:?}", pairs);
    }

    #[test]
    fn test_type_precedence() {
        assert_type(&[("id", "A"), ("char", "a"), ("keysym", "0x41")], KeyType::Char, KeyCode::Text("a".into()));
        assert_type(&[("id", "A"), ("keysym", "0x41"), ("keycode", "38")], KeyType::Keysym, KeyCode::Number(0x41));
        assert_type(&[("id", "A"), ("keysym", "65")], KeyType::Keysym, KeyCode::Number(65));
        assert_type(&[("id", "A"), ("keypress_name", "a"), ("macro", "1")], KeyType::KeypressName, KeyCode::Text("a".into()));
        assert_type(&[("id", "M"), ("macro", "3"), ("script", "s")], KeyType::Macro, KeyCode::Text("3".into()));
        assert_type(&[("id", "S"), ("script", "sokSettings"), ("keycode", "1")], KeyType::Script, KeyCode::Text("sokSettings".into()));
        assert_type(&[("id", "A"), ("keycode", "38"), ("button", "true")], KeyType::Keycode, KeyCode::Number(38));
        assert_type(&[("id", "hide.x"), ("button", "true")], KeyType::Button, KeyCode::Text("hide".into()));
        assert_type(&[("id", "deco"), ("draw_only", "TRUE")], KeyType::Undefined, KeyCode::None);
        assert_type(&[("id", "LFSH"), ("modifier", "shift")], KeyType::LegacyModifier, KeyCode::None);
    }

    #[test]
    fn test_missing_type_is_fatal() {
        let err = resolve(&[("id", "A"), ("label", "a")]).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("'A'"));
        assert!(resolve(&[("id", "A"), ("draw_only", "false")]).is_err());
        assert!(resolve(&[("char", "a")]).is_err());
    }

    #[test]
    fn test_invalid_tokens_are_fatal() {
        assert!(resolve(&[("id", "A"), ("char", "a"), ("sticky", "yes")]).unwrap_err().is_format_error());
        assert!(resolve(&[("id", "A"), ("char", "a"), ("sticky_behavior", "forever")]).is_err());
        assert!(resolve(&[("id", "A"), ("char", "a"), ("modifier", "hyper")]).is_err());
        assert!(resolve(&[("id", "A"), ("char", "a"), ("action", "triple-stroke")]).is_err());
        assert!(resolve(&[("id", "A"), ("keycode", "x38")]).is_err());
        assert!(resolve(&[("id", "A"), ("char", "a"), ("scan_priority", "high")]).is_err());
    }

    #[test]
    fn test_key_properties() {
        let key = resolve(&[
            ("id", "LFSH.left"), ("keycode", "50"), ("modifier", "shift"), ("sticky", "TRUE"),
            ("sticky_behavior", "latch"), ("action", "delayed-stroke"), ("scannable", "False"),
            ("scan_priority", "2"), ("label_x_align", "0.25"), ("image", "shift.svg"),
            ("tooltip", "Shift"), ("group", "shifts"),
        ]).unwrap();
        assert_eq!(key.id, "LFSH");
        assert_eq!(key.group, "shifts");
        let p = key.props;
        assert_eq!(p.theme_id, "LFSH.left");
        assert_eq!(p.modifier, Some(Modifier::Shift));
        assert!(p.sticky);
        assert_eq!(p.sticky_behavior, Some(StickyBehavior::LatchOnly));
        assert_eq!(p.action, Some(KeyAction::DelayedStroke));
        assert!(!p.scannable);
        assert_eq!(p.scan_priority, Some(2));
        assert_eq!(p.label_x_align, Some(0.25));
        assert_eq!(p.label_y_align, None);
        assert_eq!(p.image_filename.as_deref(), Some("shift.svg"));
        assert_eq!(p.tooltip.as_deref(), Some("Shift"));
        assert_eq!(p.color_scheme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_defaults() {
        let key = resolve(&[("id", "A"), ("char", "a")]).unwrap();
        assert_eq!(key.group, DEFAULT_GROUP);
        assert!(!key.props.sticky);
        assert!(key.props.scannable);
        assert!(key.props.labels.is_empty());
    }

    #[test]
    fn test_caps_lock_gated_by_format() {
        let settings = LayoutSettings::default();
        let old = resolve_with(&settings, None, FormatVersion::SCANNER, &[("id", "CAPS"), ("keycode", "66")]).unwrap();
        assert_eq!(old.props.sticky_behavior, Some(StickyBehavior::LockOnly));

        let explicit = resolve_with(&settings, None, FormatVersion::SCANNER,
            &[("id", "CAPS"), ("keycode", "66"), ("sticky_behavior", "cycle")]).unwrap();
        assert_eq!(explicit.props.sticky_behavior, Some(StickyBehavior::Cycle));

        let new = resolve_with(&settings, None, FormatVersion::V2_2, &[("id", "CAPS"), ("keycode", "66")]).unwrap();
        assert_eq!(new.props.sticky_behavior, None);
    }

    #[test]
    fn test_keycode_labels_without_driver() {
        let key = resolve(&[("id", "AC01"), ("keycode", "38")]).unwrap();
        assert_eq!(key.props.labels.len(), 5);
        assert_eq!(key.props.labels[&129].as_deref(), Some("?"));

        let space = resolve(&[("id", "SPCE"), ("keycode", "65")]).unwrap();
        assert_eq!(space.props.labels[&0].as_deref(), Some(NO_DRIVER_SPACE_LABEL));

        let bksp = resolve(&[("id", "BKSP"), ("keycode", "22")]).unwrap();
        assert!(bksp.props.labels.is_empty());
    }

    #[test]
    fn test_keycode_labels_from_driver() {
        let settings = LayoutSettings::default();
        let key = resolve_with(&settings, Some(&FakeDriver), FormatVersion::CURRENT,
            &[("id", "AC01"), ("keycode", "38")]).unwrap();
        assert_eq!(key.props.labels.len(), LABEL_MODIFIER_MASKS.len());
        assert_eq!(key.props.labels[&1].as_deref(), Some("k38m1"));

        let broken = resolve_with(&settings, Some(&BrokenDriver), FormatVersion::CURRENT,
            &[("id", "AC01"), ("keycode", "38")]).unwrap();
        assert_eq!(broken.props.labels[&0].as_deref(), Some("?"));
    }

    #[test]
    fn test_keysym_rules_override_driver_labels() {
        let settings = LayoutSettings::default();
        let ctx = KeyContext { driver: Some(&FakeDriver), settings: &settings, translator: &NoTranslation, color_scheme: None };
        let rules = KeysymRules::from([(0x41, attrs(&[("label", "Ä")]))]);
        let key = KeyResolver::new(ctx, FormatVersion::CURRENT, Path::new("t"))
            .resolve(&attrs(&[("id", "AC01"), ("keycode", "38")]), &rules)
            .unwrap();
        assert_eq!(key.props.labels[&0].as_deref(), Some("k38m0"));
        assert_eq!(key.props.labels[&1].as_deref(), Some("Ä"));
        assert_eq!(key.props.labels[&129].as_deref(), Some("Ä"));
    }

    #[test]
    fn test_legacy_labels_replace_and_translate() {
        let settings = LayoutSettings::default();
        let ctx = KeyContext { driver: Some(&FakeDriver), settings: &settings, translator: &Upper, color_scheme: None };
        let key = KeyResolver::new(ctx, FormatVersion::CURRENT, Path::new("t"))
            .resolve(&attrs(&[
                ("id", "AC01"), ("keycode", "38"), ("label", "a"), ("shift_label", ""),
                ("altgrNshift_label", "æ"),
            ]), &KeysymRules::new())
            .unwrap();
        let labels = key.props.labels;
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[&0].as_deref(), Some("A"));
        assert_eq!(labels[&2], None);
        assert_eq!(labels[&129].as_deref(), Some("Æ"));
    }

    #[test]
    fn test_macro_labels() {
        let mut settings = LayoutSettings::default();
        settings.snippets.insert(1, Snippet { label: "Sig\\nline".into(), text: "x".into() });

        let assigned = resolve_with(&settings, None, FormatVersion::CURRENT, &[("id", "m1"), ("macro", "1")]).unwrap();
        assert_eq!(assigned.props.labels[&0].as_deref(), Some("Sig\nline"));
        assert_eq!(assigned.props.tooltip.as_deref(), Some("Snippet 1"));

        let unassigned = resolve_with(&settings, None, FormatVersion::CURRENT, &[("id", "m2"), ("macro", "2")]).unwrap();
        assert_eq!(unassigned.props.labels[&0].as_deref(), Some(UNASSIGNED_SNIPPET_LABEL));
        assert_eq!(unassigned.props.tooltip.as_deref(), Some("Snippet 2, unassigned"));

        assert!(resolve(&[("id", "m"), ("macro", "one")]).is_err());
        // snippet numbers are decimal only
        assert!(resolve_with(&settings, None, FormatVersion::CURRENT, &[("id", "m1"), ("macro", "0x1")]).unwrap_err().is_format_error());
    }

    #[test]
    fn test_label_override_replaces_labels_and_group() {
        let mut settings = LayoutSettings::default();
        settings.label_overrides.insert("RTRN".into(), LabelOverride { label: "Enter".into(), group: "wide".into() });
        settings.label_overrides.insert("TAB".into(), LabelOverride { label: "".into(), group: "ignored".into() });

        let key = resolve_with(&settings, None, FormatVersion::CURRENT,
            &[("id", "RTRN.main"), ("keycode", "36"), ("group", "normal")]).unwrap();
        assert_eq!(key.props.labels, Labels::from([(0, Some("Enter".to_string()))]));
        assert_eq!(key.group, "wide");

        let tab = resolve_with(&settings, None, FormatVersion::CURRENT,
            &[("id", "TAB"), ("char", "\t"), ("label", "Tab")]).unwrap();
        assert_eq!(tab.group, DEFAULT_GROUP);
        assert_eq!(tab.props.labels[&0].as_deref(), Some("Tab"));
    }
}
