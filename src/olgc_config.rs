// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Loader Settings
/// Read-only configuration consulted while resolving layouts
///
/// Responsibilities:
/// - Settings file path resolution (~/.config/onscreen-layout/settings.xml)
/// - Deployment of the embedded default settings when none exist
/// - Parsing snippets, key label overrides and include search paths
/// - Include path resolution (LayoutFinder)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::olge_error::LayoutError;
use crate::olgx_context::LayoutFinder;

// ============================================================================
// SECTION 1: Embedded default settings
// ============================================================================

const DEFAULT_SETTINGS_XML: &str = include_str!("../settings.default.xml");

// ============================================================================
// SECTION 2: Settings types
// ============================================================================

/// Text a macro key inserts, and the label shown for it
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub label: String,
    pub text: String,
}

/// Theme or system replacement for a key's labels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelOverride {
    pub label: String,
    pub group: String,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutSettings {
    pub search_paths: Vec<PathBuf>,
    pub snippets: HashMap<u32, Snippet>,
    pub label_overrides: HashMap<String, LabelOverride>,
}

// ============================================================================
// SECTION 3: Config path resolution
// ============================================================================

/// Resolve the standard settings file path
pub fn config_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("onscreen-layout");
    path.push("settings.xml");
    path
}

/// Per-user directory for layouts installed or copied by the user
pub fn user_layout_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("onscreen-layout");
    path.push("layouts");
    path
}

// ============================================================================
// SECTION 4: Loading
// ============================================================================

impl LayoutSettings {
    /// Load settings from the standard location, writing the embedded default
    /// first if the file is missing. Falls back to the embedded default on any
    /// read or parse failure.
    pub fn load_default() -> Self {
        let path = config_path();
        if !path.exists() {
            ensure_default_settings(&path);
        }
        Self::load_or_default(&path)
    }

    /// Load settings from `path`, or the embedded default if that fails
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("CONFIG: {}, using embedded default settings", e);
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                Self::from_xml(DEFAULT_SETTINGS_XML, base, path).unwrap_or_default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, LayoutError> {
        let xml = fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut settings = Self::from_xml(&xml, base, path)?;
        settings.search_paths.push(user_layout_dir());
        Ok(settings)
    }

    /// Parse settings XML. Relative search paths are taken relative to `base_dir`;
    /// `path` only serves error messages.
    pub fn from_xml(xml: &str, base_dir: &Path, path: &Path) -> Result<Self, LayoutError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut settings = LayoutSettings::default();
        let mut buf = Vec::new();
        let mut in_settings = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"settings" => in_settings = true,
                Ok(Event::End(ref e)) if e.name().as_ref() == b"settings" => in_settings = false,
                Ok(Event::Empty(ref e)) if in_settings => {
                    let mut attrs = HashMap::new();
                    for attr in e.attributes() {
                        let attr = attr.map_err(|err| LayoutError::xml(path, err.into()))?;
                        let value = attr.unescape_value().map_err(|err| LayoutError::xml(path, err))?;
                        attrs.insert(String::from_utf8_lossy(attr.key.as_ref()).to_string(), value.to_string());
                    }

                    match e.name().as_ref() {
                        b"search_path" => {
                            let dir = attrs.remove("dir")
                                .ok_or_else(|| LayoutError::format(path, "search_path missing 'dir' attribute"))?;
                            settings.search_paths.push(base_dir.join(dir));
                        }
                        b"snippet" => {
                            let id = attrs.get("id")
                                .ok_or_else(|| LayoutError::format(path, "snippet missing 'id' attribute"))?;
                            let id = id.parse::<u32>()
                                .map_err(|_| LayoutError::format(path, format!("invalid snippet id: {}", id)))?;
                            settings.snippets.insert(id, Snippet {
                                label: attrs.remove("label").unwrap_or_default(),
                                text: attrs.remove("text").unwrap_or_default(),
                            });
                        }
                        b"label_override" => {
                            let key = attrs.remove("key")
                                .ok_or_else(|| LayoutError::format(path, "label_override missing 'key' attribute"))?;
                            settings.label_overrides.insert(key, LabelOverride {
                                label: attrs.remove("label").unwrap_or_default(),
                                group: attrs.remove("group").unwrap_or_default(),
                            });
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(LayoutError::xml(path, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(settings)
    }
}

/// Write the embedded default settings to `path`, creating its directory
pub fn ensure_default_settings(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("CONFIG: failed to create config directory: {}", e);
            return;
        }
    }

    match fs::write(path, DEFAULT_SETTINGS_XML) {
        Ok(()) => info!("CONFIG: deployed embedded default to {}", path.display()),
        Err(e) => warn!("CONFIG: failed to deploy default settings: {}", e),
    }
}

/// Get embedded default settings content
pub fn default_settings_xml() -> &'static str {
    DEFAULT_SETTINGS_XML
}

// ============================================================================
// SECTION 5: Include resolution
// ============================================================================

impl LayoutFinder for LayoutSettings {
    fn find_layout_filename(&self, name: &str, purpose: &str) -> Result<PathBuf, LayoutError> {
        let candidate = Path::new(name);
        if candidate.is_absolute() {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
        } else if let Some(found) = self.search_paths.iter()
            .map(|dir| dir.join(candidate))
            .find(|p| p.is_file())
        {
            return Ok(found);
        }

        Err(LayoutError::resource(candidate, format!("{} '{}' not found in search paths", purpose, name)))
    }
}
