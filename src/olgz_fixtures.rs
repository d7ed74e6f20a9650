// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Test fixtures: layout documents on disk and a scripted keyboard driver

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::olge_error::DriverError;
use crate::olgx_context::KeyboardDriver;

/// Rectangles used by most fixture layouts
pub(crate) const KEYS_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="60">
    <rect id="AC01" x="0" y="0" width="18" height="20"/>
    <rect id="AC02" x="20" y="0" width="18" height="20"/>
    <rect id="AC03" x="40" y="0" width="18" height="20"/>
    <rect id="SPCE" x="0" y="22" width="100" height="20"/>
    <rect id="CAPS" x="0" y="44" width="30" height="20"/>
    <rect id="hide" x="120" y="0" width="18" height="20"/>
</svg>
"#;

/// Temporary directory holding layout and geometry files
pub(crate) struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Fixture { dir: tempfile::tempdir().unwrap() };
        fixture.write("keys.svg", KEYS_SVG);
        fixture
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Driver with a fixed keysym per mask: mask 0 → lowercase 'a', others → 'A'
pub(crate) struct ScriptedDriver;

impl KeyboardDriver for ScriptedDriver {
    fn labels_from_keycode(&self, keycode: u32, masks: &[u32]) -> Result<Vec<String>, DriverError> {
        Ok(masks.iter().map(|&m| if m == 0 { format!("k{}", keycode) } else { format!("K{}", keycode) }).collect())
    }

    fn keysyms_from_keycode(&self, _keycode: u32, masks: &[u32]) -> Result<Vec<u32>, DriverError> {
        Ok(masks.iter().map(|&m| if m == 0 { 0x61 } else { 0x41 }).collect())
    }
}
