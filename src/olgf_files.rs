// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Layout File Operations
///
/// Duplicating and deleting layouts on disk. A layout is its document plus
/// every geometry file referenced from a box, panel or key element; geometry
/// files are named "<basename>-<layer>.svg" and follow the layout on copy.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::olgd_dom::XmlElement;
use crate::olge_error::LayoutError;
use crate::olgt_types::FormatVersion;

fn is_layout_element(element: &XmlElement) -> bool {
    matches!(element.local_name(), "box" | "panel" | "key")
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Rename a geometry file for a new layout basename, keeping its layer part.
/// "path/old-Alpha.svg" becomes "new-Alpha.svg"; without a layer part the
/// fallback layer name is used.
pub fn replace_basename(filename: &str, new_basename: &str, fallback_layer: &str) -> String {
    let path = Path::new(filename);
    let name = file_stem(path);
    let ext = path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let layer = name.split('-').nth(1).unwrap_or(fallback_layer);
    format!("{}-{}{}", new_basename, layer, ext)
}

/// Write a copy of the layout at `src` to `dst` along with renamed copies of
/// its geometry files. Only layout tree documents can be copied.
pub fn copy_layout(src: &Path, dst: &Path) -> Result<(), LayoutError> {
    let src_dir = src.parent().map(Path::to_path_buf).unwrap_or_default();
    let dst_dir = dst.parent().map(Path::to_path_buf).unwrap_or_default();
    let dst_basename = file_stem(dst);
    info!("FILES: copying layout '{}' to '{}'", src.display(), dst.display());

    let mut dom = XmlElement::load(src)?;
    let format = dom.attr("format").map(FormatVersion::parse).unwrap_or(FormatVersion::LEGACY);
    if format < FormatVersion::LAYOUT_TREE {
        return Err(LayoutError::format(src, format!("copy failed, unsupported layout format '{}'", format)));
    }
    dom.set_attr("id", &dst_basename);

    // old name → new name, in document order
    let mut renamed: Vec<(String, String)> = Vec::new();
    let mut fallback_layers: HashMap<String, String> = HashMap::new();

    dom.walk_mut(&mut |element: &mut XmlElement| {
        if !is_layout_element(element) {
            return;
        }
        let Some(filename) = element.attr("filename").map(str::to_string) else {
            return;
        };

        let next_fallback = format!("Layer{}", fallback_layers.len());
        let fallback = fallback_layers.entry(filename.clone()).or_insert(next_fallback);
        let new_filename = replace_basename(&filename, &dst_basename, fallback);

        element.set_attr("filename", &new_filename);
        if !renamed.iter().any(|(old, _)| *old == filename) {
            renamed.push((filename, new_filename));
        }
    });

    dom.save(dst)?;

    for (old, new) in renamed {
        let from = resolve_in(&src_dir, &old);
        let to = resolve_in(&dst_dir, &new);
        info!("FILES: copying svg file '{}' to '{}'", from.display(), to.display());
        fs::copy(&from, &to).map_err(|e| LayoutError::io(&from, e))?;
    }

    Ok(())
}

/// Bare file names live next to their layout
fn resolve_in(dir: &Path, filename: &str) -> PathBuf {
    let path = Path::new(filename);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => path.to_path_buf(),
        _ => dir.join(path),
    }
}

/// Delete a layout document and every geometry file it references
pub fn remove_layout(path: &Path) -> Result<(), LayoutError> {
    for svg in layout_svg_filenames(path)? {
        info!("FILES: removing '{}'", svg.display());
        fs::remove_file(&svg).map_err(|e| LayoutError::io(&svg, e))?;
    }
    info!("FILES: removing '{}'", path.display());
    fs::remove_file(path).map_err(|e| LayoutError::io(path, e))
}

/// Distinct geometry files referenced by a layout, located in the layout's
/// own directory
pub fn layout_svg_filenames(path: &Path) -> Result<Vec<PathBuf>, LayoutError> {
    let dom = XmlElement::load(path)?;
    let layout_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut results: Vec<PathBuf> = Vec::new();
    dom.walk(&mut |element: &XmlElement| {
        if !is_layout_element(element) {
            return;
        }
        if let Some(name) = element.attr("filename").and_then(|f| Path::new(f).file_name()) {
            let resolved = layout_dir.join(name);
            if !results.contains(&resolved) {
                results.push(resolved);
            }
        }
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olgz_fixtures::{Fixture, KEYS_SVG};

    const LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<keyboard id="base" format="2.1">
  <box>
    <panel filename="base-Alpha.svg">
      <key id="AC01" char="a"/>
    </panel>
    <panel filename="base-Alpha.svg" layer="again"/>
    <panel filename="extra.svg">
      <key id="AC02" char="b"/>
    </panel>
  </box>
</keyboard>
"#;

    fn setup() -> Fixture {
        let fixture = Fixture::new();
        fixture.write("base.onboard", LAYOUT);
        fixture.write("base-Alpha.svg", KEYS_SVG);
        fixture.write("extra.svg", KEYS_SVG);
        fixture
    }

    #[test]
    fn test_replace_basename() {
        assert_eq!(replace_basename("base-Alpha.svg", "copy", "Layer0"), "copy-Alpha.svg");
        assert_eq!(replace_basename("dir/base-Alpha-x.svg", "copy", "Layer0"), "copy-Alpha.svg");
        assert_eq!(replace_basename("plain.svg", "copy", "Layer3"), "copy-Layer3.svg");
    }

    #[test]
    fn test_svg_filenames_are_distinct() {
        let fixture = setup();
        let files = layout_svg_filenames(&fixture.path("base.onboard")).unwrap();
        assert_eq!(files, vec![fixture.path("base-Alpha.svg"), fixture.path("extra.svg")]);
    }

    #[test]
    fn test_copy_rewrites_filenames() {
        let fixture = setup();
        copy_layout(&fixture.path("base.onboard"), &fixture.path("mine.onboard")).unwrap();

        let copy = XmlElement::load(&fixture.path("mine.onboard")).unwrap();
        assert_eq!(copy.attr("id"), Some("mine"));
        assert_eq!(copy.attr("format"), Some("2.1"));

        let names: Vec<&str> = copy.descendants("panel").into_iter().filter_map(|p| p.attr("filename")).collect();
        // extra.svg has no layer part and is the second distinct file seen
        assert_eq!(names, vec!["mine-Alpha.svg", "mine-Alpha.svg", "mine-Layer1.svg"]);

        assert!(fixture.path("mine-Alpha.svg").is_file());
        assert!(fixture.path("mine-Layer1.svg").is_file());
        assert_eq!(layout_svg_filenames(&fixture.path("mine.onboard")).unwrap().len(), 2);
    }

    #[test]
    fn test_copy_then_remove_leaves_original() {
        let fixture = setup();
        copy_layout(&fixture.path("base.onboard"), &fixture.path("dup.onboard")).unwrap();
        remove_layout(&fixture.path("dup.onboard")).unwrap();

        assert!(!fixture.path("dup.onboard").exists());
        assert!(!fixture.path("dup-Alpha.svg").exists());
        assert!(!fixture.path("dup-Layer1.svg").exists());

        assert_eq!(fs::read_to_string(fixture.path("base.onboard")).unwrap(), LAYOUT);
        assert!(fixture.path("base-Alpha.svg").is_file());
        assert!(fixture.path("extra.svg").is_file());
    }

    #[test]
    fn test_copy_rejects_legacy_layouts() {
        let fixture = Fixture::new();
        fixture.write("old.onboard", r#"<keyboard><pane id="p" filename="keys.svg"/></keyboard>"#);
        let err = copy_layout(&fixture.path("old.onboard"), &fixture.path("new.onboard")).unwrap_err();
        assert!(err.is_format_error());
        assert!(!fixture.path("new.onboard").exists());
    }
}
