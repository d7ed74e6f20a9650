// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Geometry Cache
///
/// Key rectangles come from companion SVG documents. Each file is read at
/// most once per top-level load; the cache is owned by the load and dropped
/// with it, on success and on error alike.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::olgd_dom::XmlElement;
use crate::olge_error::LayoutError;
use crate::olgt_types::Rect;

/// Rectangle id → rectangle, for one geometry file
pub type GeometryIndex = HashMap<String, Rect>;

#[derive(Debug, Default)]
pub struct GeometryCache {
    files: HashMap<PathBuf, GeometryIndex>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles of `filename`, resolved against `layout_dir`
    pub fn get(&mut self, layout_dir: &Path, filename: &str) -> Result<&GeometryIndex, LayoutError> {
        let path = layout_dir.join(filename);
        if !self.files.contains_key(&path) {
            let index = load_geometry(&path)?;
            debug!("SVG: loaded {} rects from {}", index.len(), path.display());
            self.files.insert(path.clone(), index);
        }
        Ok(&self.files[&path])
    }

    /// Number of distinct files read so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Read every `rect` element of an SVG document
pub fn load_geometry(path: &Path) -> Result<GeometryIndex, LayoutError> {
    let svg = XmlElement::load(path)
        .map_err(|e| LayoutError::resource(path, e.to_string()))?;
    parse_geometry(&svg, path)
}

pub fn parse_geometry(svg: &XmlElement, path: &Path) -> Result<GeometryIndex, LayoutError> {
    let mut index = GeometryIndex::new();

    for rect in svg.descendants("rect") {
        let id = rect.attr("id")
            .ok_or_else(|| LayoutError::resource(path, "rect without 'id' attribute"))?;

        let coord = |name: &str| -> Result<f64, LayoutError> {
            let value = rect.attr(name).ok_or_else(|| {
                LayoutError::resource(path, format!("rect '{}' missing '{}' attribute", id, name))
            })?;
            value.trim().parse::<f64>().map_err(|_| {
                LayoutError::resource(path, format!("rect '{}' has invalid {}: {}", id, name, value))
            })
        };

        let r = Rect::new(coord("x")?, coord("y")?, coord("width")?, coord("height")?);
        index.insert(id.to_string(), r);
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SVG: &str = r#"<?xml version="1.0"?>
        <svg xmlns="http://www.w3.org/2000/svg">
            <g>
                <rect id="A" x="0" y="0" width="18" height="20"/>
                <rect id="SPCE" x="20.5" y="22" width="100" height="20"/>
            </g>
        </svg>"#;

    #[test]
    fn test_parse_rects() {
        let svg = XmlElement::parse(SVG, Path::new("t.svg")).unwrap();
        let index = parse_geometry(&svg, Path::new("t.svg")).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index["SPCE"], Rect::new(20.5, 22.0, 100.0, 20.0));
    }

    #[test]
    fn test_missing_coordinate_is_error() {
        let svg = XmlElement::parse(r#"<svg><rect id="A" x="0" y="0" width="1"/></svg>"#, Path::new("t.svg")).unwrap();
        let err = parse_geometry(&svg, Path::new("t.svg")).unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_cache_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("k.svg"), SVG).unwrap();

        let mut cache = GeometryCache::new();
        assert_eq!(cache.get(dir.path(), "k.svg").unwrap().len(), 2);

        // A cached file no longer needs to exist on disk
        fs::remove_file(dir.path().join("k.svg")).unwrap();
        assert!(cache.get(dir.path(), "k.svg").unwrap().contains_key("A"));
        assert_eq!(cache.len(), 1);

        assert!(cache.get(dir.path(), "other.svg").is_err());
    }
}
