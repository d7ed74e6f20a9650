// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Loader Collaborators
///
/// Interfaces the loader consumes but does not implement itself: the live
/// keyboard driver, include path resolution and label translation.

use std::path::PathBuf;

use crate::olge_error::{DriverError, LayoutError};

/// Runtime keyboard mapping queries. Both calls return one entry per mask,
/// in the order the masks were given.
pub trait KeyboardDriver {
    fn labels_from_keycode(&self, keycode: u32, masks: &[u32]) -> Result<Vec<String>, DriverError>;
    fn keysyms_from_keycode(&self, keycode: u32, masks: &[u32]) -> Result<Vec<u32>, DriverError>;
}

/// Resolves file names referenced by `include` elements
pub trait LayoutFinder {
    /// `purpose` only serves diagnostics, e.g. "layout include"
    fn find_layout_filename(&self, name: &str, purpose: &str) -> Result<PathBuf, LayoutError>;
}

/// Localization hook applied to non-empty labels
pub trait Translator {
    fn translate(&self, text: &str) -> String;
}

/// Leaves every string as it is
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}
