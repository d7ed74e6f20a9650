// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

//! On-screen keyboard layout resolution.
//!
//! Loads layout documents (boxes, panels, keys, templates, keysym rules and
//! includes) into a resolved, immutable layout tree whose keys carry geometry
//! read from companion SVG files. Legacy pane layouts are migrated on load.

// Value types and errors
pub mod olgt_types;
pub mod olge_error;

// Documents and trees
pub mod olgd_dom;
pub mod olgn_node;
pub mod olgs_svg;

// Resolution
pub mod olgr_scope;
pub mod olgk_key;
pub mod olgb_build;
mod olgl_legacy;

// Collaborators and settings
pub mod olgx_context;
pub mod olgc_config;

// Layout files on disk
pub mod olgf_files;

#[cfg(test)]
mod olgz_fixtures;

pub use olgb_build::LayoutLoader;
pub use olgc_config::LayoutSettings;
pub use olge_error::{DriverError, LayoutError};
pub use olgn_node::{LayoutNode, LayoutRoot, LayoutTree, NodeId, NodeKind};
pub use olgx_context::{KeyboardDriver, LayoutFinder, Translator};
