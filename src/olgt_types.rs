// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Layout Value Types
///
/// Plain value types shared by every stage of layout loading: format versions,
/// rectangles, key types and codes, modifiers and the sticky/action enums.
/// Nothing here touches the file system.

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;

// ============================================================================
// SECTION 1: Format versions
// ============================================================================

/// Layout document format, compared lexicographically (major first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u32,
    pub minor: u32,
}

impl FormatVersion {
    /// Documents without a format attribute
    pub const LEGACY: FormatVersion = FormatVersion::new(1, 0);
    /// Initial layout-tree format
    pub const LAYOUT_TREE: FormatVersion = FormatVersion::new(2, 0);
    /// Scanner overhaul: scannable, scan_priority, no scan columns
    pub const SCANNER: FormatVersion = FormatVersion::new(2, 1);
    /// key.action, key.sticky_behavior, keycodes for modifiers
    pub const V2_2: FormatVersion = FormatVersion::new(2, 2);
    pub const CURRENT: FormatVersion = FormatVersion::V2_2;

    pub const fn new(major: u32, minor: u32) -> Self {
        FormatVersion { major, minor }
    }

    /// Parse "major.minor". Missing or non-numeric components read as 0.
    pub fn parse(s: &str) -> Self {
        let mut components = s.trim().split('.');
        let major = components.next().and_then(|c| c.parse().ok());
        let minor = components.next().and_then(|c| c.parse().ok());
        match (major, minor) {
            (Some(major), Some(minor)) => FormatVersion { major, minor },
            (Some(major), None) => FormatVersion { major, minor: 0 },
            _ => FormatVersion { major: 0, minor: 0 },
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// ============================================================================
// SECTION 2: Geometry
// ============================================================================

/// Rectangle in abstract layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.w, self.h)
    }
}

// ============================================================================
// SECTION 3: Key type and code
// ============================================================================

/// What a key sends when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Char,
    Keysym,
    KeypressName,
    Macro,
    Script,
    Keycode,
    Button,
    LegacyModifier,
    /// Decorative, draw_only keys
    Undefined,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Char => "char",
            KeyType::Keysym => "keysym",
            KeyType::KeypressName => "keypress_name",
            KeyType::Macro => "macro",
            KeyType::Script => "script",
            KeyType::Keycode => "keycode",
            KeyType::Button => "button",
            KeyType::LegacyModifier => "legacy_modifier",
            KeyType::Undefined => "undefined",
        }
    }
}

/// Payload matching the key type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    None,
    Text(String),
    Number(u32),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::None => write!(f, "-"),
            KeyCode::Text(s) => write!(f, "{:?}", s),
            KeyCode::Number(n) => write!(f, "{}", n),
        }
    }
}

// ============================================================================
// SECTION 4: Modifiers and masks
// ============================================================================

pub const MOD_SHIFT: u32 = 1 << 0;
pub const MOD_CAPS: u32 = 1 << 1;
pub const MOD_CTRL: u32 = 1 << 2;
pub const MOD_ALT: u32 = 1 << 3;
pub const MOD_NUMLK: u32 = 1 << 4;
pub const MOD_MOD3: u32 = 1 << 5;
pub const MOD_SUPER: u32 = 1 << 6;
pub const MOD_ALTGR: u32 = 1 << 7;

/// Modifiers that change what a key's label shows
pub const LABEL_MODIFIERS: u32 = MOD_SHIFT | MOD_CAPS | MOD_NUMLK | MOD_ALTGR;

/// Masks used for placeholder and legacy per-attribute labels
pub const CANONICAL_LABEL_MASKS: [u32; 5] = [0, 1, 2, 128, 129];

lazy_static! {
    /// Every combination of the label-relevant modifier bits
    pub static ref LABEL_MODIFIER_MASKS: Vec<u32> = permute_mask(LABEL_MODIFIERS);
}

/// Return all combinations of the bits set in `mask`, in counting order
pub fn permute_mask(mask: u32) -> Vec<u32> {
    let bits: Vec<u32> = (0..8).map(|bit| 1u32 << bit).filter(|b| mask & b != 0).collect();
    (0..(1u32 << bits.len()))
        .map(|i| {
            bits.iter()
                .enumerate()
                .filter(|(n, _)| i & (1u32 << *n) != 0)
                .fold(0, |m, (_, b)| m | b)
        })
        .collect()
}

/// Modifier a key latches or locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Caps,
    Control,
    Mod1,
    Mod2,
    Mod3,
    Mod4,
    Mod5,
}

impl Modifier {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "shift" => Modifier::Shift,
            "caps" => Modifier::Caps,
            "control" => Modifier::Control,
            "mod1" => Modifier::Mod1,  // left alt
            "mod2" => Modifier::Mod2,  // numlock
            "mod3" => Modifier::Mod3,
            "mod4" => Modifier::Mod4,  // super
            "mod5" => Modifier::Mod5,  // alt gr
            _ => return None,
        })
    }

    pub fn mask(&self) -> u32 {
        match self {
            Modifier::Shift => MOD_SHIFT,
            Modifier::Caps => MOD_CAPS,
            Modifier::Control => MOD_CTRL,
            Modifier::Mod1 => MOD_ALT,
            Modifier::Mod2 => MOD_NUMLK,
            Modifier::Mod3 => MOD_MOD3,
            Modifier::Mod4 => MOD_SUPER,
            Modifier::Mod5 => MOD_ALTGR,
        }
    }
}

// ============================================================================
// SECTION 5: Key behavior enums
// ============================================================================

/// How key strokes are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Press on button down, release on up
    SingleStroke,
    /// Press and release on button up
    DelayedStroke,
    /// Press and release on both button down and up
    DoubleStroke,
}

impl KeyAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "single-stroke" => Some(KeyAction::SingleStroke),
            "delayed-stroke" => Some(KeyAction::DelayedStroke),
            "double-stroke" => Some(KeyAction::DoubleStroke),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickyBehavior {
    Cycle,
    DoubleClick,
    LatchOnly,
    LockOnly,
}

impl StickyBehavior {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cycle" => Some(StickyBehavior::Cycle),
            "dblclick" => Some(StickyBehavior::DoubleClick),
            "latch" => Some(StickyBehavior::LatchOnly),
            "lock" => Some(StickyBehavior::LockOnly),
            _ => None,
        }
    }
}

/// Modifier mask → label; `None` marks an explicitly empty label
pub type Labels = BTreeMap<u32, Option<String>>;

/// Raw attribute set of a layout element, template or keysym rule
pub type Attributes = BTreeMap<String, String>;
