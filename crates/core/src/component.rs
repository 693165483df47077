//! Component: the record type stored and exchanged by the catalog
//!
//! A component describes one physical bin of stock. Several bins holding
//! electrically interchangeable parts can share an equivalence set; the
//! grouping is represented purely by a shared `equiv_set` value, not by any
//! linked structure.

use serde::{Deserialize, Serialize};

/// Identifier of a component record. Caller-assigned, unique, immutable.
///
/// Also doubles as the default equivalence-set identifier: an ungrouped
/// component has `equiv_set == id`.
pub type ComponentId = i64;

/// One inventory bin.
///
/// All content fields are free-form text. `quantity` stays a string as the
/// unit and format vary per bin ("100", "~2 reels", "1 tube").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Unique record id. Never changed after the record exists.
    pub id: ComponentId,
    /// Equivalence group this component belongs to. Defaults to `id`
    /// (a singleton group of itself); only the dedicated join/leave
    /// operations may change it.
    #[serde(default)]
    pub equiv_set: ComponentId,
    /// Part value, e.g. "10k" or "100nF".
    #[serde(default)]
    pub value: String,
    /// Part category, e.g. "Resistor".
    #[serde(default)]
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Stock count as text.
    #[serde(default)]
    pub quantity: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Link to a datasheet.
    #[serde(default)]
    pub datasheet_url: String,
    /// Package footprint, e.g. "TO-220".
    #[serde(default)]
    pub footprint: String,
    /// Physical bin size classifier, if known.
    #[serde(default)]
    pub drawersize: Option<i64>,
}

impl Component {
    /// Create an empty record for the given id.
    ///
    /// The fresh record is in its default singleton group
    /// (`equiv_set == id`); all content fields are empty.
    pub fn new(id: ComponentId) -> Self {
        Component {
            id,
            equiv_set: id,
            value: String::new(),
            category: String::new(),
            description: String::new(),
            quantity: String::new(),
            notes: String::new(),
            datasheet_url: String::new(),
            footprint: String::new(),
            drawersize: None,
        }
    }

    /// True if this component is in its default singleton group.
    pub fn is_singleton_set(&self) -> bool {
        self.equiv_set == self.id
    }
}

/// Pre-defined set of categories known to entry forms.
pub const AVAILABLE_CATEGORIES: &[&str] = &[
    "Resistor",
    "Potentiometer",
    "R-Network",
    "Capacitor (C)",
    "Aluminum Cap",
    "Inductor (L)",
    "Diode (D)",
    "Power Diode",
    "LED",
    "Transistor",
    "Mosfet",
    "IGBT",
    "Integrated Circuit (IC)",
    "IC Analog",
    "IC Digital",
    "Connector",
    "Socket",
    "Switch",
    "Fuse",
    "Mounting",
    "Heat Sink",
    "Microphone",
    "Transformer",
    "? MYSTERY",
];
