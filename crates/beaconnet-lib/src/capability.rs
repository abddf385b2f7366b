//! Techbox upgrades and capability aggregation.
//!
//! A beacon's capabilities are the union of every *activated* techbox on its
//! vessel. Duplicate hardware counts once; the Jumpdrive model carries the
//! shielding capability intrinsically.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::beacon::BeaconModel;

/// One upgrade a techbox can provide.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Capability {
    /// Inertial matching: arrival velocity matches the destination frame.
    #[serde(rename = "AMU")]
    #[strum(serialize = "AMU")]
    Amu,
    /// Shielding: crew and high-energy cargo survive the transfer.
    #[serde(rename = "HCU")]
    #[strum(serialize = "HCU")]
    Hcu,
    /// Gravimetric: raises the gravity tolerance by 25%.
    #[serde(rename = "GMU")]
    #[strum(serialize = "GMU")]
    Gmu,
    /// Coil array: 10% discount on drift-free transfers.
    #[serde(rename = "SCU")]
    #[strum(serialize = "SCU")]
    Scu,
}

impl Capability {
    /// Bit this capability occupies in the inventory mask.
    pub const fn bit(self) -> u8 {
        match self {
            Capability::Amu => 1,
            Capability::Hcu => 2,
            Capability::Gmu => 4,
            Capability::Scu => 8,
        }
    }
}

/// Set of capabilities, stored as the inventory bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Inventory mask: AMU=1, HCU=2, GMU=4, SCU=8.
    pub fn inventory_mask(self) -> u8 {
        self.0
    }

    /// Rebuild a set from a persisted mask, ignoring unknown bits.
    pub fn from_mask(mask: u8) -> Self {
        Capability::iter()
            .filter(|c| mask & c.bit() != 0)
            .fold(Self::empty(), Self::with)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<&'static str> = self.iter().map(<&'static str>::from).collect();
        f.write_str(&names.join(","))
    }
}

/// Attachable upgrade module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Techbox {
    pub model: Capability,
    #[serde(default)]
    pub activated: bool,
}

impl Techbox {
    pub fn new(model: Capability) -> Self {
        Self {
            model,
            activated: false,
        }
    }

    /// Operator toggle on.
    pub fn activate(&mut self) {
        self.activated = true;
    }

    /// Operator toggle off.
    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    pub fn status(&self) -> String {
        if self.activated {
            format!("{} Active.", self.model)
        } else {
            format!("{} Inactive.", self.model)
        }
    }
}

/// Aggregate the capabilities a beacon of `model` gains from `techboxes`.
pub fn aggregate<'a, I>(model: BeaconModel, techboxes: I) -> CapabilitySet
where
    I: IntoIterator<Item = &'a Techbox>,
{
    let mut set = CapabilitySet::empty();
    if model == BeaconModel::Jumpdrive {
        set.insert(Capability::Hcu);
    }
    techboxes
        .into_iter()
        .filter(|t| t.activated)
        .fold(set, |acc, t| acc.with(t.model))
}
