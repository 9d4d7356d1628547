//! Prop capabilities
//!
//! Partition queries select props by what they can do. A capability set is
//! a plain membership set over the `Capability` enum; queries match a prop
//! when its set shares at least one capability with the query mask.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayerError;

/// Something a prop is able to take part in
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Renders through `Prop::draw`
    Draw,
    /// Renders debug overlays through `Prop::draw_debug`
    DrawDebug,
    /// Returned by picking and other non-render queries
    Gather,
}

impl Capability {
    pub const COUNT: usize = 3;

    pub const ALL: [Capability; Self::COUNT] = [Self::Draw, Self::DrawDebug, Self::Gather];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::Draw => 0,
            Self::DrawDebug => 1,
            Self::Gather => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::DrawDebug => "draw_debug",
            Self::Gather => "gather",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| LayerError::InvalidCapability(s.to_string()))
    }
}

/// Set of capabilities
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    members: [bool; Capability::COUNT],
}

impl CapabilitySet {
    pub const EMPTY: Self = Self { members: [false; Capability::COUNT] };

    /// What a layer asks its partition for when drawing
    pub const DRAWABLE: Self = Self { members: [true, true, false] };

    pub const ALL: Self = Self { members: [true; Capability::COUNT] };

    #[inline]
    pub fn contains(&self, capability: Capability) -> bool {
        self.members[capability.slot()]
    }

    #[inline]
    pub fn insert(&mut self, capability: Capability) {
        self.members[capability.slot()] = true;
    }

    #[inline]
    pub fn remove(&mut self, capability: Capability) {
        self.members[capability.slot()] = false;
    }

    /// Builder form of `insert`
    #[inline]
    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    /// True when the two sets share a member
    pub fn intersects(&self, other: &CapabilitySet) -> bool {
        self.iter().any(|c| other.contains(c))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Parse a list of capability names
    pub fn parse<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, LayerError> {
        names
            .into_iter()
            .map(str::parse::<Capability>)
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl From<Capability> for CapabilitySet {
    fn from(capability: Capability) -> Self {
        Self::EMPTY.with(capability)
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let members = Vec::<Capability>::deserialize(deserializer)?;
        Ok(members.into_iter().collect())
    }
}
