//! Travel modes

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraverseMode {
    Walk,
    Bicycle,
    Car,
    Bus,
    Tram,
    Subway,
    Rail,
    Ferry,
}

impl TraverseMode {
    pub const ALL: [TraverseMode; 8] = [
        TraverseMode::Walk,
        TraverseMode::Bicycle,
        TraverseMode::Car,
        TraverseMode::Bus,
        TraverseMode::Tram,
        TraverseMode::Subway,
        TraverseMode::Rail,
        TraverseMode::Ferry,
    ];

    pub fn is_driving(self) -> bool {
        self == TraverseMode::Car
    }

    pub fn is_transit(self) -> bool {
        matches!(
            self,
            TraverseMode::Bus
                | TraverseMode::Tram
                | TraverseMode::Subway
                | TraverseMode::Rail
                | TraverseMode::Ferry
        )
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for TraverseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraverseMode::Walk => "WALK",
            TraverseMode::Bicycle => "BICYCLE",
            TraverseMode::Car => "CAR",
            TraverseMode::Bus => "BUS",
            TraverseMode::Tram => "TRAM",
            TraverseMode::Subway => "SUBWAY",
            TraverseMode::Rail => "RAIL",
            TraverseMode::Ferry => "FERRY",
        };
        f.write_str(name)
    }
}

/// Set of travel modes, serialized as a list
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TraverseMode>", into = "Vec<TraverseMode>")]
pub struct TraverseModeSet {
    mask: u16,
}

impl TraverseModeSet {
    pub fn empty() -> Self {
        Self { mask: 0 }
    }

    pub fn all() -> Self {
        TraverseMode::ALL.into_iter().collect()
    }

    /// Walking plus every transit mode
    pub fn walk_and_transit() -> Self {
        TraverseMode::ALL
            .into_iter()
            .filter(|m| *m == TraverseMode::Walk || m.is_transit())
            .collect()
    }

    pub fn contains(&self, mode: TraverseMode) -> bool {
        self.mask & mode.bit() != 0
    }

    pub fn insert(&mut self, mode: TraverseMode) {
        self.mask |= mode.bit();
    }

    pub fn remove(&mut self, mode: TraverseMode) {
        self.mask &= !mode.bit();
    }

    pub fn intersects(&self, other: &TraverseModeSet) -> bool {
        self.mask & other.mask != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn walk(&self) -> bool {
        self.contains(TraverseMode::Walk)
    }

    pub fn bicycle(&self) -> bool {
        self.contains(TraverseMode::Bicycle)
    }

    pub fn car(&self) -> bool {
        self.contains(TraverseMode::Car)
    }

    pub fn is_transit(&self) -> bool {
        self.iter().any(TraverseMode::is_transit)
    }

    pub fn iter(&self) -> impl Iterator<Item = TraverseMode> + '_ {
        TraverseMode::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<TraverseMode> for TraverseModeSet {
    fn from_iter<I: IntoIterator<Item = TraverseMode>>(iter: I) -> Self {
        let mut set = TraverseModeSet::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl From<Vec<TraverseMode>> for TraverseModeSet {
    fn from(modes: Vec<TraverseMode>) -> Self {
        modes.into_iter().collect()
    }
}

impl From<TraverseModeSet> for Vec<TraverseMode> {
    fn from(set: TraverseModeSet) -> Self {
        set.iter().collect()
    }
}

impl From<TraverseMode> for TraverseModeSet {
    fn from(mode: TraverseMode) -> Self {
        std::iter::once(mode).collect()
    }
}

impl fmt::Debug for TraverseModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_and_transit() {
        let modes = TraverseModeSet::walk_and_transit();
        assert!(modes.walk());
        assert!(modes.is_transit());
        assert!(!modes.car());
        assert!(!modes.bicycle());
    }

    #[test]
    fn test_deserialize_from_list() {
        let modes: TraverseModeSet = serde_json::from_str(r#"["WALK", "CAR"]"#).unwrap();
        assert!(modes.walk() && modes.car());
        assert!(!modes.is_transit());
        assert_eq!(
            serde_json::to_string(&modes).unwrap(),
            r#"["WALK","CAR"]"#
        );
    }
}
