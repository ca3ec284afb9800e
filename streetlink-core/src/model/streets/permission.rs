use serde::{Deserialize, Serialize};

use crate::model::{TraverseMode, TraverseModeSet};

/// Which street modes may use a street edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StreetTraversalPermission {
    pub pedestrian: bool,
    pub bicycle: bool,
    pub car: bool,
}

impl StreetTraversalPermission {
    pub const NONE: Self = Self::new(false, false, false);
    pub const PEDESTRIAN: Self = Self::new(true, false, false);
    pub const BICYCLE: Self = Self::new(false, true, false);
    pub const PEDESTRIAN_AND_BICYCLE: Self = Self::new(true, true, false);
    pub const CAR: Self = Self::new(false, false, true);
    pub const PEDESTRIAN_AND_CAR: Self = Self::new(true, false, true);
    pub const BICYCLE_AND_CAR: Self = Self::new(false, true, true);
    pub const ALL: Self = Self::new(true, true, true);

    pub const fn new(pedestrian: bool, bicycle: bool, car: bool) -> Self {
        Self {
            pedestrian,
            bicycle,
            car,
        }
    }

    pub fn allows(&self, mode: TraverseMode) -> bool {
        match mode {
            TraverseMode::Walk => self.pedestrian,
            TraverseMode::Bicycle => self.bicycle,
            TraverseMode::Car => self.car,
            _ => false,
        }
    }

    /// True if any of the modes is allowed
    pub fn allows_any(&self, modes: &TraverseModeSet) -> bool {
        modes.iter().any(|mode| self.allows(mode))
    }
}
