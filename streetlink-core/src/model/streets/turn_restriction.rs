//! Turn restrictions attached to the edge a turn starts from

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::Time;
use crate::model::{EdgeId, TraverseModeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnRestrictionKind {
    /// The turn onto `to` is the only one allowed
    OnlyTurn,
    /// The turn onto `to` is forbidden
    NoTurn,
}

/// When a restriction applies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RestrictionTime {
    #[default]
    Always,
    /// A weekly window in local time. A window with `end < start` wraps
    /// past midnight and belongs to the day it starts on.
    Repeating {
        days: Vec<Weekday>,
        start: NaiveTime,
        end: NaiveTime,
        utc_offset_seconds: i32,
    },
}

impl RestrictionTime {
    pub fn is_active(&self, time: Time) -> bool {
        let Self::Repeating {
            days,
            start,
            end,
            utc_offset_seconds,
        } = self
        else {
            return true;
        };

        let Some(offset) = FixedOffset::east_opt(*utc_offset_seconds) else {
            log::warn!("Invalid UTC offset {utc_offset_seconds} in turn restriction");
            return true;
        };
        let Some(utc) = DateTime::from_timestamp(time, 0) else {
            return true;
        };
        let local = utc.with_timezone(&offset);
        let clock = local.time();
        let day = local.weekday();

        if start <= end {
            days.contains(&day) && clock >= *start && clock < *end
        } else {
            (days.contains(&day) && clock >= *start) || (days.contains(&day.pred()) && clock < *end)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnRestriction {
    pub to: EdgeId,
    pub modes: TraverseModeSet,
    pub kind: TurnRestrictionKind,
    pub time: RestrictionTime,
}

impl TurnRestriction {
    pub fn new(to: EdgeId, modes: TraverseModeSet, kind: TurnRestrictionKind) -> Self {
        Self {
            to,
            modes,
            kind,
            time: RestrictionTime::Always,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: RestrictionTime) -> Self {
        self.time = time;
        self
    }

    pub fn is_active(&self, time: Time) -> bool {
        self.time.is_active(time)
    }
}
