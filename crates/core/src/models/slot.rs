use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::time;

/// A derived candidate start time; recomputed per query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "time", with = "time::hhmm")]
    pub start: NaiveTime,
    pub available: bool,
}
