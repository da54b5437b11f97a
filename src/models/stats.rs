//! Gravity summary for batch dashboards.
//!
//! Computed on demand from the activity collection; never stored as engine
//! state.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{sorted_readings, Activity};
use crate::services::gravity;

/// Display statistics for one batch's ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct GravitySummary {
    /// Number of gravity readings in the ledger
    pub readings: u32,
    pub original_gravity: Option<f64>,
    pub final_gravity: Option<f64>,
    pub one_third_break: Option<f64>,
    /// Cumulative gravity drop, ignoring rises from step feeding
    pub gravity_drop: f64,
    pub current_abv: Option<f64>,
    pub potential_abv: Option<f64>,
    /// Running volume after the last reading
    pub current_volume: Option<f64>,
}

impl GravitySummary {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let readings = sorted_readings(activities);

        Self {
            readings: readings.len() as u32,
            original_gravity: gravity::original_gravity(&readings),
            final_gravity: gravity::final_gravity(&readings),
            one_third_break: gravity::one_third_break(&readings),
            gravity_drop: gravity::gravity_drop(&readings),
            current_abv: gravity::current_abv(&readings),
            potential_abv: gravity::potential_abv(&readings),
            current_volume: readings.last().and_then(|r| r.volume),
        }
    }
}
