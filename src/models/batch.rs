// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch record: the unit the ledger engine reads and persists as a whole.

use serde::{Deserialize, Serialize};

use crate::models::Activity;

/// Nominal starting volume when a batch declares none.
pub const DEFAULT_BATCH_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Nominal starting volume as entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Batch {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            volume: None,
            activities: Vec::new(),
        }
    }

    /// Starting volume for the ledger fold.
    ///
    /// Falls back to `fallback` when the batch volume is absent, not a
    /// number, or not positive.
    pub fn nominal_volume(&self, fallback: f64) -> f64 {
        let Some(raw) = self.volume.as_deref() else {
            return fallback;
        };
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                tracing::warn!(
                    batch_id = %self.id,
                    volume = raw,
                    fallback,
                    "Invalid batch volume, using fallback"
                );
                fallback
            }
        }
    }

    /// Copy of this batch carrying a new activity collection.
    pub fn with_activities(&self, activities: Vec<Activity>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            volume: self.volume.clone(),
            activities,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}
