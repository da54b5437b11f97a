// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Batch activity model for storage and the ledger engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Topic tag of an activity.
///
/// Only `Gravity` and `Addition` take part in the ledger; the rest are
/// carried through every mutation untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    Gravity,
    Addition,
    YeastPitch,
    Nutrient,
    DateStarted,
    DateRacked,
    DateBottled,
    Note,
    /// Any other tag, kept verbatim
    #[serde(untagged)]
    Other(String),
}

/// Stored activity record.
///
/// For gravity readings `description` holds the gravity as a numeric string
/// and `abv`/`volume` cache the ledger state right after the reading. Those
/// cached fields are written by the cascade only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique activity ID
    pub id: String,
    /// Owning batch ID
    pub batch_id: String,
    /// When the event happened
    pub date: DateTime<Utc>,
    /// Free text, or the gravity value for gravity readings
    pub description: String,
    pub topic: Topic,
    /// Linked reminder, owned by the alert subsystem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    /// Addition that generated this gravity reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addition_activity_id: Option<String>,
    /// Alcohol percentage of what was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_abv: Option<String>,
    /// Gravity of what was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_gravity: Option<String>,
    /// Volume added (positive) or removed (negative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_volume: Option<String>,
    /// Running ABV after this reading (derived)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
    /// Running volume after this reading (derived)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Activity {
    /// Create a bare activity with no ledger fields set.
    pub fn new(
        id: impl Into<String>,
        batch_id: impl Into<String>,
        topic: Topic,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            batch_id: batch_id.into(),
            date,
            description: description.into(),
            topic,
            alert_id: None,
            addition_activity_id: None,
            added_abv: None,
            added_gravity: None,
            added_volume: None,
            abv: None,
            volume: None,
        }
    }

    pub fn is_reading(&self) -> bool {
        self.topic == Topic::Gravity
    }

    pub fn is_addition(&self) -> bool {
        self.topic == Topic::Addition
    }

    /// Whether this is the gravity reading generated by `addition_id`.
    pub fn is_linked_to(&self, addition_id: &str) -> bool {
        self.is_reading() && self.addition_activity_id.as_deref() == Some(addition_id)
    }
}

/// Indices of the gravity readings in `activities`, in ledger order.
///
/// Readings sort by timestamp; the sort is stable, so readings sharing a
/// timestamp keep their position in the collection (creation order).
pub fn ledger_order(activities: &[Activity]) -> Vec<usize> {
    let mut order: Vec<usize> = activities
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_reading())
        .map(|(i, _)| i)
        .collect();
    order.sort_by_key(|&i| activities[i].date);
    order
}

/// Gravity readings of `activities` in ledger order.
pub fn sorted_readings(activities: &[Activity]) -> Vec<&Activity> {
    ledger_order(activities)
        .into_iter()
        .map(|i| &activities[i])
        .collect()
}
