// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mutation payloads accepted by the ledger façade.
//!
//! Numeric fields stay strings here, exactly as entered; the cascade parses
//! and validates them before touching the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A new observed gravity reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    /// Caller-assigned ID; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub date: DateTime<Utc>,
    /// Observed gravity
    pub description: String,
    #[serde(default)]
    pub alert_id: Option<String>,
}

/// Edit of an existing gravity reading. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct ReadingUpdate {
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alert_id: Option<String>,
    #[serde(default)]
    pub added_abv: Option<String>,
    #[serde(default)]
    pub added_gravity: Option<String>,
    #[serde(default)]
    pub added_volume: Option<String>,
}

/// A new addition (top-off, backsweetening, fortification, removal).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct NewAddition {
    #[serde(default)]
    pub id: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub added_abv: Option<String>,
    #[serde(default)]
    pub added_gravity: Option<String>,
    #[serde(default)]
    pub added_volume: Option<String>,
    #[serde(default)]
    pub alert_id: Option<String>,
}

/// Edit of an existing addition. `None` leaves a field unchanged; an empty
/// string clears a numeric field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "camelCase")]
pub struct AdditionUpdate {
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub added_abv: Option<String>,
    #[serde(default)]
    pub added_gravity: Option<String>,
    #[serde(default)]
    pub added_volume: Option<String>,
}

/// One ledger mutation, as read from a command file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LedgerCommand {
    AddReading(NewReading),
    UpdateReading(ReadingUpdate),
    DeleteReading { id: String },
    AddAddition(NewAddition),
    UpdateAddition(AdditionUpdate),
    DeleteAddition { id: String },
    /// Re-derive the whole ledger from the first reading
    Recalculate,
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::AddReading(_) => "addReading",
            LedgerCommand::UpdateReading(_) => "updateReading",
            LedgerCommand::DeleteReading { .. } => "deleteReading",
            LedgerCommand::AddAddition(_) => "addAddition",
            LedgerCommand::UpdateAddition(_) => "updateAddition",
            LedgerCommand::DeleteAddition { .. } => "deleteAddition",
            LedgerCommand::Recalculate => "recalculate",
        }
    }
}
