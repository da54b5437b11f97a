// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blend calculator: one ledger step from a prior state and an event.
//!
//! Two physical processes update the ledger differently:
//! - an addition with positive volume mixes two liquids, so gravity and ABV
//!   become volume-weighted averages;
//! - anything else (an observation, a removal) leaves the mix alone, and
//!   alcohol accrues from the gravity drop since the prior point.

use validator::Validate;

use crate::error::{LedgerError, Result};
use crate::models::Activity;
use crate::services::gravity::{
    round_to, ABV_FACTOR, ABV_PLACES, GRAVITY_PLACES, VOLUME_PLACES, WATER_GRAVITY,
};

/// Running ledger state, kept at full precision between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerState {
    /// `None` before the first reading: there is nothing to drop from yet.
    pub gravity: Option<f64>,
    pub volume: f64,
    pub abv: f64,
}

/// Ledger state rounded for storage on a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredValues {
    pub gravity: f64,
    pub abv: f64,
    pub volume: f64,
}

impl LedgerState {
    /// State before the first reading of a batch.
    pub fn initial(nominal_volume: f64) -> Self {
        Self {
            gravity: None,
            volume: nominal_volume,
            abv: 0.0,
        }
    }

    pub fn stored(&self) -> StoredValues {
        StoredValues {
            gravity: round_to(self.gravity.unwrap_or(WATER_GRAVITY), GRAVITY_PLACES),
            abv: round_to(self.abv, ABV_PLACES),
            volume: round_to(self.volume, VOLUME_PLACES),
        }
    }
}

/// Inputs of one ledger step, parsed and range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Validate)]
pub struct BlendEvent {
    /// Signed: positive adds liquid, negative removes it
    pub added_volume: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub added_abv: Option<f64>,
    /// Honey and syrups sit well above any must; spirits well below water
    #[validate(range(min = 0.78, max = 2.0))]
    pub added_gravity: Option<f64>,
    /// Measured gravity; `None` carries the prior gravity forward
    #[validate(range(min = 0.98, max = 1.3))]
    pub observed_gravity: Option<f64>,
}

impl BlendEvent {
    /// A plain observation with no addition.
    pub fn observation(gravity: f64) -> Self {
        Self {
            observed_gravity: Some(gravity),
            ..Self::default()
        }
    }

    /// Parse the inputs a gravity reading carries.
    ///
    /// Readings generated from an addition, and readings that blend in added
    /// volume, have no observed gravity of their own: their description is
    /// derived. Every other reading must carry a numeric description.
    pub fn from_reading(reading: &Activity) -> Result<Self> {
        let mut event = Self::from_added_fields(
            reading.added_volume.as_deref(),
            reading.added_abv.as_deref(),
            reading.added_gravity.as_deref(),
            None,
        )?;
        if reading.addition_activity_id.is_some() || event.added_volume > 0.0 {
            return Ok(event);
        }

        let gravity = parse_decimal("gravity", Some(&reading.description))?.ok_or_else(|| {
            LedgerError::Validation(format!("gravity reading {} has no gravity", reading.id))
        })?;
        event.observed_gravity = Some(gravity);
        event.validate()?;
        Ok(event)
    }

    /// Whether the resulting gravity is computed rather than measured.
    pub fn derives_gravity(&self) -> bool {
        self.observed_gravity.is_none() || self.added_volume > 0.0
    }

    /// Parse an addition's inputs.
    ///
    /// Returns `None` while the fields are not yet enough to compute a ledger
    /// step: a removal (negative volume) always is; a positive addition needs
    /// both its ABV and its gravity.
    pub fn from_addition(addition: &Activity) -> Result<Option<Self>> {
        let event = Self::from_added_fields(
            addition.added_volume.as_deref(),
            addition.added_abv.as_deref(),
            addition.added_gravity.as_deref(),
            None,
        )?;

        let actionable = event.added_volume < 0.0
            || (event.added_volume > 0.0
                && event.added_abv.is_some()
                && event.added_gravity.is_some());
        Ok(actionable.then_some(event))
    }

    fn from_added_fields(
        added_volume: Option<&str>,
        added_abv: Option<&str>,
        added_gravity: Option<&str>,
        observed_gravity: Option<f64>,
    ) -> Result<Self> {
        let added_volume = parse_decimal("added volume", added_volume)?.unwrap_or(0.0);
        let added_abv = parse_decimal("added ABV", added_abv)?;
        // The gravity of what was added only matters when something was added.
        // Zero is how an unset gravity comes back from the form.
        let added_gravity = if added_volume > 0.0 {
            parse_decimal("added gravity", added_gravity)?.filter(|g| *g > 0.0)
        } else {
            None
        };

        let event = Self {
            added_volume,
            added_abv,
            added_gravity,
            observed_gravity,
        };
        event.validate()?;
        Ok(event)
    }
}

/// Parse a user-entered decimal. Blank input is absent, not zero.
pub fn parse_decimal(field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(LedgerError::Validation(format!(
            "{field} must be a number, got {raw:?}"
        ))),
    }
}

fn weighted(prior: f64, prior_volume: f64, added: f64, added_volume: f64, total: f64) -> f64 {
    (prior * prior_volume + added * added_volume) / total
}

/// Apply one event to the prior state.
pub fn blend(prior: &LedgerState, event: &BlendEvent) -> LedgerState {
    let volume = (prior.volume + event.added_volume).max(0.0);

    if event.added_volume > 0.0 && volume > 0.0 {
        let prior_gravity = prior.gravity.unwrap_or(WATER_GRAVITY);
        let added_gravity = event.added_gravity.unwrap_or(WATER_GRAVITY);
        let added_abv = event.added_abv.unwrap_or(0.0);
        return LedgerState {
            gravity: Some(weighted(
                prior_gravity,
                prior.volume,
                added_gravity,
                event.added_volume,
                volume,
            )),
            volume,
            abv: weighted(prior.abv, prior.volume, added_abv, event.added_volume, volume),
        };
    }

    let gravity = event.observed_gravity.or(prior.gravity);
    let drop = match (prior.gravity, gravity) {
        (Some(before), Some(after)) => (before - after).max(0.0),
        _ => 0.0,
    };

    LedgerState {
        gravity,
        volume,
        abv: prior.abv + drop * ABV_FACTOR,
    }
}
