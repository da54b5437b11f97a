// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Summary statistics over a batch's gravity readings.
//!
//! Every function takes readings already in ledger order (see
//! [`crate::models::sorted_readings`]) and is a pure function of them.
//! Readings whose description is not a number are skipped.

use crate::models::Activity;

/// ABV points per unit of specific gravity dropped.
pub const ABV_FACTOR: f64 = 131.25;

/// Specific gravity of water.
pub const WATER_GRAVITY: f64 = 1.0;

/// Decimal places kept when a gravity is stored or displayed.
pub const GRAVITY_PLACES: i32 = 3;
pub const ABV_PLACES: i32 = 2;
pub const VOLUME_PLACES: i32 = 3;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Gravity recorded on a reading, if its description parses.
pub fn reading_gravity(reading: &Activity) -> Option<f64> {
    reading
        .description
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
}

/// Gravity of the first reading.
pub fn original_gravity(readings: &[&Activity]) -> Option<f64> {
    readings.first().and_then(|r| reading_gravity(r))
}

/// Gravity of the last reading. A lone reading is the original, not a final.
pub fn final_gravity(readings: &[&Activity]) -> Option<f64> {
    if readings.len() < 2 {
        return None;
    }
    readings.last().and_then(|r| reading_gravity(r))
}

/// The 1/3 sugar break: the gravity once a third of the sugar is gone.
pub fn one_third_break(readings: &[&Activity]) -> Option<f64> {
    original_gravity(readings).map(|og| {
        round_to(
            WATER_GRAVITY + (og - WATER_GRAVITY) * (2.0 / 3.0),
            GRAVITY_PLACES,
        )
    })
}

fn total_drop(readings: &[&Activity]) -> f64 {
    let gravities: Vec<f64> = readings.iter().filter_map(|r| reading_gravity(r)).collect();
    gravities
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).max(0.0))
        .sum()
}

/// Cumulative gravity drop. Rises (step feeding) never count against it.
pub fn gravity_drop(readings: &[&Activity]) -> f64 {
    round_to(total_drop(readings), GRAVITY_PLACES)
}

/// ABV after the last reading.
///
/// Uses the cached `abv` written by the cascade; ledgers that predate the
/// cache fall back to the cumulative drop.
pub fn current_abv(readings: &[&Activity]) -> Option<f64> {
    let last = readings.last()?;
    if let Some(abv) = last.abv {
        return Some(round_to(abv, ABV_PLACES));
    }
    Some(round_to(total_drop(readings) * ABV_FACTOR, ABV_PLACES))
}

/// ABV if the batch fermented all the way down to 1.000.
pub fn potential_abv(readings: &[&Activity]) -> Option<f64> {
    original_gravity(readings).map(|og| round_to((og - WATER_GRAVITY) * ABV_FACTOR, ABV_PLACES))
}
