// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use ferment_ledger::models::{AdditionUpdate, NewAddition, NewReading, ReadingUpdate};
use ferment_ledger::{Activity, Batch, LedgerService};

/// Noon UTC on the given day of March 2024.
#[allow(dead_code)]
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, n, 12, 0, 0).unwrap()
}

/// Empty batch with a declared starting volume.
#[allow(dead_code)]
pub fn batch(volume: &str) -> Batch {
    let mut batch = Batch::new("batch-1", "Test batch");
    batch.volume = Some(volume.to_string());
    batch
}

#[allow(dead_code)]
pub fn new_reading(id: &str, date: DateTime<Utc>, gravity: &str) -> NewReading {
    NewReading {
        id: Some(id.to_string()),
        date,
        description: gravity.to_string(),
        alert_id: None,
    }
}

#[allow(dead_code)]
pub fn new_addition(
    id: &str,
    date: DateTime<Utc>,
    volume: &str,
    abv: &str,
    gravity: &str,
) -> NewAddition {
    NewAddition {
        id: Some(id.to_string()),
        date,
        description: format!("Addition {id}"),
        added_abv: Some(abv.to_string()),
        added_gravity: Some(gravity.to_string()),
        added_volume: Some(volume.to_string()),
        alert_id: None,
    }
}

#[allow(dead_code)]
pub fn gravity_update(id: &str, gravity: &str) -> ReadingUpdate {
    ReadingUpdate {
        id: id.to_string(),
        description: Some(gravity.to_string()),
        ..ReadingUpdate::default()
    }
}

#[allow(dead_code)]
pub fn addition_update(id: &str) -> AdditionUpdate {
    AdditionUpdate {
        id: id.to_string(),
        ..AdditionUpdate::default()
    }
}

/// Add readings in order and return the resulting batch.
#[allow(dead_code)]
pub fn batch_with_readings(volume: &str, gravities: &[(&str, u32, &str)]) -> Batch {
    let service = LedgerService::default();
    let mut batch = batch(volume);
    for (id, d, gravity) in gravities {
        let activities = service
            .add_reading(&batch, new_reading(id, day(*d), gravity))
            .expect("reading should be accepted");
        batch = batch.with_activities(activities);
    }
    batch
}

#[allow(dead_code)]
pub fn find<'a>(activities: &'a [Activity], id: &str) -> &'a Activity {
    activities
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| panic!("activity {id} missing"))
}

/// The gravity reading generated by `addition_id`.
#[allow(dead_code)]
pub fn linked<'a>(activities: &'a [Activity], addition_id: &str) -> &'a Activity {
    let mut readings = activities.iter().filter(|a| a.is_linked_to(addition_id));
    let reading = readings
        .next()
        .unwrap_or_else(|| panic!("no reading linked to {addition_id}"));
    assert!(
        readings.next().is_none(),
        "addition {addition_id} owns more than one reading"
    );
    reading
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
