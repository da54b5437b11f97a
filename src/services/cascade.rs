// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cascade recalculation of a batch's gravity ledger.
//!
//! The ledger is a left fold over the readings in ledger order: each
//! reading's state depends only on the state before it and its own inputs.
//! Every mutation reduces to "change one entry, then fold again from the
//! anchor", so cached `abv`/`volume` values can never go stale.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ledger_order, Activity};
use crate::services::blend::{blend, BlendEvent, LedgerState};
use crate::time_utils::format_utc_rfc3339;

/// Fold a sequence of ledger events into the state after each one.
///
/// States are kept at full precision; rounding happens only when a state is
/// written back to a reading.
pub fn fold_ledger(nominal_volume: f64, events: &[BlendEvent]) -> Vec<LedgerState> {
    events
        .iter()
        .scan(LedgerState::initial(nominal_volume), |state, event| {
            *state = blend(state, event);
            Some(*state)
        })
        .collect()
}

/// Re-derive every gravity reading dated at or after `anchor`.
///
/// All readings are parsed and validated before anything is written, so a
/// malformed entry anywhere in the ledger fails the whole operation. The
/// fold always starts from the first reading of the batch; readings dated
/// before `anchor` keep their stored values.
///
/// Returns a new collection; `activities` is left untouched.
pub fn recalculate_from(
    activities: &[Activity],
    nominal_volume: f64,
    anchor: DateTime<Utc>,
) -> Result<Vec<Activity>> {
    let order = ledger_order(activities);
    let events = order
        .iter()
        .map(|&i| BlendEvent::from_reading(&activities[i]))
        .collect::<Result<Vec<_>>>()?;
    let states = fold_ledger(nominal_volume, &events);

    let mut updated = activities.to_vec();
    let mut rewritten = 0usize;
    for ((&i, state), event) in order.iter().zip(&states).zip(&events) {
        let reading = &mut updated[i];
        if reading.date < anchor {
            continue;
        }
        write_state(reading, state, event);
        rewritten += 1;
    }

    tracing::debug!(
        readings = order.len(),
        rewritten,
        anchor = %format_utc_rfc3339(anchor),
        "Ledger recalculated"
    );

    Ok(updated)
}

/// Re-derive every gravity reading in the batch.
pub fn recalculate_all(activities: &[Activity], nominal_volume: f64) -> Result<Vec<Activity>> {
    recalculate_from(activities, nominal_volume, DateTime::<Utc>::MIN_UTC)
}

fn write_state(reading: &mut Activity, state: &LedgerState, event: &BlendEvent) {
    let stored = state.stored();
    if event.derives_gravity() {
        reading.description = format!("{:.3}", stored.gravity);
    }
    reading.abv = Some(stored.abv);
    reading.volume = Some(stored.volume);
}
