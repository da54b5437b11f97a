// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ledger mutation service.
//!
//! Entry points for the CRUD layer. Each operation:
//! 1. Copies the batch's activity collection
//! 2. Applies one mutation to the copy
//! 3. Re-derives the affected readings through the cascade
//! 4. Returns the new collection
//!
//! The caller's batch is never modified, and an error means nothing changed.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::models::batch::DEFAULT_BATCH_VOLUME;
use crate::models::{
    Activity, AdditionUpdate, Batch, LedgerCommand, NewAddition, NewReading, ReadingUpdate, Topic,
};
use crate::services::blend::BlendEvent;
use crate::services::cascade::{recalculate_all, recalculate_from};
use crate::time_utils::format_utc_rfc3339;

/// Applies ledger mutations to a batch.
#[derive(Debug, Clone)]
pub struct LedgerService {
    fallback_volume: f64,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_VOLUME)
    }
}

impl LedgerService {
    /// `fallback_volume` is the starting volume for batches without a valid
    /// one of their own.
    pub fn new(fallback_volume: f64) -> Self {
        Self { fallback_volume }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_volume)
    }

    fn recalculate_since(
        &self,
        batch: &Batch,
        activities: &[Activity],
        anchor: DateTime<Utc>,
    ) -> Result<Vec<Activity>> {
        recalculate_from(activities, batch.nominal_volume(self.fallback_volume), anchor)
    }

    /// Re-derive the whole ledger, e.g. for data written before the cache.
    pub fn recalculate(&self, batch: &Batch) -> Result<Vec<Activity>> {
        tracing::info!(batch_id = %batch.id, "Recalculating ledger");
        recalculate_all(&batch.activities, batch.nominal_volume(self.fallback_volume))
    }

    /// Insert an observed gravity reading.
    pub fn add_reading(&self, batch: &Batch, reading: NewReading) -> Result<Vec<Activity>> {
        let id = reading.id.unwrap_or_else(new_activity_id);
        ensure_unused(batch, &id)?;

        let mut activity = Activity::new(
            id,
            batch.id.clone(),
            Topic::Gravity,
            reading.date,
            reading.description,
        );
        activity.alert_id = reading.alert_id;

        tracing::info!(
            batch_id = %batch.id,
            activity_id = %activity.id,
            date = %format_utc_rfc3339(activity.date),
            "Adding gravity reading"
        );

        let anchor = activity.date;
        let mut activities = batch.activities.clone();
        activities.push(activity);
        self.recalculate_since(batch, &activities, anchor)
    }

    /// Edit a gravity reading's own fields.
    ///
    /// The date and added fields of a reading generated by an addition are
    /// copies of the addition's; editing them here is a conflict.
    pub fn update_reading(&self, batch: &Batch, update: ReadingUpdate) -> Result<Vec<Activity>> {
        let idx = find_index(batch, &update.id, Topic::Gravity)?;
        let current = &batch.activities[idx];
        let edits_inputs = update.date.is_some_and(|date| date != current.date)
            || update.added_abv.is_some()
            || update.added_gravity.is_some()
            || update.added_volume.is_some();
        if edits_inputs {
            if let Some(addition_id) = live_addition(batch, current) {
                return Err(LedgerError::Conflict(format!(
                    "gravity reading {} belongs to addition {addition_id}; edit the addition instead",
                    update.id
                )));
            }
        }

        let mut activities = batch.activities.clone();

        let reading = &mut activities[idx];
        let old_date = reading.date;
        if let Some(date) = update.date {
            reading.date = date;
        }
        if let Some(description) = update.description {
            reading.description = description;
        }
        if let Some(alert_id) = update.alert_id {
            reading.alert_id = Some(alert_id);
        }
        merge_field(&mut reading.added_abv, update.added_abv);
        merge_field(&mut reading.added_gravity, update.added_gravity);
        merge_field(&mut reading.added_volume, update.added_volume);

        // A reading moved later still leaves a gap where it used to be
        let anchor = old_date.min(reading.date);
        if reading.date != old_date && reading.alert_id.is_some() {
            tracing::debug!(
                activity_id = %reading.id,
                "Reading date changed; linked reminder needs rescheduling"
            );
        }

        tracing::info!(batch_id = %batch.id, activity_id = %update.id, "Updating gravity reading");
        self.recalculate_since(batch, &activities, anchor)
    }

    /// Delete a gravity reading.
    ///
    /// Readings generated by an addition that still exists are rejected: the
    /// addition has to be deleted instead.
    pub fn delete_reading(&self, batch: &Batch, id: &str) -> Result<Vec<Activity>> {
        let idx = find_index(batch, id, Topic::Gravity)?;
        let reading = &batch.activities[idx];

        if let Some(addition_id) = live_addition(batch, reading) {
            tracing::warn!(
                batch_id = %batch.id,
                activity_id = id,
                addition_id,
                "Refusing to delete reading linked to an addition"
            );
            return Err(LedgerError::Conflict(format!(
                "gravity reading {id} belongs to addition {addition_id}; delete the addition instead"
            )));
        }

        tracing::info!(batch_id = %batch.id, activity_id = id, "Deleting gravity reading");

        let anchor = reading.date;
        let mut activities = batch.activities.clone();
        activities.remove(idx);
        self.recalculate_since(batch, &activities, anchor)
    }

    /// Record an addition, creating its gravity reading once the addition's
    /// fields are enough to compute one.
    pub fn add_addition(&self, batch: &Batch, addition: NewAddition) -> Result<Vec<Activity>> {
        let id = addition.id.unwrap_or_else(new_activity_id);
        ensure_unused(batch, &id)?;

        let mut activity = Activity::new(
            id,
            batch.id.clone(),
            Topic::Addition,
            addition.date,
            addition.description,
        );
        activity.alert_id = addition.alert_id;
        activity.added_abv = blank_to_none(addition.added_abv);
        activity.added_gravity = blank_to_none(addition.added_gravity);
        activity.added_volume = blank_to_none(addition.added_volume);

        tracing::info!(batch_id = %batch.id, activity_id = %activity.id, "Adding addition");

        let mut activities = batch.activities.clone();
        activities.push(activity);
        let idx = activities.len() - 1;
        self.reconcile_addition(batch, activities, idx)
    }

    /// Edit an addition and carry the change into its gravity reading.
    pub fn update_addition(&self, batch: &Batch, update: AdditionUpdate) -> Result<Vec<Activity>> {
        let idx = find_index(batch, &update.id, Topic::Addition)?;
        let mut activities = batch.activities.clone();

        let addition = &mut activities[idx];
        if let Some(date) = update.date {
            addition.date = date;
        }
        if let Some(description) = update.description {
            addition.description = description;
        }
        merge_field(&mut addition.added_abv, update.added_abv);
        merge_field(&mut addition.added_gravity, update.added_gravity);
        merge_field(&mut addition.added_volume, update.added_volume);

        tracing::info!(batch_id = %batch.id, activity_id = %update.id, "Updating addition");
        self.reconcile_addition(batch, activities, idx)
    }

    /// Delete an addition together with its gravity reading.
    pub fn delete_addition(&self, batch: &Batch, id: &str) -> Result<Vec<Activity>> {
        let idx = find_index(batch, id, Topic::Addition)?;

        let mut activities = batch.activities.clone();
        activities.remove(idx);

        let anchor = activities
            .iter()
            .filter(|a| a.is_linked_to(id))
            .map(|a| a.date)
            .min();
        activities.retain(|a| !a.is_linked_to(id));

        tracing::info!(
            batch_id = %batch.id,
            activity_id = id,
            had_reading = anchor.is_some(),
            "Deleting addition"
        );

        match anchor {
            Some(anchor) => self.recalculate_since(batch, &activities, anchor),
            None => Ok(activities),
        }
    }

    /// Bring the addition at `idx` and its linked reading back in step.
    ///
    /// Creates the reading when the addition first becomes computable,
    /// updates it in place when it already exists (an addition never owns two
    /// readings), and drops it when the addition stops being computable.
    fn reconcile_addition(
        &self,
        batch: &Batch,
        mut activities: Vec<Activity>,
        idx: usize,
    ) -> Result<Vec<Activity>> {
        let addition = activities[idx].clone();
        let event = BlendEvent::from_addition(&addition)?;
        let linked = activities.iter().position(|a| a.is_linked_to(&addition.id));

        let mut anchor = addition.date;
        match (event, linked) {
            (Some(_), Some(i)) => {
                let reading = &mut activities[i];
                anchor = anchor.min(reading.date);
                copy_addition_inputs(&addition, reading);
            }
            (Some(_), None) => {
                let reading = linked_reading(&addition);
                tracing::debug!(
                    addition_id = %addition.id,
                    activity_id = %reading.id,
                    "Creating gravity reading for addition"
                );
                activities.push(reading);
            }
            (None, Some(i)) => {
                let reading = activities.remove(i);
                anchor = anchor.min(reading.date);
                tracing::debug!(
                    addition_id = %addition.id,
                    activity_id = %reading.id,
                    "Addition no longer computable; dropping its gravity reading"
                );
            }
            (None, None) => {
                tracing::debug!(addition_id = %addition.id, "Addition not yet computable");
                return Ok(activities);
            }
        }

        self.recalculate_since(batch, &activities, anchor)
    }

    /// Apply one command and return the updated batch.
    pub fn apply(&self, batch: &Batch, command: LedgerCommand) -> Result<Batch> {
        let op = command.name();
        let activities = match command {
            LedgerCommand::AddReading(reading) => self.add_reading(batch, reading),
            LedgerCommand::UpdateReading(update) => self.update_reading(batch, update),
            LedgerCommand::DeleteReading { id } => self.delete_reading(batch, &id),
            LedgerCommand::AddAddition(addition) => self.add_addition(batch, addition),
            LedgerCommand::UpdateAddition(update) => self.update_addition(batch, update),
            LedgerCommand::DeleteAddition { id } => self.delete_addition(batch, &id),
            LedgerCommand::Recalculate => self.recalculate(batch),
        }
        .inspect_err(|e| tracing::warn!(op, error = %e, "Ledger command rejected"))?;

        Ok(batch.with_activities(activities))
    }
}

fn new_activity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn find_index(batch: &Batch, id: &str, topic: Topic) -> Result<usize> {
    batch
        .activities
        .iter()
        .position(|a| a.id == id && a.topic == topic)
        .ok_or_else(|| LedgerError::NotFound(format!("{topic:?} activity {id}")))
}

/// Id of the existing addition a reading was generated from, if any.
fn live_addition<'a>(batch: &Batch, reading: &'a Activity) -> Option<&'a str> {
    reading.addition_activity_id.as_deref().filter(|addition_id| {
        batch
            .activities
            .iter()
            .any(|a| a.is_addition() && a.id == *addition_id)
    })
}

fn ensure_unused(batch: &Batch, id: &str) -> Result<()> {
    if batch.find(id).is_some() {
        return Err(LedgerError::Conflict(format!("activity id {id} already exists")));
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `None` keeps the current value; an empty string clears it.
fn merge_field(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = blank_to_none(Some(value));
    }
}

fn copy_addition_inputs(addition: &Activity, reading: &mut Activity) {
    reading.date = addition.date;
    reading.added_abv = addition.added_abv.clone();
    reading.added_gravity = addition.added_gravity.clone();
    reading.added_volume = addition.added_volume.clone();
}

fn linked_reading(addition: &Activity) -> Activity {
    let mut reading = Activity::new(
        new_activity_id(),
        addition.batch_id.clone(),
        Topic::Gravity,
        addition.date,
        "",
    );
    reading.addition_activity_id = Some(addition.id.clone());
    copy_addition_inputs(addition, &mut reading);
    reading
}
