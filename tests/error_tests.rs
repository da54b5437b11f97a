// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ferment_ledger::models::{NewReading, ReadingUpdate};
use ferment_ledger::{LedgerCommand, LedgerError, LedgerService};

mod common;
use common::*;

#[test]
fn test_deleting_linked_reading_is_conflict() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090"), ("r1", 2, "1.030")]);
    let batch = batch.with_activities(
        service
            .add_addition(&batch, new_addition("water", day(3), "1", "0", "1.000"))
            .unwrap(),
    );
    let reading_id = linked(&batch.activities, "water").id.clone();
    let snapshot = batch.clone();

    let err = service.delete_reading(&batch, &reading_id).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.code(), "conflict");
    assert_eq!(batch, snapshot);
}

#[test]
fn test_linked_reading_inputs_belong_to_the_addition() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090"), ("r1", 2, "1.030")]);
    let batch = batch.with_activities(
        service
            .add_addition(&batch, new_addition("water", day(3), "1", "0", "1.000"))
            .unwrap(),
    );
    let reading_id = linked(&batch.activities, "water").id.clone();
    let snapshot = batch.clone();

    let update = ReadingUpdate {
        id: reading_id.clone(),
        added_volume: Some("3".to_string()),
        ..ReadingUpdate::default()
    };
    let err = service.update_reading(&batch, update).unwrap_err();
    assert!(err.is_conflict());

    let update = ReadingUpdate {
        id: reading_id.clone(),
        date: Some(day(4)),
        ..ReadingUpdate::default()
    };
    assert!(service.update_reading(&batch, update).unwrap_err().is_conflict());
    assert_eq!(batch, snapshot);

    // Fields the addition does not own can still be edited
    let update = ReadingUpdate {
        id: reading_id.clone(),
        date: Some(day(3)),
        alert_id: Some("alert-2".to_string()),
        ..ReadingUpdate::default()
    };
    let activities = service.update_reading(&batch, update).unwrap();
    let reading = linked(&activities, "water");
    assert_eq!(reading.alert_id.as_deref(), Some("alert-2"));
    assert_eq!(reading.abv, Some(6.56));
}

#[test]
fn test_orphaned_linked_reading_can_be_deleted() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);
    let batch = batch.with_activities(
        service
            .add_addition(&batch, new_addition("water", day(3), "1", "0", "1.000"))
            .unwrap(),
    );
    let reading_id = linked(&batch.activities, "water").id.clone();

    // Addition removed behind the engine's back
    let mut activities = batch.activities.clone();
    activities.retain(|a| a.id != "water");
    let batch = batch.with_activities(activities);

    let activities = service.delete_reading(&batch, &reading_id).unwrap();
    assert_eq!(activities.len(), 1);
}

#[test]
fn test_unknown_ids_are_not_found() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);

    let err = service.delete_reading(&batch, "missing").unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    let err = service.delete_addition(&batch, "og").unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    let err = service
        .update_reading(&batch, gravity_update("missing", "1.000"))
        .unwrap_err();
    assert_eq!(err.code(), "not_found");

    let err = service
        .update_addition(&batch, addition_update("missing"))
        .unwrap_err();
    assert_eq!(err.code(), "not_found");
}

#[test]
fn test_non_numeric_gravity_is_rejected() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090"), ("r1", 3, "1.030")]);
    let snapshot = batch.clone();

    let err = service
        .add_reading(
            &batch,
            NewReading {
                id: None,
                date: day(2),
                description: "ten-fifty".to_string(),
                alert_id: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = service
        .update_reading(&batch, gravity_update("og", ""))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(batch, snapshot);
}

#[test]
fn test_out_of_range_gravity_is_rejected() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);

    let err = service
        .update_reading(&batch, gravity_update("og", "1.9"))
        .unwrap_err();
    assert_eq!(err.code(), "validation_error");
}

#[test]
fn test_bad_addition_fields_are_rejected() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);

    let err = service
        .add_addition(&batch, new_addition("a1", day(2), "one", "0", "1.000"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = service
        .add_addition(&batch, new_addition("a2", day(2), "1", "-5", "1.000"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn test_bad_addition_edit_leaves_reading_alone() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);
    let batch = batch.with_activities(
        service
            .add_addition(&batch, new_addition("water", day(3), "1", "0", "1.000"))
            .unwrap(),
    );
    let snapshot = batch.clone();

    let mut update = addition_update("water");
    update.added_volume = Some("lots".to_string());
    let err = service.update_addition(&batch, update).unwrap_err();

    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(batch, snapshot);
}

#[test]
fn test_apply_surfaces_errors_without_changes() {
    let service = LedgerService::default();
    let batch = batch_with_readings("5", &[("og", 1, "1.090")]);

    let err = service
        .apply(
            &batch,
            LedgerCommand::UpdateReading(ReadingUpdate {
                id: "og".to_string(),
                description: Some("1.o90".to_string()),
                ..ReadingUpdate::default()
            }),
        )
        .unwrap_err();

    let response = err.to_response();
    assert_eq!(response.error, "validation_error");
    assert!(response.details.unwrap().contains("1.o90"));
}
