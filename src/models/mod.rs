// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the ledger.

pub mod activity;
pub mod batch;
pub mod command;
pub mod stats;

pub use activity::{ledger_order, sorted_readings, Activity, Topic};
pub use batch::Batch;
pub use command::{AdditionUpdate, LedgerCommand, NewAddition, NewReading, ReadingUpdate};
pub use stats::GravitySummary;
