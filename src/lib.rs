// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ferment-Ledger: gravity ledger recalculation for fermentation batches
//!
//! This crate keeps a batch's gravity readings and additions consistent:
//! every reading caches the running gravity, volume and ABV, and every
//! mutation re-derives the readings it affects.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{LedgerError, Result};
pub use models::{Activity, Batch, GravitySummary, LedgerCommand, Topic};
pub use services::LedgerService;
