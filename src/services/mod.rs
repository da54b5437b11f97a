// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - ledger math and mutation layer.

pub mod blend;
pub mod cascade;
pub mod gravity;
pub mod ledger;

pub use blend::{blend, BlendEvent, LedgerState, StoredValues};
pub use cascade::{fold_ledger, recalculate_all, recalculate_from};
pub use ledger::LedgerService;
