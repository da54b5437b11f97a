// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ferment-Ledger CLI
//!
//! Applies one ledger command to a batch file and prints the batch's gravity
//! summary as JSON:
//!
//! ```text
//! ferment-ledger <batch.json> [<command.json>]
//! ```
//!
//! Without a command file the whole ledger is recalculated.

use std::process::ExitCode;

use anyhow::Context;
use ferment_ledger::{
    config::Config, db::BatchStore, Batch, GravitySummary, LedgerCommand, LedgerError,
    LedgerService,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: ferment-ledger <batch.json> [<command.json>]";

/// Printed on stdout after a successful run.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    batch_id: &'a str,
    op: &'static str,
    changed: bool,
    saved: bool,
    summary: GravitySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<&'a Batch>,
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            print_error(&LedgerError::from(e));
            return ExitCode::from(2);
        }
    };

    init_logging(config.log_json);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LedgerError>() {
                Some(ledger_err) => print_error(ledger_err),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let batch_path = args.next().context(USAGE)?;
    let command = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read command file {path}"))?;
            serde_json::from_str::<LedgerCommand>(&raw)
                .with_context(|| format!("Invalid command in {path}"))?
        }
        None => LedgerCommand::Recalculate,
    };
    let op = command.name();

    let store = BatchStore::new(&batch_path);
    let batch = store.load()?;
    tracing::info!(
        path = %store.path().display(),
        batch_id = %batch.id,
        op,
        "Applying ledger command"
    );

    let service = LedgerService::from_config(config);
    let updated = service.apply(&batch, command)?;

    let changed = updated != batch;
    let saved = changed && !config.dry_run;
    if saved {
        store.save(&updated)?;
    } else {
        tracing::info!(changed, dry_run = config.dry_run, "Batch file left unchanged");
    }

    let output = Output {
        batch_id: &updated.id,
        op,
        changed,
        saved,
        summary: GravitySummary::from_activities(&updated.activities),
        batch: config.dry_run.then_some(&updated),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_error(err: &LedgerError) {
    match serde_json::to_string(&err.to_response()) {
        Ok(body) => eprintln!("{body}"),
        Err(_) => eprintln!("error: {err}"),
    }
}

/// Initialize logging on stderr; stdout carries the JSON result.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ferment_ledger=debug,info"));

    if json {
        let format = tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(format).init();
    } else {
        let format = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(format).init();
    }
}
