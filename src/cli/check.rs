//! Check command implementation.
//!
//! Replays each recording to the end and audits every intermediate
//! state: the structural invariants must hold and the ledger total
//! (bank plus all player balances) must equal the seeded bank funds
//! minus any bankruptcy write-offs logged so far. Recordings are
//! independent, so they are audited in parallel.

use super::CliError;
use banker::game::{check_invariants, Money};
use banker::replay::{Recording, ReplayEngine, StepOutcome};
use rayon::prelude::*;
use std::path::PathBuf;

/// Audit result for one recording.
struct CheckReport {
    path: PathBuf,
    applied: usize,
    rejected: usize,
    skipped: usize,
    written_off: Money,
    problems: Vec<String>,
}

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if any recording fails to load, replay, or audit
/// cleanly.
pub(crate) fn execute(
    recordings: Vec<PathBuf>,
    threads: Option<usize>,
) -> Result<(), CliError> {
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let reports: Vec<Result<CheckReport, CliError>> = recordings
        .into_par_iter()
        .map(check_one)
        .collect();

    let mut failures = 0usize;
    for report in reports {
        match report {
            Ok(report) => {
                if report.problems.is_empty() {
                    let mut summary = format!(
                        "{} applied, {} rejected, {} skipped",
                        report.applied, report.rejected, report.skipped
                    );
                    if report.written_off > 0 {
                        summary.push_str(&format!(", {} written off", report.written_off));
                    }
                    println!("ok   {} ({summary})", report.path.display());
                } else {
                    failures += 1;
                    println!("FAIL {}", report.path.display());
                    for problem in &report.problems {
                        println!("     {problem}");
                    }
                }
            }
            Err(e) => {
                failures += 1;
                println!("FAIL {e}");
            }
        }
    }

    if failures > 0 {
        Err(CliError::new(format!("{failures} recording(s) failed audit")))
    } else {
        Ok(())
    }
}

fn check_one(path: PathBuf) -> Result<CheckReport, CliError> {
    let recording = Recording::load(&path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))?;
    let config = recording.config.clone();

    let mut engine = ReplayEngine::new(recording);
    let mut report = CheckReport {
        path,
        applied: 0,
        rejected: 0,
        skipped: 0,
        written_off: 0,
        problems: Vec::new(),
    };

    while !engine.at_end() {
        let index = engine.position();
        match engine.step_forward() {
            Ok(StepOutcome::Applied(notice)) => {
                report.applied += 1;
                // A bankruptcy settled with the bank writes the balance
                // off the ledger; account for it, don't flag it.
                if let Some(notice) = &notice
                    && notice.id == "player.bankrupt"
                {
                    report.written_off += notice.meta.amount.unwrap_or(0);
                }
            }
            Ok(StepOutcome::Rejected(_)) => report.rejected += 1,
            Ok(StepOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                report.problems.push(format!("action {index}: {e}"));
                return Ok(report);
            }
        }

        // Money only leaves the closed system through write-offs
        let expected = config.bank_start - report.written_off;
        let total = engine.state().ledger_total();
        if total != expected {
            report.problems.push(format!(
                "action {index}: ledger total {total} drifted from {expected}"
            ));
        }
    }

    for violation in check_invariants(engine.state(), &config) {
        report.problems.push(violation.to_string());
    }

    Ok(report)
}
