//! Replay command implementation.

use super::output::{format_state_text, format_step};
use super::{CliError, OutputFormat};
use banker::replay::{Recording, ReplayEngine};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: &Path,
    format: OutputFormat,
    position: Option<usize>,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    let total = recording.actions.len();
    let target = position.unwrap_or(total).min(total);
    let mut engine = ReplayEngine::new(recording);

    match format {
        OutputFormat::Text => {
            println!("Replay of {} ({total} actions)", recording_path.display());
            println!();

            while engine.position() < target {
                let index = engine.position();
                let outcome = engine.step_forward()?;
                println!("{}", format_step(index, &outcome));
            }

            println!();
            print!("{}", format_state_text(engine.state()));
        }
        OutputFormat::Json => {
            engine.goto(target)?;
            let json = serde_json::to_string_pretty(engine.state())
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
