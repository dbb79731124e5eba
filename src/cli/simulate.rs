//! Simulate command implementation.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::{CliError, OutputFormat};
use encore::client::{MemoryChainClient, TracingReporter};
use encore::game::check_invariants;
use encore::{Action, EconomyRecorder, PlayerData, RecorderError};

/// Summary of a finished simulation, as emitted in JSON mode.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    player_address: &'a str,
    actions_applied: u32,
    blocks: usize,
    tip: String,
    state: &'a PlayerData,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the script is invalid, an action in it is
/// unaffordable, or an output file cannot be written.
pub(crate) fn execute(
    player: String,
    script: Option<String>,
    steps: u32,
    difficulty: u32,
    format: OutputFormat,
    export: Option<PathBuf>,
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut recorder = EconomyRecorder::new(
        player,
        "0x0000000000000000000000000000000000000000",
        difficulty,
        MemoryChainClient::new(),
        TracingReporter,
    );

    let applied = runtime.block_on(async {
        match script {
            Some(script) => run_script(&mut recorder, &script).await,
            None => run_greedy(&mut recorder, steps).await,
        }
    })?;
    runtime.block_on(recorder.save())?;

    let violations = check_invariants(recorder.state(), recorder.ledger());
    for violation in &violations {
        eprintln!("invariant violated: {violation}");
    }

    match format {
        OutputFormat::Text => {
            println!("player address: {}", recorder.player_address());
            println!("actions applied: {applied}");
            println!(
                "ledger: {} blocks, tip {}",
                recorder.ledger().len(),
                recorder.ledger().tip()
            );
            let state = recorder.state();
            println!(
                "money {}  fans {}  level {}  studio {}  song quality {}",
                state.money, state.fans, state.level, state.studio_level, state.song_quality
            );
        }
        OutputFormat::Json => {
            let summary = Summary {
                player_address: recorder.player_address(),
                actions_applied: applied,
                blocks: recorder.ledger().len(),
                tip: recorder.ledger().tip().to_string(),
                state: recorder.state(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if let Some(path) = export {
        let json = serde_json::to_string_pretty(recorder.ledger())?;
        fs::write(&path, json)?;
        println!("ledger exported to: {}", path.display());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CliError::new("simulation ended with invariant violations"))
    }
}

/// Apply a comma-separated action script verbatim. An unaffordable action
/// aborts the script.
async fn run_script(
    recorder: &mut EconomyRecorder<MemoryChainClient, TracingReporter>,
    script: &str,
) -> Result<u32, CliError> {
    let mut applied = 0;
    for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let action = parse_action(token)?;
        recorder.apply(action).await?;
        applied += 1;
    }
    Ok(applied)
}

/// Greedy autoplay: take the cheapest affordable action each step, stop
/// early when nothing is affordable.
async fn run_greedy(
    recorder: &mut EconomyRecorder<MemoryChainClient, TracingReporter>,
    steps: u32,
) -> Result<u32, CliError> {
    let mut applied = 0;
    for _ in 0..steps {
        let state = *recorder.state();
        let Some(action) = Action::ALL
            .into_iter()
            .filter(|a| state.can_afford(*a))
            .min_by_key(|a| state.cost(*a))
        else {
            break;
        };
        match recorder.apply(action).await {
            Ok(()) => applied += 1,
            Err(RecorderError::InsufficientFunds { .. }) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(applied)
}

fn parse_action(token: &str) -> Result<Action, CliError> {
    match token {
        "song" => Ok(Action::RecordSong),
        "tour" => Ok(Action::GoOnTour),
        "studio" => Ok(Action::UpgradeStudio),
        "upgrade-tour" => Ok(Action::UpgradeTour),
        "upgrade-song" => Ok(Action::UpgradeSong),
        other => Err(CliError::new(format!(
            "unknown action '{other}' (expected song, tour, studio, upgrade-tour, upgrade-song)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_accepts_known_tokens() {
        assert_eq!(parse_action("song").unwrap(), Action::RecordSong);
        assert_eq!(parse_action("upgrade-tour").unwrap(), Action::UpgradeTour);
    }

    #[test]
    fn test_parse_action_rejects_unknown_token() {
        assert!(parse_action("practice").is_err());
    }
}
