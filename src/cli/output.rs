//! Output formatting for CLI commands.

use std::fmt::Write as _;

use banker::game::GameState;
use banker::replay::StepOutcome;

/// Render one replay step as a log line.
pub(crate) fn format_step(index: usize, outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Applied(Some(notice)) => format!("[{index:>4}] {}", notice.message),
        StepOutcome::Applied(None) => format!("[{index:>4}] (applied)"),
        StepOutcome::Rejected(err) => {
            format!("[{index:>4}] rejected ({}): {err}", err.kind.key())
        }
        StepOutcome::Skipped => format!("[{index:>4}] skipped (unknown action type)"),
    }
}

/// Render a state summary for terminal viewing.
pub(crate) fn format_state_text(state: &GameState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Bank: {}", state.bank);
    let _ = writeln!(
        out,
        "Pool: {} houses, {} hotels",
        state.houses, state.hotels
    );

    let _ = writeln!(out, "Players:");
    for player in state.players.values() {
        let owned = state.properties_owned_by(&player.token).len();
        let status = if player.bankrupt { " (bankrupt)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<20} {:>6}  {owned} properties{status}",
            format!("{} [{}]", player.name, player.token),
            player.balance,
        );
    }

    if let Some(auction) = &state.auction {
        let highest = auction
            .highest()
            .map_or_else(|| "no bids".to_owned(), |bid| {
                format!("{} at {}", bid.token, bid.amount)
            });
        let _ = writeln!(out, "Open auction: {} ({highest})", auction.property);
    }
    for trade in state.trades.values() {
        let _ = writeln!(
            out,
            "Pending trade: {} -> {}",
            trade.initiator, trade.counterparty
        );
    }

    out
}
