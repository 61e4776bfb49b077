#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the organism growth game against the referee.
//!
//! Turns arrive on stdin and commands leave on stdout, one line per required
//! action. Every diagnostic goes to stderr through `tracing`.

mod config;
mod protocol;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use organ_growth_board::Board;
use organ_growth_core::{Action, Dimensions};
use organ_growth_system_growth::{Growth, Outcome};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{AgentConfig, Cli},
    protocol::{RawTurn, TurnError, TurnReader},
};

/// Entry point for the organism growth command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AgentConfig::load(cli.config.as_deref())?.with_overrides(&cli);
    init_tracing(&config.log_level);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(TurnReader::new(stdin.lock()), &mut stdout.lock(), &config)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber installed earlier keeps precedence.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run<R: BufRead, W: Write>(
    mut reader: TurnReader<R>,
    out: &mut W,
    config: &AgentConfig,
) -> Result<()> {
    let Some(dimensions) = reader.read_dimensions()? else {
        info!("input closed before the grid size was sent");
        return Ok(());
    };
    info!(
        width = dimensions.width(),
        height = dimensions.height(),
        emission = ?config.growth.emission,
        growth_target = ?config.growth.growth_target,
        "game started"
    );

    let growth = Growth::new(config.growth);
    let mut turn_number = 0_u32;
    while let Some(turn) = reader.read_turn()? {
        turn_number += 1;
        let required = turn.required_actions;
        let actions = match play_turn(&growth, dimensions, turn, config.dump_board) {
            Ok(actions) => actions,
            Err(turn_error) => {
                error!(turn = turn_number, error = %turn_error, "rejected turn, waiting");
                Vec::new()
            }
        };

        protocol::write_actions(out, required, &actions).context("failed to write commands")?;
        out.flush().context("failed to flush commands")?;
    }

    info!(turns = turn_number, "input closed");
    Ok(())
}

fn play_turn(
    growth: &Growth,
    dimensions: Dimensions,
    turn: RawTurn,
    dump_board: bool,
) -> Result<Vec<Action>, TurnError> {
    let snapshot = turn.into_snapshot(dimensions)?;
    let board = Board::from_snapshot(&snapshot)?;
    if dump_board {
        info!("board\n{}", board.render());
    }

    let decisions = growth.decide(&snapshot, &board);
    for decision in &decisions {
        debug!(root = %decision.root, action = %decision.outcome.action(), "decided");
        if let (true, Outcome::Seek { path, .. }) = (dump_board, &decision.outcome) {
            info!(root = %decision.root, "path\n{}", board.render_with_path(path));
        }
    }

    Ok(decisions
        .iter()
        .map(|decision| decision.outcome.action())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(input: &str, config: &AgentConfig) -> String {
        let mut out = Vec::new();
        run(TurnReader::new(input.as_bytes()), &mut out, config).expect("game runs");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn answers_every_turn() {
        let input = "3 1\n\
            2\n\
            0 0 ROOT 1 1 N 0 1\n\
            2 0 A -1 0 X 0 0\n\
            3 0 0 0\n\
            0 0 0 0\n\
            2\n\
            1\n\
            0 0 ROOT 1 1 N 0 1\n\
            0 0 0 0\n\
            0 0 0 0\n\
            1\n";

        let output = play(input, &AgentConfig::default());

        assert_eq!(output, "GROW 1 2 0 BASIC\nWAIT\nWAIT\n");
    }

    #[test]
    fn rejected_turn_still_answers() {
        let input = "2 1\n\
            1\n\
            0 0 LAVA 1 1 N 0 1\n\
            3 0 0 0\n\
            0 0 0 0\n\
            2\n\
            1\n\
            0 0 ROOT 1 1 N 0 1\n\
            3 0 0 0\n\
            0 0 0 0\n\
            1\n";

        let output = play(input, &AgentConfig::default());

        assert_eq!(output, "WAIT\nWAIT\nGROW 1 1 0 BASIC\n");
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert_eq!(play("", &AgentConfig::default()), "");
    }

    #[test]
    fn out_of_bounds_entity_rejects_turn() {
        let input = "2 1\n\
            1\n\
            5 0 WALL -1 0 X 0 0\n\
            3 0 0 0\n\
            0 0 0 0\n\
            1\n";

        assert_eq!(play(input, &AgentConfig::default()), "WAIT\n");
    }
}
