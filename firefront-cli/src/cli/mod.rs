//! Command-line interface orchestration for the firefront simulator.
//!
//! The CLI offers an `evolve` command that loads a whitespace-separated
//! edge list, runs the forest-fire growth simulation, and renders the
//! evolved graph as adjacency records.

mod commands;

pub use commands::{
    BackwardDrawArg, Cli, CliError, Command, EvolveCommand, EvolutionSummary, render_summary,
    run_cli,
};

#[cfg(test)]
mod tests;
