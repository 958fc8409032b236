//! Command implementations and argument parsing for the firefront CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use firefront_core::{
    BackwardDraw, EdgeMode, ForestFireBuilder, ForestFireError, PropertyGraph,
    UniformVertexSampler, VertexId, adjacency_records,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "firefront", about = "Grow a graph with the forest-fire model.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the forest-fire growth simulation against an edge list.
    Evolve(EvolveCommand),
}

/// Options accepted by the `evolve` command.
#[derive(Debug, Args, Clone)]
pub struct EvolveCommand {
    /// Path to a whitespace-separated `<source> <target>` edge list.
    /// Blank lines and lines starting with `#` are skipped.
    pub path: PathBuf,

    /// Number of new vertices to attach to the graph.
    #[arg(long = "new-vertices", default_value_t = 0)]
    pub new_vertices: u64,

    /// Maximum number of propagation rounds.
    #[arg(long = "max-iterations", default_value_t = 0)]
    pub max_iterations: u32,

    /// Forward burn-probability ratio, in (0, 1].
    #[arg(long = "forward-ratio", default_value_t = 0.5)]
    pub forward_ratio: f64,

    /// Backward burn-probability ratio, in (0, 1].
    #[arg(long = "backward-ratio", default_value_t = 0.5)]
    pub backward_ratio: f64,

    /// Which ratio parameterizes the backward-burn draw.
    #[arg(long = "backward-draw", value_enum, default_value_t = BackwardDrawArg::Forward)]
    pub backward_draw: BackwardDrawArg,

    /// Materialize both orientations of each grown edge.
    #[arg(long)]
    pub undirected: bool,

    /// Override the largest existing vertex id (defaults to the highest id
    /// in the input).
    #[arg(long = "max-id")]
    pub max_id: Option<VertexId>,

    /// Seed for the ambassador sampler.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Ratio selection for the backward-burn draw.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackwardDrawArg {
    /// Reuse the forward ratio (reference behaviour).
    Forward,
    /// Use the dedicated backward ratio.
    Backward,
}

impl From<BackwardDrawArg> for BackwardDraw {
    fn from(arg: BackwardDrawArg) -> Self {
        match arg {
            BackwardDrawArg::Forward => Self::ForwardRatio,
            BackwardDrawArg::Backward => Self::BackwardRatio,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading the edge list.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A line of the edge list did not parse as two vertex ids.
    #[error("`{path}` line {line}: expected `<source> <target>`, got `{content}`")]
    InvalidEdgeLine {
        /// Path of the offending edge list.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The raw line content.
        content: String,
    },
    /// Core simulation failed.
    #[error(transparent)]
    Core(#[from] ForestFireError),
}

/// Summarises the outcome of executing the `evolve` command.
#[derive(Debug, Clone)]
pub struct EvolutionSummary {
    /// Name derived from the input file.
    pub data_source: String,
    /// Vertex count of the evolved graph.
    pub vertex_count: usize,
    /// Edge count of the evolved graph.
    pub edge_count: usize,
    /// Adjacency records of the evolved graph, one per vertex.
    pub records: Vec<String>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when parsing or execution fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use firefront_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "1 2\n2 3\n")?;
/// let cli = Cli::parse_from([
///     "firefront",
///     "evolve",
///     &file.path().display().to_string(),
/// ]);
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.records, ["1 2", "2 3", "3"]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<EvolutionSummary, CliError> {
    match cli.command {
        Command::Evolve(evolve) => {
            Span::current().record("command", field::display("evolve"));
            run_evolve(evolve)
        }
    }
}

#[instrument(
    name = "cli.evolve",
    err,
    skip(command),
    fields(path = field::Empty, new_vertices = field::Empty, max_iterations = field::Empty),
)]
pub(super) fn run_evolve(command: EvolveCommand) -> Result<EvolutionSummary, CliError> {
    let span = Span::current();
    span.record("path", field::display(command.path.display()));
    span.record("new_vertices", field::display(command.new_vertices));
    span.record("max_iterations", field::display(command.max_iterations));

    let edge_mode = if command.undirected {
        EdgeMode::Undirected
    } else {
        EdgeMode::Directed
    };
    let mut builder = ForestFireBuilder::new()
        .with_forward_ratio(command.forward_ratio)
        .with_backward_ratio(command.backward_ratio)
        .with_backward_draw(command.backward_draw.into())
        .with_new_vertices(command.new_vertices)
        .with_max_iterations(command.max_iterations)
        .with_edge_mode(edge_mode);
    if let Some(max_id) = command.max_id {
        builder = builder.with_max_vertex_id(max_id);
    }
    let fire = builder.build()?;

    let graph = load_edge_list(&command.path)?;
    let mut sampler = UniformVertexSampler::from_seed(command.seed);
    let evolved = fire.evolve(graph, &mut sampler)?;

    let summary = EvolutionSummary {
        data_source: derive_data_source_name(&command.path),
        vertex_count: evolved.vertex_count(),
        edge_count: evolved.edge_count(),
        records: adjacency_records(&evolved),
    };
    info!(
        data_source = summary.data_source.as_str(),
        vertices = summary.vertex_count,
        edges = summary.edge_count,
        "evolve completed"
    );
    Ok(summary)
}

/// Loads a `<source> <target>` edge list, skipping blanks and `#` comments.
#[instrument(name = "cli.load_edge_list", err, fields(path = field::Empty))]
pub(super) fn load_edge_list(path: &Path) -> Result<PropertyGraph<bool>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut pairs: Vec<(VertexId, VertexId)> = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let content = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let pair = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(source), Some(target), None) => source
                .parse::<VertexId>()
                .ok()
                .zip(target.parse::<VertexId>().ok()),
            _ => None,
        };
        match pair {
            Some(edge) => pairs.push(edge),
            None => {
                return Err(CliError::InvalidEdgeLine {
                    path: path.to_path_buf(),
                    line: index + 1,
                    content,
                });
            }
        }
    }
    Ok(PropertyGraph::from_edge_list(&pairs))
}

pub(super) fn derive_data_source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "edge_list".to_owned())
}

/// Renders the adjacency records of `summary` to `writer`, one per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use firefront_cli::cli::{EvolutionSummary, render_summary};
/// let summary = EvolutionSummary {
///     data_source: "demo".into(),
///     vertex_count: 2,
///     edge_count: 1,
///     records: vec!["1 2".into(), "2".into()],
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer).expect("writing to a Vec cannot fail");
/// assert_eq!(buffer.into_inner(), b"1 2\n2\n");
/// ```
pub fn render_summary(summary: &EvolutionSummary, mut writer: impl Write) -> io::Result<()> {
    for record in &summary.records {
        writeln!(writer, "{record}")?;
    }
    Ok(())
}
