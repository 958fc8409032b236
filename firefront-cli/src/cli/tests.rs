//! Unit tests for the CLI commands and edge-list ingestion helpers.

use super::commands::{derive_data_source_name, load_edge_list, run_evolve};
use super::{BackwardDrawArg, Cli, CliError, Command, EvolveCommand, render_summary, run_cli};

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use firefront_core::ForestFireError;
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use firefront_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::stem_with_extension("/tmp/source.txt", "source")]
#[case::stem_without_extension("/tmp/source", "source")]
#[case::missing_stem("", "edge_list")]
fn derive_data_source_name_selects_expected_name(#[case] raw_path: &str, #[case] expected: &str) {
    let path = Path::new(raw_path);
    let name = derive_data_source_name(path);
    assert_eq!(name, expected);
}

#[rstest]
fn load_edge_list_skips_blanks_and_comments() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "edges.txt", "# header\n1 2\n\n  \n2 3\n")?;
    let graph = load_edge_list(&path)?;
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    Ok(())
}

#[rstest]
#[case::non_numeric("1 2\nfoo bar\n", 2, "foo bar")]
#[case::single_token("7\n", 1, "7")]
#[case::three_tokens("1 2 3\n", 1, "1 2 3")]
fn load_edge_list_rejects_malformed_lines(
    #[case] contents: &str,
    #[case] expected_line: usize,
    #[case] expected_content: &str,
) -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "edges.txt", contents)?;
    let err = match load_edge_list(&path) {
        Ok(_) => panic!("malformed line must fail"),
        Err(err) => err,
    };
    match err {
        CliError::InvalidEdgeLine { line, content, .. } => {
            assert_eq!(line, expected_line);
            assert_eq!(content.trim(), expected_content);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn load_edge_list_reports_missing_files() {
    let dir = temp_dir();
    let missing = dir.path().join("missing.txt");
    let err = match load_edge_list(&missing) {
        Ok(_) => panic!("missing file must fail"),
        Err(err) => err,
    };
    assert!(matches!(err, CliError::Io { .. }));
}

#[rstest]
fn evolve_with_zero_new_vertices_round_trips_the_input() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", "1 2\n2 3\n")?;
    let cli = Cli {
        command: Command::Evolve(evolve_command(path)),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.data_source, "chain");
    assert_eq!(summary.vertex_count, 3);
    assert_eq!(summary.edge_count, 2);
    assert_eq!(summary.records, ["1 2", "2 3", "3"]);
    Ok(())
}

#[rstest]
fn evolve_with_the_same_seed_is_reproducible() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", "1 2\n2 3\n3 4\n")?;
    let mut command = evolve_command(path);
    command.new_vertices = 2;
    command.max_iterations = 3;
    command.seed = 11;
    let first = run_evolve(command.clone())?;
    let second = run_evolve(command)?;
    assert_eq!(first.vertex_count, 6);
    assert_eq!(first.records, second.records);
    Ok(())
}

#[rstest]
#[case::zero(0.0)]
#[case::above_one(1.5)]
fn evolve_rejects_out_of_range_ratios(#[case] ratio: f64) -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", "1 2\n")?;
    let mut command = evolve_command(path);
    command.forward_ratio = ratio;
    let err = run_evolve_expecting_error(command, "out-of-range ratio must fail");
    assert!(matches!(
        err,
        CliError::Core(ForestFireError::InvalidRatio { .. })
    ));
    Ok(())
}

#[rstest]
fn evolve_rejects_max_id_below_existing_ids() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", "1 2\n2 3\n")?;
    let mut command = evolve_command(path);
    command.new_vertices = 1;
    command.max_id = Some(1);
    let err = run_evolve_expecting_error(command, "low max-id must fail");
    assert!(matches!(
        err,
        CliError::Core(ForestFireError::MaxVertexIdTooLow { .. })
    ));
    Ok(())
}

#[rstest]
fn render_summary_writes_one_record_per_line() -> TestResult {
    let summary = super::EvolutionSummary {
        data_source: "demo".into(),
        vertex_count: 3,
        edge_count: 2,
        records: vec!["1 2 3".into(), "2".into(), "3".into()],
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert_eq!(text, "1 2 3\n2\n3\n");
    Ok(())
}

#[rstest]
fn clap_rejects_unknown_backward_draw() {
    let args = ["firefront", "evolve", "edges.txt", "--backward-draw", "both"];
    let result = Cli::try_parse_from(args);
    assert!(result.is_err());
}

#[rstest]
fn run_evolve_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let path = create_edge_file(&dir, "chain.txt", "1 2\n2 3\n")?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let mut command = evolve_command(path);
    command.new_vertices = 1;
    command.max_iterations = 2;
    let summary = tracing::subscriber::with_default(subscriber, || run_evolve(command))?;
    assert_eq!(summary.data_source, "chain");

    let spans = layer.spans();
    let evolve = spans
        .iter()
        .find(|span| span.name == "cli.evolve")
        .expect("cli.evolve span must exist");
    assert!(
        evolve
            .fields
            .get("path")
            .is_some_and(|value| value.ends_with("chain.txt"))
    );
    assert_eq!(evolve.fields.get("new_vertices"), Some(&"1".to_owned()));
    assert_eq!(evolve.fields.get("max_iterations"), Some(&"2".to_owned()));

    let events = layer.events();
    assert!(events.iter().any(|event| {
        event.level == Level::INFO
            && event
                .fields
                .get("message")
                .is_some_and(|value| value == "evolve completed")
            && event
                .fields
                .get("data_source")
                .is_some_and(|value| value == "chain")
    }));
    Ok(())
}

#[rstest]
fn load_edge_list_records_path_on_error() {
    let dir = temp_dir();
    let missing = dir.path().join("missing.txt");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let result = tracing::subscriber::with_default(subscriber, || load_edge_list(&missing));
    assert!(matches!(result, Err(CliError::Io { .. })));

    let spans = layer.spans();
    let reader_span = spans
        .iter()
        .find(|span| span.name == "cli.load_edge_list")
        .expect("load span must exist");
    assert!(
        reader_span
            .fields
            .get("path")
            .is_some_and(|value| value.ends_with("missing.txt"))
    );
}

fn evolve_command(path: PathBuf) -> EvolveCommand {
    EvolveCommand {
        path,
        new_vertices: 0,
        max_iterations: 0,
        forward_ratio: 0.5,
        backward_ratio: 0.5,
        backward_draw: BackwardDrawArg::Forward,
        undirected: false,
        max_id: None,
        seed: 0,
    }
}

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn create_edge_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Run the evolve command and expect an error, panicking with the given
/// message if it succeeds.
fn run_evolve_expecting_error(command: EvolveCommand, panic_msg: &str) -> CliError {
    match run_evolve(command) {
        Ok(_) => panic!("{}", panic_msg),
        Err(err) => err,
    }
}
