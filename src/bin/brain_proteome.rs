use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use brain_proteome::app::{App, ProgressSink};
use brain_proteome::config::ConfigLoader;
use brain_proteome::domain::Study;
use brain_proteome::error::ProteomeError;
use brain_proteome::output::{
    JsonOutput, OutputMode, StderrProgress, print_ingest_summary, print_report_summary,
    print_show,
};
use brain_proteome::reader::WorkbookReader;
use brain_proteome::report::SvgChartRenderer;
use brain_proteome::store::Store;

#[derive(Parser)]
#[command(name = "brain-proteome")]
#[command(about = "Normalize, annotate and compare published mouse brain proteome studies")]
#[command(version, author)]
struct Cli {
    /// Config file (default: ./brain-proteome.json when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Ingest every study, then report (default)")]
    Run,
    #[command(about = "Ingest studies whose tables do not exist yet")]
    Ingest(IngestArgs),
    #[command(about = "Profile ingested studies and draw charts")]
    Report,
    #[command(about = "List the brain parts a protein was observed in")]
    Show(ShowArgs),
}

#[derive(Args)]
struct IngestArgs {
    /// Restrict to these studies (repeatable)
    #[arg(long = "study", value_enum)]
    studies: Vec<Study>,
}

#[derive(Args)]
struct ShowArgs {
    #[arg(value_enum)]
    study: Study,
    identifier: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<ProteomeError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ProteomeError) -> u8 {
    match error {
        ProteomeError::MissingInput(_)
        | ProteomeError::MissingSheet { .. }
        | ProteomeError::ConfigRead(_)
        | ProteomeError::ConfigParse(_) => 2,
        ProteomeError::UnmappedLabel { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let sink: &dyn ProgressSink = match output_mode {
        OutputMode::Json => &JsonOutput,
        OutputMode::Human => &StderrProgress,
    };

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let store = Store::open(&config.database)?;
    let renderer = SvgChartRenderer::new(config.output_dir.clone());
    let mut app = App::new(store, WorkbookReader::new(), renderer, config);

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_all(&mut app, output_mode, sink),
        Command::Ingest(args) => run_ingest(&mut app, args, output_mode, sink),
        Command::Report => run_report(&app, output_mode, sink),
        Command::Show(args) => run_show(&app, args, output_mode),
    };
    app.close()?;
    result
}

type CliApp = App<WorkbookReader, SvgChartRenderer>;

fn run_all(app: &mut CliApp, output_mode: OutputMode, sink: &dyn ProgressSink) -> miette::Result<()> {
    let mut summary = app.run(sink)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_run(&summary).into_diagnostic()?,
        OutputMode::Human => {
            print_ingest_summary(&summary.ingest);
            if let Some(report) = &summary.report {
                print_report_summary(report);
            }
        }
    }
    match summary.ingest.take_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn run_ingest(
    app: &mut CliApp,
    args: IngestArgs,
    output_mode: OutputMode,
    sink: &dyn ProgressSink,
) -> miette::Result<()> {
    let studies = if args.studies.is_empty() {
        Study::ALL.to_vec()
    } else {
        args.studies
    };
    let mut summary = app.ingest(&studies, sink)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_ingest(&summary).into_diagnostic()?,
        OutputMode::Human => print_ingest_summary(&summary),
    }
    match summary.take_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn run_report(app: &CliApp, output_mode: OutputMode, sink: &dyn ProgressSink) -> miette::Result<()> {
    let summary = app.report(sink)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_report(&summary).into_diagnostic()?,
        OutputMode::Human => print_report_summary(&summary),
    }
    Ok(())
}

fn run_show(app: &CliApp, args: ShowArgs, output_mode: OutputMode) -> miette::Result<()> {
    let result = app.show(args.study, &args.identifier)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_show(&result).into_diagnostic()?,
        OutputMode::Human => print_show(&result),
    }
    Ok(())
}
