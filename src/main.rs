use anyhow::Result;
use clap::Parser;
use talktime::cli::{Cli, OutputFormat};
use talktime::config::AnalysisConfig;
use talktime::csv_output::CsvOutput;
use talktime::dataset::{Column, Dataset};
use talktime::json_output::JsonOutput;
use talktime::loader::{load_or_synthesize, DataSource};
use talktime::pipeline::AnalysisSession;
use talktime::text_output::format_report;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print the selectable values of each categorical column
fn print_values(dataset: &Dataset) {
    let columns = [
        ("Groups", Column::Group),
        ("Classifications", Column::Classification),
        ("Shifts", Column::Shift),
    ];
    for (title, column) in columns {
        println!("=== {} ===", title);
        for value in dataset.distinct(column) {
            println!("{}", value);
        }
        println!();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    args.apply(&mut config);

    let outcome = load_or_synthesize(config.data_path.as_deref(), args.seed);
    if let DataSource::Synthetic { reason } = &outcome.source {
        eprintln!("Warning: {}; using synthetic sample data", reason);
    }

    if args.list_values {
        print_values(&outcome.dataset);
        return Ok(());
    }

    let params = config.resolve(&outcome.dataset);
    let mut session = AnalysisSession::new(outcome.dataset);
    if let Err(e) = session.refresh(params) {
        anyhow::bail!("{}: {}", e.title(), e);
    }
    for column in &args.sort_outliers {
        session.sort_outliers((*column).into());
    }
    for column in &args.sort_agents {
        session.sort_agents((*column).into());
    }

    let Some(report) = session.report() else {
        anyhow::bail!("analysis produced no report");
    };
    match args.format {
        OutputFormat::Text => print!("{}", format_report(report)),
        OutputFormat::Json => {
            let dataset = session.dataset();
            let output = JsonOutput::new(&outcome.source, dataset.len(), dataset.schema(), report);
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => print!("{}", CsvOutput::new(&report.outliers).to_csv()),
    }

    Ok(())
}
