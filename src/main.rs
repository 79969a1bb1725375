use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::time::Duration;
use streamguard::anomaly::AnomalyScorer;
use streamguard::cli::{Cli, Command, OutputFormat, PlotArgs, ReportArgs, StreamArgs};
use streamguard::config::StreamGuardConfig;
use streamguard::csv_output::{read_alerts, AlertsWriter};
use streamguard::drift::compare_at_cutover;
use streamguard::html_output::{HtmlDriftReport, HtmlStreamPlot};
use streamguard::json_output::{JsonDriftReport, JsonStreamSummary};
use streamguard::pipeline::run_stream;
use streamguard::report::{DriftReport, ReportRenderer, TextReport};
use streamguard::source::SyntheticSource;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the config file (if any) and apply the global overrides
fn load_config(cli: &Cli) -> Result<StreamGuardConfig> {
    let mut config = match &cli.config {
        Some(path) => StreamGuardConfig::from_file(path)?,
        None => StreamGuardConfig::default(),
    };

    if let Some(out_dir) = &cli.out_dir {
        config.output.out_dir = out_dir.clone();
    }

    Ok(config)
}

/// Write a rendered artifact, creating the output directory
fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Generate, score and persist the synthetic stream
fn cmd_stream(config: &StreamGuardConfig, args: &StreamArgs) -> Result<()> {
    let paths = config.output.paths();
    let source = SyntheticSource::new(config.source.clone())
        .map_err(|e| anyhow::anyhow!("Invalid source configuration: {}", e))?;
    let mut scorer = AnomalyScorer::new(config.anomaly);
    let mut writer = AlertsWriter::create(&paths.alerts_csv)
        .with_context(|| format!("Failed to create {}", paths.alerts_csv.display()))?;

    let pacing = (config.output.sleep_ms > 0).then(|| Duration::from_millis(config.output.sleep_ms));

    eprintln!(
        "Streaming {} events... (writing {})",
        config.source.n,
        paths.alerts_csv.display()
    );
    let summary = run_stream(source, &mut scorer, &mut writer, pacing)
        .with_context(|| format!("Failed to write {}", paths.alerts_csv.display()))?;

    if args.summary {
        summary.print_summary();
    }

    let alerts_csv = paths.alerts_csv.display().to_string();
    println!(
        "{}",
        JsonStreamSummary {
            alerts_csv: &alerts_csv,
            summary: &summary,
        }
        .to_json()?
    );
    eprintln!("Done.");
    Ok(())
}

/// Compare the windows of the persisted stream and render the report
fn cmd_report(config: &StreamGuardConfig, args: &ReportArgs) -> Result<()> {
    let paths = config.output.paths();
    let table = read_alerts(&paths.alerts_csv)?;

    let comparison = compare_at_cutover(&table.observations(), &config.drift);
    let report = DriftReport::for_cutover(comparison, &config.drift);

    match args.format {
        OutputFormat::Html => {
            let html = HtmlDriftReport.render(&report)?;
            write_artifact(&paths.report_html, &html)?;
            println!("Wrote report: {}", paths.report_html.display());
        }
        OutputFormat::Json => {
            let json = JsonDriftReport { pretty: true }.render(&report)?;
            write_artifact(&paths.report_json, &json)?;
            println!("Wrote report: {}", paths.report_json.display());
        }
        OutputFormat::Text => {
            print!("{}", TextReport.render(&report)?);
        }
    }

    Ok(())
}

/// Render the persisted stream as a scatter plot
fn cmd_plot(config: &StreamGuardConfig, args: &PlotArgs) -> Result<()> {
    let paths = config.output.paths();
    let table = read_alerts(&paths.alerts_csv)?;

    let marker = args.marker.unwrap_or(config.drift.cutover);
    let html = HtmlStreamPlot::new(marker).to_html(table.rows());
    write_artifact(&paths.plot_html, &html)?;
    println!("Wrote plot: {}", paths.plot_html.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    let mut config = load_config(&cli)?;

    match &cli.command {
        Command::Stream(args) => {
            args.apply(&mut config);
            config.validate()?;
            cmd_stream(&config, args)?;
        }
        Command::Report(args) => {
            args.apply(&mut config);
            config.validate()?;
            cmd_report(&config, args)?;
        }
        Command::Plot(args) => {
            config.validate()?;
            cmd_plot(&config, args)?;
        }
        Command::Run(args) => {
            args.stream.apply(&mut config);
            args.report.apply(&mut config);
            config.validate()?;
            cmd_stream(&config, &args.stream)?;
            cmd_report(&config, &args.report)?;
            cmd_plot(&config, &PlotArgs::default())?;
        }
    }

    Ok(())
}
