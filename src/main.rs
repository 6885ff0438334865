//! attrition-eda: Exploratory Data Analysis CLI
//!
//! Runs the full attrition analysis over one spreadsheet and prints the
//! report to the console.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use attrition_eda::cli::Cli;
use attrition_eda::pipeline::{run_pipeline, RunOptions};
use attrition_eda::report::{NullPlotter, PlotSink, RankingExport, TerminalPlotter};
use attrition_eda::utils::{init_logging, print_banner, print_completion, print_config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.to_config()?;
    let sheet = cli.sheet.as_deref();
    let show_progress = !cli.json;

    if show_progress {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&cli.input, sheet, &config);
    }

    let mut sink: Box<dyn PlotSink> = if cli.no_plots || cli.json {
        Box::new(NullPlotter)
    } else {
        Box::new(TerminalPlotter::stdout())
    };

    let started = Instant::now();
    let outcome = run_pipeline(
        &cli.input,
        sheet,
        &config,
        sink.as_mut(),
        RunOptions { show_progress },
    )
    .with_context(|| format!("Analysis of {} failed", cli.input.display()))?;

    if cli.json {
        let export = RankingExport::new(&config, &outcome.summary, outcome.ranking.as_ref());
        println!("{}", export.to_json()?);
        return Ok(());
    }

    outcome.summary.display();
    println!(
        "\n    {} Total time: {:.2}s",
        style("⏱").dim(),
        started.elapsed().as_secs_f64()
    );
    print_completion();

    Ok(())
}
