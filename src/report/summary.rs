//! Run summary: per-step status and timings

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::error::{EdaError, Step};

/// A failure recorded for a step that did not abort the run
#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    pub columns: Vec<String>,
    pub message: String,
}

impl From<&EdaError> for StepFailure {
    fn from(err: &EdaError) -> Self {
        Self {
            columns: err.columns(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Position in the run, as shown in the step header
    pub number: usize,
    pub step: Step,
    pub elapsed_ms: u128,
    pub failures: Vec<StepFailure>,
}

impl StepRecord {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of every step that ran
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub input: Option<String>,
    pub rows: usize,
    pub initial_columns: usize,
    pub final_columns: usize,
    pub steps: Vec<StepRecord>,
}

impl RunSummary {
    pub fn new(input: Option<String>, rows: usize, initial_columns: usize) -> Self {
        Self {
            input,
            rows,
            initial_columns,
            final_columns: initial_columns,
            ..Default::default()
        }
    }

    /// Number the next recorded step will get
    pub fn next_number(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn record(&mut self, step: Step, elapsed: Duration, failures: Vec<StepFailure>) {
        self.steps.push(StepRecord {
            number: self.next_number(),
            step,
            elapsed_ms: elapsed.as_millis(),
            failures,
        });
    }

    pub fn step(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == step)
    }

    /// Steps that recorded at least one isolated failure
    pub fn failed_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.step)
            .collect()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Step").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
        ]);

        for record in &self.steps {
            let status = if record.succeeded() {
                Cell::new("ok").fg(Color::Green)
            } else {
                Cell::new(format!("{} failure(s)", record.failures.len())).fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(record.number),
                Cell::new(record.step),
                status,
                Cell::new(format!("{} ms", record.elapsed_ms)),
            ]);
        }

        table.add_row(vec![
            Cell::new(""),
            Cell::new("Columns"),
            Cell::new(format!("{} → {}", self.initial_columns, self.final_columns))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{} rows", self.rows)),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let failed: Vec<&StepRecord> = self.steps.iter().filter(|r| !r.succeeded()).collect();
        if !failed.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("⚠").yellow(),
                style("ISOLATED FAILURES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for record in failed {
                for failure in &record.failures {
                    println!("        {} {}", style("•").dim(), failure.message);
                }
            }
        }
    }
}
