//! Terminal styling for the console report

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::config::EdaConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("attrition-eda").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Exploratory analysis of employee attrition").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, sheet: Option<&str>, config: &EdaConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(input, 38)
    );
    println!(
        "    │  {} Sheet:  {:<39}│",
        FOLDER,
        truncate_string(sheet.unwrap_or("(first)"), 38)
    );
    println!(
        "    │  {} Outcome: {:<38}│",
        TARGET,
        truncate_string(
            &format!("Resigned ({} = 1, {} = 0)", config.event_label, config.non_event_label),
            37
        )
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Normality cap:        {:<25}│",
        CHART,
        style(config.normality_cap).yellow()
    );
    println!(
        "    │  {} Outlier caps:         {:<25}│",
        CHART,
        style(format!(
            "{:.0}% / {:.0}%",
            config.lower_percentile * 100.0,
            config.upper_percentile * 100.0
        ))
        .yellow()
    );
    println!(
        "    │  {} MI seed:              {:<25}│",
        DICE,
        style(config.seed).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: usize, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning for a step that failed without stopping the run
pub fn print_warning(message: &str) {
    println!("    {} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print a sub-section title inside a step
pub fn print_section(title: &str) {
    println!();
    println!("    {} {}", style("✧").cyan(), style(title).bold());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Attrition analysis complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
