/// Terminal output helpers shared by the commands
use crate::core::splitter::LabelSummary;
use crate::output::OutputFiles;
use colored::*;
use indicatif::ProgressStyle;

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "\n{} {}",
        "⚠".yellow(),
        format!("Warning: {}", message).yellow()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green().bold(), message);
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{} {}", "▶".cyan(), title.bold());
    println!("{}", "─".repeat(60).dimmed());
}

/// Create a spinner style for indeterminate operations
pub fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

/// Print rare/abundant counts per label using comfy_table
pub fn print_summary_table(summaries: &[LabelSummary]) {
    use comfy_table::modifiers::UTF8_ROUND_CORNERS;
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Label", "Rare seqs", "Abundant seqs", "Rare bins", "Abundant bins"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(TableColor::Cyan)),
    );

    for summary in summaries {
        let bins = |n: usize| {
            if summary.label.is_some() {
                format_number(n)
            } else {
                "-".to_string()
            }
        };
        table.add_row(vec![
            Cell::new(summary.label.as_deref().unwrap_or("names")),
            Cell::new(format_number(summary.rare)).fg(TableColor::Green),
            Cell::new(format_number(summary.abundant)).fg(TableColor::Green),
            Cell::new(bins(summary.rare_bins)),
            Cell::new(bins(summary.abundant_bins)),
        ]);
    }

    println!("\n{}", table);
}

/// Print every output file, grouped by kind
pub fn print_output_files(outputs: &OutputFiles) {
    print_section("Output File Names");
    for (kind, paths) in outputs.kinds() {
        println!("  {} {}", "●".yellow(), kind.to_string().bold());
        for (i, path) in paths.iter().enumerate() {
            let prefix = if i + 1 == paths.len() { "└─" } else { "├─" };
            println!("    {} {}", prefix.dimmed(), path.display());
        }
    }
}

/// Print formatted number with thousands separator
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Check if colors should be disabled
pub fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("CLICOLOR").unwrap_or_else(|_| "1".to_string()) != "0"
}

/// Initialize the formatter (sets up colored output)
pub fn init() {
    if !colors_enabled() {
        colored::control::set_override(false);
    }
}
