/// Terminal output helpers shared by the commands
use crate::core::threshold::ThresholdResult;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "●".blue(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Table of every pair's average score with its pass/fail mark
pub fn means_table(result: &ThresholdResult) -> Table {
    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Comparison"),
        header_cell("Average score"),
        header_cell(&format!(">= {}%", result.threshold_percent)),
    ]);

    for (pair, avg) in result.means.iter() {
        let passed = result.passing.iter().any(|(p, _)| *p == pair);
        let mark = if passed {
            Cell::new("yes").fg(TableColor::Green)
        } else {
            Cell::new("no").fg(TableColor::DarkGrey)
        };
        table.add_row(vec![Cell::new(pair.label()), Cell::new(format!("{:.4}", avg)), mark]);
    }
    table
}

/// Print a membership result to the terminal
pub fn print_threshold_result(result: &ThresholdResult) {
    section_header("OG Membership Comparison");
    if result.means.is_empty() {
        warning("No tool pair shared any protein; nothing was scored");
        return;
    }
    println!("{}", means_table(result));

    if result.is_empty() {
        warning(&format!(
            "No comparison met the {}% threshold",
            result.threshold_percent
        ));
    } else {
        success(&format!(
            "{} of {} comparisons met the {}% threshold",
            result.passing.len(),
            result.means.len(),
            result.threshold_percent
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scorer::ScoreBuckets;
    use crate::core::threshold::PairMeans;
    use crate::core::tool::{OrthologyTool, ToolPair};

    #[test]
    fn test_means_table_has_row_per_scored_pair() {
        let mut buckets = ScoreBuckets::new();
        buckets.push(ToolPair::new(OrthologyTool::Broccoli, OrthologyTool::OrthoFinder).unwrap(), 1.0);
        buckets.push(ToolPair::new(OrthologyTool::ProteinOrtho, OrthologyTool::SonicParanoid).unwrap(), 0.1);
        let result = PairMeans::from_buckets(&buckets).apply_threshold(50);

        let rendered = means_table(&result).to_string();
        assert!(rendered.contains("Br_vs_OF"));
        assert!(rendered.contains("PO_vs_SP"));
        assert!(rendered.contains("1.0000"));
        assert!(!rendered.contains("OF_vs_SP"));
    }
}
