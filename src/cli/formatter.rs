/// Terminal output helpers shared by the commands
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

const SECTION_WIDTH: usize = 60;

/// Print an info box with bullet points
pub fn info_box(title: &str, items: &[&str]) {
    println!("\n{} {}", "ℹ".cyan(), title.bold());
    for item in items {
        println!("  {} {}", "•".dimmed(), item);
    }
}

pub fn print_warning(message: &str) {
    println!(
        "{} {}",
        "⚠".yellow(),
        format!("Warning: {}", message).yellow()
    );
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), format!("Error: {}", message).red());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_section(title: &str) {
    println!("\n{} {}", "▶".cyan(), title.bold());
    println!("{}", "─".repeat(SECTION_WIDTH).dimmed());
}

/// Two-column key/value table
pub fn print_stats_table(title: &str, stats: Vec<(&str, String)>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new(title)
            .add_attribute(Attribute::Bold)
            .fg(TableColor::Cyan),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);

    for (label, value) in stats {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).fg(TableColor::Green),
        ]);
    }

    println!("\n{}", table);
}

/// Check if colors should be disabled
pub fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("CLICOLOR").unwrap_or_else(|_| "1".to_string()) != "0"
}

pub fn init() {
    if !colors_enabled() {
        colored::control::set_override(false);
    }
}
