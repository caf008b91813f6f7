//! CLI output formatting utilities.

use colored::Colorize;

/// Prints a success line.
pub fn success(message: &str) {
    println!("{} {message}", "✓".green());
}

/// Prints a warning line to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {message}", "!".yellow());
}

/// Prints a labeled health check result.
pub fn check(label: &str, ok: bool, detail: &str) {
    let mark = if ok { "✓".green() } else { "✗".red() };
    println!("{mark} {:<12} {detail}", label.bold());
}

/// Prints a JSON value pretty-printed to stdout.
pub fn print_json(value: &serde_json::Value) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{rendered}");
}

/// Formats a project accent color as a colored marker, falling back to a
/// plain bullet when no color is configured.
#[must_use]
pub fn project_marker(color: Option<&str>) -> String {
    color.map_or_else(|| "•".to_string(), |c| format!("{} {c}", "●".bold()))
}
