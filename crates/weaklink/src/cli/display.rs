//! Common display utilities for CLI commands.

use std::path::Path;

use colored::Colorize;
use weaklink::{LoadWarning, NodeKey};

const MAX_DISPLAY_ITEMS: usize = 20;

/// Display resource keys with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` keys with bullet points. If there are more,
/// shows "... and N more". If empty, shows the provided `empty_message`.
pub fn print_keys<'a, I>(keys: I, empty_message: &str)
where
    I: ExactSizeIterator<Item = &'a NodeKey>,
{
    let total = keys.len();
    if total == 0 {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for key in keys.take(MAX_DISPLAY_ITEMS) {
        println!("    {} {}", "•".dimmed(), key);
    }

    if total > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            total - MAX_DISPLAY_ITEMS
        );
    }
}

/// Report lines skipped while loading an export.
pub fn print_load_warnings(path: &Path, warnings: &[LoadWarning]) {
    if warnings.is_empty() {
        return;
    }

    eprintln!(
        "{}: skipped {} line(s) in {}",
        "warning".yellow().bold(),
        warnings.len(),
        path.display()
    );
    for warning in warnings.iter().take(MAX_DISPLAY_ITEMS) {
        eprintln!("    {} {warning}", "•".dimmed());
    }
    if warnings.len() > MAX_DISPLAY_ITEMS {
        eprintln!(
            "    {} ... and {} more",
            "•".dimmed(),
            warnings.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Colored yes/no flag.
pub fn flag(value: bool) -> colored::ColoredString {
    if value {
        "yes".red().bold()
    } else {
        "no".green()
    }
}
