//! Result reporting.

use std::path::PathBuf;

use console::style;

use crate::bids::FileInfo;
use crate::project::DirListing;
use crate::shell::CommandReport;

/// Print decoded filename information as an aligned key/value table.
pub fn print_file_info(name: &str, info: &FileInfo) {
    let width = info.keys().map(str::len).max().unwrap_or(0);

    println!("{}", style(name).bold());
    for (key, value) in info.iter() {
        println!("  {:width$}  {}", style(key).cyan(), value, width = width);
    }
}

/// Print the entries of a directory listing.
pub fn print_listing(label: &str, listing: Option<&DirListing>) {
    match listing {
        Some(listing) => {
            println!(
                "{} {} ({} found)",
                style(label).bold(),
                listing.dir.display(),
                listing.entries.len()
            );
            for entry in &listing.entries {
                println!("  {}", entry);
            }
        }
        None => println!("{} {}", style(label).bold(), style("not available").dim()),
    }
}

/// Print the files changed by a maintenance operation.
pub fn print_changed(action: &str, paths: &[PathBuf]) {
    if paths.is_empty() {
        println!("  {} nothing to do", style(action).dim());
        return;
    }

    for path in paths {
        println!("  {} {}", style(action).green(), path.display());
    }
}

/// Print commands and their statuses.
pub fn print_command_report(report: &CommandReport) {
    match &report.statuses {
        Some(statuses) => {
            for (command, status) in report.commands.iter().zip(statuses) {
                let status = if *status == 0 {
                    style(status.to_string()).green()
                } else {
                    style(status.to_string()).red()
                };
                println!("  [{}] {}", status, command);
            }
        }
        None => {
            for command in &report.commands {
                println!("  [{}] {}", style("not run").dim(), command);
            }
        }
    }
}
