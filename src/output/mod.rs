//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Reports for decoded names, listings and commands

pub mod console;
pub mod progress;
pub mod report;

pub use console::{print_error, print_info, print_project_summary, print_success, print_warning};
pub use progress::create_item_bar;
pub use report::{print_changed, print_command_report, print_file_info, print_listing};
