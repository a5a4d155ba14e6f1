//! Console output utilities.

use console::style;

use crate::project::Project;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the resolved project directories.
pub fn print_project_summary(project: &Project) {
    println!();
    println!("{}", style("Project:").bold());
    println!(
        "  BIDS:        {} (subjects: {})",
        project.paths.bids_dir.display(),
        project.subject_pattern
    );
    println!("  FreeSurfer:  {}", project.paths.subjects_dir.display());
    println!("  Functionals: {}", project.paths.functionals_dir.display());
    println!("  fMRIPrep:    {} ({})", project.paths.fmriprep_dir.display(), project.layout);
    println!();
}
