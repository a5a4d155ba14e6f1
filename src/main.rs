//! nisurf - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use nisurf::{
    bids::{copy_subject_events, fix_fmap, fix_func, session_dirs, CodecOptions, FileInfo},
    cli::{Args, Commands},
    config::{validate_config, validate_project, Config},
    error::{exit_codes, Error, Result},
    freesurfer::{analysis_contrasts, read_session_list},
    fs::functionals_dir,
    output::{
        create_item_bar, print_changed, print_command_report, print_error, print_file_info,
        print_info, print_listing, print_project_summary, print_success, print_warning,
    },
    project::Project,
    shell::{escape_command, CommandRunner},
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::DirectoryNotFound(_)
                | Error::InvalidFilename(_)
                | Error::InvalidPattern(_)
                | Error::Sidecar { .. }
                | Error::SessionFile(_)
                | Error::SubjectsFailed(_) => ExitCode::from(exit_codes::DATASET_ERROR as u8),
                Error::CommandSpawn { .. } | Error::CommandFailed(_) => {
                    ExitCode::from(exit_codes::COMMAND_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let codec = config.codec.options()?;

    if !args.command.needs_project() {
        return run_standalone(args.command, &config, &codec);
    }

    validate_project(&config)?;
    let project = Project::open(&config)?;

    run_project(args.command, &project)
}

/// Commands that work on names, shell strings and the FS-FAST directory.
fn run_standalone(command: Commands, config: &Config, codec: &CodecOptions) -> Result<()> {
    match command {
        Commands::Decode { files, json } => {
            for file in &files {
                let info = codec.decode(file);
                if json {
                    println!("{}", serde_json::to_string(&info)?);
                } else {
                    print_file_info(file, &info);
                }
            }
        }
        Commands::Encode { json } => {
            let info: FileInfo = serde_json::from_str(&json)?;
            println!("{}", codec.encode(&info));
        }
        Commands::Rename { file, set, drop } => {
            let mut info = codec.decode(&file);
            for key in &drop {
                if info.remove(key).is_none() {
                    print_warning(&format!("Key '{}' not present in {}", key, file));
                }
            }
            for (key, value) in set {
                info.insert(key, value);
            }
            println!("{}", codec.encode(&info));
        }
        Commands::Contrasts { analyses } => {
            let contrasts = analysis_contrasts(&functionals_dir(config)?, &analyses)?;
            for (analysis, names) in analyses.iter().zip(contrasts) {
                print_info(&format!("{}: {}", analysis, names.join(", ")));
            }
        }
        Commands::SessionList { .. } => {
            let func_dir = functionals_dir(config)?;
            let sessions = read_session_list(&func_dir, &config.freesurfer.session_pattern)?;
            for session in sessions {
                println!("{}", session);
            }
        }
        Commands::Run {
            commands,
            dry_run,
            escape,
        } => {
            let commands: Vec<String> = if escape {
                commands.iter().map(|c| escape_command(c, &[])).collect()
            } else {
                commands
            };

            let report = CommandRunner::default().run(&commands, !dry_run)?;
            print_command_report(&report);

            if !report.all_succeeded() {
                return Err(Error::CommandFailed(report.failures()));
            }
        }
        other => {
            return Err(Error::Config(format!(
                "Command requires a project: {:?}",
                other
            )))
        }
    }

    Ok(())
}

/// Commands that operate on the project directories.
fn run_project(command: Commands, project: &Project) -> Result<()> {
    match command {
        Commands::Subjects => {
            print_project_summary(project);
            print_listing("BIDS", Some(&project.bids));
            print_listing("FreeSurfer", project.freesurfer.as_ref());
            print_listing("Functionals", project.functionals.as_ref());
            print_listing("fMRIPrep", project.fmriprep.as_ref());
        }
        Commands::Sessions { subject } => {
            let subject = project
                .select_subjects(&[subject])?
                .into_iter()
                .next()
                .ok_or_else(|| Error::Config("No subject selected".into()))?;

            for dir in session_dirs(&project.paths.subject_dir(&subject))? {
                println!("{}", dir.display());
            }
        }
        Commands::FixFmap { subjects } => {
            let changed = for_each_subject(project, &subjects, "fix-fmap", |subject| {
                fix_fmap(project.bids_dir(), subject)
            })?;
            print_changed("updated", &changed);
        }
        Commands::FixFunc { subjects } => {
            let changed = for_each_subject(project, &subjects, "fix-func", |subject| {
                fix_func(project.bids_dir(), subject, &project.codec)
            })?;
            print_changed("updated", &changed);
        }
        Commands::CopyEvents {
            events_dir,
            subjects,
        } => {
            if !events_dir.is_dir() {
                return Err(Error::DirectoryNotFound(events_dir));
            }

            let copied = for_each_subject(project, &subjects, "copy-events", |subject| {
                copy_subject_events(&events_dir, project.bids_dir(), subject, &project.codec)
            })?;
            print_changed("copied", &copied);
        }
        other => {
            return Err(Error::Config(format!(
                "Command does not operate on a project: {:?}",
                other
            )))
        }
    }

    Ok(())
}

/// Apply `op` to each selected subject, continuing past failures.
fn for_each_subject<F>(
    project: &Project,
    requested: &[String],
    label: &str,
    mut op: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&str) -> Result<Vec<PathBuf>>,
{
    let subjects = project.select_subjects(requested)?;
    let bar = create_item_bar(subjects.len() as u64, label);

    let mut changed = Vec::new();
    let mut failed = 0;

    for subject in &subjects {
        bar.set_message(subject.clone());
        match op(subject) {
            Ok(paths) => changed.extend(paths),
            Err(e) => {
                bar.suspend(|| print_warning(&format!("Failed to process {}: {}", subject, e)));
                failed += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if failed > 0 {
        return Err(Error::SubjectsFailed(failed));
    }

    print_success(&format!("{} subject(s) processed", subjects.len()));
    Ok(changed)
}
