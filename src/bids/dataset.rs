//! BIDS dataset maintenance.
//!
//! Helpers that tidy a freshly converted dataset: subject and session
//! discovery, `IntendedFor` lists for field maps, `TaskName` entries for
//! functional runs, and events files copied next to each run.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::bids::filename::CodecOptions;
use crate::bids::sidecar::update_sidecar;
use crate::error::Result;
use crate::fs::{list_files_with_suffix, list_matching};

/// Prefix of session folders inside a subject folder.
pub const SESSION_PATTERN: &str = "ses-";

/// Suffixes of functional images a field map can be intended for.
const BOLD_IMAGE_SUFFIXES: &[&str] = &["_bold.nii.gz", "_bold.nii"];

const INTENDED_FOR: &str = "IntendedFor";
const TASK_NAME: &str = "TaskName";
const EVENTS_MODALITY: &str = "events";
const EVENTS_EXT: &str = ".tsv";

/// List subject folders in a BIDS root.
pub fn subjects(bids_dir: &Path, pattern: &str) -> Result<Vec<String>> {
    list_matching(bids_dir, pattern)
}

/// Session roots of a subject.
///
/// A subject without `ses-*` folders has a single session rooted at the
/// subject folder itself.
pub fn session_dirs(subject_dir: &Path) -> Result<Vec<PathBuf>> {
    let sessions = list_matching(subject_dir, SESSION_PATTERN)?;

    if sessions.is_empty() {
        return Ok(vec![subject_dir.to_path_buf()]);
    }

    Ok(sessions.iter().map(|s| subject_dir.join(s)).collect())
}

/// Functional images in a `func` folder, sorted by name.
pub fn functional_images(func_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for suffix in BOLD_IMAGE_SUFFIXES {
        images.extend(list_files_with_suffix(func_dir, suffix)?);
    }
    images.sort();
    Ok(images)
}

/// Point every field map of a subject at the functional runs of its session.
///
/// `IntendedFor` paths are relative to the subject folder and use `/`.
/// Returns the sidecars that were rewritten.
pub fn fix_fmap(bids_dir: &Path, subject: &str) -> Result<Vec<PathBuf>> {
    let subject_dir = bids_dir.join(subject);
    let mut updated = Vec::new();

    for session in session_dirs(&subject_dir)? {
        let intended: Vec<Value> = functional_images(&session.join("func"))?
            .iter()
            .filter_map(|image| image.strip_prefix(&subject_dir).ok())
            .map(|rel| Value::String(to_slash_path(rel)))
            .collect();

        let fmaps = list_files_with_suffix(&session.join("fmap"), ".json")?;
        if fmaps.is_empty() {
            continue;
        }

        if intended.is_empty() {
            tracing::warn!(
                "No functional runs for the field maps in {}",
                session.display()
            );
            continue;
        }

        let intended = Value::Array(intended);
        for fmap in fmaps {
            let changed = update_sidecar(&fmap, |sidecar| {
                if sidecar.get(INTENDED_FOR) == Some(&intended) {
                    return false;
                }
                sidecar.insert(INTENDED_FOR.to_string(), intended.clone());
                true
            })?;

            if changed {
                updated.push(fmap);
            }
        }
    }

    tracing::info!("{}: updated {} field map sidecar(s)", subject, updated.len());
    Ok(updated)
}

/// Set `TaskName` in the functional sidecars of a subject from the `task` entity.
///
/// Returns the sidecars that were rewritten.
pub fn fix_func(bids_dir: &Path, subject: &str, options: &CodecOptions) -> Result<Vec<PathBuf>> {
    let subject_dir = bids_dir.join(subject);
    let mut updated = Vec::new();

    for session in session_dirs(&subject_dir)? {
        for sidecar_file in list_files_with_suffix(&session.join("func"), "_bold.json")? {
            let info = options.decode(&sidecar_file.to_string_lossy());

            let Some(task) = info.get("task") else {
                tracing::warn!("No task entity in {}", sidecar_file.display());
                continue;
            };

            let changed = update_sidecar(&sidecar_file, |sidecar| {
                if sidecar.get(TASK_NAME).and_then(Value::as_str) == Some(task) {
                    return false;
                }
                sidecar.insert(TASK_NAME.to_string(), Value::String(task.to_string()));
                true
            })?;

            if changed {
                updated.push(sidecar_file);
            }
        }
    }

    tracing::info!("{}: updated {} functional sidecar(s)", subject, updated.len());
    Ok(updated)
}

/// Copy events templates next to the functional runs in `func_dir`.
///
/// A template is any `.tsv` file in `events_dir` whose modality is `events`;
/// JSON sidecars of the same name are ignored. It applies to a run when all
/// of its explicit entities (e.g. `task`, `run`) equal the run's; the
/// template with the most entities wins. The copy is named after the run
/// with modality `events` and extension `.tsv`.
pub fn copy_events(events_dir: &Path, func_dir: &Path, options: &CodecOptions) -> Result<Vec<PathBuf>> {
    let templates: Vec<_> = list_files_with_suffix(events_dir, "")?
        .into_iter()
        .map(|path| {
            let info = options.decode(&path.to_string_lossy());
            (path, info)
        })
        .filter(|(_, info)| {
            info.modality() == Some(EVENTS_MODALITY) && info.ext() == EVENTS_EXT
        })
        .collect();

    let mut copied = Vec::new();

    for image in functional_images(func_dir)? {
        let info = options.decode(&image.to_string_lossy());

        let mut best: Option<(&PathBuf, usize)> = None;
        for (template, template_info) in &templates {
            let entities: Vec<_> = template_info.entities().collect();
            let applies = entities.iter().all(|(k, v)| info.get(k) == Some(*v));

            if applies && best.map_or(true, |(_, count)| entities.len() > count) {
                best = Some((template, entities.len()));
            }
        }

        let Some((template, _)) = best else {
            tracing::warn!("No events template for {}", image.display());
            continue;
        };

        let mut target = info.clone();
        target.set_modality(EVENTS_MODALITY);
        target.set_ext(EVENTS_EXT);
        let target = func_dir.join(options.encode(&target));

        fs::copy(template, &target)?;
        tracing::debug!("Copied {} -> {}", template.display(), target.display());
        copied.push(target);
    }

    Ok(copied)
}

/// Copy events templates for every session of a subject.
pub fn copy_subject_events(
    events_dir: &Path,
    bids_dir: &Path,
    subject: &str,
    options: &CodecOptions,
) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for session in session_dirs(&bids_dir.join(subject))? {
        copied.extend(copy_events(events_dir, &session.join("func"), options)?);
    }

    tracing::info!("{}: copied {} events file(s)", subject, copied.len());
    Ok(copied)
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bids::sidecar::read_sidecar;
    use serde_json::json;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_subjects_and_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        fs::create_dir_all(bids.join("sub-01/ses-1")).unwrap();
        fs::create_dir_all(bids.join("sub-01/ses-2")).unwrap();
        fs::create_dir_all(bids.join("sub-02/anat")).unwrap();
        touch(&bids.join("dataset_description.json"), "{}");

        assert_eq!(subjects(bids, "sub-*").unwrap(), vec!["sub-01", "sub-02"]);
        assert_eq!(
            session_dirs(&bids.join("sub-01")).unwrap(),
            vec![bids.join("sub-01/ses-1"), bids.join("sub-01/ses-2")]
        );
        assert_eq!(
            session_dirs(&bids.join("sub-02")).unwrap(),
            vec![bids.join("sub-02")]
        );
    }

    #[test]
    fn test_fix_fmap_with_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        let ses = bids.join("sub-01/ses-1");
        touch(&ses.join("func/sub-01_ses-1_task-a_run-2_bold.nii.gz"), "");
        touch(&ses.join("func/sub-01_ses-1_task-a_run-1_bold.nii.gz"), "");
        touch(&ses.join("func/sub-01_ses-1_task-a_run-1_bold.json"), "{}");
        touch(&ses.join("fmap/sub-01_ses-1_dir-AP_epi.json"), "{\"EchoTime\": 0.05}");

        let updated = fix_fmap(bids, "sub-01").unwrap();
        assert_eq!(updated, vec![ses.join("fmap/sub-01_ses-1_dir-AP_epi.json")]);

        let sidecar = read_sidecar(&updated[0]).unwrap();
        assert_eq!(sidecar["EchoTime"], json!(0.05));
        assert_eq!(
            sidecar["IntendedFor"],
            json!([
                "ses-1/func/sub-01_ses-1_task-a_run-1_bold.nii.gz",
                "ses-1/func/sub-01_ses-1_task-a_run-2_bold.nii.gz"
            ])
        );

        // Second pass has nothing to change.
        assert!(fix_fmap(bids, "sub-01").unwrap().is_empty());
    }

    #[test]
    fn test_fix_fmap_without_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        let sub = bids.join("sub-02");
        touch(&sub.join("func/sub-02_task-rest_bold.nii"), "");
        touch(&sub.join("fmap/sub-02_epi.json"), "{}");

        fix_fmap(bids, "sub-02").unwrap();
        let sidecar = read_sidecar(&sub.join("fmap/sub-02_epi.json")).unwrap();
        assert_eq!(sidecar["IntendedFor"], json!(["func/sub-02_task-rest_bold.nii"]));
    }

    #[test]
    fn test_fix_func_sets_task_name() {
        let dir = tempfile::tempdir().unwrap();
        let bids = dir.path();
        let func = bids.join("sub-01/func");
        touch(&func.join("sub-01_task-faces_run-1_bold.json"), "{\"RepetitionTime\": 2}");
        touch(&func.join("sub-01_task-rest_bold.json"), "{\"TaskName\": \"rest\"}");
        touch(&func.join("sub-01_run-1_bold.json"), "{}");

        let options = CodecOptions::default();
        let updated = fix_func(bids, "sub-01", &options).unwrap();
        assert_eq!(updated, vec![func.join("sub-01_task-faces_run-1_bold.json")]);

        let sidecar = read_sidecar(&updated[0]).unwrap();
        assert_eq!(sidecar["TaskName"], json!("faces"));
        assert_eq!(sidecar["RepetitionTime"], json!(2));
    }

    #[test]
    fn test_copy_events_picks_most_specific_template() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events");
        let func = dir.path().join("bids/sub-01/func");
        touch(&events.join("task-faces_events.tsv"), "generic");
        touch(&events.join("task-faces_run-2_events.tsv"), "run2");
        touch(&events.join("task-faces_run-2_notes.txt"), "ignored");
        touch(&func.join("sub-01_task-faces_run-1_bold.nii.gz"), "");
        touch(&func.join("sub-01_task-faces_run-2_bold.nii.gz"), "");
        touch(&func.join("sub-01_task-rest_bold.nii.gz"), "");

        let options = CodecOptions::default();
        let copied = copy_events(&events, &func, &options).unwrap();
        assert_eq!(copied.len(), 2);

        let run1 = func.join("sub-01_task-faces_run-1_events.tsv");
        let run2 = func.join("sub-01_task-faces_run-2_events.tsv");
        assert_eq!(fs::read_to_string(run1).unwrap(), "generic");
        assert_eq!(fs::read_to_string(run2).unwrap(), "run2");
        assert!(!func.join("sub-01_task-rest_events.tsv").exists());
    }

    #[test]
    fn test_copy_events_ignores_json_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events");
        let func = dir.path().join("bids/sub-01/func");
        touch(&events.join("task-faces_events.json"), "{\"onset\": {}}");
        touch(&events.join("task-faces_events.tsv"), "onset\tduration\n");
        touch(&func.join("sub-01_task-faces_bold.nii.gz"), "");

        let copied = copy_events(&events, &func, &CodecOptions::default()).unwrap();
        assert_eq!(copied, vec![func.join("sub-01_task-faces_events.tsv")]);
        assert_eq!(fs::read_to_string(&copied[0]).unwrap(), "onset\tduration\n");
    }

    #[test]
    fn test_copy_subject_events_over_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events");
        let bids = dir.path().join("bids");
        touch(&events.join("task-a_events.tsv"), "onset");
        touch(&bids.join("sub-01/ses-1/func/sub-01_ses-1_task-a_bold.nii.gz"), "");
        touch(&bids.join("sub-01/ses-2/func/sub-01_ses-2_task-a_bold.nii.gz"), "");

        let copied =
            copy_subject_events(&events, &bids, "sub-01", &CodecOptions::default()).unwrap();
        assert_eq!(
            copied,
            vec![
                bids.join("sub-01/ses-1/func/sub-01_ses-1_task-a_events.tsv"),
                bids.join("sub-01/ses-2/func/sub-01_ses-2_task-a_events.tsv"),
            ]
        );
    }
}
