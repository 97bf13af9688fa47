use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use super::model::{Axis, Components};
use crate::error::CombineError;

/// File-name suffix shared by every component spectrogram.
pub const SPECTROGRAM_SUFFIX: &str = "spectrogram.csv";

// ---------------------------------------------------------------------------
// Name pattern: `{quantity}_{axis}_*spectrogram.csv`
// ---------------------------------------------------------------------------

/// Matches file names of the form `{quantity}_{axis}_*spectrogram.csv`,
/// where `*` is any (possibly empty) run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPattern {
    prefix: String,
}

impl ComponentPattern {
    pub fn new(quantity: &str, axis: Axis) -> Self {
        ComponentPattern {
            prefix: format!("{quantity}_{axis}_"),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() >= self.prefix.len() + SPECTROGRAM_SUFFIX.len()
            && file_name.starts_with(&self.prefix)
            && file_name.ends_with(SPECTROGRAM_SUFFIX)
    }
}

// ---------------------------------------------------------------------------
// Classification: exactly one match per component
// ---------------------------------------------------------------------------

/// Outcome of looking for one component's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentMatch {
    Found(PathBuf),
    Missing,
    Ambiguous(Vec<PathBuf>),
}

/// Tag a list of candidate paths. Never picks one of several.
pub fn classify_matches(mut matches: Vec<PathBuf>) -> ComponentMatch {
    match matches.len() {
        0 => ComponentMatch::Missing,
        1 => ComponentMatch::Found(matches.remove(0)),
        _ => {
            matches.sort();
            ComponentMatch::Ambiguous(matches)
        }
    }
}

/// Pick the x, y and z files for `quantity` out of `files`.
///
/// Missing components are reported before ambiguous ones; both errors name
/// every offending axis, not just the first.
pub fn select_components(
    files: &[PathBuf],
    quantity: &str,
    dir: &Path,
) -> Result<Components<PathBuf>, CombineError> {
    if quantity.is_empty() {
        return Err(CombineError::InvalidQuery);
    }

    let found = Components::from_fn(|axis| {
        let pattern = ComponentPattern::new(quantity, axis);
        let candidates = files
            .iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| pattern.matches(name))
            })
            .cloned()
            .collect();
        classify_matches(candidates)
    });

    let missing: Vec<Axis> = found
        .iter()
        .filter(|(_, m)| **m == ComponentMatch::Missing)
        .map(|(axis, _)| axis)
        .collect();
    if !missing.is_empty() {
        return Err(CombineError::MissingComponents {
            axes: missing,
            dir: dir.to_path_buf(),
        });
    }

    let ambiguous: Vec<(Axis, Vec<PathBuf>)> = found
        .iter()
        .filter_map(|(axis, m)| match m {
            ComponentMatch::Ambiguous(paths) => Some((axis, paths.clone())),
            _ => None,
        })
        .collect();
    if !ambiguous.is_empty() {
        return Err(CombineError::AmbiguousComponents { matches: ambiguous });
    }

    found.try_map(|axis, m| match m {
        ComponentMatch::Found(path) => Ok(path),
        _ => Err(CombineError::MissingComponents {
            axes: vec![axis],
            dir: dir.to_path_buf(),
        }),
    })
}

// ---------------------------------------------------------------------------
// Filesystem walk
// ---------------------------------------------------------------------------

/// Find the component files for `quantity` anywhere below `root`.
pub fn resolve_components(root: &Path, quantity: &str) -> Result<Components<PathBuf>> {
    if !root.is_dir() {
        return Err(CombineError::SearchRoot(root.to_path_buf()).into());
    }
    let files = collect_files(root).with_context(|| format!("listing {}", root.display()))?;
    debug!("{} files below {}", files.len(), root.display());
    Ok(select_components(&files, quantity, root)?)
}

/// Recursively gather regular files below `root`. Only failing to list
/// `root` itself is an error; unreadable entries further down are logged and
/// skipped. Symlinked directories are not entered.
fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(fs::read_dir(root)?, &mut files);
    Ok(files)
}

fn walk(entries: fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable directory entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => match fs::read_dir(&path) {
                Ok(sub) => walk(sub, files),
                Err(e) => warn!("skipping {}: {e}", path.display()),
            },
            Ok(_) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn pattern_requires_prefix_and_suffix() {
        let p = ComponentPattern::new("p", Axis::X);
        assert!(p.matches("p_x_1_spectrogram.csv"));
        assert!(p.matches("p_x_spectrogram.csv"));
        assert!(p.matches("p_x_point_12_fine_spectrogram.csv"));
        assert!(!p.matches("p_y_1_spectrogram.csv"));
        assert!(!p.matches("pp_x_1_spectrogram.csv"));
        assert!(!p.matches("p_x_1_spectrogram.png"));
        assert!(!p.matches("p_combined_1_spectrogram.csv"));
    }

    #[test]
    fn classify_is_tagged() {
        assert_eq!(classify_matches(vec![]), ComponentMatch::Missing);
        assert_eq!(
            classify_matches(paths(&["a"])),
            ComponentMatch::Found(PathBuf::from("a"))
        );
        assert_eq!(
            classify_matches(paths(&["b", "a"])),
            ComponentMatch::Ambiguous(paths(&["a", "b"]))
        );
    }

    #[test]
    fn selects_one_file_per_axis() {
        let files = paths(&[
            "case/p_x_1_spectrogram.csv",
            "case/p_y_1_spectrogram.csv",
            "case/sub/p_z_1_spectrogram.csv",
            "case/p_x_1_spectrogram.png",
            "case/u_x_1_spectrogram.csv",
        ]);
        let c = select_components(&files, "p", Path::new("case")).unwrap();
        assert_eq!(c.x, PathBuf::from("case/p_x_1_spectrogram.csv"));
        assert_eq!(c.z, PathBuf::from("case/sub/p_z_1_spectrogram.csv"));
    }

    #[test]
    fn missing_components_are_all_named() {
        let files = paths(&["p_x_1_spectrogram.csv"]);
        let err = select_components(&files, "p", Path::new("case")).unwrap_err();
        match err {
            CombineError::MissingComponents { axes, .. } => {
                assert_eq!(axes, vec![Axis::Y, Axis::Z])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ambiguous_component_is_named() {
        let files = paths(&[
            "p_x_1_spectrogram.csv",
            "p_y_1_spectrogram.csv",
            "p_y_2_spectrogram.csv",
            "p_z_1_spectrogram.csv",
        ]);
        let err = select_components(&files, "p", Path::new("case")).unwrap_err();
        match &err {
            CombineError::AmbiguousComponents { matches } => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].0, Axis::Y);
                assert_eq!(matches[0].1.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("p_y_2_spectrogram.csv"));
    }

    #[test]
    fn missing_wins_over_ambiguous() {
        let files = paths(&["p_x_1_spectrogram.csv", "p_x_2_spectrogram.csv"]);
        let err = select_components(&files, "p", Path::new("case")).unwrap_err();
        assert!(matches!(err, CombineError::MissingComponents { .. }));
    }

    #[test]
    fn empty_quantity_is_rejected() {
        let err = select_components(&[], "", Path::new("case")).unwrap_err();
        assert!(matches!(err, CombineError::InvalidQuery));
    }

    #[test]
    fn resolve_walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("wss_x_0_spectrogram.csv"), "").unwrap();
        fs::write(dir.path().join("a").join("wss_y_0_spectrogram.csv"), "").unwrap();
        fs::write(nested.join("wss_z_0_spectrogram.csv"), "").unwrap();

        let c = resolve_components(dir.path(), "wss").unwrap();
        assert_eq!(c.z, nested.join("wss_z_0_spectrogram.csv"));
    }

    #[test]
    fn resolve_requires_existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_components(&dir.path().join("nope"), "p").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CombineError>(),
            Some(CombineError::SearchRoot(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn locked_subdirectory_does_not_block_triple() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        for axis in Axis::ALL {
            fs::write(dir.path().join(format!("p_{axis}_1_spectrogram.csv")), "").unwrap();
        }
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits are not enforced for root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = resolve_components(dir.path(), "p");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let c = result.unwrap();
        assert_eq!(c.x, dir.path().join("p_x_1_spectrogram.csv"));
        assert_eq!(c.z, dir.path().join("p_z_1_spectrogram.csv"));
    }
}
