use glob::Pattern;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands command-line inputs into the list of files to process
///
/// - Inputs containing `?` or `*` are file-name patterns, matched against
///   the files of the pattern's folder
/// - Folders contribute every file they contain
/// - Anything else is taken as a file as-is
///
/// With `recursive`, patterns and folders also descend into subfolders.
pub fn resolve_inputs(inputs: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.to_string_lossy().contains(['?', '*']) {
            files.extend(find_matching_files(input, recursive));
        } else if input.is_dir() {
            files.extend(find_files(input, None, recursive));
        } else {
            files.push(input.clone());
        }
    }

    debug!("Resolved {} file(s)", files.len());
    files
}

fn find_matching_files(input: &Path, recursive: bool) -> Vec<PathBuf> {
    let folder = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let Some(file_name) = input.file_name() else {
        error!("Invalid file pattern '{}'", input.display());
        return Vec::new();
    };

    match Pattern::new(&file_name.to_string_lossy()) {
        Ok(pattern) => find_files(folder, Some(&pattern), recursive),
        Err(e) => {
            error!("Invalid file pattern '{}': {}", input.display(), e);
            Vec::new()
        }
    }
}

/// Lists regular files under `folder`, sorted by name
fn find_files(folder: &Path, pattern: Option<&Pattern>, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(folder).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let matches = pattern
                    .map_or(true, |p| p.matches(&entry.file_name().to_string_lossy()));
                if matches {
                    files.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry: {}", e),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        File::create(root.join("a.dcm")).unwrap();
        File::create(root.join("b.dcm")).unwrap();
        File::create(root.join("notes.txt")).unwrap();
        fs::create_dir(root.join("series")).unwrap();
        File::create(root.join("series").join("c.dcm")).unwrap();
        temp_dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_folder_is_not_recursive_by_default() {
        let temp_dir = layout();
        let files = resolve_inputs(&[temp_dir.path().to_path_buf()], false);
        assert_eq!(names(&files), vec!["a.dcm", "b.dcm", "notes.txt"]);
    }

    #[test]
    fn test_folder_recursive() {
        let temp_dir = layout();
        let files = resolve_inputs(&[temp_dir.path().to_path_buf()], true);
        assert_eq!(files.len(), 4);
        assert!(files.contains(&temp_dir.path().join("series").join("c.dcm")));
    }

    #[test]
    fn test_pattern() {
        let temp_dir = layout();
        let pattern = temp_dir.path().join("*.dcm");

        let files = resolve_inputs(&[pattern.clone()], false);
        assert_eq!(names(&files), vec!["a.dcm", "b.dcm"]);

        let files = resolve_inputs(&[pattern], true);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_question_mark_pattern() {
        let temp_dir = layout();
        let files = resolve_inputs(&[temp_dir.path().join("?.dcm")], false);
        assert_eq!(names(&files), vec!["a.dcm", "b.dcm"]);
    }

    #[test]
    fn test_literal_file_is_kept_even_if_missing() {
        let files = resolve_inputs(&[PathBuf::from("/nonexistent/slice.dcm")], false);
        assert_eq!(files, vec![PathBuf::from("/nonexistent/slice.dcm")]);
    }
}
