use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    ingest::TABLE_SUFFIX,
};

/// Regular files directly inside `dir` whose name ends in `.csv`
/// (any case), sorted by name. Subdirectories are not searched.
pub fn table_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), "cannot read directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let is_table = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase().ends_with(TABLE_SUFFIX))
            .unwrap_or(false);
        if is_table && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Apply the exactly-one policy: the directory must hold a single table
/// file, never zero and never several.
pub fn find_single_table(dir: &Path) -> Result<PathBuf> {
    let mut candidates = table_candidates(dir)?;
    debug!(dir = %dir.display(), count = candidates.len(), "table candidates");

    match candidates.len() {
        0 => Err(Error::NoTableFound {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::AmbiguousTable {
            candidates: candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn exactly_one_is_returned() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("Data.CSV"), "a\n").unwrap();

        let found = find_single_table(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Data.CSV");
    }

    #[test]
    fn none_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let err = find_single_table(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTableFound);
    }

    #[test]
    fn several_are_listed_in_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "a\n").unwrap();
        fs::write(dir.path().join("a.csv"), "a\n").unwrap();

        match find_single_table(dir.path()) {
            Err(Error::AmbiguousTable { candidates }) => {
                assert_eq!(candidates, vec!["a.csv", "b.csv"])
            }
            other => panic!("expected AmbiguousTable, got {other:?}"),
        }
    }

    #[test]
    fn nested_and_directory_matches_are_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.csv"), "a\n").unwrap();
        fs::create_dir_all(dir.path().join("folder.csv")).unwrap();

        assert!(table_candidates(dir.path()).unwrap().is_empty());
    }
}
