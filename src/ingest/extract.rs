use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufReader},
    path::{Component, Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tempfile::TempDir;
use tracing::{debug, instrument, trace};
use zip::{result::ZipError, ZipArchive};

use crate::{
    error::{Error, Result},
    ingest::WorkDir,
};

/// Serializes every call that unpacks into a persistent directory.
static PERSISTENT_LOCK: Mutex<()> = Mutex::new(());

/// A working directory held for the duration of one ingestion call.
///
/// The temporary variant deletes itself on drop, on every exit path.
#[derive(Debug)]
pub enum Workspace {
    Scratch(TempDir),
    Persistent {
        path: PathBuf,
        _guard: MutexGuard<'static, ()>,
    },
}

impl Workspace {
    pub fn acquire(work_dir: &WorkDir) -> Result<Self> {
        match work_dir {
            WorkDir::Temporary { parent } => {
                let mut builder = tempfile::Builder::new();
                builder.prefix("zipingest-");
                let dir = match parent {
                    Some(parent) => {
                        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
                        builder.tempdir_in(parent)
                    }
                    None => builder.tempdir(),
                }
                .map_err(|e| Error::io(parent.clone().unwrap_or_else(std::env::temp_dir), e))?;
                debug!(dir = %dir.path().display(), "created scratch directory");
                Ok(Workspace::Scratch(dir))
            }
            WorkDir::Persistent(path) => {
                let guard = PERSISTENT_LOCK
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
                Ok(Workspace::Persistent {
                    path: path.clone(),
                    _guard: guard,
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Workspace::Scratch(dir) => dir.path(),
            Workspace::Persistent { path, .. } => path,
        }
    }
}

/// Map an entry name onto a path relative to the working directory.
///
/// Returns `Ok(None)` for names that resolve to the directory itself
/// (e.g. `./`). Absolute names, drive prefixes and `..` are refused.
/// Backslashes are treated as separators on every platform.
pub fn sanitize_entry_path(name: &str) -> Result<Option<PathBuf>> {
    let unsafe_entry = || Error::UnsafeEntry {
        entry: name.to_string(),
    };
    if name.contains('\0') {
        return Err(unsafe_entry());
    }

    let normalized = name.replace('\\', "/");
    let mut relative = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_entry())
            }
        }
    }

    Ok((!relative.as_os_str().is_empty()).then_some(relative))
}

/// Unpack every entry of the zip at `archive_path` into `dest`.
///
/// All entry names are checked before anything is written, so an archive
/// with a single escaping or self-conflicting entry leaves `dest`
/// untouched. Entries are streamed to disk; the sizes the archive declares
/// are never used to allocate. Returns the number of files written.
#[instrument(level = "debug", skip_all, fields(archive = %archive_path.display(), dest = %dest.display()))]
pub fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .map_err(|e| Error::archive(archive_path, ZipError::Io(e)))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| Error::archive(archive_path, e))?;

    // 1) resolve every entry up front
    let mut plan: Vec<(usize, PathBuf, bool)> = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| Error::archive(archive_path, e))?;
        if entry.enclosed_name().is_none() {
            return Err(Error::UnsafeEntry {
                entry: entry.name().to_string(),
            });
        }
        if let Some(relative) = sanitize_entry_path(entry.name())? {
            plan.push((i, relative, entry.is_dir()));
        }
    }
    check_conflicts(&plan)?;

    // 2) write them out
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let mut written = 0;
    for (i, relative, is_dir) in plan {
        let target = dest.join(relative);
        if is_dir {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::archive(archive_path, e))?;
        let mut out = File::create(&target).map_err(|e| Error::io(&target, e))?;
        let bytes = io::copy(&mut entry, &mut out)
            .map_err(|e| Error::archive(archive_path, ZipError::Io(e)))?;

        trace!(entry = %target.display(), bytes, "unpacked");
        written += 1;
    }

    Ok(written)
}

/// A file entry may not also be used as a directory by another entry,
/// e.g. `a` next to `a/` or `a/b.csv`.
fn check_conflicts(plan: &[(usize, PathBuf, bool)]) -> Result<()> {
    let files: HashSet<&Path> = plan
        .iter()
        .filter(|(_, _, is_dir)| !is_dir)
        .map(|(_, p, _)| p.as_path())
        .collect();

    for (_, relative, is_dir) in plan {
        let clash = relative
            .ancestors()
            .skip(1)
            .chain(is_dir.then_some(relative.as_path()))
            .find(|a| files.contains(a));
        if let Some(clash) = clash {
            return Err(Error::ConflictingEntry {
                entry: relative.display().to_string(),
                file: clash.display().to_string(),
            });
        }
    }
    Ok(())
}
