//! Recursive directory walking and load deadlines.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_fs as afs;
use async_io::Timer;
use futures_lite::{future, stream::StreamExt};

use crate::LoadError;

/// Default limit for loading one root.
pub const DEFAULT_WALK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `work` for `root`, failing with [`LoadError::Timeout`] if it takes
/// longer than `timeout`.
///
/// Loaders wrap both the directory walk and every file read of a root in
/// one deadline, so a hung read cannot stall a load.
///
/// # Errors
///
/// Returns the error of `work`, or [`LoadError::Timeout`] when the
/// deadline passes first.
pub async fn with_deadline<T, F>(root: &Path, timeout: Duration, work: F) -> Result<T, LoadError>
where
    F: Future<Output = Result<T, LoadError>>,
{
    let deadline = async {
        Timer::after(timeout).await;
        Err(LoadError::Timeout {
            path: root.to_path_buf(),
            timeout,
        })
    };

    future::or(work, deadline).await
}

/// Collect every file under `root` whose name ends with `suffix`.
///
/// Files are returned sorted by path, so load order is stable across runs.
/// A root that does not exist yields no files. Symlinked files are
/// followed; symlinked directories are not.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if a directory cannot be read.
pub async fn list_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match afs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(source) => return Err(LoadError::Io { path: dir, source }),
        };

        while let Some(entry) = entries
            .try_next()
            .await
            .map_err(|source| LoadError::Io {
                path: dir.clone(),
                source,
            })?
        {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                pending.push(path);
            } else if has_suffix(&path, suffix)
                && (file_type.is_file() || is_symlinked_file(&path).await)
            {
                files.push(path);
            }
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "walked directory");
    Ok(files)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > suffix.len() && name.ends_with(suffix))
}

async fn is_symlinked_file(path: &Path) -> bool {
    afs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}
