//! Atomic publish: write to a sibling temp file, then rename into place.
//!
//! Readers only ever observe the destination as absent or complete. Several
//! processes may publish the same content-addressed path concurrently without
//! any lock: they all write identical bytes, so whichever rename lands last
//! leaves the same file behind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::AssetError;

/// Distinguishes temp files of threads that share a pid and a clock tick.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Result of a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// Our rename made the destination visible.
    Written,
    /// The rename failed but a sibling already published the destination.
    Raced,
}

/// Publish `bytes` at `dest` atomically.
pub fn publish_atomic(dest: &Path, bytes: &[u8]) -> Result<Publish, AssetError> {
    let write_err = |source| AssetError::Write {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = temp_path(dest);
    if let Err(err) = write_temp(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(err));
    }

    match fs::rename(&tmp, dest) {
        Ok(()) => Ok(Publish::Written),
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            if dest.is_file() {
                crate::debug!("assets"; "lost publish race for {}", dest.display());
                Ok(Publish::Raced)
            } else {
                Err(write_err(err))
            }
        }
    }
}

/// Publish `bytes` at a fixed (not content-addressed) path unless the file
/// already holds exactly these bytes. Returns whether anything was written.
pub fn publish_if_changed(dest: &Path, bytes: &[u8]) -> Result<bool, AssetError> {
    if fs::read(dest).is_ok_and(|existing| existing == bytes) {
        return Ok(false);
    }
    if publish_atomic(dest, bytes)? == Publish::Raced {
        ensure_holds(dest, bytes)?;
    }
    Ok(true)
}

/// A fixed-name file kept after a failed rename must already hold `bytes`.
fn ensure_holds(dest: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let write_err = |source| AssetError::Write {
        path: dest.to_path_buf(),
        source,
    };
    let existing = fs::read(dest).map_err(write_err)?;
    if existing != bytes {
        return Err(write_err(io::Error::other(
            "rename failed and the existing file holds different bytes",
        )));
    }
    Ok(())
}

fn write_temp(tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Hidden temp name next to `dest`: `.<name>.<pid>.<nanos>.<seq>.tmp`.
fn temp_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(
        ".{name}.{}.{nanos}.{seq}.tmp",
        std::process::id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;

    /// Whether a file name belongs to an in-flight publish.
    fn is_temp_name(name: &str) -> bool {
        name.starts_with('.') && name.ends_with(".tmp")
    }

    fn temp_leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| is_temp_name(&e.file_name().to_string_lossy()))
            .count()
    }

    #[test]
    fn test_publish_writes_exact_bytes() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.css");

        let result = publish_atomic(&dest, b"a{b:c}").unwrap();
        assert_eq!(result, Publish::Written);
        assert_eq!(fs::read(&dest).unwrap(), b"a{b:c}");
        assert_eq!(temp_leftovers(dir.path()), 0);
    }

    #[test]
    fn test_publish_creates_parent() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("gen/img/out.webp");

        publish_atomic(&dest, b"RIFF").unwrap();
        assert!(dest.is_file());
    }

    #[test]
    fn test_publish_over_existing_keeps_complete_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("same.css");

        publish_atomic(&dest, b"x{y:z}").unwrap();
        publish_atomic(&dest, b"x{y:z}").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"x{y:z}");
        assert_eq!(temp_leftovers(dir.path()), 0);
    }

    #[test]
    fn test_publish_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("gen");
        fs::write(&blocker, "not a dir").unwrap();

        let err = publish_atomic(&blocker.join("out.css"), b"a").unwrap_err();
        assert!(matches!(err, AssetError::Write { .. }));
    }

    #[test]
    fn test_publish_if_changed_skips_identical() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("site.webmanifest");

        assert!(publish_if_changed(&dest, b"{}").unwrap());
        assert!(!publish_if_changed(&dest, b"{}").unwrap());
        assert!(publish_if_changed(&dest, b"{\"name\":\"x\"}").unwrap());
        assert_eq!(fs::read(&dest).unwrap(), b"{\"name\":\"x\"}");
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let dest = Path::new("/tmp/gen/style.min.abc.css");
        let a = temp_path(dest);
        let b = temp_path(dest);
        assert_ne!(a, b);
        assert_eq!(a.parent(), dest.parent());
        assert!(is_temp_name(&a.file_name().unwrap().to_string_lossy()));
    }

    #[test]
    fn test_stale_fixed_file_after_lost_rename_is_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("browserconfig.xml");
        fs::write(&dest, "old").unwrap();

        let err = ensure_holds(&dest, b"new").unwrap_err();
        assert!(matches!(err, AssetError::Write { .. }));
        assert!(ensure_holds(&dest, b"old").is_ok());
        assert!(ensure_holds(&dir.path().join("missing.xml"), b"old").is_err());
    }

    #[test]
    fn test_concurrent_publish_same_dest() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("bundle.min.css");
        let bytes = b".a{color:red}.b{color:blue}".repeat(64 * 1024);
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            let reader = s.spawn(|| {
                let mut complete_reads = 0usize;
                while !done.load(Ordering::Acquire) {
                    if let Ok(seen) = fs::read(&dest) {
                        assert_eq!(seen.len(), bytes.len(), "partial file observed");
                        assert!(seen == bytes);
                        complete_reads += 1;
                    }
                }
                complete_reads
            });

            let writers: Vec<_> = (0..8)
                .map(|_| s.spawn(|| publish_atomic(&dest, &bytes).unwrap()))
                .collect();
            for writer in writers {
                writer.join().unwrap();
            }
            done.store(true, Ordering::Release);
            reader.join().unwrap();
        });

        assert_eq!(fs::read(&dest).unwrap(), bytes);
        assert_eq!(temp_leftovers(dir.path()), 0);
    }
}
