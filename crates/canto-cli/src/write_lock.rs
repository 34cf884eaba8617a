use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::context::PROJECT_MARKER;

const LOCK_FILE: &str = "generate.lock";

/// Removes the lock file when dropped.
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Take the project's generation lock, reclaiming it if its owner is gone.
pub fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    let lock_path = project_root.join(PROJECT_MARKER).join(LOCK_FILE);

    match try_acquire(&lock_path) {
        Ok(guard) => Ok(guard),
        Err(LockState::HeldBy(pid)) => anyhow::bail!(
            "another generation is running (pid {pid}); try again after it finishes"
        ),
        Err(LockState::Stale) => {
            tracing::debug!(path = %lock_path.display(), "removing stale generation lock");
            let _ = std::fs::remove_file(&lock_path);
            try_acquire(&lock_path).map_err(|_| lock_error(&lock_path))
        }
        Err(LockState::Unknown) => Err(lock_error(&lock_path)),
    }
}

fn lock_error(lock_path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "could not acquire generation lock at {}; remove the lock file if no canto process is running",
        lock_path.display()
    )
}

#[derive(Debug)]
enum LockState {
    HeldBy(i32),
    Stale,
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let pid = std::process::id();
            let _ = writeln!(file, "{pid}");
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut pid_buf = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut pid_buf))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match pid_buf.trim().parse::<i32>().ok() {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(_) => Err(LockState::Stale),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: i32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
