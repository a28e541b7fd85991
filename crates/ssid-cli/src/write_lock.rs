//! Single-writer lock on the data directory.
//!
//! The lock is a file created with `create_new`, holding the owner's pid and
//! start time as JSON. Locks whose owner is gone are reclaimed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(30);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Removes the lock file when dropped.
#[derive(Debug)]
pub struct DataDirLock {
    path: PathBuf,
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), %error, "lock file already gone");
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockHolder {
    pid: u32,
    since: DateTime<Utc>,
}

#[derive(Debug)]
enum Contention {
    Live(LockHolder),
    Stale(u32),
    Unreadable,
}

/// Take the lock at `lock_path`, waiting up to 30 seconds for a running
/// ssidmap process to release it.
pub async fn acquire(lock_path: &Path) -> anyhow::Result<DataDirLock> {
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let deadline = tokio::time::Instant::now() + LOCK_WAIT_TIMEOUT;
    loop {
        let contention = match try_lock(lock_path)
            .with_context(|| format!("failed to create lock file {}", lock_path.display()))?
        {
            Ok(lock) => return Ok(lock),
            Err(contention) => contention,
        };

        match contention {
            Contention::Stale(pid) => {
                tracing::warn!(path = %lock_path.display(), pid, "reclaiming lock left by a dead process");
                let _ = std::fs::remove_file(lock_path);
                continue;
            }
            Contention::Live(holder) if tokio::time::Instant::now() >= deadline => {
                anyhow::bail!(
                    "another ssidmap process (pid {}, running since {}) is using {}",
                    holder.pid,
                    holder.since.to_rfc3339(),
                    lock_path.display()
                );
            }
            Contention::Unreadable if tokio::time::Instant::now() >= deadline => {
                anyhow::bail!(
                    "lock file {} is unreadable; remove it if no ssidmap process is running",
                    lock_path.display()
                );
            }
            Contention::Live(holder) => {
                tracing::debug!(pid = holder.pid, "waiting for data directory lock");
            }
            Contention::Unreadable => {}
        }
        tokio::time::sleep(LOCK_RETRY_DELAY).await;
    }
}

/// One attempt. The outer error is an I/O failure other than contention.
fn try_lock(lock_path: &Path) -> std::io::Result<Result<DataDirLock, Contention>> {
    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let holder = LockHolder {
                pid: std::process::id(),
                since: Utc::now(),
            };
            serde_json::to_writer(&mut file, &holder)?;
            file.flush()?;
            Ok(Ok(DataDirLock {
                path: lock_path.to_path_buf(),
            }))
        }
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(Err(inspect(lock_path)))
        }
        Err(error) => Err(error),
    }
}

fn inspect(lock_path: &Path) -> Contention {
    let Ok(raw) = std::fs::read_to_string(lock_path) else {
        return Contention::Unreadable;
    };
    match serde_json::from_str::<LockHolder>(&raw) {
        Ok(holder) if process_alive(holder.pid) => Contention::Live(holder),
        Ok(holder) => Contention::Stale(holder.pid),
        Err(_) => Contention::Unreadable,
    }
}

fn process_alive(pid: u32) -> bool {
    let proc_root = Path::new("/proc");
    if proc_root.is_dir() {
        return proc_root.join(pid.to_string()).exists();
    }
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .is_ok_and(|status| status.success())
}
