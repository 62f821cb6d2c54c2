use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, warn};

/// Opens a file with whatever the desktop associates with it.
pub trait Launcher {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Spawns the platform's default opener and returns without waiting on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn command(path: &Path) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        }
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        }
        #[cfg(not(any(windows, target_os = "macos")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> io::Result<()> {
        // Detach stdio so the opener cannot scribble over the TUI.
        let child = Self::command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!("Spawned opener (pid {}) for {}", child.id(), path.display());
        reap(child);
        Ok(())
    }
}

/// Wait for the opener on a detached thread so it does not linger as a zombie.
fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("opener-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!("Opener {} exited with {}", pid, status),
            Err(e) => warn!("Failed to wait for opener {}: {}", pid, e),
        });
    if let Err(e) = spawned {
        warn!("Failed to start reaper for opener {}: {}", pid, e);
    }
}

/// Launcher that does nothing, used when opening after export is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLauncher;

impl Launcher for NoopLauncher {
    fn open(&self, path: &Path) -> io::Result<()> {
        debug!("Not opening {} (disabled)", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_finished_opener_is_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let proc_entry = Path::new("/proc").join(child.id().to_string());
        reap(child);

        // A zombie keeps its /proc entry until its parent waits on it.
        let deadline = Instant::now() + Duration::from_secs(5);
        while proc_entry.exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!proc_entry.exists());
    }

    #[test]
    fn test_noop_launcher_accepts_missing_file() {
        assert!(NoopLauncher.open(Path::new("/no/such/file.xlsx")).is_ok());
    }
}
