//! Open a file with the platform's default application.
//!
//! Best-effort only: failures are logged and reported as `false`.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Launch the default viewer for `path`. Returns whether the launcher succeeded.
pub async fn open(path: &Path) -> bool {
    let mut command = launcher(path);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match command.status().await {
        Ok(status) if status.success() => {
            log::debug!("Opened {}", path.display());
            true
        }
        Ok(status) => {
            log::warn!("Opening {} failed: launcher exited with {status}", path.display());
            false
        }
        Err(e) => {
            log::warn!("Cannot open {}: {e}", path.display());
            false
        }
    }
}

#[cfg(target_os = "windows")]
fn launcher(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn launcher(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn launcher(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_launcher_program() {
        let command = launcher(Path::new("/tmp/x.pdf"));
        assert_eq!(command.as_std().get_program(), "xdg-open");
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(args, vec!["/tmp/x.pdf"]);
    }
}
