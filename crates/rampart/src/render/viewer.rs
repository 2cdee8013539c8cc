//! Opening rendered artifacts in the platform viewer.

use std::{
    io,
    path::Path,
    process::{Command, Stdio},
};

use log::debug;

/// Launches the platform's default viewer for `path` without waiting for it.
pub(crate) fn open(path: &Path) -> io::Result<()> {
    let mut command = opener();
    command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    debug!(path:% = path.display(); "Opening artifact");
    command.spawn().map(|_| ())
}

fn opener() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    }
}
