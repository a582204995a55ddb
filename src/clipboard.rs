use anyhow::Result;
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;

pub const DAEMON_FLAG: &str = "__clipboard_daemon";

/// On Linux the clipboard contents die with the process, so the actual
/// set happens in a detached re-exec of ourselves that waits until the
/// selection is claimed. Returns Ok(true) if this process was the daemon.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if std::env::args().any(|a| a == DAEMON_FLAG) {
        #[cfg(target_os = "linux")]
        run_daemon_mode()?;
        #[cfg(not(target_os = "linux"))]
        eprintln!(
            "⚠️  Warning: {} flag used on a non-Linux system. Ignoring.",
            DAEMON_FLAG
        );
        return Ok(true);
    }
    Ok(false)
}

#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;
    let mut clipboard = Clipboard::new()?;
    clipboard.set().wait().text(text)?;
    Ok(())
}

pub fn copy_text_to_clipboard(text: String) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()?;

        match child.stdin.take() {
            Some(mut stdin) => {
                stdin.write_all(text.as_bytes())?;
                stdin.flush()?;
            }
            None => return Err(anyhow::anyhow!("failed to open stdin for clipboard daemon")),
        }
    }
    Ok(())
}
