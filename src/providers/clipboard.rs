use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use super::ClipboardSink;

/// Pipes text into the first working system clipboard tool. Which tool exists
/// depends on the operator's desktop; trying each in turn keeps the binary
/// free of display-server dependencies.
pub struct ShellClipboard;

const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("wl-copy", &[]),
];

impl ClipboardSink for ShellClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        for (tool, args) in CLIPBOARD_TOOLS {
            let spawned = Command::new(tool)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let Ok(mut child) = spawned else {
                continue;
            };

            let mut stdin = child.stdin.take().context("open clipboard stdin")?;
            if stdin.write_all(text.as_bytes()).is_err() {
                let _ = child.wait();
                continue;
            }
            drop(stdin);

            if let Ok(status) = child.wait() {
                if status.success() {
                    return Ok(());
                }
            }
        }
        bail!("no clipboard tool available (tried xclip, xsel, pbcopy, wl-copy)")
    }
}
