use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};

const BAR_TEMPLATE: &str = "[{bar:40.cyan/blue}] {percent:>3}% {bytes}/{total_bytes}";

/// A byte-counting bar; callers set the length once they know it.
pub fn byte_bar() -> ProgressBar {
    let bar = ProgressBar::no_length();
    bar.set_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// `io::copy` that advances `progress` by every chunk written.
pub fn copy_with_progress<R, W>(reader: &mut R, writer: &mut W, progress: &ProgressBar) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; 64 * 1024];
    let mut copied = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("read stream"),
        };
        writer.write_all(&buffer[..read]).context("write stream")?;
        copied += read as u64;
        progress.inc(read as u64);
    }
    writer.flush().context("flush stream")?;
    Ok(copied)
}
