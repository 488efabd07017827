use crate::progress;
use anyhow::{Context, Result};
use filetime::{set_file_mtime, FileTime};
use indicatif::ProgressBar;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Component, Path, PathBuf},
};
use time::{Date, Month, PrimitiveDateTime, Time as TimeOfDay};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
    pub skipped: usize,
}

/// Replaces `dest` with the contents of the zip at `archive_path`.
///
/// `dest` is removed and recreated before the archive is even opened, so a
/// failure never mixes old files with new ones. Progress is measured in
/// uncompressed bytes of file entries.
pub fn install_archive(
    archive_path: &Path,
    dest: &Path,
    progress: &ProgressBar,
) -> Result<InstallSummary> {
    reset_dir(dest)?;

    let file = File::open(archive_path).context("open zip")?;
    let mut archive = zip::ZipArchive::new(file).context("read zip")?;

    let mut total = 0u64;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).context("zip entry")?;
        if let Some((_, false)) = entry_target(entry.name()) {
            total += entry.size();
        }
    }
    progress.set_length(total);
    tracing::debug!("Archive holds {} entries, {total} bytes", archive.len());

    let mut summary = InstallSummary::default();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).context("zip entry")?;
        let Some((relative, is_dir)) = entry_target(entry.name()) else {
            tracing::warn!("Skipping unsafe zip entry: {}", entry.name());
            summary.skipped += 1;
            continue;
        };

        let out_path = dest.join(relative);
        if is_dir {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create {}", out_path.display()))?;
            summary.dirs += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let out_file = File::create(&out_path)
            .with_context(|| format!("write {}", out_path.display()))?;
        let mut writer = BufWriter::new(out_file);
        summary.bytes += progress::copy_with_progress(&mut entry, &mut writer, progress)
            .with_context(|| format!("extract {}", entry.name()))?;
        drop(writer);
        summary.files += 1;

        if let Some(mtime) = entry.last_modified().and_then(zip_time_to_unix) {
            let _ = set_file_mtime(&out_path, FileTime::from_unix_time(mtime, 0));
        }
    }

    tracing::info!(
        "Installed {} file(s), {} dir(s), {} bytes into {} ({} on disk)",
        summary.files,
        summary.dirs,
        summary.bytes,
        dest.display(),
        count_files(dest)
    );
    Ok(summary)
}

/// Relative output path of an entry and whether it names a directory.
///
/// Backslashes count as separators, as archives packed on Windows often use
/// them. Absolute names and names with `..` are rejected.
fn entry_target(name: &str) -> Option<(PathBuf, bool)> {
    if name.contains('\0') {
        return None;
    }
    let normalized = name.replace('\\', "/");
    let mut relative = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some((relative, normalized.ends_with('/')))
}

fn reset_dir(dest: &Path) -> Result<()> {
    if dest.exists() {
        fs::remove_dir_all(dest).with_context(|| format!("remove {}", dest.display()))?;
    }
    fs::create_dir_all(dest).with_context(|| format!("create {}", dest.display()))?;
    Ok(())
}

pub fn count_files(root: &Path) -> usize {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

fn zip_time_to_unix(dt: zip::DateTime) -> Option<i64> {
    let month = Month::try_from(dt.month()).ok()?;
    let date = Date::from_calendar_date(dt.year() as i32, month, dt.day()).ok()?;
    let time = TimeOfDay::from_hms(dt.hour(), dt.minute(), dt.second()).ok()?;
    let datetime = PrimitiveDateTime::new(date, time).assume_utc();
    Some(datetime.unix_timestamp())
}
