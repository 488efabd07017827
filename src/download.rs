use crate::progress;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
    time::Duration,
};

const USER_AGENT: &str = concat!("modsync/", env!("CARGO_PKG_VERSION"));

/// Where the version marker and the mod archive come from.
pub trait RemoteSource {
    fn fetch_version(&self) -> Result<String>;

    /// Writes the archive to `dest`, setting the bar's length once known.
    fn download_archive(&self, dest: &Path, progress: &ProgressBar) -> Result<()>;
}

pub struct HttpSource {
    agent: ureq::Agent,
    version_url: String,
    archive_url: String,
}

impl HttpSource {
    pub fn new(version_url: impl Into<String>, archive_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(60))
            .timeout_write(Duration::from_secs(60))
            .build();
        HttpSource {
            agent,
            version_url: version_url.into(),
            archive_url: archive_url.into(),
        }
    }
}

impl RemoteSource for HttpSource {
    fn fetch_version(&self) -> Result<String> {
        tracing::debug!("GET {}", self.version_url);
        let response = self
            .agent
            .get(&self.version_url)
            .set("User-Agent", USER_AGENT)
            .call()
            .context("fetch remote version")?;
        let version = response.into_string().context("read remote version")?;
        tracing::info!("Remote version: {version:?}");
        Ok(version)
    }

    fn download_archive(&self, dest: &Path, progress: &ProgressBar) -> Result<()> {
        tracing::debug!("GET {}", self.archive_url);
        let response = self
            .agent
            .get(&self.archive_url)
            .set("User-Agent", USER_AGENT)
            .call()
            .context("download archive")?;
        if let Some(len) = response
            .header("Content-Length")
            .and_then(|value| value.parse::<u64>().ok())
        {
            progress.set_length(len);
        }
        let mut reader = response.into_reader();
        write_atomically(dest, |file| {
            progress::copy_with_progress(&mut reader, file, progress).map(|_| ())
        })
    }
}

/// Writes through `<dest>.part` and renames into place once `write` succeeds.
pub fn write_atomically<F>(dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).context("create download dir")?;
    }
    let partial = dest.with_extension("part");
    let result = (|| {
        let file = File::create(&partial).context("create archive file")?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer
            .into_inner()
            .map_err(|err| err.into_error())
            .context("flush archive file")?;
        fs::rename(&partial, dest).context("move archive into place")
    })();
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}
