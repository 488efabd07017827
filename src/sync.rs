use crate::{
    console::{banner, Console},
    download::RemoteSource,
    error::SyncError,
    install::{self, InstallSummary},
    state::StateStore,
    steam::GamePaths,
    version,
};
use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Answer yes to every prompt.
    pub assume_yes: bool,
    /// Reinstall without asking when already current.
    pub force: bool,
    /// Stop after reporting whether an update exists.
    pub check_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cancelled,
    UpToDate { version: String },
    UpdateAvailable { local: Option<String>, remote: String },
    Installed { version: String, summary: InstallSummary },
}

pub struct SyncJob<'a> {
    pub game: &'a GamePaths,
    pub game_name: &'a str,
    pub archive_path: PathBuf,
    pub options: SyncOptions,
}

impl SyncJob<'_> {
    pub fn run(
        &self,
        remote: &dyn RemoteSource,
        console: &mut dyn Console,
        state: &mut StateStore,
    ) -> Result<SyncOutcome> {
        let local = state.version().map(str::to_string);
        let remote_version = remote.fetch_version()?;
        let available = version::update_available(local.as_deref(), &remote_version);
        tracing::info!(
            "Local version {local:?}, remote version {remote_version:?}, update available: {available}"
        );

        if self.options.check_only {
            let message = if available {
                "A new version is available"
            } else {
                "No new version is available"
            };
            print_banner(console, message);
            return Ok(if available {
                SyncOutcome::UpdateAvailable {
                    local,
                    remote: remote_version,
                }
            } else {
                SyncOutcome::UpToDate {
                    version: remote_version,
                }
            });
        }

        if available {
            print_banner(console, "A new version is available");
            console.notice(&[""]);
        } else {
            print_banner(console, "No new version is available");
            console.notice(&[""]);
            if !self.options.force {
                if !self.ask(console, "Do you wish to continue anyway?")? {
                    tracing::info!("User declined reinstall of current version");
                    return Ok(SyncOutcome::Cancelled);
                }
                console.clear();
            }
        }

        let warning = format!(
            "Continuing will overwrite your {} mods folder. This action is irreversible.",
            self.game_name
        );
        console.notice(&[&warning]);
        if !self.ask(console, "Are you sure you want to continue?")? {
            tracing::info!("User declined overwrite of {}", self.game.mods_dir.display());
            return Ok(SyncOutcome::Cancelled);
        }
        console.clear();

        let progress = console.begin_task("Downloading mods...");
        let downloaded = remote.download_archive(&self.archive_path, &progress);
        console.end_task(progress, if downloaded.is_ok() { "Done." } else { "ERROR" });
        downloaded?;
        tracing::info!("Archive saved to {}", self.archive_path.display());

        let progress = console.begin_task("Installing mods...");
        let installed = install::install_archive(&self.archive_path, &self.game.mods_dir, &progress);
        let summary = match installed {
            Ok(summary) => {
                console.end_task(progress, "Done.");
                summary
            }
            Err(source) => {
                console.end_task(progress, "ERROR");
                return Err(SyncError::Extract { source }.into());
            }
        };

        fs::remove_file(&self.archive_path).context("remove downloaded archive")?;
        state.set_version(&remote_version)?;
        tracing::info!("Synced to version {remote_version:?}");

        Ok(SyncOutcome::Installed {
            version: remote_version,
            summary,
        })
    }

    fn ask(&self, console: &mut dyn Console, question: &str) -> Result<bool> {
        if self.options.assume_yes {
            return Ok(true);
        }
        console.confirm(question)
    }
}

fn print_banner(console: &mut dyn Console, message: &str) {
    let lines = banner(message);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    console.notice(&lines);
}
