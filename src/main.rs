use anyhow::Result;
use modsync::{
    cli::{self, CliAction, CliOptions},
    config::{self, AppConfig},
    console::TerminalConsole,
    download::HttpSource,
    error,
    logging,
    state::StateStore,
    steam::{self, Discovery},
    sync::{SyncJob, SyncOptions, SyncOutcome},
};

// Every path ends with a normal return: the exit status is always 0 and
// failures are reported on the console only.
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match cli::parse_args(&args) {
        Ok(CliAction::Sync(options)) => options,
        Ok(CliAction::Help) => {
            cli::print_help();
            return;
        }
        Ok(CliAction::Version) => {
            println!("modsync v{}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut console = TerminalConsole::new();
    let mut support_contact = error::SUPPORT_CONTACT.to_string();
    let mut _log_guard = None;

    let result = config::base_data_dir().and_then(|data_dir| {
        match logging::setup_logging(&data_dir, options.verbose) {
            Ok(guard) => _log_guard = Some(guard),
            Err(err) => eprintln!("Logging disabled: {err:#}"),
        }
        let config = AppConfig::load_or_create(&data_dir)?;
        support_contact = config.support_contact.clone();
        run(&options, &config, &data_dir, &mut console)
    });

    match result {
        Ok(SyncOutcome::Cancelled) => return,
        Ok(SyncOutcome::UpToDate { .. } | SyncOutcome::UpdateAvailable { .. }) => return,
        Ok(SyncOutcome::Installed { version, summary }) => {
            tracing::info!(
                "Installed version {version:?}: {} file(s), {} skipped",
                summary.files,
                summary.skipped
            );
        }
        Err(err) => {
            tracing::error!("Sync failed: {err:#}");
            for line in error::describe(&err) {
                println!("{line}");
            }
            println!("{support_contact}");
        }
    }

    if !options.assume_yes {
        console.wait_for_key("Press any key to exit . . .");
    }
}

fn run(
    options: &CliOptions,
    config: &AppConfig,
    data_dir: &std::path::Path,
    console: &mut TerminalConsole,
) -> Result<SyncOutcome> {
    // Find the game before anything is downloaded.
    let steam_override = options.steam_dir.as_deref().or(config.steam_dir.as_deref());
    let game_override = options.game_dir.as_deref().or(config.game_dir.as_deref());
    let game = steam::detect_paths(&Discovery {
        game_folder: &config.game_folder,
        mods_folder: &config.mods_folder,
        steam_override,
        game_override,
    })?;

    let mut state = StateStore::in_dir(data_dir)?;
    let remote = HttpSource::new(&config.version_url, &config.archive_url);
    let job = SyncJob {
        game: &game,
        game_name: &config.game_folder,
        archive_path: config::archive_path(data_dir),
        options: SyncOptions {
            assume_yes: options.assume_yes,
            force: options.force,
            check_only: options.check_only,
        },
    };
    job.run(&remote, console, &mut state)
}
