use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub assume_yes: bool,
    pub force: bool,
    pub check_only: bool,
    pub verbose: bool,
    pub steam_dir: Option<PathBuf>,
    pub game_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Sync(CliOptions),
    Help,
    Version,
}

pub fn parse_args(args: &[String]) -> Result<CliAction> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(CliAction::Help),
            "--version" | "-V" => return Ok(CliAction::Version),
            "--yes" | "-y" => options.assume_yes = true,
            "--force" | "-f" => options.force = true,
            "--check" => options.check_only = true,
            "--verbose" | "-v" => options.verbose = true,
            "--steam-dir" => match iter.next() {
                Some(value) => options.steam_dir = Some(PathBuf::from(value)),
                None => bail!("--steam-dir requires a path"),
            },
            "--game-dir" => match iter.next() {
                Some(value) => options.game_dir = Some(PathBuf::from(value)),
                None => bail!("--game-dir requires a path"),
            },
            value if value.starts_with("--steam-dir=") => {
                options.steam_dir = Some(PathBuf::from(value.trim_start_matches("--steam-dir=")));
            }
            value if value.starts_with("--game-dir=") => {
                options.game_dir = Some(PathBuf::from(value.trim_start_matches("--game-dir=")));
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
    }

    Ok(CliAction::Sync(options))
}

pub fn print_help() {
    println!("modsync v{}", env!("CARGO_PKG_VERSION"));
    println!("Downloads the latest mod pack and installs it into your 7 Days To Die Mods folder.");
    println!();
    println!("Usage: modsync [options]");
    println!("  -y, --yes            Answer yes to every prompt");
    println!("  -f, --force          Reinstall even when already up to date");
    println!("      --check          Only report whether an update is available");
    println!("      --steam-dir <p>  Steam installation to search");
    println!("      --game-dir <p>   Game installation to use, skipping the search");
    println!("  -v, --verbose        Debug logging");
    println!("  -h, --help           Show this help");
    println!("  -V, --version        Show the version");
}
