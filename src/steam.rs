use crate::{
    error::SyncError,
    vdf::{self, Value},
};
use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

pub const GAME_NAME: &str = "7 Days To Die";
/// `libraryfolders.vdf` is only inspected for indices `0` through `9`.
pub const MAX_LIBRARY_ENTRIES: usize = 10;

const LIBRARY_FOLDERS: &str = "steamapps/libraryfolders.vdf";

#[derive(Debug, Clone)]
pub struct GamePaths {
    pub game_root: PathBuf,
    pub mods_dir: PathBuf,
}

/// Where to look and what to look for.
#[derive(Debug, Clone)]
pub struct Discovery<'a> {
    pub game_folder: &'a str,
    pub mods_folder: &'a str,
    pub steam_override: Option<&'a Path>,
    pub game_override: Option<&'a Path>,
}

pub fn detect_paths(discovery: &Discovery<'_>) -> Result<GamePaths> {
    let game_root = match discovery.game_override {
        Some(path) => {
            if !path.is_dir() {
                return Err(SyncError::GameNotFound {
                    game: discovery.game_folder.to_string(),
                }
                .into());
            }
            path.to_path_buf()
        }
        None => {
            let steam_root =
                find_steam_root(discovery.steam_override).ok_or(SyncError::SteamNotFound)?;
            tracing::debug!("Steam root: {}", steam_root.display());
            let libraries = library_paths(&steam_root.join(LIBRARY_FOLDERS))?;
            tracing::debug!("Steam libraries: {libraries:?}");
            find_game_dir(&libraries, discovery.game_folder).ok_or_else(|| {
                SyncError::GameNotFound {
                    game: discovery.game_folder.to_string(),
                }
            })?
        }
    };

    let mods_dir = game_root.join(discovery.mods_folder);
    tracing::info!("Game root: {}", game_root.display());
    Ok(GamePaths {
        game_root,
        mods_dir,
    })
}

/// The override when it holds a library file, otherwise the path Steam
/// registered for itself, otherwise the first well-known location that does.
pub fn find_steam_root(override_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_dir {
        return looks_like_steam_root(path).then(|| path.to_path_buf());
    }
    find_steam_root_in(registered_steam_path(), steam_candidates())
}

pub fn find_steam_root_in(registered: Option<PathBuf>, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    registered
        .into_iter()
        .chain(candidates)
        .find(|candidate| looks_like_steam_root(candidate))
}

#[cfg(windows)]
fn registered_steam_path() -> Option<PathBuf> {
    use winreg::{enums::HKEY_CURRENT_USER, RegKey};

    let key = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey(r"SOFTWARE\Valve\Steam")
        .ok()?;
    let path: String = key.get_value("SteamPath").ok()?;
    tracing::debug!("SteamPath from registry: {path}");
    Some(PathBuf::from(path.replace('/', "\\")))
}

#[cfg(not(windows))]
fn registered_steam_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let registry = base.home_dir().join(".steam/registry.vdf");
    if !registry.is_file() {
        return None;
    }
    match steam_path_from_registry(&registry) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!("Ignoring {}: {err:#}", registry.display());
            None
        }
    }
}

/// `Registry/HKCU/Software/Valve/Steam/SteamPath` from a `registry.vdf`.
pub fn steam_path_from_registry(registry: &Path) -> Result<Option<PathBuf>> {
    let doc = vdf::read_file(registry).context("read Steam registry")?;
    let path = ["HKCU", "Software", "Valve", "Steam", "SteamPath"]
        .iter()
        .try_fold(&doc.value, |value, key| value.get_ignore_case(key))
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    Ok(path)
}

pub fn looks_like_steam_root(path: &Path) -> bool {
    path.join(LIBRARY_FOLDERS).is_file()
}

fn steam_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for var in ["ProgramFiles(x86)", "ProgramFiles"] {
        if let Some(dir) = std::env::var_os(var) {
            candidates.push(PathBuf::from(dir).join("Steam"));
        }
    }

    if let Some(base) = BaseDirs::new() {
        let home = base.home_dir();
        candidates.push(home.join(".local/share/Steam"));
        candidates.push(home.join(".steam/steam"));
        candidates.push(home.join(".var/app/com.valve.Steam/data/Steam"));
        candidates.push(home.join("Library/Application Support/Steam"));
    }

    candidates
}

pub fn library_paths(vdf_path: &Path) -> Result<Vec<PathBuf>> {
    let doc = vdf::read_file(vdf_path).context("read Steam library folders")?;
    Ok(library_paths_from(&doc.value))
}

/// Indexed entries may be objects with a `path` (current Steam) or a bare
/// path string (older clients).
pub fn library_paths_from(root: &Value) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for index in 0..MAX_LIBRARY_ENTRIES {
        let path = match root.get(&index.to_string()) {
            Some(Value::Str(path)) => path.as_str(),
            Some(entry @ Value::Object(_)) => match entry.get("path").and_then(Value::as_str) {
                Some(path) => path,
                None => continue,
            },
            None => continue,
        };
        if !path.is_empty() {
            paths.push(PathBuf::from(path));
        }
    }
    paths
}

/// Checks every library and keeps the last one holding the game.
pub fn find_game_dir(libraries: &[PathBuf], game_folder: &str) -> Option<PathBuf> {
    let mut found = None;
    for library in libraries {
        let candidate = library.join("steamapps").join("common").join(game_folder);
        if candidate.is_dir() {
            tracing::debug!("Found game candidate: {}", candidate.display());
            found = Some(candidate);
        }
    }
    found
}
