//! Integration tests for locating the game through Steam's library folders.

mod common;

use common::{make_game, make_steam_root};
use modsync::{
    error::SyncError,
    steam::{self, Discovery, GAME_NAME},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn discovery<'a>(steam: Option<&'a Path>, game: Option<&'a Path>) -> Discovery<'a> {
    Discovery {
        game_folder: GAME_NAME,
        mods_folder: "Mods",
        steam_override: steam,
        game_override: game,
    }
}

#[test]
fn test_single_match_is_found() {
    let dir = tempfile::tempdir().unwrap();
    let libraries: Vec<PathBuf> = (0..4).map(|i| dir.path().join(format!("lib{i}"))).collect();
    for library in &libraries {
        fs::create_dir_all(library).unwrap();
    }
    let expected = make_game(&libraries[2], GAME_NAME);

    assert_eq!(steam::find_game_dir(&libraries, GAME_NAME), Some(expected));
}

#[test]
fn test_last_matching_library_wins() {
    let dir = tempfile::tempdir().unwrap();
    let libraries: Vec<PathBuf> = (0..5).map(|i| dir.path().join(format!("lib{i}"))).collect();
    make_game(&libraries[0], GAME_NAME);
    make_game(&libraries[1], GAME_NAME);
    let last = make_game(&libraries[3], GAME_NAME);

    assert_eq!(steam::find_game_dir(&libraries, GAME_NAME), Some(last));
}

#[test]
fn test_file_with_game_name_is_not_a_match() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("lib");
    let common = library.join("steamapps/common");
    fs::create_dir_all(&common).unwrap();
    fs::write(common.join(GAME_NAME), "not a directory").unwrap();

    assert_eq!(steam::find_game_dir(&[library], GAME_NAME), None);
}

#[test]
fn test_detect_paths_through_library_folders() {
    let dir = tempfile::tempdir().unwrap();
    let steam_root = dir.path().join("Steam");
    let first = dir.path().join("SteamLibrary A");
    let second = dir.path().join("SteamLibrary B");
    make_game(&first, GAME_NAME);
    let expected = make_game(&second, GAME_NAME);
    make_steam_root(&steam_root, &[steam_root.as_path(), first.as_path(), second.as_path()]);

    let paths = steam::detect_paths(&discovery(Some(steam_root.as_path()), None)).unwrap();

    assert_eq!(paths.game_root, expected);
    assert_eq!(paths.mods_dir, expected.join("Mods"));
}

#[test]
fn test_library_paths_keep_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let steam_root = dir.path().join("Steam");
    let other = dir.path().join("Games");
    make_steam_root(&steam_root, &[steam_root.as_path(), other.as_path()]);

    let paths = steam::library_paths(&steam_root.join("steamapps/libraryfolders.vdf")).unwrap();

    assert_eq!(paths, vec![steam_root, other]);
}

#[test]
fn test_missing_game_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let steam_root = dir.path().join("Steam");
    make_steam_root(&steam_root, &[steam_root.as_path()]);

    let err = steam::detect_paths(&discovery(Some(steam_root.as_path()), None)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::GameNotFound { .. })
    ));
    assert_eq!(err.to_string(), "Unable to locate 7 Days To Die installation.");
}

#[test]
fn test_steam_override_without_library_file_is_not_steam() {
    let dir = tempfile::tempdir().unwrap();

    let err = steam::detect_paths(&discovery(Some(dir.path()), None)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::SteamNotFound)
    ));
}

#[test]
fn test_malformed_library_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let steamapps = dir.path().join("steamapps");
    fs::create_dir_all(&steamapps).unwrap();
    fs::write(steamapps.join("libraryfolders.vdf"), "\"libraryfolders\" { \"0\" {").unwrap();

    let err = steam::detect_paths(&discovery(Some(dir.path()), None)).unwrap_err();

    assert!(err.downcast_ref::<SyncError>().is_none());
}

#[test]
fn test_game_override_skips_steam() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("7dtd");
    fs::create_dir_all(&game).unwrap();

    let paths = steam::detect_paths(&discovery(None, Some(game.as_path()))).unwrap();

    assert_eq!(paths.game_root, game);
    assert_eq!(paths.mods_dir, game.join("Mods"));
}

#[test]
fn test_missing_game_override_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = steam::detect_paths(&discovery(None, Some(missing.as_path()))).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::GameNotFound { .. })
    ));
}

fn write_registry(file: &Path, steam_path: &Path) {
    let escaped = steam_path.display().to_string().replace('\\', "\\\\");
    fs::write(
        file,
        format!(
            "\"Registry\"\n{{\n\t\"HKCU\"\n\t{{\n\t\t\"Software\"\n\t\t{{\n\t\t\t\"Valve\"\n\t\t\t{{\n\t\t\t\t\"Steam\"\n\t\t\t\t{{\n\t\t\t\t\t\"language\"\t\t\"english\"\n\t\t\t\t\t\"SteamPath\"\t\t\"{escaped}\"\n\t\t\t\t}}\n\t\t\t}}\n\t\t}}\n\t}}\n}}\n"
        ),
    )
    .unwrap();
}

#[test]
fn test_registered_steam_path_is_read_from_registry_file() {
    let dir = tempfile::tempdir().unwrap();
    let steam_root = dir.path().join("Games").join("Steam");
    make_steam_root(&steam_root, &[steam_root.as_path()]);
    let registry = dir.path().join("registry.vdf");
    write_registry(&registry, &steam_root);

    let registered = steam::steam_path_from_registry(&registry).unwrap();
    assert_eq!(registered, Some(steam_root.clone()));

    let default_candidate = dir.path().join("Program Files (x86)").join("Steam");
    assert_eq!(
        steam::find_steam_root_in(registered, vec![default_candidate]),
        Some(steam_root)
    );
}

#[test]
fn test_registered_path_wins_over_default_locations() {
    let dir = tempfile::tempdir().unwrap();
    let registered = dir.path().join("D").join("Steam");
    let default_root = dir.path().join("home").join(".local/share/Steam");
    make_steam_root(&registered, &[registered.as_path()]);
    make_steam_root(&default_root, &[default_root.as_path()]);

    assert_eq!(
        steam::find_steam_root_in(Some(registered.clone()), vec![default_root]),
        Some(registered)
    );
}

#[test]
fn test_stale_registered_path_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join("uninstalled").join("Steam");
    let default_root = dir.path().join("Steam");
    make_steam_root(&default_root, &[default_root.as_path()]);

    assert_eq!(
        steam::find_steam_root_in(Some(stale), vec![default_root.clone()]),
        Some(default_root)
    );
}

#[test]
fn test_registry_file_without_steam_path() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("registry.vdf");
    fs::write(&registry, "\"Registry\" { \"HKCU\" { \"Software\" { } } }").unwrap();

    assert_eq!(steam::steam_path_from_registry(&registry).unwrap(), None);
}
