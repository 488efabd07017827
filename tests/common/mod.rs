#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

pub enum Entry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
}

pub fn write_zip(path: &Path, entries: &[Entry<'_>]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for entry in entries {
        match entry {
            Entry::Dir(name) => zip.add_directory(*name, options).unwrap(),
            Entry::File(name, data) => {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
    }
    zip.finish().unwrap();
}

pub fn sample_entries() -> Vec<Entry<'static>> {
    vec![
        Entry::Dir("0-SCore/"),
        Entry::File("0-SCore/ModInfo.xml", b"<xml>\n  <Name value=\"SCore\"/>\n</xml>\n"),
        Entry::Dir("0-SCore/Config/"),
        Entry::File("0-SCore/Config/items.xml", b"<configs></configs>"),
        Entry::File("Bigger Backpack/ModInfo.xml", b"<xml/>"),
        Entry::File("Bigger Backpack/UIAtlases/icon.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 255]),
        Entry::File("readme.txt", b""),
    ]
}

/// Every path under `root` with file contents, sorted.
pub fn snapshot(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    let mut items: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let contents = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (relative, contents)
        })
        .collect();
    items.sort();
    items
}

/// Creates `<library>/steamapps/common/<game>`.
pub fn make_game(library: &Path, game: &str) -> PathBuf {
    let dir = library.join("steamapps").join("common").join(game);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes a current-format `libraryfolders.vdf` listing `libraries` in order.
pub fn make_steam_root(steam: &Path, libraries: &[&Path]) {
    let mut body = String::from("\"libraryfolders\"\n{\n");
    for (index, library) in libraries.iter().enumerate() {
        let escaped = library.display().to_string().replace('\\', "\\\\");
        body.push_str(&format!(
            "\t\"{index}\"\n\t{{\n\t\t\"path\"\t\t\"{escaped}\"\n\t\t\"label\"\t\t\"\"\n\t}}\n"
        ));
    }
    body.push_str("}\n");
    let steamapps = steam.join("steamapps");
    fs::create_dir_all(&steamapps).unwrap();
    fs::write(steamapps.join("libraryfolders.vdf"), body).unwrap();
}
