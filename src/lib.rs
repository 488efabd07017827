//! Keeps a 7 Days To Die mods folder in step with a published mod pack.

pub mod cli;
pub mod config;
pub mod console;
pub mod download;
pub mod error;
pub mod install;
pub mod logging;
pub mod progress;
pub mod state;
pub mod steam;
pub mod sync;
pub mod vdf;
pub mod version;
