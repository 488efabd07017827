use thiserror::Error;

pub const SUPPORT_CONTACT: &str = "Please contact @keifufu#0727 on Discord for support.";

/// Failures the user can act on. Anything else travels as a plain
/// `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Unable to locate Steam installation.")]
    SteamNotFound,
    #[error("Unable to locate {game} installation.")]
    GameNotFound { game: String },
    #[error("Failed to extract archive.")]
    Extract {
        #[source]
        source: anyhow::Error,
    },
}

/// Lines printed for a failed run, without the support contact.
pub fn describe(error: &anyhow::Error) -> Vec<String> {
    match error.downcast_ref::<SyncError>() {
        Some(err @ SyncError::Extract { source }) => {
            vec![format!("{source:#}"), err.to_string()]
        }
        Some(other) => vec![other.to_string()],
        None => vec![format!("{error:#}")],
    }
}
