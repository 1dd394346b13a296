//! Start-screen registration, "play again" and result sharing.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{PlayerError, ShareError, StoreError};
use crate::models::{PlayerName, ResultsSummary};
use crate::services::session_store::{SessionStore, GAME_RESULTS_KEY, PLAYER_NAME_KEY};

/// Store a trimmed, non-empty player name
pub fn register_player(store: &dyn SessionStore, raw: &str) -> Result<PlayerName, PlayerError> {
    let name = PlayerName::parse(raw)?;
    store.set(PLAYER_NAME_KEY, name.as_str().to_string())?;
    tracing::info!(player = %name, "Player registered");
    Ok(name)
}

/// Forget the last session's rounds, keeping the player
pub fn play_again(store: &dyn SessionStore) -> Result<(), StoreError> {
    store.remove(GAME_RESULTS_KEY)?;
    tracing::debug!("Cleared stored results");
    Ok(())
}

/// Text shared from the results screen
pub fn share_text(summary: &ResultsSummary) -> String {
    format!(
        "🎨 Colorete: {} got {} points out of {}. \"{}\" 🎨 Try to beat it!",
        summary.player_name,
        summary.total_score,
        summary.max_possible_score,
        summary.feedback()
    )
}

/// Somewhere results can be shared to
pub trait ShareTarget {
    fn share(&self, text: &str) -> Result<(), ShareError>;
}

/// Appends shared text as lines of a file
pub struct FileShareTarget {
    path: PathBuf,
}

impl FileShareTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ShareTarget for FileShareTarget {
    fn share(&self, text: &str) -> Result<(), ShareError> {
        if self.path.is_dir() {
            return Err(ShareError::Unavailable(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{text}")?;
        Ok(())
    }
}

/// Share `summary`, reporting failure without propagating it.
///
/// Returns the shared text, or `None` if the target refused it.
pub fn share_results(target: &dyn ShareTarget, summary: &ResultsSummary) -> Option<String> {
    let text = share_text(summary);
    match target.share(&text) {
        Ok(()) => Some(text),
        Err(e) => {
            tracing::warn!(%e, "Sharing failed");
            None
        }
    }
}
