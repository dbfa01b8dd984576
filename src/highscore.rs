use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info, warn};

pub const HIGHSCORE_FILE: &str = "highscore.json";

/// Where the best score lives between sessions.
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<u32>>;
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Stores the score as a single JSON number.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).wrap_err_with(|| format!("reading {}", self.path.display()))?;
        let score: u32 =
            serde_json::from_str(raw.trim()).wrap_err_with(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(score))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string(&score)?;
        fs::write(&self.path, raw).wrap_err_with(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// The best score seen so far, backed by a [`ScoreStore`].
///
/// Storage problems never stop the game: a failed load counts as zero, a failed save is logged
/// and retried by [`HighScore::flush`].
pub struct HighScore {
    best: u32,
    pending: bool,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load() {
            Ok(Some(score)) => score,
            Ok(None) => {
                debug!("No high score recorded yet");
                0
            },
            Err(e) => {
                warn!("Ignoring unreadable high score: {e:#}");
                0
            },
        };
        HighScore { best, pending: false, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records a finished run. Returns `true` when it beat the best score; only then is the store
    /// written.
    pub fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        info!(previous = self.best, score, "New high score");
        self.best = score;
        self.pending = true;
        if let Err(e) = self.flush() {
            warn!("Could not save high score {score}: {e:#}");
        }
        true
    }

    /// Writes the best score if an earlier write did not make it to the store.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending {
            self.store.save(self.best)?;
            self.pending = false;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).field("pending", &self.pending).finish()
    }
}
