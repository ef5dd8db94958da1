use crate::{
    config::{KanbanConfig, PersistConfig},
    domain::{Board, CommentStore},
    error::{KanbanError, Result},
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
    persist: PersistConfig,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const CONFIG_FILE: &'static str = "config.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self::with_config(project_root, PersistConfig::default())
    }

    pub fn with_config(project_root: impl AsRef<Path>, persist: PersistConfig) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
            persist,
        }
    }

    fn snapshot_file(&self) -> PathBuf {
        self.root_path
            .join(format!("persist-{}.json", self.persist.key))
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(Self::CONFIG_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Loads `config.json`, falling back to defaults when it is absent
    pub async fn load_config(&self) -> Result<KanbanConfig> {
        let path = self.config_file();
        if !path.exists() {
            return Ok(KanbanConfig::default());
        }

        let contents = fs::read_to_string(&path).await?;
        KanbanConfig::from_json(&contents)
    }

    pub async fn save_config(&self, config: &KanbanConfig) -> Result<()> {
        config.validate()?;
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.config_file(), json).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Bootstrap a default board if nothing was saved yet
        if !self.snapshot_file().exists() {
            let config = self.load_config().await?;
            let board = Board::new(config.board);
            self.save_snapshot(&Snapshot::new(&board, &CommentStore::new()))
                .await?;
            info!(path = %self.snapshot_file().display(), "initialized board storage");
        }

        Ok(())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Write beside the target and rename so readers never see a partial file
        let json = snapshot.to_json()?;
        let target = self.snapshot_file();
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &target).await?;

        debug!(path = %target.display(), "snapshot saved");
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        let snapshot_file = self.snapshot_file();

        if !snapshot_file.exists() {
            return Err(KanbanError::BoardNotInitialized);
        }

        let contents = fs::read_to_string(&snapshot_file).await?;
        Snapshot::from_json(&contents)
    }

    async fn purge(&self) -> Result<()> {
        let snapshot_file = self.snapshot_file();

        if snapshot_file.exists() {
            fs::remove_file(&snapshot_file).await?;
            info!(path = %snapshot_file.display(), "snapshot purged");
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.snapshot_file().exists()
    }
}
