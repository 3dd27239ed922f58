pub mod admin;
pub mod cli;
pub mod dashboard;
pub mod db;
pub mod display;
pub mod error;
pub mod media;
pub mod models;
pub mod navigation;
pub mod settings;
pub mod shell;
pub mod store;
pub mod utils;
pub mod worker;

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{Context, Result};
use clap::Parser;

use admin::ConfigEditor;
use cli::Cli;
use dashboard::Report;
use db::Database;
use navigation::View;
use settings::SettingsStore;
use store::{DocumentStore, MemoryStore, Repository};
use worker::DataCollector;

pub const DB_FILE_NAME: &str = "sketchpoint.sqlite3";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Everything the command layer operates on.
pub struct AppState {
    pub repo: Repository,
    pub settings: SettingsStore,
    pub(crate) view: Mutex<View>,
    pub(crate) editor: Mutex<ConfigEditor>,
    pub(crate) collector: Mutex<DataCollector>,
    pub(crate) report: Mutex<Report>,
}

impl AppState {
    pub fn new(repo: Repository, settings: SettingsStore) -> Self {
        Self {
            repo,
            settings,
            view: Mutex::new(View::default()),
            editor: Mutex::new(ConfigEditor::new()),
            collector: Mutex::new(DataCollector::new()),
            report: Mutex::new(Report::default()),
        }
    }

    /// Opens the document database and settings under `data_dir`.
    pub fn open(data_dir: &Path, in_memory: bool) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let store: Arc<dyn DocumentStore> = if in_memory {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(Database::new(data_dir.join(DB_FILE_NAME))?)
        };
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE_NAME))?;

        Ok(Self::new(Repository::new(store), settings))
    }

    pub fn current_view(&self) -> View {
        *lock(&self.view)
    }
}

/// Locks a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn run() -> Result<()> {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let data_dir = cli.resolve_data_dir()?;
    log::info!("Sketchpoint starting with data in {}", data_dir.display());

    let state = AppState::open(&data_dir, cli.in_memory)?;
    shell::run(&state, &cli)
}
