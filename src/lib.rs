pub mod dashboard;
pub mod db;
pub mod error;
pub mod relations;
pub mod scheduling;
pub mod sessions;
pub mod settings;
pub mod workouts;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use dashboard::DashboardService;
use db::Database;
use relations::RelationService;
use sessions::SessionService;
use settings::SettingsStore;
use workouts::WorkoutService;

pub use db::models;
pub use error::AppError;

/// Constructed application core: one store handle, one settings file, and the
/// services built on top. The embedding layer (HTTP or otherwise) holds one of
/// these and calls the services directly.
pub struct App {
    pub db: Database,
    pub settings: Arc<SettingsStore>,
    pub sessions: SessionService,
    pub relations: RelationService,
    pub workouts: WorkoutService,
    pub dashboard: DashboardService,
}

impl App {
    pub fn new(data_dir: &Path) -> Result<App> {
        std::fs::create_dir_all(data_dir)?;

        let database = Database::new(data_dir.join("coachbase.sqlite3"))?;
        let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);

        info!("coachbase core ready, database at {}", database.path().display());

        Ok(App {
            sessions: SessionService::new(database.clone(), settings.clone()),
            relations: RelationService::new(database.clone()),
            workouts: WorkoutService::new(database.clone()),
            dashboard: DashboardService::new(database.clone()),
            db: database,
            settings,
        })
    }
}

/// Initialize logging for embedding applications (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
