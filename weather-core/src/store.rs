use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{FavoriteCity, HistoryAction, HistoryRecord};

const FAVORITES_FILE: &str = "favorites.json";
const HISTORY_FILE: &str = "history.csv";
const HISTORY_HEADER: [&str; 5] = ["timestamp", "city", "lat", "lon", "action"];

/// Persistent favorites list plus the append-only action log.
///
/// Favorites are kept as a pretty-printed JSON array and rewritten whole on
/// every mutation; the history log is CSV and only ever appended to.
#[derive(Debug, Clone)]
pub struct CityStore {
    favorites_path: PathBuf,
    history_path: PathBuf,
}

impl CityStore {
    /// Open the store under `data_dir`, creating the directory and seeding
    /// missing files (empty favorites array, history header row).
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).map_err(|err| {
            Error::Storage(format!(
                "could not create data directory {}: {err}",
                data_dir.display()
            ))
        })?;

        let store = Self {
            favorites_path: data_dir.join(FAVORITES_FILE),
            history_path: data_dir.join(HISTORY_FILE),
        };

        if !store.favorites_path.exists() {
            store.write_favorites(&[])?;
        }
        if !store.history_path.exists() {
            store.write_history_header()?;
        }

        Ok(store)
    }

    pub fn favorites_path(&self) -> &Path {
        &self.favorites_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn list_favorites(&self) -> Result<Vec<FavoriteCity>> {
        self.read_favorites()
    }

    /// Add a favorite unless the name is already present. Persists the new
    /// list and logs one `add_favorite` history row.
    pub fn add_favorite(&self, name: &str, lat: Option<f64>, lon: Option<f64>) -> Result<bool> {
        let mut favorites = self.read_favorites()?;
        if favorites.iter().any(|favorite| favorite.name == name) {
            return Ok(false);
        }

        favorites.push(FavoriteCity { name: name.to_string(), lat, lon });
        self.write_favorites(&favorites)?;
        self.append_history(name, lat, lon, HistoryAction::AddFavorite);
        Ok(true)
    }

    /// Remove a favorite by name. Persists the new list and logs one
    /// `remove_favorite` history row.
    pub fn remove_favorite(&self, name: &str) -> Result<bool> {
        let favorites = self.read_favorites()?;
        let before = favorites.len();

        let remaining: Vec<FavoriteCity> =
            favorites.into_iter().filter(|favorite| favorite.name != name).collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.write_favorites(&remaining)?;
        self.append_history(name, None, None, HistoryAction::RemoveFavorite);
        Ok(true)
    }

    /// Best-effort history append. The audit trail never blocks the primary
    /// action; failures are logged and dropped.
    pub fn append_history(
        &self,
        city: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        action: HistoryAction,
    ) {
        if let Err(err) = self.try_append_history(city, lat, lon, action) {
            warn!(%err, city, ?action, "history append failed");
        }
    }

    /// Fallible history append, exposed so the swallowed path stays testable.
    pub fn try_append_history(
        &self,
        city: &str,
        lat: Option<f64>,
        lon: Option<f64>,
        action: HistoryAction,
    ) -> Result<()> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .map_err(|err| {
                Error::Storage(format!(
                    "could not open history file {}: {err}",
                    self.history_path.display()
                ))
            })?;

        let record = HistoryRecord {
            timestamp: Utc::now().to_rfc3339(),
            city: city.to_string(),
            lat,
            lon,
            action,
        };

        // The header row was written when the file was seeded.
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .serialize(&record)
            .and_then(|()| writer.flush().map_err(Into::into))
            .map_err(|err| Error::Storage(format!("could not append history row: {err}")))
    }

    fn read_favorites(&self) -> Result<Vec<FavoriteCity>> {
        let contents = fs::read_to_string(&self.favorites_path).map_err(|err| {
            Error::Storage(format!(
                "could not read favorites file {}: {err}",
                self.favorites_path.display()
            ))
        })?;

        serde_json::from_str(&contents).map_err(|err| {
            Error::Storage(format!(
                "could not parse favorites file {}: {err}",
                self.favorites_path.display()
            ))
        })
    }

    fn write_favorites(&self, favorites: &[FavoriteCity]) -> Result<()> {
        // serde_json's pretty printer is 2-space indented and leaves
        // non-ASCII characters unescaped, which is the file format.
        let json = serde_json::to_string_pretty(favorites).map_err(|err| {
            Error::Storage(format!("could not serialize favorites: {err}"))
        })?;

        fs::write(&self.favorites_path, json).map_err(|err| {
            Error::Storage(format!(
                "could not write favorites file {}: {err}",
                self.favorites_path.display()
            ))
        })
    }

    fn write_history_header(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.history_path).map_err(|err| {
            Error::Storage(format!(
                "could not create history file {}: {err}",
                self.history_path.display()
            ))
        })?;

        writer
            .write_record(HISTORY_HEADER)
            .and_then(|()| writer.flush().map_err(Into::into))
            .map_err(|err| Error::Storage(format!("could not write history header: {err}")))
    }
}
