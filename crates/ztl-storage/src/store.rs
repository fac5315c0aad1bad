//! File-backed city store.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info, warn};
use ztl_core::City;

use crate::error::{Result, StorageError};

const EXTENSION: &str = "json";

/// Reads and writes cities as JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct CityStore {
    data_dir: PathBuf,
}

impl CityStore {
    /// Create a store rooted at a specific directory.
    ///
    /// The directory is created on the first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create a store in the default app data directory.
    pub fn open_default() -> Result<Self> {
        let dir = Self::default_data_dir()?;
        info!("Using data directory: {:?}", dir);
        Ok(Self::new(dir))
    }

    /// Get the default data directory.
    pub fn default_data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "ztl-maps", "ztl")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("cities"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File holding the named city. Names are matched case-insensitively.
    pub fn path_for(&self, city_name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{EXTENSION}", city_name.trim().to_lowercase()))
    }

    /// Write a city, replacing any previous version.
    pub fn save_city(&self, city: &City) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;

        let path = self.path_for(&city.file_stem());
        let json = serde_json::to_string_pretty(city)?;
        fs::write(&path, json)?;

        info!(
            city = %city.name,
            zones = city.zones().len(),
            "Saved city to {:?}",
            path
        );
        Ok(path)
    }

    /// Write several cities, returning the paths written.
    pub fn save_all(&self, cities: &[City]) -> Result<Vec<PathBuf>> {
        cities.iter().map(|city| self.save_city(city)).collect()
    }

    /// Load the named city.
    pub fn load_city(&self, city_name: &str) -> Result<City> {
        let path = self.path_for(city_name);
        if !path.is_file() {
            return Err(StorageError::NotFound(city_name.to_string()));
        }
        self.load_city_file(&path)
    }

    /// Load a city from any JSON file.
    pub fn load_city_file(&self, path: &Path) -> Result<City> {
        let json = fs::read_to_string(path)?;
        let city: City = serde_json::from_str(&json)?;
        debug!(city = %city.name, "Loaded city from {:?}", path);
        Ok(city)
    }

    /// Load every stored city, ordered by file name.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<City>> {
        let mut cities = Vec::new();
        for path in self.city_files()? {
            match self.load_city_file(&path) {
                Ok(city) => cities.push(city),
                Err(e) => warn!("Skipping unreadable city file {:?}: {}", path, e),
            }
        }

        info!("Loaded {} cities from {:?}", cities.len(), self.data_dir);
        Ok(cities)
    }

    /// Stems of the stored city files, sorted.
    pub fn city_names(&self) -> Result<Vec<String>> {
        Ok(self
            .city_files()?
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect())
    }

    fn city_files(&self) -> Result<Vec<PathBuf>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
