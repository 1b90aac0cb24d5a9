use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::store::KeyValueStore;

pub const FAVORITES_KEY: &str = "favorites";

/// Favorite city names, unique ignoring case, persisted as a JSON array.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
    cities: Vec<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Read the persisted list once. Unreadable or malformed data starts empty.
    pub fn load(store: S) -> Self {
        let cities = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!("Ignoring malformed favorites data: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read favorites: {e:#}");
                Vec::new()
            }
        };

        debug!("Loaded {} favorite cities", cities.len());
        Self { store, cities }
    }

    pub fn list(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.position(city).is_some()
    }

    /// Returns `false` when the city was already present (or blank).
    pub fn add(&mut self, city: &str) -> Result<bool> {
        let city = city.trim();
        if city.is_empty() || self.contains(city) {
            return Ok(false);
        }

        let mut updated = self.cities.clone();
        updated.push(city.to_string());
        self.commit(updated)?;
        Ok(true)
    }

    /// Returns `false` when the city was not a favorite.
    pub fn remove(&mut self, city: &str) -> Result<bool> {
        let Some(idx) = self.position(city.trim()) else {
            return Ok(false);
        };

        let mut updated = self.cities.clone();
        updated.remove(idx);
        self.commit(updated)?;
        Ok(true)
    }

    fn position(&self, city: &str) -> Option<usize> {
        let needle = city.to_lowercase();
        self.cities.iter().position(|c| c.to_lowercase() == needle)
    }

    /// Write `updated` to the store; the in-memory list changes only once
    /// the write has succeeded.
    fn commit(&mut self, updated: Vec<String>) -> Result<()> {
        let json = serde_json::to_string(&updated).context("Failed to serialize favorites")?;
        self.store.set(FAVORITES_KEY, &json)?;
        self.cities = updated;
        Ok(())
    }
}
