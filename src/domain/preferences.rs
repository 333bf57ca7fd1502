//! Favorite assets, persisted write-through to a key/value store.

use crate::domain::errors::AppResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::AssetId;
use crate::{log_debug, log_warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of favorite asset ids. Serialized as a JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<AssetId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.0.contains(id)
    }

    /// Flips membership, returning whether `id` is now a favorite.
    pub fn toggle(&mut self, id: &AssetId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.0.iter()
    }
}

impl<I: Into<AssetId>> FromIterator<I> for FavoriteSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Raw string storage (browser localStorage, or a map in tests)
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
}

pub trait PreferenceStore {
    /// Reads the persisted set. Missing or unreadable data yields an empty set.
    fn load(&self) -> FavoriteSet;

    /// Flips membership and persists before returning. Returns the new membership.
    fn toggle(&mut self, id: &AssetId) -> bool;

    fn favorites(&self) -> &FavoriteSet;
}

pub struct FavoritesStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    favorites: FavoriteSet,
}

impl<S: KeyValueStorage> FavoritesStore<S> {
    /// Opens the store and primes the in-memory set from storage.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            favorites: FavoriteSet::new(),
        };
        store.favorites = store.load();
        store
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.favorites) {
            Ok(encoded) => encoded,
            Err(e) => {
                log_warn!(LogComponent::Domain("Preferences"), "Failed to encode favorites: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.key, &encoded) {
            log_warn!(LogComponent::Domain("Preferences"), "Favorites not persisted: {e}");
        }
    }
}

impl<S: KeyValueStorage> PreferenceStore for FavoritesStore<S> {
    fn load(&self) -> FavoriteSet {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoriteSet::new(),
            Err(e) => {
                log_warn!(LogComponent::Domain("Preferences"), "Favorites unreadable: {e}");
                return FavoriteSet::new();
            }
        };

        match serde_json::from_str::<FavoriteSet>(&raw) {
            Ok(favorites) => {
                log_debug!(
                    LogComponent::Domain("Preferences"),
                    "Loaded {} favorites",
                    favorites.len()
                );
                favorites
            }
            Err(e) => {
                log_warn!(
                    LogComponent::Domain("Preferences"),
                    "Discarding corrupt favorites entry: {e}"
                );
                FavoriteSet::new()
            }
        }
    }

    fn toggle(&mut self, id: &AssetId) -> bool {
        let now_favorite = self.favorites.toggle(id);
        self.persist();
        now_favorite
    }

    fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AppError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStorage(RefCell<HashMap<String, String>>);

    impl KeyValueStorage for MapStorage {
        fn read(&self, key: &str) -> AppResult<Option<String>> {
            Ok(self.0.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> AppResult<()> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn read(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::StorageError("quota".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::StorageError("quota".to_string()))
        }
    }

    #[test]
    fn toggle_writes_json_array() {
        let mut store = FavoritesStore::open(MapStorage::default(), "favorites");
        assert!(store.toggle(&AssetId::from("ethereum")));
        assert!(store.toggle(&AssetId::from("bitcoin")));
        let raw = store.storage.read("favorites").unwrap().unwrap();
        assert_eq!(raw, r#"["bitcoin","ethereum"]"#);
    }

    #[test]
    fn failing_storage_still_tracks_membership() {
        let mut store = FavoritesStore::open(BrokenStorage, "favorites");
        assert!(store.favorites().is_empty());
        assert!(store.toggle(&AssetId::from("solana")));
        assert!(store.favorites().contains(&AssetId::from("solana")));
    }
}
