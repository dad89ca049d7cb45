use crate::{models::BookRecord, Result};
use bookfinder_store::SlotStore;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Slot the reading list is persisted under
pub const FAVORITES_SLOT: &str = "bookfinder_favorites";

/// Where the favorites collection is persisted
///
/// `load` returns `None` when nothing was ever saved. Malformed content is an
/// error; the store decides what to do about it.
#[cfg_attr(test, mockall::automock)]
pub trait FavoritesStorage: Send {
    fn load(&self) -> Result<Option<Vec<BookRecord>>>;
    fn save(&self, favorites: &[BookRecord]) -> Result<()>;

    /// When the collection was last written, if the backend tracks it
    fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

/// Favorites persisted as JSON in a durable key-value slot
pub struct SlotStorage {
    store: SlotStore,
    key: String,
}

impl SlotStorage {
    pub fn new(store: SlotStore) -> Self {
        Self {
            store,
            key: FAVORITES_SLOT.to_string(),
        }
    }
}

impl FavoritesStorage for SlotStorage {
    fn load(&self) -> Result<Option<Vec<BookRecord>>> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, favorites: &[BookRecord]) -> Result<()> {
        let raw = serde_json::to_string(favorites)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        let ts = self.store.updated_at(&self.key)?;
        Ok(ts.and_then(|ts| DateTime::from_timestamp(ts, 0)))
    }
}

/// Session-only storage; also handy in tests
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw content, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<BookRecord>>> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, favorites: &[BookRecord]) -> Result<()> {
        let raw = serde_json::to_string(favorites)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| crate::Error::StorageError("memory slot poisoned".into()))?;
        *slot = Some(raw);
        Ok(())
    }
}

/// The user's reading list: unique by key, in insertion order
///
/// Every mutation, including ones that change nothing, writes the whole
/// collection back to storage. Storage failures are logged and swallowed so
/// the list keeps working for the rest of the session.
pub struct FavoritesStore {
    favorites: Vec<BookRecord>,
    storage: Box<dyn FavoritesStorage>,
}

impl FavoritesStore {
    /// Load whatever the storage holds. Absent or unreadable data starts empty.
    pub fn open(storage: Box<dyn FavoritesStorage>) -> Self {
        let favorites = match storage.load() {
            Ok(Some(favorites)) => {
                debug!("Loaded {} favorites", favorites.len());
                dedup_by_key(favorites)
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Error loading favorites from storage: {}", e);
                Vec::new()
            }
        };

        Self { favorites, storage }
    }

    pub fn favorites(&self) -> &[BookRecord] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn is_favorite(&self, book: &BookRecord) -> bool {
        self.contains_key(&book.key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.favorites.iter().any(|fav| fav.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&BookRecord> {
        self.favorites.iter().find(|fav| fav.key == key)
    }

    /// Append unless a book with the same key is already there
    pub fn add(&mut self, book: BookRecord) {
        if !self.is_favorite(&book) {
            info!("Added {} to favorites", book.key);
            self.favorites.push(book);
        }
        self.persist();
    }

    pub fn remove(&mut self, book: &BookRecord) {
        self.remove_key(&book.key);
    }

    /// Returns whether a book was removed
    pub fn remove_key(&mut self, key: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav.key != key);
        let removed = self.favorites.len() != before;
        if removed {
            info!("Removed {} from favorites", key);
        }
        self.persist();
        removed
    }

    /// Flip membership based on the current collection. Returns the new state.
    pub fn toggle(&mut self, book: &BookRecord) -> bool {
        if self.is_favorite(book) {
            self.remove(book);
            false
        } else {
            self.add(book.clone());
            true
        }
    }

    /// Time of the last write to storage; `None` if never saved or untracked
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        match self.storage.last_saved() {
            Ok(ts) => ts,
            Err(e) => {
                warn!("Error reading favorites save time: {}", e);
                None
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.favorites.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.favorites) {
            warn!("Error saving favorites to storage: {}", e);
        }
    }
}

fn dedup_by_key(favorites: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut unique: Vec<BookRecord> = Vec::with_capacity(favorites.len());
    for book in favorites {
        if !unique.iter().any(|b| b.key == book.key) {
            unique.push(book);
        }
    }
    unique
}
