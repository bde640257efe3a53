use crate::errors::AppError;
use crate::storage::JsonStore;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// A record with a unique key inside its document.
pub trait Keyed {
    type Key: PartialEq + ?Sized;

    fn key(&self) -> &Self::Key;
}

pub fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

/// Replace-in-place by key. `None` when no record has `key`.
pub fn replaced<T: Keyed + Clone>(
    items: &[T],
    key: &T::Key,
    patch: impl FnOnce(&T) -> T,
) -> Option<Vec<T>> {
    let index = items.iter().position(|item| item.key() == key)?;
    let mut next = items.to_vec();
    next[index] = patch(&items[index]);
    Some(next)
}

/// Filter-out by key. `None` when no record has `key`.
pub fn removed<T: Keyed + Clone>(items: &[T], key: &T::Key) -> Option<Vec<T>> {
    if !items.iter().any(|item| item.key() == key) {
        return None;
    }
    Some(items.iter().filter(|item| item.key() != key).cloned().collect())
}

/// In-memory copy of one stored document. Every mutation writes the new
/// sequence before it becomes visible here.
#[derive(Debug)]
pub struct Mirror<T> {
    store: JsonStore,
    key: &'static str,
    items: Vec<T>,
}

impl<T> Mirror<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned,
{
    pub async fn load(
        store: JsonStore,
        key: &'static str,
        default: impl FnOnce() -> Vec<T>,
    ) -> Self {
        let items = store.load(key, default).await;
        debug!(key, count = items.len(), "loaded mirror");
        Self { store, key, items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub async fn add(&mut self, item: T) -> Result<(), AppError> {
        let next = appended(&self.items, item);
        self.commit(next).await
    }

    /// Returns `false` without writing when `key` is absent.
    pub async fn update(
        &mut self,
        key: &T::Key,
        patch: impl FnOnce(&T) -> T,
    ) -> Result<bool, AppError> {
        match replaced(&self.items, key, patch) {
            Some(next) => self.commit(next).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Returns `false` without writing when `key` is absent.
    pub async fn remove(&mut self, key: &T::Key) -> Result<bool, AppError> {
        match removed(&self.items, key) {
            Some(next) => self.commit(next).await.map(|()| true),
            None => Ok(false),
        }
    }

    pub async fn replace_all(&mut self, items: Vec<T>) -> Result<(), AppError> {
        self.commit(items).await
    }

    async fn commit(&mut self, next: Vec<T>) -> Result<(), AppError> {
        self.store.save(self.key, &next).await?;
        self.items = next;
        Ok(())
    }
}
