//! In-memory [`Store`] used by handler and router tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Store, StoreError, StoreResult};
use crate::models::{NewProduct, Product};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create(&self, product: &NewProduct) -> StoreResult<Product> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let row = product.with_id(inner.last_id);
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn read_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.inner.lock().await.rows.values().cloned().collect())
    }

    async fn read(&self, id: i64) -> StoreResult<Product> {
        self.inner
            .lock()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product> {
        let mut inner = self.inner.lock().await;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.name = product.name.clone();
        row.stock = product.stock;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.inner
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, stock: i32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            stock,
        }
    }

    #[tokio::test]
    async fn create_then_read_returns_assigned_id() {
        let store = MemoryStore::new();
        let created = store.create(&payload("apple", 10)).await.unwrap();
        let read = store.read(created.id).await.unwrap();
        assert_eq!(read.id, created.id);
        assert_eq!(read.name, "apple");
        assert_eq!(read.stock, 10);
    }

    #[tokio::test]
    async fn read_all_counts_creates() {
        let store = MemoryStore::new();
        assert!(store.read_all().await.unwrap().is_empty());
        for i in 0..5 {
            store.create(&payload("item", i)).await.unwrap();
        }
        assert_eq!(store.read_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.read(1).await, Err(StoreError::NotFound(1))));
        assert!(matches!(
            store.update(1, &payload("x", 1)).await,
            Err(StoreError::NotFound(1))
        ));
        assert!(matches!(store.delete(1).await, Err(StoreError::NotFound(1))));
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let store = MemoryStore::new();
        let created = store.create(&payload("apple", 10)).await.unwrap();
        store.update(created.id, &payload("pear", 2)).await.unwrap();
        let read = store.read(created.id).await.unwrap();
        assert_eq!(
            read,
            Product {
                id: created.id,
                name: "pear".to_string(),
                stock: 2,
            }
        );
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let store = MemoryStore::new();
        let created = store.create(&payload("apple", 10)).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(matches!(store.read(created.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create(&payload("a", 1)).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(&payload("b", 1)).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
