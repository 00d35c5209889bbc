use std::collections::HashMap;

use async_trait::async_trait;
use models::Coaster;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::CoasterStore;
use crate::errors::ServiceError;

/// In-memory coaster collection guarded by a single lock.
///
/// Ids are random UUIDs, so concurrent creates never collide.
#[derive(Default)]
pub struct InMemoryCoasterStore {
    inner: RwLock<HashMap<String, Coaster>>,
}

impl InMemoryCoasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl CoasterStore for InMemoryCoasterStore {
    async fn list(&self) -> Vec<Coaster> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    async fn create(&self, candidate: Coaster) -> Coaster {
        let coaster = candidate.with_id(Self::next_id());
        let mut map = self.inner.write().await;
        map.insert(coaster.id.clone(), coaster.clone());
        debug!(id = %coaster.id, total = map.len(), "coaster created");
        coaster
    }

    async fn get(&self, id: &str) -> Result<Coaster, ServiceError> {
        let map = self.inner.read().await;
        map.get(id).cloned().ok_or_else(|| ServiceError::not_found(id))
    }

    async fn update(&self, id: &str, replacement: Coaster) -> Result<Coaster, ServiceError> {
        let mut map = self.inner.write().await;
        let slot = map.get_mut(id).ok_or_else(|| ServiceError::not_found(id))?;
        *slot = replacement.with_id(id);
        debug!(%id, "coaster replaced");
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        match map.remove(id) {
            Some(_) => {
                debug!(%id, total = map.len(), "coaster deleted");
                Ok(())
            }
            None => Err(ServiceError::not_found(id)),
        }
    }

    async fn pick_random(&self) -> Result<String, ServiceError> {
        let map = self.inner.read().await;
        let picked = match map.len() {
            0 => None,
            1 => map.keys().next(),
            n => {
                let idx = rand::thread_rng().gen_range(0..n);
                map.keys().nth(idx)
            }
        };
        picked.cloned().ok_or_else(|| ServiceError::NotFound("no coasters stored".into()))
    }

    async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
