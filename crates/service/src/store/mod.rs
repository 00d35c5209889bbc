use async_trait::async_trait;
use models::Coaster;

use crate::errors::ServiceError;

pub mod memory;

/// Storage contract for coaster records.
///
/// Every operation is atomic with respect to every other one. Implementations
/// assign ids themselves and ignore any `id` carried by the incoming record.
#[async_trait]
pub trait CoasterStore: Send + Sync {
    /// Snapshot of all records, in no particular order.
    async fn list(&self) -> Vec<Coaster>;
    /// Store `candidate` under a freshly generated id and return the stored record.
    async fn create(&self, candidate: Coaster) -> Coaster;
    async fn get(&self, id: &str) -> Result<Coaster, ServiceError>;
    /// Full replace of an existing record; the path id wins over `replacement.id`.
    async fn update(&self, id: &str, replacement: Coaster) -> Result<Coaster, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
    /// Id of a randomly chosen record.
    async fn pick_random(&self) -> Result<String, ServiceError>;
    /// Number of records held, reported by the health endpoint.
    async fn len(&self) -> usize;
}
