use std::sync::Arc;

use tracing::{info, instrument};

use super::repo::ServiceStore;
use super::repo_types::{NewService, Service};

/// Admin-managed service catalog; each call maps to one store operation.
pub struct CatalogService {
    services: Arc<dyn ServiceStore>,
}

impl CatalogService {
    pub fn new(services: Arc<dyn ServiceStore>) -> Self {
        Self { services }
    }

    #[instrument(skip(self, service), fields(name = %service.name))]
    pub async fn create(&self, service: NewService) -> anyhow::Result<i64> {
        let id = self.services.create(&service).await?;
        info!(service_id = id, "service created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> anyhow::Result<()> {
        self.services.delete(id).await
    }

    pub async fn list_active(&self) -> anyhow::Result<Vec<Service>> {
        self.services.list_active().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repo::memory::MemoryServiceStore;

    fn new_service(name: &str, is_active: bool) -> NewService {
        NewService {
            name: name.into(),
            price: 15_000,
            is_active,
        }
    }

    #[tokio::test]
    async fn list_active_filters_and_orders_by_id_desc() {
        let svc = CatalogService::new(Arc::new(MemoryServiceStore::default()));
        let cut = svc.create(new_service("Cut", true)).await.unwrap();
        svc.create(new_service("Retired", false)).await.unwrap();
        let color = svc.create(new_service("Color", true)).await.unwrap();

        let ids: Vec<i64> = svc.list_active().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![color, cut]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let svc = CatalogService::new(Arc::new(MemoryServiceStore::default()));
        let id = svc.create(new_service("Cut", true)).await.unwrap();

        svc.delete(id).await.expect("first delete");
        assert!(svc.list_active().await.unwrap().is_empty());
        svc.delete(id).await.expect("second delete is not an error");
        svc.delete(9_999).await.expect("unknown id is not an error");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let svc = CatalogService::new(Arc::new(MemoryServiceStore::default()));
        let first = svc.create(new_service("Cut", true)).await.unwrap();
        svc.delete(first).await.unwrap();
        let second = svc.create(new_service("Shave", true)).await.unwrap();
        assert!(second > first);
    }
}
