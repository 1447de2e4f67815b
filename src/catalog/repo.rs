use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewService, Service};

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn create(&self, service: &NewService) -> anyhow::Result<i64>;
    /// Removing an id that does not exist is not an error.
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    /// Active services, highest id first.
    async fn list_active(&self) -> anyhow::Result<Vec<Service>>;
}

#[derive(Clone)]
pub struct PgServiceStore {
    db: PgPool,
}

impl PgServiceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceStore for PgServiceStore {
    async fn create(&self, s: &NewService) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO services (name, price, is_active) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(&s.name)
        .bind(s.price)
        .bind(s.is_active)
        .fetch_one(&self.db)
        .await
        .context("insert service")?;
        Ok(id)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM services WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete service")?;
        Ok(())
    }

    async fn list_active(&self) -> anyhow::Result<Vec<Service>> {
        let rows = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, price, is_active
            FROM services
            WHERE is_active = TRUE
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list active services")?;
        Ok(rows)
    }
}

pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryServiceStore {
        inner: Mutex<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        next_id: i64,
        rows: Vec<Service>,
    }

    #[async_trait]
    impl ServiceStore for MemoryServiceStore {
        async fn create(&self, s: &NewService) -> anyhow::Result<i64> {
            let mut inner = self.inner.lock().await;
            inner.next_id += 1;
            let id = inner.next_id;
            inner.rows.push(Service {
                id,
                name: s.name.clone(),
                price: s.price,
                is_active: s.is_active,
            });
            Ok(id)
        }

        async fn delete(&self, id: i64) -> anyhow::Result<()> {
            self.inner.lock().await.rows.retain(|s| s.id != id);
            Ok(())
        }

        async fn list_active(&self) -> anyhow::Result<Vec<Service>> {
            let inner = self.inner.lock().await;
            let mut out: Vec<Service> = inner.rows.iter().filter(|s| s.is_active).cloned().collect();
            out.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(out)
        }
    }
}
