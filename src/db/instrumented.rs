use anyhow::Result;
use async_trait::async_trait;
use std::time::Instant;
use uuid::Uuid;

use crate::db::{UserRepository, Users};
use crate::metrics::registry::{DATABASE_QUERIES_TOTAL, DATABASE_QUERY_DURATION_SECONDS};
use crate::models::user::User;

/// A thin wrapper around a UserRepository that records basic Prometheus
/// metrics for query counts and durations.
pub struct InstrumentedUserRepository {
    inner: Users,
}

impl InstrumentedUserRepository {
    pub fn new(inner: Users) -> Self {
        Self { inner }
    }

    fn observe(&self, query_type: &'static str, start: Instant) {
        let seconds = start.elapsed().as_secs_f64();
        DATABASE_QUERIES_TOTAL
            .with_label_values(&[query_type])
            .inc();
        DATABASE_QUERY_DURATION_SECONDS
            .with_label_values(&[query_type])
            .observe(seconds);
    }
}

#[async_trait]
impl UserRepository for InstrumentedUserRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        let start = Instant::now();
        let res = self.inner.create_user(user).await;
        self.observe("insert", start);
        res
    }

    async fn get_user(&self, id: Uuid) -> Result<User> {
        let start = Instant::now();
        let res = self.inner.get_user(id).await;
        self.observe("select", start);
        res
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let start = Instant::now();
        let res = self.inner.list_users().await;
        self.observe("select", start);
        res
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User> {
        let start = Instant::now();
        let res = self.inner.update_user_name(id, name).await;
        self.observe("update", start);
        res
    }

    async fn test_connection(&self) -> Result<()> {
        let start = Instant::now();
        let res = self.inner.test_connection().await;
        self.observe("select", start);
        res
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryUserRepository, RecordNotFound};
    use crate::models::user::DEMO_USER_ID;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_wrapper_passes_results_through() {
        let repo = InstrumentedUserRepository::new(Arc::new(MemoryUserRepository::with_demo_user()));
        let before = DATABASE_QUERIES_TOTAL.with_label_values(&["select"]).get();

        assert_eq!(repo.get_user(DEMO_USER_ID).await.unwrap().name, "Bob");
        assert!(repo
            .get_user(Uuid::new_v4())
            .await
            .unwrap_err()
            .is::<RecordNotFound>());
        assert_eq!(repo.backend_name(), "memory");

        let after = DATABASE_QUERIES_TOTAL.with_label_values(&["select"]).get();
        assert!(after >= before + 2);
    }
}
