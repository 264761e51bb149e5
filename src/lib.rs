//! Read-only query access to per-mailing-list email archive tables.
//!
//! Each list's emails live in a PostgreSQL table whose name is derived from
//! the list address ([`table_name`]). [`ArchiveStore`] owns one database
//! session and exposes lookups, thread and date-range scans, and the
//! keyword-search presets, all driven by a shared [`SearchConfig`].

pub mod error;
pub mod models;
pub mod query_logger;
pub mod search;
pub mod store;
pub mod tables;

pub use error::StoreError;
pub use models::{ArchiveMonths, Email};
pub use query_logger::{LogQueryObserver, QueryObserver};
pub use search::{SUBJECT_INDEX_DEFAULT_OFFSET, SearchConfig, SearchField, SearchStrategy};
pub use store::ArchiveStore;
pub use tables::{ListTable, TABLE_PREFIX, table_name};

pub mod test_support {
    //! Shared provisioning for integration tests: a disposable Postgres
    //! container and fixtures that create and seed list tables.

    use chrono::{DateTime, Utc};
    use env_logger::Env;
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Once;
    use testcontainers_modules::postgres::Postgres;
    use testcontainers_modules::testcontainers::core::error::TestcontainersError;
    use testcontainers_modules::testcontainers::runners::AsyncRunner;
    use testcontainers_modules::testcontainers::ContainerAsync;
    use thiserror::Error;

    use crate::tables::table_name;

    static LOGGER: Once = Once::new();

    /// Initialise test logging once; respects `RUST_LOG`.
    pub fn init_logging() {
        LOGGER.call_once(|| {
            let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .is_test(true)
                .try_init();
        });
    }

    #[derive(Debug, Error)]
    pub enum TestDatabaseError {
        #[error("container error: {0}")]
        Container(#[from] TestcontainersError),
        #[error("database error: {0}")]
        Sqlx(#[from] sqlx::Error),
    }

    /// Ephemeral database for integration tests: one disposable Postgres
    /// container with a pool connected to it.
    pub struct TestDatabase {
        pool: Option<PgPool>,
        url: String,
        container: Option<ContainerAsync<Postgres>>,
    }

    impl TestDatabase {
        /// Launch a fresh container and connect to it.
        pub async fn new() -> Result<Self, TestDatabaseError> {
            let container = Postgres::default().start().await?;
            let host = container.get_host().await?;
            let port = container.get_host_port_ipv4(5432).await?;
            let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await?;

            Ok(Self {
                pool: Some(pool),
                url,
                container: Some(container),
            })
        }

        /// Connection string suitable for [`crate::ArchiveStore::connect`].
        pub fn url(&self) -> &str {
            &self.url
        }

        pub fn pool(&self) -> &PgPool {
            self.pool.as_ref().expect("test database pool is available")
        }

        /// Close the pool and tear the container down.
        pub async fn close(mut self) {
            if let Some(pool) = self.pool.take() {
                pool.close().await;
            }
            if let Some(container) = self.container.take() {
                drop(container);
            }
        }
    }

    /// Creates one list table with the archive schema and seeds rows into it.
    pub struct ListFixture<'a> {
        pool: &'a PgPool,
        table: String,
    }

    impl<'a> ListFixture<'a> {
        pub async fn create(pool: &'a PgPool, list_name: &str) -> Result<Self, sqlx::Error> {
            let table = table_name(list_name);
            let sql = format!(
                r#"CREATE TABLE "{table}" (
                    message_id TEXT PRIMARY KEY,
                    date TIMESTAMPTZ NOT NULL,
                    subject TEXT NOT NULL,
                    sender TEXT NOT NULL,
                    email TEXT NOT NULL,
                    content TEXT NOT NULL,
                    thread_id TEXT NOT NULL,
                    "references" TEXT
                )"#
            );
            sqlx::query(&sql).execute(pool).await?;
            Ok(Self { pool, table })
        }

        #[allow(clippy::too_many_arguments)]
        pub async fn insert_email(
            &self,
            message_id: &str,
            date: DateTime<Utc>,
            thread_id: &str,
            references: Option<&str>,
            subject: &str,
            sender: &str,
            email: &str,
            content: &str,
        ) -> Result<(), sqlx::Error> {
            let sql = format!(
                r#"INSERT INTO "{}" (message_id, date, subject, sender, email, content, thread_id, "references")
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
                self.table
            );
            sqlx::query(&sql)
                .bind(message_id)
                .bind(date)
                .bind(subject)
                .bind(sender)
                .bind(email)
                .bind(content)
                .bind(thread_id)
                .bind(references)
                .execute(self.pool)
                .await?;
            Ok(())
        }
    }
}
