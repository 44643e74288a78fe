//! # Storage
//!
//! The persistence capability consumed by the lifecycle services, plus its
//! implementations.
//!
//! - [`provider`] - the `DatabaseServiceProvider` trait
//! - [`in_memory`] - dashmap-backed provider for development and tests
//! - [`postgres`] - sqlx provider over the schema in `migrations/`
//!   (feature `postgres`)
//! - [`connection`] - pool setup from [`crate::config::DatabaseConfig`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nfvo_lcm_core::config::LcmConfig;
//! use nfvo_lcm_core::database::{DatabaseConnection, PgDatabaseServiceProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LcmConfig::load()?;
//! let db = DatabaseConnection::new(&config.database).await?;
//! db.migrate().await?;
//!
//! let provider = PgDatabaseServiceProvider::new(db.pool().clone());
//! # let _ = provider;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "postgres")]
pub mod connection;
pub mod errors;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod provider;

#[cfg(feature = "postgres")]
pub use connection::DatabaseConnection;
pub use errors::{StorageError, StorageResult};
pub use in_memory::InMemoryDatabaseServiceProvider;
#[cfg(feature = "postgres")]
pub use postgres::{PgDatabaseServiceProvider, MIGRATOR};
pub use provider::DatabaseServiceProvider;
