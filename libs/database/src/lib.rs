//! Database library providing the MongoDB connector and health checks
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::from_env()?;
//! let client = mongodb::connect_from_config(&config).await?;
//! let db = mongodb::database_from_config(&client, &config);
//! let collection = db.collection::<Document>("products");
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;
