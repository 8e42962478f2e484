//! Products Domain
//!
//! CRUD over a product catalogue stored in MongoDB, plus a list endpoint that
//! composes filtering, sorting and pagination from query-string parameters.
//!
//! # Layers
//!
//! - [`handlers`]: axum routes and OpenAPI annotations, status-code mapping
//! - [`service`]: body validation, id parsing, list + count for one page
//! - [`query`]: raw query-string values to filter, sort order and page window
//! - [`repository`]: the storage trait, with [`mongodb`] and [`memory`] adapters
//! - [`models`] / [`error`]: wire types and the error buckets
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("shop");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{CreateProduct, DeleteConfirmation, Product, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use query::{
    ListQuery, PageWindow, Pagination, ProductFilter, ProductPage, ProductQuery, SortOrder,
};
pub use repository::ProductRepository;
pub use service::ProductService;
