use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::{PageWindow, ProductFilter, SortOrder};

/// Repository trait for Product persistence
///
/// This trait defines the data access interface for products.
/// Implementations can use different storage backends (MongoDB, in-memory, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product; the store assigns its identifier
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Products matching `filter`, ordered by `sort`, sliced by `window`
    async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortOrder,
        window: PageWindow,
    ) -> ProductResult<Vec<Product>>;

    /// Count products matching a filter
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;

    /// Apply a patch and return the updated product, `None` if the ID is unknown
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Delete a product by ID, returns whether a product was removed
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}
