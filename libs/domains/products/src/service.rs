//! Product Service - Business logic layer

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::{Pagination, ProductPage, ProductQuery};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, identifier parsing and the error
/// bucket each operation reports, and orchestrates repository operations.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product. Every failure is reported as a client error.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        self.repository
            .create(input)
            .await
            .map_err(ProductError::into_client_error)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        let id = parse_id(id)?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// One page of products matching the query, with pagination metadata
    /// counted against the same filter
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<ProductPage> {
        let (data, total) = tokio::try_join!(
            self.repository
                .list(&query.filter, query.sort, query.window),
            self.repository.count(&query.filter),
        )?;

        Ok(ProductPage {
            data,
            pagination: Pagination::new(query.window, total),
        })
    }

    /// Apply a partial update and return the updated product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        self.apply_update(id, input)
            .await
            .map_err(ProductError::into_client_error)
    }

    async fn apply_update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;
        let id = parse_id(id)?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        let id = parse_id(id)?;
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound);
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn parse_id(raw: &str) -> ProductResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ProductError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PageWindow, ProductFilter, SortOrder};
    use crate::repository::MockProductRepository;
    use chrono::Utc;
    use mockall::predicate::{always, eq};

    fn mug_input() -> CreateProduct {
        CreateProduct {
            name: "Mug".to_string(),
            description: "Ceramic".to_string(),
            price: 9.99,
            category: "kitchen".to_string(),
            in_stock: true,
            tags: vec![],
            created_at: None,
        }
    }

    fn mug(id: ObjectId) -> Product {
        Product {
            id,
            name: "Mug".to_string(),
            description: "Ceramic".to_string(),
            price: 9.99,
            category: "kitchen".to_string(),
            in_stock: true,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_price_without_touching_store() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let mut input = mug_input();
        input.price = 0.0;

        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("Price must be greater than 0")));
    }

    #[tokio::test]
    async fn test_create_product_store_failure_is_client_error() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(ProductError::Database("write failed".to_string())));

        let service = ProductService::new(mock_repo);
        let err = service.create_product(mug_input()).await.unwrap_err();

        assert!(matches!(err, ProductError::Validation(msg) if msg == "write failed"));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service.get_product(&id.to_hex()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_get_product_malformed_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().never();

        let service = ProductService::new(mock_repo);
        let err = service.get_product("not-an-id").await.unwrap_err();

        assert!(matches!(err, ProductError::InvalidId(raw) if raw == "not-an-id"));
    }

    #[tokio::test]
    async fn test_list_products_pairs_page_with_filtered_count() {
        let mut mock_repo = MockProductRepository::new();
        let filter = ProductFilter {
            category: Some("kitchen".to_string()),
            ..Default::default()
        };
        let window = PageWindow::new(2, 1);

        mock_repo
            .expect_list()
            .with(eq(filter.clone()), eq(SortOrder::PriceAsc), eq(window))
            .returning(|_, _, _| Ok(vec![mug(ObjectId::new())]));
        mock_repo
            .expect_count()
            .with(eq(filter.clone()))
            .returning(|_| Ok(3));

        let service = ProductService::new(mock_repo);
        let page = service
            .list_products(ProductQuery {
                filter,
                sort: SortOrder::PriceAsc,
                window,
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 2,
                total_pages: 3,
                limit: 1,
                total_products: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_list_products_store_failure_propagates() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list()
            .returning(|_, _, _| Err(ProductError::Database("timeout".to_string())));
        mock_repo.expect_count().returning(|_| Ok(0));

        let service = ProductService::new(mock_repo);
        let err = service
            .list_products(ProductQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_update()
            .with(eq(id), always())
            .returning(|_, _| Ok(None));

        let service = ProductService::new(mock_repo);
        let update = UpdateProduct {
            price: Some(5.0),
            ..Default::default()
        };
        let err = service
            .update_product(&id.to_hex(), update)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_update_product_rejects_invalid_price() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let update = UpdateProduct {
            price: Some(-1.0),
            ..Default::default()
        };
        let err = service
            .update_product(&ObjectId::new().to_hex(), update)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_product_malformed_id_is_client_error() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .update_product("123", UpdateProduct::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_product_returns_updated_record() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();
        let update = UpdateProduct {
            in_stock: Some(false),
            ..Default::default()
        };

        mock_repo
            .expect_update()
            .with(eq(id), eq(update.clone()))
            .returning(|id, patch| {
                let mut product = mug(id);
                product.apply_update(patch);
                Ok(Some(product))
            });

        let service = ProductService::new(mock_repo);
        let product = service.update_product(&id.to_hex(), update).await.unwrap();

        assert_eq!(product.id, id);
        assert!(!product.in_stock);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);
        assert!(service.delete_product(&id.to_hex()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let err = service
            .delete_product(&ObjectId::new().to_hex())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }
}
