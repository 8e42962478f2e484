//! In-memory implementation of ProductRepository
//!
//! Keeps products in insertion order, which is what natural order means here.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::{PageWindow, ProductFilter, SortOrder};
use crate::repository::ProductRepository;

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(ObjectId::new(), input);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortOrder,
        window: PageWindow,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut matching: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
        // stable, so ties keep insertion order
        matching.sort_by(|a, b| sort.compare(a, b));

        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply_update(input);
            product.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, category: &str, price: f64) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
            category: category.to_string(),
            in_stock: true,
            tags: vec![],
            created_at: None,
        }
    }

    async fn seeded() -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        for (name, category, price) in [
            ("a", "kitchen", 30.0),
            ("b", "garden", 5.0),
            ("c", "kitchen", 10.0),
            ("d", "kitchen", 20.0),
            ("e", "kitchen", 10.0),
        ] {
            repo.create(input(name, category, price)).await.unwrap();
        }
        repo
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(input("mug", "kitchen", 9.99)).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(repo.get_by_id(ObjectId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_natural_order_is_insertion_order() {
        let repo = seeded().await;
        let all = repo
            .list(&ProductFilter::default(), SortOrder::Natural, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(names(&all), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_list_filter_and_sort() {
        let repo = seeded().await;
        let filter = ProductFilter {
            category: Some("kitchen".to_string()),
            max_price: Some(20.0),
            ..Default::default()
        };

        let asc = repo
            .list(&filter, SortOrder::PriceAsc, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(names(&asc), vec!["c", "e", "d"]);

        let desc = repo
            .list(&filter, SortOrder::PriceDesc, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(names(&desc), vec!["d", "c", "e"]);

        assert_eq!(repo.count(&filter).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_window() {
        let repo = seeded().await;
        let filter = ProductFilter::default();

        let page2 = repo
            .list(&filter, SortOrder::PriceAsc, PageWindow::new(2, 2))
            .await
            .unwrap();
        assert_eq!(names(&page2), vec!["e", "d"]);

        let beyond = repo
            .list(&filter, SortOrder::Natural, PageWindow::new(4, 2))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = seeded().await;
        let target = repo
            .list(&ProductFilter::default(), SortOrder::Natural, PageWindow::new(1, 1))
            .await
            .unwrap()
            .remove(0);

        let updated = repo
            .update(
                target.id,
                UpdateProduct {
                    name: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.price, target.price);
        assert_eq!(updated.created_at, target.created_at);

        assert!(repo.delete(target.id).await.unwrap());
        assert!(!repo.delete(target.id).await.unwrap());
        assert_eq!(repo.len().await, 4);
        assert_eq!(
            repo.update(target.id, UpdateProduct::default()).await.unwrap(),
            None
        );
    }
}
