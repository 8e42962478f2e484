//! MongoDB integration tests for the products repository
//!
//! These start a throwaway MongoDB container and need Docker:
//!
//! ```text
//! cargo test -p domain_products --test mongo_integration_test -- --ignored
//! ```

use domain_products::*;
use ::mongodb::bson::oid::ObjectId;
use ::mongodb::Client;
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

struct TestMongo {
    // Keeps the container alive for the duration of the test
    _container: ContainerAsync<Mongo>,
    repository: MongoProductRepository,
}

async fn start_mongo() -> TestMongo {
    let container = Mongo::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(27017).await.unwrap();

    let client = Client::with_uri_str(format!("mongodb://{host}:{port}"))
        .await
        .unwrap();
    let repository = MongoProductRepository::new(&client.database("products_test"));
    repository.init_indexes().await.unwrap();

    TestMongo {
        _container: container,
        repository,
    }
}

fn input(name: &str, category: &str, price: f64) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        category: category.to_string(),
        in_stock: true,
        tags: vec!["new".to_string()],
        created_at: None,
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_get_update_delete() {
    let mongo = start_mongo().await;
    let repo = &mongo.repository;

    let created = repo.create(input("Mug", "kitchen", 9.99)).await.unwrap();
    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));

    let updated = repo
        .update(
            created.id,
            UpdateProduct {
                price: Some(11.0),
                in_stock: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.price, 11.0);
    assert!(!updated.in_stock);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.tags, created.tags);
    assert_eq!(updated.created_at, created.created_at);

    let unchanged = repo
        .update(created.id, UpdateProduct::default())
        .await
        .unwrap();
    assert_eq!(unchanged, Some(updated));

    assert!(repo.delete(created.id).await.unwrap());
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_unknown_id_returns_none() {
    let mongo = start_mongo().await;

    let result = mongo
        .repository
        .update(
            ObjectId::new(),
            UpdateProduct {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_filter_sort_window_and_count() {
    let mongo = start_mongo().await;
    let repo = &mongo.repository;

    for (name, category, price) in [
        ("Kettle", "kitchen", 35.0),
        ("Rake", "garden", 12.0),
        ("Mug", "kitchen", 9.99),
        ("Pan", "kitchen", 24.5),
        ("Spoon", "kitchen", 2.0),
    ] {
        repo.create(input(name, category, price)).await.unwrap();
    }

    let filter = ProductFilter {
        category: Some("kitchen".to_string()),
        min_price: Some(5.0),
        ..Default::default()
    };

    assert_eq!(repo.count(&filter).await.unwrap(), 3);

    let first = repo
        .list(&filter, SortOrder::PriceAsc, PageWindow::new(1, 2))
        .await
        .unwrap();
    let second = repo
        .list(&filter, SortOrder::PriceAsc, PageWindow::new(2, 2))
        .await
        .unwrap();

    let prices: Vec<f64> = first.iter().chain(second.iter()).map(|p| p.price).collect();
    assert_eq!(prices, vec![9.99, 24.5, 35.0]);

    let descending = repo
        .list(&ProductFilter::default(), SortOrder::PriceDesc, PageWindow::default())
        .await
        .unwrap();
    assert!(descending.windows(2).all(|w| w[0].price >= w[1].price));
    assert_eq!(descending.len(), 5);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_list_pagination_metadata() {
    let mongo = start_mongo().await;
    for price in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0] {
        mongo
            .repository
            .create(input("Item", "misc", price))
            .await
            .unwrap();
    }

    let service = ProductService::new(mongo.repository);
    let page = service
        .list_products(ProductQuery {
            window: PageWindow::new(3, 3),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(
        page.pagination,
        Pagination {
            current_page: 3,
            total_pages: 3,
            limit: 3,
            total_products: 7,
        }
    );
}
