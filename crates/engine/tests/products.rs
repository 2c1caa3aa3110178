use sea_orm::Database;

use engine::{Engine, EngineError, NewUser, ProductFields, Role};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn user(engine: &Engine, username: &str, role: Role) -> i32 {
    engine
        .register(NewUser {
            username: username.to_string(),
            password: "Test1234".to_string(),
            role: Some(role),
        })
        .await
        .unwrap()
        .id
}

fn fields(product_name: &str, cost: i64, amount_available: i64) -> ProductFields {
    ProductFields {
        product_name: product_name.to_string(),
        cost,
        amount_available,
    }
}

#[tokio::test]
async fn create_sets_seller_from_caller() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;

    let product = engine
        .create_product(seller, fields("  Sprite ", 5, 40))
        .await
        .unwrap();
    assert_eq!(product.seller_id, seller);
    assert_eq!(product.product_name, "Sprite");
    assert_eq!(product.cost, 5);
    assert_eq!(product.amount_available, 40);

    assert_eq!(engine.products().await.unwrap(), vec![product]);
}

#[tokio::test]
async fn buyer_cannot_create_products() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;

    let err = engine
        .create_product(buyer, fields("Sprite", 5, 40))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
    assert!(engine.products().await.unwrap().is_empty());
}

#[tokio::test]
async fn role_is_checked_before_fields() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;

    let err = engine
        .create_product(buyer, fields("", -1, -1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn invalid_fields_are_rejected() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;

    for bad in [fields(" ", 5, 1), fields("Sprite", -5, 1), fields("Sprite", 5, -1)] {
        let err = engine.create_product(seller, bad).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
    assert!(engine.products().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_fields_of_own_product() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let product = engine
        .create_product(seller, fields("Fanta", 15, 10))
        .await
        .unwrap();

    let updated = engine
        .update_product(seller, product.id, fields("Fanta Zero", 20, 8))
        .await
        .unwrap();
    assert_eq!(updated.id, product.id);
    assert_eq!(updated.seller_id, seller);
    assert_eq!(updated.product_name, "Fanta Zero");
    assert_eq!(updated.cost, 20);
    assert_eq!(updated.amount_available, 8);
    assert_eq!(engine.product(product.id).await.unwrap(), updated);
}

#[tokio::test]
async fn other_seller_cannot_update_or_delete() {
    let engine = engine_with_db().await;
    let owner = user(&engine, "owner@example.com", Role::Seller).await;
    let other = user(&engine, "other@example.com", Role::Seller).await;
    let product = engine
        .create_product(owner, fields("Fanta", 15, 10))
        .await
        .unwrap();

    let err = engine.delete_product(other, product.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFoundOrForbidden(_)));

    let err = engine
        .update_product(other, product.id, fields("Stolen", 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFoundOrForbidden(_)));

    assert_eq!(engine.product(product.id).await.unwrap(), product);
}

#[tokio::test]
async fn missing_product_looks_like_foreign_product() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;

    let err = engine.delete_product(seller, 4000).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFoundOrForbidden(_)));

    let err = engine.product(4000).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_returns_removed_product() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let product = engine
        .create_product(seller, fields("Fanta", 15, 10))
        .await
        .unwrap();

    let deleted = engine.delete_product(seller, product.id).await.unwrap();
    assert_eq!(deleted, product);
    assert!(engine.products().await.unwrap().is_empty());
}

#[tokio::test]
async fn products_are_listed_by_id() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    for name in ["Coke", "Sprite", "Fanta"] {
        engine
            .create_product(seller, fields(name, 10, 1))
            .await
            .unwrap();
    }

    let names: Vec<_> = engine
        .products()
        .await
        .unwrap()
        .into_iter()
        .map(|product| product.product_name)
        .collect();
    assert_eq!(names, ["Coke", "Sprite", "Fanta"]);
}
