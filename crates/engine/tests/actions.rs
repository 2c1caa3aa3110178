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

async fn product(engine: &Engine, seller_id: i32, cost: i64, amount_available: i64) -> i32 {
    engine
        .create_product(
            seller_id,
            ProductFields {
                product_name: "Diet Coke".to_string(),
                cost,
                amount_available,
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn buy_decrements_stock_and_deposit() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    let product_id = product(&engine, seller, 10, 20).await;

    engine.deposit(buyer, 100).await.unwrap();
    let balance = engine.deposit(buyer, 50).await.unwrap();
    assert_eq!(balance, 150);

    let purchase = engine.buy(buyer, product_id, 3).await.unwrap();
    assert_eq!(purchase.spent, 30);
    assert_eq!(purchase.change, 120);
    assert_eq!(purchase.product.amount_available, 17);

    assert_eq!(engine.user(buyer).await.unwrap().deposit, 120);
    assert_eq!(
        engine.product(product_id).await.unwrap().amount_available,
        17
    );
}

#[tokio::test]
async fn buy_whole_stock_leaves_zero() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    let product_id = product(&engine, seller, 5, 2).await;
    engine.deposit(buyer, 10).await.unwrap();

    let purchase = engine.buy(buyer, product_id, 2).await.unwrap();
    assert_eq!(purchase.change, 0);
    assert_eq!(purchase.product.amount_available, 0);

    let err = engine.buy(buyer, product_id, 1).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));
}

#[tokio::test]
async fn failed_buy_changes_nothing() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    let product_id = product(&engine, seller, 10, 20).await;
    engine.deposit(buyer, 20).await.unwrap();

    let err = engine.buy(buyer, product_id, 3).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let err = engine.buy(buyer, product_id, 21).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    let err = engine.buy(buyer, product_id, 0).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    assert_eq!(engine.user(buyer).await.unwrap().deposit, 20);
    assert_eq!(
        engine.product(product_id).await.unwrap().amount_available,
        20
    );
}

#[tokio::test]
async fn buy_unknown_product_is_not_found() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    engine.deposit(buyer, 100).await.unwrap();

    let err = engine.buy(buyer, 4000, 1).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn buy_overflowing_total_is_invalid_input() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    let product_id = product(&engine, seller, i64::MAX, i64::MAX).await;

    let err = engine.buy(buyer, product_id, 2).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn seller_cannot_buy_or_deposit() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let product_id = product(&engine, seller, 10, 20).await;

    assert!(matches!(
        engine.deposit(seller, 5).await,
        Err(EngineError::Unauthorized(_))
    ));
    assert!(matches!(
        engine.buy(seller, product_id, 1).await,
        Err(EngineError::Unauthorized(_))
    ));
    assert!(matches!(
        engine.reset_deposit(seller).await,
        Err(EngineError::Unauthorized(_))
    ));
    assert_eq!(engine.user(seller).await.unwrap().deposit, 0);
}

#[tokio::test]
async fn deposit_accepts_only_whitelisted_coins() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;

    let mut expected = 0;
    for coin in [5, 10, 20, 50, 100] {
        expected += coin;
        assert_eq!(engine.deposit(buyer, coin).await.unwrap(), expected);
    }

    for coin in [0, 1, 7, 25, 200, -5] {
        let err = engine.deposit(buyer, coin).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)), "{coin}");
    }
    assert_eq!(engine.user(buyer).await.unwrap().deposit, expected);
}

#[tokio::test]
async fn reset_is_idempotent() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;
    engine.deposit(buyer, 50).await.unwrap();

    engine.reset_deposit(buyer).await.unwrap();
    assert_eq!(engine.user(buyer).await.unwrap().deposit, 0);
    engine.reset_deposit(buyer).await.unwrap();
    assert_eq!(engine.user(buyer).await.unwrap().deposit, 0);
}

#[tokio::test]
async fn actions_for_missing_user_are_unauthorized() {
    let engine = engine_with_db().await;

    assert!(matches!(
        engine.deposit(99, 5).await,
        Err(EngineError::Unauthorized(_))
    ));
    assert!(matches!(
        engine.reset_deposit(99).await,
        Err(EngineError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn concurrent_deposits_are_all_credited() {
    let engine = engine_with_db().await;
    let buyer = user(&engine, "buyer@example.com", Role::Buyer).await;

    let mut deposits = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let engine = engine.clone();
        deposits.spawn(async move { engine.deposit(buyer, 5).await });
    }
    while let Some(result) = deposits.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(engine.user(buyer).await.unwrap().deposit, 80);
}

#[tokio::test]
async fn concurrent_buyers_never_oversell() {
    let engine = engine_with_db().await;
    let seller = user(&engine, "seller@example.com", Role::Seller).await;
    let product_id = product(&engine, seller, 5, 1).await;

    let mut buyers = Vec::new();
    for n in 0..4 {
        let buyer = user(&engine, &format!("buyer{n}@example.com"), Role::Buyer).await;
        engine.deposit(buyer, 5).await.unwrap();
        buyers.push(buyer);
    }

    let mut purchases = tokio::task::JoinSet::new();
    for buyer in buyers.iter().copied() {
        let engine = engine.clone();
        purchases.spawn(async move { engine.buy(buyer, product_id, 1).await });
    }
    let (mut sold, mut sold_out) = (0, 0);
    while let Some(result) = purchases.join_next().await {
        match result.unwrap() {
            Ok(_) => sold += 1,
            Err(EngineError::InsufficientStock(_)) => sold_out += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!((sold, sold_out), (1, 3));
    assert_eq!(engine.product(product_id).await.unwrap().amount_available, 0);
    let mut remaining = 0;
    for buyer in buyers {
        remaining += engine.user(buyer).await.unwrap().deposit;
    }
    assert_eq!(remaining, 15);
}
