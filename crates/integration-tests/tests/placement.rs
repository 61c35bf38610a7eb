//! Placement transaction properties against a live database.
//!
//! Covers the guarantees that unit tests can't: atomicity of the header,
//! line items, and stock decrements; the conditional-decrement race; and the
//! idempotent read-back.

#![allow(clippy::unwrap_used)]

use rust_decimal::dec;
use sqlx::PgPool;

use storekeeper_core::{Money, OrderId, OrderStatus, ProductId, UserId};
use storekeeper_server::db::products::ProductInput;
use storekeeper_server::db::{OrderRepository, PlacementError, ProductRepository};
use storekeeper_server::models::{NewOrder, NewOrderItem};

async fn seed_product(pool: &PgPool, name: &str, stock: i32) -> ProductId {
    ProductRepository::new(pool)
        .create(&ProductInput {
            name: name.to_owned(),
            description: None,
            price: Money::new(dec!(25)).unwrap(),
            stock_quantity: stock,
            image_url: None,
            category_id: None,
        })
        .await
        .unwrap()
        .id
}

fn item(product_id: ProductId, quantity: u32) -> NewOrderItem {
    NewOrderItem {
        product_id,
        quantity,
        price_per_unit: Money::new(dec!(25)).unwrap(),
    }
}

fn order_of(items: Vec<NewOrderItem>, total: Money) -> NewOrder {
    NewOrder {
        user_id: UserId::generate(),
        total_amount: total,
        shipping_address: "1 Main St".to_owned(),
        phone: "+1 555 0100".to_owned(),
        payment_method: "card".to_owned(),
        notes: None,
        items,
    }
}

async fn stock_of(pool: &PgPool, id: ProductId) -> i32 {
    sqlx::query_scalar(r"SELECT stock_quantity FROM storekeeper.product WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn order_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar(r"SELECT COUNT(*) FROM storekeeper.customer_order")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn item_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar(r"SELECT COUNT(*) FROM storekeeper.order_item")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn placing_an_order_decrements_stock(pool: PgPool) {
    let product_id = seed_product(&pool, "Widget", 10).await;
    let new = order_of(vec![item(product_id, 2)], Money::new(dec!(50)).unwrap());

    let (order, items) = OrderRepository::new(&pool)
        .place(OrderId::generate(), &new)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(items.len(), 1);
    assert_eq!(stock_of(&pool, product_id).await, 8);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn insufficient_stock_rolls_everything_back(pool: PgPool) {
    let product_id = seed_product(&pool, "Scarce", 1).await;
    let new = order_of(vec![item(product_id, 2)], Money::new(dec!(50)).unwrap());

    let err = OrderRepository::new(&pool)
        .place(OrderId::generate(), &new)
        .await
        .unwrap_err();

    match err {
        PlacementError::InsufficientStock {
            product_id: reported,
            requested,
            available,
        } => {
            assert_eq!(reported, product_id);
            assert_eq!(requested, 2);
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientStock, got {other}"),
    }

    assert_eq!(stock_of(&pool, product_id).await, 1);
    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(item_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn later_item_failure_leaves_no_partial_order(pool: PgPool) {
    let stocked = seed_product(&pool, "Stocked", 5).await;
    let empty = seed_product(&pool, "Empty", 0).await;
    let new = order_of(
        vec![item(stocked, 1), item(empty, 1)],
        Money::new(dec!(50)).unwrap(),
    );

    let result = OrderRepository::new(&pool)
        .place(OrderId::generate(), &new)
        .await;

    assert!(matches!(
        result,
        Err(PlacementError::InsufficientStock { .. })
    ));
    // The first item's decrement and insert must have rolled back too.
    assert_eq!(stock_of(&pool, stocked).await, 5);
    assert_eq!(order_count(&pool).await, 0);
    assert_eq!(item_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn unknown_product_rolls_back(pool: PgPool) {
    let ghost = ProductId::generate();
    let new = order_of(vec![item(ghost, 1)], Money::new(dec!(25)).unwrap());

    let err = OrderRepository::new(&pool)
        .place(OrderId::generate(), &new)
        .await
        .unwrap_err();

    assert!(matches!(err, PlacementError::UnknownProduct(id) if id == ghost));
    assert_eq!(order_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn concurrent_placements_have_one_winner(pool: PgPool) {
    let product_id = seed_product(&pool, "Last one", 1).await;
    let first = order_of(vec![item(product_id, 1)], Money::new(dec!(25)).unwrap());
    let second = order_of(vec![item(product_id, 1)], Money::new(dec!(25)).unwrap());

    let repo = OrderRepository::new(&pool);
    let (a, b) = tokio::join!(
        repo.place(OrderId::generate(), &first),
        repo.place(OrderId::generate(), &second),
    );

    let successes = usize::from(a.is_ok()) + usize::from(b.is_ok());
    assert_eq!(successes, 1, "exactly one placement may win the last unit");
    assert_eq!(stock_of(&pool, product_id).await, 0);
    assert_eq!(order_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn total_is_stored_as_submitted(pool: PgPool) {
    // One 25.00 item, but a client-declared total of 999: the header keeps
    // the submitted figure and never recomputes it.
    let product_id = seed_product(&pool, "Widget", 10).await;
    let new = order_of(vec![item(product_id, 1)], Money::new(dec!(999)).unwrap());

    let (order, _) = OrderRepository::new(&pool)
        .place(OrderId::generate(), &new)
        .await
        .unwrap();

    assert_eq!(order.total_amount.amount(), dec!(999));
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "needs PostgreSQL; run with --ignored and DATABASE_URL set"]
async fn read_back_is_idempotent(pool: PgPool) {
    let product_id = seed_product(&pool, "Widget", 10).await;
    let new = order_of(vec![item(product_id, 3)], Money::new(dec!(75)).unwrap());

    let repo = OrderRepository::new(&pool);
    let (order, _) = repo.place(OrderId::generate(), &new).await.unwrap();

    let first = repo.get_enriched(order.id).await.unwrap().unwrap();
    let second = repo.get_enriched(order.id).await.unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(stock_of(&pool, product_id).await, 7);
}
