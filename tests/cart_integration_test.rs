use cart_sync::{
    CartFailure, CartStore, HttpStockGateway, LocalStorage, MemoryNotifier, NotificationKind,
};
use httpmock::prelude::*;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const KEY: &str = "@RocketShoes:cart";

fn mock_catalog(server: &MockServer) {
    let products = [
        (1, "Tênis de Caminhada Leve Confortável", 179.9, 3),
        (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
        (4, "Tênis de Caminhada Leve Confortável", 179.9, 0),
    ];

    for (id, title, price, stock) in products {
        server.mock(|when, then| {
            when.method(GET).path(format!("/stock/{}", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": id, "amount": stock}));
        });
        server.mock(|when, then| {
            when.method(GET).path(format!("/products/{}", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://cdn.example.com/tenis{}.jpg", id)
                }));
        });
    }
}

async fn open_store(
    server: &MockServer,
    storage_dir: &str,
    notifier: MemoryNotifier,
) -> CartStore<HttpStockGateway, LocalStorage, MemoryNotifier> {
    let gateway = HttpStockGateway::new(&server.base_url(), None).unwrap();
    let storage = LocalStorage::new(storage_dir.to_string());
    CartStore::open(gateway, storage, KEY, notifier).await
}

#[tokio::test]
async fn test_end_to_end_cart_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    mock_catalog(&server);

    let notifier = MemoryNotifier::new();
    let store = open_store(&server, &storage_dir, notifier.clone()).await;

    assert_ok!(store.add_item(1).await);
    assert_ok!(store.add_item(2).await);
    assert_ok!(store.add_item(1).await);
    assert_ok!(store.set_amount(2, 4).await);
    let before_restart = store.snapshot().await;
    drop(store);

    // 重新啟動後應從儲存讀回相同的購物車
    let restarted = open_store(&server, &storage_dir, notifier.clone()).await;
    let cart = restarted.snapshot().await;

    assert_eq!(cart, before_restart);
    let lines: Vec<(u64, u32)> = cart.iter().map(|l| (l.product_id, l.amount)).collect();
    assert_eq!(lines, vec![(1, 2), (2, 4)]);
    assert_eq!(cart.get(1).unwrap().price, 179.9);
    assert!(notifier.notifications().is_empty());

    let stored = std::fs::read_to_string(temp_dir.path().join("_RocketShoes_cart.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored[0]["id"], 1);
    assert_eq!(stored[0]["amount"], 2);
    assert_eq!(stored[1]["title"], "Tênis VR Caminhada Confortável Detalhes Couro Masculino");
}

#[tokio::test]
async fn test_end_to_end_stock_limits() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    mock_catalog(&server);

    let notifier = MemoryNotifier::new();
    let store = open_store(&server, temp_dir.path().to_str().unwrap(), notifier.clone()).await;

    for _ in 0..3 {
        assert_ok!(store.add_item(1).await);
    }
    let full = store.snapshot().await;

    let beyond = store.add_item(1).await;
    assert!(matches!(
        beyond,
        Err(CartFailure::OutOfStock {
            requested: 4,
            available: 3,
            ..
        })
    ));
    assert_err!(store.add_item(4).await);
    assert_err!(store.set_amount(1, 10).await);

    assert_eq!(store.snapshot().await, full);
    let kinds: Vec<NotificationKind> = notifier.notifications().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::OutOfStock; 3]);
}

#[tokio::test]
async fn test_end_to_end_gateway_failures() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    mock_catalog(&server);

    let down = server.mock(|when, then| {
        when.method(GET).path("/stock/7");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/stock/8");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"amount": 2}));
    });
    let missing_product = server.mock(|when, then| {
        when.method(GET).path("/products/8");
        then.status(404);
    });

    let notifier = MemoryNotifier::new();
    let store = open_store(&server, temp_dir.path().to_str().unwrap(), notifier.clone()).await;
    assert_ok!(store.add_item(2).await);

    assert_err!(store.add_item(7).await);
    assert_err!(store.add_item(8).await);
    assert_err!(store.set_amount(7, 1).await);
    assert_err!(store.remove_item(7).await);

    down.assert_hits(2);
    missing_product.assert();
    assert_eq!(store.snapshot().await.len(), 1);
    assert_eq!(
        notifier.messages(),
        vec![
            "could not add product",
            "could not add product",
            "could not change product quantity",
            "could not remove product",
        ]
    );
}

#[tokio::test]
async fn test_remove_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start_async().await;
    mock_catalog(&server);

    let store = open_store(&server, &storage_dir, MemoryNotifier::new()).await;
    assert_ok!(store.add_item(1).await);
    assert_ok!(store.add_item(2).await);
    assert_ok!(store.remove_item(1).await);
    drop(store);

    let restarted = open_store(&server, &storage_dir, MemoryNotifier::new()).await;
    let ids: Vec<u64> = restarted
        .snapshot()
        .await
        .iter()
        .map(|l| l.product_id)
        .collect();
    assert_eq!(ids, vec![2]);
}
