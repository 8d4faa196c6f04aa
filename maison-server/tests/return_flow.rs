//! Return ledger tests: RMA creation, ownership, admin patching, and the
//! refunded side effect on the parent order.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use maison_server::auth::CurrentUser;
use maison_server::db::models::{
    Order, PaymentMethod, PaymentStatus, Product, ReturnStatus, User,
};
use maison_server::db::{self};
use maison_server::orders::{AddressInput, CreateOrderRequest, OrderLedger};
use maison_server::pricing::{ItemRequest, PricingConfig, ShippingMethod};
use maison_server::realtime::MemoryNotifier;
use maison_server::returns::{
    CreateReturnRequest, ReturnItemRequest, ReturnLedger, UpdateReturnRequest,
};
use maison_server::utils::AppError;
use shared::Topic;

struct Fixture {
    db: Surreal<Db>,
    orders: OrderLedger,
    returns: ReturnLedger,
    notifier: Arc<MemoryNotifier>,
}

async fn setup() -> Fixture {
    let db = db::connect_memory().await.expect("in-memory db");
    let notifier = Arc::new(MemoryNotifier::new());
    let orders = OrderLedger::new(db.clone(), PricingConfig::default(), notifier.clone());
    let returns = ReturnLedger::new(db.clone(), notifier.clone());
    Fixture {
        db,
        orders,
        returns,
        notifier,
    }
}

async fn seed_user(db: &Surreal<Db>, name: &str, role: &str) -> CurrentUser {
    let user: Option<User> = db
        .create("user")
        .content(User {
            id: None,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            role: role.to_string(),
        })
        .await
        .expect("create user");
    let id = user.expect("user").id.expect("user id").to_string();
    CurrentUser {
        id,
        username: name.to_lowercase(),
        role: role.to_string(),
    }
}

async fn seed_order(fixture: &Fixture, user: &CurrentUser) -> Order {
    let mut product_ids = Vec::new();
    for (name, price) in [("Oud Royale", 50.0), ("Amber Noir", 60.0)] {
        let product: Option<Product> = fixture
            .db
            .create("product")
            .content(Product::new(name.to_string(), price))
            .await
            .expect("create product");
        product_ids.push(product.expect("product").id.expect("id").to_string());
    }

    let request = CreateOrderRequest {
        items: product_ids
            .iter()
            .map(|id| ItemRequest {
                product_id: id.clone(),
                quantity: 2,
                size: None,
                color: None,
            })
            .collect(),
        shipping_method: ShippingMethod::Standard,
        payment_method: PaymentMethod::CreditCard,
        customer_info: None,
        shipping_address: AddressInput {
            name: Some("Ada Lovelace".to_string()),
            street: Some("1 Analytical Way".to_string()),
            city: Some("London".to_string()),
            state: Some("LDN".to_string()),
            zip_code: Some("E1 6AN".to_string()),
            country: Some("UK".to_string()),
            ..Default::default()
        },
        billing_address: None,
        notes: None,
    };
    fixture
        .orders
        .create_order(user, request, None)
        .await
        .expect("order")
}

#[tokio::test]
async fn create_return_defaults_to_full_item_set() {
    let fixture = setup().await;
    let user = seed_user(&fixture.db, "Ada", "customer").await;
    let order = seed_order(&fixture, &user).await;

    let request = fixture
        .returns
        .create_return(
            &user,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: None,
                reason: Some("Wrong scent".to_string()),
                comments: None,
            },
        )
        .await
        .expect("return");

    assert!(request.rma_number.starts_with("RMA-"));
    assert_eq!(request.status, ReturnStatus::Requested);
    assert_eq!(request.items.len(), order.items.len());
    // Full set at full quantity refunds the order subtotal
    assert_eq!(request.refund_amount, order.subtotal);
    assert_eq!(request.user.to_string(), user.id);
    assert_eq!(
        fixture.notifier.count_for(&Topic::Return(request.id_string())),
        1
    );
}

#[tokio::test]
async fn create_return_with_selected_lines() {
    let fixture = setup().await;
    let user = seed_user(&fixture.db, "Ada", "customer").await;
    let order = seed_order(&fixture, &user).await;

    let request = fixture
        .returns
        .create_return(
            &user,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: Some(vec![ReturnItemRequest {
                    order_line: 1,
                    quantity: Some(1),
                    reason: Some("Leaked in transit".to_string()),
                }]),
                reason: None,
                comments: None,
            },
        )
        .await
        .expect("return");

    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].order_line, 1);
    assert_eq!(request.items[0].quantity, 1);
    assert_eq!(request.items[0].name, order.items[1].name);
    assert_eq!(request.refund_amount, order.items[1].price);
}

#[tokio::test]
async fn return_quantity_cannot_exceed_ordered() {
    let fixture = setup().await;
    let user = seed_user(&fixture.db, "Ada", "customer").await;
    let order = seed_order(&fixture, &user).await;

    let err = fixture
        .returns
        .create_return(
            &user,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: Some(vec![ReturnItemRequest {
                    order_line: 0,
                    quantity: Some(3),
                    reason: None,
                }]),
                reason: None,
                comments: None,
            },
        )
        .await
        .expect_err("should fail");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn create_return_enforces_ownership() {
    let fixture = setup().await;
    let ada = seed_user(&fixture.db, "Ada", "customer").await;
    let eve = seed_user(&fixture.db, "Eve", "customer").await;
    let order = seed_order(&fixture, &ada).await;

    assert!(matches!(
        fixture
            .returns
            .create_return(
                &eve,
                CreateReturnRequest {
                    order_id: order.id_string(),
                    items: None,
                    reason: None,
                    comments: None,
                },
            )
            .await,
        Err(AppError::Forbidden(_))
    ));

    assert!(matches!(
        fixture
            .returns
            .create_return(
                &ada,
                CreateReturnRequest {
                    order_id: "order:missing".to_string(),
                    items: None,
                    reason: None,
                    comments: None,
                },
            )
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn list_mine_scopes_to_requester() {
    let fixture = setup().await;
    let ada = seed_user(&fixture.db, "Ada", "customer").await;
    let eve = seed_user(&fixture.db, "Eve", "customer").await;
    let order = seed_order(&fixture, &ada).await;

    fixture
        .returns
        .create_return(
            &ada,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: None,
                reason: None,
                comments: None,
            },
        )
        .await
        .expect("return");

    assert_eq!(fixture.returns.list_mine(&ada).await.expect("mine").len(), 1);
    assert!(fixture.returns.list_mine(&eve).await.expect("none").is_empty());
}

#[tokio::test]
async fn admin_patch_updates_any_subset() {
    let fixture = setup().await;
    let ada = seed_user(&fixture.db, "Ada", "customer").await;
    let admin = seed_user(&fixture.db, "Root", "admin").await;
    let order = seed_order(&fixture, &ada).await;

    let request = fixture
        .returns
        .create_return(
            &ada,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: None,
                reason: None,
                comments: None,
            },
        )
        .await
        .expect("return");

    // Customers cannot patch
    assert!(matches!(
        fixture
            .returns
            .update_status(&ada, &request.id_string(), UpdateReturnRequest::default())
            .await,
        Err(AppError::Forbidden(_))
    ));

    let updated = fixture
        .returns
        .update_status(
            &admin,
            &request.id_string(),
            UpdateReturnRequest {
                status: Some(ReturnStatus::InTransit),
                refund_amount: None,
                carrier: Some("DHL".to_string()),
                tracking_number: Some("RET-TRACK-1".to_string()),
            },
        )
        .await
        .expect("patched");
    assert_eq!(updated.status, ReturnStatus::InTransit);
    assert_eq!(updated.carrier.as_deref(), Some("DHL"));
    assert_eq!(updated.tracking_number.as_deref(), Some("RET-TRACK-1"));
    // Untouched fields survive the patch
    assert_eq!(updated.refund_amount, request.refund_amount);
}

#[tokio::test]
async fn refunded_return_forces_parent_order_payment_status() {
    let fixture = setup().await;
    let ada = seed_user(&fixture.db, "Ada", "customer").await;
    let admin = seed_user(&fixture.db, "Root", "admin").await;
    let order = seed_order(&fixture, &ada).await;

    let request = fixture
        .returns
        .create_return(
            &ada,
            CreateReturnRequest {
                order_id: order.id_string(),
                items: None,
                reason: None,
                comments: None,
            },
        )
        .await
        .expect("return");

    let updated = fixture
        .returns
        .update_status(
            &admin,
            &request.id_string(),
            UpdateReturnRequest {
                status: Some(ReturnStatus::Refunded),
                refund_amount: Some(order.total),
                carrier: None,
                tracking_number: None,
            },
        )
        .await
        .expect("refunded");
    assert_eq!(updated.status, ReturnStatus::Refunded);

    let parent = fixture
        .orders
        .get_order(&admin, &order.id_string())
        .await
        .expect("parent order");
    assert_eq!(parent.payment_status, PaymentStatus::Refunded);
}
