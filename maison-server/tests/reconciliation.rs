//! Payment reconciliation tests: idempotency, no status regression, and
//! refund rules.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use maison_server::auth::CurrentUser;
use maison_server::db::models::{OrderStatus, PaymentMethod, PaymentStatus, Product, User};
use maison_server::db::{self};
use maison_server::orders::{
    AddressInput, CreateOrderRequest, OrderLedger, RefundRequest, UpdateStatusRequest,
};
use maison_server::payments::PaymentOutcome;
use maison_server::pricing::{ItemRequest, PricingConfig, ShippingMethod};
use maison_server::realtime::MemoryNotifier;
use maison_server::utils::AppError;

async fn setup() -> (Surreal<Db>, OrderLedger, Arc<MemoryNotifier>) {
    let db = db::connect_memory().await.expect("in-memory db");
    let notifier = Arc::new(MemoryNotifier::new());
    let ledger = OrderLedger::new(db.clone(), PricingConfig::default(), notifier.clone());
    (db, ledger, notifier)
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

async fn checkout_with_payment(
    db: &Surreal<Db>,
    ledger: &OrderLedger,
    user: &CurrentUser,
    payment_id: &str,
) -> maison_server::db::models::Order {
    let product: Option<Product> = db
        .create("product")
        .content(Product::new("Oud Royale".to_string(), 50.0))
        .await
        .expect("create product");
    let product_id = product
        .expect("product")
        .id
        .expect("product id")
        .to_string();

    let request = CreateOrderRequest {
        items: vec![ItemRequest {
            product_id,
            quantity: 1,
            size: None,
            color: None,
        }],
        shipping_method: ShippingMethod::Standard,
        payment_method: PaymentMethod::Stripe,
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
    ledger
        .create_order(user, request, Some(payment_id.to_string()))
        .await
        .expect("order")
}

#[tokio::test]
async fn success_marks_paid_and_advances_pending() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    checkout_with_payment(&db, &ledger, &user, "pi_100").await;

    let updated = ledger
        .reconcile_payment("pi_100", PaymentOutcome::Succeeded)
        .await
        .expect("reconciled");
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.status, OrderStatus::Processing);
}

#[tokio::test]
async fn replayed_success_converges_to_the_same_state() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    checkout_with_payment(&db, &ledger, &user, "pi_101").await;

    let first = ledger
        .reconcile_payment("pi_101", PaymentOutcome::Succeeded)
        .await
        .expect("first");
    let second = ledger
        .reconcile_payment("pi_101", PaymentOutcome::Succeeded)
        .await
        .expect("replay");

    assert_eq!(first.status, second.status);
    assert_eq!(first.payment_status, second.payment_status);
    assert_eq!(second.payment_status, PaymentStatus::Paid);
    assert_eq!(second.status, OrderStatus::Processing);
}

#[tokio::test]
async fn success_never_regresses_a_later_status() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    let admin = seed_user(&db, "Root", "admin").await;
    let order = checkout_with_payment(&db, &ledger, &user, "pi_102").await;

    ledger
        .reconcile_payment("pi_102", PaymentOutcome::Succeeded)
        .await
        .expect("reconciled");
    ledger
        .update_status(
            &admin,
            &order.id_string(),
            UpdateStatusRequest {
                status: OrderStatus::Shipped,
                tracking_number: None,
                estimated_delivery: None,
                notes: None,
            },
        )
        .await
        .expect("shipped");

    // Late duplicate webhook delivery
    let replayed = ledger
        .reconcile_payment("pi_102", PaymentOutcome::Succeeded)
        .await
        .expect("replay");
    assert_eq!(replayed.status, OrderStatus::Shipped);
    assert_eq!(replayed.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn failure_marks_payment_failed_and_leaves_status() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    checkout_with_payment(&db, &ledger, &user, "pi_103").await;

    let updated = ledger
        .reconcile_payment("pi_103", PaymentOutcome::Failed)
        .await
        .expect("reconciled");
    assert_eq!(updated.payment_status, PaymentStatus::Failed);
    assert_eq!(updated.status, OrderStatus::Pending);
}

#[tokio::test]
async fn unknown_payment_id_is_not_found() {
    let (_db, ledger, _) = setup().await;
    assert!(matches!(
        ledger
            .reconcile_payment("pi_unknown", PaymentOutcome::Succeeded)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn cancel_of_paid_order_flips_to_refunded() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    let order = checkout_with_payment(&db, &ledger, &user, "pi_104").await;
    ledger
        .reconcile_payment("pi_104", PaymentOutcome::Succeeded)
        .await
        .expect("paid");

    let cancelled = ledger.cancel(&user, &order.id_string()).await.expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn refund_requires_a_paid_order() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    let admin = seed_user(&db, "Root", "admin").await;
    let order = checkout_with_payment(&db, &ledger, &user, "pi_105").await;

    assert!(matches!(
        ledger
            .refund(&admin, &order.id_string(), RefundRequest::default())
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn refund_defaults_to_full_total() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    let admin = seed_user(&db, "Root", "admin").await;
    let order = checkout_with_payment(&db, &ledger, &user, "pi_106").await;
    ledger
        .reconcile_payment("pi_106", PaymentOutcome::Succeeded)
        .await
        .expect("paid");

    // Customers cannot refund
    assert!(matches!(
        ledger
            .refund(&user, &order.id_string(), RefundRequest::default())
            .await,
        Err(AppError::Forbidden(_))
    ));

    let refunded = ledger
        .refund(&admin, &order.id_string(), RefundRequest::default())
        .await
        .expect("refund");
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
    let record = refunded.refund.expect("refund record");
    assert_eq!(record.amount, refunded.total);
    assert_eq!(record.reason, "Admin refund");
    assert_eq!(record.processed_by, admin.id);
}

#[tokio::test]
async fn refund_amount_must_stay_within_total() {
    let (db, ledger, _) = setup().await;
    let user = seed_user(&db, "Ada", "customer").await;
    let admin = seed_user(&db, "Root", "admin").await;
    let order = checkout_with_payment(&db, &ledger, &user, "pi_107").await;
    ledger
        .reconcile_payment("pi_107", PaymentOutcome::Succeeded)
        .await
        .expect("paid");

    assert!(matches!(
        ledger
            .refund(
                &admin,
                &order.id_string(),
                RefundRequest {
                    amount: Some(order.total + 0.01),
                    reason: None,
                },
            )
            .await,
        Err(AppError::Validation(_))
    ));

    let partial = ledger
        .refund(
            &admin,
            &order.id_string(),
            RefundRequest {
                amount: Some(10.0),
                reason: Some("Damaged bottle".to_string()),
            },
        )
        .await
        .expect("partial refund");
    let record = partial.refund.expect("refund record");
    assert_eq!(record.amount, 10.0);
    assert_eq!(record.reason, "Damaged bottle");
}
