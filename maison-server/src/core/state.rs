//! Server State
//!
//! Shared handles for every request: configuration, the embedded database,
//! the ledgers, the gateway adapters, and the realtime notifier. Cloning
//! is shallow (all heavy members live behind `Arc`).

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::db::repository::SettingsRepository;
use crate::orders::OrderLedger;
use crate::payments::{PayPalGateway, StripeGateway};
use crate::realtime::Notifier;
use crate::returns::ReturnLedger;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub notifier: Arc<dyn Notifier>,
    pub order_ledger: Arc<OrderLedger>,
    pub return_ledger: Arc<ReturnLedger>,
    pub stripe: Arc<StripeGateway>,
    pub paypal: Arc<PayPalGateway>,
    pub settings: SettingsRepository,
}

impl ServerState {
    /// Open the on-disk database and wire up all services.
    pub async fn initialize(config: Config, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let path = config.db_path();
        let db = db::connect(&path.to_string_lossy()).await?;
        Self::with_db(config, db, notifier)
    }

    /// Wire services around an existing database handle (tests use the
    /// in-memory engine here).
    pub fn with_db(
        config: Config,
        db: Surreal<Db>,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let order_ledger = Arc::new(OrderLedger::new(
            db.clone(),
            config.pricing.clone(),
            notifier.clone(),
        ));
        let return_ledger = Arc::new(ReturnLedger::new(db.clone(), notifier.clone()));
        let settings = SettingsRepository::new(db.clone());
        let stripe = Arc::new(StripeGateway::new(
            config.stripe.clone(),
            order_ledger.clone(),
            settings.clone(),
        ));
        let paypal = Arc::new(PayPalGateway::new(
            config.paypal.clone(),
            order_ledger.clone(),
        ));

        Ok(Self {
            config,
            db,
            jwt_service,
            notifier,
            order_ledger,
            return_ledger,
            stripe,
            paypal,
            settings,
        })
    }
}
