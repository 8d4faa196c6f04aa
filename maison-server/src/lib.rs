//! Maison Server - storefront order and payment backend
//!
//! # Architecture
//!
//! - **orders** (`orders`): the order ledger — creation, transitions,
//!   cancellation, refunds, payment reconciliation
//! - **payments** (`payments`): Stripe and PayPal adapters behind one
//!   provider seam, webhook verification
//! - **returns** (`returns`): RMA codes and return lifecycle
//! - **realtime** (`realtime`): socket.io room fan-out of state changes
//! - **analytics** (`analytics`): aggregate snapshot publishing
//! - **db** (`db`): embedded SurrealDB models and repositories
//! - **api** (`api`): RESTful HTTP surface
//!
//! # Module layout
//!
//! ```text
//! maison-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT verification, CurrentUser
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order ledger
//! ├── payments/      # gateway adapters
//! ├── returns/       # return ledger
//! ├── realtime/      # notifier + socket layer
//! ├── analytics/     # snapshot builder
//! ├── pricing/       # totals calculator
//! ├── db/            # database layer
//! └── utils/         # errors, logging, time
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod realtime;
pub mod returns;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderLedger;
pub use payments::{PaymentOutcome, PaymentProvider};
pub use realtime::Notifier;
pub use returns::ReturnLedger;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Make sure the working directory exists and wire up the tracing
/// subscriber. `.env` must already be loaded (config is read from the
/// environment).
pub fn setup_environment(config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    if config.is_production() {
        init_logger_with_file(Some("info"), Some(&config.work_dir));
    } else {
        init_logger_with_file(Some("debug"), None);
    }
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   __  ___      _
  /  |/  /___ _(_)________  ____
 / /|_/ / __ `/ / ___/ __ \/ __ \
/ /  / / /_/ / (__  ) /_/ / / / /
/_/  /_/\__,_/_/____/\____/_/ /_/
    "#
    );
}
