//! Server Configuration
//!
//! Every item can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/maison | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | JWT_SECRET | (empty) | HS256 verification secret |
//! | JWT_ISSUER / JWT_AUDIENCE | maison-server / maison-client | Token claims |
//! | FREE_SHIPPING_THRESHOLD | 100 | Standard shipping free above this |
//! | SHIPPING_STANDARD_FEE | 9.99 | |
//! | SHIPPING_EXPRESS_FEE | 15.99 | |
//! | SHIPPING_OVERNIGHT_FEE | 29.99 | |
//! | TAX_RATE | 0.08 | Flat tax rate |
//! | STRIPE_SECRET_KEY / STRIPE_WEBHOOK_SECRET | (unset) | Stripe credentials |
//! | PAYPAL_CLIENT_ID / PAYPAL_CLIENT_SECRET | (unset) | PayPal credentials |
//! | PAYPAL_BASE_URL | https://api-m.sandbox.paypal.com | |

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::payments::{PayPalConfig, StripeConfig};
use crate::pricing::PricingConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the embedded database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub pricing: PricingConfig,
    pub stripe: StripeConfig,
    pub paypal: PayPalConfig,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let jwt_defaults = JwtConfig::default();
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/maison".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").unwrap_or_default(),
                issuer: std::env::var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
                audience: std::env::var("JWT_AUDIENCE").unwrap_or(jwt_defaults.audience),
                ttl_secs: env_or("JWT_TTL_SECS", jwt_defaults.ttl_secs),
            },
            pricing: PricingConfig {
                free_shipping_threshold: env_or("FREE_SHIPPING_THRESHOLD", 100.0),
                standard_fee: env_or("SHIPPING_STANDARD_FEE", 9.99),
                express_fee: env_or("SHIPPING_EXPRESS_FEE", 15.99),
                overnight_fee: env_or("SHIPPING_OVERNIGHT_FEE", 29.99),
                tax_rate: env_or("TAX_RATE", 0.08),
            },
            stripe: StripeConfig {
                secret_key: env_opt("STRIPE_SECRET_KEY"),
                webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
                currency: std::env::var("STRIPE_CURRENCY").unwrap_or_else(|_| "usd".into()),
            },
            paypal: PayPalConfig {
                client_id: env_opt("PAYPAL_CLIENT_ID"),
                client_secret: env_opt("PAYPAL_CLIENT_SECRET"),
                base_url: std::env::var("PAYPAL_BASE_URL")
                    .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".into()),
                currency: std::env::var("PAYPAL_CURRENCY").unwrap_or_else(|_| "USD".into()),
            },
        }
    }

    /// Path of the embedded database under the working directory
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
