//! Settings Routes
//!
//! Runtime payment toggles. The Stripe flag gates payment-intent creation
//! without a restart.
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/settings/payments | GET | any user |
//! | /api/settings/payments | PATCH | admin |

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings/payments",
        get(get_payments).patch(update_payments),
    )
}

#[derive(Debug, Serialize)]
pub struct PaymentSettings {
    pub stripe_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentSettings {
    pub stripe_enabled: bool,
}

async fn get_payments(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<AppResponse<PaymentSettings>>> {
    let settings = state.settings.get().await?;
    Ok(ok(PaymentSettings {
        stripe_enabled: settings.stripe_enabled,
    }))
}

async fn update_payments(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UpdatePaymentSettings>,
) -> AppResult<Json<AppResponse<PaymentSettings>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    let settings = state
        .settings
        .set_stripe_enabled(payload.stripe_enabled)
        .await?;
    Ok(ok_with_message(
        PaymentSettings {
            stripe_enabled: settings.stripe_enabled,
        },
        "Payment settings updated",
    ))
}
