//! Return API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::ReturnRequest;
use crate::returns::{CreateReturnRequest, UpdateReturnRequest};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateReturnRequest>,
) -> AppResult<Json<AppResponse<ReturnRequest>>> {
    let request = state.return_ledger.create_return(&user, payload).await?;
    Ok(ok_with_message(request, "Return request created"))
}

pub async fn list_my(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<ReturnRequest>>>> {
    let requests = state.return_ledger.list_mine(&user).await?;
    Ok(ok(requests))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ReturnRequest>>> {
    let request = state.return_ledger.get_return(&user, &id).await?;
    Ok(ok(request))
}

pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReturnRequest>,
) -> AppResult<Json<AppResponse<ReturnRequest>>> {
    let request = state
        .return_ledger
        .update_status(&user, &id, payload)
        .await?;
    Ok(ok_with_message(request, "Return request updated"))
}
