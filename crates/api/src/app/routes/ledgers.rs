use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use tinyledger_core::{LedgerId, UserId};

use crate::app::dto::{
    self, BalanceResponse, CreateEntityResponse, LedgerResponse, TransactionResponse, ValidJson,
};
use crate::app::errors::ApiError;
use crate::app::routes::system::method_not_allowed;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/ledgers",
            get(list_ledgers)
                .post(create_ledger)
                .fallback(method_not_allowed),
        )
        .route("/ledgers/:id", get(get_ledger).fallback(method_not_allowed))
        .route(
            "/ledgers/:id/transactions",
            get(list_transactions)
                .post(create_transaction)
                .fallback(method_not_allowed),
        )
        .route(
            "/ledgers/:id/balance",
            get(get_balance).fallback(method_not_allowed),
        )
}

pub async fn list_ledgers(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<dto::LedgerFilter>, QueryRejection>,
) -> Result<Json<Vec<LedgerResponse>>, ApiError> {
    let Query(filter) = filter?;
    let items = services
        .ledgers
        .list_ledgers(filter.user_id.map(UserId::from_uuid))
        .iter()
        .map(|l| LedgerResponse::from(l.as_ref()))
        .collect();
    Ok(Json(items))
}

pub async fn get_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<LedgerResponse>, ApiError> {
    let Path(id) = id?;
    let ledger = services.ledgers.get_ledger(id.parse::<LedgerId>()?)?;
    Ok(Json(LedgerResponse::from(ledger.as_ref())))
}

pub async fn create_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<dto::CreateLedgerRequest>,
) -> Result<(StatusCode, Json<CreateEntityResponse>), ApiError> {
    let ledger = services.ledgers.create_ledger(body.name, body.user_id)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEntityResponse::new(ledger.id_typed())),
    ))
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
    ValidJson(body): ValidJson<dto::CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateEntityResponse>), ApiError> {
    let Path(id) = id?;
    let ledger_id = id.parse::<LedgerId>()?;
    let tx = services
        .ledgers
        .create_transaction(ledger_id, body.kind, body.amount)?;
    Ok((StatusCode::CREATED, Json(CreateEntityResponse::new(tx.id))))
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let Path(id) = id?;
    let items = services
        .ledgers
        .transactions(id.parse::<LedgerId>()?)?
        .into_iter()
        .map(TransactionResponse::from)
        .collect();
    Ok(Json(items))
}

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let Path(id) = id?;
    let balance = services.ledgers.balance(id.parse::<LedgerId>()?)?;
    Ok(Json(BalanceResponse::from(balance)))
}
