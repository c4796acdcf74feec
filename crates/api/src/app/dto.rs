use axum::extract::{FromRequest, Request};
use axum::{Json, async_trait};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tinyledger_core::UserId;
use tinyledger_ledger::{Balance, Ledger, Money, Transaction, TransactionType};
use tinyledger_users::User;

use crate::app::errors::{ApiError, FieldErrors};

// -------------------------
// Validation
// -------------------------

/// Turns a raw request body into its checked form.
///
/// Raw bodies keep every field optional so a missing field is reported per
/// field instead of as an opaque deserialization failure.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ApiError>;
}

/// JSON body extractor that runs [`Validate`] before the handler sees it.
pub struct ValidJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state).await?;
        Ok(Self(raw.validate()?))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Loose address check: exactly one `@`, no whitespace, sane dots in the domain.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: Option<String>,
}

impl Validate for CreateUserRequest {
    type Valid = NewUser;

    fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();
        if is_blank(self.first_name.as_deref()) {
            errors.add("firstName", "must not be blank");
        }
        if is_blank(self.last_name.as_deref()) {
            errors.add("lastName", "must not be blank");
        }
        // An absent or empty address is allowed; a present one must be well formed.
        let email_address = self.email_address.filter(|e| !e.is_empty());
        if let Some(email) = email_address.as_deref() {
            if !is_valid_email(email) {
                errors.add("emailAddress", "must be a well-formed email address");
            }
        }
        errors.into_result()?;

        Ok(NewUser {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email_address,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLedgerRequest {
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedger {
    pub name: String,
    pub user_id: UserId,
}

impl Validate for CreateLedgerRequest {
    type Valid = NewLedger;

    fn validate(self) -> Result<NewLedger, ApiError> {
        let mut errors = FieldErrors::new();
        if is_blank(self.name.as_deref()) {
            errors.add("name", "Ledger name is required");
        }
        if self.user_id.is_none() {
            errors.add("userId", "must not be null");
        }
        errors.into_result()?;

        match (self.name, self.user_id) {
            (Some(name), Some(user_id)) => Ok(NewLedger {
                name,
                user_id: UserId::from_uuid(user_id),
            }),
            _ => Err(ApiError::bad_request("Request body is invalid")),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Money,
}

impl Validate for CreateTransactionRequest {
    type Valid = NewTransaction;

    fn validate(self) -> Result<NewTransaction, ApiError> {
        let mut errors = FieldErrors::new();
        if self.transaction_type.is_none() {
            errors.add("transactionType", "must not be null");
        }
        match self.amount {
            None => errors.add("amount", "must not be null"),
            Some(a) if a <= 0 => errors.add("amount", "must be greater than 0"),
            Some(_) => {}
        }
        errors.into_result()?;

        match (self.transaction_type, self.amount) {
            (Some(kind), Some(amount)) => Ok(NewTransaction {
                kind,
                amount: Money::new(amount)?,
            }),
            _ => Err(ApiError::bad_request("Request body is invalid")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerFilter {
    pub user_id: Option<Uuid>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntityResponse {
    pub id: Uuid,
}

impl CreateEntityResponse {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email_address: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_typed().into(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email_address: user.email_address().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&Ledger> for LedgerResponse {
    fn from(ledger: &Ledger) -> Self {
        Self {
            id: ledger.id_typed().into(),
            name: ledger.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub ledger_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id.into(),
            ledger_id: tx.ledger_id.into(),
            kind: tx.kind,
            amount: tx.amount.amount(),
            occurred_at: tx.occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub ledger_id: Uuid,
    pub balance: i64,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            ledger_id: balance.ledger_id.into(),
            balance: balance.balance.amount(),
        }
    }
}
