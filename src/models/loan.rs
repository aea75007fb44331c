//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Loan lifecycle status. A loan moves from `Active` to `Returned` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as TEXT)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Loan row as stored in the ledger
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub student_id: i32,
    pub item_id: i32,
    pub loan_date: DateTime<Utc>,
    /// Set if and only if the loan has been returned
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

/// Loan joined with the student and item display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub student_id: i32,
    pub item_id: i32,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub student_first_name: Option<String>,
    pub student_last_name: Option<String>,
    pub student_control_number: Option<String>,
    pub item_name: Option<String>,
    pub item_description: Option<String>,
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    #[validate(range(min = 1, message = "Invalid student id"))]
    pub student_id: i32,
    #[validate(range(min = 1, message = "Invalid item id"))]
    pub item_id: i32,
}

/// Loan count for one item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TopItem {
    pub item_id: i32,
    pub item_name: Option<String>,
    pub times_loaned: i64,
}

/// Aggregate view over the whole loan ledger
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanStatistics {
    pub total: i64,
    pub active: i64,
    pub returned: i64,
    /// Most loaned items, at most ten, by loan count then item id
    pub top_items: Vec<TopItem>,
}
