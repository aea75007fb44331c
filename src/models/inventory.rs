//! Inventory item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Inventory item. `available_quantity` counts units not currently on loan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub available_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Create or replace inventory item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InventoryItemInput {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    pub available_quantity: i32,
}

/// Direction of a manual stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuantityOperation {
    Increment,
    Decrement,
}

/// Manual stock adjustment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustQuantity {
    pub operation: QuantityOperation,
    #[validate(range(min = 1, message = "Amount must be greater than 0"))]
    pub amount: i32,
}

impl AdjustQuantity {
    /// Signed change to apply to the counter
    pub fn delta(&self) -> i32 {
        match self.operation {
            QuantityOperation::Increment => self.amount,
            QuantityOperation::Decrement => -self.amount,
        }
    }
}

/// Result of a stock adjustment
#[derive(Debug, Serialize, ToSchema)]
pub struct QuantityResponse {
    pub id: i32,
    pub available_quantity: i32,
}
