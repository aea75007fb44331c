//! Inventory repository for database operations

use sqlx::{Pool, Postgres};

use super::like_pattern;
use crate::{
    error::{AppError, AppResult},
    models::inventory::{InventoryItem, InventoryItemInput},
};

const ITEM_COLUMNS: &str = "id, name, description, available_quantity, created_at";

#[derive(Clone)]
pub struct InventoryRepository {
    pool: Pool<Postgres>,
}

impl InventoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List items alphabetically
    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items WHERE deleted_at IS NULL ORDER BY name ASC, id ASC",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Case-insensitive search over name and description
    pub async fn search(&self, term: &str) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {} FROM inventory_items
            WHERE deleted_at IS NULL AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY name ASC, id ASC
            "#,
            ITEM_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1 AND deleted_at IS NULL",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Create an item
    pub async fn create(&self, data: &InventoryItemInput) -> AppResult<InventoryItem> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items (name, description, available_quantity)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.available_quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    /// Replace an item's fields, including its available quantity
    pub async fn update(&self, id: i32, data: &InventoryItemInput) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET name = $2, description = $3, available_quantity = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.available_quantity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Add `delta` units to the stock in one conditional statement.
    ///
    /// Returns the new quantity. An adjustment that would leave the counter
    /// outside `0..=i32::MAX` matches no row and is reported as `InvalidState`.
    pub async fn adjust_quantity(&self, id: i32, delta: i32) -> AppResult<i32> {
        let updated: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE inventory_items
            SET available_quantity = available_quantity + $2
            WHERE id = $1 AND deleted_at IS NULL
              AND available_quantity::BIGINT + $2 BETWEEN 0 AND 2147483647
            RETURNING available_quantity
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(quantity) => Ok(quantity),
            None => {
                // Distinguish a missing item from an insufficient stock
                self.get_by_id(id).await?;
                if delta > 0 {
                    Err(AppError::InvalidState("Quantity would exceed the maximum".to_string()))
                } else {
                    Err(AppError::InvalidState("Insufficient quantity available".to_string()))
                }
            }
        }
    }

    /// Soft-delete an item, refused while any loan of it is active.
    ///
    /// Returned loans keep referencing the row, so history still shows the
    /// item's name.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM inventory_items WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if found.is_none() {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }

        let active_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE item_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Item has {} active loan(s) and cannot be deleted",
                active_loans
            )));
        }

        sqlx::query("UPDATE inventory_items SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
