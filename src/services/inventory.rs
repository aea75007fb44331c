//! Inventory service

use crate::{
    error::{AppError, AppResult},
    models::inventory::{AdjustQuantity, InventoryItem, InventoryItemInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        self.repository.inventory.list().await
    }

    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<InventoryItem>> {
        let term = term.ok_or_else(|| AppError::Validation("Search term is required".to_string()))?;
        self.repository.inventory.search(term).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<InventoryItem> {
        self.repository.inventory.get_by_id(id).await
    }

    pub async fn create(&self, data: &InventoryItemInput) -> AppResult<InventoryItem> {
        self.repository.inventory.create(data).await
    }

    pub async fn update(&self, id: i32, data: &InventoryItemInput) -> AppResult<InventoryItem> {
        self.repository.inventory.update(id, data).await
    }

    /// Manually add or remove stock, returning the new quantity
    pub async fn adjust_quantity(&self, id: i32, adjust: &AdjustQuantity) -> AppResult<i32> {
        let quantity = self
            .repository
            .inventory
            .adjust_quantity(id, adjust.delta())
            .await?;
        tracing::info!(item_id = id, delta = adjust.delta(), quantity, "Stock adjusted");
        Ok(quantity)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.inventory.delete(id).await?;
        tracing::info!(item_id = id, "Inventory item deleted");
        Ok(())
    }
}
