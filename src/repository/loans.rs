//! Loans repository for database operations
//!
//! `available_quantity` on an inventory item is a denormalized counter of the
//! units not on loan. It is only changed here inside the same transaction that
//! inserts or closes the loan, so the counter and the ledger never disagree.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails, LoanStatistics, TopItem},
};

/// Select list shared by every loan view
const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.student_id, l.item_id, l.loan_date, l.return_date, l.status,
           s.first_name AS student_first_name,
           s.last_name AS student_last_name,
           s.control_number AS student_control_number,
           i.name AS item_name,
           i.description AS item_description
    FROM loans l
    LEFT JOIN students s ON s.id = l.student_id
    LEFT JOIN inventory_items i ON i.id = l.item_id
"#;

const MOST_RECENT_FIRST: &str = "ORDER BY l.loan_date DESC, l.id DESC";

const TOP_ITEMS_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan with display fields by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LoanDetails> {
        sqlx::query_as::<_, LoanDetails>(&format!("{} WHERE l.id = $1", LOAN_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// All loans, most recent first
    pub async fn list_all(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} {}",
            LOAN_DETAILS_SELECT, MOST_RECENT_FIRST
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Active loans, most recent first
    pub async fn list_active(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.status = 'active' {}",
            LOAN_DETAILS_SELECT, MOST_RECENT_FIRST
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Loans of a student, most recent first
    pub async fn list_by_student(&self, student_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.student_id = $1 {}",
            LOAN_DETAILS_SELECT, MOST_RECENT_FIRST
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Loans of an item, most recent first
    pub async fn list_by_item(&self, item_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE l.item_id = $1 {}",
            LOAN_DETAILS_SELECT, MOST_RECENT_FIRST
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Create a new loan and take one unit of the item out of stock.
    ///
    /// The student row is share-locked so it cannot be deleted underneath the
    /// loan, and the item row is locked for update so concurrent loans of the
    /// same item queue up behind the availability check. Returning early drops
    /// the transaction, which rolls it back.
    pub async fn create(&self, student_id: i32, item_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let student: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM students WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
        )
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;

        if student.is_none() {
            return Err(AppError::NotFound(format!("Student with id {} not found", student_id)));
        }

        let available: i32 = sqlx::query_scalar(
            "SELECT available_quantity FROM inventory_items WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if available <= 0 {
            return Err(AppError::InvalidState("Item is not available for loan".to_string()));
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (student_id, item_id, loan_date, status)
            VALUES ($1, $2, NOW(), 'active')
            RETURNING id, student_id, item_id, loan_date, return_date, status
            "#,
        )
        .bind(student_id)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE inventory_items SET available_quantity = available_quantity - 1 WHERE id = $1",
        )
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Close an active loan and put the unit back in stock.
    ///
    /// The conditional update row-locks the loan; a concurrent second return
    /// re-checks `status` after the first commits and matches nothing.
    /// The returned details are read inside the same transaction, so a
    /// failure at any step leaves both tables untouched.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = 'returned', return_date = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING id, student_id, item_id, loan_date, return_date, status
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Active loan with id {} not found", loan_id)))?;

        sqlx::query(
            "UPDATE inventory_items SET available_quantity = available_quantity + 1 WHERE id = $1",
        )
        .bind(loan.item_id)
        .execute(&mut *tx)
        .await?;

        let details =
            sqlx::query_as::<_, LoanDetails>(&format!("{} WHERE l.id = $1", LOAN_DETAILS_SELECT))
                .bind(loan.id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(details)
    }

    /// Ledger totals and most loaned items, read from a single snapshot
    pub async fn statistics(&self) -> AppResult<LoanStatistics> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (total, active, returned): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'active'),
                   COUNT(*) FILTER (WHERE status = 'returned')
            FROM loans
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let top_items = sqlx::query_as::<_, TopItem>(
            r#"
            SELECT l.item_id, i.name AS item_name, COUNT(l.id) AS times_loaned
            FROM loans l
            LEFT JOIN inventory_items i ON i.id = l.item_id
            GROUP BY l.item_id, i.name
            ORDER BY times_loaned DESC, l.item_id ASC
            LIMIT $1
            "#,
        )
        .bind(TOP_ITEMS_LIMIT)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LoanStatistics {
            total,
            active,
            returned,
            top_items,
        })
    }
}
