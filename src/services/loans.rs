//! Loan management service

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanDetails, LoanStatistics},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend one unit of an item to a student
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<Loan> {
        let created = self
            .repository
            .loans
            .create(loan.student_id, loan.item_id)
            .await?;

        tracing::info!(
            loan_id = created.id,
            student_id = created.student_id,
            item_id = created.item_id,
            "Loan created"
        );
        Ok(created)
    }

    /// Return a borrowed item
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let returned = self.repository.loans.return_loan(loan_id).await?;
        tracing::info!(loan_id, item_id = returned.item_id, "Loan returned");
        Ok(returned)
    }

    pub async fn get_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_by_id(loan_id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_all().await
    }

    pub async fn list_active(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_active().await
    }

    /// Loans of a student. An unknown student yields an empty list.
    pub async fn list_by_student(&self, student_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_by_student(student_id).await
    }

    /// Loans of an item. An unknown item yields an empty list.
    pub async fn list_by_item(&self, item_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_by_item(item_id).await
    }

    pub async fn statistics(&self) -> AppResult<LoanStatistics> {
        self.repository.loans.statistics().await
    }
}
