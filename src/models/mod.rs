//! Data models for Escuela

pub mod inventory;
pub mod loan;
pub mod student;
pub mod user;

// Re-export commonly used types
pub use inventory::InventoryItem;
pub use loan::{Loan, LoanDetails, LoanStatistics, LoanStatus};
pub use student::Student;
pub use user::{User, UserClaims, UserInfo};
