//! Integration tests
//!
//! `api_tests` drive the router in-process and never touch the database.
//! `loan_lifecycle` needs a PostgreSQL instance:
//! DATABASE_URL=postgres://... cargo test -- --ignored

mod api_tests;
mod common;
mod loan_lifecycle;
