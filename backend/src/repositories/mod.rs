//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod company;
pub mod user;

pub use company::{CompanyRepository, UpsertCompany};
pub use user::{CreateUser, UserRepository};
