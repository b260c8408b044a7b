//! HR Payroll Portal backend library
//!
//! Exposes the backend modules for the binary and integration tests.
//!
//! - `auth`: password hashing and signed bearer tokens
//! - `routes` / `services` / `repositories`: HTTP, business logic, data access
//! - `db`: PostgreSQL pool and migrations

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
