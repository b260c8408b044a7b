//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth core.

pub mod company;
pub mod dashboard;
pub mod user;

pub use company::CompanyService;
pub use dashboard::DashboardService;
pub use user::UserService;
