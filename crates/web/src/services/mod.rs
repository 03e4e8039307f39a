//! Business logic services.
//!
//! # Services
//!
//! - `visits` - Visit registration and the paginated visitor listing

pub mod visits;

pub use visits::VisitService;
