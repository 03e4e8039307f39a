//! Core types for the visitor greeter.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod id;
pub mod page;
pub mod visitor;

pub use id::*;
pub use page::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_INDEX, MAX_PAGE_SIZE, Page, PageRequest, Sort, SortDirection,
    SortKey, SortParseError,
};
pub use visitor::{MAX_VISIT_COUNT, VisitCountOverflow, Visitor};
