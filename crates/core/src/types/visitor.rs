//! The `Visitor` entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::VisitorId;

/// Highest visit count a visitor can reach (the store column is a signed 32-bit integer).
#[allow(clippy::cast_sign_loss)]
pub const MAX_VISIT_COUNT: u32 = i32::MAX as u32;

/// Raised when recording a visit would exceed [`MAX_VISIT_COUNT`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("visit count for '{name}' is already at the maximum of {MAX_VISIT_COUNT}")]
pub struct VisitCountOverflow {
    /// Name of the visitor whose counter is saturated.
    pub name: String,
}

/// A named visitor and the number of times they have been greeted.
///
/// A visitor built with [`Visitor::new`] is unsaved: it has no `id` and no
/// timestamps until a store persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    /// Store-assigned identifier, `None` until first persisted.
    pub id: Option<VisitorId>,
    /// Unique name identifying the visitor.
    pub name: String,
    /// Number of recorded visits.
    pub visit_count: u32,
    /// When the visitor was first persisted.
    pub created_at: Option<DateTime<Utc>>,
    /// When the visitor was last persisted.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Visitor {
    /// Create an unsaved visitor with no recorded visits.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            visit_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the visitor has been persisted.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Increment the visit counter by exactly one and return the new count.
    ///
    /// # Errors
    ///
    /// Returns [`VisitCountOverflow`] if the counter is already at [`MAX_VISIT_COUNT`];
    /// the visitor is left unchanged.
    pub fn record_visit(&mut self) -> Result<u32, VisitCountOverflow> {
        if self.visit_count >= MAX_VISIT_COUNT {
            return Err(VisitCountOverflow {
                name: self.name.clone(),
            });
        }
        self.visit_count += 1;
        Ok(self.visit_count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visitor_is_unsaved_with_zero_visits() {
        let visitor = Visitor::new("Alice");
        assert_eq!(visitor.name, "Alice");
        assert_eq!(visitor.visit_count, 0);
        assert!(!visitor.is_persisted());
        assert!(visitor.created_at.is_none());
    }

    #[test]
    fn test_record_visit_increments_by_one() {
        let mut visitor = Visitor::new("Alice");
        assert_eq!(visitor.record_visit().unwrap(), 1);
        assert_eq!(visitor.record_visit().unwrap(), 2);
        assert_eq!(visitor.visit_count, 2);
    }

    #[test]
    fn test_record_visit_accepts_empty_name() {
        let mut visitor = Visitor::new("");
        assert_eq!(visitor.record_visit().unwrap(), 1);
    }

    #[test]
    fn test_record_visit_refuses_to_overflow() {
        let mut visitor = Visitor::new("Busy");
        visitor.visit_count = MAX_VISIT_COUNT;

        let err = visitor.record_visit().unwrap_err();
        assert_eq!(err.name, "Busy");
        assert_eq!(visitor.visit_count, MAX_VISIT_COUNT);
    }

    #[test]
    fn test_visitor_serializes_camel_case() {
        let mut visitor = Visitor::new("Bob");
        visitor.id = Some(VisitorId::new(2));
        visitor.visit_count = 1;

        let json = serde_json::to_value(&visitor).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["visitCount"], 1);
    }
}
