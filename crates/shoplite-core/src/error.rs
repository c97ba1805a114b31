//! # Error Types
//!
//! Domain-specific error types for shoplite-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  shoplite-core errors (this file)                               │
//! │  └── ValidationError  - entity invariant violations             │
//! │                                                                 │
//! │  shoplite-db errors (separate crate)                            │
//! │  └── DbError          - not-found, constraint, I/O failures     │
//! │                                                                 │
//! │  Flow: ValidationError → DbError → caller                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, reason)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Entity validation errors.
///
/// Raised when caller-supplied data violates an entity invariant.
/// Validation never partially applies: the enclosing operation aborts
/// and no rows are written.
///
/// Note that mismatched derived fields (item subtotal, order total) are
/// *not* errors — `Validate` silently rewrites them to the recomputed
/// value. Only non-correctable violations land here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Invalid format (e.g., malformed email or phone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// An order was submitted without any items.
    #[error("order must contain at least one item")]
    EmptyOrder,
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
