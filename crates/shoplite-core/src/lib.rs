//! # shoplite-core: Pure Business Logic for Shoplite
//!
//! This crate is the **heart** of Shoplite, a small shop's customer /
//! product / order manager. It contains all business logic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Shoplite Architecture                        │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │            Presentation (forms, tables, charts)           │  │
//! │  │            — external collaborator, out of scope          │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │             ★ shoplite-core (THIS CRATE) ★                │  │
//! │  │                                                           │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌──────┐ ┌──────┐ │  │
//! │  │  │  types  │ │  money  │ │ validation │ │ sort │ │export│ │  │
//! │  │  │Customer │ │  Money  │ │  Validate  │ │quick-│ │tagged│ │  │
//! │  │  │Product  │ │ (cents) │ │   rules    │ │ sort │ │ JSON │ │  │
//! │  │  │Order(+) │ └─────────┘ └────────────┘ └──────┘ └──────┘ │  │
//! │  │  └─────────┘                                              │  │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                   │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │              shoplite-db (Database Layer)                 │  │
//! │  │     SQLite queries, migrations, repositories, transfer    │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Customer, Product, Order, OrderItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`validation`] - The `Validate` capability and field rules
//! - [`sort`] - Quicksort used for alternate display ordering
//! - [`export`] - Tagged interchange representations
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, no side effects
//! 2. **No I/O**: database and file access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: typed errors, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod money;
pub mod sort;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use export::Exportable;
pub use money::Money;
pub use sort::quicksort_by_key;
pub use types::*;
pub use validation::Validate;
