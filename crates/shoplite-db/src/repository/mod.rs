//! # Repository Module
//!
//! Database repository implementations for Shoplite.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Repository Pattern Explained                    │
//! │                                                                 │
//! │  Caller                                                         │
//! │       │  db.orders().create(&mut order)                         │
//! │       ▼                                                         │
//! │  OrderRepository                                                │
//! │  ├── create(&mut Order)      ← validation + one transaction     │
//! │  ├── list(OrderFilter)       ← joined OrderSummary rows         │
//! │  └── items(order_id)         ← joined OrderItemDetail rows      │
//! │       │                                                         │
//! │       ▼  SQL                                                    │
//! │  SQLite Database                                                │
//! │                                                                 │
//! │  Benefits:                                                      │
//! │  • Entity validation happens before every write                 │
//! │  • SQL is isolated in one place                                 │
//! │  • Typed sort/filter parameters instead of raw SQL fragments    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - customer CRUD and search
//! - [`product::ProductRepository`] - product CRUD and search
//! - [`order::OrderRepository`] - order assembly and listings
//! - [`report::ReportRepository`] - aggregate reporting queries

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
