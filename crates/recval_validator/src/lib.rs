//! # Record Validator
//!
//! Validation engine for structured records. This crate provides the logic for
//! checking raw JSON records against [`SchemaNode`](recval_core::SchemaNode)
//! definitions, including:
//!
//! - Cross-field rules (evaluated first, on raw values)
//! - Field presence and type coercion
//! - Constraint validation (lengths, ranges, patterns, formats)
//! - Recursive validation of nested objects
//!
//! Every failure is collected; nothing short-circuits.
//!
//! ## Example
//!
//! ```rust
//! use recval_core::{user_schema, RecordValidator};
//! use recval_validator::ValidationEngine;
//! use serde_json::json;
//!
//! let schema = user_schema().expect("built-in schema");
//! let engine = ValidationEngine::new();
//!
//! let outcome = engine.validate_record(&schema, &json!({
//!     "name": "Иван Смирнов",
//!     "age": 45,
//!     "email": "ivan.smirnov@gmail.com",
//!     "is_employed": true,
//!     "address": {"city": "Одесса", "street": "Александровский проспект", "house_number": 12}
//! }));
//!
//! if outcome.is_valid() {
//!     println!("Validation passed!");
//! } else {
//!     println!("Validation failed: {:?}", outcome.errors());
//! }
//! ```

mod coerce;
mod constraints;
mod cross_field;
mod engine;
mod error;

pub use coerce::*;
pub use constraints::*;
pub use cross_field::*;
pub use engine::*;
pub use error::*;
