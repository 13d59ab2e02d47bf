//! # Record Validation Core
//!
//! Core data structures and types for the record validation engine.
//!
//! This crate provides the declarative building blocks used to describe the shape of a
//! structured record and the result of validating one. Schemas are plain data: they are
//! built once, never mutated, and can be shared freely between threads.
//!
//! ## Key Concepts
//!
//! - **FieldConstraint**: A single checkable rule over one scalar value (length, range, pattern, format)
//! - **SchemaNode**: A named, ordered collection of fields, possibly nesting other schema nodes
//! - **CrossFieldRule**: A predicate spanning several fields of one schema node
//! - **Outcome**: Either the normalized record or the complete list of validation errors
//!
//! ## Example
//!
//! ```rust
//! use recval_core::{FieldBuilder, SchemaBuilder};
//!
//! let address = SchemaBuilder::new("Address")
//!     .field(FieldBuilder::string("city").min_length(2).build())
//!     .field(FieldBuilder::integer("house_number").min_value(1.0).build())
//!     .build()
//!     .expect("valid schema");
//!
//! assert_eq!(address.fields.len(), 2);
//! ```

pub mod builder;
pub mod builtin;
pub mod error;
pub mod outcome;
pub mod schema;
pub mod validator;

pub use builder::*;
pub use builtin::*;
pub use error::*;
pub use outcome::*;
pub use schema::*;
pub use validator::*;
