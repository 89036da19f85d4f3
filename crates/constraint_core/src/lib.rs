//! # Constraint Core
//!
//! Core data structures and types for the constraint directive engine.
//!
//! This crate provides the building blocks the engine works on: a minimal
//! typed schema, the value model used during coercion, the closed set of
//! constraint kinds, and the error types shared by every other crate.
//!
//! ## Key Concepts
//!
//! - **Schema**: scalar, object and input-object types with fields, arguments
//!   and input fields
//! - **Coercer**: the parse/serialize capability behind every scalar type
//! - **Directive**: an annotation on a declaration, such as `@constraint(min: 3)`
//! - **ConstraintSpec**: the resolved constraints declared on one field
//! - **ConstraintError**: the structured payload of a constraint violation
//!
//! ## Example
//!
//! ```rust
//! use constraint_core::{InputObjectBuilder, InputValueBuilder, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new()
//!     .input_object(
//!         InputObjectBuilder::new("BookInput")
//!             .field(
//!                 InputValueBuilder::new("title", "Int!")
//!                     .constraint(|c| c.with_argument("min", 3))
//!                     .build(),
//!             )
//!             .build(),
//!     )
//!     .build()
//!     .expect("valid schema");
//!
//! assert!(schema.to_sdl().contains("@constraint(min: 3)"));
//! ```

pub mod builder;
pub mod constraint;
pub mod error;
pub mod scalar;
pub mod schema;
pub mod sdl;
pub mod value;

pub use builder::*;
pub use constraint::*;
pub use error::*;
pub use scalar::*;
pub use schema::*;
pub use value::*;
