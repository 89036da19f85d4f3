//! # Constraint Validator
//!
//! Validation engine for `@constraint` directives. This crate provides the
//! logic that turns constraint annotations into enforced input rules:
//!
//! - Validators for every constraint kind (ranges, multiples, lengths,
//!   substrings, patterns, formats)
//! - Resolution of declared constraint arguments, with build-time checks
//! - Constrained scalars that validate on input and pass output through
//! - The schema transformer rewiring annotated declarations
//! - Boundary error reporting with an optional formatting hook
//!
//! ## Example
//!
//! ```rust
//! use constraint_core::{InputObjectBuilder, InputValueBuilder, FieldBuilder, ObjectTypeBuilder, SchemaBuilder};
//! use constraint_validator::{ConstraintEngine, Request};
//!
//! let schema = SchemaBuilder::new()
//!     .mutation(
//!         ObjectTypeBuilder::new("Mutation")
//!             .field(
//!                 FieldBuilder::new("createBook", "String")
//!                     .argument(InputValueBuilder::new("input", "BookInput!").build())
//!                     .build(),
//!             )
//!             .build(),
//!     )
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
//!     .unwrap();
//!
//! let engine = ConstraintEngine::builder(schema).build().unwrap();
//! let response = engine.execute(
//!     &Request::mutation("createBook").variable("input", serde_json::json!({"title": 2})),
//! );
//!
//! assert_eq!(response.status, 400);
//! ```

mod coerce;
mod config;
mod engine;
mod error;
mod format;
mod report;
mod resolver;
mod scalar;
mod transform;
pub mod validators;

pub use coerce::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use report::*;
pub use resolver::*;
pub use scalar::*;
pub use transform::*;
