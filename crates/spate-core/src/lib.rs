//! Core types for the Spate simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! field state advanced by every solver in the workspace, the step counter,
//! and the errors a running simulation can raise.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;

pub use error::{FieldError, StepError};
pub use field::{Component, FieldState, Shape};
pub use id::StepId;
