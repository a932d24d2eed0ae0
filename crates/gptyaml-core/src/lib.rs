//! Building blocks shared by every **gptyaml** crate:
//!
//! * [`error`] – the workspace error type and structured schema violations,
//! * [`model`] – the table of supported chat models,
//! * [`generic`] – provider-agnostic chat messages and roles,
//! * [`template`] – the [`template::IntoPrompt`] conversion,
//! * [`schema`] – the declarative field-validation engine,
//! * [`schema_util`] – JSON Schema assembly helpers.

pub mod error;
pub mod generic;
pub mod model;
pub mod schema;
pub mod schema_util;
pub mod template;

pub use error::{GptYamlError, Result, Violation, Violations};
