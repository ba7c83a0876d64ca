//! Loader and validation engine for ReNGBis schemas.
//!
//! The compiler ties the other crates together: it loads a schema source
//! file and its transitive imports into a resolved [`SchemaBundle`],
//! parses documents of several formats into a generic [`Value`] tree,
//! and walks a schema against a value with [`validate`].
//!
//! ## Example
//! ```rust
//! use rengbis_compiler::{readers, validate, SchemaBundle};
//!
//! let bundle = SchemaBundle::from_source("= { name: text, age?: number }")?;
//! let schema = bundle.root.expect("a root schema");
//!
//! let value = readers::json::parse(r#"{"name": "Joe"}"#).unwrap();
//! assert!(validate(&schema, &value).is_valid());
//!
//! let value = readers::json::parse("{}").unwrap();
//! let result = validate(&schema, &value);
//! assert_eq!(
//!     result.error_messages(),
//!     vec!["Value is missing expected key name".to_string()]
//! );
//! # Ok::<(), rengbis_compiler::LoadError>(())
//! ```

pub mod readers;

mod bundle;
mod validation;
mod values;

pub use bundle::{LoadError, SchemaBundle};
pub use validation::{validate, Diagnostic, ResultKind, ValidationResult};
pub use values::{Value, ValueKind};

// The public API of the bundle and the validator is expressed in these
// types; re-export them so callers need only one crate.
pub use rengbis_parser::{parse_document, Document, SyntaxError};
pub use rengbis_schema::Schema;
