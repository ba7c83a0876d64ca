//! Schema model for the ReNGBis content-schema language.
//!
//! A [`Schema`] is an immutable tree describing the permitted shape of a
//! value. Schemas are produced by the `rengbis-parser` crate or built
//! programmatically through the fallible constructors on [`Schema`], which
//! enforce the model invariants (tuple and alternative arity, enum value
//! distinctness, object label uniqueness, well-formed regexes and time
//! patterns, non-empty ranges).
//!
//! The model also carries the two reference-handling operations the loader
//! is built on, [`Schema::dependencies`] and [`Schema::substitute`], and
//! the canonical printer, exposed as the [`Display`] implementation on
//! `Schema` and as [`Schema::to_source`].
//!
//! ## Example
//! ```rust
//! use rengbis_schema::{Label, Schema, TextConstraints};
//!
//! let schema = Schema::object([
//!     (Label::mandatory("name"), Schema::text(TextConstraints::default(), None)?),
//!     (Label::optional("age"), Schema::number(Default::default(), None)),
//! ])?;
//! assert_eq!(schema.to_source(), "{\n  age?: number\n  name: text\n}");
//! # Ok::<(), rengbis_schema::InvalidSchema>(())
//! ```
//!
//! [`Display`]: std::fmt::Display

mod constraints;
mod resolve;
mod schema;
mod serialize;

pub use constraints::{
    BinaryConstraints, BinaryEncoding, Bound, ListConstraints, NumericConstraints, Range,
    SizeRange, TextConstraints, TimeFormat, Uniqueness, ValueRange,
};
pub use resolve::{CycleError, Reference};
pub use schema::{InvalidSchema, Label, Schema};
