//! Introspection front end for schemac.
//!
//! This crate provides:
//! - `schema`: Serde shapes of the `__schema` object
//! - `decode`: Conversion into the raw declarations shared with the SDL parser

pub mod decode;
pub mod schema;

pub use decode::{decode, decode_value};
pub use schema::{IntrospectionSchema, TypeKind};
