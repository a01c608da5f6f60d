//! In-memory XML documents for tmerge.
//!
//! Test reports are loaded whole into an owned tree, mutated in place by the
//! merge engines and written back out. Nothing here knows about report
//! formats; it is a small, generic element tree.
//!
//! # Key Types
//!
//! - [`Document`] -- declaration, prolog comments and the root [`Element`]
//! - [`Element`] / [`Node`] -- tag, attributes and ordered children
//! - [`Location`] -- child-index path used to address elements while mutating
//! - [`WriteOptions`] -- compact or indented serialization

pub mod document;
pub mod element;
pub mod error;
pub mod location;
mod reader;
pub mod writer;

pub use document::{Declaration, Document};
pub use element::{Attribute, Element, Node};
pub use error::{DocError, DocResult};
pub use location::Location;
pub use writer::WriteOptions;
