//! The subset of the Open Packaging Conventions consumed by a drawing part.
//!
//! A drawing occupies one named part inside the document package and links
//! to its embedded resources (pictures, charts) through package
//! relationships. This module provides the part-name value type, the
//! relationship store and the payload handles for linked parts.

pub mod constants;
pub mod packuri;
pub mod part;
pub mod rel;

pub use packuri::PackURI;
pub use part::{ChartPart, PictureData};
pub use rel::{Relationship, Relationships};
