//! Sheetdraw - the drawing canvas of a SpreadsheetML worksheet
//!
//! This library models the drawing part attached to a single worksheet of an
//! Office Open XML spreadsheet: the ordered collection of anchored visual
//! objects (text boxes, simple shapes, connectors, groups, pictures and
//! graphic frames hosting charts) together with the package relationships
//! that bind picture and chart parts to the drawing.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **OPC Layer** (`opc`): part names, relationships and part payloads,
//!    the subset of the Open Packaging Conventions the drawing consumes
//! 2. **Drawing Layer** (`drawing`): the anchor model, the XML-backed anchor
//!    tree, the shape factory and the typed shape handles
//! 3. **Worksheet Layer** (`worksheet`): the collaborator surface supplied
//!    by the owning worksheet - picture collection, package part index,
//!    comment table and the legacy VML drawing used for cell comments
//!
//! # Example
//!
//! ```
//! use sheetdraw::drawing::Drawing;
//! use sheetdraw::drawing::anchor::{AnchorType, ClientAnchor};
//!
//! let mut drawing = Drawing::new();
//! let mut anchor = ClientAnchor::new(0, 0, 0, 0, 0, 0, 2, 2);
//! anchor.anchor_type = AnchorType::MoveAndResize;
//!
//! let shape = drawing.create_simple_shape(&mut anchor);
//! assert_eq!(shape.shape_id(), 1);
//!
//! let mut out = Vec::new();
//! drawing.commit(&mut out).unwrap();
//! # assert!(!out.is_empty());
//! ```

pub mod drawing;
pub mod error;
pub mod opc;
pub mod worksheet;
mod xml;

// Re-export commonly used types
pub use drawing::Drawing;
pub use drawing::anchor::{AnchorType, ClientAnchor, EditAs};
pub use error::{DrawingError, Result};
pub use opc::packuri::PackURI;
pub use worksheet::SheetHost;
