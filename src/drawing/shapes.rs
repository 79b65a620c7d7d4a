//! Typed handles over the shapes of a drawing.
//!
//! A handle stores the index of its anchor node in the owning drawing's
//! arena, never a pointer into the tree, so nodes can be serialized and
//! reloaded without invalidating handles held by callers. Handles are bound
//! back to the caller's client anchor at creation.

use crate::drawing::anchor::ClientAnchor;
use crate::error::DrawingError;
use crate::opc::packuri::PackURI;

macro_rules! anchored_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            node: usize,
            shape_id: u32,
            anchor: ClientAnchor,
        }

        impl $name {
            pub(crate) fn new(node: usize, shape_id: u32, anchor: ClientAnchor) -> Self {
                Self {
                    node,
                    shape_id,
                    anchor,
                }
            }

            /// Index of the anchor node in the owning drawing.
            #[inline]
            pub fn node_index(&self) -> usize {
                self.node
            }

            /// The shape identity stamped into the node.
            #[inline]
            pub fn shape_id(&self) -> u32 {
                self.shape_id
            }

            /// The anchor the shape was created with.
            #[inline]
            pub fn anchor(&self) -> &ClientAnchor {
                &self.anchor
            }
        }
    };
}

anchored_handle! {
    /// A text box shape.
    TextBox
}

anchored_handle! {
    /// A simple shape: lines, rectangles, ovals and other preset geometry.
    SimpleShape
}

anchored_handle! {
    /// A connector shape.
    Connector
}

anchored_handle! {
    /// A shape group.
    ShapeGroup
}

/// A picture shape, bound to its backing picture part.
#[derive(Debug, Clone)]
pub struct Picture {
    node: usize,
    shape_id: u32,
    anchor: ClientAnchor,
    picture_rel: String,
}

impl Picture {
    pub(crate) fn new(
        node: usize,
        shape_id: u32,
        anchor: ClientAnchor,
        picture_rel: String,
    ) -> Self {
        Self {
            node,
            shape_id,
            anchor,
            picture_rel,
        }
    }

    /// Index of the anchor node in the owning drawing.
    #[inline]
    pub fn node_index(&self) -> usize {
        self.node
    }

    /// The shape identity stamped into the node.
    #[inline]
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// The anchor the picture was created with.
    #[inline]
    pub fn anchor(&self) -> &ClientAnchor {
        &self.anchor
    }

    /// Relationship id of the backing picture part.
    #[inline]
    pub fn picture_rel(&self) -> &str {
        &self.picture_rel
    }
}

/// A graphic frame hosting an embedded object, notably a chart.
///
/// Frame identities come from a per-drawing counter that starts at zero and
/// is not derived from tree contents.
#[derive(Debug, Clone)]
pub struct GraphicFrame {
    node: usize,
    frame_id: u32,
    anchor: ClientAnchor,
    chart_rel: Option<String>,
}

impl GraphicFrame {
    pub(crate) fn new(node: usize, frame_id: u32, anchor: ClientAnchor) -> Self {
        Self {
            node,
            frame_id,
            anchor,
            chart_rel: None,
        }
    }

    pub(crate) fn set_chart_rel(&mut self, r_id: String) {
        self.chart_rel = Some(r_id);
    }

    /// Index of the anchor node in the owning drawing.
    #[inline]
    pub fn node_index(&self) -> usize {
        self.node
    }

    /// The frame identity stamped into the node.
    #[inline]
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// The anchor the frame was created with.
    #[inline]
    pub fn anchor(&self) -> &ClientAnchor {
        &self.anchor
    }

    /// Relationship id of the hosted chart part, once bound.
    #[inline]
    pub fn chart_rel(&self) -> Option<&str> {
        self.chart_rel.as_deref()
    }
}

/// Handle to a chart part linked from the drawing.
#[derive(Debug, Clone)]
pub struct Chart {
    r_id: String,
    partname: PackURI,
}

impl Chart {
    pub(crate) fn new(r_id: String, partname: PackURI) -> Self {
        Self { r_id, partname }
    }

    /// Relationship id of the chart part.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Partname of the chart part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }
}

/// A cell comment handle.
///
/// Comments are anchored through the legacy VML bridge, not through a
/// drawing anchor node, and are excluded from shape and chart enumerations.
#[derive(Debug, Clone)]
pub struct Comment {
    comment_index: usize,
    vml_shape: usize,
    row: u32,
    col: u32,
}

impl Comment {
    pub(crate) fn new(comment_index: usize, vml_shape: usize, row: u32, col: u32) -> Self {
        Self {
            comment_index,
            vml_shape,
            row,
            col,
        }
    }

    /// Index of the record in the worksheet's comment table.
    #[inline]
    pub fn comment_index(&self) -> usize {
        self.comment_index
    }

    /// Index of the legacy shape in the worksheet's VML drawing.
    #[inline]
    pub fn vml_shape(&self) -> usize {
        self.vml_shape
    }

    /// Row of the commented cell.
    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column of the commented cell.
    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }
}

/// A generic handle over any drawing-anchored shape variant.
///
/// Entry points that accept any shape take this enum; recovering a concrete
/// handle is a fallible conversion that surfaces a type mismatch instead of
/// silently misbehaving.
#[derive(Debug, Clone)]
pub enum ShapeHandle {
    TextBox(TextBox),
    SimpleShape(SimpleShape),
    Connector(Connector),
    Group(ShapeGroup),
    Picture(Picture),
    GraphicFrame(GraphicFrame),
}

impl ShapeHandle {
    /// Human-readable name of the concrete variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeHandle::TextBox(_) => "text box",
            ShapeHandle::SimpleShape(_) => "simple shape",
            ShapeHandle::Connector(_) => "connector",
            ShapeHandle::Group(_) => "shape group",
            ShapeHandle::Picture(_) => "picture",
            ShapeHandle::GraphicFrame(_) => "graphic frame",
        }
    }

    /// Index of the anchor node in the owning drawing.
    pub fn node_index(&self) -> usize {
        match self {
            ShapeHandle::TextBox(s) => s.node_index(),
            ShapeHandle::SimpleShape(s) => s.node_index(),
            ShapeHandle::Connector(s) => s.node_index(),
            ShapeHandle::Group(s) => s.node_index(),
            ShapeHandle::Picture(s) => s.node_index(),
            ShapeHandle::GraphicFrame(s) => s.node_index(),
        }
    }

    /// The anchor the shape was created with.
    pub fn anchor(&self) -> &ClientAnchor {
        match self {
            ShapeHandle::TextBox(s) => s.anchor(),
            ShapeHandle::SimpleShape(s) => s.anchor(),
            ShapeHandle::Connector(s) => s.anchor(),
            ShapeHandle::Group(s) => s.anchor(),
            ShapeHandle::Picture(s) => s.anchor(),
            ShapeHandle::GraphicFrame(s) => s.anchor(),
        }
    }
}

macro_rules! shape_handle_conversions {
    ($variant:ident, $concrete:ty, $kind:literal) => {
        impl From<$concrete> for ShapeHandle {
            fn from(shape: $concrete) -> Self {
                ShapeHandle::$variant(shape)
            }
        }

        impl TryFrom<ShapeHandle> for $concrete {
            type Error = DrawingError;

            fn try_from(handle: ShapeHandle) -> Result<Self, Self::Error> {
                match handle {
                    ShapeHandle::$variant(shape) => Ok(shape),
                    other => Err(DrawingError::TypeMismatch {
                        expected: $kind,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

shape_handle_conversions!(TextBox, TextBox, "text box");
shape_handle_conversions!(SimpleShape, SimpleShape, "simple shape");
shape_handle_conversions!(Connector, Connector, "connector");
shape_handle_conversions!(Group, ShapeGroup, "shape group");
shape_handle_conversions!(Picture, Picture, "picture");
shape_handle_conversions!(GraphicFrame, GraphicFrame, "graphic frame");
