//! The legacy VML drawing maintained alongside the modern drawing part.
//!
//! Cell comments are persisted through this older format: each comment is
//! backed by a legacy shape whose client-data anchor field holds a literal
//! position string. The package collaborator owns serialization of the VML
//! part; this bridge only allocates shapes and keeps their anchor data.

/// Template value of a comment shape's client-data anchor field.
pub const DEFAULT_COMMENT_ANCHOR: &str = "1, 15, 0, 2, 3, 15, 3, 16";

/// Legacy shape ids are allocated from this seed, matching the numbering
/// historically produced for comment shapes.
const SHAPE_ID_SEED: u32 = 1024;

/// A legacy shape entry backing a cell comment.
#[derive(Debug, Clone)]
pub struct VmlShape {
    /// Shape id string (e.g., "_x0000_s1025")
    shape_id: String,

    /// Client-data anchor field: a literal position string
    anchor: String,
}

impl VmlShape {
    fn new(shape_id: String) -> Self {
        Self {
            shape_id,
            anchor: DEFAULT_COMMENT_ANCHOR.to_string(),
        }
    }

    /// Get the shape id string.
    #[inline]
    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    /// Get the client-data anchor field.
    #[inline]
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Overwrite the client-data anchor field.
    pub fn set_anchor(&mut self, anchor: String) {
        self.anchor = anchor;
    }
}

/// The worksheet's legacy drawing: an ordered collection of legacy shapes.
#[derive(Debug, Default)]
pub struct VmlDrawing {
    shapes: Vec<VmlShape>,
    next_id: u32,
}

impl VmlDrawing {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            next_id: SHAPE_ID_SEED + 1,
        }
    }

    /// Allocate a new comment shape with template defaults.
    ///
    /// Returns the index of the new shape.
    pub fn new_comment_shape(&mut self) -> usize {
        let shape = VmlShape::new(format!("_x0000_s{}", self.next_id));
        self.next_id += 1;
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Get a shape by index.
    #[inline]
    pub fn shape(&self, index: usize) -> Option<&VmlShape> {
        self.shapes.get(index)
    }

    /// Get a mutable shape by index.
    #[inline]
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut VmlShape> {
        self.shapes.get_mut(index)
    }

    /// Number of legacy shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the drawing holds no shapes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
