//! The anchor model: how a shape is pinned to worksheet cells.
//!
//! A client anchor describes shape placement as a pair of cell coordinates
//! with EMU offsets, plus an anchor type that determines the persisted
//! `editAs` policy - how the shape behaves when rows and columns are
//! resized or moved.

/// A cell coordinate with EMU offsets from the cell's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMarker {
    /// Column index (0-based)
    pub col: u32,
    /// Row index (0-based)
    pub row: u32,
    /// Horizontal offset from the column edge, in EMUs
    pub col_off: i64,
    /// Vertical offset from the row edge, in EMUs
    pub row_off: i64,
}

impl CellMarker {
    pub fn new(col: u32, row: u32, col_off: i64, row_off: i64) -> Self {
        Self {
            col,
            row,
            col_off,
            row_off,
        }
    }
}

/// How a shape reacts to moving and resizing of its anchor cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorType {
    /// Move and resize with the anchor cells
    #[default]
    MoveAndResize,
    /// Move with the anchor cells but keep the original size
    MoveDontResize,
    /// Keep the absolute position and size
    DontMoveAndResize,
}

impl AnchorType {
    /// Resolve the persisted `editAs` policy for this anchor type.
    pub fn edit_as(self) -> EditAs {
        match self {
            AnchorType::MoveAndResize => EditAs::TwoCell,
            AnchorType::MoveDontResize => EditAs::OneCell,
            AnchorType::DontMoveAndResize => EditAs::Absolute,
        }
    }
}

/// The `editAs` attribute value persisted on a two-cell anchor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAs {
    TwoCell,
    OneCell,
    Absolute,
}

impl EditAs {
    /// The literal attribute value.
    pub fn xml_value(self) -> &'static str {
        match self {
            EditAs::TwoCell => "twoCell",
            EditAs::OneCell => "oneCell",
            EditAs::Absolute => "absolute",
        }
    }

    /// Parse an `editAs` attribute value.
    ///
    /// Unrecognized values fall back to one-cell tracking rather than
    /// failing the parse.
    pub fn from_xml_value(value: &str) -> EditAs {
        match value {
            "twoCell" => EditAs::TwoCell,
            "absolute" => EditAs::Absolute,
            _ => EditAs::OneCell,
        }
    }
}

/// Placement of a shape: top-left and bottom-right cell markers plus the
/// anchor type.
///
/// The anchor is handed to a shape-factory operation as a mutable output
/// parameter: the factory copies `from`/`to` into the new anchor node and
/// writes the tree-resolved coordinates back so both representations stay
/// in sync.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientAnchor {
    pub from: CellMarker,
    pub to: CellMarker,
    pub anchor_type: AnchorType,
}

impl ClientAnchor {
    /// Create an anchor from offsets and cell coordinates.
    ///
    /// Argument order mirrors the drawing's `create_anchor` operation:
    /// offsets first, then the from/to cell coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dx1: i64,
        dy1: i64,
        dx2: i64,
        dy2: i64,
        col1: u32,
        row1: u32,
        col2: u32,
        row2: u32,
    ) -> Self {
        Self {
            from: CellMarker::new(col1, row1, dx1, dy1),
            to: CellMarker::new(col2, row2, dx2, dy2),
            anchor_type: AnchorType::default(),
        }
    }

    /// Whether the anchor carries a fully specified cell position.
    ///
    /// An anchor with all four cell coordinates at zero is treated as
    /// unspecified; the comment bridge skips position encoding for it.
    pub fn is_fully_set(&self) -> bool {
        !(self.from.col == 0 && self.to.col == 0 && self.from.row == 0 && self.to.row == 0)
    }
}
