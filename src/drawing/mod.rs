//! The drawing canvas of a single worksheet.
//!
//! A `Drawing` owns the ordered sequence of anchored shapes attached to a
//! worksheet, the package relationships linking the drawing to embedded
//! picture and chart parts, and the bridge to the legacy comment storage.
//! Shapes are created only through the factory operations here and live as
//! long as the drawing's tree holds their node.
//!
//! The whole subsystem is single-threaded and synchronous: all mutation is
//! to in-memory structures owned exclusively by the drawing, and every
//! failure is surfaced to the caller without internal retries.

pub mod anchor;
pub mod shapes;
pub mod tree;

use crate::error::{DrawingError, Result};
use crate::opc::constants::relationship_type;
use crate::opc::part::{ChartPart, PictureData};
use crate::opc::rel::{Relationships, rel_number};
use crate::worksheet::SheetHost;
use anchor::ClientAnchor;
use shapes::{
    Chart, Comment, Connector, GraphicFrame, Picture, ShapeGroup, SimpleShape, TextBox,
};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tree::{AnchorNode, CxnNode, FrameNode, GroupNode, PicNode, ShapeNode, SpNode};

/// A part handle registered under a relationship created by this drawing.
#[derive(Debug, Clone)]
pub enum ChildPart {
    Picture(PictureData),
    Chart(ChartPart),
}

/// The drawing part of a worksheet.
pub struct Drawing {
    /// Ordered two-cell anchor nodes
    anchors: Vec<AnchorNode>,

    /// Whether this drawing was created fresh rather than loaded.
    /// Recorded for commit-time document-element synthesis; currently not
    /// acted on.
    is_new: bool,

    /// Transient graphic-frame counter. Reset to zero by both
    /// constructors, so reloading a drawing restarts frame numbering and
    /// can reissue identifiers already persisted in the tree.
    frame_count: u32,

    /// Relationships from the drawing part to its linked parts
    rels: Relationships,

    /// Linked part handles keyed by relationship id
    child_parts: HashMap<String, ChildPart>,

    /// The owning worksheet's collaborator surface, when attached
    host: Option<SheetHost>,
}

impl Drawing {
    /// Create a new empty drawing.
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            is_new: true,
            frame_count: 0,
            rels: Relationships::new("/xl/drawings".to_string()),
            child_parts: HashMap::new(),
            host: None,
        }
    }

    /// Load a drawing from the bytes of an existing drawing part.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let anchors = tree::parse_drawing(reader)?;
        Ok(Self {
            anchors,
            is_new: false,
            frame_count: 0,
            rels: Relationships::new("/xl/drawings".to_string()),
            child_parts: HashMap::new(),
            host: None,
        })
    }

    /// Serialize the drawing to the given sink.
    ///
    /// The sink is fully overwritten; on failure its contents are
    /// unspecified and the caller must retry into a fresh buffer.
    pub fn commit<W: Write>(&self, writer: &mut W) -> Result<()> {
        tree::write_drawing(writer, &self.anchors)?;
        Ok(())
    }

    /// Serialize the drawing's relationships as its `.rels` stream.
    pub fn rels_xml(&self) -> String {
        self.rels.to_xml()
    }

    /// Attach the owning worksheet's collaborator surface.
    pub fn attach(&mut self, host: SheetHost) {
        if self.rels.is_empty() {
            self.rels = Relationships::new(host.drawing_partname().base_uri().to_string());
        }
        self.host = Some(host);
    }

    /// The attached worksheet surface, if any.
    #[inline]
    pub fn host(&self) -> Option<&SheetHost> {
        self.host.as_ref()
    }

    /// Mutable access to the attached worksheet surface, if any.
    #[inline]
    pub fn host_mut(&mut self) -> Option<&mut SheetHost> {
        self.host.as_mut()
    }

    /// Whether the drawing was created fresh rather than loaded.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The anchor nodes of the drawing, in document order.
    #[inline]
    pub fn anchors(&self) -> &[AnchorNode] {
        &self.anchors
    }

    /// Number of anchor nodes in the drawing.
    #[inline]
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// The drawing's relationships.
    #[inline]
    pub fn relationships(&self) -> &Relationships {
        &self.rels
    }

    /// Look up a linked part handle by relationship id.
    #[inline]
    pub fn child_part(&self, r_id: &str) -> Option<&ChildPart> {
        self.child_parts.get(r_id)
    }

    /// Resolve a picture relationship id to the linked picture bytes.
    pub fn linked_picture(&self, r_id: &str) -> Result<&PictureData> {
        match self.child_parts.get(r_id) {
            Some(ChildPart::Picture(data)) => Ok(data),
            _ => Err(DrawingError::RelationshipNotFound(r_id.to_string())),
        }
    }

    /// Create an anchor from offsets and cell coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn create_anchor(
        dx1: i64,
        dy1: i64,
        dx2: i64,
        dy2: i64,
        col1: u32,
        row1: u32,
        col2: u32,
        row2: u32,
    ) -> ClientAnchor {
        ClientAnchor::new(dx1, dy1, dx2, dy2, col1, row1, col2, row2)
    }

    /// Next shape identity: the current anchor-node count plus one.
    ///
    /// Always computed before the new anchor node is inserted, at every
    /// call site, so identities run 1..=N in creation order.
    fn next_shape_id(&self) -> u32 {
        self.anchors.len() as u32 + 1
    }

    /// Next graphic-frame identity from the transient counter.
    fn next_frame_id(&mut self) -> u32 {
        let id = self.frame_count;
        self.frame_count += 1;
        id
    }

    /// Insert a two-cell anchor node carrying the given shape.
    ///
    /// The tree-resolved `from`/`to` are written back into the caller's
    /// anchor so both representations stay in sync.
    fn add_two_cell_anchor(&mut self, anchor: &mut ClientAnchor, shape: ShapeNode) -> usize {
        let node = AnchorNode {
            from: anchor.from,
            to: anchor.to,
            edit_as: anchor.anchor_type.edit_as(),
            shape,
        };
        anchor.from = node.from;
        anchor.to = node.to;
        self.anchors.push(node);
        self.anchors.len() - 1
    }

    /// Construct a textbox under the drawing.
    pub fn create_textbox(&mut self, anchor: &mut ClientAnchor) -> TextBox {
        let shape_id = self.next_shape_id();
        let mut sp = SpNode::prototype();
        sp.id = shape_id;
        sp.name = format!("TextBox {}", shape_id);
        sp.textbox = true;
        let node = self.add_two_cell_anchor(anchor, ShapeNode::Shape(sp));
        TextBox::new(node, shape_id, anchor.clone())
    }

    /// Set the text body of a textbox.
    pub fn set_textbox_text(&mut self, textbox: &TextBox, text: impl Into<String>) {
        if let Some(AnchorNode {
            shape: ShapeNode::Shape(sp),
            ..
        }) = self.anchors.get_mut(textbox.node_index())
        {
            sp.text = Some(text.into());
        }
    }

    /// Create a simple shape: lines, rectangles, ovals and other preset
    /// geometry.
    pub fn create_simple_shape(&mut self, anchor: &mut ClientAnchor) -> SimpleShape {
        let shape_id = self.next_shape_id();
        let mut sp = SpNode::prototype();
        sp.id = shape_id;
        sp.name = format!("Shape {}", shape_id);
        let node = self.add_two_cell_anchor(anchor, ShapeNode::Shape(sp));
        SimpleShape::new(node, shape_id, anchor.clone())
    }

    /// Create a connector.
    pub fn create_connector(&mut self, anchor: &mut ClientAnchor) -> Connector {
        let shape_id = self.next_shape_id();
        let mut cxn = CxnNode::prototype();
        cxn.id = shape_id;
        cxn.name = format!("Connector {}", shape_id);
        let node = self.add_two_cell_anchor(anchor, ShapeNode::Connector(cxn));
        Connector::new(node, shape_id, anchor.clone())
    }

    /// Create a shape group.
    pub fn create_group(&mut self, anchor: &mut ClientAnchor) -> ShapeGroup {
        let shape_id = self.next_shape_id();
        let mut grp = GroupNode::prototype();
        grp.id = shape_id;
        grp.name = format!("Group {}", shape_id);
        let node = self.add_two_cell_anchor(anchor, ShapeNode::Group(grp));
        ShapeGroup::new(node, shape_id, anchor.clone())
    }

    /// Create a picture from the workbook picture collection.
    ///
    /// The index is resolved and the resource link created before the tree
    /// is touched, so a failed creation leaves no partial state behind.
    pub fn create_picture(
        &mut self,
        anchor: &mut ClientAnchor,
        picture_index: usize,
    ) -> Result<Picture> {
        let r_id = self.add_picture_reference(picture_index)?;

        let shape_id = self.next_shape_id();
        let mut pic = PicNode::prototype();
        pic.id = shape_id;
        pic.name = format!("Picture {}", shape_id);
        pic.blip_rel = Some(r_id.clone());
        let node = self.add_two_cell_anchor(anchor, ShapeNode::Picture(pic));
        Ok(Picture::new(node, shape_id, anchor.clone(), r_id))
    }

    /// Link the indexed picture into the drawing's relations.
    fn add_picture_reference(&mut self, picture_index: usize) -> Result<String> {
        let data = {
            let host = self.host.as_ref().ok_or(DrawingError::MissingParent)?;
            let count = host.picture_count();
            host.picture(picture_index)
                .cloned()
                .ok_or(DrawingError::PictureIndexOutOfRange {
                    index: picture_index,
                    count,
                })?
        };

        let target_ref = data.partname().relative_ref(self.rels.base_uri());
        let r_id = self
            .rels
            .get_or_add(relationship_type::IMAGE, &target_ref)
            .r_id()
            .to_string();
        self.child_parts
            .insert(r_id.clone(), ChildPart::Picture(data));
        Ok(r_id)
    }

    /// Create a chart hosted by a new graphic frame.
    ///
    /// A fresh chart part is created as a child relationship of the
    /// drawing; its part name is numbered by counting chart-typed parts in
    /// the whole package. The chart's relationship id is bound into the new
    /// frame.
    pub fn create_chart(&mut self, anchor: &mut ClientAnchor) -> Result<Chart> {
        let chart_part = {
            let host = self.host.as_mut().ok_or(DrawingError::MissingParent)?;
            host.package_mut().create_chart_part()?
        };

        let target_ref = chart_part.partname().relative_ref(self.rels.base_uri());
        let r_id = self
            .rels
            .get_or_add(relationship_type::CHART, &target_ref)
            .r_id()
            .to_string();
        let chart = Chart::new(r_id.clone(), chart_part.partname().clone());
        self.child_parts
            .insert(r_id.clone(), ChildPart::Chart(chart_part));

        let mut frame = self.create_graphic_frame(anchor);
        self.set_frame_chart(&mut frame, &r_id);
        Ok(chart)
    }

    /// Create a new graphic frame.
    fn create_graphic_frame(&mut self, anchor: &mut ClientAnchor) -> GraphicFrame {
        let frame_id = self.next_frame_id();
        let mut node = FrameNode::prototype();
        node.id = frame_id;
        node.name = format!("Diagramm{}", frame_id);
        let index = self.add_two_cell_anchor(anchor, ShapeNode::GraphicFrame(node));
        GraphicFrame::new(index, frame_id, anchor.clone())
    }

    /// Bind a chart relationship id into a graphic frame.
    fn set_frame_chart(&mut self, frame: &mut GraphicFrame, r_id: &str) {
        if let Some(AnchorNode {
            shape: ShapeNode::GraphicFrame(node),
            ..
        }) = self.anchors.get_mut(frame.node_index())
        {
            node.chart_rel = Some(r_id.to_string());
        }
        frame.set_chart_rel(r_id.to_string());
    }

    /// All charts linked from this drawing.
    ///
    /// Filters the drawing's child relationships for chart parts; the
    /// snapshot is computed fresh on each call, ordered by relationship id.
    pub fn charts(&self) -> Vec<Chart> {
        let mut charts: Vec<Chart> = self
            .child_parts
            .iter()
            .filter_map(|(r_id, part)| match part {
                ChildPart::Chart(p) => Some(Chart::new(r_id.clone(), p.partname().clone())),
                ChildPart::Picture(_) => None,
            })
            .collect();
        charts.sort_by_key(|chart| rel_number(chart.r_id()));
        charts
    }

    /// Create a cell comment.
    ///
    /// Comments are persisted through the worksheet's legacy VML drawing:
    /// a legacy shape is allocated, and when the anchor carries a fully
    /// specified position it is encoded as a literal position string into
    /// the shape's anchor-data field. Partially specified anchors leave
    /// the field at its template default.
    pub fn create_cell_comment(&mut self, anchor: &ClientAnchor) -> Result<Comment> {
        let host = self.host.as_mut().ok_or(DrawingError::MissingParent)?;

        // The legacy drawing and comment table are created on first use
        let vml_shape = host.vml_drawing().new_comment_shape();

        if anchor.is_fully_set() {
            let position = format!(
                "{}, 0, {}, 0, {}, 0, {}, 0",
                anchor.from.col, anchor.from.row, anchor.to.col, anchor.to.row
            );
            if let Some(shape) = host.vml_drawing().shape_mut(vml_shape) {
                shape.set_anchor(position);
            }
        }

        let comment_index = host.comments_table().create_comment();
        if let Some(record) = host.comments_table().comment_mut(comment_index) {
            record.row = anchor.from.row;
            record.col = anchor.from.col;
        }
        Ok(Comment::new(
            comment_index,
            vml_shape,
            anchor.from.row,
            anchor.from.col,
        ))
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::anchor::{AnchorType, EditAs};
    use crate::opc::constants::content_type;
    use crate::opc::packuri::PackURI;
    use crate::worksheet::vml::DEFAULT_COMMENT_ANCHOR;
    use proptest::prelude::*;

    fn anchor() -> ClientAnchor {
        ClientAnchor::new(0, 0, 0, 0, 0, 0, 2, 2)
    }

    fn attached_drawing() -> Drawing {
        let mut host = SheetHost::new(PackURI::new("/xl/drawings/drawing1.xml").unwrap());
        host.add_picture(PictureData::new(
            PackURI::new("/xl/media/image1.png").unwrap(),
            content_type::PNG,
            vec![0x89, 0x50, 0x4E, 0x47],
        ));
        let mut drawing = Drawing::new();
        drawing.attach(host);
        drawing
    }

    #[test]
    fn test_simple_shape_then_textbox_scenario() {
        let mut drawing = Drawing::new();

        let mut a = anchor();
        a.anchor_type = AnchorType::MoveAndResize;
        let shape = drawing.create_simple_shape(&mut a);
        assert_eq!(shape.shape_id(), 1);
        assert_eq!(drawing.anchors()[0].edit_as, EditAs::TwoCell);

        let textbox = drawing.create_textbox(&mut anchor());
        assert_eq!(textbox.shape_id(), 2);
        assert_eq!(drawing.anchor_count(), 2);
    }

    #[test]
    fn test_shape_ids_follow_creation_order() {
        let mut drawing = attached_drawing();

        let ids = [
            drawing.create_textbox(&mut anchor()).shape_id(),
            drawing.create_simple_shape(&mut anchor()).shape_id(),
            drawing.create_connector(&mut anchor()).shape_id(),
            drawing.create_group(&mut anchor()).shape_id(),
            drawing.create_picture(&mut anchor(), 0).unwrap().shape_id(),
        ];
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_anchor_written_back() {
        let mut drawing = Drawing::new();
        let mut a = ClientAnchor::new(10, 20, 30, 40, 1, 2, 3, 4);
        let shape = drawing.create_simple_shape(&mut a);

        let node = &drawing.anchors()[shape.node_index()];
        assert_eq!(a.from, node.from);
        assert_eq!(a.to, node.to);
        assert_eq!(shape.anchor(), &a);
    }

    #[test]
    fn test_create_picture_links_resource() {
        let mut drawing = attached_drawing();
        let picture = drawing.create_picture(&mut anchor(), 0).unwrap();

        assert_eq!(picture.picture_rel(), "rId1");
        let rel = drawing.relationships().get("rId1").unwrap();
        assert_eq!(rel.reltype(), relationship_type::IMAGE);
        assert_eq!(rel.target_ref(), "../media/image1.png");

        match drawing.child_part("rId1") {
            Some(ChildPart::Picture(data)) => {
                assert_eq!(data.partname().as_str(), "/xl/media/image1.png");
            },
            other => panic!("unexpected child part: {other:?}"),
        }

        match &drawing.anchors()[picture.node_index()].shape {
            ShapeNode::Picture(node) => assert_eq!(node.blip_rel.as_deref(), Some("rId1")),
            other => panic!("unexpected shape node: {other:?}"),
        }
    }

    #[test]
    fn test_linked_picture_resolves_bytes() {
        let mut drawing = attached_drawing();
        let picture = drawing.create_picture(&mut anchor(), 0).unwrap();

        let data = drawing.linked_picture(picture.picture_rel()).unwrap();
        assert_eq!(data.blob(), &[0x89, 0x50, 0x4E, 0x47]);

        assert!(matches!(
            drawing.linked_picture("rId99"),
            Err(DrawingError::RelationshipNotFound(_))
        ));
    }

    #[test]
    fn test_create_picture_bad_index_leaves_no_state() {
        let mut drawing = attached_drawing();
        let err = drawing.create_picture(&mut anchor(), 5).unwrap_err();

        match err {
            DrawingError::PictureIndexOutOfRange { index, count } => {
                assert_eq!(index, 5);
                assert_eq!(count, 1);
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(drawing.anchor_count(), 0);
        assert!(drawing.relationships().is_empty());
        assert!(drawing.child_part("rId1").is_none());
    }

    #[test]
    fn test_create_picture_without_host_fails() {
        let mut drawing = Drawing::new();
        assert!(matches!(
            drawing.create_picture(&mut anchor(), 0),
            Err(DrawingError::MissingParent)
        ));
    }

    #[test]
    fn test_create_chart_binds_frame_to_chart() {
        let mut drawing = attached_drawing();
        assert!(drawing.charts().is_empty());

        let chart = drawing.create_chart(&mut anchor()).unwrap();
        assert_eq!(chart.partname().as_str(), "/xl/charts/chart1.xml");

        let charts = drawing.charts();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].r_id(), chart.r_id());

        match &drawing.anchors()[0].shape {
            ShapeNode::GraphicFrame(node) => {
                assert_eq!(node.chart_rel.as_deref(), Some(chart.r_id()));
                assert_eq!(node.name, "Diagramm0");
            },
            other => panic!("unexpected shape node: {other:?}"),
        }

        // A second chart gets the next part number and frame id
        let second = drawing.create_chart(&mut anchor()).unwrap();
        assert_eq!(second.partname().as_str(), "/xl/charts/chart2.xml");
        assert_eq!(drawing.charts().len(), 2);
        match &drawing.anchors()[1].shape {
            ShapeNode::GraphicFrame(node) => assert_eq!(node.name, "Diagramm1"),
            other => panic!("unexpected shape node: {other:?}"),
        }
    }

    #[test]
    fn test_frame_counter_resets_on_reload() {
        // The frame counter is transient: reloading a drawing that already
        // holds frames restarts numbering at zero and reissues identifiers.
        // Pinned here as the observable behavior.
        let mut drawing = attached_drawing();
        drawing.create_chart(&mut anchor()).unwrap();

        let mut bytes = Vec::new();
        drawing.commit(&mut bytes).unwrap();

        let mut reloaded = Drawing::load(bytes.as_slice()).unwrap();
        assert!(!reloaded.is_new());
        reloaded.attach(SheetHost::new(
            PackURI::new("/xl/drawings/drawing1.xml").unwrap(),
        ));

        reloaded.create_chart(&mut anchor()).unwrap();
        match &reloaded.anchors()[1].shape {
            ShapeNode::GraphicFrame(node) => assert_eq!(node.name, "Diagramm0"),
            other => panic!("unexpected shape node: {other:?}"),
        }
    }

    #[test]
    fn test_commit_load_round_trip() {
        let mut drawing = attached_drawing();

        let mut a = anchor();
        a.anchor_type = AnchorType::DontMoveAndResize;
        let textbox = drawing.create_textbox(&mut a);
        drawing.set_textbox_text(&textbox, "quarterly totals");
        drawing.create_simple_shape(&mut anchor());
        drawing.create_connector(&mut anchor());
        drawing.create_group(&mut anchor());
        drawing.create_picture(&mut anchor(), 0).unwrap();
        drawing.create_chart(&mut anchor()).unwrap();

        let mut bytes = Vec::new();
        drawing.commit(&mut bytes).unwrap();

        let reloaded = Drawing::load(bytes.as_slice()).unwrap();
        assert_eq!(reloaded.anchors(), drawing.anchors());
    }

    #[test]
    fn test_rels_xml_lists_created_links() {
        let mut drawing = attached_drawing();
        drawing.create_picture(&mut anchor(), 0).unwrap();
        drawing.create_chart(&mut anchor()).unwrap();

        let xml = drawing.rels_xml();
        assert!(xml.contains(r#"Target="../media/image1.png""#));
        assert!(xml.contains(r#"Target="../charts/chart1.xml""#));
    }

    #[test]
    fn test_cell_comment_with_full_anchor_encodes_position() {
        let mut drawing = attached_drawing();
        let a = ClientAnchor::new(0, 0, 0, 0, 1, 2, 3, 4);

        let comment = drawing.create_cell_comment(&a).unwrap();
        assert_eq!(comment.row(), 2);
        assert_eq!(comment.col(), 1);

        let host = drawing.host().unwrap();
        let shape = host
            .try_vml_drawing()
            .unwrap()
            .shape(comment.vml_shape())
            .unwrap();
        assert_eq!(shape.anchor(), "1, 0, 2, 0, 3, 0, 4, 0");

        let record = host
            .try_comments_table()
            .unwrap()
            .comment(comment.comment_index())
            .unwrap();
        assert_eq!((record.row, record.col), (2, 1));

        // Comments are not anchor-node shapes
        assert_eq!(drawing.anchor_count(), 0);
    }

    #[test]
    fn test_cell_comment_with_partial_anchor_keeps_template_position() {
        let mut drawing = attached_drawing();
        let a = ClientAnchor::new(5, 5, 5, 5, 0, 0, 0, 0);

        let comment = drawing.create_cell_comment(&a).unwrap();
        let shape = drawing
            .host()
            .unwrap()
            .try_vml_drawing()
            .unwrap()
            .shape(comment.vml_shape())
            .unwrap();
        assert_eq!(shape.anchor(), DEFAULT_COMMENT_ANCHOR);
    }

    #[test]
    fn test_cell_comment_without_host_fails() {
        let mut drawing = Drawing::new();
        assert!(matches!(
            drawing.create_cell_comment(&anchor()),
            Err(DrawingError::MissingParent)
        ));
    }

    proptest! {
        #[test]
        fn prop_shape_ids_are_sequential(kinds in proptest::collection::vec(0u8..4, 0..24)) {
            let mut drawing = Drawing::new();
            for (i, kind) in kinds.iter().enumerate() {
                let mut a = anchor();
                let id = match *kind {
                    0 => drawing.create_textbox(&mut a).shape_id(),
                    1 => drawing.create_simple_shape(&mut a).shape_id(),
                    2 => drawing.create_connector(&mut a).shape_id(),
                    _ => drawing.create_group(&mut a).shape_id(),
                };
                prop_assert_eq!(id as usize, i + 1);
            }
            prop_assert_eq!(drawing.anchor_count(), kinds.len());
        }

        #[test]
        fn prop_edit_as_parse_is_total(value in ".*") {
            // Any attribute value resolves to one of the three policies
            let edit_as = EditAs::from_xml_value(&value);
            prop_assert!(matches!(
                edit_as,
                EditAs::TwoCell | EditAs::OneCell | EditAs::Absolute
            ));
        }
    }
}
