//! The XML-backed anchor tree of a drawing part.
//!
//! The tree is an arena of two-cell anchor nodes addressed by stable
//! indices. Each anchor node holds `from`/`to` cell markers, the `editAs`
//! policy, an implicit client-data placeholder and exactly one shape child.
//! Parsing follows the streaming event style used throughout the crate;
//! serialization reproduces the fixed namespace-prefix table (`xdr`, `a`,
//! `r`) literally, since downstream consumers match on the prefixes.

use crate::drawing::anchor::{CellMarker, EditAs};
use crate::error::{DrawingError, Result};
use crate::opc::constants::namespace;
use crate::xml::escape_xml;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{self, BufRead, Write};

/// A two-cell anchor node: placement plus exactly one shape child.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorNode {
    pub from: CellMarker,
    pub to: CellMarker,
    pub edit_as: EditAs,
    pub shape: ShapeNode,
}

/// The shape child of an anchor node.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeNode {
    /// A simple shape or text box (`xdr:sp`)
    Shape(SpNode),
    /// A picture (`xdr:pic`)
    Picture(PicNode),
    /// A connector (`xdr:cxnSp`)
    Connector(CxnNode),
    /// A shape group (`xdr:grpSp`)
    Group(GroupNode),
    /// A graphic frame hosting an embedded object (`xdr:graphicFrame`)
    GraphicFrame(FrameNode),
}

impl ShapeNode {
    /// The identity stamped into the node's non-visual properties.
    pub fn shape_id(&self) -> u32 {
        match self {
            ShapeNode::Shape(n) => n.id,
            ShapeNode::Picture(n) => n.id,
            ShapeNode::Connector(n) => n.id,
            ShapeNode::Group(n) => n.id,
            ShapeNode::GraphicFrame(n) => n.id,
        }
    }

    /// The shape name stamped into the node's non-visual properties.
    pub fn name(&self) -> &str {
        match self {
            ShapeNode::Shape(n) => &n.name,
            ShapeNode::Picture(n) => &n.name,
            ShapeNode::Connector(n) => &n.name,
            ShapeNode::Group(n) => &n.name,
            ShapeNode::GraphicFrame(n) => &n.name,
        }
    }
}

/// A simple shape or text box node.
#[derive(Debug, Clone, PartialEq)]
pub struct SpNode {
    pub id: u32,
    pub name: String,
    /// Whether the shape carries the text-box flag (`txBox="1"`)
    pub textbox: bool,
    /// Preset geometry name (e.g., "rect")
    pub preset: String,
    /// Text body content, when any
    pub text: Option<String>,
}

impl SpNode {
    /// The static template a new simple shape starts from.
    pub fn prototype() -> Self {
        Self {
            id: 0,
            name: String::new(),
            textbox: false,
            preset: "rect".to_string(),
            text: None,
        }
    }
}

/// A picture node.
#[derive(Debug, Clone, PartialEq)]
pub struct PicNode {
    pub id: u32,
    pub name: String,
    /// Relationship id of the backing picture part (`r:embed`)
    pub blip_rel: Option<String>,
}

impl PicNode {
    pub fn prototype() -> Self {
        Self {
            id: 0,
            name: String::new(),
            blip_rel: None,
        }
    }
}

/// A connector node.
#[derive(Debug, Clone, PartialEq)]
pub struct CxnNode {
    pub id: u32,
    pub name: String,
    /// Preset geometry name (e.g., "line")
    pub preset: String,
}

impl CxnNode {
    pub fn prototype() -> Self {
        Self {
            id: 0,
            name: String::new(),
            preset: "line".to_string(),
        }
    }
}

/// A shape group node.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub id: u32,
    pub name: String,
}

impl GroupNode {
    pub fn prototype() -> Self {
        Self {
            id: 0,
            name: String::new(),
        }
    }
}

/// A graphic frame node.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    pub id: u32,
    pub name: String,
    /// Relationship id of the hosted chart part (`r:id`), once bound
    pub chart_rel: Option<String>,
}

impl FrameNode {
    pub fn prototype() -> Self {
        Self {
            id: 0,
            name: String::new(),
            chart_rel: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a drawing part into its anchor nodes.
pub(crate) fn parse_drawing<R: BufRead>(reader: R) -> Result<Vec<AnchorNode>> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut anchors = Vec::new();
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"wsDr" => saw_root = true,
                b"twoCellAnchor" => {
                    let edit_as = read_edit_as(e)?;
                    anchors.push(parse_two_cell_anchor(&mut xml, edit_as)?);
                },
                _ => {},
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"wsDr" => saw_root = true,
            Ok(Event::Eof) => break,
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    if !saw_root {
        return Err(DrawingError::Xml(
            "drawing part has no wsDr root element".to_string(),
        ));
    }
    Ok(anchors)
}

fn read_edit_as(e: &BytesStart) -> Result<EditAs> {
    // Schema default when the attribute is absent
    Ok(match read_attr(e, b"editAs")? {
        Some(value) => EditAs::from_xml_value(&value),
        None => EditAs::TwoCell,
    })
}

fn parse_two_cell_anchor<R: BufRead>(xml: &mut Reader<R>, edit_as: EditAs) -> Result<AnchorNode> {
    let mut from = CellMarker::default();
    let mut to = CellMarker::default();
    let mut shape: Option<ShapeNode> = None;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"from" => from = parse_marker(xml, b"from")?,
                b"to" => to = parse_marker(xml, b"to")?,
                b"sp" => shape = Some(ShapeNode::Shape(parse_sp(xml)?)),
                b"pic" => shape = Some(ShapeNode::Picture(parse_pic(xml)?)),
                b"cxnSp" => shape = Some(ShapeNode::Connector(parse_cxn(xml)?)),
                b"grpSp" => shape = Some(ShapeNode::Group(parse_grp(xml)?)),
                b"graphicFrame" => shape = Some(ShapeNode::GraphicFrame(parse_frame(xml)?)),
                _ => {},
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"twoCellAnchor" => break,
            Ok(Event::Eof) => return Err(premature_eof("twoCellAnchor")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    let shape = shape.ok_or_else(|| {
        DrawingError::Xml("twoCellAnchor element has no shape child".to_string())
    })?;
    Ok(AnchorNode {
        from,
        to,
        edit_as,
        shape,
    })
}

fn parse_marker<R: BufRead>(xml: &mut Reader<R>, end: &[u8]) -> Result<CellMarker> {
    let mut marker = CellMarker::default();
    let mut current: &[u8] = b"";
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                current = match e.local_name().as_ref() {
                    b"col" => b"col",
                    b"colOff" => b"colOff",
                    b"row" => b"row",
                    b"rowOff" => b"rowOff",
                    _ => b"",
                };
            },
            Ok(Event::Text(e)) => {
                let text = std::str::from_utf8(e.as_ref())?;
                match current {
                    b"col" => marker.col = parse_u32(text)?,
                    b"colOff" => marker.col_off = parse_i64(text)?,
                    b"row" => marker.row = parse_u32(text)?,
                    b"rowOff" => marker.row_off = parse_i64(text)?,
                    _ => {},
                }
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == end => break,
            Ok(Event::End(_)) => current = b"",
            Ok(Event::Eof) => return Err(premature_eof("cell marker")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
    Ok(marker)
}

fn parse_sp<R: BufRead>(xml: &mut Reader<R>) -> Result<SpNode> {
    let mut node = SpNode::prototype();
    let mut text = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                } else {
                    read_sp_child(e, &mut node)?;
                }
            },
            Ok(Event::Empty(ref e)) => read_sp_child(e, &mut node)?,
            Ok(Event::Text(e)) if in_text => {
                text.push_str(std::str::from_utf8(e.as_ref())?);
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"sp" => break,
                _ => {},
            },
            Ok(Event::Eof) => return Err(premature_eof("sp")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    if !text.is_empty() {
        node.text = Some(text);
    }
    Ok(node)
}

fn read_sp_child(e: &BytesStart, node: &mut SpNode) -> Result<()> {
    match e.local_name().as_ref() {
        b"cNvPr" => (node.id, node.name) = read_id_name(e)?,
        b"cNvSpPr" => {
            node.textbox = matches!(read_attr(e, b"txBox")?.as_deref(), Some("1") | Some("true"));
        },
        b"prstGeom" => {
            if let Some(preset) = read_attr(e, b"prst")? {
                node.preset = preset;
            }
        },
        _ => {},
    }
    Ok(())
}

fn parse_pic<R: BufRead>(xml: &mut Reader<R>) -> Result<PicNode> {
    let mut node = PicNode::prototype();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"cNvPr" => (node.id, node.name) = read_id_name(e)?,
                b"blip" => node.blip_rel = read_attr(e, b"embed")?,
                _ => {},
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"pic" => break,
            Ok(Event::Eof) => return Err(premature_eof("pic")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
    Ok(node)
}

fn parse_cxn<R: BufRead>(xml: &mut Reader<R>) -> Result<CxnNode> {
    let mut node = CxnNode::prototype();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"cNvPr" => (node.id, node.name) = read_id_name(e)?,
                b"prstGeom" => {
                    if let Some(preset) = read_attr(e, b"prst")? {
                        node.preset = preset;
                    }
                },
                _ => {},
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"cxnSp" => break,
            Ok(Event::Eof) => return Err(premature_eof("cxnSp")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
    Ok(node)
}

fn parse_grp<R: BufRead>(xml: &mut Reader<R>) -> Result<GroupNode> {
    let mut node = GroupNode::prototype();
    let mut depth = 0usize;
    let mut in_nv = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                // Group members are out of scope here, but members carry
                // their own cNvPr (and nested groups their own nvGrpSpPr),
                // so the group's identity is read only directly inside the
                // outer group's nvGrpSpPr.
                b"grpSp" => depth += 1,
                b"nvGrpSpPr" if depth == 0 => in_nv = true,
                b"cNvPr" if in_nv => (node.id, node.name) = read_id_name(e)?,
                _ => {},
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"cNvPr" && in_nv => {
                (node.id, node.name) = read_id_name(e)?;
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"grpSp" => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                },
                b"nvGrpSpPr" if depth == 0 => in_nv = false,
                _ => {},
            },
            Ok(Event::Eof) => return Err(premature_eof("grpSp")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
    Ok(node)
}

fn parse_frame<R: BufRead>(xml: &mut Reader<R>) -> Result<FrameNode> {
    let mut node = FrameNode::prototype();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"cNvPr" => (node.id, node.name) = read_id_name(e)?,
                b"chart" => node.chart_rel = read_attr(e, b"id")?,
                _ => {},
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"graphicFrame" => break,
            Ok(Event::Eof) => return Err(premature_eof("graphicFrame")),
            Err(e) => return Err(DrawingError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
    Ok(node)
}

fn read_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn read_id_name(e: &BytesStart) -> Result<(u32, String)> {
    let mut id = 0u32;
    let mut name = String::new();
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.local_name().as_ref() {
            b"id" => id = parse_u32(&attr.unescape_value()?)?,
            b"name" => name = attr.unescape_value()?.into_owned(),
            _ => {},
        }
    }
    Ok((id, name))
}

fn parse_u32(text: &str) -> Result<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| DrawingError::Xml(format!("invalid unsigned integer '{}'", text)))
}

fn parse_i64(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| DrawingError::Xml(format!("invalid integer '{}'", text)))
}

fn premature_eof(element: &str) -> DrawingError {
    DrawingError::Xml(format!("unexpected end of input inside {} element", element))
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Write the anchor nodes as a complete drawing part.
///
/// Namespace prefixes are fixed: `xdr` for the spreadsheet drawing
/// namespace, `a` for the main drawing namespace, `r` for relationships.
pub(crate) fn write_drawing<W: Write>(writer: &mut W, anchors: &[AnchorNode]) -> io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<xdr:wsDr xmlns:xdr="{}" xmlns:a="{}" xmlns:r="{}">"#,
        namespace::DML_SPREADSHEET_DRAWING,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS
    )?;
    for anchor in anchors {
        write_two_cell_anchor(writer, anchor)?;
    }
    write!(writer, "</xdr:wsDr>")
}

fn write_two_cell_anchor<W: Write>(writer: &mut W, anchor: &AnchorNode) -> io::Result<()> {
    write!(
        writer,
        r#"<xdr:twoCellAnchor editAs="{}">"#,
        anchor.edit_as.xml_value()
    )?;
    write_marker(writer, "from", &anchor.from)?;
    write_marker(writer, "to", &anchor.to)?;
    match &anchor.shape {
        ShapeNode::Shape(n) => write_sp(writer, n)?,
        ShapeNode::Picture(n) => write_pic(writer, n)?,
        ShapeNode::Connector(n) => write_cxn(writer, n)?,
        ShapeNode::Group(n) => write_grp(writer, n)?,
        ShapeNode::GraphicFrame(n) => write_frame(writer, n)?,
    }
    write!(writer, "<xdr:clientData/>")?;
    write!(writer, "</xdr:twoCellAnchor>")
}

fn write_marker<W: Write>(writer: &mut W, tag: &str, marker: &CellMarker) -> io::Result<()> {
    write!(writer, "<xdr:{}>", tag)?;
    write!(writer, "<xdr:col>{}</xdr:col>", marker.col)?;
    write!(writer, "<xdr:colOff>{}</xdr:colOff>", marker.col_off)?;
    write!(writer, "<xdr:row>{}</xdr:row>", marker.row)?;
    write!(writer, "<xdr:rowOff>{}</xdr:rowOff>", marker.row_off)?;
    write!(writer, "</xdr:{}>", tag)
}

fn write_sp<W: Write>(writer: &mut W, node: &SpNode) -> io::Result<()> {
    write!(writer, "<xdr:sp>")?;
    write!(writer, "<xdr:nvSpPr>")?;
    write_non_visual_props(writer, node.id, &node.name)?;
    if node.textbox {
        write!(writer, r#"<xdr:cNvSpPr txBox="1"/>"#)?;
    } else {
        write!(writer, "<xdr:cNvSpPr/>")?;
    }
    write!(writer, "</xdr:nvSpPr>")?;
    write!(
        writer,
        r#"<xdr:spPr><a:prstGeom prst="{}"><a:avLst/></a:prstGeom></xdr:spPr>"#,
        escape_xml(&node.preset)
    )?;
    match &node.text {
        Some(text) => write!(
            writer,
            "<xdr:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></xdr:txBody>",
            escape_xml(text)
        )?,
        None => write!(writer, "<xdr:txBody><a:bodyPr/><a:p/></xdr:txBody>")?,
    }
    write!(writer, "</xdr:sp>")
}

fn write_pic<W: Write>(writer: &mut W, node: &PicNode) -> io::Result<()> {
    write!(writer, "<xdr:pic>")?;
    write!(writer, "<xdr:nvPicPr>")?;
    write_non_visual_props(writer, node.id, &node.name)?;
    write!(writer, "<xdr:cNvPicPr/>")?;
    write!(writer, "</xdr:nvPicPr>")?;
    write!(writer, "<xdr:blipFill>")?;
    if let Some(rel) = &node.blip_rel {
        write!(writer, r#"<a:blip r:embed="{}"/>"#, escape_xml(rel))?;
    }
    write!(writer, "<a:stretch><a:fillRect/></a:stretch>")?;
    write!(writer, "</xdr:blipFill>")?;
    write!(
        writer,
        r#"<xdr:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr>"#
    )?;
    write!(writer, "</xdr:pic>")
}

fn write_cxn<W: Write>(writer: &mut W, node: &CxnNode) -> io::Result<()> {
    write!(writer, "<xdr:cxnSp>")?;
    write!(writer, "<xdr:nvCxnSpPr>")?;
    write_non_visual_props(writer, node.id, &node.name)?;
    write!(writer, "<xdr:cNvCxnSpPr/>")?;
    write!(writer, "</xdr:nvCxnSpPr>")?;
    write!(
        writer,
        r#"<xdr:spPr><a:prstGeom prst="{}"><a:avLst/></a:prstGeom></xdr:spPr>"#,
        escape_xml(&node.preset)
    )?;
    write!(writer, "</xdr:cxnSp>")
}

fn write_grp<W: Write>(writer: &mut W, node: &GroupNode) -> io::Result<()> {
    write!(writer, "<xdr:grpSp>")?;
    write!(writer, "<xdr:nvGrpSpPr>")?;
    write_non_visual_props(writer, node.id, &node.name)?;
    write!(writer, "<xdr:cNvGrpSpPr/>")?;
    write!(writer, "</xdr:nvGrpSpPr>")?;
    write!(
        writer,
        r#"<xdr:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></xdr:grpSpPr>"#
    )?;
    write!(writer, "</xdr:grpSp>")
}

fn write_frame<W: Write>(writer: &mut W, node: &FrameNode) -> io::Result<()> {
    write!(writer, "<xdr:graphicFrame>")?;
    write!(writer, "<xdr:nvGraphicFramePr>")?;
    write_non_visual_props(writer, node.id, &node.name)?;
    write!(writer, "<xdr:cNvGraphicFramePr/>")?;
    write!(writer, "</xdr:nvGraphicFramePr>")?;
    write!(
        writer,
        r#"<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>"#
    )?;
    match &node.chart_rel {
        Some(rel) => write!(
            writer,
            r#"<a:graphic><a:graphicData uri="{ns}"><c:chart xmlns:c="{ns}" r:id="{rel}"/></a:graphicData></a:graphic>"#,
            ns = namespace::DML_CHART,
            rel = escape_xml(rel)
        )?,
        None => write!(writer, "<a:graphic><a:graphicData/></a:graphic>")?,
    }
    write!(writer, "</xdr:graphicFrame>")
}

fn write_non_visual_props<W: Write>(writer: &mut W, id: u32, name: &str) -> io::Result<()> {
    write!(
        writer,
        r#"<xdr:cNvPr id="{}" name="{}"/>"#,
        id,
        escape_xml(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_anchors() -> Vec<AnchorNode> {
        let mut sp = SpNode::prototype();
        sp.id = 1;
        sp.name = "Shape 1".to_string();

        let mut pic = PicNode::prototype();
        pic.id = 2;
        pic.name = "Picture 2".to_string();
        pic.blip_rel = Some("rId1".to_string());

        vec![
            AnchorNode {
                from: CellMarker::new(0, 0, 0, 0),
                to: CellMarker::new(2, 2, 0, 0),
                edit_as: EditAs::TwoCell,
                shape: ShapeNode::Shape(sp),
            },
            AnchorNode {
                from: CellMarker::new(3, 4, 100, 200),
                to: CellMarker::new(5, 8, 300, 400),
                edit_as: EditAs::Absolute,
                shape: ShapeNode::Picture(pic),
            },
        ]
    }

    #[test]
    fn test_write_parse_round_trip() {
        let anchors = sample_anchors();

        let mut out = Vec::new();
        write_drawing(&mut out, &anchors).unwrap();

        let parsed = parse_drawing(out.as_slice()).unwrap();
        assert_eq!(parsed, anchors);
    }

    #[test]
    fn test_round_trip_all_shape_kinds() {
        let mut cxn = CxnNode::prototype();
        cxn.id = 1;
        cxn.name = "Connector 1".to_string();

        let mut grp = GroupNode::prototype();
        grp.id = 2;
        grp.name = "Group 2".to_string();

        let mut frame = FrameNode::prototype();
        frame.id = 0;
        frame.name = "Diagramm0".to_string();
        frame.chart_rel = Some("rId1".to_string());

        let mut textbox = SpNode::prototype();
        textbox.id = 4;
        textbox.name = "TextBox 4".to_string();
        textbox.textbox = true;
        textbox.text = Some("hello".to_string());

        let anchors: Vec<AnchorNode> = [
            ShapeNode::Connector(cxn),
            ShapeNode::Group(grp),
            ShapeNode::GraphicFrame(frame),
            ShapeNode::Shape(textbox),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, shape)| AnchorNode {
            from: CellMarker::new(i as u32, i as u32, 0, 0),
            to: CellMarker::new(i as u32 + 2, i as u32 + 2, 0, 0),
            edit_as: EditAs::OneCell,
            shape,
        })
        .collect();

        let mut out = Vec::new();
        write_drawing(&mut out, &anchors).unwrap();
        let parsed = parse_drawing(out.as_slice()).unwrap();
        assert_eq!(parsed, anchors);
    }

    #[test]
    fn test_fixed_namespace_prefixes() {
        let mut out = Vec::new();
        write_drawing(&mut out, &sample_anchors()).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains(r#"xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing""#));
        assert!(xml.contains(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#));
        assert!(xml.contains(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#
        ));
        assert!(xml.contains(r#"<xdr:twoCellAnchor editAs="twoCell">"#));
        assert!(xml.contains("<xdr:clientData/>"));
    }

    #[test]
    fn test_populated_group_keeps_its_own_identity() {
        // Member shapes carry their own cNvPr elements; the group's id and
        // name must come from its nvGrpSpPr, not from the last member.
        let xml = br#"<xdr:wsDr xmlns:xdr="ns"><xdr:twoCellAnchor editAs="twoCell"><xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>2</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:grpSp><xdr:nvGrpSpPr><xdr:cNvPr id="5" name="Group 5"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr><xdr:grpSpPr/><xdr:sp><xdr:nvSpPr><xdr:cNvPr id="6" name="Member 6"/><xdr:cNvSpPr/></xdr:nvSpPr></xdr:sp><xdr:pic><xdr:nvPicPr><xdr:cNvPr id="7" name="Member 7"/><xdr:cNvPicPr/></xdr:nvPicPr></xdr:pic></xdr:grpSp><xdr:clientData/></xdr:twoCellAnchor></xdr:wsDr>"#;

        let parsed = parse_drawing(&xml[..]).unwrap();
        assert_eq!(parsed.len(), 1);
        match &parsed[0].shape {
            ShapeNode::Group(node) => {
                assert_eq!((node.id, node.name.as_str()), (5, "Group 5"));
            },
            other => panic!("unexpected shape node: {other:?}"),
        }
    }

    #[test]
    fn test_nested_group_member_does_not_shadow_outer_identity() {
        let xml = br#"<xdr:wsDr xmlns:xdr="ns"><xdr:twoCellAnchor editAs="twoCell"><xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>2</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:grpSp><xdr:nvGrpSpPr><xdr:cNvPr id="3" name="Outer 3"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr><xdr:grpSpPr/><xdr:grpSp><xdr:nvGrpSpPr><xdr:cNvPr id="4" name="Inner 4"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr><xdr:grpSpPr/></xdr:grpSp></xdr:grpSp><xdr:clientData/></xdr:twoCellAnchor></xdr:wsDr>"#;

        let parsed = parse_drawing(&xml[..]).unwrap();
        match &parsed[0].shape {
            ShapeNode::Group(node) => {
                assert_eq!((node.id, node.name.as_str()), (3, "Outer 3"));
            },
            other => panic!("unexpected shape node: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_root_fails() {
        let err = parse_drawing(&b"<unrelated/>"[..]).unwrap_err();
        assert!(matches!(err, DrawingError::Xml(_)));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_drawing(&b"this is not markup"[..]).is_err());
    }

    #[test]
    fn test_parse_truncated_anchor_fails() {
        let xml = br#"<xdr:wsDr xmlns:xdr="ns"><xdr:twoCellAnchor><xdr:from><xdr:col>1</xdr:col>"#;
        assert!(parse_drawing(&xml[..]).is_err());
    }

    #[test]
    fn test_parse_unknown_edit_as_falls_back() {
        let xml = br#"<xdr:wsDr xmlns:xdr="ns"><xdr:twoCellAnchor editAs="sideways"><xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to><xdr:sp><xdr:nvSpPr><xdr:cNvPr id="1" name="Shape 1"/><xdr:cNvSpPr/></xdr:nvSpPr></xdr:sp><xdr:clientData/></xdr:twoCellAnchor></xdr:wsDr>"#;
        let parsed = parse_drawing(&xml[..]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].edit_as, EditAs::OneCell);
    }
}
