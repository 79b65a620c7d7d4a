use crate::opc::constants::namespace;
use crate::opc::packuri::PackURI;
/// Payload handles for parts the drawing links to.
///
/// The drawing itself does not store part bytes - the package collaborator
/// does - but each resource link keeps a handle to the linked part so a
/// shape node can later be resolved to its bytes. Picture bytes are shared
/// via Arc so registering a link never copies image data.
use std::sync::Arc;

/// Handle to a picture part in the workbook picture collection.
#[derive(Debug, Clone)]
pub struct PictureData {
    /// The partname (URI) of the picture part
    partname: PackURI,

    /// The content type of the picture part (e.g., "image/png")
    content_type: String,

    /// The picture bytes (shared via Arc for cheap handle cloning)
    blob: Arc<Vec<u8>>,
}

impl PictureData {
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            blob: Arc::new(blob),
        }
    }

    /// Get the partname of the picture part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the content type of the picture part.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the picture bytes.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }
}

/// A newly created chart part.
///
/// Created by the worksheet's package index when a graphic frame is set up
/// to host a chart. Carries the default chart-space skeleton; populating
/// the chart content is the chart model's concern, not the drawing's.
#[derive(Debug, Clone)]
pub struct ChartPart {
    /// The partname (URI) of the chart part
    partname: PackURI,

    /// The chart-space XML bytes
    xml: Vec<u8>,
}

impl ChartPart {
    pub fn new(partname: PackURI) -> Self {
        Self {
            partname,
            xml: default_chart_space().into_bytes(),
        }
    }

    /// Get the partname of the chart part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the chart-space XML bytes.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.xml
    }
}

/// Build the empty chart-space skeleton stamped into a new chart part.
fn default_chart_space() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<c:chartSpace xmlns:c="{c}" xmlns:a="{a}" xmlns:r="{r}">"#,
            r#"<c:chart><c:plotArea><c:layout/></c:plotArea>"#,
            r#"<c:plotVisOnly val="1"/></c:chart></c:chartSpace>"#
        ),
        c = namespace::DML_CHART,
        a = namespace::DML_MAIN,
        r = namespace::OFC_RELATIONSHIPS,
    )
}
