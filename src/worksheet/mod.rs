//! The collaborator surface the owning worksheet supplies to its drawing.
//!
//! The drawing does not own the workbook picture collection, the package
//! part index or the comment storage - the worksheet and package layers do.
//! `SheetHost` bundles those surfaces so a drawing can be attached to them;
//! operations that need them fail with `MissingParent` on a detached
//! drawing.

pub mod comments;
pub mod vml;

use crate::error::{DrawingError, Result};
use crate::opc::constants::content_type;
use crate::opc::packuri::PackURI;
use crate::opc::part::{ChartPart, PictureData};
use comments::CommentsTable;
use vml::VmlDrawing;

/// Registry of parts in the package, indexed for the lookups the drawing
/// needs: counting parts by content type and creating new chart parts.
#[derive(Debug, Default)]
pub struct PackageIndex {
    parts: Vec<(PackURI, String)>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a part in the index.
    pub fn register(&mut self, partname: PackURI, content_type: impl Into<String>) {
        self.parts.push((partname, content_type.into()));
    }

    /// Count parts of the given content type across the whole package.
    pub fn count_by_content_type(&self, content_type: &str) -> usize {
        self.parts.iter().filter(|(_, ct)| ct == content_type).count()
    }

    /// Create a new chart part.
    ///
    /// The numeric suffix of the part name is derived by counting existing
    /// chart-typed parts in the whole package, not just one drawing.
    pub fn create_chart_part(&mut self) -> Result<ChartPart> {
        let number = self.count_by_content_type(content_type::DML_CHART) + 1;
        let partname = PackURI::new(format!("/xl/charts/chart{}.xml", number))
            .map_err(DrawingError::InvalidPartName)?;
        self.register(partname.clone(), content_type::DML_CHART);
        Ok(ChartPart::new(partname))
    }
}

/// What the owning worksheet supplies to its drawing.
#[derive(Debug)]
pub struct SheetHost {
    /// Partname of the drawing part itself
    drawing_partname: PackURI,

    /// The workbook picture collection
    pictures: Vec<PictureData>,

    /// The package part index
    package: PackageIndex,

    /// The worksheet comment table, created on first use
    comments: Option<CommentsTable>,

    /// The worksheet's legacy VML drawing, created on first use
    vml: Option<VmlDrawing>,
}

impl SheetHost {
    pub fn new(drawing_partname: PackURI) -> Self {
        Self {
            drawing_partname,
            pictures: Vec::new(),
            package: PackageIndex::new(),
            comments: None,
            vml: None,
        }
    }

    /// Partname of the drawing part.
    #[inline]
    pub fn drawing_partname(&self) -> &PackURI {
        &self.drawing_partname
    }

    /// Add a picture to the workbook collection, registering its part in
    /// the package index. Returns the picture index.
    pub fn add_picture(&mut self, data: PictureData) -> usize {
        self.package
            .register(data.partname().clone(), data.content_type().to_string());
        self.pictures.push(data);
        self.pictures.len() - 1
    }

    /// Resolve a picture index against the workbook collection.
    #[inline]
    pub fn picture(&self, index: usize) -> Option<&PictureData> {
        self.pictures.get(index)
    }

    /// Number of pictures in the workbook collection.
    #[inline]
    pub fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    /// Get the package part index.
    #[inline]
    pub fn package(&self) -> &PackageIndex {
        &self.package
    }

    /// Get mutable access to the package part index.
    #[inline]
    pub fn package_mut(&mut self) -> &mut PackageIndex {
        &mut self.package
    }

    /// Get the comment table, creating it if absent.
    pub fn comments_table(&mut self) -> &mut CommentsTable {
        self.comments.get_or_insert_with(CommentsTable::new)
    }

    /// Get the comment table if it exists.
    #[inline]
    pub fn try_comments_table(&self) -> Option<&CommentsTable> {
        self.comments.as_ref()
    }

    /// Get the legacy VML drawing, creating it if absent.
    pub fn vml_drawing(&mut self) -> &mut VmlDrawing {
        self.vml.get_or_insert_with(VmlDrawing::new)
    }

    /// Get the legacy VML drawing if it exists.
    #[inline]
    pub fn try_vml_drawing(&self) -> Option<&VmlDrawing> {
        self.vml.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> SheetHost {
        SheetHost::new(PackURI::new("/xl/drawings/drawing1.xml").unwrap())
    }

    #[test]
    fn test_chart_part_numbering_counts_whole_package() {
        let mut host = host();

        // A chart part created by another drawing elsewhere in the package
        host.package_mut().register(
            PackURI::new("/xl/charts/chart1.xml").unwrap(),
            content_type::DML_CHART,
        );

        let part = host.package_mut().create_chart_part().unwrap();
        assert_eq!(part.partname().as_str(), "/xl/charts/chart2.xml");
        assert_eq!(
            host.package().count_by_content_type(content_type::DML_CHART),
            2
        );
    }

    #[test]
    fn test_add_picture_registers_part() {
        let mut host = host();
        let index = host.add_picture(PictureData::new(
            PackURI::new("/xl/media/image1.png").unwrap(),
            content_type::PNG,
            vec![0x89, 0x50, 0x4E, 0x47],
        ));

        assert_eq!(index, 0);
        assert_eq!(host.picture_count(), 1);
        assert_eq!(host.package().count_by_content_type(content_type::PNG), 1);
        assert!(host.picture(1).is_none());
    }

    #[test]
    fn test_comment_storage_created_on_first_use() {
        let mut host = host();
        assert!(host.try_comments_table().is_none());
        assert!(host.try_vml_drawing().is_none());

        host.comments_table().create_comment();
        host.vml_drawing().new_comment_shape();

        assert_eq!(host.try_comments_table().unwrap().len(), 1);
        assert_eq!(host.try_vml_drawing().unwrap().len(), 1);
    }
}
