//! The worksheet's comment table.
//!
//! Comment records live in their own worksheet part; the drawing only
//! creates entries here when a cell comment is added, and binds the record
//! to a legacy VML shape for positioning.

/// A single comment record.
#[derive(Debug, Clone, Default)]
pub struct CommentRecord {
    /// Row of the commented cell (0-based)
    pub row: u32,
    /// Column of the commented cell (0-based)
    pub col: u32,
    /// Index into the author list
    pub author_id: u32,
    /// Comment text
    pub text: String,
}

/// Ordered collection of comment records plus the author list.
#[derive(Debug, Default)]
pub struct CommentsTable {
    comments: Vec<CommentRecord>,
    authors: Vec<String>,
}

impl CommentsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default comment record, returning its index.
    pub fn create_comment(&mut self) -> usize {
        self.comments.push(CommentRecord::default());
        self.comments.len() - 1
    }

    /// Get a comment record by index.
    #[inline]
    pub fn comment(&self, index: usize) -> Option<&CommentRecord> {
        self.comments.get(index)
    }

    /// Get a mutable comment record by index.
    #[inline]
    pub fn comment_mut(&mut self, index: usize) -> Option<&mut CommentRecord> {
        self.comments.get_mut(index)
    }

    /// Find an author's id, adding the author if absent.
    pub fn find_author(&mut self, author: &str) -> u32 {
        match self.authors.iter().position(|a| a == author) {
            Some(pos) => pos as u32,
            None => {
                self.authors.push(author.to_string());
                (self.authors.len() - 1) as u32
            },
        }
    }

    /// Number of comment records.
    #[inline]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Check if the table holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
