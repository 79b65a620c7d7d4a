/// Provides the PackURI value type for part names within an OPC package.
///
/// A PackURI always begins with a forward slash and uses forward slashes as
/// path separators, following the OPC specification. It exposes the
/// components the drawing layer needs: the base URI (directory), filename,
/// extension, numeric suffix and relative references between parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/xl/drawings/drawing1.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// Returns an error if the URI does not begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a PackURI by resolving a relative reference against a base URI.
    ///
    /// Translates a reference like "../media/image1.png" onto a base like
    /// "/xl/drawings" to produce "/xl/media/image1.png".
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let joined = if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(Self::normalize_path(&joined))
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/xl/drawings" for "/xl/drawings/drawing1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion of this PackURI.
    ///
    /// For example, "drawing1.xml" for "/xl/drawings/drawing1.xml".
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Get the extension portion of this PackURI, without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Get the numeric suffix for tuple partnames, or None for singletons.
    ///
    /// For example, returns 3 for "/xl/charts/chart3.xml" and None for
    /// "/xl/workbook.xml".
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = match filename.rfind('.') {
            Some(pos) => &filename[..pos],
            None => filename,
        };
        let digits_at = stem.find(|c: char| c.is_ascii_digit())?;
        if digits_at == 0 {
            return None;
        }
        stem[digits_at..].parse::<u32>().ok()
    }

    /// Get the membername (URI with the leading slash stripped).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Get the relative reference from a base URI to this PackURI.
    ///
    /// For example, PackURI("/xl/media/image1.png") yields
    /// "../media/image1.png" for base_uri "/xl/drawings".
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = String::new();
        for _ in common..from_parts.len() {
            result.push_str("../");
        }
        for (i, part) in to_parts.iter().enumerate().skip(common) {
            if i > common {
                result.push('/');
            }
            result.push_str(part);
        }
        result
    }

    /// Get the PackURI of the .rels part corresponding to this PackURI.
    ///
    /// For example, "/xl/drawings/_rels/drawing1.xml.rels" for
    /// "/xl/drawings/drawing1.xml".
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let base_uri = self.base_uri();
        let rels_uri_str = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        Self::new(rels_uri_str)
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Normalize a path, resolving "." and ".." components.
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }
        if parts.is_empty() {
            return "/".to_string();
        }
        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/xl/drawings/drawing1.xml").is_ok());
        assert!(PackURI::new("xl/drawings/drawing1.xml").is_err());
    }

    #[test]
    fn test_base_uri_and_filename() {
        let uri = PackURI::new("/xl/drawings/drawing1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/xl/drawings");
        assert_eq!(uri.filename(), "drawing1.xml");
        assert_eq!(uri.ext(), "xml");
    }

    #[test]
    fn test_idx() {
        let uri = PackURI::new("/xl/charts/chart3.xml").unwrap();
        assert_eq!(uri.idx(), Some(3));

        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(uri.idx(), None);
    }

    #[test]
    fn test_relative_ref() {
        let uri = PackURI::new("/xl/media/image1.png").unwrap();
        assert_eq!(uri.relative_ref("/xl/drawings"), "../media/image1.png");

        let uri = PackURI::new("/xl/charts/chart1.xml").unwrap();
        assert_eq!(uri.relative_ref("/xl/drawings"), "../charts/chart1.xml");
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/xl/drawings", "../media/image1.png").unwrap();
        assert_eq!(uri.as_str(), "/xl/media/image1.png");
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/xl/drawings/drawing1.xml").unwrap();
        assert_eq!(
            uri.rels_uri().unwrap().as_str(),
            "/xl/drawings/_rels/drawing1.xml.rels"
        );
    }
}
