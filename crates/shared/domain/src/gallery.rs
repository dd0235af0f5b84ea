//! Product image gallery stored as a comma-joined file list.

use serde::Serialize;

use crate::constants::{GALLERY_SEPARATOR, MSG_INVALID_IMAGE_INDEX};
use crate::error::{DomainError, DomainResult};
use crate::product::Product;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<String>,
}

impl Gallery {
    /// Parse the stored column value. Blank entries are dropped.
    pub fn parse(stored: Option<&str>) -> Self {
        let images = stored
            .unwrap_or_default()
            .split(GALLERY_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { images }
    }

    pub fn from_images(images: Vec<String>) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn push(&mut self, file_name: impl Into<String>) {
        self.images.push(file_name.into());
    }

    /// Remove the image at `index`, returning its file name.
    pub fn remove(&mut self, index: usize) -> DomainResult<String> {
        if index >= self.images.len() {
            return Err(DomainError::validation(MSG_INVALID_IMAGE_INDEX));
        }
        Ok(self.images.remove(index))
    }

    /// Value to persist; `None` once the gallery is empty.
    pub fn to_stored(&self) -> Option<String> {
        if self.images.is_empty() {
            None
        } else {
            Some(self.images.join(&GALLERY_SEPARATOR.to_string()))
        }
    }
}

/// Outcome of removing one gallery image.
///
/// The metadata change is committed before the file is deleted, so a storage
/// failure is reported here instead of failing the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRemoval {
    pub product: Product,
    pub removed_image: String,
    pub file_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_middle_image() {
        let mut gallery = Gallery::parse(Some("img1.png,img2.png,img3.png"));

        let removed = gallery.remove(1).unwrap();

        assert_eq!(removed, "img2.png");
        assert_eq!(gallery.to_stored().as_deref(), Some("img1.png,img3.png"));
    }

    #[test]
    fn test_remove_out_of_range_is_invalid_index() {
        let mut gallery = Gallery::parse(Some("img1.png"));
        assert_eq!(
            gallery.remove(1),
            Err(DomainError::validation("Invalid image index"))
        );
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_parse_tolerates_blanks_and_spaces() {
        let gallery = Gallery::parse(Some(" a.png, ,b.png,"));
        assert_eq!(gallery.images(), ["a.png", "b.png"]);
        assert!(Gallery::parse(None).is_empty());
    }

    #[test]
    fn test_emptied_gallery_stores_null() {
        let mut gallery = Gallery::parse(Some("only.png"));
        gallery.remove(0).unwrap();
        assert_eq!(gallery.to_stored(), None);
    }
}
