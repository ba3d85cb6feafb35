use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use super::DiscoveredPhoto;

/// Ordered, append-only sequence of discovered photos.
///
/// Clones share the same storage. The gallery and every lightbox session
/// hold clones, so they always observe a prefix of the final sweep order.
/// Everything runs on the GTK main thread, hence `Rc` rather than `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    photos: Rc<RefCell<Vec<DiscoveredPhoto>>>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a photo and return its position.
    pub fn push(&self, photo: DiscoveredPhoto) -> usize {
        let mut photos = self.photos.borrow_mut();
        photos.push(photo);
        photos.len() - 1
    }

    pub fn len(&self) -> usize {
        self.photos.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.borrow().is_empty()
    }

    pub fn get(&self, position: usize) -> Option<DiscoveredPhoto> {
        self.photos.borrow().get(position).cloned()
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.photos.borrow().iter().position(|photo| photo.path == path)
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<DiscoveredPhoto> {
        self.photos.borrow().clone()
    }

    /// True when both handles refer to the same underlying set.
    #[cfg(test)]
    pub fn same_set(&self, other: &PhotoSet) -> bool {
        Rc::ptr_eq(&self.photos, &other.photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Extension;
    use std::path::PathBuf;

    fn photo(index: u32, name: &str) -> DiscoveredPhoto {
        DiscoveredPhoto {
            index,
            extension: Extension::Jpg,
            path: PathBuf::from(name),
            width: 1,
            height: 1,
            thumbnail: None,
        }
    }

    #[test]
    fn test_clones_share_appends() {
        let set = PhotoSet::new();
        let reader = set.clone();

        assert_eq!(set.push(photo(1, "photo1.jpg")), 0);
        assert_eq!(set.push(photo(4, "photo4.jpg")), 1);

        assert_eq!(reader.len(), 2);
        assert!(reader.same_set(&set));
        assert_eq!(reader.position_of(Path::new("photo4.jpg")), Some(1));
        assert_eq!(reader.get(0).map(|p| p.index), Some(1));
    }

    #[test]
    fn test_separate_sets_are_distinct() {
        let a = PhotoSet::new();
        let b = PhotoSet::new();
        a.push(photo(1, "photo1.jpg"));
        assert!(b.is_empty());
        assert!(!a.same_set(&b));
        assert_eq!(b.position_of(Path::new("photo1.jpg")), None);
    }
}
