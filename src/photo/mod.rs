mod range;

use std::fmt;
use std::rc::Rc;

pub use range::{chronological_range, PhotoIdSet};

/// Opaque, stable photo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(Rc<str>);

impl PhotoId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Rc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

/// Canonical, chronologically ordered photo ids as supplied by the data layer.
///
/// Cloning shares the underlying storage. Growth and refresh produce a new
/// sequence; positions are never cached across either.
#[derive(Debug, Clone, Default)]
pub struct PhotoSequence {
    ids: Rc<[PhotoId]>,
}

impl PhotoSequence {
    pub fn new(ids: Vec<PhotoId>) -> Self {
        Self { ids: ids.into() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[PhotoId] {
        &self.ids
    }

    /// Returns a sequence with `page` appended at the tail (older items).
    pub fn appended(&self, page: impl IntoIterator<Item = PhotoId>) -> Self {
        let mut ids = self.ids.to_vec();
        ids.extend(page);
        Self::new(ids)
    }

    /// Stable index lookup, recomputed from the current contents.
    pub fn position_of(&self, id: &PhotoId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.position_of(id).is_some()
    }
}

impl FromIterator<PhotoId> for PhotoSequence {
    fn from_iter<T: IntoIterator<Item = PhotoId>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
