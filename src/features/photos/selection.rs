use std::collections::HashSet;

use uuid::Uuid;

use crate::features::photos::models::Photo;

/// Set of photo ids picked in the gallery
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip one id in or out of the selection
    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select every photo unless all are already selected, in which case
    /// clear. An empty gallery always clears.
    pub fn toggle_all(&mut self, photos: &[Photo]) {
        if !photos.is_empty() && self.ids.len() < photos.len() {
            self.ids = photos.iter().map(|photo| photo.id).collect();
        } else {
            self.ids.clear();
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.ids.remove(&id);
    }

    /// Forget ids whose photo is no longer in `photos`
    pub fn retain_present(&mut self, photos: &[Photo]) {
        let present: HashSet<Uuid> = photos.iter().map(|photo| photo.id).collect();
        self.ids.retain(|id| present.contains(id));
    }

    /// Photos to act on: the selected ones in list order, or the whole list
    /// when nothing is selected
    pub fn targets(&self, photos: &[Photo]) -> Vec<Photo> {
        if self.ids.is_empty() {
            return photos.to_vec();
        }
        photos
            .iter()
            .filter(|photo| self.ids.contains(&photo.id))
            .cloned()
            .collect()
    }
}
