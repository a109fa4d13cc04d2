//! Gallery view model for the host's event page.
//!
//! Holds the loaded photo list and the selection, and reports the outcome of
//! every action through a [`Notifier`].

use std::sync::Arc;

use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::models::Event;
use crate::features::photos::models::Photo;
use crate::features::photos::selection::Selection;
use crate::features::photos::services::{ExportArchive, PhotoService};
use crate::shared::constants::MSG_EMPTY_GALLERY;
use crate::shared::notification::{Notification, Notifier};

pub struct Gallery {
    event: Event,
    service: Arc<PhotoService>,
    notifier: Arc<dyn Notifier>,
    photos: Vec<Photo>,
    selection: Selection,
}

impl Gallery {
    pub fn new(event: Event, service: Arc<PhotoService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            event,
            service,
            notifier,
            photos: Vec::new(),
            selection: Selection::new(),
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Loaded photos, most recent first
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Text shown in place of the grid when the event has no photos
    pub fn empty_state_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(MSG_EMPTY_GALLERY)
    }

    pub fn can_export(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Label for the export action: selected count, or the whole gallery
    pub fn selection_summary(&self) -> String {
        if self.selection.is_empty() {
            "Exportar todas".to_string()
        } else {
            format!("Exportar {} selecionadas", self.selection.len())
        }
    }

    /// Reload the photo list and drop selected ids that are gone. On
    /// failure the previous list is kept.
    pub async fn refresh(&mut self) {
        match self.service.list_photos(self.event.id).await {
            Ok(photos) => {
                self.selection.retain_present(&photos);
                self.photos = photos;
            }
            Err(e) => self
                .notifier
                .notify(Notification::error("Erro ao carregar fotos", &e)),
        }
    }

    pub fn toggle(&mut self, photo_id: Uuid) {
        self.selection.toggle(photo_id);
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.photos);
    }

    /// Delete one photo through the owner-checked service call and drop it
    /// from the list and the selection
    pub async fn delete_photo(&mut self, photo_id: Uuid, host: &AuthenticatedUser) {
        match self
            .service
            .delete_photo(self.event.id, photo_id, host)
            .await
        {
            Ok(()) => {
                self.photos.retain(|photo| photo.id != photo_id);
                self.selection.remove(photo_id);
                self.notifier
                    .notify(Notification::success("Foto excluída com sucesso", None));
            }
            Err(e) => self
                .notifier
                .notify(Notification::error("Erro ao excluir foto", &e)),
        }
    }

    /// Export the selection, or every photo when nothing is selected.
    ///
    /// Returns the archive for the caller to save; `None` when the export
    /// failed and an error notification was sent.
    pub async fn export(&self) -> Option<ExportArchive> {
        let targets = self.selection.targets(&self.photos);

        match self.service.export(&self.event, &targets).await {
            Ok(archive) => {
                self.notifier.notify(Notification::success(
                    "Exportação concluída",
                    Some(format!("{} fotos exportadas com sucesso.", archive.entries)),
                ));
                Some(archive)
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::error("Erro ao exportar fotos", &e));
                None
            }
        }
    }
}
