use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::capture::camera::{CameraDevice, FacingMode, Frame, StreamGuard};
use crate::features::capture::encoder::encode_jpeg_blocking;
use crate::features::photos::models::Photo;
use crate::features::photos::services::PhotoService;
use crate::shared::constants::CAPTURE_JPEG_QUALITY;
use crate::shared::notification::{Notification, Notifier};

const CAMERA_ERROR_TITLE: &str = "Erro ao acessar a câmera";
const SAVE_ERROR_TITLE: &str = "Erro ao salvar foto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No camera stream held
    Idle,
    Requesting,
    /// Preview running; ready to capture
    Live,
    Capturing,
    Uploading,
}

/// Camera view model for a guest on an event page.
///
/// Holds the camera stream between `open` and `close`; the stream is also
/// released when the session is dropped.
pub struct CaptureSession {
    event_id: Uuid,
    camera: Arc<dyn CameraDevice>,
    photos: Arc<PhotoService>,
    notifier: Arc<dyn Notifier>,
    facing: FacingMode,
    contributor: Option<String>,
    stream: Option<StreamGuard>,
    state: watch::Sender<CaptureState>,
}

impl CaptureSession {
    pub fn new(
        event_id: Uuid,
        camera: Arc<dyn CameraDevice>,
        photos: Arc<PhotoService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(CaptureState::Idle);
        Self {
            event_id,
            camera,
            photos,
            notifier,
            facing: FacingMode::default(),
            contributor: None,
            stream: None,
            state,
        }
    }

    /// Tag captures with a contributor name instead of "guest"
    pub fn with_contributor(mut self, name: impl Into<String>) -> Self {
        self.contributor = Some(name.into());
        self
    }

    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    pub fn state(&self) -> CaptureState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CaptureState> {
        self.state.subscribe()
    }

    fn set_state(&self, next: CaptureState) {
        let previous = self.state.send_replace(next);
        debug!("Capture state {:?} -> {:?}", previous, next);
    }

    /// Request the camera. Only valid from `Idle`.
    pub async fn open(&mut self) {
        if self.state() != CaptureState::Idle {
            debug!("Ignoring open in state {:?}", self.state());
            return;
        }

        self.set_state(CaptureState::Requesting);
        match self.camera.open(self.facing).await {
            Ok(stream) => {
                self.stream = Some(StreamGuard::new(stream));
                self.set_state(CaptureState::Live);
            }
            Err(e) => {
                warn!("Camera unavailable: {}", e);
                self.set_state(CaptureState::Idle);
                self.notifier
                    .notify(Notification::error(CAMERA_ERROR_TITLE, &e));
            }
        }
    }

    /// Grab the preview frame, encode it and upload it.
    ///
    /// Returns the stored photo, or `None` after sending an error
    /// notification. Losing the stream ends the session; encode and upload
    /// failures leave the camera live for a retry.
    pub async fn capture(&mut self) -> Option<Photo> {
        if self.state() != CaptureState::Live {
            debug!("Ignoring capture in state {:?}", self.state());
            return None;
        }

        self.set_state(CaptureState::Capturing);
        let grabbed = match self.stream.as_mut() {
            Some(guard) => guard.current_frame(),
            None => Err(AppError::Device("Camera stream not attached".to_string())),
        };
        let frame = match grabbed {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Lost camera stream during capture: {}", e);
                self.close();
                self.notifier
                    .notify(Notification::error(CAMERA_ERROR_TITLE, &e));
                return None;
            }
        };

        match self.encode_and_upload(frame).await {
            Ok(photo) => {
                self.set_state(CaptureState::Live);
                self.notifier.notify(Notification::success(
                    "Foto capturada com sucesso!",
                    Some("Sua foto foi adicionada à galeria do evento.".to_string()),
                ));
                Some(photo)
            }
            Err(e) => {
                self.set_state(CaptureState::Live);
                self.notifier
                    .notify(Notification::error(SAVE_ERROR_TITLE, &e));
                None
            }
        }
    }

    async fn encode_and_upload(&self, frame: Frame) -> Result<Photo> {
        let jpeg = encode_jpeg_blocking(frame, CAPTURE_JPEG_QUALITY).await?;

        self.set_state(CaptureState::Uploading);
        self.photos
            .submit_capture(self.event_id, jpeg, self.contributor.clone())
            .await
    }

    /// Stop every track and return to `Idle`
    pub fn close(&mut self) {
        if let Some(mut guard) = self.stream.take() {
            guard.release();
        }
        self.set_state(CaptureState::Idle);
    }
}
