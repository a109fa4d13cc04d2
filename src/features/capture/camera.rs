use async_trait::async_trait;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// Which physical camera to request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

/// One preview frame as an RGBA raster
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

/// A single video track of an acquired stream
pub trait MediaTrack: Send {
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// An acquired camera stream
pub trait MediaStream: Send {
    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>];

    /// Copy the frame currently shown in the preview
    fn current_frame(&mut self) -> Result<Frame>;
}

/// Source of camera streams.
///
/// `open` fails with a device error when permission is denied or no camera is
/// available.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>>;
}

/// Owns an open stream and stops its tracks when released or dropped
pub struct StreamGuard {
    stream: Option<Box<dyn MediaStream>>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn current_frame(&mut self) -> Result<Frame> {
        match self.stream.as_mut() {
            Some(stream) => stream.current_frame(),
            None => Err(AppError::Device(
                "Camera stream already released".to_string(),
            )),
        }
    }

    /// Stop every live track. Later calls are no-ops.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let mut stopped = 0;
            for track in stream.tracks_mut() {
                if track.is_live() {
                    track.stop();
                    stopped += 1;
                }
            }
            debug!("Camera stream released, {} tracks stopped", stopped);
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}
