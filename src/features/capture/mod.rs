//! Guest camera flow: acquire a stream, grab a frame, encode it as JPEG and
//! hand it to [`PhotoService::submit_capture`](crate::features::photos::PhotoService::submit_capture).
//!
//! Browsers and native shells plug in through [`CameraDevice`]; the HTTP
//! surface accepts already-encoded captures at `POST /api/events/{id}/photos`.

pub mod camera;
pub mod encoder;
pub mod session;

pub use camera::{CameraDevice, FacingMode, Frame, MediaStream, MediaTrack, StreamGuard};
pub use session::{CaptureSession, CaptureState};
