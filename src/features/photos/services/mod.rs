mod archive;
mod photo_service;

pub use archive::{build_archive, ExportArchive};
pub use photo_service::PhotoService;
