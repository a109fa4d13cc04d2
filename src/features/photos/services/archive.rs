use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::error::{AppError, Result};
use crate::shared::constants::EXPORT_ARCHIVE_SUFFIX;
use crate::shared::validation::sanitize_name;

/// An in-memory zip of exported photos
#[derive(Debug)]
pub struct ExportArchive {
    /// `{sanitized event name}_fotos.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Number of files written
    pub entries: usize,
}

/// Pack `files` (file name, bytes) under a folder named after the event.
///
/// Entries are stored uncompressed; JPEG data does not shrink further.
pub fn build_archive(event_name: &str, files: &[(String, Vec<u8>)]) -> Result<ExportArchive> {
    let folder = sanitize_name(event_name);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (file_name, bytes) in files {
        writer
            .start_file(format!("{}/{}", folder, file_name), options)
            .map_err(|e| AppError::Internal(format!("Failed to add {} to archive: {}", file_name, e)))?;
        writer
            .write_all(bytes)
            .map_err(|e| AppError::Internal(format!("Failed to write {} to archive: {}", file_name, e)))?;
    }

    let bytes = writer
        .finish()
        .map_err(|e| AppError::Internal(format!("Failed to finish archive: {}", e)))?
        .into_inner();

    Ok(ExportArchive {
        file_name: format!("{}{}", folder, EXPORT_ARCHIVE_SUFFIX),
        bytes,
        entries: files.len(),
    })
}
