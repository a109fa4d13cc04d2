// =============================================================================
// STORAGE
// =============================================================================

/// MIME type of every captured photo
pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// File extension used in photo storage paths
pub const PHOTO_EXTENSION: &str = "jpg";

/// JPEG quality factor for captured frames (0-100)
pub const CAPTURE_JPEG_QUALITY: u8 = 80;

/// Maximum accepted size of an uploaded capture (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Contributor tag recorded when a guest does not identify themselves
pub const DEFAULT_CONTRIBUTOR: &str = "guest";

/// Suffix appended to the sanitized event name for export archives
pub const EXPORT_ARCHIVE_SUFFIX: &str = "_fotos.zip";

// =============================================================================
// EVENTS
// =============================================================================

pub const EVENT_NAME_MAX_LENGTH: u64 = 120;

/// Side length in pixels of the rendered join QR code
pub const QR_CODE_MIN_SIZE: u32 = 200;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const MSG_EVENT_CODE_REQUIRED: &str = "Por favor, insira o código do evento";
pub const MSG_EVENT_NOT_FOUND: &str = "Evento não encontrado";
pub const MSG_PHOTO_NOT_FOUND: &str = "Foto não encontrada";
pub const MSG_NOT_EVENT_OWNER: &str = "Você não tem permissão para gerenciar este evento";
pub const MSG_NO_PHOTOS_TO_EXPORT: &str = "Nenhuma foto para exportar";
pub const MSG_EMPTY_GALLERY: &str = "Nenhuma foto foi adicionada a este evento ainda.";
