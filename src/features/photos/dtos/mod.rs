mod photo_dto;

pub use photo_dto::{DeletePhotoResponseDto, ExportRequestDto, PhotoResponseDto, UploadPhotoDto};
