use crate::core::error::AppError;

/// Convert raw rows into domain values, dropping and logging the malformed ones
pub fn map_rows<R, T>(rows: Vec<R>, kind: &str) -> Vec<T>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping malformed {} row: {}", kind, e);
                None
            }
        })
        .collect()
}
