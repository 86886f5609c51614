//! Client-side checks mirroring the server's folder and upload rules.

use super::model::{Folder, ROOT_FOLDER_ID};
use crate::config::{MAX_FILE_SIZE_BYTES, MAX_FILES_PER_UPLOAD};
use crate::error::ValidationError;

pub const MAX_FOLDER_NAME_LEN: usize = 60;
const FORBIDDEN_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Validates a new folder name against the existing folders.
///
/// Returns the trimmed name on success.
pub fn validate_folder_name(name: &str, existing: &[Folder]) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidFolderName(
            "Folder name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(ValidationError::InvalidFolderName(format!(
            "Folder name too long (max {})",
            MAX_FOLDER_NAME_LEN
        )));
    }
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(ValidationError::InvalidFolderName(
            r#"Folder name cannot include \ / : * ? " < > |"#.to_string(),
        ));
    }
    let lower = name.to_lowercase();
    if existing.iter().any(|f| f.name.to_lowercase() == lower) {
        return Err(ValidationError::DuplicateFolderName(name.to_string()));
    }
    Ok(name.to_string())
}

pub fn ensure_deletable(folder_id: &str) -> Result<(), ValidationError> {
    if folder_id == ROOT_FOLDER_ID {
        return Err(ValidationError::RootFolderProtected);
    }
    Ok(())
}

/// Checks an upload batch given `(file name, size in bytes)` pairs.
pub fn validate_upload<'a, I>(folder_id: &str, files: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut count = 0;
    for (name, size) in files {
        count += 1;
        if size > MAX_FILE_SIZE_BYTES {
            return Err(ValidationError::FileTooLarge {
                name: name.to_string(),
                size,
                max: MAX_FILE_SIZE_BYTES,
            });
        }
    }
    if count == 0 {
        return Err(ValidationError::NoFiles {
            folder_id: folder_id.to_string(),
        });
    }
    if count > MAX_FILES_PER_UPLOAD {
        return Err(ValidationError::TooManyFiles {
            count,
            max: MAX_FILES_PER_UPLOAD,
        });
    }
    Ok(())
}
