use super::MedicalImageRecord;
use crate::error::NotAMedicalImage;
use dicom::object::open_file;
use std::path::Path;

/// Decodes the file at `path` as a DICOM instance.
///
/// Every failure (unreadable file, missing preamble, truncated dataset,
/// unknown transfer syntax) maps to [`NotAMedicalImage`]. A file that is still
/// being copied into the watched tree simply fails to decode here and is picked
/// up again by the next modification event.
pub fn classify(path: &Path) -> Result<MedicalImageRecord, NotAMedicalImage> {
    if !path.is_file() {
        return Err(NotAMedicalImage {
            path: path.to_path_buf(),
            reason: String::from("not a regular file"),
        });
    }

    let object = open_file(path).map_err(|err| NotAMedicalImage {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    let record = MedicalImageRecord::new(path.to_path_buf(), object);
    log::debug!("Loaded DICOM file {}: {}", path.display(), record.key());
    Ok(record)
}
