use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, Tag, VR};
use dicom::dictionary_std::tags;
use dicom::object::mem::InMemElement;
use dicom::object::DefaultDicomObject;

use crate::path_mapper::staging_path;

/// A decoded DICOM instance together with the path it was read from.
///
/// Descriptive fields are probed through [`MedicalImageRecord::text`], which
/// treats padding-only values the same as absent ones.
#[derive(Debug, Clone)]
pub struct MedicalImageRecord {
    source: PathBuf,
    object: DefaultDicomObject,
}

/// Identifiers used to tell instances apart in log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub patient_id: String,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub sop_instance_uid: String,
}

impl MedicalImageRecord {
    pub fn new(source: PathBuf, object: DefaultDicomObject) -> Self {
        Self { source, object }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn object(&self) -> &DefaultDicomObject {
        &self.object
    }

    pub fn element(&self, tag: Tag) -> Option<&InMemElement> {
        self.object.element(tag).ok()
    }

    /// Trimmed string value of `tag`, or `None` when absent or blank.
    pub fn text(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .and_then(|element| element.to_str().ok())
            .map(|value| value.trim_matches(['\0', ' ']).to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn put_text(&mut self, tag: Tag, vr: VR, value: String) {
        self.object
            .put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }

    pub fn put_element(&mut self, element: InMemElement) {
        self.object.put(element);
    }

    pub fn study_description(&self) -> Option<String> {
        self.text(tags::STUDY_DESCRIPTION)
    }

    pub fn series_description(&self) -> Option<String> {
        self.text(tags::SERIES_DESCRIPTION)
    }

    pub fn study_instance_uid(&self) -> Option<String> {
        self.text(tags::STUDY_INSTANCE_UID)
    }

    pub fn series_instance_uid(&self) -> Option<String> {
        self.text(tags::SERIES_INSTANCE_UID)
    }

    pub fn transfer_syntax(&self) -> &str {
        self.object.meta().transfer_syntax()
    }

    pub fn key(&self) -> RecordKey {
        let text_or_unknown =
            |tag: Tag| self.text(tag).unwrap_or_else(|| "Unknown".to_string());
        RecordKey {
            patient_id: text_or_unknown(tags::PATIENT_ID),
            study_instance_uid: text_or_unknown(tags::STUDY_INSTANCE_UID),
            series_instance_uid: text_or_unknown(tags::SERIES_INSTANCE_UID),
            sop_instance_uid: text_or_unknown(tags::SOP_INSTANCE_UID),
        }
    }

    /// Encodes the record, file meta group included, to `path`.
    ///
    /// The bytes go to a hidden sibling first and are renamed into place, so
    /// `path` never holds a partial instance.
    pub fn write_to_file(&self, path: &Path) -> Result<(), String> {
        let staged = staging_path(path);
        let result = self
            .object
            .write_to_file(&staged)
            .map_err(|err| err.to_string())
            .and_then(|()| fs::rename(&staged, path).map_err(|err| err.to_string()));
        if result.is_err() && staged.exists() {
            if let Err(err) = fs::remove_file(&staged) {
                log::warn!("Unable to remove {}: {err}", staged.display());
            }
        }
        result
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatientID={} StudyInstanceUID={} SeriesInstanceUID={} SOPInstanceUID={}",
            self.patient_id, self.study_instance_uid, self.series_instance_uid, self.sop_instance_uid
        )
    }
}
