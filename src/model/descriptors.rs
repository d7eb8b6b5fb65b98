//! Descriptor and identifier rewriting applied to every processed instance.

use super::MedicalImageRecord;
use crate::utils::element_summary;
use dicom::core::{Tag, VR};
use dicom::dictionary_std::tags;

pub const STUDY_SUFFIX: &str = " SeenByAI";
pub const SERIES_SUFFIX: &str = "SeenByAI";
pub const STUDY_FALLBACK: &str = "StudySeenByAI";
pub const SERIES_FALLBACK: &str = "SeriesSeenByAI";
pub const UID_SUFFIX: &str = ".1";

/// Tags the study and series descriptions and derives child UIDs.
///
/// Not idempotent: a second call appends every suffix again. Derived UIDs are
/// not checked against the 64 character UI limit.
pub fn mutate(record: &mut MedicalImageRecord) {
    let study = match record.study_description() {
        Some(current) => format!("{current}{STUDY_SUFFIX}"),
        None => STUDY_FALLBACK.to_string(),
    };
    set_logged(record, tags::STUDY_DESCRIPTION, VR::LO, study);

    let series = match record.series_description() {
        Some(current) => format!("{current}{SERIES_SUFFIX}"),
        None => SERIES_FALLBACK.to_string(),
    };
    set_logged(record, tags::SERIES_DESCRIPTION, VR::LO, series);

    if let Some(uid) = record.study_instance_uid() {
        set_logged(record, tags::STUDY_INSTANCE_UID, VR::UI, uid + UID_SUFFIX);
    }
    if let Some(uid) = record.series_instance_uid() {
        set_logged(record, tags::SERIES_INSTANCE_UID, VR::UI, uid + UID_SUFFIX);
    }
}

fn set_logged(record: &mut MedicalImageRecord, tag: Tag, vr: VR, value: String) {
    if log::log_enabled!(log::Level::Debug) {
        let before = element_summary(record.element(tag), tag);
        record.put_text(tag, vr, value);
        let after = element_summary(record.element(tag), tag);
        log::debug!("{}: {before} -> {after}", record.source().display());
    } else {
        record.put_text(tag, vr, value);
    }
}
