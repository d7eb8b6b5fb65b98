use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject};

/// Shape and descriptor values of a synthetic secondary-capture instance.
#[derive(Debug, Clone)]
pub(crate) struct SampleSpec {
    pub study_description: Option<&'static str>,
    pub series_description: Option<&'static str>,
    pub study_uid: Option<&'static str>,
    pub series_uid: Option<&'static str>,
    pub rows: u16,
    pub columns: u16,
    pub bits_allocated: u16,
    pub samples_per_pixel: u16,
    /// Defaults to `bits_allocated`.
    pub bits_stored: Option<u16>,
    pub pixel_representation: u16,
    pub frames: Option<&'static str>,
    pub transfer_syntax: &'static str,
    /// Overrides the generated zero-filled payload.
    pub pixel_bytes: Option<Vec<u8>>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            study_description: Some("Chest CT"),
            series_description: Some("Axial"),
            study_uid: Some("1.2.826.0.1.3680043.2.1125.1"),
            series_uid: Some("1.2.826.0.1.3680043.2.1125.2"),
            rows: 64,
            columns: 64,
            bits_allocated: 8,
            samples_per_pixel: 1,
            bits_stored: None,
            pixel_representation: 0,
            frames: None,
            transfer_syntax: uids::EXPLICIT_VR_LITTLE_ENDIAN,
            pixel_bytes: None,
        }
    }
}

pub(crate) fn sample_object(spec: &SampleSpec) -> DefaultDicomObject {
    let mut object = InMemDicomObject::new_empty();
    let mut put = |tag, vr, value: PrimitiveValue| {
        object.put(DataElement::new(tag, vr, value));
    };

    put(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
    );
    put(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from("1.2.826.0.1.3680043.2.1125.3"),
    );
    put(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("PAT001"));
    put(tags::SERIES_NUMBER, VR::IS, PrimitiveValue::from("1"));
    if let Some(value) = spec.study_description {
        put(tags::STUDY_DESCRIPTION, VR::LO, PrimitiveValue::from(value));
    }
    if let Some(value) = spec.series_description {
        put(tags::SERIES_DESCRIPTION, VR::LO, PrimitiveValue::from(value));
    }
    if let Some(value) = spec.study_uid {
        put(tags::STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from(value));
    }
    if let Some(value) = spec.series_uid {
        put(tags::SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(value));
    }

    let photometric = if spec.samples_per_pixel == 3 {
        "RGB"
    } else {
        "MONOCHROME2"
    };
    put(tags::ROWS, VR::US, PrimitiveValue::from(spec.rows));
    put(tags::COLUMNS, VR::US, PrimitiveValue::from(spec.columns));
    put(
        tags::BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(spec.bits_allocated),
    );
    let bits_stored = spec.bits_stored.unwrap_or(spec.bits_allocated);
    put(tags::BITS_STORED, VR::US, PrimitiveValue::from(bits_stored));
    put(tags::HIGH_BIT, VR::US, PrimitiveValue::from(bits_stored - 1));
    put(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(spec.pixel_representation),
    );
    put(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(spec.samples_per_pixel),
    );
    put(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from(photometric),
    );
    if spec.samples_per_pixel == 3 {
        put(tags::PLANAR_CONFIGURATION, VR::US, PrimitiveValue::from(0_u16));
    }
    if let Some(frames) = spec.frames {
        put(tags::NUMBER_OF_FRAMES, VR::IS, PrimitiveValue::from(frames));
    }

    let frame_count = spec
        .frames
        .and_then(|frames| frames.parse::<usize>().ok())
        .unwrap_or(1);
    let len = frame_count
        * spec.rows as usize
        * spec.columns as usize
        * spec.samples_per_pixel as usize
        * (spec.bits_allocated as usize / 8);
    let bytes = spec.pixel_bytes.clone().unwrap_or_else(|| vec![0u8; len]);
    if spec.bits_allocated == 16 {
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        put(tags::PIXEL_DATA, VR::OW, PrimitiveValue::U16(words.into()));
    } else {
        put(tags::PIXEL_DATA, VR::OB, PrimitiveValue::U8(bytes.into()));
    }

    object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(spec.transfer_syntax)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1125.3"),
        )
        .expect("sample meta group is complete")
}
