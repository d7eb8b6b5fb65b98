#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicomwatch::{PathPair, PipelineConfig};
use tempfile::TempDir;

pub const STUDY_UID: &str = "1.2.826.0.1.3680043.8.498.1";
pub const SERIES_UID: &str = "1.2.826.0.1.3680043.8.498.2";

pub struct Roots {
    _dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Roots {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("INPUT");
        let output = dir.path().join("OUTPUT");
        fs::create_dir_all(&input).unwrap();
        Self {
            _dir: dir,
            input,
            output,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(PathPair::new(&self.input, &self.output));
        config.poll_interval = Duration::from_millis(100);
        config
    }
}

/// Writes a 64x64 8-bit MONOCHROME2 instance. `pixel_len` overrides the payload size.
pub fn write_instance(path: &Path, pixel_len: Option<usize>) {
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
        PrimitiveValue::from("1.2.826.0.1.3680043.8.498.3"),
    );
    put(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("PAT042"));
    put(tags::STUDY_DESCRIPTION, VR::LO, PrimitiveValue::from("Chest CT"));
    put(tags::SERIES_DESCRIPTION, VR::LO, PrimitiveValue::from("Axial"));
    put(tags::STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from(STUDY_UID));
    put(tags::SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(SERIES_UID));
    put(tags::ROWS, VR::US, PrimitiveValue::from(64_u16));
    put(tags::COLUMNS, VR::US, PrimitiveValue::from(64_u16));
    put(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16));
    put(tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16));
    put(tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16));
    put(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16));
    put(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16));
    put(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    );
    let len = pixel_len.unwrap_or(64 * 64);
    put(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::U8(vec![0u8; len].into()),
    );

    let file = object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("1.2.826.0.1.3680043.8.498.3"),
        )
        .unwrap();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    file.write_to_file(path).unwrap();
}

pub fn wait_for(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}
