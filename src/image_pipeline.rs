use std::convert::Infallible;

use dicom::core::value::{PrimitiveValue, Value};
use dicom::core::{DataElement, Tag};
use dicom::dictionary_std::tags;
use dicom::object::mem::InMemElement;
use dicom::pixeldata::{
    ConvertOptions, DecodedPixelData, ModalityLutOption, PixelDecoder, PixelRepresentation,
    PlanarConfiguration,
};
use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::error::PixelShapeError;
use crate::model::MedicalImageRecord;

pub const DEFAULT_TEXT: &str = "seen by AI";

/// Horizontal shift of the text anchor left of the image centre.
const TEXT_OFFSET: i32 = 40;

/// Offsets at which the glyph mask is repeated to get a two pixel stroke.
const STROKE: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Burns a text marker into the first (and only) frame of a native pixel payload.
pub struct PixelAnnotator;

impl PixelAnnotator {
    /// Draws `text` near the image centre and replaces the record's pixel data.
    ///
    /// The record is left untouched when an error is returned.
    pub fn annotate(record: &mut MedicalImageRecord, text: &str) -> Result<(), PixelShapeError> {
        let vr = native_pixel_data(record)?.vr();
        let (layout, mut raster) = {
            let decoded = decode(record)?;
            let layout = PixelLayout::from_decoded(&decoded)?;
            let raster = Raster::from_decoded(&decoded, &layout)?;
            (layout, raster)
        };

        let max_dimension = layout.shape().into_iter().max().unwrap_or(0) as i32;
        let origin = Point::new(max_dimension / 2 - TEXT_OFFSET, max_dimension / 2);
        raster.draw_text(text, origin);

        record.put_element(DataElement::new(tags::PIXEL_DATA, vr, raster.into_value()));
        Ok(())
    }
}

/// Image pixel module attributes needed to interpret a native payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelLayout {
    pub rows: usize,
    pub columns: usize,
    pub samples_per_pixel: usize,
    pub frames: usize,
    pub bits_allocated: usize,
    pub bits_stored: usize,
    pub signed: bool,
}

impl PixelLayout {
    pub fn from_record(record: &MedicalImageRecord) -> Result<Self, PixelShapeError> {
        Self::from_decoded(&decode(record)?)
    }

    fn from_decoded(decoded: &DecodedPixelData<'_>) -> Result<Self, PixelShapeError> {
        let unsupported = |reason: String| Err(PixelShapeError::UnsupportedLayout(reason));

        let rows = dimension("rows", decoded.rows())?;
        let columns = dimension("columns", decoded.columns())?;
        let bits_allocated = usize::from(decoded.bits_allocated());
        let samples_per_pixel = usize::from(decoded.samples_per_pixel());
        let frames = decoded.number_of_frames() as usize;
        let bits_stored = match usize::from(decoded.bits_stored()) {
            bits if bits > 0 && bits <= bits_allocated => bits,
            _ => bits_allocated,
        };

        if rows == 0 || columns == 0 {
            return unsupported(format!("empty image {rows}x{columns}"));
        }
        if bits_allocated != 8 && bits_allocated != 16 {
            return unsupported(format!("{bits_allocated} bits allocated"));
        }
        if samples_per_pixel != 1 && samples_per_pixel != 3 {
            return unsupported(format!("{samples_per_pixel} samples per pixel"));
        }
        if samples_per_pixel == 3 && decoded.planar_configuration() == PlanarConfiguration::PixelFirst
        {
            return unsupported(String::from("colour planes stored separately"));
        }
        if frames != 1 {
            return unsupported(format!("{frames} frames, expected a single frame"));
        }

        Ok(Self {
            rows,
            columns,
            samples_per_pixel,
            frames,
            bits_allocated,
            bits_stored,
            signed: decoded.pixel_representation() == PixelRepresentation::Signed,
        })
    }

    /// Byte length of the declared shape, without the trailing pad byte.
    pub fn expected_len(&self) -> Result<usize, PixelShapeError> {
        [
            self.rows,
            self.columns,
            self.samples_per_pixel,
            self.bits_allocated / 8,
        ]
        .into_iter()
        .try_fold(self.frames, usize::checked_mul)
        .ok_or_else(|| {
            PixelShapeError::UnsupportedLayout(format!(
                "declared shape {:?} does not fit in memory",
                self.shape()
            ))
        })
    }

    /// Dense `[frames, rows, columns, samples]` shape with singleton frame and
    /// sample axes squeezed out.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::with_capacity(4);
        if self.frames != 1 {
            shape.push(self.frames);
        }
        shape.push(self.rows);
        shape.push(self.columns);
        if self.samples_per_pixel != 1 {
            shape.push(self.samples_per_pixel);
        }
        shape
    }

    /// Largest storable sample value.
    pub fn white(&self) -> u16 {
        let magnitude_bits = if self.signed {
            self.bits_stored - 1
        } else {
            self.bits_stored
        };
        ((1u32 << magnitude_bits) - 1) as u16
    }
}

/// Rows and Columns are US; anything wider cannot come from a conformant header.
fn dimension(name: &str, value: u32) -> Result<usize, PixelShapeError> {
    u16::try_from(value)
        .map(usize::from)
        .map_err(|_| PixelShapeError::UnsupportedLayout(format!("{value} {name}")))
}

/// The Pixel Data element, provided it holds native (uncompressed) samples.
fn native_pixel_data(record: &MedicalImageRecord) -> Result<&InMemElement, PixelShapeError> {
    let element = record
        .element(tags::PIXEL_DATA)
        .ok_or(PixelShapeError::MissingAttribute(tags::PIXEL_DATA))?;
    match element.value() {
        Value::Primitive(_) => Ok(element),
        Value::PixelSequence(_) => Err(PixelShapeError::UnsupportedLayout(String::from(
            "encapsulated (compressed) pixel data",
        ))),
        Value::Sequence(_) => Err(PixelShapeError::UnsupportedLayout(String::from(
            "pixel data stored as a sequence",
        ))),
    }
}

fn decode(record: &MedicalImageRecord) -> Result<DecodedPixelData<'_>, PixelShapeError> {
    native_pixel_data(record)?;
    let required: [Tag; 3] = [tags::ROWS, tags::COLUMNS, tags::BITS_ALLOCATED];
    if let Some(tag) = required.into_iter().find(|tag| record.element(*tag).is_none()) {
        return Err(PixelShapeError::MissingAttribute(tag));
    }

    record.object().decode_pixel_data().map_err(|err| {
        PixelShapeError::UnsupportedLayout(format!(
            "failed to decode pixel data ({}): {err}",
            record.transfer_syntax()
        ))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

/// Mutable view of a single frame, one sample per channel.
#[derive(Debug, Clone)]
struct Raster {
    rows: usize,
    columns: usize,
    channels: usize,
    white: u16,
    samples: Samples,
    padding: Vec<u8>,
}

impl Raster {
    fn from_decoded(
        decoded: &DecodedPixelData<'_>,
        layout: &PixelLayout,
    ) -> Result<Self, PixelShapeError> {
        // native payload in host byte order, pad byte included
        let payload = decoded.data();
        let expected = layout.expected_len()?;
        let padded = expected % 2 == 1 && payload.len() == expected + 1;
        if payload.len() != expected && !padded {
            return Err(PixelShapeError::LengthMismatch {
                expected,
                actual: payload.len(),
            });
        }

        // stored values, not rescaled
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let frame = match (layout.bits_allocated, layout.signed) {
            (8, _) => decoded
                .to_vec_frame_with_options::<u8>(0, &options)
                .map(Samples::U8),
            (_, false) => decoded
                .to_vec_frame_with_options::<u16>(0, &options)
                .map(Samples::U16),
            (_, true) => decoded
                .to_vec_frame_with_options::<i16>(0, &options)
                .map(|words| Samples::U16(words.into_iter().map(|word| word as u16).collect())),
        };
        let samples = frame.map_err(|err| {
            PixelShapeError::UnsupportedLayout(format!("failed to materialize frame data: {err}"))
        })?;

        Ok(Self {
            rows: layout.rows,
            columns: layout.columns,
            channels: layout.samples_per_pixel,
            white: layout.white(),
            samples,
            padding: payload[expected..].to_vec(),
        })
    }

    /// Draws `text` with its alphabetic baseline starting at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point) {
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        for (dx, dy) in STROKE {
            let position = origin + Point::new(dx, dy);
            let drawable = Text::with_baseline(text, position, style, Baseline::Alphabetic);
            if let Err(never) = drawable.draw(self) {
                match never {}
            }
        }
    }

    fn paint(&mut self, point: Point) {
        let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
            return;
        };
        if x >= self.columns || y >= self.rows {
            return;
        }
        let start = (y * self.columns + x) * self.channels;
        let end = start + self.channels;
        match &mut self.samples {
            Samples::U8(samples) => samples[start..end].fill(self.white as u8),
            Samples::U16(samples) => samples[start..end].fill(self.white),
        }
    }

    fn into_value(self) -> PrimitiveValue {
        match self.samples {
            Samples::U8(mut bytes) => {
                bytes.extend_from_slice(&self.padding);
                PrimitiveValue::U8(bytes.into())
            }
            Samples::U16(words) => PrimitiveValue::U16(words.into()),
        }
    }
}

impl OriginDimensions for Raster {
    fn size(&self) -> Size {
        Size::new(self.columns as u32, self.rows as u32)
    }
}

impl DrawTarget for Raster {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                self.paint(point);
            }
        }
        Ok(())
    }
}
