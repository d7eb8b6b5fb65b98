use dicom::core::value::{PrimitiveValue, Value};
use dicom::core::{Tag, VR};
use dicom::object::mem::InMemElement;

const MAX_VALUE_LEN: usize = 64;

pub fn format_tag(tag: Tag) -> String {
    format!("{:04X},{:04X}", tag.group(), tag.element())
}

/// One-line rendering of an element for log output, e.g. `(0008,1030) LO "Chest CT"`.
pub fn element_summary(element: Option<&InMemElement>, tag: Tag) -> String {
    match element {
        Some(element) => format!(
            "({}) {} {}",
            format_tag(tag),
            element.vr(),
            value_to_string(element.value(), element.vr())
        ),
        None => format!("({}) (absent)", format_tag(tag)),
    }
}

fn value_to_string<I, P>(value: &Value<I, P>, vr: VR) -> String {
    let rendered = match value {
        Value::Primitive(primitive) => format_primitive_value(primitive, vr),
        Value::Sequence(sequence) => {
            let count = sequence.multiplicity() as usize;
            let suffix = if count == 1 { "" } else { "s" };
            format!("Sequence ({count} item{suffix})")
        }
        Value::PixelSequence(sequence) => {
            let fragments = sequence.fragments().len();
            let suffix = if fragments == 1 { "" } else { "s" };
            format!("Encapsulated pixel data ({fragments} fragment{suffix})")
        }
    };

    if rendered.chars().count() > MAX_VALUE_LEN {
        let mut truncated = rendered.chars().take(MAX_VALUE_LEN).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        rendered
    }
}

fn format_primitive_value(value: &PrimitiveValue, vr: VR) -> String {
    match value {
        PrimitiveValue::Empty => String::from("(empty)"),
        PrimitiveValue::U8(_) | PrimitiveValue::U16(_) if is_binary_vr(vr) => {
            format!("Binary data ({} bytes)", value.calculate_byte_len())
        }
        PrimitiveValue::Str(_) | PrimitiveValue::Strs(_) => {
            format!("\"{}\"", value.to_str().trim_end_matches(['\0', ' ']))
        }
        _ => value.to_str().into_owned(),
    }
}

fn is_binary_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN
    )
}
