//! Raw string to typed value conversion.
//!
//! Entity properties arrive as text. These converters implement the exact
//! defaulting rules the source data relies on: absent (or empty) values fall
//! back to the type's zero value, short vectors and colors fill in the
//! missing components, and only genuinely malformed content is an error.

use thiserror::Error;

pub use glam::Vec3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Invalid integer {value:?}: {source}")]
    InvalidInt {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("Invalid float {value:?}: {source}")]
    InvalidFloat {
        value: String,
        source: std::num::ParseFloatError,
    },
}

/// 8-bit-per-channel RGBA color.
///
/// The zero value is fully transparent black; the 255 alpha default only
/// applies while converting from text (see [`convert_color`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }
}

/// Absent and empty raw values both mean "missing".
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

/// Missing converts to `false`; anything else is the integer conversion
/// compared against zero.
pub fn convert_bool(raw: Option<&str>) -> Result<bool, ConversionError> {
    Ok(convert_int(raw)? != 0)
}

/// Missing converts to `0`.
pub fn convert_int(raw: Option<&str>) -> Result<i32, ConversionError> {
    match present(raw) {
        None => Ok(0),
        Some(value) => value.parse().map_err(|source| ConversionError::InvalidInt {
            value: value.to_string(),
            source,
        }),
    }
}

/// Missing converts to `0.0`.
pub fn convert_float(raw: Option<&str>) -> Result<f32, ConversionError> {
    match present(raw) {
        None => Ok(0.0),
        Some(value) => value
            .parse()
            .map_err(|source| ConversionError::InvalidFloat {
                value: value.to_string(),
                source,
            }),
    }
}

/// Up to three space-separated float components; missing components are `0`.
///
/// Only the first three segments matter, anything after them is ignored.
pub fn convert_vector(raw: Option<&str>) -> Result<Vec3, ConversionError> {
    let Some(value) = present(raw) else {
        return Ok(Vec3::ZERO);
    };

    let segments = leading_segments::<3>(value);
    Ok(Vec3::new(
        convert_float(segments[0])?,
        convert_float(segments[1])?,
        convert_float(segments[2])?,
    ))
}

/// Up to four space-separated integer components (r, g, b, a).
///
/// Alpha defaults to 255 when its segment is absent; the color channels
/// default to 0. Values are narrowed to 8 bits with a truncating cast.
pub fn convert_color(raw: Option<&str>) -> Result<Color32, ConversionError> {
    let Some(value) = present(raw) else {
        return Ok(Color32::default());
    };

    let segments = leading_segments::<4>(value);
    Ok(Color32 {
        r: convert_int(segments[0])? as u8,
        g: convert_int(segments[1])? as u8,
        b: convert_int(segments[2])? as u8,
        a: match segments[3] {
            Some(segment) => convert_int(Some(segment))? as u8,
            None => u8::MAX,
        },
    })
}

/// Splits `value` at single spaces into its first `N` segments.
///
/// Splitting happens at each single space in turn, never by collapsing
/// repeated spaces, so doubled spaces produce empty segments. Content after
/// the `N`th split is dropped.
fn leading_segments<const N: usize>(value: &str) -> [Option<&str>; N] {
    let mut segments = [None; N];
    let mut rest = value;
    for segment in &mut segments {
        match rest.split_once(' ') {
            Some((head, tail)) => {
                *segment = Some(head);
                rest = tail;
            }
            None => {
                *segment = Some(rest);
                break;
            }
        }
    }
    segments
}

/// Conversion from a raw property value, one impl per bindable field type.
///
/// The declared typed fields of an entity variant go through this trait; the
/// generic [`EntityProperty`](super::EntityProperty) accessors use the same
/// converter functions directly.
pub trait FromRawValue: Sized {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError>;
}

impl FromRawValue for String {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        Ok(raw.unwrap_or_default().to_string())
    }
}

impl FromRawValue for bool {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        convert_bool(raw)
    }
}

impl FromRawValue for i32 {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        convert_int(raw)
    }
}

impl FromRawValue for f32 {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        convert_float(raw)
    }
}

impl FromRawValue for Vec3 {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        convert_vector(raw)
    }
}

impl FromRawValue for Color32 {
    fn from_raw(raw: Option<&str>) -> Result<Self, ConversionError> {
        convert_color(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversion() {
        assert!(!convert_bool(None).unwrap());
        assert!(!convert_bool(Some("")).unwrap());
        assert!(!convert_bool(Some("0")).unwrap());
        assert!(convert_bool(Some("5")).unwrap());
        assert!(convert_bool(Some("-1")).unwrap());
        // Booleans go through the integer grammar; words are malformed.
        assert!(convert_bool(Some("true")).is_err());
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(convert_int(None).unwrap(), 0);
        assert_eq!(convert_int(Some("")).unwrap(), 0);
        assert_eq!(convert_int(Some("42")).unwrap(), 42);
        assert_eq!(convert_int(Some("-7")).unwrap(), -7);
        assert!(matches!(
            convert_int(Some("4x")),
            Err(ConversionError::InvalidInt { value, .. }) if value == "4x"
        ));
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(convert_float(None).unwrap(), 0.0);
        assert_eq!(convert_float(Some("1.5")).unwrap(), 1.5);
        assert_eq!(convert_float(Some("-0.25")).unwrap(), -0.25);
        assert!(convert_float(Some("one")).is_err());
    }

    #[test]
    fn test_vector_short_inputs() {
        assert_eq!(convert_vector(Some("1 2")).unwrap(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(convert_vector(Some("5")).unwrap(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(convert_vector(Some("")).unwrap(), Vec3::ZERO);
        assert_eq!(convert_vector(None).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_vector_extra_segments_ignored() {
        assert_eq!(
            convert_vector(Some("1 2 3 trailing junk")).unwrap(),
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_vector_repeated_spaces_make_empty_segments() {
        // The second segment is the empty string between the two spaces,
        // which converts like a missing value.
        assert_eq!(convert_vector(Some("1  2")).unwrap(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_vector_malformed_segment() {
        assert!(convert_vector(Some("1 x 3")).is_err());
    }

    #[test]
    fn test_color_alpha_default() {
        assert_eq!(
            convert_color(Some("10 20 30")).unwrap(),
            Color32::new(10, 20, 30, 255)
        );
        assert_eq!(
            convert_color(Some("10 20 30 40")).unwrap(),
            Color32::new(10, 20, 30, 40)
        );
    }

    #[test]
    fn test_color_short_inputs() {
        assert_eq!(convert_color(Some("10")).unwrap(), Color32::new(10, 0, 0, 255));
        assert_eq!(convert_color(None).unwrap(), Color32::default());
        assert_eq!(convert_color(Some("")).unwrap(), Color32::default());
    }

    #[test]
    fn test_color_truncating_cast() {
        assert_eq!(
            convert_color(Some("256 300 -1 40")).unwrap(),
            Color32::new(0, 44, 255, 40)
        );
    }

    #[test]
    fn test_text_from_raw() {
        assert_eq!(String::from_raw(Some("hello")).unwrap(), "hello");
        assert_eq!(String::from_raw(Some("")).unwrap(), "");
        assert_eq!(String::from_raw(None).unwrap(), "");
    }
}
