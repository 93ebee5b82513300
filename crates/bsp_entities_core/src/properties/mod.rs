//! Property typing: converters, field kinds, and the generic accessor.

pub mod convert;

pub use convert::{
    Color32, ConversionError, FromRawValue, Vec3, convert_bool, convert_color, convert_float,
    convert_int, convert_vector,
};

/// Declared type tag of a bindable field.
///
/// `Unsupported` marks a declared type with no registered converter; the
/// registry rejects such classes when it builds its binding tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Int,
    Float,
    Vector,
    Color,
    Unsupported { type_name: &'static str },
}

impl FieldKind {
    /// Lower-case name used in exports and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Vector => "vector",
            FieldKind::Color => "color",
            FieldKind::Unsupported { .. } => "unsupported",
        }
    }
}

/// Convertible view of one raw property value.
///
/// The handle re-runs the matching converter on every read, against the raw
/// text, so it works for declared and undeclared keys alike. An absent key
/// reads as the type's missing-value default, never as an error.
///
/// # Example
/// ```
/// use bsp_entities_core::properties::EntityProperty;
///
/// let health = EntityProperty::new(Some("100"));
/// assert_eq!(health.as_int().unwrap(), 100);
/// assert!(health.as_bool().unwrap());
///
/// let absent = EntityProperty::new(None);
/// assert_eq!(absent.as_int().unwrap(), 0);
/// assert_eq!(absent.as_text(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EntityProperty<'a> {
    raw: Option<&'a str>,
}

impl<'a> EntityProperty<'a> {
    pub fn new(raw: Option<&'a str>) -> Self {
        Self { raw }
    }

    /// Whether the key was present in the raw map.
    pub fn exists(&self) -> bool {
        self.raw.is_some()
    }

    /// The raw text, unconverted.
    pub fn raw(&self) -> Option<&'a str> {
        self.raw
    }

    /// Identity conversion; absent stays absent instead of becoming empty.
    pub fn as_text(&self) -> Option<&'a str> {
        self.raw
    }

    pub fn as_bool(&self) -> Result<bool, ConversionError> {
        convert_bool(self.raw)
    }

    pub fn as_int(&self) -> Result<i32, ConversionError> {
        convert_int(self.raw)
    }

    pub fn as_float(&self) -> Result<f32, ConversionError> {
        convert_float(self.raw)
    }

    pub fn as_vector(&self) -> Result<Vec3, ConversionError> {
        convert_vector(self.raw)
    }

    pub fn as_color(&self) -> Result<Color32, ConversionError> {
        convert_color(self.raw)
    }
}
