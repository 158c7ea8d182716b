use std::fmt;

/// Scalar component type of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum ComponentType {
    UChar,
    Char,
    UShort,
    Short,
    UInt,
    Int,
    Float,
    Double,
}

impl ComponentType {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ComponentType::UChar => "uchar",
            ComponentType::Char => "char",
            ComponentType::UShort => "ushort",
            ComponentType::Short => "short",
            ComponentType::UInt => "uint",
            ComponentType::Int => "int",
            ComponentType::Float => "float",
            ComponentType::Double => "double",
        }
    }
}

/// Pixel layouts a slice can be loaded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum PixelType {
    Scalar(ComponentType),
    /// 8-bit RGB
    Rgb,
    /// 8-bit RGBA
    Rgba,
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelType::Scalar(c) => write!(f, "scalar {}", c.simple_name()),
            PixelType::Rgb => write!(f, "rgb uchar"),
            PixelType::Rgba => write!(f, "rgba uchar"),
        }
    }
}

/// Pixel module attributes read alongside the metadata dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PixelInfo {
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub samples_per_pixel: Option<u16>,
    pub bits_allocated: Option<u16>,
    pub pixel_representation: Option<u16>,
    /// Float Pixel Data (7FE0,0008) is present
    pub float_pixel_data: bool,
    /// Double Float Pixel Data (7FE0,0009) is present
    pub double_pixel_data: bool,
}

impl PixelInfo {
    /// Classifies the pixel layout
    ///
    /// Returns `None` for layouts the slice loader does not handle: anything
    /// other than single-sample integer or float pixels, or 8-bit RGB/RGBA.
    pub fn pixel_type(&self) -> Option<PixelType> {
        let samples = self.samples_per_pixel.unwrap_or(1);
        let bits = self.bits_allocated?;
        let signed = self.pixel_representation.unwrap_or(0) == 1;

        match (samples, bits) {
            (1, 64) if self.double_pixel_data || self.float_pixel_data => {
                Some(PixelType::Scalar(ComponentType::Double))
            }
            (1, 32) if self.float_pixel_data => Some(PixelType::Scalar(ComponentType::Float)),
            (1, 8) if signed => Some(PixelType::Scalar(ComponentType::Char)),
            (1, 8) => Some(PixelType::Scalar(ComponentType::UChar)),
            (1, 16) if signed => Some(PixelType::Scalar(ComponentType::Short)),
            (1, 16) => Some(PixelType::Scalar(ComponentType::UShort)),
            (1, 32) if signed => Some(PixelType::Scalar(ComponentType::Int)),
            (1, 32) => Some(PixelType::Scalar(ComponentType::UInt)),
            (3, 8) => Some(PixelType::Rgb),
            (4, 8) => Some(PixelType::Rgba),
            _ => None,
        }
    }
}

impl fmt::Display for PixelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<u16>| v.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}x{}, {} sample(s), {} bits allocated, representation {}",
            show(self.rows),
            show(self.columns),
            show(self.samples_per_pixel),
            show(self.bits_allocated),
            show(self.pixel_representation)
        )
    }
}
