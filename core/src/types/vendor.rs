use std::fmt;

/// B-value encoding conventions the dispatcher can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Vendor {
    Unknown,
    Siemens,
    Ge,
    Philips,
    /// Sequence-name convention of the ProstateX data set, used across scanners
    ProstateX,
}

impl Vendor {
    /// Returns whether this vendor is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Vendor::Unknown)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Vendor::Unknown => "unknown",
            Vendor::Siemens => "siemens",
            Vendor::Ge => "ge",
            Vendor::Philips => "philips",
            Vendor::ProstateX => "prostatex",
        }
    }

    /// Classifies a Manufacturer (0008,0070) value
    ///
    /// Case-insensitive substring match, checked in the order Siemens, GE,
    /// Philips. Note that "ge" matches anywhere in the string.
    pub fn from_manufacturer(manufacturer: &str) -> Self {
        let lower = manufacturer.to_lowercase();
        if lower.contains("siemens") {
            Vendor::Siemens
        } else if lower.contains("ge") {
            Vendor::Ge
        } else if lower.contains("philips") {
            Vendor::Philips
        } else {
            Vendor::Unknown
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
