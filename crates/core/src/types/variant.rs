//! Product variant selection.
//!
//! Legacy order records used the string sentinel `"N/A"` for unset variant
//! fields. Internally every field is an `Option`; the sentinel (and empty
//! strings) normalize to `None` on the way in, and [`or_na`] re-applies the
//! placeholder at the presentation boundary only.

use serde::{Deserialize, Serialize};

/// The display placeholder for absent optional values.
pub const NA_PLACEHOLDER: &str = "N/A";

/// Format an optional value for display, substituting the placeholder.
#[must_use]
pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NA_PLACEHOLDER,
    }
}

/// A customer's variant choice for a cart line.
///
/// Two cart lines for the same product with different selections are
/// distinct entries; equality is on the normalized form, so a missing field
/// and a `"N/A"` field compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSelection {
    #[serde(default, deserialize_with = "de_normalized")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de_normalized")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "de_normalized")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "de_normalized")]
    pub style: Option<String>,
    #[serde(default, deserialize_with = "de_normalized")]
    pub thickness: Option<String>,
}

impl VariantSelection {
    /// A selection with no variant fields set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Return a copy with sentinel and empty values collapsed to `None`.
    ///
    /// Deserialization already normalizes; this covers selections built in
    /// code from raw form input.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            color: normalize(self.color.as_deref()),
            length: normalize(self.length.as_deref()),
            size: normalize(self.size.as_deref()),
            style: normalize(self.style.as_deref()),
            thickness: normalize(self.thickness.as_deref()),
        }
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() && v != NA_PLACEHOLDER => Some(v.to_owned()),
        _ => None,
    }
}

fn de_normalized<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize(value.as_deref()))
}
