//! Customer contact details captured on the checkout form.

use serde::{Deserialize, Serialize};

/// The five customer fields required before checkout can proceed.
///
/// Completeness is a non-empty check only; email *format* is validated
/// separately at submit time via [`crate::Email::parse`], because a complete
/// form can still hold a malformed address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub email: String,
    pub name: String,
    pub country: String,
    pub region_city: String,
    pub phone: String,
}

impl CustomerDetails {
    /// True when every field is non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty()
            && !self.name.is_empty()
            && !self.country.is_empty()
            && !self.region_city.is_empty()
            && !self.phone.is_empty()
    }

    /// The combined location string stored on orders ("country, city").
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}, {}", self.country, self.region_city)
    }
}
