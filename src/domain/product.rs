use serde::{Deserialize, Serialize};
use std::fmt;

/// Source platform a product was scraped from
///
/// The tag set is fixed; an unknown tag in a payload is a deserialization
/// failure rather than a fallback variant, so a drifting server contract
/// surfaces immediately instead of producing half-typed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Jumia,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Jumia => "jumia",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scraped product record as delivered by the remote service
///
/// Immutable once fetched: the engine never mutates a product locally, it
/// only replaces or appends whole fetch results. The price carries no
/// guaranteed currency unit and the image URL may be invalid; both are the
/// rendering layer's problem. Timestamps stay as the ISO-8601 strings the
/// server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub image_url: String,
    pub platform: Platform,
    #[serde(default)]
    pub source_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
