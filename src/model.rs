use serde::Deserialize;

use crate::error::Error;

const DEFAULT_BRAND: &str = "PROFESSIONAL BRAND";
const DEFAULT_COVER_SUBTITLE: &str = "Preliminary Insights: Defining the Core";

/// A titled chunk of raw content. Missing fields deserialize as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Section {
    /// Display only; not validated for uniqueness or continuity.
    pub section_number: i64,
    pub title: String,
    pub subtitle: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub brand_name: String,
    pub cover_subtitle: Option<String>,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Brand name as printed on the cover: upper-cased, with a fallback for blank input.
    pub fn cover_brand(&self) -> String {
        let brand = self.brand_name.trim();
        if brand.is_empty() {
            DEFAULT_BRAND.to_string()
        } else {
            brand.to_uppercase()
        }
    }

    pub fn cover_subtitle(&self) -> String {
        if let Some(sub) = self.cover_subtitle.as_deref()
            && !sub.trim().is_empty()
        {
            return sub.trim().to_string();
        }
        let brand = self.brand_name.trim();
        if brand.is_empty() {
            DEFAULT_COVER_SUBTITLE.to_string()
        } else {
            format!("Insights: {brand}")
        }
    }
}
