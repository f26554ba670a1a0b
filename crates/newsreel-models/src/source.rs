//! Image source selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a segment's image comes from.
///
/// The preferred source is a pure function of the segment index
/// (`index % 3`), so repeated runs make the same choices. The fallback
/// chain is fixed: LeadImage → ExternalSearch → Generative, and the
/// generative path is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageSourceKind {
    /// The article's own lead image
    LeadImage,
    /// External image search keyed by topic summary + segment index
    ExternalSearch,
    /// Generated from the segment text and article metadata
    Generative,
}

impl ImageSourceKind {
    /// Preferred source for a segment index.
    pub fn preferred_for(index: usize) -> Self {
        match index % 3 {
            0 => ImageSourceKind::LeadImage,
            1 => ImageSourceKind::ExternalSearch,
            _ => ImageSourceKind::Generative,
        }
    }

    /// Next link in the fallback chain, or `None` once the generative
    /// path has been exhausted.
    pub fn next_fallback(self) -> Option<Self> {
        match self {
            ImageSourceKind::LeadImage => Some(ImageSourceKind::ExternalSearch),
            ImageSourceKind::ExternalSearch => Some(ImageSourceKind::Generative),
            ImageSourceKind::Generative => None,
        }
    }
}

impl fmt::Display for ImageSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageSourceKind::LeadImage => "lead_image",
            ImageSourceKind::ExternalSearch => "external_search",
            ImageSourceKind::Generative => "generative",
        };
        write!(f, "{}", s)
    }
}
