use serde::{Deserialize, Serialize};

/// Static advisory text for one leaf condition.
///
/// Knowledge files in the wild use the dashboard's original key names
/// (`pesticide`, `organic`, `hindi_pest`, `hindi`). Deserialization goes
/// through `RawAdvisoryRecord` so an entry may carry several of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAdvisoryRecord")]
pub struct AdvisoryRecord {
    pub symptoms: String,
    pub treatment: String,
    pub organic_alternative: String,
    pub localized_treatment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<String>,
}

/// Every key name a knowledge entry may use, each captured separately.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAdvisoryRecord {
    symptoms: Option<String>,
    treatment: Option<String>,
    pesticide: Option<String>,
    organic_alternative: Option<String>,
    organic: Option<String>,
    localized_treatment: Option<String>,
    hindi_pest: Option<String>,
    hindi: Option<String>,
    dosage: Option<String>,
    optimization: Option<String>,
}

/// Canonical name wins, then the original names in order.
impl From<RawAdvisoryRecord> for AdvisoryRecord {
    fn from(raw: RawAdvisoryRecord) -> Self {
        fn pick(candidates: impl IntoIterator<Item = Option<String>>) -> String {
            candidates
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_else(|| "N/A".into())
        }

        Self {
            symptoms: pick([raw.symptoms]),
            treatment: pick([raw.treatment, raw.pesticide]),
            organic_alternative: pick([raw.organic_alternative, raw.organic]),
            localized_treatment: pick([raw.localized_treatment, raw.hindi_pest, raw.hindi]),
            dosage: raw.dosage,
            optimization: raw.optimization,
        }
    }
}

impl AdvisoryRecord {
    /// Substituted when the label has no entry in the knowledge base.
    pub fn unmapped() -> Self {
        Self {
            symptoms: "N/A".into(),
            treatment: "Check manual".into(),
            organic_alternative: "N/A".into(),
            localized_treatment: "विशेषज्ञ से पूछें".into(),
            dosage: None,
            optimization: None,
        }
    }

    /// Substituted when the knowledge base cannot be read or parsed.
    pub fn unavailable() -> Self {
        Self {
            symptoms: "Error loading DB".into(),
            treatment: "N/A".into(),
            organic_alternative: "N/A".into(),
            localized_treatment: "त्रुटि".into(),
            dosage: None,
            optimization: None,
        }
    }

    /// Treatment text for the selected display language.
    pub fn treatment_for(&self, language: super::Language) -> &str {
        match language {
            super::Language::English => &self.treatment,
            super::Language::Hindi => &self.localized_treatment,
        }
    }
}
