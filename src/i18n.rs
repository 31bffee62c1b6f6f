//! Localized dashboard strings (English / Hindi).

use serde::Serialize;

use crate::models::Language;

#[derive(Debug, Clone, Serialize)]
pub struct UiStrings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub scan_header: &'static str,
    pub results_header: &'static str,
    pub treatment_tab: &'static str,
    pub savings_tab: &'static str,
    pub expert_header: &'static str,
    /// Water saved, pesticide saved, yield protection.
    pub metrics: [&'static str; 3],
    pub language_label: &'static str,
    pub field_label: &'static str,
    pub expert_button: &'static str,
    pub expert_success: &'static str,
    pub impact_header: &'static str,
}

const ENGLISH: UiStrings = UiStrings {
    title: "CropPulse: Precision AI",
    subtitle: "AI-Powered Diagnosis & Resource Optimizer",
    scan_header: "📸 Scan Crop",
    results_header: "🔍 AI Diagnosis",
    treatment_tab: "💊 Treatment Plan",
    savings_tab: "📉 Smart Savings",
    expert_header: "👨‍🔬 Consult Expert",
    metrics: ["Water Saved", "Pesticide Saved", "Yield Protection"],
    language_label: "Language",
    field_label: "Field Size (Acres)",
    expert_button: "Message Agricultural Expert",
    expert_success: "Request sent! An expert will contact you at ",
    impact_header: "Real-time Impact Map",
};

const HINDI: UiStrings = UiStrings {
    title: "क्रॉपपल्स (CropPulse): सटीक एआई",
    subtitle: "एआई-संचालित निदान और संसाधन अनुकूलक",
    scan_header: "📸 फसल स्कैन करें",
    results_header: "🔍 एआई निदान",
    treatment_tab: "💊 उपचार योजना",
    savings_tab: "📉 स्मार्ट बचत",
    expert_header: "👨‍🔬 विशेषज्ञ से सलाह लें",
    metrics: ["बचाया गया पानी", "बचाया गया कीटनाशक", "पैदावार सुरक्षा"],
    language_label: "भाषा",
    field_label: "खेत का आकार (एकड़)",
    expert_button: "कृषि विशेषज्ञ को संदेश भेजें",
    expert_success: "अनुरोध भेज दिया गया! एक विशेषज्ञ आपसे संपर्क करेगा: ",
    impact_header: "वास्तविक समय प्रभाव मानचित्र",
};

pub fn strings(language: Language) -> &'static UiStrings {
    match language {
        Language::English => &ENGLISH,
        Language::Hindi => &HINDI,
    }
}
