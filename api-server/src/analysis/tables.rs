// Reference tables for symptom matching, severity and recommendations

use skinscan_core::{Recommendations, SeverityLevel};

/// Care advice for one disease at one severity
#[derive(Debug)]
pub struct CarePlan {
    pub general_advice: &'static str,
    pub immediate_care: &'static [&'static str],
    pub home_remedies: &'static [&'static str],
    pub precautions: &'static [&'static str],
    pub lifestyle_tips: &'static [&'static str],
    pub when_to_see_doctor: &'static str,
}

impl CarePlan {
    pub fn to_recommendations(&self) -> Recommendations {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Recommendations {
            general_advice: self.general_advice.to_string(),
            immediate_care: owned(self.immediate_care),
            home_remedies: owned(self.home_remedies),
            precautions: owned(self.precautions),
            lifestyle_tips: owned(self.lifestyle_tips),
            when_to_see_doctor: self.when_to_see_doctor.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct DiseaseProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub baseline: SeverityLevel,
    pub can_escalate_to: SeverityLevel,
    /// Disease-specific markers of a serious presentation
    pub severe_if: &'static [&'static str],
    pub common: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub severity_indicators: &'static [&'static str],
    /// Symptoms that argue against this disease
    pub contradictions: &'static [&'static str],
    pub care: &'static [(SeverityLevel, CarePlan)],
}

impl DiseaseProfile {
    /// Care plan for `level`, falling back to the mild entry
    pub fn care_for(&self, level: SeverityLevel) -> Option<&CarePlan> {
        self.care
            .iter()
            .find(|(l, _)| *l == level)
            .or_else(|| self.care.iter().find(|(l, _)| *l == SeverityLevel::Mild))
            .map(|(_, plan)| plan)
    }
}

/// Case-insensitive profile lookup
pub fn lookup(disease: &str) -> Option<&'static DiseaseProfile> {
    let disease = disease.trim();
    DISEASES
        .iter()
        .find(|p| p.name == disease)
        .or_else(|| DISEASES.iter().find(|p| p.name.eq_ignore_ascii_case(disease)))
}

pub const SYMPTOM_WEIGHT_COMMON: u32 = 3;
pub const SYMPTOM_WEIGHT_OPTIONAL: u32 = 1;
pub const SYMPTOM_WEIGHT_SEVERITY: u32 = 2;

/// Words dropped from a symptom before matching
pub const INTENSITY_MODIFIERS: [&str; 6] =
    ["very", "extremely", "slightly", "mild", "severe", "intense"];

pub const SYMPTOM_ALIASES: &[(&str, &str)] = &[
    ("itchy", "itching"),
    ("itchy_skin", "itching"),
    ("itch", "itching"),
    ("scratchy", "itching"),
    ("red", "redness"),
    ("red_skin", "redness"),
    ("reddish", "redness"),
    ("inflamed", "inflammation"),
    ("dry", "dry_skin"),
    ("flaky", "scaly_skin"),
    ("flaking", "scaly_skin"),
    ("scales", "scaly_skin"),
    ("scaly", "scaly_skin"),
    ("flakes", "scaly_skin"),
    ("peeling", "skin_peeling"),
    ("rough", "rough_texture"),
    ("bumpy", "bumps"),
    ("bump", "bumps"),
    ("raised", "raised_lesion"),
    ("sore", "pain"),
    ("painful", "pain"),
    ("hurts", "pain"),
    ("tender", "tenderness"),
    ("burn", "burning"),
    ("stinging", "burning"),
    ("blister", "blisters"),
    ("pimple", "pimples"),
    ("zits", "pimples"),
    ("ring", "ring_shaped_rash"),
    ("ringworm", "ring_shaped_rash"),
    ("bleeds", "bleeding"),
    ("growing", "rapid_growth"),
];

pub const INTENSITY_HIGH: [&str; 11] = [
    "very", "extremely", "severe", "intense", "unbearable", "constant", "excruciating",
    "terrible", "awful", "worst", "agonizing",
];
pub const INTENSITY_MODERATE: [&str; 8] = [
    "moderate", "noticeable", "persistent", "frequent", "considerable", "significant",
    "bothersome", "uncomfortable",
];
pub const INTENSITY_LOW: [&str; 7] =
    ["mild", "slight", "occasional", "minor", "barely", "little", "faint"];

pub const AREA_KEYWORDS: [&str; 10] = [
    "widespread", "large", "spreading", "multiple", "extensive", "whole", "entire", "all_over",
    "everywhere", "covering",
];

/// Symptoms that warrant prompt attention regardless of disease
pub const RED_FLAG_SYMPTOMS: [&str; 12] = [
    "bleeding",
    "infection",
    "rapid_spread",
    "severe_pain",
    "ulceration",
    "breathing_difficulty",
    "fever",
    "mouth_sores",
    "eye_involvement",
    "swollen_lymph_nodes",
    "chest_pain",
    "difficulty_swallowing",
];

pub const RED_FLAG_DISEASES: [&str; 2] = ["Melanoma", "Skin Cancer"];

pub const SYMPTOM_ADVICE: &[(&str, &str)] = &[
    ("itching", "For itching: Apply cool compresses and avoid scratching. Consider OTC antihistamines."),
    ("pain", "For pain: Apply cool compresses. OTC pain relievers may help."),
    ("burning", "For burning sensation: Apply cool (not cold) compresses. Avoid irritants."),
    ("bleeding", "For bleeding: Apply gentle pressure with clean cloth. Keep area clean."),
    ("oozing", "For oozing: Keep area clean and dry. Apply sterile bandage if needed."),
    ("infection", "Signs of infection detected: Keep area clean. Seek medical care if worsening."),
    ("fever", "Fever present: This may indicate systemic involvement. Seek medical care."),
    ("spreading", "Condition spreading: Document progression with photos. Consult doctor soon."),
    ("rapid_growth", "Rapid growth noted: This requires prompt medical evaluation."),
    ("swelling", "Swelling present: Elevate if possible. Apply cool compress."),
    ("redness", "Redness: May indicate inflammation. Avoid irritants and heat."),
    ("widespread", "Widespread condition: May need systemic treatment. Consult dermatologist."),
];

pub const LOW_CONFIDENCE_NOTE: &str =
    " Note: AI confidence is low - professional evaluation is especially important.";

pub const MEDICAL_DISCLAIMER: &str = "IMPORTANT: This AI analysis is for informational purposes only and does NOT \
     constitute medical diagnosis or advice. Always consult a qualified healthcare \
     professional for proper diagnosis and treatment. Do not delay seeking medical \
     care based on this analysis.";

pub const DEFAULT_CARE: CarePlan = CarePlan {
    general_advice: "This condition should be evaluated by a healthcare professional.",
    immediate_care: &["Keep area clean", "Avoid irritation", "Protect from sun"],
    home_remedies: &["Use gentle skincare", "Keep moisturized"],
    precautions: &["Do not self-diagnose", "Monitor for changes"],
    lifestyle_tips: &["Maintain skin health", "Stay hydrated"],
    when_to_see_doctor: "If condition persists or worsens",
};

use SeverityLevel::{Critical, Mild, Moderate, Severe};

pub static DISEASES: &[DiseaseProfile] = &[
    DiseaseProfile {
        name: "Acne",
        description: "Common skin condition affecting hair follicles and oil glands",
        baseline: Mild,
        can_escalate_to: Moderate,
        severe_if: &["cysts", "nodules", "widespread", "severe_scarring", "deep_lesions"],
        common: &["pimples", "blackheads", "whiteheads", "oily_skin", "bumps"],
        optional: &["redness", "inflammation", "scarring", "pustules", "papules"],
        severity_indicators: &["cysts", "nodules", "widespread", "deep_lesions", "severe_scarring"],
        contradictions: &["white_patches", "depigmentation", "ring_shaped_rash", "butterfly_rash"],
        care: &[
            (Mild, CarePlan {
                general_advice: "Acne is a common skin condition affecting hair follicles and oil glands.",
                immediate_care: &["Wash face twice daily with gentle cleanser", "Use non-comedogenic products"],
                home_remedies: &["Apply benzoyl peroxide spot treatment", "Use oil-free moisturizer"],
                precautions: &["Don't pop or squeeze pimples", "Avoid touching face"],
                lifestyle_tips: &["Stay hydrated", "Eat balanced diet", "Manage stress"],
                when_to_see_doctor: "If acne persists for more than 3 months or causes scarring",
            }),
            (Moderate, CarePlan {
                general_advice: "Moderate acne may benefit from prescription treatments.",
                immediate_care: &["Continue gentle cleansing routine", "Consider OTC retinoids"],
                home_remedies: &["Use salicylic acid products", "Apply ice to reduce inflammation"],
                precautions: &["Avoid harsh scrubbing", "Don't use multiple acne products at once"],
                lifestyle_tips: &["Track triggers in diet", "Get adequate sleep"],
                when_to_see_doctor: "Schedule appointment with dermatologist for prescription options",
            }),
        ],
    },
    DiseaseProfile {
        name: "Eczema",
        description: "Chronic inflammatory skin condition that can be managed with proper care",
        baseline: Mild,
        can_escalate_to: Moderate,
        severe_if: &["bleeding", "infection_signs", "large_area", "sleep_disruption", "severe_itching"],
        common: &["itching", "redness", "dry_skin", "patches", "inflammation"],
        optional: &["oozing", "crusting", "thickened_skin", "scaly_skin", "cracking"],
        severity_indicators: &["bleeding", "infection_signs", "large_area", "sleep_disruption", "severe_itching"],
        contradictions: &["silvery_scales", "thick_plaques"],
        care: &[
            (Mild, CarePlan {
                general_advice: "Eczema is a chronic inflammatory condition that can be managed with proper care.",
                immediate_care: &["Apply fragrance-free moisturizer immediately after bathing", "Use lukewarm water"],
                home_remedies: &["Oatmeal baths", "Coconut oil", "Aloe vera"],
                precautions: &["Avoid harsh soaps and detergents", "Identify and avoid triggers"],
                lifestyle_tips: &["Use humidifier", "Wear soft cotton clothing", "Manage stress"],
                when_to_see_doctor: "If itching disrupts sleep or skin becomes infected",
            }),
            (Moderate, CarePlan {
                general_advice: "Moderate eczema may benefit from prescription treatments.",
                immediate_care: &["Continue moisturizing routine", "Consider OTC hydrocortisone"],
                home_remedies: &["Cool compresses"],
                precautions: &["Don't scratch - keep nails short", "Avoid known allergens"],
                lifestyle_tips: &["Track flare triggers", "Consider allergy testing"],
                when_to_see_doctor: "Schedule dermatologist appointment for prescription options",
            }),
        ],
    },
    DiseaseProfile {
        name: "Psoriasis",
        description: "Chronic autoimmune condition causing rapid skin cell buildup",
        baseline: Moderate,
        can_escalate_to: Severe,
        severe_if: &["widespread", "joint_swelling", "severe_scaling", "bleeding", "large_area"],
        common: &["red_patches", "silvery_scales", "dry_skin", "itching", "thick_plaques"],
        optional: &["burning", "soreness", "nail_changes", "joint_pain", "cracking"],
        severity_indicators: &["widespread", "joint_swelling", "severe_scaling", "bleeding", "large_area"],
        contradictions: &["oozing", "weeping", "moist_areas"],
        care: &[
            (Mild, CarePlan {
                general_advice: "Psoriasis is a chronic autoimmune condition causing rapid skin cell buildup.",
                immediate_care: &["Keep skin moisturized", "Use medicated shampoo if scalp affected"],
                home_remedies: &["Coal tar products", "Salicylic acid", "Oatmeal baths"],
                precautions: &["Avoid skin injuries (Koebner phenomenon)", "Limit alcohol"],
                lifestyle_tips: &["Manage stress", "Maintain healthy weight", "Don't smoke"],
                when_to_see_doctor: "For prescription treatments if OTC products don't help",
            }),
            (Moderate, CarePlan {
                general_advice: "Moderate psoriasis often requires prescription treatments.",
                immediate_care: &["See dermatologist for treatment plan"],
                home_remedies: &["Continue moisturizing", "Phototherapy may help"],
                precautions: &["Watch for joint pain (psoriatic arthritis)"],
                lifestyle_tips: &["Anti-inflammatory diet", "Regular exercise"],
                when_to_see_doctor: "Soon - many effective treatments available",
            }),
            (Severe, CarePlan {
                general_advice: "Severe psoriasis significantly impacts quality of life and needs aggressive treatment.",
                immediate_care: &["See dermatologist urgently", "Document extent of coverage"],
                home_remedies: &["Intensive moisturizing", "Gentle care only"],
                precautions: &["Monitor for psoriatic arthritis", "Watch for infection in plaques"],
                lifestyle_tips: &["Support groups helpful"],
                when_to_see_doctor: "As soon as possible - systemic treatments likely needed",
            }),
        ],
    },
    DiseaseProfile {
        name: "Rosacea",
        description: "Chronic facial skin condition causing redness and visible blood vessels",
        baseline: Mild,
        can_escalate_to: Moderate,
        severe_if: &["nose_enlargement", "severe_redness", "eye_problems", "thickened_skin", "persistent_flushing"],
        common: &["facial_redness", "flushing", "visible_blood_vessels", "bumps", "pimples"],
        optional: &["burning", "stinging", "dry_skin", "eye_irritation", "swelling"],
        severity_indicators: &["nose_enlargement", "severe_redness", "eye_problems", "thickened_skin", "persistent_flushing"],
        contradictions: &["blackheads", "whiteheads"],
        care: &[
            (Mild, CarePlan {
                general_advice: "Rosacea is a chronic facial condition causing redness and visible blood vessels.",
                immediate_care: &["Identify and avoid triggers", "Use gentle skincare"],
                home_remedies: &["Green-tinted makeup to neutralize redness", "Cool compresses"],
                precautions: &["Avoid hot drinks, spicy food, alcohol", "Protect from sun and wind"],
                lifestyle_tips: &["Keep trigger diary", "Use fragrance-free products"],
                when_to_see_doctor: "For prescription treatments to control symptoms",
            }),
            (Moderate, CarePlan {
                general_advice: "Moderate rosacea with papules/pustules benefits from prescription treatment.",
                immediate_care: &["See dermatologist for topical prescriptions"],
                home_remedies: &["Continue gentle skincare", "Cool compresses"],
                precautions: &["Avoid all known triggers", "Use mineral sunscreen"],
                lifestyle_tips: &["Stress management", "Gentle exercise only"],
                when_to_see_doctor: "Soon - prescription treatments are very effective",
            }),
        ],
    },
    DiseaseProfile {
        name: "Tinea",
        description: "Fungal skin infection that responds well to antifungal treatment",
        baseline: Mild,
        can_escalate_to: Moderate,
        severe_if: &["spreading", "severe_itching", "infection_signs", "widespread", "nail_involvement"],
        common: &["ring_shaped_rash", "itching", "scaly_skin", "red_border", "clear_center"],
        optional: &["burning", "cracking", "blisters", "hair_loss", "nail_changes"],
        severity_indicators: &["spreading", "severe_itching", "infection_signs", "widespread", "nail_involvement"],
        contradictions: &["pus", "yellow_discharge"],
        care: &[
            (Mild, CarePlan {
                general_advice: "Tinea (ringworm) is a fungal infection that responds well to antifungal treatment.",
                immediate_care: &["Apply OTC antifungal cream", "Keep area clean and dry"],
                home_remedies: &["Tea tree oil", "Keep area ventilated"],
                precautions: &["Don't share towels or clothing", "Wash hands after touching"],
                lifestyle_tips: &["Wear breathable shoes", "Change socks daily", "Keep feet dry"],
                when_to_see_doctor: "If not improving after 2 weeks of OTC treatment",
            }),
            (Moderate, CarePlan {
                general_advice: "Persistent or spreading tinea may need prescription antifungals.",
                immediate_care: &["Continue OTC treatment", "See doctor if no improvement"],
                home_remedies: &["Keep area very dry", "Use antifungal powder"],
                precautions: &["Treat all affected areas", "Disinfect shoes and surfaces"],
                lifestyle_tips: &["Replace old shoes", "Use separate towels"],
                when_to_see_doctor: "If spreading or not responding to OTC treatment",
            }),
        ],
    },
    DiseaseProfile {
        name: "Melanoma",
        description: "Serious skin cancer requiring immediate medical attention",
        baseline: Critical,
        can_escalate_to: Critical,
        severe_if: &["rapid_growth", "ulceration", "satellite_lesions", "pain"],
        common: &["asymmetric_mole", "irregular_border", "color_variation", "large_diameter"],
        optional: &["itching", "bleeding", "evolving_shape", "new_mole"],
        severity_indicators: &["rapid_growth", "ulceration", "satellite_lesions", "pain"],
        contradictions: &[],
        care: &[
            (Mild, CarePlan {
                general_advice: "Any melanoma suspicion requires immediate professional evaluation.",
                immediate_care: &["See dermatologist immediately", "Photograph the lesion"],
                home_remedies: &[],
                precautions: &["Do not delay care", "Do not irritate area"],
                lifestyle_tips: &["Learn ABCDEs of melanoma", "Monthly skin self-exams"],
                when_to_see_doctor: "Immediately - urgent evaluation required",
            }),
            (Critical, CarePlan {
                general_advice: "This requires immediate medical attention.",
                immediate_care: &["Go to dermatologist or ER today"],
                home_remedies: &[],
                precautions: &["Do not delay for any reason"],
                lifestyle_tips: &["Connect with melanoma support resources"],
                when_to_see_doctor: "Immediately - emergency care appropriate",
            }),
        ],
    },
    DiseaseProfile {
        name: "Skin Cancer",
        description: "Malignant skin condition requiring immediate medical evaluation",
        baseline: Severe,
        can_escalate_to: Critical,
        severe_if: &["rapid_growth", "spreading", "satellite_lesions", "lymph_node_swelling", "ulceration"],
        common: &["new_growth", "changing_mole", "sore_that_wont_heal", "irregular_border", "color_variation"],
        optional: &["bleeding", "crusting", "itching", "pain", "ulceration"],
        severity_indicators: &["rapid_growth", "spreading", "satellite_lesions", "lymph_node_swelling", "large_size"],
        contradictions: &[],
        care: &[
            (Mild, CarePlan {
                general_advice: "Any suspected skin cancer requires immediate professional evaluation.",
                immediate_care: &["See dermatologist immediately", "Photograph the lesion"],
                home_remedies: &[],
                precautions: &["Do not delay care", "Protect from further sun damage"],
                lifestyle_tips: &["Learn skin self-exam techniques", "Monthly checks"],
                when_to_see_doctor: "IMMEDIATELY - urgent evaluation required",
            }),
            (Severe, CarePlan {
                general_advice: "This requires immediate medical attention.",
                immediate_care: &["Go to dermatologist or oncologist today"],
                home_remedies: &[],
                precautions: &["Do not delay for any reason"],
                lifestyle_tips: &["Connect with cancer support resources"],
                when_to_see_doctor: "IMMEDIATELY - emergency care appropriate",
            }),
        ],
    },
    DiseaseProfile {
        name: "Unknown/Normal",
        description: "Skin appears normal or condition is unidentified",
        baseline: Mild,
        can_escalate_to: Mild,
        severe_if: &[],
        common: &["normal_skin", "no_symptoms", "healthy_appearance"],
        optional: &["minor_blemish", "temporary_redness"],
        severity_indicators: &[],
        contradictions: &[],
        care: &[(Mild, CarePlan {
            general_advice: "Your skin appears normal or the condition couldn't be identified.",
            immediate_care: &["Continue normal skincare routine"],
            home_remedies: &["Maintain good skin hygiene", "Stay moisturized"],
            precautions: &["Monitor for any changes", "Use sun protection"],
            lifestyle_tips: &["Regular skin self-exams", "Healthy lifestyle"],
            when_to_see_doctor: "If you notice any concerning changes",
        })],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("eczema").map(|p| p.name), Some("Eczema"));
        assert_eq!(lookup(" Skin Cancer ").map(|p| p.name), Some("Skin Cancer"));
        assert!(lookup("Dragon Scale").is_none());
    }

    #[test]
    fn test_care_falls_back_to_mild() {
        let acne = lookup("Acne").unwrap();
        let plan = acne.care_for(SeverityLevel::Severe).unwrap();
        assert!(plan.general_advice.starts_with("Acne is a common"));
    }

    #[test]
    fn test_every_profile_has_mild_care_and_sane_caps() {
        for profile in DISEASES {
            assert!(profile.care_for(SeverityLevel::Mild).is_some(), "{}", profile.name);
            assert!(profile.baseline <= profile.can_escalate_to, "{}", profile.name);
        }
    }
}
