use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Text field that accepts whatever JSON the analysis service puts there.
///
/// Strings are kept verbatim, arrays are joined with `", "`, numbers and
/// booleans are printed and `null` becomes empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldText(String);

impl FieldText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for FieldText {
    fn from(text: &str) -> Self {
        FieldText(text.to_string())
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(FieldText(text_of(&value)))
    }
}

pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

// ---------------------------------------------------------------------------
// Report analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportAnalysis {
    /// Extracted report fields, in the order the service sent them
    pub data: Option<Map<String, Value>>,
    pub treatment_recommendations: Option<TreatmentRecommendations>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreatmentRecommendations {
    pub general_recommendations: Option<Vec<GeneralRecommendation>>,
    pub lifestyle_changes: Option<Vec<LifestyleChange>>,
    pub dietary_guidelines: Option<Vec<DietaryGuideline>>,
    pub monitoring_instructions: Option<Vec<MonitoringInstruction>>,
    pub follow_up_tests: Option<Vec<FollowUpTest>>,
    pub precautions: Option<Vec<Precaution>>,
    pub expected_recovery_time: Option<FieldText>,
    pub when_to_seek_help: Option<Vec<FieldText>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralRecommendation {
    pub category: FieldText,
    pub description: FieldText,
    pub importance: FieldText,
    pub expected_outcome: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifestyleChange {
    pub change: FieldText,
    pub reason: FieldText,
    pub implementation: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DietaryGuideline {
    pub food_group: FieldText,
    pub recommendation: FieldText,
    pub benefits: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitoringInstruction {
    pub what_to_monitor: FieldText,
    pub frequency: FieldText,
    pub warning_signs: Option<Vec<FieldText>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FollowUpTest {
    pub test_name: FieldText,
    pub purpose: FieldText,
    pub timing: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Precaution {
    pub precaution: FieldText,
    pub reason: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Prescription analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrescriptionAnalysis {
    pub prescription: Prescription,
    /// Usage details keyed by the exact medicine name. Entries that are not
    /// objects are kept as `None`.
    #[serde(deserialize_with = "lenient_medicine_uses")]
    pub medicine_uses: Option<BTreeMap<String, Option<MedicineUse>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrescriptionAnalysis {
    /// Detail record for a medicine. The name match is exact and case-sensitive.
    pub fn uses_for(&self, medicine: &Medicine) -> Option<&MedicineUse> {
        self.medicine_uses
            .as_ref()
            .and_then(|uses| uses.get(medicine.name.as_str()))
            .and_then(Option::as_ref)
    }
}

fn lenient_medicine_uses<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, Option<MedicineUse>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(Some(
        entries
            .into_iter()
            .map(|(name, entry)| {
                let uses = match entry {
                    Value::Object(_) => serde_json::from_value(entry).ok(),
                    _ => None,
                };
                (name, uses)
            })
            .collect(),
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prescription {
    pub patient_info: Option<Value>,
    pub doctor_info: Option<Value>,
    pub medicines: Option<Vec<Medicine>>,
    pub additional_instructions: Option<FieldText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Medicine {
    pub name: FieldText,
    pub dosage: FieldText,
    pub frequency: FieldText,
    pub duration: FieldText,
    pub primary_uses: FieldText,
    pub how_it_works: FieldText,
    pub side_effects: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicineUse {
    pub primary_conditions: FieldText,
    pub off_label_uses: FieldText,
    pub how_it_works: FieldText,
    pub expected_benefits: FieldText,
    pub expected_results: FieldText,
    pub common_combinations: FieldText,
    pub age_considerations: FieldText,
    pub lifestyle_recommendations: FieldText,
    pub warning_signs: FieldText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
