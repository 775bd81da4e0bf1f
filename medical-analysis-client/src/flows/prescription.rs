use upload_flow::AnalysisFlow;

use crate::models::{Medicine, MedicineUse, PrescriptionAnalysis};
use crate::render::{Panel, has_content, pretty_json};

pub const PRESCRIPTION_ENDPOINT: &str = "/api/analyze-prescription";
pub const PRESCRIPTION_FLAG_FIELD: &str = "getMedicineUses";
pub const PRESCRIPTION_DEFAULT_ERROR: &str = "Failed to analyze prescription";

/// Prescription analysis, optionally with per-medicine usage details.
pub struct PrescriptionFlow;

impl AnalysisFlow for PrescriptionFlow {
    type Output = PrescriptionAnalysis;

    fn id(&self) -> &str {
        "prescription_analysis"
    }

    fn endpoint(&self) -> &str {
        PRESCRIPTION_ENDPOINT
    }

    fn flag_field(&self) -> &str {
        PRESCRIPTION_FLAG_FIELD
    }

    fn default_error(&self) -> &str {
        PRESCRIPTION_DEFAULT_ERROR
    }

    fn render(&self, output: &PrescriptionAnalysis) -> String {
        render_prescription(output)
    }
}

pub fn render_prescription(analysis: &PrescriptionAnalysis) -> String {
    let prescription = &analysis.prescription;
    let mut panel = Panel::new("Prescription Analysis");

    if let Some(patient) = prescription.patient_info.as_ref().filter(|info| has_content(info)) {
        panel.section("Patient Information");
        panel.text(0, pretty_json(patient));
    }

    if let Some(doctor) = prescription.doctor_info.as_ref().filter(|info| has_content(info)) {
        panel.section("Doctor Information");
        panel.text(0, pretty_json(doctor));
    }

    panel.list_section(
        "Prescribed Medicines",
        prescription.medicines.as_ref(),
        |panel, medicine| {
            render_medicine(panel, medicine);
            if let Some(uses) = analysis.uses_for(medicine) {
                render_medicine_uses(panel, uses);
            }
        },
    );

    if let Some(instructions) = prescription
        .additional_instructions
        .as_ref()
        .filter(|text| !text.is_empty())
    {
        panel.section("Additional Instructions");
        panel.text(0, instructions);
    }

    panel.to_string()
}

fn render_medicine(panel: &mut Panel, medicine: &Medicine) {
    panel.heading(0, &medicine.name);
    panel.field(1, "Dosage", &medicine.dosage);
    panel.field(1, "Frequency", &medicine.frequency);
    panel.field(1, "Duration", &medicine.duration);
    panel.field(1, "Primary Uses", &medicine.primary_uses);
    panel.field(1, "How it works", &medicine.how_it_works);
    panel.field(1, "Side Effects", &medicine.side_effects);
}

fn render_medicine_uses(panel: &mut Panel, uses: &MedicineUse) {
    panel.text(1, "Detailed Uses and Applications:");
    panel.field(2, "Conditions Treated", &uses.primary_conditions);
    panel.field(2, "Off-label Uses", &uses.off_label_uses);
    panel.field(2, "Mechanism of Action", &uses.how_it_works);
    panel.field(2, "Expected Benefits", &uses.expected_benefits);
    panel.field(2, "When to Expect Results", &uses.expected_results);
    panel.field(2, "Common Combinations", &uses.common_combinations);
    panel.field(2, "Age Considerations", &uses.age_considerations);
    panel.field(2, "Lifestyle Recommendations", &uses.lifestyle_recommendations);
    panel.field(2, "Warning Signs", &uses.warning_signs);
}
