use upload_flow::AnalysisFlow;

use crate::models::{ReportAnalysis, TreatmentRecommendations};
use crate::render::{Panel, humanize_key, is_structured, join_panels, scalar_text};

pub const REPORT_ENDPOINT: &str = "/api/analyze-report";
pub const REPORT_FLAG_FIELD: &str = "getRecommendations";
pub const REPORT_DEFAULT_ERROR: &str = "Failed to analyze report";

/// Medical report analysis, optionally with treatment recommendations.
pub struct ReportFlow;

impl AnalysisFlow for ReportFlow {
    type Output = ReportAnalysis;

    fn id(&self) -> &str {
        "report_analysis"
    }

    fn endpoint(&self) -> &str {
        REPORT_ENDPOINT
    }

    fn flag_field(&self) -> &str {
        REPORT_FLAG_FIELD
    }

    fn default_error(&self) -> &str {
        REPORT_DEFAULT_ERROR
    }

    fn render(&self, output: &ReportAnalysis) -> String {
        render_report(output)
    }
}

pub fn render_report(report: &ReportAnalysis) -> String {
    let mut panels = vec![analysis_panel(report)];
    if let Some(recommendations) = &report.treatment_recommendations {
        panels.push(recommendations_panel(recommendations));
    }
    join_panels(&panels)
}

fn analysis_panel(report: &ReportAnalysis) -> Panel {
    let mut panel = Panel::new("Analysis Results");

    for (key, value) in report.data.iter().flatten() {
        let label = humanize_key(key);
        if is_structured(value) {
            panel.json_block(0, &label, value);
        } else {
            panel.field(0, &label, &scalar_text(value));
        }
    }

    panel
}

fn recommendations_panel(recommendations: &TreatmentRecommendations) -> Panel {
    let mut panel = Panel::new("Health Recommendations");

    panel.list_section(
        "General Recommendations",
        recommendations.general_recommendations.as_ref(),
        |panel, rec| {
            panel.heading(0, &rec.category);
            panel.field(1, "Description", &rec.description);
            panel.field(1, "Importance", &rec.importance);
            panel.field(1, "Expected Outcome", &rec.expected_outcome);
        },
    );

    panel.list_section(
        "Lifestyle Changes",
        recommendations.lifestyle_changes.as_ref(),
        |panel, change| {
            panel.heading(0, &change.change);
            panel.field(1, "Reason", &change.reason);
            panel.field(1, "Implementation", &change.implementation);
        },
    );

    panel.list_section(
        "Dietary Guidelines",
        recommendations.dietary_guidelines.as_ref(),
        |panel, guideline| {
            panel.heading(0, &guideline.food_group);
            panel.field(1, "Recommendation", &guideline.recommendation);
            panel.field(1, "Benefits", &guideline.benefits);
        },
    );

    panel.list_section(
        "Monitoring Instructions",
        recommendations.monitoring_instructions.as_ref(),
        |panel, instruction| {
            panel.heading(0, &instruction.what_to_monitor);
            panel.field(1, "Frequency", &instruction.frequency);
            if let Some(signs) = instruction.warning_signs.as_ref().filter(|s| !s.is_empty()) {
                panel.text(1, "Warning Signs:");
                for sign in signs {
                    panel.bullet(2, sign);
                }
            }
        },
    );

    panel.list_section(
        "Follow-up Tests",
        recommendations.follow_up_tests.as_ref(),
        |panel, test| {
            panel.heading(0, &test.test_name);
            panel.field(1, "Purpose", &test.purpose);
            panel.field(1, "Timing", &test.timing);
        },
    );

    panel.list_section(
        "Precautions",
        recommendations.precautions.as_ref(),
        |panel, precaution| {
            panel.heading(0, &precaution.precaution);
            panel.field(1, "Reason", &precaution.reason);
        },
    );

    if let Some(recovery) = recommendations
        .expected_recovery_time
        .as_ref()
        .filter(|text| !text.is_empty())
    {
        panel.section("Expected Recovery Time");
        panel.text(0, recovery);
    }

    panel.list_section(
        "When to Seek Medical Help",
        recommendations.when_to_seek_help.as_ref(),
        |panel, situation| panel.bullet(0, situation),
    );

    panel
}
