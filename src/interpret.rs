use crate::models::{MeasurementStatus, MetricStatus, ReportStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub summary: &'static str,
    pub recommendation: &'static str,
}

pub fn metric_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Balanced => "Balanced",
        MetricStatus::Manage => "Manage",
        MetricStatus::Consult => "Consult",
        MetricStatus::Book => "Schedule test",
    }
}

/// Shorter labels used on the vitals dashboard cards.
pub fn dashboard_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Balanced => "Balanced",
        MetricStatus::Manage => "Manage",
        MetricStatus::Consult => "Review",
        MetricStatus::Book => "Book",
    }
}

pub fn report_status_text(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Normal => "All normal",
        ReportStatus::Mixed => "Mixed results",
        ReportStatus::Review => "Needs review",
    }
}

pub fn measurement_flag(status: MeasurementStatus) -> &'static str {
    match status {
        MeasurementStatus::Normal => "Normal",
        MeasurementStatus::High => "High",
        MeasurementStatus::Low => "Low",
    }
}

pub fn interpret(status: MetricStatus) -> Interpretation {
    match status {
        MetricStatus::Balanced => Interpretation {
            summary: "Your result is within the normal range, which is a positive sign for your \
                      overall health. Values in this range typically indicate normal physiological \
                      function.",
            recommendation: "Continue your current health practices including a balanced diet, \
                             regular exercise, and follow-up testing as recommended by your \
                             healthcare provider.",
        },
        MetricStatus::Manage => Interpretation {
            summary: "Your result is outside the optimal range but doesn't require immediate \
                      medical attention. This could be influenced by diet, exercise, stress, \
                      medications, or other factors.",
            recommendation: "Consider lifestyle adjustments such as dietary changes, increased \
                             physical activity, or stress management techniques. Monitor this \
                             value more frequently and discuss with your healthcare provider at \
                             your next visit.",
        },
        MetricStatus::Consult => Interpretation {
            summary: "Your result is significantly outside the expected range, which may indicate \
                      a health concern that requires attention. Various factors could be \
                      contributing to this result.",
            recommendation: "It's recommended to consult with your healthcare provider soon to \
                             discuss this result. They may want to perform additional tests or \
                             discuss treatment options. Don't make significant changes to \
                             medications or health routines without professional guidance.",
        },
        MetricStatus::Book => Interpretation {
            summary: "This test needs to be scheduled or completed. Regular monitoring is \
                      important to establish baselines and track changes over time.",
            recommendation: "Book an appointment for this test at your convenience. Regular \
                             testing helps your healthcare provider monitor your health \
                             effectively and catch potential issues early.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consult_reads_differently_on_the_dashboard() {
        assert_eq!(metric_label(MetricStatus::Consult), "Consult");
        assert_eq!(dashboard_label(MetricStatus::Consult), "Review");
        assert_eq!(metric_label(MetricStatus::Book), "Schedule test");
    }

    #[test]
    fn report_and_measurement_text() {
        assert_eq!(report_status_text(ReportStatus::Review), "Needs review");
        assert_eq!(measurement_flag(MeasurementStatus::Low), "Low");
    }

    #[test]
    fn every_status_has_an_interpretation() {
        for status in [
            MetricStatus::Balanced,
            MetricStatus::Manage,
            MetricStatus::Consult,
            MetricStatus::Book,
        ] {
            let interpretation = interpret(status);
            assert!(!interpretation.summary.is_empty());
            assert!(!interpretation.recommendation.contains("  "));
        }
        assert!(interpret(MetricStatus::Book).summary.starts_with("This test needs"));
    }
}
