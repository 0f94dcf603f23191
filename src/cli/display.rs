// ============================================================
// Layer 1 — Output Formatting
// ============================================================
// Turns use-case results into the lines printed on stdout.
// Kept free of I/O so the formats can be tested directly.

use crate::application::ambiguity_use_case::AmbiguityReport;
use crate::application::predict_use_case::RankedRecord;
use crate::infra::metrics::EvaluationMetrics;

/// `A B<TAB>sentence`, or `A(0.6100) B(0.2000)<TAB>sentence` with probabilities.
pub fn prediction_line(ranked: &RankedRecord, with_probs: bool) -> String {
    let classes = if with_probs {
        ranked
            .prediction
            .ranked
            .iter()
            .map(|s| format!("{}({:.4})", s.class, s.prob))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        ranked.prediction.class_names()
    };
    format!("{}\t{}", classes, ranked.record.sentence())
}

pub fn accuracy_line(metrics: &EvaluationMetrics) -> String {
    format!("Accuracy: {} %", metrics.accuracy_percent())
}

pub fn ambiguity_lines(report: &AmbiguityReport, margin: f32) -> Vec<String> {
    let mut lines = vec![format!(
        "Close calls (margin {}): {} / {}",
        margin, report.close_calls, report.total
    )];

    lines.push("Classes:".to_string());
    for (class, count) in &report.class_counts {
        lines.push(format!("  {class}\t{count}"));
    }

    lines.push("Pairs:".to_string());
    for ((first, second), count) in &report.pair_counts {
        lines.push(format!("  {first} / {second}\t{count}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{Prediction, ScoredClass};
    use crate::domain::record::InputRecord;

    fn ranked() -> RankedRecord {
        RankedRecord {
            record: InputRecord::new("A", vec!["the".into(), "model".into()]),
            prediction: Prediction {
                ranked: vec![
                    ScoredClass { class: "A".into(), prob: 0.61 },
                    ScoredClass { class: "C".into(), prob: 0.2 },
                ],
            },
        }
    }

    #[test]
    fn test_prediction_line() {
        assert_eq!(prediction_line(&ranked(), false), "A C\tthe model");
        assert_eq!(prediction_line(&ranked(), true), "A(0.6100) C(0.2000)\tthe model");
    }

    #[test]
    fn test_accuracy_is_floored() {
        let metrics = EvaluationMetrics {
            model:         "m".into(),
            members:       "rnn".into(),
            total:         3,
            correct:       2,
            disambiguated: 0,
        };
        assert_eq!(accuracy_line(&metrics), "Accuracy: 66 %");
    }

    #[test]
    fn test_ambiguity_lines() {
        let report = AmbiguityReport {
            total:        5,
            close_calls:  1,
            class_counts: vec![("A".into(), 1), ("B".into(), 1)],
            pair_counts:  vec![(("A".into(), "B".into()), 1)],
        };
        let lines = ambiguity_lines(&report, 0.1);
        assert_eq!(lines[0], "Close calls (margin 0.1): 1 / 5");
        assert_eq!(lines.last().unwrap(), "  A / B\t1");
        assert_eq!(lines.len(), 6);
    }
}
