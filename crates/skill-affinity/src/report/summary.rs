use super::views::{AffinityReportView, MatchBreakdownView, ScoringCase};
use crate::affinity::domain::{round_to_places, round_to_tenth};
use crate::affinity::{AffinityResult, FactorApplication, MatchEntry};

impl AffinityResult {
    pub fn scoring_case(&self) -> ScoringCase {
        if self.is_special_case_3_to_1 {
            ScoringCase::ThreeToOne
        } else if self.is_single_match_case {
            ScoringCase::SingleMatch
        } else {
            ScoringCase::Normal
        }
    }

    pub fn report_view(&self) -> AffinityReportView {
        AffinityReportView {
            level: self.level,
            level_label: self.level.label(),
            score: self.rounded_score(),
            percentage: round_to_tenth(self.percentage),
            scoring_case: self.scoring_case(),
            match_count: self.match_count,
            subject1_size: self.subject1_size,
            subject2_size: self.subject2_size,
            coverage_percent: self.coverage_percent(),
            proportional_factor: round_to_hundredth(self.proportional_factor),
            coverage_factor: round_to_hundredth(self.coverage_factor),
            matches: self.matches.iter().map(MatchEntry::breakdown).collect(),
            notes: result_notes(self),
        }
    }
}

impl MatchEntry {
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.is_special_case {
            tags.push("three_to_one");
        }
        if self.is_single_match_case {
            tags.push("single_match");
        }
        if self.is_premium_match {
            tags.push("premium");
        }
        if self.is_value_two_match {
            tags.push("value_two");
        }
        if self.is_superior_rating {
            tags.push("superior_rating");
        }
        tags
    }

    /// Human-readable account of how the value was reached, derived only from
    /// the entry's flags and numbers.
    pub fn explanation(&self) -> String {
        let pair = format!("{}-{}", self.subject1_weight, self.subject2_weight);

        if self.is_special_case {
            return format!(
                "{:.1} (lone {pair} match, fixed value, no factor)",
                self.final_value
            );
        }

        let rule = if self.is_single_match_case {
            if self.is_superior_rating && self.base_value == 2.5 {
                format!("single {pair} match, superior rating override")
            } else {
                format!("single {pair} match formula")
            }
        } else {
            match (
                self.is_premium_match,
                self.is_value_two_match,
                self.is_superior_rating,
            ) {
                (true, _, _) => format!("{pair}, premium match"),
                (_, true, _) => format!("{pair}, value-two match"),
                (_, _, true) => format!("{pair}, superior rating"),
                _ => pair,
            }
        };

        match self.proportional_factor_applied {
            FactorApplication::Applied { factor } => format!(
                "{:.1} ({rule}) x{factor:.2} = {:.2}",
                self.base_value, self.final_value
            ),
            FactorApplication::Capped { factor, cap } if self.final_value >= cap => format!(
                "{:.1} ({rule}) x{factor:.2}, capped at {cap:.1}",
                self.base_value
            ),
            FactorApplication::Capped { factor, cap } => format!(
                "{:.1} ({rule}) x{factor:.2} = {:.2}, within cap {cap:.1}",
                self.base_value, self.final_value
            ),
            FactorApplication::NotApplicable => {
                format!("{:.1} ({rule})", self.final_value)
            }
        }
    }

    fn breakdown(&self) -> MatchBreakdownView {
        MatchBreakdownView {
            name: self.name.clone(),
            subject1_weight: self.subject1_weight.value(),
            subject2_weight: self.subject2_weight.value(),
            base_value: round_to_hundredth(self.base_value),
            final_value: round_to_hundredth(self.final_value),
            proportional_factor: self
                .proportional_factor_applied
                .factor()
                .map(round_to_hundredth),
            capped: self
                .proportional_factor_applied
                .cap_reached(self.final_value),
            tags: self.tags(),
            explanation: self.explanation(),
        }
    }
}

fn result_notes(result: &AffinityResult) -> Vec<String> {
    let mut notes = Vec::new();

    match result.scoring_case() {
        ScoringCase::ThreeToOne => notes.push(
            "lone match rated 3 against 1: value fixed at 1.0 and level forced to low".to_string(),
        ),
        ScoringCase::SingleMatch => notes.push(format!(
            "single match against {} requirements: score capped at 3.0, medium from 2.5",
            result.subject1_size
        )),
        ScoringCase::Normal => {
            if result.coverage_factor < 1.0 {
                notes.push(format!(
                    "coverage {:.1}% is below 80%: total scaled by {:.2}",
                    result.coverage_percent(),
                    result.coverage_factor
                ));
            } else {
                notes.push(format!(
                    "coverage {:.1}%: no coverage penalty",
                    result.coverage_percent()
                ));
            }
        }
    }

    if result.match_count > 0 && result.proportional_factor > 1.0 {
        notes.push(format!(
            "profile lists {} attributes (fewer than 8): values boosted by x{:.2}",
            result.subject2_size, result.proportional_factor
        ));
    }

    notes
}

/// Plain-text report suitable for terminals and logs.
pub fn render_text(result: &AffinityResult) -> String {
    let view = result.report_view();
    let mut lines = vec![
        format!(
            "Affinity: {} (score {:.1} / 15, {:.1}%)",
            view.level_label, view.score, view.percentage
        ),
        format!(
            "Matches: {} of {} requirements (coverage {:.1}%, {} rules)",
            view.match_count,
            view.subject1_size,
            view.coverage_percent,
            view.scoring_case.label()
        ),
    ];

    if view.matches.is_empty() {
        lines.push("  no shared attributes".to_string());
    }
    for entry in &view.matches {
        lines.push(format!("  - {}: {}", entry.name, entry.explanation));
    }

    if !view.notes.is_empty() {
        lines.push("Notes:".to_string());
        lines.extend(view.notes.iter().map(|note| format!("  * {note}")));
    }

    lines.join("\n")
}

fn round_to_hundredth(value: f64) -> f64 {
    round_to_places(value, 2)
}
