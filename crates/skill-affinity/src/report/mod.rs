mod summary;
pub mod views;

pub use summary::render_text;
pub use views::{AffinityReportView, MatchBreakdownView, ScoringCase};
