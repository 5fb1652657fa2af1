use crate::config::ObserverConfig;
use crate::error::Result;
use crate::types::round2;
use regex::Regex;

/// Why the observer ended a trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// The score went down.
    Regression { previous: f64, current: f64 },
    /// The score moved less than the progress threshold in one interval.
    Stall { previous: f64, current: f64 },
    /// A game-over word appeared on screen.
    Keyword(String),
}

/// What one sample of extracted text means for the shared slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assessment {
    /// Score to publish; `None` leaves the slot untouched.
    pub score: Option<f64>,
    pub termination: Option<TerminationReason>,
}

/// Parses scores out of OCR text and applies the stall/regression policy.
#[derive(Debug, Clone)]
pub struct ScoreReader {
    pattern: Regex,
    keywords: Vec<String>,
    progress_threshold: f64,
}

impl ScoreReader {
    pub fn new(config: &ObserverConfig) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(-?\d+(?:\.\d+)?) {}",
            regex::escape(&config.unit_keyword)
        ))?;

        Ok(Self {
            pattern,
            keywords: config
                .termination_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            progress_threshold: config.progress_threshold,
        })
    }

    /// Smallest number followed by the unit keyword.
    ///
    /// The game shows a live distance counter next to the final one once the
    /// runner falls; the live one keeps creeping, so the minimum is the stable
    /// reading.
    pub fn parse_score(&self, text: &str) -> Option<f64> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .fold(None, |min: Option<f64>, value| {
                Some(min.map_or(value, |m| m.min(value)))
            })
    }

    pub fn find_keyword(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Compare a fresh sample against the previously published score.
    pub fn assess(&self, previous: f64, text: &str) -> Assessment {
        let mut termination = None;

        let score = self.parse_score(text).map(|current| {
            if current < previous {
                termination = Some(TerminationReason::Regression { previous, current });
                current
            } else if (current - previous).abs() < self.progress_threshold {
                termination = Some(TerminationReason::Stall { previous, current });
                round2(current)
            } else {
                round2(current)
            }
        });

        if termination.is_none() {
            termination = self
                .find_keyword(text)
                .map(|k| TerminationReason::Keyword(k.to_string()));
        }

        Assessment { score, termination }
    }
}
