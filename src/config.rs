use config::Config;
use serde::Deserialize;

use crate::error::ProcessError;

/// Tunables for segmentation, matching and rendering. Defaults reproduce the
/// behavior of the final manual runs; any field can be overridden through the
/// environment, e.g. `LIKUTEI_MATCH_THRESHOLD=0.3`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Minimum combined score for a summary/passage pairing to count.
    pub match_threshold: f64,
    /// Minimum Hebrew word length treated as a significant keyword.
    pub keyword_min_len: usize,
    /// How many chars of a passage body participate in keyword overlap.
    pub keyword_window: usize,
    /// Page distance (in Hebrew-numeral units) still considered "near".
    pub page_window: u32,
    /// Rendered passage bodies are cut at this many chars.
    pub truncate_chars: usize,
    /// Bold openings longer than this are body text, not passage headings.
    pub max_opening_len: usize,
    /// Retry budget for page collection.
    pub retry_attempts: u32,
    /// Seconds between retry attempts.
    pub retry_delay_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ProcessError> {
        let settings = Config::builder()
            .set_default("match_threshold", 0.25)?
            .set_default("keyword_min_len", 3)?
            .set_default("keyword_window", 600)?
            .set_default("page_window", 3)?
            .set_default("truncate_chars", 3000)?
            .set_default("max_opening_len", 80)?
            .set_default("retry_attempts", 3)?
            .set_default("retry_delay_secs", 5)?
            .add_source(config::Environment::with_prefix("LIKUTEI"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            match_threshold: 0.25,
            keyword_min_len: 3,
            keyword_window: 600,
            page_window: 3,
            truncate_chars: 3000,
            max_opening_len: 80,
            retry_attempts: 3,
            retry_delay_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_loaded() {
        let loaded = Settings::load().unwrap();
        let default = Settings::default();
        assert_eq!(loaded.match_threshold, default.match_threshold);
        assert_eq!(loaded.truncate_chars, default.truncate_chars);
        assert_eq!(loaded.retry_attempts, default.retry_attempts);
    }
}
