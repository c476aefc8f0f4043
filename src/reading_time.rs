//! Reading-time estimates and their coffee-cup labels.
//!
//! A post's estimated reading time is shown as a row of cups, one per five
//! minutes of reading (never fewer than one), followed by the literal minutes:
//!
//! ```
//! assert_eq!(cafecito::reading_time::label(10.0), "• ☕️☕️ 10 min de lectura");
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_MARKER: &str = "•";
pub const DEFAULT_GLYPH: &str = "☕️";
pub const DEFAULT_SUFFIX: &str = "min de lectura";
pub const DEFAULT_MINUTES_PER_GLYPH: f64 = 5.0;
pub const DEFAULT_WORDS_PER_MINUTE: usize = 265;

/// Upper bound on the glyphs in one label. Longer rows would not fit a post
/// entry, and unbounded counts overflow the allocation for huge inputs.
pub const MAX_GLYPHS: usize = 60;

/// Formats reading times with a configurable marker, glyph and suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingTimeLabeler {
    pub marker: String,
    pub glyph: String,
    pub suffix: String,
    pub minutes_per_glyph: f64,
}

impl Default for ReadingTimeLabeler {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            glyph: DEFAULT_GLYPH.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            minutes_per_glyph: DEFAULT_MINUTES_PER_GLYPH,
        }
    }
}

impl ReadingTimeLabeler {
    /// Number of glyphs shown for `minutes`.
    ///
    /// Rounds half away from zero and clamps to `1..=MAX_GLYPHS`. Negative
    /// and NaN inputs land on the lower clamp.
    pub fn units(&self, minutes: f64) -> usize {
        let units = (minutes / self.minutes_per_glyph).round();
        if units >= 1.0 {
            units.min(MAX_GLYPHS as f64) as usize
        } else {
            1
        }
    }

    pub fn label(&self, minutes: f64) -> String {
        // -0 prints as "-0"
        let shown = if minutes == 0.0 { 0.0 } else { minutes };
        format!(
            "{} {} {} {}",
            self.marker,
            self.glyph.repeat(self.units(minutes)),
            shown,
            self.suffix
        )
    }
}

/// Labels `minutes` with the default coffee-cup format.
pub fn label(minutes: f64) -> String {
    ReadingTimeLabeler::default().label(minutes)
}

/// Whole minutes needed to read `words` at `words_per_minute`, at least one.
pub fn estimate_minutes(words: usize, words_per_minute: usize) -> u32 {
    if words_per_minute == 0 {
        return 1;
    }
    let minutes = (words as f64 / words_per_minute as f64).round() as u32;
    minutes.max(1)
}
