// Section Structure - The fixed 64-bar arrangement cycle
// Section is a pure function of the bar index so displays can query it freely

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of one full arrangement cycle in bars
pub const SECTION_CYCLE_BARS: u64 = 64;

/// Named phase of the arrangement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    Intro,
    Build,
    Main,
    Break,
    Drop,
    Outro,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Intro => "INTRO",
            Section::Build => "BUILD",
            Section::Main => "MAIN",
            Section::Break => "BREAK",
            Section::Drop => "DROP",
            Section::Outro => "OUTRO",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section's span within the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpan {
    /// Starting bar within the cycle (inclusive)
    pub start_bar: u64,

    /// Ending bar within the cycle (exclusive)
    pub end_bar: u64,

    pub section: Section,
}

impl SectionSpan {
    pub fn length_bars(&self) -> u64 {
        self.end_bar - self.start_bar
    }

    pub fn contains(&self, position: u64) -> bool {
        position >= self.start_bar && position < self.end_bar
    }

    /// Last bar of the span, where a fill is played
    pub fn last_bar(&self) -> u64 {
        self.end_bar - 1
    }
}

/// Boundaries [0, 8, 16, 32, 40, 56, 64)
pub const SECTION_TABLE: [SectionSpan; 6] = [
    SectionSpan { start_bar: 0, end_bar: 8, section: Section::Intro },
    SectionSpan { start_bar: 8, end_bar: 16, section: Section::Build },
    SectionSpan { start_bar: 16, end_bar: 32, section: Section::Main },
    SectionSpan { start_bar: 32, end_bar: 40, section: Section::Break },
    SectionSpan { start_bar: 40, end_bar: 56, section: Section::Drop },
    SectionSpan { start_bar: 56, end_bar: 64, section: Section::Outro },
];

fn span_at(bar: u64) -> &'static SectionSpan {
    let position = bar % SECTION_CYCLE_BARS;
    SECTION_TABLE
        .iter()
        .find(|span| span.contains(position))
        .unwrap_or(&SECTION_TABLE[0])
}

/// Section for any bar index
pub fn get_section(bar: u64) -> Section {
    span_at(bar).section
}

/// True on the last bar of every section, where a drum fill replaces the groove
pub fn is_approaching_transition(bar: u64) -> bool {
    let position = bar % SECTION_CYCLE_BARS;
    SECTION_TABLE.iter().any(|span| span.last_bar() == position)
}

/// The next section after `bar` and how many bars until it starts
pub fn upcoming_section(bar: u64) -> (Section, u64) {
    let span = span_at(bar);
    let position = bar % SECTION_CYCLE_BARS;
    let bars_until = span.end_bar - position;
    (get_section(bar + bars_until), bars_until)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_section(bar: u64) -> Section {
        match bar % 64 {
            0..=7 => Section::Intro,
            8..=15 => Section::Build,
            16..=31 => Section::Main,
            32..=39 => Section::Break,
            40..=55 => Section::Drop,
            _ => Section::Outro,
        }
    }

    #[test]
    fn test_section_matches_boundary_table() {
        for bar in 0..640 {
            assert_eq!(get_section(bar), reference_section(bar), "bar {}", bar);
        }
    }

    #[test]
    fn test_transition_bars() {
        let expected = [7, 15, 31, 39, 55, 63];
        for bar in 0..640u64 {
            assert_eq!(
                is_approaching_transition(bar),
                expected.contains(&(bar % 64)),
                "bar {}",
                bar
            );
        }
    }

    #[test]
    fn test_table_covers_cycle_without_gaps() {
        assert_eq!(SECTION_TABLE[0].start_bar, 0);
        for pair in SECTION_TABLE.windows(2) {
            assert_eq!(pair[0].end_bar, pair[1].start_bar);
        }
        assert_eq!(SECTION_TABLE[5].end_bar, SECTION_CYCLE_BARS);
        let total: u64 = SECTION_TABLE.iter().map(|s| s.length_bars()).sum();
        assert_eq!(total, SECTION_CYCLE_BARS);
    }

    #[test]
    fn test_upcoming_section() {
        assert_eq!(upcoming_section(0), (Section::Build, 8));
        assert_eq!(upcoming_section(7), (Section::Build, 1));
        assert_eq!(upcoming_section(20), (Section::Break, 12));
        assert_eq!(upcoming_section(63), (Section::Intro, 1));
        assert_eq!(upcoming_section(64 + 41), (Section::Outro, 15));
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Section::Drop).unwrap(), "\"DROP\"");
        assert_eq!(Section::Break.to_string(), "BREAK");
    }
}
