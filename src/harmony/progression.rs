// Chord Progressions - Harmony tables tagged by arrangement role
// Four progressions in C minor, cycled one chord at a time by the arranger

use serde::{Deserialize, Serialize};

use super::note::{Note, PitchClass};

use PitchClass::{Ab, Bb, B, C, D, Eb, F, G};

/// One chord of a progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChordInfo {
    /// Chord root
    pub root: PitchClass,

    /// Stab voicing, lowest note first
    pub chord: &'static [Note],

    /// Sub bass note
    pub bass: Note,

    /// Pitch classes the acid line lands on for strong beats.
    /// Order is contour preference, not priority.
    pub melodic_focus: &'static [PitchClass],
}

impl ChordInfo {
    /// Safe stand-in when no progression is available: the bare root
    pub const FALLBACK: ChordInfo = ChordInfo {
        root: C,
        chord: &[Note::new(C, 3)],
        bass: Note::new(C, 1),
        melodic_focus: &[C],
    };

    /// Short label for displays: "C7" for four-note chords, "Cm" otherwise
    pub fn display_name(&self) -> String {
        let suffix = if self.chord.len() > 3 { "7" } else { "m" };
        format!("{}{}", self.root, suffix)
    }
}

/// Named progression variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionKind {
    /// Canonical i - i - VII - VI loop, anchors every 16-bar block
    Main,

    /// i - iv - v - i
    Variation1,

    /// Seventh-chord voicings used for drops
    Variation2,

    /// Sparse roots and power chords for breakdowns
    Breakdown,
}

impl ProgressionKind {
    /// The chords of this progression
    pub fn chords(&self) -> &'static [ChordInfo] {
        match self {
            ProgressionKind::Main => &MAIN,
            ProgressionKind::Variation1 => &VARIATION1,
            ProgressionKind::Variation2 => &VARIATION2,
            ProgressionKind::Breakdown => &BREAKDOWN,
        }
    }

    /// Chord at an index, wrapping; falls back to the bare root for empty tables
    pub fn chord_at(&self, index: usize) -> ChordInfo {
        let chords = self.chords();
        if chords.is_empty() {
            return ChordInfo::FALLBACK;
        }
        chords[index % chords.len()]
    }

    pub fn len(&self) -> usize {
        self.chords().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords().is_empty()
    }
}

const MAIN: [ChordInfo; 4] = [
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4)],
        bass: Note::new(C, 1),
        melodic_focus: &[C, Eb, G],
    },
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4)],
        bass: Note::new(C, 1),
        melodic_focus: &[G, Eb, C],
    },
    ChordInfo {
        root: Bb,
        chord: &[Note::new(Bb, 3), Note::new(D, 4), Note::new(F, 4)],
        bass: Note::new(Bb, 0),
        melodic_focus: &[Bb, F, D],
    },
    ChordInfo {
        root: Ab,
        chord: &[Note::new(Ab, 3), Note::new(C, 4), Note::new(Eb, 4)],
        bass: Note::new(Ab, 0),
        melodic_focus: &[Ab, Eb, C],
    },
];

const VARIATION1: [ChordInfo; 4] = [
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4)],
        bass: Note::new(C, 1),
        melodic_focus: &[C, G, Eb],
    },
    ChordInfo {
        root: F,
        chord: &[Note::new(F, 3), Note::new(Ab, 3), Note::new(C, 4)],
        bass: Note::new(F, 0),
        melodic_focus: &[F, Ab, C],
    },
    ChordInfo {
        root: G,
        chord: &[Note::new(G, 3), Note::new(Bb, 3), Note::new(D, 4)],
        bass: Note::new(G, 0),
        melodic_focus: &[G, D, Bb],
    },
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4)],
        bass: Note::new(C, 1),
        melodic_focus: &[C, Eb, G],
    },
];

const VARIATION2: [ChordInfo; 4] = [
    // Cm7
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4), Note::new(Bb, 4)],
        bass: Note::new(C, 1),
        melodic_focus: &[C, Bb, G],
    },
    // Abmaj7
    ChordInfo {
        root: Ab,
        chord: &[Note::new(Ab, 3), Note::new(C, 4), Note::new(Eb, 4), Note::new(G, 4)],
        bass: Note::new(Ab, 0),
        melodic_focus: &[Ab, Eb, G],
    },
    // Fm7
    ChordInfo {
        root: F,
        chord: &[Note::new(F, 3), Note::new(Ab, 3), Note::new(C, 4), Note::new(Eb, 4)],
        bass: Note::new(F, 0),
        melodic_focus: &[F, C, Ab],
    },
    // G7: the leading tone stays in the stab voicing only, the acid line keeps to the scale
    ChordInfo {
        root: G,
        chord: &[Note::new(G, 3), Note::new(B, 3), Note::new(D, 4), Note::new(F, 4)],
        bass: Note::new(G, 0),
        melodic_focus: &[G, F, D],
    },
];

const BREAKDOWN: [ChordInfo; 4] = [
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 3)],
        bass: Note::new(C, 1),
        melodic_focus: &[C],
    },
    ChordInfo {
        root: C,
        chord: &[Note::new(C, 3), Note::new(G, 3)],
        bass: Note::new(C, 1),
        melodic_focus: &[C, G],
    },
    ChordInfo {
        root: Ab,
        chord: &[Note::new(Ab, 2)],
        bass: Note::new(Ab, 0),
        melodic_focus: &[Ab],
    },
    ChordInfo {
        root: G,
        chord: &[Note::new(G, 2), Note::new(D, 3)],
        bass: Note::new(G, 0),
        melodic_focus: &[G, D],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::scale::C_MINOR;

    const ALL_KINDS: [ProgressionKind; 4] = [
        ProgressionKind::Main,
        ProgressionKind::Variation1,
        ProgressionKind::Variation2,
        ProgressionKind::Breakdown,
    ];

    #[test]
    fn test_every_progression_has_four_chords() {
        for kind in ALL_KINDS {
            assert_eq!(kind.len(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_melodic_focus_stays_in_scale() {
        for kind in ALL_KINDS {
            for chord in kind.chords() {
                assert!(!chord.melodic_focus.is_empty());
                for pitch in chord.melodic_focus {
                    assert!(C_MINOR.contains(*pitch), "{:?} {:?}", kind, pitch);
                }
            }
        }
    }

    #[test]
    fn test_chord_at_wraps() {
        let main = ProgressionKind::Main;
        assert_eq!(main.chord_at(5), main.chord_at(1));
        assert_eq!(main.chord_at(2).root, PitchClass::Bb);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ProgressionKind::Variation2.chord_at(0).display_name(), "C7");
        assert_eq!(ProgressionKind::Main.chord_at(3).display_name(), "Abm");
        assert_eq!(ChordInfo::FALLBACK.display_name(), "Cm");
    }

    #[test]
    fn test_breakdown_is_sparse() {
        for chord in ProgressionKind::Breakdown.chords() {
            assert!(chord.chord.len() <= 2);
        }
    }
}
