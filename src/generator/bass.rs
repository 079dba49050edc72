// Sub Bass - Chord bass notes placed on a genre rhythm

use crate::arranger::Section;
use crate::harmony::ChordInfo;
use crate::patterns::bank::sub;
use crate::patterns::{Genre, NoteSequence, StepPattern};

/// Velocity of the octave-up doubling
pub const SUB_DOUBLE_VELOCITY: f64 = 0.3;

/// Delay of the octave-up doubling in seconds
pub const SUB_DOUBLE_DELAY: f64 = 0.01;

pub fn sub_rhythm(genre: Genre) -> StepPattern {
    match genre {
        Genre::DrumAndBass => sub::HELD,
        Genre::Tropical => sub::DEMBOW,
        Genre::Techno | Genre::Dubstep | Genre::Trance => sub::OFFSET,
    }
}

/// One bar of sub bass on the chord's bass note
pub fn sub_sequence(chord: &ChordInfo, genre: Genre) -> NoteSequence {
    NoteSequence::from_rhythm(&sub_rhythm(genre), chord.bass)
}

/// MAIN and DROP double each sub hit an octave up for presence
pub fn doubles_octave(section: Section) -> bool {
    matches!(section, Section::Main | Section::Drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::ProgressionKind;

    #[test]
    fn test_techno_sub_avoids_kick_steps() {
        let chord = ProgressionKind::Main.chord_at(2);
        let seq = sub_sequence(&chord, Genre::Techno);
        let steps: Vec<usize> = seq.notes().map(|(s, _)| s).collect();
        assert_eq!(steps, vec![1, 9]);
        assert!(seq.notes().all(|(_, n)| n == chord.bass));
    }

    #[test]
    fn test_genre_rhythms() {
        assert_eq!(sub_rhythm(Genre::DrumAndBass).active_steps(), vec![0, 12]);
        assert_eq!(sub_rhythm(Genre::Tropical).active_steps(), vec![0, 3, 6, 8, 11, 14]);
    }

    #[test]
    fn test_octave_doubling_sections() {
        assert!(doubles_octave(Section::Main));
        assert!(doubles_octave(Section::Drop));
        assert!(!doubles_octave(Section::Break));
    }
}
