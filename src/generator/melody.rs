// Acid Line Generator - Scale-bound 303 melodies with stepwise continuity
// Strong beats land on chord focus tones; the rest mostly walk from the last note

use rand::seq::SliceRandom;
use rand::Rng;

use crate::arranger::Section;
use crate::harmony::{ChordInfo, Note, PitchClass, Scale, C_MINOR};
use crate::patterns::bank::acid;
use crate::patterns::{NoteSequence, StepPattern, STEPS_PER_BAR};

/// Chance that an off-beat step walks from the previous note
pub const STEPWISE_PROBABILITY: f64 = 0.7;

/// Chance that a walking step jumps a third instead of a second
pub const THIRD_JUMP_PROBABILITY: f64 = 0.3;

/// Tension above which random accents appear between the beat accents
const RANDOM_ACCENT_TENSION: f64 = 50.0;

/// The line changes every second bar, like a 2-bar 303 phrase
pub fn regenerates_on(bar: u64) -> bool {
    bar % 2 == 0
}

/// Octave the line sits in for a section
pub fn octave_for(section: Section) -> i8 {
    if section == Section::Drop {
        3
    } else {
        2
    }
}

/// Pick the rhythm for the acid line; pitch is chosen separately
pub fn acid_rhythm<R: Rng + ?Sized>(section: Section, rng: &mut R) -> StepPattern {
    match section {
        Section::Drop => *[acid::PHUTURE, acid::WINK, acid::HARDFLOOR]
            .choose(rng)
            .unwrap_or(&acid::PHUTURE),
        Section::Build => acid::PIERRE,
        Section::Break => acid::MINIMAL,
        _ => {
            if rng.gen_bool(0.5) {
                acid::HARDFLOOR
            } else {
                acid::PHUTURE
            }
        }
    }
}

/// Generates acid lines in a fixed scale
#[derive(Debug, Clone, Copy)]
pub struct MelodicGenerator {
    pub scale: Scale,
}

impl Default for MelodicGenerator {
    fn default() -> Self {
        MelodicGenerator { scale: C_MINOR }
    }
}

impl MelodicGenerator {
    pub fn new(scale: Scale) -> Self {
        MelodicGenerator { scale }
    }

    /// Generate one bar of the acid line.
    ///
    /// The last sounding note of `previous` seeds the walk so the line
    /// continues across bars.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        chord: &ChordInfo,
        section: Section,
        previous: &NoteSequence,
        rng: &mut R,
    ) -> NoteSequence {
        let rhythm = acid_rhythm(section, rng);
        self.generate_with_rhythm(chord, section, &rhythm, previous, rng)
    }

    /// Same as `generate` with the rhythm supplied by the caller
    pub fn generate_with_rhythm<R: Rng + ?Sized>(
        &self,
        chord: &ChordInfo,
        section: Section,
        rhythm: &StepPattern,
        previous: &NoteSequence,
        rng: &mut R,
    ) -> NoteSequence {
        let octave = octave_for(section);
        let mut sequence = NoteSequence::rest();
        let mut last_note = previous.last_note();

        for step in 0..STEPS_PER_BAR {
            if !rhythm.is_active(step) {
                continue;
            }

            let note = if step % 4 == 0 {
                self.focus_tone(chord, octave, rng)
            } else {
                match last_note {
                    Some(last) if rng.gen::<f64>() < STEPWISE_PROBABILITY => {
                        self.walk_from(last, rng).unwrap_or_else(|| self.focus_tone(chord, octave, rng))
                    }
                    _ => self.scale.degree(rng.gen_range(0..7)).at(octave),
                }
            };

            sequence.0[step] = Some(note);
            last_note = Some(note);
        }

        sequence
    }

    /// A chord focus tone, or the chord root when the chord has no focus
    fn focus_tone<R: Rng + ?Sized>(&self, chord: &ChordInfo, octave: i8, rng: &mut R) -> Note {
        let pitch: PitchClass = chord.melodic_focus.choose(rng).copied().unwrap_or(chord.root);
        pitch.at(octave)
    }

    /// One scale step up or down, occasionally a third, keeping the octave
    fn walk_from<R: Rng + ?Sized>(&self, last: Note, rng: &mut R) -> Option<Note> {
        let direction = if rng.gen_bool(0.5) { 1 } else { -1 };
        let size = if rng.gen::<f64>() < THIRD_JUMP_PROBABILITY { 2 } else { 1 };
        self.scale.step_from(last, direction * size)
    }
}

/// Accent on every beat, plus random accents once tension is high
pub fn is_accent<R: Rng + ?Sized>(step: usize, tension: f64, rng: &mut R) -> bool {
    step % 4 == 0 || (tension > RANDOM_ACCENT_TENSION && rng.gen::<f64>() > 0.85)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::ProgressionKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SECTIONS: [Section; 6] = [
        Section::Intro,
        Section::Build,
        Section::Main,
        Section::Break,
        Section::Drop,
        Section::Outro,
    ];

    #[test]
    fn test_notes_stay_in_scale_and_focus() {
        let gen = MelodicGenerator::default();
        for seed in 0..40u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut previous = NoteSequence::rest();
            for kind in [
                ProgressionKind::Main,
                ProgressionKind::Variation1,
                ProgressionKind::Variation2,
                ProgressionKind::Breakdown,
            ] {
                for chord in kind.chords() {
                    for section in SECTIONS {
                        let seq = gen.generate(chord, section, &previous, &mut rng);
                        assert_eq!(seq.len(), STEPS_PER_BAR);
                        for (step, note) in seq.notes() {
                            assert!(C_MINOR.contains(note.pitch), "{} at {}", note, step);
                            if step % 4 == 0 {
                                assert!(chord.melodic_focus.contains(&note.pitch));
                            }
                        }
                        previous = seq;
                    }
                }
            }
        }
    }

    #[test]
    fn test_rhythm_is_respected() {
        let gen = MelodicGenerator::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let chord = ProgressionKind::Main.chord_at(0);
        let seq = gen.generate_with_rhythm(&chord, Section::Main, &acid::WINK, &NoteSequence::rest(), &mut rng);
        assert_eq!(seq.rhythm(), acid::WINK);
    }

    #[test]
    fn test_octave_by_section() {
        let gen = MelodicGenerator::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let chord = ProgressionKind::Variation2.chord_at(0);
        let drop = gen.generate(&chord, Section::Drop, &NoteSequence::rest(), &mut rng);
        assert!(drop.notes().all(|(_, n)| n.octave == 3));
        let main = gen.generate(&chord, Section::Main, &NoteSequence::rest(), &mut rng);
        assert!(main.notes().all(|(_, n)| n.octave == 2));
    }

    #[test]
    fn test_walk_prefers_small_steps() {
        // Off-beat notes that follow a note should mostly sit one or two
        // scale steps away from it.
        let gen = MelodicGenerator::default();
        let chord = ProgressionKind::Main.chord_at(0);
        let mut rng = Pcg32::seed_from_u64(21);
        let mut near = 0;
        let mut total = 0;
        for _ in 0..300 {
            let seq = gen.generate_with_rhythm(&chord, Section::Main, &StepPattern::full(), &NoteSequence::rest(), &mut rng);
            for step in 1..STEPS_PER_BAR {
                if step % 4 == 0 {
                    continue;
                }
                let (Some(prev), Some(cur)) = (seq.note_at(step - 1), seq.note_at(step)) else {
                    continue;
                };
                let a = C_MINOR.index_of(prev.pitch).unwrap() as i32;
                let b = C_MINOR.index_of(cur.pitch).unwrap() as i32;
                let distance = (a - b).rem_euclid(7).min((b - a).rem_euclid(7));
                total += 1;
                if distance == 1 || distance == 2 {
                    near += 1;
                }
            }
        }
        let ratio = near as f64 / total as f64;
        assert!(ratio > 0.7, "stepwise ratio {}", ratio);
    }

    #[test]
    fn test_previous_bar_seeds_walk() {
        let gen = MelodicGenerator::default();
        let chord = ProgressionKind::Main.chord_at(0);
        let mut previous = NoteSequence::rest();
        previous.0[15] = Some(Note::new(PitchClass::F, 2));
        // Rhythm starting off the beat so the first note must come from the walk or the scale
        let rhythm = StepPattern::single(1);
        let mut stepped = 0;
        for seed in 0..200u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let seq = gen.generate_with_rhythm(&chord, Section::Main, &rhythm, &previous, &mut rng);
            let note = seq.note_at(1).unwrap();
            if matches!(note.pitch, PitchClass::Eb | PitchClass::G | PitchClass::D | PitchClass::Ab) {
                stepped += 1;
            }
        }
        assert!(stepped > 120, "{}", stepped);
    }

    #[test]
    fn test_empty_focus_falls_back_to_root() {
        let chord = ChordInfo {
            root: PitchClass::G,
            chord: &[],
            bass: Note::new(PitchClass::G, 0),
            melodic_focus: &[],
        };
        let gen = MelodicGenerator::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let seq = gen.generate_with_rhythm(&chord, Section::Main, &StepPattern::single(0), &NoteSequence::rest(), &mut rng);
        assert_eq!(seq.note_at(0), Some(Note::new(PitchClass::G, 2)));
    }

    #[test]
    fn test_regenerates_on_even_bars() {
        assert!(regenerates_on(0));
        assert!(!regenerates_on(1));
        assert!(regenerates_on(42));
    }

    #[test]
    fn test_beat_accents() {
        let mut rng = Pcg32::seed_from_u64(1);
        for step in (0..16).step_by(4) {
            assert!(is_accent(step, 0.0, &mut rng));
        }
        assert!(!(1..4).any(|s| is_accent(s, 0.0, &mut rng)));
    }
}
