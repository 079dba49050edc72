// Note Types - Pitch classes and octave-qualified notes
// Notes travel through the engine as values and serialize as names like "Eb3"

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing note names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("Unknown pitch class: {0}")]
    UnknownPitchClass(String),

    #[error("Missing or invalid octave in note: {0}")]
    InvalidOctave(String),
}

/// One of the twelve pitch classes, spelled with flats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Semitones above C (0-11)
    pub fn semitone(&self) -> u8 {
        *self as u8
    }

    /// Name used in note strings
    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    /// Qualify this pitch class with an octave
    pub fn at(self, octave: i8) -> Note {
        Note::new(self, octave)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = NoteParseError;

    /// Accepts flat and sharp spellings ("Eb" and "D#" are the same class)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pitch = match s {
            "C" | "B#" => PitchClass::C,
            "Db" | "C#" => PitchClass::Db,
            "D" => PitchClass::D,
            "Eb" | "D#" => PitchClass::Eb,
            "E" | "Fb" => PitchClass::E,
            "F" | "E#" => PitchClass::F,
            "Gb" | "F#" => PitchClass::Gb,
            "G" => PitchClass::G,
            "Ab" | "G#" => PitchClass::Ab,
            "A" => PitchClass::A,
            "Bb" | "A#" => PitchClass::Bb,
            "B" | "Cb" => PitchClass::B,
            _ => return Err(NoteParseError::UnknownPitchClass(s.to_string())),
        };
        Ok(pitch)
    }
}

/// A pitch class in a specific octave (scientific pitch notation, C4 = MIDI 60)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    pub pitch: PitchClass,
    pub octave: i8,
}

impl Note {
    pub const fn new(pitch: PitchClass, octave: i8) -> Self {
        Note { pitch, octave }
    }

    /// MIDI note number, clamped to 0-127
    pub fn midi(&self) -> u8 {
        let value = (self.octave as i16 + 1) * 12 + self.pitch.semitone() as i16;
        value.clamp(0, 127) as u8
    }

    /// Same pitch class shifted by whole octaves
    pub fn transpose_octaves(&self, octaves: i8) -> Note {
        Note::new(self.pitch, self.octave.saturating_add(octaves))
    }

    /// Frequency in Hz (A4 = 440)
    pub fn frequency_hz(&self) -> f64 {
        let semis_from_a4 = (self.octave as f64 + 1.0) * 12.0 + self.pitch.semitone() as f64 - 69.0;
        440.0 * 2f64.powf(semis_from_a4 / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .ok_or_else(|| NoteParseError::InvalidOctave(s.to_string()))?;
        let (name, octave) = s.split_at(split);
        let pitch = name.parse::<PitchClass>()?;
        let octave = octave
            .parse::<i8>()
            .map_err(|_| NoteParseError::InvalidOctave(s.to_string()))?;
        Ok(Note::new(pitch, octave))
    }
}

impl TryFrom<String> for Note {
    type Error = NoteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notes() {
        assert_eq!("Eb3".parse::<Note>().unwrap(), Note::new(PitchClass::Eb, 3));
        assert_eq!("Bb0".parse::<Note>().unwrap(), Note::new(PitchClass::Bb, 0));
        assert_eq!("C#4".parse::<Note>().unwrap(), Note::new(PitchClass::Db, 4));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "H2".parse::<Note>(),
            Err(NoteParseError::UnknownPitchClass(_))
        ));
        assert!(matches!(
            "Eb".parse::<Note>(),
            Err(NoteParseError::InvalidOctave(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::new(PitchClass::Ab, 2).to_string(), "Ab2");
        assert_eq!(PitchClass::Bb.to_string(), "Bb");
    }

    #[test]
    fn test_midi_numbers() {
        assert_eq!(Note::new(PitchClass::C, 4).midi(), 60);
        assert_eq!(Note::new(PitchClass::C, 1).midi(), 24);
        assert_eq!(Note::new(PitchClass::A, 4).midi(), 69);
    }

    #[test]
    fn test_frequency() {
        let a4 = Note::new(PitchClass::A, 4);
        assert!((a4.frequency_hz() - 440.0).abs() < 1e-9);
        let a3 = a4.transpose_octaves(-1);
        assert!((a3.frequency_hz() - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Note::new(PitchClass::G, 2)).unwrap();
        assert_eq!(json, "\"G2\"");
        let back: Note = serde_json::from_str("\"F3\"").unwrap();
        assert_eq!(back, Note::new(PitchClass::F, 3));
    }
}
