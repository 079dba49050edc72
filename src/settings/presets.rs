// Music Presets
// Named energy/tension pairs for quick mood changes

use serde::Serialize;

/// An energy/tension pair with a short description
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MusicPreset {
    pub name: &'static str,
    pub energy: f64,
    pub tension: f64,
    pub description: &'static str,
}

pub const PRESETS: [MusicPreset; 7] = [
    MusicPreset { name: "chill", energy: 30.0, tension: 20.0, description: "Laid back minimal" },
    MusicPreset { name: "driving", energy: 60.0, tension: 40.0, description: "Classic driving" },
    MusicPreset { name: "peak", energy: 85.0, tension: 70.0, description: "Peak time energy" },
    MusicPreset { name: "acid", energy: 75.0, tension: 90.0, description: "303 madness" },
    MusicPreset { name: "dark", energy: 40.0, tension: 80.0, description: "Dark & brooding" },
    MusicPreset { name: "hypnotic", energy: 50.0, tension: 60.0, description: "Repetitive & hypnotic" },
    MusicPreset { name: "anthem", energy: 90.0, tension: 60.0, description: "Stadium anthem" },
];

/// Get a preset by name (case-insensitive)
pub fn get_preset(name: &str) -> Option<MusicPreset> {
    let name = name.trim().to_lowercase();
    PRESETS.iter().find(|p| p.name == name).copied()
}

/// Get all preset names
pub fn list_preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}
