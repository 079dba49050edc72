// Drum & Stab Generator - One step pattern per percussion voice per bar
// Fills announce section changes; otherwise pools are keyed by section and genre

use rand::Rng;
use serde::Serialize;

use crate::arranger::{is_approaching_transition, Section};
use crate::patterns::bank::{hihat, kick, snare, stab};
use crate::patterns::{Genre, StepPattern, STEPS_PER_BAR};

/// Tension above which hats lock to a steady off-step pulse
pub const HIHAT_PULSE_TENSION: f64 = 70.0;

/// Energy above which the techno drop switches to the off-beat snare
const DROP_SNARE_ENERGY: f64 = 70.0;

/// Patterns for the percussion and stab voices of one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarPatterns {
    pub kick: StepPattern,
    pub snare: StepPattern,
    pub hihat: StepPattern,
    pub stab: StepPattern,
    pub is_fill: bool,
}

impl Default for BarPatterns {
    fn default() -> Self {
        BarPatterns {
            kick: StepPattern::silent(),
            snare: StepPattern::silent(),
            hihat: StepPattern::silent(),
            stab: StepPattern::silent(),
            is_fill: false,
        }
    }
}

/// Builds per-bar percussion patterns for a genre
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternGenerator {
    pub genre: Genre,
}

impl PatternGenerator {
    pub fn new(genre: Genre) -> Self {
        PatternGenerator { genre }
    }

    /// Generate kick, snare, hihat, and stab for a bar.
    ///
    /// # Arguments
    /// * `section` - Section the bar belongs to
    /// * `bar` - Absolute bar index
    /// * `energy` - Energy level [0, 100]
    /// * `tension` - Tension level [0, 100]
    /// * `rng` - Random source for DROP variety and hat density
    pub fn generate<R: Rng + ?Sized>(
        &self,
        section: Section,
        bar: u64,
        energy: f64,
        tension: f64,
        rng: &mut R,
    ) -> BarPatterns {
        let is_fill = is_approaching_transition(bar);

        let (kick, snare, hihat) = if is_fill {
            (kick::FILL, snare::FILL, StepPattern::full())
        } else {
            let (kick, snare) = self.groove(section, bar, energy, rng);
            (kick, snare, self.hihat(section, energy, tension, rng))
        };

        BarPatterns {
            kick,
            snare,
            hihat,
            stab: stab_pattern(section, bar),
            is_fill,
        }
    }

    fn groove<R: Rng + ?Sized>(
        &self,
        section: Section,
        bar: u64,
        energy: f64,
        rng: &mut R,
    ) -> (StepPattern, StepPattern) {
        match (section, self.genre) {
            (Section::Drop, Genre::DrumAndBass) => (kick::DNB_JUMP, snare::DNB_ROLL),
            (Section::Drop, Genre::Tropical) => (kick::KYGO_BOUNCE, snare::KYGO_CLAP),
            (Section::Drop, _) => {
                // Uniform draw every bar: audible variety is the point here
                let kick = if rng.gen_bool(0.5) { kick::CHICAGO } else { kick::DETROIT };
                let snare = if energy > DROP_SNARE_ENERGY {
                    snare::DETROIT
                } else {
                    snare::BACKBEAT
                };
                (kick, snare)
            }
            (Section::Main, Genre::DrumAndBass) => {
                let kicks = [kick::DNB_BASIC, kick::DNB_AMEN];
                (kicks[((bar / 4) % 2) as usize], snare::DNB_BASIC)
            }
            (Section::Main, Genre::Tropical) => (kick::KYGO_BASIC, snare::KYGO_RIM),
            (Section::Main, Genre::Dubstep) => (kick::DUBSTEP_BASIC, snare::DUBSTEP_BASIC),
            (Section::Main, Genre::Trance) => (kick::TRANCE_KICK, snare::TRANCE_CLAP),
            (Section::Main, Genre::Techno) => {
                // Deterministic rotation so listeners can orient themselves
                let kicks = [kick::FOUR_ON_FLOOR, kick::BERLIN, kick::DETROIT];
                (kicks[((bar / 4) % 3) as usize], snare::BACKBEAT)
            }
            (Section::Break, _) => (kick::MINIMAL, StepPattern::silent()),
            _ => (kick::HALF_TIME, snare::MINIMAL),
        }
    }

    fn hihat<R: Rng + ?Sized>(
        &self,
        section: Section,
        energy: f64,
        tension: f64,
        rng: &mut R,
    ) -> StepPattern {
        match self.genre {
            Genre::DrumAndBass if tension > HIHAT_PULSE_TENSION => StepPattern::full(),
            Genre::DrumAndBass => hihat::DNB_SHUFFLE,
            Genre::Tropical if section == Section::Drop => hihat::SHAKER,
            Genre::Tropical => hihat::QUARTERS,
            Genre::Dubstep => hihat::SPARSE,
            Genre::Trance => hihat::EIGHTHS,
            Genre::Techno => density_hihat(energy, tension, rng),
        }
    }
}

/// Probability that any one hat step fires
pub fn hihat_density(energy: f64, tension: f64) -> f64 {
    ((energy / 100.0) * 0.5 + (tension / 100.0) * 0.5).clamp(0.0, 1.0)
}

/// Each step fires independently with the density probability; above the
/// tension threshold odd steps are forced on as well.
pub fn density_hihat<R: Rng + ?Sized>(energy: f64, tension: f64, rng: &mut R) -> StepPattern {
    let density = hihat_density(energy, tension);
    let mut pattern = StepPattern::silent();
    for step in 0..STEPS_PER_BAR {
        let active = if tension > HIHAT_PULSE_TENSION && step % 2 == 1 {
            true
        } else {
            rng.gen::<f64>() < density
        };
        pattern.set(step, active);
    }
    pattern
}

/// Stabs hit beat one on alternating bars only, never in a BREAK
pub fn stab_pattern(section: Section, bar: u64) -> StepPattern {
    let hit = match section {
        Section::Break => false,
        Section::Drop => bar % 4 == 0,
        Section::Build => bar % 2 == 1,
        Section::Main => bar % 2 == 0,
        Section::Intro | Section::Outro => bar % 4 == 0,
    };
    if hit {
        stab::DOWNBEAT
    } else {
        stab::REST
    }
}
