// Pattern Bank - Named one-bar step patterns per instrument and style
// Classic 909 kicks, acid rhythms, and genre-specific grooves

use super::instrument::Instrument;
use super::step::StepPattern;

pub mod kick {
    use super::StepPattern;

    pub const FOUR_ON_FLOOR: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,0,0, 1,0,0,0, 1,0,0,0]);
    pub const HALF_TIME: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 1,0,0,0, 0,0,0,0]);
    pub const SYNCOPATED: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,0,1, 0,0,1,0, 1,0,0,0]);
    pub const MINIMAL: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0]);
    pub const DETROIT: StepPattern = StepPattern::from_bits([1,0,0,1, 1,0,0,0, 1,0,1,0, 1,0,0,0]);
    pub const BERLIN: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,1,0, 1,0,0,0, 1,0,0,0]);
    pub const CHICAGO: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,0,0, 1,0,0,0, 1,0,1,0]);
    pub const FILL: StepPattern = StepPattern::from_bits([1,0,1,0, 1,0,1,1, 1,1,1,0, 1,1,1,1]);

    pub const DNB_BASIC: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,1,0, 0,0,1,0, 0,0,0,0]);
    pub const DNB_AMEN: StepPattern = StepPattern::from_bits([1,0,0,1, 0,0,1,0, 0,1,0,0, 1,0,0,0]);
    pub const DNB_JUMP: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,1, 0,0,1,0, 0,0,0,1]);

    pub const KYGO_BASIC: StepPattern = StepPattern::from_bits([1,0,0,1, 0,0,1,0, 1,0,0,1, 0,0,1,0]);
    pub const KYGO_BOUNCE: StepPattern = StepPattern::from_bits([1,0,0,0, 0,1,0,0, 1,0,0,0, 0,1,0,0]);
    pub const KYGO_MINIMAL: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 0,0,1,0, 0,0,0,0]);

    pub const DUBSTEP_BASIC: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 0,0,1,0, 0,0,0,0]);
    pub const DUBSTEP_HALF: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0]);
    pub const DUBSTEP_ROLL: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,1,0, 0,0,1,0, 0,0,1,0]);

    pub const TRANCE_KICK: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,0,0, 1,0,0,0, 1,0,0,0]);
    pub const TRANCE_BUILD: StepPattern = StepPattern::from_bits([1,0,1,0, 1,0,1,0, 1,0,1,0, 1,0,1,0]);
    pub const TRANCE_UPLIFTING: StepPattern = StepPattern::from_bits([1,0,0,1, 1,0,0,1, 1,0,0,1, 1,0,0,1]);
}

pub mod snare {
    use super::StepPattern;

    pub const BACKBEAT: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,0,0, 1,0,0,0]);
    pub const GHOST: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,1, 0,0,0,0, 1,0,0,0]);
    pub const DETROIT: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,1,0, 1,0,0,0]);
    pub const FILL: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,1,0, 1,0,1,1, 1,1,1,1]);
    pub const MINIMAL: StepPattern = StepPattern::from_bits([0,0,0,0, 0,0,0,0, 0,0,0,0, 1,0,0,0]);

    pub const DNB_BASIC: StepPattern = StepPattern::from_bits([0,0,1,0, 1,0,0,0, 0,1,0,0, 1,0,0,0]);
    pub const DNB_AMEN: StepPattern = StepPattern::from_bits([0,0,1,0, 1,0,0,1, 0,0,1,0, 1,0,1,0]);
    pub const DNB_ROLL: StepPattern = StepPattern::from_bits([0,0,1,0, 1,0,1,1, 0,0,1,0, 1,1,1,1]);

    pub const KYGO_CLAP: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,0,0, 1,0,0,0]);
    pub const KYGO_SNAP: StepPattern = StepPattern::from_bits([0,0,0,0, 0,0,1,0, 0,0,0,0, 0,0,1,0]);
    pub const KYGO_RIM: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,0,0, 0,0,1,0]);

    pub const DUBSTEP_BASIC: StepPattern = StepPattern::from_bits([0,0,0,0, 0,0,0,0, 1,0,0,0, 0,0,0,0]);
    pub const DUBSTEP_TRAP: StepPattern = StepPattern::from_bits([0,0,0,0, 0,0,0,0, 1,0,0,0, 0,0,1,0]);
    pub const DUBSTEP_ROLL: StepPattern = StepPattern::from_bits([0,0,0,0, 0,0,0,0, 1,0,1,1, 0,0,0,0]);

    pub const TRANCE_CLAP: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,0,0, 1,0,0,0]);
    pub const TRANCE_BUILD: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,1, 0,0,1,0, 1,0,1,1]);
    pub const TRANCE_UPLIFT: StepPattern = StepPattern::from_bits([0,0,0,0, 1,0,0,0, 0,0,1,0, 1,0,0,0]);
}

pub mod hihat {
    use super::StepPattern;

    pub const DNB_SHUFFLE: StepPattern = StepPattern::from_bits([1,0,1,1, 1,0,1,1, 1,0,1,1, 1,0,1,1]);
    pub const SHAKER: StepPattern = StepPattern::from_bits([0,1,0,1, 0,1,0,1, 0,1,0,1, 0,1,0,1]);
    pub const QUARTERS: StepPattern = StepPattern::from_bits([1,0,0,0, 1,0,0,0, 1,0,0,0, 1,0,0,0]);
    pub const SPARSE: StepPattern = StepPattern::from_bits([0,0,1,0, 0,0,0,0, 0,0,1,0, 0,0,0,0]);
    pub const EIGHTHS: StepPattern = StepPattern::from_bits([1,0,1,0, 1,0,1,0, 1,0,1,0, 1,0,1,0]);
}

/// Rhythm-only acid lines; pitches are chosen by the melodic generator
pub mod acid {
    use super::StepPattern;

    /// Phuture - Acid Tracks
    pub const PHUTURE: StepPattern = StepPattern::from_bits([1,0,1,0, 1,0,0,1, 1,0,1,0, 0,1,0,1]);
    /// Josh Wink - Higher State of Consciousness
    pub const WINK: StepPattern = StepPattern::from_bits([1,1,0,1, 0,1,1,0, 1,0,1,1, 0,0,1,0]);
    pub const HARDFLOOR: StepPattern = StepPattern::from_bits([1,0,0,1, 1,0,1,0, 0,1,0,1, 1,0,0,0]);
    /// DJ Pierre
    pub const PIERRE: StepPattern = StepPattern::from_bits([1,0,1,1, 0,0,1,0, 1,1,0,1, 0,0,1,0]);
    pub const MINIMAL: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,1,0, 0,0,0,0, 1,0,0,0]);
    pub const BUSY: StepPattern = StepPattern::from_bits([1,1,0,1, 1,0,1,1, 0,1,1,0, 1,0,1,1]);
}

pub mod stab {
    use super::StepPattern;

    pub const DOWNBEAT: StepPattern = StepPattern::single(0);
    pub const REST: StepPattern = StepPattern::silent();
}

pub mod sub {
    use super::StepPattern;

    /// Offset one sixteenth from the kick to keep the low end clear
    pub const OFFSET: StepPattern = StepPattern::from_bits([0,1,0,0, 0,0,0,0, 0,1,0,0, 0,0,0,0]);
    pub const HELD: StepPattern = StepPattern::from_bits([1,0,0,0, 0,0,0,0, 0,0,0,0, 1,0,0,0]);
    pub const DEMBOW: StepPattern = StepPattern::from_bits([1,0,0,1, 0,0,1,0, 1,0,0,1, 0,0,1,0]);
}

const KICKS: &[(&str, StepPattern)] = &[
    ("fourOnFloor", kick::FOUR_ON_FLOOR),
    ("halfTime", kick::HALF_TIME),
    ("syncopated", kick::SYNCOPATED),
    ("minimal", kick::MINIMAL),
    ("detroit", kick::DETROIT),
    ("berlin", kick::BERLIN),
    ("chicago", kick::CHICAGO),
    ("fill", kick::FILL),
    ("dnb_basic", kick::DNB_BASIC),
    ("dnb_amen", kick::DNB_AMEN),
    ("dnb_jump", kick::DNB_JUMP),
    ("kygo_basic", kick::KYGO_BASIC),
    ("kygo_bounce", kick::KYGO_BOUNCE),
    ("kygo_minimal", kick::KYGO_MINIMAL),
    ("dubstep_basic", kick::DUBSTEP_BASIC),
    ("dubstep_half", kick::DUBSTEP_HALF),
    ("dubstep_roll", kick::DUBSTEP_ROLL),
    ("trance_kick", kick::TRANCE_KICK),
    ("trance_build", kick::TRANCE_BUILD),
    ("trance_uplifting", kick::TRANCE_UPLIFTING),
];

const SNARES: &[(&str, StepPattern)] = &[
    ("backbeat", snare::BACKBEAT),
    ("ghost", snare::GHOST),
    ("detroit", snare::DETROIT),
    ("fill", snare::FILL),
    ("minimal", snare::MINIMAL),
    ("dnb_basic", snare::DNB_BASIC),
    ("dnb_amen", snare::DNB_AMEN),
    ("dnb_roll", snare::DNB_ROLL),
    ("kygo_clap", snare::KYGO_CLAP),
    ("kygo_snap", snare::KYGO_SNAP),
    ("kygo_rim", snare::KYGO_RIM),
    ("dubstep_basic", snare::DUBSTEP_BASIC),
    ("dubstep_trap", snare::DUBSTEP_TRAP),
    ("dubstep_roll", snare::DUBSTEP_ROLL),
    ("trance_clap", snare::TRANCE_CLAP),
    ("trance_build", snare::TRANCE_BUILD),
    ("trance_uplift", snare::TRANCE_UPLIFT),
];

const HIHATS: &[(&str, StepPattern)] = &[
    ("dnb_shuffle", hihat::DNB_SHUFFLE),
    ("shaker", hihat::SHAKER),
    ("quarters", hihat::QUARTERS),
    ("sparse", hihat::SPARSE),
    ("eighths", hihat::EIGHTHS),
];

const ACIDS: &[(&str, StepPattern)] = &[
    ("phuture", acid::PHUTURE),
    ("wink", acid::WINK),
    ("hardfloor", acid::HARDFLOOR),
    ("pierre", acid::PIERRE),
    ("minimal", acid::MINIMAL),
    ("busy", acid::BUSY),
];

const STABS: &[(&str, StepPattern)] = &[("downbeat", stab::DOWNBEAT), ("rest", stab::REST)];

const SUBS: &[(&str, StepPattern)] = &[
    ("offset", sub::OFFSET),
    ("held", sub::HELD),
    ("dembow", sub::DEMBOW),
];

fn table(instrument: Instrument) -> &'static [(&'static str, StepPattern)] {
    match instrument {
        Instrument::Kick => KICKS,
        Instrument::Snare => SNARES,
        Instrument::Hihat => HIHATS,
        Instrument::Acid => ACIDS,
        Instrument::Stab => STABS,
        Instrument::Sub => SUBS,
    }
}

/// Look up a named pattern for an instrument
pub fn lookup(instrument: Instrument, name: &str) -> Option<StepPattern> {
    table(instrument)
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, p)| *p)
}

/// Names of all patterns stored for an instrument
pub fn names(instrument: Instrument) -> Vec<&'static str> {
    table(instrument).iter().map(|(n, _)| *n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(Instrument::Kick, "berlin"), Some(kick::BERLIN));
        assert_eq!(lookup(Instrument::Acid, "wink"), Some(acid::WINK));
        assert_eq!(lookup(Instrument::Snare, "nope"), None);
    }

    #[test]
    fn test_every_named_pattern_is_one_bar() {
        for inst in Instrument::ALL {
            for name in names(inst) {
                let pattern = lookup(inst, name).unwrap();
                assert_eq!(pattern.len(), 16, "{} {}", inst, name);
            }
        }
    }

    #[test]
    fn test_fills_are_denser_than_grooves() {
        assert!(kick::FILL.hit_count() > kick::FOUR_ON_FLOOR.hit_count());
        assert!(snare::FILL.hit_count() > snare::BACKBEAT.hit_count());
    }

    #[test]
    fn test_acid_rhythms_open_on_the_one() {
        for name in names(Instrument::Acid) {
            assert!(lookup(Instrument::Acid, name).unwrap().is_active(0), "{}", name);
        }
    }
}
