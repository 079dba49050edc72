// Section Automation - One-shot ramps fired when a section begins
// Layered under the continuous tension mapping

use super::params::{ParamChange, SynthParam};
use crate::arranger::Section;

/// Ramps for entering `section` from `previous`.
/// Only DROP, BREAK, and BUILD have entry moves.
pub fn section_entry_ramps(section: Section, previous: Option<Section>, now: f64) -> Vec<ParamChange> {
    if previous == Some(section) {
        return Vec::new();
    }

    match section {
        Section::Drop => vec![
            ParamChange::exponential(SynthParam::AcidFilterCutoff, 2000.0, now, 2.0),
            ParamChange::exponential(SynthParam::AcidFilter2Cutoff, 1800.0, now, 2.0),
            ParamChange::linear(SynthParam::AcidFilterQ, 15.0, now, 2.0),
            ParamChange::linear(SynthParam::AcidDistortion, 0.6, now, 2.0),
        ],
        Section::Break => vec![
            ParamChange::exponential(SynthParam::AcidFilterCutoff, 400.0, now, 1.0),
            ParamChange::exponential(SynthParam::AcidFilter2Cutoff, 400.0, now, 1.0),
            ParamChange::linear(SynthParam::AcidFilterQ, 5.0, now, 1.0),
            ParamChange::linear(SynthParam::AcidDistortion, 0.2, now, 1.0),
        ],
        Section::Build => vec![
            ParamChange::exponential(SynthParam::AcidFilterCutoff, 1200.0, now, 4.0),
            ParamChange::exponential(SynthParam::AcidFilter2Cutoff, 1100.0, now, 4.0),
        ],
        Section::Intro | Section::Main | Section::Outro => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_opens_filter() {
        let ramps = section_entry_ramps(Section::Drop, Some(Section::Break), 10.0);
        let cutoff = ramps.iter().find(|c| c.param == SynthParam::AcidFilterCutoff).unwrap();
        assert_eq!(cutoff.value, 2000.0);
        assert_eq!(cutoff.end_time(), 12.0);
        let drive = ramps.iter().find(|c| c.param == SynthParam::AcidDistortion).unwrap();
        assert_eq!(drive.value, 0.6);
    }

    #[test]
    fn test_break_closes_filter() {
        let ramps = section_entry_ramps(Section::Break, Some(Section::Main), 0.0);
        assert!(ramps.iter().all(|c| c.ramp.duration() == 1.0));
        let drive = ramps.iter().find(|c| c.param == SynthParam::AcidDistortion).unwrap();
        assert_eq!(drive.value, 0.2);
    }

    #[test]
    fn test_build_is_slow() {
        let ramps = section_entry_ramps(Section::Build, Some(Section::Intro), 0.0);
        assert_eq!(ramps.len(), 2);
        assert!(ramps.iter().all(|c| c.ramp.duration() == 4.0));
    }

    #[test]
    fn test_no_ramps_without_change() {
        assert!(section_entry_ramps(Section::Drop, Some(Section::Drop), 0.0).is_empty());
        assert!(section_entry_ramps(Section::Main, Some(Section::Build), 0.0).is_empty());
        assert!(section_entry_ramps(Section::Intro, None, 0.0).is_empty());
    }
}
