// Humanization - Timing jitter and velocity variation for step triggers

use rand::Rng;

use super::transport::note_length;

/// Offset `time` by a uniform draw in [-amount, +amount]
pub fn humanize<R: Rng + ?Sized>(time: f64, amount: f64, rng: &mut R) -> f64 {
    if amount > 0.0 && amount.is_finite() {
        time + rng.gen_range(-amount..=amount)
    } else {
        time
    }
}

/// Closed/open hat variation: velocity in [0.3, 0.7], one in five hits
/// gets a sixteenth-note gate instead of a thirty-second
pub fn hihat_variation<R: Rng + ?Sized>(bpm: f64, rng: &mut R) -> (f64, f64) {
    let velocity = 0.3 + rng.gen::<f64>() * 0.4;
    let gate = if rng.gen::<f64>() > 0.8 { note_length(bpm, 16) } else { note_length(bpm, 32) };
    (velocity, gate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_jitter_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1000 {
            let t = humanize(10.0, 0.003, &mut rng);
            assert!((t - 10.0).abs() <= 0.003 + 1e-12);
        }
    }

    #[test]
    fn test_zero_amount_is_exact() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(humanize(1.25, 0.0, &mut rng), 1.25);
        assert_eq!(humanize(1.25, f64::NAN, &mut rng), 1.25);
    }

    #[test]
    fn test_hihat_variation() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut long_gates = 0;
        for _ in 0..2000 {
            let (velocity, gate) = hihat_variation(120.0, &mut rng);
            assert!((0.3..=0.7).contains(&velocity));
            if gate == note_length(120.0, 16) {
                long_gates += 1;
            } else {
                assert_eq!(gate, note_length(120.0, 32));
            }
        }
        assert!(long_gates > 200 && long_gates < 700, "long gates: {}", long_gates);
    }
}
