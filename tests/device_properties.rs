//! Device law properties
//!
//! Bounds, direction of drift and readout range for both device laws, driven
//! with seeded random pulse trains.

use memristor_synapse::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const R_MIN: f64 = 100.0;
const R_MAX: f64 = 2.5e8;

fn anouk_at(r: f64) -> Memristor<AnoukLaw> {
    Memristor::with_resistance(AnoukLaw::default(), R_MIN, R_MAX, r).unwrap()
}

fn power_law_at(r: f64) -> Memristor<PowerLaw> {
    Memristor::with_resistance(PowerLaw::default(), R_MIN, R_MAX, r).unwrap()
}

#[test]
fn test_bounds_invariant_anouk() {
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..20 {
        let mut device = anouk_at(rng.gen_range(R_MIN..=R_MAX));
        for _ in 0..300 {
            device.pulse(rng.gen_range(-5.0..5.0)).unwrap();
            assert!(device.resistance() >= R_MIN && device.resistance() <= R_MAX);
        }
    }
}

#[test]
fn test_bounds_invariant_power_law() {
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..20 {
        let mut device = power_law_at(rng.gen_range(R_MIN..=R_MAX));
        for _ in 0..300 {
            device.pulse(rng.gen_range(-5.0..5.0)).unwrap();
            assert!(device.resistance() >= R_MIN && device.resistance() <= R_MAX);
        }
    }
}

#[test]
fn test_bounds_invariant_at_edges() {
    for &v in &[-1.0, -0.1, 0.0, 0.1, 1.0] {
        for &start in &[R_MIN, R_MAX] {
            let mut anouk = anouk_at(start);
            let mut power = power_law_at(start);

            anouk.pulse(v).unwrap();
            power.pulse(v).unwrap();

            assert!(anouk.bounds().contains(anouk.resistance()), "anouk V={} start={}", v, start);
            assert!(power.bounds().contains(power.resistance()), "power V={} start={}", v, start);
        }
    }
}

#[test]
fn test_anouk_monotone_toward_r_min() {
    for &v in &[0.1, 0.5, 1.0, -0.3] {
        let mut device = anouk_at(R_MAX);

        for _ in 0..500 {
            let before = device.resistance();
            device.pulse(v).unwrap();
            let after = device.resistance();

            assert!(after < before || after == R_MIN, "V={} went {} -> {}", v, before, after);
        }
    }
}

#[test]
fn test_anouk_ignores_polarity() {
    let mut up = anouk_at(1.7e8);
    let mut down = anouk_at(1.7e8);

    for _ in 0..50 {
        up.pulse(0.4).unwrap();
        down.pulse(-0.4).unwrap();
    }

    assert_eq!(up.resistance(), down.resistance());
}

#[test]
fn test_power_law_bidirectional() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..500 {
        let mut device = power_law_at(rng.gen_range(R_MIN..=R_MAX));
        let v = match rng.gen_range(0..3) {
            0 => rng.gen_range(0.01..3.0),
            1 => -rng.gen_range(0.01..3.0),
            _ => 0.0,
        };

        let before = device.resistance();
        device.pulse(v).unwrap();
        let after = device.resistance();

        if v > 0.0 {
            assert!(after >= before);
        } else if v < 0.0 {
            assert!(after <= before);
        } else {
            assert_eq!(after.to_bits(), before.to_bits());
        }
    }
}

#[test]
fn test_power_law_branches_saturate() {
    // n recovered on either branch lies in [0, 1], so r(n + 1) always lands
    // past the bound the branch is heading for
    for &(a, c) in &[(1e-3, 1e-3), (0.5, 0.5), (2.0, 2.0)] {
        let law = PowerLaw::new(a, c, 1e9).unwrap();
        let mut device = Memristor::with_resistance(law, R_MIN, R_MAX, 1e8).unwrap();

        device.pulse(1.0).unwrap();
        assert_eq!(device.resistance(), R_MAX, "set a={}", a);

        device.pulse(-1.0).unwrap();
        assert_eq!(device.resistance(), R_MIN, "reset c={}", c);
    }
}

#[test]
fn test_scaled_range() {
    let samples = 200;
    for i in 0..=samples {
        // Log-spaced across the full range
        let t = i as f64 / samples as f64;
        let r = (R_MIN.ln() + t * (R_MAX.ln() - R_MIN.ln())).exp().clamp(R_MIN, R_MAX);
        let device = anouk_at(r);

        for quantity in [Quantity::Resistance, Quantity::Conductance] {
            let reading = device.get_state_with_gain(quantity, true, DEFAULT_GAIN) / DEFAULT_GAIN;
            assert!(reading >= EPSILON - 1e-15, "{} r={} -> {}", quantity, r, reading);
            assert!(reading <= 1.0 + EPSILON + 1e-12, "{} r={} -> {}", quantity, r, reading);
        }
    }
}

#[test]
fn test_conductance_scaling_orientation() {
    let low = anouk_at(R_MIN);
    let high = anouk_at(R_MAX);

    assert!(low.get_state(Quantity::Conductance, true) > high.get_state(Quantity::Conductance, true));
    assert!(low.get_state(Quantity::Resistance, true) < high.get_state(Quantity::Resistance, true));
}

#[test]
fn test_scenario_single_pulse_decreases() {
    let law = AnoukLaw::new(-0.128, -0.522).unwrap();
    let mut device = Memristor::with_resistance(law, 100.0, 2.5e8, 2.5e8).unwrap();

    let delta = device.pulse(0.1).unwrap();

    assert!(device.resistance() < 2.5e8);
    assert!(delta < 0.0);
}

#[test]
fn test_scenario_thousand_pulses() {
    let law = AnoukLaw::new(-0.128, -0.522).unwrap();

    // At 0.1 V the curve flattens: after 1000 pulses r ~ r_max * 1001^-0.18
    let mut device = Memristor::with_resistance(law, 100.0, 2.5e8, 2.5e8).unwrap();
    for _ in 0..1000 {
        device.pulse(0.1).unwrap();
    }
    assert!(device.resistance() < 0.3 * 2.5e8);
    assert!(device.resistance() > 0.25 * 2.5e8);

    // A strong pulse steepens the exponent enough to reach r_min
    let mut device = Memristor::with_resistance(law, 100.0, 2.5e8, 2.5e8).unwrap();
    for _ in 0..1000 {
        device.pulse(10.0).unwrap();
    }
    assert!(device.resistance() <= 100.0 * 1.01);
    assert!(device.resistance() >= 100.0);
}

#[test]
fn test_history_is_append_only() {
    let mut device = anouk_at(R_MAX);
    let mut expected = Vec::new();

    for _ in 0..10 {
        device.pulse(0.1).unwrap();
        device.save_state();
        expected.push(device.resistance());
    }

    assert_eq!(device.history(), expected.as_slice());
    assert!(device.history().windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_device_model_matches_concrete_law() {
    let mut concrete = power_law_at(1e8);
    let mut model = Memristor::with_resistance(
        DeviceModel::from(PowerLaw::default()),
        R_MIN,
        R_MAX,
        1e8,
    )
    .unwrap();

    for &v in &[0.1, -0.1, 0.0, 0.5] {
        assert_eq!(concrete.pulse(v).unwrap(), model.pulse(v).unwrap());
        assert_eq!(concrete.resistance(), model.resistance());
    }
}
