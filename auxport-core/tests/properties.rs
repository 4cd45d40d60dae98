//! Property tests for port mapping, claiming and PWM encoding

use auxport_core::{
    PinDef, PortError, PortRegistry, PwmConfig, PwmError, PwmParams, MAX_ANALOG_PORTS,
};
use proptest::prelude::*;

const CLOCK_HZ: u32 = 125_000_000;
const MAX_PERIOD: u32 = u16::MAX as u32;

fn registry(outputs: usize) -> PortRegistry {
    let table: Vec<PinDef> = (0..outputs as u8)
        .map(|n| PinDef::aux_output(n, n, true))
        .collect();
    PortRegistry::new(&[], &table).unwrap()
}

fn available_map(registry: &PortRegistry) -> Vec<u8> {
    (0..registry.available_outputs())
        .map(|slot| registry.map_output(slot).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn available_ports_are_unclaimed(
        outputs in 1..=MAX_ANALOG_PORTS,
        claims in prop::collection::vec(0u8..16, 0..8),
    ) {
        let mut registry = registry(outputs);
        for physical in claims {
            let mut port = physical;
            let _ = registry.claim(&mut port, "Taken");
        }

        for slot in 0..registry.available_outputs() {
            let physical = registry.map_output(slot).unwrap();
            prop_assert!(!registry.output(physical).unwrap().mode.claimed);
        }
        prop_assert_eq!(registry.map_output(registry.available_outputs()), None);
    }

    #[test]
    fn reverse_map_round_trips(
        outputs in 1..=MAX_ANALOG_PORTS,
        claims in prop::collection::vec(0u8..16, 0..8),
    ) {
        let mut registry = registry(outputs);
        for physical in claims {
            let mut port = physical;
            let _ = registry.claim(&mut port, "Taken");
        }

        for slot in 0..registry.available_outputs() {
            let physical = registry.map_output(slot).unwrap();
            prop_assert_eq!(registry.reverse_map_output(physical), Some(slot));
        }
    }

    #[test]
    fn claim_closes_the_gap(outputs in 1..=MAX_ANALOG_PORTS, pick in any::<prop::sample::Index>()) {
        let mut registry = registry(outputs);
        let before = available_map(&registry);
        let n = before.len();
        let k = pick.index(n);

        let mut port = before[k];
        registry.claim(&mut port, "Claimed").unwrap();

        let after = available_map(&registry);
        prop_assert_eq!(after.len(), n - 1);
        prop_assert_eq!(&after[..k], &before[..k]);
        prop_assert_eq!(&after[k..], &before[k + 1..]);
        prop_assert_eq!(port as usize, n - 1);
        prop_assert_eq!(registry.map_slot(port), Some(before[k]));
    }

    #[test]
    fn claiming_twice_never_mutates(outputs in 1..=MAX_ANALOG_PORTS, pick in any::<prop::sample::Index>()) {
        let mut registry = registry(outputs);
        let physical = pick.index(outputs) as u8;

        let mut port = physical;
        registry.claim(&mut port, "First").unwrap();

        let map: Vec<Option<u8>> = (0..outputs as u8).map(|slot| registry.map_slot(slot)).collect();
        let available = registry.available_outputs();

        let mut again = physical;
        prop_assert_eq!(registry.claim(&mut again, "Second"), Err(PortError::AlreadyClaimed));
        prop_assert_eq!(again, physical);
        prop_assert_eq!(registry.available_outputs(), available);
        prop_assert_eq!(registry.output(physical).unwrap().description.as_str(), "First");

        let after: Vec<Option<u8>> = (0..outputs as u8).map(|slot| registry.map_slot(slot)).collect();
        prop_assert_eq!(map, after);
    }

    #[test]
    fn encode_is_monotonic(
        freq_hz in 40.0f32..50_000.0,
        invert in any::<bool>(),
        a in 0.0f32..=100.0,
        b in 0.0f32..=100.0,
    ) {
        let config = PwmConfig { freq_hz, invert, ..PwmConfig::default() };
        let params = PwmParams::precompute(&config, CLOCK_HZ, MAX_PERIOD).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        if invert {
            prop_assert!(params.encode(lo) >= params.encode(hi));
        } else {
            prop_assert!(params.encode(lo) <= params.encode(hi));
        }
    }

    #[test]
    fn encode_hits_boundaries_exactly(
        freq_hz in 40.0f32..50_000.0,
        invert in any::<bool>(),
        min in -1000.0f32..1000.0,
        span in 0.5f32..30_000.0,
        min_value in 0.0f32..50.0,
        max_value in 50.0f32..=100.0,
    ) {
        let config = PwmConfig {
            freq_hz,
            min,
            max: min + span,
            off_value: 0.0,
            min_value,
            max_value,
            invert,
        };
        let params = PwmParams::precompute(&config, CLOCK_HZ, MAX_PERIOD).unwrap();

        prop_assert_eq!(params.encode(config.min), params.min_level);
        prop_assert_eq!(params.encode(config.max), params.max_level);
        prop_assert!(params.min_level <= params.period);
        prop_assert!(params.max_level <= params.period);
    }

    #[test]
    fn period_fits_counter_or_is_rejected(freq_hz in 1.0f32..50_000.0) {
        let config = PwmConfig { freq_hz, ..PwmConfig::default() };
        match PwmParams::precompute(&config, CLOCK_HZ, MAX_PERIOD) {
            Ok(params) => {
                prop_assert!(params.period > 0 && params.period <= MAX_PERIOD);
                prop_assert!(params.max_level <= MAX_PERIOD);
            }
            Err(err) => {
                prop_assert_eq!(err, PwmError::InvalidFrequency);
                prop_assert!(freq_hz < 40.0);
            }
        }
    }

    #[test]
    fn precompute_is_idempotent(freq_hz in 40.0f32..50_000.0, invert in any::<bool>()) {
        let config = PwmConfig { freq_hz, invert, ..PwmConfig::default() };
        prop_assert_eq!(
            PwmParams::precompute(&config, CLOCK_HZ, MAX_PERIOD),
            PwmParams::precompute(&config, CLOCK_HZ, MAX_PERIOD)
        );
    }
}

#[test]
fn three_ports_claim_middle() {
    let mut registry = registry(3);
    let before = available_map(&registry);

    let mut port = 1;
    registry.claim(&mut port, "Laser").unwrap();

    assert_eq!(registry.available_outputs(), 2);
    assert_eq!(registry.map_output(0), Some(before[0]));
    assert_eq!(registry.map_output(1), Some(before[2]));
}
