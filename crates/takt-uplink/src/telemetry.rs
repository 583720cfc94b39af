use rand::Rng;
use takt_core::{LineState, SensorRange, TelemetryConfig};
use takt_model::TelemetrySample;
use time::OffsetDateTime;

/// Synthesize this tick's telemetry sample.
///
/// While stopped, every sensor field is exactly zero and the counters pass
/// through untouched; stopping never zeroes them. While running, sensor
/// fields are drawn from the configured ranges and the production event
/// model runs: with probability `p_event` the tick produced an item, which
/// is bad with probability `p_bad`. At most one counter increment happens
/// per tick, serialized through the counters lock.
pub fn synthesize<R: Rng + ?Sized>(
    cfg: &TelemetryConfig,
    state: &LineState,
    rng: &mut R,
) -> TelemetrySample {
    let now = OffsetDateTime::now_utc();

    if !state.is_running() {
        return TelemetrySample::quiescent(state.counters(), cfg.actuator_id, now);
    }

    let counters = if rng.gen_bool(cfg.p_event) {
        state.record_event(rng.gen_bool(cfg.p_bad))
    } else {
        state.counters()
    };

    let ranges = &cfg.ranges;
    TelemetrySample {
        timestamp: now,
        vibration_level: draw(rng, ranges.vibration_level),
        actuator_voltage: draw(rng, ranges.actuator_voltage),
        actuator_current: draw(rng, ranges.actuator_current),
        power_consumption: draw(rng, ranges.power_consumption),
        mass: draw(rng, ranges.mass),
        brightness: draw(rng, ranges.brightness),
        good_product: counters.good,
        bad_product: counters.bad,
        actuator_id: cfg.actuator_id,
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, range: SensorRange) -> f64 {
    rng.gen_range(range.min..=range.max)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use takt_model::Counters;

    use super::*;

    #[test]
    fn stopped_ticks_emit_zeros_and_leave_counters_alone() {
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        let mut rng = StdRng::seed_from_u64(7);

        state.record_event(false);
        state.record_event(true);
        let before = state.counters();

        for _ in 0..100 {
            let sample = synthesize(&cfg, &state, &mut rng);
            assert!(sample.is_quiescent());
            assert_eq!(sample.good_product, before.good);
            assert_eq!(sample.bad_product, before.bad);
        }
        assert_eq!(state.counters(), before);
    }

    #[test]
    fn running_fields_stay_within_the_configured_ranges() {
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        state.set_running(true);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1_000 {
            let sample = synthesize(&cfg, &state, &mut rng);
            let ranges = &cfg.ranges;
            assert!(ranges.vibration_level.contains(sample.vibration_level));
            assert!(ranges.actuator_voltage.contains(sample.actuator_voltage));
            assert!(ranges.actuator_current.contains(sample.actuator_current));
            assert!(ranges.power_consumption.contains(sample.power_consumption));
            assert!(ranges.mass.contains(sample.mass));
            assert!(ranges.brightness.contains(sample.brightness));
        }
    }

    #[test]
    fn at_most_one_increment_per_tick() {
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        state.set_running(true);
        let mut rng = StdRng::seed_from_u64(11);

        let mut previous = state.counters().total();
        for _ in 0..5_000 {
            synthesize(&cfg, &state, &mut rng);
            let total = state.counters().total();
            assert!(total - previous <= 1);
            previous = total;
        }
    }

    #[test]
    fn event_and_bad_rates_converge() {
        let cfg = TelemetryConfig::default();
        let state = LineState::new();
        state.set_running(true);
        let mut rng = StdRng::seed_from_u64(42);

        const TICKS: u64 = 10_000;
        for _ in 0..TICKS {
            synthesize(&cfg, &state, &mut rng);
        }

        let Counters { good, bad } = state.counters();
        let events = good + bad;

        let event_rate = events as f64 / TICKS as f64;
        assert!(
            (event_rate - cfg.p_event).abs() < 0.02,
            "event rate {event_rate} strayed from {}",
            cfg.p_event
        );

        let bad_fraction = bad as f64 / events as f64;
        assert!(
            (bad_fraction - cfg.p_bad).abs() < 0.05,
            "bad fraction {bad_fraction} strayed from {}",
            cfg.p_bad
        );
    }
}
