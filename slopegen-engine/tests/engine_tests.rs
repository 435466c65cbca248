//! End-to-end behaviour of a single voice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slopegen_engine::{
    Engine, EngineConfig, Frame, Generator, Params, RampMode, Runtime, ShapeKind, Stage, Voice,
};

const SR: f32 = 48_000.0;

fn engine(mode: RampMode) -> Engine {
    Engine::new(EngineConfig::new(SR).with_mode(mode)).unwrap()
}

fn run(e: &mut Engine, p: &Params, n: usize) -> Vec<f32> {
    (0..n).map(|_| e.process(p, None)).collect()
}

fn argmax(xs: &[f32]) -> usize {
    let mut best = 0;
    for (i, x) in xs.iter().enumerate() {
        if *x > xs[best] {
            best = i;
        }
    }
    best
}

#[test]
fn one_hertz_triangle_at_48k() {
    let mut e = engine(RampMode::Loop);
    let out = run(&mut e, &Params::default(), 48_001);

    // cycle starts (and ends) at ramp position 0, the trough of the bipolar triangle
    assert_eq!(out[0], -1.0);
    assert!((out[48_000] - out[0]).abs() < 1e-3, "end={}", out[48_000]);

    let peak = argmax(&out[..48_000]);
    assert!(peak.abs_diff(24_000) <= 1, "peak at {peak}");
    assert!(out[peak] > 0.9999);

    // zero crossings a quarter cycle either side of the peak
    assert!(out[12_000].abs() < 1e-3, "{}", out[12_000]);
    assert!(out[36_000].abs() < 1e-3, "{}", out[36_000]);
}

#[test]
fn attack_decay_scenario() {
    let mut e = engine(RampMode::AttackDecay);
    let p = Params::default().with_frequency(10.0).with_slope(0.2);

    for _ in 0..100 {
        assert_eq!(e.process(&p, Some(0.0)), 0.0);
    }

    let mut out = vec![e.process(&p, Some(1.0))];
    assert_eq!(e.stage(), Stage::Attack);
    for _ in 0..6000 {
        out.push(e.process(&p, Some(0.0)));
    }

    let peak = out.iter().position(|y| *y >= 0.9999).unwrap();
    assert!(peak.abs_diff(960) <= 2, "peak at {peak}");

    let idle = peak + out[peak..].iter().position(|y| *y == 0.0).unwrap();
    assert!(idle.abs_diff(4800) <= 3, "idle at {idle}");
    assert!(out[idle..].iter().all(|y| *y == 0.0));
    assert_eq!(e.stage(), Stage::Idle);
}

#[test]
fn attack_decay_runs_once_despite_extra_triggers() {
    let mut e = engine(RampMode::AttackDecay);
    let p = Params::default().with_frequency(10.0).with_slope(0.2);
    e.process(&p, Some(1.0));
    // gate stays high for the whole run: no new edges, envelope still completes
    let mut stages = vec![e.stage()];
    for _ in 0..6000 {
        e.process(&p, Some(1.0));
        if stages.last() != Some(&e.stage()) {
            stages.push(e.stage());
        }
    }
    assert_eq!(stages, vec![Stage::Attack, Stage::DecayOrRelease, Stage::Idle]);
}

#[test]
fn attack_release_holds_peak_while_gate_is_high() {
    let mut e = engine(RampMode::AttackRelease);
    let p = Params::default().with_frequency(100.0);
    e.process(&p, Some(1.0));
    let held = (0..10_000).map(|_| e.process(&p, Some(1.0))).last().unwrap();
    assert_eq!(held, 1.0);
    assert_eq!(e.stage(), Stage::Attack);

    let mut prev = held;
    for _ in 0..300 {
        let y = e.process(&p, Some(0.0));
        assert!(y <= prev);
        prev = y;
    }
    assert_eq!(prev, 0.0);
    assert_eq!(e.stage(), Stage::Idle);
}

#[test]
fn absent_trigger_keeps_gate_level() {
    let mut e = engine(RampMode::AttackRelease);
    let p = Params::default().with_frequency(100.0);
    e.process(&p, Some(1.0));
    for _ in 0..1000 {
        e.process(&p, None);
    }
    assert_eq!(e.stage(), Stage::Attack);
    assert!(e.snapshot().gate_high);
}

#[test]
fn nan_trigger_reads_low() {
    let mut e = engine(RampMode::AttackDecay);
    let p = Params::default().with_frequency(10.0);
    for _ in 0..10 {
        assert_eq!(e.process(&p, Some(f32::NAN)), 0.0);
    }
    assert_eq!(e.stage(), Stage::Idle);
}

#[test]
fn loop_output_is_periodic() {
    let mut e = engine(RampMode::Loop);
    // 480 Hz at 48 kHz: 100-sample period; fold side is memoryless
    let p = Params::default()
        .with_frequency(480.0)
        .with_slope(0.3)
        .with_shape(0.37)
        .with_smoothness(0.8);
    let out = run(&mut e, &p, 1000);
    for i in 0..900 {
        assert!((out[i] - out[i + 100]).abs() < 1e-3, "i={i}");
    }
}

#[test]
fn identity_shape_gives_plain_ramp_for_both_strategies() {
    for kind in [ShapeKind::Table, ShapeKind::PowerCurve] {
        let mut e = Engine::new(EngineConfig::new(SR).with_shape(kind)).unwrap();
        let p = Params::default()
            .with_frequency(48.0)
            .with_slope(0.3)
            .with_shape(e.identity_shape());
        for i in 0..2000 {
            let y = e.process(&p, None);
            let pos = (i % 1000) as f32 / 1000.0;
            let want = if pos < 0.3 {
                2.0 * pos / 0.3 - 1.0
            } else {
                2.0 * (1.0 - (pos - 0.3) / 0.7) - 1.0
            };
            assert!((y - want).abs() < 1e-3, "{kind:?} i={i} y={y} want={want}");
        }
    }
}

#[test]
fn smoothness_is_continuous_across_midpoint() {
    let make = || engine(RampMode::Loop);
    let p = Params::default().with_frequency(2.0).with_shape(0.6);
    let (mut lo, mut mid, mut hi) = (make(), make(), make());
    for i in 0..48_000 {
        let a = lo.process(&p.with_smoothness(0.4999), None);
        let b = mid.process(&p.with_smoothness(0.5), None);
        let c = hi.process(&p.with_smoothness(0.5001), None);
        if i > 100 {
            assert!((a - b).abs() < 5e-3, "i={i} below={a} dry={b}");
        }
        assert!((c - b).abs() < 5e-3, "i={i} above={c} dry={b}");
    }
}

#[test]
fn output_stays_bounded_under_random_parameters() {
    let mut rng = StdRng::seed_from_u64(0x5107_e6e4);
    for mode in [RampMode::Loop, RampMode::AttackDecay, RampMode::AttackRelease] {
        let mut e = engine(mode);
        for i in 0..50_000 {
            let p = Params {
                frequency: rng.gen_range(-100.0..30_000.0),
                slope: rng.gen_range(-0.5..1.5),
                shape: rng.gen_range(-0.5..1.5),
                smoothness: rng.gen_range(-0.5..1.5),
                shift: rng.gen_range(-0.5..1.5),
            };
            let trigger = if rng.gen_bool(0.01) { f32::NAN } else { rng.gen_range(0.0..1.0) };
            let y = e.process(&p, Some(trigger));
            assert!((-1.0..=1.0).contains(&y), "{mode:?} i={i} y={y}");
            let phase = e.snapshot().phase;
            assert!((0.0..=1.0).contains(&phase), "{mode:?} phase={phase}");
        }
    }
}

#[test]
fn phase_reset_restarts_the_cycle() {
    let mut e = engine(RampMode::Loop);
    let p = Params::default().with_frequency(3.0);
    run(&mut e, &p, 5000);
    e.request_phase_reset();
    assert!(e.snapshot().reset_pending);
    assert_eq!(e.process(&p, None), -1.0);
    assert!(!e.snapshot().reset_pending);
}

#[test]
fn frame_reset_and_mode_change() {
    let mut e = engine(RampMode::Loop);
    let p = Params::default().with_frequency(3.0);
    run(&mut e, &p, 5000);
    assert_eq!(e.process_frame(Frame::new(p).with_reset()), -1.0);

    run(&mut e, &p, 5000);
    let y = e.process_frame(Frame::new(p).with_mode(RampMode::AttackRelease));
    assert_eq!(y, 0.0);
    assert_eq!(e.stage(), Stage::Idle);
}

#[test]
fn frequency_scale_stretches_the_cycle() {
    // 1000 Hz scaled by 1e-3 is the 1 Hz triangle again
    let mut e = Engine::new(EngineConfig::new(SR).with_frequency_scale(1.0e-3)).unwrap();
    let out = run(&mut e, &Params::default().with_frequency(1000.0), 48_000);
    assert!(argmax(&out).abs_diff(24_000) <= 1);
}

#[test]
fn reinitialize_returns_to_power_on_state() {
    let mut e = engine(RampMode::Loop);
    let p = Params::default().with_frequency(5.0).with_smoothness(0.2);
    run(&mut e, &p, 1234);
    e.set_mode(RampMode::AttackDecay);
    e.process(&p, Some(1.0));
    e.reinitialize();
    let s = e.snapshot();
    assert_eq!(s.mode, RampMode::Loop);
    assert_eq!(s.stage, Stage::Idle);
    assert_eq!(s.phase, 0.0);
    assert!(!s.gate_high);
    assert_eq!(e.filter_state(), (0.0, 0.0));
}

#[test]
fn render_pulls_frames_from_a_gate_clock() {
    let mut e = engine(RampMode::AttackDecay);
    let p = Params::default().with_frequency(50.0);
    // 10 Hz square gate
    let mut n = 0_u32;
    let mut clock = || {
        let high = (n % 4800) < 2400;
        n += 1;
        Frame::new(p).with_trigger(if high { 1.0 } else { 0.0 })
    };
    let mut out = vec![0.0_f32; 48_000];
    e.render(&mut clock, &mut out);
    // ten triggers, each producing one peak
    let peaks = out.windows(2).filter(|w| w[0] < 0.9999 && w[1] >= 0.9999).count();
    assert_eq!(peaks, 10);
    assert!(out.iter().all(|y| (0.0..=1.0).contains(y)));
}

#[test]
fn voice_in_runtime_matches_direct_engine() {
    let p = Params::default().with_frequency(7.0).with_slope(0.1).with_shape(0.8);
    let mut direct = engine(RampMode::Loop);
    let mut rt = Runtime::new(Voice::new(engine(RampMode::Loop), p), SR);
    for _ in 0..4800 {
        assert_eq!(rt.next(SR), direct.process(&p, None));
    }
    let mut v = Voice::new(engine(RampMode::Loop), p);
    v.reset(SR);
    assert_eq!(v.next(), -1.0);
}
