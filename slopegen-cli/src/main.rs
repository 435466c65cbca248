//! Slopegen CLI: play a slope generator through an audio device or render it to WAV.
//!
//! Usage:
//!   slopegen --frequency 2 --slope 0.2 --shape 0.6
//!   slopegen --mode ad --gate-rate 1.5 --frequency 8 --render env.wav --duration 4
//!   slopegen --list-devices

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::{SampleFormat, WavSpec, WavWriter};
use slopegen_engine::{
    Engine, EngineConfig, Frame, ParameterSource, Params, RampMode, Runtime,
    ShapeKind, TracingDiagnostics, Voice,
};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    /// Free-running cycle
    Loop,
    /// One-shot attack/decay per gate edge
    Ad,
    /// Attack, hold while the gate is high, release
    Ar,
}

impl From<Mode> for RampMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Loop => RampMode::Loop,
            Mode::Ad => RampMode::AttackDecay,
            Mode::Ar => RampMode::AttackRelease,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Strategy {
    /// Blend of five tabulated curves (plain ramp at shape 0)
    Table,
    /// Closed-form power curve (plain ramp at shape 0.5)
    Power,
}

impl From<Strategy> for ShapeKind {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Table => ShapeKind::Table,
            Strategy::Power => ShapeKind::PowerCurve,
        }
    }
}

/// Asymmetric slope generator: LFO or envelope with shape morph and smoothness.
#[derive(Parser, Debug)]
#[command(name = "slopegen")]
#[command(version)]
struct Args {
    /// Timing mode
    #[arg(long, value_enum, default_value_t = Mode::Loop)]
    mode: Mode,

    /// Cycle (loop) or envelope rate in Hz, before --freq-scale
    #[arg(short, long, default_value_t = 1.0)]
    frequency: f64,

    /// Attack fraction of the cycle
    #[arg(long, default_value_t = 0.5)]
    slope: f32,

    /// Shape morph in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    shape: f32,

    /// Below 0.5 low-passes, above 0.5 folds, 0.5 is dry
    #[arg(long, default_value_t = 0.5)]
    smoothness: f32,

    /// Phase offset in cycles (loop mode)
    #[arg(long, default_value_t = 0.0)]
    shift: f32,

    /// Multiplies the frequency; below 1 for very slow cycles
    #[arg(long, default_value_t = 1.0)]
    freq_scale: f64,

    /// Shaping strategy
    #[arg(long, value_enum, default_value_t = Strategy::Table)]
    strategy: Strategy,

    /// Rate in Hz of the square gate that drives the envelope modes
    #[arg(long, default_value_t = 1.0)]
    gate_rate: f32,

    /// Sample rate in Hz (device default when playing, 48000 when rendering)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Seconds to run (rendering defaults to 10, playback runs until Ctrl+C)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Output gain
    #[arg(short, long, default_value_t = 0.35)]
    gain: f32,

    /// Render to this WAV file instead of playing
    #[arg(long)]
    render: Option<PathBuf>,

    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Output device name (default device otherwise)
    #[arg(long)]
    device: Option<String>,
}

/// Fixed parameters plus a square gate at `rate` Hz for the envelope modes.
struct GateClock {
    params: Params,
    inc: f32,
    phase: f32,
    gated: bool,
}

impl GateClock {
    fn new(params: Params, mode: RampMode, rate_hz: f32, sr: f32) -> Self {
        Self {
            params,
            inc: (rate_hz / sr).clamp(0.0, 0.5),
            phase: 0.0,
            gated: mode.is_envelope(),
        }
    }
}

impl ParameterSource for GateClock {
    fn next_frame(&mut self) -> Frame {
        let frame = Frame::new(self.params);
        if !self.gated {
            return frame;
        }
        let high = self.phase < 0.5;
        self.phase += self.inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        frame.with_trigger(if high { 1.0 } else { 0.0 })
    }
}

fn make_voice(args: &Args, sr: f32) -> Result<Voice<GateClock>> {
    let mode = RampMode::from(args.mode);
    let config = EngineConfig::new(sr)
        .with_frequency_scale(args.freq_scale)
        .with_shape(args.strategy.into())
        .with_mode(mode);
    let engine = Engine::new(config).context("invalid engine configuration")?;
    let params = Params {
        frequency: args.frequency,
        slope: args.slope,
        shape: args.shape,
        smoothness: args.smoothness,
        shift: args.shift,
    };
    Ok(Voice::new(engine, GateClock::new(params, mode, args.gate_rate, sr)))
}

fn render_wav(args: &Args, path: &Path) -> Result<()> {
    let sr = args.sample_rate.unwrap_or(48_000);
    let seconds = args.duration.unwrap_or(10.0);
    if !(seconds.is_finite() && seconds >= 0.0) {
        bail!("duration must be a non-negative number of seconds, got {seconds}");
    }

    #[allow(clippy::cast_precision_loss)]
    let sr_f32 = sr as f32;
    let mut voice = make_voice(args, sr_f32)?;

    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = (f64::from(seconds) * f64::from(sr)) as usize;
    let mut block = vec![0.0_f32; 1024];
    let mut left = total;
    while left > 0 {
        let n = left.min(block.len());
        voice.render(&mut block[..n]);
        for s in &block[..n] {
            writer.write_sample((s * args.gain).clamp(-1.0, 1.0)).context("failed to write sample")?;
        }
        left -= n;
    }
    writer.finalize().context("failed to finalize WAV file")?;

    let mut diag = TracingDiagnostics::default();
    voice.engine().report(&mut diag);
    tracing::info!(path = %path.display(), samples = total, sample_rate = sr, "render finished");
    Ok(())
}

fn list_output_devices() -> Result<()> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = name {
        for d in host.output_devices()? {
            if d.name()? == name {
                return Ok(d);
            }
        }
        bail!("requested device not found: {name}");
    }
    host.default_output_device().ok_or_else(|| anyhow!("no default output device"))
}

fn choose_config(device: &cpal::Device, req_sr: Option<u32>) -> Result<cpal::SupportedStreamConfig> {
    let Some(sr) = req_sr else {
        return Ok(device.default_output_config()?);
    };

    // Closest supported range by sample rate, preferring fewer channels.
    let mut best: Option<(u64, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let sr_min = range.min_sample_rate().0;
        let sr_max = range.max_sample_rate().0;
        let sr_pen = if (sr_min..=sr_max).contains(&sr) {
            0
        } else {
            u64::from(sr_min.abs_diff(sr).min(sr_max.abs_diff(sr)))
        };
        let score = sr_pen.saturating_mul(1000) + u64::from(range.channels());
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, range));
        }
    }

    let (_, range) = best.ok_or_else(|| anyhow!("no supported output configs"))?;
    let lo = range.min_sample_rate().0;
    let hi = range.max_sample_rate().0;
    Ok(range.with_sample_rate(cpal::SampleRate(sr.clamp(lo, hi))))
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut runtime: Runtime<Voice<GateClock>>,
    gain: f32,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    #[allow(clippy::cast_precision_loss)]
    let sr = cfg.sample_rate.0 as f32;
    let channels = usize::from(cfg.channels);

    // ~1 second meter at the stream rate
    let meter_interval = (cfg.sample_rate.0).max(1) as usize;
    let mut meter_count: usize = 0;
    let mut meter_peak: f32 = 0.0;
    let mut diag = TracingDiagnostics::new(meter_interval as u64 / 10);

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            for frame in output.chunks_mut(channels) {
                let s = (runtime.next(sr) * gain).clamp(-1.0, 1.0);
                let v: T = T::from_sample(s);
                for ch in frame.iter_mut() {
                    *ch = v;
                }

                meter_peak = meter_peak.max(s.abs());
                meter_count += 1;
                if meter_count >= meter_interval {
                    tracing::info!("peak ~ {meter_peak:.3}");
                    runtime.generator().engine().report(&mut diag);
                    meter_peak = 0.0;
                    meter_count = 0;
                }
            }
        },
        |e| tracing::error!(%e, "stream error"),
        None,
    )?;

    Ok(stream)
}

fn play(args: &Args) -> Result<()> {
    let device = pick_device(args.device.as_deref())?;
    let sup_cfg = choose_config(&device, args.sample_rate)?;
    let sample_format = sup_cfg.sample_format();
    let cfg = sup_cfg.config();

    #[allow(clippy::cast_precision_loss)]
    let sr = cfg.sample_rate.0 as f32;
    let runtime = Runtime::new(make_voice(args, sr)?, sr);

    let name = device.name()?;
    tracing::info!(device = %name, ?cfg, ?sample_format, "stream config");
    tracing::info!(
        mode = ?args.mode,
        frequency = args.frequency,
        slope = args.slope,
        shape = args.shape,
        smoothness = args.smoothness,
        gain = args.gain,
        "slope generator"
    );

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, runtime, args.gain)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, runtime, args.gain)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, runtime, args.gain)?,
        other => bail!("unsupported device sample format: {other:?}"),
    };

    stream.play()?;

    if let Some(d) = args.duration {
        if !(d.is_finite() && d >= 0.0) {
            bail!("duration must be a non-negative number of seconds, got {d}");
        }
        tracing::info!("auto-stop after {d} seconds");
        std::thread::sleep(Duration::from_secs_f32(d));
        return Ok(());
    }

    tracing::info!("press Ctrl+C to stop");
    loop {
        std::thread::sleep(Duration::from_millis(500));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.list_devices {
        return list_output_devices();
    }

    match &args.render {
        Some(path) => render_wav(&args, path),
        None => play(&args),
    }
}
