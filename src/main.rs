//! Long Exposure CLI
//!
//! Runs one effect over synthetic camera frames and reports the result.

use clap::Parser;
use long_exposure::{
    capture::{FileConfig, FrameSource, MockSource},
    effects::{BorderPolicy, Effect, EffectProcessor},
    exposure::BlendPolicy,
    metrics::{MetricsRegistry, MetricsSnapshot},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "long-exposure", version, about = "Long-exposure and edge effects over a synthetic camera feed")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Effect to apply.
    #[arg(short, long)]
    effect: Option<Effect>,

    /// Number of frames to process.
    #[arg(short = 'n', long)]
    frames: Option<u32>,

    /// Frames blended into each long-exposure output.
    #[arg(long)]
    capacity: Option<usize>,

    /// Blend weighting: fixed-weight or distance-scaled.
    #[arg(long)]
    policy: Option<BlendPolicy>,

    /// Divisor applied to every blend weight.
    #[arg(long)]
    divisor: Option<f64>,

    /// Convolution border handling: replicate or reflect101.
    #[arg(long)]
    border: Option<BorderPolicy>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Seed for the synthetic source.
    #[arg(long)]
    seed: Option<u64>,

    /// Run until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Print Prometheus metrics after the run.
    #[arg(long)]
    print_metrics: bool,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut FileConfig) {
        if let Some(effect) = self.effect {
            config.effects.effect = effect;
        }
        if let Some(border) = self.border {
            config.effects.border = border;
        }
        if let Some(frames) = self.frames {
            config.output.frame_count = frames;
        }
        if let Some(capacity) = self.capacity {
            config.exposure.capacity = capacity;
        }
        if let Some(policy) = self.policy {
            config.exposure.blend_policy = policy;
        }
        if let Some(divisor) = self.divisor {
            config.exposure.fixed_weight_divisor = divisor;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(seed) = self.seed {
            config.capture.seed = seed;
        }
        config.output.continuous |= self.continuous;
        config.output.print_metrics |= self.print_metrics;
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Long Exposure v{}", long_exposure::VERSION);
    info!(
        effect = %config.effects.effect,
        capacity = config.exposure.capacity,
        policy = ?config.exposure.blend_policy,
        "Using synthetic frame source"
    );

    let mut source = MockSource::new();
    if let Err(e) = source.open(&config.capture) {
        eprintln!("Failed to open source: {}", e);
        std::process::exit(1);
    }

    let mut processor = match EffectProcessor::new(
        config.effects.effect,
        config.effects.border,
        config.exposure.clone(),
    ) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("Invalid exposure configuration: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    if config.output.continuous {
        let flag = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
        info!("Running continuously, press Ctrl-C to stop");
    }

    let frame_interval = Duration::from_secs(1) / config.capture.fps;
    let started = Instant::now();
    let mut last_output = None;
    let mut failures = 0u64;
    let mut index = 0u64;

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || index < config.output.frame_count as u64)
    {
        let tick = Instant::now();
        index += 1;

        let frame = match source.capture() {
            Ok(f) => f,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                failures += 1;
                continue;
            }
        };

        match processor.process(frame) {
            Ok(output) => {
                debug!(frame = index, sequence = output.sequence(), "Frame processed");
                last_output = Some(output);
            }
            Err(e) => {
                warn!("Frame {}: effect failed: {}", index, e);
                failures += 1;
            }
        }

        if config.output.continuous {
            if let Some(remaining) = frame_interval.checked_sub(tick.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    source.close();

    let accumulator = processor.accumulator();
    info!(
        "Processed {} frames in {:.2?}: {} failed, {} passed through, {} blended",
        processor.frames_processed(),
        started.elapsed(),
        failures,
        accumulator.passthrough_frames(),
        accumulator.blended_frames()
    );

    match &last_output {
        Some(frame) => println!(
            "Last output: sequence {} shape {} fingerprint {}",
            frame.sequence(),
            frame.shape(),
            hex(&frame.fingerprint())
        ),
        None => warn!("No frames were produced"),
    }

    if config.output.print_metrics {
        match MetricsRegistry::new() {
            Ok(registry) => {
                registry.update(&MetricsSnapshot::from_processor(&processor));
                match registry.encode() {
                    Ok(text) => print!("{}", text),
                    Err(e) => warn!("Failed to encode metrics: {}", e),
                }
            }
            Err(e) => warn!("Failed to create metrics registry: {}", e),
        }
    }
}
