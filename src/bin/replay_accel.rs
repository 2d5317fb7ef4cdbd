use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use urfall::csv_loader::load_accel_samples;
use urfall::feature_extractor::{summarize, window_count, SignalWindower};
use urfall::types::{DEFAULT_STEP, DEFAULT_WINDOW_SIZE, FEATURE_NAMES};

const USAGE: &str = "Uso: replay_accel [--window N] [--step N] [--dump-windows] <archivo-acc.csv>";

struct ReplayOptions {
    window_size: usize,
    step: usize,
    dump_windows: bool,
}

fn parse_usize(flag: &str, value: Option<String>) -> Result<usize> {
    let value = value.ok_or_else(|| anyhow!("{} necesita un valor", flag))?;
    let parsed: usize = value
        .parse()
        .with_context(|| format!("{} inválido: {}", flag, value))?;
    if parsed == 0 {
        bail!("{} debe ser > 0", flag);
    }
    Ok(parsed)
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut opts = ReplayOptions {
        window_size: DEFAULT_WINDOW_SIZE,
        step: DEFAULT_STEP,
        dump_windows: false,
    };
    let mut csv_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--window" => opts.window_size = parse_usize("--window", args.next())?,
            "--step" => opts.step = parse_usize("--step", args.next())?,
            "--dump-windows" => opts.dump_windows = true,
            _ => {
                if csv_path.is_some() {
                    bail!(USAGE);
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok((csv_path, opts))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (csv_path, opts) = parse_args()?;
    println!("Reproduciendo acelerómetro desde {:?}", csv_path);

    let samples = load_accel_samples(&csv_path)
        .with_context(|| format!("No se pudo cargar {:?}", csv_path))?;
    let windower = SignalWindower::new(opts.window_size, opts.step);
    let windows = windower.extract(&samples);

    println!(
        "{} muestras, ventana {} paso {} -> {} ventanas",
        samples.len(),
        opts.window_size,
        opts.step,
        window_count(samples.len(), opts.window_size, opts.step)
    );
    let used = windows
        .len()
        .checked_sub(1)
        .map(|last| last * opts.step + opts.window_size)
        .unwrap_or(0);
    if used < samples.len() {
        println!("Cola sin usar: {} muestras", samples.len() - used);
    }

    if opts.dump_windows {
        println!("\nVentanas:");
        for (idx, features) in windows.iter().enumerate() {
            let values: Vec<String> = features.iter().map(|v| format!("{:>10.4}", v)).collect();
            println!("  {:03}: {}", idx, values.join(" "));
        }
    }

    println!("\nResumen del evento (media de ventanas):");
    for (name, value) in FEATURE_NAMES.iter().zip(summarize(&windows)) {
        println!("  {:<9} {:>12.6}", name, value);
    }

    Ok(())
}
