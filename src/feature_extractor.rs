use std::path::Path;

use log::warn;

use crate::csv_loader::load_accel_samples;
use crate::error::{Outcome, Result};
use crate::types::{AccelSample, WindowFeatures, NUM_ACCEL_FEATURES};

/// Ventaneo deslizante del acelerómetro con 8 características por ventana
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWindower {
    window_size: usize,
    step: usize,
}

impl SignalWindower {
    /// # Panics
    ///
    /// Si `window_size` o `step` son 0.
    pub fn new(window_size: usize, step: usize) -> Self {
        assert!(window_size > 0, "window_size debe ser > 0");
        assert!(step > 0, "step debe ser > 0");
        Self { window_size, step }
    }

    pub fn extract(&self, samples: &[AccelSample]) -> Vec<WindowFeatures> {
        extract_windows(samples, self.window_size, self.step)
    }

    /// Carga el CSV y extrae sus ventanas. Archivo ausente, ilegible o vacío
    /// se devuelve como `Outcome::Degraded`; columnas insuficientes es error.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<Outcome<Vec<WindowFeatures>>> {
        let loaded = Outcome::from_result(load_accel_samples(path))?;
        if let Outcome::Degraded { path, reason } = &loaded {
            warn!("Acelerómetro {:?} sin ventanas: {}", path, reason);
        }
        Ok(loaded.map(|samples| self.extract(&samples)))
    }
}

/// Número de ventanas que emite una serie de `len` muestras.
///
/// Los inicios son 0, step, 2*step, ... estrictamente menores que
/// `len - window_size`, así que con `len == window_size` no hay ventanas.
pub fn window_count(len: usize, window_size: usize, step: usize) -> usize {
    if step == 0 || len <= window_size {
        return 0;
    }
    (len - window_size).div_ceil(step)
}

/// Extrae [x_mean, y_mean, z_mean, smv_mean, x_std, y_std, z_std, smv_std]
/// de cada ventana completa. La cola que no llena una ventana se descarta.
///
/// # Panics
///
/// Si `window_size` o `step` son 0.
pub fn extract_windows(
    samples: &[AccelSample],
    window_size: usize,
    step: usize,
) -> Vec<WindowFeatures> {
    assert!(window_size > 0, "window_size debe ser > 0");
    assert!(step > 0, "step debe ser > 0");

    let xs: Vec<f32> = samples.iter().map(|s| s.x).collect();
    let ys: Vec<f32> = samples.iter().map(|s| s.y).collect();
    let zs: Vec<f32> = samples.iter().map(|s| s.z).collect();
    // SMV una sola vez por muestra, antes de ventanear
    let smv: Vec<f32> = samples.iter().map(AccelSample::smv).collect();

    let last_start = samples.len().saturating_sub(window_size);
    let mut windows = Vec::with_capacity(window_count(samples.len(), window_size, step));

    for start in (0..last_start).step_by(step) {
        let range = start..start + window_size;
        let channels = [
            &xs[range.clone()],
            &ys[range.clone()],
            &zs[range.clone()],
            &smv[range],
        ];

        let mut features = [0.0f32; NUM_ACCEL_FEATURES];
        for (c, signal) in channels.iter().enumerate() {
            features[c] = mean(signal) as f32;
            features[c + 4] = sample_std(signal) as f32;
        }
        windows.push(features);
    }

    windows
}

/// Media elemento a elemento de las ventanas de un evento; ceros si no hay ninguna
pub fn summarize(windows: &[WindowFeatures]) -> WindowFeatures {
    let mut summary = [0.0f32; NUM_ACCEL_FEATURES];
    if windows.is_empty() {
        return summary;
    }

    let n = windows.len() as f64;
    for (i, value) in summary.iter_mut().enumerate() {
        let sum: f64 = windows.iter().map(|w| f64::from(w[i])).sum();
        *value = (sum / n) as f32;
    }
    summary
}

// ========== Funciones estadísticas ==========

fn mean(data: &[f32]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().map(|&v| f64::from(v)).sum::<f64>() / data.len() as f64
}

/// Desviación estándar muestral (denominador n-1); NaN con menos de 2 valores
fn sample_std(data: &[f32]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let m = mean(data);
    let variance = data
        .iter()
        .map(|&v| (f64::from(v) - m).powi(2))
        .sum::<f64>()
        / (data.len() - 1) as f64;
    variance.sqrt()
}
