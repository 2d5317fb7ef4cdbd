use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{s, Array1, Array2, Array5, ArrayView1};

use crate::config::LoaderConfig;
use crate::dataset::{Event, LabelMap};
use crate::error::{DegradeReason, LoaderError, Outcome, Result};
use crate::feature_extractor::{summarize, SignalWindower};
use crate::frame_sampler::FrameSampler;
use crate::types::NUM_ACCEL_FEATURES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Accelerometer,
    Frames,
}

/// Una modalidad de un evento que se sustituyó por su valor por defecto
#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub event_id: String,
    pub modality: Modality,
    pub path: PathBuf,
    pub reason: DegradeReason,
}

/// Batch listo para el modelo. La fila `i` de cada tensor corresponde a `event_ids[i]`.
#[derive(Debug, Clone)]
pub struct EventBatch {
    pub event_ids: Vec<String>,
    /// (batch, frames, alto, ancho, canales); ceros si los frames del evento fallaron
    pub images: Array5<f32>,
    /// (batch, 8); ceros si el evento no produjo ventanas
    pub accel: Array2<f32>,
    /// (batch,): 1 = caída, 0 = ADL
    pub labels: Array1<u8>,
    pub degraded: Vec<Degradation>,
}

impl EventBatch {
    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }

    pub fn degraded_count(&self, modality: Modality) -> usize {
        self.degraded.iter().filter(|d| d.modality == modality).count()
    }
}

/// Construye batches sincronizados de frames + resumen del acelerómetro
#[derive(Debug, Clone)]
pub struct EventBatchAssembler {
    windower: SignalWindower,
    sampler: FrameSampler,
}

impl EventBatchAssembler {
    pub fn new(windower: SignalWindower, sampler: FrameSampler) -> Self {
        Self { windower, sampler }
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            SignalWindower::new(config.accel_window_size, config.accel_step),
            FrameSampler::from_config(config),
        ))
    }

    /// Un evento ilegible o ausente se degrada a ceros en su fila; solo
    /// `ShapeMismatch` o un evento sin etiqueta abortan el batch.
    pub fn build_batch<S: AsRef<str>>(
        &self,
        event_ids: &[S],
        labels: &LabelMap,
        root: &Path,
    ) -> Result<EventBatch> {
        let n = event_ids.len();
        let (frames, height, width, channels) = self.sampler.sequence_shape();

        let mut images = Array5::<f32>::zeros((n, frames, height, width, channels));
        let mut accel = Array2::<f32>::zeros((n, NUM_ACCEL_FEATURES));
        let mut label_vec = Array1::<u8>::zeros(n);
        let mut degraded = Vec::new();

        for (row, id) in event_ids.iter().enumerate() {
            let id = id.as_ref();
            let label = *labels
                .get(id)
                .ok_or_else(|| LoaderError::UnknownEvent(id.to_string()))?;
            let event = Event::resolve(root, id, label);

            match self.sampler.sample_outcome(&event.frame_dir)? {
                Outcome::Ok(sequence) => {
                    images.slice_mut(s![row, .., .., .., ..]).assign(&sequence);
                }
                Outcome::Degraded { path, reason } => {
                    degraded.push(degrade(id, Modality::Frames, path, reason));
                }
            }

            let summary = match self.windower.process_file(&event.accel_path)? {
                Outcome::Ok(windows) => summarize(&windows),
                Outcome::Degraded { path, reason } => {
                    degraded.push(degrade(id, Modality::Accelerometer, path, reason));
                    [0.0; NUM_ACCEL_FEATURES]
                }
            };
            accel.row_mut(row).assign(&ArrayView1::from(&summary[..]));
            label_vec[row] = u8::from(label);
        }

        debug!(
            "Batch de {} eventos construido ({} modalidades degradadas)",
            n,
            degraded.len()
        );

        Ok(EventBatch {
            event_ids: event_ids.iter().map(|id| id.as_ref().to_string()).collect(),
            images,
            accel,
            labels: label_vec,
            degraded,
        })
    }
}

/// Atajo sin estado: valida la configuración y construye un batch
pub fn build_batch<S: AsRef<str>>(
    event_ids: &[S],
    labels: &LabelMap,
    root: &Path,
    config: &LoaderConfig,
) -> Result<EventBatch> {
    EventBatchAssembler::from_config(config)?.build_batch(event_ids, labels, root)
}

fn degrade(id: &str, modality: Modality, path: PathBuf, reason: DegradeReason) -> Degradation {
    debug!("Evento {} degradado ({:?}) en {:?}: {}", id, modality, path, reason);
    Degradation {
        event_id: id.to_string(),
        modality,
        path,
        reason,
    }
}
