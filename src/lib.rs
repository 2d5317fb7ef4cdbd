//! Preparación del dataset UR Fall (vídeo RGB + acelerómetro) para entrenar
//! un detector de caídas multimodal.
//!
//! - [`feature_extractor`]: ventanas del acelerómetro -> 8 características.
//! - [`frame_sampler`]: carpeta de frames -> `n_frames` imágenes normalizadas.
//! - [`batch`]: ensamblado de batches de forma fija por lista de eventos.
//! - [`scheduler`] / [`loader`]: permutación por época y generador de batches.
//! - [`health_check`]: verificación de la estructura de carpetas.

pub mod batch;
pub mod config;
pub mod csv_loader;
pub mod dataset;
pub mod error;
pub mod feature_extractor;
pub mod frame_sampler;
pub mod health_check;
pub mod loader;
pub mod scheduler;
pub mod types;

pub use batch::{build_batch, EventBatch, EventBatchAssembler};
pub use config::{DatasetLayout, ImageDim, LoaderConfig};
pub use dataset::{Category, Event, EventCatalog, LabelMap};
pub use error::{LoaderError, Outcome, Result};
pub use feature_extractor::{extract_windows, summarize, SignalWindower};
pub use frame_sampler::FrameSampler;
pub use loader::FallDetectionLoader;
pub use scheduler::EpochScheduler;
