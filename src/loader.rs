use std::path::PathBuf;

use crate::batch::{EventBatch, EventBatchAssembler};
use crate::config::LoaderConfig;
use crate::dataset::{EventCatalog, LabelMap};
use crate::error::Result;
use crate::scheduler::EpochScheduler;

/// Generador de batches para el bucle de entrenamiento: une el
/// [`EpochScheduler`] con el [`EventBatchAssembler`].
///
/// Uso por época: `for i in 0..loader.len() { loader.batch(i)? }` y luego
/// `loader.on_epoch_end()`. El constructor ya baraja para la primera época.
#[derive(Debug, Clone)]
pub struct FallDetectionLoader {
    root: PathBuf,
    labels: LabelMap,
    config: LoaderConfig,
    assembler: EventBatchAssembler,
    scheduler: EpochScheduler,
}

impl FallDetectionLoader {
    pub fn new(root: impl Into<PathBuf>, catalog: &EventCatalog, config: LoaderConfig) -> Result<Self> {
        Self::from_parts(root, catalog.event_ids(), catalog.label_map(), config)
    }

    pub fn from_parts(
        root: impl Into<PathBuf>,
        event_ids: Vec<String>,
        labels: LabelMap,
        config: LoaderConfig,
    ) -> Result<Self> {
        let assembler = EventBatchAssembler::from_config(&config)?;
        let mut scheduler = match config.seed {
            Some(seed) => EpochScheduler::with_seed(event_ids, config.batch_size, config.shuffle, seed),
            None => EpochScheduler::new(event_ids, config.batch_size, config.shuffle),
        };
        scheduler.on_epoch_boundary();

        Ok(Self {
            root: root.into(),
            labels,
            config,
            assembler,
            scheduler,
        })
    }

    /// Batches por época
    pub fn len(&self) -> usize {
        self.scheduler.batch_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch(&self, index: usize) -> Result<EventBatch> {
        let ids = self.scheduler.get_batch(index)?;
        self.assembler.build_batch(ids.as_slice(), &self.labels, &self.root)
    }

    pub fn on_epoch_end(&mut self) {
        self.scheduler.on_epoch_boundary();
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetLayout;
    use crate::error::LoaderError;

    #[test]
    fn test_len_drops_partial_batch() {
        let layout = DatasetLayout {
            fall_count: 30,
            adl_count: 40,
        };
        let catalog = EventCatalog::from_layout("/no/existe", &layout);
        let loader = FallDetectionLoader::new("/no/existe", &catalog, LoaderConfig::default()).unwrap();
        assert_eq!(loader.len(), 4); // 70 / 16
    }

    #[test]
    fn test_invalid_config_rejected() {
        let catalog = EventCatalog::default();
        let config = LoaderConfig {
            n_frames: 0,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            FallDetectionLoader::new("/tmp", &catalog, config),
            Err(LoaderError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_batch() {
        let catalog = EventCatalog::default();
        let loader = FallDetectionLoader::new("/tmp", &catalog, LoaderConfig::default()).unwrap();
        assert!(loader.is_empty());
        assert!(matches!(
            loader.batch(0),
            Err(LoaderError::IndexOutOfBounds { index: 0, len: 0 })
        ));
    }
}
