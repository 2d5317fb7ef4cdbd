use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{LoaderError, Result};

/// Permutación de eventos por época, partida en batches de tamaño fijo.
///
/// El estado del barajado pertenece a cada instancia; dos entrenamientos en
/// el mismo proceso no se afectan entre sí.
#[derive(Debug, Clone)]
pub struct EpochScheduler {
    event_ids: Vec<String>,
    indexes: Vec<usize>,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
}

impl EpochScheduler {
    /// # Panics
    ///
    /// Si `batch_size` es 0.
    pub fn new(event_ids: Vec<String>, batch_size: usize, shuffle: bool) -> Self {
        Self::with_rng(event_ids, batch_size, shuffle, StdRng::from_entropy())
    }

    /// Variante reproducible: misma semilla, mismas permutaciones
    pub fn with_seed(event_ids: Vec<String>, batch_size: usize, shuffle: bool, seed: u64) -> Self {
        Self::with_rng(event_ids, batch_size, shuffle, StdRng::seed_from_u64(seed))
    }

    fn with_rng(event_ids: Vec<String>, batch_size: usize, shuffle: bool, rng: StdRng) -> Self {
        assert!(batch_size > 0, "batch_size debe ser > 0");
        let indexes = (0..event_ids.len()).collect();
        Self {
            event_ids,
            indexes,
            batch_size,
            shuffle,
            rng,
        }
    }

    /// Batches completos por época; el batch parcial final se descarta
    pub fn batch_count(&self) -> usize {
        self.event_ids.len() / self.batch_size
    }

    /// Identificadores del batch `index` según la permutación actual
    pub fn get_batch(&self, index: usize) -> Result<Vec<&str>> {
        let len = self.batch_count();
        if index >= len {
            return Err(LoaderError::IndexOutOfBounds { index, len });
        }
        let start = index * self.batch_size;
        Ok(self.indexes[start..start + self.batch_size]
            .iter()
            .map(|&k| self.event_ids[k].as_str())
            .collect())
    }

    /// Llamar al comienzo de cada época (incluida la primera)
    pub fn on_epoch_boundary(&mut self) {
        if self.shuffle {
            self.indexes.shuffle(&mut self.rng);
            log::debug!("Nueva permutación de {} eventos", self.indexes.len());
        }
    }

    pub fn permutation(&self) -> &[usize] {
        &self.indexes
    }
}
