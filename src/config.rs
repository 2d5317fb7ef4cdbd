//! Configuración del cargador (fija en construcción, no mutable en ejecución).
//!
//! Se puede leer desde JSON; los campos ausentes toman los valores por defecto.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DEFAULT_STEP, DEFAULT_WINDOW_SIZE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo leer {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Valor inválido en `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Tamaño destino de los frames: (ancho, alto)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDim {
    pub width: u32,
    pub height: u32,
}

impl ImageDim {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ImageDim {
    fn default() -> Self {
        Self::new(128, 128)
    }
}

/// Número de eventos por categoría en el árbol del dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    /// Eventos `fall-01` .. `fall-NN` (default: 30)
    pub fall_count: usize,
    /// Eventos `adl-01` .. `adl-NN` (default: 40)
    pub adl_count: usize,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            fall_count: 30,
            adl_count: 40,
        }
    }
}

/// Parámetros del cargador de batches
///
/// Los frames se entregan en el orden de canales nativo del decodificador de
/// `image`: RGB para `channel_count = 3`, RGBA para 4 y luminancia para 1.
/// El modelo debe esperar ese mismo orden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Eventos por batch (default: 16)
    pub batch_size: usize,
    /// Tamaño al que se redimensiona cada frame (default: 128x128)
    pub image_dim: ImageDim,
    /// Canales por píxel: 1, 3 o 4 (default: 3)
    pub channel_count: usize,
    /// Frames muestreados por evento (default: 32)
    pub n_frames: usize,
    /// Muestras por ventana del acelerómetro (default: 128)
    pub accel_window_size: usize,
    /// Desplazamiento entre ventanas (default: 64)
    pub accel_step: usize,
    /// Barajar el orden de eventos en cada época (default: true)
    pub shuffle: bool,
    /// Semilla del barajado; `None` usa entropía del sistema
    pub seed: Option<u64>,
    pub layout: DatasetLayout,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            image_dim: ImageDim::default(),
            channel_count: 3,
            n_frames: 32,
            accel_window_size: DEFAULT_WINDOW_SIZE,
            accel_step: DEFAULT_STEP,
            shuffle: true,
            seed: None,
            layout: DatasetLayout::default(),
        }
    }
}

impl LoaderConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LoaderConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::invalid_value("batch_size", "debe ser > 0"));
        }
        if self.image_dim.width == 0 || self.image_dim.height == 0 {
            return Err(ConfigError::invalid_value(
                "image_dim",
                format!(
                    "dimensiones nulas {}x{}",
                    self.image_dim.width, self.image_dim.height
                ),
            ));
        }
        if !matches!(self.channel_count, 1 | 3 | 4) {
            return Err(ConfigError::invalid_value(
                "channel_count",
                format!("{} no soportado (1, 3 o 4)", self.channel_count),
            ));
        }
        if self.n_frames == 0 {
            return Err(ConfigError::invalid_value("n_frames", "debe ser > 0"));
        }
        if self.accel_window_size == 0 {
            return Err(ConfigError::invalid_value("accel_window_size", "debe ser > 0"));
        }
        if self.accel_step == 0 {
            return Err(ConfigError::invalid_value("accel_step", "debe ser > 0"));
        }
        Ok(())
    }

    /// Forma del tensor de imágenes de un batch: (batch, frames, alto, ancho, canales)
    pub fn image_batch_shape(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.batch_size,
            self.n_frames,
            self.image_dim.height as usize,
            self.image_dim.width as usize,
            self.channel_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_dataset() {
        let config = LoaderConfig::default();
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.image_dim, ImageDim::new(128, 128));
        assert_eq!(config.n_frames, 32);
        assert_eq!(config.accel_window_size, 128);
        assert_eq!(config.accel_step, 64);
        assert!(config.shuffle);
        assert_eq!(config.layout.fall_count, 30);
        assert_eq!(config.layout.adl_count, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let config = LoaderConfig {
            batch_size: 0,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "batch_size", .. })
        ));

        let config = LoaderConfig {
            accel_step: 0,
            ..LoaderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unsupported_channels() {
        let config = LoaderConfig {
            channel_count: 2,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "channel_count", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loader.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"batch_size": 4, "image_dim": {{"width": 64, "height": 48}}, "shuffle": false}}"#
        )
        .unwrap();

        let config = LoaderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.image_batch_shape(), (4, 32, 48, 64, 3));
        assert!(!config.shuffle);
        assert_eq!(config.accel_window_size, 128);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = LoaderConfig::from_json_file("/no/existe/loader.json");
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}
