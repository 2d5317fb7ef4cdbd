//! Errores del cargador y resultado etiquetado por modalidad.
//!
//! `MissingPath`, `UnreadableSource` y `EmptySource` a nivel de un evento y una
//! modalidad se degradan (ver [`Outcome`]); `ShapeMismatch` siempre aborta.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Ruta inexistente: {0:?}")]
    MissingPath(PathBuf),

    #[error("Fuente ilegible {path:?}: {reason}")]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("Fuente vacía: {0:?}")]
    EmptySource(PathBuf),

    #[error("Forma incompatible en {path:?}: se esperaban {expected}, hay {actual}")]
    ShapeMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Evento sin etiqueta: {0}")]
    UnknownEvent(String),

    #[error("Batch {index} fuera de rango (hay {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Configuración inválida: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, LoaderError>;

impl LoaderError {
    pub(crate) fn unreadable(path: &Path, reason: impl ToString) -> Self {
        LoaderError::UnreadableSource {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Motivo por el que la modalidad de un evento se degradó
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    #[error("ruta inexistente")]
    MissingPath,

    #[error("fuente ilegible: {0}")]
    UnreadableSource(String),

    #[error("sin filas ni frames utilizables")]
    EmptySource,
}

/// Resultado de procesar una modalidad de un evento
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { path: PathBuf, reason: DegradeReason },
}

impl<T> Outcome<T> {
    /// Convierte los errores recuperables en `Degraded`; el resto se propaga.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Outcome::Ok(value)),
            Err(LoaderError::MissingPath(path)) => Ok(Outcome::Degraded {
                path,
                reason: DegradeReason::MissingPath,
            }),
            Err(LoaderError::UnreadableSource { path, reason }) => Ok(Outcome::Degraded {
                path,
                reason: DegradeReason::UnreadableSource(reason),
            }),
            Err(LoaderError::EmptySource(path)) => Ok(Outcome::Degraded {
                path,
                reason: DegradeReason::EmptySource,
            }),
            Err(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded { path, reason } => Outcome::Degraded { path, reason },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Degraded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors_degrade() {
        let missing: Outcome<()> =
            Outcome::from_result(Err(LoaderError::MissingPath("a".into()))).unwrap();
        assert!(missing.is_degraded());

        let empty: Outcome<()> =
            Outcome::from_result(Err(LoaderError::EmptySource("b".into()))).unwrap();
        match empty {
            Outcome::Degraded { path, reason } => {
                assert_eq!(path, PathBuf::from("b"));
                assert_eq!(reason, DegradeReason::EmptySource);
            }
            Outcome::Ok(_) => panic!("debía degradarse"),
        }
    }

    #[test]
    fn test_shape_mismatch_propagates() {
        let result: Result<Outcome<()>> = Outcome::from_result(Err(LoaderError::ShapeMismatch {
            path: "c.csv".into(),
            expected: 3,
            actual: 2,
        }));
        assert!(matches!(result, Err(LoaderError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_map_keeps_degradation() {
        let outcome: Outcome<u32> = Outcome::Degraded {
            path: "d".into(),
            reason: DegradeReason::MissingPath,
        };
        assert!(outcome.map(|v| v + 1).is_degraded());
        assert_eq!(Outcome::Ok(2).map(|v: u32| v * 2).ok(), Some(4));
    }
}
