//! Muestreo de secuencias de frames RGB a un número fijo de imágenes.
//!
//! Los directorios `cam0/rgb` del dataset a veces traen una carpeta extra
//! (el nombre del zip) y archivos ocultos como `.DS_Store`; ambos casos se
//! resuelven antes de listar los frames.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ndarray::{s, Array3, Array4};

use crate::config::{ImageDim, LoaderConfig};
use crate::error::{LoaderError, Outcome, Result};
use crate::types::FRAME_EXTENSIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    n_frames: usize,
    target: ImageDim,
    channels: usize,
}

impl FrameSampler {
    pub fn new(n_frames: usize, target: ImageDim, channels: usize) -> Self {
        Self {
            n_frames,
            target,
            channels,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.n_frames, config.image_dim, config.channel_count)
    }

    /// Forma de una secuencia: (frames, alto, ancho, canales)
    pub fn sequence_shape(&self) -> (usize, usize, usize, usize) {
        (
            self.n_frames,
            self.target.height as usize,
            self.target.width as usize,
            self.channels,
        )
    }

    /// Devuelve exactamente `n_frames` frames normalizados a [0, 1].
    pub fn sample(&self, dir: impl AsRef<Path>) -> Result<Array4<f32>> {
        let files = list_frame_files(dir.as_ref())?;
        let indices = sample_indices(files.len(), self.n_frames);

        let mut sequence = Array4::<f32>::zeros(self.sequence_shape());
        let mut previous: Option<(usize, usize)> = None; // (índice de archivo, slot)

        for (slot, &file_idx) in indices.iter().enumerate() {
            // Con pocos frames los índices se repiten consecutivamente
            if let Some((prev_idx, prev_slot)) = previous {
                if prev_idx == file_idx {
                    let frame = sequence.slice(s![prev_slot, .., .., ..]).to_owned();
                    sequence.slice_mut(s![slot, .., .., ..]).assign(&frame);
                    continue;
                }
            }

            let frame = load_frame(&files[file_idx], self.target, self.channels)?;
            sequence.slice_mut(s![slot, .., .., ..]).assign(&frame);
            previous = Some((file_idx, slot));
        }

        Ok(sequence)
    }

    /// Igual que [`FrameSampler::sample`] pero con los fallos recuperables
    /// como `Outcome::Degraded`.
    pub fn sample_outcome(&self, dir: impl AsRef<Path>) -> Result<Outcome<Array4<f32>>> {
        let outcome = Outcome::from_result(self.sample(dir))?;
        if let Outcome::Degraded { path, reason } = &outcome {
            log::warn!("Frames de {:?} no disponibles: {}", path, reason);
        }
        Ok(outcome)
    }
}

/// Si tras ignorar entradas ocultas solo queda un directorio, entra en él (una vez)
pub fn resolve_frame_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(LoaderError::MissingPath(dir.to_path_buf()));
    }

    let entries = visible_entries(dir)?;
    if let [only] = entries.as_slice() {
        if only.is_dir() {
            return Ok(only.clone());
        }
    }
    Ok(dir.to_path_buf())
}

/// Frames png/jpg/jpeg del directorio resuelto, ordenados por ruta
pub fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let resolved = resolve_frame_dir(dir)?;

    let mut files: Vec<PathBuf> = visible_entries(&resolved)?
        .into_iter()
        .filter(|path| path.is_file() && has_frame_extension(path))
        .collect();
    files.sort();

    if files.is_empty() {
        log::debug!("Sin frames en {:?}", resolved);
        return Err(LoaderError::EmptySource(resolved));
    }
    Ok(files)
}

/// `n` índices equiespaciados en [0, total-1], incluyendo ambos extremos y
/// truncados a entero. Hay repeticiones cuando `total < n`.
pub fn sample_indices(total: usize, n: usize) -> Vec<usize> {
    if total == 0 || n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }
    (0..n).map(|i| i * (total - 1) / (n - 1)).collect()
}

/// Decodifica un frame, lo redimensiona sin conservar aspecto y lo escala a [0, 1].
/// Forma de salida: (alto, ancho, canales), canales en orden RGB(A).
pub fn load_frame(path: &Path, target: ImageDim, channels: usize) -> Result<Array3<f32>> {
    let img = image::open(path).map_err(|e| LoaderError::unreadable(path, e))?;
    let resized = img.resize_exact(target.width, target.height, FilterType::Triangle);

    let raw = match channels {
        1 => resized.to_luma8().into_raw(),
        3 => resized.to_rgb8().into_raw(),
        4 => resized.to_rgba8().into_raw(),
        other => {
            return Err(LoaderError::ShapeMismatch {
                path: path.to_path_buf(),
                expected: 3,
                actual: other,
            })
        }
    };

    let shape = (target.height as usize, target.width as usize, channels);
    let actual = raw.len();
    let data: Vec<f32> = raw.into_iter().map(|v| f32::from(v) / 255.0).collect();
    Array3::from_shape_vec(shape, data).map_err(|_| LoaderError::ShapeMismatch {
        path: path.to_path_buf(),
        expected: shape.0 * shape.1 * shape.2,
        actual,
    })
}

fn visible_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = fs::read_dir(dir).map_err(|e| LoaderError::unreadable(dir, e))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| LoaderError::unreadable(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    Ok(entries)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_frames(dir: &Path, count: usize) {
        fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            // El canal rojo codifica el número de frame
            let img = RgbImage::from_pixel(8, 6, Rgb([i as u8, 0, 255]));
            img.save(dir.join(format!("frame-{:03}.png", i))).unwrap();
        }
    }

    fn sampler(n_frames: usize) -> FrameSampler {
        FrameSampler::new(n_frames, ImageDim::new(4, 3), 3)
    }

    #[test]
    fn test_sample_indices_inclusive() {
        assert_eq!(sample_indices(5, 3), vec![0, 2, 4]);
        assert_eq!(sample_indices(100, 2), vec![0, 99]);
        assert_eq!(sample_indices(1, 4), vec![0, 0, 0, 0]);
        assert_eq!(sample_indices(10, 1), vec![0]);
        assert!(sample_indices(0, 32).is_empty());

        let indices = sample_indices(100, 32);
        assert_eq!(indices.len(), 32);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[31], 99);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_always_returns_n_frames() {
        for &count in &[1usize, 5, 32, 100] {
            let dir = tempdir().unwrap();
            write_frames(dir.path(), count);
            let sequence = sampler(32).sample(dir.path()).unwrap();
            assert_eq!(sequence.shape(), &[32, 3, 4, 3], "origen con {} frames", count);
        }
    }

    #[test]
    fn test_frames_are_normalized_and_ordered() {
        let dir = tempdir().unwrap();
        write_frames(dir.path(), 5);
        let sequence = sampler(3).sample(dir.path()).unwrap();

        // Índices 0, 2, 4 -> rojo 0, 2, 4
        assert_eq!(sequence[[0, 0, 0, 0]], 0.0);
        assert_eq!(sequence[[1, 1, 1, 0]], 2.0 / 255.0);
        assert_eq!(sequence[[2, 2, 3, 0]], 4.0 / 255.0);
        assert_eq!(sequence[[1, 0, 0, 2]], 1.0);
        assert!(sequence.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_repeated_frames_when_source_is_short() {
        let dir = tempdir().unwrap();
        write_frames(dir.path(), 1);
        let sequence = sampler(4).sample(dir.path()).unwrap();
        for slot in 0..4 {
            assert_eq!(sequence[[slot, 0, 0, 2]], 1.0);
        }
    }

    #[test]
    fn test_descends_into_single_nested_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("fall-01-cam0-rgb");
        write_frames(&nested, 5);
        fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        fs::write(nested.join(".hidden.png"), b"no es una imagen").unwrap();

        assert_eq!(resolve_frame_dir(dir.path()).unwrap(), nested);
        assert_eq!(list_frame_files(dir.path()).unwrap().len(), 5);
        assert_eq!(sampler(8).sample(dir.path()).unwrap().shape()[0], 8);
    }

    #[test]
    fn test_descends_only_once() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("a").join("b");
        write_frames(&inner, 3);

        assert!(matches!(
            list_frame_files(dir.path()),
            Err(LoaderError::EmptySource(_))
        ));
    }

    #[test]
    fn test_ignores_non_frame_files() {
        let dir = tempdir().unwrap();
        write_frames(dir.path(), 2);
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("frame-999.JPG.bak"), b"x").unwrap();
        assert_eq!(list_frame_files(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_dir_degrades() {
        let outcome = sampler(32).sample_outcome("/no/existe/cam0/rgb").unwrap();
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_empty_dir_degrades() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        let outcome = sampler(32).sample_outcome(dir.path()).unwrap();
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_corrupt_frame_is_unreadable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("frame-000.png"), b"no es png").unwrap();
        assert!(matches!(
            sampler(2).sample(dir.path()),
            Err(LoaderError::UnreadableSource { .. })
        ));
    }

    #[test]
    fn test_grayscale_channel() {
        let dir = tempdir().unwrap();
        write_frames(dir.path(), 2);
        let sequence = FrameSampler::new(2, ImageDim::new(5, 2), 1)
            .sample(dir.path())
            .unwrap();
        assert_eq!(sequence.shape(), &[2, 2, 5, 1]);
    }
}
