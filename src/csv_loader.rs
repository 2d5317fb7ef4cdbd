use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{LoaderError, Result};
use crate::types::AccelSample;

/// Carga las muestras x/y/z desde el CSV del acelerómetro de un evento.
///
/// El archivo debe tener encabezado. Si al menos 3 columnas contienen "acc"
/// (sin distinguir mayúsculas) se usan las tres primeras de ellas como x/y/z;
/// si no, las tres primeras columnas por posición.
///
/// El tipo de cada columna se decide con la primera fila: si alguna de las
/// tres no es numérica el archivo es `ShapeMismatch`. Una celda corrupta en
/// filas posteriores es `UnreadableSource`.
pub fn load_accel_samples(path: impl AsRef<Path>) -> Result<Vec<AccelSample>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::MissingPath(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| LoaderError::unreadable(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| LoaderError::unreadable(path, e))?
        .clone();
    if headers.is_empty() {
        return Err(LoaderError::EmptySource(path.to_path_buf()));
    }

    let [cx, cy, cz] = resolve_accel_columns(&headers).ok_or(LoaderError::ShapeMismatch {
        path: path.to_path_buf(),
        expected: 3,
        actual: headers.len(),
    })?;

    let mut samples = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| LoaderError::unreadable(path, format!("fila {}: {}", row_idx + 1, e)))?;
        if row_idx == 0 {
            let numeric = count_numeric(&record, &[cx, cy, cz]);
            if numeric < 3 {
                return Err(LoaderError::ShapeMismatch {
                    path: path.to_path_buf(),
                    expected: 3,
                    actual: numeric,
                });
            }
        }
        let x = parse_cell(&record, cx, row_idx, path)?;
        let y = parse_cell(&record, cy, row_idx, path)?;
        let z = parse_cell(&record, cz, row_idx, path)?;
        samples.push(AccelSample::new(x, y, z));
    }

    if samples.is_empty() {
        return Err(LoaderError::EmptySource(path.to_path_buf()));
    }

    Ok(samples)
}

/// Índices de las columnas x/y/z según el encabezado, o `None` si hay menos de 3
pub fn resolve_accel_columns(headers: &StringRecord) -> Option<[usize; 3]> {
    let named: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| name.to_lowercase().contains("acc"))
        .map(|(idx, _)| idx)
        .collect();

    if named.len() >= 3 {
        Some([named[0], named[1], named[2]])
    } else if headers.len() >= 3 {
        Some([0, 1, 2])
    } else {
        None
    }
}

fn count_numeric(record: &StringRecord, columns: &[usize]) -> usize {
    columns
        .iter()
        .filter(|&&col| record.get(col).map_or(false, |cell| cell.parse::<f32>().is_ok()))
        .count()
}

fn parse_cell(record: &StringRecord, col: usize, row_idx: usize, path: &Path) -> Result<f32> {
    let cell = record.get(col).ok_or_else(|| {
        LoaderError::unreadable(path, format!("fila {} sin columna {}", row_idx + 1, col))
    })?;
    cell.parse::<f32>().map_err(|e| {
        LoaderError::unreadable(
            path,
            format!("valor {:?} inválido en fila {}: {}", cell, row_idx + 1, e),
        )
    })
}
