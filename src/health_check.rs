//! Verificación de estructura y completitud del dataset procesado.
//!
//! El cargador no depende de este resultado (degrada los eventos incompletos),
//! pero conviene correrlo antes de entrenar para detectar problemas de forma.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::DatasetLayout;
use crate::dataset::Category;
use crate::error::{LoaderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    /// Falta la carpeta completa del evento; no se revisa su contenido
    EventDir,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingItem {
    pub event_id: String,
    pub kind: MissingKind,
    pub path: PathBuf,
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MissingKind::EventDir => write!(f, "Falta la carpeta del evento: {}", self.path.display()),
            MissingKind::Item => write!(f, "Falta: {}", self.path.display()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    pub events_checked: usize,
    pub missing: Vec<MissingItem>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Elementos que debe contener la carpeta de un evento. Los que terminan en
/// `/` son directorios. Las caídas tienen además una segunda cámara.
pub fn expected_items(category: Category, event: &str) -> Vec<String> {
    let mut items = vec![
        format!("{}-data.csv", event),
        format!("{}-cam0.mp4", event),
        format!("acc/{}-acc.csv", event),
        "cam0/rgb/".to_string(),
        "cam0/depth/".to_string(),
    ];
    if category == Category::Falls {
        items.extend([
            format!("{}-cam1.mp4", event),
            "cam1/rgb/".to_string(),
            "cam1/depth/".to_string(),
        ]);
    }
    items
}

pub fn check_data_health(root: impl AsRef<Path>, layout: &DatasetLayout) -> Result<HealthReport> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(LoaderError::MissingPath(root.to_path_buf()));
    }

    let mut report = HealthReport::default();

    for category in Category::ALL {
        info!("Revisando '{}'", category.dir_name().to_uppercase());

        for number in 1..=category.event_count(layout) {
            let event = category.event_name(number);
            let event_dir = root.join(category.dir_name()).join(&event);
            report.events_checked += 1;

            if !event_dir.is_dir() {
                report.missing.push(MissingItem {
                    event_id: event,
                    kind: MissingKind::EventDir,
                    path: event_dir,
                });
                continue;
            }

            for item in expected_items(category, &event) {
                let path = event_dir.join(item.trim_end_matches('/'));
                let present = if item.ends_with('/') {
                    path.is_dir()
                } else {
                    path.is_file()
                };
                if !present {
                    report.missing.push(MissingItem {
                        event_id: event.clone(),
                        kind: MissingKind::Item,
                        path,
                    });
                }
            }
        }
    }

    if report.is_healthy() {
        info!("Dataset completo: {} eventos revisados", report.events_checked);
    } else {
        warn!(
            "{} elementos faltantes en {} eventos revisados",
            report.missing.len(),
            report.events_checked
        );
    }

    Ok(report)
}
