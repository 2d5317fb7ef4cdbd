//! Convención de carpetas del dataset procesado:
//!
//! ```text
//! <root>/
//!   falls/fall-01/acc/fall-01-acc.csv
//!   falls/fall-01/cam0/rgb/*.png
//!   adls/adl-01/...
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::DatasetLayout;

/// Etiqueta de cada evento: `true` = caída
pub type LabelMap = HashMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Falls,
    Adls,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Falls, Category::Adls];

    pub fn from_label(is_fall: bool) -> Self {
        if is_fall {
            Category::Falls
        } else {
            Category::Adls
        }
    }

    pub fn is_fall(self) -> bool {
        self == Category::Falls
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Falls => "falls",
            Category::Adls => "adls",
        }
    }

    pub fn event_prefix(self) -> &'static str {
        match self {
            Category::Falls => "fall",
            Category::Adls => "adl",
        }
    }

    pub fn event_count(self, layout: &DatasetLayout) -> usize {
        match self {
            Category::Falls => layout.fall_count,
            Category::Adls => layout.adl_count,
        }
    }

    /// `fall-07`, `adl-12`, ...
    pub fn event_name(self, number: usize) -> String {
        format!("{}-{:02}", self.event_prefix(), number)
    }
}

/// Un evento etiquetado con las rutas de sus dos modalidades
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub label: bool,
    pub dir: PathBuf,
    pub accel_path: PathBuf,
    pub frame_dir: PathBuf,
}

impl Event {
    pub fn resolve(root: &Path, id: &str, label: bool) -> Self {
        let dir = root.join(Category::from_label(label).dir_name()).join(id);
        let accel_path = dir.join("acc").join(format!("{}-acc.csv", id));
        let frame_dir = dir.join("cam0").join("rgb");
        Self {
            id: id.to_string(),
            label,
            dir,
            accel_path,
            frame_dir,
        }
    }

    pub fn category(&self) -> Category {
        Category::from_label(self.label)
    }
}

/// Lista de eventos del dataset en orden de inserción (caídas, luego ADLs)
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn from_layout(root: impl AsRef<Path>, layout: &DatasetLayout) -> Self {
        let root = root.as_ref();
        let mut events = Vec::with_capacity(layout.fall_count + layout.adl_count);
        for category in Category::ALL {
            for number in 1..=category.event_count(layout) {
                let id = category.event_name(number);
                events.push(Event::resolve(root, &id, category.is_fall()));
            }
        }
        log::info!(
            "Catálogo: {} caídas, {} ADLs en {:?}",
            layout.fall_count,
            layout.adl_count,
            root
        );
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event_ids(&self) -> Vec<String> {
        self.events.iter().map(|e| e.id.clone()).collect()
    }

    pub fn label_map(&self) -> LabelMap {
        self.events
            .iter()
            .map(|e| (e.id.clone(), e.label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_paths() {
        let event = Event::resolve(Path::new("/data"), "fall-07", true);
        assert_eq!(event.dir, PathBuf::from("/data/falls/fall-07"));
        assert_eq!(
            event.accel_path,
            PathBuf::from("/data/falls/fall-07/acc/fall-07-acc.csv")
        );
        assert_eq!(event.frame_dir, PathBuf::from("/data/falls/fall-07/cam0/rgb"));

        let adl = Event::resolve(Path::new("/data"), "adl-03", false);
        assert_eq!(adl.category(), Category::Adls);
        assert_eq!(adl.frame_dir, PathBuf::from("/data/adls/adl-03/cam0/rgb"));
    }

    #[test]
    fn test_catalog_from_default_layout() {
        let catalog = EventCatalog::from_layout("/data", &DatasetLayout::default());
        assert_eq!(catalog.len(), 70);

        let ids = catalog.event_ids();
        assert_eq!(ids[0], "fall-01");
        assert_eq!(ids[29], "fall-30");
        assert_eq!(ids[30], "adl-01");
        assert_eq!(ids[69], "adl-40");

        let labels = catalog.label_map();
        assert_eq!(labels["fall-15"], true);
        assert_eq!(labels["adl-15"], false);
    }

    #[test]
    fn test_catalog_custom_counts() {
        let layout = DatasetLayout {
            fall_count: 2,
            adl_count: 0,
        };
        let catalog = EventCatalog::from_layout("/data", &layout);
        assert_eq!(catalog.event_ids(), vec!["fall-01", "fall-02"]);
    }
}
