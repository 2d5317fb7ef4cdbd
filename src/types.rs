/// Una muestra del acelerómetro de 3 ejes (una fila del CSV `acc`)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Signal Magnitude Vector: sqrt(x² + y² + z²)
    pub fn smv(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Vector de características de una ventana, en el orden de [`FEATURE_NAMES`]
pub type WindowFeatures = [f32; NUM_ACCEL_FEATURES];

/// Constantes del sistema
pub const NUM_ACCEL_FEATURES: usize = 8; // media y desviación de x, y, z, smv
pub const FEATURE_NAMES: [&str; NUM_ACCEL_FEATURES] = [
    "x_mean", "y_mean", "z_mean", "smv_mean", "x_std", "y_std", "z_std", "smv_std",
];

/// Extensiones aceptadas para los frames RGB
pub const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub const DEFAULT_WINDOW_SIZE: usize = 128;
pub const DEFAULT_STEP: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smv_pythagorean() {
        let sample = AccelSample::new(3.0, 4.0, 12.0);
        assert_eq!(sample.smv(), 13.0);
    }

    #[test]
    fn test_feature_names_order() {
        assert_eq!(FEATURE_NAMES[0], "x_mean");
        assert_eq!(FEATURE_NAMES[3], "smv_mean");
        assert_eq!(FEATURE_NAMES[4], "x_std");
        assert_eq!(FEATURE_NAMES[7], "smv_std");
    }
}
