//! Booking policy defaults and artifact output settings.

use serde::{Deserialize, Serialize};

/// Booking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Default reservation duration in minutes when a request omits one.
    #[serde(default = "default_duration")]
    pub default_duration_minutes: i32,
    /// Prefix for generated booking references.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// Directory where QR code PNGs are written.
    #[serde(default = "default_qr_dir")]
    pub qr_output_dir: String,
    /// Public URL prefix under which QR code files are served.
    #[serde(default = "default_qr_prefix")]
    pub qr_public_prefix: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration(),
            reference_prefix: default_reference_prefix(),
            qr_output_dir: default_qr_dir(),
            qr_public_prefix: default_qr_prefix(),
        }
    }
}

fn default_duration() -> i32 {
    90
}

fn default_reference_prefix() -> String {
    "BR".to_string()
}

fn default_qr_dir() -> String {
    "data/qrcodes".to_string()
}

fn default_qr_prefix() -> String {
    "/uploads/qrcodes".to_string()
}
