//! PNG QR code generator.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use qrcode::QrCode;
use tracing::debug;

use tablehub_core::error::AppError;
use tablehub_core::result::AppResult;
use tablehub_core::traits::QrCodeGenerator;

/// Writes booking check-in codes as PNG files under a configured
/// directory and hands back the public URL path they are served from.
#[derive(Debug, Clone)]
pub struct PngQrGenerator {
    output_dir: PathBuf,
    public_prefix: String,
}

impl PngQrGenerator {
    /// Creates a generator writing into `output_dir`, returning paths
    /// under `public_prefix`.
    pub fn new(output_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

#[async_trait]
impl QrCodeGenerator for PngQrGenerator {
    async fn generate(
        &self,
        booking_reference: &str,
        guest_name: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<String> {
        let content = format!(
            "BOOKING:{booking_reference}|{guest_name}|{date}|{}",
            time.format("%H:%M")
        );

        let code = QrCode::new(content.as_bytes())
            .map_err(|e| AppError::unexpected(format!("QR encoding failed: {e}")))?;
        let rendered = code.render::<image::Luma<u8>>().build();

        std::fs::create_dir_all(&self.output_dir)?;
        let file_name = format!("qr_{booking_reference}.png");
        let path = self.output_dir.join(&file_name);
        rendered
            .save(&path)
            .map_err(|e| AppError::unexpected(format!("Failed to write QR image: {e}")))?;

        debug!(path = %path.display(), "QR code written");
        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_writes_png_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let generator = PngQrGenerator::new(dir.path(), "/uploads/qrcodes");

        let url = generator
            .generate(
                "BR250601190000ABCDEF",
                "Alex Chen",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(url, "/uploads/qrcodes/qr_BR250601190000ABCDEF.png");
        assert!(dir.path().join("qr_BR250601190000ABCDEF.png").exists());
    }
}
