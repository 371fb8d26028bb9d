//! Check-in QR code artifacts.

mod png;

pub use png::PngQrGenerator;
