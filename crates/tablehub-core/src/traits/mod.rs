//! Collaborator traits consumed by the service layer.
//!
//! Traits defined here use only primitive and `chrono`/`rust_decimal`
//! types so that `tablehub-core` stays free of internal dependencies.
//! Implementations live in `tablehub-service`.

pub mod payment;
pub mod qrcode;

pub use payment::{PaymentGateway, PaymentIntent};
pub use qrcode::QrCodeGenerator;
