//! Domínio do inventário e alertas de frota (IAF)

pub mod tipo;
pub mod upload;
pub mod warranty;

pub use tipo::TipoAtivo;
pub use upload::NovoUploadIaf;
pub use warranty::{ALERT_WINDOW_DAYS, StatusGarantia, days_until};
