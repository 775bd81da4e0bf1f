pub mod cli;
pub mod config;
pub mod flows;
pub mod models;
pub mod render;

pub use config::{ClientConfig, ConfigError};
pub use flows::{PrescriptionFlow, ReportFlow, render_prescription, render_report};
pub use models::*;
