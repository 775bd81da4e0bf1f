pub mod prescription;
pub mod report;

pub use prescription::{PrescriptionFlow, render_prescription};
pub use report::{ReportFlow, render_report};
