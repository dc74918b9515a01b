pub mod audits;
pub mod templates;
