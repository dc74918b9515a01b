//! Audit logic over the model: derive, capture, score, save, export.

pub mod capture;
pub mod derive;
pub mod export;
pub mod score;
pub mod session;
pub mod template_save;

#[cfg(test)]
pub(crate) mod fixtures;
