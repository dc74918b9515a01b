pub mod image;
pub mod instance;
pub mod snapshot;
pub mod template;
