pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use errors::LoadError;
pub use load::load_project;
pub use metadata::ProjectMetadata;
pub use save::{FORMAT_ID, FORMAT_VERSION, save_project};
