//! Test harness for assembly models.
//!
//! Builds reference assemblies, checks model-wide consistency, and renders
//! diagnostic text a reader can scan when a scenario fails.
//!
//! # Key Components
//!
//! - [`fixtures`] - Arch voussoirs and cube grids
//! - [`oracle`] - Verification functions returning pass/fail verdicts
//! - [`report`] - Structured text model descriptions
//! - [`assertions`] - Assertions over edges and paths expressed as fixture indices
//! - [`helpers`] - Error type and identity/index conversions

pub mod assertions;
pub mod fixtures;
pub mod helpers;
pub mod oracle;
pub mod report;

pub use fixtures::{ArchParams, arch_blocks, cube_grid};
pub use helpers::HarnessError;
pub use oracle::{OracleVerdict, check_model_consistency};
pub use report::ModelReport;
