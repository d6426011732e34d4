pub mod contact;
pub mod element;
pub mod error;
pub mod factory;
pub mod id;
pub mod interface;
pub mod records;

pub use contact::ContactTolerances;
pub use element::{Element, names};
pub use error::ElementError;
pub use id::ElementId;
pub use interface::{Interface, InterfaceForce};
pub use records::{SideRecord, SideRecords};
