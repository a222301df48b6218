//! The four build steps, in pipeline order.

pub mod cli_bundle;
pub mod library_bundle;
pub mod package_entry;
pub mod type_declarations;
