//! Azure CLI interaction.
//!
//! - [`resources`] - listing and deleting resources of the deployment's resource group

mod resources;

pub use resources::{delete_group, delete_resource, delete_vm, list_resources};
