//! Domain models for the deployment topology.
//!
//! - [`AzureResource`] - a `(name, type, id)` record from `az resource list`
//! - [`OwnerTag`] - naming prefix, derives every resource name and the deletion plan

mod owner;
mod resource;

pub use owner::{
    OwnerTag, NIC_TYPE, NSG_TYPE, PUBLIC_IP_TYPE, RESOURCE_GROUP_TYPE, SUBNET_TYPE, VM_TYPE,
    VNET_TYPE,
};
pub use resource::AzureResource;
