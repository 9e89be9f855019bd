//! Owner tag and the resource names derived from it.

use crate::config::PROJECT;
use std::fmt;

pub const VM_TYPE: &str = "Microsoft.Compute/virtualMachines";
pub const NIC_TYPE: &str = "Microsoft.Network/networkInterfaces";
pub const SUBNET_TYPE: &str = "Microsoft.Network/virtualNetworks/subnets";
pub const PUBLIC_IP_TYPE: &str = "Microsoft.Network/publicIPAddresses";
pub const NSG_TYPE: &str = "Microsoft.Network/networkSecurityGroups";
pub const VNET_TYPE: &str = "Microsoft.Network/virtualNetworks";
pub const RESOURCE_GROUP_TYPE: &str = "Microsoft.Resources/resourceGroups";

/// Naming prefix of one deployment. Every Azure resource name is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerTag(String);

impl OwnerTag {
    pub fn new(tag: impl Into<String>) -> Self {
        OwnerTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<owner>-biteswipe-`, stripped from resource names before mapping.
    pub fn prefix(&self) -> String {
        format!("{}-{PROJECT}-", self.0)
    }

    pub fn resource_group(&self) -> String {
        format!("{}resources", self.prefix())
    }

    pub fn vm(&self) -> String {
        format!("{}-{PROJECT}", self.0)
    }

    pub fn nic(&self) -> String {
        format!("{}nic", self.prefix())
    }

    pub fn nsg(&self) -> String {
        format!("{}nsg", self.prefix())
    }

    pub fn public_ip(&self) -> String {
        format!("{}public-ip", self.prefix())
    }

    pub fn vnet(&self) -> String {
        format!("{}network", self.prefix())
    }

    /// The subnet is deployed without the project infix.
    pub fn subnet(&self) -> String {
        format!("{}-internal", self.0)
    }

    /// ARM id of a network resource in this deployment's resource group.
    pub fn network_resource_id(&self, subscription_id: &str, kind: &str, name: &str) -> String {
        format!(
            "/subscriptions/{subscription_id}/resourceGroups/{rg}/providers/Microsoft.Network/{kind}/{name}",
            rg = self.resource_group()
        )
    }

    /// Resources to delete, in dependency order: VM, NIC, subnet, public IP, NSG, VNet.
    pub fn deletion_plan(&self) -> Vec<(&'static str, String)> {
        vec![
            (VM_TYPE, self.vm()),
            (NIC_TYPE, self.nic()),
            (SUBNET_TYPE, self.subnet()),
            (PUBLIC_IP_TYPE, self.public_ip()),
            (NSG_TYPE, self.nsg()),
            (VNET_TYPE, self.vnet()),
        ]
    }
}

impl fmt::Display for OwnerTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
