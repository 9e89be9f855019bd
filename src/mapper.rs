//! Azure → terraform identifier mapping.

use crate::models::{
    OwnerTag, NIC_TYPE, NSG_TYPE, PUBLIC_IP_TYPE, RESOURCE_GROUP_TYPE, SUBNET_TYPE, VM_TYPE,
    VNET_TYPE,
};

const TYPE_MAP: [(&str, &str); 7] = [
    (VNET_TYPE, "azurerm_virtual_network"),
    (PUBLIC_IP_TYPE, "azurerm_public_ip"),
    (NSG_TYPE, "azurerm_network_security_group"),
    (NIC_TYPE, "azurerm_network_interface"),
    (SUBNET_TYPE, "azurerm_subnet"),
    (VM_TYPE, "azurerm_linux_virtual_machine"),
    (RESOURCE_GROUP_TYPE, "azurerm_resource_group"),
];

/// Name suffix (after `<owner>-biteswipe-`) → local name in the `.tf` files.
const NAME_MAP: [(&str, &str); 6] = [
    ("network", "vnet"),
    ("public-ip", "public_ip"),
    ("nsg", "nsg"),
    ("nic", "nic"),
    ("internal", "subnet"),
    ("resources", "rg"),
];

/// Terraform resource type for an Azure type, `None` if the type is not managed here.
pub fn map_type(azure_type: &str) -> Option<&'static str> {
    TYPE_MAP
        .iter()
        .find(|(azure, _)| *azure == azure_type)
        .map(|(_, tf)| *tf)
}

/// Terraform local name for an Azure resource name.
///
/// Strips the `<owner>-biteswipe-` prefix, then looks the rest up in the
/// name table. Unknown suffixes are returned as is.
pub fn map_name(resource_name: &str, owner: &OwnerTag) -> String {
    let prefix = owner.prefix();
    let suffix = resource_name.strip_prefix(&prefix).unwrap_or(resource_name);
    NAME_MAP
        .iter()
        .find(|(azure, _)| *azure == suffix)
        .map_or_else(|| suffix.to_string(), |(_, tf)| tf.to_string())
}

/// `<type>.<name>` address used by `terraform import`.
pub fn terraform_address(
    azure_type: &str,
    resource_name: &str,
    owner: &OwnerTag,
) -> Option<String> {
    map_type(azure_type).map(|tf_type| format!("{tf_type}.{}", map_name(resource_name, owner)))
}
