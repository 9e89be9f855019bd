//! Azure resource record as returned by `az resource list`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One resource of the deployment's resource group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AzureResource {
    /// Resource name, e.g. `acme-biteswipe-nic`.
    pub name: String,
    /// Azure type, e.g. `Microsoft.Network/networkInterfaces`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Full ARM id.
    pub id: String,
}

impl fmt::Display for AzureResource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}
