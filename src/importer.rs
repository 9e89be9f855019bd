//! Import of already existing Azure resources into terraform state.
//!
//! Every import is best effort. The outcome of each one is collected in an
//! [`ImportReport`] instead of aborting the run.

use crate::azure;
use crate::cmd::CommandRunner;
use crate::mapper::terraform_address;
use crate::models::OwnerTag;
use crate::terraform::Terraform;
use colored::Colorize;
use itertools::Itertools;

/// Address of the NIC ↔ NSG association in the `.tf` files.
pub const ASSOCIATION_ADDRESS: &str =
    "azurerm_network_interface_security_group_association.nic_nsg_association";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    Imported,
    Failed(String),
    /// Azure type has no terraform mapping.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Azure resource name, or the association address.
    pub name: String,
    /// Terraform address, `None` when skipped.
    pub address: Option<String>,
    pub status: ImportStatus,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub fn imported(&self) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ImportStatus::Imported)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ImportStatus::Failed(_)))
    }
}

/// Import every mapped resource of the owner's group, then the NIC/NSG association.
///
/// # Arguments
/// * `subscription_id` - used to build the association's resource ids
pub fn import_existing_resources<R: CommandRunner>(
    runner: &R,
    terraform: &Terraform<R>,
    owner: &OwnerTag,
    subscription_id: &str,
) -> ImportReport {
    log::info!(
        "Searching for existing resources with prefix '{}'...",
        owner.vm().cyan()
    );
    let mut report = ImportReport::default();

    for resource in azure::list_resources(runner, owner) {
        let Some(address) = terraform_address(&resource.resource_type, &resource.name, owner)
        else {
            log::debug!("No terraform mapping for {resource}, skipping");
            report.outcomes.push(ImportOutcome {
                name: resource.name,
                address: None,
                status: ImportStatus::Skipped,
            });
            continue;
        };

        log::info!("Importing {} as {address}...", resource.name);
        let status = match terraform.import(&address, &resource.id) {
            Ok(()) => {
                log::info!("Successfully imported {address}");
                ImportStatus::Imported
            }
            Err(e) => {
                log::warn!("{} Failed to import {address}: {e}", "Warning:".yellow());
                ImportStatus::Failed(e.to_string())
            }
        };
        report.outcomes.push(ImportOutcome {
            name: resource.name,
            address: Some(address),
            status,
        });
    }

    report
        .outcomes
        .push(import_association(terraform, owner, subscription_id));

    let failed = report.failed().map(|o| o.name.as_str()).join(", ");
    if failed.is_empty() {
        log::info!("Imported {} resources", report.imported().count());
    } else {
        log::warn!(
            "Imported {} resources, failed: {failed}",
            report.imported().count()
        );
    }
    report
}

/// Association id is `<nic id>|<nsg id>`.
pub fn association_id(owner: &OwnerTag, subscription_id: &str) -> String {
    let nic_id = owner.network_resource_id(subscription_id, "networkInterfaces", &owner.nic());
    let nsg_id = owner.network_resource_id(subscription_id, "networkSecurityGroups", &owner.nsg());
    format!("{nic_id}|{nsg_id}")
}

fn import_association<R: CommandRunner>(
    terraform: &Terraform<R>,
    owner: &OwnerTag,
    subscription_id: &str,
) -> ImportOutcome {
    let id = association_id(owner, subscription_id);
    let status = match terraform.import(ASSOCIATION_ADDRESS, &id) {
        Ok(()) => {
            log::info!("Successfully imported network interface association");
            ImportStatus::Imported
        }
        Err(e) => {
            log::warn!(
                "{} Failed to import network interface association",
                "Warning:".yellow()
            );
            ImportStatus::Failed(e.to_string())
        }
    };
    ImportOutcome {
        name: ASSOCIATION_ADDRESS.to_string(),
        address: Some(ASSOCIATION_ADDRESS.to_string()),
        status,
    }
}
