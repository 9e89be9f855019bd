//! Azure CLI resource operations.
//!
//! Listing is best effort and never fails; the delete helpers report
//! failure as `Err` and leave the decision to the teardown logic.

use crate::cmd::{CommandRunner, Invocation};
use crate::error::{InfraError, Result};
use crate::models::{AzureResource, OwnerTag};
use colored::Colorize;

/// JMESPath projection for `az resource list`.
const RESOURCE_QUERY: &str = "[].{name: name, type: type, id: id}";

/// List every resource in the owner's resource group.
///
/// Returns an empty list when the group does not exist, the CLI fails, or
/// its output cannot be parsed, so that import simply has nothing to do.
pub fn list_resources(runner: &impl CommandRunner, owner: &OwnerTag) -> Vec<AzureResource> {
    let rg = owner.resource_group();
    let invocation = Invocation::new("az").args([
        "resource",
        "list",
        "--resource-group",
        rg.as_str(),
        "--query",
        RESOURCE_QUERY,
        "--output",
        "json",
    ]);
    match query_resources(runner, &invocation) {
        Ok(resources) => {
            log::info!("Found {} resources in {rg}", resources.len());
            resources
        }
        Err(e) => {
            log::warn!(
                "{} Could not list resources in resource group {rg}: {e}",
                "Warning:".yellow()
            );
            Vec::new()
        }
    }
}

fn query_resources(
    runner: &impl CommandRunner,
    invocation: &Invocation,
) -> Result<Vec<AzureResource>> {
    let output = runner.run_checked(invocation)?;
    let mut deserializer = serde_json::Deserializer::from_str(&output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::debug!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        InfraError::Parse {
            command: invocation.command_line(),
            message: format!("path={} error={}", e.path(), e),
        }
    })
}

/// `az resource delete` for one resource of the group.
pub fn delete_resource(
    runner: &impl CommandRunner,
    owner: &OwnerTag,
    resource_type: &str,
    name: &str,
    force: bool,
) -> Result<()> {
    log::info!("Attempting to delete {resource_type}/{name}...");
    let rg = owner.resource_group();
    let mut invocation = Invocation::new("az").args([
        "resource",
        "delete",
        "--resource-group",
        rg.as_str(),
        "--resource-type",
        resource_type,
        "--name",
        name,
        "--verbose",
    ]);
    if force {
        invocation = invocation.arg("--force");
    }
    runner.run_checked(&invocation)?;
    log::info!("Successfully deleted {resource_type}/{name}");
    Ok(())
}

/// `az vm delete` for the deployment's VM.
pub fn delete_vm(runner: &impl CommandRunner, owner: &OwnerTag) -> Result<()> {
    let (rg, vm) = (owner.resource_group(), owner.vm());
    let invocation = Invocation::new("az").args([
        "vm",
        "delete",
        "-g",
        rg.as_str(),
        "-n",
        vm.as_str(),
        "--yes",
        "--force",
    ]);
    runner.run_checked(&invocation).map(|_| ())
}

/// `az group delete` for the whole resource group.
pub fn delete_group(runner: &impl CommandRunner, owner: &OwnerTag) -> Result<()> {
    let rg = owner.resource_group();
    let invocation =
        Invocation::new("az").args(["group", "delete", "--name", rg.as_str(), "--yes", "--force"]);
    runner.run_checked(&invocation).map(|_| ())
}
