//! Destroy workflow: adopt whatever exists, then delete it in dependency order.

use crate::cmd::CommandRunner;
use crate::config::Settings;
use crate::error::Result;
use crate::importer::{import_existing_resources, ImportReport};
use crate::models::OwnerTag;
use crate::teardown::{Strategy, Teardown, TeardownReport};
use crate::terraform::Terraform;
use crate::tfvars::owner_tag_or_default;

#[derive(Debug)]
pub struct DestroyReport {
    pub owner: OwnerTag,
    pub imports: ImportReport,
    pub teardown: TeardownReport,
}

/// Run the destroy workflow.
///
/// Only `terraform init` failing is an `Err`; a teardown that ends in
/// `Failed` is reported through [`DestroyReport::teardown`].
pub fn destroy<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<DestroyReport> {
    let terraform = Terraform::new(runner, &settings.terraform_dir);
    terraform.init()?;

    let owner = owner_tag_or_default(&settings.tfvars_file());
    let imports = import_existing_resources(runner, &terraform, &owner, &settings.subscription_id);

    let teardown = Teardown::new(runner, &terraform, &owner)
        .with_retry(settings.max_delete_attempts, settings.retry_delay)
        .run(Strategy::Ordered);

    Ok(DestroyReport {
        owner,
        imports,
        teardown,
    })
}
