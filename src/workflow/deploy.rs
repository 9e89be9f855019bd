//! Deploy workflow: clean up, recreate, and point SSH at the new VM.

use crate::cmd::{CommandRunner, Invocation};
use crate::config::{
    Settings, GENERATE_TFVARS_SCRIPT, PRIVATE_KEY_VARIABLE, PUBLIC_IP_OUTPUT, PYTHON,
    SSH_HOST_ALIAS, UPDATE_SSH_CONFIG_SCRIPT,
};
use crate::error::{InfraError, Result};
use crate::importer::{import_existing_resources, ImportReport};
use crate::models::OwnerTag;
use crate::teardown::{Strategy, Teardown, TeardownReport};
use crate::terraform::Terraform;
use crate::tfvars::{owner_tag_or_default, read_variable_default};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DeployReport {
    pub owner: OwnerTag,
    pub imports: ImportReport,
    pub teardown: TeardownReport,
    pub public_ip: String,
}

/// Run the whole deploy workflow.
///
/// The private key is resolved first, so a configuration problem aborts
/// before anything external is touched.
pub fn deploy<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<DeployReport> {
    let private_key = resolve_private_key(&settings.variables_file())?;
    log::info!("Using private key {}", private_key.display());

    let terraform = Terraform::new(runner, &settings.terraform_dir);
    terraform.clear_stale_locks();

    log::info!("📝 Generating terraform.tfvars...");
    generate_tfvars(runner, settings)?;

    terraform.init()?;
    let owner = owner_tag_or_default(&settings.tfvars_file());
    let imports = import_existing_resources(runner, &terraform, &owner, &settings.subscription_id);

    let teardown = Teardown::new(runner, &terraform, &owner)
        .with_retry(settings.max_delete_attempts, settings.retry_delay)
        .run(Strategy::Quick);
    if !teardown.outcome.is_success() {
        log::warn!("Failed to destroy infrastructure, proceeding with apply anyway...");
    }

    log::info!(
        "Waiting {}s for resources to be fully cleaned up...",
        settings.retry_delay.as_secs()
    );
    std::thread::sleep(settings.retry_delay);

    log::info!("Applying new infrastructure...");
    let apply_log = terraform.apply()?;
    log::info!("{}", apply_log.trim_end());

    let public_ip = read_public_ip(&terraform, settings)?;
    log::info!("Server public IP {}", public_ip.green());
    update_ssh_config(runner, settings, &public_ip, &private_key)?;

    Ok(DeployReport {
        owner,
        imports,
        teardown,
        public_ip,
    })
}

/// Private key path from `variables.tf`, `~` expanded, absolute, and existing.
pub fn resolve_private_key(variables_file: &Path) -> Result<PathBuf> {
    let raw = read_variable_default(variables_file, PRIVATE_KEY_VARIABLE)?;
    let path = expand_home(&raw);
    if !path.is_file() {
        return Err(InfraError::MissingPrivateKey(path));
    }
    std::fs::canonicalize(&path).map_err(|source| InfraError::Unreadable { path, source })
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => {
            log::warn!("Cannot expand {raw}, home directory unknown");
            PathBuf::from(raw)
        }
    }
}

/// Helper scripts run from their own directory, so they are named by file
/// name only; `scripts_dir` may be relative to the current directory.
fn script_invocation(settings: &Settings, script: &str) -> Invocation {
    Invocation::new(PYTHON).arg(script).in_dir(&settings.scripts_dir)
}

fn generate_tfvars<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<()> {
    let invocation = script_invocation(settings, GENERATE_TFVARS_SCRIPT);
    let output = runner.run_checked(&invocation)?;
    log::info!("{}", output.trim_end());
    Ok(())
}

/// The IP can lag behind apply; a failed read is retried once after the delay.
fn read_public_ip<R: CommandRunner>(
    terraform: &Terraform<R>,
    settings: &Settings,
) -> Result<String> {
    match terraform.output_raw(PUBLIC_IP_OUTPUT) {
        Ok(ip) => Ok(ip),
        Err(e) => {
            log::warn!(
                "Could not get server IP from Terraform output ({e}), waiting {}s...",
                settings.retry_delay.as_secs()
            );
            std::thread::sleep(settings.retry_delay);
            terraform.output_raw(PUBLIC_IP_OUTPUT)
        }
    }
}

fn update_ssh_config<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    public_ip: &str,
    private_key: &Path,
) -> Result<()> {
    let invocation = script_invocation(settings, UPDATE_SSH_CONFIG_SCRIPT)
        .arg(SSH_HOST_ALIAS)
        .arg(public_ip)
        .arg(private_key.to_string_lossy());
    runner.run_checked(&invocation)?;
    log::info!("SSH config updated for {SSH_HOST_ALIAS}");
    Ok(())
}
