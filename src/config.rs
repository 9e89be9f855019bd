//! Run configuration.
//!
//! Fixed constants of the deployment topology plus [`Settings`], which is
//! read from the environment (after `dotenv` has loaded `.env`).

use std::path::PathBuf;
use std::time::Duration;

/// Project infix used in every resource name: `<owner>-biteswipe-...`.
pub const PROJECT: &str = "biteswipe";

/// Owner tag used when `terraform.tfvars` is missing or has no `owner_tag`.
pub const DEFAULT_OWNER_TAG: &str = "runner";

/// Destroy passes before escalating to resource-group deletion.
pub const MAX_DELETE_ATTEMPTS: u32 = 3;

/// Fixed delay between destroy passes and before apply.
pub const RETRY_DELAY_SECS: u64 = 30;

pub const VARIABLES_FILE: &str = "variables.tf";
pub const TFVARS_FILE: &str = "terraform.tfvars";

/// Lock marker files left behind by an interrupted terraform run.
pub const LOCK_FILES: [&str; 2] = [".terraform.tfstate.lock.info", "terraform.tfstate.lock.info"];

pub const PRIVATE_KEY_VARIABLE: &str = "ssh_private_key_path";
pub const PUBLIC_IP_OUTPUT: &str = "server_public_ip";
pub const SSH_HOST_ALIAS: &str = "CPEN321_SERVER";

pub const GENERATE_TFVARS_SCRIPT: &str = "generate_tfvars.py";
pub const UPDATE_SSH_CONFIG_SCRIPT: &str = "update_ssh_config_with_new_ips.py";
pub const PYTHON: &str = "python3";

const ENV_TERRAFORM_DIR: &str = "BITESWIPE_TERRAFORM_DIR";
const ENV_SCRIPTS_DIR: &str = "BITESWIPE_SCRIPTS_DIR";
const ENV_RETRY_DELAY: &str = "BITESWIPE_RETRY_DELAY_SECS";
const ENV_SUBSCRIPTION: &str = "ARM_SUBSCRIPTION_ID";
const ENV_LOG_CONFIG: &str = "BITESWIPE_LOG_CONFIG";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the terraform definitions and state.
    pub terraform_dir: PathBuf,
    /// Directory holding the tfvars and ssh-config helper scripts.
    pub scripts_dir: PathBuf,
    /// Azure subscription, used to build resource ids for association imports.
    pub subscription_id: String,
    pub retry_delay: Duration,
    pub max_delete_attempts: u32,
}

impl Settings {
    pub fn new(terraform_dir: impl Into<PathBuf>, scripts_dir: impl Into<PathBuf>) -> Self {
        Settings {
            terraform_dir: terraform_dir.into(),
            scripts_dir: scripts_dir.into(),
            subscription_id: String::new(),
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
            max_delete_attempts: MAX_DELETE_ATTEMPTS,
        }
    }

    pub fn from_env() -> Self {
        let mut settings = Settings::new(
            std::env::var(ENV_TERRAFORM_DIR).unwrap_or_else(|_| "terraform".to_string()),
            std::env::var(ENV_SCRIPTS_DIR).unwrap_or_else(|_| "scripts".to_string()),
        );
        settings.subscription_id = std::env::var(ENV_SUBSCRIPTION).unwrap_or_else(|_| {
            log::warn!("{ENV_SUBSCRIPTION} is not set, association import will likely fail");
            String::new()
        });
        if let Ok(secs) = std::env::var(ENV_RETRY_DELAY) {
            match secs.parse::<u64>() {
                Ok(secs) => settings.retry_delay = Duration::from_secs(secs),
                Err(e) => log::warn!("Ignoring {ENV_RETRY_DELAY}={secs}: {e}"),
            }
        }
        settings
    }

    pub fn variables_file(&self) -> PathBuf {
        self.terraform_dir.join(VARIABLES_FILE)
    }

    pub fn tfvars_file(&self) -> PathBuf {
        self.terraform_dir.join(TFVARS_FILE)
    }
}

/// Path of the log4rs configuration file.
pub fn log_config_path() -> String {
    std::env::var(ENV_LOG_CONFIG).unwrap_or_else(|_| "log4rs.yml".to_string())
}
