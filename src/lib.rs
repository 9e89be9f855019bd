//! Provisioning and teardown of the biteswipe Azure VM.
//!
//! Sequences `terraform` and `az` as external processes: adopt existing
//! resources into terraform state, tear them down in dependency order with
//! retries, and (for deploy) re-apply and update the SSH config.

pub mod azure;
pub mod cmd;
pub mod config;
pub mod error;
pub mod importer;
pub mod logging;
pub mod mapper;
pub mod models;
pub mod output;
pub mod teardown;
pub mod terraform;
pub mod tfvars;
pub mod workflow;

#[cfg(test)]
mod test_helpers;

pub use cmd::{CommandRunner, SystemRunner};
pub use config::Settings;
pub use error::InfraError;
pub use mapper::{map_name, map_type};
pub use models::{AzureResource, OwnerTag};
