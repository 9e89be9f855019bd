//! Teardown of the deployment's Azure resources.
//!
//! Both workflows tear down through [`Teardown`]. The destroy workflow uses
//! [`Strategy::Ordered`]: up to `max_attempts` passes over the deletion plan,
//! `--force` from the second pass on, then escalation. The deploy workflow
//! uses [`Strategy::Quick`]: delete the VM, then go straight to escalation.
//!
//! ```text
//! Deleting(1..=max) ──all deleted──▶ AllDeleted
//!        │ failures left after last pass
//!        ▼
//! Escalate(ResourceGroup) ──ok──▶ ResourceGroupDeleted
//!        │ failed
//!        ▼
//! Escalate(ToolDestroy) ──ok──▶ TerraformDestroyed
//!        │ failed
//!        ▼
//!      Failed
//! ```

use crate::azure;
use crate::cmd::CommandRunner;
use crate::models::OwnerTag;
use crate::terraform::Terraform;
use colored::Colorize;
use itertools::Itertools;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Ordered,
    Quick,
}

/// Result of one `az resource delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub resource_type: &'static str,
    pub name: String,
    pub error: Option<String>,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}

/// One pass over the deletion plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub attempt: u32,
    pub force: bool,
    pub outcomes: Vec<DeleteOutcome>,
}

impl PassReport {
    pub fn failures(&self) -> Vec<&DeleteOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some()).collect()
    }

    pub fn all_deleted(&self) -> bool {
        self.outcomes.iter().all(|o| o.error.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    AllDeleted,
    ResourceGroupDeleted,
    TerraformDestroyed,
    /// Nothing worked; `residual` lists what the last pass could not delete.
    Failed { residual: Vec<String>, reason: String },
}

impl TeardownOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, TeardownOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub passes: Vec<PassReport>,
    pub outcome: TeardownOutcome,
}

#[derive(Debug)]
enum State {
    Deleting { attempt: u32 },
    EscalateGroup { residual: Vec<String> },
    EscalateTool { residual: Vec<String> },
    Done(TeardownOutcome),
}

pub struct Teardown<'a, R: CommandRunner> {
    runner: &'a R,
    terraform: &'a Terraform<'a, R>,
    owner: &'a OwnerTag,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<'a, R: CommandRunner> Teardown<'a, R> {
    pub fn new(runner: &'a R, terraform: &'a Terraform<'a, R>, owner: &'a OwnerTag) -> Self {
        Teardown {
            runner,
            terraform,
            owner,
            max_attempts: crate::config::MAX_DELETE_ATTEMPTS,
            retry_delay: Duration::from_secs(crate::config::RETRY_DELAY_SECS),
        }
    }

    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn run(&self, strategy: Strategy) -> TeardownReport {
        let mut passes = Vec::new();
        let mut state = match strategy {
            Strategy::Ordered => State::Deleting { attempt: 1 },
            Strategy::Quick => {
                self.delete_vm();
                State::EscalateGroup {
                    residual: Vec::new(),
                }
            }
        };

        loop {
            log::debug!("teardown state {state:?}");
            state = match state {
                State::Deleting { attempt } => {
                    let pass = self.delete_pass(attempt);
                    let next = self.after_pass(&pass);
                    passes.push(pass);
                    next
                }
                State::EscalateGroup { residual } => {
                    log::info!("Attempting to delete entire resource group...");
                    match azure::delete_group(self.runner, self.owner) {
                        Ok(()) => {
                            log::info!("Successfully deleted resource group");
                            State::Done(TeardownOutcome::ResourceGroupDeleted)
                        }
                        Err(e) => {
                            log::warn!("Failed to delete resource group: {e}");
                            State::EscalateTool { residual }
                        }
                    }
                }
                State::EscalateTool { residual } => {
                    log::info!("Attempting Terraform destroy as last resort...");
                    match self.terraform.destroy() {
                        Ok(()) => {
                            log::info!("Successfully destroyed infrastructure via Terraform");
                            State::Done(TeardownOutcome::TerraformDestroyed)
                        }
                        Err(e) => {
                            log::error!("Terraform destroy also failed: {e}");
                            State::Done(TeardownOutcome::Failed {
                                residual,
                                reason: e.to_string(),
                            })
                        }
                    }
                }
                State::Done(outcome) => return TeardownReport { passes, outcome },
            };
        }
    }

    fn after_pass(&self, pass: &PassReport) -> State {
        if pass.all_deleted() {
            log::info!("{}", "All resources deleted successfully!".green());
            return State::Done(TeardownOutcome::AllDeleted);
        }
        let failures = pass.failures().iter().join(", ");
        if pass.attempt < self.max_attempts {
            log::warn!("Some resources failed to delete: {failures}");
            log::info!("Waiting {}s before retry...", self.retry_delay.as_secs());
            std::thread::sleep(self.retry_delay);
            State::Deleting {
                attempt: pass.attempt + 1,
            }
        } else {
            log::error!("Failed to delete some resources after all attempts: {failures}");
            State::EscalateGroup {
                residual: pass.failures().iter().map(|o| o.to_string()).collect(),
            }
        }
    }

    fn delete_pass(&self, attempt: u32) -> PassReport {
        let force = attempt > 1;
        log::info!("Attempt {attempt} of {}", self.max_attempts);
        let outcomes = self
            .owner
            .deletion_plan()
            .into_iter()
            .map(|(resource_type, name)| {
                let result =
                    azure::delete_resource(self.runner, self.owner, resource_type, &name, force);
                let error = result.err().map(|e| {
                    log::warn!("Failed to delete {resource_type}/{name}: {e}");
                    e.to_string()
                });
                DeleteOutcome {
                    resource_type,
                    name,
                    error,
                }
            })
            .collect();
        PassReport {
            attempt,
            force,
            outcomes,
        }
    }

    fn delete_vm(&self) {
        log::info!("Destroying VMs if they exist...");
        if let Err(e) = azure::delete_vm(self.runner, self.owner) {
            log::info!("No VMs to delete or already deleted ({e})");
        }
    }
}
