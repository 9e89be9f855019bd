//! Integration tests for biteswipe-infra
//!
//! These tests drive the workflows end to end against a recorded `az`
//! listing, with every external command answered in-process.

use biteswipe_infra::cmd::{CmdOutput, CommandRunner, Invocation};
use biteswipe_infra::error::Result;
use biteswipe_infra::importer::ImportStatus;
use biteswipe_infra::teardown::TeardownOutcome;
use biteswipe_infra::tfvars::{owner_tag_or_default, read_owner_tag, read_variable_default};
use biteswipe_infra::{map_name, map_type, workflow, AzureResource, OwnerTag, Settings};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

const TEST_DATA: &str = "tests/test_data";

/// Answers `az resource list` from the fixture, fails every command whose
/// line starts with one of `failing`, succeeds otherwise.
struct FixtureRunner {
    failing: Vec<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FixtureRunner {
    fn new(failing: Vec<&'static str>) -> Self {
        FixtureRunner {
            failing,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FixtureRunner {
    fn run(&self, invocation: &Invocation) -> Result<CmdOutput> {
        let line = invocation.command_line();
        self.calls.borrow_mut().push(line.clone());
        if self.failing.iter().any(|f| line.starts_with(f)) {
            return Ok(CmdOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "ERROR: simulated failure".to_string(),
            });
        }
        let stdout = if line.starts_with("az resource list") {
            std::fs::read_to_string(Path::new(TEST_DATA).join("az_resource_list.json"))
                .expect("fixture listing")
        } else {
            String::new()
        };
        Ok(CmdOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
}

fn fixture_settings() -> Settings {
    let mut settings = Settings::new(TEST_DATA, TEST_DATA);
    settings.subscription_id = "00000000-0000-0000-0000-000000000000".to_string();
    settings.retry_delay = Duration::ZERO;
    settings
}

#[test]
fn test_read_fixture_config() {
    let variables = Path::new(TEST_DATA).join("variables.tf");
    assert_eq!(
        read_variable_default(&variables, "ssh_private_key_path").expect("key path"),
        "~/.ssh/id_rsa"
    );
    assert_eq!(
        read_variable_default(&variables, "vm_size").expect("vm size"),
        "Standard_B1s"
    );
    assert!(read_variable_default(&variables, "owner_tag").is_err());

    let tfvars = Path::new(TEST_DATA).join("terraform.tfvars");
    assert_eq!(read_owner_tag(&tfvars).expect("owner").as_str(), "alice");
    assert_eq!(
        owner_tag_or_default(&Path::new(TEST_DATA).join("missing.tfvars")).as_str(),
        "runner"
    );
}

#[test]
fn test_fixture_listing_maps() {
    let json = std::fs::read_to_string(Path::new(TEST_DATA).join("az_resource_list.json"))
        .expect("fixture listing");
    let resources: Vec<AzureResource> = serde_json::from_str(&json).expect("valid listing");
    let owner = OwnerTag::new("alice");

    let addresses: Vec<String> = resources
        .iter()
        .filter_map(|r| {
            map_type(&r.resource_type).map(|t| format!("{t}.{}", map_name(&r.name, &owner)))
        })
        .collect();
    assert_eq!(
        addresses,
        vec![
            "azurerm_linux_virtual_machine.alice-biteswipe",
            "azurerm_network_interface.nic",
            "azurerm_network_security_group.nsg",
            "azurerm_public_ip.public_ip",
            "azurerm_virtual_network.vnet",
        ]
    );
}

#[test]
fn test_destroy_workflow_with_fixture() {
    let runner = FixtureRunner::new(vec![]);
    let report = workflow::destroy(&runner, &fixture_settings()).expect("destroy runs");

    assert_eq!(report.owner.as_str(), "alice");
    assert_eq!(report.teardown.outcome, TeardownOutcome::AllDeleted);
    let skipped: Vec<&str> = report
        .imports
        .outcomes
        .iter()
        .filter(|o| o.status == ImportStatus::Skipped)
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(skipped, vec!["alice-biteswipe_OsDisk_1_5f1e"]);
    assert_eq!(report.imports.imported().count(), 6);

    let calls = runner.calls();
    assert_eq!(calls[0], "terraform init");
    assert_eq!(calls.iter().filter(|c| c.starts_with("az resource delete")).count(), 6);
}

#[test]
fn test_destroy_workflow_escalation() {
    let runner = FixtureRunner::new(vec![
        "az resource delete --resource-group alice-biteswipe-resources --resource-type Microsoft.Network/virtualNetworks/subnets",
        "az group delete",
    ]);
    let report = workflow::destroy(&runner, &fixture_settings()).expect("destroy runs");

    assert_eq!(report.teardown.passes.len(), 3);
    assert_eq!(report.teardown.outcome, TeardownOutcome::TerraformDestroyed);
    let calls = runner.calls();
    assert_eq!(calls.last().map(String::as_str), Some("terraform destroy -auto-approve=true"));
}
