//! Terraform CLI wrapper.
//!
//! All commands run with the terraform directory as working directory.

use crate::cmd::{CommandRunner, Invocation};
use crate::config::LOCK_FILES;
use crate::error::Result;
use colored::Colorize;
use std::path::PathBuf;

pub struct Terraform<'a, R: CommandRunner> {
    runner: &'a R,
    dir: PathBuf,
}

impl<'a, R: CommandRunner> Terraform<'a, R> {
    pub fn new(runner: &'a R, dir: impl Into<PathBuf>) -> Self {
        Terraform {
            runner,
            dir: dir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Invocation {
        Invocation::new("terraform")
            .args(args.iter().copied())
            .in_dir(&self.dir)
    }

    pub fn init(&self) -> Result<()> {
        log::info!("terraform init in {}", self.dir.display());
        self.runner.run_checked(&self.command(&["init"]))?;
        Ok(())
    }

    /// Register an existing cloud resource under `address` in the state.
    pub fn import(&self, address: &str, id: &str) -> Result<()> {
        self.runner.run_checked(&self.command(&["import", address, id]))?;
        Ok(())
    }

    /// `terraform apply -auto-approve=true`, returns the apply log.
    pub fn apply(&self) -> Result<String> {
        self.runner
            .run_checked(&self.command(&["apply", "-auto-approve=true"]))
    }

    pub fn destroy(&self) -> Result<()> {
        self.runner
            .run_checked(&self.command(&["destroy", "-auto-approve=true"]))?;
        Ok(())
    }

    /// `terraform output -raw <name>`, trimmed.
    pub fn output_raw(&self, name: &str) -> Result<String> {
        let value = self
            .runner
            .run_checked(&self.command(&["output", "-raw", name]))?;
        Ok(value.trim().to_string())
    }

    /// Clear leftovers of an interrupted run: stray processes, lock marker
    /// files and a held state lock. Nothing here is fatal.
    pub fn clear_stale_locks(&self) {
        self.kill_processes();
        self.remove_lock_files();
        self.force_unlock();
    }

    fn kill_processes(&self) {
        #[cfg(windows)]
        let invocation = Invocation::new("taskkill").args(["/IM", "terraform.exe", "/F"]);
        #[cfg(not(windows))]
        let invocation = Invocation::new("pkill").arg("terraform");

        match self.runner.run(&invocation) {
            Ok(out) if out.success() => log::info!("Killed leftover terraform processes"),
            Ok(_) => log::debug!("No terraform processes running"),
            Err(e) => log::debug!("Could not check for terraform processes: {e}"),
        }
    }

    fn remove_lock_files(&self) {
        for name in LOCK_FILES {
            let path = self.dir.join(name);
            if path.exists() {
                match std::fs::remove_file(&path) {
                    Ok(()) => log::info!("Removed lock file {}", path.display()),
                    Err(e) => log::warn!("Could not remove {}: {e}", path.display()),
                }
            }
        }
    }

    fn force_unlock(&self) {
        let held = match self.runner.run(&self.command(&["force-unlock"])) {
            Ok(out) => out.combined(),
            Err(e) => {
                log::debug!("force-unlock check failed: {e}");
                return;
            }
        };
        let Some(lock_id) = parse_lock_id(&held) else {
            log::debug!("No terraform state lock held");
            return;
        };
        log::warn!("Releasing terraform state lock {}", lock_id.yellow());
        match self
            .runner
            .run(&self.command(&["force-unlock", "-force", lock_id.as_str()]))
        {
            Ok(out) if out.success() => log::info!("Released lock {lock_id}"),
            Ok(out) => log::warn!("force-unlock {lock_id} failed: {}", out.stderr.trim()),
            Err(e) => log::warn!("force-unlock {lock_id} failed: {e}"),
        }
    }
}

/// Lock id from terraform's `Lock Info:` error block.
///
/// The `ID:` line has to appear within the two lines following the header.
pub fn parse_lock_id(output: &str) -> Option<String> {
    let lines: Vec<&str> = output.lines().collect();
    let header = lines.iter().position(|l| l.contains("Lock Info:"))?;
    lines
        .iter()
        .skip(header + 1)
        .take(2)
        .find(|l| l.contains("ID:"))
        .and_then(|l| l.split_whitespace().nth(1))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InfraError;
    use crate::test_helpers::{failed, ok, ScriptedRunner};
    use std::path::Path;

    const LOCKED: &str = "\
Error: Error acquiring the state lock

Error message: ConditionalCheckFailedException
Lock Info:
  ID:        4f1c2f7e-8a0d-1b7e-09cb-2f4d77a0b1c3
  Path:      terraform.tfstate
  Operation: OperationTypeApply
";

    #[test]
    fn test_parse_lock_id() {
        assert_eq!(
            parse_lock_id(LOCKED).as_deref(),
            Some("4f1c2f7e-8a0d-1b7e-09cb-2f4d77a0b1c3")
        );
    }

    #[test]
    fn test_parse_lock_id_absent() {
        assert_eq!(parse_lock_id("Usage: terraform force-unlock LOCK_ID"), None);
        assert_eq!(parse_lock_id("ID: stray\nLock Info:\n\n\n  ID: too-far"), None);
    }

    #[test]
    fn test_commands_run_in_terraform_dir() {
        let runner = ScriptedRunner::new().on("terraform output", ok("20.1.2.3\n"));
        let tf = Terraform::new(&runner, "/work/terraform");
        tf.init().expect("init");
        tf.import("azurerm_public_ip.public_ip", "/subscriptions/s/x").expect("import");
        assert_eq!(tf.output_raw("server_public_ip").expect("output"), "20.1.2.3");

        let calls = runner.calls();
        assert!(calls
            .iter()
            .all(|c| c.cwd.as_deref() == Some(Path::new("/work/terraform"))));
        assert_eq!(
            runner.command_lines(),
            vec![
                "terraform init",
                "terraform import azurerm_public_ip.public_ip /subscriptions/s/x",
                "terraform output -raw server_public_ip"
            ]
        );
    }

    #[test]
    fn test_clear_stale_locks() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in LOCK_FILES {
            std::fs::write(dir.path().join(name), "{}").expect("write lock file");
        }
        let runner = ScriptedRunner::new()
            .fail("pkill")
            .fail("taskkill")
            .on("terraform force-unlock -force", ok(""))
            .on("terraform force-unlock", failed(LOCKED));
        Terraform::new(&runner, dir.path()).clear_stale_locks();

        for name in LOCK_FILES {
            assert!(!dir.path().join(name).exists(), "{name} should be removed");
        }
        let release = "terraform force-unlock -force 4f1c2f7e-8a0d-1b7e-09cb-2f4d77a0b1c3";
        assert_eq!(runner.position(release), Some(2));
    }

    #[test]
    fn test_clear_stale_locks_without_lock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = ScriptedRunner::new()
            .on("terraform force-unlock", failed("Usage: terraform force-unlock"));
        Terraform::new(&runner, dir.path()).clear_stale_locks();
        assert_eq!(runner.count("terraform force-unlock"), 1);
    }

    #[test]
    fn test_clear_stale_locks_without_tools_installed() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(LOCK_FILES[0]), "{}").expect("write lock file");
        let runner = ScriptedRunner::new()
            .spawn_error("pkill")
            .spawn_error("taskkill")
            .spawn_error("terraform");
        Terraform::new(&runner, dir.path()).clear_stale_locks();

        assert!(!dir.path().join(LOCK_FILES[0]).exists());
        assert_eq!(runner.count("terraform force-unlock"), 1);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_init_without_terraform_is_fatal() {
        let runner = ScriptedRunner::new().spawn_error("terraform");
        let err = Terraform::new(&runner, "/work/terraform").init().expect_err("spawn fails");
        assert!(matches!(err, InfraError::Spawn { .. }));
    }
}
