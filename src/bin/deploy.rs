use biteswipe_infra::output::{print_banner, print_imports, print_teardown};
use biteswipe_infra::{config, logging, workflow, Settings, SystemRunner};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    if let Err(e) = logging::init(&config::log_config_path()) {
        eprintln!("Error initializing log4rs: {e}");
    }
    log::info!("#Start deploy");
    let started = chrono::Local::now();

    let settings = Settings::from_env();
    match workflow::deploy(&SystemRunner, &settings) {
        Ok(report) => {
            print_imports(&report.imports);
            print_teardown(&report.teardown);
            print_banner(
                true,
                &format!("Deployed, server public IP {}", report.public_ip),
                started,
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            if e.is_configuration() {
                log::error!("Configuration error, no infrastructure was changed");
            }
            print_banner(false, &format!("Deployment failed: {e}"), started);
            ExitCode::FAILURE
        }
    }
}
