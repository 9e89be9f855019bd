use biteswipe_infra::output::{print_banner, print_imports, print_teardown};
use biteswipe_infra::{config, logging, workflow, Settings, SystemRunner};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    if let Err(e) = logging::init(&config::log_config_path()) {
        eprintln!("Error initializing log4rs: {e}");
    }
    log::info!("#Start destroy");
    let started = chrono::Local::now();

    let settings = Settings::from_env();
    let report = match workflow::destroy(&SystemRunner, &settings) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{e}");
            print_banner(false, &format!("Infrastructure destruction failed: {e}"), started);
            return ExitCode::FAILURE;
        }
    };

    print_imports(&report.imports);
    print_teardown(&report.teardown);
    if report.teardown.outcome.is_success() {
        print_banner(true, "Infrastructure destruction completed!", started);
        ExitCode::SUCCESS
    } else {
        print_banner(
            false,
            "Infrastructure destruction failed, exiting with status 1. \
             Some resources may need manual cleanup.",
            started,
        );
        ExitCode::FAILURE
    }
}
