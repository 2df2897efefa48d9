//! Covenant pet-store suite binary.

use std::process::ExitCode;
use std::sync::Arc;

use covenant_application::{SpecExecutor, set_default_timeout};
use covenant_infrastructure::{HarnessConfig, ReqwestTransport, init_tracing};
use covenant_petstore::{run_suite, scenarios};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = HarnessConfig::load()?;
    init_tracing(&config.log_filter)?;
    set_default_timeout(config.timeout())?;

    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms,
        "Starting Covenant pet-store suite v{}",
        env!("CARGO_PKG_VERSION")
    );

    let executor = Arc::new(SpecExecutor::new(Arc::new(ReqwestTransport::new()?)));
    let report = run_suite(executor, scenarios::all(&config.base_url)).await;

    println!("{}", report.summary());

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
