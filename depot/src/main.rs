use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use depot::{Cli, Runner, Shutdown};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    depot::trace::init_tracing();

    let runner = match Runner::new(cli.into_config()) {
        Ok(runner) => runner,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    if let Err(err) = depot::trigger_on_interrupt(Arc::clone(&shutdown)) {
        warn!(%err, "Ctrl-C will not stop the run gracefully");
    }

    match runner.run(&shutdown) {
        Ok(report) => {
            info!(
                produced = report.produced,
                consumed = report.consumed(),
                failed = report.failed(),
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}
