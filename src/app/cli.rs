use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use super::error::AppError;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to this crate.
/// A second call is a no-op.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pricefeed={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP) by cancelling the import
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM)
pub struct CliApp {
    name: String,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Run the CLI application with signal handling and cooperative shutdown.
    ///
    /// The main function receives a cancellation token and a buffered stdout
    /// writer. A signal cancels the token and the runner waits for the main
    /// function to wind down before exiting with the signal's code.
    ///
    /// This function never returns - it calls std::process::exit
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(CancellationToken, BufWriter<Stdout>) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let cancel = CancellationToken::new();
        let writer = BufWriter::new(tokio::io::stdout());

        let main_fut = main_fn(cancel.clone(), writer);
        tokio::pin!(main_fut);

        let signal_code = tokio::select! {
            result = &mut main_fut => std::process::exit(self.report(result)),
            code = wait_for_signal() => code,
        };

        warn!(app = %self.name, "Interrupted, stopping at the next chunk boundary");
        cancel.cancel();

        let result = main_fut.await;
        self.report(result);
        std::process::exit(signal_code);
    }

    fn report(&self, result: Result<(), AppError>) -> i32 {
        match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}: {}", self.name, e);
                exit_code(&Err(e))
            }
        }
    }
}

/// Exit code for a finished run
pub fn exit_code(result: &Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let handlers = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match handlers {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                warn!("Failed to install signal handlers, running without them");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                eprintln!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler, running without it");
            return std::future::pending().await;
        }
        eprintln!("Received Ctrl+C");
        130
    }
}
