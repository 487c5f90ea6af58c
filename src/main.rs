//! Command-line entry point: send one prompt and stream the answer.
//!
//! Configuration comes from the environment:
//! - `PARLANCE_BASE_URL` - backend API base URL (required)
//! - `PARLANCE_ACCESS_TOKEN` - bearer credential (required)
//! - `PARLANCE_CONVERSATION_ID` / `PARLANCE_PARENT_MESSAGE_ID` - continue
//!   an existing conversation (optional, set both)
//! - `PARLANCE_TIMEOUT_MS` - overall deadline for the answer (optional)
//! - `RUST_LOG` - tracing filter, e.g. `parlance=debug`

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use parlance::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parlance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let prompt: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.is_empty() {
        eprintln!("usage: parlance <prompt...>");
        return ExitCode::FAILURE;
    }

    let Ok(base_url) = std::env::var("PARLANCE_BASE_URL") else {
        eprintln!("PARLANCE_BASE_URL is not set");
        return ExitCode::FAILURE;
    };
    let access_token = std::env::var("PARLANCE_ACCESS_TOKEN").unwrap_or_default();

    let client = ChatClient::new(base_url, Arc::new(StaticTokenRefresher::new(access_token)));

    let mut options = AskOptions::new().with_progress(progress_printer());
    if let (Ok(conversation_id), Ok(parent_id)) = (
        std::env::var("PARLANCE_CONVERSATION_ID"),
        std::env::var("PARLANCE_PARENT_MESSAGE_ID"),
    ) {
        options = options.with_conversation(conversation_id, parent_id);
    }
    if let Some(timeout_ms) = std::env::var("PARLANCE_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        options = options.with_timeout(Duration::from_millis(timeout_ms));
    }

    match client.send_message(&prompt, options).await {
        Ok(response) => {
            println!();
            info!(
                conversation_id = ?response.conversation_id,
                message_id = ?response.message_id,
                "answer complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = err.error_code(), "{}", err.user_message());
            if let Some(partial) = err.partial() {
                eprintln!("partial answer before failure:\n{}", partial.text);
            }
            ExitCode::FAILURE
        }
    }
}

/// Print only the text each snapshot adds beyond what is already on
/// screen. The backend resends the full partial answer per event, so the
/// delta is the suffix past the last printed length.
fn progress_printer() -> ProgressCallback {
    let mut printed = 0usize;
    Box::new(move |partial: &PartialResponse| {
        match partial.text.get(printed..) {
            Some(delta) => print!("{}", delta),
            None => {
                // Not a simple extension of what's on screen; reprint.
                println!();
                print!("{}", partial.text);
            }
        }
        printed = partial.text.len();
        let _ = std::io::stdout().flush();
    })
}
