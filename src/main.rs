use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use tasklens::api::http::HttpClient;
use tasklens::config::Config;
use tasklens::credentials::{CredentialStore, FileCredentialStore, TOKEN_ENV_VAR};
use tasklens::hierarchy::TaskNode;
use tasklens::sync::{SyncService, SyncStatus};
use tasklens::{logger, session};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    let credentials: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new()?);

    // Check if a credential is available before doing anything else
    if credentials.get().is_none() {
        eprintln!("❌ Error: no access token found");
        eprintln!("\n💡 To use this app:");
        eprintln!("1. Log in through the web client and copy your access token");
        eprintln!("2. Set it as environment variable: export {TOKEN_ENV_VAR}=your_token_here");
        eprintln!("3. Run the app again to see your actual data!");
        return Ok(());
    }

    let client = Arc::new(HttpClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_seconds),
    )?);

    let (navigation_tx, mut navigation_rx) = mpsc::unbounded_channel::<session::SessionEvent>();
    let sync = SyncService::new(client, credentials, navigation_tx);

    match sync.refresh().await? {
        SyncStatus::Idle => {
            let forest = sync.forest().await;
            if forest.is_empty() {
                println!("No tasks.");
            }
            for root in &forest {
                print_tree(root, 0);
            }
        }
        SyncStatus::Error { message } => {
            if navigation_rx.try_recv().is_ok() {
                eprintln!("🔒 {message}");
            } else {
                eprintln!("❌ {message}");
            }
            std::process::exit(1);
        }
        SyncStatus::Loading => {}
    }

    Ok(())
}

fn print_tree(node: &TaskNode, depth: usize) {
    let marker = if node.is_completed { "x" } else { " " };
    println!("{}[{marker}] {}", "  ".repeat(depth), node.content);
    for subtask in &node.subtasks {
        print_tree(subtask, depth + 1);
    }
}
