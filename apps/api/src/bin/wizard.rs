//! Terminal front-end for the cancellation wizard. Talks to the API at `CANCEL_API_URL`.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cancel_flow::config::Config;
use cancel_flow::flow::view::{self, Screen};
use cancel_flow::flow::{CancelFlow, HttpCancelClient};
use cancel_flow::models::user::MOCK_USER;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they don't interleave with the screens.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    print_screen(&view::loading_screen());
    let client = HttpCancelClient::new(&config.api_url)?;
    let mut flow = CancelFlow::start(client, MOCK_USER).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let screen = flow.screen();
        print_screen(&screen);
        if flow.exit().is_some() {
            break;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let choice = line.trim().parse::<usize>().ok();
        let Some(button) = choice
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| screen.buttons.get(i))
        else {
            println!("Pick a number between 1 and {}.", screen.buttons.len());
            continue;
        };

        if let Some(pending) = flow.pending_screen(button.action) {
            print_screen(&pending);
        }
        if let Err(e) = flow.dispatch(button.action).await {
            tracing::warn!("Ignored button press: {e}");
        }
    }

    Ok(())
}

fn print_screen(screen: &Screen) {
    println!();
    println!("== {} ==", screen.title);
    for line in &screen.body {
        println!("{line}");
    }
    for (i, button) in screen.buttons.iter().enumerate() {
        let marker = if button.disabled { " (disabled)" } else { "" };
        println!("  [{}] {}{marker}", i + 1, button.label);
    }
}
