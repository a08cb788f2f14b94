//! Book chat - genre-driven book recommendations in the terminal
//!
//! Talks to a remote recommendation service. Pick a genre, then react to
//! each suggestion until the service runs out of books.

mod config;
mod conversation;
mod gateway;
mod presentation;
mod runtime;
mod state_machine;

use config::{Config, LogFormat};
use crossterm::style::Stylize;
use gateway::{HttpGateway, LoggingGateway, Reaction};
use presentation::{ChatView, Command, InputSurface, Line, HELP};
use runtime::{ChatEvent, ConversationHandle};
use state_machine::Event;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_WIDTH: usize = 80;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_logging(config.log_format);

    let gateway = HttpGateway::new(config.api_url.as_str());
    tracing::info!(api_url = %gateway.base_url(), "Using recommendation service");

    let (handle, mut events) = ConversationHandle::spawn(LoggingGateway::new(gateway));

    let width = crossterm::terminal::size().map_or(DEFAULT_WIDTH, |(cols, _)| usize::from(cols));
    let mut view = ChatView::new(width);
    let mut input = InputSurface::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let ChatEvent::Busy(busy) = event {
                        input.set_busy(busy);
                    }
                    print_lines(&view.apply(&event));
                    // The entry that ends a request follows its Busy(false)
                    if !matches!(event, ChatEvent::Busy(_)) && !input.is_busy() {
                        prompt(view.prompt())?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Display fell behind the conversation");
                    input.set_busy(false);
                    print_lines(&view.resync());
                    prompt(view.prompt())?;
                }
                Err(RecvError::Closed) => break,
            },

            line = stdin.next_line() => {
                // EOF ends the session like /quit
                let Some(line) = line? else { break };
                let command = Command::parse(&line);
                if command.dismisses_panel() {
                    print_lines(&view.dismiss_panel());
                }

                let event = match command {
                    Command::Quit => break,
                    Command::Help => {
                        for text in HELP {
                            println!("{}", (*text).dark_grey());
                        }
                        None
                    }
                    Command::Close => None,
                    Command::Like => Some(Event::React { reaction: Reaction::Like }),
                    Command::Dislike => Some(Event::React { reaction: Reaction::Dislike }),
                    Command::Top => Some(Event::RequestTop),
                    Command::Genres => Some(Event::ListGenres),
                    Command::Books(genre) => Some(Event::BrowseGenre { genre }),
                    Command::Genre(text) => {
                        input.set(text);
                        let submitted = input.submit();
                        if submitted.is_none() && input.is_busy() {
                            println!(
                                "{}",
                                format!("(still waiting, \"{}\" was not sent)", input.pending().trim())
                                    .dark_grey()
                            );
                        }
                        submitted.map(|text| Event::UserSubmit { text })
                    }
                };

                match event {
                    Some(event) => {
                        let replies = view.expects_reply(&event);
                        if handle.send(event).await.is_err() {
                            tracing::error!("Conversation runtime stopped unexpectedly");
                            break;
                        }
                        if !replies {
                            prompt(view.prompt())?;
                        }
                    }
                    None => prompt(view.prompt())?,
                }
            }
        }
    }

    if let Some(store) = handle.shutdown().await {
        tracing::info!(
            entries = store.len(),
            submitted = store.entries().iter().filter(|e| e.is_user()).count(),
            session = ?store.session(),
            "Conversation ended"
        );
    }
    Ok(())
}

/// Logs go to stderr so they never mix with the chat
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "book_chat=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_lines(lines: &[Line]) {
    for line in lines {
        println!("{}", line.styled());
    }
}

fn prompt(text: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "{}", text.dark_grey())?;
    out.flush()
}
