// ratachat — an embeddable chat widget for ratatui terminals
// Copyright (C) 2026  The ratachat developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Showcase binary: the scripted mock conversation rendered through
//! [`ChatView`], with a mock bot answering whatever you type.

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratachat::{
    AttributedTextHandlers, ChatEvent, ChatMessage, ChatView, ContactCellButton, MessageKind,
    MessageStore, RenderStrategy, TextInputBar, mock,
};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "ratachat-demo", about = "Showcase chat TUI built on the ratachat widget")]
struct Cli {
    /// Generate this many random backlog messages on top of the
    /// scripted conversation
    #[arg(long, short, default_value_t = 0)]
    count: usize,

    /// Force the legacy full-paragraph list instead of the virtualized one
    #[arg(long)]
    legacy_list: bool,

    /// Delay before the mock bot answers, in milliseconds
    #[arg(long, default_value_t = 900)]
    reply_delay_ms: u64,

    /// Write tracing diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Tracing filter directives (falls back to RUST_LOG, then "info")
    #[arg(long)]
    log_filter: Option<String>,
}

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(&cli))
}

/// What the widget callbacks want the host to do. Callbacks run while
/// the store is immutably borrowed, so mutations are queued and applied
/// on the next tick.
#[derive(Debug)]
enum DemoAction {
    SendText(String),
    Status(String),
}

fn build_chat_view(
    store: &mut MessageStore,
    cli: &Cli,
    actions: mpsc::UnboundedSender<DemoAction>,
) -> ChatView {
    let strategy =
        if cli.legacy_list { RenderStrategy::Legacy } else { RenderStrategy::detect() };

    let tap_tx = actions.clone();
    let reply_tx = actions.clone();
    let carousel_tx = actions.clone();
    let url_tx = actions.clone();
    let phone_tx = actions.clone();
    let date_tx = actions.clone();
    let contact_tx = actions;

    ChatView::new(store.subscribe())
        .with_strategy(strategy)
        .with_input(TextInputBar::with_placeholder("Type a message..."))
        .with_bottom_inset(0)
        .on_cell_tap(move |msg| {
            let _ = tap_tx.send(DemoAction::Status(format!("tapped {} cell", msg.kind.label())));
        })
        .context_menu(|msg| {
            vec![
                Line::from(format!(" Reply to {} ", msg.user.name)),
                Line::from(" Copy text "),
                Line::from(" Delete "),
            ]
        })
        .on_quick_reply(move |item| {
            let _ = reply_tx.send(DemoAction::SendText(item.title.clone()));
        })
        .contact_footer_buttons(move |_, _| {
            let call_tx = contact_tx.clone();
            let save_tx = contact_tx.clone();
            vec![
                ContactCellButton::new("Call", move |contact, _| {
                    let phone = contact.phone.clone().unwrap_or_default();
                    let _ = call_tx.send(DemoAction::Status(format!("calling {phone}")));
                }),
                ContactCellButton::new("Save", move |contact, _| {
                    let _ = save_tx
                        .send(DemoAction::Status(format!("saved {}", contact.display_name)));
                }),
            ]
        })
        .attributed_text_handlers(AttributedTextHandlers {
            on_url: Some(Box::new(move |url| {
                let _ = url_tx.send(DemoAction::Status(format!("open {url}")));
            })),
            on_phone: Some(Box::new(move |phone| {
                let _ = phone_tx.send(DemoAction::Status(format!("dial {phone}")));
            })),
            on_date: Some(Box::new(move |date| {
                let _ = date_tx.send(DemoAction::Status(format!("schedule {date}")));
            })),
            on_address: None,
        })
        .on_carousel_item_action(move |button, _| {
            let _ = carousel_tx
                .send(DemoAction::Status(format!("carousel action: {}", button.title)));
        })
}

async fn run_tui(cli: &Cli) -> anyhow::Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let mut store = MessageStore::new();
    let mut chat = build_chat_view(&mut store, cli, action_tx);

    // Populate after subscribing so the initial backlog arrives as
    // change notifications and the list glides to the newest message.
    store.extend(mock::sample_conversation());
    if cli.count > 0 {
        store.extend(mock::generated_messages(cli.count));
    }

    let mut terminal = ratatui::init();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(16));
    let mut reply_due: Option<Instant> = None;
    let mut status = format!("{:?} list | Ctrl+C to quit", chat.strategy());

    loop {
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                if is_quit(&event) {
                    break;
                }
                if let Some(ChatEvent::Submitted(text)) = chat.handle_event(&event, &store) {
                    store.push(ChatMessage::from_sender(mock::sender(), MessageKind::Text(text)));
                    reply_due = Some(Instant::now() + Duration::from_millis(cli.reply_delay_ms));
                }
            }
            _ = tick.tick() => {
                while let Ok(action) = action_rx.try_recv() {
                    match action {
                        DemoAction::SendText(text) => {
                            tracing::info!(%text, "quick reply selected");
                            store.push(ChatMessage::from_sender(
                                mock::sender(),
                                MessageKind::Text(text),
                            ));
                            reply_due =
                                Some(Instant::now() + Duration::from_millis(cli.reply_delay_ms));
                        }
                        DemoAction::Status(text) => status = text,
                    }
                }
                if let Some(due) = reply_due
                    && Instant::now() >= due
                {
                    reply_due = None;
                    store.push(mock::bot_reply());
                }
                terminal.draw(|frame| {
                    let [chat_area, status_area] =
                        Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                            .areas(frame.area());
                    chat.render(frame, chat_area, &store);
                    render_status(frame, status_area, &status);
                })?;
            }
        }
    }

    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
    ratatui::restore();
    Ok(())
}

fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.kind == KeyEventKind::Press
                && key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, status: &str) {
    let line = Line::from(Span::styled(
        format!("  {status}"),
        Style::default().fg(ratachat::ui::theme::DIM),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_filter = %directives,
        "tracing enabled"
    );
    Ok(())
}
