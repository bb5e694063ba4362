//! Main event loop: multiplexes terminal input and transport events over
//! one logical thread of control, draws frames, and tears the session
//! down on `/exit`.

use std::{error::Error, io, time::Duration};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::session::{MenuPanel, SessionState};
use crate::transport::{
    random_client_id, LinkEvent, MqttLink, ReconnectSupervisor, RetryPolicy,
};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

/// Delay between the handshake banner and the first connect attempt, so
/// the uplink sequence reads line by line instead of all at once.
const HANDSHAKE_DELAY: Duration = Duration::from_millis(800);

pub struct ChatSettings {
    pub config: Config,
    pub nickname: String,
}

pub async fn run_chat(settings: ChatSettings) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, settings).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: ChatSettings,
) -> Result<(), Box<dyn Error>> {
    let ChatSettings { config, nickname } = settings;

    let theme = config
        .theme
        .as_deref()
        .and_then(Theme::find)
        .unwrap_or_default();
    let mut app = App::new(SessionState::new(nickname), theme);

    let (link_tx, mut link_rx) = mpsc::unbounded_channel::<LinkEvent>();
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Event>();

    // Dedicated thread for blocking terminal reads; the loop below never
    // blocks on anything but its channels.
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if input_tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let supervisor = ReconnectSupervisor::new(RetryPolicy::from(&config), link_tx.clone());
    let client_id = random_client_id();
    let mut link: Option<MqttLink> = None;

    app.begin_handshake();
    supervisor.schedule_connect(HANDSHAKE_DELAY);

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        tokio::select! {
            maybe_event = input_rx.recv() => match maybe_event {
                Some(ev) => {
                    handle_terminal_event(&mut app, &link, &config, ev).await;
                }
                None => break,
            },
            maybe_event = link_rx.recv() => match maybe_event {
                Some(ev) => {
                    handle_link_event(
                        &mut app,
                        &mut link,
                        &supervisor,
                        &config,
                        &client_id,
                        &link_tx,
                        ev,
                    )
                    .await;
                }
                None => break,
            },
        }

        if app.exit_requested {
            supervisor.shutdown();
            if let Some(active) = &link {
                active.disconnect().await;
            }
            debug!("session torn down");
            break;
        }
    }

    Ok(())
}

async fn handle_link_event(
    app: &mut App,
    link: &mut Option<MqttLink>,
    supervisor: &ReconnectSupervisor,
    config: &Config,
    client_id: &str,
    link_tx: &mpsc::UnboundedSender<LinkEvent>,
    ev: LinkEvent,
) {
    match ev {
        LinkEvent::ConnectDue => {
            app.on_connect_started();
            *link = Some(MqttLink::open(
                &config.broker_host,
                config.broker_port,
                client_id,
                link_tx.clone(),
                supervisor.link_token(),
            ));
        }
        LinkEvent::Connected => {
            app.on_connected(&config.topic);
            if let Some(active) = &link {
                if let Err(e) = active.subscribe(&config.topic).await {
                    app.add_error_line(format!("SUBSCRIBE FAILED: {e}"));
                }
            }
        }
        LinkEvent::ConnectFailed { detail } => {
            app.on_connect_failed(&detail);
            *link = None;
            if supervisor.on_connect_failed() {
                app.add_system_line(format!(
                    "RETRYING IN {} SECONDS...",
                    supervisor.retry_delay().as_secs()
                ));
            }
        }
        LinkEvent::ConnectionLost { detail } => {
            app.on_connection_lost(&detail);
            *link = None;
            if supervisor.on_connection_lost() {
                app.add_system_line(format!(
                    "RETRYING IN {} SECONDS...",
                    supervisor.retry_delay().as_secs()
                ));
            }
        }
        LinkEvent::MessageArrived { payload } => {
            app.handle_incoming(&payload);
        }
    }
}

async fn handle_terminal_event(
    app: &mut App,
    link: &Option<MqttLink>,
    config: &Config,
    ev: Event,
) {
    let Event::Key(key) = ev else {
        return;
    };
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_requested = true;
        }
        KeyCode::Tab => {
            app.session.menu = app.session.menu.next();
        }
        KeyCode::Esc => {
            app.cancel_pending_ai();
        }
        KeyCode::Enter if app.session.menu == MenuPanel::Chat => {
            let text = std::mem::take(&mut app.input);
            submit_line(app, link, config, &text).await;
        }
        KeyCode::Char(c) if app.session.menu == MenuPanel::Chat => {
            // With a pending /ai prompt and an empty input line, y/n answer
            // the prompt instead of starting a message.
            if app.pending_ai.is_some() && app.input.is_empty() {
                match c {
                    'y' | 'Y' => {
                        app.confirm_pending_ai();
                        return;
                    }
                    'n' | 'N' => {
                        app.cancel_pending_ai();
                        return;
                    }
                    _ => {}
                }
            }
            app.input.push(c);
        }
        KeyCode::Backspace if app.session.menu == MenuPanel::Chat => {
            app.input.pop();
        }
        KeyCode::Up => {
            app.scroll_up(1);
        }
        KeyCode::Down => {
            app.scroll_down(1);
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
        }
        _ => {}
    }
}

async fn submit_line(app: &mut App, link: &Option<MqttLink>, config: &Config, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }

    match process_input(app, trimmed) {
        CommandResult::Continue => {}
        CommandResult::ProcessAsMessage(message) => {
            let Some(outbound) = app.compose_outbound(&message) else {
                return;
            };
            match link {
                Some(active) => match active.publish(&config.topic, outbound.payload).await {
                    Ok(()) => app.note_sent(&outbound.display_text),
                    Err(e) => app.note_send_failed(&e.to_string()),
                },
                None => app.note_send_failed("no active link"),
            }
        }
    }
}
