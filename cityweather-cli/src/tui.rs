//! Full-screen live view.
//!
//! Key presses and finished lookups arrive on two channels and are handled
//! one at a time on the UI loop; the [`WeatherSession`] is only ever touched
//! here. Lookups run as detached tasks and are never cancelled.

use anyhow::{Context, Result};
use cityweather_core::{
    Asset, Config, FetchResponse, FetchTicket, Transition, WeatherProvider, WeatherSession,
    fetch_weather,
    provider::provider_from_config,
    render::{Body, Screen, WeatherCard, render},
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::notice::{Notice, NoticeKind};

pub async fn run(config: &Config) -> Result<()> {
    let provider = provider_from_config(config)?;
    let app = App::new(provider, WeatherSession::new(config.ordering()));

    let mut terminal = ratatui::try_init().context("Failed to initialise terminal")?;
    let result = app.run(&mut terminal).await;
    ratatui::try_restore().context("Failed to restore terminal")?;

    result
}

/// What a key press asks for.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Quit,
    /// Replace the city text with this value.
    Edit(String),
    Search,
}

fn action_for(key: KeyEvent, city: &str) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('u') if ctrl => (!city.is_empty()).then(|| Action::Edit(String::new())),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => {
            let mut next = city.to_string();
            next.push(c);
            Some(Action::Edit(next))
        }
        KeyCode::Backspace => {
            let mut next = city.to_string();
            next.pop().map(|_| Action::Edit(next))
        }
        KeyCode::Enter => Some(Action::Search),
        _ => None,
    }
}

enum Message {
    Input(Event),
    Lookup(FetchResponse),
}

/// Waits for the next key event or finished lookup. `None` once the terminal
/// reader is gone: the UI cannot take input any more, even with lookups pending.
async fn next_message(
    events: &mut mpsc::UnboundedReceiver<Event>,
    inbox: &mut mpsc::UnboundedReceiver<FetchResponse>,
) -> Option<Message> {
    tokio::select! {
        event = events.recv() => event.map(Message::Input),
        Some(response) = inbox.recv() => Some(Message::Lookup(response)),
    }
}

struct App {
    session: WeatherSession,
    provider: Arc<dyn WeatherProvider>,
    responses: mpsc::UnboundedSender<FetchResponse>,
    inbox: Option<mpsc::UnboundedReceiver<FetchResponse>>,
    notice: Option<Notice>,
    quit: bool,
}

impl App {
    fn new(provider: Arc<dyn WeatherProvider>, session: WeatherSession) -> Self {
        let (responses, inbox) = mpsc::unbounded_channel();
        Self {
            session,
            provider,
            responses,
            inbox: Some(inbox),
            notice: None,
            quit: false,
        }
    }

    async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut inbox = self.inbox.take().context("UI loop already started")?;
        let mut events = spawn_event_reader();

        while !self.quit {
            terminal
                .draw(|frame| self.draw(frame))
                .context("Failed to draw frame")?;

            match next_message(&mut events, &mut inbox).await {
                Some(Message::Input(event)) => self.on_event(event),
                Some(Message::Lookup(response)) => self.on_response(response),
                None => break,
            }
        }

        Ok(())
    }

    fn on_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        match action_for(key, self.session.city()) {
            Some(Action::Quit) => self.quit = true,
            Some(Action::Edit(city)) => {
                let ticket = self.session.set_city(city);
                self.dispatch(ticket);
            }
            Some(Action::Search) => {
                if let Some(ticket) = self.session.submit_search() {
                    self.dispatch(ticket);
                }
            }
            None => {}
        }
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        let provider = Arc::clone(&self.provider);
        let responses = self.responses.clone();

        tokio::spawn(async move {
            let response = fetch_weather(provider.as_ref(), ticket).await;
            if responses.send(response).is_err() {
                debug!("UI loop gone, dropping lookup response");
            }
        });
    }

    fn on_response(&mut self, response: FetchResponse) {
        let city = response.city.clone();

        let transition = self.session.apply(response);
        match Notice::from_transition(&transition, &city) {
            Some(notice) => self.notice = Some(notice),
            None if matches!(transition, Transition::Populated) => self.notice = None,
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let screen = render(self.session.city(), self.session.view());

        let [title, input, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(format!("🌤 {}", screen.title)).bold().centered(),
            title,
        );
        draw_input(frame, &screen, input);
        draw_body(frame, &screen.body, body);
        frame.render_widget(self.status_line(), status);
    }

    fn status_line(&self) -> Paragraph<'static> {
        let line = match &self.notice {
            Some(notice) => {
                let color = match notice.kind {
                    NoticeKind::NotFound => Color::Yellow,
                    NoticeKind::Failure => Color::Red,
                };
                Line::from(Span::styled(notice.to_string(), Style::default().fg(color)))
            }
            None => Line::from("Enter: search   Ctrl-U: clear   Esc: quit").dark_gray(),
        };
        Paragraph::new(line)
    }
}

fn draw_input(frame: &mut Frame, screen: &Screen, area: Rect) {
    let text = match screen.placeholder() {
        Some(placeholder) => Line::from(placeholder).dark_gray(),
        None => Line::from(screen.input.clone()),
    };
    let block = Block::bordered().title(format!(" {} Search ", Asset::Search.glyph()));
    frame.render_widget(Paragraph::new(text).block(block), area);

    let typed = Span::raw(screen.input.as_str()).width() as u16;
    let x = area.x.saturating_add(1).saturating_add(typed);
    frame.set_cursor_position(Position::new(
        x.min(area.right().saturating_sub(2)),
        area.y + 1,
    ));
}

fn draw_body(frame: &mut Frame, body: &Body, area: Rect) {
    let block = Block::bordered();
    let paragraph = match body {
        Body::Card(card) => Paragraph::new(card_lines(card)),
        Body::Prompt(text) => {
            Paragraph::new(Line::from(format!("{} {text}", Asset::Search.glyph())).gray())
        }
    };
    frame.render_widget(paragraph.centered().block(block), area);
}

fn card_lines(card: &WeatherCard) -> Vec<Line<'static>> {
    vec![
        Line::from(card.location.clone()).bold(),
        Line::from(card.icon.glyph()),
        Line::from(card.temperature.clone()).bold().blue(),
        Line::default(),
        Line::from(format!(
            "{} {}  Humidity     {} {}  Wind",
            Asset::Humidity.glyph(),
            card.humidity,
            Asset::Wind.glyph(),
            card.wind
        )),
    ]
}

/// Blocking terminal reads on their own thread, forwarded to the UI loop.
fn spawn_event_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    rx
}
