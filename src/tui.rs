use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::{DefaultTerminal, Frame};

use crate::error::Result;
use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const BAR_STYLE: Style = Style::new().fg(Color::Rgb(90, 150, 230));

/// Format an amount as a colored Span. Credits (negative costs) show in red.
pub fn money_span(amount: f64) -> Span<'static> {
    let style = if amount < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(money(amount), style)
}

pub enum ViewAction {
    Continue,
    Close,
}

pub trait View {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ViewAction;
}

/// Owns the terminal for the lifetime of a view and restores it on drop.
struct TerminalSession {
    terminal: DefaultTerminal,
}

impl TerminalSession {
    fn start() -> Self {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));
        Self {
            terminal: ratatui::init(),
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Route one terminal event to `view`. Only key presses reach it; Ctrl-C always closes.
fn dispatch(view: &mut dyn View, event: Event) -> ViewAction {
    let Event::Key(key) = event else {
        return ViewAction::Continue;
    };
    if key.kind != KeyEventKind::Press {
        return ViewAction::Continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return ViewAction::Close;
    }
    view.handle_key(key.code)
}

/// Draw `view` and feed it key presses until it asks to close.
pub fn run_view(view: &mut dyn View) -> Result<()> {
    let mut session = TerminalSession::start();
    loop {
        session.terminal.draw(|frame| view.draw(frame))?;
        if let ViewAction::Close = dispatch(view, event::read()?) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyCode>,
    }

    impl View for Recorder {
        fn draw(&mut self, _frame: &mut Frame) {}

        fn handle_key(&mut self, code: KeyCode) -> ViewAction {
            self.keys.push(code);
            if code == KeyCode::Char('q') {
                ViewAction::Close
            } else {
                ViewAction::Continue
            }
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_dispatch_forwards_presses() {
        let mut view = Recorder::default();
        assert!(matches!(dispatch(&mut view, press(KeyCode::Down)), ViewAction::Continue));
        assert!(matches!(dispatch(&mut view, press(KeyCode::Char('q'))), ViewAction::Close));
        assert_eq!(view.keys, vec![KeyCode::Down, KeyCode::Char('q')]);
    }

    #[test]
    fn test_dispatch_ignores_releases_and_other_events() {
        let mut view = Recorder::default();
        let release = Event::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)
        });
        assert!(matches!(dispatch(&mut view, release), ViewAction::Continue));
        assert!(matches!(dispatch(&mut view, Event::Resize(80, 24)), ViewAction::Continue));
        assert!(view.keys.is_empty());
    }

    #[test]
    fn test_dispatch_ctrl_c_closes_without_reaching_view() {
        let mut view = Recorder::default();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(dispatch(&mut view, ctrl_c), ViewAction::Close));
        assert!(view.keys.is_empty());
    }

    #[test]
    fn test_money_span_colors_by_sign() {
        assert_eq!(money_span(-5.0).style, AMOUNT_NEG_STYLE);
        assert_eq!(money_span(5.0).style, AMOUNT_POS_STYLE);
        assert_eq!(money_span(1234.5).content, "R$ 1.234,50");
    }
}
