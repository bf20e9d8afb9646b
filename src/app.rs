use crate::adjust::{Adjust, AdjustInput, AdjustOutput, AdjustState};
use crate::convert::{CalendarDate, CalendarSystem};
use crate::help::Help;
use crate::panel::{ResultPanel, PANEL_HEIGHT};
use crate::picker::{ColumnKind, DatePicker, Picker, Step, Ymd, PICKER_WIDTH};
use crate::project::ResultProjector;
use crate::settings::{AdjustmentSettings, Adjustments};
use crate::theme::{ACTIVE_TOGGLE_STYLE, BASE_STYLE, HINT_STYLE, LABEL_STYLE};
use crossterm::event::{
    poll, read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use time::{Date, OffsetDateTime};

/// Interval between animation frames
const FRAME: Duration = Duration::from_millis(33);

/// How long to wait for input when nothing is pending.  This also bounds
/// how late a change of the local date is noticed.
const IDLE_POLL: Duration = Duration::from_secs(60);

const PANEL_WIDTH: u16 = 50;

const FOOTER: &str = "t: calendar   a: adjust   c: convert   ?: help   q: quit";

#[derive(Debug)]
pub(crate) struct App {
    picker: DatePicker,
    projector: ResultProjector,
    settings: AdjustmentSettings,
    state: AppState,
    drag: Option<Drag>,
}

impl App {
    /// Starts the picker at `start` or, if that is `None`, at `today` in the
    /// given input calendar
    pub(crate) fn new(
        today: Date,
        system: CalendarSystem,
        start: Option<Ymd>,
        settings: AdjustmentSettings,
    ) -> App {
        let position = start.or_else(|| today_in(today, system, settings.current()));
        let mut app = App {
            picker: DatePicker::new(system, position),
            projector: ResultProjector::new(today),
            settings,
            state: AppState::Picking,
            drag: None,
        };
        app.convert();
        app
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            if let Some(today) = local_today() {
                self.set_today(today);
            }
            self.draw(&mut terminal)?;
            if poll(self.poll_timeout(Instant::now()))? {
                self.handle_event(read()?, Instant::now())?;
            }
            self.update(Instant::now());
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        if self.picker.is_animating() {
            FRAME
        } else if let Some(deadline) = self.picker.next_deadline() {
            deadline.saturating_duration_since(now)
        } else {
            IDLE_POLL
        }
    }

    /// Advances the picker's motion by one frame and runs any due
    /// transitions
    fn update(&mut self, now: Instant) {
        self.picker.advance_motion();
        if self.picker.tick(now) {
            self.convert();
        }
    }

    fn handle_event(&mut self, event: Event, now: Instant) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code, now) {
                self.beep()?;
            }
        } else if let Event::Mouse(mouse) = event {
            self.handle_mouse(mouse, now);
        }
        // else: Redraw on resize
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode, now: Instant) -> bool {
        match &mut self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                    self.picker.focus_previous();
                    true
                }
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                    self.picker.focus_next();
                    true
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.picker.step(self.picker.focus(), Step::Previous, now);
                    true
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.picker.step(self.picker.focus(), Step::Next, now);
                    true
                }
                KeyCode::PageUp => {
                    let kind = self.picker.focus();
                    let rows = self.picker.half_page(kind);
                    self.picker.scroll_by(kind, -rows, now);
                    true
                }
                KeyCode::PageDown => {
                    let kind = self.picker.focus();
                    let rows = self.picker.half_page(kind);
                    self.picker.scroll_by(kind, rows, now);
                    true
                }
                KeyCode::Char('t') => {
                    self.toggle_calendar();
                    true
                }
                KeyCode::Char('a') => {
                    self.state = AppState::Adjusting(AdjustState::new(self.settings.current()));
                    true
                }
                KeyCode::Char('c') | KeyCode::Enter => {
                    self.convert();
                    true
                }
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset();
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Adjusting(state) => {
                if matches!(key, KeyCode::Char('q' | 'a') | KeyCode::Esc) {
                    tracing::debug!("Discarding adjustment edits");
                    self.state = AppState::Picking;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(AdjustInput::Negative),
                        KeyCode::Char('+') => state.handle_input(AdjustInput::Positive),
                        KeyCode::Char(c @ '0'..='9') => {
                            let d = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                            match d {
                                Some(d) => state.handle_input(AdjustInput::Digit(d)),
                                None => AdjustOutput::Invalid,
                            }
                        }
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(AdjustInput::Backspace)
                        }
                        KeyCode::Tab | KeyCode::Down => state.handle_input(AdjustInput::NextField),
                        KeyCode::BackTab | KeyCode::Up => {
                            state.handle_input(AdjustInput::PreviousField)
                        }
                        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                            state.handle_input(AdjustInput::Toggle)
                        }
                        KeyCode::Enter => state.handle_input(AdjustInput::Enter),
                        _ => AdjustOutput::Invalid,
                    };
                    match output {
                        AdjustOutput::Ok => true,
                        AdjustOutput::Invalid => false,
                        AdjustOutput::Apply(adjustments) => {
                            self.state = AppState::Picking;
                            self.apply(adjustments);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.state != AppState::Picking {
            return;
        }
        let MouseEvent {
            kind, column, row, ..
        } = mouse;
        match kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(col) = self.picker.column_at(column, row) {
                    let step = if kind == MouseEventKind::ScrollUp {
                        Step::Previous
                    } else {
                        Step::Next
                    };
                    self.picker.set_focus(col);
                    self.picker.step(col, step, now);
                }
            }
            MouseEventKind::Down(button @ (MouseButton::Left | MouseButton::Right)) => {
                if let Some(col) = self.picker.column_at(column, row) {
                    self.picker.set_focus(col);
                    self.drag = Some(Drag {
                        column: col,
                        button,
                        start_row: row,
                        last_row: row,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag.as_mut().filter(|d| d.button == MouseButton::Left) {
                    // Dragging the items down reveals earlier ones
                    let rows = i32::from(drag.last_row) - i32::from(row);
                    drag.last_row = row;
                    if rows != 0 {
                        self.picker.scroll_by(drag.column, rows, now);
                    }
                }
            }
            MouseEventKind::Up(button) => {
                if let Some(drag) = self.drag.take() {
                    if drag.button == MouseButton::Right && button == MouseButton::Right {
                        let delta = i32::from(row) - i32::from(drag.start_row);
                        self.picker.swipe(drag.column, delta, now);
                    }
                }
            }
            _ => (),
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Recomputes the result panel from the committed picker values
    fn convert(&mut self) {
        self.projector.refresh(
            self.picker.selection(),
            self.picker.system(),
            self.settings.current(),
        );
    }

    fn toggle_calendar(&mut self) {
        let system = self.picker.system().other();
        let position = today_in(self.projector.today(), system, self.settings.current());
        self.picker.rebuild(system, position);
        self.convert();
    }

    fn reset(&mut self) {
        let system = self.picker.system();
        let position = today_in(self.projector.today(), system, self.settings.current());
        self.picker.center_on(position);
        self.convert();
    }

    /// Picks up a change of the local date, e.g. after midnight
    fn set_today(&mut self, today: Date) {
        if self.projector.set_today(today) {
            self.convert();
        }
    }

    fn apply(&mut self, adjustments: Adjustments) {
        self.settings.apply(adjustments);
        self.convert();
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let toggle = |system: CalendarSystem| {
            let style = if self.picker.system() == system {
                ACTIVE_TOGGLE_STYLE
            } else {
                BASE_STYLE
            };
            Span::styled(format!(" {system} "), style)
        };
        Line::from_iter([
            Span::styled("Input ", LABEL_STYLE),
            toggle(CalendarSystem::Gregorian),
            Span::styled(" ", BASE_STYLE),
            toggle(CalendarSystem::Hijri),
        ])
        .centered()
        .render(area, buf);
    }
}

fn local_today() -> Option<Date> {
    match OffsetDateTime::now_local() {
        Ok(now) => Some(now.date()),
        Err(e) => {
            tracing::debug!("Failed to determine local date: {e}");
            None
        }
    }
}

/// Today's date in the given calendar
fn today_in(today: Date, system: CalendarSystem, adjustments: Adjustments) -> Option<Ymd> {
    let today = CalendarDate::Gregorian(today);
    let date = match system {
        CalendarSystem::Gregorian => today,
        CalendarSystem::Hijri => today.counterpart(adjustments).ok()?,
    };
    Some(date.ymd())
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [header_area, _, picker_area, panel_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(PANEL_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_header(header_area, buf);
        let [picker_area] = Layout::horizontal([PICKER_WIDTH])
            .flex(Flex::Center)
            .areas(picker_area);
        Picker.render(picker_area, buf, &mut self.picker);
        let [panel_area] = Layout::horizontal([PANEL_WIDTH])
            .flex(Flex::Center)
            .areas(panel_area);
        ResultPanel::new(self.projector.output(), self.picker.system().other())
            .render(panel_area, buf);
        Line::styled(FOOTER, HINT_STYLE)
            .centered()
            .render(footer_area, buf);
        match &mut self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Adjusting(state) => Adjust.render(area, buf, state),
            AppState::Picking | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Adjusting(AdjustState),
    Quitting,
}

/// A mouse button held down over a column
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Drag {
    column: ColumnKind,
    button: MouseButton,
    start_row: u16,
    last_row: u16,
}
