use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const ACTIVE_TOGGLE_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

pub(crate) const LABEL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const VALUE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod picker {
    use super::*;

    pub(crate) const CENTER_STYLE: Style = BASE_STYLE.bg(Color::DarkGray);

    pub(crate) const SELECTED_STYLE: Style = Style::new()
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD);

    pub(crate) const MOVING_STYLE: Style = Style::new().fg(Color::LightBlue);

    pub(crate) const FOCUS_BORDER_STYLE: Style = Style::new().fg(Color::LightYellow);
}

pub(crate) mod adjust {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const ACTIVE_FIELD_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);

    pub(crate) const CHOSEN_STYLE: Style = ACTIVE_TOGGLE_STYLE;
}
