use ratatui::style::Color;

pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    pub step_badge: Color,
    pub playing: Color,
    /// Nodes already substituted by an earlier step
    pub resolved: Color,
    pub keyword_literal: Color,
    pub string_literal: Color,
    pub number_literal: Color,
    /// Identifiers followed by `(`
    pub callee: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub bar_bg: Color,
    pub substituted_bg: Color, // Spans replaced by their value
    pub retry: Color,          // Branch waiting to be retried
}

pub const DEFAULT_THEME: Theme = Theme {
    text: Color::Rgb(205, 214, 244),
    muted: Color::Rgb(127, 132, 156),
    error: Color::Rgb(243, 139, 168),
    step_badge: Color::Rgb(116, 199, 236), // Sapphire
    playing: Color::Rgb(250, 179, 135),    // Peach
    resolved: Color::Rgb(148, 226, 213),   // Teal
    keyword_literal: Color::Rgb(203, 166, 247),
    string_literal: Color::Rgb(166, 227, 161),
    number_literal: Color::Rgb(250, 179, 135),
    callee: Color::Rgb(249, 226, 175),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(88, 91, 112),
    bar_bg: Color::Rgb(49, 50, 68),
    substituted_bg: Color::Rgb(69, 71, 90),
    retry: Color::Rgb(245, 194, 231),
};
