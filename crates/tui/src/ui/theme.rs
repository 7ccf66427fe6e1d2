use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(10, 12, 18),
            panel: Color::Rgb(22, 26, 36),
            surface_bright: Color::Rgb(36, 42, 56),
            text: Color::Rgb(226, 228, 234),
            text_muted: Color::Rgb(160, 166, 180),
            dim: Color::Rgb(110, 116, 130),
            accent: Color::Rgb(234, 108, 38),
            positive: Color::Rgb(72, 190, 120),
            negative: Color::Rgb(226, 92, 92),
            warning: Color::Rgb(230, 180, 70),
            error: Color::Rgb(214, 70, 70),
            border: Color::Rgb(52, 58, 72),
            border_focused: Color::Rgb(234, 108, 38),
        }
    }
}
