use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, stats_display::*};

mod board_display;
mod stats_display;

pub(crate) mod color {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};
    use stackfall_engine::ShapeKind;

    use super::color;

    /// Fill colour of each shape kind, indexed by its discriminant.
    const SHAPE_COLORS: [Color; ShapeKind::LEN] = [
        Color::Rgb(0, 255, 255),
        Color::Rgb(255, 255, 0),
        Color::Rgb(0, 255, 0),
        color::RED,
        Color::Rgb(0, 0, 255),
        Color::Rgb(255, 127, 0),
        Color::Rgb(255, 0, 255),
    ];

    pub const DEFAULT: Style = Style::new().fg(color::WHITE).bg(color::BLACK);
    pub const EMPTY_DOT: Style = Style::new().fg(color::GRAY).bg(color::BLACK);

    pub const fn block(kind: ShapeKind) -> Style {
        let fill = SHAPE_COLORS[kind as usize];
        Style::new().fg(fill).bg(fill)
    }
}

/// Returns the columns and rows `block` takes from the area it wraps.
fn block_margin(block: Option<&BlockWidget>) -> (u16, u16) {
    let outer = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(outer, |block| block.inner(outer));
    (outer.width - inner.width, outer.height - inner.height)
}
