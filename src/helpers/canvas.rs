//! Append-only drawing surface for a single page.
//!
//! Coordinates are millimetres from the top-left corner of the page, the way
//! the layout is designed. Conversion to PDF user space happens when the
//! document is encoded.

/// Background shade used for filled cells, as 0-255 RGB.
pub const FILL_SHADE: (u8, u8, u8) = (210, 210, 210);

/// Horizontal inset for left and right aligned text.
pub const TEXT_INSET: f32 = 1.5;

/// Offset from a cell's vertical centre to the text baseline.
pub const BASELINE_OFFSET: f32 = 2.0;

const RECT_NUDGE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    LineWidth(f32),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
    },
    /// `y` is the baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        align: Align,
        style: FontStyle,
        size: f32,
    },
}

/// Position and size of a cell. `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Cell {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CellOptions {
    pub align: Align,
    pub fill: bool,
    pub border: bool,
    pub font_style: FontStyle,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            align: Align::Left,
            fill: false,
            border: true,
            font_style: FontStyle::Normal,
        }
    }
}

impl CellOptions {
    pub fn aligned(align: Align) -> Self {
        Self {
            align,
            ..Self::default()
        }
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }
}

/// One physical page: the employee it belongs to and what was drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub employee: String,
    commands: Vec<DrawCommand>,
    font_size: f32,
}

impl Page {
    pub fn new(employee: impl Into<String>) -> Self {
        Self {
            employee: employee.into(),
            commands: Vec::new(),
            font_size: 16.0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            paint,
        });
    }

    /// Places `text` with its baseline at `y`, anchored at `x` per `align`.
    pub fn text(&mut self, text: &str, x: f32, y: f32, align: Align, style: FontStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            align,
            style,
            size: self.font_size,
        });
    }

    /// Draws a table cell whose bottom edge sits at `cell.y`.
    ///
    /// The fill is painted before the border so the outline stays visible.
    /// The font style is always taken from `options`; nothing carries over
    /// from the previous cell.
    pub fn draw_cell(&mut self, cell: Cell, text: &str, options: &CellOptions) {
        let top = cell.y - cell.height + RECT_NUDGE;

        if options.fill {
            self.rect(cell.x, top, cell.width, cell.height, Paint::Fill);
        }
        if options.border {
            self.rect(cell.x, top, cell.width, cell.height, Paint::Stroke);
        }

        let anchor = match options.align {
            Align::Left => cell.x + TEXT_INSET,
            Align::Center => cell.x + cell.width / 2.0,
            Align::Right => cell.x + cell.width - TEXT_INSET,
        };
        let baseline = cell.y - cell.height / 2.0 + BASELINE_OFFSET;

        self.text(text, anchor, baseline, options.align, options.font_style);
    }
}

/// Width of `text` in 1/1000 em for the standard Helvetica faces.
pub fn text_width(text: &str, style: FontStyle) -> u32 {
    let table = match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        FontStyle::Normal | FontStyle::Italic => &HELVETICA,
    };

    text.chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum()
}

// AFM advance widths, ' ' through '~'.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filled_cell_paints_before_border() {
        let mut page = Page::new("Jane Doe");
        page.set_font_size(9.0);
        page.draw_cell(
            Cell::new(10.0, 40.0, 20.0, 7.0),
            "Date",
            &CellOptions::aligned(Align::Center)
                .fill(true)
                .style(FontStyle::Bold),
        );

        let commands = page.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::Rect { paint: Paint::Fill, .. }));
        assert!(matches!(commands[1], DrawCommand::Rect { paint: Paint::Stroke, .. }));
        assert_eq!(
            commands[2],
            DrawCommand::Text {
                text: "Date".to_string(),
                x: 20.0,
                y: 38.5,
                align: Align::Center,
                style: FontStyle::Bold,
                size: 9.0,
            }
        );
    }

    #[test]
    fn borderless_cell_draws_only_text() {
        let mut page = Page::new("Jane Doe");
        page.draw_cell(
            Cell::new(10.0, 40.0, 20.0, 7.0),
            "",
            &CellOptions::default().border(false),
        );
        assert_eq!(page.commands().len(), 1);
    }

    #[test]
    fn left_and_right_text_is_inset() {
        let mut page = Page::new("Jane Doe");
        page.draw_cell(Cell::new(10.0, 40.0, 20.0, 7.0), "a", &CellOptions::default());
        page.draw_cell(
            Cell::new(10.0, 40.0, 20.0, 7.0),
            "b",
            &CellOptions::aligned(Align::Right),
        );

        let xs: Vec<f32> = page
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![11.5, 28.5]);
    }

    #[test]
    fn rect_top_is_derived_from_bottom_edge() {
        let mut page = Page::new("Jane Doe");
        page.draw_cell(Cell::new(0.0, 10.0, 5.0, 4.0), "", &CellOptions::default());
        match page.commands()[0] {
            DrawCommand::Rect { y, height, .. } => {
                assert!((y - 6.1).abs() < 1e-5);
                assert_eq!(height, 4.0);
            }
            ref other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bold_text_is_wider() {
        assert_eq!(text_width("Date", FontStyle::Normal), 722 + 556 + 278 + 556);
        assert!(text_width("Date", FontStyle::Bold) > text_width("Date", FontStyle::Normal));
        assert_eq!(text_width("é", FontStyle::Normal), 556);
    }
}
