use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

#[derive(Default)]
pub struct SetStyle(Style);
#[derive(Default)]
pub struct NoStyle;

/// A block of preformatted lines, such as ASCII art, that keeps its internal alignment and is
/// centred as a whole in the area it is given.
///
/// Only the cells under characters are touched, so whatever was drawn before shows around the
/// text. With `ignore_whitespace` it also shows through spaces.
#[derive(Debug, Default)]
pub struct MultiLine<U, T: ToString> {
    lines: Vec<T>,
    line_padding: u16,
    ignore_whitespace: bool,
    style: U,
}

impl<T> MultiLine<NoStyle, T>
where
    T: ToString,
{
    pub fn new(lines: Vec<T>) -> Self {
        MultiLine { lines, line_padding: 0, ignore_whitespace: false, style: NoStyle }
    }

    pub fn style(self, style: Style) -> MultiLine<SetStyle, T> {
        MultiLine {
            lines: self.lines,
            line_padding: self.line_padding,
            ignore_whitespace: self.ignore_whitespace,
            style: SetStyle(style),
        }
    }
}

impl<U, T> MultiLine<U, T>
where
    T: ToString,
{
    pub fn line_padding(self, line_padding: u16) -> Self {
        Self { line_padding, ..self }
    }

    pub fn ignore_whitespace(self, ignore_whitespace: bool) -> Self {
        Self { ignore_whitespace, ..self }
    }

    /// Rows the block needs, padding included.
    pub fn height(&self) -> u16 {
        let lines = self.lines.len() as u16;
        lines + lines.saturating_sub(1) * self.line_padding
    }

    pub fn width(&self) -> u16 {
        self.lines.iter().map(|line| line.to_string().chars().count()).max().unwrap_or(0) as u16
    }

    fn render_lines(self, style: Style, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        let width = self.width().min(area.width);
        let height = self.height().min(area.height);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;

        for (index, line) in self.lines.into_iter().enumerate() {
            let offset = index as u16 * (1 + self.line_padding);
            if offset >= height {
                break;
            }
            for (column, c) in line.to_string().chars().take(width as usize).enumerate() {
                if self.ignore_whitespace && c.is_whitespace() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x + column as u16, y + offset)) {
                    cell.set_char(c).set_style(style);
                }
            }
        }
    }
}

impl<T: ToString> Widget for MultiLine<SetStyle, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.style.0;
        self.render_lines(style, area, buf);
    }
}

impl<T: ToString> Widget for MultiLine<NoStyle, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_lines(Style::default(), area, buf);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_block_is_centred_as_a_whole() {
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        MultiLine::new(vec!["ab", "abcd"]).render(area, &mut buf);

        assert_eq!(buf, Buffer::with_lines(["        ", "  ab    ", "  abcd  ", "        "]));
    }

    #[test]
    fn test_padding_and_style() {
        let area = Rect::new(0, 0, 1, 3);
        let mut buf = Buffer::empty(area);
        let widget = MultiLine::new(vec!["x", "y"]).line_padding(1);
        assert_eq!(widget.height(), 3);
        widget.style(Style::default().fg(Color::Red)).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "x");
        assert_eq!(buf[(0, 2)].symbol(), "y");
        assert_eq!(buf[(0, 2)].fg, Color::Red);
    }

    #[test]
    fn test_whitespace_shows_what_is_below() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::with_lines(["###"]);
        MultiLine::new(vec!["a b"]).ignore_whitespace(true).render(area, &mut buf);
        assert_eq!(buf, Buffer::with_lines(["a#b"]));

        MultiLine::new(vec!["a b"]).render(area, &mut buf);
        assert_eq!(buf, Buffer::with_lines(["a b"]));
    }

    #[test]
    fn test_lines_beyond_area_are_dropped() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        MultiLine::new(vec!["top", "bottom"]).render(area, &mut buf);

        assert_eq!(buf, Buffer::with_lines(["to"]));
    }
}
