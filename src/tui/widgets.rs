use crate::shell::{NoticeLevel, UiState};
use image::RgbImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Renders a bitmap with half-block characters, centred and aspect-correct
pub struct ImagePane<'a> {
    image: Option<&'a RgbImage>,
    placeholder: &'a str,
}

impl<'a> ImagePane<'a> {
    pub fn new(image: Option<&'a RgbImage>, placeholder: &'a str) -> Self {
        Self { image, placeholder }
    }
}

impl Widget for ImagePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(image) = self.image else {
            let x = area.x + (area.width.saturating_sub(self.placeholder.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            buf.set_stringn(x, y, self.placeholder, area.width as usize, Style::default());
            return;
        };

        let (img_w, img_h) = image.dimensions();
        if img_w == 0 || img_h == 0 {
            return;
        }

        // Each cell shows two vertical pixels
        let aspect = img_w as f64 / img_h as f64;
        let term_w = area.width as f64;
        let term_h = (area.height as u32 * 2) as f64;

        let (display_w, display_h) = if term_w / term_h > aspect {
            let h = term_h;
            ((h * aspect) as u16, (h / 2.0) as u16)
        } else {
            let w = term_w;
            (w as u16, (w / aspect / 2.0) as u16)
        };
        if display_w == 0 || display_h == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_w)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_h)) / 2;

        let x_scale = img_w as f64 / display_w as f64;
        let y_scale = img_h as f64 / (display_h as u32 * 2) as f64;

        for ty in 0..display_h {
            for tx in 0..display_w {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(sample(image, src_x, src_top));
                    cell.set_bg(sample(image, src_x, src_bottom));
                }
            }
        }
    }
}

fn sample(image: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Name prompt when one is open, otherwise the latest notice
pub struct MessageLine {
    text: String,
    style: Style,
}

impl MessageLine {
    pub fn from_ui(ui: &UiState) -> Self {
        let (text, style) = if let Some(prompt) = &ui.prompt {
            (
                format!("Enter the person's name: {}_", prompt.input),
                Style::default().fg(Color::Yellow),
            )
        } else if let Some(notice) = &ui.notice {
            let color = match notice.level {
                NoticeLevel::Info => Color::Cyan,
                NoticeLevel::Error => Color::Red,
            };
            (notice.message.clone(), Style::default().fg(color))
        } else {
            (String::new(), Style::default())
        };
        Self { text, style }
    }
}

impl Widget for MessageLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_stringn(area.x, area.y, &self.text, area.width as usize, self.style);
    }
}

/// Status bar: what is displayed plus the key bindings
pub struct StatusBar<'a> {
    status: &'a str,
    annotate: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(status: &'a str, annotate: bool) -> Self {
        Self { status, annotate }
    }

    fn text(&self) -> String {
        let mut msg = format!("{} | 'c' capture | 'r' recent | 'p' previous", self.status);
        if self.annotate {
            msg.push_str(" | name after capture");
        }
        msg.push_str(" | 'q' quit");
        msg
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }
        buf.set_stringn(area.x, area.y, self.text(), area.width as usize, style);
    }
}
