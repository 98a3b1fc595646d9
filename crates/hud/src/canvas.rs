//! Drawing surfaces for overlay labels.

use overlook_model::{Rgba, Vec2};

/// Anything labels can be drawn onto. Coordinates are pixels with the origin
/// at the top-left corner.
pub trait Canvas {
    fn size(&self) -> Vec2;
    fn draw_text(&mut self, at: Vec2, text: &str, color: Rgba);
}

/// One line of text drawn on a [`TextCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub at: Vec2,
    pub text: String,
    pub color: Rgba,
}

/// Canvas that records what was drawn, for headless output and tests.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    size: Vec2,
    drawn: Vec<DrawnText>,
}

impl TextCanvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            drawn: Vec::new(),
        }
    }

    /// Drawn lines, top to bottom then left to right.
    pub fn lines(&self) -> Vec<&DrawnText> {
        let mut lines: Vec<&DrawnText> = self.drawn.iter().collect();
        lines.sort_by(|a, b| {
            a.at.y
                .total_cmp(&b.at.y)
                .then(a.at.x.total_cmp(&b.at.x))
                .then_with(|| a.text.cmp(&b.text))
        });
        lines
    }

    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }

    pub fn clear(&mut self) {
        self.drawn.clear();
    }

    /// Plain-text dump of the lines anchored inside the canvas, one per row.
    pub fn to_text(&self) -> String {
        let size = self.size();
        let mut out = String::new();
        for line in self.lines() {
            if line.at.x < 0.0 || line.at.y < 0.0 || line.at.x > size.x || line.at.y > size.y {
                continue;
            }
            out.push_str(&format!(
                "({:>5.0}, {:>5.0}) {} {}\n",
                line.at.x,
                line.at.y,
                line.color.to_hex(),
                line.text
            ));
        }
        out
    }
}

impl Canvas for TextCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn draw_text(&mut self, at: Vec2, text: &str, color: Rgba) {
        self.drawn.push(DrawnText {
            at,
            text: text.to_string(),
            color,
        });
    }
}
