//! Drawing surface abstraction
//!
//! A small slice of the 2D canvas API: state setters, path building,
//! fill/stroke and text. The browser build draws through `Canvas2d`; tests
//! and the headless binary use `RecordingSurface`.

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// Vertical text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
        }
    }
}

pub trait Surface {
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str, line_width: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_layout(&mut self, align: TextAlign, baseline: TextBaseline);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    /// Full circle subpath
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Rendered width of `text` in the current font
    fn measure_text(&mut self, text: &str) -> f64;
}

/// One recorded call, with the style in effect for fills and text
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    ClosePath,
    Fill {
        color: String,
    },
    Stroke {
        color: String,
        width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

/// Headless surface that keeps a log of draw calls.
///
/// Text width is estimated as `char_width` per character.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub char_width: f64,
    fill: String,
    stroke: String,
    line_width: f64,
    font: String,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            char_width: 7.0,
            fill: "#000000".into(),
            stroke: "#000000".into(),
            line_width: 1.0,
            font: "10px sans-serif".into(),
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Every string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }

    /// Full-canvas rectangles (background clear and overlays)
    pub fn full_rects(&self, width: f64, height: f64) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { x, y, w, h, color }
                    if *x == 0.0 && *y == 0.0 && *w == width && *h == height =>
                {
                    Some(color.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn set_fill_style(&mut self, color: &str) {
        self.fill = color.to_string();
    }

    fn set_stroke_style(&mut self, color: &str, line_width: f64) {
        self.stroke = color.to_string();
        self.line_width = line_width;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    fn set_text_layout(&mut self, align: TextAlign, baseline: TextBaseline) {
        self.align = align;
        self.baseline = baseline;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            w,
            h,
            color: self.fill.clone(),
        });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ops.push(DrawOp::QuadTo(cpx, cpy, x, y));
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ops.push(DrawOp::Circle { x, y, radius });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill {
            color: self.fill.clone(),
        });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke {
            color: self.stroke.clone(),
            width: self.line_width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
            color: self.fill.clone(),
            align: self.align,
            baseline: self.baseline,
        });
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_captures_style() {
        let mut s = RecordingSurface::new();
        s.set_fill_style("#ff0000");
        s.fill_rect(0.0, 0.0, 10.0, 10.0);
        s.set_font("bold 48px Arial");
        s.set_text_layout(TextAlign::Center, TextBaseline::Middle);
        s.fill_text("PAUSED", 5.0, 5.0);

        assert_eq!(s.full_rects(10.0, 10.0), vec!["#ff0000"]);
        match &s.ops[1] {
            DrawOp::Text {
                font, color, align, ..
            } => {
                assert_eq!(font, "bold 48px Arial");
                assert_eq!(color, "#ff0000");
                assert_eq!(*align, TextAlign::Center);
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(s.texts(), vec!["PAUSED"]);
    }

    #[test]
    fn test_measure_by_chars() {
        let mut s = RecordingSurface::new();
        assert_eq!(s.measure_text("abcd"), 28.0);
        assert_eq!(s.measure_text(""), 0.0);
    }
}
