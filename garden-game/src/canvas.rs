//! Drawing surface abstraction used by the render loop.

/// The 2D primitives the garden needs. Coordinates are CSS pixels.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn clear(&mut self, width: f64, height: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Fill a rectangle with a top-to-bottom two-stop gradient.
    fn fill_vertical_gradient(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        top: &str,
        bottom: &str,
    );
    /// Fill a disc with a radial gradient from `color` to transparent.
    fn fill_radial_glow(&mut self, x: f64, y: f64, radius: f64, color: &str);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64);
    /// Stroke an open path with round caps.
    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64);
    /// Draw a glyph centred on `(x, y)`.
    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64);
    /// Draw a loaded image asset into the given box.
    fn draw_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64);
}

/// One recorded call against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Clear {
        width: f64,
        height: f64,
    },
    Alpha(f64),
    Translate(f64, f64),
    Scale(f64, f64),
    VerticalGradient {
        width: f64,
        height: f64,
        top: String,
        bottom: String,
    },
    RadialGlow {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    StrokeCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
        width: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: String,
        width: f64,
    },
    Glyph {
        glyph: String,
        x: f64,
        y: f64,
        size: f64,
    },
    Image {
        path: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Canvas that records every call, for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Glyphs drawn so far, in order.
    #[must_use]
    pub fn glyphs(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Glyph { glyph, .. } => Some(glyph.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Image paths drawn so far, in order.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Image { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| predicate(cmd)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn fill_vertical_gradient(
        &mut self,
        _x: f64,
        _y: f64,
        width: f64,
        height: f64,
        top: &str,
        bottom: &str,
    ) {
        self.commands.push(DrawCommand::VerticalGradient {
            width,
            height,
            top: top.to_string(),
            bottom: bottom.to_string(),
        });
    }

    fn fill_radial_glow(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.commands.push(DrawCommand::RadialGlow {
            x,
            y,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            x,
            y,
            radius,
            color: color.to_string(),
        });
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            x,
            y,
            radius,
            color: color.to_string(),
            width,
        });
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color: color.to_string(),
            width,
        });
    }

    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64) {
        self.commands.push(DrawCommand::Glyph {
            glyph: glyph.to_string(),
            x,
            y,
            size,
        });
    }

    fn draw_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Image {
            path: path.to_string(),
            x,
            y,
            width,
            height,
        });
    }
}
