/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use igs_core::normalize::from_clip_space;
use igs_core::{Display, ObjectKind, Scene, SceneObject, Viewport};
use nalgebra::Point2;
use std::io::Write;

const POINT_CHAR: char = '@';
const BORDER_CHAR: char = '.';

/// Character-cell renderer for the visible display geometry of a scene
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    viewport: Viewport,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            viewport: Viewport::new(width as f64, height as f64),
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.viewport.resize(width as f64, height as f64);
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Draw the clip region border, then every visible object
    pub fn render_scene(&mut self, scene: &Scene) {
        let clip = scene.clip_window();
        let corners = clip.corners().map(|c| from_clip_space(&c));
        for i in 0..corners.len() {
            self.draw_line(&corners[i], &corners[(i + 1) % corners.len()], BORDER_CHAR);
        }

        for object in scene.visible_objects() {
            self.render_object(object);
        }
    }

    fn render_object(&mut self, object: &SceneObject) {
        let character = kind_char(object.kind());
        if let (ObjectKind::Point, Display::Flat { vertices, .. }) = (object.kind(), object.display()) {
            if let Some(p) = vertices.first() {
                let p = self.viewport.to_screen(p);
                self.plot(p.x.floor() as i64, p.y.floor() as i64, POINT_CHAR);
            }
            return;
        }
        for segment in object.display_lines() {
            self.draw_line(&segment.start, &segment.end, character);
        }
    }

    /// Bresenham line between two display-space points
    fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, character: char) {
        let a = self.viewport.to_screen(from);
        let b = self.viewport.to_screen(to);
        let (mut x0, mut y0) = (a.x.floor() as i64, a.y.floor() as i64);
        let (x1, y1) = (b.x.floor() as i64, b.y.floor() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, character);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, character: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.char_buffer[y as usize * self.width + x as usize] = character;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    BORDER_CHAR => Color::DarkGrey,
                    POINT_CHAR => Color::Yellow,
                    '#' => Color::Cyan,
                    '*' => Color::Green,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn kind_char(kind: ObjectKind) -> char {
    match kind {
        ObjectKind::Point => POINT_CHAR,
        ObjectKind::Line | ObjectKind::Wireframe => '+',
        ObjectKind::Curve => '*',
        ObjectKind::Surface | ObjectKind::Object3D => '#',
    }
}
