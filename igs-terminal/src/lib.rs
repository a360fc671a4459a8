/// Terminal front-end for the IGS viewing pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use igs_core::{AxisAngles, Scene};
use log::{info, warn};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logger;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Pan step as a fraction of the window width
const PAN_FRACTION: f64 = 0.05;
const ZOOM_STEP: f64 = 1.1;
const ROTATE_STEP: f64 = 15.0;
const LOG_LINES: usize = 4;

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    width: u16,
    height: u16,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(scene, width, height))
    }

    pub fn with_size(scene: Scene, width: u16, height: u16) -> Self {
        Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            width,
            height,
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(width, height) => self.resize(width, height),
                    _ => {}
                }
            }

            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.renderer.resize(width as usize, height as usize);
        self.dirty = true;
    }

    /// Apply one key press to the scene
    pub fn handle_key(&mut self, key: KeyEvent) {
        let KeyEvent {
            code, modifiers, kind, ..
        } = key;
        if kind != KeyEventKind::Press {
            return;
        }

        let step = self.scene.window().bounds.width().abs() * PAN_FRACTION;
        let result = match code {
            KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                Ok(())
            }
            KeyCode::Left => self.scene.translate_window(-step, 0.0),
            KeyCode::Right => self.scene.translate_window(step, 0.0),
            KeyCode::Up => self.scene.translate_window(0.0, step),
            KeyCode::Down => self.scene.translate_window(0.0, -step),
            KeyCode::Char('+') | KeyCode::Char('=') => self.scene.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.scene.zoom(ZOOM_STEP),
            KeyCode::Char('q') => self.scene.rotate_window(ROTATE_STEP),
            KeyCode::Char('e') => self.scene.rotate_window(-ROTATE_STEP),
            KeyCode::Char('i') => self.scene.rotate_window_3d(AxisAngles::new(ROTATE_STEP, 0.0, 0.0)),
            KeyCode::Char('k') => self.scene.rotate_window_3d(AxisAngles::new(-ROTATE_STEP, 0.0, 0.0)),
            KeyCode::Char('j') => self.scene.rotate_window_3d(AxisAngles::new(0.0, ROTATE_STEP, 0.0)),
            KeyCode::Char('l') => self.scene.rotate_window_3d(AxisAngles::new(0.0, -ROTATE_STEP, 0.0)),
            KeyCode::Char('u') => self.scene.rotate_window_3d(AxisAngles::new(0.0, 0.0, ROTATE_STEP)),
            KeyCode::Char('o') => self.scene.rotate_window_3d(AxisAngles::new(0.0, 0.0, -ROTATE_STEP)),
            // The camera looks down -VPN
            KeyCode::Char('w') => self.scene.translate_window_3d(0.0, 0.0, -step),
            KeyCode::Char('s') => self.scene.translate_window_3d(0.0, 0.0, step),
            KeyCode::Char('a') => self.scene.translate_window_3d(-step, 0.0, 0.0),
            KeyCode::Char('d') => self.scene.translate_window_3d(step, 0.0, 0.0),
            KeyCode::Char('r') => self.scene.translate_window_3d(0.0, step, 0.0),
            KeyCode::Char('f') => self.scene.translate_window_3d(0.0, -step, 0.0),
            KeyCode::Char('c') => self
                .scene
                .switch_clipping_algorithm()
                .map(|algorithm| info!("line clipping: {algorithm}")),
            KeyCode::Char('p') => self
                .scene
                .switch_lens_projection()
                .map(|mode| info!("projection: {mode}")),
            _ => return,
        };

        if let Err(err) = result {
            warn!("{err}");
        }
        self.dirty = true;
    }

    fn status_line(&self) -> String {
        format!(
            "IGS | {} | {} | objects {}/{} | FPS {:.0} | arrows pan +/- zoom q/e rotate ijkluo 3D wasdrf camera c clip p lens Esc quit",
            self.scene.clipping_algorithm(),
            self.scene.projection_mode(),
            self.scene.visible_objects().count(),
            self.scene.objects().len(),
            self.fps,
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_scene(&self.scene);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        let width = self.width as usize;
        let clip = |text: String| text.chars().take(width).collect::<String>();

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(clip(self.status_line())),
            ResetColor
        )?;

        let lines = logger::panel().recent(LOG_LINES);
        let top = self.height.saturating_sub(lines.len() as u16);
        for (row, line) in lines.into_iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, top + row as u16),
                SetForegroundColor(Color::DarkGrey),
                Print(clip(line)),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
