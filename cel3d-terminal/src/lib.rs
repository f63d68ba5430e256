/// Terminal driver: animation loop, input and frame output
use cel3d_core::config::AnimationConfig;
use cel3d_core::Renderer;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod display;

pub use display::TerminalDisplay;

/// Radians the camera turns per key press
const CAMERA_STEP: f64 = 0.05;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    renderer: Renderer,
    display: TerminalDisplay,
    spin: [f64; 3],
    camera_spin: [f64; 3],
    frame_interval: Duration,
    frame_limit: Option<u64>,
    frames: u64,
    running: bool,
    last_report: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(
        renderer: Renderer,
        animation: &AnimationConfig,
        frame_limit: Option<u64>,
        show_status: bool,
    ) -> Self {
        Self {
            renderer,
            display: TerminalDisplay::new(show_status),
            spin: animation.spin,
            camera_spin: animation.camera_spin,
            frame_interval: Duration::from_secs_f64(1.0 / animation.fps),
            frame_limit,
            frames: 0,
            running: true,
            last_report: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let result = with_alternate_screen(&mut stdout(), || self.main_loop());
        let restored = terminal::disable_raw_mode();

        log::info!("Stopped after {} frames", self.frames);
        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.render()?;
            self.update();

            self.frames += 1;
            if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
                self.running = false;
            }

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            } else {
                log::debug!("Frame took {:?}, over budget {:?}", elapsed, self.frame_interval);
            }

            let now = Instant::now();
            if (now - self.last_report).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_report).as_secs_f32();
                self.frame_count = 0;
                self.last_report = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind == KeyEventKind::Release {
                return Ok(());
            }
            self.handle_key(code);
        }
        Ok(())
    }

    /// Apply one key press; returns false for keys without a binding
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let step = CAMERA_STEP;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.renderer.rotate_camera(step, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.renderer.rotate_camera(-step, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.renderer.rotate_camera(0.0, -step, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.renderer.rotate_camera(0.0, step, 0.0),
            KeyCode::Char('e') => self.renderer.rotate_camera(0.0, 0.0, step),
            KeyCode::Char('r') => self.renderer.rotate_camera(0.0, 0.0, -step),
            _ => return false,
        }
        true
    }

    /// Advance every point and the camera by one frame's spin
    pub fn update(&mut self) {
        let [dx, dy, dz] = self.spin;
        for triangle in self.renderer.triangles_mut() {
            triangle.rotate(dx, dy, dz);
        }
        let [cx, cy, cz] = self.camera_spin;
        if cx != 0.0 || cy != 0.0 || cz != 0.0 {
            self.renderer.rotate_camera(cx, cy, cz);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (frame, stats) = self.renderer.render();

        let mut stdout = stdout();
        self.display.draw(&mut stdout, &frame, self.renderer.palette())?;
        self.display.draw_status(&mut stdout, &stats, self.fps)?;

        stdout.flush()?;
        Ok(())
    }
}

/// Run `body` on the alternate screen with the cursor hidden.
///
/// The screen is left again even when entering it or `body` failed.
fn with_alternate_screen<W, F>(out: &mut W, body: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce() -> io::Result<()>,
{
    let entered = execute!(out, terminal::EnterAlternateScreen, cursor::Hide);
    let result = entered.and_then(|()| body());
    let restored = execute!(out, terminal::LeaveAlternateScreen, cursor::Show);
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel3d_core::{Mesh, RenderConfig};

    /// Fails its first write, then records everything
    struct FlakyWriter {
        failed: bool,
        out: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::Other, "terminal gone"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn app() -> TerminalApp {
        let config = RenderConfig::default();
        let mut renderer = Renderer::new(&config).unwrap();
        renderer.extend(Mesh::unit_cube(1.0));
        TerminalApp::new(renderer, &config.animation, Some(1), false)
    }

    #[test]
    fn test_update_spins_points() {
        let mut app = app();
        app.update();
        app.update();
        let angle = app.renderer().triangles()[0].points()[0].angle();
        assert!((angle.x - 0.2).abs() < 1e-12);
        assert_eq!(angle.y, 0.0);
        assert!((angle.z - 0.2).abs() < 1e-12);
        assert_eq!(app.renderer().camera().rotation().x, 0.0);
    }

    #[test]
    fn test_keys_turn_camera_and_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Left));
        assert!((app.renderer().camera().rotation().y + CAMERA_STEP).abs() < 1e-12);
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.running);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_screen_restored_when_entering_fails() {
        let mut writer = FlakyWriter {
            failed: false,
            out: Vec::new(),
        };
        let mut ran = false;
        let result = with_alternate_screen(&mut writer, || {
            ran = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!ran);
        let text = String::from_utf8(writer.out).unwrap();
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.contains("\x1b[?25h"));
    }

    #[test]
    fn test_screen_restored_when_body_fails() {
        let mut out = Vec::new();
        let result = with_alternate_screen(&mut out, || {
            Err(io::Error::new(io::ErrorKind::Other, "render failed"))
        });

        assert_eq!(result.unwrap_err().to_string(), "render failed");
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?1049h"));
        assert!(text.ends_with("\x1b[?1049l\x1b[?25h"));
    }

    #[test]
    fn test_frame_interval_follows_fps() {
        assert_eq!(app().frame_interval, Duration::from_secs_f64(1.0 / 15.0));
    }
}
