/// Terminal front end: draws the pipeline's output as characters and drives
/// it from a frame loop
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wire3d_core::{FrameClock, FrameRenderer, FrameStats, Scene, Viewport};

pub mod canvas;
pub mod config;
pub mod fps;
pub mod library;

pub use canvas::{CharCanvas, DrawStyle};
pub use config::SceneConfig;
pub use fps::FpsMeter;
pub use library::ModelLibrary;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    renderer: FrameRenderer,
    canvas: CharCanvas,
    fps: FpsMeter,
    clock: FrameClock,
    frame_time: Duration,
    running: bool,
    paused: bool,
    last_stats: FrameStats,
}

impl TerminalApp {
    pub fn new(config: &SceneConfig, scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (width, height) = (width as u32, height as u32);

        // Cells are about twice as tall as they are wide; keep the viewport
        // close to square and centre it horizontally.
        let view_width = width.min(height * 2).max(1);
        let x_offset = (width - view_width.min(width)) as f32 / 2.0;

        let renderer = FrameRenderer::new(
            scene,
            config.camera(),
            Viewport::new(view_width, height),
            config.render_options(),
        );
        let canvas = CharCanvas::new(width as usize, height as usize, config.render.style)
            .with_x_offset(x_offset);

        Ok(Self {
            renderer,
            canvas,
            fps: FpsMeter::new(config.render.show_fps),
            clock: FrameClock::new(),
            frame_time: Duration::from_millis(1000 / u64::from(config.render.target_fps.max(1))),
            running: true,
            paused: false,
            last_stats: FrameStats::default(),
        })
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
        let start = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            let now_ms = start.elapsed().as_secs_f64() * 1000.0;
            let delta_ms = self.clock.delta(now_ms) as f32;
            self.fps.record_frame(delta_ms);

            let elapsed = if self.paused { 0.0 } else { delta_ms };
            self.last_stats = self.renderer.tick(elapsed, &mut self.canvas);
            self.present()?;

            // Frame timing
            let spent = frame_start.elapsed();
            if spent < self.frame_time {
                std::thread::sleep(self.frame_time - spent);
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Press {
                return Ok(());
            }
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('p') => {
                    self.fps.toggle();
                }
                KeyCode::Char('c') => {
                    let enabled = !self.renderer.options().cull_backfaces;
                    self.renderer.set_cull_backfaces(enabled);
                    log::info!("backface culling {}", if enabled { "on" } else { "off" });
                }
                KeyCode::Char('s') => {
                    self.canvas.set_style(self.canvas.style().next());
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Grey),
            Print(format!(
                "wire3d | {}/{} tris | {:?} | C=Cull S=Style P=FPS Space=Pause Q=Quit",
                self.last_stats.visible_triangles,
                self.last_stats.total_triangles,
                self.canvas.style(),
            )),
        )?;
        if self.fps.is_enabled() {
            let label = self.fps.label();
            let column = (self.canvas.width().saturating_sub(label.len())) as u16;
            queue!(
                stdout,
                cursor::MoveTo(column, 0),
                SetForegroundColor(self.fps.status().color()),
                Print(label),
            )?;
        }
        queue!(stdout, ResetColor)?;

        stdout.flush()?;
        Ok(())
    }
}
