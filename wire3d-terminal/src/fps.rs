/// Frame-rate overlay state
use crossterm::style::Color;

/// How healthy the frame rate is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpsStatus {
    Good,
    Medium,
    Bad,
}

impl FpsStatus {
    pub fn from_fps(fps: f32) -> Self {
        if fps >= 55.0 {
            FpsStatus::Good
        } else if fps >= 30.0 {
            FpsStatus::Medium
        } else {
            FpsStatus::Bad
        }
    }

    pub fn color(self) -> Color {
        match self {
            FpsStatus::Good => Color::Green,
            FpsStatus::Medium => Color::Yellow,
            FpsStatus::Bad => Color::Red,
        }
    }
}

/// Averages frame times over windows of at least one second
#[derive(Debug, Clone)]
pub struct FpsMeter {
    enabled: bool,
    fps: f32,
    frames: u32,
    window_ms: f32,
}

impl FpsMeter {
    const WINDOW_MS: f32 = 1000.0;

    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fps: 0.0,
            frames: 0,
            window_ms: 0.0,
        }
    }

    pub fn record_frame(&mut self, frame_ms: f32) {
        self.frames += 1;
        self.window_ms += frame_ms;
        if self.window_ms >= Self::WINDOW_MS {
            self.fps = self.frames as f32 * 1000.0 / self.window_ms;
            self.frames = 0;
            self.window_ms = 0.0;
        }
    }

    pub fn status(&self) -> FpsStatus {
        FpsStatus::from_fps(self.fps)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn label(&self) -> String {
        format!("FPS: {:.1}", self.fps)
    }
}
