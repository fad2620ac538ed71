use crate::config::SceneConfig;
use crate::error::Result;
use crate::graphics::Framebuffer;
use crate::input::TouchTracker;
use crate::renderer::SphereLineRenderer;
use crate::state::AppState;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Instant;

/// Rotation, in touch pixels per frame, applied by the arrow keys
const ARROW_NUDGE: f64 = 8.0;

/// Opacity of the overlay drawn over a paused scene
const PAUSE_DIM: f64 = 150.0 / 255.0;

const TEXT_COLOR: [f64; 3] = [1.0, 1.0, 1.0];

/// 3D line sphere widget
pub struct SphereWidget {
    renderer: SphereLineRenderer,
    touch: TouchTracker,
    framebuffer: Framebuffer,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Is the user currently dragging for rotation?
    dragging_rotation: bool,
}

impl SphereWidget {
    /// Creates the widget for a `width` x `height` cell surface
    pub fn new(config: &SceneConfig, width: usize, height: usize) -> Result<Self> {
        let mut renderer = SphereLineRenderer::new(config)?;
        renderer.on_surface_changed(width, height)?;
        renderer.step();
        Ok(SphereWidget {
            renderer,
            touch: TouchTracker::new(config.cell_pixels, config.cell_aspect),
            framebuffer: Framebuffer::new(width, height),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            dragging_rotation: false,
        })
    }

    /// Handle terminal events for the sphere widget
    pub fn event(&mut self, event: &Event, data: &mut AppState) {
        match event {
            Event::Key(key_event) => self.key(key_event, data),
            Event::Mouse(mouse_event) => {
                if !data.paused {
                    self.mouse(mouse_event);
                }
            }
            Event::Resize(cols, rows) => self.resize(usize::from(*cols), usize::from(*rows)),
            _ => {}
        }
    }

    fn key(&mut self, key_event: &KeyEvent, data: &mut AppState) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                data.running = false;
            }
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => {
                data.running = false;
            }
            KeyCode::Char('d' | 'D') => {
                data.debug = !data.debug;
            }
            KeyCode::Char('p' | 'P') => {
                data.paused = !data.paused;
                // Drop any drag that was in progress
                self.dragging_rotation = false;
                self.touch.release();
            }
            KeyCode::Char('l' | 'L') => {
                data.show_light = !data.show_light;
            }
            _ if data.paused => {}
            KeyCode::Char('w' | 'W') => {
                data.style = data.style.toggled();
            }
            KeyCode::Char('r' | 'R') => {
                if let Err(e) = self.renderer.reset() {
                    log::warn!("reset failed: {e}");
                }
            }
            KeyCode::Char(' ') => self.renderer.stop(),
            KeyCode::Char('+' | '=') => self.zoom(self.touch.scroll(true)),
            KeyCode::Char('-' | '_') => self.zoom(self.touch.scroll(false)),
            KeyCode::Left => self.renderer.set_deltas(-ARROW_NUDGE, 0.0),
            KeyCode::Right => self.renderer.set_deltas(ARROW_NUDGE, 0.0),
            KeyCode::Up => self.renderer.set_deltas(0.0, -ARROW_NUDGE),
            KeyCode::Down => self.renderer.set_deltas(0.0, ARROW_NUDGE),
            _ => {}
        }
    }

    fn mouse(&mut self, mouse_event: &MouseEvent) {
        let x = f64::from(mouse_event.column);
        let y = f64::from(mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.touch.press(x, y);
                self.dragging_rotation = true;
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.touch.press_pinch(x, y);
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging_rotation => {
                let (dx, dy) = self.touch.drag(x, y);
                log::debug!("dx: {dx}");
                log::debug!("dy: {dy}");
                self.renderer.set_dx(dx);
                self.renderer.set_dy(dy);
            }
            MouseEventKind::Drag(MouseButton::Right) if self.touch.is_pinching() => {
                if let Some(mult) = self.touch.pinch(x, y) {
                    self.zoom(mult);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.dragging_rotation = false;
            }
            MouseEventKind::Up(MouseButton::Right) => {
                self.touch.release();
            }
            MouseEventKind::ScrollUp => self.zoom(self.touch.scroll(true)),
            MouseEventKind::ScrollDown => self.zoom(self.touch.scroll(false)),
            _ => {}
        }
    }

    fn zoom(&mut self, mult: f64) {
        if let Err(e) = self.renderer.zoom(mult) {
            log::warn!("ignoring zoom: {e}");
        }
    }

    /// Adapts the projection and framebuffer to a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        match self.renderer.on_surface_changed(width, height) {
            Ok(()) => {
                log::debug!("resized to {width}x{height}");
                self.framebuffer.resize(width, height);
            }
            Err(e) => log::warn!("keeping previous size: {e}"),
        }
    }

    /// Advances the scene by one frame unless paused
    pub fn update(&mut self, data: &AppState) {
        if !data.paused {
            self.renderer.step();
        }
    }

    /// Paint the sphere widget
    pub fn paint(&mut self, data: &AppState) -> &Framebuffer {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.renderer
            .draw_frame(&mut self.framebuffer, data.style, data.show_light);

        if data.debug {
            self.draw_debug(data);
        }

        if data.paused {
            self.framebuffer.dim(PAUSE_DIM);
            let text = "Paused";
            let x = self.framebuffer.width().saturating_sub(text.len()) / 2;
            let y = self.framebuffer.height() / 2;
            self.framebuffer.put_str(x, y, text, TEXT_COLOR);
        }

        &self.framebuffer
    }

    fn draw_debug(&mut self, data: &AppState) {
        let lighting = self.renderer.lighting();
        let (angle_x, angle_y) = lighting.angles();
        let (dx, dy) = self.renderer.deltas();
        let light = lighting.light_pos_in_world_space();
        let sphere = self.renderer.sphere();

        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Angle X: {angle_x:.2}, Angle Y: {angle_y:.2}"),
            format!("Touch dx: {dx:.2}, dy: {dy:.2}"),
            format!("Light: ({:.2}, {:.2}, {:.2})", light[0], light[1], light[2]),
            format!("FPS: {:.2}", self.fps),
            format!("Zoom: {:.2}", self.renderer.zoom_level()),
            format!(
                "Sphere: r={:.2}, step={:.1} deg, {} points ({}x{}, {:?})",
                sphere.radius(),
                sphere.step(),
                sphere.point_count(),
                sphere.rings(),
                sphere.ring_len(),
                data.style
            ),
        ];
        for (row, line) in lines.iter().enumerate() {
            self.framebuffer.put_str(1, row, line, TEXT_COLOR);
        }
    }
}
