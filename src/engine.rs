use std::cell::Ref;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::game::GameDir;
use crate::grid::Grid;
use crate::reload::ReloadWatcher;
use crate::renderer::{Renderer, atlas};
use crate::script::ScriptHost;
use crate::state::{EngineState, SharedState};
use crate::window::{grid_dimensions, window_attributes};

/// Frames averaged for the FPS readout.
pub const FPS_WINDOW: usize = 60;

/// Rolling average of recent frame times.
#[derive(Debug, Default)]
pub struct FrameClock {
    samples: VecDeque<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of `dt` seconds and return the current FPS.
    pub fn tick(&mut self, dt: f64) -> f32 {
        if dt > 0.0 {
            if self.samples.len() == FPS_WINDOW {
                self.samples.pop_front();
            }
            self.samples.push_back(dt);
        }
        self.fps()
    }

    pub fn fps(&self) -> f32 {
        let total: f64 = self.samples.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        (self.samples.len() as f64 / total) as f32
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// One running game: its state, its script host and its reload watcher.
///
/// The engine never touches the window or the GPU; [`run`] drives it from
/// the platform event loop and hands the grid to the renderer after each
/// [`Engine::frame`].
pub struct Engine {
    state: SharedState,
    scripts: ScriptHost,
    watcher: ReloadWatcher,
    clock: FrameClock,
}

impl Engine {
    /// Allocate a `width × height` grid, run the game's entry script and
    /// call `te.load`.  A script that fails to run here is fatal.
    pub fn new(game: &GameDir, (width, height): (usize, usize), watcher: ReloadWatcher) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let state = EngineState::new(grid, game.root().to_path_buf()).into_shared();

        let mut scripts = ScriptHost::new(game.entry_script(), Rc::clone(&state));
        scripts.start()?;
        info!("started {} on a {width}x{height} grid", game.entry_script().display());

        Ok(Self { state, scripts, watcher, clock: FrameClock::new() })
    }

    /// Run one frame of game logic: queued key presses in arrival order, the
    /// hot-reload check, then `te.update(dt)` and `te.draw()`.
    pub fn frame(&mut self, dt: f64) {
        let fps = self.clock.tick(dt);
        self.state.borrow_mut().fps = fps;

        let presses = self.state.borrow_mut().input.take_pressed();
        for code in presses {
            let name = self.state.borrow().keymap.name(code);
            match name {
                Some(name) => {
                    self.scripts.keypressed(name);
                }
                None => debug!("dropping unmapped key {code:?}"),
            }
        }

        // Frame boundary: no script call is in flight here.
        if self.watcher.poll() {
            self.scripts.reload();
        }

        self.scripts.update(dt);
        self.scripts.draw();
    }

    pub fn key_down(&mut self, code: KeyCode) {
        self.state.borrow_mut().input.press(code);
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.state.borrow_mut().input.release(code);
    }

    /// Release every held key; their release events will not arrive.
    pub fn focus_lost(&mut self) {
        self.state.borrow_mut().input.release_all();
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn exit_code(&self) -> i32 {
        self.state.borrow().exit_code
    }

    pub fn state(&self) -> Ref<'_, EngineState> {
        self.state.borrow()
    }

    pub fn scripts(&self) -> &ScriptHost {
        &self.scripts
    }

    pub fn watcher(&self) -> &ReloadWatcher {
        &self.watcher
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct Runtime {
    renderer: Renderer,
    engine: Engine,
}

struct App {
    game: GameDir,
    config: Config,
    runtime: Option<Runtime>,
    /// Fatal error raised inside the event loop, reported once it returns.
    error: Option<Error>,
    last_instant: Option<Instant>,
}

impl App {
    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Runtime> {
        let (cell_w, cell_h) = (self.config.cell_width, self.config.cell_height);

        let atlas_path = self.game.resolve(&self.config.font);
        let atlas_png = self.game.read_asset(&self.config.font)?;
        let atlas_image = atlas::decode(&atlas_png, &atlas_path, cell_w, cell_h)?;

        let (attributes, surface_size) =
            window_attributes(event_loop, &self.config.title, &self.config.window);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let grid_size = grid_dimensions(surface_size, cell_w, cell_h);
        let renderer = pollster::block_on(Renderer::new(
            window,
            &atlas_image,
            (cell_w, cell_h),
            grid_size,
        ))?;

        let watcher = if self.config.hot_reload {
            ReloadWatcher::watch(self.game.entry_script())
        } else {
            ReloadWatcher::inactive()
        };
        let engine = Engine::new(&self.game, grid_size, watcher)?;

        Ok(Runtime { renderer, engine })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.runtime.is_some() || self.error.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(runtime) => self.runtime = Some(runtime),
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(runtime) = self.runtime.as_ref() {
            runtime.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(Runtime { renderer, engine }) = self.runtime.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => renderer.resize(size),

            WindowEvent::Focused(false) => engine.focus_lost(),

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => match state {
                ElementState::Pressed => engine.key_down(code),
                ElementState::Released => engine.key_up(code),
            },

            WindowEvent::RedrawRequested => {
                // `quit` takes effect here, before any further script call.
                if !engine.is_running() {
                    event_loop.exit();
                    return;
                }

                let now = Instant::now();
                let dt = self
                    .last_instant
                    .map(|prev| now.duration_since(prev).as_secs_f64())
                    .unwrap_or(0.0);
                self.last_instant = Some(now);

                engine.frame(dt);

                let result = renderer.render_frame(&engine.state().grid);
                match result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = renderer.window.inner_size();
                        renderer.resize(size);
                    }
                    Err(err) => warn!("render error: {err}"),
                }
            }

            _ => {}
        }
    }
}

/// Open a window for `game` and run it until it quits or the window closes.
/// Returns the exit code the game passed to `te.event.quit`, or 0.
pub fn run(game: GameDir, config: Config) -> Result<i32> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App { game, config, runtime: None, error: None, last_instant: None };
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.error {
        return Err(err);
    }
    Ok(app.runtime.map(|runtime| runtime.engine.exit_code()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_averages_recent_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.fps(), 0.0);
        for _ in 0..10 {
            clock.tick(0.5);
        }
        assert!((clock.fps() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn fps_window_drops_old_frames() {
        let mut clock = FrameClock::new();
        for _ in 0..FPS_WINDOW {
            clock.tick(1.0);
        }
        for _ in 0..FPS_WINDOW {
            clock.tick(0.01);
        }
        assert!((clock.fps() - 100.0).abs() < 0.5);
    }

    #[test]
    fn zero_dt_is_not_sampled() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.fps(), 0.0);
    }
}
