pub mod config;

pub use config::{WindowConfig, WindowMode};

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, WindowAttributes};

/// Build the window attributes for `config` and report the physical surface
/// size the cell grid should be derived from.
///
/// # Windowed
/// Decorated, non-resizable window of `config.width × config.height`.
///
/// # Fullscreen
/// Exclusive fullscreen using the primary monitor's video mode whose pixel
/// area is closest to `config.width × config.height`.  Falls back to
/// `Borderless` when no monitor or video mode is available.
///
/// # Borderless
/// Borderless fullscreen on the primary monitor; the monitor's native
/// resolution becomes the surface size.
pub fn window_attributes(
    event_loop: &ActiveEventLoop,
    title: &str,
    config: &WindowConfig,
) -> (WindowAttributes, PhysicalSize<u32>) {
    let requested = PhysicalSize::new(config.width.max(1), config.height.max(1));
    let attributes = winit::window::Window::default_attributes()
        .with_title(title)
        .with_resizable(false);
    let monitor = event_loop.primary_monitor();

    match config.mode {
        WindowMode::Windowed => (attributes.with_inner_size(requested), requested),

        WindowMode::Fullscreen => {
            let target_area = requested.width as u64 * requested.height as u64;
            let best = monitor.as_ref().and_then(|m| {
                m.video_modes().min_by_key(|vm| {
                    let s = vm.size();
                    (s.width as u64 * s.height as u64).abs_diff(target_area)
                })
            });
            match best {
                Some(vm) => {
                    let size = vm.size();
                    (attributes.with_fullscreen(Some(Fullscreen::Exclusive(vm))), size)
                }
                None => borderless(attributes, monitor, requested),
            }
        }

        WindowMode::Borderless => borderless(attributes, monitor, requested),
    }
}

fn borderless(
    attributes: WindowAttributes,
    monitor: Option<winit::monitor::MonitorHandle>,
    fallback: PhysicalSize<u32>,
) -> (WindowAttributes, PhysicalSize<u32>) {
    let size = monitor.as_ref().map(|m| m.size()).unwrap_or(fallback);
    (attributes.with_fullscreen(Some(Fullscreen::Borderless(monitor))), size)
}

/// Number of whole cells that fit on a surface, at least one per axis.
pub fn grid_dimensions(surface: PhysicalSize<u32>, cell_w: u32, cell_h: u32) -> (usize, usize) {
    let w = surface.width / cell_w.max(1);
    let h = surface.height / cell_h.max(1);
    (w.max(1) as usize, h.max(1) as usize)
}
