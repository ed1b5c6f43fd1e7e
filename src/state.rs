use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::audio::AudioContext;
use crate::grid::Grid;
use crate::input::{InputState, KeyMap};
use crate::palette::Pen;

/// Engine state reachable from native script functions.
///
/// The engine holds one handle; every script environment holds another as
/// its back-reference.  Everything runs on the engine thread, and no borrow
/// is held across a call into Lua, so the `RefCell` never sees overlapping
/// mutable borrows.
pub type SharedState = Rc<RefCell<EngineState>>;

pub struct EngineState {
    pub grid: Grid,
    /// Colors applied by `setCell` and `print`.
    pub pen: Pen,
    pub input: InputState,
    pub keymap: KeyMap,
    /// Rolling frames-per-second measurement.
    pub fps: f32,
    pub running: bool,
    pub exit_code: i32,
    pub audio: AudioContext,
    /// Game directory; script-provided asset paths resolve against it.
    pub root: PathBuf,
}

impl EngineState {
    pub fn new(grid: Grid, root: PathBuf) -> Self {
        Self {
            grid,
            pen: Pen::default(),
            input: InputState::new(),
            keymap: KeyMap::new(),
            fps: 0.0,
            running: true,
            exit_code: 0,
            audio: AudioContext::new(),
            root,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    /// Stop the main loop at the top of its next iteration.
    pub fn quit(&mut self, exit_code: i32) {
        self.exit_code = exit_code;
        self.running = false;
    }
}
