//! Lua scripting: building isolated environments for the game's entry
//! script, dispatching lifecycle callbacks, and swapping environments on
//! hot reload.

mod api;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use mlua::{Function, IntoLuaMulti, Lua, LuaOptions, StdLib, Table, Value};

use crate::error::{Error, Result};
use crate::state::SharedState;

/// Global table holding the capability surface and the game's callbacks.
pub const NAMESPACE: &str = "te";

/// Lifecycle callbacks a game may define on the `te` table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Callback {
    Load,
    Update,
    Draw,
    KeyPressed,
}

impl Callback {
    pub fn name(self) -> &'static str {
        match self {
            Callback::Load => "load",
            Callback::Update => "update",
            Callback::Draw => "draw",
            Callback::KeyPressed => "keypressed",
        }
    }
}

/// One interpreter with the engine API installed.
///
/// Environments never share globals; a reload builds a fresh one and the old
/// one is dropped only after the replacement loaded successfully.
pub struct ScriptEnv {
    lua: Lua,
}

impl ScriptEnv {
    fn new(state: &SharedState, root: &Path) -> mlua::Result<Self> {
        // No io/os/debug: scripts reach the outside world through `te` only.
        let libs = StdLib::TABLE
            | StdLib::STRING
            | StdLib::MATH
            | StdLib::UTF8
            | StdLib::COROUTINE
            | StdLib::PACKAGE;
        let lua = Lua::new_with(libs, LuaOptions::new())?;

        // `require` from the game directory is the only way to read files.
        let globals = lua.globals();
        globals.set("dofile", Value::Nil)?;
        globals.set("loadfile", Value::Nil)?;
        let package: Table = globals.get("package")?;
        package.set("path", format!("{0}/?.lua;{0}/?/init.lua", root.display()))?;
        package.set("cpath", "")?;

        api::register(&lua, state)?;
        Ok(Self { lua })
    }

    fn exec(&self, path: &Path, source: &[u8]) -> mlua::Result<()> {
        self.lua
            .load(source)
            .set_name(format!("@{}", path.display()))
            .exec()
    }

    /// Look up a callback at call time.  A missing `te` table or a
    /// non-function value counts as the callback being absent.
    pub fn callback(&self, callback: Callback) -> Option<Function> {
        let te: Table = self.lua.globals().get(NAMESPACE).ok()?;
        match te.get::<Value>(callback.name()).ok()? {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

/// Owns the live script environment for one game.
pub struct ScriptHost {
    entry: PathBuf,
    root: PathBuf,
    state: SharedState,
    env: Option<ScriptEnv>,
    /// Number of environments loaded successfully so far.
    generation: u64,
}

impl ScriptHost {
    pub fn new(entry: impl Into<PathBuf>, state: SharedState) -> Self {
        let entry = entry.into();
        let root = entry
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self { entry, root, state, env: None, generation: 0 }
    }

    /// Run the entry script for the first time, then `te.load`.  Failing to
    /// read or execute the script is fatal.
    pub fn start(&mut self) -> Result<()> {
        let env = self.build_environment()?;
        self.install(env);
        Ok(())
    }

    /// Rebuild the environment from the entry script on disk.
    ///
    /// On failure the error is logged and the previous environment stays in
    /// place untouched.  On success all audio streams stop, the new
    /// environment replaces the old one, and `te.load` runs again.
    pub fn reload(&mut self) -> bool {
        match self.build_environment() {
            Ok(env) => {
                self.state.borrow_mut().audio.stop_all();
                self.install(env);
                info!("reloaded {} (generation {})", self.entry.display(), self.generation);
                true
            }
            Err(err) => {
                error!("reload failed, keeping the previous script: {err}");
                false
            }
        }
    }

    fn build_environment(&self) -> Result<ScriptEnv> {
        let source = fs::read(&self.entry).map_err(|err| Error::io(&self.entry, err))?;
        let script_error = |source| Error::Script { path: self.entry.clone(), source };

        let env = ScriptEnv::new(&self.state, &self.root).map_err(script_error)?;
        env.exec(&self.entry, &source).map_err(script_error)?;
        Ok(env)
    }

    fn install(&mut self, env: ScriptEnv) {
        self.env = Some(env);
        self.generation += 1;
        debug!("script environment {} installed", self.generation);
        self.load();
    }

    // Each dispatcher returns false only when the callback raised an error.

    pub fn load(&self) -> bool {
        self.dispatch(Callback::Load, ())
    }

    pub fn update(&self, dt: f64) -> bool {
        self.dispatch(Callback::Update, dt)
    }

    pub fn draw(&self) -> bool {
        self.dispatch(Callback::Draw, ())
    }

    pub fn keypressed(&self, key: &str) -> bool {
        self.dispatch(Callback::KeyPressed, key)
    }

    /// Protected call into the script.  Errors are logged and swallowed so
    /// the frame loop keeps running.
    fn dispatch(&self, callback: Callback, args: impl IntoLuaMulti) -> bool {
        let Some(function) = self.env.as_ref().and_then(|env| env.callback(callback)) else {
            return true;
        };
        match function.call::<()>(args) {
            Ok(()) => true,
            Err(err) => {
                error!("failed calling {NAMESPACE}.{}: {err}", callback.name());
                false
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn environment(&self) -> Option<&ScriptEnv> {
        self.env.as_ref()
    }
}
