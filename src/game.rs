use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};

/// Entry script every game directory must contain.
pub const ENTRY_SCRIPT: &str = "main.lua";

const STARTER_SCRIPT: &str = r#"-- Called once after this file runs, and again after every hot reload.
function te.load()
  w, h = te.window.getDimensions()
  x, y = math.floor(w / 2), math.floor(h / 2)
end

function te.update(dt)
  if te.keyboard.isDown("left") then x = math.max(1, x - 1) end
  if te.keyboard.isDown("right") then x = math.min(w, x + 1) end
  if te.keyboard.isDown("up") then y = math.max(1, y - 1) end
  if te.keyboard.isDown("down") then y = math.min(h, y + 1) end
end

function te.draw()
  te.graphics.clear()
  te.graphics.setColor(LIGHT_GREEN, BLACK)
  te.graphics.print("Hello from te! Arrows move, escape quits.", 2, 2)
  te.graphics.setColor(YELLOW, BLUE)
  te.graphics.setCell(65, x, y)
  te.graphics.setColor(DARK_GRAY, BLACK)
  te.graphics.print("fps: " .. te.window.getFPS(), 2, h - 1)
end

function te.keypressed(key)
  if key == "escape" then
    te.event.quit(0)
  end
end
"#;

/// A validated game directory.
#[derive(Clone, Debug)]
pub struct GameDir {
    root: PathBuf,
}

impl GameDir {
    /// Check that `path` is a directory holding a `main.lua`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::NotADirectory(root));
        }
        if !root.join(ENTRY_SCRIPT).is_file() {
            return Err(Error::MissingEntryScript(root));
        }
        Ok(Self { root })
    }

    /// Scaffold a new game at `path`: a starter `main.lua` and a `conf.json`
    /// with default settings.  An existing `main.lua` is never overwritten.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let entry = root.join(ENTRY_SCRIPT);
        if entry.exists() {
            return Err(Error::AlreadyExists(entry));
        }
        fs::create_dir_all(&root).map_err(|err| Error::io(&root, err))?;
        fs::write(&entry, STARTER_SCRIPT).map_err(|err| Error::io(&entry, err))?;

        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, Config::default().to_json())
                .map_err(|err| Error::io(&config_path, err))?;
        }

        info!("created new game in {}", root.display());
        info!("add a 16x16-cell CP437 glyph atlas as {} before running it", root.join("font.png").display());
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_script(&self) -> PathBuf {
        self.root.join(ENTRY_SCRIPT)
    }

    /// Resolve a game-relative asset path.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn read_asset(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.resolve(relative);
        fs::read(&path).map_err(|err| Error::io(path, err))
    }
}
