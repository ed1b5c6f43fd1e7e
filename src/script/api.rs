//! Native functions exposed to scripts under the `te` table.
//!
//! Every function validates its own arguments.  Wrong argument types raise a
//! Lua error that the callback boundary catches; values that are merely out
//! of range (off-grid coordinates, unknown palette indices or key names) are
//! ignored.

use log::{debug, info, warn};
use mlua::{Function, Lua, MultiValue, Table, Value};

use crate::grid::Cell;
use crate::logging::LUA_TARGET;
use crate::palette::{Color, Pen};
use crate::state::SharedState;

use super::NAMESPACE;

/// Largest magnitude accepted for a script coordinate.  Anything beyond is
/// far off-grid anyway and clamping keeps column arithmetic from overflowing.
const COORD_LIMIT: f64 = i32::MAX as f64;

/// Convert a 1-based script coordinate to a 0-based cell index.
pub(super) fn cell_coord(coord: f64) -> Option<i64> {
    if !coord.is_finite() {
        return None;
    }
    Some((coord - 1.0).floor().clamp(-COORD_LIMIT, COORD_LIMIT) as i64)
}

/// Accept an integer, or a float with an exact integer value.  Anything else
/// raises, the way `luaL_checkinteger` does.
fn integer(value: Value, what: &str) -> mlua::Result<i64> {
    match value {
        Value::Integer(n) => Ok(n),
        Value::Number(n) if n.fract() == 0.0 => Ok(n as i64),
        Value::Number(n) => Err(mlua::Error::runtime(format!("{what}: number has no integer representation ({n})"))),
        other => Err(mlua::Error::runtime(format!("{what}: integer expected, got {}", other.type_name()))),
    }
}

/// Install the `te` table, the palette constants and the logging `print`.
pub(crate) fn register(lua: &Lua, state: &SharedState) -> mlua::Result<()> {
    let te = lua.create_table()?;
    te.set("graphics", graphics(lua, state)?)?;
    te.set("window", window(lua, state)?)?;
    te.set("keyboard", keyboard(lua, state)?)?;
    te.set("event", event(lua, state)?)?;
    te.set("audio", audio(lua, state)?)?;

    let globals = lua.globals();
    globals.set(NAMESPACE, te)?;
    for color in Color::ALL {
        globals.set(color.name(), color.index())?;
    }
    globals.set("print", print(lua)?)?;
    Ok(())
}

// ── te.graphics ─────────────────────────────────────────────────────────────

fn graphics(lua: &Lua, state: &SharedState) -> mlua::Result<Table> {
    let table = lua.create_table()?;

    // te.graphics.setCell(glyph, x, y), all 1-based
    let st = state.clone();
    table.set(
        "setCell",
        lua.create_function(move |_, (glyph, x, y): (Value, f64, f64)| {
            let glyph = integer(glyph, "setCell glyph")?;
            if !(1..=256).contains(&glyph) {
                return Ok(());
            }
            let (Some(x), Some(y)) = (cell_coord(x), cell_coord(y)) else {
                return Ok(());
            };
            let mut st = st.borrow_mut();
            if st.grid.in_bounds(x, y) {
                let cell = Cell::with_pen((glyph - 1) as u8, st.pen);
                st.grid.set(x as usize, y as usize, cell);
            }
            Ok(())
        })?,
    )?;

    // te.graphics.print(text, x, y)
    let st = state.clone();
    table.set(
        "print",
        lua.create_function(move |_, (text, x, y): (mlua::String, f64, f64)| {
            let (Some(x), Some(y)) = (cell_coord(x), cell_coord(y)) else {
                return Ok(());
            };
            let mut st = st.borrow_mut();
            let pen = st.pen;
            st.grid.print_text(x, y, &*text.as_bytes(), pen);
            Ok(())
        })?,
    )?;

    // te.graphics.clear()
    let st = state.clone();
    table.set(
        "clear",
        lua.create_function(move |_, ()| {
            st.borrow_mut().grid.clear();
            Ok(())
        })?,
    )?;

    // te.graphics.setColor(fg, bg)
    let st = state.clone();
    table.set(
        "setColor",
        lua.create_function(move |_, (fg, bg): (Value, Value)| {
            let (fg, bg) = (integer(fg, "setColor fg")?, integer(bg, "setColor bg")?);
            match (Color::from_index(fg), Color::from_index(bg)) {
                (Some(fg), Some(bg)) => st.borrow_mut().pen = Pen { fg, bg },
                _ => debug!("setColor ignored invalid palette index ({fg}, {bg})"),
            }
            Ok(())
        })?,
    )?;

    Ok(table)
}

// ── te.window ───────────────────────────────────────────────────────────────

fn window(lua: &Lua, state: &SharedState) -> mlua::Result<Table> {
    let table = lua.create_table()?;

    // w, h = te.window.getDimensions()
    let st = state.clone();
    table.set(
        "getDimensions",
        lua.create_function(move |_, ()| {
            let st = st.borrow();
            Ok((st.grid.width() as i64, st.grid.height() as i64))
        })?,
    )?;

    let st = state.clone();
    table.set(
        "getFPS",
        lua.create_function(move |_, ()| Ok(st.borrow().fps.round() as i64))?,
    )?;

    Ok(table)
}

// ── te.keyboard ─────────────────────────────────────────────────────────────

fn keyboard(lua: &Lua, state: &SharedState) -> mlua::Result<Table> {
    let table = lua.create_table()?;

    // te.keyboard.isDown(key)
    let st = state.clone();
    table.set(
        "isDown",
        lua.create_function(move |_, name: String| {
            let st = st.borrow();
            match st.keymap.code(&name) {
                Some(code) => Ok(st.input.is_key_held(code)),
                None => {
                    warn!("unknown key: {name}");
                    Ok(false)
                }
            }
        })?,
    )?;

    Ok(table)
}

// ── te.event ────────────────────────────────────────────────────────────────

fn event(lua: &Lua, state: &SharedState) -> mlua::Result<Table> {
    let table = lua.create_table()?;

    // te.event.quit(exit_code)
    let st = state.clone();
    table.set(
        "quit",
        lua.create_function(move |_, code: Option<i64>| {
            let code = code.unwrap_or(0).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
            st.borrow_mut().quit(code);
            Ok(())
        })?,
    )?;

    Ok(table)
}

// ── te.audio ────────────────────────────────────────────────────────────────

fn audio(lua: &Lua, state: &SharedState) -> mlua::Result<Table> {
    let table = lua.create_table()?;

    // te.audio.play(path, loop) -> bool
    let st = state.clone();
    table.set(
        "play",
        lua.create_function(move |_, (path, looping): (String, Option<bool>)| {
            let mut st = st.borrow_mut();
            let path = st.root.join(path);
            Ok(st.audio.play(&path, looping.unwrap_or(false)))
        })?,
    )?;

    // te.audio.stop()
    let st = state.clone();
    table.set(
        "stop",
        lua.create_function(move |_, ()| {
            st.borrow_mut().audio.stop_all();
            Ok(())
        })?,
    )?;

    Ok(table)
}

// ── print ───────────────────────────────────────────────────────────────────

/// Replacement for Lua's `print` that goes through the engine log.
fn print(lua: &Lua) -> mlua::Result<Function> {
    lua.create_function(|lua, args: MultiValue| {
        let line = print_line(lua, args)?;
        info!(target: LUA_TARGET, "{line}");
        Ok(())
    })
}

/// Join `args` the way Lua's `print` does: `tostring` each, separated by tabs.
fn print_line(lua: &Lua, args: MultiValue) -> mlua::Result<String> {
    let tostring: Function = lua.globals().get("tostring")?;
    let mut line = String::new();
    for (i, value) in args.into_iter().enumerate() {
        if i > 0 {
            line.push('\t');
        }
        let text: mlua::String = tostring.call(value)?;
        line.push_str(&text.to_string_lossy());
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(lua: &Lua, code: &str) -> String {
        let args: MultiValue = lua.load(code).eval().unwrap();
        print_line(lua, args).unwrap()
    }

    #[test]
    fn print_line_joins_tostring_values_with_tabs() {
        let lua = Lua::new();
        assert_eq!(line(&lua, "return 'hello', 1, nil, true"), "hello\t1\tnil\ttrue");
        assert_eq!(line(&lua, "return 2.5, false"), "2.5\tfalse");
        assert_eq!(line(&lua, "return"), "");
    }

    #[test]
    fn print_line_honors_tostring_metamethods() {
        let lua = Lua::new();
        let text = line(&lua, "return setmetatable({}, { __tostring = function() return 'point' end })");
        assert_eq!(text, "point");
    }

    #[test]
    fn integers_accept_whole_floats_only() {
        assert_eq!(integer(Value::Integer(65), "glyph").unwrap(), 65);
        assert_eq!(integer(Value::Number(65.0), "glyph").unwrap(), 65);
        assert!(integer(Value::Number(1.5), "glyph").is_err());
        assert!(integer(Value::Number(f64::NAN), "glyph").is_err());
        assert!(integer(Value::Boolean(true), "glyph").is_err());
    }
}
