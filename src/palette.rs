// ── Palette ─────────────────────────────────────────────────────────────────

/// One entry of the fixed 16-color VGA palette.
///
/// Cells can only ever hold a `Color`, so a cell's foreground and background
/// always index a valid palette slot.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Black = 0,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Brown,
    LightGray,
    DarkGray,
    LightBlue,
    LightGreen,
    LightCyan,
    LightRed,
    LightMagenta,
    Yellow,
    White,
}

impl Color {
    pub const COUNT: usize = 16;

    /// All palette entries in index order.
    pub const ALL: [Color; Color::COUNT] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Brown,
        Color::LightGray,
        Color::DarkGray,
        Color::LightBlue,
        Color::LightGreen,
        Color::LightCyan,
        Color::LightRed,
        Color::LightMagenta,
        Color::Yellow,
        Color::White,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Palette entry for `index`, or `None` outside `0..16`.
    pub fn from_index(index: i64) -> Option<Color> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Name of the global constant scripts use for this color.
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "BLACK",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Cyan => "CYAN",
            Color::Red => "RED",
            Color::Magenta => "MAGENTA",
            Color::Brown => "BROWN",
            Color::LightGray => "LIGHT_GRAY",
            Color::DarkGray => "DARK_GRAY",
            Color::LightBlue => "LIGHT_BLUE",
            Color::LightGreen => "LIGHT_GREEN",
            Color::LightCyan => "LIGHT_CYAN",
            Color::LightRed => "LIGHT_RED",
            Color::LightMagenta => "LIGHT_MAGENTA",
            Color::Yellow => "YELLOW",
            Color::White => "WHITE",
        }
    }

    /// sRGB value of this entry.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Black => [0x00, 0x00, 0x00],
            Color::Blue => [0x00, 0x00, 0xAA],
            Color::Green => [0x00, 0xAA, 0x00],
            Color::Cyan => [0x00, 0xAA, 0xAA],
            Color::Red => [0xAA, 0x00, 0x00],
            Color::Magenta => [0xAA, 0x00, 0xAA],
            Color::Brown => [0xAA, 0x55, 0x00],
            Color::LightGray => [0xAA, 0xAA, 0xAA],
            Color::DarkGray => [0x55, 0x55, 0x55],
            Color::LightBlue => [0x55, 0x55, 0xFF],
            Color::LightGreen => [0x55, 0xFF, 0x55],
            Color::LightCyan => [0x55, 0xFF, 0xFF],
            Color::LightRed => [0xFF, 0x55, 0x55],
            Color::LightMagenta => [0xFF, 0x55, 0xFF],
            Color::Yellow => [0xFF, 0xFF, 0x55],
            Color::White => [0xFF, 0xFF, 0xFF],
        }
    }
}

/// The whole palette as RGBA floats, ready for the grid shader's uniform
/// block.  With `linear` set, channels are converted from sRGB so an sRGB
/// render target reproduces the exact palette values.
pub fn palette_rgba(linear: bool) -> [[f32; 4]; Color::COUNT] {
    let mut out = [[0.0; 4]; Color::COUNT];
    for (slot, color) in out.iter_mut().zip(Color::ALL) {
        let [r, g, b] = color.rgb().map(|c| {
            let c = c as f32 / 255.0;
            if linear { srgb_to_linear(c) } else { c }
        });
        *slot = [r, g, b, 1.0];
    }
    out
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ── Pen ─────────────────────────────────────────────────────────────────────

/// The engine's current drawing colors, applied by `setCell` and `print`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pen {
    pub fg: Color,
    pub bg: Color,
}

impl Default for Pen {
    fn default() -> Self {
        Self { fg: Color::White, bg: Color::Black }
    }
}
