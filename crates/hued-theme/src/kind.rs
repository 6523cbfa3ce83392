//! Theme kinds — the two bar layouts a document can declare.

use std::fmt;

/// Which bar layout a theme uses.
///
/// The document spells this as the `style` field. Anything other than a
/// case-insensitive `"ps1"` (including a missing field) means [`ThemeKind::Pc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeKind {
    /// One ramp, two-tone light/dark border.
    #[default]
    Pc,
    /// Two ramps (left/right) blended by fill level, four-corner border.
    Ps1,
}

impl ThemeKind {
    /// Interpret a document `style` string.
    #[must_use]
    pub fn from_style(style: &str) -> Self {
        if style.trim().eq_ignore_ascii_case("ps1") {
            Self::Ps1
        } else {
            Self::Pc
        }
    }

    /// The canonical `style` string written back on export.
    #[must_use]
    pub const fn as_style(self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Ps1 => "ps1",
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_style())
    }
}
