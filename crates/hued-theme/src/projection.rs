//! Theme projection — everything the renderer needs for one bar.
//!
//! [`project`] flattens a record plus one bar value into a
//! [`RenderableTheme`] with every border color filled in. It never fails:
//! missing borders take defaults, a missing or mismatched value becomes an
//! all-black ramp.

use hued_color::HexColor;

use crate::record::{Borders, ThemeRecord};
use crate::value::BarValue;

/// Default PC light border.
pub const PC_BORDER_LIGHT: &str = "#ffffff";
/// Default PC dark border.
pub const PC_BORDER_DARK: &str = "#404040";

/// The four PS1 border corners, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corners {
    pub top_left: HexColor,
    pub top_right: HexColor,
    pub bottom_right: HexColor,
    pub bottom_left: HexColor,
}

impl Default for Corners {
    fn default() -> Self {
        Self {
            top_left: HexColor::black(),
            top_right: HexColor::black(),
            bottom_right: HexColor::black(),
            bottom_left: HexColor::black(),
        }
    }
}

/// A theme reduced to one bar, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableTheme {
    Pc {
        border_light: HexColor,
        border_dark: HexColor,
        ramp: Vec<HexColor>,
    },
    Ps1 {
        corners: Corners,
        /// `[left, right]`.
        ramps: [Vec<HexColor>; 2],
    },
}

/// Project `record` with `value` as its bar, `steps` colors per ramp.
#[must_use]
pub fn project(record: &ThemeRecord, value: Option<&BarValue>, steps: usize) -> RenderableTheme {
    let black = || vec![HexColor::black(); steps];
    match &record.borders {
        Borders::Pc { light, dark } => RenderableTheme::Pc {
            border_light: light.clone().unwrap_or_else(|| HexColor::parse_or_black(PC_BORDER_LIGHT)),
            border_dark: dark.clone().unwrap_or_else(|| HexColor::parse_or_black(PC_BORDER_DARK)),
            ramp: match value {
                Some(BarValue::Pc(ramp)) => ramp.clone(),
                _ => black(),
            },
        },
        Borders::Ps1 {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => {
            let corner = |c: &Option<HexColor>| c.clone().unwrap_or_default();
            RenderableTheme::Ps1 {
                corners: Corners {
                    top_left: corner(top_left),
                    top_right: corner(top_right),
                    bottom_right: corner(bottom_right),
                    bottom_left: corner(bottom_left),
                },
                ramps: match value {
                    Some(BarValue::Ps1 { left, right }) => [left.clone(), right.clone()],
                    _ => [black(), black()],
                },
            }
        }
    }
}

/// Tooltip text for a bar: its name, then its ramp colors.
///
/// ```
/// use hued_color::HexColor;
/// use hued_theme::{RenderableTheme, describe};
///
/// let theme = RenderableTheme::Pc {
///     border_light: HexColor::white(),
///     border_dark: HexColor::black(),
///     ramp: vec![HexColor::black(), HexColor::white()],
/// };
/// assert_eq!(describe("hp", &theme), "hp\n#000000 #ffffff");
/// ```
#[must_use]
pub fn describe(bar_name: &str, theme: &RenderableTheme) -> String {
    let join = |ramp: &[HexColor]| ramp.iter().map(HexColor::as_str).collect::<Vec<_>>().join(" ");
    let colors = match theme {
        RenderableTheme::Pc { ramp, .. } => join(ramp),
        RenderableTheme::Ps1 { ramps: [left, right], .. } => format!("{} | {}", join(left), join(right)),
    };
    format!("{bar_name}\n{colors}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ThemeKind;
    use pretty_assertions::assert_eq;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn pc_missing_borders_take_defaults() {
        let rec = ThemeRecord::placeholder();
        let RenderableTheme::Pc {
            border_light,
            border_dark,
            ramp,
        } = project(&rec, None, 3)
        else {
            panic!("expected pc projection");
        };
        assert_eq!(border_light, hex("#ffffff"));
        assert_eq!(border_dark, hex("#404040"));
        assert_eq!(ramp, vec![HexColor::black(); 3]);
    }

    #[test]
    fn pc_value_passes_through() {
        let rec = ThemeRecord::new(ThemeKind::Pc);
        let value = BarValue::Pc(vec![hex("#112233"), hex("#445566")]);
        let RenderableTheme::Pc { ramp, .. } = project(&rec, Some(&value), 2) else {
            panic!("expected pc projection");
        };
        assert_eq!(ramp, vec![hex("#112233"), hex("#445566")]);
    }

    #[test]
    fn mismatched_value_projects_black() {
        let rec = ThemeRecord::new(ThemeKind::Ps1);
        let value = BarValue::Pc(vec![hex("#ffffff")]);
        let RenderableTheme::Ps1 { corners, ramps } = project(&rec, Some(&value), 2) else {
            panic!("expected ps1 projection");
        };
        assert_eq!(corners, Corners::default());
        assert_eq!(ramps, [vec![HexColor::black(); 2], vec![HexColor::black(); 2]]);
    }

    #[test]
    fn ps1_corners_partial() {
        let mut rec = ThemeRecord::new(ThemeKind::Ps1);
        rec.borders = Borders::Ps1 {
            top_left: Some(hex("#ff0000")),
            top_right: None,
            bottom_right: Some(hex("#0000ff")),
            bottom_left: None,
        };
        let RenderableTheme::Ps1 { corners, .. } = project(&rec, None, 1) else {
            panic!("expected ps1 projection");
        };
        assert_eq!(corners.top_left, hex("#ff0000"));
        assert_eq!(corners.top_right, HexColor::black());
        assert_eq!(corners.bottom_right, hex("#0000ff"));
    }

    #[test]
    fn describe_ps1_joins_both_ramps() {
        let theme = RenderableTheme::Ps1 {
            corners: Corners::default(),
            ramps: [vec![hex("#ff0000"), hex("#00ff00")], vec![hex("#0000ff"), hex("#ffffff")]],
        };
        assert_eq!(describe("mp", &theme), "mp\n#ff0000 #00ff00 | #0000ff #ffffff");
    }
}
