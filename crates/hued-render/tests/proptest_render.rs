//! Property tests for bar layout and rendering.
//!
//! 1. Bands tile the fill rectangle: no gaps, no overlaps, full coverage
//! 2. The fill rectangle stays inside the inner rectangle
//! 3. Rendering twice gives byte-identical pixels
//! 4. A fill of zero leaves the inner rectangle black

use hued_color::{HexColor, Rgb};
use hued_render::{Rect, bands, layout, render_to_buffer};
use hued_theme::{Corners, RenderableTheme};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn hex_strategy() -> impl Strategy<Value = HexColor> {
    any::<(u8, u8, u8)>().prop_map(|c| Rgb::from(c).to_hex())
}

fn theme_strategy(steps: usize) -> impl Strategy<Value = RenderableTheme> {
    let ramp = move || prop::collection::vec(hex_strategy(), steps);
    prop_oneof![
        (hex_strategy(), hex_strategy(), ramp()).prop_map(|(border_light, border_dark, ramp)| {
            RenderableTheme::Pc { border_light, border_dark, ramp }
        }),
        (hex_strategy(), hex_strategy(), hex_strategy(), hex_strategy(), ramp(), ramp()).prop_map(
            |(top_left, top_right, bottom_right, bottom_left, left, right)| RenderableTheme::Ps1 {
                corners: Corners { top_left, top_right, bottom_right, bottom_left },
                ramps: [left, right],
            }
        ),
    ]
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u32..100, 0u32..100, 0u32..300, 0u32..300).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn bands_tile_the_rect(rect in rect_strategy(), steps in 1usize..12) {
        let got = bands(rect, steps);
        let total: u32 = got.iter().map(|b| b.rect.height).sum();
        prop_assert_eq!(total, rect.height);
        let mut y = rect.y;
        let mut last_index = None;
        for band in &got {
            prop_assert_eq!(band.rect.y, y);
            prop_assert!(band.rect.height > 0);
            prop_assert_eq!(band.rect.x, rect.x);
            prop_assert_eq!(band.rect.width, rect.width);
            prop_assert!(last_index.is_none_or(|i| band.index > i));
            last_index = Some(band.index);
            y = band.rect.bottom();
        }
        if rect.height >= steps as u32 {
            prop_assert_eq!(got.len(), steps);
        }
    }

    #[test]
    fn fill_stays_inside_inner(w in 0u32..400, h in 0u32..200, steps in 1usize..10, fill in -0.5f64..1.5) {
        let geo = layout(w, h, steps, fill);
        if let Some(rect) = geo.fill {
            prop_assert!(rect.x >= geo.inner.x && rect.right() <= geo.inner.right());
            prop_assert!(rect.y >= geo.inner.y && rect.bottom() <= geo.inner.bottom());
        }
    }

    #[test]
    fn render_is_deterministic(
        (steps, theme) in (1usize..7).prop_flat_map(|n| (Just(n), theme_strategy(n))),
        fill in 0.0f64..=1.0,
        smooth in any::<bool>(),
        w in 1u32..120,
        h in 1u32..60,
    ) {
        let a = render_to_buffer(&theme, fill, smooth, steps, w, h);
        let b = render_to_buffer(&theme, fill, smooth, steps, w, h);
        prop_assert_eq!(a.to_rgb_bytes(), b.to_rgb_bytes());
    }

    #[test]
    fn empty_fill_leaves_backdrop_black(
        (steps, theme) in (1usize..7).prop_flat_map(|n| (Just(n), theme_strategy(n))),
        w in 1u32..120,
        h in 1u32..60,
    ) {
        let buf = render_to_buffer(&theme, 0.0, false, steps, w, h);
        let inner = layout(w, h, steps, 0.0).inner;
        for y in inner.y..inner.bottom() {
            for x in inner.x..inner.right() {
                prop_assert_eq!(buf.get(x, y), Some(Rgb::BLACK));
            }
        }
    }
}
