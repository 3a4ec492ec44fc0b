//! Anchor resolution for watermark placement.
//!
//! Two anchoring conventions coexist and must not be mixed:
//! - image overlays get a **top-left** offset for their bounding box;
//! - text gets a **center** point, and the glyph box is centered on it.

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Named reference point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Every anchor, in reading order.
    pub fn all() -> &'static [Self] {
        const ALL: [Anchor; 9] = [
            Anchor::TopLeft,
            Anchor::TopCenter,
            Anchor::TopRight,
            Anchor::CenterLeft,
            Anchor::Center,
            Anchor::CenterRight,
            Anchor::BottomLeft,
            Anchor::BottomCenter,
            Anchor::BottomRight,
        ];
        &ALL
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Lenient parse: unknown or empty names fall back to the default anchor.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Horizontal alignment: -1 left, 0 center, 1 right.
    const fn column(&self) -> i8 {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => -1,
            Self::TopCenter | Self::Center | Self::BottomCenter => 0,
            Self::TopRight | Self::CenterRight | Self::BottomRight => 1,
        }
    }

    /// Vertical alignment: -1 top, 0 center, 1 bottom.
    const fn row(&self) -> i8 {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => -1,
            Self::CenterLeft | Self::Center | Self::CenterRight => 0,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => 1,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned by strict parsing of an anchor name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown anchor {0:?}")]
pub struct UnknownAnchor(pub String);

impl FromStr for Anchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|a| a.label() == normalized)
            .ok_or(UnknownAnchor(s.to_string()))
    }
}

/// Resolved top-left offset and extent of an asset on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Top-left corner. May be negative when the asset overflows the canvas.
    pub offset: IVec2,
    /// Asset width and height.
    pub size: UVec2,
}

impl Placement {
    pub fn x(&self) -> i32 {
        self.offset.x
    }

    pub fn y(&self) -> i32 {
        self.offset.y
    }
}

/// Position an asset's bounding box on a canvas.
///
/// The box touches the requested edge(s) inset by `margin` and is centered
/// along free axes. When the asset fits on an axis the offset is clamped so
/// the box stays inside the canvas; larger assets are allowed to overflow.
///
/// ```text
/// left   : margin                 right  : canvas − asset − margin
/// center : (canvas − asset) / 2
/// ```
pub fn resolve_position(canvas: UVec2, asset: UVec2, anchor: Anchor, margin: u32) -> Placement {
    let x = align_axis(canvas.x, asset.x, anchor.column(), margin);
    let y = align_axis(canvas.y, asset.y, anchor.row(), margin);
    Placement {
        offset: IVec2::new(x, y),
        size: asset,
    }
}

/// Anchor point for centered text.
///
/// The text renderer centers its glyph box on this point, so the point
/// sits `margin` in from the requested edge(s).
pub fn resolve_text_anchor(canvas: UVec2, anchor: Anchor, margin: f32) -> Vec2 {
    let canvas = canvas.as_vec2();
    let along = |extent: f32, alignment: i8| match alignment {
        -1 => margin,
        0 => extent / 2.0,
        _ => extent - margin,
    };
    Vec2::new(
        along(canvas.x, anchor.column()),
        along(canvas.y, anchor.row()),
    )
}

fn align_axis(canvas: u32, asset: u32, alignment: i8, margin: u32) -> i32 {
    let canvas = i64::from(canvas);
    let asset = i64::from(asset);
    let margin = i64::from(margin);
    let pos = match alignment {
        -1 => margin,
        0 => (canvas - asset) / 2,
        _ => canvas - asset - margin,
    };
    let pos = if asset <= canvas {
        pos.clamp(0, canvas - asset)
    } else {
        pos
    };
    pos.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: UVec2 = UVec2::new(1000, 1000);
    const ASSET: UVec2 = UVec2::new(100, 100);

    #[test]
    fn test_nine_anchors_resolve_to_expected_offsets() {
        let expected = [
            (Anchor::TopLeft, (20, 20)),
            (Anchor::TopCenter, (450, 20)),
            (Anchor::TopRight, (880, 20)),
            (Anchor::CenterLeft, (20, 450)),
            (Anchor::Center, (450, 450)),
            (Anchor::CenterRight, (880, 450)),
            (Anchor::BottomLeft, (20, 880)),
            (Anchor::BottomCenter, (450, 880)),
            (Anchor::BottomRight, (880, 880)),
        ];
        for (anchor, (x, y)) in expected {
            let p = resolve_position(CANVAS, ASSET, anchor, 20);
            assert_eq!((p.x(), p.y()), (x, y), "{anchor}");
            assert_eq!(p.size, ASSET);
        }
    }

    #[test]
    fn test_anchor_offsets_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for &anchor in Anchor::all() {
            assert!(seen.insert(resolve_position(CANVAS, ASSET, anchor, 20).offset));
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_unknown_name_resolves_like_bottom_center() {
        assert_eq!(Anchor::parse_or_default(""), Anchor::BottomCenter);
        assert_eq!(Anchor::parse_or_default("somewhere"), Anchor::BottomCenter);
        assert_eq!(Anchor::parse_or_default(" Top-Right "), Anchor::TopRight);
        assert!("middle".parse::<Anchor>().is_err());
    }

    #[test]
    fn test_label_round_trips() {
        for &anchor in Anchor::all() {
            assert_eq!(anchor.label().parse::<Anchor>().unwrap(), anchor);
        }
    }

    #[test]
    fn test_oversized_margin_is_clamped_inside_canvas() {
        let p = resolve_position(UVec2::new(200, 200), ASSET, Anchor::BottomRight, 160);
        assert_eq!((p.x(), p.y()), (0, 0));
        let p = resolve_position(UVec2::new(200, 200), ASSET, Anchor::TopLeft, 160);
        assert_eq!((p.x(), p.y()), (100, 100));
    }

    #[test]
    fn test_oversized_asset_may_overflow() {
        let p = resolve_position(UVec2::new(100, 100), UVec2::new(300, 50), Anchor::Center, 0);
        assert_eq!(p.x(), -100);
        assert_eq!(p.y(), 25);
    }

    #[test]
    fn test_text_anchor_is_a_center_point() {
        let canvas = UVec2::new(800, 600);
        assert_eq!(resolve_text_anchor(canvas, Anchor::TopLeft, 30.0), Vec2::new(30.0, 30.0));
        assert_eq!(resolve_text_anchor(canvas, Anchor::Center, 30.0), Vec2::new(400.0, 300.0));
        assert_eq!(
            resolve_text_anchor(canvas, Anchor::BottomRight, 30.0),
            Vec2::new(770.0, 570.0)
        );
        assert_eq!(
            resolve_text_anchor(canvas, Anchor::BottomCenter, 160.0),
            Vec2::new(400.0, 440.0)
        );
    }

    #[test]
    fn test_anchor_serializes_kebab_case() {
        let json = serde_json::to_string(&Anchor::CenterRight).unwrap();
        assert_eq!(json, "\"center-right\"");
    }
}
