use crate::foundation::core::{Affine, Point, Rect, Size, Vec2};
use crate::foundation::error::{WobbleError, WobbleResult};

/// One axis of a parent-relative quantity.
///
/// Resolves to `value + scale * reference`, where `reference` is the matching parent dimension.
/// `scale = 1.0, value = 0.0` means "100% of the parent".
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScalableVector1 {
    /// Absolute pixel component.
    #[serde(default)]
    pub value: f64,
    /// Fraction of the parent dimension.
    #[serde(default)]
    pub scale: f64,
}

impl ScalableVector1 {
    /// Purely absolute pixels.
    pub const fn px(value: f64) -> Self {
        Self { value, scale: 0.0 }
    }

    /// Purely relative to the parent dimension.
    pub const fn relative(scale: f64) -> Self {
        Self { value: 0.0, scale }
    }

    /// Resolve against a parent dimension.
    pub fn resolve(self, reference: f64) -> f64 {
        self.value + self.scale * reference
    }
}

/// A two-axis [`ScalableVector1`] used for positions and sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScalableVector2 {
    /// Horizontal component.
    pub x: ScalableVector1,
    /// Vertical component.
    pub y: ScalableVector1,
}

impl ScalableVector2 {
    /// Absolute pixels on both axes.
    pub const fn px(x: f64, y: f64) -> Self {
        Self {
            x: ScalableVector1::px(x),
            y: ScalableVector1::px(y),
        }
    }

    /// Relative to the parent on both axes.
    pub const fn relative(x: f64, y: f64) -> Self {
        Self {
            x: ScalableVector1::relative(x),
            y: ScalableVector1::relative(y),
        }
    }

    /// Resolve as an offset against a parent size.
    pub fn resolve_offset(self, parent: Size) -> Vec2 {
        Vec2::new(self.x.resolve(parent.width), self.y.resolve(parent.height))
    }

    /// Resolve as a size against a parent size. Negative results clamp to zero.
    pub fn resolve_size(self, parent: Size) -> Size {
        Size::new(
            self.x.resolve(parent.width).max(0.0),
            self.y.resolve(parent.height).max(0.0),
        )
    }
}

/// Where on the parent rectangle a drawable anchors its position offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    MidLeft,
    /// Centre.
    MidCenter,
    /// Middle of the right edge.
    MidRight,
    /// Bottom-left corner.
    BotLeft,
    /// Middle of the bottom edge.
    BotCenter,
    /// Bottom-right corner.
    BotRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Start,
    Center,
    End,
}

impl Anchor {
    fn factor(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

impl Alignment {
    /// All nine anchors, row by row.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MidLeft,
        Self::MidCenter,
        Self::MidRight,
        Self::BotLeft,
        Self::BotCenter,
        Self::BotRight,
    ];

    fn horizontal(self) -> Anchor {
        match self {
            Self::TopLeft | Self::MidLeft | Self::BotLeft => Anchor::Start,
            Self::TopCenter | Self::MidCenter | Self::BotCenter => Anchor::Center,
            Self::TopRight | Self::MidRight | Self::BotRight => Anchor::End,
        }
    }

    fn vertical(self) -> Anchor {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => Anchor::Start,
            Self::MidLeft | Self::MidCenter | Self::MidRight => Anchor::Center,
            Self::BotLeft | Self::BotCenter | Self::BotRight => Anchor::End,
        }
    }

    /// The anchor point of `rect` this alignment refers to.
    pub fn anchor_point(self, rect: Rect) -> Point {
        Point::new(
            rect.x0 + rect.width() * self.horizontal().factor(),
            rect.y0 + rect.height() * self.vertical().factor(),
        )
    }
}

impl TryFrom<u8> for Alignment {
    type Error = WobbleError;

    fn try_from(v: u8) -> WobbleResult<Self> {
        Self::ALL
            .get(usize::from(v))
            .copied()
            .ok_or_else(|| WobbleError::invalid_argument(format!("alignment {v} is out of range")))
    }
}

/// Position a rectangle of `size` inside `boundary`.
///
/// The child's anchor point (per `alignment`) lands on the boundary's matching anchor point, then
/// `offset` is added.
pub fn align_rect(alignment: Alignment, boundary: Rect, offset: Vec2, size: Size) -> Rect {
    let h = alignment.horizontal().factor();
    let v = alignment.vertical().factor();
    let x = boundary.x0 + (boundary.width() - size.width) * h + offset.x;
    let y = boundary.y0 + (boundary.height() - size.height) * v + offset.y;
    Rect::new(x, y, x + size.width, y + size.height)
}

/// Render transform rotating and scaling `rect` around its pivot.
///
/// `pivot` is in unit-square coordinates of `rect` (`(0.5, 0.5)` is the centre). Layout ignores
/// it; rectangles stay axis-aligned and only drawing and hit testing see the transform.
pub fn pivot_transform(rect: Rect, pivot: Vec2, rotation: f64, scale: Vec2) -> Affine {
    let p = Vec2::new(
        rect.x0 + rect.width() * pivot.x,
        rect.y0 + rect.height() * pivot.y,
    );
    Affine::translate(p)
        * Affine::rotate(rotation)
        * Affine::scale_non_uniform(scale.x, scale.y)
        * Affine::translate(-p)
}

#[cfg(test)]
#[path = "../../tests/unit/graphics/geometry.rs"]
mod tests;
