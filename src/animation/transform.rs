use std::fmt;

use crate::animation::ease::Easing;
use crate::foundation::core::Color;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::scene::tree::{DrawableId, Scene};

/// Drawable property an [`Animation`] writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationProperty {
    /// Absolute part of the horizontal position offset.
    X,
    /// Absolute part of the vertical position offset.
    Y,
    /// Absolute part of the width.
    Width,
    /// Absolute part of the height.
    Height,
    /// Opacity in `[0, 1]`.
    Alpha,
    /// Rotation in radians.
    Rotation,
    /// Tint RGB channels. The tint's alpha channel is left alone.
    Color,
}

impl AnimationProperty {
    /// All properties in discriminant order.
    pub const ALL: [Self; 7] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Alpha,
        Self::Rotation,
        Self::Color,
    ];

    /// Whether this property takes [`AnimationValue::Color`] values.
    pub fn is_color(self) -> bool {
        matches!(self, Self::Color)
    }
}

impl TryFrom<u8> for AnimationProperty {
    type Error = WobbleError;

    fn try_from(v: u8) -> WobbleResult<Self> {
        Self::ALL.get(usize::from(v)).copied().ok_or_else(|| {
            WobbleError::invalid_argument(format!("animation property {v} is out of range"))
        })
    }
}

/// A value an animation interpolates between.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AnimationValue {
    /// Scalar property value.
    Scalar(f64),
    /// Colour property value.
    Color(Color),
}

impl AnimationValue {
    /// The scalar payload, if any.
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// The colour payload, if any.
    pub fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

/// Callback run once an animation finishes, after the update traversal.
pub type CompletionCallback = Box<dyn FnOnce(&mut Scene, DrawableId)>;

/// One scheduled, time-driven change to a single drawable property.
///
/// Lifecycle is `pending -> advancing -> done`: the first [`Animation::step`] moves it to
/// advancing, and it is done once `elapsed_ms` reaches `duration_ms`. Completion is decided by
/// elapsed time only, so overshooting curves (`Elastic`, `Back`, `Bounce`) always run their full
/// course.
pub struct Animation {
    property: AnimationProperty,
    easing: Easing,
    start: AnimationValue,
    end: AnimationValue,
    duration_ms: f64,
    elapsed_ms: f64,
    done: bool,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("property", &self.property)
            .field("easing", &self.easing)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration_ms", &self.duration_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("done", &self.done)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Animation {
    /// Create an animation of `property` from `start` to `end` over `duration_ms`.
    ///
    /// Fails with an invalid-argument error when the duration is negative or not finite, or when
    /// the value kinds do not match the property (colours only for [`AnimationProperty::Color`]).
    pub fn new(
        property: AnimationProperty,
        easing: Easing,
        start: AnimationValue,
        end: AnimationValue,
        duration_ms: f64,
    ) -> WobbleResult<Self> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(WobbleError::invalid_argument(format!(
                "animation duration must be finite and >= 0, got {duration_ms}"
            )));
        }
        for v in [start, end] {
            let ok = match v {
                AnimationValue::Color(_) => property.is_color(),
                AnimationValue::Scalar(s) => !property.is_color() && s.is_finite(),
            };
            if !ok {
                return Err(WobbleError::invalid_argument(format!(
                    "value {v:?} does not fit property {property:?}"
                )));
            }
        }
        Ok(Self {
            property,
            easing,
            start,
            end,
            duration_ms,
            elapsed_ms: 0.0,
            done: false,
            on_complete: None,
        })
    }

    /// Scalar shorthand for [`Animation::new`].
    pub fn scalar(
        property: AnimationProperty,
        easing: Easing,
        start: f64,
        end: f64,
        duration_ms: f64,
    ) -> WobbleResult<Self> {
        Self::new(
            property,
            easing,
            AnimationValue::Scalar(start),
            AnimationValue::Scalar(end),
            duration_ms,
        )
    }

    /// Colour shorthand for [`Animation::new`].
    pub fn color(easing: Easing, start: Color, end: Color, duration_ms: f64) -> WobbleResult<Self> {
        Self::new(
            AnimationProperty::Color,
            easing,
            AnimationValue::Color(start),
            AnimationValue::Color(end),
            duration_ms,
        )
    }

    /// Attach a callback run after the update pass in which this animation completes.
    pub fn on_complete(mut self, f: impl FnOnce(&mut Scene, DrawableId) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Animated property.
    pub fn property(&self) -> AnimationProperty {
        self.property
    }

    /// Easing curve.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Start value.
    pub fn start(&self) -> AnimationValue {
        self.start
    }

    /// End value.
    pub fn end(&self) -> AnimationValue {
        self.end
    }

    /// Total duration.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Time advanced so far, never more than the duration.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Whether the animation reached its end value.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Normalized progress in `[0, 1]`. Zero-length animations report `1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Advance by `dt_ms` and return the value to write onto the property.
    ///
    /// A zero-length animation snaps to its end value on the first step. Stepping a finished
    /// animation keeps returning the end value without advancing.
    pub fn step(&mut self, dt_ms: f64) -> AnimationValue {
        if self.done {
            return self.end;
        }
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.elapsed_ms = (self.elapsed_ms + dt).min(self.duration_ms);
        if self.elapsed_ms >= self.duration_ms {
            self.done = true;
            return self.end;
        }
        self.value_at(self.progress())
    }

    pub(crate) fn take_completion(&mut self) -> Option<CompletionCallback> {
        self.on_complete.take()
    }

    fn value_at(&self, t: f64) -> AnimationValue {
        match (self.start, self.end) {
            (AnimationValue::Scalar(a), AnimationValue::Scalar(b)) => {
                AnimationValue::Scalar(self.easing.perform(a, b, t))
            }
            (AnimationValue::Color(a), AnimationValue::Color(b)) => {
                AnimationValue::Color(interpolate_rgb(self.easing, a, b, t))
            }
            // `new` rejects mixed kinds.
            _ => self.end,
        }
    }
}

/// Interpolate RGB channels independently; alpha stays at the start colour's alpha.
pub(crate) fn interpolate_rgb(easing: Easing, a: Color, b: Color, t: f64) -> Color {
    let ch = |x: u8, y: u8| -> u8 {
        easing
            .perform(f64::from(x), f64::from(y), t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Color::rgba(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), a.a)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transform.rs"]
mod tests;
