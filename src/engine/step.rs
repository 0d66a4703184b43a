//! Steps, animations and rate curves.

use kurbo::{Point, Vec2};

use super::error::{ScriptError, ScriptResult, check_duration};
use super::graph::PrimitiveId;
use crate::types::Color;

/// Default duration of an animation in seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// Rate curve mapping linear progress to eased progress. Both ends are fixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Sigmoid ease in and out.
    #[default]
    Smooth,
    InOutQuad,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::Smooth => {
                const INFLECTION: f64 = 10.0;
                let sigmoid = |x: f64| 1.0 / (1.0 + (-x).exp());
                let err = sigmoid(-INFLECTION / 2.0);
                ((sigmoid(INFLECTION * (t - 0.5)) - err) / (1.0 - 2.0 * err)).clamp(0.0, 1.0)
            }
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Draw the outline in.
    Create,
    /// Type text in; draws other primitives like `Create`.
    Write,
    /// Grow out of the anchor (arrows out of their tail).
    Grow,
    FadeIn,
    FadeOut,
    /// Reverse of `Create`, then removal.
    Uncreate,
    MoveTo(Point),
    Shift(Vec2),
    Recolor(Color),
    Restyle { color: Color, stroke_width: f64 },
    /// Morph the target into the declared shape of another id.
    Transform(PrimitiveId),
    /// Pulse toward yellow and back.
    Indicate,
}

impl Transition {
    /// Transitions that put a declared primitive on stage.
    pub fn introduces(&self) -> bool {
        matches!(self, Self::Create | Self::Write | Self::Grow | Self::FadeIn)
    }

    /// Transitions that take the target off stage when they finish.
    pub fn removes(&self) -> bool {
        matches!(self, Self::FadeOut | Self::Uncreate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Grow => "grow",
            Self::FadeIn => "fade-in",
            Self::FadeOut => "fade-out",
            Self::Uncreate => "uncreate",
            Self::MoveTo(_) => "move-to",
            Self::Shift(_) => "shift",
            Self::Recolor(_) => "recolor",
            Self::Restyle { .. } => "restyle",
            Self::Transform(_) => "transform",
            Self::Indicate => "indicate",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub target: PrimitiveId,
    pub transition: Transition,
    pub run_time: f64,
    pub ease: Ease,
}

impl Animation {
    pub fn new(target: PrimitiveId, transition: Transition) -> Self {
        Animation {
            target,
            transition,
            run_time: DEFAULT_RUN_TIME,
            ease: Ease::default(),
        }
    }

    pub fn create(target: PrimitiveId) -> Self {
        Self::new(target, Transition::Create)
    }

    pub fn write(target: PrimitiveId) -> Self {
        Self::new(target, Transition::Write)
    }

    pub fn grow(target: PrimitiveId) -> Self {
        Self::new(target, Transition::Grow)
    }

    pub fn fade_in(target: PrimitiveId) -> Self {
        Self::new(target, Transition::FadeIn)
    }

    pub fn fade_out(target: PrimitiveId) -> Self {
        Self::new(target, Transition::FadeOut)
    }

    pub fn uncreate(target: PrimitiveId) -> Self {
        Self::new(target, Transition::Uncreate)
    }

    pub fn move_to(target: PrimitiveId, to: Point) -> Self {
        Self::new(target, Transition::MoveTo(to))
    }

    pub fn shift(target: PrimitiveId, by: Vec2) -> Self {
        Self::new(target, Transition::Shift(by))
    }

    pub fn recolor(target: PrimitiveId, color: Color) -> Self {
        Self::new(target, Transition::Recolor(color))
    }

    pub fn restyle(target: PrimitiveId, color: Color, stroke_width: f64) -> Self {
        Self::new(
            target,
            Transition::Restyle {
                color,
                stroke_width,
            },
        )
    }

    pub fn transform(target: PrimitiveId, into: PrimitiveId) -> Self {
        Self::new(target, Transition::Transform(into))
    }

    pub fn indicate(target: PrimitiveId) -> Self {
        Self::new(target, Transition::Indicate)
    }

    pub fn run_time(mut self, secs: f64) -> Self {
        self.run_time = secs;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Eased progress at `elapsed` seconds into the step. Holds at 1 once
    /// this member's own run time is over.
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.run_time <= 0.0 {
            return 1.0;
        }
        self.ease.apply(elapsed / self.run_time)
    }

    fn validate(&self) -> ScriptResult<()> {
        check_duration(self.transition.label(), self.run_time)?;
        let finite = |x: f64, y: f64| x.is_finite() && y.is_finite();
        match &self.transition {
            Transition::MoveTo(p) if !finite(p.x, p.y) => Err(ScriptError::construction(
                format!("move-to target for {} must be finite", self.target),
            )),
            Transition::Shift(v) if !finite(v.x, v.y) => Err(ScriptError::construction(format!(
                "shift offset for {} must be finite",
                self.target
            ))),
            Transition::Restyle { stroke_width, .. }
                if !stroke_width.is_finite() || *stroke_width < 0.0 =>
            {
                Err(ScriptError::construction(format!(
                    "restyle stroke width must be finite and >= 0 (got {stroke_width})"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Put declared primitives on stage instantly.
    Add(Vec<PrimitiveId>),
    /// Take primitives off stage instantly.
    Remove(Vec<PrimitiveId>),
    /// One animation, or several run concurrently over one window.
    Play(Vec<Animation>),
    Wait(f64),
    Clear,
    FadeOutAll { run_time: f64 },
}

impl Step {
    /// Seconds this step advances the clock by.
    pub fn duration(&self) -> f64 {
        match self {
            Step::Play(anims) => anims.iter().map(|a| a.run_time).fold(0.0, f64::max),
            Step::Wait(secs) => *secs,
            Step::FadeOutAll { run_time } => *run_time,
            Step::Add(_) | Step::Remove(_) | Step::Clear => 0.0,
        }
    }

    /// Short human-readable description, used for markers and logs.
    pub fn label(&self) -> String {
        match self {
            Step::Add(ids) => format!("add {}", ids.len()),
            Step::Remove(ids) => format!("remove {}", ids.len()),
            Step::Play(anims) => {
                let mut kinds: Vec<&str> = anims.iter().map(|a| a.transition.label()).collect();
                kinds.dedup();
                format!("play {}", kinds.join("+"))
            }
            Step::Wait(secs) => format!("wait {secs:.1}s"),
            Step::Clear => "clear".to_string(),
            Step::FadeOutAll { .. } => "fade out all".to_string(),
        }
    }

    /// Checks that need no scene graph.
    pub fn validate(&self) -> ScriptResult<()> {
        match self {
            Step::Play(anims) if anims.is_empty() => {
                Err(ScriptError::construction("play needs at least one animation"))
            }
            Step::Play(anims) => anims.iter().try_for_each(Animation::validate),
            Step::Wait(secs) => check_duration("wait", *secs),
            Step::FadeOutAll { run_time } => check_duration("fade out all", *run_time),
            Step::Add(_) | Step::Remove(_) | Step::Clear => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASES: [Ease; 4] = [Ease::Linear, Ease::Smooth, Ease::InOutQuad, Ease::OutCubic];

    #[test]
    fn ease_endpoints_are_stable() {
        for ease in EASES {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert_eq!(ease.apply(1.7), 1.0);
        }
    }

    #[test]
    fn ease_is_monotonic() {
        for ease in EASES {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b && b < c, "{ease:?}");
        }
        assert!((Ease::Smooth.apply(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn group_duration_is_the_longest_member() {
        let step = Step::Play(vec![
            Animation::create(PrimitiveId(0)).run_time(0.5),
            Animation::fade_in(PrimitiveId(1)).run_time(2.0),
        ]);
        assert_eq!(step.duration(), 2.0);
        assert_eq!(step.label(), "play create+fade-in");
    }

    #[test]
    fn shorter_member_holds_its_end_state() {
        let anim = Animation::create(PrimitiveId(0)).run_time(0.5);
        assert_eq!(anim.progress(0.75), 1.0);
        assert_eq!(Animation::create(PrimitiveId(0)).run_time(0.0).progress(0.0), 1.0);
    }

    #[test]
    fn validation_catches_bad_durations_and_empty_groups() {
        assert!(Step::Play(vec![]).validate().is_err());
        assert!(Step::Wait(-1.0).validate().is_err());
        assert!(
            Step::Play(vec![Animation::write(PrimitiveId(0)).run_time(f64::NAN)])
                .validate()
                .is_err()
        );
        assert!(
            Step::Play(vec![Animation::restyle(PrimitiveId(0), crate::types::Color::rgb(1, 2, 3), -2.0)])
                .validate()
                .is_err()
        );
        assert!(Step::FadeOutAll { run_time: 1.0 }.validate().is_ok());
    }
}
