//! Engine: the scene script executor.
//!
//! A `SceneScript` holds declared primitives and an ordered list of steps.
//! Running it mutates the scene graph step by step and hands one
//! `ResolvedScene` per frame to a `FrameSink`.
//!
//! The engine understands time, animation and the scene graph.
//! It never deals with terminals, ANSI codes, or frame diffs.

pub mod error;
pub mod graph;
pub mod objects;
pub mod step;
pub mod viewport;

use std::collections::HashMap;
use std::f64::consts::PI;

use tracing::{debug, info, info_span, warn};

use crate::config::RenderConfig;
use crate::renderer::FrameSink;
use crate::types::{DrawOp, ResolvedScene};

use error::{ScriptError, ScriptResult};
use graph::{PrimitiveId, SceneGraph};
use objects::{Primitive, paint};
use step::{Animation, Step, Transition};
use viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Idle,
    Running,
    Completed,
}

/// A named, single-shot sequence of steps over its own scene graph.
#[derive(Debug)]
pub struct SceneScript {
    name: String,
    prototypes: HashMap<PrimitiveId, Primitive>,
    next_id: u32,
    steps: Vec<Step>,
    graph: SceneGraph,
    clock: f64,
    steps_executed: usize,
    frames_emitted: usize,
    state: ExecState,
}

impl SceneScript {
    pub fn new(name: impl Into<String>) -> Self {
        SceneScript {
            name: name.into(),
            prototypes: HashMap::new(),
            next_id: 0,
            steps: Vec::new(),
            graph: SceneGraph::new(),
            clock: 0.0,
            steps_executed: 0,
            frames_emitted: 0,
            state: ExecState::Idle,
        }
    }

    /// Register a primitive. It is not on stage until a step introduces it.
    pub fn declare(&mut self, primitive: impl Into<Primitive>) -> ScriptResult<PrimitiveId> {
        let primitive = primitive.into();
        primitive.validate()?;
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.prototypes.insert(id, primitive);
        Ok(id)
    }

    /// The shape `id` was declared with.
    pub fn prototype(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.prototypes.get(&id)
    }

    pub fn add_step(&mut self, step: Step) -> ScriptResult<()> {
        if self.state != ExecState::Idle {
            return Err(ScriptError::invalid_state(format!(
                "cannot add steps to scene '{}' once it has run",
                self.name
            )));
        }
        step.validate()?;
        self.steps.push(step);
        Ok(())
    }

    pub fn play(&mut self, anims: impl IntoIterator<Item = Animation>) -> ScriptResult<()> {
        self.add_step(Step::Play(anims.into_iter().collect()))
    }

    pub fn wait(&mut self, secs: f64) -> ScriptResult<()> {
        self.add_step(Step::Wait(secs))
    }

    pub fn add(&mut self, ids: &[PrimitiveId]) -> ScriptResult<()> {
        self.add_step(Step::Add(ids.to_vec()))
    }

    pub fn remove(&mut self, ids: &[PrimitiveId]) -> ScriptResult<()> {
        self.add_step(Step::Remove(ids.to_vec()))
    }

    pub fn clear_stage(&mut self) -> ScriptResult<()> {
        self.add_step(Step::Clear)
    }

    pub fn fade_out_all(&mut self, run_time: f64) -> ScriptResult<()> {
        self.add_step(Step::FadeOutAll { run_time })
    }

    /// Take everything off stage now. Cleared ids count as removed.
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Presentation time in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    pub fn frames_emitted(&self) -> usize {
        self.frames_emitted
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// Number of steps in the script.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute every step in order, emitting frames to `sink`.
    pub fn run(&mut self, config: &RenderConfig, sink: &mut dyn FrameSink) -> ScriptResult<()> {
        if self.state != ExecState::Idle {
            return Err(ScriptError::invalid_state(format!(
                "scene '{}' has already run",
                self.name
            )));
        }
        config
            .validate()
            .map_err(|e| ScriptError::construction(format!("{e:#}")))?;
        self.state = ExecState::Running;

        let span = info_span!("scene", name = %self.name);
        let _enter = span.enter();

        let result = self.run_steps(config, sink);
        self.state = ExecState::Completed;
        match &result {
            Ok(()) => info!(
                steps = self.steps_executed,
                frames = self.frames_emitted,
                clock = self.clock,
                "scene complete"
            ),
            Err(e) => warn!(
                step = self.steps_executed,
                reference = e.is_reference_error(),
                "scene failed: {e}"
            ),
        }
        result
    }

    fn run_steps(&mut self, config: &RenderConfig, sink: &mut dyn FrameSink) -> ScriptResult<()> {
        let frames = FrameClock {
            viewport: Viewport::new(config.contract()),
            fps: f64::from(config.fps),
        };
        sink.begin(config.contract(), config.fps)?;

        let steps = std::mem::take(&mut self.steps);
        let mut result = Ok(());
        for (index, step) in steps.iter().enumerate() {
            result = self.execute(index, step, &frames, sink);
            if result.is_err() {
                break;
            }
        }
        self.steps = steps;
        result?;

        sink.finish()?;
        Ok(())
    }

    fn execute(
        &mut self,
        index: usize,
        step: &Step,
        frames: &FrameClock,
        sink: &mut dyn FrameSink,
    ) -> ScriptResult<()> {
        let duration = step.duration();
        debug!(
            index,
            step = %step.label(),
            duration,
            clock = self.clock,
            "step"
        );
        sink.marker(&step.label())?;

        match step {
            Step::Add(ids) => {
                for &id in ids {
                    self.introduce(id)?;
                }
            }
            Step::Remove(ids) => {
                for &id in ids {
                    self.require_live(id)?;
                    self.graph.remove(id);
                }
            }
            Step::Clear => self.graph.clear(),
            Step::Wait(_) => self.emit(&[], duration, frames, sink)?,
            Step::Play(anims) => self.play_group(anims, frames, sink)?,
            Step::FadeOutAll { run_time } => {
                let anims: Vec<Animation> = self
                    .graph
                    .ids()
                    .into_iter()
                    .map(|id| Animation::fade_out(id).run_time(*run_time))
                    .collect();
                if anims.is_empty() {
                    self.emit(&[], duration, frames, sink)?;
                } else {
                    self.play_group(&anims, frames, sink)?;
                }
            }
        }

        self.clock += duration;
        self.steps_executed += 1;
        Ok(())
    }

    /// Put a declared primitive on stage. Live ids stay where they are.
    fn introduce(&mut self, id: PrimitiveId) -> ScriptResult<()> {
        if self.graph.is_removed(id) {
            return Err(ScriptError::Removed(id));
        }
        if self.graph.contains(id) {
            return Ok(());
        }
        let proto = self
            .prototypes
            .get(&id)
            .ok_or(ScriptError::Undeclared(id))?;
        debug!(%id, kind = proto.kind(), content = ?proto.content(), "introduce");
        self.graph.insert(id, proto.clone());
        Ok(())
    }

    fn require_live(&self, id: PrimitiveId) -> ScriptResult<()> {
        if self.graph.contains(id) {
            Ok(())
        } else if self.graph.is_removed(id) {
            Err(ScriptError::Removed(id))
        } else if self.prototypes.contains_key(&id) {
            Err(ScriptError::NotOnStage(id))
        } else {
            Err(ScriptError::Undeclared(id))
        }
    }

    fn play_group(
        &mut self,
        anims: &[Animation],
        frames: &FrameClock,
        sink: &mut dyn FrameSink,
    ) -> ScriptResult<()> {
        let mut active = Vec::with_capacity(anims.len());
        for anim in anims {
            if anim.transition.introduces() {
                self.introduce(anim.target)?;
            } else {
                self.require_live(anim.target)?;
            }
            let into = match anim.transition {
                Transition::Transform(into) if self.graph.is_removed(into) => {
                    return Err(ScriptError::Removed(into));
                }
                Transition::Transform(into) => Some(
                    self.prototypes
                        .get(&into)
                        .cloned()
                        .ok_or(ScriptError::Undeclared(into))?,
                ),
                _ => None,
            };
            active.push(Active { anim, into });
        }

        let duration = anims.iter().map(|a| a.run_time).fold(0.0, f64::max);
        self.emit(&active, duration, frames, sink)?;

        for a in &active {
            self.settle(a);
        }
        Ok(())
    }

    /// Apply an animation's end state to the graph.
    fn settle(&mut self, active: &Active<'_>) {
        let id = active.anim.target;
        if active.anim.transition.removes() {
            self.graph.remove(id);
            return;
        }
        let Some(prim) = self.graph.get_mut(id) else {
            return;
        };
        match &active.anim.transition {
            Transition::MoveTo(p) => prim.move_to(*p),
            Transition::Shift(v) => prim.shift(*v),
            Transition::Recolor(c) => prim.paint_mut().color = *c,
            Transition::Restyle {
                color,
                stroke_width,
            } => {
                let paint = prim.paint_mut();
                paint.color = *color;
                paint.stroke_width = *stroke_width;
            }
            Transition::Transform(_) => {
                if let Some(into) = &active.into {
                    *prim = into.clone();
                }
            }
            Transition::Create
            | Transition::Write
            | Transition::Grow
            | Transition::FadeIn
            | Transition::FadeOut
            | Transition::Uncreate
            | Transition::Indicate => {}
        }
    }

    /// Emit the frames covering `duration` seconds from the current clock.
    fn emit(
        &mut self,
        active: &[Active<'_>],
        duration: f64,
        frames: &FrameClock,
        sink: &mut dyn FrameSink,
    ) -> ScriptResult<()> {
        let start = self.clock;
        let first = (start * frames.fps).round() as i64;
        let last = ((start + duration) * frames.fps).round() as i64;
        for n in first + 1..=last {
            let elapsed = (n as f64 / frames.fps - start).clamp(0.0, duration);
            let scene = self.compose(active, elapsed, &frames.viewport);
            sink.frame(&scene)?;
            self.frames_emitted += 1;
        }
        Ok(())
    }

    /// Resolve the whole stage with the active animations `elapsed` seconds in.
    fn compose(&self, active: &[Active<'_>], elapsed: f64, viewport: &Viewport) -> ResolvedScene {
        let mut visuals: HashMap<PrimitiveId, Visual> = HashMap::new();
        for a in active {
            let id = a.anim.target;
            let Some(prim) = self.graph.get(id) else {
                continue;
            };
            let visual = visuals
                .entry(id)
                .or_insert_with(|| Visual::still(prim.clone()));
            visual.apply(a, a.anim.progress(elapsed));
        }

        let mut ops: Vec<DrawOp> = Vec::new();
        for (index, (id, prim)) in self.graph.iter().enumerate() {
            // Fills sit one level below their strokes.
            let z = 2 * index as i32 + 1;
            match visuals.get(&id) {
                Some(v) => v.resolve(viewport, z, &mut ops),
                None => prim.resolve(viewport, 1.0, 1.0, z, &mut ops),
            }
        }
        ResolvedScene {
            width: viewport.cols,
            height: viewport.rows,
            ops,
        }
    }
}

struct FrameClock {
    viewport: Viewport,
    fps: f64,
}

/// A group member with its resolved transform target.
struct Active<'a> {
    anim: &'a Animation,
    into: Option<Primitive>,
}

/// How one animated primitive looks on a given frame.
struct Visual {
    prim: Primitive,
    reveal: f64,
    opacity: f64,
    /// Incoming shape of a cross-fading transform, with its opacity.
    incoming: Option<(Primitive, f64)>,
}

impl Visual {
    fn still(prim: Primitive) -> Self {
        Visual {
            prim,
            reveal: 1.0,
            opacity: 1.0,
            incoming: None,
        }
    }

    fn apply(&mut self, active: &Active<'_>, alpha: f64) {
        match &active.anim.transition {
            Transition::Create | Transition::Write | Transition::Grow => self.reveal = alpha,
            Transition::Uncreate => self.reveal = 1.0 - alpha,
            Transition::FadeIn => self.opacity *= alpha,
            Transition::FadeOut => self.opacity *= 1.0 - alpha,
            Transition::MoveTo(p) => {
                let to = self.prim.anchor().lerp(*p, alpha);
                self.prim.move_to(to);
            }
            Transition::Shift(v) => self.prim.shift(*v * alpha),
            Transition::Recolor(c) => {
                let paint = self.prim.paint_mut();
                paint.color = paint.color.lerp(*c, alpha);
            }
            Transition::Restyle {
                color,
                stroke_width,
            } => {
                let paint = self.prim.paint_mut();
                paint.color = paint.color.lerp(*color, alpha);
                paint.stroke_width = objects::lerp(paint.stroke_width, *stroke_width, alpha);
            }
            Transition::Transform(_) => {
                let Some(into) = &active.into else {
                    return;
                };
                match self.prim.morph(into, alpha) {
                    Some(morphed) => self.prim = morphed,
                    None => {
                        self.opacity *= 1.0 - alpha;
                        self.incoming = Some((into.clone(), alpha));
                    }
                }
            }
            Transition::Indicate => {
                let pulse = (PI * alpha).sin();
                let paint = self.prim.paint_mut();
                paint.color = paint.color.lerp(paint::YELLOW, pulse);
            }
        }
    }

    fn resolve(&self, viewport: &Viewport, z_order: i32, ops: &mut Vec<DrawOp>) {
        self.prim
            .resolve(viewport, self.reveal, self.opacity, z_order, ops);
        if let Some((incoming, opacity)) = &self.incoming {
            incoming.resolve(viewport, 1.0, *opacity, z_order, ops);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::engine::objects::{Circle, Dot, Line, PaintExt, Text};
    use crate::renderer::FrameCounter;

    fn config() -> RenderConfig {
        RenderConfig {
            fps: 10,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn introduce_then_move() {
        let mut s = SceneScript::new("move");
        let d = s.declare(Dot::at(0.0, 0.0)).unwrap();
        s.play([Animation::fade_in(d).run_time(0.5)]).unwrap();
        s.play([Animation::move_to(d, Point::new(2.0, 1.0))]).unwrap();
        s.play([Animation::shift(d, Vec2::new(0.0, -1.0))]).unwrap();

        let mut sink = FrameCounter::default();
        s.run(&config(), &mut sink).unwrap();

        let anchor = s.graph().get(d).unwrap().anchor();
        assert!(anchor.distance(Point::new(2.0, 0.0)) < 1e-9);
        assert_eq!(s.steps_executed(), 3);
        assert!((s.clock() - 2.5).abs() < 1e-9);
        assert_eq!(sink.frames, 25);
        assert_eq!(sink.markers, 3);
        assert_eq!(s.state(), ExecState::Completed);
    }

    #[test]
    fn fade_out_removes_target() {
        let mut s = SceneScript::new("fade");
        let a = s.declare(Circle::new(1.0)).unwrap();
        let b = s.declare(Dot::at(1.0, 1.0)).unwrap();
        s.add(&[a, b]).unwrap();
        s.play([Animation::fade_out(a)]).unwrap();
        s.run(&config(), &mut FrameCounter::default()).unwrap();
        assert_eq!(s.graph().ids(), vec![b]);
        assert!(s.graph().is_removed(a));
    }

    #[test]
    fn reference_errors_are_classified() {
        let mut s = SceneScript::new("refs");
        let a = s.declare(Dot::at(0.0, 0.0)).unwrap();
        s.play([Animation::recolor(a, paint::RED)]).unwrap();
        let err = s.run(&config(), &mut FrameCounter::default()).unwrap_err();
        assert!(matches!(err, ScriptError::NotOnStage(id) if id == a));

        let mut s = SceneScript::new("undeclared");
        s.play([Animation::indicate(PrimitiveId(7))]).unwrap();
        let err = s.run(&config(), &mut FrameCounter::default()).unwrap_err();
        assert!(matches!(err, ScriptError::Undeclared(PrimitiveId(7))));
        assert_eq!(s.state(), ExecState::Completed);
    }

    #[test]
    fn creating_a_removed_primitive_fails() {
        let mut s = SceneScript::new("revive");
        let a = s.declare(Dot::at(0.0, 0.0)).unwrap();
        s.add(&[a]).unwrap();
        s.clear_stage().unwrap();
        s.play([Animation::create(a)]).unwrap();
        let err = s.run(&config(), &mut FrameCounter::default()).unwrap_err();
        assert!(matches!(err, ScriptError::Removed(_)));
        assert_eq!(s.steps_executed(), 2);
    }

    #[test]
    fn transform_takes_target_shape() {
        let mut s = SceneScript::new("transform");
        let from = s.declare(Text::new("3 + 4", 36.0)).unwrap();
        let to = s.declare(Text::new("= 7", 36.0).color(paint::GREEN)).unwrap();
        let other = s.declare(Circle::new(0.5)).unwrap();
        s.play([Animation::write(from)]).unwrap();
        s.play([Animation::transform(from, to)]).unwrap();
        s.play([Animation::transform(from, other)]).unwrap();
        s.run(&config(), &mut FrameCounter::default()).unwrap();

        assert_eq!(s.graph().len(), 1);
        assert_eq!(s.graph().get(from), s.prototype(other));
        assert!(!s.graph().contains(to));
    }

    #[test]
    fn indicate_ends_unchanged() {
        let mut s = SceneScript::new("indicate");
        let line = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)).color(paint::BLUE);
        let id = s.declare(line.clone()).unwrap();
        s.add(&[id]).unwrap();
        s.play([Animation::indicate(id)]).unwrap();
        s.run(&config(), &mut FrameCounter::default()).unwrap();
        assert_eq!(s.graph().get(id), Some(&Primitive::Line(line)));
    }

    #[test]
    fn script_is_single_shot() {
        let mut s = SceneScript::new("once");
        s.wait(0.1).unwrap();
        s.run(&config(), &mut FrameCounter::default()).unwrap();
        assert!(matches!(
            s.run(&config(), &mut FrameCounter::default()),
            Err(ScriptError::InvalidState(_))
        ));
        assert!(matches!(s.wait(1.0), Err(ScriptError::InvalidState(_))));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn declare_rejects_bad_geometry() {
        let mut s = SceneScript::new("bad");
        let err = s.declare(Circle::new(0.0)).unwrap_err();
        assert!(matches!(err, ScriptError::Construction(_)));
    }
}
