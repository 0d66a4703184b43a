use distance_scenes::config::RenderConfig;
use distance_scenes::engine::error::ScriptError;
use distance_scenes::engine::objects::{Dot, Line, Text};
use distance_scenes::engine::step::Animation;
use distance_scenes::engine::{ExecState, SceneScript};
use distance_scenes::renderer::{FrameCounter, Recorder};
use distance_scenes::types::Frame;
use kurbo::Point;

fn config(fps: u32) -> RenderConfig {
    RenderConfig {
        fps,
        ..RenderConfig::default()
    }
}

#[test]
fn two_dots_and_a_line() -> anyhow::Result<()> {
    let mut s = SceneScript::new("TwoDots");
    let a = s.declare(Dot::at(1.0, 1.0))?;
    let b = s.declare(Dot::at(4.0, 3.0))?;
    let line = s.declare(Line::new(Point::new(1.0, 1.0), Point::new(4.0, 3.0)))?;
    s.play([Animation::fade_in(a)])?;
    s.play([Animation::fade_in(b)])?;
    s.play([Animation::create(line).run_time(0.7)])?;

    let mut counter = FrameCounter::default();
    s.run(&config(30), &mut counter)?;

    assert_eq!(s.state(), ExecState::Completed);
    assert_eq!(s.steps_executed(), 3);
    assert_eq!(s.graph().len(), 3);
    assert!((s.clock() - 2.7).abs() < 1e-9);
    assert_eq!(counter.frames, 81);
    assert_eq!(counter.markers, 3);
    Ok(())
}

#[test]
fn group_advances_by_its_longest_member() -> anyhow::Result<()> {
    let mut s = SceneScript::new("Group");
    let a = s.declare(Dot::at(0.0, 0.0))?;
    let b = s.declare(Text::new("slow", 24.0))?;
    s.play([
        Animation::fade_in(a).run_time(0.5),
        Animation::write(b).run_time(2.0),
    ])?;

    s.run(&config(10), &mut FrameCounter::default())?;
    assert!((s.clock() - 2.0).abs() < 1e-9);
    assert_eq!(s.frames_emitted(), 20);
    Ok(())
}

#[test]
fn frames_follow_the_clock_with_fractional_steps() -> anyhow::Result<()> {
    let mut s = SceneScript::new("Rounding");
    let a = s.declare(Dot::at(0.0, 0.0))?;
    s.play([Animation::fade_in(a).run_time(0.33)])?;
    s.wait(0.33)?;
    s.wait(0.34)?;

    let mut counter = FrameCounter::default();
    s.run(&config(24), &mut counter)?;
    assert_eq!(counter.frames, (s.clock() * 24.0).round() as usize);
    Ok(())
}

#[test]
fn removed_primitive_cannot_be_animated() -> anyhow::Result<()> {
    let mut s = SceneScript::new("Removed");
    let p = s.declare(Dot::at(0.0, 0.0))?;
    s.add(&[p])?;
    s.remove(&[p])?;
    s.play([Animation::indicate(p)])?;

    let err = s.run(&config(24), &mut FrameCounter::default()).unwrap_err();
    assert!(matches!(err, ScriptError::Removed(id) if id == p));
    assert_eq!(s.steps_executed(), 2);
    Ok(())
}

#[test]
fn transform_into_a_removed_shape_fails() -> anyhow::Result<()> {
    let mut s = SceneScript::new("StaleShape");
    let a = s.declare(Dot::at(0.0, 0.0))?;
    let b = s.declare(Dot::at(2.0, 0.0))?;
    s.add(&[a, b])?;
    s.remove(&[b])?;
    s.play([Animation::transform(a, b)])?;

    let err = s.run(&config(24), &mut FrameCounter::default()).unwrap_err();
    assert!(matches!(err, ScriptError::Removed(id) if id == b));
    assert!(err.is_reference_error());
    assert_eq!(s.frames_emitted(), 0);
    Ok(())
}

#[test]
fn clear_empties_the_graph_every_time() -> anyhow::Result<()> {
    let mut s = SceneScript::new("Clear");
    let a = s.declare(Dot::at(0.0, 0.0))?;
    let b = s.declare(Dot::at(1.0, 0.0))?;
    s.add(&[a, b])?;
    s.run(&config(24), &mut FrameCounter::default())?;
    assert_eq!(s.graph().len(), 2);

    s.clear();
    assert!(s.graph().is_empty());
    s.clear();
    assert!(s.graph().is_empty());
    Ok(())
}

#[test]
fn fade_out_all_leaves_an_empty_stage() -> anyhow::Result<()> {
    let mut s = SceneScript::new("FadeAll");
    let ids = [
        s.declare(Dot::at(0.0, 0.0))?,
        s.declare(Text::new("label", 24.0))?,
    ];
    s.play(ids.map(Animation::fade_in))?;
    s.fade_out_all(0.5)?;

    s.run(&config(24), &mut FrameCounter::default())?;
    assert!(s.graph().is_empty());
    assert!((s.clock() - 1.5).abs() < 1e-9);
    Ok(())
}

#[test]
fn recorder_starts_full_then_diffs() -> anyhow::Result<()> {
    let mut s = SceneScript::new("Recorded");
    let a = s.declare(Dot::at(0.0, 0.0))?;
    s.play([Animation::fade_in(a).run_time(0.5)])?;
    s.wait(0.5)?;

    let mut recorder = Recorder::new();
    s.run(&config(10), &mut recorder)?;
    let presentation = recorder.into_presentation()?;

    assert_eq!(presentation.frames.len(), 10);
    assert!(matches!(presentation.frames[0], Frame::Full { .. }));
    assert!(
        presentation.frames[1..]
            .iter()
            .all(|f| matches!(f, Frame::Diff { .. }))
    );
    assert_eq!(presentation.markers.len(), 2);
    assert_eq!(presentation.markers[1].frame_index, 5);
    Ok(())
}
