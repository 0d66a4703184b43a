use distance_scenes::config::RenderConfig;
use distance_scenes::engine::ExecState;
use distance_scenes::renderer::{FrameCounter, Recorder};
use distance_scenes::scenes;

fn low_fps() -> RenderConfig {
    RenderConfig {
        fps: 4,
        ..RenderConfig::default()
    }
}

#[test]
fn every_scene_runs_to_completion() -> anyhow::Result<()> {
    for entry in scenes::list() {
        let mut script = scenes::build(entry.name)?;
        assert!(!script.is_empty(), "{} has no steps", entry.name);

        let mut counter = FrameCounter::default();
        script.run(&low_fps(), &mut counter)?;

        assert_eq!(script.state(), ExecState::Completed);
        assert_eq!(script.steps_executed(), script.len(), "{}", entry.name);
        assert_eq!(counter.markers, script.len());
        assert_eq!(
            counter.frames,
            (script.clock() * 4.0).round() as usize,
            "{}",
            entry.name
        );
    }
    Ok(())
}

#[test]
fn scenes_that_fade_everything_end_empty() -> anyhow::Result<()> {
    for name in [
        "DistanceMetricsIntro",
        "CosineSimilarityTitle",
        "CosineSimilarityIntuition",
        "CosineSimilarityFormula",
        "CosineSimilarityExample",
        "CosineSimilarityMusicRec",
    ] {
        let mut script = scenes::build(name)?;
        script.run(&low_fps(), &mut FrameCounter::default())?;
        assert!(script.graph().is_empty(), "{name} left primitives on stage");
    }
    Ok(())
}

#[test]
fn interpretation_keeps_its_plots() -> anyhow::Result<()> {
    let mut script = scenes::build("CosineSimilarityInterpretation")?;
    script.run(&low_fps(), &mut FrameCounter::default())?;
    // Three axes, six vectors and three captions.
    assert_eq!(script.graph().len(), 12);
    Ok(())
}

#[test]
fn rendered_scene_serializes() -> anyhow::Result<()> {
    let mut script = scenes::build("CosineSimilarityTitle")?;
    let mut recorder = Recorder::new();
    script.run(&low_fps(), &mut recorder)?;
    let presentation = recorder.into_presentation()?;

    let json = serde_json::to_string(&presentation)?;
    assert!(json.contains("\"type\":\"full\""));
    assert_eq!(presentation.fps, 4);
    assert_eq!(presentation.markers.len(), 3);
    Ok(())
}
