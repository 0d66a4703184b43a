//! Overview of the three metrics side by side.

use kurbo::Point;

use crate::engine::SceneScript;
use crate::engine::error::ScriptResult;
use crate::engine::graph::PrimitiveId;
use crate::engine::objects::{
    Arc, Arrow, AxisRange, Axes, Dot, Drawable, EDGE_BUFF, Formula, Line, PaintExt, Text, DOWN,
    RIGHT, UP, at_point, paint,
};
use crate::engine::step::Animation;
use crate::types::Color;

const POINT_A: (f64, f64) = (1.0, 1.0);
const POINT_B: (f64, f64) = (4.0, 3.0);
const VECTOR_A: (f64, f64) = (3.0, 1.0);
const VECTOR_B: (f64, f64) = (2.0, 4.0);

/// Small tipped axes with a caption underneath.
fn section(
    s: &mut SceneScript,
    caption: &str,
    color: Color,
    range: AxisRange,
    center: Point,
) -> ScriptResult<(Axes, PrimitiveId, PrimitiveId)> {
    let axes = Axes::new(range, range).lengths(3.5, 3.5).placed(center);
    let title = Text::new(caption, 24.0)
        .color(color)
        .next_to(axes.bounds(), DOWN, 0.3);
    let axes_id = s.declare(axes.clone())?;
    let title_id = s.declare(title)?;
    s.play([
        Animation::create(axes_id).run_time(0.5),
        Animation::write(title_id).run_time(0.5),
    ])?;
    Ok((axes, axes_id, title_id))
}

pub fn build() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("DistanceMetricsIntro");
    let mut shown: Vec<PrimitiveId> = Vec::new();

    let title = s.declare(
        Text::new("Distance Metrics in Machine Learning", 48.0).to_edge(UP, EDGE_BUFF),
    )?;
    s.play([Animation::write(title).run_time(2.0)])?;
    s.wait(2.0)?;

    // Euclidean: straight segment between two points.
    let points = AxisRange::new(0.0, 5.0, 1.0);
    let (axes, a, b) = section(&mut s, "Euclidean Distance", paint::BLUE, points, Point::new(-4.0, 0.0))?;
    shown.extend([a, b]);
    let pa = axes.c2p(POINT_A.0, POINT_A.1);
    let pb = axes.c2p(POINT_B.0, POINT_B.1);
    let dot_a = Dot::new(pa).color(paint::RED);
    let dot_b = Dot::new(pb).color(paint::GREEN);
    let label_a = Text::new("A", 20.0).color(paint::RED).next_to(dot_a.bounds(), DOWN, 0.1);
    let label_b = Text::new("B", 20.0).color(paint::GREEN).next_to(dot_b.bounds(), DOWN, 0.1);
    let ids = [s.declare(dot_a)?, s.declare(dot_b)?];
    s.play(ids.map(|id| Animation::fade_in(id).run_time(0.5)))?;
    let labels = [s.declare(label_a)?, s.declare(label_b)?];
    s.play(labels.map(|id| Animation::write(id).run_time(0.3)))?;
    let line = s.declare(Line::new(pa, pb).color(paint::YELLOW))?;
    s.play([Animation::create(line).run_time(0.7)])?;
    s.wait(0.3)?;
    shown.extend(ids);
    shown.extend(labels);
    shown.push(line);

    // Manhattan: horizontal then vertical leg.
    let (axes, a, b) = section(&mut s, "Manhattan Distance", paint::RED, points, Point::ORIGIN)?;
    shown.extend([a, b]);
    let pa = axes.c2p(POINT_A.0, POINT_A.1);
    let pb = axes.c2p(POINT_B.0, POINT_B.1);
    let corner = axes.c2p(POINT_B.0, POINT_A.1);
    let dot_a = Dot::new(pa).color(paint::RED);
    let dot_b = Dot::new(pb).color(paint::GREEN);
    let label_a = Text::new("A", 20.0).color(paint::RED).next_to(dot_a.bounds(), DOWN, 0.1);
    let label_b = Text::new("B", 20.0).color(paint::GREEN).next_to(dot_b.bounds(), UP, 0.1);
    let ids = [s.declare(dot_a)?, s.declare(dot_b)?];
    s.play(ids.map(|id| Animation::fade_in(id).run_time(0.3)))?;
    let labels = [s.declare(label_a)?, s.declare(label_b)?];
    s.play(labels.map(|id| Animation::write(id).run_time(0.3)))?;
    let h_line = s.declare(Line::new(pa, corner).color(paint::ORANGE))?;
    let v_line = s.declare(Line::new(corner, pb).color(paint::ORANGE))?;
    s.play([Animation::create(h_line).run_time(0.5)])?;
    s.play([Animation::create(v_line).run_time(0.5)])?;
    s.wait(0.3)?;
    shown.extend(ids);
    shown.extend(labels);
    shown.extend([h_line, v_line]);

    // Cosine: two vectors from the origin and the angle between them.
    let vectors = AxisRange::new(-1.0, 5.0, 1.0);
    let (axes, a, b) = section(&mut s, "Cosine Similarity", paint::GREEN, vectors, Point::new(4.0, 0.0))?;
    shown.extend([a, b]);
    let origin = axes.c2p(0.0, 0.0);
    let end_a = axes.c2p(VECTOR_A.0, VECTOR_A.1);
    let end_b = axes.c2p(VECTOR_B.0, VECTOR_B.1);
    let arrows = [
        s.declare(Arrow::new(origin, end_a).color(paint::RED))?,
        s.declare(Arrow::new(origin, end_b).color(paint::GREEN))?,
    ];
    s.play(arrows.map(|id| Animation::grow(id).run_time(0.8)))?;
    let labels = [
        s.declare(Text::new("A", 20.0).color(paint::RED).next_to(at_point(end_a), RIGHT, 0.1))?,
        s.declare(Text::new("B", 20.0).color(paint::GREEN).next_to(at_point(end_b), UP, 0.1))?,
    ];
    s.play(labels.map(|id| Animation::write(id).run_time(0.3)))?;
    let angle = Arc::between(origin, end_a - origin, end_b - origin, 0.5).color(paint::YELLOW);
    let theta = Formula::new(r"\theta", 24.0)
        .color(paint::YELLOW)
        .placed(angle.mid_point_at(0.8));
    let angle = s.declare(angle)?;
    let theta = s.declare(theta)?;
    s.play([Animation::create(angle).run_time(0.5)])?;
    s.play([Animation::write(theta).run_time(0.3)])?;
    s.wait(0.5)?;
    shown.extend(arrows);
    shown.extend(labels);
    shown.extend([angle, theta]);

    s.play(shown.iter().map(|&id| Animation::fade_out(id).run_time(0.3)))?;
    s.play([Animation::fade_out(title).run_time(0.5)])?;
    Ok(s)
}
