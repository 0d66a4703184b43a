//! Cosine similarity: title card, intuition, formula breakdown, worked example,
//! the three-case interpretation and song recommendations.

use kurbo::{Point, Vec2};

use crate::engine::SceneScript;
use crate::engine::error::ScriptResult;
use crate::engine::graph::PrimitiveId;
use crate::engine::objects::{
    Arc, Arrow, AxisRange, Axes, Dot, Drawable, EDGE_BUFF, Formula, LEFT, PaintExt, Rect, Text,
    DOWN, RIGHT, UP, at_point, paint,
};
use crate::engine::step::Animation;
use crate::types::Color;

use super::axis_labels;

const COSINE: &str = r"\text{Cosine Similarity} = \cos(\theta) = \frac{A\cdot B}{\|A\|\cdot\|B\|}";

pub fn title() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityTitle");
    let title = s.declare(Text::new("Cosine Similarity", 72.0))?;
    s.play([Animation::write(title)])?;
    s.wait(2.0)?;
    s.play([Animation::fade_out(title)])?;
    Ok(s)
}

/// Length of vector B in data units.
const B_LENGTH: f64 = 2.2;
const ARC_RADIUS: f64 = 0.7;

/// Vector B at `degrees` from A, its label, the angle arc and the theta label.
fn angle_pieces(axes: &Axes, degrees: f64) -> (Arrow, Formula, Arc, Formula) {
    let rad = degrees.to_radians();
    let origin = axes.c2p(0.0, 0.0);
    let end = axes.c2p(B_LENGTH * rad.cos(), B_LENGTH * rad.sin());
    let vec_b = Arrow::new(origin, end).color(paint::GREEN);
    let label_b = Formula::new(r"\vec{B}", 36.0).next_to(at_point(end), UP + RIGHT, 0.25);
    let arc = Arc::between(origin, Vec2::new(1.0, 0.0), Vec2::from_angle(rad), ARC_RADIUS)
        .color(paint::YELLOW);
    let theta = Formula::new(r"\theta", 30.0)
        .color(paint::YELLOW)
        .placed(axes.c2p(0.9 * (rad / 2.0).cos(), 0.9 * (rad / 2.0).sin()));
    (vec_b, label_b, arc, theta)
}

pub fn intuition() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityIntuition");

    let explanation =
        s.declare(Text::new("Compares the direction of two vectors", 32.0).to_edge(UP, 1.5))?;
    let range = AxisRange::new(-0.5, 3.5, 1.0);
    let axes = Axes::new(range, range)
        .lengths(6.0, 6.0)
        .shifted(DOWN * 0.5);
    let origin = axes.c2p(0.0, 0.0);
    let a_end = axes.c2p(B_LENGTH, 0.0);

    let vec_a = s.declare(Arrow::new(origin, a_end).color(paint::BLUE))?;
    let label_a = s.declare(Formula::new(r"\vec{A}", 36.0).next_to(at_point(a_end), RIGHT, 0.25))?;
    let (b, lb, arc, theta) = angle_pieces(&axes, 80.0);
    let current = [s.declare(b)?, s.declare(lb)?, s.declare(arc)?, s.declare(theta)?];
    let origin_dot = s.declare(Dot::new(origin).radius(0.05).color(paint::RED))?;

    s.play([Animation::write(explanation)])?;
    let intro = [
        Animation::create(vec_a),
        Animation::create(label_a),
        Animation::create(current[0]),
        Animation::create(current[1]),
        Animation::create(current[2]),
        Animation::write(current[3]),
        Animation::create(origin_dot),
    ];
    s.play(intro.map(|a| a.run_time(1.5)))?;
    s.wait(0.5)?;

    // Close the angle. Each id keeps its identity and takes the new shape.
    for degrees in [60.0, 40.0] {
        let (b, lb, arc, theta) = angle_pieces(&axes, degrees);
        let targets = [s.declare(b)?, s.declare(lb)?, s.declare(arc)?, s.declare(theta)?];
        s.play(
            current
                .iter()
                .zip(targets)
                .map(|(&id, into)| Animation::transform(id, into).run_time(1.5)),
        )?;
        s.wait(0.5)?;
    }

    s.wait(1.0)?;
    let everything = [explanation, vec_a, label_a, origin_dot]
        .into_iter()
        .chain(current);
    s.play(everything.map(Animation::fade_out))?;
    Ok(s)
}

pub fn formula() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityFormula");
    let formula = Formula::new(COSINE, 48.0);
    let highlights = [
        ("cos(θ)", paint::YELLOW),
        ("(A·B)", paint::BLUE),
        ("(‖A‖·‖B‖)", paint::GREEN),
    ];
    let boxes: Vec<Rect> = highlights
        .iter()
        .filter_map(|&(part, color)| formula.span_bounds(part).map(|b| Rect::around(b, 0.2).color(color)))
        .collect();

    let formula = s.declare(formula)?;
    s.play([Animation::write(formula)])?;
    s.wait(1.0)?;
    for highlight in boxes {
        let id = s.declare(highlight)?;
        s.play([Animation::create(id)])?;
        s.wait(1.0)?;
        s.play([Animation::fade_out(id)])?;
    }
    s.wait(1.0)?;
    s.play([Animation::fade_out(formula)])?;
    Ok(s)
}

pub fn example() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityExample");
    let (a, b) = ((1.0, 2.0), (3.0, 4.0));

    let info = Formula::new(r"\vec{A} = [1, 2] \\ \vec{B} = [3, 4]", 36.0)
        .to_edge(UP, EDGE_BUFF)
        .to_edge(LEFT, EDGE_BUFF);
    let range = AxisRange::new(-1.0, 5.0, 1.0);
    let axes = Axes::new(range, range)
        .lengths(5.0, 5.0)
        .with_numbers()
        .scale(0.9)
        .next_to(info.bounds(), DOWN, 0.5)
        .to_edge(LEFT, 1.0);
    let (x_label, y_label) = axis_labels(&axes, "x", "y");
    let origin = axes.c2p(0.0, 0.0);
    let a_end = axes.c2p(a.0, a.1);
    let b_end = axes.c2p(b.0, b.1);
    let vec_a = Arrow::new(origin, a_end).color(paint::BLUE);
    let vec_b = Arrow::new(origin, b_end).color(paint::GREEN);
    let label_a = Formula::new(r"\vec{A}", 36.0)
        .color(paint::BLUE)
        .next_to(at_point(a_end), UP + RIGHT, 0.1);
    let label_b = Formula::new(r"\vec{B}", 36.0)
        .color(paint::GREEN)
        .next_to(at_point(b_end), UP + RIGHT, 0.1);

    let calc = Point::new(2.8, -0.5);
    let dot_product = Formula::new(
        r"\text{\small Dot Product:} \\ A \cdot B &= (1 \times 3) + (2 \times 4) \\ &= 3 + 8 \\ &= 11",
        32.0,
    )
    .placed(calc);
    let magnitudes = Formula::new(
        r"\text{\small Magnitudes:} \\ \|A\| &= \sqrt{1^2+2^2} = \sqrt{5} \\ \|B\| &= \sqrt{3^2+4^2} = \sqrt{25} = 5",
        32.0,
    )
    .placed(calc);
    let cosine = Formula::new(
        r"\text{\small Cosine Similarity:} \\ \cos(\theta) &= \frac{A \cdot B}{\|A\| \cdot \|B\|} \\ &= \frac{11}{\sqrt{5} \cdot 5} \\ &= \frac{11}{5\sqrt{5}} \\ &\approx 0.983",
        32.0,
    )
    .placed(calc);
    let headline = Formula::new(COSINE, 36.0).to_edge(UP, EDGE_BUFF);

    let info = s.declare(info)?;
    let axes = s.declare(axes)?;
    let x_label = s.declare(x_label)?;
    let y_label = s.declare(y_label)?;
    let vec_a = s.declare(vec_a)?;
    let vec_b = s.declare(vec_b)?;
    let label_a = s.declare(label_a)?;
    let label_b = s.declare(label_b)?;

    s.play([Animation::write(info)])?;
    s.wait(0.5)?;
    s.play([
        Animation::create(axes),
        Animation::write(x_label),
        Animation::write(y_label),
    ])?;
    s.wait(0.5)?;
    s.play([Animation::create(vec_a), Animation::write(label_a)])?;
    s.wait(0.2)?;
    s.play([Animation::create(vec_b), Animation::write(label_b)])?;
    s.wait(1.0)?;

    let headline = s.declare(headline)?;
    s.play([Animation::write(headline)])?;
    s.wait(1.0)?;

    // Each calculation takes the same spot on the right.
    let dot_product = s.declare(dot_product)?;
    s.play([Animation::write(dot_product)])?;
    s.wait(2.0)?;
    s.play([Animation::fade_out(dot_product)])?;
    let magnitudes = s.declare(magnitudes)?;
    s.play([Animation::write(magnitudes)])?;
    s.wait(3.0)?;
    s.play([Animation::fade_out(magnitudes)])?;
    let cosine = s.declare(cosine)?;
    s.play([Animation::write(cosine)])?;
    s.wait(4.0)?;

    s.play(
        [
            info, axes, x_label, y_label, vec_a, vec_b, label_a, label_b, headline, cosine,
        ]
        .map(Animation::fade_out),
    )?;
    Ok(s)
}

/// One small plot with a pair of vectors and a three-line caption.
struct Case {
    a: (f64, f64),
    b: (f64, f64),
    caption: &'static str,
}

const CASES: [Case; 3] = [
    Case {
        a: (1.5, 1.0),
        b: (1.2, 0.8),
        caption: "Angle is close to 0\nCos(θ) close to 1\nSimilar vectors",
    },
    Case {
        a: (1.5, 0.0),
        b: (0.0, 1.5),
        caption: "Angle is close to 90°\nCos(θ) close to 0\nUnrelated vectors",
    },
    Case {
        a: (1.5, 0.5),
        b: (-1.2, -0.4),
        caption: "Angle is close to 180°\nCos(θ) close to -1\nOpposite vectors",
    },
];

pub fn interpretation() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityInterpretation");
    let range = AxisRange::new(-2.0, 2.0, 1.0);

    let mut plots: Vec<PrimitiveId> = Vec::new();
    let mut vectors: Vec<PrimitiveId> = Vec::new();
    let mut captions: Vec<PrimitiveId> = Vec::new();
    for (i, case) in CASES.iter().enumerate() {
        let axes = Axes::new(range, range)
            .lengths(2.5, 2.5)
            .placed(Point::new(4.0 * (i as f64 - 1.0), 0.0))
            .to_edge(UP, 1.0);
        let origin = axes.c2p(0.0, 0.0);
        for end in [case.a, case.b] {
            let arrow = Arrow::new(origin, axes.c2p(end.0, end.1)).color(paint::RED);
            vectors.push(s.declare(arrow)?);
        }
        let caption = Text::new(case.caption, 24.0).next_to(axes.bounds(), DOWN, 0.5);
        captions.push(s.declare(caption)?);
        plots.push(s.declare(axes)?);
    }

    s.play(plots.iter().map(|&id| Animation::create(id)))?;
    s.wait(1.0)?;
    s.play(vectors.iter().map(|&id| Animation::create(id)))?;
    s.wait(1.0)?;
    s.play(captions.iter().map(|&id| Animation::write(id)))?;
    s.wait(2.0)?;
    Ok(s)
}

const FEATURES: [&str; 5] = ["Tempo", "Energy", "Danceability", "Instrumentation", "Vocals"];
/// Offsets of each value inside the vector text, as a share of its width.
const VALUE_OFFSETS: [f64; 5] = [-0.36, -0.18, 0.0, 0.18, 0.36];
/// Label spread below the vector: x as a share of its width, absolute y.
const LABEL_SPREAD: [(f64, f64); 5] = [
    (-0.5, -2.5),
    (-0.25, -3.2),
    (0.0, -2.8),
    (0.25, -3.2),
    (0.5, -2.5),
];

/// Album cover stand-in: a filled square captioned with the title.
fn cover(title: &str, color: Color, at: Point) -> (Rect, Text) {
    let frame = Rect::square(0.9).color(color).fill(color, 0.3).placed(at);
    let name = Text::new(title, 16.0).next_to(frame.bounds(), DOWN, 0.1);
    (frame, name)
}

/// A song vector from the origin with its cover beside the tip.
fn song(
    s: &mut SceneScript,
    axes: &Axes,
    (x, y): (f64, f64),
    title: &str,
    color: Color,
    offset: Vec2,
) -> ScriptResult<[PrimitiveId; 3]> {
    let end = axes.c2p(x, y);
    let vector = Arrow::new(axes.c2p(0.0, 0.0), end)
        .color(color)
        .stroke_width(5.0);
    let (frame, label) = cover(title, color, end + offset);
    Ok([s.declare(vector)?, s.declare(frame)?, s.declare(label)?])
}

fn arrive([vector, frame, label]: [PrimitiveId; 3]) -> [Animation; 3] {
    [
        Animation::create(vector),
        Animation::fade_in(frame),
        Animation::fade_in(label),
    ]
}

pub fn music_rec() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CosineSimilarityMusicRec");

    let title =
        Text::new("Cosine Similarity for Recommendation Systems", 40.0).to_edge(UP, EDGE_BUFF);
    let vector_title =
        Text::new("Song As A Feature Vector", 40.0).next_to(title.bounds(), DOWN, 0.7);
    let numbers = Text::new("[ 0.8 , 0.7 , 0.9 , 0.4 , 0.6 ]", 48.0)
        .next_to(vector_title.bounds(), DOWN, 1.0);
    let width = numbers.bounds().width();
    let center = numbers.position;

    let title = s.declare(title)?;
    s.play([Animation::write(title)])?;
    s.wait(1.0)?;
    let vector_title = s.declare(vector_title)?;
    s.play([Animation::write(vector_title)])?;
    let numbers = s.declare(numbers)?;
    s.play([Animation::write(numbers)])?;

    // Each feature name points at its value from below.
    let mut pointers = Vec::new();
    let spread = FEATURES.iter().zip(VALUE_OFFSETS).zip(LABEL_SPREAD);
    for ((feature, offset), (spread_x, y)) in spread {
        let label = Text::new(*feature, 28.0).placed(Point::new(width * spread_x, y));
        let start = Point::new(label.position.x, label.bounds().y1);
        let value = center + Vec2::new(width * offset, 0.0);
        let dir = (value - start).normalize();
        let arrow = Arrow::new(start + dir * 0.1, value - dir * 0.1)
            .color(paint::BLUE)
            .stroke_width(2.0);
        pointers.push(s.declare(label)?);
        pointers.push(s.declare(arrow)?);
    }
    s.play(super::each(&pointers, Animation::create))?;
    s.wait(2.0)?;
    let mut gone = vec![vector_title, numbers];
    gone.extend(pointers);
    s.play(super::each(&gone, Animation::fade_out))?;

    // Song space: a number plane with tips and tick numbers.
    let axes = Axes::new(AxisRange::new(-4.0, 4.0, 1.0), AxisRange::new(-3.0, 3.0, 1.0))
        .lengths(8.0, 5.5)
        .with_numbers()
        .with_grid()
        .shifted(DOWN * 0.2);
    let origin = axes.c2p(0.0, 0.0);
    let plane = s.declare(axes.clone())?;
    s.play([Animation::create(plane)])?;

    let profile_end = axes.c2p(2.0, 1.5);
    let profile = s.declare(
        Arrow::new(origin, profile_end)
            .color(paint::BLUE)
            .stroke_width(6.0),
    )?;
    let profile_label = s.declare(
        Text::new("Song Profile", 28.0)
            .color(paint::BLUE)
            .placed(profile_end + Vec2::new(0.7, 0.4)),
    )?;
    s.play([Animation::create(profile), Animation::write(profile_label)])?;
    s.wait(5.0)?;

    let similar = [
        song(&mut s, &axes, (2.5, 2.0), "Starboy", paint::GREEN, Vec2::new(0.6, 0.6))?,
        song(&mut s, &axes, (3.0, 1.0), "Tame Impala", paint::GREEN, Vec2::new(0.6, 0.2))?,
    ];
    s.play(similar.iter().flat_map(|&ids| arrive(ids)))?;
    s.wait(5.0)?;
    let beethoven = Vec2::new(-0.7, -0.2);
    let different = song(&mut s, &axes, (-2.5, -1.5), "Beethoven", paint::RED, beethoven)?;
    s.play(arrive(different))?;
    s.wait(10.0)?;

    let mut gone = vec![title, plane, profile, profile_label];
    gone.extend(similar.into_iter().flatten());
    gone.extend(different);
    s.play(super::each(&gone, Animation::fade_out))?;
    Ok(s)
}
