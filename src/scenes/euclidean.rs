//! Euclidean distance, start to finish: history, properties, how it works,
//! k-nearest neighbours, a pairs-trading example and its trading strategy.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::SceneScript;
use crate::engine::error::ScriptResult;
use crate::engine::graph::PrimitiveId;
use crate::engine::objects::{
    Arc, Arrow, AxisRange, Axes, Circle, Dot, Drawable, Formula, LEFT, Line, PaintExt, Rect, Table,
    Text, DOWN, RIGHT, UP, at_point, paint,
};
use crate::engine::step::Animation;
use crate::types::Color;

use super::{declare_all, each};

/// Seed for the scattered KNN training points.
const KNN_SEED: u64 = 42;
const DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];
const COCA_COLA: [f64; 5] = [1.2, 0.8, -0.5, 1.4, -0.2];
const PEPSI: [f64; 5] = [1.0, 0.5, -0.8, 1.0, 0.3];

/// Section heading under the persistent title.
fn heading(title: kurbo::Rect, text: &str, color: Color) -> Text {
    Text::new(text, 36.0).color(color).next_to(title, DOWN, 0.5)
}

fn fade_out(s: &mut SceneScript, ids: &[PrimitiveId]) -> ScriptResult<()> {
    s.play(each(ids, Animation::fade_out))
}

pub fn build() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("EuclideanDistanceVisualization");

    let title = Text::new("Understanding Euclidean Distance", 40.0).to_edge(UP, 0.5);
    let top = title.bounds();
    let title = s.declare(title)?;
    s.play([Animation::write(title)])?;
    s.wait(0.5)?;

    history(&mut s, top)?;
    properties(&mut s, top)?;
    how_it_works(&mut s, top)?;
    nearest_neighbours(&mut s, top)?;
    stocks(&mut s, top)?;
    conclusion(&mut s, top, title)?;
    Ok(s)
}

fn history(s: &mut SceneScript, top: kurbo::Rect) -> ScriptResult<()> {
    let section = s.declare(heading(top, "Brief History", paint::BLUE))?;
    s.play([Animation::fade_in(section)])?;

    let greek = Text::new("Euclidean Geometry", 30.0)
        .to_edge(LEFT, 2.0)
        .shifted(DOWN);
    let euclid = Text::new("Euclid (300 BCE)", 24.0)
        .color(paint::BLUE)
        .next_to(greek.bounds(), UP, 0.3);
    let pythagoras = Formula::new("a^2 + b^2 = c^2", 36.0).next_to(greek.bounds(), DOWN, 0.5);
    let modern = Text::new("Analytic Geometry", 30.0)
        .to_edge(RIGHT, 2.0)
        .shifted(DOWN);
    let descartes = Text::new("Descartes (17th century)", 24.0)
        .color(paint::GREEN)
        .next_to(modern.bounds(), UP, 0.3);
    let distance = Formula::new(r"d = \sqrt{(x_2 - x_1)^2 + (y_2 - y_1)^2}", 32.0)
        .next_to(modern.bounds(), DOWN, 0.5);
    let from = Point::new(greek.bounds().x1 + 0.7, greek.position.y);
    let to = Point::new(modern.bounds().x0 - 0.7, modern.position.y);
    let timeline = Arrow::new(from, to);
    let timeline_text =
        Text::new("Evolution of Distance Concept", 20.0).next_to(timeline.bounds(), UP, 0.1);

    let greek = s.declare(greek)?;
    let euclid = s.declare(euclid)?;
    let pythagoras = s.declare(pythagoras)?;
    let modern = s.declare(modern)?;
    let descartes = s.declare(descartes)?;
    let distance = s.declare(distance)?;
    let timeline = s.declare(timeline)?;
    let timeline_text = s.declare(timeline_text)?;

    s.play([Animation::fade_in(greek), Animation::write(euclid)])?;
    s.wait(0.5)?;
    s.play([Animation::write(pythagoras)])?;
    s.wait(0.7)?;
    s.play([Animation::create(timeline), Animation::write(timeline_text)])?;
    s.wait(0.5)?;
    s.play([Animation::fade_in(modern), Animation::write(descartes)])?;
    s.wait(0.5)?;
    s.play([Animation::write(distance)])?;
    s.wait(1.0)?;

    fade_out(
        s,
        &[
            greek,
            euclid,
            pythagoras,
            modern,
            descartes,
            distance,
            timeline,
            timeline_text,
            section,
        ],
    )
}

fn properties(s: &mut SceneScript, top: kurbo::Rect) -> ScriptResult<()> {
    let section = heading(top, "Properties of Euclidean Distance", paint::PURPLE);
    let below = section.bounds();
    let section = s.declare(section)?;
    s.play([Animation::fade_in(section)])?;
    s.wait(0.5)?;

    isotropy(s, below)?;
    curvature(s, below)?;
    fade_out(s, &[section])
}

/// Circles of equal distance around a centre.
fn isotropy(s: &mut SceneScript, below: kurbo::Rect) -> ScriptResult<()> {
    let heading = Text::new("Isotropy: Equal in All Directions", 28.0)
        .color(paint::TEAL)
        .next_to(below, DOWN, 0.5);
    let range = AxisRange::new(-4.0, 4.0, 1.0);
    let axes = Axes::new(range, range)
        .lengths(6.0, 6.0)
        .with_numbers()
        .without_tips()
        .scale(0.7)
        .next_to(heading.bounds(), DOWN, 0.5);
    let heading = s.declare(heading)?;
    s.play([Animation::write(heading)])?;

    let center = axes.c2p(0.0, 0.0);
    let unit = axes.c2p(1.0, 0.0).x - center.x;
    let dot = Dot::new(center).radius(0.1).color(paint::RED);
    let origin_label = Text::new("O", 24.0)
        .color(paint::RED)
        .next_to(dot.bounds(), DOWN + LEFT, 0.1);
    let axes_id = s.declare(axes.clone())?;
    let dot = s.declare(dot)?;
    let origin_label = s.declare(origin_label)?;
    s.play([Animation::create(axes_id)])?;
    s.play([Animation::fade_in(dot), Animation::write(origin_label)])?;
    s.wait(0.2)?;

    let mut rings = Vec::new();
    for r in 1..=3 {
        let circle = Circle::new(f64::from(r) * unit)
            .color(paint::BLUE_A)
            .opacity(0.7)
            .placed(center);
        let label = Text::new(format!("d = {r}"), 16.0)
            .color(paint::BLUE)
            .placed(circle.point_at_angle(FRAC_PI_4) + Vec2::new(0.2, 0.2));
        let circle = s.declare(circle)?;
        let label = s.declare(label)?;
        s.play([Animation::create(circle)])?;
        s.play([Animation::write(label)])?;
        s.wait(0.2)?;
        rings.extend([circle, label]);
    }

    let spokes = declare_all(
        s,
        (0..8).map(|i| {
            let angle = f64::from(i) * FRAC_PI_4;
            Line::dashed(center, axes.c2p(3.0 * angle.cos(), 3.0 * angle.sin()))
                .color(paint::YELLOW)
        }),
    )?;
    s.play(each(&spokes, Animation::create))?;
    s.wait(0.7)?;

    let mut gone = vec![axes_id, dot, origin_label, heading];
    gone.extend(rings);
    gone.extend(spokes);
    fade_out(s, &gone)
}

/// Flat grid next to a curved surface: straight lines stop being shortest.
fn curvature(s: &mut SceneScript, below: kurbo::Rect) -> ScriptResult<()> {
    let heading = s.declare(
        Text::new("Euclidean vs. Non-Euclidean Geometry", 28.0)
            .color(paint::GREEN)
            .next_to(below, DOWN, 0.5),
    )?;
    s.play([Animation::write(heading)])?;

    let flat_label = Text::new("Euclidean (Flat) Space", 20.0)
        .color(paint::BLUE)
        .to_edge(LEFT, 2.5)
        .shifted(UP * 0.5);
    let curved_label = Text::new("Non-Euclidean (Curved) Space", 20.0)
        .color(paint::RED)
        .to_edge(RIGHT, 2.5)
        .shifted(UP * 0.5);
    let flat = Rect::square(3.0)
        .color(paint::BLUE)
        .fill(paint::BLUE, 0.2)
        .next_to(flat_label.bounds(), DOWN, 0.3);
    let curved = Circle::new(1.5)
        .color(paint::RED)
        .fill(paint::RED, 0.2)
        .next_to(curved_label.bounds(), DOWN, 0.3);

    let flat_center = flat.center;
    let flat_points: Vec<Dot> = (-1..=1)
        .flat_map(|i| (-1..=1).map(move |j| (i, j)))
        .filter(|&ij| ij != (0, 0))
        .map(|(i, j)| {
            Dot::new(flat_center + Vec2::new(f64::from(i), f64::from(j)))
                .radius(0.07)
                .color(paint::YELLOW)
        })
        .collect();
    let curved_points: Vec<Dot> = (0..8)
        .map(|k| {
            Dot::new(curved.point_at_angle(TAU * f64::from(k) / 8.0))
                .radius(0.07)
                .color(paint::YELLOW)
        })
        .collect();
    let flat_line = Line::new(flat_center, flat_points[0].center).color(paint::GREEN);
    let wrong = Line::new(curved.center, curved_points[0].center).color(paint::GREEN);
    let wrong_faded = wrong.clone().color(paint::RED).opacity(0.5);
    let geodesic = Arc::new(1.5, 0.0, PI / 4.0)
        .color(paint::PURPLE)
        .stroke_width(4.0)
        .placed(curved.center);
    let curved_center = curved.center;

    let labels = declare_all(s, [flat_label, curved_label])?;
    s.play(each(&labels, Animation::write))?;
    s.wait(0.2)?;
    let spaces = [s.declare(flat)?, s.declare(curved)?];
    s.play(each(&spaces, Animation::create))?;
    s.wait(0.5)?;

    let centers = declare_all(
        s,
        [flat_center, curved_center].map(|c| Dot::new(c).radius(0.1).color(paint::RED)),
    )?;
    let mut grid = declare_all(s, flat_points)?;
    grid.extend(declare_all(s, curved_points)?);
    s.play(
        each(&centers, Animation::fade_in)
            .into_iter()
            .chain(each(&grid, Animation::fade_in)),
    )?;
    s.wait(0.5)?;

    let flat_line = s.declare(flat_line)?;
    let wrong = s.declare(wrong)?;
    s.play([Animation::create(flat_line)])?;
    s.play([Animation::create(wrong)])?;
    s.wait(0.5)?;
    let wrong_faded = s.declare(wrong_faded)?;
    s.play([Animation::transform(wrong, wrong_faded)])?;
    let geodesic = s.declare(geodesic)?;
    s.play([Animation::create(geodesic)])?;

    let compare = s.declare(
        Text::new("Shortest path changes in curved space!", 22.0)
            .color(paint::YELLOW)
            .to_edge(DOWN, 0.8),
    )?;
    s.play([Animation::write(compare)])?;
    s.wait(1.0)?;

    let mut gone = labels;
    gone.extend(spaces);
    gone.extend(centers);
    gone.extend(grid);
    gone.extend([flat_line, wrong, geodesic, compare, heading]);
    fade_out(s, &gone)
}

fn how_it_works(s: &mut SceneScript, top: kurbo::Rect) -> ScriptResult<()> {
    let section = heading(top, "How It Works", paint::GREEN);
    let formula = Formula::new(
        r"\text{Distance} = \sqrt{(x_2 - x_1)^2 + (y_2 - y_1)^2}",
        34.0,
    )
    .next_to(section.bounds(), DOWN, 0.5);
    let range = AxisRange::new(-1.0, 6.0, 1.0);
    let axes = Axes::new(range, range)
        .lengths(6.0, 6.0)
        .with_numbers()
        .without_tips()
        .scale(0.7)
        .next_to(formula.bounds(), DOWN, 0.7);
    let (x_label, y_label) = super::axis_labels(&axes, "x", "y");

    let section = s.declare(section)?;
    s.play([Animation::fade_in(section)])?;
    let formula = s.declare(formula)?;
    s.play([Animation::write(formula)])?;
    s.wait(1.0)?;
    let axes_id = s.declare(axes.clone())?;
    let x_label = s.declare(x_label)?;
    let y_label = s.declare(y_label)?;
    s.play([
        Animation::create(axes_id),
        Animation::write(x_label),
        Animation::write(y_label),
    ])?;
    s.wait(0.5)?;

    let pa = axes.c2p(1.0, 1.0);
    let pb = axes.c2p(4.0, 4.0);
    let corner = axes.c2p(4.0, 1.0);
    let dot_a = Dot::new(pa).radius(0.12).color(paint::BLUE);
    let label_a = Text::new("A(1, 1)", 24.0)
        .color(paint::BLUE)
        .next_to(dot_a.bounds(), DOWN + LEFT, 0.2);
    let dot_b = Dot::new(pb).radius(0.12).color(paint::RED);
    let label_b = Text::new("B(4, 4)", 24.0)
        .color(paint::RED)
        .next_to(dot_b.bounds(), UP + RIGHT, 0.2);
    let distance_label = Formula::new(r"d \approx 4.24", 28.0)
        .color(paint::YELLOW)
        .next_to(dot_b.bounds(), RIGHT, 0.5);

    let (dot_a, label_a) = (s.declare(dot_a)?, s.declare(label_a)?);
    s.play([
        Animation::fade_in(dot_a),
        Animation::write(label_a),
        Animation::indicate(dot_a),
    ])?;
    s.wait(0.5)?;
    let (dot_b, label_b) = (s.declare(dot_b)?, s.declare(label_b)?);
    s.play([
        Animation::fade_in(dot_b),
        Animation::write(label_b),
        Animation::indicate(dot_b),
    ])?;
    s.wait(0.5)?;

    let x_leg = Line::new(pa, corner).color(paint::GREEN_B);
    let y_leg = Line::new(corner, pb).color(paint::PURPLE_B);
    let delta_x = Formula::new(r"\Delta x = 3", 24.0)
        .color(paint::GREEN_B)
        .next_to(x_leg.bounds(), DOWN, 0.2);
    let delta_y = Formula::new(r"\Delta y = 3", 24.0)
        .color(paint::PURPLE_B)
        .next_to(y_leg.bounds(), RIGHT, 0.2);
    let (x_leg, delta_x) = (s.declare(x_leg)?, s.declare(delta_x)?);
    s.play([Animation::create(x_leg), Animation::write(delta_x)])?;
    s.wait(0.5)?;
    let (y_leg, delta_y) = (s.declare(y_leg)?, s.declare(delta_y)?);
    s.play([Animation::create(y_leg), Animation::write(delta_y)])?;
    s.wait(0.7)?;

    let hypotenuse = s.declare(Line::new(pa, pb).color(paint::YELLOW))?;
    s.play([Animation::create(hypotenuse)])?;
    s.wait(0.5)?;

    // Square corner marker inside the triangle.
    let size = 0.25;
    let inner = corner + Vec2::new(-size, size);
    let right_angle = declare_all(
        s,
        [
            Line::new(corner + Vec2::new(-size, 0.0), inner),
            Line::new(inner, corner + Vec2::new(0.0, size)),
        ],
    )?;
    s.play(each(&right_angle, Animation::create))?;
    s.wait(0.5)?;

    let distance_label = s.declare(distance_label)?;
    s.play([
        Animation::restyle(hypotenuse, paint::YELLOW, 6.0),
        Animation::write(distance_label),
    ])?;
    s.wait(1.0)?;

    let mut gone = vec![
        axes_id,
        x_label,
        y_label,
        dot_a,
        dot_b,
        label_a,
        label_b,
        hypotenuse,
        x_leg,
        y_leg,
        delta_x,
        delta_y,
    ];
    gone.extend(right_angle);
    gone.extend([distance_label, formula, section]);
    fade_out(s, &gone)
}

fn nearest_neighbours(s: &mut SceneScript, top: kurbo::Rect) -> ScriptResult<()> {
    let section = heading(top, "K-Nearest Neighbors Algorithm", paint::BLUE_D);
    let subtitle = Text::new("Classification using distance-based similarity", 24.0)
        .next_to(section.bounds(), DOWN, 0.4);
    let section = s.declare(section)?;
    s.play([Animation::fade_in(section)])?;
    s.wait(0.5)?;
    let subtitle = s.declare(subtitle)?;
    s.play([Animation::write(subtitle)])?;
    s.wait(0.7)?;
    fade_out(s, &[section, subtitle])?;
    s.wait(0.3)?;

    let range = AxisRange::new(0.0, 7.0, 1.0);
    let axes = Axes::new(range, range)
        .lengths(7.0, 7.0)
        .with_numbers()
        .without_tips()
        .scale(0.75);
    let x_label = Text::new("Feature 1", 20.0).next_to(axes.bounds(), DOWN, 0.15);
    let y_label = Text::new("Feature 2", 20.0)
        .vertical()
        .next_to(axes.bounds(), LEFT, 0.15);
    let axes_id = s.declare(axes.clone())?;
    s.play([Animation::create(axes_id)])?;
    let x_label = s.declare(x_label)?;
    let y_label = s.declare(y_label)?;
    s.play([Animation::write(x_label), Animation::write(y_label)])?;
    s.wait(0.3)?;

    // Two clusters of training points, reproducible from the seed.
    let mut rng = StdRng::seed_from_u64(KNN_SEED);
    let mut scatter = |xs: (f64, f64), ys: (f64, f64), color: Color| -> Vec<Dot> {
        (0..6)
            .map(|_| {
                let x = rng.gen_range(xs.0..xs.1);
                let y = rng.gen_range(ys.0..ys.1);
                Dot::new(axes.c2p(x, y)).radius(0.08).color(color)
            })
            .collect()
    };
    let class_a = scatter((1.0, 2.5), (1.8, 3.0), paint::BLUE);
    let class_b = scatter((4.2, 5.8), (3.8, 5.0), paint::RED);
    let mut training = declare_all(s, class_a)?;
    training.extend(declare_all(s, class_b)?);
    s.play(each(&training, Animation::fade_in))?;

    let query = Dot::new(axes.c2p(3.5, 3.5)).radius(0.12).color(paint::GREEN);
    let query_label = Text::new("?", 22.0)
        .color(paint::GREEN)
        .next_to(query.bounds(), UP, 0.15);
    let answer = Text::new("B", 22.0)
        .color(paint::RED)
        .next_to(query.bounds(), UP, 0.15);
    let query_at = query.center;
    let query = s.declare(query)?;
    let query_label = s.declare(query_label)?;
    s.play([
        Animation::fade_in(query),
        Animation::write(query_label),
        Animation::indicate(query),
    ])?;
    s.wait(0.5)?;

    let neighbours = [
        ((2.8, 2.9), paint::BLUE),
        ((3.8, 3.8), paint::RED),
        ((4.2, 3.5), paint::RED),
    ];
    let near: Vec<Point> = neighbours.iter().map(|&((x, y), _)| axes.c2p(x, y)).collect();
    let nearest = declare_all(
        s,
        neighbours
            .iter()
            .zip(&near)
            .map(|(&(_, color), &p)| Dot::new(p).radius(0.09).color(color)),
    )?;
    s.play(each(&nearest, Animation::fade_in))?;

    let spans = declare_all(
        s,
        near.iter().map(|&p| {
            Line::dashed(query_at, p)
                .color(paint::YELLOW)
                .stroke_width(1.5)
                .opacity(0.7)
        }),
    )?;
    s.play(each(&spans, Animation::create))?;
    s.wait(0.3)?;

    let rings = declare_all(
        s,
        near.iter().map(|&p| {
            Circle::new(0.2)
                .color(paint::YELLOW)
                .stroke_width(2.0)
                .placed(p)
        }),
    )?;
    s.play(each(&rings, Animation::create))?;
    s.wait(0.5)?;

    let class_tag = s.declare(
        Text::new("B", 18.0)
            .color(paint::RED)
            .placed(near[1] + Vec2::new(0.25, 0.25)),
    )?;
    s.play([Animation::write(class_tag)])?;
    s.wait(0.2)?;

    let k_text = Text::new("K=3: considering only 3 nearest neighbors", 20.0)
        .color(paint::YELLOW)
        .to_edge(DOWN, 0.4);
    let result = Text::new("Classification by majority: 2 red, 1 blue → Class B", 22.0)
        .color(paint::YELLOW)
        .next_to(k_text.bounds(), UP, 0.2);
    let k_text = s.declare(k_text)?;
    s.play([Animation::write(k_text)])?;
    s.wait(0.3)?;
    s.play([Animation::fade_out(x_label)])?;
    let result = s.declare(result)?;
    s.play([Animation::write(result)])?;

    let answer = s.declare(answer)?;
    s.play([
        Animation::recolor(query, paint::RED),
        Animation::transform(query_label, answer),
    ])?;
    s.wait(0.5)?;

    let mut gone = vec![axes_id, y_label];
    gone.extend(training);
    gone.extend([query, query_label]);
    gone.extend(nearest);
    gone.push(class_tag);
    gone.extend(spans);
    gone.extend(rings);
    gone.extend([k_text, result]);
    fade_out(s, &gone)
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn stocks(s: &mut SceneScript, top: kurbo::Rect) -> ScriptResult<()> {
    let section = heading(top, "Real-World Example: Stock Trading", paint::ORANGE);
    let intro = Text::new("Pairs Trading Strategy: Finding Correlated Stocks", 26.0)
        .next_to(section.bounds(), DOWN, 0.5);
    let below_intro = intro.bounds();
    let section = s.declare(section)?;
    s.play([Animation::fade_in(section)])?;
    s.wait(0.5)?;
    let intro = s.declare(intro)?;
    s.play([Animation::write(intro)])?;
    s.wait(0.7)?;

    let pct = |r: &f64| format!("{r:.1}%");
    let rows = [
        std::iter::once("Day".to_string())
            .chain(DAYS.iter().map(|d| d.to_string()))
            .collect::<Vec<_>>(),
        std::iter::once("Coca-Cola".to_string())
            .chain(COCA_COLA.iter().map(pct))
            .collect(),
        std::iter::once("Pepsi".to_string())
            .chain(PEPSI.iter().map(pct))
            .collect(),
    ];
    let table = Table::new(rows).next_to(below_intro, DOWN, 0.5);
    let d = euclidean(&COCA_COLA, &PEPSI);
    let distance_title =
        Text::new("Calculating Euclidean Distance:", 24.0).next_to(table.bounds(), DOWN, 0.7);
    let distance_formula = Formula::new(
        format!(r"d = \sqrt{{\sum_{{i=1}}^{{5}} (A_i - B_i)^2}} \approx {d:.2}"),
        28.0,
    )
    .next_to(distance_title.bounds(), DOWN, 0.3);

    let table = s.declare(table)?;
    s.play([Animation::create(table)])?;
    s.wait(1.0)?;
    let distance_title = s.declare(distance_title)?;
    let distance_formula = s.declare(distance_formula)?;
    s.play([Animation::write(distance_title)])?;
    s.play([Animation::write(distance_formula)])?;
    s.wait(1.0)?;
    fade_out(s, &[table, distance_title, distance_formula])?;

    // Daily returns as two polylines.
    let returns_title =
        Text::new("Visualizing Stock Returns", 26.0).next_to(below_intro, DOWN, 0.5);
    let axes = Axes::new(AxisRange::new(0.0, 6.0, 1.0), AxisRange::new(-1.5, 2.0, 1.0))
        .lengths(8.0, 4.0)
        .with_numbers()
        .without_tips()
        .scale(0.65)
        .next_to(returns_title.bounds(), DOWN, 0.5);
    let x_label = Text::new("Day", 20.0).next_to(axes.bounds(), DOWN, 0.2);
    let y_label = Text::new("Return %", 20.0)
        .vertical()
        .next_to(axes.bounds(), LEFT, 0.2);
    let returns_title = s.declare(returns_title)?;
    s.play([Animation::write(returns_title)])?;
    let axes_id = s.declare(axes.clone())?;
    let x_label = s.declare(x_label)?;
    let y_label = s.declare(y_label)?;
    s.play([
        Animation::create(axes_id),
        Animation::write(x_label),
        Animation::write(y_label),
    ])?;
    s.wait(0.5)?;

    let series = [
        ("Coca-Cola", COCA_COLA, paint::BLUE, UP + RIGHT),
        ("Pepsi", PEPSI, paint::RED, DOWN + RIGHT),
    ];
    let mut segments = Vec::new();
    let mut dots = Vec::new();
    let mut names = Vec::new();
    for (name, returns, color, side) in series {
        let points: Vec<Point> = returns
            .iter()
            .enumerate()
            .map(|(i, &r)| axes.c2p(i as f64 + 1.0, r))
            .collect();
        segments.extend(declare_all(
            s,
            points.windows(2).map(|w| Line::new(w[0], w[1]).color(color)),
        )?);
        dots.extend(declare_all(
            s,
            points.iter().map(|&p| Dot::new(p).radius(0.08).color(color)),
        )?);
        if let Some(&last) = points.last() {
            let label = Text::new(name, 20.0)
                .color(color)
                .next_to(at_point(last), side, 0.2);
            names.push(s.declare(label)?);
        }
    }
    s.play(each(&segments, Animation::create))?;
    s.play(each(&dots, Animation::fade_in))?;
    s.play(each(&names, Animation::write))?;
    s.wait(1.0)?;

    let verdict = s.declare(
        Text::new(
            format!("Low Euclidean Distance ({d:.2}) = High Correlation"),
            24.0,
        )
        .color(paint::YELLOW)
        .to_edge(DOWN, 0.5),
    )?;
    s.play([Animation::write(verdict)])?;
    s.wait(1.0)?;

    let mut gone = vec![returns_title, axes_id, x_label, y_label];
    gone.extend(segments);
    gone.extend(dots);
    gone.extend(names);
    gone.push(verdict);
    fade_out(s, &gone)?;

    strategy(s, below_intro)?;
    fade_out(s, &[intro, section])
}

/// Ratio scale shared by the monitoring and profit steps.
const RATIO_MIN: f64 = 0.7;
const RATIO_MAX: f64 = 1.1;
const RATIO_LENGTH: f64 = 4.8;
const HISTORICAL_AVERAGE: f64 = 0.85;
const DEVIATION: f64 = 0.72;

/// A horizontal price-ratio scale with a caption above it.
struct RatioLine {
    left: Point,
}

impl RatioLine {
    /// Declare the line, its ticks and caption under `above`. Returns the ids
    /// in creation order; the caption is last.
    fn declare(
        s: &mut SceneScript,
        above: kurbo::Rect,
        caption: &str,
    ) -> ScriptResult<(RatioLine, Vec<PrimitiveId>)> {
        let caption = Text::new(caption, 20.0).next_to(above, DOWN, 0.5);
        let y = caption.bounds().y0 - 0.4;
        let ratio = RatioLine {
            left: Point::new(-RATIO_LENGTH / 2.0, y),
        };
        let mut ids = vec![s.declare(Line::new(
            ratio.left,
            ratio.left + Vec2::new(RATIO_LENGTH, 0.0),
        ))?];
        for i in 0..=4 {
            let value = RATIO_MIN + 0.1 * f64::from(i);
            let at = ratio.n2p(value);
            ids.push(s.declare(Line::new(at + DOWN * 0.1, at + UP * 0.1))?);
            ids.push(s.declare(Text::new(format!("{value:.1}"), 16.0).placed(at + DOWN * 0.3))?);
        }
        ids.push(s.declare(caption)?);
        Ok((ratio, ids))
    }

    fn n2p(&self, value: f64) -> Point {
        let t = (value - RATIO_MIN) / (RATIO_MAX - RATIO_MIN);
        self.left + Vec2::new(t * RATIO_LENGTH, 0.0)
    }

    /// Triangle marker under `value` with a caption beneath it.
    fn marker(&self, value: f64, text: &str, color: Color) -> (Text, Text) {
        let tip = Text::new("▲", 24.0)
            .color(color)
            .placed(self.n2p(value) + DOWN * 0.65);
        let label = Text::new(text, 16.0)
            .color(color)
            .next_to(tip.bounds(), DOWN, 0.15);
        (tip, label)
    }
}

fn create_and_write(s: &mut SceneScript, ids: &[PrimitiveId]) -> ScriptResult<()> {
    let (caption, scale) = ids.split_last().map_or((None, ids), |(c, rest)| (Some(*c), rest));
    s.play(
        each(scale, Animation::create)
            .into_iter()
            .chain(caption.map(Animation::write)),
    )
}

/// Pairs trading in four steps, under the returns section.
fn strategy(s: &mut SceneScript, below_intro: kurbo::Rect) -> ScriptResult<()> {
    let title = Text::new("Trading Strategy Based on Correlation", 28.0)
        .color(paint::GREEN)
        .next_to(below_intro, DOWN, 0.5);
    let below = title.bounds();
    let title = s.declare(title)?;
    s.play([Animation::write(title)])?;
    s.wait(0.5)?;

    let step_text = |text: &str| Text::new(text, 24.0).next_to(below, DOWN, 0.5);

    // Step 1: two price paths moving together.
    let step1 = step_text("Step 1: Identify correlated stocks using Euclidean Distance");
    let under_step = step1.bounds();
    let step1 = s.declare(step1)?;
    s.play([Animation::write(step1)])?;

    let path = |offset: f64| -> Vec<Point> {
        (0..6)
            .map(|i| {
                let i = f64::from(i);
                Point::new(i * 0.7, (0.5 * (i * 0.8).sin() + offset) * 0.7)
            })
            .collect()
    };
    let (upper, lower) = (path(1.5), path(1.2));
    let extent = upper
        .iter()
        .chain(&lower)
        .fold(kurbo::Rect::from_points(upper[0], upper[0]), |r, &p| {
            r.union_pt(p)
        });
    let to = Point::new(0.0, under_step.y0 - 0.5 - extent.height() / 2.0);
    let shift = to - extent.center();
    let extent = extent + shift;
    let mut paths = Vec::new();
    for (points, color) in [(&upper, paint::BLUE), (&lower, paint::RED)] {
        paths.extend(declare_all(
            s,
            points
                .windows(2)
                .map(|w| Line::new(w[0] + shift, w[1] + shift).color(color)),
        )?);
    }
    s.play(each(&paths, Animation::create))?;
    let names = declare_all(
        s,
        [
            Text::new("Coca-Cola", 18.0)
                .color(paint::BLUE)
                .next_to(extent, UP + LEFT, 0.2),
            Text::new("Pepsi", 18.0)
                .color(paint::RED)
                .next_to(extent, DOWN + LEFT, 0.2),
        ],
    )?;
    s.play(each(&names, Animation::write))?;
    s.wait(1.0)?;
    let mut gone = vec![step1];
    gone.extend(paths);
    gone.extend(names);
    fade_out(s, &gone)?;

    // Step 2: the price ratio drifts away from its average.
    let step2 = step_text("Step 2: Monitor price ratio between correlated stocks");
    let under_step = step2.bounds();
    let step2 = s.declare(step2)?;
    s.play([Animation::write(step2)])?;
    let (ratio, scale) = RatioLine::declare(s, under_step, "Coca-Cola/Pepsi Price Ratio")?;
    create_and_write(s, &scale)?;
    s.wait(0.5)?;
    let mut markers = Vec::new();
    for (value, text, color, pause) in [
        (HISTORICAL_AVERAGE, "Historical Average", paint::GREEN, 0.5),
        (DEVIATION, "Deviation", paint::RED, 0.7),
    ] {
        let (tip, label) = ratio.marker(value, text, color);
        let pair = [s.declare(tip)?, s.declare(label)?];
        s.play([Animation::fade_in(pair[0]), Animation::write(pair[1])])?;
        s.wait(pause)?;
        markers.extend(pair);
    }
    let mut gone = vec![step2];
    gone.extend(scale);
    gone.extend(markers);
    fade_out(s, &gone)?;

    // Step 3: buy the cheap leg, sell the dear one.
    let step3 = step_text("Step 3: When ratio deviates, buy undervalued and sell overvalued stock");
    let under_step = step3.bounds();
    let step3 = s.declare(step3)?;
    s.play([Animation::write(step3)])?;
    let legs = [
        ("Buy Coca-Cola", "(Undervalued)", paint::BLUE, paint::BLUE_A, paint::GREEN_B),
        ("Sell Pepsi", "(Overvalued)", paint::RED, paint::RED_A, paint::RED_B),
    ];
    let mut trade = Vec::new();
    for (i, (action, reason, color, soft, border)) in legs.into_iter().enumerate() {
        let side = if i == 0 { -1.0 } else { 1.0 };
        let action = Text::new(action, 20.0)
            .color(color)
            .placed(Point::new(side * 1.8, under_step.y0 - 1.1));
        let reason = Text::new(reason, 18.0)
            .color(soft)
            .next_to(action.bounds(), DOWN, 0.1);
        let frame = Rect::around(action.bounds().union(reason.bounds()), 0.3).color(border);
        trade.extend([s.declare(frame)?, s.declare(action)?, s.declare(reason)?]);
    }
    s.play(each(&trade, Animation::create))?;
    s.wait(1.0)?;
    let mut gone = vec![step3];
    gone.extend(trade);
    fade_out(s, &gone)?;

    // Step 4: the ratio reverts and the spread closes.
    let step4 = step_text("Step 4: Profit when ratio returns to historical average");
    let under_step = step4.bounds();
    let step4 = s.declare(step4)?;
    s.play([Animation::write(step4)])?;
    let (ratio, scale) = RatioLine::declare(s, under_step, "Price Ratio Movement")?;
    create_and_write(s, &scale)?;
    let mut markers = Vec::new();
    for (value, text, color) in [
        (DEVIATION, "Entry Point", paint::RED),
        (HISTORICAL_AVERAGE, "Exit Point", paint::GREEN),
    ] {
        let (tip, label) = ratio.marker(value, text, color);
        let pair = [s.declare(tip)?, s.declare(label)?];
        s.play([Animation::fade_in(pair[0]), Animation::write(pair[1])])?;
        markers.extend(pair);
    }
    let lane = DOWN * 1.45;
    let arrow = Arrow::new(ratio.n2p(DEVIATION) + lane, ratio.n2p(HISTORICAL_AVERAGE) + lane)
        .color(paint::GREEN_B);
    let zone = Text::new("Profit Zone", 20.0)
        .color(paint::GREEN)
        .next_to(arrow.bounds(), DOWN, 0.3);
    let arrow = s.declare(arrow)?;
    s.play([Animation::create(arrow)])?;
    let zone = s.declare(zone)?;
    s.play([Animation::write(zone)])?;
    s.wait(1.0)?;

    let insight = s.declare(
        Text::new(
            "Key Insight: Euclidean Distance identifies mathematical relationships\nthat can be exploited for trading profit",
            24.0,
        )
        .color(paint::YELLOW)
        .to_edge(DOWN, 0.5),
    )?;
    s.play([Animation::write(insight)])?;
    s.wait(1.0)?;

    let mut gone = vec![title, step4];
    gone.extend(scale);
    gone.extend(markers);
    gone.extend([arrow, zone, insight]);
    fade_out(s, &gone)
}

const TAKEAWAYS: [&str; 5] = [
    "Simple Formula: Easy to calculate and understand",
    "Real-World Applications: Powerful tool in finance and data analysis",
    "Mathematical Foundation: Basis for more advanced distance metrics",
    "Pattern Discovery: Reveals hidden relationships in complex data",
    "Trading Strategy: Enables statistical arbitrage and pairs trading",
];

fn conclusion(s: &mut SceneScript, top: kurbo::Rect, title: PrimitiveId) -> ScriptResult<()> {
    let section = s.declare(heading(top, "Key Takeaways", paint::PURPLE))?;
    s.play([Animation::fade_in(section)])?;
    s.wait(0.5)?;

    let mut bullets = Vec::new();
    for (i, point) in TAKEAWAYS.iter().enumerate() {
        let y = 1.3 - 0.6 * i as f64;
        let bullet = Text::new("•", 28.0)
            .color(paint::YELLOW)
            .placed(Point::new(-3.5 - 3.0, y));
        let text = Text::new(*point, 24.0).next_to(bullet.bounds(), RIGHT, 0.3);
        let pair = declare_all(s, [bullet, text])?;
        s.play(each(&pair, Animation::write))?;
        s.wait(0.7)?;
        bullets.extend(pair);
    }

    let closing = s.declare(
        Text::new(
            "Euclidean Distance: A powerful tool for discovering\nhidden patterns in financial data",
            28.0,
        )
        .color(paint::YELLOW)
        .to_edge(DOWN, 0.7),
    )?;
    s.play([Animation::write(closing)])?;
    s.wait(1.0)?;

    let mut gone = vec![title, section];
    gone.extend(bullets);
    gone.push(closing);
    fade_out(s, &gone)?;

    let end = Text::new("Euclidean Distance in Finance", 48.0).color(paint::BLUE);
    let next = Text::new("Next: Manhattan Distance & Other Metrics", 32.0)
        .color(paint::GREEN)
        .next_to(end.bounds(), DOWN, 1.0);
    let end = s.declare(end)?;
    s.play([Animation::write(end)])?;
    s.wait(0.5)?;
    let next = s.declare(next)?;
    s.play([Animation::write(next)])?;
    s.wait(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_distance_matches_the_caption() {
        let d = euclidean(&COCA_COLA, &PEPSI);
        assert_eq!(format!("{d:.2}"), "0.79");
    }

    #[test]
    fn ratio_scale_spans_its_length() {
        let mut s = SceneScript::new("ratio");
        let (ratio, ids) =
            RatioLine::declare(&mut s, kurbo::Rect::new(-1.0, 0.0, 1.0, 1.0), "Ratio").unwrap();
        // Line, five ticks with numbers, caption.
        assert_eq!(ids.len(), 12);
        let span = ratio.n2p(RATIO_MAX) - ratio.n2p(RATIO_MIN);
        assert!((span.x - RATIO_LENGTH).abs() < 1e-9);
        assert!(ratio.n2p(DEVIATION).x < ratio.n2p(HISTORICAL_AVERAGE).x);
    }
}
