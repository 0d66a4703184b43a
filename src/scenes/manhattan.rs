//! Manhattan distance: title card, how it works, the formula with a worked
//! example, and two applications (grid pathfinding, clustering).

use kurbo::{Point, Vec2};

use crate::engine::SceneScript;
use crate::engine::error::ScriptResult;
use crate::engine::graph::PrimitiveId;
use crate::engine::objects::{
    AxisRange, Axes, Dot, Drawable, EDGE_BUFF, Formula, LEFT, Line, NEXT_TO_BUFF, PaintExt, Rect,
    Text, DOWN, RIGHT, UP, paint,
};
use crate::engine::step::Animation;

use super::axis_labels;

const A: (f64, f64) = (1.0, 1.0);
const B: (f64, f64) = (3.0, 4.0);
/// Blocks the straight line cuts through.
const BUILDINGS: [(f64, f64); 3] = [(2.0, 2.0), (2.5, 3.0), (2.5, 2.0)];

fn building(axes: &Axes, x: f64, y: f64) -> Rect {
    Rect::square(0.8)
        .color(paint::GREY)
        .fill(paint::GREY, 0.6)
        .placed(axes.c2p(x, y))
}

fn heading(s: &mut SceneScript, text: &str) -> ScriptResult<PrimitiveId> {
    let id = s.declare(Text::new(text, 32.0).to_edge(UP, EDGE_BUFF))?;
    s.play([Animation::write(id)])?;
    Ok(id)
}

pub fn build() -> ScriptResult<SceneScript> {
    let mut s = SceneScript::new("CombinedManhattanScene");
    title_card(&mut s)?;
    how_it_works(&mut s)?;
    s.clear_stage()?;
    s.wait(3.0)?;
    formula(&mut s)?;
    s.clear_stage()?;
    s.wait(6.0)?;
    pathfinding(&mut s)?;
    s.clear_stage()?;
    s.wait(3.0)?;
    clustering(&mut s)?;
    Ok(s)
}

fn title_card(s: &mut SceneScript) -> ScriptResult<()> {
    let title = s.declare(Text::new("Manhattan Distance", 72.0).shifted(DOWN * 0.5))?;
    s.play([
        Animation::fade_in(title).run_time(2.0),
        Animation::shift(title, UP * 0.5).run_time(2.0),
    ])?;
    s.wait(13.0)?;
    s.clear_stage()
}

fn how_it_works(s: &mut SceneScript) -> ScriptResult<()> {
    heading(s, "How it Works")?;
    let range = AxisRange::new(0.0, 5.0, 1.0);
    let axes = Axes::new(range, range).with_numbers();
    let (x_label, y_label) = axis_labels(&axes, "x", "y");
    let pa = axes.c2p(A.0, A.1);
    let pb = axes.c2p(B.0, B.1);
    let corner = axes.c2p(B.0, A.1);
    let dot_a = Dot::new(pa).color(paint::BLUE);
    let dot_b = Dot::new(pb).color(paint::RED);
    let label_a = Formula::new("A(1,1)", 36.0).next_to(dot_a.bounds(), DOWN, NEXT_TO_BUFF);
    let label_b = Formula::new("B(3,4)", 36.0).next_to(dot_b.bounds(), UP, NEXT_TO_BUFF);
    let buildings: Vec<Rect> = BUILDINGS.iter().map(|&(x, y)| building(&axes, x, y)).collect();

    let axes = s.declare(axes)?;
    let x_label = s.declare(x_label)?;
    let y_label = s.declare(y_label)?;
    s.play([
        Animation::create(axes),
        Animation::write(x_label),
        Animation::write(y_label),
    ])?;

    let (dot_a, label_a) = (s.declare(dot_a)?, s.declare(label_a)?);
    s.play([Animation::fade_in(dot_a), Animation::write(label_a)])?;
    let (dot_b, label_b) = (s.declare(dot_b)?, s.declare(label_b)?);
    s.play([Animation::fade_in(dot_b), Animation::write(label_b)])?;

    let mut blocks = Vec::with_capacity(buildings.len());
    for b in buildings {
        blocks.push(s.declare(b)?);
    }
    s.play(blocks.iter().map(|&id| Animation::fade_in(id)))?;
    s.wait(8.0)?;

    let diagonal = s.declare(Line::dashed(pa, pb).color(paint::YELLOW))?;
    s.play([Animation::create(diagonal)])?;
    s.wait(5.0)?;

    let horiz = s.declare(Line::new(pa, corner).color(paint::GREEN))?;
    let vert = s.declare(Line::new(corner, pb).color(paint::GREEN))?;
    s.play([Animation::create(horiz)])?;
    s.play([Animation::create(vert)])?;
    s.wait(10.0)
}

fn formula(s: &mut SceneScript) -> ScriptResult<()> {
    let title = Text::new("Mathematical Formula", 32.0).to_edge(UP, EDGE_BUFF);
    let formula = Formula::new(
        r"\text{Manhattan Distance} = |x_1 - x_2| + |y_1 - y_2|",
        36.0,
    )
    .next_to(title.bounds(), DOWN, 0.3);
    let title = s.declare(title)?;
    let formula = s.declare(formula)?;
    s.play([Animation::write(title)])?;
    s.play([Animation::write(formula)])?;
    s.wait(0.5)?;

    let range = AxisRange::new(0.0, 5.0, 1.0);
    let axes = Axes::new(range, range)
        .with_numbers()
        .scale(0.75)
        .to_edge(LEFT, EDGE_BUFF);
    let pa = axes.c2p(A.0, A.1);
    let pb = axes.c2p(B.0, B.1);
    let corner = axes.c2p(B.0, A.1);
    let dot_a = Dot::new(pa).color(paint::BLUE);
    let dot_b = Dot::new(pb).color(paint::RED);
    let label_a = Formula::new("A(1,1)", 28.0).next_to(dot_a.bounds(), DOWN, NEXT_TO_BUFF);
    let label_b = Formula::new("B(3,4)", 28.0).next_to(dot_b.bounds(), UP, NEXT_TO_BUFF);
    let buildings: Vec<Rect> = BUILDINGS.iter().map(|&(x, y)| building(&axes, x, y)).collect();

    let axes = s.declare(axes)?;
    let dot_a = s.declare(dot_a)?;
    let label_a = s.declare(label_a)?;
    let dot_b = s.declare(dot_b)?;
    let label_b = s.declare(label_b)?;
    s.play([
        Animation::create(axes),
        Animation::fade_in(dot_a),
        Animation::write(label_a),
        Animation::fade_in(dot_b),
        Animation::write(label_b),
    ])?;

    let mut reveal = Vec::new();
    for b in buildings {
        reveal.push(Animation::fade_in(s.declare(b)?));
    }
    let diagonal = s.declare(Line::dashed(pa, pb).color(paint::YELLOW))?;
    reveal.push(Animation::create(diagonal));
    s.play(reveal)?;
    s.wait(1.0)?;

    let horiz = s.declare(Line::new(pa, corner).color(paint::GREEN))?;
    let vert = s.declare(Line::new(corner, pb).color(paint::GREEN))?;
    s.play([Animation::create(horiz), Animation::create(vert)])?;

    // Worked example on the right, left-aligned, one line at a time.
    let steps = [
        r"A(1,1),\quad B(3,4)",
        r"= |1 - 3| + |1 - 4|",
        r"= 2 + 3",
        r"= 5",
    ];
    let first = Formula::new(steps[0], 32.0)
        .placed(Point::new(0.0, 1.15))
        .to_edge(RIGHT, EDGE_BUFF);
    let left = first.bounds().x0;
    let mut above = first.bounds();
    let mut lines = vec![first];
    for src in &steps[1..] {
        let line = Formula::new(*src, 32.0).next_to(above, DOWN, 0.5);
        let dx = left - line.bounds().x0;
        let line = line.shifted(Vec2::new(dx, 0.0));
        above = line.bounds();
        lines.push(line);
    }
    for line in lines {
        let id = s.declare(line)?;
        s.play([Animation::write(id)])?;
        s.wait(0.5)?;
    }
    s.wait(6.0)
}

fn pathfinding(s: &mut SceneScript) -> ScriptResult<()> {
    heading(s, "Application 1: Pathfinding")?;
    let range = AxisRange::new(0.0, 6.0, 1.0);
    let grid = Axes::new(range, range)
        .lengths(6.0, 6.0)
        .with_grid()
        .without_tips()
        .scale(0.8)
        .shifted(DOWN * 0.4);
    let grid_id = s.declare(grid.clone())?;
    s.play([Animation::create(grid_id)])?;

    let blocked = [
        (3.0, 3.0),
        (3.0, 2.0),
        (4.0, 2.0),
        (4.0, 3.0),
        (0.0, 0.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 1.0),
    ];
    let mut blocks = Vec::new();
    for (x, y) in blocked {
        blocks.push(s.declare(building(&grid, x + 0.5, y + 0.5))?);
    }
    s.play(blocks.iter().map(|&id| Animation::fade_in(id)))?;
    s.wait(5.0)?;

    let start = grid.c2p(0.0, 0.0);
    let delivery = grid.c2p(2.0, 2.0);
    let dropoff = grid.c2p(5.0, 4.0);
    let stops = [
        (start, paint::BLUE, "Start", DOWN),
        (delivery, paint::ORANGE, "Delivery", UP),
        (dropoff, paint::RED, "Dropoff", UP),
    ];
    let mut dots = Vec::new();
    let mut labels = Vec::new();
    for (at, color, name, side) in stops {
        let dot = Dot::new(at).radius(0.1).color(color);
        let label = Text::new(name, 24.0).next_to(dot.bounds(), side, NEXT_TO_BUFF);
        dots.push(s.declare(dot)?);
        labels.push(s.declare(label)?);
    }
    s.play(dots.iter().map(|&id| Animation::fade_in(id)))?;
    s.play(labels.iter().map(|&id| Animation::write(id)))?;

    let car = s.declare(Dot::new(start).radius(0.12).color(paint::YELLOW))?;
    s.add(&[car])?;
    s.wait(10.0)?;

    // Drive block by block: along a street, then up an avenue.
    let legs = [
        (start, grid.c2p(2.0, 0.0)),
        (grid.c2p(2.0, 0.0), delivery),
        (delivery, grid.c2p(2.0, 4.0)),
        (grid.c2p(2.0, 4.0), dropoff),
    ];
    for (i, (from, to)) in legs.into_iter().enumerate() {
        let path = s.declare(Line::new(from, to).color(paint::GREEN))?;
        s.play([
            Animation::create(path).run_time(2.0),
            Animation::move_to(car, to).run_time(2.0),
        ])?;
        if i % 2 == 1 {
            s.wait(5.0)?;
        }
    }
    Ok(())
}

fn clustering(s: &mut SceneScript) -> ScriptResult<()> {
    heading(s, "Application 2: Machine Learning")?;
    let range = AxisRange::new(0.0, 6.0, 1.0);
    let axes = Axes::new(range, range).scale(0.8);
    let axes_id = s.declare(axes.clone())?;
    s.play([Animation::create(axes_id).run_time(2.0)])?;

    let centers = [(1.0, 1.0), (5.0, 5.0)];
    let center_a = axes.c2p(centers[0].0, centers[0].1);
    let center_b = axes.c2p(centers[1].0, centers[1].1);
    let dot_a = Dot::new(center_a).radius(0.1).color(paint::BLUE);
    let dot_b = Dot::new(center_b).radius(0.1).color(paint::RED);
    let label_a = Text::new("Cluster A", 24.0)
        .color(paint::BLUE)
        .next_to(dot_a.bounds(), DOWN, NEXT_TO_BUFF);
    let label_b = Text::new("Cluster B", 24.0)
        .color(paint::RED)
        .next_to(dot_b.bounds(), UP, NEXT_TO_BUFF);
    let group = [
        s.declare(dot_a)?,
        s.declare(dot_b)?,
        s.declare(label_a)?,
        s.declare(label_b)?,
    ];
    s.play([
        Animation::fade_in(group[0]).run_time(2.0),
        Animation::fade_in(group[1]).run_time(2.0),
        Animation::write(group[2]).run_time(2.0),
        Animation::write(group[3]).run_time(2.0),
    ])?;

    let data = [(2.5, 1.2), (3.2, 2.5), (4.5, 2.8), (2.0, 4.0), (4.1, 2.3)];
    let mut points = Vec::new();
    for (x, y) in data {
        points.push(s.declare(Dot::new(axes.c2p(x, y)).radius(0.064).color(paint::WHITE))?);
    }
    s.play(points.iter().map(|&id| Animation::fade_in(id).run_time(2.0)))?;

    // Route each point to its nearer centre along the grid.
    let mut legs = Vec::new();
    let mut nearer_a = Vec::new();
    for (x, y) in data {
        let to_a = (x - centers[0].0).abs() + (y - centers[0].1).abs();
        let to_b = (x - centers[1].0).abs() + (y - centers[1].1).abs();
        let near_a = to_a < to_b;
        let (cx, center, color) = if near_a {
            (centers[0].0, center_a, paint::BLUE)
        } else {
            (centers[1].0, center_b, paint::RED)
        };
        nearer_a.push(near_a);
        let turn = axes.c2p(cx, y);
        legs.push(s.declare(Line::new(axes.c2p(x, y), turn).color(color))?);
        legs.push(s.declare(Line::new(turn, center).color(color))?);
    }
    s.play(legs.iter().map(|&id| Animation::create(id).run_time(3.0)))?;
    s.wait(5.0)?;

    // Straight-line distance disagrees for (2, 4): it is closer to A.
    let mut straight = Vec::new();
    for (&(x, y), &to_a) in data.iter().zip(&nearer_a) {
        let toward_a = to_a || (x, y) == (2.0, 4.0);
        let (center, color) = if toward_a {
            (center_a, paint::BLUE)
        } else {
            (center_b, paint::RED)
        };
        let line = Line::dashed(axes.c2p(x, y), center)
            .color(color)
            .stroke_width(2.0);
        straight.push(s.declare(line)?);
    }
    s.play(straight.iter().map(|&id| Animation::create(id).run_time(3.0)))?;
    s.wait(4.0)?;

    let legend = legend(s)?;
    s.play(legend.iter().map(|&id| Animation::fade_in(id).run_time(2.0)))?;
    s.wait(3.0)
}

/// Solid and dashed keys in the upper right corner.
fn legend(s: &mut SceneScript) -> ScriptResult<Vec<PrimitiveId>> {
    let mut ids = Vec::new();
    let keys = [("Manhattan Distance", false), ("Euclidean Distance", true)];
    for (row, (name, dashed)) in keys.into_iter().enumerate() {
        let label = Text::new(name, 20.0)
            .placed(Point::new(0.0, 2.85 - 0.4 * row as f64))
            .to_edge(RIGHT, 1.0);
        let end = Point::new(label.bounds().x0 - 0.2, label.position.y);
        let start = end - Vec2::new(0.5, 0.0);
        let key = if dashed {
            Line::dashed(start, end)
        } else {
            Line::new(start, end)
        };
        ids.push(s.declare(key.color(paint::WHITE))?);
        ids.push(s.declare(label)?);
    }
    Ok(ids)
}
