//! Built-in scene catalog.
//!
//! Every scene is a function that builds a fresh `SceneScript` with the
//! public script API. Names are matched case-insensitively.

mod cosine;
mod euclidean;
mod intro;
mod manhattan;

use anyhow::{Context, bail};

use crate::engine::SceneScript;
use crate::engine::error::ScriptResult;
use crate::engine::graph::PrimitiveId;
use crate::engine::objects::{Axes, Formula, PaintExt, Primitive, RIGHT, UP, at_point};
use crate::engine::step::Animation;

pub struct SceneEntry {
    pub name: &'static str,
    pub about: &'static str,
    build: fn() -> ScriptResult<SceneScript>,
}

const CATALOG: &[SceneEntry] = &[
    SceneEntry {
        name: "DistanceMetricsIntro",
        about: "Euclidean, Manhattan and cosine side by side",
        build: intro::build,
    },
    SceneEntry {
        name: "CosineSimilarityTitle",
        about: "Title card for cosine similarity",
        build: cosine::title,
    },
    SceneEntry {
        name: "CosineSimilarityIntuition",
        about: "Closing the angle between two vectors",
        build: cosine::intuition,
    },
    SceneEntry {
        name: "CosineSimilarityFormula",
        about: "The formula with its parts highlighted",
        build: cosine::formula,
    },
    SceneEntry {
        name: "CosineSimilarityExample",
        about: "Worked example for A = [1, 2], B = [3, 4]",
        build: cosine::example,
    },
    SceneEntry {
        name: "CosineSimilarityInterpretation",
        about: "Similar, unrelated and opposite vectors",
        build: cosine::interpretation,
    },
    SceneEntry {
        name: "CosineSimilarityMusicRec",
        about: "Songs as feature vectors, near and far from a profile",
        build: cosine::music_rec,
    },
    SceneEntry {
        name: "CombinedManhattanScene",
        about: "Manhattan distance, its formula, pathfinding and clustering",
        build: manhattan::build,
    },
    SceneEntry {
        name: "EuclideanDistanceVisualization",
        about: "History, properties, k-nearest neighbours and a stock example",
        build: euclidean::build,
    },
];

pub fn list() -> &'static [SceneEntry] {
    CATALOG
}

/// Build the named scene.
pub fn build(name: &str) -> anyhow::Result<SceneScript> {
    let Some(entry) = CATALOG.iter().find(|e| e.name.eq_ignore_ascii_case(name)) else {
        let names: Vec<&str> = CATALOG.iter().map(|e| e.name).collect();
        bail!("unknown scene '{name}'. Available: {}", names.join(", "));
    };
    (entry.build)().with_context(|| format!("Failed to build scene {}", entry.name))
}

/// "x" and "y" labels at the far ends of a pair of axes.
pub(crate) fn axis_labels(axes: &Axes, x: &str, y: &str) -> (Formula, Formula) {
    let x_label = Formula::new(x, 30.0).next_to(at_point(axes.x_axis_end()), RIGHT, 0.2);
    let y_label = Formula::new(y, 30.0).next_to(at_point(axes.y_axis_end()), UP, 0.15);
    (x_label, y_label)
}

pub(crate) fn declare_all<P: Into<Primitive>>(
    s: &mut SceneScript,
    items: impl IntoIterator<Item = P>,
) -> ScriptResult<Vec<PrimitiveId>> {
    items.into_iter().map(|p| s.declare(p)).collect()
}

/// The same transition for every id.
pub(crate) fn each(ids: &[PrimitiveId], anim: fn(PrimitiveId) -> Animation) -> Vec<Animation> {
    ids.iter().copied().map(anim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_case_insensitively() {
        let scene = build("cosinesimilaritytitle").unwrap();
        assert_eq!(scene.name(), "CosineSimilarityTitle");
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn unknown_name_lists_the_catalog() {
        let err = build("Hamming").unwrap_err().to_string();
        assert!(err.contains("Hamming"));
        assert!(err.contains("CombinedManhattanScene"));
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<String> = list().iter().map(|e| e.name.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), list().len());
    }
}
