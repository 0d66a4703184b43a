//! The mutable set of primitives on stage for one scene.

use std::collections::HashSet;
use std::fmt;

use super::objects::Primitive;

/// Handle for a primitive declared on a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive #{}", self.0)
    }
}

/// Live primitives in draw order, plus tombstones for ids that left the stage.
///
/// A tombstoned id can never come back; the executor treats any later
/// reference to it as an error.
#[derive(Debug, Default)]
pub struct SceneGraph {
    live: Vec<(PrimitiveId, Primitive)>,
    removed: HashSet<PrimitiveId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_removed(&self, id: PrimitiveId) -> bool {
        self.removed.contains(&id)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.position(id).map(|i| &self.live[i].1)
    }

    pub fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.position(id).map(|i| &mut self.live[i].1)
    }

    /// Draw-order index of a live primitive.
    pub fn position(&self, id: PrimitiveId) -> Option<usize> {
        self.live.iter().position(|(pid, _)| *pid == id)
    }

    /// Put a primitive on stage at the top of the draw order. Returns `false`
    /// without touching the graph when `id` is already live or was removed.
    pub fn insert(&mut self, id: PrimitiveId, primitive: Primitive) -> bool {
        if self.contains(id) || self.is_removed(id) {
            return false;
        }
        self.live.push((id, primitive));
        true
    }

    /// Take a primitive off stage and tombstone it.
    pub fn remove(&mut self, id: PrimitiveId) -> Option<Primitive> {
        let i = self.position(id)?;
        self.removed.insert(id);
        Some(self.live.remove(i).1)
    }

    /// Tombstone everything on stage.
    pub fn clear(&mut self) {
        self.removed.extend(self.live.drain(..).map(|(id, _)| id));
    }

    /// Live ids in draw order.
    pub fn ids(&self) -> Vec<PrimitiveId> {
        self.live.iter().map(|(id, _)| *id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.live.iter().map(|(id, p)| (*id, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::objects::Dot;

    fn dot(x: f64) -> Primitive {
        Dot::at(x, 0.0).into()
    }

    #[test]
    fn insert_keeps_draw_order() {
        let mut g = SceneGraph::new();
        assert!(g.insert(PrimitiveId(2), dot(0.0)));
        assert!(g.insert(PrimitiveId(1), dot(1.0)));
        assert_eq!(g.ids(), vec![PrimitiveId(2), PrimitiveId(1)]);
        assert!(!g.insert(PrimitiveId(2), dot(5.0)));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn removed_ids_cannot_return() {
        let mut g = SceneGraph::new();
        g.insert(PrimitiveId(0), dot(0.0));
        assert!(g.remove(PrimitiveId(0)).is_some());
        assert!(g.is_removed(PrimitiveId(0)));
        assert!(!g.insert(PrimitiveId(0), dot(0.0)));
        assert!(g.remove(PrimitiveId(0)).is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut g = SceneGraph::new();
        g.insert(PrimitiveId(0), dot(0.0));
        g.insert(PrimitiveId(1), dot(1.0));
        g.clear();
        assert!(g.is_empty());
        assert!(g.is_removed(PrimitiveId(1)));
        g.clear();
        assert!(g.is_empty());
    }
}
