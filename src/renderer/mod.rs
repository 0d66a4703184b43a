//! Renderer: the deterministic rasterizer.
//!
//! Takes `ResolvedScene`s (in-memory, from the engine) one frame at a time
//! and builds a `PlayablePresentation` (serializable, for the player).
//!
//! Rasterizing is pure: the same scene always yields the same grid. The
//! sinks here know nothing about animation or the scene graph.

use anyhow::bail;

use crate::types::{
    Cell, CellChange, Frame, Marker, PlayablePresentation, ResolvedScene, TerminalContract,
};

/// Receiver for the frames a scene script emits while running.
pub trait FrameSink {
    fn begin(&mut self, contract: TerminalContract, fps: u32) -> anyhow::Result<()>;
    fn frame(&mut self, scene: &ResolvedScene) -> anyhow::Result<()>;
    /// Labels the next frame to be emitted.
    fn marker(&mut self, label: &str) -> anyhow::Result<()>;
    fn finish(&mut self) -> anyhow::Result<()>;
}

type Grid = Vec<Vec<Cell>>;

pub struct Renderer;

impl Renderer {
    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones. Equal z keeps emission order.
    pub fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Grid {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let (x, y) = (op.x as usize, op.y as usize);
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }
        grid
    }

    /// Cell-level changes turning `prev` into `next`.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

/// Builds a playable presentation: the first frame full, every later one a diff.
#[derive(Default)]
pub struct Recorder {
    contract: Option<TerminalContract>,
    fps: u32,
    frames: Vec<Frame>,
    markers: Vec<Marker>,
    prev: Option<Grid>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn into_presentation(self) -> anyhow::Result<PlayablePresentation> {
        let Some(contract) = self.contract else {
            bail!("recorder was never started");
        };
        Ok(PlayablePresentation {
            contract,
            fps: self.fps,
            frames: self.frames,
            markers: self.markers,
        })
    }
}

impl FrameSink for Recorder {
    fn begin(&mut self, contract: TerminalContract, fps: u32) -> anyhow::Result<()> {
        *self = Recorder {
            contract: Some(contract),
            fps,
            ..Recorder::default()
        };
        Ok(())
    }

    fn frame(&mut self, scene: &ResolvedScene) -> anyhow::Result<()> {
        let Some(contract) = &self.contract else {
            bail!("frame received before begin");
        };
        let grid = Renderer::rasterize(scene, contract);
        let frame = match &self.prev {
            None => Frame::Full {
                cells: grid.clone(),
            },
            Some(prev) => Frame::Diff {
                changes: Renderer::diff(prev, &grid),
            },
        };
        self.frames.push(frame);
        self.prev = Some(grid);
        Ok(())
    }

    fn marker(&mut self, label: &str) -> anyhow::Result<()> {
        self.markers.push(Marker {
            frame_index: self.frames.len(),
            label: label.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        let Some(contract) = self.contract else {
            bail!("finish received before begin");
        };
        // A presentation always has something to show.
        if self.frames.is_empty() {
            let blank = ResolvedScene {
                width: contract.width,
                height: contract.height,
                ops: Vec::new(),
            };
            self.frame(&blank)?;
        }
        let last = self.frames.len() - 1;
        for m in &mut self.markers {
            m.frame_index = m.frame_index.min(last);
        }
        Ok(())
    }
}

/// Counts frames and markers without keeping them.
#[derive(Debug, Default)]
pub struct FrameCounter {
    pub frames: usize,
    pub markers: usize,
}

impl FrameSink for FrameCounter {
    fn begin(&mut self, _contract: TerminalContract, _fps: u32) -> anyhow::Result<()> {
        *self = FrameCounter::default();
        Ok(())
    }

    fn frame(&mut self, _scene: &ResolvedScene) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn marker(&mut self, _label: &str) -> anyhow::Result<()> {
        self.markers += 1;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawOp, Style};

    const CONTRACT: TerminalContract = TerminalContract {
        width: 4,
        height: 2,
    };

    fn scene(ops: Vec<DrawOp>) -> ResolvedScene {
        ResolvedScene {
            width: 4,
            height: 2,
            ops,
        }
    }

    fn op(x: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y: 0,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    #[test]
    fn higher_z_wins_and_ties_keep_order() {
        let grid = Renderer::rasterize(
            &scene(vec![op(0, 'b', 2), op(0, 'a', 1), op(1, 'x', 1), op(1, 'y', 1)]),
            &CONTRACT,
        );
        assert_eq!(grid[0][0].ch, 'b');
        assert_eq!(grid[0][1].ch, 'y');
    }

    #[test]
    fn recorder_diffs_after_first_frame() {
        let mut rec = Recorder::new();
        rec.begin(CONTRACT, 12).unwrap();
        rec.marker("start").unwrap();
        rec.frame(&scene(vec![op(0, 'a', 1)])).unwrap();
        rec.frame(&scene(vec![op(1, 'a', 1)])).unwrap();
        rec.marker("tail").unwrap();
        rec.finish().unwrap();

        let p = rec.into_presentation().unwrap();
        assert_eq!(p.fps, 12);
        assert!(matches!(p.frames[0], Frame::Full { .. }));
        match &p.frames[1] {
            Frame::Diff { changes } => assert_eq!(changes.len(), 2),
            other => panic!("expected diff, got {other:?}"),
        }
        // A trailing marker is clamped to the last frame.
        assert_eq!(p.markers[1].frame_index, 1);
    }

    #[test]
    fn empty_recording_gets_a_blank_frame() {
        let mut rec = Recorder::new();
        rec.begin(CONTRACT, 24).unwrap();
        rec.finish().unwrap();
        assert_eq!(rec.frame_count(), 1);
        assert!(Recorder::new().into_presentation().is_err());
    }
}
