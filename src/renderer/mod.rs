//! Renderer — the deterministic rasterizer.
//!
//! Takes a `ResolvedScene` from the HUD and produces cell grids and frames
//! for the player. The renderer is pure and stateless: given the same input
//! it always produces the same output. It knows nothing about sessions,
//! cameras or overlays.

use crate::types::{Cell, CellChange, Frame, ResolvedScene, TerminalContract};

pub type Grid = Vec<Vec<Cell>>;

pub struct Renderer;

impl Renderer {
    /// Render `scene` against the previously shown grid.
    ///
    /// Without a previous grid, or when the previous grid has a different
    /// size, the result is a full frame. Otherwise it is a diff.
    pub fn render(prev: Option<&Grid>, scene: &ResolvedScene) -> (Grid, Frame) {
        let contract = TerminalContract {
            width: scene.width,
            height: scene.height,
        };
        let grid = Self::rasterize(scene, &contract);
        let frame = match prev {
            Some(prev) if same_shape(prev, &grid) => Frame::Diff {
                changes: Self::diff(prev, &grid),
            },
            _ => Frame::Full {
                cells: grid.clone(),
            },
        };
        (grid, frame)
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones. Equal z values keep their emission order.
    pub fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Grid {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style,
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
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

fn same_shape(a: &Grid, b: &Grid) -> bool {
    a.len() == b.len() && a.first().map(Vec::len) == b.first().map(Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawOp, NamedColor, Style};
    use pretty_assertions::assert_eq;

    fn op(x: u16, y: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    #[test]
    fn higher_z_paints_over_lower() {
        let mut scene = ResolvedScene::new(3, 1);
        scene.ops = vec![op(1, 0, 'b', 5), op(1, 0, 'a', 0), op(0, 0, 'x', 0)];
        let contract = TerminalContract { width: 3, height: 1 };
        let grid = Renderer::rasterize(&scene, &contract);
        let row: String = grid[0].iter().map(|c| c.ch).collect();
        assert_eq!(row, "xb ");
    }

    #[test]
    fn equal_z_keeps_emission_order() {
        let mut scene = ResolvedScene::new(1, 1);
        scene.ops = vec![op(0, 0, 'a', 1), op(0, 0, 'b', 1)];
        let contract = TerminalContract { width: 1, height: 1 };
        assert_eq!(Renderer::rasterize(&scene, &contract)[0][0].ch, 'b');
    }

    #[test]
    fn out_of_bounds_ops_are_clipped() {
        let mut scene = ResolvedScene::new(2, 2);
        scene.ops = vec![op(5, 0, 'x', 0), op(0, 9, 'y', 0)];
        let (grid, _) = Renderer::render(None, &scene);
        assert!(grid.iter().flatten().all(|c| c.ch == ' '));
    }

    #[test]
    fn second_frame_is_a_diff_of_changed_cells() {
        let mut first = ResolvedScene::new(3, 2);
        first.ops = vec![op(0, 0, 'a', 0)];
        let (grid, frame) = Renderer::render(None, &first);
        assert!(matches!(frame, Frame::Full { .. }));

        let mut second = ResolvedScene::new(3, 2);
        second.ops = vec![
            op(0, 0, 'a', 0),
            DrawOp {
                style: Style::fg(NamedColor::Red),
                ..op(2, 1, 'z', 0)
            },
        ];
        let (_, frame) = Renderer::render(Some(&grid), &second);
        match frame {
            Frame::Diff { changes } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].x, changes[0].y, changes[0].cell.ch), (2, 1, 'z'));
            }
            Frame::Full { .. } => panic!("expected a diff"),
        }
    }

    #[test]
    fn resize_forces_a_full_frame() {
        let (grid, _) = Renderer::render(None, &ResolvedScene::new(3, 2));
        let (_, frame) = Renderer::render(Some(&grid), &ResolvedScene::new(4, 2));
        assert!(matches!(frame, Frame::Full { .. }));
    }
}
