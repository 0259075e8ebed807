//! Text and box primitives shared by the HUD layers.

use crate::types::{DrawOp, Style};

/// Draw a single-line box outline. Boxes smaller than 2×2 draw nothing.
pub fn draw_frame(ops: &mut Vec<DrawOp>, fx: u16, fy: u16, fw: u16, fh: u16, style: Style, z: i32) {
    if fw < 2 || fh < 2 {
        return;
    }

    ops.push(DrawOp { x: fx,          y: fy,          ch: '┌', style, z_order: z });
    ops.push(DrawOp { x: fx + fw - 1, y: fy,          ch: '┐', style, z_order: z });
    ops.push(DrawOp { x: fx,          y: fy + fh - 1, ch: '└', style, z_order: z });
    ops.push(DrawOp { x: fx + fw - 1, y: fy + fh - 1, ch: '┘', style, z_order: z });
    for i in 1..fw - 1 {
        ops.push(DrawOp { x: fx + i, y: fy,          ch: '─', style, z_order: z });
        ops.push(DrawOp { x: fx + i, y: fy + fh - 1, ch: '─', style, z_order: z });
    }
    for j in 1..fh - 1 {
        ops.push(DrawOp { x: fx,          y: fy + j, ch: '│', style, z_order: z });
        ops.push(DrawOp { x: fx + fw - 1, y: fy + j, ch: '│', style, z_order: z });
    }
}

/// Fill a rectangle with blanks in `style`, hiding whatever sits below `z`.
pub fn fill(ops: &mut Vec<DrawOp>, x: u16, y: u16, w: u16, h: u16, style: Style, z: i32) {
    for row in y..y.saturating_add(h) {
        for col in x..x.saturating_add(w) {
            ops.push(DrawOp { x: col, y: row, ch: ' ', style, z_order: z });
        }
    }
}

/// Print `text` on one row starting at `x`. Returns the column after the
/// last character.
pub fn print(ops: &mut Vec<DrawOp>, x: u16, y: u16, text: &str, style: Style, z: i32) -> u16 {
    let mut col = x;
    for ch in text.chars() {
        ops.push(DrawOp { x: col, y, ch, style, z_order: z });
        col = col.saturating_add(1);
    }
    col
}

/// Word-wrap `text` to rows of at most `width` characters.
///
/// Breaks happen at spaces and the space at the break is dropped, so no row
/// starts with a stray blank. A word longer than `width` is hard-broken.
/// Explicit newlines always break.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }

        let mut pos = 0usize;
        while pos < chars.len() {
            let remaining = &chars[pos..];
            if remaining.len() <= width {
                rows.push(remaining.iter().collect());
                break;
            }

            let chunk = &remaining[..=width];
            let (row_len, advance) = match chunk.iter().rposition(|&c| c == ' ') {
                Some(sp) if sp > 0 => (sp, sp + 1),
                _ => (width, width),
            };
            rows.push(remaining[..row_len].iter().collect());
            pos += advance;

            while pos < chars.len() && chars[pos] == ' ' {
                pos += 1;
            }
        }
    }

    rows
}
