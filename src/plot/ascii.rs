//! ASCII plotting of yield curves for terminal output.
//!
//! Fixed-size character grid, deterministic output. Each curve gets its own
//! marker for observed points and its own line character:
//!
//! - 1st curve: `o` points, `-` line
//! - 2nd curve: `x` points, `.` line
//! - further curves cycle through the same styles

use crate::domain::CurveSnapshot;

const STYLES: [(char, char); 2] = [('o', '-'), ('x', '.')];

/// Render one or more labelled curves on a shared maturity/yield grid.
pub fn render_curves(curves: &[(&str, &CurveSnapshot)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all_points: Vec<(f64, f64)> = curves
        .iter()
        .flat_map(|(_, c)| c.points().iter().map(|p| (p.maturity_years, p.yield_pct)))
        .collect();

    let (t_min, t_max) = range(all_points.iter().map(|p| p.0)).unwrap_or((0.25, 30.0));
    let (y_min, y_max) = range(all_points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first, so point markers overlay them.
    for (i, (_, curve)) in curves.iter().enumerate() {
        let (_, line_ch) = STYLES[i % STYLES.len()];
        let pts: Vec<(f64, f64)> = curve.points().iter().map(|p| (p.maturity_years, p.yield_pct)).collect();
        draw_curve(&mut grid, &pts, t_min, t_max, y_min, y_max, line_ch);
    }
    for (i, (_, curve)) in curves.iter().enumerate() {
        let (marker, _) = STYLES[i % STYLES.len()];
        for p in curve.points() {
            let x = map_x(p.maturity_years, t_min, t_max, width);
            let y = map_y(p.yield_pct, y_min, y_max, height);
            grid[y][x] = marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: maturity=[{t_min:.2}, {t_max:.2}]y | yield=[{y_min:.2}, {y_max:.2}]%\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = curves
        .iter()
        .enumerate()
        .map(|(i, (label, _))| format!("{} {label}", STYLES[i % STYLES.len()].0))
        .collect();
    if !legend.is_empty() {
        out.push_str(&format!("Legend: {}\n", legend.join(" | ")));
    }

    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() && max.is_finite() {
        // Single distinct value: widen so mapping stays defined.
        Some((min - 0.5, max + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (max yield).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, ch);
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let snap = CurveSnapshot::from_pairs(None, &[1.0, 10.0], &[4.0, 5.0]).unwrap();
        let txt = render_curves(&[("latest", &snap)], 10, 5);
        let expected = concat!(
            "Plot: maturity=[1.00, 10.00]y | yield=[3.95, 5.05]%\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
            "Legend: o latest\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn second_curve_uses_its_own_marker() {
        let a = CurveSnapshot::from_pairs(None, &[2.0, 10.0], &[4.0, 4.5]).unwrap();
        let b = CurveSnapshot::from_pairs(None, &[2.0, 10.0], &[5.0, 4.2]).unwrap();
        let txt = render_curves(&[("latest", &a), ("1y ago", &b)], 40, 12);
        assert!(txt.contains('x'));
        assert!(txt.contains('o'));
        assert!(txt.ends_with("Legend: o latest | x 1y ago\n"));
    }
}
