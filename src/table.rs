//! Banded cumulative-cost table construction and traceback.
//!
//! Both realizations compute the recurrence
//! `D[i][j] = metric(a[i], b[j]) + min(D[i-1][j-1], D[i-1][j], D[i][j-1])`
//! with `D[0][0] = metric(a[0], b[0])` as base case and out-of-band
//! predecessors reading as infinity. Ties among equal-cost predecessors are
//! broken in a fixed, stable priority order: diagonal, then vertical
//! `(i-1, j)`, then horizontal `(i, j-1)`, so path reconstruction is
//! deterministic across runs and platforms.

use crate::constraint::WindowPolicy;
use crate::metric::Metric;
use crate::path::WarpingStep;
use crate::series::SeriesView;

const DIAG: u8 = 0;
const VERT: u8 = 1;
const HORIZ: u8 = 2;

/// Rolling two-row accumulator. O(band width) memory, cost only.
///
/// Each row buffer has `bw + 2` slots: index 0 is the left sentinel and
/// index `bw + 1` the right sentinel, both permanently infinite. Active
/// columns of a row occupy local indices `1..=width`, offset by the row's
/// admissible start column. Out-of-band predecessor reads land on sentinel
/// or unfilled slots and naturally see infinity.
///
/// When `cutoff` is supplied, the accumulation abandons early: every
/// monotone path crosses each row exactly once, so a non-final row whose
/// minimum exceeds the cutoff proves the final cost does too. The result
/// is then `f64::INFINITY`; any finite result is exact.
///
/// Callers must have validated the pair: both sequences non-empty, equal
/// dims, window feasible.
pub(crate) fn accumulate(
    a: SeriesView<'_>,
    b: SeriesView<'_>,
    metric: Metric,
    window: WindowPolicy,
    cutoff: Option<f64>,
) -> f64 {
    let n = a.len();
    let m = b.len();

    let bw = window.band_width(n, m);
    let buf_width = bw + 2;

    let mut prev = vec![f64::INFINITY; buf_width];
    let mut curr = vec![f64::INFINITY; buf_width];
    let mut prev_start = 0usize;

    for i in 0..n {
        curr.fill(f64::INFINITY);

        let col_range = window.column_range(i, n, m);
        let curr_start = col_range.start;
        let mut row_min = f64::INFINITY;

        for j in col_range {
            let local = metric.cost(a.sample(i), b.sample(j));
            let cj = j - curr_start + 1;

            if i == 0 && j == 0 {
                curr[cj] = local;
                row_min = local;
                continue;
            }

            // Horizontal: D[i][j-1]
            let horiz = if j > curr_start {
                curr[cj - 1]
            } else {
                f64::INFINITY
            };

            // Vertical: D[i-1][j]
            let vert = if i > 0 {
                let pj = j.wrapping_sub(prev_start).wrapping_add(1);
                if pj < buf_width { prev[pj] } else { f64::INFINITY }
            } else {
                f64::INFINITY
            };

            // Diagonal: D[i-1][j-1]
            let diag = if i > 0 && j > 0 {
                let pj = (j - 1).wrapping_sub(prev_start).wrapping_add(1);
                if pj < buf_width { prev[pj] } else { f64::INFINITY }
            } else {
                f64::INFINITY
            };

            let val = local + diag.min(vert).min(horiz);
            curr[cj] = val;
            if val < row_min {
                row_min = val;
            }
        }

        // Abandon on non-final rows only: the last row's minimum may belong
        // to a cell other than (n-1, m-1), which is checked after the loop.
        if let Some(c) = cutoff {
            if i < n - 1 && row_min > c {
                return f64::INFINITY;
            }
        }

        prev_start = curr_start;
        std::mem::swap(&mut prev, &mut curr);
    }

    // After the final swap `prev` holds the last completed row.
    let final_range = window.column_range(n - 1, n, m);
    let final_cost = prev[(m - 1) - final_range.start + 1];

    match cutoff {
        Some(c) if final_cost > c => f64::INFINITY,
        _ => final_cost,
    }
}

/// Full banded cost table with one direction byte per cell, for path
/// reconstruction. O(n * band width) memory.
///
/// Cell `(i, j)` maps to flat index `i * bw + (j - column_range(i).start)`.
/// The table is owned by a single alignment invocation and dropped once
/// traceback completes.
#[derive(Debug)]
pub(crate) struct CostTable {
    n: usize,
    m: usize,
    bw: usize,
    window: WindowPolicy,
    cost: Vec<f64>,
    dirs: Vec<u8>,
}

impl CostTable {
    /// Fill the table. Same preconditions as [`accumulate`].
    pub(crate) fn fill(
        a: SeriesView<'_>,
        b: SeriesView<'_>,
        metric: Metric,
        window: WindowPolicy,
    ) -> Self {
        let n = a.len();
        let m = b.len();
        let bw = window.band_width(n, m);

        let mut cost = vec![f64::INFINITY; n * bw];
        let mut dirs = vec![DIAG; n * bw];

        let mut prev_range = 0..0;
        for i in 0..n {
            let col_range = window.column_range(i, n, m);

            for j in col_range.clone() {
                let local = metric.cost(a.sample(i), b.sample(j));
                let idx = i * bw + (j - col_range.start);

                if i == 0 && j == 0 {
                    cost[idx] = local;
                    continue;
                }

                let diag = if i > 0 && j > 0 && prev_range.contains(&(j - 1)) {
                    cost[(i - 1) * bw + (j - 1 - prev_range.start)]
                } else {
                    f64::INFINITY
                };

                let vert = if i > 0 && prev_range.contains(&j) {
                    cost[(i - 1) * bw + (j - prev_range.start)]
                } else {
                    f64::INFINITY
                };

                let horiz = if j > col_range.start {
                    cost[idx - 1]
                } else {
                    f64::INFINITY
                };

                let (best, dir) = if diag <= vert && diag <= horiz {
                    (diag, DIAG)
                } else if vert <= horiz {
                    (vert, VERT)
                } else {
                    (horiz, HORIZ)
                };

                cost[idx] = local + best;
                dirs[idx] = dir;
            }

            prev_range = col_range;
        }

        Self { n, m, bw, window, cost, dirs }
    }

    /// Cumulative cost at `(n-1, m-1)`.
    pub(crate) fn final_cost(&self) -> f64 {
        let range = self.window.column_range(self.n - 1, self.n, self.m);
        self.cost[(self.n - 1) * self.bw + (self.m - 1 - range.start)]
    }

    /// Backtrack from `(n-1, m-1)` to `(0, 0)` following the stored
    /// direction bytes, returning the path in forward order.
    pub(crate) fn traceback(&self) -> Vec<WarpingStep> {
        let mut steps = Vec::with_capacity(self.n.max(self.m));
        let mut i = self.n - 1;
        let mut j = self.m - 1;

        loop {
            steps.push(WarpingStep { a: i, b: j });
            if i == 0 && j == 0 {
                break;
            }
            let range = self.window.column_range(i, self.n, self.m);
            match self.dirs[i * self.bw + (j - range.start)] {
                DIAG => {
                    i -= 1;
                    j -= 1;
                }
                VERT => {
                    i -= 1;
                }
                _ => {
                    j -= 1;
                }
            }
        }

        steps.reverse();
        steps
    }
}
