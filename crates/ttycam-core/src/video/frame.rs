//! The character grid representing one rendered capture instant.

/// A rectangular grid of characters.
///
/// Invariant: every row has the same length, or the frame has zero rows.
/// The capture collaborator produces ASCII art, so cells are single-byte
/// characters on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharFrame {
    rows: Vec<Vec<char>>,
}

/// One changed cell between two frames of identical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub ch: char,
}

impl CharFrame {
    /// Wraps a grid of rows.  All rows must share one length.
    pub fn new(rows: Vec<Vec<char>>) -> Self {
        debug_assert!(
            rows.windows(2).all(|w| w[0].len() == w[1].len()),
            "all rows must have identical length"
        );
        Self { rows }
    }

    /// The empty frame: zero rows, encodes to zero bytes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.rows[0].is_empty()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column count, taken from the first row (0 for an empty frame).
    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_idx, row)| {
            row.iter()
                .enumerate()
                .map(move |(col_idx, &ch)| (row_idx, col_idx, ch))
        })
    }

    /// Computes the cells that changed relative to `old`, in row-major order.
    ///
    /// Returns `None` when the two frames differ in shape, which signals the
    /// renderer to fall back to a full clear-and-redraw.  Identical frames
    /// yield `Some` of an empty list: nothing to redraw.
    pub fn diff(&self, old: &CharFrame) -> Option<Vec<CellUpdate>> {
        if self.num_rows() != old.num_rows() || self.num_cols() != old.num_cols() {
            return None;
        }

        let updates = self
            .cells()
            .zip(old.cells())
            .filter(|((_, _, new_ch), (_, _, old_ch))| new_ch != old_ch)
            .map(|((row, col, ch), _)| CellUpdate { row, col, ch })
            .collect();
        Some(updates)
    }
}

impl From<Vec<Vec<char>>> for CharFrame {
    fn from(rows: Vec<Vec<char>>) -> Self {
        Self::new(rows)
    }
}

impl std::fmt::Display for CharFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            for &ch in row {
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
