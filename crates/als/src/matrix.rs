//! Sparse user × item interaction matrix.
//!
//! Stored in compressed sparse row (CSR) form so that a single user's row is
//! a contiguous slice (used at request time) and the whole matrix can be
//! walked row by row (used during training). Entries are immutable once the
//! matrix is built.

use crate::error::{AlsError, Axis, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One pre-aggregated (user, item, strength) record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_idx: usize,
    pub item_idx: usize,
    /// Aggregated engagement signal, non-negative
    pub strength: f32,
}

impl Interaction {
    pub fn new(user_idx: usize, item_idx: usize, strength: f32) -> Self {
        Self {
            user_idx,
            item_idx,
            strength,
        }
    }
}

/// Borrowed view of one matrix row: column indices in ascending order and
/// their strengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowView<'a> {
    indices: &'a [usize],
    values: &'a [f32],
}

impl<'a> RowView<'a> {
    /// Build a view from parallel slices.
    ///
    /// `indices` must be strictly ascending; this is checked in debug builds.
    pub fn new(indices: &'a [usize], values: &'a [f32]) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { indices, values }
    }

    /// A row with no interactions
    pub fn empty() -> RowView<'static> {
        RowView {
            indices: &[],
            values: &[],
        }
    }

    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    pub fn values(&self) -> &'a [f32] {
        self.values
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Strength at `col`, or 0.0 when nothing is stored there
    pub fn get(&self, col: usize) -> f32 {
        match self.indices.binary_search(&col) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate over `(column, strength)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + use<'a> {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

/// Sparse matrix in CSR layout.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    num_rows: usize,
    num_cols: usize,
    /// `indptr[r]..indptr[r + 1]` is the slice of row `r`
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl InteractionMatrix {
    /// Build a `num_users × num_items` matrix from interaction triples.
    ///
    /// Fails on the first out-of-range index or invalid strength (in input
    /// order), then on any repeated coordinate. Zero strengths are accepted
    /// but not stored.
    pub fn from_interactions(
        num_users: usize,
        num_items: usize,
        interactions: &[Interaction],
    ) -> Result<Self> {
        for it in interactions {
            if it.user_idx >= num_users {
                return Err(AlsError::IndexOutOfRange {
                    axis: Axis::User,
                    index: it.user_idx,
                    bound: num_users,
                });
            }
            if it.item_idx >= num_items {
                return Err(AlsError::IndexOutOfRange {
                    axis: Axis::Item,
                    index: it.item_idx,
                    bound: num_items,
                });
            }
            if !it.strength.is_finite() || it.strength < 0.0 {
                return Err(AlsError::InvalidStrength {
                    user_idx: it.user_idx,
                    item_idx: it.item_idx,
                    strength: it.strength,
                });
            }
        }

        let mut sorted: Vec<Interaction> = interactions.to_vec();
        sorted.sort_unstable_by_key(|it| (it.user_idx, it.item_idx));

        if let Some(dup) = sorted
            .windows(2)
            .find(|w| w[0].user_idx == w[1].user_idx && w[0].item_idx == w[1].item_idx)
        {
            return Err(AlsError::DuplicateInteraction {
                user_idx: dup[0].user_idx,
                item_idx: dup[0].item_idx,
            });
        }

        let mut indptr = vec![0usize; num_users + 1];
        let mut indices = Vec::with_capacity(sorted.len());
        let mut values = Vec::with_capacity(sorted.len());
        for it in sorted.iter().filter(|it| it.strength > 0.0) {
            indptr[it.user_idx + 1] += 1;
            indices.push(it.item_idx);
            values.push(it.strength);
        }
        for r in 0..num_users {
            indptr[r + 1] += indptr[r];
        }

        debug!(
            "Built {}x{} interaction matrix with {} stored entries",
            num_users,
            num_items,
            indices.len()
        );

        Ok(Self {
            num_rows: num_users,
            num_cols: num_items,
            indptr,
            indices,
            values,
        })
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Borrow row `r`, or `None` when `r` is out of range
    pub fn row(&self, r: usize) -> Option<RowView<'_>> {
        if r >= self.num_rows {
            return None;
        }
        let (start, end) = (self.indptr[r], self.indptr[r + 1]);
        Some(RowView::new(&self.indices[start..end], &self.values[start..end]))
    }

    /// Iterate over all rows in order
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.num_rows).map(move |r| {
            let (start, end) = (self.indptr[r], self.indptr[r + 1]);
            RowView::new(&self.indices[start..end], &self.values[start..end])
        })
    }

    /// Iterate over every stored entry in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Interaction> + '_ {
        self.rows()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |(c, v)| Interaction::new(r, c, v)))
    }

    /// The `cols × rows` transpose (item × user when called on a user × item
    /// matrix). Columns within each new row stay ascending.
    pub fn transpose(&self) -> Self {
        let mut indptr = vec![0usize; self.num_cols + 1];
        for &c in &self.indices {
            indptr[c + 1] += 1;
        }
        for c in 0..self.num_cols {
            indptr[c + 1] += indptr[c];
        }

        let mut next = indptr.clone();
        let mut indices = vec![0usize; self.indices.len()];
        let mut values = vec![0f32; self.values.len()];
        for (r, row) in self.rows().enumerate() {
            for (c, v) in row.iter() {
                let slot = next[c];
                indices[slot] = r;
                values[slot] = v;
                next[c] += 1;
            }
        }

        Self {
            num_rows: self.num_cols,
            num_cols: self.num_rows,
            indptr,
            indices,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Interaction> {
        vec![
            Interaction::new(0, 0, 3.0),
            Interaction::new(0, 1, 1.0),
            Interaction::new(1, 2, 4.0),
            Interaction::new(2, 3, 1.0),
            Interaction::new(3, 4, 3.0),
            Interaction::new(4, 0, 1.0),
        ]
    }

    #[test]
    fn test_build_and_read_rows() {
        let matrix = InteractionMatrix::from_interactions(5, 5, &scenario()).unwrap();
        assert_eq!(matrix.shape(), (5, 5));
        assert_eq!(matrix.nnz(), 6);

        let row0 = matrix.row(0).unwrap();
        assert_eq!(row0.indices(), &[0, 1]);
        assert_eq!(row0.get(0), 3.0);
        assert_eq!(row0.get(1), 1.0);
        assert_eq!(row0.get(2), 0.0);

        assert!(matrix.row(5).is_none());
    }

    #[test]
    fn test_unsorted_input_yields_sorted_rows() {
        let input = vec![
            Interaction::new(1, 3, 2.0),
            Interaction::new(0, 2, 1.0),
            Interaction::new(1, 0, 5.0),
        ];
        let matrix = InteractionMatrix::from_interactions(2, 4, &input).unwrap();
        assert_eq!(matrix.row(1).unwrap().indices(), &[0, 3]);
        assert_eq!(matrix.row(1).unwrap().values(), &[5.0, 2.0]);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = InteractionMatrix::from_interactions(2, 2, &[Interaction::new(2, 0, 1.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            AlsError::IndexOutOfRange { axis: Axis::User, index: 2, bound: 2 }
        ));

        let err = InteractionMatrix::from_interactions(2, 2, &[Interaction::new(0, 7, 1.0)])
            .unwrap_err();
        assert!(matches!(err, AlsError::IndexOutOfRange { axis: Axis::Item, .. }));
    }

    #[test]
    fn test_duplicate_coordinate_is_rejected() {
        let input = vec![Interaction::new(0, 1, 1.0), Interaction::new(0, 1, 2.0)];
        let err = InteractionMatrix::from_interactions(1, 2, &input).unwrap_err();
        assert_eq!(
            err,
            AlsError::DuplicateInteraction { user_idx: 0, item_idx: 1 }
        );
    }

    #[test]
    fn test_invalid_strength_is_rejected() {
        let err = InteractionMatrix::from_interactions(1, 1, &[Interaction::new(0, 0, -1.0)])
            .unwrap_err();
        assert!(matches!(err, AlsError::InvalidStrength { .. }));
    }

    #[test]
    fn test_zero_strength_not_stored() {
        let input = vec![Interaction::new(0, 0, 0.0), Interaction::new(0, 1, 2.0)];
        let matrix = InteractionMatrix::from_interactions(1, 2, &input).unwrap();
        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.row(0).unwrap().indices(), &[1]);
    }

    #[test]
    fn test_transpose() {
        let matrix = InteractionMatrix::from_interactions(5, 5, &scenario()).unwrap();
        let t = matrix.transpose();
        assert_eq!(t.shape(), (5, 5));
        assert_eq!(t.nnz(), 6);
        // item 0 was seen by users 0 and 4
        assert_eq!(t.row(0).unwrap().indices(), &[0, 4]);
        assert_eq!(t.row(0).unwrap().values(), &[3.0, 1.0]);
        assert_eq!(t.transpose(), matrix);
    }

    #[test]
    fn test_iter_is_row_major() {
        let matrix = InteractionMatrix::from_interactions(5, 5, &scenario()).unwrap();
        let entries: Vec<Interaction> = matrix.iter().collect();
        assert_eq!(entries, scenario());
    }

    #[test]
    fn test_empty_rows_are_allowed() {
        let matrix = InteractionMatrix::from_interactions(3, 3, &[]).unwrap();
        assert_eq!(matrix.nnz(), 0);
        assert!(matrix.rows().all(|r| r.is_empty()));
    }
}
