//! Device connectivity and shortest-path search.
//!
//! A [`Connectivity`] constrains which qubits a multi-qubit gate may act on
//! together. Qubits are 1-based and match the circuit's [`QubitId`]s.
//!
//! # Example
//!
//! ```
//! use quill_compile::connectivity::{Connectivity, path_search};
//! use quill_ir::QubitId;
//!
//! let line = Connectivity::line(6);
//! let path = path_search(QubitId(2), QubitId(5), &line, &[]).unwrap();
//! assert_eq!(path, vec![QubitId(5), QubitId(4), QubitId(3), QubitId(2)]);
//! ```

use std::collections::VecDeque;

use quill_ir::QubitId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// A linear chain of qubits `1 - 2 - ... - dimension`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConnectivity {
    /// Number of positions on the line.
    pub dimension: u32,
    /// Positions that are not usable.
    #[serde(default)]
    pub excluded_positions: Vec<QubitId>,
    /// Couplers (neighbor pairs) that are not usable.
    #[serde(default)]
    pub excluded_couplers: Vec<(QubitId, QubitId)>,
}

/// One row of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeRow {
    /// Column of the first qubit in this row.
    pub offset: u32,
    /// Number of qubits in this row.
    pub width: u32,
}

/// A 2D grid of qubits, numbered row-major from 1.
///
/// Rows may be shifted and have different widths. Two qubits are adjacent
/// when they are horizontal neighbors in a row, or sit in the same column
/// of consecutive rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeConnectivity {
    /// Row layout, top to bottom.
    pub rows: Vec<LatticeRow>,
    /// Positions that are not usable.
    #[serde(default)]
    pub excluded_positions: Vec<QubitId>,
}

/// Device connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Connectivity {
    /// Linear chain.
    Line(LineConnectivity),
    /// 2D lattice.
    Lattice(LatticeConnectivity),
    /// Every pair of qubits is coupled.
    AllToAll,
}

impl LineConnectivity {
    fn contains(&self, qubit: QubitId) -> bool {
        qubit.0 >= 1 && qubit.0 <= self.dimension && !self.excluded_positions.contains(&qubit)
    }

    fn coupler_excluded(&self, a: QubitId, b: QubitId) -> bool {
        self.excluded_couplers
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    fn adjacency(&self, qubit: QubitId) -> Vec<QubitId> {
        let mut neighbors = Vec::with_capacity(2);
        for candidate in [qubit.0.wrapping_sub(1), qubit.0 + 1] {
            let candidate = QubitId(candidate);
            if self.contains(candidate) && !self.coupler_excluded(qubit, candidate) {
                neighbors.push(candidate);
            }
        }
        neighbors
    }

    /// Arithmetic path; empty if anything in between is excluded.
    fn path(
        &self,
        origin: QubitId,
        target: QubitId,
        excluded: &FxHashSet<QubitId>,
    ) -> Vec<QubitId> {
        let (lo, hi) = (origin.0.min(target.0), origin.0.max(target.0));

        let blocked_position = (lo + 1..hi)
            .map(QubitId)
            .any(|q| excluded.contains(&q) || self.excluded_positions.contains(&q));
        let blocked_coupler =
            (lo..hi).any(|q| self.coupler_excluded(QubitId(q), QubitId(q + 1)));
        if blocked_position || blocked_coupler {
            return vec![];
        }

        if target.0 >= origin.0 {
            (origin.0..=target.0).rev().map(QubitId).collect()
        } else {
            (target.0..=origin.0).map(QubitId).collect()
        }
    }
}

impl LatticeConnectivity {
    /// A full `rows × cols` grid.
    pub fn rectangular(rows: u32, cols: u32) -> Self {
        Self {
            rows: vec![LatticeRow { offset: 0, width: cols }; rows as usize],
            excluded_positions: vec![],
        }
    }

    fn qubit_count(&self) -> u32 {
        self.rows.iter().map(|r| r.width).sum()
    }

    /// `(row, column)` of a qubit.
    fn position(&self, qubit: QubitId) -> Option<(usize, u32)> {
        if qubit.0 == 0 {
            return None;
        }
        let mut first = 1;
        for (r, row) in self.rows.iter().enumerate() {
            if qubit.0 < first + row.width {
                return Some((r, row.offset + (qubit.0 - first)));
            }
            first += row.width;
        }
        None
    }

    fn qubit_at(&self, row: usize, col: u32) -> Option<QubitId> {
        let layout = self.rows.get(row)?;
        if col < layout.offset || col >= layout.offset + layout.width {
            return None;
        }
        let first: u32 = 1 + self.rows[..row].iter().map(|r| r.width).sum::<u32>();
        Some(QubitId(first + col - layout.offset))
    }

    fn contains(&self, qubit: QubitId) -> bool {
        self.position(qubit).is_some() && !self.excluded_positions.contains(&qubit)
    }

    fn adjacency(&self, qubit: QubitId) -> Vec<QubitId> {
        let Some((row, col)) = self.position(qubit) else {
            return vec![];
        };
        let mut neighbors: Vec<QubitId> = [
            row.checked_sub(1).and_then(|r| self.qubit_at(r, col)),
            col.checked_sub(1).and_then(|c| self.qubit_at(row, c)),
            self.qubit_at(row, col + 1),
            self.qubit_at(row + 1, col),
        ]
        .into_iter()
        .flatten()
        .filter(|q| self.contains(*q))
        .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// BFS with a predecessor map; `None` marks the origin.
    fn path(
        &self,
        origin: QubitId,
        target: QubitId,
        excluded: &FxHashSet<QubitId>,
    ) -> Vec<QubitId> {
        let mut predecessor: FxHashMap<QubitId, Option<QubitId>> = FxHashMap::default();
        let mut queue = VecDeque::new();
        predecessor.insert(origin, None);
        queue.push_back(origin);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.adjacency(current) {
                if predecessor.contains_key(&neighbor)
                    || (neighbor != target && excluded.contains(&neighbor))
                {
                    continue;
                }
                predecessor.insert(neighbor, Some(current));

                if neighbor == target {
                    let mut path = vec![target];
                    let mut node = target;
                    while let Some(Some(prev)) = predecessor.get(&node) {
                        path.push(*prev);
                        node = *prev;
                    }
                    return path;
                }
                queue.push_back(neighbor);
            }
        }

        vec![]
    }
}

impl Connectivity {
    /// A line of `dimension` qubits with nothing excluded.
    pub fn line(dimension: u32) -> Self {
        Connectivity::Line(LineConnectivity {
            dimension,
            excluded_positions: vec![],
            excluded_couplers: vec![],
        })
    }

    /// A full `rows × cols` lattice.
    pub fn lattice(rows: u32, cols: u32) -> Self {
        Connectivity::Lattice(LatticeConnectivity::rectangular(rows, cols))
    }

    /// Human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Connectivity::Line(_) => "line",
            Connectivity::Lattice(_) => "lattice",
            Connectivity::AllToAll => "all-to-all",
        }
    }

    /// Number of positions, or `None` for all-to-all.
    pub fn qubit_count(&self) -> Option<u32> {
        match self {
            Connectivity::Line(line) => Some(line.dimension),
            Connectivity::Lattice(lattice) => Some(lattice.qubit_count()),
            Connectivity::AllToAll => None,
        }
    }

    /// Whether `qubit` is a live position.
    pub fn contains(&self, qubit: QubitId) -> bool {
        match self {
            Connectivity::Line(line) => line.contains(qubit),
            Connectivity::Lattice(lattice) => lattice.contains(qubit),
            Connectivity::AllToAll => qubit.0 >= 1,
        }
    }

    fn check_contains(&self, qubit: QubitId) -> CompileResult<()> {
        if self.contains(qubit) {
            Ok(())
        } else {
            Err(CompileError::QubitNotInConnectivity { qubit })
        }
    }

    /// Live neighbors of `qubit`, ascending.
    pub fn adjacency(&self, qubit: QubitId) -> CompileResult<Vec<QubitId>> {
        self.check_contains(qubit)?;
        match self {
            Connectivity::Line(line) => Ok(line.adjacency(qubit)),
            Connectivity::Lattice(lattice) => Ok(lattice.adjacency(qubit)),
            Connectivity::AllToAll => Err(CompileError::UnsupportedConnectivity {
                operation: "adjacency".into(),
                connectivity: self.kind().into(),
            }),
        }
    }

    /// Whether two distinct qubits share a live coupler.
    pub fn are_adjacent(&self, a: QubitId, b: QubitId) -> bool {
        if a == b {
            return false;
        }
        match self {
            Connectivity::AllToAll => true,
            _ => self.adjacency(a).is_ok_and(|n| n.contains(&b)),
        }
    }

    /// Whether `qubits` induce a connected subgraph.
    pub fn is_connected_set(&self, qubits: &[QubitId]) -> bool {
        let Some(&first) = qubits.first() else {
            return true;
        };
        if matches!(self, Connectivity::AllToAll) {
            return true;
        }

        let mut reached = FxHashSet::default();
        reached.insert(first);
        let mut stack = vec![first];
        while let Some(current) = stack.pop() {
            for &other in qubits {
                if !reached.contains(&other) && self.are_adjacent(current, other) {
                    reached.insert(other);
                    stack.push(other);
                }
            }
        }
        qubits.iter().all(|q| reached.contains(q))
    }

    /// Shortest path from `target` back to `origin`; see [`path_search`].
    pub fn path_search(
        &self,
        origin: QubitId,
        target: QubitId,
        excluded: &[QubitId],
    ) -> CompileResult<Vec<QubitId>> {
        self.check_contains(origin)?;
        self.check_contains(target)?;
        if origin == target {
            return Ok(vec![origin]);
        }

        let excluded: FxHashSet<QubitId> = excluded.iter().copied().collect();
        Ok(match self {
            Connectivity::Line(line) => line.path(origin, target, &excluded),
            Connectivity::Lattice(lattice) => lattice.path(origin, target, &excluded),
            Connectivity::AllToAll => vec![target, origin],
        })
    }

    /// Hop count between two qubits.
    pub fn distance(&self, origin: QubitId, target: QubitId) -> CompileResult<usize> {
        let path = self.path_search(origin, target, &[])?;
        if path.is_empty() {
            return Err(CompileError::RoutingFailed { origin, target });
        }
        Ok(path.len() - 1)
    }
}

/// Shortest path between two qubits, listed from `target` back to `origin`
/// (both inclusive).
///
/// Qubits in `excluded` are never stepped on. An empty path means no route
/// exists under the exclusions. Neighbors are visited in ascending order and
/// the first discovery wins.
pub fn path_search(
    origin: QubitId,
    target: QubitId,
    connectivity: &Connectivity,
    excluded: &[QubitId],
) -> CompileResult<Vec<QubitId>> {
    connectivity.path_search(origin, target, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(ids: &[u32]) -> Vec<QubitId> {
        ids.iter().copied().map(QubitId).collect()
    }

    #[test]
    fn test_line_path() {
        let line = Connectivity::line(6);
        assert_eq!(
            path_search(QubitId(2), QubitId(5), &line, &[]).unwrap(),
            q(&[5, 4, 3, 2])
        );
        assert_eq!(
            path_search(QubitId(5), QubitId(2), &line, &[]).unwrap(),
            q(&[2, 3, 4, 5])
        );
        assert_eq!(
            path_search(QubitId(3), QubitId(3), &line, &[]).unwrap(),
            q(&[3])
        );
    }

    #[test]
    fn test_line_path_blocked() {
        let line = Connectivity::line(6);
        assert!(path_search(QubitId(2), QubitId(5), &line, &[QubitId(4)])
            .unwrap()
            .is_empty());

        let cut = Connectivity::Line(LineConnectivity {
            dimension: 6,
            excluded_positions: vec![],
            excluded_couplers: vec![(QubitId(4), QubitId(3))],
        });
        assert!(path_search(QubitId(2), QubitId(5), &cut, &[])
            .unwrap()
            .is_empty());
        assert_eq!(cut.adjacency(QubitId(3)).unwrap(), q(&[2]));
    }

    #[test]
    fn test_line_adjacency() {
        let line = Connectivity::Line(LineConnectivity {
            dimension: 4,
            excluded_positions: vec![QubitId(3)],
            excluded_couplers: vec![],
        });
        assert_eq!(line.adjacency(QubitId(1)).unwrap(), q(&[2]));
        assert_eq!(line.adjacency(QubitId(2)).unwrap(), q(&[1]));
        assert!(matches!(
            line.adjacency(QubitId(3)),
            Err(CompileError::QubitNotInConnectivity { .. })
        ));
        assert!(matches!(
            line.adjacency(QubitId(9)),
            Err(CompileError::QubitNotInConnectivity { .. })
        ));
    }

    #[test]
    fn test_lattice_adjacency_and_path() {
        // 1 2 3
        // 4 5 6
        // 7 8 9
        let grid = Connectivity::lattice(3, 3);
        assert_eq!(grid.qubit_count(), Some(9));
        assert_eq!(grid.adjacency(QubitId(5)).unwrap(), q(&[2, 4, 6, 8]));
        assert_eq!(grid.adjacency(QubitId(1)).unwrap(), q(&[2, 4]));

        let path = path_search(QubitId(1), QubitId(9), &grid, &[]).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&QubitId(9)));
        assert_eq!(path.last(), Some(&QubitId(1)));
        // Ascending neighbor order: 1 -> 2 -> 3 -> 6 -> 9
        assert_eq!(path, q(&[9, 6, 3, 2, 1]));

        let detour = path_search(QubitId(1), QubitId(3), &grid, &[QubitId(2)]).unwrap();
        assert_eq!(detour, q(&[3, 6, 5, 4, 1]));
    }

    #[test]
    fn test_lattice_shifted_rows() {
        //   1 2
        // 3 4 5
        let lattice = Connectivity::Lattice(LatticeConnectivity {
            rows: vec![
                LatticeRow { offset: 1, width: 2 },
                LatticeRow { offset: 0, width: 3 },
            ],
            excluded_positions: vec![],
        });
        assert_eq!(lattice.adjacency(QubitId(1)).unwrap(), q(&[2, 4]));
        assert_eq!(lattice.adjacency(QubitId(3)).unwrap(), q(&[4]));
        assert_eq!(lattice.distance(QubitId(3), QubitId(2)).unwrap(), 3);
    }

    #[test]
    fn test_lattice_unreachable() {
        let lattice = Connectivity::Lattice(LatticeConnectivity {
            rows: vec![LatticeRow { offset: 0, width: 3 }],
            excluded_positions: vec![QubitId(2)],
        });
        assert!(path_search(QubitId(1), QubitId(3), &lattice, &[])
            .unwrap()
            .is_empty());
        assert!(matches!(
            lattice.distance(QubitId(1), QubitId(3)),
            Err(CompileError::RoutingFailed { .. })
        ));
    }

    #[test]
    fn test_all_to_all() {
        let all = Connectivity::AllToAll;
        assert!(matches!(
            all.adjacency(QubitId(1)),
            Err(CompileError::UnsupportedConnectivity { .. })
        ));
        assert_eq!(
            path_search(QubitId(1), QubitId(7), &all, &[]).unwrap(),
            q(&[7, 1])
        );
        assert_eq!(
            path_search(QubitId(4), QubitId(4), &all, &[]).unwrap(),
            q(&[4])
        );
        assert!(all.are_adjacent(QubitId(1), QubitId(9)));
    }

    #[test]
    fn test_connected_set() {
        let line = Connectivity::line(6);
        assert!(line.is_connected_set(&q(&[3, 1, 2])));
        assert!(!line.is_connected_set(&q(&[1, 3])));
        assert!(line.is_connected_set(&q(&[4])));
    }

    #[test]
    fn test_serde_tagged() {
        let json = r#"{"kind":"line","dimension":3}"#;
        let conn: Connectivity = serde_json::from_str(json).unwrap();
        assert_eq!(conn, Connectivity::line(3));

        let all: Connectivity = serde_json::from_str(r#"{"kind":"all_to_all"}"#).unwrap();
        assert_eq!(all, Connectivity::AllToAll);
    }
}
