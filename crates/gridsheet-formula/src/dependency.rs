use std::collections::{BTreeSet, HashMap, HashSet};

use gridsheet_core::CellCoord;

/// Result of ordering formula cells for evaluation
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EvaluationOrder {
    /// Cells whose inputs are all evaluated before them
    pub ordered: Vec<CellCoord>,
    /// Cells on a cycle or downstream of one
    pub circular: Vec<CellCoord>,
}

/// Tracks dependencies between formula cells for ordered recalculation
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Maps a cell to the cells it reads
    /// e.g., if C1 = SUM(A1:B1), then dependencies[C1] = {A1, B1}
    dependencies: HashMap<CellCoord, HashSet<CellCoord>>,

    /// Reverse lookup: dependents[A1] contains C1
    dependents: HashMap<CellCoord, HashSet<CellCoord>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update dependencies for a cell after formula change
    pub fn set_dependencies(&mut self, cell: CellCoord, deps: HashSet<CellCoord>) {
        if let Some(old_deps) = self.dependencies.get(&cell) {
            for dep in old_deps {
                if let Some(dependents) = self.dependents.get_mut(dep) {
                    dependents.remove(&cell);
                }
            }
        }

        for dep in &deps {
            self.dependents.entry(*dep).or_default().insert(cell);
        }

        if deps.is_empty() {
            self.dependencies.remove(&cell);
        } else {
            self.dependencies.insert(cell, deps);
        }
    }

    /// Get cells that directly depend on the given cell
    pub fn get_direct_dependents(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.dependents.get(&cell)
    }

    /// Get cells that the given cell directly depends on
    pub fn get_direct_dependencies(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.dependencies.get(&cell)
    }

    /// Order `cells` so every cell comes after the cells among `cells` it
    /// reads. Ties break in row-major order. Cells that can never become
    /// ready (cycles and everything fed by a cycle) are reported separately.
    pub fn evaluation_order(&self, cells: &[CellCoord]) -> EvaluationOrder {
        let members: HashSet<CellCoord> = cells.iter().copied().collect();

        let mut pending: HashMap<CellCoord, usize> = members
            .iter()
            .map(|cell| {
                let inputs = self
                    .get_direct_dependencies(*cell)
                    .map(|deps| deps.iter().filter(|d| members.contains(d)).count())
                    .unwrap_or(0);
                (*cell, inputs)
            })
            .collect();

        let mut ready: BTreeSet<CellCoord> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(cell, _)| *cell)
            .collect();

        let mut order = EvaluationOrder::default();
        while let Some(cell) = ready.pop_first() {
            order.ordered.push(cell);
            pending.remove(&cell);

            if let Some(dependents) = self.get_direct_dependents(cell) {
                for dependent in dependents {
                    if let Some(count) = pending.get_mut(dependent) {
                        *count -= 1;
                        if *count == 0 {
                            ready.insert(*dependent);
                        }
                    }
                }
            }
        }

        let mut circular: Vec<CellCoord> = pending.into_keys().collect();
        circular.sort();
        order.circular = circular;
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> CellCoord {
        CellCoord::new(row, col)
    }

    fn deps(cells: &[CellCoord]) -> HashSet<CellCoord> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_chain_orders_inputs_first() {
        let mut graph = DependencyGraph::new();
        // A3 reads A2, A2 reads A1
        graph.set_dependencies(c(2, 0), deps(&[c(1, 0)]));
        graph.set_dependencies(c(1, 0), deps(&[c(0, 0)]));

        let order = graph.evaluation_order(&[c(2, 0), c(1, 0)]);
        assert_eq!(order.ordered, vec![c(1, 0), c(2, 0)]);
        assert!(order.circular.is_empty());
    }

    #[test]
    fn test_cycle_and_downstream_reported() {
        let mut graph = DependencyGraph::new();
        graph.set_dependencies(c(0, 0), deps(&[c(0, 1)]));
        graph.set_dependencies(c(0, 1), deps(&[c(0, 0)]));
        graph.set_dependencies(c(0, 2), deps(&[c(0, 1)]));
        graph.set_dependencies(c(5, 5), deps(&[c(9, 9)]));

        let order = graph.evaluation_order(&[c(0, 0), c(0, 1), c(0, 2), c(5, 5)]);
        assert_eq!(order.ordered, vec![c(5, 5)]);
        assert_eq!(order.circular, vec![c(0, 0), c(0, 1), c(0, 2)]);
    }

    #[test]
    fn test_self_reference_is_circular() {
        let mut graph = DependencyGraph::new();
        graph.set_dependencies(c(0, 0), deps(&[c(0, 0), c(1, 0)]));
        let order = graph.evaluation_order(&[c(0, 0)]);
        assert!(order.ordered.is_empty());
        assert_eq!(order.circular, vec![c(0, 0)]);
    }

    #[test]
    fn test_set_dependencies_replaces_reverse_edges() {
        let mut graph = DependencyGraph::new();
        graph.set_dependencies(c(0, 0), deps(&[c(1, 0)]));
        graph.set_dependencies(c(0, 0), deps(&[c(2, 0)]));

        assert!(graph.get_direct_dependents(c(1, 0)).unwrap().is_empty());
        assert!(graph.get_direct_dependents(c(2, 0)).unwrap().contains(&c(0, 0)));

        graph.set_dependencies(c(0, 0), HashSet::new());
        assert!(graph.get_direct_dependencies(c(0, 0)).is_none());
    }
}
