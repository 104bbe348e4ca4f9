use std::rc::Rc;

use crate::graph::{
    Cost,
    Graph,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Incident {
    pub vertex: usize,
    pub cost: Cost,
}

/// The two cheapest edges currently known to touch one vertex.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct VerticesPair {
    slots: [Option<Incident>; 2],
}

impl VerticesPair {
    pub fn new(first: Option<Incident>, second: Option<Incident>) -> VerticesPair {
        VerticesPair { slots: [first, second], }
    }

    pub fn incidents(&self) -> impl Iterator<Item = &Incident> {
        self.slots.iter().flatten()
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.incidents().any(|incident| incident.vertex == vertex)
    }

    /// Empty slots count as nothing.
    pub fn cost_sum(&self) -> Cost {
        self.incidents().map(|incident| incident.cost).sum()
    }

    /// Records the edge to `vertex` in place of the most expensive slot,
    /// never evicting the edge to `keep`. Known vertices are left untouched.
    pub fn replace(&mut self, vertex: usize, cost: Cost, keep: Option<usize>) {
        if self.contains(vertex) {
            return;
        }
        if let Some(empty) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *empty = Some(Incident { vertex, cost, });
            return;
        }

        let mut worst: Option<(usize, Cost)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(incident) = slot {
                if Some(incident.vertex) == keep {
                    continue;
                }
                if worst.map_or(true, |(_, worst_cost)| worst_cost <= incident.cost) {
                    worst = Some((index, incident.cost));
                }
            }
        }
        if let Some((index, _)) = worst {
            self.slots[index] = Some(Incident { vertex, cost, });
        }
    }
}

/// Per-vertex closest pairs backing the branch and bound lower bound.
///
/// Tables are shared between a branch state and its children until one of
/// them actually changes an entry, then the changed table is copied.
#[derive(Clone, Debug)]
pub struct ReducedCostTable {
    pairs: Rc<Vec<VerticesPair>>,
    cost_sum: Cost,
}

/// Cost of touching `a` and `b` regardless of direction: the cheaper existing edge.
fn incident_cost(graph: &Graph, a: usize, b: usize) -> Option<Cost> {
    match (graph.cost(a, b), graph.cost(b, a)) {
        (Some(forward), Some(backward)) => Some(forward.min(backward)),
        (forward, backward) => forward.or(backward),
    }
}

impl ReducedCostTable {
    pub fn from_graph(graph: &Graph) -> ReducedCostTable {
        let size = graph.size();
        let pairs: Vec<VerticesPair> = (0 .. size)
            .map(|vertex| {
                let mut first: Option<Incident> = None;
                let mut second: Option<Incident> = None;
                for other in (0 .. size).filter(|&other| other != vertex) {
                    let cost = match incident_cost(graph, vertex, other) {
                        Some(cost) => cost,
                        None => continue,
                    };
                    let incident = Incident { vertex: other, cost, };
                    if first.map_or(true, |best| cost < best.cost) {
                        second = first;
                        first = Some(incident);
                    } else if second.map_or(true, |next| cost < next.cost) {
                        second = Some(incident);
                    }
                }
                VerticesPair::new(first, second)
            })
            .collect();

        let cost_sum = pairs.iter().map(VerticesPair::cost_sum).sum();
        ReducedCostTable { pairs: Rc::new(pairs), cost_sum, }
    }

    pub fn pair(&self, vertex: usize) -> &VerticesPair {
        &self.pairs[vertex]
    }

    /// Twice the lower bound, kept exact.
    pub fn cost_sum(&self) -> Cost {
        self.cost_sum
    }

    pub fn lower_bound(&self) -> f64 {
        self.cost_sum as f64 / 2.0
    }

    /// Table of a child state that just took the edge `from -> to`.
    ///
    /// `from_keep` is the vertex visited before `from`, whose edge `from` must keep.
    pub fn with_edge(&self, from: usize, to: usize, cost: Cost, from_keep: Option<usize>) -> ReducedCostTable {
        let mut table = self.clone();
        table.update(from, to, cost, from_keep);
        table.update(to, from, cost, Some(from));
        debug_assert_eq!(table.cost_sum, table.pairs.iter().map(VerticesPair::cost_sum).sum::<Cost>());
        table
    }

    fn update(&mut self, vertex: usize, other: usize, cost: Cost, keep: Option<usize>) {
        if self.pairs[vertex].contains(other) {
            return;
        }
        let pairs = Rc::make_mut(&mut self.pairs);
        let before = pairs[vertex].cost_sum();
        pairs[vertex].replace(other, cost, keep);
        self.cost_sum += pairs[vertex].cost_sum() - before;
    }

    pub fn is_shared_with(&self, other: &ReducedCostTable) -> bool {
        Rc::ptr_eq(&self.pairs, &other.pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::tests::sample_4;

    fn incident(vertex: usize, cost: Cost) -> Option<Incident> {
        Some(Incident { vertex, cost, })
    }

    #[test]
    fn replace_evicts_most_expensive() {
        let mut pair = VerticesPair::new(incident(1, 10), incident(2, 15));
        pair.replace(3, 12, None);
        assert_eq!(pair, VerticesPair::new(incident(1, 10), incident(3, 12)));
    }

    #[test]
    fn replace_respects_keep() {
        let mut pair = VerticesPair::new(incident(1, 10), incident(2, 15));
        pair.replace(3, 12, Some(2));
        assert_eq!(pair, VerticesPair::new(incident(3, 12), incident(2, 15)));
    }

    #[test]
    fn replace_prefers_later_slot_on_equal_costs() {
        let mut pair = VerticesPair::new(incident(1, 10), incident(2, 10));
        pair.replace(3, 30, None);
        assert_eq!(pair, VerticesPair::new(incident(1, 10), incident(3, 30)));
    }

    #[test]
    fn replace_ignores_known_vertex() {
        let mut pair = VerticesPair::new(incident(1, 10), incident(2, 15));
        pair.replace(2, 99, None);
        assert_eq!(pair.cost_sum(), 25);
    }

    #[test]
    fn replace_fills_empty_slot() {
        let mut pair = VerticesPair::new(incident(1, 10), None);
        pair.replace(2, 4, Some(1));
        assert_eq!(pair, VerticesPair::new(incident(1, 10), incident(2, 4)));
        assert_eq!(VerticesPair::default().cost_sum(), 0);
    }

    #[test]
    fn sample_closest_pairs() {
        let table = ReducedCostTable::from_graph(&sample_4());
        assert_eq!(*table.pair(0), VerticesPair::new(incident(1, 10), incident(2, 15)));
        assert_eq!(*table.pair(1), VerticesPair::new(incident(0, 10), incident(3, 25)));
        assert_eq!(*table.pair(2), VerticesPair::new(incident(0, 15), incident(3, 30)));
        assert_eq!(*table.pair(3), VerticesPair::new(incident(0, 20), incident(1, 25)));
        assert_eq!(table.cost_sum(), 150);
        assert!((table.lower_bound() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn missing_edges_are_ignored() {
        let graph = Graph::from_rows(vec![
            vec![0, 0, 3],
            vec![0, 0, 0],
            vec![0, 8, 0],
        ]).unwrap();
        let table = ReducedCostTable::from_graph(&graph);
        assert_eq!(*table.pair(0), VerticesPair::new(incident(2, 3), None));
        assert_eq!(*table.pair(1), VerticesPair::new(incident(2, 8), None));
        assert_eq!(*table.pair(2), VerticesPair::new(incident(0, 3), incident(1, 8)));
    }

    #[test]
    fn incident_cost_takes_cheaper_direction() {
        let graph = Graph::from_rows(vec![
            vec![0, 9, 4],
            vec![2, 0, 7],
            vec![6, 5, 0],
        ]).unwrap();
        let table = ReducedCostTable::from_graph(&graph);
        assert_eq!(*table.pair(0), VerticesPair::new(incident(1, 2), incident(2, 4)));
        assert_eq!(*table.pair(1), VerticesPair::new(incident(0, 2), incident(2, 5)));
    }

    #[test]
    fn child_table_tracks_used_edges() {
        let root = ReducedCostTable::from_graph(&sample_4());
        // 3 is not among the closest vertices of 0, so 0 evicts its edge to 2
        let child = root.with_edge(0, 3, 20, None);
        assert_eq!(*child.pair(0), VerticesPair::new(incident(1, 10), incident(3, 20)));
        assert_eq!(*child.pair(3), *root.pair(3));
        assert_eq!(child.cost_sum(), 155);
        assert_eq!(child.cost_sum(), (0 .. 4).map(|vertex| child.pair(vertex).cost_sum()).sum::<Cost>());

        // the parent table is untouched
        assert_eq!(root.cost_sum(), 150);
        assert_eq!(*root.pair(0), VerticesPair::new(incident(1, 10), incident(2, 15)));
    }

    #[test]
    fn child_table_keeps_incoming_edge() {
        let root = ReducedCostTable::from_graph(&sample_4());
        let first = root.with_edge(0, 3, 20, None);
        // 3 was entered from 0, going on to 2 evicts 3's edge to 1
        let second = first.with_edge(3, 2, 30, Some(0));
        assert_eq!(*second.pair(3), VerticesPair::new(incident(0, 20), incident(2, 30)));
        assert_eq!(second.cost_sum(), 160);
    }

    #[test]
    fn unchanged_child_shares_table() {
        let root = ReducedCostTable::from_graph(&sample_4());
        let child = root.with_edge(0, 1, 10, None);
        assert!(child.is_shared_with(&root));
        assert_eq!(child.cost_sum(), root.cost_sum());

        let changed = root.with_edge(1, 2, 35, Some(0));
        assert!(!changed.is_shared_with(&root));
    }
}
