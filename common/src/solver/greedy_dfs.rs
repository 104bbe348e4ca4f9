use bit_vec::BitVec;

use crate::{
    graph::{
        Cost,
        ROOT,
    },
    path::PathArena,
    solver::{
        self,
        Solution,
        SolveError,
    },
};

/// Nearest neighbour walk: always go to the cheapest unvisited vertex, lowest id on ties.
pub struct GreedyDfsSolver<'a> {
    solver: solver::Solver<'a>,
}

impl<'a> GreedyDfsSolver<'a> {
    pub fn new(solver: solver::Solver<'a>) -> GreedyDfsSolver<'a> {
        GreedyDfsSolver {
            solver,
        }
    }

    pub fn solve(&self) -> Result<Solution, SolveError> {
        if let Some(solution) = self.solver.trivial_solution() {
            return Ok(solution);
        }

        let graph = self.solver.graph;
        let mut visited = BitVec::from_elem(graph.size(), false);
        visited.set(ROOT, true);
        let mut arena = PathArena::new();
        let mut current = arena.root();

        for _ in 1 .. graph.size() {
            let vertex = arena.vertex(current);
            let mut nearest: Option<(usize, Cost)> = None;
            for next in 0 .. graph.size() {
                if visited[next] {
                    continue;
                }
                if let Some(cost) = graph.cost(vertex, next) {
                    if nearest.map_or(true, |(_, best)| cost < best) {
                        nearest = Some((next, cost));
                    }
                }
            }

            let (next, cost) = match nearest {
                Some(found) =>
                    found,
                None => {
                    log::debug!("greedy walk stuck at vertex {} after {} vertices", vertex, arena.len());
                    return Err(SolveError::NoTourFound);
                },
            };
            visited.set(next, true);
            current = arena.extend(current, next, cost);
        }

        let last = arena.node(current);
        let back = graph.cost(last.vertex, ROOT)
            .ok_or(SolveError::NoTourFound)?;
        Ok(Solution {
            cost: last.cost_to_reach + back,
            tour: arena.tour(current),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::Graph,
        solver::{
            Limits,
            Solver,
            tests::sample_4,
        },
    };

    fn solve(graph: &Graph) -> Result<Solution, SolveError> {
        GreedyDfsSolver::new(Solver::new(graph, Limits::default()).unwrap()).solve()
    }

    #[test]
    fn sample_walk() {
        assert_eq!(solve(&sample_4()).unwrap(), Solution { cost: 80, tour: vec![0, 1, 3, 2, 0], });
    }

    #[test]
    fn lowest_vertex_wins_ties() {
        let graph = Graph::from_rows(vec![
            vec![0, 5, 5, 5],
            vec![5, 0, 5, 5],
            vec![5, 5, 0, 5],
            vec![5, 5, 5, 0],
        ]).unwrap();
        assert_eq!(solve(&graph).unwrap(), Solution { cost: 20, tour: vec![0, 1, 2, 3, 0], });
    }

    #[test]
    fn greedy_can_miss_optimum() {
        // cheap first step leads into an expensive return
        let graph = Graph::from_rows(vec![
            vec![0, 1, 2],
            vec![1, 0, 1],
            vec![100, 1, 0],
        ]).unwrap();
        assert_eq!(solve(&graph).unwrap(), Solution { cost: 102, tour: vec![0, 1, 2, 0], });
    }

    #[test]
    fn missing_return_edge() {
        let graph = Graph::from_rows(vec![
            vec![0, 1, 3],
            vec![1, 0, 1],
            vec![0, 1, 0],
        ]).unwrap();
        assert!(matches!(solve(&graph), Err(SolveError::NoTourFound)));
    }
}
