use bit_vec::BitVec;

use crate::{
    graph::{
        Cost,
        ROOT,
    },
    path::{
        PathArena,
        PathId,
    },
    solver::{
        self,
        Solution,
        SolveError,
    },
};

/// Depth first search over partial tours, cutting every branch which
/// already costs as much as the best complete tour found so far.
pub struct BacktrackingSolver<'a> {
    solver: solver::Solver<'a>,
    visited: BitVec,
    arena: PathArena,
    best_cost: Cost,
    best_last: Option<PathId>,
}

impl<'a> BacktrackingSolver<'a> {
    pub fn new(solver: solver::Solver<'a>) -> BacktrackingSolver<'a> {
        let size = solver.size();
        BacktrackingSolver {
            solver,
            visited: BitVec::from_elem(size, false),
            arena: PathArena::new(),
            best_cost: Cost::MAX,
            best_last: None,
        }
    }

    pub fn solve(&mut self) -> Result<Solution, SolveError> {
        if let Some(solution) = self.solver.trivial_solution() {
            return Ok(solution);
        }

        self.visited.clear();
        self.visited.set(ROOT, true);
        self.arena.clear();
        self.best_cost = Cost::MAX;
        self.best_last = None;

        let root = self.arena.root();
        self.run(root, 1);

        let last = self.best_last.ok_or(SolveError::NoTourFound)?;
        Ok(Solution {
            cost: self.best_cost,
            tour: self.arena.tour(last),
        })
    }

    fn run(&mut self, current: PathId, visited_count: usize) {
        let graph = self.solver.graph;
        let vertex = self.arena.vertex(current);
        let cost_to_reach = self.arena.node(current).cost_to_reach;

        if visited_count == graph.size() {
            if let Some(back) = graph.cost(vertex, ROOT) {
                let total = cost_to_reach + back;
                if total < self.best_cost {
                    log::debug!("improved tour cost: {} -> {}", self.best_cost, total);
                    self.best_cost = total;
                    self.best_last = Some(current);
                }
            }
            return;
        }

        for next in 0 .. graph.size() {
            if self.visited[next] {
                continue;
            }
            let edge_cost = match graph.cost(vertex, next) {
                Some(cost) => cost,
                None => continue,
            };
            if cost_to_reach + edge_cost >= self.best_cost {
                continue;
            }

            self.visited.set(next, true);
            let mark = self.arena.mark();
            let child = self.arena.extend(current, next, edge_cost);
            self.run(child, visited_count + 1);
            self.arena.release(mark, self.best_last);
            self.visited.set(next, false);
        }
    }
}
