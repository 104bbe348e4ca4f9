use std::{
    cmp::Ordering,
    collections::BinaryHeap,
};

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
        closest_pairs::ReducedCostTable,
        Resource,
        Solution,
        SolveError,
    },
};

struct BranchState {
    vertex: usize,
    visited: BitVec,
    visited_count: usize,
    accumulated_cost: Cost,
    table: ReducedCostTable,
    path: PathId,
}

impl BranchState {
    fn lower_bound(&self) -> f64 {
        self.table.lower_bound()
    }
}

struct QueueEntry {
    key: Cost,
    seq: u64,
    state: BranchState,
}

// reversed: `BinaryHeap` pops the smallest bound first, older entries first on ties
impl Ord for QueueEntry {
    fn cmp(&self, other: &QueueEntry) -> Ordering {
        other.key.cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &QueueEntry) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &QueueEntry) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for QueueEntry { }

#[derive(Clone, PartialEq, Debug)]
pub struct BranchAndBoundSolution {
    pub solution: Solution,
    pub root_lower_bound: f64,
    pub explored_states: u64,
}

/// Best first search over partial tours ordered by the closest pairs lower bound.
pub struct BranchAndBoundSolver<'a> {
    solver: solver::Solver<'a>,
    arena: PathArena,
    queue: BinaryHeap<QueueEntry>,
    seq: u64,
    best_cost: Cost,
    best_path: Option<PathId>,
    explored: u64,
}

impl<'a> BranchAndBoundSolver<'a> {
    pub fn new(solver: solver::Solver<'a>) -> BranchAndBoundSolver<'a> {
        BranchAndBoundSolver {
            solver,
            arena: PathArena::new(),
            queue: BinaryHeap::new(),
            seq: 0,
            best_cost: Cost::MAX,
            best_path: None,
            explored: 0,
        }
    }

    pub fn solve(&mut self) -> Result<BranchAndBoundSolution, SolveError> {
        let graph = self.solver.graph;
        let root_table = ReducedCostTable::from_graph(graph);
        let root_lower_bound = root_table.lower_bound();
        log::debug!("root lower bound: {}", root_lower_bound);

        if let Some(solution) = self.solver.trivial_solution() {
            return Ok(BranchAndBoundSolution { solution, root_lower_bound, explored_states: 0, });
        }

        self.arena.clear();
        self.queue.clear();
        self.seq = 0;
        self.best_cost = Cost::MAX;
        self.best_path = None;
        self.explored = 0;

        let mut visited = BitVec::from_elem(graph.size(), false);
        visited.set(ROOT, true);
        let path = self.arena.root();
        self.push(BranchState {
            vertex: ROOT,
            visited,
            visited_count: 1,
            accumulated_cost: 0,
            table: root_table,
            path,
        })?;

        while let Some(QueueEntry { state, .. }) = self.queue.pop() {
            self.explored += 1;
            if self.best_path.is_some() && state.lower_bound() >= self.best_cost as f64 {
                break;
            }

            if state.visited_count == graph.size() {
                if let Some(back) = graph.cost(state.vertex, ROOT) {
                    let total = state.accumulated_cost + back;
                    if total < self.best_cost {
                        log::debug!("improved tour cost: {} -> {} after {} states", self.best_cost, total, self.explored);
                        self.best_cost = total;
                        self.best_path = Some(state.path);
                    }
                }
                continue;
            }

            self.branch(&state)?;
        }

        log::debug!("explored {} branch states, {} still queued", self.explored, self.queue.len());
        let last = self.best_path.ok_or(SolveError::NoTourFound)?;
        Ok(BranchAndBoundSolution {
            solution: Solution {
                cost: self.best_cost,
                tour: self.arena.tour(last),
            },
            root_lower_bound,
            explored_states: self.explored,
        })
    }

    fn branch(&mut self, state: &BranchState) -> Result<(), SolveError> {
        let graph = self.solver.graph;
        let keep = self.arena.prev_vertex(state.path);
        for next in 0 .. graph.size() {
            if state.visited[next] {
                continue;
            }
            let edge_cost = match graph.cost(state.vertex, next) {
                Some(cost) => cost,
                None => continue,
            };
            let accumulated_cost = state.accumulated_cost + edge_cost;
            if accumulated_cost >= self.best_cost {
                continue;
            }

            let mut visited = state.visited.clone();
            visited.set(next, true);
            let table = state.table.with_edge(state.vertex, next, edge_cost, keep);
            let path = self.arena.extend(state.path, next, edge_cost);
            self.push(BranchState {
                vertex: next,
                visited,
                visited_count: state.visited_count + 1,
                accumulated_cost,
                table,
                path,
            })?;
        }
        Ok(())
    }

    fn push(&mut self, state: BranchState) -> Result<(), SolveError> {
        // path nodes of popped states stay alive, so every state ever created counts
        let limit = self.solver.limits.max_queue_states;
        if self.arena.len() > limit {
            return Err(SolveError::SearchSpaceTooLarge {
                resource: Resource::QueueStates,
                limit: limit as u64,
            });
        }
        self.queue.try_reserve(1)?;

        let entry = QueueEntry { key: state.table.cost_sum(), seq: self.seq, state, };
        self.seq += 1;
        self.queue.push(entry);
        Ok(())
    }
}
