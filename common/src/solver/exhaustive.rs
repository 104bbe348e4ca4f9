use std::iter;

use crate::{
    graph::{
        Cost,
        ROOT,
    },
    solver::{
        self,
        Resource,
        Solution,
        SolveError,
    },
};

/// Tries every ordering of the non-root vertices, no pruning at all.
pub struct ExhaustiveSolver<'a> {
    solver: solver::Solver<'a>,
}

impl<'a> ExhaustiveSolver<'a> {
    pub fn new(solver: solver::Solver<'a>) -> ExhaustiveSolver<'a> {
        ExhaustiveSolver {
            solver,
        }
    }

    /// `(n - 1)!`, `None` if it does not fit in `u64`.
    pub fn permutations_count(&self) -> Option<u64> {
        (1 .. self.solver.size() as u64)
            .try_fold(1_u64, |count, factor| count.checked_mul(factor))
    }

    pub fn solve(&self) -> Result<Solution, SolveError> {
        if let Some(solution) = self.solver.trivial_solution() {
            return Ok(solution);
        }

        let limit = self.solver.limits.max_permutations;
        let count = match self.permutations_count() {
            Some(count) if count <= limit =>
                count,
            _ =>
                return Err(SolveError::SearchSpaceTooLarge { resource: Resource::Permutations, limit, }),
        };
        log::debug!("enumerating {} permutations", count);

        let mut order: Vec<usize> = (1 .. self.solver.size()).collect();
        let mut best: Option<(Cost, Vec<usize>)> = None;
        loop {
            if let Some(cost) = self.order_cost(&order) {
                if best.as_ref().map_or(true, |&(best_cost, _)| cost < best_cost) {
                    log::debug!("Found tour with cost {}: {:?}", cost, order);
                    best = Some((cost, order.clone()));
                }
            }
            if !next_permutation(&mut order) {
                break;
            }
        }

        let (cost, order) = best.ok_or(SolveError::NoTourFound)?;
        let tour = iter::once(ROOT)
            .chain(order)
            .chain(iter::once(ROOT))
            .collect();
        Ok(Solution { cost, tour, })
    }

    /// Cost of `0 -> order.. -> 0`, `None` if some edge is missing.
    fn order_cost(&self, order: &[usize]) -> Option<Cost> {
        let graph = self.solver.graph;
        let mut cost = 0;
        let mut from = ROOT;
        for &to in order.iter().chain(iter::once(&ROOT)) {
            cost += graph.cost(from, to)?;
            from = to;
        }
        Some(cost)
    }
}

/// Rearranges `items` into the next lexicographic permutation, `false` after the last one.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }

    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }

    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot - 1] {
        successor -= 1;
    }
    items.swap(pivot - 1, successor);
    items[pivot ..].reverse();
    true
}
