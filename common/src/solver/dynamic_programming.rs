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

/// Best cost of a path starting at the root, visiting exactly the vertices of
/// `mask` and ending at `vertex`. Cells nobody reached hold `Cost::MAX`.
pub struct MemoTable {
    size: usize,
    entries: Vec<Cost>,
}

impl MemoTable {
    pub fn allocate(size: usize, max_entries: usize) -> Result<MemoTable, SolveError> {
        let too_large = || SolveError::SearchSpaceTooLarge {
            resource: Resource::MemoEntries,
            limit: max_entries as u64,
        };
        let len = 1_usize.checked_shl(size as u32)
            .filter(|&masks| masks.trailing_zeros() as usize == size)
            .and_then(|masks| masks.checked_mul(size))
            .ok_or_else(too_large)?;
        if len > max_entries {
            return Err(too_large());
        }

        let mut entries = Vec::new();
        entries.try_reserve_exact(len)?;
        entries.resize(len, Cost::MAX);
        Ok(MemoTable { size, entries, })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, vertex: usize, mask: usize) -> Option<Cost> {
        let cost = self.entries[mask * self.size + vertex];
        if cost == Cost::MAX { None } else { Some(cost) }
    }

    pub fn set(&mut self, vertex: usize, mask: usize, cost: Cost) {
        self.entries[mask * self.size + vertex] = cost;
    }

    /// Reached cells as `(vertex, mask, cost)`.
    pub fn populated(&self) -> impl Iterator<Item = (usize, usize, Cost)> + '_ {
        let size = self.size;
        self.entries
            .iter()
            .enumerate()
            .filter(|&(_, &cost)| cost != Cost::MAX)
            .map(move |(index, &cost)| (index % size, index / size, cost))
    }
}

/// Masks of `size` bits with exactly `ones` of them set, in increasing order.
pub struct FixedSizeSubsets {
    next: Option<usize>,
    limit: Option<usize>,
}

impl FixedSizeSubsets {
    pub fn new(ones: usize, size: usize) -> FixedSizeSubsets {
        let limit = 1_usize.checked_shl(size as u32)
            .filter(|&limit| limit.trailing_zeros() as usize == size);
        let next = if ones > size {
            None
        } else if ones == 0 {
            Some(0)
        } else {
            1_usize.checked_shl(ones as u32)
                .filter(|&first| first.trailing_zeros() as usize == ones)
                .map(|first| first - 1)
        };
        FixedSizeSubsets { next, limit, }
    }
}

impl Iterator for FixedSizeSubsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = if current == 0 {
            None
        } else {
            // Gosper's hack
            let lowest = current & current.wrapping_neg();
            current.checked_add(lowest)
                .map(|ripple| (((ripple ^ current) >> 2) / lowest) | ripple)
                .filter(|&next| self.limit.map_or(true, |limit| next < limit))
        };
        Some(current)
    }
}

fn contains(mask: usize, vertex: usize) -> bool {
    mask & (1 << vertex) != 0
}

/// Held-Karp over vertex subsets.
pub struct DynamicProgrammingSolver<'a> {
    solver: solver::Solver<'a>,
}

impl<'a> DynamicProgrammingSolver<'a> {
    pub fn new(solver: solver::Solver<'a>) -> DynamicProgrammingSolver<'a> {
        DynamicProgrammingSolver {
            solver,
        }
    }

    pub fn build_table(&self) -> Result<MemoTable, SolveError> {
        let graph = self.solver.graph;
        let size = graph.size();
        let mut memo = MemoTable::allocate(size, self.solver.limits.max_memo_entries)?;
        log::debug!("allocated memo table of {} entries", memo.len());

        for vertex in (0 .. size).filter(|&vertex| vertex != ROOT) {
            if let Some(cost) = graph.cost(ROOT, vertex) {
                memo.set(vertex, (1 << ROOT) | (1 << vertex), cost);
            }
        }

        for ones in 3 ..= size {
            for mask in FixedSizeSubsets::new(ones, size) {
                if !contains(mask, ROOT) {
                    continue;
                }
                for next in (0 .. size).filter(|&next| next != ROOT && contains(mask, next)) {
                    let without_next = mask ^ (1 << next);
                    let best = (0 .. size)
                        .filter(|&end| end != ROOT && end != next && contains(mask, end))
                        .filter_map(|end| Some(memo.get(end, without_next)? + graph.cost(end, next)?))
                        .min();
                    if let Some(cost) = best {
                        memo.set(next, mask, cost);
                    }
                }
            }
        }

        Ok(memo)
    }

    pub fn solve(&self) -> Result<Solution, SolveError> {
        if let Some(solution) = self.solver.trivial_solution() {
            return Ok(solution);
        }

        let graph = self.solver.graph;
        let size = graph.size();
        let memo = self.build_table()?;
        let full = (1 << size) - 1;

        let cost = (0 .. size)
            .filter(|&last| last != ROOT)
            .filter_map(|last| Some(memo.get(last, full)? + graph.cost(last, ROOT)?))
            .min()
            .ok_or(SolveError::NoTourFound)?;

        let mut tour = Vec::with_capacity(size + 1);
        tour.push(ROOT);
        let mut state = full;
        let mut last = ROOT;
        for _ in 1 .. size {
            let mut chosen: Option<(usize, Cost)> = None;
            for candidate in (0 .. size).filter(|&candidate| candidate != ROOT && contains(state, candidate)) {
                let through = match (memo.get(candidate, state), graph.cost(candidate, last)) {
                    (Some(reach), Some(edge)) =>
                        reach + edge,
                    _ =>
                        continue,
                };
                if chosen.map_or(true, |(_, best)| through < best) {
                    chosen = Some((candidate, through));
                }
            }
            let (vertex, _) = chosen.ok_or(SolveError::NoTourFound)?;
            tour.push(vertex);
            state ^= 1 << vertex;
            last = vertex;
        }
        tour.push(ROOT);
        tour.reverse();

        Ok(Solution { cost, tour, })
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
            tests::{
                assert_valid_tour,
                sample_4,
            },
        },
    };

    #[test]
    fn subsets_in_increasing_order() {
        let masks: Vec<usize> = FixedSizeSubsets::new(2, 4).collect();
        assert_eq!(masks, vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]);
    }

    #[test]
    fn subset_counts() {
        assert_eq!(FixedSizeSubsets::new(0, 4).collect::<Vec<_>>(), vec![0]);
        assert_eq!(FixedSizeSubsets::new(4, 4).collect::<Vec<_>>(), vec![0b1111]);
        assert_eq!(FixedSizeSubsets::new(5, 4).count(), 0);
        assert_eq!(FixedSizeSubsets::new(3, 10).count(), 120);
        assert_eq!(FixedSizeSubsets::new(5, 10).count(), 252);
    }

    #[test]
    fn sample_optimum() {
        let graph = sample_4();
        let solution = DynamicProgrammingSolver::new(Solver::new(&graph, Limits::default()).unwrap())
            .solve()
            .unwrap();
        assert_eq!(solution, Solution { cost: 80, tour: vec![0, 2, 3, 1, 0], });
        assert_valid_tour(&graph, &solution);
    }

    #[test]
    fn table_only_holds_rooted_paths() {
        let graph = Graph::from_rows(vec![vec![3; 5]; 5]).unwrap();
        let memo = DynamicProgrammingSolver::new(Solver::new(&graph, Limits::default()).unwrap())
            .build_table()
            .unwrap();
        assert_eq!(memo.len(), 160);

        let mut populated = 0;
        for (vertex, mask, cost) in memo.populated() {
            assert_ne!(vertex, ROOT);
            assert!(contains(mask, ROOT));
            assert!(contains(mask, vertex));
            assert_eq!(cost, 3 * (mask.count_ones() as Cost - 1));
            populated += 1;
        }
        // every (mask containing root, non-root vertex in mask) with at least 2 vertices
        assert_eq!(populated, 4 * 8);
    }

    #[test]
    fn refuses_too_large_table() {
        let graph = sample_4();
        let result = DynamicProgrammingSolver::new(Solver::new(&graph, Limits::default().with_max_memo_entries(63)).unwrap())
            .solve();
        assert!(matches!(
            result,
            Err(SolveError::SearchSpaceTooLarge { resource: Resource::MemoEntries, limit: 63, }),
        ));

        let result = DynamicProgrammingSolver::new(Solver::new(&graph, Limits::default().with_max_memo_entries(64)).unwrap())
            .solve();
        assert_eq!(result.map(|solution| solution.cost).ok(), Some(80));
    }

    #[test]
    fn table_size_overflow_is_reported() {
        assert!(matches!(
            MemoTable::allocate(70, usize::MAX),
            Err(SolveError::SearchSpaceTooLarge { resource: Resource::MemoEntries, .. }),
        ));
    }
}
