use std::{
    collections::TryReserveError,
    fmt,
    str::FromStr,
};

use serde_derive::{
    Serialize,
    Deserialize,
};

use crate::graph::{
    Cost,
    Graph,
    ROOT,
};

pub mod backtracking;
pub mod branch_and_bound;
pub mod closest_pairs;
pub mod dynamic_programming;
pub mod exhaustive;
pub mod greedy_dfs;

/// Read-only context shared by every solving strategy.
#[derive(Clone, Copy, Debug)]
pub struct Solver<'a> {
    pub graph: &'a Graph,
    pub limits: Limits,
}

/// Resource caps beyond which a solver refuses to run instead of exhausting the machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Limits {
    /// Maximum `(n - 1)!` the exhaustive solver agrees to enumerate.
    pub max_permutations: u64,
    /// Maximum branch and bound states created in one search. Popped states
    /// keep their path node, so this caps queued states and path nodes together.
    pub max_queue_states: usize,
    /// Maximum `n * 2^n` cells of the dynamic programming table.
    pub max_memo_entries: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_permutations: 479_001_600,
            max_queue_states: 16_000_000,
            max_memo_entries: 1 << 26,
        }
    }
}

impl Limits {
    pub fn with_max_permutations(mut self, value: u64) -> Limits {
        self.max_permutations = value;
        self
    }

    pub fn with_max_queue_states(mut self, value: usize) -> Limits {
        self.max_queue_states = value;
        self
    }

    pub fn with_max_memo_entries(mut self, value: usize) -> Limits {
        self.max_memo_entries = value;
        self
    }
}

#[derive(Debug, PartialEq)]
pub enum CreateError {
    ZeroLimit(Resource),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resource {
    Permutations,
    QueueStates,
    MemoEntries,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Permutations => write!(f, "permutations"),
            Resource::QueueStates => write!(f, "branch states"),
            Resource::MemoEntries => write!(f, "memo table entries"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("no solution found: the graph has no tour visiting every vertex")]
    NoTourFound,
    #[error("search space too large: needs more than {limit} {resource}")]
    SearchSpaceTooLarge { resource: Resource, limit: u64, },
    #[error("search space exceeded available memory ({0})")]
    OutOfMemory(#[from] TryReserveError),
}

/// A closed tour `[0, .., 0]` and its total cost.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Solution {
    pub cost: Cost,
    pub tour: Vec<usize>,
}

/// What [`Algorithm::run`] reports: the tour plus the root lower bound for strategies that compute one.
#[derive(Clone, PartialEq, Debug)]
pub struct Outcome {
    pub solution: Solution,
    pub lower_bound: Option<f64>,
}

impl<'a> Solver<'a> {
    pub fn new(graph: &'a Graph, limits: Limits) -> Result<Solver<'a>, CreateError> {
        if limits.max_permutations == 0 {
            return Err(CreateError::ZeroLimit(Resource::Permutations));
        }
        if limits.max_queue_states == 0 {
            return Err(CreateError::ZeroLimit(Resource::QueueStates));
        }
        if limits.max_memo_entries == 0 {
            return Err(CreateError::ZeroLimit(Resource::MemoEntries));
        }

        Ok(Solver { graph, limits, })
    }

    pub fn size(&self) -> usize {
        self.graph.size()
    }

    /// A single vertex graph is toured without taking any edge.
    pub fn trivial_solution(&self) -> Option<Solution> {
        if self.graph.size() == 1 {
            Some(Solution { cost: 0, tour: vec![ROOT, ROOT], })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Algorithm {
    GreedyDfs,
    BranchAndBound,
    BruteForce,
    Backtracking,
    DynamicProgramming,
}

#[derive(Debug, PartialEq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown algorithm '{}', expected one of: ", self.0)?;
        let names: Vec<&str> = Algorithm::ALL.iter().map(|algorithm| algorithm.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::GreedyDfs,
        Algorithm::BranchAndBound,
        Algorithm::BruteForce,
        Algorithm::Backtracking,
        Algorithm::DynamicProgramming,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::GreedyDfs => "greedy-dfs",
            Algorithm::BranchAndBound => "branch-and-bound",
            Algorithm::BruteForce => "brute-force",
            Algorithm::Backtracking => "backtracking",
            Algorithm::DynamicProgramming => "dynamic-programming",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Algorithm::GreedyDfs => "Approximation algorithm (Using DFS)",
            Algorithm::BranchAndBound => "Branch and bound algorithm",
            Algorithm::BruteForce => "Brute force",
            Algorithm::Backtracking => "Backtracking",
            Algorithm::DynamicProgramming => "Dynamic programming",
        }
    }

    pub fn is_exact(&self) -> bool {
        !matches!(self, Algorithm::GreedyDfs)
    }

    pub fn run(&self, solver: Solver<'_>) -> Result<Outcome, SolveError> {
        log::debug!("running {} on {} vertices", self.name(), solver.size());
        match self {
            Algorithm::GreedyDfs =>
                greedy_dfs::GreedyDfsSolver::new(solver)
                .solve()
                .map(Outcome::without_bound),
            Algorithm::BranchAndBound => {
                let result = branch_and_bound::BranchAndBoundSolver::new(solver).solve()?;
                Ok(Outcome {
                    solution: result.solution,
                    lower_bound: Some(result.root_lower_bound),
                })
            },
            Algorithm::BruteForce =>
                exhaustive::ExhaustiveSolver::new(solver)
                .solve()
                .map(Outcome::without_bound),
            Algorithm::Backtracking =>
                backtracking::BacktrackingSolver::new(solver)
                .solve()
                .map(Outcome::without_bound),
            Algorithm::DynamicProgramming =>
                dynamic_programming::DynamicProgrammingSolver::new(solver)
                .solve()
                .map(Outcome::without_bound),
        }
    }
}

impl Outcome {
    fn without_bound(solution: Solution) -> Outcome {
        Outcome { solution, lower_bound: None, }
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Algorithm, UnknownAlgorithm> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
