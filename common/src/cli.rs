use std::{
    path::PathBuf,
};

use structopt::{
    clap::{
        AppSettings,
    },
    StructOpt,
};

use crate::solver;

#[derive(Clone, StructOpt, Debug)]
#[structopt(setting = AppSettings::DeriveDisplayOrder)]
pub struct CommonCliArgs {
    /// file with cost matrix, one row per line
    #[structopt(long = "graph-file")]
    pub graph_file: PathBuf,

    #[structopt(flatten)]
    pub limits: LimitsArgs,
}

#[derive(Clone, StructOpt, Debug)]
pub struct LimitsArgs {
    /// brute force refuses to enumerate more permutations than this
    #[structopt(long = "max-permutations", default_value = "479001600")]
    pub max_permutations: u64,
    /// branch and bound refuses to create more states than this
    #[structopt(long = "max-queue-states", default_value = "16000000")]
    pub max_queue_states: usize,
    /// dynamic programming refuses to allocate more memo entries than this
    #[structopt(long = "max-memo-entries", default_value = "67108864")]
    pub max_memo_entries: usize,
}

impl LimitsArgs {
    pub fn to_limits(&self) -> solver::Limits {
        solver::Limits::default()
            .with_max_permutations(self.max_permutations)
            .with_max_queue_states(self.max_queue_states)
            .with_max_memo_entries(self.max_memo_entries)
    }
}
