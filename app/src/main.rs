use std::{
    path::PathBuf,
    time::{
        Duration,
        Instant,
    },
};

use structopt::{
    clap::{
        AppSettings,
    },
    StructOpt,
};

use rayon::prelude::*;

use common::{
    cli,
    graph,
    solver,
};

mod report;

#[derive(Clone, StructOpt, Debug)]
#[structopt(setting = AppSettings::DeriveDisplayOrder)]
pub struct CliArgs {
    #[structopt(flatten)]
    pub common: cli::CommonCliArgs,

    /// comma separated algorithms to run (default: all of them)
    #[structopt(long = "algorithms", use_delimiter = true)]
    pub algorithms: Vec<solver::Algorithm>,
    /// write a json report of every run into this file
    #[structopt(long = "report-file")]
    pub report_file: Option<PathBuf>,
    /// run the selected algorithms concurrently, one per thread
    #[structopt(long = "parallel")]
    pub parallel: bool,
}

#[derive(Debug)]
pub enum Error {
    GraphLoad(graph::FromFileError),
    SolverCreate(solver::CreateError),
    ReportExport(report::WriteFileError),
}

struct Run {
    algorithm: solver::Algorithm,
    result: Result<solver::Outcome, solver::SolveError>,
    elapsed: Duration,
}

fn main() -> Result<(), Error> {
    pretty_env_logger::init();
    let cli_args = CliArgs::from_args();
    log::info!("program starts as: {:?}", cli_args);

    let graph = graph::Graph::from_file(&cli_args.common.graph_file)
        .map_err(Error::GraphLoad)?;
    log::debug!(" ;; graph loaded: {} vertices", graph.size());

    let solver = solver::Solver::new(&graph, cli_args.common.limits.to_limits())
        .map_err(Error::SolverCreate)?;

    let algorithms: Vec<solver::Algorithm> = if cli_args.algorithms.is_empty() {
        solver::Algorithm::ALL.to_vec()
    } else {
        cli_args.algorithms.clone()
    };

    let runs: Vec<Run> = if cli_args.parallel {
        algorithms
            .par_iter()
            .map(|&algorithm| run(algorithm, solver))
            .collect()
    } else {
        algorithms
            .iter()
            .map(|&algorithm| run(algorithm, solver))
            .collect()
    };

    for run in &runs {
        println!("{}", report::format_run(run.algorithm, &run.result, run.elapsed));
    }

    if let Some(report_file) = &cli_args.report_file {
        let records: Vec<report::Record> = runs
            .iter()
            .map(|run| report::Record::new(run.algorithm, &run.result, run.elapsed))
            .collect();
        report::write_to_file(&records, report_file)
            .map_err(Error::ReportExport)?;
        log::info!("report with {} runs has been written to {:?}", records.len(), report_file);
    }

    Ok(())
}

fn run(algorithm: solver::Algorithm, solver: solver::Solver<'_>) -> Run {
    log::info!("running {}", algorithm);
    let start = Instant::now();
    let result = algorithm.run(solver);
    let elapsed = start.elapsed();

    match &result {
        Ok(outcome) =>
            match solver.graph.tour_cost(&outcome.solution.tour) {
                Ok(cost) if cost == outcome.solution.cost =>
                    log::info!("{} done in {:?}: cost {}", algorithm, elapsed, cost),
                Ok(cost) =>
                    log::warn!("{} reported cost {} but its tour costs {}", algorithm, outcome.solution.cost, cost),
                Err(error) =>
                    log::warn!("{} produced an invalid tour {:?}: {:?}", algorithm, outcome.solution.tour, error),
            },
        Err(error) =>
            log::info!("{} failed in {:?}: {}", algorithm, elapsed, error),
    }

    Run { algorithm, result, elapsed, }
}
