use std::{
    io,
    path::PathBuf,
};

use structopt::{
    clap::{
        AppSettings,
    },
    StructOpt,
};

use rand::{
    rngs::StdRng,
    SeedableRng,
};

use common::graph;

#[derive(Clone, StructOpt, Debug)]
#[structopt(setting = AppSettings::DeriveDisplayOrder)]
pub struct CliArgs {
    /// vertices count
    #[structopt(long = "size")]
    pub size: usize,
    /// minimum edge cost, must be positive
    #[structopt(long = "min-cost", default_value = "1")]
    pub min_cost: graph::Cost,
    /// maximum edge cost
    #[structopt(long = "max-cost", default_value = "100")]
    pub max_cost: graph::Cost,
    /// mirror every edge cost
    #[structopt(long = "symmetric")]
    pub symmetric: bool,
    /// random generator seed (default: from entropy)
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
    /// output file (default: stdout)
    #[structopt(long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Error {
    Generate(graph::GraphError),
    GraphExport(graph::WriteFileError),
    Stdout(io::Error),
}

fn main() -> Result<(), Error> {
    pretty_env_logger::init();
    let cli_args = CliArgs::from_args();
    log::info!("program starts as: {:?}", cli_args);

    let mut rng = match cli_args.seed {
        Some(seed) =>
            StdRng::seed_from_u64(seed),
        None =>
            StdRng::from_entropy(),
    };

    let graph = graph::Graph::random(&mut rng, cli_args.size, cli_args.min_cost, cli_args.max_cost, cli_args.symmetric)
        .map_err(Error::Generate)?;
    log::debug!(" ;; graph generated: {} vertices", graph.size());

    match &cli_args.output {
        Some(output) => {
            graph.write_to_file(output)
                .map_err(Error::GraphExport)?;
            log::info!("matrix has been written to {:?}", output);
        },
        None => {
            let stdout = io::stdout();
            graph.write_to(stdout.lock())
                .map_err(Error::Stdout)?;
        },
    }

    Ok(())
}
