use std::{
    fs,
    io,
    path::Path,
    time::Duration,
};

use serde_derive::{
    Serialize,
    Deserialize,
};

use common::{
    graph::Cost,
    solver::{
        Algorithm,
        Outcome,
        SolveError,
    },
};

/// One algorithm run as written to the report file.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Record {
    pub algorithm: String,
    pub cost: Option<Cost>,
    pub tour: Option<Vec<usize>>,
    pub lower_bound: Option<f64>,
    pub elapsed_ms: f64,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum WriteFileError {
    CreateFile(io::Error),
    Serialize(serde_json::Error),
}

impl Record {
    pub fn new(algorithm: Algorithm, result: &Result<Outcome, SolveError>, elapsed: Duration) -> Record {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        match result {
            Ok(outcome) =>
                Record {
                    algorithm: algorithm.name().to_string(),
                    cost: Some(outcome.solution.cost),
                    tour: Some(outcome.solution.tour.clone()),
                    lower_bound: outcome.lower_bound,
                    elapsed_ms,
                    error: None,
                },
            Err(error) =>
                Record {
                    algorithm: algorithm.name().to_string(),
                    cost: None,
                    tour: None,
                    lower_bound: None,
                    elapsed_ms,
                    error: Some(error.to_string()),
                },
        }
    }
}

pub fn write_to_file<P>(records: &[Record], filename: P) -> Result<(), WriteFileError> where P: AsRef<Path> {
    let file = fs::File::create(filename)
        .map_err(WriteFileError::CreateFile)?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)
        .map_err(WriteFileError::Serialize)
}

/// `0-> 1-> 3-> 2-> 0`
pub fn format_tour(tour: &[usize]) -> String {
    let vertices: Vec<String> = tour.iter().map(|vertex| vertex.to_string()).collect();
    vertices.join("-> ")
}

/// Console block printed for every algorithm run.
pub fn format_run(algorithm: Algorithm, result: &Result<Outcome, SolveError>, elapsed: Duration) -> String {
    match result {
        Ok(outcome) => {
            let mut text = format!(
                "{}: \nPath cost: {}\nPath Taken: {}\n",
                algorithm.title(),
                outcome.solution.cost,
                format_tour(&outcome.solution.tour),
            );
            if let Some(lower_bound) = outcome.lower_bound {
                text.push_str(&format!("Root lower bound: {}\n", lower_bound));
            }
            text.push_str(&format!("Time taken: {} seconds\n", elapsed.as_secs_f64()));
            text
        },
        Err(error) =>
            format!("{}: \nError: {}\n", algorithm.title(), error),
    }
}

#[cfg(test)]
mod tests {
    use common::solver::Solution;

    use super::*;

    fn outcome() -> Outcome {
        Outcome {
            solution: Solution { cost: 80, tour: vec![0, 1, 3, 2, 0], },
            lower_bound: Some(75.0),
        }
    }

    #[test]
    fn tour_formatting() {
        assert_eq!(format_tour(&[0, 1, 3, 2, 0]), "0-> 1-> 3-> 2-> 0");
        assert_eq!(format_tour(&[0, 0]), "0-> 0");
    }

    #[test]
    fn console_block() {
        let text = format_run(Algorithm::BranchAndBound, &Ok(outcome()), Duration::from_millis(1500));
        assert_eq!(
            text,
            "Branch and bound algorithm: \nPath cost: 80\nPath Taken: 0-> 1-> 3-> 2-> 0\nRoot lower bound: 75\nTime taken: 1.5 seconds\n",
        );

        let text = format_run(Algorithm::BruteForce, &Err(SolveError::NoTourFound), Duration::from_millis(1));
        assert!(text.starts_with("Brute force: \nError: no solution found"));
    }

    #[test]
    fn records_of_success_and_failure() {
        let record = Record::new(Algorithm::BranchAndBound, &Ok(outcome()), Duration::from_millis(2));
        assert_eq!(record.algorithm, "branch-and-bound");
        assert_eq!(record.cost, Some(80));
        assert_eq!(record.lower_bound, Some(75.0));
        assert_eq!(record.error, None);

        let record = Record::new(Algorithm::BruteForce, &Err(SolveError::NoTourFound), Duration::from_millis(2));
        assert_eq!(record.cost, None);
        assert_eq!(record.tour, None);
        assert!(record.error.is_some());

        let json = serde_json::to_string(&record).unwrap();
        let restored: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }
}
