use std::{
    fs,
    io::{
        self,
        BufRead,
        Write,
    },
    num::ParseIntError,
    path::Path,
};

use bit_vec::BitVec;

use rand::Rng;

pub type Cost = i64;

/// Every tour starts and ends here.
pub const ROOT: usize = 0;

/// Largest accepted edge cost, sums over any tour stay far below `Cost::MAX`.
pub const MAX_COST: Cost = i32::MAX as Cost;

/// Dense directed cost matrix. Any entry `<= 0` stands for a missing edge.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Graph {
    size: usize,
    costs: Vec<Cost>,
}

#[derive(Debug, PartialEq)]
pub enum GraphError {
    Empty,
    NotSquare { row: usize, expected: usize, provided: usize, },
    InvalidCostRange { min_cost: Cost, max_cost: Cost, },
    CostTooLarge { row: usize, column: usize, cost: Cost, },
}

#[derive(Debug)]
pub enum ParseError {
    ReadLine { line: usize, error: io::Error, },
    InvalidCost { line: usize, token: String, error: ParseIntError, },
    Graph(GraphError),
}

#[derive(Debug)]
pub enum FromFileError {
    OpenFile(io::Error),
    Parse(ParseError),
}

#[derive(Debug)]
pub enum WriteFileError {
    CreateFile(io::Error),
    Write(io::Error),
}

#[derive(Debug, PartialEq)]
pub enum TourValidationError {
    LengthMismatch { expected: usize, provided: usize, },
    NotRooted { first: usize, last: usize, },
    VertexOutOfRange(usize),
    VertexRepeated(usize),
    MissingEdge { from: usize, to: usize, },
}

impl Graph {
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Graph, GraphError> {
        let size = rows.len();
        if size == 0 {
            return Err(GraphError::Empty);
        }

        let mut costs = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(GraphError::NotSquare {
                    row,
                    expected: size,
                    provided: values.len(),
                });
            }
            if let Some((column, &cost)) = values.iter().enumerate().find(|&(_, &cost)| cost > MAX_COST) {
                return Err(GraphError::CostTooLarge { row, column, cost, });
            }
            costs.extend(values);
        }

        Ok(Graph { size, costs, })
    }

    /// Reads one matrix row per non-blank line, values separated by whitespace.
    pub fn from_reader<R>(reader: R) -> Result<Graph, ParseError> where R: BufRead {
        let mut rows = Vec::new();
        for (index, maybe_line) in reader.lines().enumerate() {
            let line = index + 1;
            let text = maybe_line
                .map_err(|error| ParseError::ReadLine { line, error, })?;
            if text.trim().is_empty() {
                continue;
            }

            let row = text
                .split_whitespace()
                .map(|token| {
                    token.parse::<Cost>()
                        .map_err(|error| ParseError::InvalidCost { line, token: token.to_string(), error, })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Graph::from_rows(rows)
            .map_err(ParseError::Graph)
    }

    pub fn from_file<P>(filename: P) -> Result<Graph, FromFileError> where P: AsRef<Path> {
        let file = fs::File::open(filename)
            .map_err(FromFileError::OpenFile)?;
        let reader = io::BufReader::new(file);
        Graph::from_reader(reader)
            .map_err(FromFileError::Parse)
    }

    /// Complete graph with zero diagonal and costs drawn from `min_cost ..= max_cost`.
    pub fn random<R>(rng: &mut R, size: usize, min_cost: Cost, max_cost: Cost, symmetric: bool) -> Result<Graph, GraphError>
    where R: Rng
    {
        if size == 0 {
            return Err(GraphError::Empty);
        }
        if min_cost <= 0 || min_cost > max_cost || max_cost > MAX_COST {
            return Err(GraphError::InvalidCostRange { min_cost, max_cost, });
        }

        let mut costs = vec![0; size * size];
        for from in 0 .. size {
            for to in 0 .. size {
                if from == to || (symmetric && to < from) {
                    continue;
                }
                let cost = rng.gen_range(min_cost ..= max_cost);
                costs[from * size + to] = cost;
                if symmetric {
                    costs[to * size + from] = cost;
                }
            }
        }

        Ok(Graph { size, costs, })
    }

    pub fn write_to<W>(&self, mut writer: W) -> io::Result<()> where W: Write {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|cost| cost.to_string()).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
        writer.flush()
    }

    pub fn write_to_file<P>(&self, filename: P) -> Result<(), WriteFileError> where P: AsRef<Path> {
        let file = fs::File::create(filename)
            .map_err(WriteFileError::CreateFile)?;
        self.write_to(io::BufWriter::new(file))
            .map_err(WriteFileError::Write)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn raw(&self, from: usize, to: usize) -> Cost {
        self.costs[from * self.size + to]
    }

    /// Cost of the edge `from -> to`, `None` if the matrix holds the "no edge" sentinel.
    pub fn cost(&self, from: usize, to: usize) -> Option<Cost> {
        let cost = self.raw(from, to);
        if cost > 0 { Some(cost) } else { None }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cost]> {
        self.costs.chunks(self.size)
    }

    /// Validates a closed tour `[0, .., 0]` and sums its edges.
    pub fn tour_cost(&self, tour: &[usize]) -> Result<Cost, TourValidationError> {
        if tour.len() != self.size + 1 {
            return Err(TourValidationError::LengthMismatch {
                expected: self.size + 1,
                provided: tour.len(),
            });
        }
        let first = tour[0];
        let last = tour[tour.len() - 1];
        if first != ROOT || last != ROOT {
            return Err(TourValidationError::NotRooted { first, last, });
        }

        let mut seen = BitVec::from_elem(self.size, false);
        for &vertex in &tour[.. self.size] {
            if vertex >= self.size {
                return Err(TourValidationError::VertexOutOfRange(vertex));
            }
            if seen[vertex] {
                return Err(TourValidationError::VertexRepeated(vertex));
            }
            seen.set(vertex, true);
        }

        if self.size == 1 {
            return Ok(0);
        }
        tour.windows(2)
            .map(|pair| {
                self.cost(pair[0], pair[1])
                    .ok_or(TourValidationError::MissingEdge { from: pair[0], to: pair[1], })
            })
            .sum()
    }
}
