//! Error types for the MSTOP solver.

use std::fmt;
use std::io;

/// Errors surfaced by the solver.
///
/// Configuration errors are precondition violations caught before any work is
/// done; the remaining variants signal an inconsistent problem instance or a
/// failure while reading one from disk.
#[derive(Debug)]
pub enum SolverError {
    /// The savings blend parameter must lie within [0, 1].
    InvalidAlpha(f64),
    /// The biased-randomisation parameter must lie strictly inside (0, 1).
    InvalidBeta(f64),
    /// The multistart beta range must be strictly inside (0, 1) with min <= max.
    InvalidBetaRange(f64, f64),
    /// The multistart iteration count must be at least 1.
    InvalidIterations,
    /// The route duration budget must be non-negative.
    NegativeTmax(f64),
    /// The instance defines no source nodes.
    NoSources,
    /// The instance must define exactly one depot.
    DepotCount(usize),
    /// A source node declares a fleet of zero vehicles.
    SourceWithoutVehicles(usize),
    /// A node's id does not match its position in the node table.
    NodeIdMismatch { index: usize, id: usize },
    /// The distance matrix is not square with one row per node.
    DistanceMatrixShape { rows: usize, expected: usize },
    /// A distance entry is negative, asymmetric or the diagonal is non-zero.
    InvalidDistance { i: usize, j: usize },
    /// An edge references an out-of-range node or violates the role contract
    /// (depot as i-node, source as j-node).
    EdgeEndpoint { i: usize, j: usize },
    /// An edge carries no savings score for the given source; the savings
    /// calculator has not run over this instance.
    MissingSavings { i: usize, j: usize, source: usize },
    /// The given node id is not a source.
    NotASource(usize),
    /// An I/O failure while reading an instance file.
    Io(io::Error),
    /// A malformed line in an instance file.
    Parse { line: usize, message: String },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidAlpha(a) => {
                write!(f, "alpha must be within [0, 1], got {}", a)
            }
            SolverError::InvalidBeta(b) => {
                write!(f, "beta must be strictly inside (0, 1), got {}", b)
            }
            SolverError::InvalidBetaRange(lo, hi) => {
                write!(
                    f,
                    "beta range must be strictly inside (0, 1) with min <= max, got ({}, {})",
                    lo, hi
                )
            }
            SolverError::InvalidIterations => {
                write!(f, "iteration count must be at least 1")
            }
            SolverError::NegativeTmax(t) => {
                write!(f, "Tmax must be non-negative, got {}", t)
            }
            SolverError::NoSources => write!(f, "the instance defines no sources"),
            SolverError::DepotCount(n) => {
                write!(f, "the instance must define exactly one depot, found {}", n)
            }
            SolverError::SourceWithoutVehicles(id) => {
                write!(f, "source {} has a fleet of zero vehicles", id)
            }
            SolverError::NodeIdMismatch { index, id } => {
                write!(f, "node at position {} carries id {}", index, id)
            }
            SolverError::DistanceMatrixShape { rows, expected } => {
                write!(
                    f,
                    "distance matrix has {} rows, expected a {}x{} matrix",
                    rows, expected, expected
                )
            }
            SolverError::InvalidDistance { i, j } => {
                write!(f, "invalid distance entry between nodes {} and {}", i, j)
            }
            SolverError::EdgeEndpoint { i, j } => {
                write!(f, "edge ({}, {}) violates the endpoint contract", i, j)
            }
            SolverError::MissingSavings { i, j, source } => {
                write!(
                    f,
                    "edge ({}, {}) carries no savings score for source {}",
                    i, j, source
                )
            }
            SolverError::NotASource(id) => write!(f, "node {} is not a source", id),
            SolverError::Io(e) => write!(f, "instance file error: {}", e),
            SolverError::Parse { line, message } => {
                write!(f, "invalid instance file at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SolverError {
    fn from(e: io::Error) -> Self {
        SolverError::Io(e)
    }
}
