//! Problem definition and data structures for the multi-source TOP.

use crate::error::SolverError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// Represents a node (customer, source or depot) in the multi-source TOP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    /// Revenue collected when the node is visited.
    pub revenue: i64,
    /// Number of vehicles starting from this node; meaningful only for sources.
    pub vehicles: u32,
    pub is_source: bool,
    pub is_depot: bool,
}

impl Node {
    /// Create a customer node.
    pub fn customer(id: usize, x: f64, y: f64, revenue: i64) -> Self {
        Node {
            id,
            x,
            y,
            revenue,
            vehicles: 0,
            is_source: false,
            is_depot: false,
        }
    }

    /// Create a source node with its own vehicle fleet.
    pub fn source(id: usize, x: f64, y: f64, revenue: i64, vehicles: u32) -> Self {
        Node {
            id,
            x,
            y,
            revenue,
            vehicles,
            is_source: true,
            is_depot: false,
        }
    }

    /// Create the depot node.
    pub fn depot(id: usize, x: f64, y: f64) -> Self {
        Node {
            id,
            x,
            y,
            revenue: 0,
            vehicles: 0,
            is_source: false,
            is_depot: true,
        }
    }

    /// Calculate the Euclidean distance between two nodes.
    pub fn distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A candidate directed edge (i -> j) between two nodes.
///
/// Edges never start at the depot and never end at a source: the depot is
/// only ever a route terminus, sources only ever route origins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub i: usize,
    pub j: usize,
    /// Distance between the two endpoints.
    pub cost: f64,
    /// Per-source savings score, keyed by source id. Populated by the
    /// savings calculator.
    pub savings: HashMap<usize, f64>,
}

/// Represents a multi-source TOP problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    /// All nodes, indexed by id (sources, customers and the depot).
    pub nodes: Vec<Node>,
    /// Ids of the source nodes, in instance order.
    pub sources: Vec<usize>,
    /// Ids of the customer nodes.
    pub customers: Vec<usize>,
    /// Id of the depot node.
    pub depot: usize,
    /// Global vehicle count declared by the instance header.
    pub n_vehicles: u32,
    /// Maximum cost a single route may accumulate.
    pub tmax: f64,
    /// Full pairwise distance matrix, indexed by node id.
    pub dists: Vec<Vec<f64>>,
    /// Candidate edge list: every ordered pair with a non-depot i-node and a
    /// non-source j-node.
    pub edges: Vec<Edge>,
}

impl Problem {
    /// Create a new problem instance from a node table.
    ///
    /// Nodes must be supplied in id order. The distance matrix and the
    /// candidate edge list are derived here; the instance is validated
    /// before being returned.
    pub fn new(
        name: String,
        nodes: Vec<Node>,
        n_vehicles: u32,
        tmax: f64,
    ) -> Result<Self, SolverError> {
        let mut sources = Vec::new();
        let mut customers = Vec::new();
        let mut depots = Vec::new();

        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(SolverError::NodeIdMismatch { index, id: node.id });
            }
            if node.is_depot {
                depots.push(node.id);
            } else if node.is_source {
                sources.push(node.id);
            } else {
                customers.push(node.id);
            }
        }

        if depots.len() != 1 {
            return Err(SolverError::DepotCount(depots.len()));
        }

        let dists = Self::compute_distance_matrix(&nodes);
        let edges = Self::build_edges(&nodes, &dists);

        let problem = Problem {
            name,
            nodes,
            sources,
            customers,
            depot: depots[0],
            n_vehicles,
            tmax,
            dists,
            edges,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Distance between two node ids.
    pub fn get_distance(&self, from: usize, to: usize) -> f64 {
        self.dists[from][to]
    }

    /// Number of sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of customers (excluding sources and the depot).
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Generate the full distance matrix for all nodes.
    fn compute_distance_matrix(nodes: &[Node]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = nodes[i].distance(&nodes[j]);
                }
            }
        }

        matrix
    }

    /// Build the candidate edge list over the node table.
    fn build_edges(nodes: &[Node], dists: &[Vec<f64>]) -> Vec<Edge> {
        let mut edges = Vec::new();

        for inode in nodes {
            if inode.is_depot {
                continue;
            }
            for jnode in nodes {
                if jnode.is_source || jnode.id == inode.id {
                    continue;
                }
                edges.push(Edge {
                    i: inode.id,
                    j: jnode.id,
                    cost: dists[inode.id][jnode.id],
                    savings: HashMap::new(),
                });
            }
        }

        edges
    }

    /// Check the structural contract of the instance.
    ///
    /// Catches loader bugs (shape and symmetry of the distance matrix,
    /// dangling edge endpoints) and degenerate configurations (no sources,
    /// a source with an empty fleet, negative Tmax) before the heuristics
    /// run on inconsistent data.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.tmax < 0.0 {
            return Err(SolverError::NegativeTmax(self.tmax));
        }
        if self.sources.is_empty() {
            return Err(SolverError::NoSources);
        }
        for &s in &self.sources {
            if self.nodes[s].vehicles == 0 {
                return Err(SolverError::SourceWithoutVehicles(s));
            }
        }

        let n = self.nodes.len();
        if self.dists.len() != n {
            return Err(SolverError::DistanceMatrixShape {
                rows: self.dists.len(),
                expected: n,
            });
        }
        for row in &self.dists {
            if row.len() != n {
                return Err(SolverError::DistanceMatrixShape {
                    rows: row.len(),
                    expected: n,
                });
            }
        }
        for i in 0..n {
            if self.dists[i][i] != 0.0 {
                return Err(SolverError::InvalidDistance { i, j: i });
            }
            for j in 0..n {
                let d = self.dists[i][j];
                if d < 0.0 || (d - self.dists[j][i]).abs() > 1e-9 {
                    return Err(SolverError::InvalidDistance { i, j });
                }
            }
        }

        for edge in &self.edges {
            if edge.i >= n || edge.j >= n {
                return Err(SolverError::EdgeEndpoint {
                    i: edge.i,
                    j: edge.j,
                });
            }
            if self.nodes[edge.i].is_depot || self.nodes[edge.j].is_source {
                return Err(SolverError::EdgeEndpoint {
                    i: edge.i,
                    j: edge.j,
                });
            }
        }

        Ok(())
    }

    /// Load a multi-source instance from a file.
    ///
    /// The format is three header lines (`n <nodes>`, `m <vehicles>`,
    /// `tmax <budget>`) followed by one line per node with
    /// `x y revenue source vehicles` fields; the last node is the depot.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let name = path
            .as_ref()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = File::open(path)?;
        let reader = io::BufReader::new(file);
        let mut lines = reader.lines().enumerate();

        let n_nodes = Self::header_value::<usize>(&mut lines)?;
        let n_vehicles = Self::header_value::<u32>(&mut lines)?;
        let tmax = Self::header_value::<f64>(&mut lines)?;

        if n_nodes == 0 {
            return Err(SolverError::Parse {
                line: 1,
                message: "header declares zero nodes".to_string(),
            });
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for (line_no, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 {
                return Err(SolverError::Parse {
                    line: line_no + 1,
                    message: format!("expected 5 fields, found {}", fields.len()),
                });
            }

            let x = Self::field::<f64>(fields[0], line_no)?;
            let y = Self::field::<f64>(fields[1], line_no)?;
            let revenue = Self::field::<i64>(fields[2], line_no)?;
            let is_source = Self::field::<u8>(fields[3], line_no)? == 1;
            let vehicles = Self::field::<u32>(fields[4], line_no)?;

            let id = nodes.len();
            if id == n_nodes - 1 {
                nodes.push(Node::depot(id, x, y));
            } else if is_source {
                nodes.push(Node::source(id, x, y, revenue, vehicles));
            } else {
                nodes.push(Node::customer(id, x, y, revenue));
            }
        }

        if nodes.len() != n_nodes {
            return Err(SolverError::Parse {
                line: 0,
                message: format!("header declares {} nodes, found {}", n_nodes, nodes.len()),
            });
        }

        Problem::new(name, nodes, n_vehicles, tmax)
    }

    /// Read the value field of a `label value` header line.
    fn header_value<T: std::str::FromStr>(
        lines: &mut impl Iterator<Item = (usize, io::Result<String>)>,
    ) -> Result<T, SolverError> {
        let (line_no, line) = lines.next().ok_or(SolverError::Parse {
            line: 0,
            message: "missing header line".to_string(),
        })?;
        let line = line?;
        let value = line.split_whitespace().nth(1).ok_or(SolverError::Parse {
            line: line_no + 1,
            message: "header line has no value field".to_string(),
        })?;
        Self::field(value, line_no)
    }

    fn field<T: std::str::FromStr>(raw: &str, line_no: usize) -> Result<T, SolverError> {
        raw.parse().map_err(|_| SolverError::Parse {
            line: line_no + 1,
            message: format!("cannot parse field '{}'", raw),
        })
    }
}
