//! Unit tests for the problem model, instance validation and the loader.

use mstop::error::SolverError;
use mstop::problem::{Node, Problem};
use std::fs;

/// Two sources on a horizontal line, four customers, depot in the middle.
fn create_two_source_problem() -> Problem {
    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 2),
        Node::source(1, 20.0, 0.0, 0, 2),
        Node::customer(2, 1.0, 0.0, 5),
        Node::customer(3, 2.0, 1.0, 8),
        Node::customer(4, 19.0, 0.0, 6),
        Node::customer(5, 18.0, 1.0, 9),
        Node::depot(6, 10.0, 5.0),
    ];

    Problem::new("TwoSources".to_string(), nodes, 4, 100.0).unwrap()
}

#[test]
fn test_node_constructors() {
    let source = Node::source(0, 1.0, 2.0, 3, 4);
    assert!(source.is_source);
    assert!(!source.is_depot);
    assert_eq!(source.vehicles, 4);

    let customer = Node::customer(1, 0.0, 0.0, 10);
    assert!(!customer.is_source);
    assert!(!customer.is_depot);
    assert_eq!(customer.revenue, 10);

    let depot = Node::depot(2, 5.0, 5.0);
    assert!(depot.is_depot);
    assert_eq!(depot.revenue, 0);
}

#[test]
fn test_node_distance() {
    let a = Node::customer(0, 0.0, 0.0, 0);
    let b = Node::customer(1, 3.0, 4.0, 0);
    assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    assert!((b.distance(&a) - 5.0).abs() < 1e-12);
}

#[test]
fn test_problem_structure() {
    let problem = create_two_source_problem();

    assert_eq!(problem.source_count(), 2);
    assert_eq!(problem.customer_count(), 4);
    assert_eq!(problem.depot, 6);
    assert_eq!(problem.sources, vec![0, 1]);
    assert_eq!(problem.customers, vec![2, 3, 4, 5]);
}

#[test]
fn test_distance_matrix() {
    let problem = create_two_source_problem();
    let n = problem.nodes.len();

    // Zero diagonal, symmetric, consistent with the node coordinates.
    for i in 0..n {
        assert_eq!(problem.get_distance(i, i), 0.0);
        for j in 0..n {
            assert_eq!(problem.get_distance(i, j), problem.get_distance(j, i));
        }
    }
    assert!((problem.get_distance(0, 2) - 1.0).abs() < 1e-12);
    assert!((problem.get_distance(0, 1) - 20.0).abs() < 1e-12);
}

#[test]
fn test_edge_contract() {
    let problem = create_two_source_problem();

    for edge in &problem.edges {
        assert!(!problem.nodes[edge.i].is_depot, "depot used as i-node");
        assert!(!problem.nodes[edge.j].is_source, "source used as j-node");
        assert_ne!(edge.i, edge.j);
        assert_eq!(edge.cost, problem.get_distance(edge.i, edge.j));
    }

    // Every ordered (non-depot i, non-source j, i != j) pair appears:
    // 6 candidate i-nodes times 5 candidate j-nodes, minus the 4 customer
    // self-pairs.
    assert_eq!(problem.edges.len(), 6 * 5 - 4);
}

#[test]
fn test_node_id_mismatch_rejected() {
    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 1),
        Node::customer(5, 1.0, 0.0, 10),
        Node::depot(2, 2.0, 0.0),
    ];
    let result = Problem::new("Bad".to_string(), nodes, 1, 10.0);
    assert!(matches!(
        result,
        Err(SolverError::NodeIdMismatch { index: 1, id: 5 })
    ));
}

#[test]
fn test_depot_count_enforced() {
    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 1),
        Node::customer(1, 1.0, 0.0, 10),
    ];
    let result = Problem::new("NoDepot".to_string(), nodes, 1, 10.0);
    assert!(matches!(result, Err(SolverError::DepotCount(0))));

    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 1),
        Node::depot(1, 1.0, 0.0),
        Node::depot(2, 2.0, 0.0),
    ];
    let result = Problem::new("TwoDepots".to_string(), nodes, 1, 10.0);
    assert!(matches!(result, Err(SolverError::DepotCount(2))));
}

#[test]
fn test_negative_tmax_rejected() {
    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 1),
        Node::customer(1, 1.0, 0.0, 10),
        Node::depot(2, 2.0, 0.0),
    ];
    let result = Problem::new("NegTmax".to_string(), nodes, 1, -1.0);
    assert!(matches!(result, Err(SolverError::NegativeTmax(_))));
}

#[test]
fn test_zero_vehicle_source_rejected() {
    let nodes = vec![
        Node::source(0, 0.0, 0.0, 0, 0),
        Node::customer(1, 1.0, 0.0, 10),
        Node::depot(2, 2.0, 0.0),
    ];
    let result = Problem::new("NoFleet".to_string(), nodes, 1, 10.0);
    assert!(matches!(result, Err(SolverError::SourceWithoutVehicles(0))));
}

#[test]
fn test_no_sources_rejected() {
    let nodes = vec![
        Node::customer(0, 1.0, 0.0, 10),
        Node::depot(1, 2.0, 0.0),
    ];
    let result = Problem::new("NoSources".to_string(), nodes, 1, 10.0);
    assert!(matches!(result, Err(SolverError::NoSources)));
}

#[test]
fn test_validate_catches_tampered_distances() {
    let mut problem = create_two_source_problem();
    problem.dists[0][1] = -3.0;
    assert!(matches!(
        problem.validate(),
        Err(SolverError::InvalidDistance { .. })
    ));

    let mut problem = create_two_source_problem();
    problem.dists[2][3] += 1.0; // breaks symmetry
    assert!(matches!(
        problem.validate(),
        Err(SolverError::InvalidDistance { .. })
    ));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join("mstop_test_instance.txt");
    fs::write(
        &path,
        "n 7\n\
         m 4\n\
         tmax 100.0\n\
         0 0 0 1 2\n\
         20 0 0 1 2\n\
         1 0 5 0 0\n\
         2 1 8 0 0\n\
         19 0 6 0 0\n\
         18 1 9 0 0\n\
         10 5 0 0 0\n",
    )
    .unwrap();

    let problem = Problem::from_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(problem.source_count(), 2);
    assert_eq!(problem.customer_count(), 4);
    assert_eq!(problem.depot, 6);
    assert_eq!(problem.n_vehicles, 4);
    assert_eq!(problem.tmax, 100.0);
    assert_eq!(problem.nodes[0].vehicles, 2);
    assert_eq!(problem.nodes[3].revenue, 8);
}

#[test]
fn test_from_file_rejects_short_line() {
    let path = std::env::temp_dir().join("mstop_test_bad_instance.txt");
    fs::write(&path, "n 3\nm 1\ntmax 10\n0 0 0\n").unwrap();

    let result = Problem::from_file(&path);
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(SolverError::Parse { .. })));
}

#[test]
fn test_from_file_rejects_missing_header() {
    let path = std::env::temp_dir().join("mstop_test_empty_instance.txt");
    fs::write(&path, "").unwrap();

    let result = Problem::from_file(&path);
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(SolverError::Parse { .. })));
}
