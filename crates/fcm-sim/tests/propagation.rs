//! Integration tests: propagation dynamics.

use fcm_core::{Activation, Real};
use fcm_graph::{GraphBuilder, ModelGraph};
use fcm_sim::{
    ClampSet, InitialValueResolver, PropagationParams, RunInput, SimError, State, propagate,
};

fn params(activation: Activation, threshold: Real, max_iterations: usize) -> PropagationParams {
    PropagationParams {
        activation,
        threshold,
        max_iterations,
    }
}

fn input_for(graph: &ModelGraph, clamped: &[&str]) -> RunInput {
    let initial = InitialValueResolver::new().resolve(graph).unwrap();
    RunInput::new(initial, ClampSet::new(graph, clamped.iter().copied()))
}

#[test]
fn driver_feeds_successor_in_first_iteration() {
    // A (driver, 2.0) -> B (0.0), weight 1, linear
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", "A", Some(2.0));
    let bb = b.add_node("b", "B", Some(0.0));
    b.set_driver(a, true);
    b.add_edge("a", "b", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.0, 1)).unwrap();
    assert_eq!(out.series_of(bb)[1], 2.0);
    assert_eq!(out.series_of(a)[1], 2.0);
}

#[test]
fn mutual_edges_read_previous_iteration() {
    // A <-> B, weight 1 both ways, linear, A=1, B=0
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", "A", Some(1.0));
    let bb = b.add_node("b", "B", Some(0.0));
    b.add_edge("a", "b", 1.0);
    b.add_edge("b", "a", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.0, 1)).unwrap();
    assert_eq!(out.series_of(a), &[1.0, 0.0]);
    assert_eq!(out.series_of(bb), &[0.0, 1.0]);
}

#[test]
fn update_is_independent_of_declaration_order() {
    let build = |flip: bool| {
        let mut b = GraphBuilder::new();
        let names = if flip { ["b", "a"] } else { ["a", "b"] };
        for n in names {
            b.add_node(n, n, Some(if n == "a" { 0.3 } else { -0.6 }));
        }
        b.add_edge("a", "b", 0.8);
        b.add_edge("b", "a", -0.4);
        b.build().unwrap()
    };
    let p = params(Activation::Tanh, 1e-9, 50);

    let g1 = build(false);
    let g2 = build(true);
    let o1 = propagate(&g1, &input_for(&g1, &[]), &p).unwrap();
    let o2 = propagate(&g2, &input_for(&g2, &[]), &p).unwrap();

    for key in ["a", "b"] {
        let s1 = o1.series_of(g1.index().get(key).unwrap());
        let s2 = o2.series_of(g2.index().get(key).unwrap());
        assert_eq!(s1, s2);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let mut b = GraphBuilder::new();
    for (k, v) in [("a", 0.2), ("b", 0.7), ("c", -0.1)] {
        b.add_node(k, k.to_uppercase(), Some(v));
    }
    b.add_edge("a", "b", 0.45);
    b.add_edge("b", "c", -0.8);
    b.add_edge("c", "a", 0.3);
    b.add_edge("c", "c", 0.1);
    let g = b.build().unwrap();
    let p = params(Activation::Sigmoid, 1e-6, 200);
    let input = input_for(&g, &["a"]);

    let first = propagate(&g, &input, &p).unwrap();
    for _ in 0..5 {
        assert_eq!(propagate(&g, &input, &p).unwrap(), first);
    }
}

#[test]
fn clamped_nodes_never_move() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", "A", Some(0.9));
    let c = b.add_node("c", "C", Some(-0.4));
    b.add_node("b", "B", Some(0.0));
    b.set_driver(a, true);
    b.add_edge("b", "a", 5.0);
    b.add_edge("b", "c", -3.0);
    b.add_edge("a", "b", 1.0);
    b.add_edge("c", "b", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &["c"]), &params(Activation::Tanh, 0.0, 30)).unwrap();
    assert!(out.series_of(a).iter().all(|&v| v == 0.9));
    assert!(out.series_of(c).iter().all(|&v| v == -0.4));
}

#[test]
fn zero_weights_converge_within_two_iterations() {
    let mut b = GraphBuilder::new();
    for (k, v) in [("a", 0.9), ("b", -3.0), ("c", 0.0)] {
        b.add_node(k, k, Some(v));
    }
    b.add_edge("a", "b", 0.0);
    b.add_edge("b", "c", 0.0);
    b.add_edge("c", "a", 0.0);
    let g = b.build().unwrap();

    for activation in Activation::ALL {
        let out = propagate(&g, &input_for(&g, &[]), &params(activation, 1e-3, 1000)).unwrap();
        assert!(out.converged, "{activation} did not converge");
        assert!(out.iterations <= 2, "{activation} took {}", out.iterations);
    }
}

#[test]
fn empty_edge_set_collapses_to_activation_of_zero() {
    let mut b = GraphBuilder::new();
    let d = b.add_node("d", "D", Some(0.8));
    b.add_node("x", "X", Some(0.3));
    b.add_node("y", "Y", Some(-0.3));
    b.set_driver(d, true);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Sigmoid, 1e-3, 10)).unwrap();
    assert_eq!(out.final_state.as_slice(), &[0.8, 0.5, 0.5]);
}

#[test]
fn oscillation_hits_iteration_cap() {
    // x -> x with weight -1 under linear activation flips sign forever
    let mut b = GraphBuilder::new();
    let x = b.add_node("x", "X", Some(1.0));
    b.add_edge("x", "x", -1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.01, 7)).unwrap();
    assert_eq!(out.iterations, 7);
    assert!(!out.converged);
    assert_eq!(out.series_of(x).len(), 8);
    assert_eq!(out.final_state.as_slice(), &[-1.0]);
}

#[test]
fn mutual_swap_never_converges() {
    let mut b = GraphBuilder::new();
    b.add_node("a", "A", Some(1.0));
    b.add_node("b", "B", Some(0.0));
    b.add_edge("a", "b", 1.0);
    b.add_edge("b", "a", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.5, 12)).unwrap();
    assert_eq!(out.iterations, 12);
    assert!(!out.converged);
}

#[test]
fn threshold_comparison_is_inclusive() {
    // x (no inputs, linear) goes 0.25 -> 0.0: change is exactly the threshold
    let mut b = GraphBuilder::new();
    b.add_node("x", "X", Some(0.25));
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.25, 10)).unwrap();
    assert!(out.converged);
    assert_eq!(out.iterations, 1);
}

#[test]
fn zero_iterations_is_trivially_converged() {
    let mut b = GraphBuilder::new();
    b.add_node("a", "A", Some(0.4));
    b.add_node("b", "B", Some(0.6));
    b.add_edge("a", "b", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Sigmoid, 0.001, 0)).unwrap();
    assert_eq!(out.iterations, 0);
    assert!(out.converged);
    assert_eq!(out.final_state.as_slice(), &[0.4, 0.6]);
    assert!(out.series.iter().all(|s| s.len() == 1));
}

#[test]
fn all_clamped_converges_immediately() {
    let mut b = GraphBuilder::new();
    b.add_node("a", "A", Some(0.4));
    b.add_node("b", "B", Some(0.6));
    b.add_edge("a", "b", 1.0);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &["a", "b"]), &params(Activation::Relu, 0.0, 50)).unwrap();
    assert!(out.converged);
    assert_eq!(out.iterations, 1);
}

#[test]
fn overflow_passes_through_unchanged() {
    // Runaway growth: the engine must not clamp or fail on infinities/NaN
    let mut b = GraphBuilder::new();
    let x = b.add_node("x", "X", Some(1e200));
    b.add_edge("x", "x", 1e200);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Relu, 0.001, 5)).unwrap();
    assert_eq!(out.series_of(x)[1], Real::INFINITY);
    assert_eq!(out.final_state.as_slice(), &[Real::INFINITY]);
    // inf - inf is NaN, which never counts as settled
    assert!(!out.converged);
    assert_eq!(out.iterations, 5);
}

#[test]
fn nan_input_propagates_to_successors() {
    let mut b = GraphBuilder::new();
    let src = b.add_node("src", "Source", Some(Real::NAN));
    let dst = b.add_node("dst", "Sink", Some(0.0));
    b.set_driver(src, true);
    b.add_edge("src", "dst", 0.5);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Sigmoid, 0.001, 4)).unwrap();
    assert!(out.final_state.get(dst).unwrap().is_nan());
    assert!(out.final_state.get(src).unwrap().is_nan());
    assert!(!out.converged);
}

#[test]
fn parallel_edges_sum() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", "A", Some(1.0));
    let t = b.add_node("t", "T", Some(0.0));
    b.set_driver(a, true);
    b.add_edge("a", "t", 0.25);
    b.add_edge("a", "t", 0.5);
    let g = b.build().unwrap();

    let out = propagate(&g, &input_for(&g, &[]), &params(Activation::Linear, 0.0, 1)).unwrap();
    assert_eq!(out.final_state.get(t), Some(0.75));
    assert_eq!(out.final_state.get(a), Some(1.0));
}

#[test]
fn foreign_state_is_rejected() {
    let mut b = GraphBuilder::new();
    b.add_node("a", "A", Some(1.0));
    let g = b.build().unwrap();

    let input = RunInput::new(State::from(vec![1.0, 2.0]), ClampSet::drivers_only(&g));
    let err = propagate(&g, &input, &PropagationParams::default()).unwrap_err();
    assert!(matches!(err, SimError::InvalidModel { .. }));
}
