use fcm_app::{AppConfig, RunOptions, run_simulation};
use fcm_project::schema::{EdgeDef, NodeDef, SimulationRequest};
use proptest::prelude::*;

proptest! {
    #[test]
    fn delta_matches_final_states(
        w1 in -1.0f64..1.0,
        w2 in -1.0f64..1.0,
        w3 in -1.0f64..1.0,
        driver in 0.0f64..1.0,
        shifted in 0.0f64..1.0,
    ) {
        let mut req = SimulationRequest::new(
            vec![
                NodeDef::new("d", "D", driver).driver(),
                NodeDef::new("x", "X", 0.5),
                NodeDef::new("y", "Y", 0.5),
            ],
            vec![
                EdgeDef::new("d", "x", w1),
                EdgeDef::new("x", "y", w2),
                EdgeDef::new("y", "x", w3),
            ],
        );
        req.compare_to_baseline = Some(true);
        req.initial_values = Some([("d".to_string(), shifted)].into_iter().collect());

        let response = run_simulation(req, &AppConfig::default(), &RunOptions::default())
            .unwrap()
            .response;
        let baseline = response.baseline_final_state.as_ref().unwrap();
        let delta = response.delta_state.as_ref().unwrap();

        for (id, node) in &response.final_state {
            prop_assert_eq!(delta[id], node.value - baseline[id].value);
        }
        prop_assert_eq!(response.final_state["d"].value, shifted);
        prop_assert_eq!(baseline["d"].value, driver);
    }
}
