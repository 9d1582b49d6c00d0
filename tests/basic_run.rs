use coach::{
    BoardGeometry, SearchBounds, SearchSettings, SolutionDiversifier, TrajectoryOptimizer, Vec3,
};

fn standard_optimizer() -> TrajectoryOptimizer {
    TrajectoryOptimizer::for_board(BoardGeometry::default())
}

#[test]
fn standard_board_throw() {
    let recommendation = standard_optimizer()
        .optimize_for_board(27., 5.5, 0.)
        .unwrap();

    assert!(recommendation.converged);
    assert!(recommendation.distance_from_hole < 0.1);
    assert!(recommendation.success_probability > 0.5);
    assert!(recommendation.trajectory.is_complete());

    // Trajectory starts at the release point and descends onto the board.
    let points = recommendation.trajectory.points();
    assert_eq!(points[0].position, Vec3::new(0., 5.5, 0.));
    for pair in points.windows(2) {
        assert!(pair[0].time < pair[1].time);
    }
}

#[test]
fn three_arc_options() {
    let optimizer = standard_optimizer();
    let target = optimizer.board().hole_center(27.);
    let solutions = SolutionDiversifier::new(&optimizer)
        .solutions(Vec3::new(0., 5.5, 0.), target, 3)
        .unwrap();

    assert_eq!(solutions.len(), 3);
    for solution in &solutions {
        assert!(solution.distance_from_hole < 0.5);
    }
    let mut pitches: Vec<f64> = solutions.iter().map(|s| s.parameters.pitch).collect();
    pitches.sort_by(f64::total_cmp);
    assert!(pitches[0] < 30. && pitches[2] > 45.);
}

#[test]
fn scenario_file_end_to_end() {
    let scenario = coach::init::json::parse_from_string(
        r#"{
            "Throw": { "X": 0, "Y": 5.5, "Z": 0 },
            "ThrowDistance": 27,
            "Bounds": { "Velocity": [15, 40], "Pitch": [15, 60], "Yaw": [-15, 15] },
            "Search": { "PopulationSize": 30, "MaxGenerations": 60, "Seed": 42 }
        }"#,
    )
    .unwrap();

    let optimizer = TrajectoryOptimizer::for_board(scenario.board).with_settings(scenario.settings);
    let recommendation = optimizer
        .optimize_for_target(
            scenario.throw_position,
            scenario.target_position,
            &scenario.bounds,
        )
        .unwrap();
    assert!(recommendation.distance_from_hole < 0.1);
}

#[test]
fn tight_budget_still_returns() {
    let optimizer = standard_optimizer().with_settings(
        SearchSettings::default()
            .with_population_size(6)
            .with_max_generations(2),
    );
    let recommendation = optimizer
        .optimize_for_target(
            Vec3::new(0., 5.5, 0.),
            Vec3::new(27., 0.75, 0.),
            &SearchBounds::default(),
        )
        .unwrap();
    assert!((0. ..=1.).contains(&recommendation.success_probability));
    assert!(recommendation.distance_from_hole >= 0.);
}
