use coach::{init, SolutionDiversifier, TrajectoryOptimizer};
use std::env;

fn main() -> Result<(), String> {
    let scenario_path = env::args().nth(1).expect("Lacking scenario path argument");

    let scenario = init::json::from_file(&scenario_path).map_err(|e| e.to_string())?;
    let optimizer = TrajectoryOptimizer::for_board(scenario.board).with_settings(scenario.settings);

    let now = std::time::Instant::now();
    let recommendations = if scenario.num_solutions > 1 {
        SolutionDiversifier::new(&optimizer)
            .with_bounds(scenario.bounds)
            .solutions(
                scenario.throw_position,
                scenario.target_position,
                scenario.num_solutions,
            )
    } else {
        optimizer
            .optimize_for_target(
                scenario.throw_position,
                scenario.target_position,
                &scenario.bounds,
            )
            .map(|recommendation| vec![recommendation])
    }
    .map_err(|e| e.to_string())?;
    let elapsed = now.elapsed();

    for recommendation in &recommendations {
        println!("{recommendation}");
        if !recommendation.converged {
            println!("  (search did not converge; best found shown)");
        }
        println!();
    }
    println!("Solved in {elapsed:?}");
    Ok(())
}
