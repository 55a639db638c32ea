//! Example: Value iteration on the stock gridworlds
//!
//! Pass a layout name (`book`, `bridge`, `discount`, `cliff`, `maze`) as the
//! first argument; `RUST_LOG=debug` shows the planner's summary.

use tracing_subscriber::EnvFilter;
use wayfarer_agent::ValueIterationAgent;
use wayfarer_core::{ValueEstimator, ValueIterationConfig};
use wayfarer_env::{analysis, Cell, GridState, GridWorld};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "book".to_string());
    let grid = GridWorld::named(&name)?;
    let config = ValueIterationConfig::default();
    let agent = ValueIterationAgent::new(grid, &config)?;

    println!("{name}: {} sweeps, discount {}", config.iterations, config.discount);
    print_grid(&agent);

    // The bridge preset makes crossing worthwhile
    let answer = analysis::question2();
    let bridge = answer.apply(GridWorld::bridge()?)?;
    let crossing = ValueIterationAgent::new(bridge, &answer.value_iteration_config(100))?;
    println!("\nbridge with noise {}:", answer.noise);
    print_grid(&crossing);

    Ok(())
}

fn print_grid(agent: &ValueIterationAgent<GridWorld>) {
    let grid = agent.mdp();
    for y in (0..grid.height()).rev() {
        let row: Vec<String> = (0..grid.width())
            .map(|x| {
                let state = GridState::At((x, y));
                if grid.cell((x, y)) == Some(Cell::Wall) {
                    return format!("{:>14}", "#");
                }
                let action = agent
                    .get_action(&state)
                    .map_or_else(|| "-".to_string(), |action| action.to_string());
                format!("{:>8.3} {:<5}", agent.get_value(&state), action)
            })
            .collect();
        println!("{}", row.join(" "));
    }
}
