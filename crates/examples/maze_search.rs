//! Example: Graph search on a maze
//!
//! Runs every strategy on a position problem, then solves the corners and
//! all-food problems with A* and their heuristics.

use tracing_subscriber::EnvFilter;
use wayfarer_agent::{a_star_search, search, SearchStrategy};
use wayfarer_env::{
    closest_dot_plan, corners_heuristic, food_heuristic, manhattan_heuristic, CornersProblem,
    FoodSearchProblem, Layout, PositionSearchProblem,
};

const MAZE: &str = "\
%%%%%%%%%%%%%%%%%%%%
%P     %     %    .%
% %%%% % %%% % %%% %
% %  .   %   %   % %
% % %%%%%% %%%%% % %
%.%      .       % %
% %%%%%% %%%%%%%%% %
%.                .%
%%%%%%%%%%%%%%%%%%%%";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let layout = Layout::parse(MAZE)?;
    let start = layout.require_start()?;
    let goal = (18, 1);

    println!("Position search from {start:?} to {goal:?}");
    for strategy in [
        SearchStrategy::DepthFirst,
        SearchStrategy::BreadthFirst,
        SearchStrategy::UniformCost,
        SearchStrategy::AStar,
    ] {
        let problem = PositionSearchProblem::new(layout.maze.clone(), start, goal);
        let result = search(&problem, strategy, manhattan_heuristic)?;
        println!(
            "  {:<6} cost {:>5} expanded {:>4}",
            strategy.to_string(),
            result.cost().map_or_else(|| "-".to_string(), |cost| cost.to_string()),
            result.stats.expanded
        );
    }

    let corners = CornersProblem::new(layout.maze.clone(), start)?;
    let tour = a_star_search(&corners, corners_heuristic)?;
    println!(
        "\nCorners tour: {} moves, {} expansions",
        tour.actions().len(),
        corners.expanded()
    );

    let food = FoodSearchProblem::from_layout(&layout)?;
    let feast = a_star_search(&food, food_heuristic)?;
    println!(
        "All food: {} moves, {} expansions",
        feast.actions().len(),
        food.expanded()
    );

    let greedy = closest_dot_plan(&layout.maze, start, &layout.food)?;
    println!("Closest-dot plan: {} moves", greedy.len());

    Ok(())
}
