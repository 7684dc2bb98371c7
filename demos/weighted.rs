use grid_nav::{orthogonal_path, path_cost, AStarFinder, CostGrid, Grid, Jps, PathFinder};

// Finds paths across a map with a swamp (cost 5) between start and end, once with A* and once
// with JPS restricted to orthogonal movement. Both avoid the swamp by walking around it.
fn main() {
    let grid: CostGrid = match "
        S.........
        .##.......
        ..55555...
        ..55555...
        ..55555...
        .......##.
        .........E
    "
    .replace(['S', 'E'], ".")
    .parse()
    {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("Invalid map: {err}");
            return;
        }
    };
    println!("{}", grid);
    let start = Grid::new(0, 0);
    let end = Grid::new(9, 6);

    let mut astar = AStarFinder::default();
    if let Ok(Some(waypoints)) = astar.find_path(&grid, start, end) {
        println!(
            "A*: cost {} after {} expansions",
            path_cost(&waypoints),
            astar.stats().expanded
        );
    }

    let mut jps = PathFinder::new(Jps::new(false));
    if let Ok(Some(waypoints)) = jps.find_path(&grid, start, end) {
        println!(
            "JPS: cost {} after {} expansions",
            path_cost(&waypoints),
            jps.stats().expanded
        );
        for w in &waypoints {
            println!("  {} (cost {})", w.grid, w.cost);
        }
        let steps: Vec<String> = orthogonal_path(&waypoints, &grid)
            .iter()
            .map(|g| g.to_string())
            .collect();
        println!("Walked: {}", steps.join(" -> "));
    }
}
