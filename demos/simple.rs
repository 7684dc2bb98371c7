use grid_nav::{waypoints_to_path, CostGrid, Grid, JpsFinder};

// In this example a path is found on a grid with shape
// #####
// #S  #
// # # #
// #  E#
// #####
// S marks the start
// E marks the end
fn main() {
    let grid: CostGrid = match "
        #####
        #...#
        #.#.#
        #...#
        #####
    "
    .parse()
    {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("Invalid map: {err}");
            return;
        }
    };
    let start = Grid::new(1, 1);
    let end = Grid::new(3, 3);
    let mut finder = JpsFinder::default();
    match finder.find_path(&grid, start, end) {
        Ok(Some(waypoints)) => {
            println!("A path has been found:");
            for p in waypoints_to_path(&waypoints) {
                println!("{}", p);
            }
        }
        Ok(None) => println!("No path exists"),
        Err(err) => eprintln!("{err}"),
    }
}
