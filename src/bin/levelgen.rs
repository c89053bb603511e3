use clap::Parser;
use dark_maze::level::{save_level, TileGrid};
use dark_maze::maze::MazeGrid;
use dark_maze::rng::Rng;
use dark_maze::types::Tile;
use std::path::PathBuf;

/// Generates a maze, expands it to a tile grid and writes it as a playable
/// level file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 8)]
    rows: usize,
    #[arg(long, default_value_t = 8)]
    cols: usize,
    #[arg(long, default_value_t = 0)]
    seed: u32,
    /// Flashlights to scatter on empty tiles.
    #[arg(long, default_value_t = 3)]
    flashlights: usize,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    out: PathBuf,
}

fn scatter_flashlights(grid: &mut TileGrid, count: usize, seed: u32) {
    let mut spots = grid.positions_of(Tile::Empty);
    let mut rng = Rng::new(seed.wrapping_add(1));
    rng.shuffle(&mut spots);
    for (r, c) in spots.into_iter().take(count) {
        grid.set(r, c, Tile::Flashlight);
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let maze = MazeGrid::generate(cli.rows, cli.cols, &mut Rng::new(cli.seed));
    let mut grid = TileGrid::from_tiles(maze.to_tile_grid());
    scatter_flashlights(&mut grid, cli.flashlights, cli.seed);

    let name = cli
        .name
        .unwrap_or_else(|| format!("maze_{}x{}_s{}", cli.rows, cli.cols, cli.seed));
    if let Err(e) = save_level(&cli.out, &name, &grid) {
        log::error!("failed to write {}: {e}", cli.out.display());
        std::process::exit(1);
    }
    log::info!(
        "level '{}' ({}x{} tiles) written to {}",
        name,
        grid.rows,
        grid.cols,
        cli.out.display()
    );
}
