/// Diagnostic tool to verify facet → arrange → fit pipeline
use anyhow::Context;
use facet_grid::facet::Key;
use facet_grid::view::{fit_to_viewport, FitConfig, Viewport};
use facet_grid::{Grid, GridConfig, GridItem, Padding};

const SPECIES: [&str; 6] = ["ant", "Bee", "cicada", "dragonfly", "earwig", "firefly"];

/// Synthetic record: a species, an optional survey year, and its placement.
#[derive(Debug, Clone)]
struct Sighting {
    species: &'static str,
    year: Option<i32>,
    x: f64,
    y: f64,
}

impl GridItem for Sighting {
    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

/// Deterministic skewed sample so cells differ in size.
fn synthesize(count: usize) -> Vec<Sighting> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        state >> 33
    };

    (0..count)
        .map(|_| {
            let species = SPECIES[((next() % 36) as f64).sqrt() as usize];
            let roll = next() % 10;
            let year = if roll == 0 { None } else { Some(2018 + (roll % 5) as i32) };
            Sighting {
                species,
                year,
                x: f64::NAN,
                y: f64::NAN,
            }
        })
        .collect()
}

fn parse_arg<T: std::str::FromStr>(index: usize, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::args().nth(index) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("argument {index} ({raw:?}) is not a valid number")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("facet_grid=debug".parse()?),
        )
        .init();

    let count: usize = parse_arg(1, 5_000)?;
    let viewport = Viewport::new(parse_arg(2, 1920.0)?, parse_arg(3, 1080.0)?);

    println!("=== DIAGNOSTIC: Facet → Arrange → Fit Pipeline ===");
    println!(
        "Items: {}  Viewport: {:.0}x{:.0}",
        count, viewport.width, viewport.height
    );

    let mut sightings = synthesize(count);

    let config = GridConfig {
        cell_margin: 2.0,
        cell_padding: Padding::uniform(0.5),
        ..GridConfig::default()
    };
    let mut grid = Grid::new(&mut sightings)
        .with_config(config)
        .with_horizontal_facet(|s: &Sighting| Key::from(s.species))
        .with_vertical_facet(|s: &Sighting| Key::from(s.year));

    // Facet
    grid.facet_items_into_cells();
    println!(
        "\n[1] Faceted into {} cells ({} rows x {} columns)",
        grid.cells().len(),
        grid.vertical_keys().len(),
        grid.horizontal_keys().len()
    );
    let columns: Vec<String> = grid.horizontal_keys().iter().map(Key::to_string).collect();
    let rows: Vec<String> = grid.vertical_keys().iter().map(Key::to_string).collect();
    println!("    Columns: {}", columns.join(", "));
    println!("    Rows:    {}", rows.join(", "));
    println!("    Longest cell: {} items", grid.longest_cell_length());

    // Solve + arrange
    let target = viewport.aspect_ratio();
    let cell_ratio = grid.fit_to_aspect_ratio(target)?;
    println!(
        "\n[2] Cell aspect ratio {:.4} → grid {:.1}x{:.1} (ratio {:.4}, target {:.4})",
        cell_ratio,
        grid.width(),
        grid.height(),
        grid.width() / grid.height().max(f64::MIN_POSITIVE),
        target
    );

    // Largest cells
    println!("\n[3] Top 5 cells by item count:");
    let mut by_size: Vec<_> = grid.cells().iter().collect();
    by_size.sort_by_key(|c| std::cmp::Reverse(c.len()));
    for (i, cell) in by_size.iter().take(5).enumerate() {
        println!(
            "    [{}] ({}, {}) - {} items in {}x{} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            i,
            cell.vertical_key,
            cell.horizontal_key,
            cell.len(),
            cell.packing.columns,
            cell.packing.rows,
            cell.left,
            cell.top,
            cell.width,
            cell.height
        );
    }

    // Viewport fit
    let fit = fit_to_viewport(grid.width(), grid.height(), viewport, &FitConfig::default());
    println!(
        "\n[4] Viewport fit: scale {:.3} px/unit, origin ({:.1}, {:.1})",
        fit.scale, fit.offset_x, fit.offset_y
    );

    // Anomalies
    println!("\n[5] Checking for anomalies:");
    let eps = 1e-9;
    let mut outside_cell = 0usize;
    let mut outside_grid = 0usize;
    for cell in grid.cells() {
        if cell.left + cell.width > grid.width() + eps || cell.top + cell.height > grid.height() + eps {
            outside_grid += 1;
        }
        let (left, top) = (cell.left + cell.content_x, cell.top + cell.content_y);
        for &index in &cell.items {
            let item = &grid.items()[index];
            let inside = item.x >= left - eps
                && item.y >= top - eps
                && item.x <= left + cell.inner_width + eps
                && item.y <= top + cell.inner_height + eps;
            if !inside {
                outside_cell += 1;
            }
        }
    }
    let unplaced = grid.items().iter().filter(|s| s.x.is_nan() || s.y.is_nan()).count();
    println!("    Cells outside grid:     {}", outside_grid);
    println!("    Items outside cell:     {}", outside_cell);
    println!("    Items never positioned: {}", unplaced);

    Ok(())
}
