//! Scenario loading and text rendering shared by the `tools` and `fuzz` binaries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use perimeter::{
    Cell, PerimeterConfig, PerimeterEngine, PerimeterPool, WalkabilityOracle, WalkableGrid,
    WorldPos,
};

/// Map glyph marking the origin cell. Walkable.
pub const ORIGIN_GLYPH: char = 'S';

pub struct Scenario {
    pub grid: WalkableGrid,
    pub origin_cell: (i32, i32),
}

impl Scenario {
    pub fn origin(&self) -> WorldPos {
        self.grid.cell_center(self.origin_cell.0, self.origin_cell.1)
    }

    pub fn engine(&self, config: PerimeterConfig) -> Result<PerimeterEngine<&WalkableGrid>> {
        let pool = PerimeterPool::new(&config.pool);
        PerimeterEngine::new(config, &self.grid, pool)
            .map_err(|err| anyhow::anyhow!("engine rejected config: {err}"))
    }
}

/// Parses a text map: `.` is floor, `S` is the origin, anything else blocks.
pub fn parse_map(text: &str, node_radius: f32) -> Result<Scenario> {
    let rows: Vec<&str> =
        text.lines().map(str::trim_end).filter(|row| !row.is_empty()).collect();
    if rows.is_empty() {
        bail!("map has no rows");
    }

    let height = rows.len();
    let mut origin = None;
    let mut cleaned = Vec::with_capacity(height);
    for (row_index, row) in rows.iter().enumerate() {
        for (gx, _) in row.chars().enumerate().filter(|(_, ch)| *ch == ORIGIN_GLYPH) {
            if origin.is_some() {
                bail!("map marks more than one origin");
            }
            origin = Some((gx as i32, (height - 1 - row_index) as i32));
        }
        cleaned.push(row.replace(ORIGIN_GLYPH, "."));
    }
    let Some(origin_cell) = origin else {
        bail!("map has no origin; mark one cell with '{ORIGIN_GLYPH}'");
    };

    let grid = WalkableGrid::from_rows(cleaned.as_slice(), node_radius);
    Ok(Scenario { grid, origin_cell })
}

pub fn load_map(path: &Path, node_radius: f32) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file: {}", path.display()))?;
    parse_map(&text, node_radius).with_context(|| format!("Invalid map: {}", path.display()))
}

/// Reads a TOML config; a missing path means defaults.
pub fn load_config(path: Option<&Path>) -> Result<PerimeterConfig> {
    let Some(path) = path else {
        return Ok(PerimeterConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: PerimeterConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config TOML: {}", path.display()))?;
    config.validate().map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))?;
    Ok(config)
}

/// Draws the area over the map, top row first.
///
/// `#` wall, `.` untouched floor, `o` unsearched node, `!` node with a live sensor,
/// `x` searched node, `S` the origin while unsearched.
pub fn render_area<O: WalkabilityOracle>(
    engine: &PerimeterEngine<O>,
    grid: &WalkableGrid,
) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for gy in (0..grid.height() as i32).rev() {
        for gx in 0..grid.width() as i32 {
            let world = grid.cell_center(gx, gy);
            let glyph = if !grid.is_cell_walkable(gx, gy) {
                '#'
            } else {
                engine_cell(engine, world).and_then(|cell| glyph_for(engine, cell)).unwrap_or('.')
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn engine_cell<O: WalkabilityOracle>(
    engine: &PerimeterEngine<O>,
    world: WorldPos,
) -> Option<Cell> {
    (engine.node_count() > 0).then(|| engine.cell_for_world(world))
}

fn glyph_for<O: WalkabilityOracle>(engine: &PerimeterEngine<O>, cell: Cell) -> Option<char> {
    let id = engine.node_at(cell)?;
    let node = engine.node(id)?;
    let glyph = if node.searched {
        'x'
    } else if engine.sensor_for(id).is_some() {
        '!'
    } else if cell == Cell::ORIGIN {
        ORIGIN_GLYPH
    } else {
        'o'
    };
    Some(glyph)
}
