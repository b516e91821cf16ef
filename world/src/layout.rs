//! Text layouts for hand-written mazes.
//!
//! | Glyph | Meaning |
//! | --- | --- |
//! | `#` | wall |
//! | `.` | regular pellet |
//! | `o` | power pellet |
//! | space | open floor |
//! | `A` | agent spawn |
//! | `B` `P` `I` `C` | blinky, pinky, inky and clyde spawns |

use maze_pursuit_core::{Archetype, TileCoord};

use crate::{Grid, HomeArea, Level, LevelError};

/// Parses rows of glyphs into a level with default speeds.
///
/// Every row must have the same width and exactly one agent spawn must be
/// present. Pursuer identifiers follow reading order, left to right and top
/// to bottom.
pub fn parse_layout<S: AsRef<str>>(
    rows: &[S],
    tile_size: f32,
    home: HomeArea,
) -> Result<Level, LevelError> {
    let columns = rows.first().map_or(0, |row| row.as_ref().chars().count());
    let mut walls = Vec::with_capacity(columns * rows.len());
    let mut pellets = Vec::with_capacity(columns * rows.len());
    let mut agents = Vec::new();
    let mut pursuers = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let width = row.chars().count();
        if width != columns {
            return Err(LevelError::RaggedLayout {
                row: row_index,
                expected: columns,
                actual: width,
            });
        }

        for (column_index, glyph) in row.chars().enumerate() {
            let tile = TileCoord::new(column_index as i32, row_index as i32);
            let (wall, pellet) = match glyph {
                '#' => (1, 0),
                '.' => (0, 1),
                'o' => (0, 2),
                ' ' => (0, 0),
                'A' => {
                    agents.push(tile);
                    (0, 0)
                }
                'B' | 'P' | 'I' | 'C' => {
                    pursuers.push((archetype_for(glyph), tile));
                    (0, 0)
                }
                other => {
                    return Err(LevelError::UnknownGlyph {
                        glyph: other,
                        column: tile.column(),
                        row: tile.row(),
                    })
                }
            };
            walls.push(wall);
            pellets.push(pellet);
        }
    }

    let grid = Grid::from_masks(
        columns as u32,
        rows.len() as u32,
        tile_size,
        &walls,
        &pellets,
    )?;
    let agent_spawn = match agents.as_slice() {
        [tile] => *tile,
        spawns => return Err(LevelError::AgentSpawnCount(spawns.len())),
    };

    Ok(pursuers
        .into_iter()
        .fold(Level::new(grid, home, agent_spawn), |level, (archetype, tile)| {
            level.with_pursuer(archetype, tile)
        }))
}

fn archetype_for(glyph: char) -> Archetype {
    match glyph {
        'P' => Archetype::Pinky,
        'I' => Archetype::Inky,
        'C' => Archetype::Clyde,
        _ => Archetype::Blinky,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_pursuit_core::PelletKind;

    fn home() -> HomeArea {
        HomeArea::new(TileCoord::new(2, 1), 1)
    }

    #[test]
    fn parses_walls_pellets_and_spawns() {
        let level = parse_layout(&["#####", "#A.o#", "#PB #"], 8.0, home()).expect("valid layout");
        let grid = level.grid();
        assert_eq!((grid.columns(), grid.rows()), (5, 3));
        assert!(grid.is_wall(TileCoord::new(0, 1)));
        assert_eq!(grid.pellet_at(TileCoord::new(2, 1)), Some(PelletKind::Regular));
        assert_eq!(grid.pellet_at(TileCoord::new(3, 1)), Some(PelletKind::Power));
        assert_eq!(grid.remaining_pellets(), 2);
        assert_eq!(level.agent_spawn(), TileCoord::new(1, 1));
        let archetypes: Vec<Archetype> = level.pursuers().iter().map(|spawn| spawn.archetype).collect();
        assert_eq!(archetypes, vec![Archetype::Pinky, Archetype::Blinky]);
    }

    #[test]
    fn rejects_malformed_layouts() {
        assert_eq!(
            parse_layout(&["###", "#A"], 8.0, home()).err(),
            Some(LevelError::RaggedLayout {
                row: 1,
                expected: 3,
                actual: 2,
            })
        );
        assert_eq!(
            parse_layout(&["#A?"], 8.0, home()).err(),
            Some(LevelError::UnknownGlyph {
                glyph: '?',
                column: 2,
                row: 0,
            })
        );
        assert_eq!(
            parse_layout(&["A A"], 8.0, home()).err(),
            Some(LevelError::AgentSpawnCount(2))
        );
        assert_eq!(
            parse_layout::<&str>(&[], 8.0, home()).err(),
            Some(LevelError::EmptyGrid {
                columns: 0,
                rows: 0,
            })
        );
    }
}
