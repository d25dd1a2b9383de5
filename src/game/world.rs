//! # World Module
//!
//! Tile grids and the textual level description format.
//!
//! A [`Level`] exclusively owns its grid. Stairs coordinates are cached next to
//! the grid and kept in sync by [`Level::set_tile`], so the grid stays the
//! single source of truth for walkability and pickups.

use crate::{config, DelveError, DelveResult, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single character-coded map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Void,
    Wall,
    Floor,
    Corridor,
    StairsUp,
    StairsDown,
    Item,
    Gold,
    /// Monster marker. Only appears in descriptions and rendered overlays.
    Monster,
    PlayerStart,
}

impl Tile {
    /// Returns the character used for this tile in descriptions and frames.
    pub fn symbol(self) -> char {
        match self {
            Tile::Void => ' ',
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Corridor => ',',
            Tile::StairsUp => '<',
            Tile::StairsDown => '>',
            Tile::Item => '!',
            Tile::Gold => '$',
            Tile::Monster => 'M',
            Tile::PlayerStart => 'P',
        }
    }

    /// Parses a tile from its description character.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Tile;
    ///
    /// assert_eq!(Tile::from_symbol('>'), Some(Tile::StairsDown));
    /// assert_eq!(Tile::from_symbol('~'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            ' ' => Some(Tile::Void),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Floor),
            ',' => Some(Tile::Corridor),
            '<' => Some(Tile::StairsUp),
            '>' => Some(Tile::StairsDown),
            '!' => Some(Tile::Item),
            '$' => Some(Tile::Gold),
            'M' => Some(Tile::Monster),
            'P' => Some(Tile::PlayerStart),
            _ => None,
        }
    }

    /// Returns true if the player may stand on this tile.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Void | Tile::Wall | Tile::Monster)
    }

    /// Returns true if a monster may step onto this tile.
    ///
    /// Monsters keep off stairs and pickups.
    pub fn is_monster_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Corridor | Tile::PlayerStart)
    }
}

/// One dungeon floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Depth of this floor, starting at 1
    pub depth: u32,
    pub width: u32,
    pub height: u32,
    tiles: Vec<Vec<Tile>>,
    stairs_up: Option<Position>,
    stairs_down: Option<Position>,
    monster_spawns: Vec<Position>,
}

impl Level {
    /// Creates a level filled with void tiles.
    pub fn new(depth: u32, width: u32, height: u32) -> Self {
        Self::filled(depth, width, height, Tile::Void)
    }

    /// Creates a level where every cell holds `tile`.
    ///
    /// Stairs are rejected here since a level holds at most one of each.
    pub fn filled(depth: u32, width: u32, height: u32, tile: Tile) -> Self {
        let tile = match tile {
            Tile::StairsUp | Tile::StairsDown | Tile::PlayerStart | Tile::Monster => Tile::Floor,
            other => other,
        };
        Self {
            depth,
            width,
            height,
            tiles: vec![vec![tile; width as usize]; height as usize],
            stairs_up: None,
            stairs_down: None,
            monster_spawns: Vec::new(),
        }
    }

    /// Parses a textual level description.
    ///
    /// The first non-blank line is a `LEVEL <depth>` header (the keyword is
    /// case-insensitive and `DEPTH` is accepted too). Every later non-blank
    /// line is a grid row; the first row fixes the width.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Level, Position, Tile};
    ///
    /// let level = Level::parse("LEVEL 2\n#####\n#P.>#\n#####").unwrap();
    /// assert_eq!(level.depth, 2);
    /// assert_eq!(level.stairs_down(), Some(Position::new(3, 1)));
    /// assert_eq!(level.player_start_position(), Position::new(1, 1));
    /// assert_eq!(level.get_tile(Position::new(0, 0)), Some(Tile::Wall));
    /// ```
    pub fn parse(text: &str) -> DelveResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')));

        let (header_line, header) = lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or_else(|| DelveError::format(1, "level description is empty"))?;
        let depth = parse_header(header).ok_or_else(|| {
            DelveError::format(
                header_line,
                format!("expected a `LEVEL <depth>` header, found `{}`", header.trim()),
            )
        })?;

        let rows: Vec<(usize, &str)> = lines.filter(|(_, line)| !line.trim().is_empty()).collect();
        let width = match rows.first() {
            Some((_, row)) => row.chars().count(),
            None => {
                return Err(DelveError::format(
                    header_line,
                    "level description has no grid rows",
                ))
            }
        };

        let mut level = Level::new(depth, width as u32, rows.len() as u32);
        let mut player_start: Option<Position> = None;

        for (y, (line_number, row)) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                return Err(DelveError::format(
                    *line_number,
                    format!("row is {} tiles wide, expected {}", row_width, width),
                ));
            }

            for (x, symbol) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let tile = Tile::from_symbol(symbol).ok_or_else(|| {
                    DelveError::format(
                        *line_number,
                        format!("unknown tile code `{}` in column {}", symbol, x + 1),
                    )
                })?;

                let duplicate = match tile {
                    Tile::StairsUp => level.stairs_up.replace(pos).is_some(),
                    Tile::StairsDown => level.stairs_down.replace(pos).is_some(),
                    Tile::PlayerStart => player_start.replace(pos).is_some(),
                    _ => false,
                };
                if duplicate {
                    return Err(DelveError::format(
                        *line_number,
                        format!("a second `{}` marker in column {}", symbol, x + 1),
                    ));
                }

                level.tiles[y][x] = if tile == Tile::Monster {
                    level.monster_spawns.push(pos);
                    Tile::Floor
                } else {
                    tile
                };
            }
        }

        Ok(level)
    }

    /// Checks if a position is within level bounds.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the tile at a position, or None outside the grid.
    pub fn get_tile(&self, pos: Position) -> Option<Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// Overwrites a tile, keeping the cached stairs coordinates in sync.
    ///
    /// Placing a second staircase of the same kind is rejected.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> DelveResult<()> {
        let previous = self.get_tile(pos).ok_or_else(|| {
            DelveError::InvalidState(format!("position ({}, {}) is outside the level", pos.x, pos.y))
        })?;

        let existing = match tile {
            Tile::StairsUp => self.stairs_up,
            Tile::StairsDown => self.stairs_down,
            _ => None,
        };
        if matches!(existing, Some(other) if other != pos) {
            return Err(DelveError::InvalidState(format!(
                "level {} already has a `{}` staircase",
                self.depth,
                tile.symbol()
            )));
        }

        match previous {
            Tile::StairsUp => self.stairs_up = None,
            Tile::StairsDown => self.stairs_down = None,
            _ => {}
        }
        match tile {
            Tile::StairsUp => self.stairs_up = Some(pos),
            Tile::StairsDown => self.stairs_down = Some(pos),
            _ => {}
        }

        self.tiles[pos.y as usize][pos.x as usize] = tile;
        Ok(())
    }

    /// Turns an item or gold tile into floor and returns what was there.
    pub fn take_pickup(&mut self, pos: Position) -> Option<Tile> {
        match self.get_tile(pos)? {
            tile @ (Tile::Item | Tile::Gold) => {
                self.tiles[pos.y as usize][pos.x as usize] = Tile::Floor;
                Some(tile)
            }
            _ => None,
        }
    }

    /// Checks if the player can stand on a position.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(false, Tile::is_walkable)
    }

    pub fn stairs_up(&self) -> Option<Position> {
        self.stairs_up
    }

    pub fn stairs_down(&self) -> Option<Position> {
        self.stairs_down
    }

    /// Floor cells that held a monster marker in the description.
    pub fn monster_spawns(&self) -> &[Position] {
        &self.monster_spawns
    }

    /// Resolves where the player enters this level.
    ///
    /// The explicit start marker wins, then the first floor tile in row-major
    /// order, then the first walkable tile of any kind. The fixed fallback
    /// coordinate is used only when nothing on the grid is walkable.
    pub fn player_start_position(&self) -> Position {
        self.find_first(Tile::PlayerStart)
            .or_else(|| self.find_first(Tile::Floor))
            .or_else(|| self.first_walkable())
            .unwrap_or_else(|| {
                let (x, y) = config::FALLBACK_START;
                Position::new(x, y)
            })
    }

    /// All positions holding `tile`, in row-major order.
    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        self.iter_tiles()
            .filter(|(_, t)| *t == tile)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Copies the grid as characters, ready for monster and player overlays.
    pub fn to_char_grid(&self) -> Vec<Vec<char>> {
        self.tiles
            .iter()
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    fn find_first(&self, tile: Tile) -> Option<Position> {
        self.iter_tiles().find(|(_, t)| *t == tile).map(|(pos, _)| pos)
    }

    fn first_walkable(&self) -> Option<Position> {
        self.iter_tiles()
            .find(|(_, tile)| tile.is_walkable())
            .map(|(pos, _)| pos)
    }

    /// True when the player could stand somewhere on this floor.
    pub fn has_walkable_tile(&self) -> bool {
        self.first_walkable().is_some()
    }

    fn iter_tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), *tile))
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.tiles.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.symbol())?;
            }
        }
        Ok(())
    }
}

fn parse_header(line: &str) -> Option<u32> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    if !keyword.eq_ignore_ascii_case("LEVEL") && !keyword.eq_ignore_ascii_case("DEPTH") {
        return None;
    }
    let depth = tokens.next()?.parse::<u32>().ok()?;
    if depth == 0 || tokens.next().is_some() {
        return None;
    }
    Some(depth)
}
