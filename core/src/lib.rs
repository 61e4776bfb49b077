#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the organ growth agent.
//!
//! This crate defines the value types that connect the protocol adapter, the
//! per-turn board model, and the pure decision systems. Adapters decode a
//! [`TurnSnapshot`] from the game stream, systems derive immutable views from
//! it and respond exclusively with [`Action`] values that adapters print back
//! to the referee.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as x and y coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: u32,
    y: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// upper bounds are owned by whichever grid the caller queries.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| Cell::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| Cell::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| Cell::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Cell::new(x, self.y)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing y.
    North,
    /// Toward increasing x.
    East,
    /// Toward increasing y.
    South,
    /// Toward decreasing x.
    West,
}

impl Direction {
    /// Compass order used for every neighbour scan.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Single-letter protocol representation.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }

    /// Direction of a single step between two 4-adjacent cells.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }

        if to.x() > from.x() {
            Some(Self::East)
        } else if to.x() < from.x() {
            Some(Self::West)
        } else if to.y() > from.y() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }

    /// Parses an organ facing token, where `X` means the entity has no facing.
    pub fn parse_facing(token: &str) -> Result<Option<Direction>, ParseError> {
        match token {
            "N" => Ok(Some(Self::North)),
            "E" => Ok(Some(Self::East)),
            "S" => Ok(Some(Self::South)),
            "W" => Ok(Some(Self::West)),
            "X" => Ok(None),
            other => Err(ParseError::InvalidFacing(other.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Player owning an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// The agent's own organs.
    Mine,
    /// Organs belonging to the opponent.
    Enemy,
    /// Walls, proteins and anything else without a player.
    Neutral,
}

impl Owner {
    /// Decodes the protocol owner code (`1`, `0` or `-1`).
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            1 => Ok(Self::Mine),
            0 => Ok(Self::Enemy),
            -1 => Ok(Self::Neutral),
            other => Err(ParseError::InvalidOwner(other)),
        }
    }
}

/// Unique identifier assigned to an organ by the referee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganId(u32);

impl OrganId {
    /// Creates a new organ identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrganId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Protein kinds harvested from resource cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinKind {
    /// Protein A, the only kind consumed by basic growth.
    A,
    /// Protein B.
    B,
    /// Protein C.
    C,
    /// Protein D.
    D,
}

impl ProteinKind {
    /// Every protein kind in stock order.
    pub const ALL: [ProteinKind; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Protocol letter of the protein.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

/// Organ types an organism can grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganKind {
    /// Root organ anchoring an organism.
    Root,
    /// Plain growth organ.
    Basic,
    /// Organ that harvests the protein it faces.
    Harvester,
    /// Organ that attacks the cell it faces.
    Tentacle,
    /// Organ that can shoot a spore to found a new organism.
    Sporer,
}

impl OrganKind {
    /// Upper-case name used by the game protocol.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::Basic => "BASIC",
            Self::Harvester => "HARVESTER",
            Self::Tentacle => "TENTACLE",
            Self::Sporer => "SPORER",
        }
    }

    /// Protein cost of growing one organ of this kind.
    #[must_use]
    pub const fn cost(self) -> ProteinStock {
        match self {
            Self::Root => ProteinStock::new(1, 1, 1, 1),
            Self::Basic => ProteinStock::new(1, 0, 0, 0),
            Self::Harvester => ProteinStock::new(0, 0, 1, 1),
            Self::Tentacle => ProteinStock::new(0, 1, 1, 0),
            Self::Sporer => ProteinStock::new(0, 1, 0, 1),
        }
    }
}

impl fmt::Display for OrganKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What occupies a listed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Impassable wall.
    Wall,
    /// Organ of either player.
    Organ(OrganKind),
    /// Harvestable protein source.
    Protein(ProteinKind),
}

impl FromStr for EntityKind {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let kind = match value {
            "WALL" => Self::Wall,
            "ROOT" => Self::Organ(OrganKind::Root),
            "BASIC" => Self::Organ(OrganKind::Basic),
            "HARVESTER" => Self::Organ(OrganKind::Harvester),
            "TENTACLE" => Self::Organ(OrganKind::Tentacle),
            "SPORER" => Self::Organ(OrganKind::Sporer),
            "A" => Self::Protein(ProteinKind::A),
            "B" => Self::Protein(ProteinKind::B),
            "C" => Self::Protein(ProteinKind::C),
            "D" => Self::Protein(ProteinKind::D),
            other => return Err(ParseError::UnknownEntityType(other.to_owned())),
        };
        Ok(kind)
    }
}

/// Identity of an organ within its organism tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganInfo {
    /// Identifier of the organ itself.
    pub id: OrganId,
    /// Identifier of the organ it grew from, zero for roots.
    pub parent_id: OrganId,
    /// Identifier of the root organ of the organism.
    pub root_id: OrganId,
    /// Facing of the organ, if any.
    pub facing: Option<Direction>,
}

/// Immutable description of one listed cell for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Cell occupied by the entity.
    pub cell: Cell,
    /// What the entity is.
    pub kind: EntityKind,
    /// Player owning the entity.
    pub owner: Owner,
    /// Organ identity, present only for organs.
    pub organ: Option<OrganInfo>,
}

impl Entity {
    /// Organ identity if the entity is an organ owned by the agent.
    #[must_use]
    pub fn owned_organ(&self) -> Option<OrganInfo> {
        match (self.kind, self.owner) {
            (EntityKind::Organ(_), Owner::Mine) => self.organ,
            _ => None,
        }
    }
}

/// Per-player counts of the four protein kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinStock {
    counts: [i32; 4],
}

impl ProteinStock {
    /// Creates a stock from the four counts in protocol order.
    #[must_use]
    pub const fn new(a: i32, b: i32, c: i32, d: i32) -> Self {
        Self {
            counts: [a, b, c, d],
        }
    }

    /// Amount held of the provided protein kind.
    #[must_use]
    pub const fn get(&self, kind: ProteinKind) -> i32 {
        self.counts[kind as usize]
    }

    /// Reports whether every count covers the provided cost.
    #[must_use]
    pub fn covers(&self, cost: ProteinStock) -> bool {
        ProteinKind::ALL
            .iter()
            .all(|&kind| self.get(kind) >= cost.get(kind))
    }

    /// Stock left after paying the provided cost.
    #[must_use]
    pub fn spend(self, cost: ProteinStock) -> Self {
        let mut counts = self.counts;
        for (count, paid) in counts.iter_mut().zip(cost.counts) {
            *count = count.saturating_sub(paid);
        }
        Self { counts }
    }
}

/// Static grid dimensions announced before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Row-major offset of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(0);
        let height = usize::try_from(self.height).unwrap_or(0);
        width.checked_mul(height).unwrap_or(0)
    }
}

/// Everything the referee reports for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Grid dimensions, constant for the whole game.
    pub dimensions: Dimensions,
    /// Listed entities in protocol order.
    pub entities: Vec<Entity>,
    /// Agent's protein stock.
    pub my_stock: ProteinStock,
    /// Opponent's protein stock.
    pub opponent_stock: ProteinStock,
    /// Number of organisms expecting one command this turn.
    pub required_actions: u32,
}

impl TurnSnapshot {
    /// Owned organs in entity-list order.
    pub fn owned_organs(&self) -> impl Iterator<Item = (&Entity, OrganInfo)> {
        self.entities
            .iter()
            .filter_map(|entity| entity.owned_organ().map(|organ| (entity, organ)))
    }
}

/// Command emitted for one organism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Grows a new organ attached to `parent` at `target`.
    Grow {
        /// Organ the new organ grows from.
        parent: OrganId,
        /// Cell the new organ occupies, or steers toward.
        target: Cell,
        /// Type of the new organ.
        organ: OrganKind,
    },
    /// Explicit no-op for an organism without a legal move.
    Wait,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grow {
                parent,
                target,
                organ,
            } => write!(f, "GROW {parent} {} {} {organ}", target.x(), target.y()),
            Self::Wait => f.write_str("WAIT"),
        }
    }
}

/// Reasons a protocol token cannot be decoded into a core value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The entity type name is not part of the protocol.
    #[error("unknown entity type `{0}`")]
    UnknownEntityType(String),
    /// The owner code is not one of `1`, `0` or `-1`.
    #[error("invalid owner code {0}")]
    InvalidOwner(i64),
    /// The facing token is not one of `N`, `E`, `S`, `W` or `X`.
    #[error("invalid organ facing `{0}`")]
    InvalidFacing(String),
}
