#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn grid model derived from the referee's entity list.
//!
//! The board is rebuilt from scratch for every [`TurnSnapshot`] and never
//! mutated afterwards. Every listed entity is recorded once in a dense,
//! row-major classification grid so systems can answer point queries without
//! scanning the entity list.

mod render;

use organ_growth_core::{Cell, Dimensions, Entity, EntityKind, Owner, ProteinKind, TurnSnapshot};
use thiserror::Error;
use tracing::debug;

/// What a single cell holds this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Nothing listed at the cell.
    #[default]
    Empty,
    /// Impassable wall.
    Wall,
    /// Organ owned by the agent.
    OwnedOrgan,
    /// Organ owned by the opponent.
    EnemyOrgan,
    /// Protein source of the given kind.
    Resource(ProteinKind),
}

/// Reasons a turn snapshot cannot be turned into a board.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// An entity was listed outside the announced grid.
    #[error("entity at {cell} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Cell reported for the entity.
        cell: Cell,
        /// Grid width announced at game start.
        width: u32,
        /// Grid height announced at game start.
        height: u32,
    },
    /// An organ was reported without a player owner.
    #[error("organ at {cell} is not owned by a player")]
    UnownedOrgan {
        /// Cell reported for the organ.
        cell: Cell,
    },
}

/// Read-only classification of every cell for the current turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    dimensions: Dimensions,
    cells: Vec<Classification>,
}

impl Board {
    /// Builds the board for the provided turn snapshot.
    pub fn from_snapshot(snapshot: &TurnSnapshot) -> Result<Self, BoardError> {
        Self::from_entities(snapshot.dimensions, &snapshot.entities)
    }

    /// Builds the board by scanning the entity list once.
    ///
    /// Cells without an entity are [`Classification::Empty`]. When two
    /// entities share a cell the later one wins.
    pub fn from_entities(dimensions: Dimensions, entities: &[Entity]) -> Result<Self, BoardError> {
        let mut cells = vec![Classification::Empty; dimensions.cell_count()];

        for entity in entities {
            let Some(index) = dimensions.index(entity.cell) else {
                return Err(BoardError::OutOfBounds {
                    cell: entity.cell,
                    width: dimensions.width(),
                    height: dimensions.height(),
                });
            };

            let classification = classify_entity(entity)?;
            let slot = &mut cells[index];
            if *slot != Classification::Empty {
                debug!(
                    cell = %entity.cell,
                    previous = ?slot,
                    next = ?classification,
                    "overlapping entities, keeping the later one"
                );
            }
            *slot = classification;
        }

        Ok(Self { dimensions, cells })
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height()
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        self.dimensions.contains(cell)
    }

    /// Classification of the cell, or `None` outside the grid.
    #[must_use]
    pub fn classify(&self, cell: Cell) -> Option<Classification> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell holds a wall.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.classify(cell) == Some(Classification::Wall)
    }

    /// Reports whether an organ of either player occupies the cell.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant_owner(cell) != Owner::Neutral
    }

    /// Player owning the organ at the cell, [`Owner::Neutral`] otherwise.
    #[must_use]
    pub fn occupant_owner(&self, cell: Cell) -> Owner {
        match self.classify(cell) {
            Some(Classification::OwnedOrgan) => Owner::Mine,
            Some(Classification::EnemyOrgan) => Owner::Enemy,
            _ => Owner::Neutral,
        }
    }

    /// Reports whether a new organ could be placed at the cell.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell) && !self.is_occupied(cell)
    }

    /// Reports whether the cell holds a protein source of the given kind.
    #[must_use]
    pub fn holds_protein(&self, cell: Cell, kind: ProteinKind) -> bool {
        self.classify(cell) == Some(Classification::Resource(kind))
    }

    /// Dense classifications stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Classification] {
        &self.cells
    }
}

fn classify_entity(entity: &Entity) -> Result<Classification, BoardError> {
    let classification = match entity.kind {
        EntityKind::Wall => Classification::Wall,
        EntityKind::Protein(kind) => Classification::Resource(kind),
        EntityKind::Organ(_) => match entity.owner {
            Owner::Mine => Classification::OwnedOrgan,
            Owner::Enemy => Classification::EnemyOrgan,
            Owner::Neutral => return Err(BoardError::UnownedOrgan { cell: entity.cell }),
        },
    };
    Ok(classification)
}
