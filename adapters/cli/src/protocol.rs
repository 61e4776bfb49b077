//! Referee protocol: whitespace-separated turn input and command output.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result};
use organ_growth_board::BoardError;
use organ_growth_core::{
    Action, Cell, Dimensions, Direction, Entity, EntityKind, OrganId, OrganInfo, Owner,
    ParseError, ProteinStock, TurnSnapshot,
};
use thiserror::Error;
use tracing::warn;

/// Entity fields exactly as the referee sent them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawEntity {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) kind: String,
    pub(crate) owner: i64,
    pub(crate) organ_id: i64,
    pub(crate) facing: String,
    pub(crate) parent_id: i64,
    pub(crate) root_id: i64,
}

/// One turn of referee input before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawTurn {
    pub(crate) entities: Vec<RawEntity>,
    pub(crate) my_stock: ProteinStock,
    pub(crate) opponent_stock: ProteinStock,
    pub(crate) required_actions: u32,
}

/// Reasons a fully read turn is rejected.
#[derive(Debug, Error)]
pub(crate) enum TurnError {
    /// A token of an entity could not be decoded.
    #[error("entity #{index}: {source}")]
    Entity {
        index: usize,
        #[source]
        source: ParseError,
    },
    /// An entity reported a negative coordinate.
    #[error("entity #{index}: coordinate ({x}, {y}) is negative")]
    NegativeCoordinate { index: usize, x: i64, y: i64 },
    /// An organ reported an id that does not fit the id range.
    #[error("entity #{index}: organ id {value} is out of range")]
    InvalidOrganId { index: usize, value: i64 },
    /// The entities do not fit the grid.
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl RawTurn {
    /// Validates the raw fields into a turn snapshot.
    pub(crate) fn into_snapshot(self, dimensions: Dimensions) -> Result<TurnSnapshot, TurnError> {
        let entities = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, raw)| decode_entity(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TurnSnapshot {
            dimensions,
            entities,
            my_stock: self.my_stock,
            opponent_stock: self.opponent_stock,
            required_actions: self.required_actions,
        })
    }
}

fn decode_entity(index: usize, raw: &RawEntity) -> Result<Entity, TurnError> {
    let entity_error = |source| TurnError::Entity { index, source };

    let kind: EntityKind = raw.kind.parse().map_err(entity_error)?;
    let owner = Owner::from_code(raw.owner).map_err(entity_error)?;
    let (Ok(x), Ok(y)) = (u32::try_from(raw.x), u32::try_from(raw.y)) else {
        return Err(TurnError::NegativeCoordinate {
            index,
            x: raw.x,
            y: raw.y,
        });
    };

    let organ = match kind {
        EntityKind::Organ(_) => {
            let organ_id = |value: i64| {
                u32::try_from(value)
                    .map(OrganId::new)
                    .map_err(|_| TurnError::InvalidOrganId { index, value })
            };
            Some(OrganInfo {
                id: organ_id(raw.organ_id)?,
                parent_id: organ_id(raw.parent_id)?,
                root_id: organ_id(raw.root_id)?,
                facing: Direction::parse_facing(&raw.facing).map_err(entity_error)?,
            })
        }
        EntityKind::Wall | EntityKind::Protein(_) => None,
    };

    Ok(Entity {
        cell: Cell::new(x, y),
        kind,
        owner,
        organ,
    })
}

/// Pulls whitespace-separated tokens from the referee, line breaks ignored.
#[derive(Debug)]
pub(crate) struct TurnReader<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TurnReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Reads the grid dimensions, or `None` if the input is already closed.
    pub(crate) fn read_dimensions(&mut self) -> Result<Option<Dimensions>> {
        let Some(width) = self.next_token()? else {
            return Ok(None);
        };
        let width = parse_token(&width, "grid width")?;
        let height = self.expect_number("grid height")?;
        Ok(Some(Dimensions::new(width, height)))
    }

    /// Reads one full turn, or `None` when the input ends between turns.
    pub(crate) fn read_turn(&mut self) -> Result<Option<RawTurn>> {
        let Some(count) = self.next_token()? else {
            return Ok(None);
        };
        let count: usize = parse_token(&count, "entity count")?;

        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            entities.push(RawEntity {
                x: self.expect_number("entity x")?,
                y: self.expect_number("entity y")?,
                kind: self.expect_token("entity type")?,
                owner: self.expect_number("entity owner")?,
                organ_id: self.expect_number("organ id")?,
                facing: self.expect_token("organ facing")?,
                parent_id: self.expect_number("organ parent id")?,
                root_id: self.expect_number("organ root id")?,
            });
        }

        let my_stock = self.read_stock("own stock")?;
        let opponent_stock = self.read_stock("opponent stock")?;
        let required_actions = self.expect_number("required action count")?;

        Ok(Some(RawTurn {
            entities,
            my_stock,
            opponent_stock,
            required_actions,
        }))
    }

    fn read_stock(&mut self, what: &str) -> Result<ProteinStock> {
        let mut counts = [0_i32; 4];
        for count in &mut counts {
            *count = self.expect_number(what)?;
        }
        let [a, b, c, d] = counts;
        Ok(ProteinStock::new(a, b, c, d))
    }

    fn expect_number<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let token = self.expect_token(what)?;
        parse_token(&token, what)
    }

    fn expect_token(&mut self, what: &str) -> Result<String> {
        self.next_token()?
            .with_context(|| format!("input ended while reading {what}"))
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read referee input")?;
            if read == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

fn parse_token<T>(token: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    token
        .parse()
        .with_context(|| format!("invalid {what} `{token}`"))
}

/// Writes exactly `required` command lines, padding with `WAIT`.
pub(crate) fn write_actions<W: Write>(
    out: &mut W,
    required: u32,
    actions: &[Action],
) -> io::Result<()> {
    let required = usize::try_from(required).unwrap_or(usize::MAX);
    if actions.len() > required {
        warn!(
            decided = actions.len(),
            required, "more decisions than requested commands, dropping the rest"
        );
    }

    for index in 0..required {
        let action = actions.get(index).copied().unwrap_or(Action::Wait);
        writeln!(out, "{action}")?;
    }
    Ok(())
}
