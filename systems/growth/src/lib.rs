#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Growth decision system that turns a turn snapshot into organism commands.
//!
//! For every organism the system first checks that the remaining protein
//! stock covers a basic organ, then searches for the nearest reachable
//! protein A from each of the organism's organs. When no protein is reachable
//! it grows into the first open neighbour in compass order instead.

use organ_growth_board::Board;
use organ_growth_core::{
    Action, Cell, Direction, OrganId, OrganInfo, OrganKind, ProteinKind, TurnSnapshot,
};
use organ_growth_system_pathfinding::{find_nearest, path_directions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const GROWN_ORGAN: OrganKind = OrganKind::Basic;
const SOUGHT_PROTEIN: ProteinKind = ProteinKind::A;

/// How many organisms receive a decision each turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emission {
    /// One decision for every organism, grouped by root id.
    #[default]
    PerOrganism,
    /// Only the first own organ in entity-list order is considered.
    Single,
}

/// Cell a successful search grows into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthTarget {
    /// The protein cell itself.
    #[default]
    Resource,
    /// The first cell of the path toward the protein.
    NextStep,
}

/// Tunables applied by the growth system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GrowthPolicy {
    /// How many organisms are decided per turn.
    pub emission: Emission,
    /// Which cell a successful search grows into.
    pub growth_target: GrowthTarget,
}

/// What the system decided for one organism.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Grow toward the nearest reachable protein.
    Seek {
        /// Command to emit.
        action: Action,
        /// Path from the growing organ to the protein.
        path: Vec<Cell>,
    },
    /// No protein reachable; grow into an open neighbour.
    Fallback {
        /// Command to emit.
        action: Action,
    },
    /// The remaining stock does not cover a basic organ.
    InsufficientResources,
    /// No reachable protein and no open neighbour on any organ.
    NoMove,
}

impl Outcome {
    /// Command to print for this outcome.
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Seek { action, .. } | Self::Fallback { action } => *action,
            Self::InsufficientResources | Self::NoMove => Action::Wait,
        }
    }

    /// Reports whether the outcome grows a new organ.
    #[must_use]
    pub fn grows(&self) -> bool {
        matches!(self, Self::Seek { .. } | Self::Fallback { .. })
    }
}

/// Decision taken for one organism.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Root organ identifying the organism.
    pub root: OrganId,
    /// What the organism does this turn.
    pub outcome: Outcome,
}

/// Pure system that decides one growth command per organism.
#[derive(Clone, Debug, Default)]
pub struct Growth {
    policy: GrowthPolicy,
}

impl Growth {
    /// Creates a growth system applying the provided policy.
    #[must_use]
    pub const fn new(policy: GrowthPolicy) -> Self {
        Self { policy }
    }

    /// Policy applied by the system.
    #[must_use]
    pub const fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Consumes a snapshot and its board to emit one command per decision.
    pub fn handle(&self, snapshot: &TurnSnapshot, board: &Board, out: &mut Vec<Action>) {
        out.extend(
            self.decide(snapshot, board)
                .iter()
                .map(|decision| decision.outcome.action()),
        );
    }

    /// Decides every organism in first-appearance order.
    ///
    /// Each emitted growth pays the organ cost out of a running copy of the
    /// stock, so later organisms only grow while it still covers the cost.
    #[must_use]
    pub fn decide(&self, snapshot: &TurnSnapshot, board: &Board) -> Vec<Decision> {
        let cost = GROWN_ORGAN.cost();
        let mut stock = snapshot.my_stock;
        let mut decisions = Vec::new();

        for organism in organisms(snapshot, self.policy.emission) {
            if !stock.covers(cost) {
                info!(
                    root = %organism.root,
                    stock = stock.get(SOUGHT_PROTEIN),
                    "insufficient resources to grow"
                );
                decisions.push(Decision {
                    root: organism.root,
                    outcome: Outcome::InsufficientResources,
                });
                continue;
            }

            let outcome = organism
                .organs
                .iter()
                .find_map(|&(cell, organ)| self.decide_organ(board, cell, organ))
                .unwrap_or_else(|| {
                    info!(root = %organism.root, "no reachable protein and no open neighbour");
                    Outcome::NoMove
                });

            if outcome.grows() {
                stock = stock.spend(cost);
            }

            decisions.push(Decision {
                root: organism.root,
                outcome,
            });
        }

        decisions
    }

    fn decide_organ(&self, board: &Board, cell: Cell, organ: OrganInfo) -> Option<Outcome> {
        let search = find_nearest(board, cell, |candidate| {
            board.holds_protein(candidate, SOUGHT_PROTEIN)
        });

        if let Some(found) = search.target() {
            let path = search.path();
            debug!(
                organ = %organ.id,
                from = %cell,
                to = %found,
                steps = %describe_steps(&path),
                "protein reachable"
            );

            let destination = match self.policy.growth_target {
                GrowthTarget::Resource => Some(found),
                GrowthTarget::NextStep => path.get(1).copied().filter(|&next| board.is_open(next)),
            };

            if let Some(target) = destination {
                return Some(Outcome::Seek {
                    action: grow(organ.id, target),
                    path,
                });
            }
            debug!(organ = %organ.id, "first step toward protein is blocked");
        } else {
            debug!(organ = %organ.id, from = %cell, "no reachable protein");
        }

        Direction::ALL
            .iter()
            .filter_map(|&direction| cell.step(direction))
            .find(|&neighbor| board.is_open(neighbor))
            .map(|neighbor| Outcome::Fallback {
                action: grow(organ.id, neighbor),
            })
    }
}

#[derive(Debug)]
struct Organism {
    root: OrganId,
    organs: Vec<(Cell, OrganInfo)>,
}

fn organisms(snapshot: &TurnSnapshot, emission: Emission) -> Vec<Organism> {
    let mut grouped: Vec<Organism> = Vec::new();

    for (entity, organ) in snapshot.owned_organs() {
        if emission == Emission::Single {
            return vec![Organism {
                root: organ.root_id,
                organs: vec![(entity.cell, organ)],
            }];
        }

        match grouped
            .iter_mut()
            .find(|organism| organism.root == organ.root_id)
        {
            Some(organism) => organism.organs.push((entity.cell, organ)),
            None => grouped.push(Organism {
                root: organ.root_id,
                organs: vec![(entity.cell, organ)],
            }),
        }
    }

    grouped
}

fn grow(parent: OrganId, target: Cell) -> Action {
    Action::Grow {
        parent,
        target,
        organ: GROWN_ORGAN,
    }
}

fn describe_steps(path: &[Cell]) -> String {
    path_directions(path)
        .into_iter()
        .map(Direction::letter)
        .collect()
}
