use organ_growth_board::Board;
use organ_growth_core::{
    Action, Cell, Dimensions, Entity, EntityKind, OrganId, OrganInfo, OrganKind, Owner,
    ProteinKind, ProteinStock, TurnSnapshot,
};
use organ_growth_system_growth::{
    Decision, Emission, Growth, GrowthPolicy, GrowthTarget, Outcome,
};

/// Builds a snapshot from rows of glyphs: `#` wall, `a` protein A, `O` own
/// root starting a new organism, `o` basic organ of the latest root, `X`
/// enemy root. Organ ids are assigned in scan order starting at 1.
fn snapshot_from_rows(rows: &[&str], protein_a: i32) -> TurnSnapshot {
    let height = u32::try_from(rows.len()).expect("height fits u32");
    let width = u32::try_from(rows[0].len()).expect("width fits u32");
    let mut entities = Vec::new();
    let mut next_id = 1;
    let mut current_root = OrganId::new(0);
    let mut roots = 0;

    for (y, row) in rows.iter().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            let cell = Cell::new(
                u32::try_from(x).expect("x fits u32"),
                u32::try_from(y).expect("y fits u32"),
            );
            let entity = match glyph {
                '#' => Entity {
                    cell,
                    kind: EntityKind::Wall,
                    owner: Owner::Neutral,
                    organ: None,
                },
                'a' => Entity {
                    cell,
                    kind: EntityKind::Protein(ProteinKind::A),
                    owner: Owner::Neutral,
                    organ: None,
                },
                'O' | 'o' | 'X' => {
                    let id = OrganId::new(next_id);
                    next_id += 1;
                    let (kind, owner, parent_id, root_id) = match glyph {
                        'O' => {
                            current_root = id;
                            roots += 1;
                            (OrganKind::Root, Owner::Mine, OrganId::new(0), id)
                        }
                        'o' => (OrganKind::Basic, Owner::Mine, current_root, current_root),
                        _ => (OrganKind::Root, Owner::Enemy, OrganId::new(0), id),
                    };
                    Entity {
                        cell,
                        kind: EntityKind::Organ(kind),
                        owner,
                        organ: Some(OrganInfo {
                            id,
                            parent_id,
                            root_id,
                            facing: None,
                        }),
                    }
                }
                _ => continue,
            };
            entities.push(entity);
        }
    }

    TurnSnapshot {
        dimensions: Dimensions::new(width, height),
        entities,
        my_stock: ProteinStock::new(protein_a, 0, 0, 0),
        opponent_stock: ProteinStock::default(),
        required_actions: roots,
    }
}

fn decide(snapshot: &TurnSnapshot, policy: GrowthPolicy) -> Vec<Decision> {
    let board = Board::from_snapshot(snapshot).expect("fixture board");
    Growth::new(policy).decide(snapshot, &board)
}

fn grow(parent: u32, x: u32, y: u32) -> Action {
    Action::Grow {
        parent: OrganId::new(parent),
        target: Cell::new(x, y),
        organ: OrganKind::Basic,
    }
}

const WALL_COLUMN_WITH_GAP: &[&str] = &[
    "O...a", //
    "..#..", //
    "..#..", //
    "..#..", //
    "..#..", //
];

#[test]
fn grows_toward_nearest_protein() {
    let snapshot = snapshot_from_rows(WALL_COLUMN_WITH_GAP, 5);

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].root, OrganId::new(1));
    match &decisions[0].outcome {
        Outcome::Seek { action, path } => {
            assert_eq!(*action, grow(1, 4, 0));
            assert_eq!(path.len(), 5);
            assert_eq!(path.first(), Some(&Cell::new(0, 0)));
            assert_eq!(path.last(), Some(&Cell::new(4, 0)));
        }
        other => panic!("expected a seek outcome, got {other:?}"),
    }
}

#[test]
fn empty_stock_blocks_every_organism() {
    let snapshot = snapshot_from_rows(
        &[
            "O.a", //
            "...", //
            "O..", //
        ],
        0,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(decisions.len(), 2);
    assert!(decisions
        .iter()
        .all(|decision| decision.outcome == Outcome::InsufficientResources));
    assert!(decisions
        .iter()
        .all(|decision| decision.outcome.action() == Action::Wait));
}

#[test]
fn enclosed_organ_emits_no_action() {
    let snapshot = snapshot_from_rows(
        &[
            ".#..", //
            "#O#a", //
            ".#..", //
        ],
        3,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].outcome, Outcome::NoMove);
    assert_eq!(decisions[0].outcome.action(), Action::Wait);
}

#[test]
fn falls_back_to_only_open_neighbor() {
    let snapshot = snapshot_from_rows(
        &[
            ".....", //
            "..#..", //
            ".#O#.", //
            ".....", //
            ".....", //
        ],
        2,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(
        decisions,
        vec![Decision {
            root: OrganId::new(1),
            outcome: Outcome::Fallback {
                action: grow(1, 2, 3),
            },
        }]
    );
    assert_eq!(decisions[0].outcome.action().to_string(), "GROW 1 2 3 BASIC");
}

#[test]
fn fallback_skips_enemy_organs_and_follows_compass_order() {
    let snapshot = snapshot_from_rows(
        &[
            "###", //
            "#OX", //
            "...", //
        ],
        1,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(
        decisions[0].outcome,
        Outcome::Fallback {
            action: grow(1, 1, 2),
        }
    );
}

#[test]
fn decides_once_per_organism() {
    let snapshot = snapshot_from_rows(
        &[
            "O..a", //
            "####", //
            "O...", //
        ],
        4,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());
    let actions: Vec<_> = decisions
        .iter()
        .map(|decision| decision.outcome.action())
        .collect();

    assert_eq!(actions, vec![grow(1, 3, 0), grow(2, 1, 2)]);
}

#[test]
fn stock_runs_out_across_organisms() {
    let snapshot = snapshot_from_rows(
        &[
            "O..a", //
            "####", //
            "O..a", //
        ],
        1,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(decisions.len(), 2);
    assert!(decisions[0].outcome.grows());
    assert_eq!(decisions[1].outcome, Outcome::InsufficientResources);
}

#[test]
fn single_emission_stops_after_first_organ() {
    let snapshot = snapshot_from_rows(
        &[
            "O..a", //
            "####", //
            "O..a", //
        ],
        4,
    );
    let policy = GrowthPolicy {
        emission: Emission::Single,
        ..GrowthPolicy::default()
    };

    let decisions = decide(&snapshot, policy);

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].outcome.action(), grow(1, 3, 0));
}

#[test]
fn organism_tries_each_organ_in_turn() {
    let snapshot = snapshot_from_rows(
        &[
            "O#..", //
            "o...", //
            "#...", //
        ],
        1,
    );

    let decisions = decide(&snapshot, GrowthPolicy::default());

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].root, OrganId::new(1));
    assert_eq!(
        decisions[0].outcome,
        Outcome::Fallback {
            action: grow(2, 1, 1),
        }
    );
}

#[test]
fn next_step_target_grows_along_path() {
    let snapshot = snapshot_from_rows(WALL_COLUMN_WITH_GAP, 5);
    let policy = GrowthPolicy {
        growth_target: GrowthTarget::NextStep,
        ..GrowthPolicy::default()
    };

    let decisions = decide(&snapshot, policy);

    assert_eq!(decisions[0].outcome.action(), grow(1, 1, 0));
}

#[test]
fn blocked_next_step_falls_back_to_open_neighbor() {
    let snapshot = snapshot_from_rows(
        &[
            "OX.a", //
            "....", //
        ],
        5,
    );
    let policy = GrowthPolicy {
        growth_target: GrowthTarget::NextStep,
        ..GrowthPolicy::default()
    };

    let decisions = decide(&snapshot, policy);

    assert_eq!(
        decisions[0].outcome,
        Outcome::Fallback {
            action: grow(1, 0, 1),
        }
    );
}

#[test]
fn handle_emits_one_command_per_decision() {
    let snapshot = snapshot_from_rows(
        &[
            "O..a", //
            "####", //
            "O..a", //
        ],
        1,
    );
    let board = Board::from_snapshot(&snapshot).expect("fixture board");
    let mut commands = Vec::new();

    Growth::default().handle(&snapshot, &board, &mut commands);

    assert_eq!(commands, vec![grow(1, 3, 0), Action::Wait]);
}
