//! End-to-end allocation scenarios: single players, concurrent players,
//! conflicting submissions, and policy ordering.

use std::sync::Arc;

use grapevine_engine::{GameEngine, NewGameParams, PlayState, Task};
use grapevine_store::{GameStore, InMemoryAudioStore, InMemoryGameStore};
use grapevine_types::audio::wav_stub;
use grapevine_types::{ChainOrder, Game, SessionProgress};

fn engine() -> GameEngine {
    GameEngine::new(
        Arc::new(InMemoryGameStore::new()),
        Arc::new(InMemoryAudioStore::new()),
    )
}

fn instructed() -> SessionProgress {
    SessionProgress {
        instructed: true,
        ..SessionProgress::default()
    }
}

fn take(state: PlayState) -> Task {
    match state {
        PlayState::Task(task) => task,
        other => panic!("expected a task, got {other:?}"),
    }
}

fn make_game(engine: &GameEngine, num_chains: u32) -> Game {
    engine
        .new_game(NewGameParams {
            num_chains,
            ..NewGameParams::default()
        })
        .unwrap()
}

/// Single player, single chain: pick seed, submit, replicate, complete.
#[test]
fn single_player_single_chain() {
    let engine = engine();
    let game = make_game(&engine, 1);
    let mut session = instructed();

    let task = take(engine.play(game.id, &session).unwrap());
    assert!(task.message.is_seed());

    let outcome = engine
        .respond(&mut session, task.message.id, &wav_stub(b"first whisper"))
        .unwrap();

    // The seed is filled and exactly one new empty child exists.
    let chain = engine.chains(game.id).unwrap()[0];
    let messages = engine.store().messages(chain.id).unwrap();
    assert_eq!(messages.len(), 2);
    assert!(!messages[0].is_empty());
    assert!(messages[1].is_empty());
    assert_eq!(messages[1].parent, Some(messages[0].id));

    // With the chain in the receipts, the player is complete.
    assert!(matches!(outcome.next, PlayState::Complete { .. }));
    assert_eq!(session.receipts, vec![chain.id]);
    assert!(matches!(
        engine.play(game.id, &session).unwrap(),
        PlayState::Complete { .. }
    ));
}

/// Two players on one chain land on successive generations.
#[test]
fn two_players_sequential_generations() {
    let engine = engine();
    let game = make_game(&engine, 1);

    let mut player_a = instructed();
    let task_a = take(engine.play(game.id, &player_a).unwrap());
    engine
        .respond(&mut player_a, task_a.message.id, &wav_stub(b"gen zero"))
        .unwrap();

    // Player B has no receipts, so the same chain is picked, but the slot
    // is the generation-1 child, not the filled seed.
    let player_b = instructed();
    let task_b = take(engine.play(game.id, &player_b).unwrap());
    assert_eq!(task_b.message.chain, task_a.message.chain);
    assert_eq!(task_b.message.generation, 1);
    assert_eq!(task_b.message.parent, Some(task_a.message.id));
}

/// Fork on conflict: both players fetched the same empty slot; both submit;
/// nobody gets an error and the tree gains a branch.
#[test]
fn fork_on_conflicting_submissions() {
    let engine = engine();
    let game = make_game(&engine, 1);
    let chain = engine.chains(game.id).unwrap()[0];

    // Seed the chain so the contested slot has a parent.
    let seed = engine.store().messages(chain.id).unwrap()[0].clone();
    engine.upload(seed.id, &wav_stub(b"the seed")).unwrap();
    let contested = engine.store().messages(chain.id).unwrap()[1].clone();

    // Both sessions were shown `contested` before either submitted.
    let mut first = instructed();
    let mut second = instructed();

    let outcome_first = engine
        .respond(&mut first, contested.id, &wav_stub(b"take one"))
        .unwrap();
    assert!(!outcome_first.forked);
    assert_eq!(outcome_first.message.id, contested.id);

    let outcome_second = engine
        .respond(&mut second, contested.id, &wav_stub(b"take two"))
        .unwrap();
    assert!(outcome_second.forked);
    assert_ne!(outcome_second.message.id, contested.id);
    assert_eq!(outcome_second.message.parent, contested.parent);
    assert_eq!(outcome_second.message.generation, contested.generation);

    // The parent now has two filled children, each with one empty child.
    let messages = engine.store().messages(chain.id).unwrap();
    let children: Vec<_> = messages
        .iter()
        .filter(|m| m.parent == Some(seed.id))
        .collect();
    assert_eq!(children.len(), 2);
    for child in children {
        assert!(!child.is_empty());
        let grandchildren: Vec<_> = messages
            .iter()
            .filter(|m| m.parent == Some(child.id))
            .collect();
        assert_eq!(grandchildren.len(), 1);
        assert!(grandchildren[0].is_empty());
    }

    // Both recordings were kept, at distinct paths of the same generation.
    let path_first = outcome_first.message.audio.unwrap();
    let path_second = outcome_second.message.audio.unwrap();
    assert_ne!(path_first, path_second);
    assert!(path_first.as_str().starts_with("game-1/chain-1/1"));
    assert!(path_second.as_str().starts_with("game-1/chain-1/1"));
}

/// Sequential games walk their chains in creation order.
#[test]
fn sequential_policy_orders_chains() {
    let engine = engine();
    let game = make_game(&engine, 3);
    let chains = engine.chains(game.id).unwrap();
    assert_eq!(game.chain_order, ChainOrder::Sequential);

    let mut session = instructed();
    for expected in &chains {
        let task = take(engine.play(game.id, &session).unwrap());
        assert_eq!(task.message.chain, expected.id);
        engine
            .respond(&mut session, task.message.id, &wav_stub(b"next"))
            .unwrap();
    }

    // All three chains in the receipts: complete, with a stable code.
    match engine.play(game.id, &session).unwrap() {
        PlayState::Complete {
            completion_code, ..
        } => {
            let expected = format!(
                "G{}-{}",
                game.id,
                session
                    .messages
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("-")
            );
            assert_eq!(completion_code, expected);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

/// A cleared session replays the game against now-filled slots.
#[test]
fn cleared_session_replays_on_new_slots() {
    let engine = engine();
    let game = make_game(&engine, 1);

    let mut session = instructed();
    let first_task = take(engine.play(game.id, &session).unwrap());
    engine
        .respond(&mut session, first_task.message.id, &wav_stub(b"pass one"))
        .unwrap();

    engine.clear_session(&mut session);
    engine.accept_instructions(&mut session);

    // Second pass: the seed is taken, so the task is its child, and the
    // prompt is the recording from the first pass.
    let second_task = take(engine.play(game.id, &session).unwrap());
    assert_ne!(second_task.message.id, first_task.message.id);
    assert_eq!(second_task.message.parent, Some(first_task.message.id));
    assert!(second_task.prompt_audio.is_some());
}

/// Replication holds transitively: after any number of submissions, every
/// filled message has at least one empty child.
#[test]
fn every_filled_message_keeps_an_empty_child() {
    let engine = engine();
    let game = make_game(&engine, 2);

    // Three players play the game to completion each.
    for _ in 0..3 {
        let mut session = instructed();
        loop {
            match engine.play(game.id, &session).unwrap() {
                PlayState::Task(task) => {
                    engine
                        .respond(&mut session, task.message.id, &wav_stub(b"pass it on"))
                        .unwrap();
                }
                PlayState::Complete { .. } => break,
                PlayState::Instruct { .. } => unreachable!("session is instructed"),
            }
        }
    }

    for chain in engine.chains(game.id).unwrap() {
        let messages = engine.store().messages(chain.id).unwrap();
        for filled in messages.iter().filter(|m| !m.is_empty()) {
            let has_empty_child = messages
                .iter()
                .any(|m| m.parent == Some(filled.id) && m.is_empty());
            assert!(
                has_empty_child,
                "filled message {} lost its empty child",
                filled.id
            );
        }
    }
}
