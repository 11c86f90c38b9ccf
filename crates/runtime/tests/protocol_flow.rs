//! End-to-end protocol tests against a live authority.

mod common;

use std::time::Duration;

use arena_core::{
    Action, Blinding, DiscloseMove, ErrorSeverity, GameConfig, Hero, MatchPhase, NextCall,
    ProtocolError, RoundCommand, RoundMoves, RoundOutcome, Seat, Stance, TransitionPhase,
};
use arena_runtime::{Event, MatchEvent, PlayerSession, ProtocolEvent, RuntimeError, Topic};
use tokio::time::timeout;

use common::{all, memory_store, seated_match, secret, start};

#[tokio::test]
async fn symmetric_round_trades_equal_damage() {
    let runtime = start();
    let (mut p1, mut p2) = seated_match(&runtime).await;
    assert_eq!(p1.snapshot().phase, MatchPhase::P1Commit);
    assert_eq!(p1.snapshot().version, 4);

    p1.set_pending_moves(all(0, Stance::Neutral)).unwrap();
    let committed = p1.publish_commitment().await.unwrap();
    assert_eq!(committed.outcome.to, MatchPhase::P2CommitAndReveal);

    let p2_view = p2.view().await.unwrap();
    assert!(p2_view.opponent_committed);
    assert_eq!(p2_view.opponent_moves, None);
    assert_eq!(p2_view.next_call, Some(NextCall::SubmitCleartextMove));

    p2.submit_cleartext_move(all(0, Stance::Neutral)).await.unwrap();

    let p1_view = p1.view().await.unwrap();
    assert_eq!(p1_view.opponent_moves, Some(all(0, Stance::Neutral)));
    assert_eq!(p1_view.next_call, Some(NextCall::DiscloseMove));

    let receipt = p1.disclose_move().await.unwrap();
    let report = receipt.outcome.report.expect("disclosure resolves the round");

    assert_eq!(report.round, 1);
    assert_eq!(report.damage[0], report.damage[1]);
    assert_eq!(report.damage[0], [30, 0, 0]);
    assert_eq!(report.outcome, RoundOutcome::Continue);
    assert_eq!(receipt.state.phase, MatchPhase::P1Commit);
    assert_eq!(receipt.state.round, 1);
    assert_eq!(receipt.state.version, 7);

    // Disclosure and submission both consume the pending cache.
    assert_eq!(p1.get_private_state().unwrap().pending, None);
    assert_eq!(p2.get_private_state().unwrap().pending, None);

    let p1_view = p1.current_view().unwrap();
    let p2_view = p2.view().await.unwrap();
    assert_eq!(p1_view.allies[0].health, GameConfig::MAX_HP - 30);
    assert_eq!(p2_view.enemies[0].health, GameConfig::MAX_HP - 30);
    assert_eq!(p1_view.allies[0].damage, p2_view.enemies[0].damage);
}

#[tokio::test]
async fn repeated_selection_is_rejected_without_touching_state() {
    let runtime = start();
    let handle = runtime.handle();
    let mut p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();

    p1.select_first_hero(Hero::UNARMED).await.unwrap();
    let before = handle.query(p1.match_id()).await.unwrap();

    let err = p1.select_first_hero(Hero::UNARMED).await.unwrap_err();
    let RuntimeError::Rejected(rejection) = &err else {
        panic!("expected a protocol rejection, got {err:?}");
    };
    assert_eq!(rejection.expected, MatchPhase::SelectingP1First);
    assert_eq!(rejection.observed(), MatchPhase::SelectingP2First);
    assert_eq!(rejection.stage, TransitionPhase::PreValidate);
    assert!(matches!(rejection.error, ProtocolError::WrongPhase { .. }));
    assert!(!err.is_retryable());
    assert_eq!(err.severity(), ErrorSeverity::Validation);

    let after = handle.query(p1.match_id()).await.unwrap();
    assert_eq!(*before, *after);
}

#[tokio::test]
async fn outdated_view_is_a_retryable_stale_write() {
    let runtime = start();
    let handle = runtime.handle();
    let mut p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();
    let mut p2 = PlayerSession::join(handle.clone(), memory_store(), secret(2), p1.match_id())
        .await
        .unwrap();
    let mut rejections = handle.subscribe(Topic::Protocol);

    p1.select_first_hero(Hero::UNARMED).await.unwrap();

    // p2 still holds the version-0 snapshot.
    let err = p2
        .select_first_two_heroes([Hero::UNARMED; 2])
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        RuntimeError::StaleWrite {
            expected: MatchPhase::SelectingP1First,
            observed: MatchPhase::SelectingP2First,
            expected_version: 0,
            observed_version: 1,
            ..
        }
    ));

    let Event::Protocol(ProtocolEvent::Rejected {
        retryable,
        expected,
        observed,
        ..
    }) = rejections.recv().await.unwrap()
    else {
        panic!("expected a protocol rejection event");
    };
    assert!(retryable);
    assert_eq!(expected, MatchPhase::SelectingP1First);
    assert_eq!(observed, MatchPhase::SelectingP2First);

    p2.refresh().await.unwrap();
    let receipt = p2
        .select_first_two_heroes([Hero::UNARMED; 2])
        .await
        .unwrap();
    assert_eq!(receipt.state.p2.player, Some(p2.player_id()));
}

#[tokio::test]
async fn wrong_player_cannot_act_for_p1() {
    let runtime = start();
    let handle = runtime.handle();
    let p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();
    let mut intruder = PlayerSession::join(handle, memory_store(), secret(3), p1.match_id())
        .await
        .unwrap();

    let view = intruder.view().await.unwrap();
    assert_eq!(view.seat, Seat::Open);
    assert!(!view.my_turn());

    let err = intruder.select_first_hero(Hero::UNARMED).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Rejected(ref rejection)
            if matches!(rejection.error, ProtocolError::NotYourTurn { .. })
    ));
}

#[tokio::test]
async fn altered_disclosure_is_fatal_and_leaves_the_round_open() {
    let runtime = start();
    let handle = runtime.handle();
    let (mut p1, mut p2) = seated_match(&runtime).await;
    let mut rejections = handle.subscribe(Topic::Protocol);

    p1.set_pending_moves(all(1, Stance::Aggressive)).unwrap();
    p1.publish_commitment().await.unwrap();
    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(2, Stance::Defensive)).await.unwrap();
    let before = p1.refresh().await.unwrap();
    let nonce = before.nonce.expect("nonce published with the commitment");

    let forged = DiscloseMove {
        moves: all(2, Stance::Aggressive),
        blinding: arena_core::commit::blinding(&secret(1), &nonce),
    };
    let err = handle
        .submit(
            p1.match_id(),
            p1.precondition(),
            Action::new(p1.player_id(), forged.into()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
    assert!(matches!(
        err,
        RuntimeError::Rejected(ref rejection)
            if matches!(rejection.error, ProtocolError::CommitmentMismatch { .. })
    ));

    let wrong_key = DiscloseMove {
        moves: all(1, Stance::Aggressive),
        blinding: Blinding::from_bytes([0; 32]),
    };
    let err = handle
        .submit(
            p1.match_id(),
            p1.precondition(),
            Action::new(p1.player_id(), wrong_key.into()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.severity(), ErrorSeverity::Fatal);

    let Event::Protocol(ProtocolEvent::Rejected {
        severity, retryable, ..
    }) = rejections.recv().await.unwrap()
    else {
        panic!("expected a protocol rejection event");
    };
    assert_eq!(severity, ErrorSeverity::Fatal);
    assert!(!retryable);

    assert_eq!(handle.query(p1.match_id()).await.unwrap(), before);

    // The honest disclosure still goes through.
    let receipt = p1.disclose_move().await.unwrap();
    assert_eq!(receipt.outcome.report.unwrap().moves[0], all(1, Stance::Aggressive));
}

#[tokio::test]
async fn commitment_without_pending_moves_is_refused_locally() {
    let runtime = start();
    let (mut p1, _p2) = seated_match(&runtime).await;

    let err = p1.publish_commitment().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::MissingPendingMoves {
            phase: MatchPhase::P1Commit,
            ..
        }
    ));
    assert_eq!(p1.refresh().await.unwrap().version, 4);
}

#[tokio::test]
async fn undisclosable_moves_are_never_committed() {
    let runtime = start();
    let (mut p1, _p2) = seated_match(&runtime).await;

    for target in [5, RoundCommand::NO_TARGET] {
        let moves = RoundMoves::from_parts([target, 0, 0], [Stance::Neutral; 3]);
        let err = p1.set_pending_moves(moves).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidMoves {
                source: ProtocolError::InvalidTarget { hero: 0, alive: true, .. },
                ..
            }
        ));
        assert_eq!(p1.get_private_state().unwrap().pending, None);
    }

    // A cache written behind the session's back is checked again at commit time.
    let private = p1
        .get_private_state()
        .unwrap()
        .with_pending(RoundMoves::from_parts([0, 5, 0], [Stance::Neutral; 3]));
    p1.set_private_state(&private).unwrap();

    let err = p1.publish_commitment().await.unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidMoves { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Validation);

    let state = p1.refresh().await.unwrap();
    assert_eq!(state.phase, MatchPhase::P1Commit);
    assert_eq!(state.version, 4);
    assert_eq!(state.commitment, None);
}

#[tokio::test]
async fn disclosure_from_an_outdated_view_catches_up_first() {
    let runtime = start();
    let (mut p1, mut p2) = seated_match(&runtime).await;

    // Second session for P1 that stops watching before the commitment.
    let mut behind = PlayerSession::join(runtime.handle(), memory_store(), secret(1), p1.match_id())
        .await
        .unwrap();
    assert_eq!(behind.snapshot().phase, MatchPhase::P1Commit);

    p1.set_pending_moves(all(2, Stance::Defensive)).unwrap();
    p1.publish_commitment().await.unwrap();
    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(0, Stance::Neutral)).await.unwrap();

    let receipt = behind.disclose_move().await.unwrap();
    assert_eq!(receipt.outcome.report.unwrap().moves[0], all(2, Stance::Defensive));
    assert_eq!(receipt.state.phase, MatchPhase::P1Commit);
    assert_eq!(receipt.state.version, 7);
}

#[tokio::test]
async fn event_bus_reports_the_match_lifecycle() {
    let runtime = start();
    let handle = runtime.handle();
    let mut events = handle.subscribe(Topic::Match);

    let (mut p1, mut p2) = seated_match(&runtime).await;
    p1.set_pending_moves(all(0, Stance::Neutral)).unwrap();
    p1.publish_commitment().await.unwrap();
    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(0, Stance::Neutral)).await.unwrap();
    p1.refresh().await.unwrap();
    p1.disclose_move().await.unwrap();

    let mut accepted = Vec::new();
    let mut resolved = None;
    while resolved.is_none() {
        let event = timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("event within timeout")
            .unwrap();
        match event {
            Event::Match(MatchEvent::Created { summary }) => {
                assert_eq!(summary.match_id, p1.match_id());
                assert_eq!(summary.p1, Some(p1.player_id()));
            }
            Event::Match(MatchEvent::ActionAccepted { action, version, .. }) => {
                accepted.push((action, version));
            }
            Event::Match(MatchEvent::RoundResolved { report, .. }) => resolved = Some(report),
            other => panic!("unexpected event {other:?}"),
        }
    }

    let names: Vec<_> = accepted.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        [
            "select_first_hero",
            "select_first_two_heroes",
            "select_last_two_heroes",
            "select_last_hero",
            "publish_commitment",
            "submit_cleartext_move",
            "disclose_move",
        ]
    );
    assert!(accepted.iter().map(|(_, version)| *version).eq(1..=7));
    assert_eq!(resolved.unwrap().round, 1);
}

#[tokio::test]
async fn state_stream_delivers_every_accepted_write() {
    let runtime = start();
    let handle = runtime.handle();
    let mut p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();
    let mut stream = p1.subscribe().await.unwrap();
    assert_eq!(stream.borrow_and_update().version, 0);

    p1.select_first_hero(Hero::UNARMED).await.unwrap();

    timeout(Duration::from_secs(5), stream.changed())
        .await
        .expect("update within timeout")
        .unwrap();
    let snapshot = stream.borrow_and_update().clone();
    assert_eq!(snapshot.phase, MatchPhase::SelectingP2First);
    assert_eq!(snapshot.version, 1);
}

#[tokio::test]
async fn directory_queries_track_open_and_running_matches() {
    let runtime = start();
    let handle = runtime.handle();
    let mut p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();
    let match_id = p1.match_id();

    let open = handle.open_matches().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].match_id, match_id);
    assert!(handle.matches_for(secret(2).player_id()).await.unwrap().is_empty());

    p1.select_first_hero(Hero::UNARMED).await.unwrap();
    let mut p2 = PlayerSession::join(handle.clone(), memory_store(), secret(2), match_id)
        .await
        .unwrap();
    p2.select_first_two_heroes([Hero::UNARMED; 2]).await.unwrap();

    assert!(handle.open_matches().await.unwrap().is_empty());
    let mine = handle.matches_for(secret(2).player_id()).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].p2, Some(secret(2).player_id()));

    // The seat is taken: a third player can no longer attach.
    let err = PlayerSession::join(handle.clone(), memory_store(), secret(3), match_id)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RuntimeError::NotInMatch { .. }));

    let missing = arena_runtime::MatchId(99);
    assert!(matches!(
        handle.query(missing).await,
        Err(RuntimeError::MatchNotFound(id)) if id == missing
    ));
}
