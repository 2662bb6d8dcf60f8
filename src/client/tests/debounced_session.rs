use std::{sync::Arc, time::Duration};

use client::{
    debounce::Debouncer,
    model::{Mode, Tally},
    scoring::HttpScoringClient,
    session::{GameSession, SessionError},
    strategy::OnlyMove,
};
use common::model::game::{Move, Outcome};
use tokio::time;

const WINDOW: Duration = Duration::from_millis(500);

fn random_session(opponent: Move) -> GameSession {
    // Random mode never reaches the scoring service.
    let scoring = HttpScoringClient::new("http://127.0.0.1:1", Duration::from_secs(1))
        .expect("Failed to build scoring client");
    GameSession::new(Arc::new(scoring)).with_strategy(OnlyMove(opponent))
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_clicks_plays_one_round() {
    let session = random_session(Move::Rock);
    let (debouncer, mut moves) = Debouncer::spawn(WINDOW);

    for choice in [Move::Rock, Move::Scissors, Move::Rock, Move::Paper] {
        assert!(debouncer.submit(session.pending(choice)));
        time::sleep(Duration::from_millis(100)).await;
    }
    let pending = moves.recv().await.expect("Debouncer stopped");
    let record = session.submit_pending(pending).await.unwrap();

    assert!(time::timeout(Duration::from_secs(5), moves.recv())
        .await
        .is_err());
    assert_eq!(record.player_move, Move::Paper);
    assert_eq!(record.outcome, Outcome::Win);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.tally().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_click_pending_during_mode_switch_is_not_scored() {
    let session = random_session(Move::Scissors).with_mode(Mode::Remote);
    let (debouncer, mut moves) = Debouncer::spawn(WINDOW);

    debouncer.submit(session.pending(Move::Rock));
    assert!(session.set_mode(Mode::Random, &|_: &str| true));

    let stale = moves.recv().await.expect("Debouncer stopped");
    assert_eq!(
        session.submit_pending(stale).await,
        Err(SessionError::Superseded)
    );
    assert_eq!(session.tally(), Tally::default());
    assert!(session.history().is_empty());
    assert!(!session.is_busy());

    debouncer.submit(session.pending(Move::Rock));
    let fresh = moves.recv().await.expect("Debouncer stopped");
    let record = session.submit_pending(fresh).await.unwrap();
    assert_eq!(record.outcome, Outcome::Win);
    assert_eq!(session.tally(), Tally { wins: 1, losses: 0, ties: 0 });
}
