//! Integration tests for the `MemgameClient` facade: a full play-through
//! against a mocked backend.

use std::sync::Arc;
use std::time::Duration;

use memgame::prelude::*;
use serde_json::Value;

fn client() -> (Arc<MockTransport>, MemgameClient<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = MemgameClientBuilder::new()
        .timer(TimerConfig::with_tick(Duration::from_millis(10)))
        .build_with(Arc::clone(&mock));
    (mock, client)
}

fn login_ok(mock: &MockTransport) {
    mock.on_post(
        "/login",
        MockReply::json(r#"{"user": {"id": 7, "nickname": "ana", "coins": 12}, "token": "t"}"#),
    );
}

// =========================================================================
// sign_in / sign_out
// =========================================================================

#[tokio::test]
async fn test_sign_in_sets_user() {
    let (mock, mut client) = client();
    login_ok(&mock);

    let user = client
        .sign_in(&Credentials::new("ana@mail.pt", "secret"))
        .await
        .unwrap();

    assert_eq!(user.id, UserId(7));
    assert_eq!(user.profile_str("nickname"), Some("ana"));
    assert_eq!(client.identity().user_id(), Some(UserId(7)));

    client.sign_out();
    assert!(client.identity().user().is_none());
}

#[tokio::test]
async fn test_sign_in_rejected() {
    let (mock, mut client) = client();
    mock.on_post("/login", MockReply::Status(401, "Unauthorized".into()));

    let err = client
        .sign_in(&Credentials::new("ana@mail.pt", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, MemgameError::LoginRejected));
    assert!(client.identity().user().is_none());
}

#[tokio::test]
async fn test_sign_in_payload_without_user_is_rejected() {
    let (mock, mut client) = client();
    mock.on_post("/login", MockReply::json(r#"{"message": "ok"}"#));

    let err = client.sign_in(&Credentials::new("a", "b")).await.unwrap_err();
    assert!(matches!(err, MemgameError::LoginRejected));
}

// =========================================================================
// Requires a user
// =========================================================================

#[tokio::test]
async fn test_save_game_without_user_is_not_logged_in() {
    let (mock, mut client) = client();
    client.sessions_mut().start_new_game();

    let err = client.save_game().await.unwrap_err();

    assert!(matches!(err, MemgameError::NotLoggedIn));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_load_history_without_user_is_not_logged_in() {
    let (_, mut client) = client();
    assert!(matches!(
        client.load_history(1).await,
        Err(MemgameError::NotLoggedIn)
    ));
}

// =========================================================================
// Full flow
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_full_game_flow() {
    let (mock, mut client) = client();
    login_ok(&mock);
    mock.on_post("/games/save", MockReply::json(r#"{"id": 99}"#));
    mock.on_get(
        "/users/7/games",
        MockReply::json(
            r#"{"data":[{"id":99,"board_id":"1","created_at":"2024-05-01 10:00:00",
                "custom":"{\"pairs_found\":2,\"turns\":3,\"score\":343}"}],
                "current_page":1,"last_page":1}"#,
        ),
    );
    mock.on_get("/games/leaderboard/global", MockReply::json("[]"));

    client
        .sign_in(&Credentials::new("ana@mail.pt", "secret"))
        .await
        .unwrap();

    let game = client.sessions_mut();
    game.select_board_size("2x2");
    game.start_new_game();
    game.start_timer().unwrap();
    tokio::time::sleep(Duration::from_millis(205)).await;
    for _ in 0..3 {
        game.record_turn();
    }
    game.record_pair();
    game.record_pair();
    let score = game.compute_final_score_for(BoardSize::TwoByTwo);
    // 200 * 4 - (45 + 200 * 0.015)
    assert_eq!(score, 752);
    assert_eq!(game.status(), SessionStatus::Completed);

    let id = client.save_game().await.unwrap();
    assert_eq!(id, GameId(99));

    let save = mock
        .requests()
        .into_iter()
        .find(|r| r.path == "/games/save")
        .unwrap();
    let body: Value = serde_json::from_slice(&save.body.unwrap()).unwrap();
    assert_eq!(body["board_id"], 1);
    assert_eq!(body["total_time"], 200);
    assert_eq!(body["created_user_id"], 7);

    let summary = client.load_history(1).await.unwrap();
    assert_eq!(summary.loaded, 1);
    let shown = client.sessions().filtered_history();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].board_id, Some(BoardId(1)));
    assert_eq!(shown[0].custom.score, 343);

    let summary = client.load_global_leaderboard("1", None).await.unwrap();
    assert!(summary.is_empty());
    assert_eq!(
        mock.last_request().unwrap().query_param("sortCriteria"),
        Some("total_time")
    );
}
