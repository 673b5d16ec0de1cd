//! Integration tests for a full session: accounts, rounds, history, and stats.

use std::sync::Arc;

use vegas_slots::{
    GameError, GameSettings, GameStore, PlayerKey, SlotEngine, Symbol,
    auth::{AuthError, AuthManager, LoginRequest, RegisterRequest},
    db::{MemoryRepository, SpinRepository},
    history::{NewSpin, compute_stats},
};

fn register(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: "SpinToWin7".to_string(),
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn test_jackpot_scenario() {
    let mut engine = SlotEngine::new(100);
    assert!(engine.place_bet(5));
    assert_eq!(engine.balance(), 95);

    let winnings = engine.check_win(Symbol::Seven, Symbol::Seven, Symbol::Seven);
    assert_eq!(winnings, 1000);
    engine.add_winnings(winnings);

    assert_eq!(engine.balance(), 1095);
    assert_eq!(engine.state().last_winnings, 1000);
}

#[test]
fn test_short_balance_scenario() {
    let mut engine = SlotEngine::new(3);
    assert!(!engine.place_bet(5));
    assert_eq!(engine.balance(), 3);
}

#[tokio::test]
async fn test_register_login_resolve_logout() {
    let repo = Arc::new(MemoryRepository::new());
    let auth = AuthManager::new(repo, "integration_pepper".to_string());

    let user = auth.register(register("high_roller")).await.unwrap();
    let (logged_in, session) = auth
        .login(login("high_roller", "SpinToWin7"))
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    let resolved = auth.resolve(&session.token).await.unwrap();
    assert_eq!(resolved.user_id, user.id);
    assert_eq!(resolved.username, "high_roller");

    auth.logout(&session.token).await.unwrap();
    assert!(matches!(
        auth.resolve(&session.token).await,
        Err(AuthError::SessionNotFound)
    ));
}

#[tokio::test]
async fn test_auth_rejections() {
    let auth = AuthManager::new(Arc::new(MemoryRepository::new()), "pepper".to_string());
    auth.register(register("taken_name")).await.unwrap();

    assert!(matches!(
        auth.register(register("taken_name")).await,
        Err(AuthError::UsernameTaken)
    ));
    assert!(matches!(
        auth.register(RegisterRequest {
            username: "shorty".to_string(),
            password: "short".to_string(),
        })
        .await,
        Err(AuthError::WeakPassword(_))
    ));
    assert!(matches!(
        auth.login(login("taken_name", "WrongPass99")).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login(login("nobody_here", "SpinToWin7")).await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_rounds_until_broke_are_recorded() {
    let repo = MemoryRepository::new();
    let store = GameStore::new(GameSettings {
        starting_balance: 20,
        ..GameSettings::default()
    });
    let player = PlayerKey::User(1);

    let mut rounds = 0;
    let mut finished = false;
    while rounds < 10_000 {
        match store.play_round(player, 5).await {
            Ok(outcome) => {
                repo.record_spin(&NewSpin::from_outcome(player, &outcome))
                    .await
                    .unwrap();
                rounds += 1;
            }
            Err(GameError::GameOver) => {
                finished = true;
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let spins = repo.spins_for(player).await.unwrap();
    assert_eq!(spins.len(), rounds);

    let stats = compute_stats(&spins);
    assert_eq!(stats.total_spins, rounds as u64);
    let last = spins.last().unwrap();
    assert_eq!(last.balance_after, store.state(player).await.balance);
    if finished {
        assert_eq!(last.balance_after, 0);
    }
}

#[tokio::test]
async fn test_reset_after_game_over() {
    let store = GameStore::new(GameSettings {
        starting_balance: 0,
        ..GameSettings::default()
    });
    assert_eq!(
        store.play_round(PlayerKey::Guest, 5).await,
        Err(GameError::GameOver)
    );
    let state = store.reset(PlayerKey::Guest).await;
    assert_eq!(state.balance, 0);
}
