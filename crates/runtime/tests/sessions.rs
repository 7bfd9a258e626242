//! Session lifecycle through the public runtime API.

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionKind, CombatAction, Combatant, EncounterContext, EntityId, Roster, Side, Tags,
};
use combat_runtime::{
    FileSessionRepository, InMemorySessionRepository, PassActionProvider, PersistenceMode,
    RuntimeConfig, RuntimeError, ScriptedActionProvider, SessionId, SessionManager,
    SessionRepository, SessionWorker,
};

fn roster() -> Roster {
    Roster::new()
        .with(Combatant::new("giocatore_1", "Aria", 20).with_tags(Tags::PLAYER))
        .with(Combatant::new("goblin_1", "Goblin", 10).with_tags(Tags::ENEMY))
}

fn context() -> EncounterContext {
    EncounterContext::new(["giocatore_1", "goblin_1"])
}

fn config() -> RuntimeConfig {
    RuntimeConfig::default()
        .with_persistence(PersistenceMode::Memory)
        .with_seed(7)
}

fn memory_manager() -> SessionManager {
    SessionManager::new(config(), Some(Arc::new(InMemorySessionRepository::new())))
}

fn player() -> EntityId {
    EntityId::new("giocatore_1")
}

#[tokio::test]
async fn opening_hands_the_turn_to_the_player() {
    let manager = memory_manager();
    let report = manager.open("s1", roster(), context()).await.unwrap();

    assert!(report.view.active);
    assert_eq!(report.view.current, Some(player()));
    assert_eq!(report.view.menu.len(), 6);
    // any opening responses are the goblin's
    assert!(report.responses.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn pass_runs_the_goblin_turn_in_the_same_call() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    let opened = manager.open(id.clone(), roster(), context()).await.unwrap();
    let round = opened.view.round;

    let report = manager.act(&id, CombatAction::pass(player())).await.unwrap();

    let primary = report.primary().unwrap();
    assert!(primary.is_success());
    assert_eq!(primary.kind, Some(ActionKind::Pass));
    assert!(report.responses.len() >= 2);
    assert_eq!(report.view.current, Some(player()));
    assert!(report.view.round > round);
}

#[tokio::test]
async fn out_of_turn_actions_come_back_as_failed_responses() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    let opened = manager.open(id.clone(), roster(), context()).await.unwrap();

    let report = manager
        .act(&id, CombatAction::pass("goblin_1"))
        .await
        .unwrap();

    assert_eq!(report.responses.len(), 1);
    let response = &report.responses[0];
    assert!(!response.is_success());
    assert_eq!(response.message, "Non è il turno di questa entità");
    assert_eq!(response.code.as_deref(), Some("ACTION_NOT_YOUR_TURN"));
    assert_eq!(report.view.round, opened.view.round);
    assert_eq!(report.view.current, opened.view.current);
}

#[tokio::test]
async fn duplicate_and_unknown_sessions_are_errors() {
    let manager = memory_manager();
    manager.open("s1", roster(), context()).await.unwrap();

    assert!(matches!(
        manager.open("s1", roster(), context()).await,
        Err(RuntimeError::SessionExists(_))
    ));
    assert!(matches!(
        manager.view(&SessionId::from("nessuna")).await,
        Err(RuntimeError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn unknown_participants_fail_to_open() {
    let manager = memory_manager();
    let result = manager
        .open(
            "s1",
            roster(),
            EncounterContext::new(["giocatore_1", "orco"]),
        )
        .await;
    assert!(matches!(result, Err(RuntimeError::Init(_))));
}

#[tokio::test]
async fn running_combat_needs_a_forced_terminate() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    manager.open(id.clone(), roster(), context()).await.unwrap();

    assert!(matches!(
        manager.terminate(&id, false).await,
        Err(RuntimeError::CombatStillActive(_))
    ));

    let view = manager.terminate(&id, true).await.unwrap();
    assert!(!view.active);
    assert!(view.outcome.is_some_and(|outcome| outcome.forced));

    // once ended, a plain terminate is accepted
    assert!(manager.terminate(&id, false).await.is_ok());
}

#[tokio::test]
async fn passing_forever_ends_in_a_survivable_defeat() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    manager.open(id.clone(), roster(), context()).await.unwrap();

    let view = manager.play(&id, &PassActionProvider, 500).await.unwrap();

    assert!(!view.active);
    assert_eq!(view.outcome.and_then(|o| o.winner), Some(Side::Enemies));
    let player_bar = view.bars.iter().find(|bar| bar.id == player()).unwrap();
    assert_eq!(player_bar.hp, 1);
}

#[tokio::test]
async fn stepping_an_ended_combat_does_nothing() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    let opened = manager.open(id.clone(), roster(), context()).await.unwrap();

    let step = manager
        .step(&id, &opened.view, &PassActionProvider)
        .await
        .unwrap();
    assert!(step.is_some_and(|report| report.primary().is_some_and(|r| r.is_success())));

    let ended = manager.terminate(&id, true).await.unwrap();
    let step = manager.step(&id, &ended, &PassActionProvider).await.unwrap();
    assert!(step.is_none());
}

#[tokio::test]
async fn exhausted_script_is_reported() {
    let manager = memory_manager();
    let id = SessionId::from("s1");
    manager.open(id.clone(), roster(), context()).await.unwrap();

    let provider = ScriptedActionProvider::new([CombatAction::pass(player())]);
    let result = manager.play(&id, &provider, 10).await;

    assert_eq!(provider.remaining(), 0);
    assert!(matches!(
        result,
        Err(RuntimeError::ProviderExhausted { .. })
    ));
}

#[tokio::test]
async fn sessions_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let id = SessionId::from("partita");

    let before = {
        let repository = Arc::new(FileSessionRepository::new(dir.path()).unwrap());
        let manager = SessionManager::new(config(), Some(repository));
        manager.open(id.clone(), roster(), context()).await.unwrap();
        manager.act(&id, CombatAction::pass(player())).await.unwrap().view
    };

    let repository = Arc::new(FileSessionRepository::new(dir.path()).unwrap());
    assert_eq!(repository.list_sessions().unwrap(), vec!["partita".to_owned()]);
    let manager = SessionManager::new(config(), Some(repository));

    let restored = manager.restore(&id).await.unwrap();
    assert_eq!(restored, before);

    let report = manager.act(&id, CombatAction::pass(player())).await.unwrap();
    assert!(report.primary().unwrap().is_success());
}

#[tokio::test]
async fn idle_sessions_are_evicted_and_restored_on_demand() {
    let mut config = config();
    config.session_ttl = Duration::ZERO;
    let manager = SessionManager::new(config, Some(Arc::new(InMemorySessionRepository::new())));
    let id = SessionId::from("s1");
    let opened = manager.open(id.clone(), roster(), context()).await.unwrap();

    assert_eq!(manager.evict_expired().await, vec![id.clone()]);
    assert!(manager.session_ids().await.is_empty());

    assert_eq!(manager.view(&id).await.unwrap(), opened.view);
    assert_eq!(manager.session_ids().await, vec![id]);
}

#[tokio::test]
async fn close_removes_memory_and_storage() {
    let repository = Arc::new(InMemorySessionRepository::new());
    let manager = SessionManager::new(config(), Some(repository.clone()));
    let id = SessionId::from("s1");
    manager.open(id.clone(), roster(), context()).await.unwrap();
    assert!(repository.exists("s1").unwrap());

    manager.close(&id).await.unwrap();
    assert!(!repository.exists("s1").unwrap());
    assert!(matches!(
        manager.close(&id).await,
        Err(RuntimeError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn without_persistence_evicted_sessions_are_gone() {
    let mut config = config().with_persistence(PersistenceMode::Disabled);
    config.session_ttl = Duration::ZERO;
    let manager = SessionManager::from_config(config).unwrap();
    let id = SessionId::from("s1");
    manager.open(id.clone(), roster(), context()).await.unwrap();

    manager.evict_expired().await;
    assert!(matches!(
        manager.view(&id).await,
        Err(RuntimeError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn worker_broadcasts_views_until_shutdown() {
    let mut config = config();
    config.broadcast_interval = Duration::from_millis(10);
    let manager = Arc::new(SessionManager::new(config, None));
    manager.open("s1", roster(), context()).await.unwrap();

    let mut views = manager.subscribe();
    let worker = SessionWorker::spawn(Arc::clone(&manager));

    let published = tokio::time::timeout(Duration::from_secs(2), views.recv())
        .await
        .expect("worker should publish within the timeout")
        .unwrap();
    assert_eq!(published.session, SessionId::from("s1"));
    assert!(published.view.active);

    worker.shutdown().await.unwrap();
}
