//! Tests for database repository operations.

use tempfile::NamedTempFile;

use noughts::{GameRepository, NewGameRecord, NewUser, hash_password};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready
/// repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path);
    repo.initialize().expect("Migrations failed");
    (db_file, repo)
}

fn new_user(username: &str, password: &str) -> NewUser {
    NewUser::new(username.to_string(), hash_password(password))
}

#[test]
fn test_create_user() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user(new_user("alice", "pw1"))
        .expect("Create failed");
    assert_eq!(user.username(), "alice");
    assert!(*user.id() > 0);
}

#[test]
fn test_create_user_duplicate_username_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_user(new_user("bob", "pw1"))
        .expect("First create failed");
    let result = repo.create_user(new_user("bob", "pw2"));
    assert!(result.is_err(), "Duplicate username should fail");
}

#[test]
fn test_find_user() {
    let (_db, repo) = setup_test_db();
    repo.create_user(new_user("carol", "pw"))
        .expect("Create failed");
    let found = repo.find_user("carol").expect("Query failed");
    assert!(found.is_some());
    assert_eq!(found.unwrap().username(), "carol");

    let missing = repo.find_user("nobody").expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_authenticate_matches_credentials() {
    let (_db, repo) = setup_test_db();
    repo.create_user(new_user("dave", "hunter2"))
        .expect("Create failed");

    let ok = repo
        .authenticate("dave", &hash_password("hunter2"))
        .expect("Query failed");
    assert!(ok.is_some());

    let wrong_password = repo
        .authenticate("dave", &hash_password("hunter3"))
        .expect("Query failed");
    assert!(wrong_password.is_none());

    let wrong_user = repo
        .authenticate("davey", &hash_password("hunter2"))
        .expect("Query failed");
    assert!(wrong_user.is_none());
}

#[test]
fn test_save_game_and_history() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user("eve", "pw")).expect("Create failed");

    for (board, result) in [("XXXOO    ", "X"), ("XOXOXXOXO", "Tie")] {
        let record = NewGameRecord::new(
            *user.id(),
            board.to_string(),
            "X".to_string(),
            result.to_string(),
        );
        repo.save_game(record).expect("Save failed");
    }

    let history = repo.history(*user.id()).expect("History failed");
    assert_eq!(history.len(), 2);
    // Most recent first.
    assert_eq!(history[0].result(), "Tie");
    assert_eq!(history[1].result(), "X");
    assert_eq!(history[1].board(), "XXXOO    ");
}

#[test]
fn test_history_is_per_user() {
    let (_db, repo) = setup_test_db();
    let a = repo.create_user(new_user("frank", "pw")).expect("Create failed");
    let b = repo.create_user(new_user("grace", "pw")).expect("Create failed");

    repo.save_game(NewGameRecord::new(
        *a.id(),
        "XXXOO    ".to_string(),
        "X".to_string(),
        "X".to_string(),
    ))
    .expect("Save failed");

    assert_eq!(repo.history(*a.id()).expect("History failed").len(), 1);
    assert!(repo.history(*b.id()).expect("History failed").is_empty());
}

#[test]
fn test_aggregated_stats() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user("heidi", "pw")).expect("Create failed");

    // Playing as X: a win, two losses, a draw.
    for result in ["X", "O", "O", "Tie"] {
        repo.save_game(NewGameRecord::new(
            *user.id(),
            "XOXOXXOXO".to_string(),
            "X".to_string(),
            result.to_string(),
        ))
        .expect("Save failed");
    }
    // Playing as O: a win.
    repo.save_game(NewGameRecord::new(
        *user.id(),
        "XOXOXXOXO".to_string(),
        "O".to_string(),
        "O".to_string(),
    ))
    .expect("Save failed");

    let stats = repo.aggregated_stats(*user.id()).expect("Stats failed");
    assert_eq!(*stats.total_games(), 5);
    assert_eq!(*stats.wins(), 2);
    assert_eq!(*stats.losses(), 2);
    assert_eq!(*stats.draws(), 1);
    assert_eq!(stats.win_rate(), 40.0);
}

#[test]
fn test_initialize_is_idempotent() {
    let (_db, repo) = setup_test_db();
    repo.initialize().expect("Second initialize failed");
    repo.create_user(new_user("ivan", "pw")).expect("Create failed");
}
