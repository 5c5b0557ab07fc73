// comanda-client/tests/session_store.rs
// JSON file session persistence

use comanda_client::session::{JsonFileStore, KeyValueStore, SessionStore, keys};
use comanda_client::{SeatLink, Session};
use shared::models::Role;
use tempfile::TempDir;

fn waiter() -> Session {
    Session {
        user_id: 11,
        restaurant_id: 2,
        role: Role::Waiter,
        token: "tok-w".into(),
        user_name: Some("Luis".into()),
        tier: Some("basico".into()),
        push_token: Some("push-1".into()),
    }
}

#[test]
fn test_session_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("session.json");

    SessionStore::new(JsonFileStore::open(&path).unwrap())
        .save(&waiter())
        .unwrap();
    assert!(path.exists());

    let reopened = SessionStore::new(JsonFileStore::open(&path).unwrap());
    assert_eq!(reopened.load().unwrap(), Some(waiter()));
    assert_eq!(reopened.listener_scope().unwrap(), Some((11, 2)));
}

#[test]
fn test_file_is_flat_string_map() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    SessionStore::new(JsonFileStore::open(&path).unwrap())
        .save(&waiter())
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["usuario_id"], "11");
    assert_eq!(raw["restaurante_id"], "2");
    assert_eq!(raw["rol"], "garzon");
    assert_eq!(raw["nombre_usuario"], "Luis");
}

#[test]
fn test_logout_clears_every_key() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let store = JsonFileStore::open(&path).unwrap();
    store.set("tema", "oscuro").unwrap();
    let sessions = SessionStore::new(store);
    sessions.save(&waiter()).unwrap();

    sessions.clear().unwrap();
    assert_eq!(sessions.load().unwrap(), None);
    for key in keys::ALL {
        assert_eq!(sessions.inner().get(key).unwrap(), None, "{key}");
    }
    // Unrelated keys are left alone
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("tema").unwrap().as_deref(), Some("oscuro"));
}

#[test]
fn test_seat_link_from_scanned_qr() {
    let link = SeatLink::parse("https://comanda.app/menu?restaurante=2&mesa=9&silla=1").unwrap();
    assert_eq!(link.restaurant_id, 2);
    assert_eq!(link.table_id, 9);
    assert_eq!(link.seat_id, Some(1));
}
