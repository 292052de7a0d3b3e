// Integration tests for crude-manager
// A small axum server stands in for the remote users API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crude_manager::{HttpUserService, NewUser, RemoteUserService, UserId, UserRecord};

#[derive(Clone, Default)]
struct ApiState {
    users: Arc<Mutex<Vec<Value>>>,
    queries: Arc<Mutex<Vec<Option<String>>>>,
    updates: Arc<Mutex<Vec<Value>>>,
}

fn seed() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz",
               "phone": "1-770-736-8031 x56442", "address": {"city": "Gwenborough"}}),
        json!({"id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv",
               "phone": "010-692-6593 x09125"}),
        json!({"id": 3, "name": "Clementine Bauch", "username": "Samantha", "email": "Nathan@yesenia.net",
               "phone": "1-463-123-4447"}),
    ]
}

async fn list_users(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let q = params.get("q").cloned();
    state.queries.lock().unwrap().push(q.clone());
    let users = state.users.lock().unwrap().clone();
    let filtered = match q {
        Some(q) => users
            .into_iter()
            .filter(|u| u["name"].as_str().unwrap_or("").contains(&q))
            .collect(),
        None => users,
    };
    Json(filtered)
}

async fn create_user(State(state): State<ApiState>, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    // JSONPlaceholder always answers with id 11
    body["id"] = json!(11);
    state.users.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_user(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if id == 500 {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state.updates.lock().unwrap().push(body.clone());
    Ok(Json(body))
}

async fn delete_user(State(state): State<ApiState>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let mut users = state.users.lock().unwrap();
    let before = users.len();
    users.retain(|u| u["id"] != json!(id));
    if users.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({})))
}

async fn spawn_api() -> (String, ApiState) {
    let state = ApiState::default();
    *state.users.lock().unwrap() = seed();
    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/"), state)
}

// 1) HTTP client against the fake API
#[tokio::test]
async fn http_list_passes_query_and_keeps_order() {
    let (base, state) = spawn_api().await;
    let svc = HttpUserService::new(base);

    let all = svc.list(None).await.expect("list");
    let ids: Vec<u64> = all.iter().map(|u| u.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(all[0].phone, "1-770-736-8031 x56442");

    let some = svc.list(Some("Ervin")).await.expect("search");
    assert_eq!(some.len(), 1);
    assert_eq!(some[0].name, "Ervin Howell");

    let seen = state.queries.lock().unwrap().clone();
    assert_eq!(seen, vec![None, Some("Ervin".to_string())]);
}

#[tokio::test]
async fn http_create_returns_assigned_id() {
    let (base, _state) = spawn_api().await;
    let svc = HttpUserService::new(base);
    let created = svc
        .create(&NewUser {
            name: "New".into(),
            email: "new@example.com".into(),
            phone: "1".into(),
        })
        .await
        .expect("create");
    assert_eq!(created.id, UserId(11));
    assert_eq!(created.name, "New");
}

#[tokio::test]
async fn http_update_sends_full_record_and_maps_status_errors() {
    let (base, state) = spawn_api().await;
    let svc = HttpUserService::new(base);
    let record = UserRecord {
        id: UserId(2),
        name: "Ervin H.".into(),
        email: "e@h".into(),
        phone: "".into(),
    };
    svc.update(record.id, &record).await.expect("update");
    let sent = state.updates.lock().unwrap()[0].clone();
    assert_eq!(sent, json!({"id": 2, "name": "Ervin H.", "email": "e@h", "phone": ""}));

    let err = svc.update(UserId(500), &record).await.unwrap_err();
    assert_eq!(err.message, "Request failed with status code 500");
}

#[tokio::test]
async fn http_delete_missing_user_is_a_failure() {
    let (base, _state) = spawn_api().await;
    let svc = HttpUserService::new(base);
    svc.delete(UserId(3)).await.expect("delete");
    let err = svc.delete(UserId(3)).await.unwrap_err();
    assert_eq!(err.message, "Request failed with status code 404");
}

#[tokio::test]
async fn unreachable_api_yields_transport_failure() {
    // bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let svc = HttpUserService::new(format!("http://{addr}"));
    let err = svc.list(None).await.unwrap_err();
    assert!(!err.message.is_empty());
}

// 2) Controller over HTTP
#[tokio::test]
async fn controller_round_trip_over_http() {
    let (base, _state) = spawn_api().await;
    let svc = HttpUserService::new(base);
    let mut c = crude_manager::UserListController::new();

    c.load(&svc, None).await.expect("load");
    assert_eq!(c.visible().len(), 3);

    c.begin_create().unwrap();
    c.update_create_field(crude_manager::UserField::Name, "Zed").unwrap();
    c.commit_create(&svc).await.expect("create");
    assert_eq!(c.users().last().map(|u| u.id), Some(UserId(11)));

    c.remove(&svc, UserId(1)).await.expect("remove");
    let ids: Vec<u64> = c.visible().iter().map(|u| u.id.0).collect();
    assert_eq!(ids, vec![2, 3, 11]);

    c.search(&svc, "Clementine").await.expect("search");
    assert_eq!(c.users().len(), 1);
    assert_eq!(c.search_query(), "Clementine");
}

// 3) Full TUI path: key presses -> worker -> HTTP -> controller
#[test]
fn keys_drive_remote_calls_through_worker() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crude_manager::app::AppState;
    use crude_manager::app::update::{apply_outcome, handle_key};
    use crude_manager::worker;

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let (base, _state) = rt.block_on(spawn_api());
    let handle = worker::spawn(Arc::new(HttpUserService::new(base))).expect("worker");
    let mut app = AppState::default();

    let pump = |app: &mut AppState| {
        for call in app.outbox.drain(..) {
            handle.submit(call).expect("submit");
        }
        let outcome = handle.recv_timeout(Duration::from_secs(10)).expect("outcome");
        apply_outcome(app, outcome);
    };

    let call = app.controller.begin_load(None).unwrap();
    app.dispatch(call);
    pump(&mut app);
    assert_eq!(app.controller.users().len(), 3);

    // delete the selected (first) row
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE));
    pump(&mut app);
    assert_eq!(app.controller.visible()[0].id, UserId(2));
    assert!(!app.controller.is_busy());
    assert!(app.controller.last_error().is_none());
}
