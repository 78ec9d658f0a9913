use jianguo_client::model::RootRef;
use jianguo_client::store::{Session, Transfer, WriteOp};
use jianguo_client::{ClientConfig, Cursor, HttpStore, JianguoError, RemoteStore};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run `f` against a store pointed at `server`, off the async workers.
async fn with_store<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(HttpStore) -> T + Send + 'static,
{
    let config = ClientConfig {
        host_url: server.uri(),
        ..ClientConfig::default()
    };
    tokio::task::spawn_blocking(move || {
        let store = HttpStore::new(&config, Session::new("umn=abc")).unwrap();
        f(store)
    })
    .await
    .unwrap()
}

fn root_ref() -> RootRef {
    RootRef::new("A", "m1")
}

// ── Write status mapping ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn conflict_status_is_stale_revision() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/d/ajax/fileops/delete"))
        .and(query_param("sndId", "A"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.submit_write(
            &root_ref(),
            &WriteOp::Delete {
                path: "/docs/a.txt".into(),
                rev: "r5".into(),
                is_dir: false,
            },
        )
    })
    .await
    .unwrap_err();

    match err {
        JianguoError::StaleRevision {
            path,
            expected,
            current,
        } => {
            assert_eq!(path, "/docs/a.txt");
            assert_eq!(expected, "r5");
            assert_eq!(current, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/d/ajax/dirops/create"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.submit_write(&root_ref(), &WriteOp::CreateDir { path: "/x".into() })
    })
    .await
    .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_job_state_is_operation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/d/ajax/submitMove"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uuid": "job-1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/moveProgress"))
        .and(query_param("uuid", "job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "FAILED" })))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| {
        store.submit_write(
            &root_ref(),
            &WriteOp::Transfer {
                mode: Transfer::Move,
                source: RootRef::new("B", "m2"),
                source_path: "/a.txt".into(),
                dest_dir: "/archive".into(),
            },
        )
    })
    .await
    .unwrap_err();

    match err {
        JianguoError::OperationFailed { operation, state } => {
            assert_eq!(operation, "move");
            assert_eq!(state, "FAILED");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_job_completes_write() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/d/ajax/fileops/restore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uuid": "job-2" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/restoreProgress"))
        .and(query_param("uuid", "job-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "SUCCESS" })))
        .expect(1)
        .mount(&server)
        .await;

    with_store(&server, |store| {
        store.submit_write(&root_ref(), &WriteOp::Restore { path: "/gone.txt".into() })
    })
    .await
    .unwrap();
}

// ── Share info absence ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn missing_share_info_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/pubInfo"))
        .and(query_param("path", "/not-found"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/pubInfo"))
        .and(query_param("path", "/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/pubInfo"))
        .and(query_param("path", "/null"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/pubInfo"))
        .and(query_param("path", "/docs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "version": null, "acl": 1 })),
        )
        .mount(&server)
        .await;

    let (not_found, empty, null, shared) = with_store(&server, |store| {
        let root = root_ref();
        (
            store.get_share(&root, "/not-found").unwrap(),
            store.get_share(&root, "/empty").unwrap(),
            store.get_share(&root, "/null").unwrap(),
            store.get_share(&root, "/docs").unwrap(),
        )
    })
    .await;

    assert!(not_found.is_none());
    assert!(empty.is_none());
    assert!(null.is_none());

    let shared = shared.unwrap();
    assert_eq!(shared.path, "/docs");
    assert_eq!(shared.version, "1");
}

// ── Listings ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn trash_listing_marks_roots_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/sandbox/listTrash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sandboxes": [{ "sandboxId": 7, "magic": "m7", "name": "Old" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/userop/getUserInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sandboxes": [{ "sandboxId": 1, "magic": "m1", "name": "", "isDefault": true }]
        })))
        .mount(&server)
        .await;

    let (trashed, live) = with_store(&server, |store| {
        (
            store.list_storage_roots(true).unwrap(),
            store.list_storage_roots(false).unwrap(),
        )
    })
    .await;

    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].id, "7");
    assert!(trashed[0].deleted);
    assert!(!live[0].deleted);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_event_marker_ends_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/getEvents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{ "id": 3, "opType": "ADD", "path": "/a", "timestamp": 10, "version": 1 }],
            "marker": ""
        })))
        .mount(&server)
        .await;

    let page = with_store(&server, |store| {
        store.fetch_event_page(&root_ref(), &Cursor::Start).unwrap()
    })
    .await;

    assert_eq!(page.events.len(), 1);
    assert_eq!(page.cursor, Cursor::End);
}

#[tokio::test(flavor = "multi_thread")]
async fn versions_and_root_settings_are_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/versions/docs/plan.txt"))
        .and(query_param("sndMagic", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "versions": [{ "version": 2, "size": 80 }, { "version": 1, "size": 10 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/ajax/sandbox/metaData"))
        .and(query_param("path", "/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "A", "magic": "m1", "name": "Projects", "desc": "", "acls": []
        })))
        .mount(&server)
        .await;

    let (versions, metadata) = with_store(&server, |store| {
        (
            store.list_versions(&root_ref(), "/docs/plan.txt").unwrap(),
            store.root_metadata(&root_ref()).unwrap(),
        )
    })
    .await;

    let tokens: Vec<_> = versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(tokens, ["2", "1"]);
    assert_eq!(metadata.root_ref(), root_ref());
    assert!(metadata.acls.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn generated_app_password_keeps_requested_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/d/ajax/userop/generateAsp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "password": "s3cret" })))
        .mount(&server)
        .await;

    let generated = with_store(&server, |store| store.generate_app_password("nas").unwrap()).await;

    assert_eq!(generated.name, "nas");
    assert_eq!(generated.password.as_deref(), Some("s3cret"));
}
