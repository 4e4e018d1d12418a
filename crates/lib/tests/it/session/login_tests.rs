//! Login paths: success, credential rejection, privilege rejection.

use std::sync::Arc;

use mentora::{
    Gate,
    creds::{CredentialStore, InMemory, TokenPair},
    session::{Credentials, RegisterRequest, Role},
};

use crate::helpers::{ApiState, admin_user, session_machine, spawn_stub, student_user};

fn with_account(user: serde_json::Value) -> ApiState {
    let mut state = ApiState {
        principal: user.clone(),
        ..Default::default()
    };
    state.accounts.insert(
        user["email"].as_str().unwrap().to_string(),
        ("hunter2".to_string(), user),
    );
    state
}

#[tokio::test]
async fn login_success_persists_pair_and_sets_header() {
    let stub = spawn_stub(with_account(admin_user())).await;
    let store = Arc::new(InMemory::new());
    let (transport, session) = session_machine(&stub, store.clone(), Gate::Admin);

    let principal = session
        .login(&Credentials::new("ada@example.com", "hunter2"))
        .await
        .unwrap();

    assert_eq!(principal.username, "ada");
    assert!(session.state().await.is_authenticated());
    assert_eq!(store.load().await.unwrap(), Some(TokenPair::new("t1", "t2")));
    assert!(transport.has_authorization());

    // The configured default header is `Bearer t1`: observable on the next call
    session.refresh_principal().await.unwrap();
    assert_eq!(
        stub.state.lock().unwrap().last_profile_auth.as_deref(),
        Some("Bearer t1")
    );
}

#[tokio::test]
async fn login_rejection_surfaces_detail_and_leaves_store_alone() {
    let stub = spawn_stub(with_account(admin_user())).await;
    let previous = TokenPair::new("old-access", "old-refresh");
    let store = Arc::new(InMemory::with_pair(previous.clone()));
    let (transport, session) = session_machine(&stub, store.clone(), Gate::Admin);
    transport.set_authorization(Some("old-access"));

    let err = session
        .login(&Credentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_credential_error());
    assert!(err.to_string().contains("bad credentials"));
    assert!(session.state().await.is_unauthenticated());
    // Whatever was stored before the call is untouched, but the header is
    // gone: Unauthenticated never carries a bearer token
    assert_eq!(store.load().await.unwrap(), Some(previous));
    assert!(!transport.has_authorization());
}

#[tokio::test]
async fn login_without_privilege_is_distinct_and_persists_nothing() {
    let stub = spawn_stub(with_account(student_user())).await;
    let store = Arc::new(InMemory::new());
    let (transport, session) = session_machine(&stub, store.clone(), Gate::Admin);

    let err = session
        .login(&Credentials::new("sam@example.com", "hunter2"))
        .await
        .unwrap_err();

    // "Authenticated but not authorized", not "bad credentials"
    assert!(err.is_permission_denied());
    assert!(!err.is_credential_error());
    assert!(session.state().await.is_unauthenticated());
    assert_eq!(store.load().await.unwrap(), None);
    assert!(!transport.has_authorization());
}

#[tokio::test]
async fn login_on_general_gate_admits_any_principal() {
    let stub = spawn_stub(with_account(student_user())).await;
    let store = Arc::new(InMemory::new());
    let (_transport, session) = session_machine(&stub, store, Gate::General);

    let principal = session
        .login(&Credentials::new("sam@example.com", "hunter2"))
        .await
        .unwrap();
    assert_eq!(principal.username, "sam");
    assert!(session.state().await.is_authenticated());
}

#[tokio::test]
async fn login_over_existing_session_replaces_it() {
    let stub = spawn_stub(with_account(admin_user())).await;
    let store = Arc::new(InMemory::with_pair(TokenPair::new("prior-a", "prior-r")));
    let (_transport, session) = session_machine(&stub, store.clone(), Gate::Admin);

    session
        .login(&Credentials::new("ada@example.com", "hunter2"))
        .await
        .unwrap();

    // Last writer wins: the stored pair is the freshly issued one
    assert_eq!(store.load().await.unwrap(), Some(TokenPair::new("t1", "t2")));
    assert_eq!(session.principal().await.unwrap().username, "ada");
}

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        username: "lin".to_string(),
        first_name: "Lin".to_string(),
        last_name: "Osei".to_string(),
        password: "hunter2".to_string(),
        password_confirm: "hunter2".to_string(),
        user_type: Role::Student,
    }
}

#[tokio::test]
async fn register_issues_a_pair_and_principal() {
    let stub = spawn_stub(ApiState::default()).await;
    let transport = mentora::ApiTransport::new(&stub.base_url).unwrap();

    let success = transport
        .register(&registration("lin@example.com"))
        .await
        .unwrap();

    assert_eq!(success.access, "t1");
    assert_eq!(success.refresh, "t2");
    assert_eq!(success.user.username, "lin");
    assert_eq!(success.user.user_type, Role::Student);
    assert_eq!(stub.count_calls("register"), 1);
}

#[tokio::test]
async fn register_field_errors_are_credential_errors() {
    // Taken email: the server answers 400 with a field-keyed validation
    // object, surfaced like any other credential rejection
    let stub = spawn_stub(with_account(admin_user())).await;
    let transport = mentora::ApiTransport::new(&stub.base_url).unwrap();

    let err = transport
        .register(&registration("ada@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_credential_error());
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn login_transport_failure_resolves_to_unauthenticated() {
    let transport = Arc::new(mentora::ApiTransport::new("http://127.0.0.1:9/api").unwrap());
    let store = Arc::new(InMemory::new());
    let session = mentora::SessionManager::new(transport, store, Gate::Admin);

    let err = session
        .login(&Credentials::new("ada@example.com", "hunter2"))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(session.state().await.is_unauthenticated());
}
