//! Access gate and navigation tests
//! Drives the gate and router end to end over both storage backends

use std::sync::Arc;

use serde_json::json;
use storedesk::auth::{AuthGate, DenyReason, GateDecision, GateMode, GateState, LoginResponse, Role, AUTH_PATH};
use storedesk::router::{standard_routes, Layout, Navigation, Navigator};
use storedesk::session::{keys, FileStorage, MemoryStorage, SessionContext, SessionStorage};

fn storage_with(entries: &[(&str, &str)]) -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.set_many(entries).unwrap();
    storage
}

fn navigator(storage: &MemoryStorage, mode: GateMode) -> Navigator {
    Navigator::new(
        standard_routes(),
        AuthGate::new(Arc::new(storage.clone()), mode),
    )
}

#[test]
fn test_vendor_session_renders_vendor_page() {
    let storage = storage_with(&[(keys::TOKEN, "t1"), (keys::ROLE, "vendor"), (keys::USER_ID, "u1")]);
    let gate = AuthGate::new(Arc::new(storage.clone()), GateMode::Trusting);

    let decision = gate.check(Some(Role::Vendor));
    assert_eq!(decision.state(), GateState::Granted);

    let Navigation::Render(page) = navigator(&storage, GateMode::Trusting).navigate("/vendor/orders") else {
        panic!("vendor page should render");
    };
    assert_eq!(page.layout, Layout::Vendor);
    assert_eq!(page.endpoint().as_deref(), Some("/vendor/orders"));
}

#[test]
fn test_customer_session_is_redirected_from_vendor_page() {
    let storage = storage_with(&[(keys::TOKEN, "t1"), (keys::ROLE, "customer"), (keys::USER_ID, "u1")]);
    let gate = AuthGate::new(Arc::new(storage.clone()), GateMode::Trusting);

    assert_eq!(gate.check(Some(Role::Vendor)).redirect(), Some(AUTH_PATH));
    assert_eq!(
        navigator(&storage, GateMode::Trusting).navigate("/vendor/dashboard"),
        Navigation::Redirect(AUTH_PATH.to_string())
    );
}

#[test]
fn test_empty_storage_is_redirected_from_admin_page() {
    let storage = MemoryStorage::new();
    let gate = AuthGate::new(Arc::new(storage.clone()), GateMode::Trusting);

    assert_eq!(
        gate.check(Some(Role::Superadmin)),
        GateDecision::Denied(DenyReason::MissingToken)
    );
    assert_eq!(
        navigator(&storage, GateMode::Trusting).settle("/dashboard"),
        Navigation::AuthScreen
    );
}

#[test]
fn test_each_role_is_confined_to_its_subtree() {
    let homes = [
        (Role::Superadmin, "/dashboard"),
        (Role::Vendor, "/vendor/dashboard"),
        (Role::Customer, "/customer/dashboard"),
    ];

    for role in Role::ALL {
        let storage = storage_with(&[(keys::TOKEN, "t"), (keys::ROLE, role.as_str()), (keys::USER_ID, "u")]);
        let nav = navigator(&storage, GateMode::Trusting);

        for (owner, home) in homes {
            let rendered = matches!(nav.navigate(home), Navigation::Render(_));
            assert_eq!(rendered, owner == role, "{} visiting {}", role, home);
        }
    }
}

#[test]
fn test_gate_rereads_storage_on_every_check() {
    let storage = MemoryStorage::new();
    let gate = AuthGate::new(Arc::new(storage.clone()), GateMode::Trusting);
    assert!(!gate.check(Some(Role::Customer)).is_granted());

    storage
        .set_many(&[(keys::TOKEN, "t"), (keys::ROLE, "customer"), (keys::USER_ID, "c1")])
        .unwrap();
    assert!(gate.check(Some(Role::Customer)).is_granted());

    storage.remove(keys::TOKEN).unwrap();
    assert_eq!(
        gate.check(Some(Role::Customer)),
        GateDecision::Denied(DenyReason::MissingToken)
    );
}

#[test]
fn test_forged_role_passes_trusting_gate_but_not_strict() {
    let storage = storage_with(&[
        (keys::TOKEN, "opaque-token"),
        (keys::ROLE, "superadmin"),
        (keys::USER_ID, "u1"),
    ]);

    assert!(matches!(
        navigator(&storage, GateMode::Trusting).navigate("/dashboard"),
        Navigation::Render(_)
    ));
    assert_eq!(
        navigator(&storage, GateMode::Strict).navigate("/dashboard"),
        Navigation::Redirect(AUTH_PATH.to_string())
    );
}

#[test]
fn test_login_then_logout_over_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(dir.path().join("session.json")));
    let context = SessionContext::new(Arc::clone(&storage));
    let nav = Navigator::new(
        standard_routes(),
        AuthGate::new(Arc::clone(&storage), GateMode::Trusting),
    );

    context
        .login(LoginResponse {
            token: Some("t2".to_string()),
            user: Some(json!({"_id": "c9", "role": "customer", "email": "c9@shop.test"})),
            message: None,
        })
        .unwrap();

    assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("t2"));
    assert_eq!(storage.get(keys::ROLE).as_deref(), Some("customer"));
    assert_eq!(storage.get(keys::USER_ID).as_deref(), Some("c9"));

    let Navigation::Render(page) = nav.navigate("/customer/profile") else {
        panic!("customer profile should render after login");
    };
    assert_eq!(page.endpoint().as_deref(), Some("/auth/user/c9"));

    let after = context.logout().unwrap();
    assert_eq!(after, Navigation::Redirect("/login".to_string()));
    for key in keys::ALL {
        assert_eq!(storage.get(key), None, "{} should be cleared", key);
    }
    assert_eq!(nav.settle("/customer/profile"), Navigation::AuthScreen);
}
