use std::path::PathBuf;

use engine::{
    Credentials, FileStore, KeyValueStore, Passcode, ProvisioningSecret, SessionGate, SignInStep,
    SimulatedVerifier,
};
use uuid::Uuid;

fn state_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_state")
        .join(format!("state_{}", Uuid::new_v4()))
        .join("trustbank_state.json")
}

#[test]
fn missing_file_is_an_empty_store() {
    let path = state_path();
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("auth_session"), None);
    assert!(!path.exists());
}

#[test]
fn session_and_two_factor_survive_a_restart() {
    let path = state_path();

    let mut gate = SessionGate::new(Box::new(FileStore::open(&path).unwrap()));
    gate.sign_in(&Credentials::new("howard.woods@trustbank.com", ""))
        .unwrap();
    let mut code = Passcode::new();
    code.paste("123456");
    gate.provision_two_factor(&ProvisioningSecret::default(), &code, &SimulatedVerifier)
        .unwrap();
    drop(gate);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["auth_session"], "active");
    assert_eq!(raw["trustbank_2fa"], "true");

    let mut gate = SessionGate::new(Box::new(FileStore::open(&path).unwrap()));
    assert!(gate.is_authenticated());
    assert!(gate.two_factor_enabled());

    gate.sign_out().unwrap();
    assert_eq!(
        gate.sign_in(&Credentials::default()).unwrap(),
        SignInStep::SecondFactorRequired
    );

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("auth_session"), None);
    assert_eq!(reopened.get("trustbank_2fa").as_deref(), Some("true"));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
