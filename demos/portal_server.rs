//! Demo portal server with in-memory stores and a mock identity provider.
//!
//! Seeds one encrypted record (`R1`) and one enrolled staff member, then
//! serves the full portal surface on 127.0.0.1:8000.
//!
//! ```sh
//! RUST_LOG=info cargo run --example portal_server
//! ```

use std::sync::Arc;

use medgate::api::axum::{portal_routes, AppState};
use medgate::events::listeners::LoggingListener;
use medgate::events::register_event_listeners;
use medgate::session::SessionConfig;
use medgate::staff::StaffRecord;
use medgate::{
    BiometricPolicy, ChallengeGenerator, InMemoryRecordStore, InMemorySessionRepository,
    InMemoryStaffRepository, InMemoryTokenLedger, MockIdentityProvider, PortalConfig,
    RecordCipher, RecordStore, SecretString, StaffRepository, TokenLedger, TotpVerifier,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    // Fall back to demo values so the example runs without a .env file.
    let config = PortalConfig::from_env().unwrap_or_else(|err| {
        log::warn!(target: "medgate", "msg=\"using demo config\" reason=\"{}\"", err);
        demo_config()
    });

    let key = match config.encryption_key {
        Some(key) => key,
        None => RecordCipher::generate_key()?,
    };
    let cipher = Arc::new(RecordCipher::new(key)?);

    let records = InMemoryRecordStore::new();
    let sealed = cipher.encrypt(b"Patient: Alice Doe | Blood Type: O+ | Allergy: Penicillin")?;
    records.put("R1", sealed).await?;

    let staff = InMemoryStaffRepository::new();
    seed_demo_staff(&staff).await?;

    // One-time access tokens are a library component; show the contract.
    let ledger = InMemoryTokenLedger::new(config.gate.access_token_ttl);
    let issued = ledger.issue().await?;
    log::info!(
        target: "medgate",
        "msg=\"ledger demo\" first_redeem={} second_redeem={}",
        ledger.redeem(&issued.token).await?,
        ledger.redeem(&issued.token).await?
    );

    let session_config = SessionConfig {
        secret_key: config.session_secret.clone(),
        session_lifetime: config.gate.session_lifetime,
        ..Default::default()
    };
    session_config.validate().map_err(|msg| msg.to_owned())?;

    let state = AppState {
        sessions: InMemorySessionRepository::new(),
        staff,
        records,
        identity: MockIdentityProvider::new("alice@example.com", "Alice Doe"),
        cipher,
        totp: Arc::new(TotpVerifier::new(&config.totp_secret)?),
        challenges: Arc::new(ChallengeGenerator::new(config.gate.challenge_window_secs)),
        policy: BiometricPolicy::new(config.gate.biometric_threshold),
        session_config: Arc::new(session_config),
    };

    let app = portal_routes().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
    log::info!(target: "medgate", "msg=\"listening\" addr=\"127.0.0.1:8000\"");
    axum::serve(listener, app).await?;

    Ok(())
}

fn demo_config() -> PortalConfig {
    PortalConfig {
        client_id: "demo-client".to_owned(),
        client_secret: SecretString::new("demo-client-secret"),
        redirect_uri: "http://localhost:8000/auth/callback".to_owned(),
        session_secret: SecretString::new("demo-session-secret-at-least-32-bytes!!"),
        totp_secret: SecretString::new(medgate::config::DEFAULT_2FA_SECRET),
        encryption_key: None,
        gate: Default::default(),
    }
}

async fn seed_demo_staff(staff: &InMemoryStaffRepository) -> Result<(), medgate::AuthError> {
    staff
        .create(StaffRecord {
            staff_id: "STAFF_DEMO_1".to_owned(),
            name: "Dr. Smith".to_owned(),
            email: "smith@example.com".to_owned(),
            license_number: "LIC-001".to_owned(),
            department: "Cardiology".to_owned(),
            password: SecretString::new("demo-password"),
            face_image: "ZGVtby1mYWNlLWJsb2I=".to_owned(),
            voice_recording: "ZGVtby12b2ljZS1ibG9i".to_owned(),
            created_at: chrono::Utc::now(),
        })
        .await
}
