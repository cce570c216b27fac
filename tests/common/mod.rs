use campus_events::domain::entities::{Account, Event, EventCategory, RegistrationSnapshot};
use campus_events::domain::value_objects::Usn;
use campus_events::infrastructure::database::ConnectionPool;
use campus_events::shared::AppConfig;
use campus_events::state::AppState;
use campus_events::application::services::NewEvent;
use chrono::{DateTime, TimeZone, Utc};

pub async fn test_app() -> AppState {
    let pool = ConnectionPool::from_memory().await.expect("pool");
    pool.migrate().await.expect("migrate");
    let mut config = AppConfig::default();
    config.retry.backoff_ms = 1;
    config.repair.auto_repair = false;
    AppState::assemble(config, pool)
}

pub fn account(id: &str, email: &str, name: &str) -> Account {
    Account {
        id: id.to_string(),
        email: email.to_string(),
        display_name: Some(name.to_string()),
    }
}

/// Signs the organizer in and creates its profile on first use.
pub async fn sign_in_organizer(app: &AppState, id: &str, email: &str, org_name: &str) {
    app.auth.sign_in(account(id, email, org_name)).await;
    if app.identity.resolve().await.expect("resolve")
        == campus_events::application::services::Resolution::ProfileIncomplete
    {
        app.identity
            .register_organizer_profile(org_name, "created by test fixture")
            .await
            .expect("organizer profile");
    }
}

/// Signs the student in and creates its profile on first use.
pub async fn sign_in_student(app: &AppState, id: &str, email: &str, name: &str, usn: &str) {
    app.auth.sign_in(account(id, email, name)).await;
    if app.identity.resolve().await.expect("resolve")
        == campus_events::application::services::Resolution::ProfileIncomplete
    {
        app.identity
            .register_student_profile(name, &Usn::new(usn).expect("usn"), 4, None)
            .await
            .expect("student profile");
    }
}

/// Creates an event as the currently signed-in organizer.
pub async fn create_event(app: &AppState, name: &str, capacity: Option<u32>) -> Event {
    app.directory
        .create_event(NewEvent {
            name: name.to_string(),
            date: event_date(),
            time: "10:00".to_string(),
            venue: "Main Auditorium".to_string(),
            description: "created by test fixture".to_string(),
            category: EventCategory::Workshop,
            capacity,
            image_name: None,
        })
        .await
        .expect("event created")
}

pub fn snapshot(name: &str, usn: &str, email: &str) -> RegistrationSnapshot {
    RegistrationSnapshot {
        name: name.to_string(),
        usn: Usn::new(usn).expect("usn"),
        email: email.to_string(),
        semester: 4,
        contact_no: None,
    }
}

pub fn event_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 5, 0, 0, 0).unwrap()
}

/// An instant well before the fixture event takes place.
pub fn before_event() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

/// An instant after the fixture event has taken place.
pub fn after_event() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 6, 0, 0, 0).unwrap()
}
