pub const INSERT_PROFILE: &str = r#"
INSERT INTO profiles (account_id, role, email, display_name, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

pub const SELECT_PROFILE: &str = r#"
SELECT account_id, role, email, display_name, created_at
FROM profiles WHERE account_id = ?
"#;

pub const INSERT_STUDENT: &str = r#"
INSERT INTO students (account_id, name, usn, email, semester, contact_no, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_STUDENT: &str = r#"
SELECT account_id, name, usn, email, semester, contact_no, created_at
FROM students WHERE account_id = ?
"#;

pub const SELECT_STUDENT_BY_USN: &str = r#"
SELECT account_id, name, usn, email, semester, contact_no, created_at
FROM students WHERE usn = ?
"#;

pub const SELECT_STUDENT_BY_EMAIL: &str = r#"
SELECT account_id, name, usn, email, semester, contact_no, created_at
FROM students WHERE email = ? LIMIT 1
"#;

pub const UPDATE_STUDENT: &str = r#"
UPDATE students SET name = ?, usn = ?, semester = ?, contact_no = ?
WHERE account_id = ?
"#;

pub const SELECT_STUDENT_EVENT_IDS: &str = r#"
SELECT event_id FROM student_events WHERE usn = ? ORDER BY created_at ASC
"#;

pub const PRUNE_STUDENT_EVENTS: &str = r#"
DELETE FROM student_events
WHERE NOT EXISTS (
    SELECT 1 FROM registrations r
    WHERE r.event_id = student_events.event_id AND r.usn = student_events.usn
)
"#;

pub const INSERT_ORGANIZER: &str = r#"
INSERT INTO organizers (account_id, org_name, email, description, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

pub const SELECT_ORGANIZER: &str = r#"
SELECT account_id, org_name, email, description, created_at
FROM organizers WHERE account_id = ?
"#;

pub const SELECT_ORGANIZER_BY_EMAIL: &str = r#"
SELECT account_id, org_name, email, description, created_at
FROM organizers WHERE email = ? LIMIT 1
"#;

pub const UPDATE_ORGANIZER: &str = r#"
UPDATE organizers SET org_name = ?, description = ? WHERE account_id = ?
"#;

pub const INSERT_EVENT: &str = r#"
INSERT INTO events (
    id, name, date, time, venue, description, category, organizer_id,
    image_name, registration_count, capacity, created_at, updated_at
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_EVENT: &str = r#"
SELECT id, name, date, time, venue, description, category, organizer_id,
       image_name, registration_count, capacity, created_at, updated_at
FROM events WHERE id = ?
"#;

pub const SELECT_ALL_EVENTS: &str = r#"
SELECT id, name, date, time, venue, description, category, organizer_id,
       image_name, registration_count, capacity, created_at, updated_at
FROM events ORDER BY date ASC
"#;

pub const SELECT_EVENTS_BY_ORGANIZER: &str = r#"
SELECT id, name, date, time, venue, description, category, organizer_id,
       image_name, registration_count, capacity, created_at, updated_at
FROM events WHERE organizer_id = ? ORDER BY date ASC
"#;

// Descriptive fields only. The registration counter is owned by the
// registration workflow and the repair pass.
pub const UPDATE_EVENT: &str = r#"
UPDATE events SET
    name = ?, date = ?, time = ?, venue = ?, description = ?, category = ?,
    image_name = ?, capacity = ?, updated_at = ?
WHERE id = ?
"#;

pub const DELETE_EVENT: &str = "DELETE FROM events WHERE id = ?";

pub const COUNT_REGISTRATIONS_FOR_EVENT: &str =
    "SELECT COUNT(*) FROM registrations WHERE event_id = ?";

pub const SET_EVENT_REGISTRATION_COUNT: &str =
    "UPDATE events SET registration_count = ?, updated_at = ? WHERE id = ?";

pub const INCREMENT_EVENT_REGISTRATIONS: &str = r#"
UPDATE events SET registration_count = registration_count + 1, updated_at = ?
WHERE id = ?
"#;

pub const SELECT_EVENT_REGISTRATION_COUNT: &str =
    "SELECT registration_count FROM events WHERE id = ?";

pub const DECREMENT_EVENT_REGISTRATIONS: &str = r#"
UPDATE events SET registration_count = registration_count - 1, updated_at = ?
WHERE id = ? AND registration_count > 0
"#;

pub const INSERT_REGISTRATION: &str = r#"
INSERT INTO registrations (id, event_id, name, usn, email, semester, contact_no, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_REGISTRATION: &str = r#"
SELECT id, event_id, name, usn, email, semester, contact_no, created_at
FROM registrations WHERE id = ?
"#;

pub const SELECT_REGISTRATIONS_BY_EVENT: &str = r#"
SELECT id, event_id, name, usn, email, semester, contact_no, created_at
FROM registrations WHERE event_id = ? ORDER BY created_at ASC
"#;

pub const UPDATE_REGISTRATION: &str = r#"
UPDATE registrations SET name = ?, usn = ?, semester = ?, contact_no = ?
WHERE id = ?
"#;

pub const DELETE_REGISTRATION: &str = "DELETE FROM registrations WHERE id = ?";

pub const DELETE_REGISTRATIONS_BY_EVENT: &str =
    "DELETE FROM registrations WHERE event_id = ?";

pub const INSERT_STUDENT_EVENT: &str = r#"
INSERT OR IGNORE INTO student_events (usn, event_id, created_at) VALUES (?, ?, ?)
"#;

pub const DELETE_STUDENT_EVENT: &str =
    "DELETE FROM student_events WHERE usn = ? AND event_id = ?";

pub const DELETE_STUDENT_EVENTS_BY_EVENT: &str =
    "DELETE FROM student_events WHERE event_id = ?";

pub const INSERT_FEEDBACK: &str = r#"
INSERT INTO feedback (event_id, usn, author_email, author_name, rating, comment, submitted_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_FEEDBACK: &str = r#"
SELECT event_id, usn, author_email, author_name, rating, comment, submitted_at
FROM feedback WHERE event_id = ? AND usn = ?
"#;

pub const SELECT_FEEDBACK_BY_EVENT: &str = r#"
SELECT event_id, usn, author_email, author_name, rating, comment, submitted_at
FROM feedback WHERE event_id = ? ORDER BY submitted_at ASC
"#;
