//! Fixed dataset served when no live store is configured.
//!
//! Identifiers and timestamps are constants so every call, in every
//! process, returns identical documents. `registered` on each event matches
//! the registrations listed for it.

use chrono::{DateTime, Utc};

use crate::domain::{
    Event, EventId, ExtraFields, RegistrantData, Registration, RegistrationId,
};

const TECH_SYMPOSIUM: u128 = 0x6d1f_0a52_7c3e_4b8a_9e11_0000_0000_0001;
const CULTURAL_FEST: u128 = 0x6d1f_0a52_7c3e_4b8a_9e11_0000_0000_0002;
const CAREER_WORKSHOP: u128 = 0x6d1f_0a52_7c3e_4b8a_9e11_0000_0000_0003;

fn at(unix_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_secs, 0).unwrap_or_default()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Demo events.
#[must_use]
pub fn demo_events() -> Vec<Event> {
    vec![
        Event {
            id: EventId::from_uuid(uuid::Uuid::from_u128(TECH_SYMPOSIUM)),
            title: "Tech Symposium 2025".to_string(),
            description: text("Talks and live demos from final-year project teams."),
            date: text("2025-03-14"),
            time: text("10:00"),
            venue: text("Main Auditorium"),
            category: text("Technical"),
            organizer: text("Computer Science Department"),
            image_url: None,
            capacity: 100,
            registered: 2,
            created_at: at(1_736_499_600),
            extra: ExtraFields::new(),
        },
        Event {
            id: EventId::from_uuid(uuid::Uuid::from_u128(CULTURAL_FEST)),
            title: "Annual Cultural Fest".to_string(),
            description: text("Music, dance and drama across three stages."),
            date: text("2025-04-02"),
            time: text("17:30"),
            venue: text("Open Air Theatre"),
            category: text("Cultural"),
            organizer: text("Student Council"),
            image_url: None,
            capacity: 250,
            registered: 1,
            created_at: at(1_736_677_800),
            extra: ExtraFields::new(),
        },
        Event {
            id: EventId::from_uuid(uuid::Uuid::from_u128(CAREER_WORKSHOP)),
            title: "Career Guidance Workshop".to_string(),
            description: text("Resume reviews and mock interviews with alumni."),
            date: text("2025-04-20"),
            time: text("14:00"),
            venue: text("Seminar Hall B"),
            category: text("Workshop"),
            organizer: text("Placement Cell"),
            image_url: None,
            capacity: 40,
            registered: 0,
            created_at: at(1_737_381_600),
            extra: ExtraFields::new(),
        },
    ]
}

/// Demo registrations.
#[must_use]
pub fn demo_registrations() -> Vec<Registration> {
    let registrant = |name: &str, email: &str, department: &str, year: &str| RegistrantData {
        department: text(department),
        year: text(year),
        ..RegistrantData::named(name, email)
    };

    vec![
        Registration {
            id: RegistrationId::from_uuid(uuid::Uuid::from_u128(0xa001)),
            event_id: EventId::from_uuid(uuid::Uuid::from_u128(TECH_SYMPOSIUM)),
            registrant: registrant("Aarav Sharma", "aarav.sharma@college.edu", "CSE", "3"),
            registered_at: at(1_738_397_700),
        },
        Registration {
            id: RegistrationId::from_uuid(uuid::Uuid::from_u128(0xa002)),
            event_id: EventId::from_uuid(uuid::Uuid::from_u128(TECH_SYMPOSIUM)),
            registrant: registrant("Meera Iyer", "meera.iyer@college.edu", "ECE", "2"),
            registered_at: at(1_738_496_700),
        },
        Registration {
            id: RegistrationId::from_uuid(uuid::Uuid::from_u128(0xa003)),
            event_id: EventId::from_uuid(uuid::Uuid::from_u128(CULTURAL_FEST)),
            registrant: registrant("Rohan Das", "rohan.das@college.edu", "Mechanical", "4"),
            registered_at: at(1_738_772_400),
        },
    ]
}
