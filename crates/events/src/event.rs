use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an event asks the consuming service to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Create,
    Delete,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Create => write!(f, "CREATE"),
            EventType::Delete => write!(f, "DELETE"),
        }
    }
}

/// Envelope exchanged on the asynchronous write path.
///
/// Immutable once constructed. `event_created_at` is stamped at
/// construction and takes no part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<K, T> {
    event_type: EventType,
    key: K,
    data: Option<T>,
    event_created_at: DateTime<Utc>,
}

impl<K, T> Event<K, T> {
    /// Creates an event stamped with the current time.
    pub fn new(event_type: EventType, key: K, data: Option<T>) -> Self {
        Self {
            event_type,
            key,
            data,
            event_created_at: Utc::now(),
        }
    }

    /// A CREATE event carrying the entity to create.
    pub fn create(key: K, data: T) -> Self {
        Self::new(EventType::Create, key, Some(data))
    }

    /// A DELETE event; deletes carry no payload.
    pub fn delete(key: K) -> Self {
        Self::new(EventType::Delete, key, None)
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.event_created_at
    }

    /// Splits the event into key and payload.
    pub fn into_parts(self) -> (EventType, K, Option<T>) {
        (self.event_type, self.key, self.data)
    }
}

impl<K: PartialEq, T: PartialEq> PartialEq for Event<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.event_type == other.event_type && self.key == other.key && self.data == other.data
    }
}

impl<K: Eq, T: Eq> Eq for Event<K, T> {}

/// Returns true if a published JSON payload describes the same event as
/// `expected`, ignoring the creation timestamp.
///
/// Both sides are normalized through `serde_json::Value`, so field order
/// and whitespace do not matter.
pub fn is_same_event<K: Serialize, T: Serialize>(payload: &str, expected: &Event<K, T>) -> bool {
    let Ok(mut actual) = serde_json::from_str::<serde_json::Value>(payload) else {
        return false;
    };
    let Ok(mut expected) = serde_json::to_value(expected) else {
        return false;
    };

    for value in [&mut actual, &mut expected] {
        if let Some(map) = value.as_object_mut() {
            map.remove("eventCreatedAt");
        }
    }
    actual == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: i32,
        name: String,
    }

    #[test]
    fn wire_format_uses_camel_case_and_uppercase_type() {
        let event = Event::create(1, Payload { id: 1, name: "n".into() });
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "CREATE");
        assert_eq!(json["key"], 1);
        assert_eq!(json["data"]["name"], "n");
        assert!(json["eventCreatedAt"].is_string());
    }

    #[test]
    fn delete_carries_null_data() {
        let event: Event<i32, Payload> = Event::delete(1);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "DELETE");
        assert!(json["data"].is_null());
        assert!(event.data().is_none());
    }

    #[test]
    fn json_roundtrip_is_equal_ignoring_timestamp() {
        let event = Event::create(3, Payload { id: 3, name: "x".into() });
        let json = serde_json::to_string(&event).unwrap();
        let back: Event<i32, Payload> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
        assert_eq!(back.created_at(), event.created_at());
    }

    #[test]
    fn equality_ignores_created_at() {
        let first: Event<i32, Payload> = Event::delete(5);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second: Event<i32, Payload> = Event::delete(5);

        assert_ne!(first.created_at(), second.created_at());
        assert_eq!(first, second);
        assert_ne!(first, Event::delete(6));
    }

    #[test]
    fn same_event_matches_published_json() {
        let expected = Event::create(1, Payload { id: 1, name: "n".into() });
        let published = r#"{"key":1,"eventType":"CREATE","eventCreatedAt":"2020-01-01T00:00:00Z","data":{"name":"n","id":1}}"#;

        assert!(is_same_event(published, &expected));
        assert!(!is_same_event(published, &Event::<i32, Payload>::delete(1)));
        assert!(!is_same_event("not json", &expected));
    }

    #[test]
    fn missing_data_field_decodes_as_none() {
        let event: Event<i32, Payload> = serde_json::from_str(
            r#"{"eventType":"DELETE","key":4,"eventCreatedAt":"2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(event.event_type(), EventType::Delete);
        assert_eq!(*event.key(), 4);
        assert!(event.data().is_none());
    }
}
