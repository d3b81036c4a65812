use serde::{Deserialize, Serialize};

/// A registered member, identified externally by an RFID credential.
///
/// The PIN is compared verbatim at login and never serialized into
/// responses. Records are immutable after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Generated user ID
    pub id: u64,
    /// Unique external credential string
    pub rfid: String,
    /// Shared secret checked at login; redacted from wire payloads
    #[serde(skip_serializing, default)]
    pub pin: String,
    /// Display name
    pub name: String,
}

impl User {
    pub fn new(id: u64, rfid: String, pin: String, name: String) -> Self {
        Self { id, rfid, pin, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_not_serialized() {
        let user = User::new(1, "12345".to_string(), "1234".to_string(), "Demo User".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["rfid"], "12345");
        assert_eq!(json["name"], "Demo User");
        assert!(json.get("pin").is_none());
    }

    #[test]
    fn test_deserialize_without_pin() {
        let user: User =
            serde_json::from_str(r#"{"id":2,"rfid":"admin","name":"Admin User"}"#).unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(user.rfid, "admin");
        assert_eq!(user.pin, "");
    }
}
