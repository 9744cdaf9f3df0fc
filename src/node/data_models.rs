use crate::models::Credentials;
use rocket::serde::json::{serde_json, Value};
use rocket::serde::Deserialize;

/// Form-encoded request body as ordered name/value pairs.
pub type FormPayload = Vec<(String, String)>;

/// Reply of the hardware control query. Only the `data` array is read;
/// `datumQueryCommand`, `tz` and friends are ignored. Entries are kept as raw
/// JSON so that odd neighbours don't spoil the switch lookup.
#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct StatusResponse {
    pub data: Vec<Value>,
}

impl StatusResponse {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Whether the switch with `source_id` reports 1. A missing entry or value
    /// counts as off.
    pub fn switch_is_on(&self, source_id: &str) -> bool {
        self.data
            .iter()
            .rev()
            .find(|datum| datum.get("sourceId").and_then(Value::as_str) == Some(source_id))
            .and_then(|datum| datum.get("integerValue"))
            .and_then(Value::as_i64)
            == Some(1)
    }
}

pub fn login_form(credentials: &Credentials) -> FormPayload {
    vec![
        ("j_username".to_string(), credentials.username.clone()),
        ("j_password".to_string(), credentials.password.clone()),
    ]
}

/// Body of a `SetControlParameter` instruction flipping `switch_source_id`.
pub fn charge_control_form(node_id: &str, switch_source_id: &str, on: bool) -> FormPayload {
    vec![
        ("nodeId".to_string(), node_id.to_string()),
        ("topic".to_string(), "SetControlParameter".to_string()),
        ("parameters[0].name".to_string(), switch_source_id.to_string()),
        (
            "parameters[0].value".to_string(),
            if on { "1" } else { "0" }.to_string(),
        ),
    ]
}
