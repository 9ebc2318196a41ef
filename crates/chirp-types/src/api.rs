use serde::Deserialize;

// Inbound bodies default missing fields so that absent values fail domain
// validation (400) instead of body parsing.

// -- Accounts --

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// -- Messages --

/// Body of `POST /messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMessage {
    pub posted_by: Option<i64>,
    pub message_text: String,
    pub time_posted_epoch: Option<i64>,
}

/// Body of `PATCH /messages/{message_id}`. Only the text is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMessageRequest {
    pub message_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_tolerates_missing_fields() {
        let req: NewMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(req.posted_by, None);
        assert!(req.message_text.is_empty());
        assert_eq!(req.time_posted_epoch, None);
    }

    #[test]
    fn credentials_ignore_account_id() {
        let req: Credentials =
            serde_json::from_str(r#"{"accountId": 9, "username": "bob", "password": "1234"}"#)
                .unwrap();
        assert_eq!(req.username, "bob");
        assert_eq!(req.password, "1234");
    }
}
