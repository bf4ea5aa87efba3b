use serde::{Deserialize, Serialize};

use crate::Role;

/// The slice of a stored user document the gate reads.
///
/// Missing `role` means no role; missing flags read as `false`. Any other
/// fields on the stored document are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,

    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default)]
    pub verified: bool,

    #[serde(default)]
    pub fired: bool,
}

impl UserRecord {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: None,
            verified: false,
            fired: false,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn fired(mut self) -> Self {
        self.fired = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_document_reads_as_unprivileged() {
        let record: UserRecord = serde_json::from_value(json!({
            "email": "new@example.com",
            "name": "New Hire",
            "designation": "Sales Assistant",
        }))
        .unwrap();

        assert_eq!(record, UserRecord::new("new@example.com"));
    }

    #[test]
    fn null_role_is_no_role() {
        let record: UserRecord =
            serde_json::from_value(json!({ "email": "a@example.com", "role": null })).unwrap();
        assert_eq!(record.role, None);
    }

    #[test]
    fn full_document_is_read() {
        let record: UserRecord = serde_json::from_value(json!({
            "email": "hr@example.com",
            "role": "HR",
            "verified": true,
            "fired": true,
        }))
        .unwrap();

        assert_eq!(record, UserRecord::new("hr@example.com").with_role(Role::HR).verified().fired());
    }
}
