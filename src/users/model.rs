use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Row of the `users` table, also the JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32, // assigned by the database
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_status: String,
    pub department: String,
}

/// Request body for create and update.
///
/// A `user_id` in the body must be an integer but is otherwise ignored:
/// the id always comes from the database or the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default, skip_serializing)]
    pub user_id: Option<i32>,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub department: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewUser {
    pub fn with_id(self, user_id: i32) -> User {
        User {
            user_id,
            user_name: self.user_name,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            user_status: self.user_status,
            department: self.department,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_supplied_id_is_ignored() {
        let body = r#"{"user_id":99,"user_name":"jdoe","first_name":"Jane","last_name":"Doe",
            "email":"jane@x.com","user_status":"active","department":"eng"}"#;
        let new_user: NewUser = serde_json::from_str(body).unwrap();
        let user = new_user.with_id(7);
        assert_eq!(user.user_id, 7);
        assert_eq!(user.user_name, "jdoe");
    }

    #[test]
    fn status_and_department_default_to_empty() {
        let body = r#"{"user_name":"jdoe","first_name":"Jane","last_name":"Doe","email":"jane@x.com"}"#;
        let new_user: NewUser = serde_json::from_str(body).unwrap();
        assert_eq!(new_user.user_status, "");
        assert_eq!(new_user.department, "");
    }

    #[test]
    fn null_status_and_department_become_empty() {
        let body = r#"{"user_name":"jdoe","first_name":"Jane","last_name":"Doe","email":"jane@x.com",
            "user_status":null,"department":null}"#;
        let new_user: NewUser = serde_json::from_str(body).unwrap();
        assert_eq!(new_user.user_status, "");
        assert_eq!(new_user.department, "");
    }

    #[test]
    fn non_integer_caller_id_is_rejected() {
        let body = r#"{"user_id":"x","user_name":"jdoe","first_name":"Jane","last_name":"Doe","email":"jane@x.com"}"#;
        assert!(serde_json::from_str::<NewUser>(body).is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let body = r#"{"user_name":"jdoe","first_name":"Jane","email":"jane@x.com"}"#;
        assert!(serde_json::from_str::<NewUser>(body).is_err());
    }

    #[test]
    fn user_serializes_with_snake_case_fields() {
        let user = User {
            user_id: 1,
            user_name: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            user_status: "active".into(),
            department: "eng".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["user_status"], "active");
    }
}
