//! Remote user service: wire model, service trait, and call descriptions.
//!
//! The controller never talks to the network itself. It describes what it
//! wants as a [`RemoteCall`], something executes it against a
//! [`RemoteUserService`], and the resulting [`CallOutcome`] is fed back.
pub mod http;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RemoteCallFailure;

pub use http::HttpUserService;

/// Identifier assigned by the remote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as returned by the service. Unknown JSON fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Fields of a user that have not been assigned an id yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Editable user fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserField {
    Name,
    Email,
    Phone,
}

impl UserField {
    pub const ALL: [UserField; 3] = [UserField::Name, UserField::Email, UserField::Phone];

    pub fn as_str(self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Email => "email",
            UserField::Phone => "phone",
        }
    }

    /// Column/form label.
    pub fn label(self) -> &'static str {
        match self {
            UserField::Name => "Name",
            UserField::Email => "Email",
            UserField::Phone => "Phone",
        }
    }

    /// Next field in form order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            UserField::Name => UserField::Email,
            UserField::Email => UserField::Phone,
            UserField::Phone => UserField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            UserField::Name => UserField::Phone,
            UserField::Email => UserField::Name,
            UserField::Phone => UserField::Email,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown user field '{0}' (expected name, email or phone)")]
pub struct UnknownField(pub String);

impl FromStr for UserField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(UserField::Name),
            "email" => Ok(UserField::Email),
            "phone" => Ok(UserField::Phone),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl UserRecord {
    pub fn field(&self, field: UserField) -> &str {
        match field {
            UserField::Name => &self.name,
            UserField::Email => &self.email,
            UserField::Phone => &self.phone,
        }
    }

    pub fn set_field(&mut self, field: UserField, value: String) {
        match field {
            UserField::Name => self.name = value,
            UserField::Email => self.email = value,
            UserField::Phone => self.phone = value,
        }
    }
}

impl NewUser {
    pub fn field(&self, field: UserField) -> &str {
        match field {
            UserField::Name => &self.name,
            UserField::Email => &self.email,
            UserField::Phone => &self.phone,
        }
    }

    pub fn set_field(&mut self, field: UserField, value: String) {
        match field {
            UserField::Name => self.name = value,
            UserField::Email => self.email = value,
            UserField::Phone => self.phone = value,
        }
    }
}

/// The four operations the remote user API offers.
#[async_trait]
pub trait RemoteUserService: Send + Sync {
    /// List users, optionally filtered server-side by a free-text query.
    async fn list(&self, query: Option<&str>) -> Result<Vec<UserRecord>, RemoteCallFailure>;

    /// Create a user; the returned record carries the assigned id.
    async fn create(&self, user: &NewUser) -> Result<UserRecord, RemoteCallFailure>;

    /// Replace the stored user with `id` by `user`.
    async fn update(&self, id: UserId, user: &UserRecord) -> Result<(), RemoteCallFailure>;

    async fn delete(&self, id: UserId) -> Result<(), RemoteCallFailure>;
}

/// A remote call the controller has committed to, busy flag already held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteCall {
    List { query: Option<String> },
    Create(NewUser),
    Update(UserRecord),
    Delete(UserId),
}

/// Completion of a [`RemoteCall`], carrying what the controller needs to apply it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    Listed(Result<Vec<UserRecord>, RemoteCallFailure>),
    Created(Result<UserRecord, RemoteCallFailure>),
    Updated {
        record: UserRecord,
        result: Result<(), RemoteCallFailure>,
    },
    Deleted {
        id: UserId,
        result: Result<(), RemoteCallFailure>,
    },
}

impl CallOutcome {
    pub fn failure(&self) -> Option<&RemoteCallFailure> {
        match self {
            CallOutcome::Listed(Err(e))
            | CallOutcome::Created(Err(e))
            | CallOutcome::Updated { result: Err(e), .. }
            | CallOutcome::Deleted { result: Err(e), .. } => Some(e),
            _ => None,
        }
    }
}

impl RemoteCall {
    /// Short operation name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteCall::List { .. } => "list",
            RemoteCall::Create(_) => "create",
            RemoteCall::Update(_) => "update",
            RemoteCall::Delete(_) => "delete",
        }
    }

    /// Run the call against `service`. Runs to completion; there is no timeout.
    pub async fn execute<S>(self, service: &S) -> CallOutcome
    where
        S: RemoteUserService + ?Sized,
    {
        match self {
            RemoteCall::List { query } => CallOutcome::Listed(service.list(query.as_deref()).await),
            RemoteCall::Create(user) => CallOutcome::Created(service.create(&user).await),
            RemoteCall::Update(record) => {
                let result = service.update(record.id, &record).await;
                CallOutcome::Updated { record, result }
            }
            RemoteCall::Delete(id) => CallOutcome::Deleted {
                id,
                result: service.delete(id).await,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_field_parses_only_known_names() {
        assert_eq!("name".parse::<UserField>(), Ok(UserField::Name));
        assert_eq!("phone".parse::<UserField>(), Ok(UserField::Phone));
        assert!("Name".parse::<UserField>().is_err());
        assert!("address".parse::<UserField>().is_err());
    }

    #[test]
    fn field_cycle_wraps() {
        let mut f = UserField::Name;
        for _ in 0..3 {
            f = f.next();
        }
        assert_eq!(f, UserField::Name);
        assert_eq!(UserField::Name.prev(), UserField::Phone);
    }

    #[test]
    fn record_ignores_extra_json_fields() {
        let json = r#"{"id":1,"name":"Leanne Graham","username":"Bret","email":"Sincere@april.biz",
            "address":{"city":"Gwenborough"},"phone":"1-770-736-8031 x56442","website":"hildegard.org"}"#;
        let rec: UserRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(rec.id, UserId(1));
        assert_eq!(rec.name, "Leanne Graham");
        assert_eq!(rec.phone, "1-770-736-8031 x56442");
    }

    #[test]
    fn new_user_serializes_without_id() {
        let user = NewUser {
            name: "New".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&user).expect("encode");
        assert!(value.get("id").is_none());
        assert_eq!(value["name"], "New");
    }
}
