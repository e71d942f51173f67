use crate::layout::ExpansionState;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier shared by objectives, users and business units.
///
/// The backend sends identifiers either as JSON numbers or as numeric
/// strings; both forms are parsed here once so the rest of the crate only
/// compares integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record id {0:?}: expected a non-negative integer")]
pub struct RecordIdError(pub String);

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| RecordIdError(value.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(RecordId(value)),
            NumberOrString::String(value) => value.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A user as returned by the users endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: u64) -> Self {
        Self {
            id: RecordId(id),
            name: None,
            email: None,
        }
    }

    /// Same person: equal ids, or equal emails ignoring ASCII case.
    pub fn is_same_person(&self, other: &UserRef) -> bool {
        if self.id == other.id {
            return true;
        }
        match (self.email.as_deref(), other.email.as_deref()) {
            (Some(a), Some(b)) => !a.is_empty() && a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

/// Assigned user reference on an objective: either a bare id or a user object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserRefRepr")]
pub struct UserRef {
    pub id: RecordId,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserRefRepr {
    Id(RecordId),
    Record {
        id: RecordId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl From<UserRefRepr> for UserRef {
    fn from(repr: UserRefRepr) -> Self {
        match repr {
            UserRefRepr::Id(id) => UserRef {
                id,
                name: None,
                email: None,
            },
            UserRefRepr::Record { id, name, email } => UserRef { id, name, email },
        }
    }
}

/// Business unit reference: `{ "id": .. }`, `{ "business_unit_id": .. }` or a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BusinessUnitRepr")]
pub struct BusinessUnitRef {
    pub id: Option<RecordId>,
    pub business_unit_id: Option<RecordId>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BusinessUnitRepr {
    Id(RecordId),
    Record {
        #[serde(default)]
        id: Option<RecordId>,
        #[serde(default)]
        business_unit_id: Option<RecordId>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<BusinessUnitRepr> for BusinessUnitRef {
    fn from(repr: BusinessUnitRepr) -> Self {
        match repr {
            BusinessUnitRepr::Id(id) => BusinessUnitRef {
                id: Some(id),
                business_unit_id: None,
                name: None,
            },
            BusinessUnitRepr::Record {
                id,
                business_unit_id,
                name,
            } => BusinessUnitRef {
                id,
                business_unit_id,
                name,
            },
        }
    }
}

impl BusinessUnitRef {
    /// `id` takes priority over `business_unit_id`.
    pub fn key(&self) -> Option<RecordId> {
        self.id.or(self.business_unit_id)
    }
}

/// One OKR objective record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    /// `None` marks a root objective.
    #[serde(default, alias = "parent_id")]
    pub parent: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assigned_users: Vec<UserRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub business_units: Vec<BusinessUnitRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<BusinessUnitRef>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Objective {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: RecordId(id),
            name: name.into(),
            parent: None,
            status: None,
            due_date: None,
            assigned_users: Vec::new(),
            business_units: Vec::new(),
            business_unit_id: None,
            business_unit: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(RecordId(parent));
        self
    }

    pub fn with_assignee(mut self, user: u64) -> Self {
        self.assigned_users.push(UserRef {
            id: RecordId(user),
            name: None,
            email: None,
        });
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Sources in priority order: unit list, direct id, nested unit. First match wins.
    pub fn belongs_to_business_unit(&self, unit: RecordId) -> bool {
        if self
            .business_units
            .iter()
            .any(|entry| entry.key() == Some(unit))
        {
            return true;
        }
        if self.business_unit_id == Some(unit) {
            return true;
        }
        self.business_unit
            .as_ref()
            .is_some_and(|nested| nested.key() == Some(unit))
    }
}

/// Active filter selection of the tree view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub business_unit: Option<RecordId>,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        self.business_unit.is_some() || self.assigned_to.is_some()
    }

    pub fn matches_business_unit(&self, objective: &Objective) -> bool {
        self.business_unit
            .is_none_or(|unit| objective.belongs_to_business_unit(unit))
    }

    /// Exact match against the assigned user ids.
    pub fn matches_assignee(&self, objective: &Objective) -> bool {
        self.assigned_to
            .is_none_or(|user| objective.assigned_users.iter().any(|assigned| assigned.id == user))
    }

    pub fn matches(&self, objective: &Objective) -> bool {
        self.matches_business_unit(objective) && self.matches_assignee(objective)
    }
}

/// Everything besides the objectives that a layout pass reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutContext {
    #[serde(default)]
    pub viewer: Option<User>,
    /// Users visible to the viewer, used to resolve assignee names.
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub team_members: Vec<User>,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
}

fn default_viewport_width() -> f32 {
    1280.0
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            viewer: None,
            users: Vec::new(),
            team_members: Vec::new(),
            filters: Filters::default(),
            viewport_width: default_viewport_width(),
        }
    }
}

/// A complete layout request document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub context: LayoutContext,
    #[serde(default)]
    pub expansion: ExpansionState,
}
