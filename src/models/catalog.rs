//! Reference entities a schedule entry points at.
//!
//! Teachers, groups, subjects and classrooms all have the same shape: an
//! integer id plus one name column. They differ only in table, column and
//! JSON field name, so the data layer and the handlers treat them through
//! [`Catalog`] and [`CatalogTable`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::FromRow;

use super::null_as_default;

/// Table descriptor for one of the four name-only entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    Teachers,
    Groups,
    Subjects,
    Classrooms,
}

impl CatalogTable {
    pub const ALL: [CatalogTable; 4] = [
        CatalogTable::Teachers,
        CatalogTable::Groups,
        CatalogTable::Subjects,
        CatalogTable::Classrooms,
    ];

    pub fn table(self) -> &'static str {
        match self {
            CatalogTable::Teachers => "teachers",
            CatalogTable::Groups => "groups",
            CatalogTable::Subjects => "subjects",
            CatalogTable::Classrooms => "classrooms",
        }
    }

    pub fn name_column(self) -> &'static str {
        match self {
            CatalogTable::Teachers => "full_name",
            CatalogTable::Groups => "group_name",
            CatalogTable::Subjects => "subject_name",
            CatalogTable::Classrooms => "room_name",
        }
    }

    /// Singular noun used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            CatalogTable::Teachers => "teacher",
            CatalogTable::Groups => "group",
            CatalogTable::Subjects => "subject",
            CatalogTable::Classrooms => "classroom",
        }
    }
}

/// Row shape shared by every catalog table (`SELECT id, <column> AS name`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct NamedRow {
    pub id: i32,
    pub name: String,
}

pub trait Catalog: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Request body accepted on create; carries no id.
    type Draft: DeserializeOwned + Send + Sync + 'static;

    const TABLE: CatalogTable;

    fn from_row(row: NamedRow) -> Self;
    fn from_draft(id: i32, draft: Self::Draft) -> Self;
    fn draft_name(draft: &Self::Draft) -> &str;
    fn id(&self) -> i32;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i32,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

impl Catalog for Teacher {
    type Draft = NewTeacher;
    const TABLE: CatalogTable = CatalogTable::Teachers;

    fn from_row(row: NamedRow) -> Self {
        Self {
            id: row.id,
            full_name: row.name,
        }
    }

    fn from_draft(id: i32, draft: NewTeacher) -> Self {
        Self {
            id,
            full_name: draft.full_name,
        }
    }

    fn draft_name(draft: &NewTeacher) -> &str {
        &draft.full_name
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i32,
    pub group_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
}

impl Catalog for Group {
    type Draft = NewGroup;
    const TABLE: CatalogTable = CatalogTable::Groups;

    fn from_row(row: NamedRow) -> Self {
        Self {
            id: row.id,
            group_name: row.name,
        }
    }

    fn from_draft(id: i32, draft: NewGroup) -> Self {
        Self {
            id,
            group_name: draft.group_name,
        }
    }

    fn draft_name(draft: &NewGroup) -> &str {
        &draft.group_name
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.group_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i32,
    pub subject_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject_name: String,
}

impl Catalog for Subject {
    type Draft = NewSubject;
    const TABLE: CatalogTable = CatalogTable::Subjects;

    fn from_row(row: NamedRow) -> Self {
        Self {
            id: row.id,
            subject_name: row.name,
        }
    }

    fn from_draft(id: i32, draft: NewSubject) -> Self {
        Self {
            id,
            subject_name: draft.subject_name,
        }
    }

    fn draft_name(draft: &NewSubject) -> &str {
        &draft.subject_name
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.subject_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: i32,
    pub room_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassroom {
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_name: String,
}

impl Catalog for Classroom {
    type Draft = NewClassroom;
    const TABLE: CatalogTable = CatalogTable::Classrooms;

    fn from_row(row: NamedRow) -> Self {
        Self {
            id: row.id,
            room_name: row.name,
        }
    }

    fn from_draft(id: i32, draft: NewClassroom) -> Self {
        Self {
            id,
            room_name: draft.room_name,
        }
    }

    fn draft_name(draft: &NewClassroom) -> &str {
        &draft.room_name
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.room_name
    }
}
