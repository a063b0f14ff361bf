pub mod catalog;
pub mod schedule;

use serde::{Deserialize, Deserializer};

pub use catalog::{
    Catalog, CatalogTable, Classroom, Group, NamedRow, NewClassroom, NewGroup, NewSubject,
    NewTeacher, Subject, Teacher,
};
pub use schedule::{NewSchedule, Schedule, ScheduleView};

/// Absent and `null` fields in create bodies decode to the type's zero value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
