use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::null_as_default;

/// One timetable slot as written by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i32,
    pub day_of_week: String,
    pub timeslot: i32,
    pub teacher_id: i32,
    pub group_id: i32,
    pub subject_id: i32,
    pub classroom_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub day_of_week: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeslot: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teacher_id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject_id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classroom_id: i32,
}

impl NewSchedule {
    pub fn into_schedule(self, id: i32) -> Schedule {
        Schedule {
            id,
            day_of_week: self.day_of_week,
            timeslot: self.timeslot,
            teacher_id: self.teacher_id,
            group_id: self.group_id,
            subject_id: self.subject_id,
            classroom_id: self.classroom_id,
        }
    }
}

/// Read-only projection returned by `GET /api/schedules`: the schedule row
/// joined with the names of everything it references. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub id: i32,
    pub day_of_week: String,
    pub timeslot: i32,

    pub teacher_id: i32,
    pub teacher_name: String,

    pub group_id: i32,
    pub group_name: String,

    pub subject_id: i32,
    pub subject_name: String,

    pub classroom_id: i32,
    pub classroom_name: String,
}
