//! In-process [`Store`] used by the test suite and for running the service
//! without Postgres.
//!
//! Mirrors what the bundled schema enforces: per-table serial ids, foreign
//! keys from `schedules` checked on write, and deletes of referenced rows
//! rejected. The schedule view is an inner join, so an entry whose
//! reference does not resolve is skipped rather than reported.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Store, StoreError};
use crate::models::{CatalogTable, NamedRow, NewSchedule, Schedule, ScheduleView};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, value: T) -> i32 {
        self.last_id += 1;
        self.rows.insert(self.last_id, value);
        self.last_id
    }
}

#[derive(Default)]
struct Tables {
    named: HashMap<CatalogTable, Table<String>>,
    schedules: Table<Schedule>,
}

impl Tables {
    fn named(&mut self, table: CatalogTable) -> &mut Table<String> {
        self.named.entry(table).or_default()
    }

    fn name_of(&self, table: CatalogTable, id: i32) -> Option<&String> {
        self.named.get(&table).and_then(|t| t.rows.get(&id))
    }

    fn check_references(&self, schedule: &Schedule) -> Result<(), StoreError> {
        let refs = [
            (CatalogTable::Teachers, schedule.teacher_id),
            (CatalogTable::Groups, schedule.group_id),
            (CatalogTable::Subjects, schedule.subject_id),
            (CatalogTable::Classrooms, schedule.classroom_id),
        ];
        for (table, id) in refs {
            if self.name_of(table, id).is_none() {
                return Err(StoreError::ForeignKey(format!(
                    "schedules references missing {} {}",
                    table.label(),
                    id
                )));
            }
        }
        Ok(())
    }

    fn is_referenced(&self, table: CatalogTable, id: i32) -> bool {
        self.schedules.rows.values().any(|s| {
            let fk = match table {
                CatalogTable::Teachers => s.teacher_id,
                CatalogTable::Groups => s.group_id,
                CatalogTable::Subjects => s.subject_id,
                CatalogTable::Classrooms => s.classroom_id,
            };
            fk == id
        })
    }

    fn view(&self, s: &Schedule) -> Option<ScheduleView> {
        Some(ScheduleView {
            id: s.id,
            day_of_week: s.day_of_week.clone(),
            timeslot: s.timeslot,
            teacher_id: s.teacher_id,
            teacher_name: self.name_of(CatalogTable::Teachers, s.teacher_id)?.clone(),
            group_id: s.group_id,
            group_name: self.name_of(CatalogTable::Groups, s.group_id)?.clone(),
            subject_id: s.subject_id,
            subject_name: self.name_of(CatalogTable::Subjects, s.subject_id)?.clone(),
            classroom_id: s.classroom_id,
            classroom_name: self
                .name_of(CatalogTable::Classrooms, s.classroom_id)?
                .clone(),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_named(&self, table: CatalogTable) -> Result<Vec<NamedRow>, StoreError> {
        let mut tables = self.tables.lock().await;
        let rows = tables
            .named(table)
            .rows
            .iter()
            .map(|(id, name)| NamedRow {
                id: *id,
                name: name.clone(),
            })
            .collect();
        Ok(rows)
    }

    async fn insert_named(&self, table: CatalogTable, name: &str) -> Result<i32, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.named(table).insert(name.to_string()))
    }

    async fn update_named(
        &self,
        table: CatalogTable,
        id: i32,
        name: &str,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.named(table).rows.get_mut(&id) {
            Some(current) => {
                *current = name.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_named(&self, table: CatalogTable, id: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.is_referenced(table, id) {
            return Err(StoreError::ForeignKey(format!(
                "{} {} is still referenced by schedules",
                table.label(),
                id
            )));
        }
        let removed = tables.named(table).rows.remove(&id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn list_schedules(&self) -> Result<Vec<ScheduleView>, StoreError> {
        let tables = self.tables.lock().await;
        let views = tables
            .schedules
            .rows
            .values()
            .filter_map(|s| tables.view(s))
            .collect();
        Ok(views)
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<i32, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = tables.schedules.last_id + 1;
        let row = schedule.clone().into_schedule(id);
        tables.check_references(&row)?;
        Ok(tables.schedules.insert(row))
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.schedules.rows.contains_key(&schedule.id) {
            return Ok(0);
        }
        tables.check_references(schedule)?;
        tables.schedules.rows.insert(schedule.id, schedule.clone());
        Ok(1)
    }

    async fn delete_schedule(&self, id: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.schedules.rows.remove(&id).map_or(0, |_| 1))
    }
}
