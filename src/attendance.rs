use crate::errors::AppError;
use crate::mirror::Mirror;
use crate::models::{
    AnalyticsResponse, AttendanceRecord, AttendanceStatus, DaySummary, MarksResponse, NewStudent,
    Student, StudentPatch, default_students,
};
use crate::stats;
use crate::storage::{ATTENDANCE_KEY, JsonStore, STUDENTS_KEY};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub enum AttendanceCommand {
    AddStudent(NewStudent),
    UpdateStudent {
        id: String,
        patch: StudentPatch,
    },
    RemoveStudent {
        id: String,
    },
    SaveDay {
        date: NaiveDate,
        marks: BTreeMap<String, AttendanceStatus>,
    },
    DeleteDay {
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AttendanceOutcome {
    StudentAdded { student: Student },
    StudentUpdated { student: Student },
    StudentRemoved { student: Student },
    DaySaved { record: AttendanceRecord, created: bool },
    DayDeleted { date: NaiveDate },
}

/// Students plus one record per marked day.
#[derive(Debug)]
pub struct AttendanceBook {
    students: Mirror<Student>,
    records: Mirror<AttendanceRecord>,
}

impl AttendanceBook {
    pub async fn load(store: &JsonStore) -> Self {
        let students = Mirror::load(store.clone(), STUDENTS_KEY, default_students).await;
        let records = Mirror::load(store.clone(), ATTENDANCE_KEY, Vec::new).await;
        Self { students, records }
    }

    pub fn students(&self) -> &[Student] {
        self.students.items()
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        self.records.items()
    }

    pub fn analytics(&self) -> AnalyticsResponse {
        stats::build_analytics(self.students(), self.records())
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        stats::day_summaries(self.records())
    }

    /// The saved marks for `date`, or every current student absent.
    pub fn marks_for(&self, date: NaiveDate) -> MarksResponse {
        let (saved, marks) = match self.records.get(&date) {
            Some(record) => (true, record.statuses.clone()),
            None => (false, self.mark_all(AttendanceStatus::Absent)),
        };
        let present_count = marks
            .values()
            .filter(|s| **s == AttendanceStatus::Present)
            .count();
        MarksResponse {
            date,
            saved,
            present_count,
            absent_count: marks.len() - present_count,
            marks,
        }
    }

    pub fn mark_all(&self, status: AttendanceStatus) -> BTreeMap<String, AttendanceStatus> {
        self.students()
            .iter()
            .map(|s| (s.id.clone(), status))
            .collect()
    }

    pub async fn apply(&mut self, command: AttendanceCommand) -> Result<AttendanceOutcome, AppError> {
        match command {
            AttendanceCommand::AddStudent(new) => self.add_student(new).await,
            AttendanceCommand::UpdateStudent { id, patch } => self.update_student(&id, patch).await,
            AttendanceCommand::RemoveStudent { id } => self.remove_student(&id).await,
            AttendanceCommand::SaveDay { date, marks } => self.save_day(date, marks).await,
            AttendanceCommand::DeleteDay { date } => self.delete_day(date).await,
        }
    }

    async fn add_student(&mut self, new: NewStudent) -> Result<AttendanceOutcome, AppError> {
        let name = clean_name(&new.name)?;
        let roll_no = clean_roll(&new.roll_no, self.students(), None)?;
        let student = Student {
            id: Uuid::new_v4().simple().to_string(),
            name,
            roll_no,
        };

        self.students.add(student.clone()).await?;
        info!(id = %student.id, roll_no = %student.roll_no, "student added");
        Ok(AttendanceOutcome::StudentAdded { student })
    }

    async fn update_student(
        &mut self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<AttendanceOutcome, AppError> {
        let current = self
            .students
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no student with id '{id}'")))?;

        let name = match patch.name {
            Some(name) => clean_name(&name)?,
            None => current.name.clone(),
        };
        let roll_no = match patch.roll_no {
            Some(roll) => clean_roll(&roll, self.students(), Some(id))?,
            None => current.roll_no.clone(),
        };
        let student = Student {
            id: current.id,
            name,
            roll_no,
        };

        let next = student.clone();
        self.students.update(id, move |_| next).await?;
        info!(id, "student updated");
        Ok(AttendanceOutcome::StudentUpdated { student })
    }

    /// Drops the student and its key from every day; the days themselves
    /// stay.
    async fn remove_student(&mut self, id: &str) -> Result<AttendanceOutcome, AppError> {
        let student = self
            .students
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no student with id '{id}'")))?;

        self.students.remove(id).await?;

        let stripped: Vec<AttendanceRecord> = self
            .records()
            .iter()
            .map(|record| {
                let mut record = record.clone();
                record.statuses.remove(id);
                record
            })
            .collect();
        self.records.replace_all(stripped).await?;

        info!(id, "student removed");
        Ok(AttendanceOutcome::StudentRemoved { student })
    }

    /// Upsert by date: an existing day's marks are replaced wholesale.
    async fn save_day(
        &mut self,
        date: NaiveDate,
        marks: BTreeMap<String, AttendanceStatus>,
    ) -> Result<AttendanceOutcome, AppError> {
        if self.students.is_empty() {
            return Err(AppError::bad_request("Add students first"));
        }
        if let Some(unknown) = marks.keys().find(|id| self.students.get(id).is_none()) {
            return Err(AppError::bad_request(format!(
                "Unknown student id '{unknown}'"
            )));
        }

        let record = AttendanceRecord {
            date,
            statuses: marks,
        };
        let next = record.clone();
        let replaced = self.records.update(&date, move |_| next).await?;
        if !replaced {
            self.records.add(record.clone()).await?;
        }

        info!(%date, created = !replaced, marked = record.statuses.len(), "attendance saved");
        Ok(AttendanceOutcome::DaySaved {
            record,
            created: !replaced,
        })
    }

    async fn delete_day(&mut self, date: NaiveDate) -> Result<AttendanceOutcome, AppError> {
        if !self.records.remove(&date).await? {
            return Err(AppError::not_found(format!("no attendance record for {date}")));
        }
        info!(%date, "attendance record deleted");
        Ok(AttendanceOutcome::DayDeleted { date })
    }
}

fn clean_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Enter student name"));
    }
    Ok(name.to_string())
}

/// Roll codes are unique ignoring case and stored upper-cased. `except`
/// skips the student being edited.
fn clean_roll(roll: &str, students: &[Student], except: Option<&str>) -> Result<String, AppError> {
    let roll = roll.trim();
    if roll.is_empty() {
        return Err(AppError::bad_request("Enter roll number"));
    }
    let wanted = roll.to_lowercase();
    let taken = students
        .iter()
        .filter(|s| Some(s.id.as_str()) != except)
        .any(|s| s.roll_no.to_lowercase() == wanted);
    if taken {
        return Err(AppError::bad_request("Roll number already exists"));
    }
    Ok(roll.to_uppercase())
}
