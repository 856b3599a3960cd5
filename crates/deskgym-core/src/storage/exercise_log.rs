//! SQLite-based exercise history.
//!
//! Provides persistent storage for:
//! - Every credited exercise, stamped with its completion time
//! - Aggregate views for the log browser (today, per type, per day)

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, ExerciseStore};
use crate::error::{DatabaseError, Result};
use crate::exercise::CompletedExercise;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub name: String,
    pub reps: String,
    pub duration_secs: f32,
    pub completed_at: DateTime<Utc>,
}

/// Aggregate for one exercise name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub name: String,
    pub count: u32,
    pub total_duration_secs: f32,
}

/// Aggregate for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u32,
    pub total_duration_secs: f32,
}

/// SQLite exercise log.
///
/// Appends are staged and flushed by [`ExerciseStore::save_now`] in a single
/// transaction. Staged entries survive a failed flush and go out with the
/// next one.
pub struct ExerciseLog {
    conn: Connection,
    staged: Vec<LogEntry>,
}

impl ExerciseLog {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the log at `<data dir>/exercise-log.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("exercise-log.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let log = Self {
            conn,
            staged: Vec::new(),
        };
        log.migrate()?;
        Ok(log)
    }

    /// Open an in-memory log (tests, dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let log = Self {
            conn,
            staged: Vec::new(),
        };
        log.migrate()?;
        Ok(log)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS exercise_log (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL,
                reps          TEXT NOT NULL DEFAULT '',
                duration_secs REAL NOT NULL,
                completed_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_exercise_log_completed_at ON exercise_log(completed_at);",
        )?;
        Ok(())
    }

    /// Entries appended but not yet written.
    pub fn staged(&self) -> &[LogEntry] {
        &self.staged
    }

    /// Stored entries followed by staged ones, oldest first.
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        let mut entries = self.stored_entries()?;
        entries.extend(self.staged.iter().cloned());
        Ok(entries)
    }

    /// Stage an entry with an explicit timestamp.
    pub fn append_at(&mut self, exercise: &CompletedExercise, completed_at: DateTime<Utc>) {
        self.staged.push(LogEntry {
            name: exercise.name.clone(),
            reps: exercise.reps.clone(),
            duration_secs: exercise.duration_secs,
            completed_at,
        });
    }

    fn stored_entries(&self) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, reps, duration_secs, completed_at
             FROM exercise_log
             ORDER BY completed_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, name, reps, duration_secs, completed_at) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::CorruptRow {
                    id,
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            entries.push(LogEntry {
                name,
                reps,
                duration_secs: duration_secs as f32,
                completed_at,
            });
        }
        Ok(entries)
    }
}

impl ExerciseStore for ExerciseLog {
    fn append_completed(&mut self, entries: &[CompletedExercise]) {
        let now = Utc::now();
        for exercise in entries {
            self.append_at(exercise, now);
        }
    }

    fn save_now(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO exercise_log (name, reps, duration_secs, completed_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in &self.staged {
                stmt.execute(params![
                    entry.name,
                    entry.reps,
                    entry.duration_secs as f64,
                    entry.completed_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        self.staged.clear();
        Ok(())
    }

    fn today_breakdown(&self) -> Result<Vec<TypeSummary>> {
        let entries = self.entries()?;
        let today = Local::now().date_naive();
        Ok(breakdown(entries_on(&entries, &Local, today)))
    }

    fn type_breakdown(&self) -> Result<Vec<TypeSummary>> {
        Ok(breakdown(&self.entries()?))
    }

    fn daily_trend(&self) -> Result<Vec<DayBucket>> {
        Ok(daily_trend_in(&self.entries()?, &Local))
    }

    fn clear_all(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM exercise_log", [])?;
        self.staged.clear();
        Ok(())
    }
}

/// Entries whose completion falls on `day` in `tz`.
pub fn entries_on<'a, Tz: TimeZone>(
    entries: &'a [LogEntry],
    tz: &'a Tz,
    day: NaiveDate,
) -> impl Iterator<Item = &'a LogEntry> + 'a {
    entries
        .iter()
        .filter(move |e| e.completed_at.with_timezone(tz).date_naive() == day)
}

/// Per-name totals sorted by total duration, longest first.
pub fn breakdown<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Vec<TypeSummary> {
    let mut by_name: BTreeMap<&str, TypeSummary> = BTreeMap::new();
    for e in entries {
        let summary = by_name.entry(e.name.as_str()).or_insert_with(|| TypeSummary {
            name: e.name.clone(),
            count: 0,
            total_duration_secs: 0.0,
        });
        summary.count += 1;
        summary.total_duration_secs += e.duration_secs;
    }

    let mut result: Vec<TypeSummary> = by_name.into_values().collect();
    result.sort_by(|a, b| {
        b.total_duration_secs
            .total_cmp(&a.total_duration_secs)
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

/// Per-day totals in `tz`, most recent day first.
pub fn daily_trend_in<Tz: TimeZone>(entries: &[LogEntry], tz: &Tz) -> Vec<DayBucket> {
    let mut by_day: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for e in entries {
        let date = e.completed_at.with_timezone(tz).date_naive();
        let bucket = by_day.entry(date).or_insert_with(|| DayBucket {
            date,
            count: 0,
            total_duration_secs: 0.0,
        });
        bucket.count += 1;
        bucket.total_duration_secs += e.duration_secs;
    }
    by_day.into_values().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn done(name: &str, secs: f32) -> CompletedExercise {
        CompletedExercise {
            name: name.to_string(),
            reps: "10 reps".to_string(),
            duration_secs: secs,
        }
    }

    fn entry(name: &str, secs: f32, at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            name: name.to_string(),
            reps: String::new(),
            duration_secs: secs,
            completed_at: at,
        }
    }

    #[test]
    fn append_then_save_persists() {
        let mut log = ExerciseLog::open_memory().unwrap();
        log.append_completed(&[done("Squats", 42.0)]);
        assert_eq!(log.staged().len(), 1);
        log.save_now().unwrap();
        assert!(log.staged().is_empty());

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Squats");
        assert_eq!(entries[0].duration_secs, 42.0);
    }

    #[test]
    fn failed_save_keeps_entries_staged_and_visible() {
        let mut log = ExerciseLog::open_memory().unwrap();
        log.conn()
            .execute_batch("CREATE TRIGGER no_writes BEFORE INSERT ON exercise_log
                            BEGIN SELECT RAISE(FAIL, 'read-only'); END;")
            .unwrap();

        log.append_completed(&[done("Wall Sit", 30.0)]);
        assert!(log.save_now().is_err());
        assert_eq!(log.staged().len(), 1);

        let types = log.type_breakdown().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Wall Sit");

        log.conn().execute_batch("DROP TRIGGER no_writes;").unwrap();
        log.save_now().unwrap();
        assert!(log.staged().is_empty());
        assert_eq!(log.entries().unwrap().len(), 1);
    }

    #[test]
    fn breakdown_sorts_by_total_duration() {
        let now = Utc::now();
        let entries = vec![
            entry("Squats", 20.0, now),
            entry("Wall Sit", 45.0, now),
            entry("Squats", 30.0, now),
            entry("Neck Stretch", 12.0, now),
        ];
        let summary = breakdown(&entries);
        let names: Vec<_> = summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Squats", "Wall Sit", "Neck Stretch"]);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].total_duration_secs, 50.0);
    }

    #[test]
    fn daily_trend_groups_by_day_most_recent_first() {
        let day = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let entries = vec![
            entry("Squats", 20.0, day - Duration::days(2)),
            entry("Squats", 20.0, day),
            entry("Wall Sit", 40.0, day + Duration::hours(3)),
        ];
        let trend = daily_trend_in(&entries, &Utc);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[0].total_duration_secs, 60.0);
        assert_eq!(trend[1].date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    }

    #[test]
    fn today_breakdown_ignores_older_days() {
        let mut log = ExerciseLog::open_memory().unwrap();
        log.append_at(&done("Squats", 25.0), Utc::now() - Duration::days(3));
        log.append_completed(&[done("Calf Raises", 15.0)]);
        log.save_now().unwrap();

        let today = log.today_breakdown().unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Calf Raises");
        assert_eq!(log.type_breakdown().unwrap().len(), 2);
    }

    #[test]
    fn clear_all_drops_stored_and_staged() {
        let mut log = ExerciseLog::open_memory().unwrap();
        log.append_completed(&[done("Squats", 25.0)]);
        log.save_now().unwrap();
        log.append_completed(&[done("Squats", 25.0)]);
        log.clear_all().unwrap();
        assert!(log.entries().unwrap().is_empty());
        assert!(log.daily_trend().unwrap().is_empty());
    }

    #[test]
    fn open_at_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.db");
        {
            let mut log = ExerciseLog::open_at(&path).unwrap();
            log.append_completed(&[done("Squats", 25.0)]);
            log.save_now().unwrap();
        }
        let log = ExerciseLog::open_at(&path).unwrap();
        assert_eq!(log.entries().unwrap().len(), 1);
    }
}
