//! Calendar entries per date.
//!
//! Dates are stored as `yyyy-MM-dd` keys. Entries written before the calendar
//! existed have no date; they stay in their own bucket and are shown beside
//! whichever day is selected, never merged into it.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::{check_index, required};
use crate::domain::error::{Result, StudyError};
use crate::storage::{Schedule, Store};
use chrono::NaiveDate;

/// Key format of dated entries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The document key for a date.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `yyyy-MM-dd` key.
///
/// # Errors
///
/// Returns [`StudyError::InvalidDate`] if `key` is not a valid date.
///
/// # Examples
///
/// ```
/// use student_helper::app::schedule::parse_date;
///
/// assert!(parse_date("2024-01-15").is_ok());
/// assert!(parse_date("2024-13-01").is_err());
/// ```
pub fn parse_date(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_FORMAT)
        .map_err(|_| StudyError::InvalidDate(key.to_string()))
}

/// Appends an entry to a date.
///
/// # Errors
///
/// Returns [`StudyError::EmptyInput`] for blank text.
pub fn add_entry(store: &Store, date: NaiveDate, text: &str) -> Result<()> {
    let text = required(text, "entry")?;
    let key = date_key(date);
    tracing::debug!(date = %key, "adding schedule entry");
    store.update(|schedule: &mut Schedule| {
        schedule.days.entry(key).or_default().push(text);
        Ok(())
    })
}

/// Removes the entry at `index` from a date and returns it. A date left with
/// no entries disappears from the document.
///
/// # Errors
///
/// Returns [`StudyError::IndexOutOfRange`] for an unknown index.
pub fn remove_entry(store: &Store, date: NaiveDate, index: usize) -> Result<String> {
    let key = date_key(date);
    store.update(|schedule: &mut Schedule| {
        let entries = schedule.days.get_mut(&key).ok_or(StudyError::IndexOutOfRange {
            kind: "entry",
            index,
            len: 0,
        })?;
        check_index("entry", index, entries.len())?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            schedule.days.remove(&key);
        }
        Ok(removed)
    })
}

/// Removes an undated entry and returns it.
///
/// # Errors
///
/// Returns [`StudyError::IndexOutOfRange`] for an unknown index.
pub fn remove_legacy_entry(store: &Store, index: usize) -> Result<String> {
    store.update(|schedule: &mut Schedule| {
        check_index("entry", index, schedule.legacy.len())?;
        Ok(schedule.legacy.remove(index))
    })
}

/// What the schedule shows for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    /// Entries filed under this date.
    pub entries: &'a [String],
    /// Undated entries, shown separately.
    pub legacy: &'a [String],
}

/// The entries of `date` and the undated entries, kept apart.
#[must_use]
pub fn day(schedule: &Schedule, date: NaiveDate) -> DayView<'_> {
    DayView {
        date,
        entries: schedule
            .days
            .get(&date_key(date))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        legacy: &schedule.legacy,
    }
}

/// Dates that have at least one entry, in calendar order. Keys that are not
/// valid dates are skipped.
#[must_use]
pub fn busy_dates(schedule: &Schedule) -> Vec<NaiveDate> {
    schedule
        .days
        .iter()
        .filter(|(_, entries)| !entries.is_empty())
        .filter_map(|(key, _)| parse_date(key).ok())
        .collect()
}

/// The schedule page with its selected date.
#[derive(Debug, Clone)]
pub struct SchedulePage {
    schedule: Schedule,
    selected: NaiveDate,
}

impl SchedulePage {
    /// Opens the page on `selected`, usually today.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule cannot be loaded.
    pub fn load(store: &Store, selected: NaiveDate) -> Result<Self> {
        Ok(Self {
            schedule: store.load_schedule()?,
            selected,
        })
    }

    #[must_use]
    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    #[must_use]
    pub fn day(&self) -> DayView<'_> {
        day(&self.schedule, self.selected)
    }

    #[must_use]
    pub fn busy_dates(&self) -> Vec<NaiveDate> {
        busy_dates(&self.schedule)
    }

    /// Adds an entry to the selected date and reloads.
    ///
    /// # Errors
    ///
    /// See [`add_entry`].
    pub fn add(&mut self, store: &Store, text: &str) -> Result<()> {
        add_entry(store, self.selected, text)?;
        self.refresh(store)
    }
}

impl Refresh for SchedulePage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.schedule = store.load_schedule()?;
        Ok(())
    }
}

impl Page for SchedulePage {
    fn id(&self) -> PageId {
        PageId::Schedule
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn entries_are_filed_by_date() {
        let (_dir, store) = testing::store();
        add_entry(&store, date("2024-01-15"), "Exam").unwrap();
        add_entry(&store, date("2024-01-15"), " Lab ").unwrap();
        add_entry(&store, date("2024-02-01"), "Trip").unwrap();

        let schedule = store.load_schedule().unwrap();
        assert_eq!(schedule.days["2024-01-15"], vec!["Exam", "Lab"]);
        assert_eq!(busy_dates(&schedule), vec![date("2024-01-15"), date("2024-02-01")]);
    }

    #[test]
    fn removing_last_entry_drops_the_date() {
        let (_dir, store) = testing::store();
        add_entry(&store, date("2024-01-15"), "Exam").unwrap();
        assert_eq!(remove_entry(&store, date("2024-01-15"), 0).unwrap(), "Exam");
        assert!(store.load_schedule().unwrap().days.is_empty());
        assert!(matches!(
            remove_entry(&store, date("2024-01-15"), 0),
            Err(StudyError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn legacy_entries_stay_separate() {
        let (_dir, store) = testing::store();
        let schedule = Schedule {
            legacy: vec!["Mon 10am: Math".to_string()],
            ..Schedule::default()
        };
        store.save_schedule(&schedule).unwrap();
        add_entry(&store, date("2024-01-15"), "Exam").unwrap();

        let page = SchedulePage::load(&store, date("2024-01-15")).unwrap();
        let view = page.day();
        assert_eq!(view.entries, ["Exam".to_string()]);
        assert_eq!(view.legacy, ["Mon 10am: Math".to_string()]);

        let other = day(&store.load_schedule().unwrap(), date("2024-01-16"))
            .entries
            .len();
        assert_eq!(other, 0);

        assert_eq!(remove_legacy_entry(&store, 0).unwrap(), "Mon 10am: Math");
        assert!(store.load_schedule().unwrap().legacy.is_empty());
    }

    #[test]
    fn invalid_dates_are_reported() {
        assert!(matches!(parse_date("15/01/2024"), Err(StudyError::InvalidDate(_))));
        assert_eq!(date_key(date(" 2024-01-05 ")), "2024-01-05");
    }
}
