//! Course selection data structures.
//!
//! A selection identifies a subject/catalog-number pair, optionally pinned
//! to one section. Selections are what the user builds up before asking the
//! backend for conflict-free schedules.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One course the user wants in their schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CourseSelection {
    /// Subject code (e.g. "CIS")
    pub course_type: String,

    /// Catalog number (e.g. "1500")
    pub course_code: String,

    /// Optional pinned section number
    #[serde(default)]
    pub course_section: Option<String>,
}

impl CourseSelection {
    /// Create an unpinned selection.
    pub fn new(course_type: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            course_type: course_type.into(),
            course_code: course_code.into(),
            course_section: None,
        }
    }

    /// Create a selection pinned to a specific section.
    pub fn pinned(
        course_type: impl Into<String>,
        course_code: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            course_type: course_type.into(),
            course_code: course_code.into(),
            course_section: Some(section.into()),
        }
    }

    /// Strip the selection down to its canonical form.
    ///
    /// Whitespace is trimmed and an empty section collapses to `None`, so
    /// that cache matching never depends on how the selection was entered.
    pub fn normalized(&self) -> Self {
        let section = self
            .course_section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            course_type: self.course_type.trim().to_string(),
            course_code: self.course_code.trim().to_string(),
            course_section: section,
        }
    }

    /// Key the selection is unique by within a selection set.
    pub fn identity(&self) -> (String, String) {
        let n = self.normalized();
        (n.course_type, n.course_code)
    }

    /// Parse a selection from a `"TYPE*CODE"` or `"TYPE*CODE*SECTION"` key.
    pub fn parse(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split('*').collect();
        match parts.as_slice() {
            [course_type, course_code] => {
                Ok(Self::new(course_type.trim(), course_code.trim()).normalized())
            }
            [course_type, course_code, section] => {
                Ok(Self::pinned(course_type.trim(), course_code.trim(), section.trim()).normalized())
            }
            _ => Err(AppError::validation(format!(
                "Invalid course key '{key}': expected TYPE*CODE or TYPE*CODE*SECTION"
            ))),
        }
    }
}

impl std::fmt::Display for CourseSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.course_section {
            Some(section) => write!(f, "{}*{}*{}", self.course_type, self.course_code, section),
            None => write!(f, "{}*{}", self.course_type, self.course_code),
        }
    }
}

/// Ordered set of course selections, unique by (type, code).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseSelectionSet {
    selections: Vec<CourseSelection>,
}

impl CourseSelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selection, rejecting a duplicate (type, code) pair.
    pub fn add(&mut self, selection: CourseSelection) -> Result<()> {
        let selection = selection.normalized();
        if selection.course_type.is_empty() || selection.course_code.is_empty() {
            return Err(AppError::validation(
                "Course selection requires both a subject and a catalog number",
            ));
        }
        if self
            .selections
            .iter()
            .any(|s| s.identity() == selection.identity())
        {
            return Err(AppError::validation(format!(
                "Course {}*{} is already selected",
                selection.course_type, selection.course_code
            )));
        }
        self.selections.push(selection);
        Ok(())
    }

    /// Remove a selection by (type, code). Returns true if one was removed.
    pub fn remove(&mut self, course_type: &str, course_code: &str) -> bool {
        let identity = (course_type.trim().to_string(), course_code.trim().to_string());
        let before = self.selections.len();
        self.selections.retain(|s| s.identity() != identity);
        self.selections.len() != before
    }

    /// Drop all selections. Called when the term changes.
    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn as_slice(&self) -> &[CourseSelection] {
        &self.selections
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseSelection> {
        self.selections.iter()
    }
}

impl From<Vec<CourseSelection>> for CourseSelectionSet {
    fn from(selections: Vec<CourseSelection>) -> Self {
        let mut set = Self::new();
        for s in selections {
            // Duplicates are dropped rather than surfaced when bulk-loading.
            let _ = set.add(s);
        }
        set
    }
}
