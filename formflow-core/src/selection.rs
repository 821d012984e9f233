//! The working set of known forms and the subset selected for automation.
//!
//! Represented as a keyed mapping (form id → descriptor + selected flag)
//! kept in insertion order, so script output is reproducible across runs.

use crate::types::{FormDescriptor, FormId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    form: FormDescriptor,
    selected: bool,
}

/// Ordered collection of known forms with a derived "selected" subset.
///
/// Two mutation paths exist by contract:
/// - [`SelectionSet::load`] replaces the working set wholesale and resets
///   every selection flag (used when a new source is chosen).
/// - [`SelectionSet::merge`] reconciles a refreshed listing with the
///   existing set, preserving flags for ids that survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<Entry>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an initial listing, all forms unselected.
    pub fn from_forms(forms: Vec<FormDescriptor>) -> Self {
        let mut set = Self::new();
        set.load(forms);
        set
    }

    /// Replace the working set wholesale. All selection flags reset.
    pub fn load(&mut self, forms: Vec<FormDescriptor>) {
        self.entries = forms
            .into_iter()
            .map(|form| Entry {
                form,
                selected: false,
            })
            .collect();
    }

    /// Reconcile a refreshed listing with the existing set.
    ///
    /// Descriptors for surviving ids are updated in place (a rename on the
    /// remote side propagates); their selection flag is preserved. Forms
    /// absent from `forms` are retained as-is. New forms are appended
    /// unselected, in listing order.
    pub fn merge(&mut self, forms: Vec<FormDescriptor>) {
        for form in forms {
            match self.entries.iter_mut().find(|e| e.form.id == form.id) {
                Some(entry) => entry.form = form,
                None => self.entries.push(Entry {
                    form,
                    selected: false,
                }),
            }
        }
    }

    /// The working set filtered to the selection flag, in insertion order.
    pub fn selected_forms(&self) -> Vec<FormDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.form.clone())
            .collect()
    }

    /// Every known form, in insertion order, with its selection flag.
    pub fn iter(&self) -> impl Iterator<Item = (&FormDescriptor, bool)> {
        self.entries.iter().map(|e| (&e.form, e.selected))
    }

    /// Flag a form as selected. Returns `false` if the id is unknown.
    pub fn select(&mut self, id: &FormId) -> bool {
        self.set_selected(id, true)
    }

    /// Clear a form's selection flag. Returns `false` if the id is unknown.
    pub fn deselect(&mut self, id: &FormId) -> bool {
        self.set_selected(id, false)
    }

    pub fn is_selected(&self, id: &FormId) -> bool {
        self.entries
            .iter()
            .any(|e| e.form.id == *id && e.selected)
    }

    pub fn contains(&self, id: &FormId) -> bool {
        self.entries.iter().any(|e| e.form.id == *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_selected(&mut self, id: &FormId, selected: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.form.id == *id) {
            Some(entry) => {
                entry.selected = selected;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
