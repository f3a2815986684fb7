use super::engine::HeaderSelection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a sub-service is committed inside a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubServiceLocation {
    pub header_name: String,
    pub service_name: String,
    pub header_index: usize,
    pub service_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubServiceConflict {
    pub sub_service_id: String,
    pub location: SubServiceLocation,
}

impl SubServiceConflict {
    pub fn message(&self) -> String {
        format!(
            "\"{}\" is already selected in \"{}\" \u{2192} \"{}\"",
            self.sub_service_id, self.location.header_name, self.location.service_name
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<SubServiceConflict>,
}

impl ConflictReport {
    fn from_conflicts(conflicts: Vec<SubServiceConflict>) -> Self {
        Self {
            has_conflicts: !conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.conflicts.iter().map(SubServiceConflict::message).collect()
    }

    pub fn conflicting_ids(&self) -> impl Iterator<Item = &str> {
        self.conflicts
            .iter()
            .map(|conflict| conflict.sub_service_id.as_str())
    }
}

/// Tracks which sub-service ids are committed somewhere in a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGuard {
    committed: HashMap<String, SubServiceLocation>,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the committed set from a header list. When an id appears
    /// more than once, the first location is kept.
    pub fn rebuild(headers: &[HeaderSelection]) -> Self {
        let mut guard = Self::new();
        for (header_index, header) in headers.iter().enumerate() {
            for (service_index, service) in header.services.iter().enumerate() {
                for sub in &service.sub_services {
                    guard
                        .committed
                        .entry(sub.id.clone())
                        .or_insert_with(|| SubServiceLocation {
                            header_name: header.name.clone(),
                            service_name: service.name.clone(),
                            header_index,
                            service_index,
                        });
                }
            }
        }
        guard
    }

    pub fn is_selected(&self, sub_service_id: &str) -> bool {
        self.committed.contains_key(sub_service_id)
    }

    pub fn location_of(&self, sub_service_id: &str) -> Option<&SubServiceLocation> {
        self.committed.get(sub_service_id)
    }

    /// Records `location` for the id, replacing any earlier location.
    pub fn commit(&mut self, sub_service_id: impl Into<String>, location: SubServiceLocation) {
        self.committed.insert(sub_service_id.into(), location);
    }

    pub fn release(&mut self, sub_service_id: &str) -> Option<SubServiceLocation> {
        self.committed.remove(sub_service_id)
    }

    /// Reports which candidates are already claimed. Never mutates.
    pub fn check_conflicts<I, S>(&self, candidates: I) -> ConflictReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let conflicts = candidates
            .into_iter()
            .filter_map(|candidate| {
                let id = candidate.as_ref();
                self.committed.get(id).map(|location| SubServiceConflict {
                    sub_service_id: id.to_string(),
                    location: location.clone(),
                })
            })
            .collect();
        ConflictReport::from_conflicts(conflicts)
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.committed.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn clear(&mut self) {
        self.committed.clear();
    }
}
