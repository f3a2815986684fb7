use super::catalog::{HeaderKind, ServiceCatalog, ServiceDefinition};
use super::engine::{HeaderSelection, ServiceSelection, SubServiceRef};
use super::guard::{ConflictReport, DuplicateGuard, SubServiceConflict, SubServiceLocation};
use super::packages::PackageExpander;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What to do when a sub-service being added is already claimed elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    /// Leave the draft untouched and report the conflicts.
    #[default]
    Reject,
    /// Add what is free, report the rest.
    SkipConflicting,
    /// Move the claim from its previous location to the new one.
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("header name must not be empty")]
    EmptyHeaderName,
    #[error("header \"{0}\" is already part of the quotation")]
    DuplicateHeader(String),
    #[error("no header at position {0}")]
    HeaderIndexOutOfRange(usize),
    #[error("header \"{0}\" cannot be renamed")]
    NotCustomizable(String),
    #[error("\"{0}\" is a catalogue header and cannot name a customized header")]
    ReservedHeaderName(String),
    #[error("\"{service}\" is not offered under \"{header}\"")]
    ServiceNotOffered { header: String, service: String },
    #[error("\"{service}\" is not selected under \"{header}\"")]
    ServiceNotFound { header: String, service: String },
    #[error("\"{service}\" is already selected under \"{header}\"")]
    DuplicateService { header: String, service: String },
    #[error("\"{sub_service}\" is not part of \"{service}\"")]
    UnknownSubService { service: String, sub_service: String },
}

/// Result of an add operation. Conflicts travel here as data; they are never
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    pub applied: bool,
    pub added: Vec<String>,
    pub moved: Vec<SubServiceConflict>,
    pub conflicts: ConflictReport,
}

impl SelectionOutcome {
    fn rejected(conflicts: ConflictReport) -> Self {
        Self {
            applied: false,
            conflicts,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftHeader {
    pub name: String,
    pub kind: HeaderKind,
    pub services: Vec<ServiceSelection>,
}

/// In-progress selection state. The nested header list is the source of
/// truth; every mutation leaves the guard equal to its projection.
#[derive(Debug, Clone)]
pub struct QuotationDraft {
    headers: Vec<DraftHeader>,
    guard: DuplicateGuard,
    catalog: &'static ServiceCatalog,
}

impl Default for QuotationDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotationDraft {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            guard: DuplicateGuard::new(),
            catalog: ServiceCatalog::standard(),
        }
    }

    /// Restores a draft from a persisted header list. Sub-services claimed
    /// earlier in the list win; later repeats are dropped and reported.
    pub fn from_selection(headers: Vec<HeaderSelection>) -> (Self, ConflictReport) {
        let mut draft = Self::new();
        let mut dropped = Vec::new();

        for (header_index, header) in headers.into_iter().enumerate() {
            let kind = draft.catalog.kind_of(&header.name);
            let mut services = Vec::with_capacity(header.services.len());

            for (service_index, mut service) in header.services.into_iter().enumerate() {
                let mut kept = Vec::with_capacity(service.sub_services.len());
                for sub in service.sub_services {
                    if let Some(existing) = draft.guard.location_of(&sub.id) {
                        dropped.push(SubServiceConflict {
                            sub_service_id: sub.id.clone(),
                            location: existing.clone(),
                        });
                        continue;
                    }
                    draft.guard.commit(
                        sub.id.clone(),
                        SubServiceLocation {
                            header_name: header.name.clone(),
                            service_name: service.name.clone(),
                            header_index,
                            service_index,
                        },
                    );
                    kept.push(sub);
                }
                service.sub_services = kept;
                services.push(service);
            }

            draft.headers.push(DraftHeader {
                name: header.name,
                kind,
                services,
            });
        }

        let report = ConflictReport {
            has_conflicts: !dropped.is_empty(),
            conflicts: dropped,
        };
        (draft, report)
    }

    pub fn headers(&self) -> &[DraftHeader] {
        &self.headers
    }

    pub fn guard(&self) -> &DuplicateGuard {
        &self.guard
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn to_selection(&self) -> Vec<HeaderSelection> {
        self.headers
            .iter()
            .map(|header| HeaderSelection {
                name: header.name.clone(),
                services: header.services.clone(),
            })
            .collect()
    }

    /// Sub-service ids present anywhere in the draft, derived from the
    /// header list rather than the guard.
    pub fn selected_sub_service_ids(&self) -> BTreeSet<String> {
        self.headers
            .iter()
            .flat_map(|header| header.services.iter())
            .flat_map(|service| service.sub_services.iter())
            .map(|sub| sub.id.clone())
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        let projected = self.selected_sub_service_ids();
        self.guard.len() == projected.len()
            && projected.iter().all(|id| self.guard.is_selected(id))
    }

    /// Appends a header. Package headers arrive pre-populated with their
    /// expanded services and every sub-service not already claimed.
    pub fn add_header(&mut self, name: &str) -> Result<SelectionOutcome, DraftError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyHeaderName);
        }
        if self.position_of(name).is_some() {
            return Err(DraftError::DuplicateHeader(name.to_string()));
        }

        let kind = self.catalog.kind_of(name);
        let canonical = self
            .catalog
            .header(name)
            .map(|header| header.name.clone())
            .unwrap_or_else(|| name.to_string());
        let header_index = self.headers.len();
        self.headers.push(DraftHeader {
            name: canonical.clone(),
            kind,
            services: Vec::new(),
        });

        let mut outcome = SelectionOutcome {
            applied: true,
            ..SelectionOutcome::default()
        };
        if !matches!(kind, HeaderKind::Package(_)) {
            return Ok(outcome);
        }

        let mut skipped = Vec::new();
        for definition in PackageExpander::new(self.catalog).expand(&canonical) {
            let service_index = self.headers[header_index].services.len();
            let location = SubServiceLocation {
                header_name: canonical.clone(),
                service_name: definition.name.clone(),
                header_index,
                service_index,
            };
            let mut selection = ServiceSelection::new(definition.name.clone());
            for sub in &definition.sub_services {
                if let Some(existing) = self.guard.location_of(&sub.id) {
                    skipped.push(SubServiceConflict {
                        sub_service_id: sub.id.clone(),
                        location: existing.clone(),
                    });
                    continue;
                }
                self.guard.commit(sub.id.clone(), location.clone());
                outcome.added.push(sub.id.clone());
                selection
                    .sub_services
                    .push(SubServiceRef::with_text(sub.id.clone(), sub.text.clone()));
            }
            self.headers[header_index].services.push(selection);
        }

        outcome.conflicts = ConflictReport {
            has_conflicts: !skipped.is_empty(),
            conflicts: skipped,
        };
        Ok(outcome)
    }

    pub fn rename_custom_header(
        &mut self,
        header_index: usize,
        new_name: &str,
    ) -> Result<(), DraftError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(DraftError::EmptyHeaderName);
        }
        let header = self
            .headers
            .get(header_index)
            .ok_or(DraftError::HeaderIndexOutOfRange(header_index))?;
        if header.kind != HeaderKind::Customized {
            return Err(DraftError::NotCustomizable(header.name.clone()));
        }
        if self
            .position_of(new_name)
            .is_some_and(|existing| existing != header_index)
        {
            return Err(DraftError::DuplicateHeader(new_name.to_string()));
        }
        if self
            .catalog
            .header(new_name)
            .is_some_and(|existing| existing.kind != HeaderKind::Customized)
        {
            return Err(DraftError::ReservedHeaderName(new_name.to_string()));
        }

        self.headers[header_index].name = new_name.to_string();
        self.rebuild_guard();
        Ok(())
    }

    pub fn remove_header(&mut self, header_index: usize) -> Result<DraftHeader, DraftError> {
        if header_index >= self.headers.len() {
            return Err(DraftError::HeaderIndexOutOfRange(header_index));
        }
        let removed = self.headers.remove(header_index);
        self.rebuild_guard();
        Ok(removed)
    }

    /// Adds a service to a header with the given sub-services. An empty
    /// sub-service list selects the service alone.
    pub fn add_service(
        &mut self,
        header_index: usize,
        service_name: &str,
        sub_services: Vec<SubServiceRef>,
        policy: ConflictPolicy,
    ) -> Result<SelectionOutcome, DraftError> {
        let header = self
            .headers
            .get(header_index)
            .ok_or(DraftError::HeaderIndexOutOfRange(header_index))?;
        let definition = self.offered_service(&header.name, service_name)?;
        if header
            .services
            .iter()
            .any(|service| service.name == definition.name)
        {
            return Err(DraftError::DuplicateService {
                header: header.name.clone(),
                service: definition.name,
            });
        }
        let candidates = resolve_sub_services(&definition, sub_services)?;

        let report = self
            .guard
            .check_conflicts(candidates.iter().map(|sub| sub.id.as_str()));
        if report.has_conflicts && policy == ConflictPolicy::Reject {
            return Ok(SelectionOutcome::rejected(report));
        }

        self.headers[header_index]
            .services
            .push(ServiceSelection::new(definition.name));
        let service_index = self.headers[header_index].services.len() - 1;
        Ok(self.claim(header_index, service_index, candidates, report, policy))
    }

    /// Adds one sub-service to an already selected service. Re-adding a
    /// sub-service the service already holds is a no-op.
    pub fn add_sub_service(
        &mut self,
        header_index: usize,
        service_name: &str,
        sub_service: SubServiceRef,
        policy: ConflictPolicy,
    ) -> Result<SelectionOutcome, DraftError> {
        let (service_index, definition) = self.selected_service(header_index, service_name)?;
        let already_here = self.headers[header_index].services[service_index]
            .sub_services
            .iter()
            .any(|sub| sub.id == sub_service.id);
        if already_here {
            return Ok(SelectionOutcome {
                applied: true,
                ..SelectionOutcome::default()
            });
        }

        let candidates = match definition {
            Some(definition) => resolve_sub_services(&definition, vec![sub_service])?,
            None => vec![sub_service],
        };
        let report = self
            .guard
            .check_conflicts(candidates.iter().map(|sub| sub.id.as_str()));
        if report.has_conflicts && policy == ConflictPolicy::Reject {
            return Ok(SelectionOutcome::rejected(report));
        }

        Ok(self.claim(header_index, service_index, candidates, report, policy))
    }

    pub fn remove_service(
        &mut self,
        header_index: usize,
        service_name: &str,
    ) -> Result<ServiceSelection, DraftError> {
        let (service_index, _) = self.selected_service(header_index, service_name)?;
        let removed = self.headers[header_index].services.remove(service_index);
        self.rebuild_guard();
        Ok(removed)
    }

    /// Returns whether the sub-service was present.
    pub fn remove_sub_service(
        &mut self,
        header_index: usize,
        service_name: &str,
        sub_service_id: &str,
    ) -> Result<bool, DraftError> {
        let (service_index, _) = self.selected_service(header_index, service_name)?;
        let subs = &mut self.headers[header_index].services[service_index].sub_services;
        let before = subs.len();
        subs.retain(|sub| sub.id != sub_service_id);
        let removed = subs.len() != before;
        if removed {
            self.guard.release(sub_service_id);
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.headers.clear();
        self.guard.clear();
    }

    fn claim(
        &mut self,
        header_index: usize,
        service_index: usize,
        candidates: Vec<SubServiceRef>,
        report: ConflictReport,
        policy: ConflictPolicy,
    ) -> SelectionOutcome {
        let mut outcome = SelectionOutcome {
            applied: true,
            ..SelectionOutcome::default()
        };
        let conflicting: BTreeSet<String> = report.conflicting_ids().map(str::to_string).collect();

        if policy == ConflictPolicy::Override {
            for conflict in &report.conflicts {
                let previous = &conflict.location;
                if let Some(service) = self
                    .headers
                    .get_mut(previous.header_index)
                    .and_then(|header| header.services.get_mut(previous.service_index))
                {
                    service
                        .sub_services
                        .retain(|sub| sub.id != conflict.sub_service_id);
                }
                self.guard.release(&conflict.sub_service_id);
            }
            outcome.moved = report.conflicts;
        } else {
            outcome.conflicts = report;
        }

        let header_name = self.headers[header_index].name.clone();
        let service = &mut self.headers[header_index].services[service_index];
        let location = SubServiceLocation {
            header_name,
            service_name: service.name.clone(),
            header_index,
            service_index,
        };

        for sub in candidates {
            if policy != ConflictPolicy::Override && conflicting.contains(&sub.id) {
                continue;
            }
            if service.sub_services.iter().any(|existing| existing.id == sub.id) {
                continue;
            }
            self.guard.commit(sub.id.clone(), location.clone());
            outcome.added.push(sub.id.clone());
            service.sub_services.push(sub);
        }

        outcome
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.name.eq_ignore_ascii_case(name.trim()))
    }

    fn offered_service(
        &self,
        header_name: &str,
        service_name: &str,
    ) -> Result<ServiceDefinition, DraftError> {
        let trimmed = service_name.trim();
        PackageExpander::new(self.catalog)
            .services_for_header(header_name)
            .into_iter()
            .find(|service| service.name == trimmed)
            .ok_or_else(|| DraftError::ServiceNotOffered {
                header: header_name.to_string(),
                service: trimmed.to_string(),
            })
    }

    fn selected_service(
        &self,
        header_index: usize,
        service_name: &str,
    ) -> Result<(usize, Option<ServiceDefinition>), DraftError> {
        let header = self
            .headers
            .get(header_index)
            .ok_or(DraftError::HeaderIndexOutOfRange(header_index))?;
        let trimmed = service_name.trim();
        let service_index = header
            .services
            .iter()
            .position(|service| service.name == trimmed)
            .ok_or_else(|| DraftError::ServiceNotFound {
                header: header.name.clone(),
                service: trimmed.to_string(),
            })?;
        Ok((service_index, self.offered_service(&header.name, trimmed).ok()))
    }

    fn rebuild_guard(&mut self) {
        self.guard = DuplicateGuard::rebuild(&self.to_selection());
    }
}

/// Checks candidate ids against a service definition and fills in the
/// catalogue text. Services without declared sub-services accept none.
fn resolve_sub_services(
    definition: &ServiceDefinition,
    requested: Vec<SubServiceRef>,
) -> Result<Vec<SubServiceRef>, DraftError> {
    let mut resolved: Vec<SubServiceRef> = Vec::with_capacity(requested.len());
    for sub in requested {
        let declared = definition
            .sub_services
            .iter()
            .find(|candidate| candidate.id == sub.id)
            .ok_or_else(|| DraftError::UnknownSubService {
                service: definition.name.clone(),
                sub_service: sub.id.clone(),
            })?;
        if resolved.iter().any(|existing| existing.id == declared.id) {
            continue;
        }
        resolved.push(SubServiceRef::with_text(
            declared.id.clone(),
            declared.text.clone(),
        ));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(draft: &QuotationDraft, header_index: usize, service_index: usize) -> Vec<String> {
        draft.headers()[header_index].services[service_index]
            .sub_services
            .iter()
            .map(|sub| sub.id.clone())
            .collect()
    }

    fn refs(ids: &[&str]) -> Vec<SubServiceRef> {
        ids.iter().map(|id| SubServiceRef::new(*id)).collect()
    }

    #[test]
    fn package_header_prepopulates_every_sub_service() {
        let mut draft = QuotationDraft::new();
        let outcome = draft.add_header("Package A").expect("header added");

        assert!(outcome.applied);
        assert!(!outcome.conflicts.has_conflicts);
        assert_eq!(draft.headers()[0].services.len(), 17);
        assert_eq!(outcome.added.len(), draft.guard().len());
        assert!(draft.is_consistent());
    }

    #[test]
    fn package_header_skips_claimed_sub_services() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Project Registration").expect("header");
        draft
            .add_service(
                0,
                "PROJECT REGISTRATION SERVICES",
                refs(&["project-registration-services-1"]),
                ConflictPolicy::Reject,
            )
            .expect("service");

        let outcome = draft.add_header("Package B").expect("package");
        assert_eq!(outcome.conflicts.conflicts.len(), 1);
        assert_eq!(outcome.conflicts.conflicts[0].location.header_index, 0);
        assert_eq!(ids(&draft, 1, 0).len(), 5);
        assert!(draft.is_consistent());
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Legal Consultation").expect("header");
        assert_eq!(
            draft.add_header(" legal consultation "),
            Err(DraftError::DuplicateHeader("legal consultation".to_string()))
        );
        assert_eq!(draft.add_header("  "), Err(DraftError::EmptyHeaderName));
    }

    #[test]
    fn reject_policy_leaves_draft_untouched() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Project Compliance").expect("header");
        draft.add_header("Site Work").expect("custom header");
        draft
            .add_service(
                0,
                "Project Closure",
                refs(&["project-closure-1", "project-closure-2"]),
                ConflictPolicy::Reject,
            )
            .expect("first service");

        let outcome = draft
            .add_service(
                1,
                "Project Closure",
                refs(&["project-closure-2", "project-closure-3"]),
                ConflictPolicy::Reject,
            )
            .expect("second service");

        assert!(!outcome.applied);
        assert_eq!(outcome.conflicts.conflicts.len(), 1);
        assert!(draft.headers()[1].services.is_empty());
        assert!(draft.is_consistent());
    }

    #[test]
    fn skip_policy_adds_the_free_sub_services() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Project Compliance").expect("header");
        draft.add_header("Site Work").expect("custom header");
        draft
            .add_service(
                0,
                "Project Closure",
                refs(&["project-closure-1", "project-closure-2"]),
                ConflictPolicy::Reject,
            )
            .expect("first service");

        let outcome = draft
            .add_service(
                1,
                "Project Closure",
                refs(&["project-closure-2", "project-closure-3"]),
                ConflictPolicy::SkipConflicting,
            )
            .expect("second service");

        assert!(outcome.applied);
        assert_eq!(outcome.added, vec!["project-closure-3".to_string()]);
        assert_eq!(ids(&draft, 1, 0), vec!["project-closure-3".to_string()]);
        assert!(draft.is_consistent());
    }

    #[test]
    fn override_policy_moves_the_claim() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Project Compliance").expect("header");
        draft.add_header("Site Work").expect("custom header");
        draft
            .add_service(
                0,
                "Project Closure",
                refs(&["project-closure-1", "project-closure-2"]),
                ConflictPolicy::Reject,
            )
            .expect("first service");

        let outcome = draft
            .add_service(
                1,
                "Project Closure",
                refs(&["project-closure-2"]),
                ConflictPolicy::Override,
            )
            .expect("second service");

        assert_eq!(outcome.moved.len(), 1);
        assert_eq!(ids(&draft, 0, 0), vec!["project-closure-1".to_string()]);
        assert_eq!(ids(&draft, 1, 0), vec!["project-closure-2".to_string()]);
        assert_eq!(
            draft.guard().location_of("project-closure-2").map(|l| l.header_index),
            Some(1)
        );
        assert!(draft.is_consistent());
    }

    #[test]
    fn services_must_be_offered_and_unique() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Legal Consultation").expect("header");
        assert!(matches!(
            draft.add_service(0, "Project Closure", vec![], ConflictPolicy::Reject),
            Err(DraftError::ServiceNotOffered { .. })
        ));
        draft
            .add_service(0, "LEGAL CONSULTATION", vec![], ConflictPolicy::Reject)
            .expect("service");
        assert!(matches!(
            draft.add_service(0, " LEGAL CONSULTATION ", vec![], ConflictPolicy::Reject),
            Err(DraftError::DuplicateService { .. })
        ));
        assert!(matches!(
            draft.add_sub_service(
                0,
                "LEGAL CONSULTATION",
                SubServiceRef::new("bogus"),
                ConflictPolicy::Reject,
            ),
            Err(DraftError::UnknownSubService { .. })
        ));
        assert_eq!(
            draft.add_service(3, "LEGAL CONSULTATION", vec![], ConflictPolicy::Reject),
            Err(DraftError::HeaderIndexOutOfRange(3))
        );
    }

    #[test]
    fn sub_service_add_is_idempotent_and_remove_releases() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Legal Consultation").expect("header");
        draft
            .add_service(0, "LEGAL CONSULTATION", vec![], ConflictPolicy::Reject)
            .expect("service");

        let sub = SubServiceRef::new("legal-consultation-3");
        let first = draft
            .add_sub_service(0, "LEGAL CONSULTATION", sub.clone(), ConflictPolicy::Reject)
            .expect("sub-service");
        let second = draft
            .add_sub_service(0, "LEGAL CONSULTATION", sub, ConflictPolicy::Reject)
            .expect("sub-service again");
        assert_eq!(first.added.len(), 1);
        assert!(second.added.is_empty());
        assert_eq!(ids(&draft, 0, 0).len(), 1);
        assert!(draft.headers()[0].services[0].sub_services[0].text.is_some());

        assert_eq!(
            draft.remove_sub_service(0, "LEGAL CONSULTATION", "legal-consultation-3"),
            Ok(true)
        );
        assert!(!draft.guard().is_selected("legal-consultation-3"));
        assert!(draft.is_consistent());
    }

    #[test]
    fn structural_removal_rebuilds_the_guard() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Package A").expect("package");
        draft.add_header("Site Work").expect("custom");
        draft
            .add_service(
                1,
                "Drafting of Agreement for Sale",
                refs(&["drafting-of-agreement-for-sale-1"]),
                ConflictPolicy::Reject,
            )
            .expect("addon service");

        draft.remove_header(0).expect("removed");
        assert_eq!(draft.guard().len(), 1);
        assert_eq!(
            draft
                .guard()
                .location_of("drafting-of-agreement-for-sale-1")
                .map(|l| l.header_index),
            Some(0)
        );

        draft
            .remove_service(0, "Drafting of Agreement for Sale")
            .expect("service removed");
        assert!(draft.guard().is_empty());
        assert!(draft.is_consistent());
    }

    #[test]
    fn only_customized_headers_rename() {
        let mut draft = QuotationDraft::new();
        draft.add_header("Customized Header").expect("custom");
        draft.add_header("Legal Consultation").expect("plain");

        draft.rename_custom_header(0, "Hearings").expect("renamed");
        assert_eq!(draft.headers()[0].name, "Hearings");
        assert_eq!(
            draft.rename_custom_header(1, "Other"),
            Err(DraftError::NotCustomizable("Legal Consultation".to_string()))
        );
        assert_eq!(
            draft.rename_custom_header(0, "Legal Consultation"),
            Err(DraftError::DuplicateHeader("Legal Consultation".to_string()))
        );
        assert_eq!(
            draft.rename_custom_header(0, "package a"),
            Err(DraftError::ReservedHeaderName("package a".to_string()))
        );
        assert_eq!(
            draft.rename_custom_header(0, "Project Compliance"),
            Err(DraftError::ReservedHeaderName("Project Compliance".to_string()))
        );
        assert_eq!(draft.headers()[0].name, "Hearings");
        assert_eq!(draft.headers()[0].kind, HeaderKind::Customized);

        draft
            .rename_custom_header(0, "Customized Header")
            .expect("default name restored");
    }

    #[test]
    fn restoring_a_selection_drops_later_duplicates() {
        let headers = vec![
            HeaderSelection::new(
                "Project Compliance",
                vec![ServiceSelection {
                    name: "Project Closure".into(),
                    sub_services: refs(&["project-closure-1"]),
                }],
            ),
            HeaderSelection::new(
                "Site Work",
                vec![ServiceSelection {
                    name: "Project Closure".into(),
                    sub_services: refs(&["project-closure-1", "project-closure-2"]),
                }],
            ),
        ];

        let (draft, report) = QuotationDraft::from_selection(headers);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].location.header_name, "Project Compliance");
        assert_eq!(ids(&draft, 1, 0), vec!["project-closure-2".to_string()]);
        assert_eq!(draft.headers()[1].kind, HeaderKind::Customized);
        assert!(draft.is_consistent());

        let mut cleared = draft;
        cleared.clear();
        assert!(cleared.is_empty());
        assert!(cleared.guard().is_empty());
    }
}
