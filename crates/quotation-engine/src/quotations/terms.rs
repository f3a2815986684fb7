use serde::Serialize;

use crate::pricing::{HeaderSelection, PackageTier};

pub const GENERAL_SECTION: &str = "General T&C";
pub const PACKAGE_ABC_SECTION: &str = "Package A,B,C";
pub const PACKAGE_D_SECTION: &str = "Package D";

const GENERAL_TERMS: &[&str] = &[
    "The above quotation is subject to this project only.",
    "The prices mentioned above are in particular to One Project per year.",
    "The services outlined above are included within the project scope. Any additional services not specified are excluded from this scope.",
    "The prices mentioned above are applicable to One Project only for the duration of the services obtained.",
    "The prices mentioned above DO NOT include Government Fees.",
    "The prices mentioned above DO NOT include Edit Fees.",
    "*18% GST Applicable on above mentioned charges.",
    "The prices listed above do not include any applicable statutory taxes.",
    "Any and all services not mentioned in the above scope of services are not applicable",
    "All Out-of-pocket expenses incurred for completion of the work shall be re-imbursed to RERA Easy",
];

const PACKAGE_ABC_TERMS: &[&str] = &[
    "Payment is due at the initiation of services, followed by annual payments thereafter.",
    "Any kind of drafting of legal documents or contracts are not applicable.",
    "The quoted fee covers annual MahaRERA compliance services, with billing on a Yearly basis for convenience and predictable financial planning.",
    "Invoices will be generated at a predetermined interval for each year in advance.",
    "The initial invoice will be issued from the date of issuance or a start date as specified in the Work Order.",
];

const PACKAGE_D_TERMS: &[&str] = &[
    "All Out-of-pocket expenses incurred for the explicit purpose of Commuting, Refreshment meals of RERA Easy's personnel shall be re-imbursed to RERA Easy, subject to submission of relevant invoices, bills and records submitted.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsSection {
    pub title: &'static str,
    pub clauses: &'static [&'static str],
}

/// Sections that apply to a selection: general terms always, the package
/// sections when one of their packages was picked.
pub fn applicable_terms(headers: &[HeaderSelection]) -> Vec<TermsSection> {
    let tiers: Vec<PackageTier> = headers
        .iter()
        .filter_map(|header| PackageTier::from_header(&header.name))
        .collect();

    let mut sections = vec![TermsSection {
        title: GENERAL_SECTION,
        clauses: GENERAL_TERMS,
    }];
    if tiers.iter().any(|tier| *tier != PackageTier::D) {
        sections.push(TermsSection {
            title: PACKAGE_ABC_SECTION,
            clauses: PACKAGE_ABC_TERMS,
        });
    }
    if tiers.contains(&PackageTier::D) {
        sections.push(TermsSection {
            title: PACKAGE_D_SECTION,
            clauses: PACKAGE_D_TERMS,
        });
    }
    sections
}
