use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const CUSTOMIZED_HEADER: &str = "Customized Header";
pub const ADDON_HEADER: &str = "Add-ons";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PackageTier {
    A,
    B,
    C,
    D,
}

impl PackageTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::A, Self::B, Self::C, Self::D]
    }

    pub const fn header_name(self) -> &'static str {
        match self {
            Self::A => "Package A",
            Self::B => "Package B",
            Self::C => "Package C",
            Self::D => "Package D",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ordered()
            .into_iter()
            .find(|tier| tier.header_name().eq_ignore_ascii_case(trimmed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "tier", rename_all = "camelCase")]
pub enum HeaderKind {
    Plain,
    Package(PackageTier),
    Customized,
    Addon,
}

impl HeaderKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Package(_) => "package",
            Self::Customized => "customized",
            Self::Addon => "addon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceCategory {
    Main,
    Addon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubServiceDefinition {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    pub name: String,
    pub origin_header: String,
    pub category: ServiceCategory,
    pub sub_services: Vec<SubServiceDefinition>,
}

impl ServiceDefinition {
    pub fn sub_service_ids(&self) -> impl Iterator<Item = &str> {
        self.sub_services.iter().map(|sub| sub.id.as_str())
    }
}

/// A header as declared in the catalogue. Package headers list only the
/// services their own tier adds; [`super::PackageExpander`] folds in the
/// lower tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDefinition {
    pub name: String,
    pub kind: HeaderKind,
    pub services: Vec<ServiceDefinition>,
}

#[derive(Debug)]
pub struct ServiceCatalog {
    headers: Vec<HeaderDefinition>,
}

static STANDARD_CATALOG: OnceLock<ServiceCatalog> = OnceLock::new();

impl ServiceCatalog {
    /// The process-wide catalogue, built on first use and immutable afterwards.
    pub fn standard() -> &'static ServiceCatalog {
        STANDARD_CATALOG.get_or_init(build_standard_catalog)
    }

    pub fn headers(&self) -> &[HeaderDefinition] {
        &self.headers
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|header| header.name.as_str()).collect()
    }

    pub fn header(&self, name: &str) -> Option<&HeaderDefinition> {
        let trimmed = name.trim();
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(trimmed))
    }

    /// Kind of a header name. Unknown names are treated as user-named
    /// customized headers.
    pub fn kind_of(&self, name: &str) -> HeaderKind {
        self.header(name)
            .map(|header| header.kind)
            .unwrap_or(HeaderKind::Customized)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        let trimmed = name.trim();
        self.headers
            .iter()
            .flat_map(|header| header.services.iter())
            .find(|service| service.name == trimmed)
    }

    pub fn sub_service(&self, id: &str) -> Option<(&ServiceDefinition, &SubServiceDefinition)> {
        self.headers
            .iter()
            .flat_map(|header| header.services.iter())
            .find_map(|service| {
                service
                    .sub_services
                    .iter()
                    .find(|sub| sub.id == id)
                    .map(|sub| (service, sub))
            })
    }

    /// Number of sub-services owned by the catalogue. Package A re-lists
    /// services declared elsewhere, so package headers are skipped.
    pub fn sub_service_count(&self) -> usize {
        self.headers
            .iter()
            .filter(|header| !matches!(header.kind, HeaderKind::Package(_)))
            .flat_map(|header| header.services.iter())
            .map(|service| service.sub_services.len())
            .sum()
    }
}

struct ServiceTemplate {
    name: &'static str,
    sub_services: &'static [&'static str],
}

struct HeaderTemplate {
    name: &'static str,
    kind: HeaderKind,
    services: &'static [ServiceTemplate],
}

fn build_standard_catalog() -> ServiceCatalog {
    let mut headers: Vec<HeaderDefinition> = Vec::new();

    for template in MAIN_HEADERS {
        headers.push(materialize_header(template, ServiceCategory::Main));
    }

    for (tier, own_services) in PACKAGE_SERVICES {
        let mut services = Vec::with_capacity(own_services.len());
        for name in *own_services {
            let existing = headers
                .iter()
                .flat_map(|header| header.services.iter())
                .find(|service| service.name == *name)
                .cloned();
            services.push(existing.unwrap_or_else(|| ServiceDefinition {
                name: (*name).to_string(),
                origin_header: tier.header_name().to_string(),
                category: ServiceCategory::Main,
                sub_services: Vec::new(),
            }));
        }
        headers.push(HeaderDefinition {
            name: tier.header_name().to_string(),
            kind: HeaderKind::Package(*tier),
            services,
        });
    }

    headers.push(HeaderDefinition {
        name: CUSTOMIZED_HEADER.to_string(),
        kind: HeaderKind::Customized,
        services: Vec::new(),
    });
    headers.push(materialize_header(&ADDONS, ServiceCategory::Addon));

    ServiceCatalog { headers }
}

fn materialize_header(template: &HeaderTemplate, category: ServiceCategory) -> HeaderDefinition {
    let services = template
        .services
        .iter()
        .map(|service| {
            let slug = slugify(service.name);
            ServiceDefinition {
                name: service.name.trim().to_string(),
                origin_header: template.name.to_string(),
                category,
                sub_services: service
                    .sub_services
                    .iter()
                    .enumerate()
                    .map(|(index, text)| SubServiceDefinition {
                        id: format!("{slug}-{}", index + 1),
                        text: (*text).to_string(),
                    })
                    .collect(),
            }
        })
        .collect();

    HeaderDefinition {
        name: template.name.to_string(),
        kind: template.kind,
        services,
    }
}

pub(crate) fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Every sub-service id in the catalogue, in declaration order.
pub fn all_sub_service_ids(catalog: &ServiceCatalog) -> Vec<&str> {
    let mut seen = HashSet::new();
    catalog
        .headers()
        .iter()
        .flat_map(|header| header.services.iter())
        .flat_map(|service| service.sub_service_ids())
        .filter(|id| seen.insert(*id))
        .collect()
}

const MAIN_HEADERS: &[HeaderTemplate] = &[
    HeaderTemplate {
        name: "Project Registration",
        kind: HeaderKind::Plain,
        services: &[ServiceTemplate {
            name: "PROJECT REGISTRATION SERVICES",
            sub_services: &[
                "Consultation and Guidance on Registration Procedures",
                "Assistance with Online Registration Process",
                "Preparation of Necessary Undertakings and Affidavits for RERA Registration",
                "Scrutiny Assistance till RERA Certificate is generated",
                "Continued support until the RERA Certificate is issued.",
                "Procurement of CERSAI , Review of certificate as per RERA format.",
            ],
        }],
    },
    HeaderTemplate {
        name: "Legal Consultation",
        kind: HeaderKind::Plain,
        services: &[ServiceTemplate {
            name: "LEGAL CONSULTATION",
            sub_services: &[
                "Client Meetings: Conducting conference meetings with the client to understand objectives, clarify requirements, and gather necessary inputs.",
                "Review of Agreements for Sale: Examination of the Agreements for Sale executed with existing allottees to assess contractual obligations and relevant clauses.",
                "Analysis of Sanctioned Layout Plans: Detailed study of the currently sanctioned layout plans to understand the approved development framework.",
                "Review of Proposed Plans: Evaluation of the proposed revised plans in context with the existing development and approvals.",
                "Assessment of MahaRERA Profile: Review and analysis of the project's profile on the MahaRERA portal to verify past disclosures.",
                "Legal Research on RERA Provisions: In-depth research on the applicable provisions of the Real Estate (Regulation and Development) Act, 2016, with a focus on Section 14(2), including review of relevant judicial precedents.",
                "Legal Consultation and Opinion: Providing a comprehensive legal opinion on the implications of 14(2) of the RERA Act in the context of the project.",
                "Drafting of Consent Letter: Preparation of a draft consent letter for use with allottees, incorporating legal requirements and project-specific considerations.",
            ],
        }],
    },
    HeaderTemplate {
        name: "Project Compliance",
        kind: HeaderKind::Plain,
        services: &[
            ServiceTemplate {
                name: "Change of Promoter",
                sub_services: &[
                    "Change of Promoters as per Section 15: Updating project promoter information in accordance with MahaRERA guidelines.",
                    "Drafting of Annexure A, B, and C: Compiling project-related information into required annexures for MahaRERA submission.",
                    "Drafting of Consent Letter: Formalizing stakeholders' approval for project-related changes or actions.",
                    "Follow-up Till Certificate is Generated: Continuous communication with MahaRERA until project certificate issuance.",
                    "Hearing at MahaRERA Office: Attending sessions at MahaRERA to address project-related queries or issues.",
                    "Drafting and Uploading of Correction Application: Rectifying errors in project documentation and re-submitting to MahaRERA.",
                    "Drafting of Format C: Complying with MahaRERA-prescribed document formats for reporting and compliance purposes.",
                    "Scrutiny Assistance Until Certificate is Generated: Providing support during MahaRERA scrutiny process until project certificate issuance",
                ],
            },
            ServiceTemplate {
                name: "MahaRERA Profile Updation",
                sub_services: &[
                    "Disclosure of Sold/Unsold Inventory",
                    "Format D Drafting and Uploading",
                    "CERSAI Report Submission",
                    "Drafted Formats for Form 2A",
                    "MahaRERA Profile Update",
                ],
            },
            ServiceTemplate {
                name: "Correction (Change of FSI)",
                sub_services: &[
                    "Project Correction under Section 14 (2)",
                    "Consultation regarding RERA Rules and Regulations",
                    "Uploading of all the relevant documents for Project Corrections",
                    "Drafting all the relevant Applications, Undertakings, and Declarations",
                    "Scrutiny Assistance",
                    "Coordinating with the MahaRERA Authorities",
                    "Drafting of a detailed consent letter for correction",
                ],
            },
            ServiceTemplate {
                name: "MahaRERA Profile Migration",
                sub_services: &[
                    "Updating the Promoter/Partner(s)/Director(s) Details on the Portal.",
                    "Adding Grievance Officer and Single point of Contact.",
                    "Updation of Project Professional Details, Building Details, Progress of the Project etc.",
                    "Generating & Updating of Form 1 (Architect Certificate), Form 2 (Certificate of Engineer) and Form 3 (CA Certificate).",
                    "Generation of CERSAI Report.",
                    "Drafting and updating Legal & Financial Encumbrances of the project (If any).",
                    "Drafted Formats of Authorized Signatory, Development Plan (DP) Remark Declaration, Financial Encumbrance Letter and Legal Encumbrance Letter.",
                    "Updation and Migration of the old MahaRERA Profile Details to the new RERA website \u{201c}MahaRERA CRITI\u{201d}.",
                ],
            },
            ServiceTemplate {
                name: "Removal from Abeyance (QPR)",
                sub_services: &[
                    "Responding to the MahaRERA Notice",
                    "Representation in Virtual Meetings",
                    "Providing Guidance on RERA Rules and Regulations",
                    "Liaising with MahaRERA Authorities",
                    "Drafting Necessary Applications, Undertakings, and Declarations",
                ],
            },
            ServiceTemplate {
                name: "Extension of Project Completion Date u/s 7(3)",
                sub_services: &[
                    "Project Extension under Section 7(3)",
                    "Consultation regarding RERA Rules and Regulations",
                    "Uploading of all the relevant documents for Project Extension",
                    "Drafting of a detailed consent letter for correction",
                    "Scrutiny Assistance",
                ],
            },
            ServiceTemplate {
                name: "Project Closure",
                sub_services: &[
                    "Project Closure",
                    "Consultation regarding RERA Rules and Regulations",
                    "Drafting all the relevant Applications, Undertakings, and Declarations",
                    "Uploading of all the relevant documents for Project Closure",
                ],
            },
            ServiceTemplate {
                name: "Extension of Project Completion Date u/s 6",
                sub_services: &[
                    "Project Extension under Section 6",
                    "Consultation regarding RERA Rules and Regulations",
                    "Uploading of all the relevant documents for Project Extension",
                    "Scrutiny Assistance",
                ],
            },
            ServiceTemplate {
                name: "Post Facto Extension",
                sub_services: &[
                    "Project Extension",
                    "Consultation regarding RERA Rules & Regulations",
                    "Uploading all the relevant documents for Project Extension",
                    "Scrutiny Assistance",
                ],
            },
            ServiceTemplate {
                name: "Extension Under Order 40",
                sub_services: &[
                    "Order 40 Extension",
                    "RERA Rules Consultation",
                    "Document Compilation and Uploading",
                    "Drafting Services",
                    "Scrutiny Support",
                    "MahaRERA Coordination",
                    "Hearing Representation",
                ],
            },
            ServiceTemplate {
                name: "Correction (Change of Bank Account)",
                sub_services: &[
                    "Change of separate bank account as per section 4 (2)(l)(D).",
                    "Drafting of Duly Notarized Declaration-Cum Undertaking as per the format prescribed in 'A'",
                    "Declaration in Format 'A' as per Order No; 34 of 2022 dated 27;07;20222 issued by MahaRERA",
                    "Consultation regarding RERA Rules and Regulations",
                    "Uploading of all the relevant documents for Project Correction",
                    "Drafting all the relevant Applications, Undertakings and Declarations",
                    "Scrutiny Assistance",
                    "Coordinating with the MahaRERA Authorities",
                ],
            },
            ServiceTemplate {
                name: "Removal from Abeyance (Lapsed)",
                sub_services: &[
                    "Responding to the MahaRERA Notice",
                    "Representation in Virtual Meetings",
                    "Providing Guidance on RERA Rules and Regulations",
                    "Liaising with MahaRERA Authorities",
                    "Drafting Necessary Applications, Undertakings, and Declarations",
                ],
            },
            ServiceTemplate {
                name: "Project De-Registration",
                sub_services: &[
                    "Consultation on De-Registration Prerequisites",
                    "Preparation of De-Registration Form",
                    "Preparation of Declaration/Undertaking Form",
                    "Drafting of Notarized Affidavit",
                    "Drafting of Consent Letter",
                    "Scrutiny Support",
                    "Coordination with MahaRERA Officials",
                    "Representation at MahaRERA Hearing",
                    "Comprehensive Deregistration Guidance",
                ],
            },
            ServiceTemplate {
                name: "Drafting of Title Report in Format A",
                sub_services: &[
                    "Prepare comprehensive Title Report in Format A",
                    "Conduct detailed examination of land records, registered documents, and legal history",
                    "Ensure the report is legally sound and fully compliant with RERA guidelines",
                ],
            },
            ServiceTemplate {
                name: "Correction - Change of Other Details",
                sub_services: &[
                    "Assist in filing Correction Applications",
                    "Ensure accurate documentation and justification are submitted",
                ],
            },
        ],
    },
];

// Services each tier adds on top of the tiers below it.
const PACKAGE_SERVICES: &[(PackageTier, &[&str])] = &[
    (
        PackageTier::A,
        &[
            "PROJECT REGISTRATION SERVICES",
            "LEGAL CONSULTATION",
            "Change of Promoter",
            "MahaRERA Profile Updation",
            "Correction (Change of FSI)",
            "MahaRERA Profile Migration",
            "Removal from Abeyance (QPR)",
            "Extension of Project Completion Date u/s 7(3)",
            "Project Closure",
            "Extension of Project Completion Date u/s 6",
            "Post Facto Extension",
            "Extension Under Order 40",
            "Correction (Change of Bank Account)",
            "Removal from Abeyance (Lapsed)",
            "Project De-Registration",
            "Drafting of Title Report in Format A",
            "Correction - Change of Other Details",
        ],
    ),
    (PackageTier::B, &["PROFESSIONAL CERTIFICATIONS"]),
    (PackageTier::C, &["RERA ANNUAL AUDIT CONSULTATION"]),
    (
        PackageTier::D,
        &[
            "BESPOKE OFFERINGS",
            "REGULATORY HEARING & NOTICES",
            "LIAISONING",
            "LEGAL DOCUMENTATION",
            "TITLE REPORT",
            "Form 1",
            "Form 2",
            "Form 3",
            "Form 5 (CA RERA Audit Certificate)",
            "Search Report",
            "SRO Membership",
        ],
    ),
];

const ADDONS: HeaderTemplate = HeaderTemplate {
    name: ADDON_HEADER,
    kind: HeaderKind::Addon,
    services: &[
        ServiceTemplate {
            name: "Drafting of Agreement for Sale",
            sub_services: &[
                "Drafting of model Agreement for Sale as per RERA format",
                "Incorporation of project-specific annexures and schedules",
            ],
        },
        ServiceTemplate {
            name: "Vetting of Allotment Letter",
            sub_services: &["Review of allotment letter against the prescribed MahaRERA format"],
        },
        ServiceTemplate {
            name: "Quarterly Progress Report Filing",
            sub_services: &[
                "Compilation of Form 1, Form 2 and Form 3 inputs",
                "Uploading of quarterly progress on the MahaRERA portal",
            ],
        },
        ServiceTemplate {
            name: "Promoter Website Disclosure",
            sub_services: &[],
        },
    ],
};
