use std::fmt::Write;

use super::domain::QuotationRecord;
use super::terms::applicable_terms;
use crate::pricing::{HeaderSelection, TAX_RATE_PERCENT};

/// One-line digest of a selection: `Header: service, service; Header: ...`.
/// Headers without services are skipped.
pub fn service_summary(headers: &[HeaderSelection]) -> String {
    headers
        .iter()
        .filter(|header| !header.services.is_empty())
        .map(|header| {
            let services: Vec<&str> = header
                .services
                .iter()
                .map(|service| service.name.as_str())
                .collect();
            format!("{}: {}", header.name, services.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Formats rupees with Indian digit grouping, e.g. `₹1,23,456`.
pub fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();
    format!("₹{},{}", groups.join(","), tail)
}

/// Plain-text rendering of a stored quotation for sharing outside the app.
pub fn render_summary(record: &QuotationRecord) -> String {
    let project = &record.project;
    let mut content = String::new();

    writeln!(
        &mut content,
        "Quotation {} ({})",
        record.id,
        record.status.label()
    )
    .expect("write title");
    writeln!(
        &mut content,
        "Developer: {} ({})",
        project.developer_name, project.developer_type
    )
    .expect("write developer");
    if let Some(name) = &project.project_name {
        writeln!(&mut content, "Project: {name}").expect("write project");
    }
    match &project.project_location {
        Some(location) => writeln!(
            &mut content,
            "Region: {} / {} | Plot area: {} sq m",
            project.project_region, location, project.plot_area
        ),
        None => writeln!(
            &mut content,
            "Region: {} | Plot area: {} sq m",
            project.project_region, project.plot_area
        ),
    }
    .expect("write region");
    if let Some(rera) = &project.rera_number {
        writeln!(&mut content, "RERA number: {rera}").expect("write rera");
    }
    writeln!(
        &mut content,
        "Validity: {} days | Payment schedule: {}% upfront",
        project.validity.days(),
        project.payment_schedule.upfront_percent()
    )
    .expect("write commercial terms");

    match &record.pricing {
        Some(pricing) => {
            for header in &pricing.breakdown {
                writeln!(&mut content, "\n{}", header.header).expect("write header");
                for line in &header.services {
                    writeln!(
                        &mut content,
                        "  - {}: {} ({} sub-services{})",
                        line.service_name,
                        format_rupees(line.total_amount),
                        line.sub_service_count,
                        if line.rate_found { "" } else { ", rate missing" }
                    )
                    .expect("write service line");
                }
                writeln!(
                    &mut content,
                    "  Header total: {}",
                    format_rupees(header.header_total)
                )
                .expect("write header total");
            }
            writeln!(&mut content).expect("write spacer");
            writeln!(&mut content, "Subtotal: {}", format_rupees(pricing.subtotal))
                .expect("write subtotal");
            if pricing.discount > 0 {
                writeln!(
                    &mut content,
                    "Discount ({:.2}%): -{}",
                    pricing.discount_percent,
                    format_rupees(pricing.discount)
                )
                .expect("write discount");
            }
            writeln!(
                &mut content,
                "GST ({TAX_RATE_PERCENT}%): {}",
                format_rupees(pricing.tax)
            )
            .expect("write tax");
            writeln!(&mut content, "Total: {}", format_rupees(pricing.total))
                .expect("write total");
        }
        None => {
            for header in &record.headers {
                writeln!(&mut content, "\n{}", header.name).expect("write header");
                for service in &header.services {
                    writeln!(
                        &mut content,
                        "  - {} ({} sub-services)",
                        service.name,
                        service.sub_services.len()
                    )
                    .expect("write service");
                }
            }
            writeln!(&mut content, "\nPricing: not yet calculated").expect("write pricing");
        }
    }

    writeln!(&mut content, "\nTerms & Conditions").expect("write terms title");
    for section in applicable_terms(&record.headers) {
        writeln!(&mut content, "{}", section.title).expect("write section");
        for (index, clause) in section.clauses.iter().enumerate() {
            writeln!(&mut content, "  {}. {clause}", index + 1).expect("write clause");
        }
    }
    if !record.terms.custom_terms.is_empty() {
        writeln!(&mut content, "Additional terms").expect("write custom title");
        for (index, clause) in record.terms.custom_terms.iter().enumerate() {
            writeln!(&mut content, "  {}. {clause}", index + 1).expect("write custom clause");
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::ServiceSelection;

    #[test]
    fn summary_joins_headers_and_services() {
        let headers = vec![
            HeaderSelection::new(
                "Project Compliance",
                vec![
                    ServiceSelection::new("FORM 1"),
                    ServiceSelection::new("FORM 2"),
                ],
            ),
            HeaderSelection::new("Package D", Vec::new()),
            HeaderSelection::new(
                "Project Registration",
                vec![ServiceSelection::new("PROJECT REGISTRATION SERVICES")],
            ),
        ];
        assert_eq!(
            service_summary(&headers),
            "Project Compliance: FORM 1, FORM 2; Project Registration: PROJECT REGISTRATION SERVICES"
        );
        assert_eq!(service_summary(&[]), "");
    }

    #[test]
    fn rupees_use_indian_grouping() {
        assert_eq!(format_rupees(0), "₹0");
        assert_eq!(format_rupees(999), "₹999");
        assert_eq!(format_rupees(12_744), "₹12,744");
        assert_eq!(format_rupees(123_456), "₹1,23,456");
        assert_eq!(format_rupees(10_112_100), "₹1,01,12,100");
    }
}
