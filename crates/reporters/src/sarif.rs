//! Conversion of findings to SARIF 2.1.0.

use engine::{Finding, Rule, RuleCatalog, Severity};
use serde_json::json;
use serde_sarif::sarif;

/// Rule metadata for the tool driver. CWE identifiers go to the property
/// bag tags, where code scanning dashboards pick them up.
fn descriptor(rule: &dyn Rule) -> serde_json::Result<sarif::ReportingDescriptor> {
    let mut tags: Vec<String> = vec!["security".into()];
    tags.extend(rule.weaknesses().iter().map(|w| w.id.to_string()));
    let help_uri = rule.weaknesses().first().map(|w| w.url());
    let mut value = json!({
        "id": rule.id(),
        "name": rule.name(),
        "shortDescription": { "text": rule.name() },
        "fullDescription": { "text": rule.description() },
        "defaultConfiguration": { "level": level(rule.severity()) },
        "properties": { "tags": tags },
    });
    if let Some(uri) = help_uri {
        value["helpUri"] = json!(uri);
    }
    serde_json::from_value(value)
}

fn level(severity: Severity) -> sarif::ResultLevel {
    match severity {
        Severity::Info | Severity::Low => sarif::ResultLevel::Note,
        Severity::Medium => sarif::ResultLevel::Warning,
        Severity::High | Severity::Critical => sarif::ResultLevel::Error,
    }
}

/// Builds a single-run SARIF log. Every rule of `rules` is described in
/// the driver, whether or not it produced a result.
pub fn to_sarif(findings: &[Finding], rules: &RuleCatalog) -> serde_json::Result<sarif::Sarif> {
    let descriptors = rules
        .iter()
        .map(|rule| descriptor(rule.as_ref()))
        .collect::<serde_json::Result<Vec<_>>>()?;

    let results: Vec<sarif::Result> = findings
        .iter()
        .map(|f| {
            let location = sarif::Location::builder()
                .physical_location(
                    sarif::PhysicalLocation::builder()
                        .artifact_location(
                            sarif::ArtifactLocation::builder()
                                .uri(f.file.display().to_string())
                                .build(),
                        )
                        .region(
                            sarif::Region::builder()
                                .start_line(f.line as i64)
                                .start_column(f.column as i64)
                                .build(),
                        )
                        .build(),
                )
                .build();

            sarif::Result::builder()
                .rule_id(f.rule_id.clone())
                .message(sarif::Message::builder().text(f.message.clone()).build())
                .level(level(f.severity))
                .locations(vec![location])
                .build()
        })
        .collect();

    Ok(sarif::Sarif::builder()
        .version(json!("2.1.0"))
        .schema(sarif::SCHEMA_URL.to_string())
        .runs(vec![sarif::Run::builder()
            .tool(
                sarif::Tool::builder()
                    .driver(
                        sarif::ToolComponent::builder()
                            .name("RootCause PHP")
                            .rules(descriptors)
                            .build(),
                    )
                    .build(),
            )
            .results(results)
            .build()])
        .build())
}
