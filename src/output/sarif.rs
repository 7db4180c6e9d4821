use crate::diagnostic::{Diagnostic, Severity, ValidationReport};
use crate::scanners::{all_rules, RuleInfo};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::BTreeMap;

pub fn format(report: &ValidationReport) -> serde_json::Result<String> {
    let catalogue: BTreeMap<&str, RuleInfo> = all_rules().into_iter().map(|r| (r.id, r)).collect();

    // Rules that fired, sorted by id.
    let mut rule_ids: Vec<&str> = report.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    rule_ids.sort_unstable();
    rule_ids.dedup();

    let rule_index: BTreeMap<&str, i64> = rule_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_ids
        .iter()
        .map(|id| {
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            if let Some(info) = catalogue.get(id) {
                rule.short_description = Some(
                    MultiformatMessageString::builder()
                        .text(info.message.to_string())
                        .build(),
                );
                rule.help = Some(
                    MultiformatMessageString::builder()
                        .text(info.remediation.to_string())
                        .build(),
                );
            }
            rule
        })
        .collect();

    let results: Vec<SarifResult> = report
        .diagnostics
        .iter()
        .map(|d| to_result(d, rule_index.get(d.rule_id.as_str()).copied()))
        .collect();

    let driver = ToolComponent::builder()
        .name("bagakit-skill-maker")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif)
}

fn to_result(d: &Diagnostic, rule_index: Option<i64>) -> SarifResult {
    let level = match d.severity {
        Severity::Error => ResultLevel::Error,
        Severity::Warning => ResultLevel::Warning,
    };

    let mut result = SarifResult::builder()
        .message(Message::builder().text(d.message.clone()).build())
        .build();

    result.rule_id = Some(d.rule_id.clone());
    result.level = Some(level);
    result.rule_index = rule_index;

    if let Some(ref file) = d.file {
        let uri = file.to_string_lossy().replace('\\', "/");

        let mut location = Location::builder().build();
        let mut physical = PhysicalLocation::builder().build();

        physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());

        if let Some(line) = d.line {
            physical.region = Some(Region::builder().start_line(line as i64).build());
        }

        location.physical_location = Some(physical);
        result.locations = Some(vec![location]);
    }

    result
}
