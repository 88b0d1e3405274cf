//! Label-per-line parsing of structured completions.
//!
//! The model is asked for lines such as `Job title: ...`. Each label is
//! matched at the start of a line (case-insensitive, ignoring markdown
//! emphasis and bullets); the first occurrence wins. A multi-line label
//! takes everything after it to the end of the text.

use serde::Serialize;

use crate::resume::models::{Project, WorkExperience};
use crate::resume::validation::parse_date;

/// Parsed fields plus the wire names of those the completion did not supply.
/// Unsupplied fields are present as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCompletion<T> {
    #[serde(flatten)]
    pub fields: T,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Complete,
    Partial,
}

impl<T> ParsedCompletion<T> {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn outcome(&self) -> ParseOutcome {
        if self.is_complete() {
            ParseOutcome::Complete
        } else {
            ParseOutcome::Partial
        }
    }
}

struct Label {
    text: &'static str,
    field: &'static str,
    multiline: bool,
}

const fn line(text: &'static str, field: &'static str) -> Label {
    Label {
        text,
        field,
        multiline: false,
    }
}

const fn block(text: &'static str, field: &'static str) -> Label {
    Label {
        text,
        field,
        multiline: true,
    }
}

const WORK_EXPERIENCE_LABELS: &[Label] = &[
    line("Job title:", "position"),
    line("Company:", "company"),
    line("Company Location:", "companyLocation"),
    line("Start date:", "startDate"),
    line("End date:", "endDate"),
    block("Description:", "description"),
];

const PROJECT_LABELS: &[Label] = &[
    line("Project Name:", "projectName"),
    line("Project Link:", "link"),
    line("TechStack:", "techStack"),
    block("Description:", "description"),
];

fn strip_decoration(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '*' | '#' | '-' | '•' | '_'))
        .trim_start()
}

/// Rest of the line after `label`, when the line starts with it.
fn after_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let line = strip_decoration(line);
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    Some(line[label.len()..].trim_start_matches(['*', '_']).trim())
}

fn find_label(lines: &[&str], label: &Label) -> Option<String> {
    lines.iter().enumerate().find_map(|(index, raw)| {
        let first = after_label(raw, label.text)?;
        if !label.multiline {
            return Some(first.to_string());
        }
        let mut body = vec![first];
        body.extend(lines[index + 1..].iter().map(|l| l.trim_end()));
        Some(body.join("\n").trim().to_string())
    })
}

/// Looks up every label. Returns `(field, value)` with blanks as `None`.
fn extract(text: &str, labels: &[Label]) -> Vec<(&'static str, Option<String>)> {
    let lines: Vec<&str> = text.lines().collect();
    labels
        .iter()
        .map(|label| {
            let value = find_label(&lines, label).filter(|v| !v.is_empty());
            (label.field, value)
        })
        .collect()
}

fn take(found: &mut [(&'static str, Option<String>)], field: &str) -> Option<String> {
    found
        .iter_mut()
        .find(|(name, _)| *name == field)
        .and_then(|(_, value)| value.take())
}

/// Keeps `YYYY-MM-DD`; anything else (including "Present") reads as unset.
fn date_or_unset(value: Option<String>) -> Option<String> {
    value.filter(|v| parse_date(v).is_some())
}

fn is_open_ended(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v == "present" || v == "current" || v == "now"
        })
        .unwrap_or(false)
}

struct Collector {
    missing: Vec<&'static str>,
}

impl Collector {
    /// Empty string for an unsupplied field, recording it as missing.
    fn fill(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        if value.is_none() {
            self.missing.push(field);
        }
        Some(value.unwrap_or_default())
    }
}

pub fn parse_work_experience(text: &str) -> ParsedCompletion<WorkExperience> {
    let mut found = extract(text, WORK_EXPERIENCE_LABELS);
    let mut c = Collector {
        missing: Vec::new(),
    };

    let end_raw = take(&mut found, "endDate");
    let end_date = if is_open_ended(&end_raw) {
        // An ongoing role is a complete answer with no end date.
        Some(String::new())
    } else {
        c.fill("endDate", date_or_unset(end_raw))
    };

    let fields = WorkExperience {
        position: c.fill("position", take(&mut found, "position")),
        company: c.fill("company", take(&mut found, "company")),
        company_location: c.fill("companyLocation", take(&mut found, "companyLocation")),
        start_date: c.fill("startDate", date_or_unset(take(&mut found, "startDate"))),
        end_date,
        description: c.fill("description", take(&mut found, "description")),
    };
    ParsedCompletion {
        fields,
        missing: order_like(c.missing, WORK_EXPERIENCE_LABELS),
    }
}

pub fn parse_project(text: &str) -> ParsedCompletion<Project> {
    let mut found = extract(text, PROJECT_LABELS);
    let mut c = Collector {
        missing: Vec::new(),
    };
    let fields = Project {
        project_name: c.fill("projectName", take(&mut found, "projectName")),
        link: c.fill("link", take(&mut found, "link")),
        tech_stack: c.fill("techStack", take(&mut found, "techStack")),
        description: c.fill("description", take(&mut found, "description")),
    };
    ParsedCompletion {
        fields,
        missing: order_like(c.missing, PROJECT_LABELS),
    }
}

fn order_like(mut missing: Vec<&'static str>, labels: &[Label]) -> Vec<&'static str> {
    missing.sort_by_key(|m| labels.iter().position(|l| l.field == *m));
    missing
}

/// The result returned when the completion could not be obtained at all.
pub fn empty_work_experience() -> ParsedCompletion<WorkExperience> {
    parse_work_experience("")
}

pub fn empty_project() -> ParsedCompletion<Project> {
    parse_project("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_WORK: &str = "Job title: Backend Engineer
Company: Acme Corp
Company Location: Berlin, Germany
Start date: 2021-03-01
End date: 2023-08-31
Description:
• Built the billing pipeline
• Cut p99 latency by 40%
• Mentored two engineers";

    #[test]
    fn test_full_work_experience_is_complete() {
        let parsed = parse_work_experience(FULL_WORK);
        assert_eq!(parsed.outcome(), ParseOutcome::Complete);
        let w = parsed.fields;
        assert_eq!(w.position.as_deref(), Some("Backend Engineer"));
        assert_eq!(w.company.as_deref(), Some("Acme Corp"));
        assert_eq!(w.company_location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(w.start_date.as_deref(), Some("2021-03-01"));
        assert_eq!(w.end_date.as_deref(), Some("2023-08-31"));
        assert_eq!(
            w.description.as_deref(),
            Some("• Built the billing pipeline\n• Cut p99 latency by 40%\n• Mentored two engineers")
        );
    }

    #[test]
    fn test_company_label_does_not_capture_location() {
        let parsed = parse_work_experience("Company Location: Paris\nJob title: Dev");
        assert_eq!(parsed.fields.company.as_deref(), Some(""));
        assert_eq!(parsed.fields.company_location.as_deref(), Some("Paris"));
        assert!(parsed.missing.contains(&"company"));
    }

    #[test]
    fn test_present_end_date_is_empty_but_not_missing() {
        let text = FULL_WORK.replace("End date: 2023-08-31", "End date: Present");
        let parsed = parse_work_experience(&text);
        assert!(parsed.is_complete());
        assert_eq!(parsed.fields.end_date.as_deref(), Some(""));
    }

    #[test]
    fn test_unparseable_date_is_missing() {
        let text = FULL_WORK.replace("Start date: 2021-03-01", "Start date: March 2021");
        let parsed = parse_work_experience(&text);
        assert_eq!(parsed.outcome(), ParseOutcome::Partial);
        assert_eq!(parsed.missing, vec!["startDate"]);
        assert_eq!(parsed.fields.start_date.as_deref(), Some(""));
    }

    #[test]
    fn test_markdown_emphasis_is_tolerated() {
        let text = "**Job title:** Data Engineer\n**Company:** Initech\n- Description: Pipelines";
        let parsed = parse_work_experience(text);
        assert_eq!(parsed.fields.position.as_deref(), Some("Data Engineer"));
        assert_eq!(parsed.fields.company.as_deref(), Some("Initech"));
        assert_eq!(parsed.fields.description.as_deref(), Some("Pipelines"));
    }

    #[test]
    fn test_missing_labels_are_listed_in_order() {
        let parsed = parse_work_experience("Some prose without any labels.\nJob title: Dev");
        assert_eq!(
            parsed.missing,
            vec!["company", "companyLocation", "startDate", "endDate", "description"]
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let parsed = parse_project("Project Name: First\nProject Name: Second");
        assert_eq!(parsed.fields.project_name.as_deref(), Some("First"));
    }

    #[test]
    fn test_full_project() {
        let text = "Project Name: Resume Builder
Project Link: https://github.com/me/resume
TechStack: Rust, Axum, Postgres
Description:
• Drag-and-drop editor
• PDF export";
        let parsed = parse_project(text);
        assert!(parsed.is_complete());
        assert_eq!(parsed.fields.link.as_deref(), Some("https://github.com/me/resume"));
        assert_eq!(parsed.fields.tech_stack.as_deref(), Some("Rust, Axum, Postgres"));
        assert_eq!(
            parsed.fields.description.as_deref(),
            Some("• Drag-and-drop editor\n• PDF export")
        );
    }

    #[test]
    fn test_empty_results_list_every_field() {
        let work = empty_work_experience();
        assert_eq!(work.missing.len(), 6);
        assert_eq!(work.fields.position.as_deref(), Some(""));
        assert_eq!(empty_project().missing, vec!["projectName", "link", "techStack", "description"]);
    }

    #[test]
    fn test_serializes_flat_with_missing() {
        let json = serde_json::to_value(parse_project("Project Name: X")).unwrap();
        assert_eq!(json["projectName"], "X");
        assert_eq!(json["techStack"], "");
        assert_eq!(json["missing"][0], "link");
    }
}
