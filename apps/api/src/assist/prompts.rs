use crate::assist::SummaryInput;

pub const SUMMARY_MAX_TOKENS: u32 = 200;
pub const WORK_EXPERIENCE_MAX_TOKENS: u32 = 300;
pub const PROJECT_MAX_TOKENS: u32 = 300;

pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer AI.
Generate a crisp, professional, ATS-friendly summary.
Return ONLY the summary. No headings or disclaimers.";

pub const WORK_EXPERIENCE_SYSTEM: &str = "You are a resume AI. Convert the user's text into a structured work experience.
Follow EXACT output format:

Job title: <title>
Company: <company>
Company Location: <location>
Start date: <YYYY-MM-DD>
End date: <YYYY-MM-DD or Present>
Description:
• Bullet 1
• Bullet 2
• Bullet 3";

pub const PROJECT_SYSTEM: &str = "You are a resume project generator AI.
FOLLOW EXACT FORMAT:

Project Name: <name>
Project Link: <link>
TechStack: <stack>
Description:
• Bullet 1
• Bullet 2
• Bullet 3";

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

fn join_non_empty(parts: &[(&str, &Option<String>)]) -> String {
    parts
        .iter()
        .filter(|(_, v)| !or_blank(v).is_empty())
        .map(|(label, v)| format!("{label}: {}", or_blank(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structured context for the summary. Empty sections are left out.
pub fn summary_user_message(input: &SummaryInput) -> String {
    let mut out = format!("Job Title: {}\n", or_blank(&input.job_title));

    let experience: Vec<String> = input
        .work_experiences
        .iter()
        .map(|exp| {
            let end = match or_blank(&exp.end_date) {
                "" => "Present",
                end => end,
            };
            format!(
                "• {} at {} ({} - {})",
                or_blank(&exp.position),
                or_blank(&exp.company),
                or_blank(&exp.start_date),
                end
            )
        })
        .collect();
    if !experience.is_empty() {
        out.push_str(&format!("\nWork Experience:\n{}\n", experience.join("\n")));
    }

    let education: Vec<String> = input
        .educations
        .iter()
        .map(|e| {
            format!(
                "• {} at {} ({} - {})",
                or_blank(&e.degree),
                or_blank(&e.school),
                or_blank(&e.start_date),
                or_blank(&e.end_date)
            )
        })
        .collect();
    if !education.is_empty() {
        out.push_str(&format!("\nEducation:\n{}\n", education.join("\n")));
    }

    let skills: Vec<String> = input
        .skill_set
        .iter()
        .map(|s| {
            join_non_empty(&[
                ("Languages", &s.languages),
                ("Frameworks", &s.frameworks),
                ("Tools", &s.tools),
                ("Libraries", &s.libraries),
            ])
        })
        .filter(|line| !line.is_empty())
        .map(|line| format!("• {line}"))
        .collect();
    if !skills.is_empty() {
        out.push_str(&format!("\nSkills:\n{}\n", skills.join("\n")));
    }

    let other: Vec<String> = input
        .custom
        .iter()
        .filter(|c| !or_blank(&c.heading).is_empty() || !or_blank(&c.description).is_empty())
        .map(|c| format!("• {}: {}", or_blank(&c.heading), or_blank(&c.description)))
        .collect();
    if !other.is_empty() {
        out.push_str(&format!("\nOther:\n{}\n", other.join("\n")));
    }

    out
}

pub fn work_experience_user_message(description: &str) -> String {
    format!("Input: {}", description.trim())
}

pub fn project_user_message(description: &str) -> String {
    format!("Project details: {}", description.trim())
}
