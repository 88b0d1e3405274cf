//! Preview renderer: a pure function from the resume aggregate to a preview
//! tree, and from that tree to HTML.
//!
//! The interactive preview and the print/export page embed the same
//! `to_html` fragment, so what is shown in the editor is what gets printed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::resume::models::{
    BorderStyle, CodingProfile, Course, CustomSection, Education, PhotoState, Project,
    RepeatingItem, ResumeValues, SkillGroup, WorkExperience,
};
use crate::resume::validation::parse_date;

const DEFAULT_ACCENT: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub title: Option<String>,
    pub accent: Option<String>,
    pub header: Header,
    pub sections: Vec<PreviewSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub photo: Option<PhotoFrame>,
    pub name: String,
    pub job_title: Option<String>,
    pub contact: Vec<ContactPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoFrame {
    pub src: String,
    pub border_radius: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactPart {
    Text { value: String },
    Email { address: String },
    Link { label: &'static str, href: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Education,
    Experience,
    Projects,
    Skills,
    Custom,
    CodingProfiles,
    Certifications,
}

impl SectionKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Skills => "skills",
            SectionKind::Custom => "custom",
            SectionKind::CodingProfiles => "coding-profiles",
            SectionKind::Certifications => "certifications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub kind: SectionKind,
    pub heading: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledLine {
    pub label: &'static str,
    pub value: String,
}

/// One rendered item. Which slots are filled depends on the section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub dates: Option<String>,
    pub subtitle: Option<String>,
    pub aside: Option<String>,
    pub link: Option<Link>,
    pub lines: Vec<LabeledLine>,
    pub body: Option<String>,
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `2022-01-15` → `Jan-2022`. Unparseable input is shown verbatim.
pub fn format_month(value: &str) -> String {
    parse_date(value)
        .map(|d| d.format("%b-%Y").to_string())
        .unwrap_or_else(|| value.trim().to_string())
}

fn border_radius(style: Option<BorderStyle>) -> &'static str {
    match style {
        Some(BorderStyle::Square) => "0px",
        Some(BorderStyle::Circle) => "9999px",
        Some(BorderStyle::Rounded) | None => "10%",
    }
}

fn photo_src(photo: &PhotoState) -> Option<String> {
    match photo {
        PhotoState::Existing(url) => Some(url.clone()),
        PhotoState::Upload(upload) => Some(format!(
            "data:{};base64,{}",
            upload.content_type,
            STANDARD.encode(&upload.bytes)
        )),
        PhotoState::Unset | PhotoState::Removed => None,
    }
}

const LINK_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// A user-supplied URL, only when it uses a scheme safe to emit as a link.
fn safe_href(value: &Option<String>) -> Option<String> {
    text(value).filter(|href| {
        let lower = href.to_ascii_lowercase();
        LINK_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
    })
}

fn header(resume: &ResumeValues) -> Header {
    let name = [text(&resume.first_name), text(&resume.last_name)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let mut contact = Vec::new();
    for value in [&resume.city, &resume.country, &resume.phone] {
        if let Some(value) = text(value) {
            contact.push(ContactPart::Text { value });
        }
    }
    if let Some(address) = text(&resume.email) {
        contact.push(ContactPart::Email { address });
    }
    if let Some(href) = safe_href(&resume.github_profile) {
        contact.push(ContactPart::Link {
            label: "Github",
            href,
        });
    }
    if let Some(href) = safe_href(&resume.linkedin_profile) {
        contact.push(ContactPart::Link {
            label: "LinkedIn",
            href,
        });
    }

    Header {
        photo: photo_src(&resume.photo).map(|src| PhotoFrame {
            src,
            border_radius: border_radius(resume.border_style),
        }),
        name,
        job_title: text(&resume.job_title),
        contact,
    }
}

fn visible<T: RepeatingItem>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| !item.is_blank())
}

fn collection<T: RepeatingItem>(
    kind: SectionKind,
    heading: &str,
    items: &[T],
    entry: impl Fn(&T) -> Entry,
) -> Option<PreviewSection> {
    let entries: Vec<Entry> = visible(items).map(entry).collect();
    (!entries.is_empty()).then(|| PreviewSection {
        kind,
        heading: heading.to_string(),
        entries,
    })
}

fn work_entry(exp: &WorkExperience) -> Entry {
    let dates = text(&exp.start_date).map(|start| {
        let end = text(&exp.end_date)
            .map(|end| format_month(&end))
            .unwrap_or_else(|| "Present".to_string());
        format!("{} - {}", format_month(&start), end)
    });
    Entry {
        title: text(&exp.position),
        dates,
        subtitle: text(&exp.company),
        aside: text(&exp.company_location),
        body: text(&exp.description),
        ..Default::default()
    }
}

fn education_entry(edu: &Education) -> Entry {
    let dates = match (text(&edu.start_date), text(&edu.end_date)) {
        (Some(start), Some(end)) => Some(format!("{} - {}", format_month(&start), format_month(&end))),
        (Some(start), None) => Some(format!("{} - Present", format_month(&start))),
        (None, Some(end)) => Some(format_month(&end)),
        (None, None) => None,
    };
    Entry {
        title: text(&edu.degree),
        dates,
        subtitle: text(&edu.school),
        aside: text(&edu.cgpa).map(|gpa| format!("GPA: {gpa}")),
        ..Default::default()
    }
}

fn project_entry(proj: &Project) -> Entry {
    let name = text(&proj.project_name);
    Entry {
        link: safe_href(&proj.link).map(|href| Link {
            label: format!("Link: {}", name.clone().unwrap_or_default()),
            href,
        }),
        title: name,
        detail: text(&proj.tech_stack),
        body: text(&proj.description),
        ..Default::default()
    }
}

fn skill_entry(skill: &SkillGroup) -> Entry {
    let lines = [
        ("Languages", &skill.languages),
        ("Frameworks", &skill.frameworks),
        ("Developer Tools", &skill.tools),
        ("Libraries", &skill.libraries),
    ]
    .into_iter()
    .filter_map(|(label, value)| text(value).map(|value| LabeledLine { label, value }))
    .collect();
    Entry {
        lines,
        ..Default::default()
    }
}

fn coding_profile_entry(profile: &CodingProfile) -> Entry {
    Entry {
        title: text(&profile.coding_profile),
        link: safe_href(&profile.coding_profile_link).map(|href| Link {
            label: "Profile".to_string(),
            href,
        }),
        body: text(&profile.description),
        ..Default::default()
    }
}

fn course_entry(course: &Course) -> Entry {
    Entry {
        title: text(&course.course),
        detail: text(&course.learning_platform),
        link: safe_href(&course.course_link).map(|href| Link {
            label: "Link".to_string(),
            href,
        }),
        body: text(&course.description),
        ..Default::default()
    }
}

fn custom_sections(items: &[CustomSection]) -> Vec<PreviewSection> {
    visible(items)
        .map(|custom| PreviewSection {
            kind: SectionKind::Custom,
            heading: text(&custom.heading).unwrap_or_default(),
            entries: vec![Entry {
                link: safe_href(&custom.link).map(|href| Link {
                    label: "Link".to_string(),
                    href,
                }),
                body: text(&custom.description),
                ..Default::default()
            }],
        })
        .collect()
}

/// Builds the preview tree. Never mutates or reorders its input.
pub fn render(resume: &ResumeValues) -> PreviewDocument {
    let mut sections = Vec::new();

    if let Some(summary) = text(&resume.summary) {
        sections.push(PreviewSection {
            kind: SectionKind::Summary,
            heading: "Professional Profile".to_string(),
            entries: vec![Entry {
                body: Some(summary),
                ..Default::default()
            }],
        });
    }
    sections.extend(collection(
        SectionKind::Education,
        "Education",
        &resume.educations,
        education_entry,
    ));
    sections.extend(collection(
        SectionKind::Experience,
        "Experience",
        &resume.work_experiences,
        work_entry,
    ));
    sections.extend(collection(
        SectionKind::Projects,
        "Projects",
        &resume.projects,
        project_entry,
    ));
    sections.extend(collection(
        SectionKind::Skills,
        "Technical Skills",
        &resume.skill_set,
        skill_entry,
    ));
    sections.extend(custom_sections(&resume.custom));
    sections.extend(collection(
        SectionKind::CodingProfiles,
        "Coding Profiles",
        &resume.coding_profiles,
        coding_profile_entry,
    ));
    sections.extend(collection(
        SectionKind::Certifications,
        "Certifications",
        &resume.courses,
        course_entry,
    ));

    PreviewDocument {
        title: text(&resume.title),
        accent: text(&resume.color_hex),
        header: header(resume),
        sections,
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_link(html: &mut String, link: &Link) {
    html.push_str(&format!(
        r#"<a class="link" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape(&link.href),
        escape(&link.label)
    ));
}

fn push_header(html: &mut String, header: &Header, accent: &str) {
    html.push_str(r#"<header class="personal">"#);
    if let Some(photo) = &header.photo {
        html.push_str(&format!(
            r#"<img class="photo" src="{}" width="100" height="100" alt="Author photo" style="border-radius: {}">"#,
            escape(&photo.src),
            photo.border_radius
        ));
    }
    html.push_str(r#"<div class="identity">"#);
    html.push_str(&format!(
        r#"<h1 style="color: {accent}">{}</h1>"#,
        escape(&header.name)
    ));
    if let Some(job_title) = &header.job_title {
        html.push_str(&format!(r#"<p class="job-title">{}</p>"#, escape(job_title)));
    }
    if !header.contact.is_empty() {
        let parts: Vec<String> = header
            .contact
            .iter()
            .map(|part| match part {
                ContactPart::Text { value } => escape(value),
                ContactPart::Email { address } => format!(
                    r#"<a href="mailto:{0}"><b>Email:</b> {0}</a>"#,
                    escape(address)
                ),
                ContactPart::Link { label, href } => format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer"><b>{label}</b></a>"#,
                    escape(href)
                ),
            })
            .collect();
        html.push_str(&format!(r#"<p class="contact">{}</p>"#, parts.join(" | ")));
    }
    html.push_str("</div></header>");
}

fn push_entry(html: &mut String, entry: &Entry) {
    html.push_str(r#"<div class="entry">"#);

    if entry.title.is_some() || entry.detail.is_some() || entry.dates.is_some() || entry.link.is_some() {
        html.push_str(r#"<div class="row primary"><span>"#);
        let heading: Vec<String> = [&entry.title, &entry.detail]
            .into_iter()
            .flatten()
            .map(|s| escape(s))
            .collect();
        html.push_str(&heading.join(" | "));
        html.push_str("</span>");
        if let Some(dates) = &entry.dates {
            html.push_str(&format!(r#"<span class="dates">{}</span>"#, escape(dates)));
        }
        if let Some(link) = &entry.link {
            push_link(html, link);
        }
        html.push_str("</div>");
    } else if let Some(link) = &entry.link {
        push_link(html, link);
    }

    if entry.subtitle.is_some() || entry.aside.is_some() {
        html.push_str(&format!(
            r#"<div class="row secondary"><span>{}</span><span>{}</span></div>"#,
            escape(entry.subtitle.as_deref().unwrap_or_default()),
            escape(entry.aside.as_deref().unwrap_or_default())
        ));
    }
    for line in &entry.lines {
        html.push_str(&format!(
            r#"<div class="line"><b>{}:</b> {}</div>"#,
            line.label,
            escape(&line.value)
        ));
    }
    if let Some(body) = &entry.body {
        html.push_str(&format!(r#"<div class="body">{}</div>"#, escape(body)));
    }

    html.push_str("</div>");
}

/// Renders the resume content fragment shared by preview and print.
pub fn to_html(doc: &PreviewDocument) -> String {
    let accent = doc
        .accent
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| DEFAULT_ACCENT.to_string());

    let mut html = String::from(r#"<article class="resume" id="resumePreviewContent">"#);
    push_header(&mut html, &doc.header, &accent);

    for section in &doc.sections {
        html.push_str(&format!(
            r#"<section class="{}"><h2 style="color: {accent}">{}</h2><hr style="background: {accent}">"#,
            section.kind.css_class(),
            escape(&section.heading.to_uppercase())
        ));
        for entry in &section.entries {
            push_entry(&mut html, entry);
        }
        html.push_str("</section>");
    }

    html.push_str("</article>");
    html
}

const PAGE_STYLES: &str = "\
@page { size: A4; margin: 0; }\n\
body { margin: 0; background: #fff; color: #000; }\n\
.resume { box-sizing: border-box; width: 210mm; min-height: 297mm; padding: 24px; font-family: 'Computer Modern', serif; }\n\
.personal { display: flex; align-items: center; gap: 24px; margin-bottom: 20px; }\n\
.photo { aspect-ratio: 1; object-fit: cover; }\n\
.identity { margin: 0 auto; text-align: center; }\n\
section { break-inside: avoid; margin-bottom: 8px; }\n\
section h2 { font-size: 12px; letter-spacing: 0.1em; margin: 0; }\n\
section hr { height: 1px; border: 0; margin: 2px 0 6px; }\n\
.row { display: flex; justify-content: space-between; }\n\
.secondary { font-style: italic; font-weight: 300; }\n\
.body { white-space: pre-line; font-size: 14px; padding-left: 24px; }\n";

fn page(doc: &PreviewDocument, print: bool) -> String {
    let title = doc.title.as_ref().unwrap_or(&doc.header.name);
    let script = if print {
        "<script>window.addEventListener('load', () => window.print());</script>"
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{PAGE_STYLES}</style></head><body>{}{script}</body></html>",
        escape(title),
        to_html(doc)
    )
}

/// Standalone page for the in-app preview pane.
pub fn preview_page(doc: &PreviewDocument) -> String {
    page(doc, false)
}

/// Same page as the preview, triggering the browser's print dialog on load.
pub fn print_page(doc: &PreviewDocument) -> String {
    page(doc, true)
}
