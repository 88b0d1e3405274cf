#![allow(dead_code)]

//! Editor-side state: the resume aggregate plus one form per section.
//!
//! A form owns local values for its slice of the aggregate. Every edit
//! revalidates the form; only a valid form writes its slice into a new
//! aggregate, after which the editor notifies its observers (e.g. the live
//! preview). Invalid edits stay local and are reported through `errors()`.

use std::marker::PhantomData;

use tracing::debug;
use uuid::Uuid;

use crate::resume::models::{
    BorderStyle, CodingProfile, Course, CustomSection, Education, PhotoState, Project,
    ResumeValues, SkillGroup, WorkExperience,
};
use crate::resume::reorder::SectionList;
use crate::resume::validation::{check_color_hex, check_items, check_photo, ValidationErrors};

/// One independently validated slice of the aggregate.
pub trait Section {
    type Values: Clone;
    const KEY: &'static str;

    fn read(resume: &ResumeValues) -> Self::Values;
    fn write(resume: &mut ResumeValues, values: &Self::Values);
    fn check(values: &Self::Values) -> ValidationErrors;
}

pub type ObserverId = usize;

type Observer = Box<dyn FnMut(&ResumeValues)>;

/// The in-memory resume held for one editing session.
pub struct ResumeEditor {
    resume: ResumeValues,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: ObserverId,
}

impl Default for ResumeEditor {
    fn default() -> Self {
        Self::hydrate(ResumeValues::default())
    }
}

impl ResumeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from a persisted resume mapped to editable form.
    pub fn hydrate(resume: ResumeValues) -> Self {
        Self {
            resume,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn resume(&self) -> &ResumeValues {
        &self.resume
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ResumeValues) + 'static) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Replaces exactly one section's slice and notifies observers.
    pub fn apply<S: Section>(&mut self, values: &S::Values) {
        let mut next = self.resume.clone();
        S::write(&mut next, values);
        self.replace(next);
    }

    /// Records the identity assigned by the first save.
    pub fn assign_id(&mut self, id: Uuid) {
        if self.resume.id == Some(id) {
            return;
        }
        let mut next = self.resume.clone();
        next.id = Some(id);
        self.replace(next);
    }

    fn replace(&mut self, next: ResumeValues) {
        if next == self.resume {
            return;
        }
        self.resume = next;
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.resume);
        }
    }
}

/// Local, validated form state for one section.
pub struct SectionForm<S: Section> {
    values: S::Values,
    errors: ValidationErrors,
    _section: PhantomData<fn() -> S>,
}

impl<S: Section> SectionForm<S> {
    pub fn open(editor: &ResumeEditor) -> Self {
        Self {
            values: S::read(editor.resume()),
            errors: ValidationErrors::default(),
            _section: PhantomData,
        }
    }

    pub fn values(&self) -> &S::Values {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Applies `change` to the local values, then propagates them to the
    /// editor if the form validates. Returns whether the aggregate was updated.
    pub fn edit(&mut self, editor: &mut ResumeEditor, change: impl FnOnce(&mut S::Values)) -> bool {
        change(&mut self.values);
        self.errors = S::check(&self.values);
        if !self.errors.is_empty() {
            debug!(section = S::KEY, errors = %self.errors, "Section invalid, not propagated");
            return false;
        }
        editor.apply::<S>(&self.values);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralInfo {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct GeneralInfoSection;

impl Section for GeneralInfoSection {
    type Values = GeneralInfo;
    const KEY: &'static str = "general-info";

    fn read(resume: &ResumeValues) -> GeneralInfo {
        GeneralInfo {
            title: resume.title.clone(),
            description: resume.description.clone(),
        }
    }

    fn write(resume: &mut ResumeValues, values: &GeneralInfo) {
        resume.title = values.title.clone();
        resume.description = values.description.clone();
    }

    fn check(_: &GeneralInfo) -> ValidationErrors {
        ValidationErrors::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfo {
    pub photo: PhotoState,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub github_profile: Option<String>,
    pub linkedin_profile: Option<String>,
}

pub struct PersonalInfoSection;

impl Section for PersonalInfoSection {
    type Values = PersonalInfo;
    const KEY: &'static str = "personal-info";

    fn read(resume: &ResumeValues) -> PersonalInfo {
        PersonalInfo {
            photo: resume.photo.clone(),
            first_name: resume.first_name.clone(),
            last_name: resume.last_name.clone(),
            job_title: resume.job_title.clone(),
            city: resume.city.clone(),
            country: resume.country.clone(),
            phone: resume.phone.clone(),
            email: resume.email.clone(),
            github_profile: resume.github_profile.clone(),
            linkedin_profile: resume.linkedin_profile.clone(),
        }
    }

    fn write(resume: &mut ResumeValues, values: &PersonalInfo) {
        resume.photo = values.photo.clone();
        resume.first_name = values.first_name.clone();
        resume.last_name = values.last_name.clone();
        resume.job_title = values.job_title.clone();
        resume.city = values.city.clone();
        resume.country = values.country.clone();
        resume.phone = values.phone.clone();
        resume.email = values.email.clone();
        resume.github_profile = values.github_profile.clone();
        resume.linkedin_profile = values.linkedin_profile.clone();
    }

    fn check(values: &PersonalInfo) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        check_photo(&values.photo, &mut errors);
        errors
    }
}

pub struct SummarySection;

impl Section for SummarySection {
    type Values = Option<String>;
    const KEY: &'static str = "summary";

    fn read(resume: &ResumeValues) -> Option<String> {
        resume.summary.clone()
    }

    fn write(resume: &mut ResumeValues, values: &Option<String>) {
        resume.summary = values.clone();
    }

    fn check(_: &Option<String>) -> ValidationErrors {
        ValidationErrors::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appearance {
    pub color_hex: Option<String>,
    pub border_style: Option<BorderStyle>,
}

/// Accent color and photo border, set from the editor toolbar.
pub struct AppearanceSection;

impl Section for AppearanceSection {
    type Values = Appearance;
    const KEY: &'static str = "appearance";

    fn read(resume: &ResumeValues) -> Appearance {
        Appearance {
            color_hex: resume.color_hex.clone(),
            border_style: resume.border_style,
        }
    }

    fn write(resume: &mut ResumeValues, values: &Appearance) {
        resume.color_hex = values.color_hex.clone();
        resume.border_style = values.border_style;
    }

    fn check(values: &Appearance) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        check_color_hex(&values.color_hex, &mut errors);
        errors
    }
}

macro_rules! list_section {
    ($(#[$doc:meta])* $name:ident, $item:ty, $field:ident, $key:literal) => {
        $(#[$doc])*
        pub struct $name;

        impl Section for $name {
            type Values = SectionList<$item>;
            const KEY: &'static str = $key;

            fn read(resume: &ResumeValues) -> SectionList<$item> {
                SectionList::from_items(resume.$field.iter().cloned())
            }

            fn write(resume: &mut ResumeValues, values: &SectionList<$item>) {
                resume.$field = values.to_vec();
            }

            fn check(values: &SectionList<$item>) -> ValidationErrors {
                let mut errors = ValidationErrors::default();
                check_items(Self::KEY, &values.to_vec(), &mut errors);
                errors
            }
        }
    };
}

list_section!(EducationSection, Education, educations, "educations");
list_section!(WorkExperienceSection, WorkExperience, work_experiences, "workExperiences");
list_section!(ProjectsSection, Project, projects, "projects");
list_section!(SkillsSection, SkillGroup, skill_set, "skillSet");
list_section!(CoursesSection, Course, courses, "courses");
list_section!(CodingProfilesSection, CodingProfile, coding_profiles, "codingProfiles");
list_section!(
    /// Free-form sections, each rendered under its own heading.
    CustomSectionsSection,
    CustomSection,
    custom,
    "custom"
);

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::resume::preview;
    use crate::resume::reorder::DragEnd;

    fn seeded_editor() -> ResumeEditor {
        ResumeEditor::hydrate(ResumeValues {
            first_name: Some("Ada".into()),
            summary: Some("Systems engineer".into()),
            work_experiences: vec![
                WorkExperience {
                    position: Some("Engineer".into()),
                    company: Some("Acme".into()),
                    ..Default::default()
                },
                WorkExperience {
                    position: Some("Intern".into()),
                    company: Some("Globex".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        })
    }

    fn recorder(editor: &mut ResumeEditor) -> Rc<RefCell<Vec<ResumeValues>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.subscribe(move |resume| sink.borrow_mut().push(resume.clone()));
        seen
    }

    #[test]
    fn test_valid_edit_replaces_only_its_section() {
        let mut editor = seeded_editor();
        let seen = recorder(&mut editor);
        let mut form = SectionForm::<EducationSection>::open(&editor);

        let propagated = form.edit(&mut editor, |list| {
            list.append(Education {
                degree: Some("BSc Computer Science".into()),
                start_date: Some("2018-09-01".into()),
                ..Default::default()
            });
        });

        assert!(propagated);
        assert_eq!(editor.resume().educations.len(), 1);
        assert_eq!(editor.resume().work_experiences.len(), 2);
        assert_eq!(editor.resume().summary.as_deref(), Some("Systems engineer"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_invalid_edit_is_not_propagated() {
        let mut editor = seeded_editor();
        let seen = recorder(&mut editor);
        let mut form = SectionForm::<WorkExperienceSection>::open(&editor);

        let propagated = form.edit(&mut editor, |list| {
            if let Some(item) = list.get_mut(0) {
                item.start_date = Some("last spring".into());
            }
        });

        assert!(!propagated);
        assert_eq!(editor.resume().work_experiences[0].start_date, None);
        assert!(form.errors().get("workExperiences.0.startDate").is_some());
        assert!(seen.borrow().is_empty());

        // fixing the field propagates the whole pending slice
        let propagated = form.edit(&mut editor, |list| {
            if let Some(item) = list.get_mut(0) {
                item.start_date = Some("2022-01-01".into());
            }
        });
        assert!(propagated);
        assert!(form.errors().is_empty());
        assert_eq!(
            editor.resume().work_experiences[0].start_date.as_deref(),
            Some("2022-01-01")
        );
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_drag_reorder_flows_into_aggregate() {
        let mut editor = seeded_editor();
        let mut form = SectionForm::<WorkExperienceSection>::open(&editor);
        let ids = form.values().ids();

        assert!(form.edit(&mut editor, |list| {
            list.handle_drag_end(DragEnd {
                active: ids[1],
                over: Some(ids[0]),
            });
        }));

        let positions: Vec<_> = editor
            .resume()
            .work_experiences
            .iter()
            .map(|w| w.position.clone().unwrap_or_default())
            .collect();
        assert_eq!(positions, vec!["Intern", "Engineer"]);
    }

    #[test]
    fn test_generated_item_merges_like_a_manual_edit() {
        let mut editor = seeded_editor();
        let mut form = SectionForm::<ProjectsSection>::open(&editor);
        let generated = Project {
            project_name: Some("Ledger".into()),
            tech_stack: Some("Rust, Postgres".into()),
            description: Some("• Double-entry bookkeeping service".into()),
            ..Default::default()
        };
        assert!(form.edit(&mut editor, |list| {
            list.append(generated.clone());
        }));
        assert_eq!(editor.resume().projects, vec![generated]);
    }

    #[test]
    fn test_invalid_color_blocks_appearance() {
        let mut editor = ResumeEditor::new();
        let mut form = SectionForm::<AppearanceSection>::open(&editor);
        assert!(!form.edit(&mut editor, |a| a.color_hex = Some("blue".into())));
        assert_eq!(editor.resume().color_hex, None);
        assert!(form.edit(&mut editor, |a| {
            a.color_hex = Some("#2563eb".into());
            a.border_style = Some(BorderStyle::Circle);
        }));
        assert_eq!(editor.resume().border_style, Some(BorderStyle::Circle));
    }

    #[test]
    fn test_live_preview_observer_rerenders() {
        let mut editor = ResumeEditor::new();
        let html = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&html);
        editor.subscribe(move |resume| *sink.borrow_mut() = preview::to_html(&preview::render(resume)));

        let mut form = SectionForm::<SummarySection>::open(&editor);
        form.edit(&mut editor, |summary| *summary = Some("Builds compilers".into()));

        assert!(html.borrow().contains("Builds compilers"));
    }

    #[test]
    fn test_unsubscribe_and_unchanged_edits_do_not_notify() {
        let mut editor = seeded_editor();
        let seen = recorder(&mut editor);
        let mut form = SectionForm::<GeneralInfoSection>::open(&editor);

        // writing identical values does not produce a new aggregate
        assert!(form.edit(&mut editor, |_| {}));
        assert!(seen.borrow().is_empty());

        assert!(editor.unsubscribe(0));
        assert!(!editor.unsubscribe(0));
        form.edit(&mut editor, |g| g.title = Some("Backend roles".into()));
        assert!(seen.borrow().is_empty());
        assert_eq!(editor.resume().title.as_deref(), Some("Backend roles"));
    }

    #[test]
    fn test_assign_id_after_first_save() {
        let mut editor = ResumeEditor::new();
        let id = Uuid::new_v4();
        editor.assign_id(id);
        assert_eq!(editor.resume().id, Some(id));
    }
}
