//! Editable form model populated from a resume record.
//!
//! The form has a fixed set of general-info controls, addressed by field
//! name, plus one container per repeated section. Populating writes scalars
//! into matching general controls and rebuilds every section container from
//! scratch, so a form never carries groups over from a previous resume.

use super::render::format_key;
use super::value::{Record, Value};

/// General-info controls, in display order.
pub const GENERAL_FIELDS: [&str; 7] = [
    "first_name",
    "last_name",
    "email",
    "phone_number",
    "github_link",
    "linkedin_link",
    "entry_date",
];

/// Repeated sections, in display order.
pub const SECTION_NAMES: [&str; 6] = [
    "experiences",
    "educations",
    "extracurriculars",
    "projects",
    "skills",
    "courses",
];

/// General controls the server refuses to store empty.
pub const REQUIRED_FIELDS: [&str; 4] = ["first_name", "last_name", "email", "phone_number"];

/// Field name used for section items that are bare scalars.
const SCALAR_ITEM_FIELD: &str = "value";

/// How a control is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// One line of text.
    SingleLine,
    /// Free text spanning several lines.
    MultiLine,
}

impl ControlKind {
    /// Pick the control kind for a section sub-field.
    pub fn for_field(field: &str) -> Self {
        if field.contains("bullet_points") {
            ControlKind::MultiLine
        } else {
            ControlKind::SingleLine
        }
    }
}

/// A single labeled form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    /// Name the control is addressed by.
    pub name: String,
    /// Display label.
    pub label: String,
    pub kind: ControlKind,
    /// Current text.
    pub value: String,
}

impl FormControl {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            value: String::new(),
        }
    }
}

/// The controls generated for one item of a repeated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    /// Position of the item within its section.
    pub index: usize,
    pub controls: Vec<FormControl>,
}

/// A repeated-section container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub groups: Vec<FieldGroup>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            groups: Vec::new(),
        }
    }

    /// Display title for the section.
    pub fn title(&self) -> String {
        format_key(&self.name)
    }
}

/// The editable resume form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeForm {
    general: Vec<FormControl>,
    sections: Vec<Section>,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeForm {
    /// Create an empty form with every general control and section container.
    pub fn new() -> Self {
        Self {
            general: GENERAL_FIELDS
                .iter()
                .map(|name| FormControl::new(*name, format_key(name), ControlKind::SingleLine))
                .collect(),
            sections: SECTION_NAMES.iter().map(|name| Section::new(name)).collect(),
        }
    }

    /// Populate the form from a resume record.
    ///
    /// Top-level scalars go into the general control of the same name (exact,
    /// case-sensitive match); fields without a control, sequences and nested
    /// records are skipped. Each section container is cleared and rebuilt with
    /// one group per item.
    pub fn populate(&mut self, record: &Record) {
        for (name, value) in record.iter() {
            if !matches!(value, Value::Scalar(_)) {
                continue;
            }
            if let Some(control) = self.general.iter_mut().find(|c| c.name == name) {
                control.value = value.to_form_text();
            }
        }

        for section in &mut self.sections {
            section.groups.clear();
            if let Some(Value::Sequence(items)) = record.get(&section.name) {
                section.groups = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| build_group(&section.name, index, item))
                    .collect();
            }
        }
    }

    /// General-info controls.
    pub fn general(&self) -> &[FormControl] {
        &self.general
    }

    /// Section containers.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Every control in display order: general info first, then sections.
    pub fn controls(&self) -> impl Iterator<Item = &FormControl> {
        self.general.iter().chain(
            self.sections
                .iter()
                .flat_map(|s| s.groups.iter())
                .flat_map(|g| g.controls.iter()),
        )
    }

    /// Number of controls in the form.
    pub fn control_count(&self) -> usize {
        self.controls().count()
    }

    /// Current text of the named control.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.controls()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Labels of required controls that are blank.
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|name| self.value(name).map_or(true, |v| v.trim().is_empty()))
            .map(|name| format_key(name))
            .collect()
    }

    /// Name/value pairs for submitting the form, in display order.
    ///
    /// Multi-line controls keep their newlines, so list fields such as
    /// `bullet_points` split back into one item per line.
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        self.controls()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    /// Overwrite the text of the named control.
    ///
    /// Returns false if no control has that name.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        let control = self.general.iter_mut().chain(
            self.sections
                .iter_mut()
                .flat_map(|s| s.groups.iter_mut())
                .flat_map(|g| g.controls.iter_mut()),
        )
        .find(|c| c.name == name);

        match control {
            Some(control) => {
                control.value = value.into();
                true
            }
            None => false,
        }
    }
}

/// Composite control name for a section sub-field.
pub fn control_name(section: &str, index: usize, field: &str) -> String {
    format!("{}-{}-{}", section, index, field)
}

fn build_group(section: &str, index: usize, item: &Value) -> FieldGroup {
    let controls = match item {
        Value::Record(record) => record
            .iter()
            .map(|(field, value)| {
                let mut control = FormControl::new(
                    control_name(section, index, field),
                    format_key(field),
                    ControlKind::for_field(field),
                );
                control.value = value.to_form_text();
                control
            })
            .collect(),
        other => {
            let mut control = FormControl::new(
                control_name(section, index, SCALAR_ITEM_FIELD),
                format_key(SCALAR_ITEM_FIELD),
                ControlKind::SingleLine,
            );
            control.value = other.to_form_text();
            vec![control]
        }
    };

    FieldGroup { index, controls }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn section<'a>(form: &'a ResumeForm, name: &str) -> &'a Section {
        form.sections().iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_new_form_has_empty_containers() {
        let form = ResumeForm::new();
        assert_eq!(form.general().len(), GENERAL_FIELDS.len());
        assert_eq!(form.sections().len(), SECTION_NAMES.len());
        assert!(form.sections().iter().all(|s| s.groups.is_empty()));
    }

    #[test]
    fn test_education_scenario() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "educations": [{"school": "X", "bullet_points_notes": "n"}]
        })));

        let educations = section(&form, "educations");
        assert_eq!(educations.groups.len(), 1);

        let controls = &educations.groups[0].controls;
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[0].name, "educations-0-school");
        assert_eq!(controls[0].label, "School");
        assert_eq!(controls[0].kind, ControlKind::SingleLine);
        assert_eq!(controls[0].value, "X");
        assert_eq!(controls[1].name, "educations-0-bullet_points_notes");
        assert_eq!(controls[1].kind, ControlKind::MultiLine);
        assert_eq!(controls[1].value, "n");
    }

    #[test]
    fn test_general_fields_exact_match() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "first_name": "Ana",
            "Last_Name": "Wrong case",
            "nickname": "unknown control",
            "phone_number": 5551234
        })));

        assert_eq!(form.value("first_name"), Some("Ana"));
        assert_eq!(form.value("last_name"), Some(""));
        assert_eq!(form.value("phone_number"), Some("5551234"));
        assert_eq!(form.value("nickname"), None);
    }

    #[test]
    fn test_sequence_top_level_skipped() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({"email": ["a@b.c"]})));
        assert_eq!(form.value("email"), Some(""));
    }

    #[test]
    fn test_null_clears_general_control() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({"github_link": "gh"})));
        form.populate(&record(json!({"github_link": null})));
        assert_eq!(form.value("github_link"), Some(""));
    }

    #[test]
    fn test_repopulate_rebuilds_sections() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "projects": [{"name": "a"}, {"name": "b"}],
            "skills": [{"name": "Rust"}]
        })));
        assert_eq!(section(&form, "projects").groups.len(), 2);

        form.populate(&record(json!({"projects": [{"name": "c"}]})));
        let projects = section(&form, "projects");
        assert_eq!(projects.groups.len(), 1);
        assert_eq!(projects.groups[0].controls[0].value, "c");
        assert!(section(&form, "skills").groups.is_empty());
    }

    #[test]
    fn test_repopulate_same_record_is_stable() {
        let r = record(json!({
            "first_name": "Ana",
            "experiences": [{"title": "Eng", "bullet_points": ["a", "b"]}]
        }));
        let mut once = ResumeForm::new();
        once.populate(&r);
        let mut twice = ResumeForm::new();
        twice.populate(&r);
        twice.populate(&r);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bullet_points_joined_by_newline() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "experiences": [{"title": "Eng", "bullet_points": ["a", "b"]}]
        })));
        assert_eq!(form.value("experiences-0-bullet_points"), Some("a\nb"));
    }

    #[test]
    fn test_scalar_items_get_value_control() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({"skills": ["Rust", "SQL"]})));
        let skills = section(&form, "skills");
        assert_eq!(skills.groups.len(), 2);
        assert_eq!(skills.groups[1].controls[0].name, "skills-1-value");
        assert_eq!(skills.groups[1].controls[0].value, "SQL");
    }

    #[test]
    fn test_controls_order_and_set_value() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({"courses": [{"name": "Algo"}]})));
        let names: Vec<&str> = form.controls().map(|c| c.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"first_name"));
        assert_eq!(names.last(), Some(&"courses-0-name"));
        assert_eq!(form.control_count(), GENERAL_FIELDS.len() + 1);

        assert!(form.set_value("courses-0-name", "Compilers"));
        assert_eq!(form.value("courses-0-name"), Some("Compilers"));
        assert!(!form.set_value("missing", "x"));
    }

    #[test]
    fn test_form_fields_follow_control_order() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "first_name": "Ana",
            "experiences": [{"title": "Eng", "bullet_points": ["a", "b"]}],
            "skills": [{"name": "Rust"}]
        })));
        form.set_value("experiences-0-bullet_points", "a\nb\nc");

        let fields = form.to_form_fields();
        assert_eq!(fields.len(), form.control_count());
        assert_eq!(fields[0], ("first_name".to_string(), "Ana".to_string()));
        assert!(fields.contains(&(
            "experiences-0-bullet_points".to_string(),
            "a\nb\nc".to_string()
        )));
        assert_eq!(
            fields.last(),
            Some(&("skills-0-name".to_string(), "Rust".to_string()))
        );
    }

    #[test]
    fn test_missing_required() {
        let mut form = ResumeForm::new();
        form.populate(&record(json!({
            "first_name": "Ana",
            "last_name": "  ",
            "email": "ana@example.com"
        })));
        assert_eq!(form.missing_required(), vec!["Last_name", "Phone_number"]);

        form.set_value("last_name", "Diaz");
        form.set_value("phone_number", "555");
        assert!(form.missing_required().is_empty());
    }
}
