// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::{Date, Time};
use time::macros::format_description;

use crate::FormKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Optional,
    Required,
    RequiredDate,
    RequiredNumber,
    RequiredTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFieldSpec {
    pub label: &'static str,
    pub rule: FieldRule,
}

const fn field(label: &'static str, rule: FieldRule) -> FormFieldSpec {
    FormFieldSpec { label, rule }
}

const PATIENT_FIELDS: [FormFieldSpec; 6] = [
    field("name", FieldRule::Required),
    field("age", FieldRule::RequiredNumber),
    field("gender", FieldRule::Optional),
    field("phone", FieldRule::Required),
    field("condition", FieldRule::Optional),
    field("admitted on (YYYY-MM-DD)", FieldRule::RequiredDate),
];

const DOCTOR_FIELDS: [FormFieldSpec; 5] = [
    field("name", FieldRule::Required),
    field("specialty", FieldRule::Required),
    field("experience years", FieldRule::RequiredNumber),
    field("email", FieldRule::Required),
    field("phone", FieldRule::Optional),
];

const STAFF_FIELDS: [FormFieldSpec; 4] = [
    field("name", FieldRule::Required),
    field("role", FieldRule::Required),
    field("shift", FieldRule::Optional),
    field("phone", FieldRule::Optional),
];

const APPOINTMENT_FIELDS: [FormFieldSpec; 5] = [
    field("patient", FieldRule::Required),
    field("doctor", FieldRule::Required),
    field("date (YYYY-MM-DD)", FieldRule::RequiredDate),
    field("time (HH:MM)", FieldRule::RequiredTime),
    field("reason", FieldRule::Optional),
];

pub const fn form_fields(kind: FormKind) -> &'static [FormFieldSpec] {
    match kind {
        FormKind::Patient => &PATIENT_FIELDS,
        FormKind::Doctor => &DOCTOR_FIELDS,
        FormKind::Staff => &STAFF_FIELDS,
        FormKind::Appointment => &APPOINTMENT_FIELDS,
    }
}

pub const fn form_title(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Patient => "new patient",
        FormKind::Doctor => "new doctor",
        FormKind::Staff => "new staff member",
        FormKind::Appointment => "new appointment",
    }
}

/// Unsaved form input held by a form view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub kind: FormKind,
    pub values: Vec<String>,
    pub field_index: usize,
}

impl FormDraft {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: vec![String::new(); form_fields(kind).len()],
            field_index: 0,
        }
    }

    pub fn specs(&self) -> &'static [FormFieldSpec] {
        form_fields(self.kind)
    }

    pub fn move_field(&mut self, delta: isize) {
        let len = self.values.len() as isize;
        if len == 0 {
            return;
        }
        self.field_index = (self.field_index as isize + delta).rem_euclid(len) as usize;
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(value) = self.values.get_mut(self.field_index) {
            value.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(value) = self.values.get_mut(self.field_index) {
            value.pop();
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.specs()
            .iter()
            .position(|spec| spec.label == label)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        for (spec, value) in self.specs().iter().zip(&self.values) {
            let value = value.trim();
            match spec.rule {
                FieldRule::Optional => {}
                FieldRule::Required => {
                    if value.is_empty() {
                        bail!("{} is required", spec.label);
                    }
                }
                FieldRule::RequiredNumber => {
                    if value.parse::<u32>().is_err() {
                        bail!("{} must be a whole number, got {value:?}", spec.label);
                    }
                }
                FieldRule::RequiredDate => {
                    if Date::parse(value, format_description!("[year]-[month]-[day]")).is_err() {
                        bail!("{} must be a date like 2026-03-14, got {value:?}", spec.label);
                    }
                }
                FieldRule::RequiredTime => {
                    if Time::parse(value, format_description!("[hour]:[minute]")).is_err() {
                        bail!("{} must be a time like 09:30, got {value:?}", spec.label);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FormDraft, form_fields};
    use crate::FormKind;
    use anyhow::Result;

    fn fill(draft: &mut FormDraft, values: &[&str]) {
        draft.values = values.iter().map(|value| (*value).to_owned()).collect();
    }

    #[test]
    fn new_draft_has_one_value_per_field() {
        let draft = FormDraft::new(FormKind::Patient);
        assert_eq!(draft.values.len(), form_fields(FormKind::Patient).len());
        assert!(draft.values.iter().all(String::is_empty));
    }

    #[test]
    fn missing_required_field_is_reported_by_label() {
        let draft = FormDraft::new(FormKind::Staff);
        let error = draft.validate().expect_err("empty name should fail");
        assert!(error.to_string().contains("name is required"));
    }

    #[test]
    fn complete_patient_form_validates() -> Result<()> {
        let mut draft = FormDraft::new(FormKind::Patient);
        fill(
            &mut draft,
            &["Nora Kim", "34", "F", "555-0134", "Asthma", "2026-02-01"],
        );
        draft.validate()?;
        assert_eq!(draft.value("name"), Some("Nora Kim"));
        Ok(())
    }

    #[test]
    fn bad_date_and_number_are_rejected() {
        let mut draft = FormDraft::new(FormKind::Patient);
        fill(&mut draft, &["Nora Kim", "old", "", "555", "", "2026-02-01"]);
        let error = draft.validate().expect_err("non-numeric age should fail");
        assert!(error.to_string().contains("whole number"));

        fill(&mut draft, &["Nora Kim", "34", "", "555", "", "02/01/2026"]);
        let error = draft.validate().expect_err("bad date should fail");
        assert!(error.to_string().contains("must be a date"));
    }

    #[test]
    fn appointment_time_must_be_a_clock_time() -> Result<()> {
        let mut draft = FormDraft::new(FormKind::Appointment);
        for bad in ["25:99", "noon", ""] {
            fill(&mut draft, &["Nora Kim", "Dr. Shah", "2026-03-14", bad, ""]);
            let error = draft.validate().expect_err("bad time should fail");
            assert!(error.to_string().contains("must be a time"), "{bad:?}");
        }

        fill(&mut draft, &["Nora Kim", "Dr. Shah", "2026-03-14", "09:30", ""]);
        draft.validate()?;
        Ok(())
    }

    #[test]
    fn field_cursor_wraps_and_edits_current_value() {
        let mut draft = FormDraft::new(FormKind::Staff);
        draft.move_field(-1);
        assert_eq!(draft.field_index, 3);
        draft.push_char('5');
        draft.push_char('5');
        draft.pop_char();
        assert_eq!(draft.values[3], "5");
    }
}
