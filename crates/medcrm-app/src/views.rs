// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{
    Appointment, AppointmentStatus, DepartmentId, Doctor, DoctorId, Invoice, InvoiceStatus,
    Patient, PatientStatus, StaffId, StaffMember, StaffRole, Transaction, TransactionKind,
};

/// Local state of a list view. Discarded on navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewState {
    pub query: String,
    pub filter: usize,
    pub cursor: usize,
    pub expanded: BTreeSet<i64>,
}

impl ListViewState {
    /// Advances the filter through `options + 1` positions; 0 means "all".
    pub fn cycle_filter(&mut self, options: usize) {
        self.filter = (self.filter + 1) % (options + 1);
        self.cursor = 0;
    }

    pub fn selected<T>(&self, options: &[T]) -> Option<T>
    where
        T: Copy,
    {
        self.filter
            .checked_sub(1)
            .and_then(|index| options.get(index).copied())
    }

    pub fn toggle_expanded(&mut self, row_id: i64) -> bool {
        if self.expanded.remove(&row_id) {
            false
        } else {
            self.expanded.insert(row_id);
            true
        }
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let max = len as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

pub fn matches_query(fields: &[&str], query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_patients<'a>(
    rows: &'a [Patient],
    query: &str,
    status: Option<PatientStatus>,
) -> Vec<&'a Patient> {
    rows.iter()
        .filter(|patient| status.is_none_or(|status| patient.status == status))
        .filter(|patient| {
            matches_query(
                &[
                    patient.name.as_str(),
                    patient.condition.as_str(),
                    patient.phone.as_str(),
                ],
                query,
            )
        })
        .collect()
}

pub fn filter_doctors<'a>(
    rows: &'a [Doctor],
    query: &str,
    department: Option<DepartmentId>,
) -> Vec<&'a Doctor> {
    rows.iter()
        .filter(|doctor| department.is_none_or(|department| doctor.department_id == department))
        .filter(|doctor| matches_query(&[doctor.name.as_str(), doctor.specialty.as_str()], query))
        .collect()
}

pub fn filter_staff<'a>(
    rows: &'a [StaffMember],
    query: &str,
    role: Option<StaffRole>,
) -> Vec<&'a StaffMember> {
    rows.iter()
        .filter(|member| role.is_none_or(|role| member.role == role))
        .filter(|member| matches_query(&[member.name.as_str(), member.role.as_str()], query))
        .collect()
}

/// Removes a staff row from a local copy; the backing dataset is untouched.
pub fn remove_staff(rows: &mut Vec<StaffMember>, staff_id: StaffId) -> Option<StaffMember> {
    let index = rows.iter().position(|member| member.id == staff_id)?;
    Some(rows.remove(index))
}

/// Appointments ordered by date then time, narrowed to one doctor when a
/// schedule selection is active.
pub fn filter_appointments<'a>(
    rows: &'a [Appointment],
    doctor: Option<DoctorId>,
    status: Option<AppointmentStatus>,
) -> Vec<&'a Appointment> {
    let mut matches: Vec<&Appointment> = rows
        .iter()
        .filter(|appointment| doctor.is_none_or(|doctor| appointment.doctor_id == doctor))
        .filter(|appointment| status.is_none_or(|status| appointment.status == status))
        .collect();
    matches.sort_by_key(|appointment| (appointment.date, appointment.time, appointment.id));
    matches
}

pub fn filter_invoices<'a>(
    rows: &'a [Invoice],
    query: &str,
    status: Option<InvoiceStatus>,
) -> Vec<&'a Invoice> {
    rows.iter()
        .filter(|invoice| status.is_none_or(|status| invoice.status == status))
        .filter(|invoice| {
            let descriptions: Vec<&str> = invoice
                .lines
                .iter()
                .map(|line| line.description.as_str())
                .collect();
            matches_query(&[invoice.number.as_str()], query) || matches_query(&descriptions, query)
        })
        .collect()
}

pub fn filter_transactions<'a>(
    rows: &'a [Transaction],
    query: &str,
    kind: Option<TransactionKind>,
) -> Vec<&'a Transaction> {
    rows.iter()
        .filter(|transaction| kind.is_none_or(|kind| transaction.kind == kind))
        .filter(|transaction| {
            matches_query(
                &[
                    transaction.description.as_str(),
                    transaction.category.as_str(),
                ],
                query,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        ListViewState, filter_appointments, filter_patients, filter_staff, matches_query,
        remove_staff,
    };
    use crate::{
        Appointment, AppointmentId, AppointmentStatus, DepartmentId, DoctorId, Patient,
        PatientId, PatientStatus, Shift, StaffId, StaffMember, StaffRole,
    };
    use time::macros::{date, time};

    fn patient(id: i64, name: &str, status: PatientStatus) -> Patient {
        Patient {
            id: PatientId::new(id),
            name: name.to_owned(),
            age: 40,
            gender: "F".to_owned(),
            blood_group: "O+".to_owned(),
            phone: format!("555-01{id:02}"),
            condition: "Hypertension".to_owned(),
            status,
            doctor_id: None,
            admitted_on: date!(2026 - 01 - 10),
        }
    }

    fn staff(id: i64, name: &str, role: StaffRole) -> StaffMember {
        StaffMember {
            id: StaffId::new(id),
            name: name.to_owned(),
            role,
            department_id: DepartmentId::new(1),
            shift: Shift::Morning,
            phone: String::new(),
            joined_on: date!(2024 - 03 - 01),
        }
    }

    #[test]
    fn query_matching_is_case_insensitive_and_blank_matches_all() {
        assert!(matches_query(&["Maria Lopez"], "lopez"));
        assert!(matches_query(&["Maria Lopez"], "  "));
        assert!(!matches_query(&["Maria Lopez"], "smith"));
    }

    #[test]
    fn patients_filter_by_status_and_query() {
        let rows = vec![
            patient(1, "Maria Lopez", PatientStatus::Admitted),
            patient(2, "John Reed", PatientStatus::Outpatient),
            patient(3, "Mario Diaz", PatientStatus::Admitted),
        ];

        let admitted = filter_patients(&rows, "", Some(PatientStatus::Admitted));
        assert_eq!(admitted.len(), 2);

        let mari = filter_patients(&rows, "mari", None);
        let names: Vec<&str> = mari.iter().map(|patient| patient.name.as_str()).collect();
        assert_eq!(names, vec!["Maria Lopez", "Mario Diaz"]);
    }

    #[test]
    fn filter_cycle_wraps_back_to_all() {
        let mut state = ListViewState {
            cursor: 4,
            ..ListViewState::default()
        };
        let options = PatientStatus::ALL;

        state.cycle_filter(options.len());
        assert_eq!(state.selected(&options), Some(PatientStatus::Admitted));
        assert_eq!(state.cursor, 0);

        for _ in 0..options.len() {
            state.cycle_filter(options.len());
        }
        assert_eq!(state.filter, 0);
        assert_eq!(state.selected(&options), None);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut state = ListViewState::default();
        state.move_cursor(5, 3);
        assert_eq!(state.cursor, 2);
        state.move_cursor(-10, 3);
        assert_eq!(state.cursor, 0);
        state.move_cursor(1, 0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn expanded_rows_toggle() {
        let mut state = ListViewState::default();
        assert!(state.toggle_expanded(7));
        assert!(state.expanded.contains(&7));
        assert!(!state.toggle_expanded(7));
        assert!(state.expanded.is_empty());
    }

    #[test]
    fn staff_removal_is_local() {
        let source = vec![
            staff(1, "Avery Hill", StaffRole::Nurse),
            staff(2, "Quinn Ward", StaffRole::Pharmacist),
        ];
        let mut local = source.clone();

        let removed = remove_staff(&mut local, StaffId::new(1));
        assert_eq!(removed.map(|member| member.name), Some("Avery Hill".to_owned()));
        assert_eq!(local.len(), 1);
        assert_eq!(source.len(), 2);
        assert!(remove_staff(&mut local, StaffId::new(1)).is_none());

        let nurses = filter_staff(&source, "", Some(StaffRole::Nurse));
        assert_eq!(nurses.len(), 1);
    }

    #[test]
    fn appointments_sorted_and_narrowed_to_doctor() {
        let rows = vec![
            Appointment {
                id: AppointmentId::new(1),
                patient_id: PatientId::new(1),
                doctor_id: DoctorId::new(2),
                date: date!(2026 - 03 - 02),
                time: time!(09:00),
                reason: "Follow-up".to_owned(),
                status: AppointmentStatus::Scheduled,
            },
            Appointment {
                id: AppointmentId::new(2),
                patient_id: PatientId::new(2),
                doctor_id: DoctorId::new(1),
                date: date!(2026 - 03 - 01),
                time: time!(14:30),
                reason: "Checkup".to_owned(),
                status: AppointmentStatus::Confirmed,
            },
            Appointment {
                id: AppointmentId::new(3),
                patient_id: PatientId::new(3),
                doctor_id: DoctorId::new(2),
                date: date!(2026 - 03 - 01),
                time: time!(08:15),
                reason: "Consult".to_owned(),
                status: AppointmentStatus::Completed,
            },
        ];

        let all: Vec<i64> = filter_appointments(&rows, None, None)
            .iter()
            .map(|appointment| appointment.id.get())
            .collect();
        assert_eq!(all, vec![3, 2, 1]);

        let doctor_two: Vec<i64> = filter_appointments(&rows, Some(DoctorId::new(2)), None)
            .iter()
            .map(|appointment| appointment.id.get())
            .collect();
        assert_eq!(doctor_two, vec![3, 1]);

        let scheduled =
            filter_appointments(&rows, Some(DoctorId::new(2)), Some(AppointmentStatus::Scheduled));
        assert_eq!(scheduled.len(), 1);
    }
}
