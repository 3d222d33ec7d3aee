// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Short descriptions of the active view, handed to the chat assistant as a
//! hint about what the user is looking at.

use medcrm_app::{DoctorId, Section};

use crate::format::{UNKNOWN, format_cents, format_date, format_time};
use crate::MockDataset;

pub const GENERIC_OVERVIEW: &str = "The user is browsing the hospital management system.";

pub const TOP_RATED_THRESHOLD: f32 = 4.8;

const SAMPLED_PATIENTS: usize = 3;
const NONE: &str = "none";

/// Describes `section` using records from `data`.
///
/// `selected_doctor` only matters for [`Section::DoctorProfile`]. Missing
/// records render as `unknown`; this never fails.
pub fn describe_view(
    section: Section,
    selected_doctor: Option<DoctorId>,
    data: &MockDataset,
) -> String {
    match section {
        Section::AdminDashboard => admin_dashboard(data),
        Section::Patients => patients(data),
        Section::Doctors => doctors(data),
        Section::DoctorProfile => doctor_profile(selected_doctor, data),
        Section::Appointments => appointments(data),
        Section::Departments => departments(data),
        Section::Staff => staff(data),
        Section::Invoices => invoices(data),
        Section::Payroll => payroll(data),
        Section::Accounts => accounts(data),
        _ => GENERIC_OVERVIEW.to_owned(),
    }
}

fn admin_dashboard(data: &MockDataset) -> String {
    let totals = data.totals();
    format!(
        "The user is viewing the admin dashboard: {} patients, {} doctors ({} available), \
         {} staff members in {} departments, {} upcoming appointments and {} outstanding invoices.",
        totals.patients,
        totals.doctors,
        totals.available_doctors,
        totals.staff,
        totals.departments,
        totals.upcoming_appointments,
        totals.outstanding_invoices,
    )
}

fn patients(data: &MockDataset) -> String {
    let names: Vec<&str> = data
        .patients
        .iter()
        .take(SAMPLED_PATIENTS)
        .map(|patient| patient.name.as_str())
        .collect();
    format!(
        "The user is viewing the patients list with {} patients in total. Recent patients include {}.",
        data.patients.len(),
        join_or_none(&names),
    )
}

fn doctors(data: &MockDataset) -> String {
    let top = data
        .top_rated_doctor(TOP_RATED_THRESHOLD)
        .map_or_else(
            || UNKNOWN.to_owned(),
            |doctor| format!("{} ({}, rated {:.1})", doctor.name, doctor.specialty, doctor.rating),
        );
    format!(
        "The user is viewing the doctors directory with {} doctors. The top-rated doctor is {top}.",
        data.doctors.len(),
    )
}

fn doctor_profile(selected: Option<DoctorId>, data: &MockDataset) -> String {
    let doctor = selected.and_then(|id| data.doctor(id));
    let name = doctor.map_or(UNKNOWN, |doctor| doctor.name.as_str());
    let specialty = doctor.map_or(UNKNOWN, |doctor| doctor.specialty.as_str());
    let department = doctor.map_or(UNKNOWN, |doctor| data.department_name(doctor.department_id));
    let experience = doctor.map_or_else(
        || UNKNOWN.to_owned(),
        |doctor| format!("{} years", doctor.experience_years),
    );
    let rating = doctor.map_or_else(|| UNKNOWN.to_owned(), |doctor| format!("{:.1}", doctor.rating));
    format!(
        "The user is viewing the profile of {name}, specialty {specialty}, in the {department} \
         department, with {experience} of experience and a rating of {rating}."
    )
}

fn appointments(data: &MockDataset) -> String {
    let next = data.next_appointment().map_or_else(
        || UNKNOWN.to_owned(),
        |appointment| {
            format!(
                "{} with {} on {} at {}",
                data.patient_name(appointment.patient_id),
                data.doctor_name(appointment.doctor_id),
                format_date(appointment.date),
                format_time(appointment.time),
            )
        },
    );
    format!(
        "The user is viewing appointments: {} on record. The next upcoming appointment is {next}.",
        data.appointments.len(),
    )
}

fn departments(data: &MockDataset) -> String {
    let names: Vec<&str> = data
        .departments
        .iter()
        .map(|department| department.name.as_str())
        .collect();
    format!(
        "The user is viewing {} departments: {}.",
        names.len(),
        join_or_none(&names),
    )
}

fn staff(data: &MockDataset) -> String {
    let breakdown: Vec<String> = data
        .staff_by_role()
        .into_iter()
        .map(|(role, count)| format!("{count} {}", role.as_str()))
        .collect();
    let breakdown: Vec<&str> = breakdown.iter().map(String::as_str).collect();
    format!(
        "The user is viewing the staff directory with {} members ({}).",
        data.staff.len(),
        join_or_none(&breakdown),
    )
}

fn invoices(data: &MockDataset) -> String {
    format!(
        "The user is viewing invoices: {} in total, {} pending or overdue, {} outstanding.",
        data.invoices.len(),
        data.totals().outstanding_invoices,
        format_cents(data.outstanding_invoice_cents()),
    )
}

fn payroll(data: &MockDataset) -> String {
    let unpaid = data.payroll.iter().filter(|entry| !entry.paid).count();
    format!(
        "The user is viewing payroll: {} entries totaling {} net pay, {unpaid} not yet paid.",
        data.payroll.len(),
        format_cents(data.payroll_net_cents()),
    )
}

fn accounts(data: &MockDataset) -> String {
    use medcrm_app::TransactionKind;

    format!(
        "The user is viewing accounts: income {}, expenses {}, balance {}.",
        format_cents(data.transaction_total_cents(TransactionKind::Income)),
        format_cents(data.transaction_total_cents(TransactionKind::Expense)),
        format_cents(data.balance_cents()),
    )
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        NONE.to_owned()
    } else {
        items.join(", ")
    }
}
