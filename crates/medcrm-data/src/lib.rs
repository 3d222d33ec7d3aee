// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod context;
mod demo;
pub mod format;

use medcrm_app::{
    Appointment, AttendanceRecord, Department, DepartmentId, Doctor, DoctorId, Invoice,
    LeaveRequest, LeaveType, LeaveTypeId, Notification, Patient, PatientId, PayrollEntry,
    StaffId, StaffMember, StaffRole, Transaction, TransactionKind,
};

pub use context::{GENERIC_OVERVIEW, TOP_RATED_THRESHOLD, describe_view};
pub use format::{UNKNOWN, format_cents, format_date, format_time};

pub const APP_NAME: &str = "medcrm";

/// Static in-memory records standing in for a clinic backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockDataset {
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub departments: Vec<Department>,
    pub staff: Vec<StaffMember>,
    pub appointments: Vec<Appointment>,
    pub transactions: Vec<Transaction>,
    pub invoices: Vec<Invoice>,
    pub payroll: Vec<PayrollEntry>,
    pub leave_types: Vec<LeaveType>,
    pub leave_requests: Vec<LeaveRequest>,
    pub attendance: Vec<AttendanceRecord>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClinicTotals {
    pub patients: usize,
    pub doctors: usize,
    pub available_doctors: usize,
    pub staff: usize,
    pub departments: usize,
    pub upcoming_appointments: usize,
    pub outstanding_invoices: usize,
    pub unread_notifications: usize,
}

impl MockDataset {
    /// The compiled-in sample clinic.
    pub fn demo() -> Self {
        demo::dataset()
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|patient| patient.id == id)
    }

    pub fn doctor(&self, id: DoctorId) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.id == id)
    }

    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.id == id)
    }

    pub fn staff_member(&self, id: StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == id)
    }

    pub fn leave_type(&self, id: LeaveTypeId) -> Option<&LeaveType> {
        self.leave_types
            .iter()
            .find(|leave_type| leave_type.id == id)
    }

    pub fn patient_name(&self, id: PatientId) -> &str {
        self.patient(id)
            .map_or(UNKNOWN, |patient| patient.name.as_str())
    }

    pub fn doctor_name(&self, id: DoctorId) -> &str {
        self.doctor(id).map_or(UNKNOWN, |doctor| doctor.name.as_str())
    }

    pub fn department_name(&self, id: DepartmentId) -> &str {
        self.department(id)
            .map_or(UNKNOWN, |department| department.name.as_str())
    }

    pub fn staff_name(&self, id: StaffId) -> &str {
        self.staff_member(id)
            .map_or(UNKNOWN, |member| member.name.as_str())
    }

    /// Highest-rated doctor at or above `min_rating`; the first listed wins ties.
    pub fn top_rated_doctor(&self, min_rating: f32) -> Option<&Doctor> {
        self.doctors
            .iter()
            .filter(|doctor| doctor.rating >= min_rating)
            .fold(None, |best: Option<&Doctor>, doctor| match best {
                Some(current) if current.rating >= doctor.rating => Some(current),
                _ => Some(doctor),
            })
    }

    /// Earliest scheduled or confirmed appointment by date, then time.
    pub fn next_appointment(&self) -> Option<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.status.is_upcoming())
            .min_by_key(|appointment| (appointment.date, appointment.time, appointment.id))
    }

    pub fn appointments_for_doctor(&self, doctor_id: DoctorId) -> Vec<&Appointment> {
        let mut rows: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|appointment| appointment.doctor_id == doctor_id)
            .collect();
        rows.sort_by_key(|appointment| (appointment.date, appointment.time, appointment.id));
        rows
    }

    pub fn doctors_in_department(&self, department_id: DepartmentId) -> Vec<&Doctor> {
        self.doctors
            .iter()
            .filter(|doctor| doctor.department_id == department_id)
            .collect()
    }

    pub fn staff_by_role(&self) -> Vec<(StaffRole, usize)> {
        StaffRole::ALL
            .into_iter()
            .map(|role| {
                let count = self.staff.iter().filter(|member| member.role == role).count();
                (role, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn totals(&self) -> ClinicTotals {
        ClinicTotals {
            patients: self.patients.len(),
            doctors: self.doctors.len(),
            available_doctors: self.doctors.iter().filter(|doctor| doctor.available).count(),
            staff: self.staff.len(),
            departments: self.departments.len(),
            upcoming_appointments: self
                .appointments
                .iter()
                .filter(|appointment| appointment.status.is_upcoming())
                .count(),
            outstanding_invoices: self
                .invoices
                .iter()
                .filter(|invoice| invoice.status.is_outstanding())
                .count(),
            unread_notifications: self
                .notifications
                .iter()
                .filter(|notification| !notification.read)
                .count(),
        }
    }

    pub fn transaction_total_cents(&self, kind: TransactionKind) -> i64 {
        self.transactions
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .map(|transaction| transaction.amount_cents)
            .sum()
    }

    pub fn balance_cents(&self) -> i64 {
        self.transaction_total_cents(TransactionKind::Income)
            - self.transaction_total_cents(TransactionKind::Expense)
    }

    pub fn outstanding_invoice_cents(&self) -> i64 {
        self.invoices
            .iter()
            .filter(|invoice| invoice.status.is_outstanding())
            .map(Invoice::total_cents)
            .sum()
    }

    pub fn payroll_net_cents(&self) -> i64 {
        self.payroll.iter().map(PayrollEntry::net_cents).sum()
    }
}
