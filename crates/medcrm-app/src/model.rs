// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    AdminDashboard,
    DoctorDashboard,
    PatientDashboard,
    Patients,
    AddPatient,
    Doctors,
    AddDoctor,
    DoctorProfile,
    Appointments,
    BookAppointment,
    Departments,
    Staff,
    AddStaff,
    Attendance,
    Leaves,
    Payroll,
    Accounts,
    Expenses,
    Invoices,
    Payments,
    Reports,
    Notifications,
    Profile,
    Settings,
}

impl Section {
    pub const ALL: [Self; 24] = [
        Self::AdminDashboard,
        Self::DoctorDashboard,
        Self::PatientDashboard,
        Self::Patients,
        Self::AddPatient,
        Self::Doctors,
        Self::AddDoctor,
        Self::DoctorProfile,
        Self::Appointments,
        Self::BookAppointment,
        Self::Departments,
        Self::Staff,
        Self::AddStaff,
        Self::Attendance,
        Self::Leaves,
        Self::Payroll,
        Self::Accounts,
        Self::Expenses,
        Self::Invoices,
        Self::Payments,
        Self::Reports,
        Self::Notifications,
        Self::Profile,
        Self::Settings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminDashboard => "admin-dashboard",
            Self::DoctorDashboard => "doctor-dashboard",
            Self::PatientDashboard => "patient-dashboard",
            Self::Patients => "patients",
            Self::AddPatient => "add-patient",
            Self::Doctors => "doctors",
            Self::AddDoctor => "add-doctor",
            Self::DoctorProfile => "doctor-profile",
            Self::Appointments => "appointments",
            Self::BookAppointment => "book-appointment",
            Self::Departments => "departments",
            Self::Staff => "staff",
            Self::AddStaff => "add-staff",
            Self::Attendance => "attendance",
            Self::Leaves => "leaves",
            Self::Payroll => "payroll",
            Self::Accounts => "accounts",
            Self::Expenses => "expenses",
            Self::Invoices => "invoices",
            Self::Payments => "payments",
            Self::Reports => "reports",
            Self::Notifications => "notifications",
            Self::Profile => "profile",
            Self::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AdminDashboard => "dashboard",
            Self::DoctorDashboard => "doctor view",
            Self::PatientDashboard => "patient view",
            Self::Patients => "patients",
            Self::AddPatient => "add patient",
            Self::Doctors => "doctors",
            Self::AddDoctor => "add doctor",
            Self::DoctorProfile => "doctor profile",
            Self::Appointments => "appointments",
            Self::BookAppointment => "book",
            Self::Departments => "departments",
            Self::Staff => "staff",
            Self::AddStaff => "add staff",
            Self::Attendance => "attendance",
            Self::Leaves => "leaves",
            Self::Payroll => "payroll",
            Self::Accounts => "accounts",
            Self::Expenses => "expenses",
            Self::Invoices => "invoices",
            Self::Payments => "payments",
            Self::Reports => "reports",
            Self::Notifications => "alerts",
            Self::Profile => "profile",
            Self::Settings => "settings",
        }
    }

    pub const fn group(self) -> SectionGroup {
        match self {
            Self::AdminDashboard | Self::DoctorDashboard | Self::PatientDashboard => {
                SectionGroup::Dashboards
            }
            Self::Patients | Self::AddPatient => SectionGroup::Patients,
            Self::Doctors | Self::AddDoctor | Self::DoctorProfile => SectionGroup::Doctors,
            Self::Appointments | Self::BookAppointment => SectionGroup::Scheduling,
            Self::Departments
            | Self::Staff
            | Self::AddStaff
            | Self::Attendance
            | Self::Leaves
            | Self::Payroll => SectionGroup::HumanResources,
            Self::Accounts | Self::Expenses | Self::Invoices | Self::Payments => {
                SectionGroup::Finance
            }
            Self::Reports | Self::Notifications | Self::Profile | Self::Settings => {
                SectionGroup::General
            }
        }
    }

    pub const fn form_kind(self) -> Option<FormKind> {
        match self {
            Self::AddPatient => Some(FormKind::Patient),
            Self::AddDoctor => Some(FormKind::Doctor),
            Self::AddStaff => Some(FormKind::Staff),
            Self::BookAppointment => Some(FormKind::Appointment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionGroup {
    Dashboards,
    Patients,
    Doctors,
    Scheduling,
    HumanResources,
    Finance,
    General,
}

impl SectionGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboards => "dashboards",
            Self::Patients => "patients",
            Self::Doctors => "doctors",
            Self::Scheduling => "scheduling",
            Self::HumanResources => "hr",
            Self::Finance => "finance",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Patient,
    Doctor,
    Staff,
    Appointment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Admitted,
    Outpatient,
    Critical,
    Discharged,
}

impl PatientStatus {
    pub const ALL: [Self; 4] = [
        Self::Admitted,
        Self::Outpatient,
        Self::Critical,
        Self::Discharged,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Outpatient => "outpatient",
            Self::Critical => "critical",
            Self::Discharged => "discharged",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admitted" => Some(Self::Admitted),
            "outpatient" => Some(Self::Outpatient),
            "critical" => Some(Self::Critical),
            "discharged" => Some(Self::Discharged),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [Self; 4] = [
        Self::Scheduled,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub const fn is_upcoming(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [Self; 3] = [Self::Paid, Self::Pending, Self::Overdue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: [Self; 2] = [Self::Income, Self::Expense];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Nurse,
    Receptionist,
    Technician,
    Pharmacist,
    Administrator,
    Support,
}

impl StaffRole {
    pub const ALL: [Self; 6] = [
        Self::Nurse,
        Self::Receptionist,
        Self::Technician,
        Self::Pharmacist,
        Self::Administrator,
        Self::Support,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nurse => "nurse",
            Self::Receptionist => "receptionist",
            Self::Technician => "technician",
            Self::Pharmacist => "pharmacist",
            Self::Administrator => "administrator",
            Self::Support => "support",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "nurse" => Some(Self::Nurse),
            "receptionist" => Some(Self::Receptionist),
            "technician" => Some(Self::Technician),
            "pharmacist" => Some(Self::Pharmacist),
            "administrator" => Some(Self::Administrator),
            "support" => Some(Self::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    OnLeave,
}

impl AttendanceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
            Self::OnLeave => "on leave",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

impl Shift {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub blood_group: String,
    pub phone: String,
    pub condition: String,
    pub status: PatientStatus,
    pub doctor_id: Option<DoctorId>,
    pub admitted_on: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
    pub department_id: DepartmentId,
    pub rating: f32,
    pub experience_years: u8,
    pub phone: String,
    pub email: String,
    pub available: bool,
    pub consultation_fee_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub head_doctor_id: Option<DoctorId>,
    pub floor: u8,
    pub beds: u16,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: StaffRole,
    pub department_id: DepartmentId,
    pub shift: Shift,
    pub phone: String,
    pub joined_on: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub date: Date,
    pub time: Time,
    pub reason: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: Date,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub patient_id: PatientId,
    pub issued_on: Date,
    pub due_on: Date,
    pub status: InvoiceStatus,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|line| line.amount_cents).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub id: PayrollEntryId,
    pub staff_id: StaffId,
    pub period: Date,
    pub base_cents: i64,
    pub bonus_cents: i64,
    pub deductions_cents: i64,
    pub paid: bool,
}

impl PayrollEntry {
    pub const fn net_cents(&self) -> i64 {
        self.base_cents + self.bonus_cents - self.deductions_cents
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
    pub days_per_year: u16,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub staff_id: StaffId,
    pub leave_type_id: LeaveTypeId,
    pub start: Date,
    pub end: Date,
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceRecordId,
    pub staff_id: StaffId,
    pub date: Date,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub created_on: Date,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::{AppointmentStatus, FormKind, PatientStatus, Section};

    #[test]
    fn section_identifiers_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse(" patients "), Some(Section::Patients));
        assert_eq!(Section::parse("pharmacy"), None);
    }

    #[test]
    fn only_form_sections_carry_form_kind() {
        assert_eq!(Section::AddPatient.form_kind(), Some(FormKind::Patient));
        assert_eq!(
            Section::BookAppointment.form_kind(),
            Some(FormKind::Appointment)
        );
        assert_eq!(Section::Patients.form_kind(), None);
    }

    #[test]
    fn status_strings_parse_back() {
        for status in PatientStatus::ALL {
            assert_eq!(PatientStatus::parse(status.as_str()), Some(status));
        }
        assert!(AppointmentStatus::Confirmed.is_upcoming());
        assert!(!AppointmentStatus::Cancelled.is_upcoming());
    }
}
