// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use medcrm_app::{
    Appointment, AppointmentId, AppointmentStatus, AttendanceRecord, AttendanceRecordId,
    AttendanceStatus, Department, DepartmentId, Doctor, DoctorId, Invoice, InvoiceId,
    InvoiceLine, InvoiceStatus, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType,
    LeaveTypeId, Notification, NotificationId, Patient, PatientId, PatientStatus, PayrollEntry,
    PayrollEntryId, Shift, StaffId, StaffMember, StaffRole, Transaction, TransactionId,
    TransactionKind,
};
use time::macros::{date, time};
use time::{Date, Time};

use crate::MockDataset;

pub(crate) fn dataset() -> MockDataset {
    MockDataset {
        patients: patients(),
        doctors: doctors(),
        departments: departments(),
        staff: staff(),
        appointments: appointments(),
        transactions: transactions(),
        invoices: invoices(),
        payroll: payroll(),
        leave_types: leave_types(),
        leave_requests: leave_requests(),
        attendance: attendance(),
        notifications: notifications(),
    }
}

fn departments() -> Vec<Department> {
    [
        (1, "Cardiology", Some(1), 3, 40, "Heart and vascular care"),
        (2, "Neurology", Some(3), 4, 28, "Brain, spine and nerve disorders"),
        (3, "Orthopedics", Some(4), 2, 32, "Bones, joints and sports injuries"),
        (4, "Pediatrics", Some(5), 1, 36, "Care for infants and children"),
        (5, "Emergency", Some(7), 0, 24, "Round-the-clock acute care"),
        (6, "Radiology", None, 1, 0, "Imaging and diagnostics"),
    ]
    .into_iter()
    .map(
        |(id, name, head, floor, beds, description)| Department {
            id: DepartmentId::new(id),
            name: name.to_owned(),
            head_doctor_id: head.map(DoctorId::new),
            floor,
            beds,
            description: description.to_owned(),
        },
    )
    .collect()
}

fn doctors() -> Vec<Doctor> {
    [
        (1, "Dr. Sarah Chen", "Cardiologist", 1, 4.9, 15, true, 25_000),
        (2, "Dr. Marcus Webb", "Cardiac Surgeon", 1, 4.6, 21, false, 40_000),
        (3, "Dr. Priya Raman", "Neurologist", 2, 4.8, 12, true, 22_000),
        (4, "Dr. Daniel Okafor", "Orthopedic Surgeon", 3, 4.7, 18, true, 30_000),
        (5, "Dr. Elena Petrova", "Pediatrician", 4, 4.9, 9, true, 15_000),
        (6, "Dr. James Holt", "Pediatrician", 4, 4.3, 4, true, 12_000),
        (7, "Dr. Amara Diallo", "Emergency Physician", 5, 4.5, 11, true, 18_000),
        (8, "Dr. Lucas Moreau", "Radiologist", 6, 4.4, 7, false, 16_000),
    ]
    .into_iter()
    .map(
        |(id, name, specialty, department, rating, experience, available, fee)| {
            let slug = name
                .trim_start_matches("Dr. ")
                .to_lowercase()
                .replace(' ', ".");
            Doctor {
                id: DoctorId::new(id),
                name: name.to_owned(),
                specialty: specialty.to_owned(),
                department_id: DepartmentId::new(department),
                rating,
                experience_years: experience,
                phone: format!("555-02{id:02}"),
                email: format!("{slug}@medcrm.example"),
                available,
                consultation_fee_cents: fee,
            }
        },
    )
    .collect()
}

#[allow(clippy::type_complexity)]
const PATIENT_ROWS: [(i64, &str, u8, &str, &str, &str, PatientStatus, Option<i64>, Date); 12] = [
    (1, "Maria Lopez", 54, "F", "A+", "Hypertension", PatientStatus::Admitted, Some(1), date!(2026 - 02 - 11)),
    (2, "John Reed", 37, "M", "O-", "Migraine", PatientStatus::Outpatient, Some(3), date!(2026 - 02 - 18)),
    (3, "Aisha Khan", 8, "F", "B+", "Asthma", PatientStatus::Outpatient, Some(5), date!(2026 - 01 - 29)),
    (4, "Robert Fields", 71, "M", "AB+", "Arrhythmia", PatientStatus::Critical, Some(2), date!(2026 - 03 - 01)),
    (5, "Hannah Becker", 45, "F", "O+", "Knee replacement", PatientStatus::Admitted, Some(4), date!(2026 - 02 - 25)),
    (6, "Tomás García", 29, "M", "A-", "Fractured wrist", PatientStatus::Discharged, Some(7), date!(2026 - 01 - 14)),
    (7, "Mei Tanaka", 62, "F", "B-", "Stroke recovery", PatientStatus::Admitted, Some(3), date!(2026 - 02 - 20)),
    (8, "Samuel Adeyemi", 5, "M", "O+", "Bronchiolitis", PatientStatus::Discharged, Some(6), date!(2026 - 01 - 05)),
    (9, "Olivia Brooks", 33, "F", "A+", "Chest pain", PatientStatus::Outpatient, Some(1), date!(2026 - 03 - 02)),
    (10, "Viktor Nilsson", 48, "M", "AB-", "Back pain", PatientStatus::Outpatient, None, date!(2026 - 02 - 27)),
    (11, "Grace O'Neill", 80, "F", "O-", "Pneumonia", PatientStatus::Critical, Some(7), date!(2026 - 03 - 03)),
    (12, "Ahmed Farouk", 41, "M", "B+", "Epilepsy", PatientStatus::Admitted, Some(3), date!(2026 - 02 - 08)),
];

fn patients() -> Vec<Patient> {
    PATIENT_ROWS
        .into_iter()
        .map(
            |(id, name, age, gender, blood_group, condition, status, doctor, admitted_on)| {
                Patient {
                    id: PatientId::new(id),
                    name: name.to_owned(),
                    age,
                    gender: gender.to_owned(),
                    blood_group: blood_group.to_owned(),
                    phone: format!("555-01{id:02}"),
                    condition: condition.to_owned(),
                    status,
                    doctor_id: doctor.map(DoctorId::new),
                    admitted_on,
                }
            },
        )
        .collect()
}

fn staff() -> Vec<StaffMember> {
    [
        (1, "Avery Hill", StaffRole::Nurse, 1, Shift::Morning, date!(2021 - 04 - 12)),
        (2, "Jordan Blake", StaffRole::Nurse, 5, Shift::Night, date!(2022 - 09 - 01)),
        (3, "Riley Chen", StaffRole::Nurse, 4, Shift::Evening, date!(2023 - 01 - 16)),
        (4, "Morgan Ellis", StaffRole::Receptionist, 5, Shift::Morning, date!(2020 - 06 - 08)),
        (5, "Casey Nguyen", StaffRole::Technician, 6, Shift::Morning, date!(2019 - 11 - 25)),
        (6, "Quinn Ward", StaffRole::Pharmacist, 1, Shift::Evening, date!(2024 - 02 - 05)),
        (7, "Taylor Brooks", StaffRole::Administrator, 1, Shift::Morning, date!(2018 - 03 - 19)),
        (8, "Jamie Ortiz", StaffRole::Support, 3, Shift::Night, date!(2025 - 07 - 14)),
        (9, "Drew Patel", StaffRole::Technician, 2, Shift::Evening, date!(2022 - 12 - 02)),
        (10, "Sky Rivera", StaffRole::Receptionist, 4, Shift::Evening, date!(2025 - 01 - 20)),
    ]
    .into_iter()
    .map(|(id, name, role, department, shift, joined_on)| StaffMember {
        id: StaffId::new(id),
        name: name.to_owned(),
        role,
        department_id: DepartmentId::new(department),
        shift,
        phone: format!("555-03{id:02}"),
        joined_on,
    })
    .collect()
}

const APPOINTMENT_ROWS: [(i64, i64, i64, Date, Time, &str, AppointmentStatus); 12] = [
    (1, 1, 1, date!(2026 - 03 - 02), time!(09:00), "Blood pressure review", AppointmentStatus::Completed),
    (2, 2, 3, date!(2026 - 03 - 03), time!(10:30), "Migraine follow-up", AppointmentStatus::Completed),
    (3, 9, 1, date!(2026 - 03 - 05), time!(14:00), "ECG results", AppointmentStatus::Cancelled),
    (4, 3, 5, date!(2026 - 03 - 09), time!(11:15), "Asthma check", AppointmentStatus::Confirmed),
    (5, 5, 4, date!(2026 - 03 - 09), time!(08:45), "Post-op assessment", AppointmentStatus::Scheduled),
    (6, 7, 3, date!(2026 - 03 - 10), time!(13:00), "Rehab progress", AppointmentStatus::Scheduled),
    (7, 4, 2, date!(2026 - 03 - 10), time!(09:30), "Pacemaker consult", AppointmentStatus::Confirmed),
    (8, 10, 4, date!(2026 - 03 - 11), time!(15:45), "Spine imaging review", AppointmentStatus::Scheduled),
    (9, 12, 3, date!(2026 - 03 - 12), time!(10:00), "Medication adjustment", AppointmentStatus::Scheduled),
    (10, 1, 1, date!(2026 - 03 - 16), time!(09:00), "Cardiology follow-up", AppointmentStatus::Scheduled),
    (11, 6, 7, date!(2026 - 03 - 17), time!(16:30), "Cast removal", AppointmentStatus::Confirmed),
    (12, 8, 6, date!(2026 - 03 - 18), time!(11:00), "Well-child visit", AppointmentStatus::Scheduled),
];

fn appointments() -> Vec<Appointment> {
    APPOINTMENT_ROWS
        .into_iter()
        .map(
            |(id, patient, doctor, date, time, reason, status)| Appointment {
                id: AppointmentId::new(id),
                patient_id: PatientId::new(patient),
                doctor_id: DoctorId::new(doctor),
                date,
                time,
                reason: reason.to_owned(),
                status,
            },
        )
        .collect()
}

fn transactions() -> Vec<Transaction> {
    use TransactionKind::{Expense, Income};

    [
        (1, date!(2026 - 03 - 01), "Inpatient billing", "Patient services", Income, 1_845_000),
        (2, date!(2026 - 03 - 01), "Outpatient consultations", "Patient services", Income, 612_500),
        (3, date!(2026 - 03 - 02), "Insurance reimbursement", "Insurance", Income, 2_310_000),
        (4, date!(2026 - 03 - 02), "Medical supplies", "Supplies", Expense, 487_250),
        (5, date!(2026 - 03 - 03), "Pharmacy restock", "Pharmacy", Expense, 356_900),
        (6, date!(2026 - 03 - 04), "Equipment lease", "Equipment", Expense, 720_000),
        (7, date!(2026 - 03 - 05), "Lab services", "Diagnostics", Income, 298_000),
        (8, date!(2026 - 03 - 05), "Utilities", "Facilities", Expense, 184_300),
        (9, date!(2026 - 03 - 06), "Cafeteria contract", "Facilities", Expense, 95_000),
        (10, date!(2026 - 03 - 06), "Imaging services", "Diagnostics", Income, 441_200),
    ]
    .into_iter()
    .map(
        |(id, date, description, category, kind, amount_cents)| Transaction {
            id: TransactionId::new(id),
            date,
            description: description.to_owned(),
            category: category.to_owned(),
            kind,
            amount_cents,
        },
    )
    .collect()
}

fn invoice(
    id: i64,
    patient: i64,
    issued_on: Date,
    due_on: Date,
    status: InvoiceStatus,
    lines: &[(&str, i64)],
) -> Invoice {
    Invoice {
        id: InvoiceId::new(id),
        number: format!("INV-2026-{id:04}"),
        patient_id: PatientId::new(patient),
        issued_on,
        due_on,
        status,
        lines: lines
            .iter()
            .map(|(description, amount_cents)| InvoiceLine {
                description: (*description).to_owned(),
                amount_cents: *amount_cents,
            })
            .collect(),
    }
}

fn invoices() -> Vec<Invoice> {
    vec![
        invoice(
            1,
            1,
            date!(2026 - 02 - 14),
            date!(2026 - 03 - 14),
            InvoiceStatus::Paid,
            &[("Cardiology consultation", 25_000), ("ECG", 12_000)],
        ),
        invoice(
            2,
            4,
            date!(2026 - 03 - 02),
            date!(2026 - 04 - 01),
            InvoiceStatus::Pending,
            &[
                ("ICU stay (3 nights)", 540_000),
                ("Cardiac monitoring", 86_000),
                ("Medication", 23_450),
            ],
        ),
        invoice(
            3,
            5,
            date!(2026 - 02 - 26),
            date!(2026 - 03 - 12),
            InvoiceStatus::Overdue,
            &[("Knee replacement surgery", 1_250_000), ("Physiotherapy", 45_000)],
        ),
        invoice(
            4,
            2,
            date!(2026 - 02 - 19),
            date!(2026 - 03 - 19),
            InvoiceStatus::Paid,
            &[("Neurology consultation", 22_000)],
        ),
        invoice(
            5,
            6,
            date!(2026 - 01 - 15),
            date!(2026 - 02 - 14),
            InvoiceStatus::Overdue,
            &[("Emergency visit", 48_000), ("X-ray", 15_500), ("Cast", 9_000)],
        ),
        invoice(
            6,
            3,
            date!(2026 - 03 - 04),
            date!(2026 - 04 - 03),
            InvoiceStatus::Pending,
            &[("Pediatric visit", 15_000), ("Nebulizer", 6_800)],
        ),
    ]
}

fn payroll() -> Vec<PayrollEntry> {
    [
        (1, 1, 520_000, 25_000, 61_000, true),
        (2, 2, 545_000, 40_000, 64_500, true),
        (3, 3, 510_000, 0, 59_800, true),
        (4, 4, 380_000, 0, 41_200, true),
        (5, 5, 470_000, 15_000, 53_900, false),
        (6, 6, 610_000, 30_000, 72_400, false),
        (7, 7, 690_000, 50_000, 81_700, false),
        (8, 8, 340_000, 0, 36_100, false),
    ]
    .into_iter()
    .map(
        |(id, staff, base_cents, bonus_cents, deductions_cents, paid)| PayrollEntry {
            id: PayrollEntryId::new(id),
            staff_id: StaffId::new(staff),
            period: date!(2026 - 02 - 01),
            base_cents,
            bonus_cents,
            deductions_cents,
            paid,
        },
    )
    .collect()
}

fn leave_types() -> Vec<LeaveType> {
    [
        (1, "Annual", 20, true),
        (2, "Sick", 10, true),
        (3, "Parental", 90, true),
        (4, "Unpaid", 30, false),
    ]
    .into_iter()
    .map(|(id, name, days_per_year, paid)| LeaveType {
        id: LeaveTypeId::new(id),
        name: name.to_owned(),
        days_per_year,
        paid,
    })
    .collect()
}

fn leave_requests() -> Vec<LeaveRequest> {
    [
        (1, 3, 1, date!(2026 - 03 - 16), date!(2026 - 03 - 20), LeaveStatus::Approved),
        (2, 5, 2, date!(2026 - 03 - 04), date!(2026 - 03 - 05), LeaveStatus::Approved),
        (3, 8, 1, date!(2026 - 04 - 06), date!(2026 - 04 - 10), LeaveStatus::Pending),
        (4, 2, 3, date!(2026 - 05 - 01), date!(2026 - 07 - 29), LeaveStatus::Pending),
        (5, 10, 4, date!(2026 - 03 - 23), date!(2026 - 03 - 27), LeaveStatus::Rejected),
    ]
    .into_iter()
    .map(|(id, staff, leave_type, start, end, status)| LeaveRequest {
        id: LeaveRequestId::new(id),
        staff_id: StaffId::new(staff),
        leave_type_id: LeaveTypeId::new(leave_type),
        start,
        end,
        status,
    })
    .collect()
}

fn attendance() -> Vec<AttendanceRecord> {
    use AttendanceStatus::{Absent, Late, OnLeave, Present};

    let statuses = [
        Present, Present, Late, Present, OnLeave, Present, Present, Absent, Present, Late,
    ];
    statuses
        .into_iter()
        .zip(1..)
        .map(|(status, id)| AttendanceRecord {
            id: AttendanceRecordId::new(id),
            staff_id: StaffId::new(id),
            date: date!(2026 - 03 - 05),
            status,
        })
        .collect()
}

fn notifications() -> Vec<Notification> {
    [
        (1, "Critical patient", "Robert Fields moved to ICU monitoring.", date!(2026 - 03 - 01), false),
        (2, "Invoice overdue", "INV-2026-0003 is past its due date.", date!(2026 - 03 - 13), false),
        (3, "Leave request", "Jamie Ortiz requested annual leave.", date!(2026 - 03 - 04), false),
        (4, "Schedule change", "Dr. Marcus Webb is unavailable this week.", date!(2026 - 03 - 02), true),
        (5, "Supplies delivered", "Pharmacy restock received.", date!(2026 - 03 - 03), true),
    ]
    .into_iter()
    .map(|(id, title, body, created_on, read)| Notification {
        id: NotificationId::new(id),
        title: title.to_owned(),
        body: body.to_owned(),
        created_on,
        read,
    })
    .collect()
}
