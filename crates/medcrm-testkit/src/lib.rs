// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use medcrm_app::{
    Appointment, AppointmentId, AppointmentStatus, Department, DepartmentId, Doctor, DoctorId,
    Invoice, InvoiceId, InvoiceLine, InvoiceStatus, Patient, PatientId, PatientStatus, Shift,
    StaffId, StaffMember, StaffRole, Transaction, TransactionId, TransactionKind,
};
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use time::{Date, Month, Time};
use tiny_http::{Header, Response, Server};

const FIRST_NAMES: [&str; 20] = [
    "Ava", "Ben", "Chloe", "Dev", "Elif", "Farah", "Gabe", "Hana", "Ines", "Jonah", "Kofi",
    "Lena", "Mateo", "Nia", "Omar", "Pia", "Rosa", "Sven", "Tara", "Yusuf",
];

const LAST_NAMES: [&str; 20] = [
    "Abbott", "Bauer", "Castillo", "Dubois", "Eriksen", "Fischer", "Grant", "Hughes", "Iqbal",
    "Jensen", "Kowalski", "Larsen", "Mensah", "Novak", "Ortega", "Park", "Quist", "Rossi",
    "Suzuki", "Vance",
];

const CONDITIONS: [&str; 12] = [
    "Hypertension",
    "Type 2 diabetes",
    "Asthma",
    "Migraine",
    "Fractured ankle",
    "Pneumonia",
    "Arrhythmia",
    "Appendicitis",
    "Anemia",
    "Concussion",
    "Dermatitis",
    "Kidney stones",
];

const SPECIALTIES: [&str; 8] = [
    "Cardiologist",
    "Neurologist",
    "Orthopedic Surgeon",
    "Pediatrician",
    "Dermatologist",
    "Oncologist",
    "Radiologist",
    "General Practitioner",
];

const DEPARTMENTS: [&str; 8] = [
    "Cardiology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Dermatology",
    "Oncology",
    "Radiology",
    "General Medicine",
];

const VISIT_REASONS: [&str; 8] = [
    "Follow-up",
    "Initial consultation",
    "Lab results",
    "Medication review",
    "Post-op check",
    "Annual physical",
    "Imaging review",
    "Vaccination",
];

const BILLABLE_ITEMS: [(&str, i64, i64); 6] = [
    ("Consultation", 8_000, 30_000),
    ("Blood panel", 4_000, 12_000),
    ("X-ray", 9_000, 25_000),
    ("MRI scan", 60_000, 180_000),
    ("Ward stay (per night)", 45_000, 120_000),
    ("Medication", 1_500, 20_000),
];

const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of clinic records. The same seed yields the same rows;
/// ids count up from 1 per record kind.
#[derive(Debug, Clone)]
pub struct ClinicFaker {
    rng: DeterministicRng,
    next_patient: i64,
    next_doctor: i64,
    next_department: i64,
    next_staff: i64,
    next_appointment: i64,
    next_invoice: i64,
    next_transaction: i64,
}

impl ClinicFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_patient: 1,
            next_doctor: 1,
            next_department: 1,
            next_staff: 1,
            next_appointment: 1,
            next_invoice: 1,
            next_transaction: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn patient(&mut self) -> Patient {
        let id = take_id(&mut self.next_patient);
        Patient {
            id: PatientId::new(id),
            name: self.person_name(),
            age: self.int_range(1, 95) as u8,
            gender: if self.rng.bool() { "F" } else { "M" }.to_owned(),
            blood_group: self.pick(&BLOOD_GROUPS).to_owned(),
            phone: format!("555-{:04}", self.int_range(0, 9999)),
            condition: self.pick(&CONDITIONS).to_owned(),
            status: PatientStatus::ALL[self.rng.int_n(PatientStatus::ALL.len())],
            doctor_id: None,
            admitted_on: self.date_in_month(2026, Month::February),
        }
    }

    pub fn department(&mut self) -> Department {
        let id = take_id(&mut self.next_department);
        let name = DEPARTMENTS[(id as usize - 1) % DEPARTMENTS.len()];
        Department {
            id: DepartmentId::new(id),
            name: name.to_owned(),
            head_doctor_id: None,
            floor: self.int_range(0, 6) as u8,
            beds: self.int_range(10, 60) as u16,
            description: format!("{name} ward"),
        }
    }

    pub fn doctor(&mut self, department_id: DepartmentId) -> Doctor {
        let id = take_id(&mut self.next_doctor);
        let name = format!("Dr. {}", self.person_name());
        let email = format!(
            "{}@clinic.example",
            name.trim_start_matches("Dr. ").to_lowercase().replace(' ', ".")
        );
        Doctor {
            id: DoctorId::new(id),
            name,
            specialty: self.pick(&SPECIALTIES).to_owned(),
            department_id,
            rating: self.int_range(30, 50) as f32 / 10.0,
            experience_years: self.int_range(1, 35) as u8,
            phone: format!("555-{:04}", self.int_range(0, 9999)),
            email,
            available: self.rng.bool(),
            consultation_fee_cents: self.int_range(80, 400) * 100,
        }
    }

    pub fn staff_member(&mut self, department_id: DepartmentId) -> StaffMember {
        let id = take_id(&mut self.next_staff);
        let shifts = [Shift::Morning, Shift::Evening, Shift::Night];
        StaffMember {
            id: StaffId::new(id),
            name: self.person_name(),
            role: StaffRole::ALL[self.rng.int_n(StaffRole::ALL.len())],
            department_id,
            shift: shifts[self.rng.int_n(shifts.len())],
            phone: format!("555-{:04}", self.int_range(0, 9999)),
            joined_on: self.date_in_month(2022, Month::June),
        }
    }

    pub fn appointment(&mut self, patient_id: PatientId, doctor_id: DoctorId) -> Appointment {
        let id = take_id(&mut self.next_appointment);
        let hour = self.int_range(8, 17) as u8;
        let minute = [0, 15, 30, 45][self.rng.int_n(4)];
        Appointment {
            id: AppointmentId::new(id),
            patient_id,
            doctor_id,
            date: self.date_in_month(2026, Month::March),
            time: Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT),
            reason: self.pick(&VISIT_REASONS).to_owned(),
            status: AppointmentStatus::ALL[self.rng.int_n(AppointmentStatus::ALL.len())],
        }
    }

    pub fn invoice(&mut self, patient_id: PatientId) -> Invoice {
        let id = take_id(&mut self.next_invoice);
        let line_count = self.int_range(1, 3) as usize;
        let lines = (0..line_count)
            .map(|_| {
                let (description, min, max) = BILLABLE_ITEMS[self.rng.int_n(BILLABLE_ITEMS.len())];
                InvoiceLine {
                    description: description.to_owned(),
                    amount_cents: self.int_range(min, max),
                }
            })
            .collect();
        let issued_on = self.date_in_month(2026, Month::February);
        Invoice {
            id: InvoiceId::new(id),
            number: format!("INV-{id:05}"),
            patient_id,
            issued_on,
            due_on: issued_on.saturating_add(time::Duration::days(30)),
            status: InvoiceStatus::ALL[self.rng.int_n(InvoiceStatus::ALL.len())],
            lines,
        }
    }

    pub fn transaction(&mut self, kind: TransactionKind) -> Transaction {
        let id = take_id(&mut self.next_transaction);
        let (description, category) = match kind {
            TransactionKind::Income => ("Patient billing", "Patient services"),
            TransactionKind::Expense => ("Supply order", "Supplies"),
        };
        Transaction {
            id: TransactionId::new(id),
            date: self.date_in_month(2026, Month::March),
            description: description.to_owned(),
            category: category.to_owned(),
            kind,
            amount_cents: self.int_range(10_000, 2_000_000),
        }
    }

    pub fn date_in_month(&mut self, year: i32, month: Month) -> Date {
        let day = self.int_range(1, 28) as u8;
        Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

fn take_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// A request received by [`MockCompletionServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).context("parse captured request body")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    /// A non-streaming `chat/completions` reply carrying `content`.
    pub fn completion(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop",
            }],
        });
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn models(ids: &[&str]) -> Self {
        let data: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "object": "model"}))
            .collect();
        Self {
            status: 200,
            body: serde_json::json!({"object": "list", "data": data}).to_string(),
        }
    }

    /// An OpenAI-style error envelope.
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({
            "error": {"message": message, "type": "invalid_request_error"},
        });
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

/// Serves canned responses in order on `127.0.0.1`, one per request, and
/// records what it received.
pub struct MockCompletionServer {
    base_url: String,
    handle: JoinHandle<Result<Vec<CapturedRequest>>>,
}

impl MockCompletionServer {
    const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn start(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}/v1", server.server_addr());

        let handle = thread::spawn(move || {
            let mut captured = Vec::with_capacity(responses.len());
            for canned in responses {
                let Some(mut request) = server
                    .recv_timeout(Self::IDLE_TIMEOUT)
                    .context("receive mock request")?
                else {
                    break;
                };

                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .context("read mock request body")?;
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_owned());
                captured.push(CapturedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_owned(),
                    authorization,
                    body,
                });

                let content_type = Header::from_bytes("Content-Type", "application/json")
                    .map_err(|()| anyhow!("invalid content type header"))?;
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(content_type);
                request.respond(response).context("send mock response")?;
            }
            Ok(captured)
        });

        Ok(Self { base_url, handle })
    }

    /// Base URL including the `/v1` prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the canned responses to drain and returns the requests seen.
    pub fn finish(self) -> Result<Vec<CapturedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}

#[cfg(test)]
mod tests {
    use super::{ClinicFaker, MockResponse};
    use medcrm_app::{DepartmentId, PatientId, TransactionKind};
    use std::collections::BTreeSet;

    #[test]
    fn same_seed_same_records() {
        let mut left = ClinicFaker::new(42);
        let mut right = ClinicFaker::new(42);
        assert_eq!(left.patient(), right.patient());
        assert_eq!(
            left.doctor(DepartmentId::new(1)),
            right.doctor(DepartmentId::new(1))
        );
    }

    #[test]
    fn ids_count_up_per_kind() {
        let mut faker = ClinicFaker::new(7);
        let first = faker.patient();
        let second = faker.patient();
        let department = faker.department();
        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);
        assert_eq!(department.id.get(), 1);
    }

    #[test]
    fn doctor_fields_in_range() {
        let mut faker = ClinicFaker::new(3);
        for _ in 0..50 {
            let doctor = faker.doctor(DepartmentId::new(2));
            assert!((3.0..=5.0).contains(&doctor.rating));
            assert!((1..=35).contains(&doctor.experience_years));
            assert!(doctor.email.ends_with("@clinic.example"));
            assert_eq!(doctor.department_id, DepartmentId::new(2));
        }
    }

    #[test]
    fn invoices_have_lines_and_due_after_issue() {
        let mut faker = ClinicFaker::new(11);
        for _ in 0..20 {
            let invoice = faker.invoice(PatientId::new(1));
            assert!((1..=3).contains(&invoice.lines.len()));
            assert!(invoice.due_on > invoice.issued_on);
            assert!(invoice.total_cents() > 0);
        }
    }

    #[test]
    fn variety_across_seeds() {
        let names: BTreeSet<String> = (1..20)
            .map(|seed| ClinicFaker::new(seed).person_name())
            .collect();
        assert!(names.len() > 5);
    }

    #[test]
    fn transactions_keep_requested_kind() {
        let mut faker = ClinicFaker::new(5);
        assert_eq!(
            faker.transaction(TransactionKind::Expense).kind,
            TransactionKind::Expense
        );
    }

    #[test]
    fn completion_body_carries_content() {
        let response = MockResponse::completion("hi there");
        let value: serde_json::Value =
            serde_json::from_str(&response.body).expect("valid json body");
        assert_eq!(value["choices"][0]["message"]["content"], "hi there");
        assert_eq!(response.status, 200);
    }
}
