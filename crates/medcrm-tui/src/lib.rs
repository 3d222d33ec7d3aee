// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use medcrm_app::{
    AppCommand, AppEvent, AppMode, AppState, AppointmentStatus, ChatAssistant, ChatSender,
    ChatVisibility, DepartmentId, DoctorId, FormDraft, GenerationRequest, InvoiceStatus,
    ListViewState, PatientStatus, ReplyOutcome, Section, SectionGroup, SendRejected, StaffId,
    StaffMember, StaffRole, TransactionKind, filter_appointments, filter_doctors,
    filter_invoices, filter_patients, filter_staff, filter_transactions, form_title,
    matches_query, remove_staff,
};
use medcrm_data::{APP_NAME, MockDataset, describe_view, format_cents, format_date, format_time};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use std::collections::BTreeMap;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);
const PAGE_ROWS: isize = 10;
const TRANSCRIPT_TAIL: usize = 12;
const SIDEBAR_WIDTH: u16 = 22;

const SETTINGS: [(&str, bool); 5] = [
    ("email notifications", true),
    ("sms appointment reminders", true),
    ("two-factor sign-in", false),
    ("compact tables", false),
    ("auto-assign new patients", false),
];

/// The seam between the terminal front end and whatever backs it: the
/// dataset to render and the generation call the chat overlay makes.
pub trait AppRuntime {
    fn dataset(&self) -> &MockDataset;

    /// Runs one generation call to completion.
    fn generate_reply(&mut self, request: &GenerationRequest) -> ReplyOutcome;

    /// Starts a generation call whose outcome arrives later as
    /// [`InternalEvent::ChatReply`]. The default runs it inline.
    fn spawn_generation(
        &mut self,
        request_id: u64,
        request: GenerationRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self.generate_reply(&request);
        tx.send(InternalEvent::ChatReply {
            request_id,
            outcome,
        })
        .map_err(|_| anyhow!("chat event channel closed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    ChatReply { request_id: u64, outcome: ReplyOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SettingsUiState {
    cursor: usize,
    enabled: [bool; SETTINGS.len()],
}

impl Default for SettingsUiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            enabled: SETTINGS.map(|(_, enabled)| enabled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ChatUiState {
    input: String,
    assistant: ChatAssistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    list: ListViewState,
    staff: Vec<StaffMember>,
    form: Option<FormDraft>,
    settings: SettingsUiState,
    chat: ChatUiState,
    help_visible: bool,
    status_token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableRowProjection {
    row_id: i64,
    cells: Vec<String>,
    details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableProjection {
    title: String,
    columns: Vec<&'static str>,
    rows: Vec<TableRowProjection>,
}

fn row(row_id: i64, cells: Vec<String>) -> TableRowProjection {
    TableRowProjection {
        row_id,
        cells,
        details: Vec::new(),
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();
    let mut view_data = ViewData::default();
    reset_section_view(state.active_section, &mut view_data, runtime.dataset());

    let result = (|| -> Result<()> {
        loop {
            process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);
            terminal
                .draw(|frame| render(frame, state, runtime.dataset(), &view_data))
                .context("draw frame")?;

            if !event::poll(POLL_INTERVAL).context("poll terminal events")? {
                continue;
            }
            let Event::Key(key) = event::read().context("read terminal event")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                break;
            }
        }
        Ok(())
    })();

    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    internal_rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = internal_rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } => {
                if token == view_data.status_token {
                    state.dispatch(AppCommand::ClearStatus);
                }
            }
            InternalEvent::ChatReply {
                request_id,
                outcome,
            } => {
                if !view_data.chat.assistant.finish(request_id, &outcome) {
                    tracing::debug!(request_id, "dropping reply for a request no longer in flight");
                    continue;
                }
                match &outcome {
                    ReplyOutcome::Generated(_) => {}
                    ReplyOutcome::Failed(detail) => emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("chat failed: {detail}"),
                    ),
                    ReplyOutcome::CredentialsMissing => emit_status(
                        state,
                        view_data,
                        internal_tx,
                        "chat unavailable: set [llm].api_key or MEDCRM_API_KEY",
                    ),
                }
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let tx = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = tx.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.wrapping_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in &events {
        if let AppEvent::SectionChanged(section) = event {
            tracing::debug!(section = section.as_str(), "section changed");
            reset_section_view(*section, view_data, runtime.dataset());
        }
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.wrapping_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

// Everything a page view owns is thrown away on navigation.
fn reset_section_view(section: Section, view_data: &mut ViewData, data: &MockDataset) {
    view_data.list = ListViewState::default();
    view_data.staff = if section == Section::Staff {
        data.staff.clone()
    } else {
        Vec::new()
    };
    view_data.form = section.form_kind().map(FormDraft::new);
    view_data.settings = SettingsUiState::default();
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return true;
    }
    if ctrl && key.code == KeyCode::Char('t') {
        let command = match state.chat {
            ChatVisibility::Visible => AppCommand::CloseChat,
            ChatVisibility::Hidden => AppCommand::OpenChat,
        };
        view_data.help_visible = false;
        dispatch_and_refresh(state, runtime, view_data, internal_tx, command);
        return false;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.chat == ChatVisibility::Visible {
        handle_chat_overlay_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.mode == AppMode::Search {
        handle_search_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.form.is_some() && handle_form_key(state, view_data, internal_tx, key) {
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key);
    false
}

fn handle_chat_overlay_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseChat);
        }
        KeyCode::Enter => submit_chat_input(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            view_data.chat.input.pop();
        }
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            view_data.chat.input.push(ch);
        }
        _ => {}
    }
}

fn submit_chat_input<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let context_hint = describe_view(state.active_section, state.profile_doctor, runtime.dataset());
    let pending = match view_data
        .chat
        .assistant
        .begin_send(&view_data.chat.input, &context_hint)
    {
        Ok(pending) => pending,
        Err(SendRejected::Empty) => {
            view_data.chat.input.clear();
            return;
        }
        Err(SendRejected::Busy) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                "assistant is still replying, wait for it before sending again",
            );
            return;
        }
    };
    view_data.chat.input.clear();

    let request_id = pending.request_id;
    tracing::info!(
        request_id,
        section = state.active_section.as_str(),
        chars = pending.request.user_message.chars().count(),
        "chat send"
    );
    if let Err(error) = runtime.spawn_generation(request_id, pending.request, internal_tx.clone())
    {
        tracing::warn!(request_id, error = %error, "chat generation did not start");
        let detail = error.to_string();
        view_data
            .chat
            .assistant
            .finish(request_id, &ReplyOutcome::Failed(detail.clone()));
        emit_status(state, view_data, internal_tx, format!("chat failed: {detail}"));
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.list.query.clear();
            view_data.list.cursor = 0;
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::EndSearch);
        }
        KeyCode::Enter => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::EndSearch);
        }
        KeyCode::Backspace => {
            view_data.list.query.pop();
            view_data.list.cursor = 0;
        }
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            view_data.list.query.push(ch);
            view_data.list.cursor = 0;
        }
        _ => {}
    }
}

/// Returns true when the form consumed the key.
fn handle_form_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let Some(draft) = view_data.form.as_mut() else {
        return false;
    };
    match key.code {
        KeyCode::Up => draft.move_field(-1),
        KeyCode::Down => draft.move_field(1),
        KeyCode::Backspace => draft.pop_char(),
        KeyCode::Esc => {
            let kind = draft.kind;
            view_data.form = Some(FormDraft::new(kind));
            emit_status(state, view_data, internal_tx, "form cleared");
        }
        KeyCode::Enter => {
            let kind = draft.kind;
            let message = match draft.validate() {
                Ok(()) => {
                    view_data.form = Some(FormDraft::new(kind));
                    format!("{} looks good (demo data, nothing saved)", form_title(kind))
                }
                Err(error) => format!("cannot submit {}: {error}", form_title(kind)),
            };
            emit_status(state, view_data, internal_tx, message);
        }
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            draft.push_char(ch);
        }
        _ => return false,
    }
    true
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let section = state.active_section;
    match key.code {
        KeyCode::Tab => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::NextSection);
        }
        KeyCode::BackTab => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::PrevSection);
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('@') => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenChat);
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if let Some(group) = section_groups().get(index).copied() {
                let target = first_section_in(group);
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::Navigate(target),
                );
            }
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, runtime, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, runtime, view_data, -1),
        KeyCode::PageDown => move_cursor(state, runtime, view_data, PAGE_ROWS),
        KeyCode::PageUp => move_cursor(state, runtime, view_data, -PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => move_cursor(state, runtime, view_data, isize::MIN / 2),
        KeyCode::Char('G') | KeyCode::End => move_cursor(state, runtime, view_data, isize::MAX / 2),
        KeyCode::Char('/') => {
            if is_table_section(section) {
                dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::BeginSearch);
            } else {
                emit_status(state, view_data, internal_tx, "nothing to search here");
            }
        }
        KeyCode::Char('f') => {
            let options = filter_labels(section, runtime.dataset());
            if options.is_empty() {
                emit_status(state, view_data, internal_tx, "no filter for this view");
            } else {
                view_data.list.cycle_filter(options.len());
                let label = active_filter_label(section, view_data, runtime.dataset());
                emit_status(state, view_data, internal_tx, format!("filter: {label}"));
            }
        }
        KeyCode::Char('s') => open_schedule(state, runtime, view_data, internal_tx),
        KeyCode::Char('x') if section == Section::Staff => {
            remove_selected_staff(state, runtime, view_data, internal_tx);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            activate_selection(state, runtime, view_data, internal_tx);
        }
        KeyCode::Esc => {
            let back_to_doctors = section == Section::DoctorProfile
                || (section == Section::Appointments && state.schedule_doctor.is_some());
            let command = if back_to_doctors {
                AppCommand::Navigate(Section::Doctors)
            } else {
                AppCommand::ClearStatus
            };
            dispatch_and_refresh(state, runtime, view_data, internal_tx, command);
        }
        _ => {}
    }
}

fn move_cursor<R: AppRuntime>(
    state: &AppState,
    runtime: &R,
    view_data: &mut ViewData,
    delta: isize,
) {
    if state.active_section == Section::Settings {
        let max = SETTINGS.len() as isize - 1;
        view_data.settings.cursor =
            (view_data.settings.cursor as isize).saturating_add(delta).clamp(0, max) as usize;
        return;
    }
    let len = project_table(state, view_data, runtime.dataset()).map_or(0, |table| table.rows.len());
    view_data.list.move_cursor(delta, len);
}

fn selected_row_id(state: &AppState, view_data: &ViewData, data: &MockDataset) -> Option<i64> {
    let table = project_table(state, view_data, data)?;
    table.rows.get(view_data.list.cursor).map(|row| row.row_id)
}

fn open_schedule<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let doctor = match state.active_section {
        Section::Doctors => {
            selected_row_id(state, view_data, runtime.dataset()).map(DoctorId::new)
        }
        Section::DoctorProfile => state.profile_doctor,
        _ => return,
    };
    match doctor {
        Some(doctor_id) => dispatch_and_refresh(
            state,
            runtime,
            view_data,
            internal_tx,
            AppCommand::ViewDoctorSchedule(doctor_id),
        ),
        None => emit_status(state, view_data, internal_tx, "no doctor selected"),
    }
}

fn remove_selected_staff<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(staff_id) = selected_row_id(state, view_data, runtime.dataset()) else {
        emit_status(state, view_data, internal_tx, "no staff member selected");
        return;
    };
    let Some(removed) = remove_staff(&mut view_data.staff, StaffId::new(staff_id)) else {
        return;
    };
    let len = project_table(state, view_data, runtime.dataset()).map_or(0, |table| table.rows.len());
    view_data.list.clamp_cursor(len);
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("removed {} from this view", removed.name),
    );
}

fn activate_selection<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.active_section {
        Section::Doctors => {
            match selected_row_id(state, view_data, runtime.dataset()) {
                Some(doctor_id) => dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::ViewDoctorProfile(DoctorId::new(doctor_id)),
                ),
                None => emit_status(state, view_data, internal_tx, "no doctor selected"),
            }
        }
        Section::Departments | Section::Invoices => {
            let Some(row_id) = selected_row_id(state, view_data, runtime.dataset()) else {
                return;
            };
            let expanded = view_data.list.toggle_expanded(row_id);
            let message = if expanded { "expanded" } else { "collapsed" };
            emit_status(state, view_data, internal_tx, message);
        }
        Section::Settings => {
            let cursor = view_data.settings.cursor;
            let Some(enabled) = view_data.settings.enabled.get_mut(cursor) else {
                return;
            };
            *enabled = !*enabled;
            let value = if *enabled { "on" } else { "off" };
            let label = SETTINGS[cursor].0;
            emit_status(state, view_data, internal_tx, format!("{label}: {value}"));
        }
        _ => {}
    }
}

fn section_groups() -> Vec<SectionGroup> {
    let mut groups = Vec::new();
    for section in Section::ALL {
        let group = section.group();
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

fn first_section_in(group: SectionGroup) -> Section {
    Section::ALL
        .into_iter()
        .find(|section| section.group() == group)
        .unwrap_or(Section::AdminDashboard)
}

fn is_table_section(section: Section) -> bool {
    matches!(
        section,
        Section::Patients
            | Section::Doctors
            | Section::Appointments
            | Section::Departments
            | Section::Staff
            | Section::Attendance
            | Section::Leaves
            | Section::Payroll
            | Section::Accounts
            | Section::Expenses
            | Section::Invoices
            | Section::Payments
            | Section::Notifications
    )
}

fn department_ids(data: &MockDataset) -> Vec<DepartmentId> {
    data.departments.iter().map(|department| department.id).collect()
}

fn filter_labels(section: Section, data: &MockDataset) -> Vec<String> {
    fn labels<T: Copy>(options: &[T], label: impl Fn(T) -> &'static str) -> Vec<String> {
        options.iter().map(|option| label(*option).to_owned()).collect()
    }
    match section {
        Section::Patients => labels(&PatientStatus::ALL, PatientStatus::as_str),
        Section::Doctors => data
            .departments
            .iter()
            .map(|department| department.name.clone())
            .collect(),
        Section::Staff => labels(&StaffRole::ALL, StaffRole::as_str),
        Section::Appointments => labels(&AppointmentStatus::ALL, AppointmentStatus::as_str),
        Section::Invoices => labels(&InvoiceStatus::ALL, InvoiceStatus::as_str),
        Section::Accounts => labels(&TransactionKind::ALL, TransactionKind::as_str),
        _ => Vec::new(),
    }
}

fn active_filter_label(section: Section, view_data: &ViewData, data: &MockDataset) -> String {
    view_data
        .list
        .filter
        .checked_sub(1)
        .and_then(|index| filter_labels(section, data).get(index).cloned())
        .unwrap_or_else(|| "all".to_owned())
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_owned()
}

fn project_table(state: &AppState, view_data: &ViewData, data: &MockDataset) -> Option<TableProjection> {
    let list = &view_data.list;
    let query = list.query.as_str();
    let section = state.active_section;
    let (columns, rows): (Vec<&'static str>, Vec<TableRowProjection>) = match section {
        Section::Patients => (
            vec!["id", "name", "age", "sex", "blood", "condition", "status", "doctor", "since"],
            filter_patients(&data.patients, query, list.selected(&PatientStatus::ALL))
                .into_iter()
                .map(|patient| {
                    row(
                        patient.id.get(),
                        vec![
                            patient.id.get().to_string(),
                            patient.name.clone(),
                            patient.age.to_string(),
                            patient.gender.clone(),
                            patient.blood_group.clone(),
                            patient.condition.clone(),
                            patient.status.as_str().to_owned(),
                            patient
                                .doctor_id
                                .map_or_else(|| "-".to_owned(), |id| data.doctor_name(id).to_owned()),
                            format_date(patient.admitted_on),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Doctors => (
            vec!["id", "name", "specialty", "department", "rating", "exp", "fee", "on duty"],
            filter_doctors(&data.doctors, query, list.selected(&department_ids(data)))
                .into_iter()
                .map(|doctor| {
                    row(
                        doctor.id.get(),
                        vec![
                            doctor.id.get().to_string(),
                            doctor.name.clone(),
                            doctor.specialty.clone(),
                            data.department_name(doctor.department_id).to_owned(),
                            format!("{:.1}", doctor.rating),
                            format!("{}y", doctor.experience_years),
                            format_cents(doctor.consultation_fee_cents),
                            yes_no(doctor.available),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Appointments => (
            vec!["id", "date", "time", "patient", "doctor", "reason", "status"],
            filter_appointments(
                &data.appointments,
                state.schedule_doctor,
                list.selected(&AppointmentStatus::ALL),
            )
            .into_iter()
            .filter(|appointment| {
                matches_query(
                    &[
                        data.patient_name(appointment.patient_id),
                        data.doctor_name(appointment.doctor_id),
                        appointment.reason.as_str(),
                    ],
                    query,
                )
            })
            .map(|appointment| {
                row(
                    appointment.id.get(),
                    vec![
                        appointment.id.get().to_string(),
                        format_date(appointment.date),
                        format_time(appointment.time),
                        data.patient_name(appointment.patient_id).to_owned(),
                        data.doctor_name(appointment.doctor_id).to_owned(),
                        appointment.reason.clone(),
                        appointment.status.as_str().to_owned(),
                    ],
                )
            })
            .collect(),
        ),
        Section::Departments => (
            vec!["id", "name", "head", "floor", "beds", "doctors"],
            data.departments
                .iter()
                .filter(|department| matches_query(&[department.name.as_str()], query))
                .map(|department| {
                    let doctors = data.doctors_in_department(department.id);
                    let head = department
                        .head_doctor_id
                        .map_or("-", |id| data.doctor_name(id));
                    let mut projected = row(
                        department.id.get(),
                        vec![
                            department.id.get().to_string(),
                            department.name.clone(),
                            head.to_owned(),
                            department.floor.to_string(),
                            department.beds.to_string(),
                            doctors.len().to_string(),
                        ],
                    );
                    if list.expanded.contains(&department.id.get()) {
                        projected.details.push(department.description.clone());
                        let names: Vec<&str> =
                            doctors.iter().map(|doctor| doctor.name.as_str()).collect();
                        projected.details.push(if names.is_empty() {
                            "no doctors assigned".to_owned()
                        } else {
                            format!("doctors: {}", names.join(", "))
                        });
                    }
                    projected
                })
                .collect(),
        ),
        Section::Staff => (
            vec!["id", "name", "role", "department", "shift", "phone", "joined"],
            filter_staff(&view_data.staff, query, list.selected(&StaffRole::ALL))
                .into_iter()
                .map(|member| {
                    row(
                        member.id.get(),
                        vec![
                            member.id.get().to_string(),
                            member.name.clone(),
                            member.role.as_str().to_owned(),
                            data.department_name(member.department_id).to_owned(),
                            member.shift.as_str().to_owned(),
                            member.phone.clone(),
                            format_date(member.joined_on),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Attendance => (
            vec!["date", "staff", "status"],
            data.attendance
                .iter()
                .filter(|record| {
                    matches_query(&[data.staff_name(record.staff_id), record.status.as_str()], query)
                })
                .map(|record| {
                    row(
                        record.id.get(),
                        vec![
                            format_date(record.date),
                            data.staff_name(record.staff_id).to_owned(),
                            record.status.as_str().to_owned(),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Leaves => (
            vec!["staff", "type", "from", "to", "days", "status"],
            data.leave_requests
                .iter()
                .filter(|request| matches_query(&[data.staff_name(request.staff_id)], query))
                .map(|request| {
                    let leave_type = data
                        .leave_type(request.leave_type_id)
                        .map_or(medcrm_data::UNKNOWN, |leave_type| leave_type.name.as_str());
                    row(
                        request.id.get(),
                        vec![
                            data.staff_name(request.staff_id).to_owned(),
                            leave_type.to_owned(),
                            format_date(request.start),
                            format_date(request.end),
                            ((request.end - request.start).whole_days() + 1).to_string(),
                            request.status.as_str().to_owned(),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Payroll => (
            vec!["staff", "period", "base", "bonus", "deductions", "net", "paid"],
            data.payroll
                .iter()
                .filter(|entry| matches_query(&[data.staff_name(entry.staff_id)], query))
                .map(|entry| {
                    row(
                        entry.id.get(),
                        vec![
                            data.staff_name(entry.staff_id).to_owned(),
                            format_date(entry.period),
                            format_cents(entry.base_cents),
                            format_cents(entry.bonus_cents),
                            format_cents(entry.deductions_cents),
                            format_cents(entry.net_cents()),
                            yes_no(entry.paid),
                        ],
                    )
                })
                .collect(),
        ),
        Section::Accounts | Section::Expenses | Section::Payments => {
            let kind = match section {
                Section::Expenses => Some(TransactionKind::Expense),
                Section::Payments => Some(TransactionKind::Income),
                _ => list.selected(&TransactionKind::ALL),
            };
            (
                vec!["date", "description", "category", "kind", "amount"],
                filter_transactions(&data.transactions, query, kind)
                    .into_iter()
                    .map(|transaction| {
                        row(
                            transaction.id.get(),
                            vec![
                                format_date(transaction.date),
                                transaction.description.clone(),
                                transaction.category.clone(),
                                transaction.kind.as_str().to_owned(),
                                format_cents(transaction.amount_cents),
                            ],
                        )
                    })
                    .collect(),
            )
        }
        Section::Invoices => (
            vec!["number", "patient", "issued", "due", "status", "total"],
            filter_invoices(&data.invoices, query, list.selected(&InvoiceStatus::ALL))
                .into_iter()
                .map(|invoice| {
                    let mut projected = row(
                        invoice.id.get(),
                        vec![
                            invoice.number.clone(),
                            data.patient_name(invoice.patient_id).to_owned(),
                            format_date(invoice.issued_on),
                            format_date(invoice.due_on),
                            invoice.status.as_str().to_owned(),
                            format_cents(invoice.total_cents()),
                        ],
                    );
                    if list.expanded.contains(&invoice.id.get()) {
                        projected.details = invoice
                            .lines
                            .iter()
                            .map(|line| {
                                format!("{}  {}", line.description, format_cents(line.amount_cents))
                            })
                            .collect();
                    }
                    projected
                })
                .collect(),
        ),
        Section::Notifications => (
            vec!["date", "title", "message", "state"],
            data.notifications
                .iter()
                .filter(|note| matches_query(&[note.title.as_str(), note.body.as_str()], query))
                .map(|note| {
                    row(
                        note.id.get(),
                        vec![
                            format_date(note.created_on),
                            note.title.clone(),
                            note.body.clone(),
                            if note.read { "read" } else { "new" }.to_owned(),
                        ],
                    )
                })
                .collect(),
        ),
        _ => return None,
    };

    let mut title = section.label().to_owned();
    if let Some(doctor_id) = state.schedule_doctor.filter(|_| section == Section::Appointments) {
        title = format!("schedule: {}", data.doctor_name(doctor_id));
    }
    if !filter_labels(section, data).is_empty() && list.filter > 0 {
        title.push_str(&format!(" [{}]", active_filter_label(section, view_data, data)));
    }
    if !query.is_empty() {
        title.push_str(&format!(" /{query}"));
    }
    Some(TableProjection {
        title,
        columns,
        rows,
    })
}

fn section_text(state: &AppState, view_data: &ViewData, data: &MockDataset) -> String {
    match state.active_section {
        Section::AdminDashboard => admin_dashboard_text(data),
        Section::DoctorDashboard => doctor_dashboard_text(data),
        Section::PatientDashboard => patient_dashboard_text(data),
        Section::DoctorProfile => doctor_profile_text(state.profile_doctor, data),
        Section::Reports => reports_text(data),
        Section::Profile => [
            "signed in as: Administrator",
            "email: admin@clinic.example",
            "role: hospital administrator",
            "",
            "demo session: records come from the bundled sample dataset",
        ]
        .join("\n"),
        Section::Settings => settings_text(&view_data.settings),
        _ => match &view_data.form {
            Some(draft) => form_text(draft),
            None => String::new(),
        },
    }
}

fn admin_dashboard_text(data: &MockDataset) -> String {
    let totals = data.totals();
    let next = data.next_appointment().map_or_else(
        || "none scheduled".to_owned(),
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
    [
        format!("patients              {}", totals.patients),
        format!(
            "doctors               {} ({} on duty)",
            totals.doctors, totals.available_doctors
        ),
        format!(
            "staff                 {} across {} departments",
            totals.staff, totals.departments
        ),
        format!("upcoming appointments {}", totals.upcoming_appointments),
        format!("next appointment      {next}"),
        format!(
            "outstanding invoices  {} ({})",
            totals.outstanding_invoices,
            format_cents(data.outstanding_invoice_cents())
        ),
        format!("balance               {}", format_cents(data.balance_cents())),
        format!("unread alerts         {}", totals.unread_notifications),
    ]
    .join("\n")
}

fn doctor_dashboard_text(data: &MockDataset) -> String {
    if data.doctors.is_empty() {
        return "no doctors on record".to_owned();
    }
    data.doctors
        .iter()
        .map(|doctor| {
            let upcoming = data
                .appointments_for_doctor(doctor.id)
                .into_iter()
                .filter(|appointment| appointment.status.is_upcoming())
                .count();
            format!(
                "{:<22} {:<18} {} upcoming, {}",
                doctor.name,
                doctor.specialty,
                upcoming,
                if doctor.available { "on duty" } else { "off duty" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn patient_dashboard_text(data: &MockDataset) -> String {
    let mut lines: Vec<String> = PatientStatus::ALL
        .iter()
        .map(|status| {
            let count = data
                .patients
                .iter()
                .filter(|patient| patient.status == *status)
                .count();
            format!("{:<12} {count}", status.as_str())
        })
        .collect();
    let critical: Vec<&str> = data
        .patients
        .iter()
        .filter(|patient| patient.status == PatientStatus::Critical)
        .map(|patient| patient.name.as_str())
        .collect();
    lines.push(String::new());
    lines.push(if critical.is_empty() {
        "no critical patients".to_owned()
    } else {
        format!("critical: {}", critical.join(", "))
    });
    lines.join("\n")
}

fn doctor_profile_text(selected: Option<DoctorId>, data: &MockDataset) -> String {
    let Some(doctor) = selected.and_then(|id| data.doctor(id)) else {
        return "no doctor selected: pick one in doctors and press enter".to_owned();
    };
    let mut lines = vec![
        doctor.name.clone(),
        format!("specialty   {}", doctor.specialty),
        format!("department  {}", data.department_name(doctor.department_id)),
        format!("experience  {} years", doctor.experience_years),
        format!("rating      {:.1}", doctor.rating),
        format!("fee         {}", format_cents(doctor.consultation_fee_cents)),
        format!("phone       {}", doctor.phone),
        format!("email       {}", doctor.email),
        format!(
            "status      {}",
            if doctor.available { "on duty" } else { "off duty" }
        ),
        String::new(),
        "appointments:".to_owned(),
    ];
    let appointments = data.appointments_for_doctor(doctor.id);
    if appointments.is_empty() {
        lines.push("  none".to_owned());
    }
    for appointment in appointments {
        lines.push(format!(
            "  {} {}  {}  {}",
            format_date(appointment.date),
            format_time(appointment.time),
            data.patient_name(appointment.patient_id),
            appointment.status.as_str(),
        ));
    }
    lines.join("\n")
}

fn reports_text(data: &MockDataset) -> String {
    let mut lines = Vec::new();
    for kind in TransactionKind::ALL {
        let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
        for transaction in data.transactions.iter().filter(|txn| txn.kind == kind) {
            *by_category.entry(transaction.category.as_str()).or_default() +=
                transaction.amount_cents;
        }
        lines.push(format!(
            "{} by category ({} total)",
            kind.as_str(),
            format_cents(data.transaction_total_cents(kind))
        ));
        if by_category.is_empty() {
            lines.push("  none".to_owned());
        }
        for (category, cents) in by_category {
            lines.push(format!("  {category:<18} {}", format_cents(cents)));
        }
        lines.push(String::new());
    }
    lines.push(format!("balance {}", format_cents(data.balance_cents())));
    lines.push(format!(
        "payroll {} net",
        format_cents(data.payroll_net_cents())
    ));
    lines.join("\n")
}

fn settings_text(settings: &SettingsUiState) -> String {
    SETTINGS
        .iter()
        .zip(settings.enabled)
        .enumerate()
        .map(|(index, ((label, _), enabled))| {
            let marker = if index == settings.cursor { ">" } else { " " };
            let check = if enabled { "x" } else { " " };
            format!("{marker} [{check}] {label}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn form_text(draft: &FormDraft) -> String {
    let mut lines = vec![form_title(draft.kind).to_owned(), String::new()];
    for (index, (spec, value)) in draft.specs().iter().zip(&draft.values).enumerate() {
        let marker = if index == draft.field_index { ">" } else { " " };
        lines.push(format!("{marker} {:<26} {value}", spec.label));
    }
    lines.join("\n")
}

fn section_hints(state: &AppState, view_data: &ViewData) -> &'static str {
    if state.mode == AppMode::Search {
        return "type to filter | enter keep | esc clear";
    }
    if view_data.form.is_some() {
        return "up/down field | enter submit | esc clear | tab next | ctrl+t chat";
    }
    match state.active_section {
        Section::Doctors => "enter profile | s schedule | / search | f dept | @ chat | ? help",
        Section::DoctorProfile => "s schedule | esc doctors | @ chat | ? help",
        Section::Appointments if state.schedule_doctor.is_some() => {
            "esc doctors | f status | / search | @ chat | ? help"
        }
        Section::Staff => "x remove | / search | f role | @ chat | ? help",
        Section::Departments | Section::Invoices => "enter expand | / search | @ chat | ? help",
        Section::Settings => "j/k move | enter toggle | @ chat | ? help",
        _ => "tab next | 1-7 group | @ chat | ? help | ctrl+q quit",
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Search => "SEARCH",
    };
    let mut text = match &state.status_line {
        Some(status) => format!("{mode} | {status} | {}", section_hints(state, view_data)),
        None => format!("{mode} | {}", section_hints(state, view_data)),
    };
    if view_data.chat.assistant.is_busy() {
        text.push_str(" | assistant replying");
    }
    text
}

fn help_overlay_text() -> &'static str {
    "global: tab/shift+tab section | 1-7 jump to group | ? help | ctrl+q quit\n\
     lists: j/k move | g/G top/bottom | / search | f filter | esc back\n\
     doctors: enter profile | s schedule\n\
     staff: x remove row (this view only)\n\
     departments, invoices: enter expand\n\
     forms: type | up/down field | enter submit | esc clear\n\
     settings: enter or space toggle\n\
     chat: @ or ctrl+t open | enter send | esc close\n\
     \n\
     sample data only: nothing is saved"
}

fn render_chat_overlay_text(state: &AppState, chat: &ChatUiState) -> String {
    let transcript = chat.assistant.transcript();
    let start = transcript.len().saturating_sub(TRANSCRIPT_TAIL);
    let mut lines: Vec<String> = transcript[start..]
        .iter()
        .map(|message| {
            let who = match message.sender {
                ChatSender::User => "you",
                ChatSender::Assistant => "assistant",
            };
            format!("{who}: {}", message.text)
        })
        .collect();
    if chat.assistant.is_busy() {
        lines.push("assistant: ...".to_owned());
    }
    lines.push(String::new());
    lines.push(format!("> {}", chat.input));
    lines.push(format!(
        "viewing {} | enter send | esc close",
        state.active_section.label()
    ));
    lines.join("\n")
}

fn render(frame: &mut Frame<'_>, state: &AppState, data: &MockDataset, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let groups = section_groups();
    let active_group = state.active_section.group();
    let titles: Vec<Line<'_>> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| Line::from(format!("{} {}", index + 1, group.label())))
        .collect();
    let selected = groups
        .iter()
        .position(|group| *group == active_group)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(APP_NAME))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(layout[1]);
    render_sidebar(frame, state, body[0]);

    match project_table(state, view_data, data) {
        Some(table) => render_table(frame, body[1], &table, view_data.list.cursor),
        None => {
            let title = match &view_data.form {
                Some(draft) => form_title(draft.kind),
                None => state.active_section.label(),
            };
            let paragraph = Paragraph::new(section_text(state, view_data, data))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, body[1]);
        }
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if state.chat == ChatVisibility::Visible {
        let area = centered_rect(70, 45, frame.area());
        frame.render_widget(Clear, area);
        let chat = Paragraph::new(render_chat_overlay_text(state, &view_data.chat))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("assistant"));
        frame.render_widget(chat, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().borders(Borders::ALL).title("help"));
        frame.render_widget(help, area);
    }
}

fn render_sidebar(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let group = state.active_section.group();
    let lines: Vec<Line<'_>> = Section::ALL
        .into_iter()
        .filter(|section| section.group() == group)
        .map(|section| {
            if section == state.active_section {
                Line::styled(
                    format!("> {}", section.label()),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(format!("  {}", section.label()))
            }
        })
        .collect();
    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(group.label()));
    frame.render_widget(sidebar, area);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, table: &TableProjection, cursor: usize) {
    let header = Row::new(table.columns.iter().map(|column| {
        Cell::from(*column).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let mut rows = Vec::new();
    for (index, projected) in table.rows.iter().enumerate() {
        let mut row = Row::new(projected.cells.iter().cloned().map(Cell::from));
        if index == cursor {
            row = row.style(Style::default().bg(Color::DarkGray));
        }
        rows.push(row);
        for detail in &projected.details {
            rows.push(
                Row::new(vec![Cell::from(""), Cell::from(format!("-> {detail}"))])
                    .style(Style::default().fg(Color::Gray)),
            );
        }
    }
    if rows.is_empty() {
        rows.push(Row::new(vec![Cell::from(""), Cell::from("no matching rows")]));
    }

    let widths = table
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, table.columns.len().max(1) as u32));
    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", table.title, table.rows.len())),
    );
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
