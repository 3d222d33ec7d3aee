// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, DoctorId, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_section: Section,
    pub schedule_doctor: Option<DoctorId>,
    pub profile_doctor: Option<DoctorId>,
    pub chat: ChatVisibility,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_section: Section::AdminDashboard,
            schedule_doctor: None,
            profile_doctor: None,
            chat: ChatVisibility::Hidden,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Section),
    NextSection,
    PrevSection,
    ViewDoctorSchedule(DoctorId),
    ViewDoctorProfile(DoctorId),
    BeginSearch,
    EndSearch,
    OpenChat,
    CloseChat,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    SectionChanged(Section),
    ScheduleSelectionChanged(Option<DoctorId>),
    ProfileSelectionChanged(Option<DoctorId>),
    ChatVisibilityChanged(ChatVisibility),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn starting_at(section: Section) -> Self {
        Self {
            active_section: section,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(section) => self.navigate(section),
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::ViewDoctorSchedule(doctor_id) => {
                let mut events = Vec::new();
                if self.schedule_doctor != Some(doctor_id) {
                    self.schedule_doctor = Some(doctor_id);
                    events.push(AppEvent::ScheduleSelectionChanged(self.schedule_doctor));
                }
                events.extend(self.navigate(Section::Appointments));
                events
            }
            AppCommand::ViewDoctorProfile(doctor_id) => {
                let mut events = Vec::new();
                if self.profile_doctor != Some(doctor_id) {
                    self.profile_doctor = Some(doctor_id);
                    events.push(AppEvent::ProfileSelectionChanged(self.profile_doctor));
                }
                events.extend(self.navigate(Section::DoctorProfile));
                events
            }
            AppCommand::BeginSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::EndSearch => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenChat => {
                self.chat = ChatVisibility::Visible;
                vec![
                    AppEvent::ChatVisibilityChanged(self.chat),
                    self.set_status("chat open"),
                ]
            }
            AppCommand::CloseChat => {
                self.chat = ChatVisibility::Hidden;
                vec![
                    AppEvent::ChatVisibilityChanged(self.chat),
                    self.set_status("chat hidden"),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    // Selections survive only while their owning section stays active.
    fn navigate(&mut self, section: Section) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if section != Section::Appointments && self.schedule_doctor.take().is_some() {
            events.push(AppEvent::ScheduleSelectionChanged(None));
        }
        if section != Section::DoctorProfile && self.profile_doctor.take().is_some() {
            events.push(AppEvent::ProfileSelectionChanged(None));
        }
        if self.mode != AppMode::Nav {
            self.mode = AppMode::Nav;
            events.push(AppEvent::ModeChanged(self.mode));
        }
        self.active_section = section;
        events.push(AppEvent::SectionChanged(section));
        events
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let sections = Section::ALL;
        let current = sections
            .iter()
            .position(|section| *section == self.active_section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.navigate(sections[next])
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
