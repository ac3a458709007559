use iced::{
    Element, Length, Task, Color, Border, Subscription,
};
use iced::widget::{
    Column, Row, Container, Text, Button, TextInput, Scrollable, Space, rule,
};
use iced::window;

use gradebook::models::{Average, Student, StudentId};
use gradebook::storage::DATA_FILE;
use gradebook::{file_ops, utils, RecordStore, RosterError, RosterSession};
use chrono::{DateTime, Local};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const ACTIVITY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    IdChanged(String),
    NameChanged(String),
    GradeChanged(String),
    AddStudent,
    AddGrade,
    EditStudent,
    DeleteStudent,
    ToggleGrades,
    ToggleAverages,
    SaveNow,
    Export,
    ExportPathChosen(Option<PathBuf>),
    ExportFinished(Result<PathBuf, String>),
    ToggleTheme,
    CloseRequested(window::Id),
}

pub struct StudentManagerApp {
    // form fields
    id_input: String,
    name_input: String,
    grade_input: String,

    show_grades: bool,
    show_averages: bool,
    theme: Theme,

    // newest last
    activity: Vec<ActivityEntry>,

    // taken when the window closes so the save outcome can be reported
    session: Option<RosterSession>,
}

impl StudentManagerApp {
    pub fn new(path: impl Into<PathBuf>) -> (Self, Task<Message>) {
        (Self::with_session(RosterSession::open(path)), Task::none())
    }

    pub fn with_session(session: RosterSession) -> Self {
        let mut app = StudentManagerApp {
            id_input: String::new(),
            name_input: String::new(),
            grade_input: String::new(),
            show_grades: true,
            show_averages: false,
            theme: Theme::Light,
            activity: Vec::new(),
            session: None,
        };
        match session.load_error() {
            Some(e) => {
                let text = format!("Roster only partly loaded: {}", e);
                app.log(Severity::Error, text);
            }
            None => {
                let text = format!("Loaded {} students from {}", session.store().len(), session.path().display());
                app.log(Severity::Info, text);
            }
        }
        app.session = Some(session);
        app
    }

    pub fn subscription(&self) -> Subscription<Message> {
        window::close_requests().map(Message::CloseRequested)
    }

    pub fn store(&self) -> Option<&RecordStore> {
        self.session.as_ref().map(RosterSession::store)
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.activity.last()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::IdChanged(s) => self.id_input = s,
            Message::NameChanged(s) => self.name_input = s,
            Message::GradeChanged(s) => self.grade_input = s,
            Message::AddStudent => {
                let Some(id) = self.form_id() else {
                    return Task::none();
                };
                let name = utils::clean_name(&self.name_input);
                match self.with_store(|store| store.add_record(id, name)) {
                    Some(Ok(())) => {
                        self.log(Severity::Info, format!("Student {} added successfully.", id));
                        self.warn_if_not_persistable(id);
                    }
                    Some(Err(e)) => self.log_error(&e),
                    None => {}
                }
            }
            Message::AddGrade => {
                let Some(id) = self.form_id() else {
                    return Task::none();
                };
                let grade = match utils::parse_int_field("Grade", &self.grade_input) {
                    Ok(g) => g,
                    Err(msg) => {
                        self.log(Severity::Warning, msg);
                        return Task::none();
                    }
                };
                match self.with_store(|store| store.append_grade(id, grade)) {
                    Some(Ok(())) => {
                        self.log(Severity::Info, format!("Grade {} added for student {}.", grade, id));
                        self.grade_input.clear();
                    }
                    Some(Err(e)) => self.log_error(&e),
                    None => {}
                }
            }
            Message::EditStudent => {
                let Some(id) = self.form_id() else {
                    return Task::none();
                };
                let name = utils::clean_name(&self.name_input);
                match self.with_store(|store| store.rename_record(id, name)) {
                    Some(Ok(())) => {
                        self.log(Severity::Info, format!("Student {} name updated successfully.", id));
                        self.warn_if_not_persistable(id);
                    }
                    Some(Err(e)) => self.log_error(&e),
                    None => {}
                }
            }
            Message::DeleteStudent => {
                let Some(id) = self.form_id() else {
                    return Task::none();
                };
                match self.with_store(|store| store.remove_record(id)) {
                    Some(Ok(removed)) => {
                        self.log(Severity::Info, format!("Student {} ({}) deleted successfully.", id, removed.name));
                    }
                    Some(Err(e)) => self.log_error(&e),
                    None => {}
                }
            }
            Message::ToggleGrades => {
                self.show_grades = !self.show_grades;
            }
            Message::ToggleAverages => {
                self.show_averages = !self.show_averages;
            }
            Message::SaveNow => {
                let saved = self.session.as_ref().map(|s| s.save().map(|_| s.path().display().to_string()));
                match saved {
                    Some(Ok(path)) => self.log(Severity::Info, format!("Roster saved to {}.", path)),
                    Some(Err(e)) => self.log_error(&e),
                    None => {}
                }
            }
            Message::Export => {
                return Task::perform(async {
                    FileDialog::new().set_directory(".").set_file_name(DATA_FILE).save_file()
                }, Message::ExportPathChosen);
            }
            Message::ExportPathChosen(Some(path)) => {
                if let Some(snapshot) = self.store().cloned() {
                    debug!(path = %path.display(), "exporting roster");
                    return Task::perform(
                        file_ops::export_snapshot(path, snapshot),
                        |res| Message::ExportFinished(res.map_err(|e| format!("{:#}", e))),
                    );
                }
            }
            Message::ExportPathChosen(None) => { /* cancelled */ }
            Message::ExportFinished(Ok(path)) => {
                self.log(Severity::Info, format!("Roster exported to {}.", path.display()));
            }
            Message::ExportFinished(Err(e)) => {
                self.log(Severity::Error, format!("Export failed: {}", e));
            }
            Message::ToggleTheme => {
                self.theme = match self.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
            }
            Message::CloseRequested(id) => {
                info!(window = ?id, "close requested");
                if let Some(Err(e)) = self.session.as_ref().map(RosterSession::save) {
                    warn!(error = %e, "close cancelled, roster not saved");
                    self.log(
                        Severity::Error,
                        format!("Roster not saved, window kept open: {}. Export a copy or fix the file location.", e),
                    );
                    return Task::none();
                }
                if let Some(session) = self.session.take() {
                    if let Err(e) = session.close() {
                        warn!(error = %e, "exiting without a saved roster");
                    }
                }
                return iced::exit();
            }
        }
        Task::none()
    }

    fn with_store<T>(&mut self, op: impl FnOnce(&mut RecordStore) -> Result<T, RosterError>) -> Option<Result<T, RosterError>> {
        self.session.as_mut().map(|s| op(s.store_mut()))
    }

    fn form_id(&mut self) -> Option<StudentId> {
        match utils::parse_int_field("Student ID", &self.id_input) {
            Ok(id) => Some(id),
            Err(msg) => {
                self.log(Severity::Warning, msg);
                None
            }
        }
    }

    fn warn_if_not_persistable(&mut self, id: StudentId) {
        let persistable = self
            .store()
            .and_then(|store| store.get(id))
            .map_or(true, Student::name_is_persistable);
        if !persistable {
            self.log(Severity::Warning, "Empty names and names with spaces are not kept across restarts.");
        }
    }

    fn log_error(&mut self, e: &RosterError) {
        let severity = if e.is_lookup() { Severity::Warning } else { Severity::Error };
        let text = match e {
            RosterError::DuplicateKey(_) => "Student ID already exists!".to_string(),
            RosterError::NotFound(_) => "Student ID not found!".to_string(),
            other => other.to_string(),
        };
        self.log(severity, text);
    }

    fn log(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Info => info!("{}", text),
            Severity::Warning | Severity::Error => warn!("{}", text),
        }
        self.activity.push(ActivityEntry { at: Local::now(), severity, text });
        if self.activity.len() > ACTIVITY_LIMIT {
            let excess = self.activity.len() - ACTIVITY_LIMIT;
            self.activity.drain(..excess);
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let layout = Row::new()
            .push(self.view_sidebar())
            .push(rule::Rule::vertical(1))
            .push(self.view_main());

        let bg_color = self.bg_color();
        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                iced::widget::container::Style {
                    background: Some(iced::Background::Color(bg_color)),
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .into()
    }

    fn view_sidebar(&self) -> Element<'_, Message> {
        let accent = self.accent_color();
        let secondary_text = self.secondary_text_color();

        let title = Text::new("Student Manager")
            .size(24)
            .style(move |_theme| {
                iced::widget::text::Style {
                    color: Some(accent),
                }
            });

        let file_info = match &self.session {
            Some(s) => format!("{} · {} students", s.path().display(), s.store().len()),
            None => "Roster closed".to_string(),
        };
        let subtitle = Text::new(file_info)
            .size(12)
            .style(move |_theme| {
                iced::widget::text::Style {
                    color: Some(secondary_text),
                }
            });

        let theme_btn = Button::new(
            Text::new(match self.theme {
                Theme::Light => "🌙 Dark Mode",
                Theme::Dark => "☀️ Light Mode",
            })
                .size(14)
        )
        .on_press(Message::ToggleTheme)
        .padding(10)
        .width(Length::Fill);

        let open = self.session.is_some();
        let save_btn = Button::new(Text::new("Save now").size(14))
            .on_press_maybe(open.then_some(Message::SaveNow))
            .padding(10)
            .width(Length::Fill);

        let export_btn = Button::new(Text::new("📁 Export…").size(14))
            .on_press_maybe(open.then_some(Message::Export))
            .padding(10)
            .width(Length::Fill);

        let mut activity_list = Column::new().spacing(8);
        for (i, entry) in self.activity.iter().rev().enumerate() {
            let color = severity_color(entry.severity);
            let item = Column::new()
                .spacing(2)
                .push(
                    Text::new(&entry.text)
                        .size(12)
                        .style(move |_theme| {
                            iced::widget::text::Style {
                                color: Some(color),
                            }
                        })
                )
                .push(
                    Text::new(entry.at.format("%H:%M:%S").to_string())
                        .size(10)
                        .style(|_theme| {
                            iced::widget::text::Style {
                                color: Some(Color::from_rgb(0.5, 0.5, 0.5)),
                            }
                        })
                );
            activity_list = activity_list.push(item);
            if i + 1 < self.activity.len() {
                activity_list = activity_list.push(rule::Rule::horizontal(1));
            }
        }

        let sidebar_content = Column::new()
            .padding(20)
            .spacing(14)
            .width(Length::Fixed(260.0))
            .push(title)
            .push(subtitle)
            .push(rule::Rule::horizontal(1))
            .push(save_btn)
            .push(export_btn)
            .push(theme_btn)
            .push(Space::with_height(6))
            .push(Text::new("Activity").size(14))
            .push(Scrollable::new(activity_list).height(Length::Fill));

        let sidebar_bg = self.sidebar_bg_color();
        Container::new(sidebar_content)
            .height(Length::Fill)
            .style(move |_theme| {
                iced::widget::container::Style {
                    background: Some(iced::Background::Color(sidebar_bg)),
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .into()
    }

    fn view_main(&self) -> Element<'_, Message> {
        let text_color = self.text_color();

        let id_input = TextInput::new("Student ID", &self.id_input)
            .on_input(Message::IdChanged)
            .padding(10)
            .width(Length::Fixed(140.0));
        let name_input = TextInput::new("Student Name", &self.name_input)
            .on_input(Message::NameChanged)
            .on_submit(Message::AddStudent)
            .padding(10)
            .width(Length::Fill);
        let grade_input = TextInput::new("Grade", &self.grade_input)
            .on_input(Message::GradeChanged)
            .on_submit(Message::AddGrade)
            .padding(10)
            .width(Length::Fixed(140.0));

        let student_row = Row::new()
            .spacing(10)
            .push(id_input)
            .push(name_input)
            .push(self.action_button("Add Student", Message::AddStudent))
            .push(self.action_button("Edit Student", Message::EditStudent))
            .push(self.action_button("Delete Student", Message::DeleteStudent));

        let grade_row = Row::new()
            .spacing(10)
            .push(grade_input)
            .push(self.action_button("Add Grade", Message::AddGrade))
            .push(Space::with_width(Length::Fill))
            .push(
                Button::new(Text::new(if self.show_grades { "Hide Grades" } else { "Display Grades" }).size(14))
                    .on_press(Message::ToggleGrades)
                    .padding(10)
            )
            .push(
                Button::new(Text::new(if self.show_averages { "Hide Averages" } else { "Calculate Average" }).size(14))
                    .on_press(Message::ToggleAverages)
                    .padding(10)
            );

        let status = match self.latest() {
            Some(entry) => {
                let color = severity_color(entry.severity);
                Text::new(&entry.text)
                    .size(14)
                    .style(move |_theme| {
                        iced::widget::text::Style {
                            color: Some(color),
                        }
                    })
            }
            None => Text::new(""),
        };

        let content = Column::new()
            .padding(24)
            .spacing(16)
            .width(Length::Fill)
            .push(student_row)
            .push(grade_row)
            .push(status)
            .push(rule::Rule::horizontal(1))
            .push(Scrollable::new(self.view_roster(text_color)).height(Length::Fill));

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn action_button(&self, label: &'static str, msg: Message) -> Button<'_, Message> {
        Button::new(Text::new(label).size(14))
            .on_press_maybe(self.session.is_some().then_some(msg))
            .padding(10)
    }

    fn view_roster(&self, text_color: Color) -> Element<'_, Message> {
        let Some(store) = self.store() else {
            return Text::new("Roster closed.").into();
        };
        if store.is_empty() {
            let tertiary = self.tertiary_text_color();
            return Text::new("No student data available.")
                .size(16)
                .style(move |_theme| {
                    iced::widget::text::Style {
                        color: Some(tertiary),
                    }
                })
                .into();
        }

        let container_bg = self.container_bg_color();
        let border_color = self.border_color();
        let mut rows = Column::new().spacing(8).width(Length::Fill);
        for (id, student, avg) in store.averages() {
            let mut lines = Column::new().spacing(4);
            if self.show_grades {
                lines = lines.push(Text::new(grades_row_text(id, student)).size(15).style(move |_theme| {
                    iced::widget::text::Style {
                        color: Some(text_color),
                    }
                }));
            }
            if self.show_averages {
                lines = lines.push(Text::new(average_row_text(id, student, avg)).size(15).style(move |_theme| {
                    iced::widget::text::Style {
                        color: Some(text_color),
                    }
                }));
            }
            if !self.show_grades && !self.show_averages {
                lines = lines.push(Text::new(format!("ID: {}, Name: {}", id, student.name)).size(15).style(move |_theme| {
                    iced::widget::text::Style {
                        color: Some(text_color),
                    }
                }));
            }
            rows = rows.push(
                Container::new(lines)
                    .padding(10)
                    .width(Length::Fill)
                    .style(move |_theme| {
                        iced::widget::container::Style {
                            background: Some(iced::Background::Color(container_bg)),
                            border: Border {
                                color: border_color,
                                width: 1.0,
                                radius: 4.0.into(),
                            },
                            ..Default::default()
                        }
                    })
            );
        }
        rows.into()
    }

    // Theme color helpers
    fn bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(1.0, 1.0, 1.0),
            Theme::Dark => Color::from_rgb(0.11, 0.11, 0.13),
        }
    }

    fn sidebar_bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.95, 0.95, 0.97),
            Theme::Dark => Color::from_rgb(0.15, 0.15, 0.17),
        }
    }

    fn text_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.1, 0.1, 0.1),
            Theme::Dark => Color::from_rgb(0.9, 0.9, 0.9),
        }
    }

    fn secondary_text_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.4, 0.4, 0.4),
            Theme::Dark => Color::from_rgb(0.6, 0.6, 0.6),
        }
    }

    fn tertiary_text_color(&self) -> Color {
        Color::from_rgb(0.5, 0.5, 0.5)
    }

    fn container_bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.95, 0.95, 0.95),
            Theme::Dark => Color::from_rgb(0.2, 0.2, 0.22),
        }
    }

    fn border_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.8, 0.8, 0.8),
            Theme::Dark => Color::from_rgb(0.3, 0.3, 0.32),
        }
    }

    fn accent_color(&self) -> Color {
        Color::from_rgb(0.2, 0.5, 0.8)
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::from_rgb(0.2, 0.6, 0.2),
        Severity::Warning => Color::from_rgb(0.85, 0.55, 0.1),
        Severity::Error => Color::from_rgb(0.9, 0.2, 0.2),
    }
}

pub fn grades_row_text(id: StudentId, student: &Student) -> String {
    format!("ID: {}, Name: {}, Grades: {}", id, student.name, student.grades_line())
}

pub fn average_row_text(id: StudentId, student: &Student, avg: Average) -> String {
    match avg {
        Average::Mean(_) => format!("ID: {}, Name: {}, Average Grade: {}", id, student.name, avg),
        Average::Unavailable => format!("ID: {}, Name: {} has no grades.", id, student.name),
    }
}
