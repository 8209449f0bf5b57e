use std::fmt::Write as _;
use std::str::FromStr;

use log::{debug, error};
use validator::Validate;

use crate::client::TextRequest;
use crate::error::{ClientError, Result, SubmissionError};
use crate::exchange::{Exchange, ExchangeLog};
use crate::upload::{DropZone, StagedFile};

pub const ERROR_BANNER: &str = "An error occurred, please try again!";
pub const LOADING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Email,
    Upload,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Email => "Write an email",
            Tab::Upload => "Send a document",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "email" | "write" => Ok(Tab::Email),
            "upload" | "document" => Ok(Tab::Upload),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

/// Submission lifecycle. Only one request may be in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Error,
}

/// State of the submission card: both tabs, the drop zone and the
/// Idle/Submitting/Error guard.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    tab: Tab,
    prompt: String,
    drop_zone: DropZone,
    status: FormStatus,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Inputs are frozen while a request is in flight.
    fn ensure_editable(&self) -> Result<()> {
        if self.is_loading() {
            return Err(SubmissionError::Busy);
        }
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.prompt = prompt.into();
        Ok(())
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn drag_enter(&mut self) {
        self.drop_zone.drag_enter();
    }

    pub fn drag_over(&mut self) {
        self.drop_zone.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.drop_zone.drag_leave();
    }

    /// Picker path. `Ok(false)` when the type is not accepted.
    pub fn pick_file(&mut self, file: StagedFile) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.drop_zone.pick(file))
    }

    pub fn drop_files(&mut self, files: Vec<StagedFile>) -> Result<bool> {
        if let Err(e) = self.ensure_editable() {
            self.drop_zone.drag_leave();
            return Err(e);
        }
        Ok(self.drop_zone.drop_files(files))
    }

    pub fn remove_file(&mut self) -> Result<()> {
        self.ensure_editable()?;
        self.drop_zone.remove();
        Ok(())
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn has_error(&self) -> bool {
        self.status == FormStatus::Error
    }

    /// The upload form's submit control is only live with a file staged.
    pub fn can_upload(&self) -> bool {
        self.drop_zone.staged().is_some()
    }

    fn enter_submitting(&mut self) -> Result<()> {
        if self.is_loading() {
            return Err(SubmissionError::Busy);
        }
        debug!("Form status {:?} -> Submitting", self.status);
        // Banner clears optimistically at the start of every attempt
        self.status = FormStatus::Submitting;
        Ok(())
    }

    /// Moves to `Submitting` and hands back the JSON body to post.
    pub fn begin_text(&mut self) -> Result<TextRequest> {
        self.ensure_editable()?;
        let request = TextRequest::new(self.prompt.clone());
        request
            .validate()
            .map_err(|_| SubmissionError::EmptyPrompt)?;
        self.enter_submitting()?;
        Ok(request)
    }

    /// Moves to `Submitting` and hands back a copy of the staged document.
    pub fn begin_file(&mut self) -> Result<StagedFile> {
        self.ensure_editable()?;
        let file = self
            .drop_zone
            .staged()
            .cloned()
            .ok_or(SubmissionError::NoFileStaged)?;
        self.enter_submitting()?;
        Ok(file)
    }

    pub fn finish_text(
        &mut self,
        outcome: std::result::Result<Exchange, ClientError>,
        log: &mut ExchangeLog,
    ) -> Result<Exchange> {
        let exchange = self.settle(outcome, log)?;
        self.prompt.clear();
        Ok(exchange)
    }

    pub fn finish_file(
        &mut self,
        outcome: std::result::Result<Exchange, ClientError>,
        log: &mut ExchangeLog,
    ) -> Result<Exchange> {
        let exchange = self.settle(outcome, log)?;
        self.drop_zone.remove();
        Ok(exchange)
    }

    fn settle(
        &mut self,
        outcome: std::result::Result<Exchange, ClientError>,
        log: &mut ExchangeLog,
    ) -> Result<Exchange> {
        match outcome {
            Ok(exchange) => {
                let count = log.append(exchange.clone());
                debug!("Form status Submitting -> Idle ({} exchanges)", count);
                self.status = FormStatus::Idle;
                Ok(exchange)
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                self.status = FormStatus::Error;
                Err(SubmissionError::Client(e))
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== Emailer ==");
        let _ = writeln!(out, "Write an email or send a document");

        let tabs = [Tab::Email, Tab::Upload]
            .iter()
            .map(|tab| {
                if *tab == self.tab {
                    format!("[*] {}", tab.title())
                } else {
                    format!("[ ] {}", tab.title())
                }
            })
            .collect::<Vec<_>>()
            .join("   ");
        let _ = writeln!(out, "{}", tabs);

        if self.is_loading() {
            let _ = writeln!(out, "  ... {}", LOADING_LABEL);
            return out;
        }

        match self.tab {
            Tab::Email => {
                let _ = writeln!(out, "Message");
                if self.prompt.is_empty() {
                    let _ = writeln!(out, "  | Write your message here...");
                } else {
                    for line in self.prompt.lines() {
                        let _ = writeln!(out, "  | {}", line);
                    }
                }
                let _ = writeln!(out, "  [Send Email]");
            }
            Tab::Upload => {
                let border = if self.drop_zone.is_active() { "##" } else { "::" };
                match self.drop_zone.staged() {
                    Some(file) => {
                        let _ = writeln!(out, "{} {} ({}) [x Remove file]", border, file.name, file.size_label());
                    }
                    None => {
                        let _ = writeln!(out, "{} Drop your file here or click to upload", border);
                        let _ = writeln!(out, "{} Only PDF or TXT files", border);
                    }
                }
                if self.can_upload() {
                    let _ = writeln!(out, "  [Send Document]");
                } else {
                    let _ = writeln!(out, "  [Send Document] (disabled)");
                }
            }
        }

        if self.has_error() {
            let _ = writeln!(out, "(!) {}", ERROR_BANNER);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::MIME_TEXT;

    fn exchange(prompt: &str) -> Exchange {
        Exchange {
            productive: true,
            response: "Thanks!".to_string(),
            prompt: prompt.to_string(),
        }
    }

    #[test]
    fn test_text_round_trip_clears_field() {
        let mut form = FormState::new();
        let mut log = ExchangeLog::new();
        form.set_prompt("Hello").unwrap();

        let request = form.begin_text().unwrap();
        assert_eq!(request.prompt, "Hello");
        assert!(form.is_loading());

        let appended = form.finish_text(Ok(exchange("Hello")), &mut log).unwrap();
        assert_eq!(appended, exchange("Hello"));
        assert_eq!(log.entries(), &[exchange("Hello")]);
        assert_eq!(form.prompt(), "");
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[test]
    fn test_second_submission_rejected_while_in_flight() {
        let mut form = FormState::new();
        form.set_prompt("One").unwrap();
        form.begin_text().unwrap();

        assert!(matches!(form.begin_text(), Err(SubmissionError::Busy)));

        assert!(matches!(form.begin_file(), Err(SubmissionError::Busy)));
    }

    #[test]
    fn test_inputs_frozen_while_upload_in_flight() {
        let mut form = FormState::new();
        let mut log = ExchangeLog::new();
        form.pick_file(StagedFile::new("a.txt", MIME_TEXT, b"first".to_vec())).unwrap();
        form.begin_file().unwrap();

        let late = StagedFile::new("b.txt", MIME_TEXT, b"second".to_vec());
        assert!(matches!(form.pick_file(late.clone()), Err(SubmissionError::Busy)));
        form.drag_over();
        assert!(matches!(form.drop_files(vec![late]), Err(SubmissionError::Busy)));
        assert!(!form.drop_zone().is_active());
        assert!(matches!(form.remove_file(), Err(SubmissionError::Busy)));
        assert!(matches!(form.set_prompt("typed meanwhile"), Err(SubmissionError::Busy)));
        assert_eq!(form.drop_zone().staged().unwrap().name, "a.txt");
        assert_eq!(form.prompt(), "");

        form.finish_file(Ok(exchange("first")), &mut log).unwrap();
        assert!(form.drop_zone().staged().is_none());

        // Editable again once the request settles
        assert!(form.pick_file(StagedFile::new("b.txt", MIME_TEXT, b"second".to_vec())).unwrap());
        form.remove_file().unwrap();
        assert!(!form.can_upload());
    }

    #[test]
    fn test_tab_from_str() {
        assert_eq!("upload".parse::<Tab>(), Ok(Tab::Upload));
        assert_eq!("write".parse::<Tab>(), Ok(Tab::Email));
        assert!("inbox".parse::<Tab>().is_err());
    }

    #[test]
    fn test_empty_prompt_never_leaves_idle() {
        let mut form = FormState::new();
        assert!(matches!(form.begin_text(), Err(SubmissionError::EmptyPrompt)));
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[test]
    fn test_upload_needs_staged_file() {
        let mut form = FormState::new();
        assert!(!form.can_upload());
        assert!(matches!(form.begin_file(), Err(SubmissionError::NoFileStaged)));
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[test]
    fn test_failure_sets_banner_and_keeps_input() {
        let mut form = FormState::new();
        let mut log = ExchangeLog::new();
        form.set_prompt("Hello").unwrap();
        form.begin_text().unwrap();

        let outcome = Err(ClientError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert!(form.finish_text(outcome, &mut log).is_err());
        assert!(form.has_error());
        assert!(log.is_empty());
        assert_eq!(form.prompt(), "Hello");
        assert!(form.render().contains(ERROR_BANNER));

        // Retrying clears the banner before the outcome is known
        form.begin_text().unwrap();
        assert_eq!(form.status(), FormStatus::Submitting);
        assert!(!form.render().contains(ERROR_BANNER));
    }

    #[test]
    fn test_file_success_clears_staged_file() {
        let mut form = FormState::new();
        let mut log = ExchangeLog::new();
        form.pick_file(StagedFile::new("notes.txt", MIME_TEXT, b"Meeting at 3".to_vec())).unwrap();

        let file = form.begin_file().unwrap();
        assert_eq!(file.name, "notes.txt");

        form.finish_file(Ok(exchange("Meeting at 3")), &mut log).unwrap();
        assert!(form.drop_zone().staged().is_none());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_loading_hides_forms() {
        let mut form = FormState::new();
        form.set_prompt("Hello").unwrap();
        form.begin_text().unwrap();

        let rendered = form.render();
        assert!(rendered.contains(LOADING_LABEL));
        assert!(!rendered.contains("[Send Email]"));
    }

    #[test]
    fn test_render_upload_tab() {
        let mut form = FormState::new();
        form.select_tab(Tab::Upload);
        assert!(form.render().contains("[Send Document] (disabled)"));

        form.pick_file(StagedFile::new("notes.txt", MIME_TEXT, vec![b'a'; 2048])).unwrap();
        let rendered = form.render();
        assert!(rendered.contains("notes.txt (2.0 KB)"));
        assert!(!rendered.contains("(disabled)"));
    }
}
