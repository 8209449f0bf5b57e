use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands;
use crate::form::{Tab, LOADING_LABEL};
use crate::state::AppState;

const HELP: &str = "\
Commands:
  tab email|upload        switch between the two forms
  write <text>            set the message body (\\n for a line break)
  send                    send the message for classification
  pick <path>             choose a PDF or TXT document (quotes optional)
  drag-enter | drag-over | drag-leave
  drop <path> [path...]   drop files on the upload area (first one counts;
                          quote paths that contain spaces)
  remove                  unstage the document
  upload                  send the staged document
  toggle <n>              expand or collapse Email #n
  list                    redraw the page
  help                    show this text
  quit                    exit (history is discarded)";

/// How long a submission may run before the loading view is drawn.
const LOADING_DELAY: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Tab(Tab),
    Write(String),
    Send,
    Pick(PathBuf),
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<PathBuf>),
    Remove,
    Upload,
    Toggle(usize),
    List,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        // Only the verb is trimmed; a message is kept exactly as typed
        let line = line.trim_start();
        let (verb, raw_rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim_end(), ""));
        let rest = raw_rest.trim();

        match verb {
            "tab" => rest.parse::<Tab>().map(ShellCommand::Tab),
            "write" => Ok(ShellCommand::Write(raw_rest.replace("\\n", "\n"))),
            "send" => Ok(ShellCommand::Send),
            "pick" if !rest.is_empty() => Ok(ShellCommand::Pick(PathBuf::from(unquote(rest)))),
            "pick" => Err("Usage: pick <path>".to_string()),
            "drag-enter" => Ok(ShellCommand::DragEnter),
            "drag-over" => Ok(ShellCommand::DragOver),
            "drag-leave" => Ok(ShellCommand::DragLeave),
            "drop" => split_paths(rest).map(ShellCommand::Drop),
            "remove" => Ok(ShellCommand::Remove),
            "upload" => Ok(ShellCommand::Upload),
            "toggle" => rest
                .parse::<usize>()
                .map(ShellCommand::Toggle)
                .map_err(|_| "Usage: toggle <n>".to_string()),
            "" | "list" => Ok(ShellCommand::List),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command: {} (try `help`)", other)),
        }
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Splits a path list on whitespace; double quotes keep spaces inside a path.
fn split_paths(input: &str) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote in path list".to_string());
    }
    if has_token {
        paths.push(PathBuf::from(current));
    }
    Ok(paths)
}

/// Draws the loading view if the submission is still pending after a moment.
async fn with_loading<F: Future>(state: &AppState, submission: F) -> F::Output {
    tokio::pin!(submission);
    match tokio::time::timeout(LOADING_DELAY, &mut submission).await {
        Ok(output) => output,
        Err(_) => {
            let loading_view = {
                let form = state.form.lock();
                form.is_loading().then(|| form.render())
            };
            match loading_view {
                Some(view) => println!("{}", view),
                None => println!("  ... {}", LOADING_LABEL),
            }
            submission.await
        }
    }
}

/// Applies one command. Returns `false` once the user asks to leave.
pub async fn dispatch(state: &AppState, command: ShellCommand) -> bool {
    match command {
        ShellCommand::Tab(tab) => commands::select_tab(state, tab),
        ShellCommand::Write(text) => {
            commands::select_tab(state, Tab::Email);
            if let Err(e) = commands::update_prompt(state, text) {
                println!("{}", e);
            }
        }
        ShellCommand::Send => {
            commands::select_tab(state, Tab::Email);
            if let Err(e) = with_loading(state, commands::submit_email(state)).await {
                warn!("Send did not complete: {}", e);
            }
        }
        ShellCommand::Pick(path) => {
            commands::select_tab(state, Tab::Upload);
            if let Err(e) = commands::pick_file(state, &path) {
                println!("{}", e);
            }
        }
        ShellCommand::DragEnter => commands::drag_enter(state),
        ShellCommand::DragOver => commands::drag_over(state),
        ShellCommand::DragLeave => commands::drag_leave(state),
        ShellCommand::Drop(paths) => {
            commands::select_tab(state, Tab::Upload);
            if let Err(e) = commands::drop_files(state, &paths) {
                println!("{}", e);
            }
        }
        ShellCommand::Remove => {
            if let Err(e) = commands::remove_file(state) {
                println!("{}", e);
            }
        }
        ShellCommand::Upload => {
            commands::select_tab(state, Tab::Upload);
            if let Err(e) = with_loading(state, commands::submit_document(state)).await {
                warn!("Upload did not complete: {}", e);
            }
        }
        ShellCommand::Toggle(number) => {
            commands::toggle_email(state, number);
        }
        ShellCommand::List => {}
        ShellCommand::Help => {
            println!("{}", HELP);
            return true;
        }
        ShellCommand::Quit => return false,
    }

    println!("{}", commands::render_page(state));
    true
}

/// Reads commands line by line until EOF or `quit`.
pub async fn run<R>(state: &AppState, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", commands::render_page(state));
    println!("Type `help` for commands.");

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            Ok(command) => {
                if !dispatch(state, command).await {
                    break;
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    info!("Shell closed");
    Ok(())
}
