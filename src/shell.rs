//! Interactive Shell
//!
//! A line-driven dashboard session. Each input line is one user event; the
//! upload runs as a background task and reports back over a channel, so
//! both kinds of events are handled one at a time by the same loop and the
//! store never sees interleaved mutations.
//!
//! ```text
//! file <path>        select a CSV
//! analyze            upload the selected file
//! tab <name>         overview | explorer
//! search <term>      filter the explorer
//! clear              reset the search
//! report             open the report in a browser
//! show               redraw
//! help               list commands
//! quit               leave
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::client::AnalysisService;
use crate::render::Renderer;
use crate::report::{self, ReportError, SystemBrowser, UrlOpener};
use crate::session::{Action, Notice, Store, Tab};
use crate::upload;

const HELP: &str = "\
Commands:
  file <path>     select a CSV file
  analyze         upload the selected file for analysis
  tab <name>      switch view: overview | explorer
  search <term>   filter explorer rows by name or type
  clear           clear the search
  report          open the PDF report in your browser
  show            redraw the dashboard
  help            show this help
  quit            exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    File(PathBuf),
    Analyze,
    Tab(Tab),
    Search(String),
    Clear,
    Report,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "file" | "open" if !rest.is_empty() => Ok(Command::File(PathBuf::from(rest))),
            "file" | "open" => Err("Usage: file <path>".to_string()),
            "analyze" | "upload" => Ok(Command::Analyze),
            "tab" => rest.parse().map(Command::Tab),
            "overview" | "dashboard" => Ok(Command::Tab(Tab::Dashboard)),
            "explorer" => Ok(Command::Tab(Tab::Explorer)),
            // search keeps the raw remainder, inner spaces included
            "search" | "find" => Ok(Command::Search(rest.to_string())),
            "clear" => Ok(Command::Clear),
            "report" => Ok(Command::Report),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command: {}. Type 'help' for commands.", other)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive dashboard session
pub struct Shell<O: UrlOpener = SystemBrowser> {
    store: Store,
    service: Arc<dyn AnalysisService>,
    opener: O,
    renderer: Renderer,
}

impl Shell<SystemBrowser> {
    pub fn new(service: Arc<dyn AnalysisService>, renderer: Renderer) -> Self {
        Self::with_opener(service, renderer, SystemBrowser)
    }
}

impl<O: UrlOpener> Shell<O> {
    pub fn with_opener(service: Arc<dyn AnalysisService>, renderer: Renderer, opener: O) -> Self {
        Self {
            store: Store::new(),
            service,
            opener,
            renderer,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Pre-select a file before the loop starts
    pub fn select_file(&mut self, path: PathBuf) {
        self.store.dispatch(Action::SelectFile(path));
    }

    /// Process input until `quit` or end of input
    ///
    /// At end of input the loop still waits for an in-flight upload to settle.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut lines = input.lines();
        let mut input_open = true;

        self.redraw(out)?;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if self.handle_line(&line, &tx, out)? == Flow::Quit {
                                break;
                            }
                        }
                        None => input_open = false,
                    }
                }
                Some(action) = rx.recv() => {
                    self.store.dispatch(action);
                    self.redraw(out)?;
                }
            }

            if !input_open && !self.store.state().loading {
                break;
            }
        }

        Ok(())
    }

    fn handle_line<W: Write>(
        &mut self,
        line: &str,
        tx: &mpsc::UnboundedSender<Action>,
        out: &mut W,
    ) -> std::io::Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::File(path) => {
                self.store.dispatch(Action::SelectFile(path));
            }
            Command::Analyze => self.start_upload(tx),
            Command::Tab(tab) => {
                if self.store.state().analysis.is_none() {
                    self.store.dispatch(Action::Rejected(Notice::Validation(
                        "Upload data to begin".to_string(),
                    )));
                } else {
                    self.store.dispatch(Action::SwitchTab(tab));
                }
            }
            Command::Search(term) => self.store.dispatch(Action::SetSearch(term)),
            Command::Clear => self.store.dispatch(Action::SetSearch(String::new())),
            Command::Report => {
                match report::open_report(self.store.state(), self.service.as_ref(), &self.opener) {
                    Ok(url) => writeln!(out, "Opened report: {}", url)?,
                    Err(ReportError::NotAvailable) => {
                        writeln!(out, "Report is available after an analysis is loaded.")?
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
                return Ok(Flow::Continue);
            }
            Command::Show => {}
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        self.redraw(out)?;
        Ok(Flow::Continue)
    }

    fn start_upload(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        let request = match upload::begin_upload(&mut self.store) {
            Ok(request) => request,
            Err(_) => return,
        };

        let service = Arc::clone(&self.service);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = upload::perform_upload(service.as_ref(), &request).await;
            // receiver is gone once the session has quit
            let _ = tx.send(upload::outcome_action(&result));
        });
    }

    /// Draw the session; a notice is shown once and then cleared
    fn redraw<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.renderer.render_session(self.store.state()))?;
        out.flush()?;

        if self.store.state().notice.is_some() {
            self.store.dispatch(Action::DismissNotice);
        }
        Ok(())
    }
}
