//! # Console
//!
//! Line-oriented front end over a [`DirectoryClient`]. Every command is one user
//! gesture: it is parsed, turned into a client call, and the screen is redrawn
//! from the published [`PageState`]. While a call is outstanding each intermediate
//! frame (busy indicator, optimistic row) is drawn as it is published.
//!
//! ```text
//! page N | next | prev | add | edit ID | delete ID | refresh | help | quit
//! ```

use crate::clients::DirectoryClient;
use crate::directory::DirectoryError;
use crate::model::{PageState, Record, RecordId};
use crate::notify::{Level, Notification, ToastQueue};
use crate::ui::editor::{EditorField, RecordEditor};
use crate::ui::pager::Pager;
use crate::ui::table::{RecordTable, TableAction};
use std::future::Future;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  page N      show page N
  next, prev  move one page
  add         add a user
  edit ID     edit the user with ID on this page
  delete ID   delete the user with ID on this page
  refresh     reload the current page
  help        show this text
  quit        leave
";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(u32),
    Next,
    Prev,
    Add,
    Edit(RecordId),
    Delete(RecordId),
    Refresh,
    Help,
    Quit,
}

/// Why an input line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a page number")]
    BadPage(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseError::Unknown(String::new()));
        };
        let argument = words.next();

        match verb.to_ascii_lowercase().as_str() {
            "page" | "p" => {
                let raw = argument.ok_or(ParseError::MissingArgument("page"))?;
                raw.parse()
                    .map(Command::Page)
                    .map_err(|_| ParseError::BadPage(raw.to_string()))
            }
            "next" | "n" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "add" | "a" => Ok(Command::Add),
            "edit" | "e" => argument
                .map(|id| Command::Edit(RecordId::from(id)))
                .ok_or(ParseError::MissingArgument("edit")),
            "delete" | "d" => argument
                .map(|id| Command::Delete(RecordId::from(id)))
                .ok_or(ParseError::MissingArgument("delete")),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Outcome of one editor prompt line.
enum Prompted {
    Keep,
    Set(String),
    Cancel,
}

pub struct Console<'a, R, W> {
    input: Lines<R>,
    output: W,
    client: DirectoryClient,
    notifications: &'a mut mpsc::UnboundedReceiver<Notification>,
    toasts: ToastQueue,
}

impl<'a, R, W> Console<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        input: R,
        output: W,
        client: DirectoryClient,
        notifications: &'a mut mpsc::UnboundedReceiver<Notification>,
        toasts: ToastQueue,
    ) -> Self {
        Self {
            input: input.lines(),
            output,
            client,
            notifications,
            toasts,
        }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        let state = self.client.snapshot();
        self.render(&state).await?;

        loop {
            self.write("> ").await?;
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    self.write(&format!("{e}\n")).await?;
                    continue;
                }
            };
            debug!(?command, "Console command");
            if command == Command::Quit {
                break;
            }
            self.dispatch(command).await?;
        }

        info!("Console closed");
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), ConsoleError> {
        let client = self.client.clone();
        let state = client.snapshot();
        let pager = Pager::new(state.current_page, state.total_pages);

        let page = match command {
            Command::Page(0) => return self.write("Pages start at 1\n").await,
            Command::Page(page) => Some(page),
            Command::Next => pager.next(),
            Command::Prev => pager.previous(),
            Command::Refresh => Some(state.current_page),
            Command::Add => return self.open_editor(None).await,
            Command::Edit(id) => {
                let visible = state.visible_records();
                return match RecordTable::new(&visible, state.loading).edit(&id) {
                    Some(TableAction::Edit(record)) => self.open_editor(Some(record)).await,
                    _ => self.write(&format!("No user {id} on this page\n")).await,
                };
            }
            Command::Delete(id) => {
                let visible = state.visible_records();
                return match RecordTable::new(&visible, state.loading).delete(&id) {
                    Some(TableAction::Delete(id)) => {
                        let state = self.follow(client.delete_record(id)).await?;
                        self.render(&state).await
                    }
                    _ => self.write(&format!("No user {id} on this page\n")).await,
                };
            }
            Command::Help => return self.write(HELP).await,
            Command::Quit => return Ok(()),
        };

        match page {
            Some(page) => {
                let state = self.follow(client.load_page(page)).await?;
                self.render(&state).await
            }
            None => self.write("No more pages that way\n").await,
        }
    }

    /// Prompts for every field until the draft validates and saves, or the user
    /// cancels. Empty input keeps a value, `-` clears it.
    async fn open_editor(&mut self, record: Option<Record>) -> Result<(), ConsoleError> {
        let mut editor = RecordEditor::new(record.as_ref());
        let client = self.client.clone();

        loop {
            self.write(&editor.render()).await?;
            for field in EditorField::ALL {
                match self.prompt(field, editor.value(field)).await? {
                    Prompted::Keep => {}
                    Prompted::Set(value) => editor.set(field, value),
                    Prompted::Cancel => {
                        self.write("Cancelled\n").await?;
                        return Ok(());
                    }
                }
            }

            let Some(draft) = editor.submit() else {
                continue;
            };
            self.write(&format!("{}...\n", editor.submit_label())).await?;
            let reply = self.follow(client.save(draft)).await?;
            self.render(&reply.state).await?;
            match reply.failure {
                Some(failure) => editor.record_failure(failure.to_string()),
                None => return Ok(()),
            }
        }
    }

    async fn prompt(&mut self, field: EditorField, current: &str) -> Result<Prompted, ConsoleError> {
        let prompt = format!("{} [{}]: ", field.label(), current);
        self.write(&prompt).await?;
        let Some(line) = self.input.next_line().await? else {
            return Ok(Prompted::Cancel);
        };
        Ok(match line.trim() {
            "" => Prompted::Keep,
            "cancel" => Prompted::Cancel,
            "-" => Prompted::Set(String::new()),
            value => Prompted::Set(value.to_string()),
        })
    }

    /// Awaits a client call, drawing every frame the controller publishes meanwhile.
    async fn follow<T>(
        &mut self,
        request: impl Future<Output = Result<T, DirectoryError>>,
    ) -> Result<T, ConsoleError> {
        let mut frames = self.client.subscribe();
        frames.mark_unchanged();
        tokio::pin!(request);

        loop {
            tokio::select! {
                biased;
                result = &mut request => return Ok(result?),
                changed = frames.changed() => {
                    if changed.is_err() {
                        return Ok(request.await?);
                    }
                    let frame = frames.borrow_and_update().clone();
                    self.render(&frame).await?;
                }
            }
        }
    }

    async fn render(&mut self, state: &PageState) -> Result<(), ConsoleError> {
        let visible = state.visible_records();
        let mut screen = String::from("\n== Users ==\n");
        if let Some(error) = &state.error {
            screen.push_str(&format!("!! {error}\n"));
        }
        screen.push_str(&RecordTable::new(&visible, state.loading).render());

        let pages = Pager::new(state.current_page, state.total_pages).render();
        if !pages.is_empty() {
            screen.push_str(&format!("Pages: {pages}\n"));
        }

        self.toasts.collect(self.notifications);
        for toast in self.toasts.active() {
            let marker = match toast.level {
                Level::Success => '+',
                Level::Error => '!',
            };
            screen.push_str(&format!("{marker} {}\n", toast.message));
        }

        self.write(&screen).await
    }

    async fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryConfig;
    use crate::lifecycle::DirectorySystem;
    use crate::model::RecordPatch;
    use crate::remote::mock::MockResource;
    use crate::remote::{ListPage, RemoteError};
    use std::io::Cursor;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("page 3"), Ok(Command::Page(3)));
        assert_eq!(Command::parse("  NEXT "), Ok(Command::Next));
        assert_eq!(
            Command::parse("delete 7"),
            Ok(Command::Delete(RecordId::from(7)))
        );
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(Command::parse("page"), Err(ParseError::MissingArgument("page")));
        assert_eq!(
            Command::parse("page two"),
            Err(ParseError::BadPage("two".into()))
        );
        assert!(matches!(Command::parse("launch"), Err(ParseError::Unknown(_))));
    }

    fn config() -> DirectoryConfig {
        DirectoryConfig::new("http://localhost/users".parse().unwrap())
    }

    fn page_one() -> ListPage {
        ListPage {
            records: vec![
                Record::new("Leanne Graham", "Sincere@april.biz", "Romaguera-Crona").with_id(1),
                Record::new("Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist").with_id(2),
            ],
            total_count: Some(2),
        }
    }

    fn server_error() -> RemoteError {
        RemoteError::Status {
            status: 500,
            url: "http://localhost/users".into(),
        }
    }

    async fn run_script(mock: &MockResource, script: &str) -> String {
        let mut system = DirectorySystem::with_resource(&config(), mock.resource());
        let mut output = Vec::new();
        {
            let mut console = Console::new(
                Cursor::new(script.as_bytes().to_vec()),
                &mut output,
                system.client.clone(),
                &mut system.notifications,
                ToastQueue::default(),
            );
            console.run().await.unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn pages_and_deletes_through_commands() {
        let mut mock = MockResource::new();
        mock.expect_list(Some(1)).return_ok(page_one());
        mock.expect_delete(RecordId::from(2)).return_ok(());

        let output = run_script(&mock, "page 1\ndelete 2\ndelete 9\nquit\n").await;

        assert!(output.contains("Leanne Graham"));
        assert!(output.contains("+ User deleted successfully!"));
        assert!(output.contains("No user 9 on this page"));
        mock.verify();
    }

    #[tokio::test]
    async fn editor_reprompts_until_valid() {
        let mut mock = MockResource::new();
        mock.expect_create().return_ok(RecordPatch {
            id: Some(RecordId::from(11)),
            ..RecordPatch::default()
        });
        mock.expect_list(Some(1)).return_ok(ListPage {
            records: vec![Record::new("Ada Lovelace", "ada@engine.org", "Analytics").with_id(11)],
            total_count: Some(1),
        });

        // First pass leaves the email invalid; second pass fixes it.
        let script = "add\nAda\nLovelace\nada\nAnalytics\n\n\nada@engine.org\n\nquit\n";
        let output = run_script(&mock, script).await;

        assert!(output.contains("^ Invalid email address"));
        assert!(output.contains("+ User added successfully!"));
        assert!(output.contains("Ada Lovelace"));
        mock.verify();
    }

    #[tokio::test]
    async fn cancel_leaves_editor_without_saving() {
        let mock = MockResource::new();
        let output = run_script(&mock, "add\nAda\ncancel\nhelp\n").await;

        assert!(output.contains("Cancelled"));
        assert!(output.contains("Commands:"));
        mock.verify();
    }

    #[tokio::test]
    async fn earlier_failure_does_not_fail_a_later_save() {
        let mut mock = MockResource::new();
        mock.expect_list(Some(1)).return_ok(page_one());
        mock.expect_delete(RecordId::from(2)).return_err(server_error());
        mock.expect_update(RecordId::from(1)).return_ok(RecordPatch::default());

        let output = run_script(&mock, "page 1\ndelete 2\nedit 1\n\n\n\n\nquit\n").await;

        assert!(output.contains("!! Failed to delete user"));
        assert_eq!(output.matches("Save Changes...").count(), 1);
        assert!(!output.contains("== Edit User ==\n!!"));
        assert!(output.contains("+ User updated successfully!"));
        mock.verify();
    }

    #[tokio::test]
    async fn create_with_failed_refetch_is_not_resubmitted() {
        let mut mock = MockResource::new();
        mock.expect_create().return_ok(RecordPatch {
            id: Some(RecordId::from(11)),
            ..RecordPatch::default()
        });
        mock.expect_list(Some(1)).return_err(server_error());

        let script = "add\nAda\nLovelace\nada@engine.org\nAnalytics\nquit\n";
        let output = run_script(&mock, script).await;

        assert_eq!(output.matches("Add User...").count(), 1);
        assert!(output.contains("+ User added successfully!"));
        assert!(output.contains("!! Failed to load users"));
        assert!(!output.contains("== Add User ==\n!!"));
        mock.verify();
    }

    #[tokio::test]
    async fn failed_save_keeps_editor_open_with_banner() {
        let mut mock = MockResource::new();
        mock.expect_list(Some(1)).return_ok(page_one());
        mock.expect_update(RecordId::from(1)).return_err(server_error());

        let output = run_script(&mock, "page 1\nedit 1\n\n\n\n\ncancel\nquit\n").await;

        assert!(output.contains("== Edit User ==\n!! Failed to save user"));
        assert!(output.contains("Cancelled"));
        mock.verify();
    }
}
