//! REPL (Read-Eval-Print Loop) implementation for interactive chat.

use std::path::PathBuf;

use aiyou_client::{AssistantClient, Error as ClientError, Role, Session, with_instruction};
use anyhow::Result;
use chrono::Local;
use console::{Style, style};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use crate::transcript::Transcript;

/// What the user did at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl+C
    Interrupted,
    /// Ctrl+D
    Eof,
}

/// Where REPL lines come from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Terminal line editor with history.
pub struct EditorSource {
    editor: Editor<(), DefaultHistory>,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        Ok(Self {
            editor: Editor::with_config(config)?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }
}

/// REPL state and configuration.
pub struct Repl<S: LineSource> {
    client: AssistantClient,
    session: Session,
    source: S,
    /// Appended to the first message of every thread.
    instruction: String,
    thread_id: Option<String>,
    instruction_pending: bool,
    transcript: Transcript,
    transcript_dir: PathBuf,
    silent: bool,
}

impl<S: LineSource> Repl<S> {
    /// Create a new REPL instance.
    pub fn new(
        client: AssistantClient,
        session: Session,
        source: S,
        instruction: String,
        transcript_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            session,
            source,
            instruction_pending: !instruction.is_empty(),
            instruction,
            thread_id: None,
            transcript: Transcript::new(),
            transcript_dir,
            silent: false,
        }
    }

    /// Continue an existing thread instead of creating one on the first message.
    /// The instruction is assumed to be part of that thread already.
    pub fn with_thread(mut self, thread_id: Option<String>) -> Self {
        if thread_id.is_some() {
            self.instruction_pending = false;
        }
        self.thread_id = thread_id;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.format_prompt();

            match self.source.read_line(&prompt) {
                Ok(Input::Line(line)) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_slash_command(line) {
                            Ok(ControlFlow::Continue) => continue,
                            Ok(ControlFlow::Exit) => break,
                            Err(e) => {
                                self.print_error(&format!("Command error: {:#}", e));
                                continue;
                            }
                        }
                    }

                    if let Err(e) = self.send_message(line).await {
                        tracing::warn!(error = %e, "Exchange failed");
                        self.print_error(&format!("{:#}", anyhow::Error::new(e)));
                    }
                }
                Ok(Input::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                }
                Ok(Input::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        Ok(())
    }

    /// Send one message in the current thread and print the reply.
    async fn send_message(&mut self, message: &str) -> Result<(), ClientError> {
        self.transcript.push(Role::User, message);

        let thread_id = match self.thread_id.clone() {
            Some(id) => id,
            None => {
                let id = self.client.threads().create(&self.session).await?;
                tracing::info!(thread_id = %id, "Started conversation thread");
                self.thread_id = Some(id.clone());
                self.instruction_pending = !self.instruction.is_empty();
                id
            }
        };

        let content = if self.instruction_pending {
            with_instruction(message, &self.instruction)
        } else {
            message.to_string()
        };

        let result = self
            .client
            .chat_in_thread(&self.session, &thread_id, &content)
            .await;

        // Once the message is posted the thread has the instruction
        if !matches!(result, Err(ClientError::Message { .. })) {
            self.instruction_pending = false;
        }

        let response = result?;
        self.print_reply(&response);
        self.transcript.push(Role::Assistant, response);
        Ok(())
    }

    /// Handle a slash command.
    fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        let cmd = input[1..].split_whitespace().next().unwrap_or("");

        match cmd {
            "quit" | "q" | "exit" => {
                return Ok(ControlFlow::Exit);
            }
            "help" | "h" | "?" => {
                self.print_help();
            }
            "save" => {
                if self.transcript.is_empty() {
                    self.print_dim("Nothing said yet, saving an empty transcript");
                }
                let path = self.transcript.save_in(&self.transcript_dir)?;
                println!("Conversation saved to {}", path.display());
            }
            "new" => {
                self.thread_id = None;
                self.print_dim("Started new thread");
            }
            "thread" => {
                if let Some(id) = self.thread_id() {
                    println!("Current thread: {}", id);
                } else {
                    self.print_dim("No active thread (will create on first message)");
                }
            }
            "" => {
                self.print_dim("Type /help for available commands");
            }
            _ => {
                self.print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    fn print_welcome(&self) {
        if self.silent {
            return;
        }
        let dim = Style::new().dim();
        println!();
        println!("{}", style("AI.YOU Chat").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("{}", dim.apply_to("Type your message and press Enter to chat."));
        println!("{}", dim.apply_to("Use /help for commands, Ctrl+D to exit."));
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {}  - Exit the REPL", style("/quit, /exit, /q").cyan());
        println!("  {}  - Save the conversation to a file", style("/save").cyan());
        println!("  {}  - Start a new thread", style("/new").cyan());
        println!("  {}  - Show current thread ID", style("/thread").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!();
        println!("{}", dim.apply_to("Keyboard shortcuts:"));
        println!("  {} - Clear the current line", dim.apply_to("Ctrl+C"));
        println!("  {} - Exit the REPL", dim.apply_to("Ctrl+D"));
        println!();
    }

    fn print_reply(&self, response: &str) {
        if self.silent {
            println!("{}", response);
            return;
        }
        let label = Style::new().green().bold();
        println!(
            "[{}] {} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            label.apply_to("AI.YOU:"),
            response
        );
        println!();
    }

    fn format_prompt(&self) -> String {
        if self.silent {
            return "> ".to_string();
        }
        format!("{} ", style("You:").cyan().bold())
    }

    fn print_dim(&self, msg: &str) {
        if self.silent {
            return;
        }
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        eprintln!("{} {}", red.apply_to("Error:"), msg);
    }
}

/// Control flow for the REPL.
pub enum ControlFlow {
    Continue,
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiyou_client::PollPolicy;
    use aiyou_client::mock::{MockReply, MockTransport, RecordingSleeper};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Replays scripted input, then reports end of input.
    struct ScriptedSource(VecDeque<Input>);

    impl ScriptedSource {
        fn lines(lines: &[&str]) -> Self {
            Self(lines.iter().map(|l| Input::Line(l.to_string())).collect())
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, _prompt: &str) -> Result<Input> {
            Ok(self.0.pop_front().unwrap_or(Input::Eof))
        }
    }

    fn client(transport: &Arc<MockTransport>) -> AssistantClient {
        AssistantClient::builder()
            .assistant_id("asst_1")
            .poll_policy(PollPolicy::new(3, Duration::from_secs(2)))
            .transport(transport.clone())
            .sleeper(Arc::new(RecordingSleeper::new()))
            .build()
            .unwrap()
    }

    fn completed(run_id: &str, text: &str) -> MockReply {
        MockReply::json(json!({"id": run_id, "status": "completed", "response": text}))
    }

    /// Replies for message, run creation and a completed run.
    fn exchange(run_id: &str, text: &str) -> Vec<MockReply> {
        vec![
            MockReply::json(json!({"id": "msg"})),
            MockReply::json(json!({"id": run_id})),
            completed(run_id, text),
        ]
    }

    fn repl(
        transport: &Arc<MockTransport>,
        source: ScriptedSource,
        instruction: &str,
        dir: &TempDir,
    ) -> Repl<ScriptedSource> {
        Repl::new(
            client(transport),
            Session::new("tok", None),
            source,
            instruction.to_string(),
            dir.path().to_path_buf(),
        )
        .silent(true)
    }

    #[tokio::test]
    async fn test_thread_reused_and_instruction_sent_once() {
        let mut replies = vec![MockReply::json(json!({"id": "thread_1"}))];
        replies.extend(exchange("run_1", "One"));
        replies.extend(exchange("run_2", "Two"));
        let transport = Arc::new(MockTransport::new(replies));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(
            &transport,
            ScriptedSource::lines(&["first", "second"]),
            "Be brief",
            &dir,
        );
        repl.run().await.unwrap();

        assert_eq!(repl.thread_id(), Some("thread_1"));
        assert_eq!(transport.calls_to("/v1/threads"), 1);

        let messages: Vec<_> = transport
            .calls()
            .into_iter()
            .filter(|c| c.endpoint == "/v1/threads/thread_1/messages")
            .map(|c| c.body.unwrap()["content"].clone())
            .collect();
        assert_eq!(
            messages,
            vec![json!("first\n\nAdditional instruction: Be brief"), json!("second")]
        );

        let roles: Vec<_> = repl.transcript().entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(repl.transcript().entries()[3].content, "Two");
        // The transcript keeps what the user typed, not the instruction
        assert_eq!(repl.transcript().entries()[0].content, "first");
    }

    #[tokio::test]
    async fn test_failed_turn_does_not_end_session() {
        let mut replies = vec![
            MockReply::json(json!({"id": "thread_1"})),
            MockReply::json(json!({"id": "msg"})),
            MockReply::json(json!({"id": "run_1"})),
            MockReply::json(json!({"id": "run_1", "status": "failed"})),
        ];
        replies.extend(exchange("run_2", "Recovered"));
        let transport = Arc::new(MockTransport::new(replies));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(&transport, ScriptedSource::lines(&["boom", "again"]), "", &dir);
        repl.run().await.unwrap();

        let entries = repl.transcript().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].content, "boom");
        assert_eq!(entries[2].content, "Recovered");
        assert_eq!(transport.calls_to("/v1/threads"), 1);
    }

    #[tokio::test]
    async fn test_thread_creation_failure_is_retried_next_turn() {
        let mut replies = vec![
            MockReply::status(500, "down"),
            MockReply::json(json!({"id": "thread_2"})),
        ];
        replies.extend(exchange("run_1", "Hi"));
        let transport = Arc::new(MockTransport::new(replies));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(&transport, ScriptedSource::lines(&["hello", "hello"]), "", &dir);
        repl.run().await.unwrap();

        assert_eq!(repl.thread_id(), Some("thread_2"));
        assert_eq!(transport.calls_to("/v1/threads"), 2);

        // The turn that never reached a thread is still recorded
        let entries: Vec<_> = repl
            .transcript()
            .entries()
            .iter()
            .map(|e| (e.role, e.content.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![(Role::User, "hello"), (Role::User, "hello"), (Role::Assistant, "Hi")]
        );
    }

    #[tokio::test]
    async fn test_new_starts_fresh_thread_with_instruction() {
        let mut replies = vec![MockReply::json(json!({"id": "thread_1"}))];
        replies.extend(exchange("run_1", "A"));
        replies.push(MockReply::json(json!({"id": "thread_2"})));
        replies.extend(exchange("run_2", "B"));
        let transport = Arc::new(MockTransport::new(replies));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(
            &transport,
            ScriptedSource::lines(&["one", "/new", "two"]),
            "Rule",
            &dir,
        );
        repl.run().await.unwrap();

        assert_eq!(repl.thread_id(), Some("thread_2"));
        let second = transport
            .calls()
            .into_iter()
            .find(|c| c.endpoint == "/v1/threads/thread_2/messages")
            .unwrap();
        assert_eq!(
            second.body.unwrap()["content"],
            "two\n\nAdditional instruction: Rule"
        );
    }

    #[tokio::test]
    async fn test_resumed_thread_skips_creation() {
        let transport = Arc::new(MockTransport::new(exchange("run_1", "Welcome back")));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(&transport, ScriptedSource::lines(&["hi"]), "Rule", &dir)
            .with_thread(Some("thread_old".to_string()));
        repl.run().await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].endpoint, "/v1/threads/thread_old/messages");
        assert_eq!(calls[0].body.as_ref().unwrap()["content"], "hi");
    }

    #[tokio::test]
    async fn test_save_and_quit() {
        let mut replies = vec![MockReply::json(json!({"id": "thread_1"}))];
        replies.extend(exchange("run_1", "pong"));
        let transport = Arc::new(MockTransport::new(replies));
        let dir = TempDir::new().unwrap();

        let mut repl = repl(
            &transport,
            ScriptedSource::lines(&["ping", "/save", "/quit", "never sent"]),
            "",
            &dir,
        );
        repl.run().await.unwrap();

        let saved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(saved.len(), 1);
        let contents = std::fs::read_to_string(&saved[0]).unwrap();
        assert!(contents.contains("] user: ping\n"));
        assert!(contents.contains("] assistant: pong\n"));
        // Nothing after /quit reached the service
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_interrupt_and_blank_lines_are_ignored() {
        let transport = Arc::new(MockTransport::new(Vec::new()));
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource(VecDeque::from([
            Input::Interrupted,
            Input::Line("   ".to_string()),
            Input::Line("/unknown".to_string()),
            Input::Eof,
            Input::Line("after eof".to_string()),
        ]));

        let mut repl = repl(&transport, source, "", &dir);
        repl.run().await.unwrap();

        assert_eq!(transport.call_count(), 0);
        assert!(repl.transcript().is_empty());
    }
}
