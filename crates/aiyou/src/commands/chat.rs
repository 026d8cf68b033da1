//! Chat command - one-shot exchange in a fresh thread.

use std::io::{self, BufRead, IsTerminal, Read, Write};

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use clap::Args;

use super::Context;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The message to send. Read from stdin when omitted.
    pub message: Vec<String>,
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let input = read_input(&args.message, &mut stdin.lock(), interactive, !ctx.silent)?;
    let instruction = ctx.instruction()?;

    let conn = ctx.connect().await?;
    tracing::debug!(chars = input.len(), "Sending message");
    let response = conn.client.chat(&conn.session, &input, &instruction).await?;

    println!(
        "{}",
        format_reply(&response, conn.client.assistant_id(), ctx, Local::now())
    );
    Ok(())
}

/// Pick the message: arguments first, then piped stdin, then an interactive prompt.
pub fn read_input(
    message: &[String],
    reader: &mut impl BufRead,
    interactive: bool,
    show_prompt: bool,
) -> Result<String> {
    let input = if !message.is_empty() {
        message.join(" ")
    } else if !interactive {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        buf
    } else {
        if show_prompt {
            print!("Enter your message: ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        reader.read_line(&mut line)?;
        line
    };

    let input = input.trim();
    if input.is_empty() {
        bail!("No input provided");
    }
    Ok(input.to_string())
}

/// Format the reply for stdout.
pub fn format_reply(response: &str, assistant_id: &str, ctx: &Context, now: DateTime<Local>) -> String {
    if ctx.json_output {
        serde_json::json!({
            "assistant_id": assistant_id,
            "response": response,
            "timestamp": now.to_rfc3339(),
        })
        .to_string()
    } else if ctx.silent {
        response.to_string()
    } else {
        format!("[{}] AI.YOU: {}", now.format("%Y-%m-%d %H:%M:%S"), response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiyou_config::{DotEnv, Settings};
    use chrono::TimeZone;
    use std::io::Cursor;

    fn context() -> Context {
        Context {
            settings: Settings::default(),
            dotenv: DotEnv::default(),
            assistant: None,
            base_url: None,
            instruction: None,
            instruction_file: None,
            show_assistant_info: false,
            json_output: false,
            silent: false,
        }
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_arguments_are_joined() {
        let mut stdin = Cursor::new("ignored");
        let input = read_input(&args(&["what", "is", "rust?"]), &mut stdin, false, false).unwrap();
        assert_eq!(input, "what is rust?");
    }

    #[test]
    fn test_piped_stdin_is_read_whole_and_trimmed() {
        let mut stdin = Cursor::new("  line one\nline two\n\n");
        let input = read_input(&[], &mut stdin, false, false).unwrap();
        assert_eq!(input, "line one\nline two");
    }

    #[test]
    fn test_terminal_reads_one_line() {
        let mut stdin = Cursor::new("first line\nsecond line\n");
        let input = read_input(&[], &mut stdin, true, false).unwrap();
        assert_eq!(input, "first line");
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut stdin = Cursor::new(" \n\t\n");
        let err = read_input(&[], &mut stdin, false, false).unwrap_err();
        assert!(err.to_string().contains("No input"));

        let err = read_input(&args(&["  "]), &mut Cursor::new(""), false, false).unwrap_err();
        assert!(err.to_string().contains("No input"));
    }

    #[test]
    fn test_format_reply_modes() {
        let now = Local.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let mut ctx = context();

        assert_eq!(
            format_reply("Bonjour!", "asst_1", &ctx, now),
            "[2026-10-19 08:30:00] AI.YOU: Bonjour!"
        );

        ctx.silent = true;
        assert_eq!(format_reply("Bonjour!", "asst_1", &ctx, now), "Bonjour!");

        ctx.json_output = true;
        let value: serde_json::Value =
            serde_json::from_str(&format_reply("Bonjour!", "asst_1", &ctx, now)).unwrap();
        assert_eq!(value["response"], "Bonjour!");
        assert_eq!(value["assistant_id"], "asst_1");
    }
}
