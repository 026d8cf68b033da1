//! Info command - show the configured assistant.

use aiyou_client::AssistantInfo;
use anyhow::Result;
use console::{Style, style};

use super::Context;

/// Run the info command.
pub async fn run(ctx: &Context) -> Result<()> {
    // The fetch below replaces the post-login summary
    let ctx = Context {
        show_assistant_info: false,
        ..ctx.clone()
    };
    let conn = ctx.connect().await?;
    let info = conn.client.assistants().info(&conn.session).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_assistant_info(&info);
    }
    Ok(())
}

/// Styled summary on stdout.
pub fn print_assistant_info(info: &AssistantInfo) {
    let dim = Style::new().dim();

    println!();
    println!("{}", style(&info.name).bold().cyan());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {}  {}", dim.apply_to("ID:         "), info.id);
    println!("  {}  {}", dim.apply_to("Model:      "), info.model);
    println!("  {}  {}", dim.apply_to("Active:     "), info.active_script);
    if !info.description.is_empty() {
        println!("  {}  {}", dim.apply_to("Description:"), info.description);
    }
    println!();

    if info.tools.is_empty() {
        println!("{}", dim.apply_to("No tools"));
    } else {
        println!("{}", style(format!("Tools ({})", info.tools.len())).bold());
        for tool in &info.tools {
            println!("  {} {}", style(&tool.title).cyan(), dim.apply_to(&tool.display_name));
        }
    }
    println!();
}

/// Post-login summary through the log, so `--silent` hides it.
pub fn log_assistant_info(info: &AssistantInfo) {
    tracing::info!(
        name = %info.name,
        id = %info.id,
        model = %info.model,
        active_script = info.active_script,
        tools = info.tools.len(),
        "Assistant: {}",
        info.description
    );
    for tool in &info.tools {
        tracing::info!(title = %tool.title, display_name = %tool.display_name, "Tool");
    }
}
