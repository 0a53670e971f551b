//! Terminal rendering of agent results

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use loom_domain::{AgentResult, Chunk, Content, Metadata};
use loom_infrastructure::FileOutputConfig;

/// Print a result, draining it first when it is streamed.
pub async fn print_result(result: &mut AgentResult, config: &FileOutputConfig) -> Result<()> {
    if result.is_stream() {
        let mut stdout = std::io::stdout();
        while let Some(chunk) = result.next_chunk().await {
            match chunk? {
                Chunk::Text(text) => write!(stdout, "{}", text)?,
                Chunk::Structured(value) => write!(stdout, "{}", serde_json::to_string_pretty(&value)?)?,
                Chunk::ToolCalls(_) | Chunk::Empty => {}
            }
            stdout.flush()?;
        }
        println!();
    } else {
        match result.content() {
            Content::Text(text) => println!("{}", text),
            Content::Structured(value) => println!("{}", serde_json::to_string_pretty(value)?),
            Content::Empty => println!("{}", "(empty response)".dimmed()),
            Content::ToolCalls(calls) => {
                println!("{} {} unresolved tool call(s)", "Warning:".yellow().bold(), calls.len())
            }
            Content::Stream(_) => {}
        }
    }

    print_metadata(result.metadata(), config);
    Ok(())
}

fn print_metadata(metadata: &Metadata, config: &FileOutputConfig) {
    if config.show_sources
        && let Some(sources) = metadata.sources()
        && !sources.is_empty()
    {
        println!();
        println!("{}", "Sources:".bold().cyan());
        for (i, source) in sources.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                source.name().bold(),
                source.reference().dimmed()
            );
        }
    }

    if config.show_usage
        && let Some(usage) = metadata.token_usage()
    {
        println!();
        println!(
            "{} {} prompt + {} completion = {} tokens ({} request{})",
            "Usage:".bold().cyan(),
            usage.prompt_tokens(),
            usage.completion_tokens(),
            usage.total_tokens().to_string().bold(),
            usage.count(),
            if usage.count() == 1 { "" } else { "s" }
        );
    }
}
