//! Interactive terminal front end for the copilot chat backend.
//!
//! # Usage
//!
//! ```bash
//! # Talk to $COPILOT_API_BASE_URL, or http://localhost:3001 when unset
//! copilot-chat
//!
//! # Point at a specific backend with a longer deadline
//! copilot-chat --base-url https://copilot.example.com --timeout-ms 20000
//!
//! # Disable colors (useful for piping output)
//! copilot-chat --no-color
//! ```
//!
//! Set `RUST_LOG=copilot=debug` to see each attempt and retry.
//!
//! # Commands
//!
//! - `/new` - Start a new chat
//! - `/health` - Check that the backend is reachable
//! - `/history` - Show the conversation so far
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use copilot::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use copilot::{ClientConfig, CopilotClient};

/// Main entry point for the copilot-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("copilot-chat [OPTIONS]");
    let config = ChatConfig::from_args(args, ClientConfig::from_env());

    let client = CopilotClient::new(config.client)?;
    let mut session = ChatSession::new(client);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("AI Copilot ({})", session.stats().base_url);
    println!("Type /help for commands, /quit to exit\n");
    for message in session.messages() {
        renderer.print_message(message);
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::NewChat => {
                            session.new_chat();
                            renderer.print_info("Started a new chat.");
                            for message in session.messages() {
                                renderer.print_message(message);
                            }
                        }
                        ChatCommand::Health => match session.health().await {
                            Ok(status) => renderer.print_info(&format!("Backend healthy: {status}")),
                            Err(err) => renderer.print_error(err.message()),
                        },
                        ChatCommand::History => {
                            for message in session.messages() {
                                renderer.print_message(message);
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                renderer.print_pending();
                match session.send(line).await {
                    Ok(Some(reply)) => renderer.print_message(&reply),
                    Ok(None) => {}
                    Err(err) => renderer.print_error(err.message()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
