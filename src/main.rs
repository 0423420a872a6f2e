use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use kalai::chat::models::Role;
use kalai::chat::repositories::JsonSessionRepository;
use kalai::chat::services::{GeminiClient, RequestBuilder};
use kalai::chat::{ChatController, ChatEvent};

const STORAGE_KEY: &str = "kal_ai_sessions";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let api_key =
        std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY environment variable not set")?;

    let service = Arc::new(GeminiClient::new(api_key));
    let repo = Arc::new(JsonSessionRepository::new(STORAGE_KEY)?);
    let controller = ChatController::load(service, repo, RequestBuilder::new()).await;

    info!("KAL AI assistant ready");
    print_active_session(&controller);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["/quit"] => break,
            ["/help"] => print_help(),
            ["/new"] => {
                controller.new_session().await;
                print_active_session(&controller);
            }
            ["/sessions"] => {
                let snapshot = controller.snapshot();
                for (i, session) in snapshot.sessions.iter().enumerate() {
                    let marker = if session.id == snapshot.current_session_id {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} [{}] {} ({} messages)",
                        marker,
                        i,
                        session.title,
                        session.messages.len()
                    );
                }
            }
            ["/select", index] => {
                if let Some(id) = session_id_at(&controller, index) {
                    controller.select_session(&id);
                    print_active_session(&controller);
                } else {
                    println!("No such session: {}", index);
                }
            }
            ["/delete", index] => {
                if let Some(id) = session_id_at(&controller, index) {
                    controller.delete_session(&id).await;
                    print_active_session(&controller);
                } else {
                    println!("No such session: {}", index);
                }
            }
            ["/attach", path] => {
                // Wait for the read so the prompt reflects the result.
                let _ = controller.attach_file(PathBuf::from(path)).await;
                for event in controller.take_events() {
                    let ChatEvent::AttachmentFailed { name, reason } = event;
                    println!("Could not attach {}: {}", name, reason);
                }
                let pending = controller.snapshot().pending_attachments;
                println!("{} attachment(s) pending", pending.len());
            }
            ["/detach", index] => {
                if let Ok(i) = index.parse::<usize>() {
                    controller.remove_attachment(i);
                }
                let pending = controller.snapshot().pending_attachments;
                println!("{} attachment(s) pending", pending.len());
            }
            _ => {
                controller.set_pending_text(&line);
                controller.send().await;
                print_last_reply(&controller);
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "Commands: /new /sessions /select <n> /delete <n> /attach <path> /detach <n> /quit\n\
         Anything else is sent as a message."
    );
}

fn session_id_at(controller: &ChatController, index: &str) -> Option<String> {
    let i: usize = index.parse().ok()?;
    controller.snapshot().sessions.get(i).map(|s| s.id.clone())
}

fn print_active_session(controller: &ChatController) {
    let snapshot = controller.snapshot();
    if let Some(session) = snapshot
        .sessions
        .iter()
        .find(|s| s.id == snapshot.current_session_id)
    {
        println!("── {} ──", session.title);
        if let Some(last) = session.messages.last() {
            println!("{}", last.text);
        }
    }
}

fn print_last_reply(controller: &ChatController) {
    let snapshot = controller.snapshot();
    let reply = snapshot
        .sessions
        .iter()
        .find(|s| s.id == snapshot.current_session_id)
        .and_then(|s| s.messages.iter().rev().find(|m| m.role == Role::Model));

    if let Some(message) = reply {
        if !message.text.is_empty() {
            println!("{}", message.text);
        }
        for attachment in &message.attachments {
            println!("[{} ({})]", attachment.name, attachment.mime_type);
        }
    }
}
