//! Terminal driver for the lesson assistant
//!
//! Plain lines are sent in the current mode. Commands:
//!
//! | Command | Effect |
//! |---|---|
//! | `/mode <general\|error\|code\|guide>` | switch interaction mode |
//! | `/code <text>` | set the code or stack trace sent with the next message (`\n` allowed) |
//! | `/error <message>` | report a runtime error as the host page would |
//! | `/env <message>` | environment setup help (`/code` text is sent as system information) |
//! | `/optimize <prompt>` | prompt rewrite suggestions |
//! | `/help` | list commands and routes |
//! | `/reset` | clear the chat |
//! | `/quit` | exit |
//!
//! Logs go to stderr as JSON; chat goes to stdout.

use lesson_assistant::llm::{GeminiService, LlmService, LoggingService};
use lesson_assistant::prompt::all_routes;
use lesson_assistant::{
    AssistantConfig, ConversationSession, InteractionMode, PendingExternalError,
    PromptKind, Role, SessionUpdate,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesson_assistant=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AssistantConfig::from_env();
    let gemini = GeminiService::new(&config.llm)?;
    tracing::info!(
        model = %gemini.model_id(),
        credential = gemini.has_credential(),
        max_attempts = config.retry.max_attempts(),
        "Assistant initialized"
    );
    let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(gemini)));
    let session = Arc::new(ConversationSession::new(service, &config));

    let printer = tokio::spawn(print_updates(session.subscribe()));
    for message in session.messages() {
        print_message(message.role, &message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" => break,
            "/reset" => session.reset(),
            "/mode" => match arg.parse::<InteractionMode>() {
                Ok(mode) => session.set_mode(mode),
                Err(e) => println!("{e} (general, error, code, guide)"),
            },
            "/code" => {
                session.set_auxiliary_input(&arg.replace("\\n", "\n"));
                println!("(auxiliary input set)");
            }
            "/error" => {
                let error = PendingExternalError::new(arg).with_source("terminal");
                let session = session.clone();
                tokio::spawn(async move {
                    if let Err(e) = session.inject_external_error(error).await {
                        println!("{e}");
                    }
                });
            }
            "/env" => helper(&session, PromptKind::EnvironmentFix, arg).await,
            "/optimize" => helper(&session, PromptKind::PromptOptimization, arg).await,
            "/help" => print_help(),
            _ => {
                // Sent in the background so /error can arrive while busy
                let session = session.clone();
                let text = line.to_string();
                tokio::spawn(async move {
                    if let Err(e) = session.submit(&text).await {
                        println!("{e}");
                    }
                });
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Standalone routes answer directly without touching the chat history.
/// Whatever `/code` set goes along as system information or context.
async fn helper(session: &ConversationSession, kind: PromptKind, text: &str) {
    if text.is_empty() {
        println!("(nothing to send)");
        return;
    }
    let reply = session.ask(kind, text).await;
    print_message(Role::Assistant, &reply);
}

fn print_help() {
    println!("commands: /mode <general|error|code|guide>, /code <text>, /error <message>, /env <message>, /optimize <prompt>, /help, /reset, /quit");
    println!("routes:");
    for route in all_routes() {
        println!("  {:?}: {}", route.kind, route.context_label);
    }
}

async fn print_updates(mut updates: tokio::sync::broadcast::Receiver<SessionUpdate>) {
    loop {
        match updates.recv().await {
            Ok(SessionUpdate::MessageAppended { message }) => {
                print_message(message.role, &message.content);
            }
            Ok(SessionUpdate::StateChanged { loading, mode }) => {
                if loading {
                    println!("... ({mode})");
                } else {
                    println!("[mode: {mode}]");
                }
            }
            Ok(SessionUpdate::Reset) => println!("---- chat cleared ----"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Update printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_message(role: Role, content: &str) {
    let who = match role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("[{who}]\n{content}\n");
}
