use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use voice_tasks::api::ApiServerBuilder;
use voice_tasks::command::reply::HELP_SPEECH;
use voice_tasks::db::{self, UserRepo};
use voice_tasks::model::{CategoryFilter, NewCategory, Task};
use voice_tasks::reminder::spawn_reminders;
use voice_tasks::speech::TextToSpeech;
use voice_tasks::{
    Config, DbPool, FallbackSpeaker, Reply, Speaker, SqliteStore, TaskStore, VoiceSession,
};

/// Tasks - personal task manager driven by Spanish voice commands
#[derive(Parser)]
#[command(name = "tasks", version, about)]
struct Cli {
    /// Port for the HTTP API (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print replies without speaking them
    #[arg(long, env = "TASKS_MUTE")]
    mute: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and due-date reminders (default)
    Serve,
    /// Run one voice command, e.g. `tasks command crear tarea comprar pan`
    Command {
        /// Confirm bulk actions without asking
        #[arg(short, long)]
        yes: bool,
        /// Transcribed utterance
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,
    },
    /// Read one transcript per line from stdin
    Listen,
    /// List tasks
    Tasks,
    /// List categories
    Categories,
    /// Create a category
    AddCategory {
        name: String,
        /// Hex colour, e.g. "#22C55E"
        #[arg(long)]
        color: Option<String>,
    },
    /// Say a sentence through the speech chain
    Speak {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print the supported voice commands
    HelpVoice,
}

/// Everything a subcommand needs, opened once
struct App {
    config: Config,
    db: DbPool,
    session: Arc<VoiceSession>,
    speaker: Arc<FallbackSpeaker>,
    mute: bool,
}

impl App {
    fn open(config: Config, mute: bool) -> anyhow::Result<Self> {
        let db = db::init(config.db_path())?;
        let user = UserRepo::new(db.clone()).find_or_create(&config.user_email)?;
        tracing::debug!(user_id = user.id, email = %user.email, "active user");

        let store: Arc<dyn TaskStore> = Arc::new(SqliteStore::new(db.clone()));
        let session = Arc::new(VoiceSession::new(store, user.id));
        let speaker = Arc::new(FallbackSpeaker::from_config(&config.speech));

        Ok(Self {
            config,
            db,
            session,
            speaker,
            mute,
        })
    }

    fn store(&self) -> &Arc<dyn TaskStore> {
        self.session.store()
    }

    /// Print and speak a reply
    async fn say(&self, speech: &str) {
        println!("{speech}");
        if self.mute {
            return;
        }
        if let Err(e) = self.speaker.speak(speech).await {
            tracing::warn!(error = %e, "could not speak reply");
        }
    }

    async fn say_reply(&self, reply: &Reply) {
        if let Some(speech) = &reply.speech {
            self.say(speech).await;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,voice_tasks=info",
        1 => "info,voice_tasks=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.api_server.port = port;
    }
    tracing::debug!(?config.data_dir, user = %config.user_email, "loaded configuration");

    let command = cli.command.unwrap_or(Command::Serve);
    if matches!(command, Command::HelpVoice) {
        println!("{HELP_SPEECH}");
        return Ok(());
    }

    let app = App::open(config, cli.mute)?;

    match command {
        Command::Serve => serve(app).await,
        Command::Command { yes, transcript } => one_command(&app, &transcript.join(" "), yes).await,
        Command::Listen => listen(&app).await,
        Command::Tasks => list_tasks(&app).await,
        Command::Categories => list_categories(&app).await,
        Command::AddCategory { name, color } => add_category(&app, name, color).await,
        Command::Speak { text } => {
            app.speaker.speak(&text.join(" ")).await?;
            Ok(())
        }
        Command::HelpVoice => Ok(()),
    }
}

/// Run the API server until interrupted
async fn serve(app: App) -> anyhow::Result<()> {
    let reminders = start_reminders(&app);

    let server = ApiServerBuilder::new(app.db.clone(), app.session.clone(), app.config.api_server.port)
        .api_key(app.config.api_server.api_key.clone())
        .tts(TextToSpeech::from_config(&app.config.speech))
        .build();

    tracing::info!(
        port = app.config.api_server.port,
        user = %app.config.user_email,
        "voice tasks ready"
    );

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }

    if let Some(handle) = reminders {
        handle.abort();
    }

    Ok(())
}

fn start_reminders(app: &App) -> Option<tokio::task::JoinHandle<()>> {
    if !app.config.reminders.enabled {
        return None;
    }

    let speaker: Arc<dyn Speaker> = app.speaker.clone();
    Some(spawn_reminders(
        app.store().clone(),
        speaker,
        app.session.user_id(),
        &app.config.reminders,
    ))
}

/// Handle one utterance, asking before bulk changes
async fn one_command(app: &App, transcript: &str, yes: bool) -> anyhow::Result<()> {
    let reply = app.session.handle(transcript).await?;
    app.say_reply(&reply).await;

    if !reply.awaiting_confirmation {
        if reply.speech.is_none() {
            println!("No entendí el comando. Prueba `tasks help-voice`.");
        }
        return Ok(());
    }

    let accepted = if yes {
        true
    } else {
        tokio::task::spawn_blocking(|| {
            Confirm::new()
                .with_prompt("¿Confirmar?")
                .default(false)
                .interact()
        })
        .await??
    };

    if accepted {
        let reply = app.session.confirm().await?;
        app.say_reply(&reply).await;
    } else {
        app.session.cancel().await;
    }

    Ok(())
}

/// One transcript per stdin line; "sí"/"no" answer a pending question
async fn listen(app: &App) -> anyhow::Result<()> {
    let reminders = start_reminders(app);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if app.session.pending().await.is_some() {
            match parse_answer(line) {
                Some(true) => {
                    let reply = app.session.confirm().await?;
                    app.say_reply(&reply).await;
                    continue;
                }
                Some(false) => {
                    app.session.cancel().await;
                    continue;
                }
                None => {}
            }
        }

        let reply = app.session.handle(line).await?;
        app.say_reply(&reply).await;
    }

    if let Some(handle) = reminders {
        handle.abort();
    }

    Ok(())
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.to_lowercase().trim_end_matches(['.', '!']) {
        "sí" | "si" | "s" | "vale" | "confirmar" | "yes" | "y" => Some(true),
        "no" | "n" | "cancelar" => Some(false),
        _ => None,
    }
}

async fn list_tasks(app: &App) -> anyhow::Result<()> {
    let user = app.session.user_id();
    let tasks = app.store().list_tasks(user, CategoryFilter::All).await?;
    let categories = app.store().list_categories(user).await?;

    if tasks.is_empty() {
        println!("No hay tareas.");
        return Ok(());
    }

    for task in &tasks {
        let category = task
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str());
        println!("{}", format_task(task, category));
    }

    Ok(())
}

fn format_task(task: &Task, category: Option<&str>) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] #{} {} ({})", task.id, task.title, task.priority);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" · {due}"));
    }
    if let Some(name) = category {
        line.push_str(&format!(" · {name}"));
    }
    line
}

async fn list_categories(app: &App) -> anyhow::Result<()> {
    let categories = app.store().list_categories(app.session.user_id()).await?;

    if categories.is_empty() {
        println!("No hay categorías.");
    }
    for category in categories {
        println!("#{} {} {}", category.id, category.name, category.color);
    }

    Ok(())
}

async fn add_category(app: &App, name: String, color: Option<String>) -> anyhow::Result<()> {
    let category = app
        .store()
        .create_category(app.session.user_id(), NewCategory { name, color })
        .await?;
    println!("Categoría creada: {} ({})", category.name, category.color);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use voice_tasks::model::Priority;

    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("sí"), Some(true));
        assert_eq!(parse_answer("Si."), Some(true));
        assert_eq!(parse_answer("no"), Some(false));
        assert_eq!(parse_answer("cancelar!"), Some(false));
        assert_eq!(parse_answer("crear tarea pan"), None);
    }

    #[test]
    fn test_format_task() {
        let task = Task {
            id: 7,
            title: "pagar luz".to_string(),
            description: None,
            completed: true,
            due_date: NaiveDate::from_ymd_opt(2025, 5, 15),
            category_id: Some(1),
            priority: Priority::Alta,
            created_at: Utc::now(),
        };

        assert_eq!(
            format_task(&task, Some("Casa")),
            "[x] #7 pagar luz (alta) · 2025-05-15 · Casa"
        );
    }
}
