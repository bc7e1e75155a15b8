use anyhow::{bail, Context, Result};
use std::sync::Arc;

use asset_core::adapters::outbound::{http::ApiClient, FileStateStore, FixedLocator, SystemClock};
use asset_core::domain::{
    models::{AppState, AttendanceOutcome, Coordinates, FormType, MaintenanceId},
    ports::outbound::StateStore,
    services::{AttendanceRecorder, AuthService, MaintenanceRatingService},
    RatingError,
};
use asset_core::AppConfig;

use crate::answers::{self, Answers};
use crate::cli::{AttendanceCommand, Cli, Commands, PositionArgs, RateArgs};

/// Adapters shared by every command.
struct Session {
    config: AppConfig,
    client: Arc<ApiClient>,
    store: Arc<FileStateStore>,
    state: AppState,
}

impl Session {
    fn open(config: AppConfig, dev: bool) -> Result<Self> {
        let mut state_path = config.state_path()?;
        if dev {
            state_path.set_file_name("state.dev.json");
        }
        let store = Arc::new(FileStateStore::new(state_path));
        let state = store
            .load()
            .with_context(|| format!("Failed to load state from {}", store.path().display()))?;

        let client = if dev {
            ApiClient::dev()?
        } else {
            ApiClient::from_config(&config)?
        };
        let client = Arc::new(client.with_token(state.auth.token().map(str::to_string)));

        Ok(Self {
            config,
            client,
            store,
            state,
        })
    }

    fn recorder(
        &self,
        position: &PositionArgs,
    ) -> AttendanceRecorder<FixedLocator, ApiClient, ApiClient, SystemClock> {
        let position = match (position.lat, position.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => self.config.default_position(),
        };
        AttendanceRecorder::new(
            Arc::new(FixedLocator::new(position)),
            self.client.clone(),
            self.client.clone(),
            Arc::new(SystemClock),
        )
        .with_store(self.store.clone())
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    // Runs before the config is read so a broken config file can still be located.
    let command = match cli.command {
        Commands::ConfigPath => return config_path(),
        command => command,
    };

    let config = AppConfig::load().context("Failed to load config")?;
    let mut session = Session::open(config, cli.dev)?;

    match command {
        Commands::SignIn { username } => sign_in(&mut session, &username).await,
        Commands::SignOut => {
            AuthService::new(session.client.clone())
                .with_store(session.store.clone())
                .sign_out(&mut session.state);
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => {
            whoami(&session.state);
            Ok(())
        }
        Commands::Attendance(command) => attendance(&mut session, command).await,
        Commands::Rate(args) => rate(&session, args).await,
        Commands::ConfigPath => unreachable!("config-path is handled before the session opens"),
    }
}

fn config_path() -> Result<()> {
    let path = AppConfig::config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(&AppConfig::default())?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
    }
    println!("{}", path.display());
    Ok(())
}

async fn sign_in(session: &mut Session, username: &str) -> Result<()> {
    let password = if session.client.dev_backend().is_some() {
        String::new()
    } else {
        rpassword::prompt_password("Password: ").context("Failed to read password")?
    };

    let role = AuthService::new(session.client.clone())
        .with_store(session.store.clone())
        .sign_in(&mut session.state, username, &password)
        .await?;

    println!("Signed in as {}.", role);
    Ok(())
}

fn whoami(state: &AppState) {
    if !state.auth.is_signed_in() {
        println!("Not signed in.");
        return;
    }
    println!(
        "{} ({})",
        state.auth.display_name().unwrap_or("unknown"),
        state
            .auth
            .employee_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "no employee id".to_string())
    );
    println!("Role: {}", state.auth.role());

    let permissions = state.auth.permissions();
    if permissions.is_empty() {
        println!("Permissions: none");
    } else {
        let list: Vec<&str> = permissions.iter().map(String::as_str).collect();
        println!("Permissions: {}", list.join(", "));
    }
}

async fn attendance(session: &mut Session, command: AttendanceCommand) -> Result<()> {
    let no_position = PositionArgs {
        lat: None,
        lng: None,
    };

    let outcome = match command {
        AttendanceCommand::Login(position) => {
            session.recorder(&position).login(&mut session.state).await?
        }
        AttendanceCommand::Logout(position) => {
            session.recorder(&position).logout(&mut session.state).await?
        }
        AttendanceCommand::Flush => {
            session
                .recorder(&no_position)
                .flush(&mut session.state)
                .await?
        }
        AttendanceCommand::Clear => {
            session.recorder(&no_position).clear(&mut session.state);
            println!("Pending queue cleared.");
            return Ok(());
        }
        AttendanceCommand::Status => {
            print_status(&session.state);
            return Ok(());
        }
    };

    match outcome {
        AttendanceOutcome::Skipped => println!("Nothing to do."),
        AttendanceOutcome::Submitted => println!("Attendance recorded."),
        AttendanceOutcome::Queued => println!(
            "Offline: attendance queued ({} pending).",
            session.state.attendance.pending_queue().len()
        ),
        AttendanceOutcome::Flushed(n) => println!("Sent {} queued record(s).", n),
    }
    Ok(())
}

fn print_status(state: &AppState) {
    match state.attendance.last_action() {
        Some(action) => println!("Last action: {}", action),
        None => println!("Last action: none"),
    }
    let queue = state.attendance.pending_queue();
    println!("Pending: {}", queue.len());
    for record in queue {
        let at = record.coordinates();
        println!(
            "  {} {} at {:.5},{:.5}",
            record.action_type(),
            record.date_time(),
            at.latitude,
            at.longitude
        );
    }
}

async fn rate(session: &Session, args: RateArgs) -> Result<()> {
    let answers = answers::load(&args.answers)?;
    let form_type: FormType = args.form_type.parse()?;

    let score = submit_answers(
        session,
        form_type,
        &answers,
        MaintenanceId::new(args.maintenance_id),
        args.draft,
    )
    .await?;

    println!("Score: {:.2} / 5", score);
    println!("{} submitted.", if args.draft { "Draft" } else { "Completion" });
    Ok(())
}

/// Rate the catalog for `form_type`, walk every page the way the form does,
/// and submit. Returns the score that was sent.
async fn submit_answers(
    session: &Session,
    form_type: FormType,
    answers: &Answers,
    maintenance_id: MaintenanceId,
    draft: bool,
) -> Result<f64> {
    let service = MaintenanceRatingService::new(session.client.clone())
        .with_score_mode(session.config.score_mode);
    let mut tree = service.load(form_type.clone()).await?;
    if tree.entries().is_empty() {
        bail!("No rating categories apply to form type {}", form_type);
    }

    answers::apply(&mut tree, answers)?;

    while !tree.is_last_page() {
        match tree.next_page() {
            Ok(page) => tracing::debug!(page, "Advanced rating page"),
            Err(RatingError::PageIncomplete { titles }) => bail!(
                "Page {} of {} is incomplete: {}",
                tree.current_page() + 1,
                tree.page_count(),
                titles.join(", ")
            ),
            Err(e) => return Err(e.into()),
        }
    }
    if !tree.can_submit() {
        bail!(
            "Complete all sections before submitting: {}",
            tree.incomplete_categories().join(", ")
        );
    }

    let score = tree.final_score();
    service.submit(&tree, maintenance_id, draft).await?;
    Ok(score)
}
