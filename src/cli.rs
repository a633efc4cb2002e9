// src/cli.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::core::{ApiClient, ConfigManager, ConfigStore, FileStore};
use crate::llm::{LlmClient, LlmConfig, LlmProvider};
use crate::optimistic::{
    Collection, ConsoleNotifier, Entity, MutationController, MutationError, MutationKind,
    MutationOutcome, Notifier,
};
use crate::quick_add::{ApplicationTarget, InterviewDraft};
use crate::stats::{self, Statistics, TrendPeriod};
use crate::types::{
    Application, ApplicationStatus, CreateApplicationRequest, CreateInterviewRequest, Interview,
    InterviewStatus, LoginRequest, RegisterRequest, UpdateApplicationRequest,
    UpdateInterviewRequest,
};
use crate::utils::{format_local, parse_user_date, parse_user_time, truncate, week_bounds};

#[derive(Parser)]
#[command(name = "offermatrix")]
#[command(about = "Track job applications and interviews")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL, overrides config.yaml
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in, register, log out
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Company applications
    Apps {
        #[command(subcommand)]
        command: AppsCommand,
    },
    /// Interview schedule and reviews
    Interviews {
        #[command(subcommand)]
        command: InterviewsCommand,
    },
    /// Summary numbers and interview trend
    Stats {
        #[arg(long, value_enum, default_value_t = PeriodArg::Week)]
        period: PeriodArg,
    },
    /// LLM provider settings, invite parsing, JD analysis
    Llm {
        #[command(subcommand)]
        command: LlmCommand,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Register {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in user
    Me,
}

#[derive(Subcommand)]
pub enum AppsCommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        /// Comma-separated statuses, e.g. IN_PROCESS,OFFER
        #[arg(long, value_delimiter = ',')]
        status: Vec<ApplicationStatus>,
    },
    Show {
        id: i64,
    },
    Add {
        company: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<ApplicationStatus>,
    },
    /// Change status (IN_PROCESS, OFFER, REJECTED)
    Status {
        id: i64,
        status: ApplicationStatus,
    },
    Edit {
        id: i64,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        jd_file: Option<PathBuf>,
    },
    /// Delete an application and its interviews
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum InterviewsCommand {
    List {
        /// Only the current week (Sunday to Saturday)
        #[arg(long)]
        week: bool,
        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// YYYY-MM-DD, exclusive
        #[arg(long)]
        to: Option<String>,
    },
    Add {
        application_id: i64,
        round: String,
        /// RFC 3339 or "YYYY-MM-DD HH:MM" local time
        start: String,
        end: String,
        #[arg(long)]
        link: Option<String>,
    },
    /// Move an interview to a new time slot
    Reschedule {
        id: i64,
        start: String,
        end: String,
    },
    Status {
        id: i64,
        status: InterviewStatus,
    },
    /// Write the post-interview review
    Review {
        id: i64,
        text: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LlmCommand {
    Configure {
        #[arg(long)]
        provider: LlmProvider,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        /// Save without sending a test prompt
        #[arg(long)]
        skip_test: bool,
    },
    Show,
    Clear,
    Test,
    /// Extract interview details from an invitation
    Parse {
        /// Invitation text; use --file for longer messages
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Create the interview (and the company if new)
        #[arg(long)]
        create: bool,
    },
    /// Analyze an application's job description and save the result
    Analyze {
        application_id: i64,
        /// Replace the stored JD with this file first
        #[arg(long)]
        jd_file: Option<PathBuf>,
        #[arg(long)]
        salary: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Week,
    Month,
}

/// Everything a command needs, built once per invocation
pub struct AppContext {
    pub config: ConfigManager,
    pub store: Arc<dyn ConfigStore>,
    pub client: ApiClient,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(config: ConfigManager, store: Arc<dyn ConfigStore>) -> Result<Self> {
        let client = ApiClient::new(
            config.environment.api_base_url.clone(),
            config.environment.request_timeout(),
            Arc::clone(&store),
        )?;

        Ok(Self {
            config,
            store,
            client,
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    pub fn from_config(config: ConfigManager) -> Result<Self> {
        let store: Arc<dyn ConfigStore> =
            Arc::new(FileStore::new(config.environment.state_path.clone()));
        Self::new(config, store)
    }

    fn controller<T: Entity + Send + 'static>(&self, items: Vec<T>) -> MutationController<T> {
        MutationController::new(Collection::new(items), Arc::clone(&self.notifier))
            .with_timeout(self.config.environment.mutation_timeout())
    }
}

/// Apply command-line overrides, build the context and dispatch
pub async fn run(cli: Cli, mut config: ConfigManager) -> Result<ExitCode> {
    if let Some(url) = cli.api_url {
        config.environment.api_base_url = url;
    }
    app_log!(
        info,
        "Running against {} ({})",
        config.environment.api_base_url,
        config.environment_name
    );

    let ctx = AppContext::from_config(config)?;
    handle_command(cli.command, &ctx).await
}

pub async fn handle_command(command: Command, ctx: &AppContext) -> Result<ExitCode> {
    match command {
        Command::Auth { command } => handle_auth(command, ctx).await,
        Command::Apps { command } => handle_apps(command, ctx).await,
        Command::Interviews { command } => handle_interviews(command, ctx).await,
        Command::Stats { period } => handle_stats(period, ctx).await,
        Command::Llm { command } => handle_llm(command, ctx).await,
    }
}

/// Exit status for a settled list edit
fn settled(result: Result<MutationOutcome, MutationError>) -> Result<ExitCode> {
    match result {
        Ok(MutationOutcome::Confirmed) => Ok(ExitCode::SUCCESS),
        Ok(MutationOutcome::RolledBack { reason }) => {
            eprintln!("   {}", reason);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            app_log!(warn, "List edit not started: {}", e);
            eprintln!("❌ {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_auth(command: AuthCommand, ctx: &AppContext) -> Result<ExitCode> {
    let auth = ctx.client.auth();
    match command {
        AuthCommand::Login { username, password } => {
            let response = auth.login(&LoginRequest { username, password }).await?;
            println!("✅ Logged in as {}", response.user.username);
        }
        AuthCommand::Register { username, password } => {
            let request = RegisterRequest { username, password };
            request.validate()?;
            let user = auth.register(&request).await?;
            println!("✅ Registered {} (id {})", user.username, user.id);
            println!("   Log in with: offermatrix auth login {} --password ...", user.username);
        }
        AuthCommand::Logout => {
            auth.logout()?;
            println!("✅ Logged out");
        }
        AuthCommand::Me => {
            let user = auth.me().await?;
            println!("{} (id {}, since {})", user.username, user.id, user.created_at.date_naive());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_applications(applications: &[Application]) {
    if applications.is_empty() {
        println!("No applications found.");
        return;
    }

    println!(
        "{:<5} {:<24} {:<24} {:<11} {:<10} {:<12}",
        "ID", "Company", "Position", "Status", "Rounds", "Updated"
    );
    println!("{}", "-".repeat(90));
    for app in applications {
        println!(
            "{:<5} {:<24} {:<24} {:<11} {:<10} {:<12}",
            app.id,
            truncate(&app.company_name, 24),
            truncate(&app.job_title, 24),
            app.current_status,
            app.interview_count(),
            app.updated_at.with_timezone(&Local).date_naive().to_string()
        );
    }
}

fn print_interviews(interviews: &[Interview]) {
    if interviews.is_empty() {
        println!("No interviews found.");
        return;
    }

    println!(
        "{:<5} {:<20} {:<16} {:<12} {:<12} {:<10} {:<8}",
        "ID", "Company", "Round", "Start", "End", "Status", "Review"
    );
    println!("{}", "-".repeat(90));
    for interview in interviews {
        let company = interview
            .company_name()
            .map(|c| truncate(c, 20))
            .unwrap_or_else(|| format!("app #{}", interview.application_id));
        println!(
            "{:<5} {:<20} {:<16} {:<12} {:<12} {:<10} {:<8}",
            interview.id,
            company,
            truncate(&interview.round_name, 16),
            format_local(&interview.start_time),
            format_local(&interview.end_time),
            interview.status,
            if interview.is_reviewed() { "yes" } else { "-" }
        );
    }
}

async fn handle_apps(command: AppsCommand, ctx: &AppContext) -> Result<ExitCode> {
    let api = ctx.client.applications();
    match command {
        AppsCommand::List { keyword, status } => {
            let mut applications = api.list(keyword.as_deref(), &status).await?;
            applications.sort_by_key(|a| a.current_status.display_rank());
            print_applications(&applications);
        }
        AppsCommand::Show { id } => {
            let app = api.get(id).await?;
            println!("#{} {} - {}", app.id, app.company_name, app.job_title);
            println!("Status:  {}", app.current_status);
            if !app.salary.is_empty() {
                println!("Salary:  {}", app.salary);
            }
            if !app.job_description.is_empty() {
                println!("\nJob description:\n{}", app.job_description);
            }
            if !app.jd_analysis.is_empty() {
                println!("\nAnalysis:\n{}", app.jd_analysis);
            }
            if let Some(interviews) = &app.interviews {
                println!();
                print_interviews(interviews);
            }
        }
        AppsCommand::Add {
            company,
            title,
            status,
        } => {
            let app = api
                .create(&CreateApplicationRequest {
                    company_name: company,
                    job_title: title,
                    current_status: status,
                })
                .await?;
            println!("✅ Created application #{} for {}", app.id, app.company_name);
        }
        AppsCommand::Status { id, status } => {
            let controller = ctx.controller(api.list(None, &[]).await?);
            let result = controller
                .apply_field_update(
                    id,
                    MutationKind::Status,
                    UpdateApplicationRequest::status(status),
                    |changes| async move { api.update(id, &changes).await },
                )
                .await;
            if let Some(app) = controller.get(id) {
                print_applications(&[app]);
            }
            return settled(result);
        }
        AppsCommand::Edit {
            id,
            company,
            title,
            salary,
            jd_file,
        } => {
            let job_description = match jd_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                None => None,
            };
            let changes = UpdateApplicationRequest {
                company_name: company,
                job_title: title,
                salary,
                job_description,
                ..Default::default()
            };
            if changes.is_empty() {
                anyhow::bail!("Nothing to change; pass --company, --title, --salary or --jd-file");
            }

            let controller = ctx.controller(api.list(None, &[]).await?);
            let result = controller
                .apply_field_update(id, MutationKind::Update, changes, |changes| async move {
                    api.update(id, &changes).await
                })
                .await;
            if let Some(app) = controller.get(id) {
                print_applications(&[app]);
            }
            return settled(result);
        }
        AppsCommand::Delete { id } => {
            let controller = ctx.controller(api.list(None, &[]).await?);
            let result = controller
                .apply_delete(id, || async move { api.delete(id).await })
                .await;
            return settled(result);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_user_time(start)?;
    let end = parse_user_time(end)?;
    if end <= start {
        anyhow::bail!("End time must be after start time");
    }
    Ok((start, end))
}

async fn handle_interviews(command: InterviewsCommand, ctx: &AppContext) -> Result<ExitCode> {
    let api = ctx.client.interviews();
    match command {
        InterviewsCommand::List { week, from, to } => {
            let (start, end) = if week {
                let (start, end) = week_bounds(Local::now())?;
                (Some(start), Some(end))
            } else {
                (
                    from.as_deref().map(parse_user_date).transpose()?,
                    to.as_deref().map(parse_user_date).transpose()?,
                )
            };
            let mut interviews = api.list(start, end).await?;
            interviews.sort_by_key(|i| i.start_time);
            print_interviews(&interviews);
        }
        InterviewsCommand::Add {
            application_id,
            round,
            start,
            end,
            link,
        } => {
            let (start_time, end_time) = parse_range(&start, &end)?;
            let interview = api
                .create(&CreateInterviewRequest {
                    application_id,
                    round_name: round,
                    start_time,
                    end_time,
                    status: None,
                    meeting_link: link,
                    review_content: None,
                })
                .await?;
            println!("✅ Scheduled interview #{}", interview.id);
        }
        InterviewsCommand::Reschedule { id, start, end } => {
            let (start, end) = parse_range(&start, &end)?;
            let controller = ctx.controller(api.list(None, None).await?);
            let result = controller
                .apply_reschedule(id, start, end, |start, end| async move {
                    api.update(id, &UpdateInterviewRequest::time_range(start, end))
                        .await
                })
                .await;
            if let Some(interview) = controller.get(id) {
                print_interviews(&[interview]);
            }
            return settled(result);
        }
        InterviewsCommand::Status { id, status } => {
            let controller = ctx.controller(api.list(None, None).await?);
            let result = controller
                .apply_field_update(
                    id,
                    MutationKind::Status,
                    UpdateInterviewRequest::status(status),
                    |changes| async move { api.update(id, &changes).await },
                )
                .await;
            if let Some(interview) = controller.get(id) {
                print_interviews(&[interview]);
            }
            return settled(result);
        }
        InterviewsCommand::Review { id, text } => {
            let controller = ctx.controller(api.list(None, None).await?);
            let changes = UpdateInterviewRequest {
                review_content: Some(text),
                ..Default::default()
            };
            let result = controller
                .apply_field_update(id, MutationKind::Update, changes, |changes| async move {
                    let text = changes.review_content.unwrap_or_default();
                    api.update_review(id, &text).await
                })
                .await;
            return settled(result);
        }
        InterviewsCommand::Delete { id } => {
            let controller = ctx.controller(api.list(None, None).await?);
            let result = controller
                .apply_delete(id, || async move { api.delete(id).await })
                .await;
            return settled(result);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_stats(period: PeriodArg, ctx: &AppContext) -> Result<ExitCode> {
    let applications_api = ctx.client.applications();
    let interviews_api = ctx.client.interviews();
    let (applications, interviews) = tokio::try_join!(
        applications_api.list(None, &[]),
        interviews_api.list(None, None),
    )?;

    let now = Local::now();
    let summary = Statistics::compute(&applications, &interviews, &Local);
    let this_week = stats::this_week_count(&interviews, now)?;

    println!("Companies:        {}", summary.total_companies);
    println!("  in process:     {}", summary.in_process);
    println!("  offers:         {}", summary.offers);
    println!("  rejected:       {}", summary.rejected);
    println!("Offer rate:       {:.1}%", summary.offer_rate);
    println!("Interviews:       {}", summary.total_interviews);
    println!("  this week:      {}", this_week);
    println!("Review rate:      {:.1}%", summary.review_rate);
    match &summary.busiest_day {
        Some(day) => println!("Busiest day:      {} ({} interviews)", day.date, day.count),
        None => println!("Busiest day:      -"),
    }

    let period = match period {
        PeriodArg::Week => TrendPeriod::Week,
        PeriodArg::Month => TrendPeriod::Month,
    };
    println!("\nTrend:");
    for point in stats::trend(&interviews, period, now)? {
        println!("  {:>7}  {:<3} {}", point.label, point.count, "#".repeat(point.count));
    }

    Ok(ExitCode::SUCCESS)
}

async fn handle_llm(command: LlmCommand, ctx: &AppContext) -> Result<ExitCode> {
    match command {
        LlmCommand::Configure {
            provider,
            api_key,
            model,
            base_url,
            skip_test,
        } => {
            let config = LlmConfig {
                provider,
                api_key,
                model,
                base_url,
            };
            if !skip_test && !LlmClient::test_connection(&config).await {
                eprintln!("❌ Connection test failed; settings not saved (use --skip-test to force)");
                return Ok(ExitCode::FAILURE);
            }
            ctx.store.set_llm_config(config)?;
            println!("✅ LLM settings saved");
        }
        LlmCommand::Show => match ctx.store.llm_config()? {
            Some(config) => {
                println!("Provider: {}", config.provider);
                println!("Model:    {}", config.model());
                println!("Base URL: {}", config.base_url());
                println!("API key:  {}", config.masked_key());
            }
            None => println!("LLM is not configured."),
        },
        LlmCommand::Clear => {
            ctx.store.clear_llm_config()?;
            println!("✅ LLM settings cleared");
        }
        LlmCommand::Test => {
            let config = ctx
                .store
                .llm_config()?
                .context("LLM is not configured; run `offermatrix llm configure` first")?;
            if LlmClient::test_connection(&config).await {
                println!("✅ {} responded", config.provider);
            } else {
                eprintln!("❌ {} did not respond", config.provider);
                return Ok(ExitCode::FAILURE);
            }
        }
        LlmCommand::Parse { text, file, create } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Pass the invitation text or --file"),
            };

            let llm = LlmClient::from_store(ctx.store.as_ref())?;
            let parsed = llm.parse_interview_text(&text).await?;

            let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
            println!("Company:    {}", show(&parsed.company_name));
            println!("Round:      {}", show(&parsed.round_name));
            println!("Start:      {}", show(&parsed.start_time));
            println!("End:        {}", show(&parsed.end_time));
            println!("Link:       {}", show(&parsed.meeting_link));
            println!("Confidence: {:.0}%", parsed.confidence * 100.0);

            if create {
                let applications = ctx.client.applications().list(None, &[]).await?;
                let draft = InterviewDraft::from_parsed(&parsed, &applications)?;
                if let ApplicationTarget::New(company) = &draft.target {
                    println!("Adding new company: {}", company);
                }
                let interview = draft.submit(&ctx.client).await?;
                println!("✅ Interview #{} added", interview.id);
            }
        }
        LlmCommand::Analyze {
            application_id,
            jd_file,
            salary,
        } => {
            let api = ctx.client.applications();
            let mut app = api.get(application_id).await?;

            if jd_file.is_some() || salary.is_some() {
                let job_description = match jd_file {
                    Some(path) => Some(
                        tokio::fs::read_to_string(&path)
                            .await
                            .with_context(|| format!("Failed to read {}", path.display()))?,
                    ),
                    None => None,
                };
                app = api
                    .update(
                        application_id,
                        &UpdateApplicationRequest {
                            job_description,
                            salary,
                            ..Default::default()
                        },
                    )
                    .await?;
                println!("✅ Job description saved");
            }

            let llm = LlmClient::from_store(ctx.store.as_ref())?;
            let analysis = llm
                .analyze_job_description(
                    &app.job_description,
                    &app.company_name,
                    &app.job_title,
                    &app.salary,
                )
                .await?;

            println!("{}", analysis);

            api.update(
                application_id,
                &UpdateApplicationRequest {
                    jd_analysis: Some(analysis),
                    ..Default::default()
                },
            )
            .await?;
            println!("\n✅ Analysis saved");
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryStore, StoredState};
    use clap::CommandFactory;

    fn memory_context() -> AppContext {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new(StoredState::default()));
        AppContext::new(
            ConfigManager {
                environment_name: "local".to_string(),
                environment: Default::default(),
            },
            store,
        )
        .unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_list() {
        let cli = Cli::try_parse_from([
            "offermatrix",
            "apps",
            "list",
            "--status",
            "IN_PROCESS,offer",
        ])
        .unwrap();
        match cli.command {
            Command::Apps {
                command: AppsCommand::List { status, keyword },
            } => {
                assert_eq!(status, vec![ApplicationStatus::InProcess, ApplicationStatus::Offer]);
                assert!(keyword.is_none());
            }
            _ => panic!("expected apps list"),
        }
    }

    #[test]
    fn test_parse_reschedule_and_global_url() {
        let cli = Cli::try_parse_from([
            "offermatrix",
            "interviews",
            "reschedule",
            "7",
            "2024-06-03 10:00",
            "2024-06-03 11:00",
            "--api-url",
            "http://backend:9000/api",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://backend:9000/api"));
        assert!(matches!(
            cli.command,
            Command::Interviews {
                command: InterviewsCommand::Reschedule { id: 7, .. }
            }
        ));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(Cli::try_parse_from(["offermatrix", "apps", "status", "1", "GHOSTED"]).is_err());
    }

    #[test]
    fn test_parse_range_requires_order() {
        assert!(parse_range("2024-06-03T10:00:00Z", "2024-06-03T11:00:00Z").is_ok());
        assert!(parse_range("2024-06-03T10:00:00Z", "2024-06-03T10:00:00Z").is_err());
    }

    #[tokio::test]
    async fn test_llm_show_and_clear_use_store() {
        let ctx = memory_context();
        ctx.store
            .set_llm_config(LlmConfig {
                provider: LlmProvider::Qwen,
                api_key: "sk-abcdef123456".to_string(),
                model: None,
                base_url: None,
            })
            .unwrap();

        let code = handle_command(Command::Llm { command: LlmCommand::Show }, &ctx)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        handle_command(Command::Llm { command: LlmCommand::Clear }, &ctx)
            .await
            .unwrap();
        assert!(ctx.store.llm_config().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_reports_unreachable_backend() {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new(StoredState::default()));
        let mut config = ConfigManager {
            environment_name: "local".to_string(),
            environment: Default::default(),
        };
        config.environment.api_base_url = "http://127.0.0.1:9/api".to_string();
        config.environment.request_timeout_seconds = 2;
        let ctx = AppContext::new(config, store).unwrap();

        let result = handle_command(
            Command::Stats {
                period: PeriodArg::Month,
            },
            &ctx,
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<crate::core::ApiError>().is_some());
    }

    #[tokio::test]
    async fn test_llm_test_without_config_fails() {
        let ctx = memory_context();
        assert!(handle_command(Command::Llm { command: LlmCommand::Test }, &ctx)
            .await
            .is_err());
    }

    #[test]
    fn test_settled_exit_codes() {
        assert_eq!(settled(Ok(MutationOutcome::Confirmed)).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            settled(Ok(MutationOutcome::RolledBack {
                reason: "HTTP 500".to_string()
            }))
            .unwrap(),
            ExitCode::FAILURE
        );
        assert_eq!(settled(Err(MutationError::NotFound(3))).unwrap(), ExitCode::FAILURE);
    }
}
