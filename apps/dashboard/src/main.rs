use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    labels::{presets, Slider},
    views::{dashboard_view, CardView, DashboardView, ViewOptions},
    BatchError, DashboardOrchestrator, FormSession, HttpInferenceClient,
    LoadOutcome,
};
use shared::domain::{ActivityLevel, BuildType, FormQuality, Goal, Metabolism};
use storage::Storage;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_database_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Fuzzy fitness dashboard for the terminal")]
struct Cli {
    #[arg(long, default_value = "dashboard.toml")]
    config: PathBuf,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    storage_key: Option<String>,
    #[arg(long)]
    curve_samples: Option<usize>,
    /// Never ask to retry a failed load.
    #[arg(long)]
    no_prompt: bool,
    /// Also write the readiness gauge as SVG to this path.
    #[arg(long)]
    gauge_svg: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the dashboard for the last submitted inputs (the default).
    Show,
    /// Edit inputs, submit them, then show the dashboard.
    Submit(InputOverrides),
    /// Print the inputs the dashboard would use.
    Inputs,
    /// Check the local store and the inference service health endpoint.
    Health,
}

#[derive(Args, Debug, Default)]
struct InputOverrides {
    #[arg(long)]
    sleep: Option<f64>,
    #[arg(long)]
    energy: Option<f64>,
    #[arg(long)]
    soreness: Option<f64>,
    #[arg(long)]
    stress: Option<f64>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    waist: Option<f64>,
    #[arg(long)]
    activity_level: Option<ActivityLevel>,
    #[arg(long)]
    build_type: Option<BuildType>,
    #[arg(long)]
    weight_lifted: Option<f64>,
    /// Free text such as "6", "around 6" or "5-7".
    #[arg(long)]
    reps: Option<String>,
    #[arg(long)]
    rpe: Option<f64>,
    #[arg(long)]
    form_quality: Option<FormQuality>,
    #[arg(long)]
    nutrition_weight: Option<f64>,
    #[arg(long)]
    goal: Option<Goal>,
    #[arg(long)]
    nutrition_activity_level: Option<ActivityLevel>,
    #[arg(long)]
    metabolism: Option<Metabolism>,
    #[arg(long)]
    adherence: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    info!(api_url = %settings.api_url, database_url = %settings.database_url, "starting dashboard");

    let client = Arc::new(
        HttpInferenceClient::new(&settings.api_url)
            .with_context(|| format!("invalid api url '{}'", settings.api_url))?,
    );

    let storage = Arc::new(Storage::new(&settings.database_url).await?);

    if let Some(Command::Health) = &cli.command {
        storage.health_check().await?;
        println!("local store: ok");
        let health = client.health().await?;
        println!("inference service: {}", health.status);
        if !health.is_healthy() {
            bail!("inference service reports status '{}'", health.status);
        }
        return Ok(());
    }

    let mut session = FormSession::with_storage_key(storage, settings.storage_key.clone());
    let options = ViewOptions {
        sample_count: settings.curve_samples,
        ..ViewOptions::default()
    };

    match &cli.command {
        Some(Command::Inputs) => {
            let source = match session.load().await {
                LoadOutcome::Restored(_) => "last submission",
                LoadOutcome::Defaulted(_) => "defaults",
            };
            println!("# inputs from {source}");
            println!(
                "{}",
                serde_json::to_string_pretty(session.dashboard_snapshot().as_ref())?
            );
            Ok(())
        }
        Some(Command::Submit(overrides)) => {
            session.load().await;
            run_wizard(&mut session, overrides);
            session.submit(client.as_ref()).await?;
            println!("inputs saved");
            let orchestrator = DashboardOrchestrator::new(client);
            let result = orchestrator.retry(&session).await.map(|_| ());
            show(&orchestrator, &session, &cli, &options, result).await
        }
        Some(Command::Show) | None => {
            let orchestrator = DashboardOrchestrator::new(client);
            let result = orchestrator.start(&mut session).await.map(|_| ());
            show(&orchestrator, &session, &cli, &options, result).await
        }
        Some(Command::Health) => Ok(()),
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings(&cli.config)?;
    if let Some(v) = &cli.api_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &cli.database_url {
        settings.database_url = v.clone();
    }
    if let Some(v) = &cli.storage_key {
        settings.storage_key = v.clone();
    }
    if let Some(v) = cli.curve_samples {
        settings.curve_samples = v;
    }
    settings.database_url = normalize_database_url(&settings.database_url);
    Ok(settings)
}

/// Walks the four wizard steps, applying the overrides that belong to each.
fn run_wizard(session: &mut FormSession, overrides: &InputOverrides) {
    let sliders = [
        (Slider::zero_to_ten("Sleep Quality", presets::sleep()), overrides.sleep),
        (Slider::zero_to_ten("Energy Level", presets::energy()), overrides.energy),
        (Slider::zero_to_ten("Muscle Soreness", presets::soreness()), overrides.soreness),
        (Slider::zero_to_ten("Stress Level", presets::stress()), overrides.stress),
    ];
    {
        let readiness = session.readiness_mut();
        let fields = [
            &mut readiness.sleep,
            &mut readiness.energy,
            &mut readiness.soreness,
            &mut readiness.stress,
        ];
        for ((slider, value), field) in sliders.iter().zip(fields) {
            if let Some(value) = value {
                *field = slider.snap(*value);
            }
            println!("{}: {} ({})", slider.label, field, slider.current_label(*field));
        }
    }
    session.next_tab();

    let body = session.body_composition_mut();
    if let Some(v) = overrides.weight {
        body.weight = v;
    }
    if let Some(v) = overrides.height {
        body.height = v;
    }
    if let Some(v) = overrides.waist {
        body.waist = v;
    }
    if let Some(v) = overrides.activity_level {
        body.activity_level = v;
    }
    if let Some(v) = overrides.build_type {
        body.build_type = v;
    }
    session.next_tab();

    let strength = session.strength_mut();
    if let Some(v) = overrides.weight_lifted {
        strength.weight_lifted = v;
    }
    if let Some(v) = &overrides.reps {
        strength.reps = v.clone();
    }
    if let Some(v) = overrides.rpe {
        strength.rpe = v;
    }
    if let Some(v) = overrides.form_quality {
        strength.form_quality = v;
    }
    session.next_tab();

    let nutrition = session.nutrition_mut();
    if let Some(v) = overrides.nutrition_weight {
        nutrition.weight = v;
    }
    if let Some(v) = overrides.goal {
        nutrition.goal = v;
    }
    if let Some(v) = overrides.nutrition_activity_level {
        nutrition.activity_level = v;
    }
    if let Some(v) = overrides.metabolism {
        nutrition.metabolism = v;
    }
    if let Some(v) = overrides.adherence {
        nutrition.adherence = v.clamp(0.0, 1.0);
    }
    debug!(tab = %session.active_tab(), last = session.is_last_tab(), "wizard complete");
}

/// Renders the dashboard, offering a retry after each failed load when interactive.
async fn show(
    orchestrator: &DashboardOrchestrator,
    session: &FormSession,
    cli: &Cli,
    options: &ViewOptions,
    mut result: std::result::Result<(), BatchError>,
) -> Result<()> {
    loop {
        let view = dashboard_view(&orchestrator.state().await, options);
        print!("{}", render::render_dashboard(&view));

        let Err(err) = &result else {
            write_gauge_svg(cli, &view)?;
            return Ok(());
        };
        if cli.no_prompt || !io::stdin().is_terminal() || !confirm_retry().await? {
            return Err(anyhow!(err.clone()));
        }

        println!("{}", render::render_dashboard(&DashboardView::Loading));
        result = orchestrator.retry(session).await.map(|_| ());
        if let Err(err) = &result {
            debug!(error = %err, "retry failed");
        }
    }
}

async fn confirm_retry() -> Result<bool> {
    print!("Retry? [y/N] ");
    io::stdout().flush()?;
    let answer = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|_| line)
    })
    .await
    .context("stdin reader panicked")??;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn write_gauge_svg(cli: &Cli, view: &DashboardView) -> Result<()> {
    let Some(path) = &cli.gauge_svg else {
        return Ok(());
    };
    let DashboardView::Cards { cards, .. } = view else {
        return Ok(());
    };
    if let Some(CardView::Readiness(card)) = cards.first() {
        std::fs::write(path, render::gauge_svg(card))
            .with_context(|| format!("failed to write gauge svg '{}'", path.display()))?;
        info!(path = %path.display(), "wrote readiness gauge");
    }
    Ok(())
}
