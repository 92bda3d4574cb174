use anyhow::{Context, Result};
use evcharts::{
    config::{Config, DEFAULT_CSV_NAME},
    export,
    fetch::HttpSource,
    regions,
    session::{LoadStatus, Session},
};
use reqwest::Client;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,evcharts=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = Config::from_env().context("reading configuration")?;
    info!(
        base = %cfg.base_url,
        regions = ?cfg.regions,
        years = ?cfg.years,
        "configured"
    );

    // ─── 3) load selection ───────────────────────────────────────────
    let source = HttpSource::new(Client::new(), cfg.base_url.clone());
    let start = Instant::now();
    let session = Session::new().load(&source, &cfg.regions).await;
    info!(elapsed = ?start.elapsed(), status = %session.status(), "load finished");

    match session.status() {
        LoadStatus::Loaded { .. } => {}
        LoadStatus::NeedsSelection => {
            anyhow::bail!("{} (set EV_REGIONS)", session.status());
        }
        LoadStatus::Failed(reason) => {
            anyhow::bail!("{} {}", session.status(), reason);
        }
        LoadStatus::Idle => anyhow::bail!("nothing was loaded"),
    }

    // ─── 4) apply configured year bounds ─────────────────────────────
    let session = if cfg.years.is_unbounded() {
        session
    } else {
        session.with_range(cfg.years)
    };
    info!(range = ?session.range(), "year range");

    // ─── 5) render ───────────────────────────────────────────────────
    let view = session.view().context("no pivot after a successful load")?;
    println!(
        "EV sales over time – {}",
        regions::labels(&view.regions).join(", ")
    );
    print!("{}", export::render_table(&view.pivot, &view.regions));

    match &view.stats {
        Some(stats) => {
            println!();
            println!(
                "Latest period: {}  total {}",
                stats.latest_period,
                export::format_grouped(stats.latest_total)
            );
            if let Some(top) = &stats.top_region {
                println!(
                    "Top region: {} ({})",
                    regions::label(top),
                    export::format_grouped(stats.top_region_total)
                );
            }
            println!("Periods: {}", stats.period_count);
        }
        None => warn!("no periods in the selected year range"),
    }

    // ─── 6) export ───────────────────────────────────────────────────
    if let Some(target) = &cfg.csv_out {
        let path = if target.is_dir() {
            target.join(DEFAULT_CSV_NAME)
        } else {
            target.clone()
        };
        export::write_csv(&path, &view.pivot, &view.regions)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!("all done");
    Ok(())
}
