//! dashboard-runner: terminal front end for the SEGUROPAR claims dashboard.
//!
//! Usage:
//!   dashboard-runner --db claims.db --screen fraud-analyst --threshold 0.8
//!   dashboard-runner --db claims.db --screen executive --format json
//!   dashboard-runner --db claims.db --ipc-mode
//!   dashboard-runner --seed-demo 500 --db demo.db --seed 42

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use seguropar_core::{
    config::DashboardConfig,
    demo_data,
    params::{CreditScoreFilter, FraudThreshold, Screen},
    render::{render_json, render_text},
    screens::ScreenReport,
    session::{DashboardSession, RenderRequest},
    source::{write_demo_database, ClaimSource},
};
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Render {
        #[serde(default)]
        screen: Option<Screen>,
        #[serde(default)]
        threshold: Option<f64>,
        #[serde(default)]
        credit_filter: Option<CreditScoreFilter>,
        #[serde(default)]
        today: Option<NaiveDate>,
    },
    Refresh,
    Screens,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match arg_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(db) = arg_value(&args, "--db") {
        config.source.db_path = db.to_string();
    }
    if let Some(view) = arg_value(&args, "--view") {
        config.source.view_name = view.to_string();
    }

    if let Some(count) = arg_value(&args, "--seed-demo") {
        let count: usize = count.parse().map_err(|e| anyhow!("--seed-demo {count}: {e}"))?;
        let seed = parse_arg(&args, "--seed", 42u64);
        let as_of = match arg_value(&args, "--today") {
            Some(d) => parse_date(d)?,
            None => today_utc(),
        };
        let portfolio = demo_data::generate(seed, count, as_of);
        write_demo_database(&config.source.db_path, &portfolio)?;
        println!(
            "Seeded {} claims into {} (seed {seed}, as of {as_of})",
            portfolio.claims.len(),
            config.source.db_path
        );
        return Ok(());
    }

    let today = match arg_value(&args, "--today") {
        Some(d) => parse_date(d)?,
        None => today_utc(),
    };
    let request = RenderRequest {
        screen: match arg_value(&args, "--screen") {
            Some(s) => s.parse()?,
            None => config.defaults.screen,
        },
        threshold: match arg_value(&args, "--threshold") {
            Some(t) => {
                let value: f64 = t.parse().map_err(|e| anyhow!("--threshold {t}: {e}"))?;
                FraudThreshold::new(value)?
            }
            None => config.defaults.fraud_threshold,
        },
        credit_filter: match arg_value(&args, "--credit-filter") {
            Some(c) => c.parse()?,
            None => config.defaults.credit_filter,
        },
        today,
    };
    let format = match arg_value(&args, "--format").unwrap_or("text") {
        "text" => OutputFormat::Text,
        "json" => OutputFormat::Json,
        other => bail!("Unknown --format {other} (expected text or json)"),
    };

    let mut session = DashboardSession::open(&config)?;

    if args.iter().any(|a| a == "--ipc-mode") {
        run_ipc_loop(&mut session, request)
    } else {
        let report = session.render(&request)?;
        print!("{}", render_output(&report, format, &config.source.view_name)?);
        Ok(())
    }
}

/// One-shot output. JSON mode emits the report alone so stdout parses.
fn render_output(report: &ScreenReport, format: OutputFormat, view_name: &str) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format!("{}{}", navigation(report.screen, view_name), render_text(report)),
        OutputFormat::Json => format!("{}\n", render_json(report)?),
    })
}

fn run_ipc_loop<S: ClaimSource>(session: &mut DashboardSession<S>, defaults: RenderRequest) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }
        let Some(reply) = handle_command(session, &defaults, &buffer) else {
            break;
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn error_reply(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

/// Reply to one IPC line. `None` means quit.
fn handle_command<S: ClaimSource>(
    session: &mut DashboardSession<S>,
    defaults: &RenderRequest,
    line: &str,
) -> Option<Value> {
    let cmd: IpcCommand = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("ipc: rejected command: {e}");
            return Some(error_reply(e));
        }
    };

    let reply = match cmd {
        IpcCommand::Quit => return None,
        IpcCommand::Screens => json!({
            "screens": Screen::ALL
                .iter()
                .map(|s| json!({ "slug": s.slug(), "label": s.label() }))
                .collect::<Vec<_>>(),
            "credit_filters": CreditScoreFilter::ALL
                .iter()
                .map(|f| json!({ "value": f, "label": f.label() }))
                .collect::<Vec<_>>(),
        }),
        IpcCommand::Refresh => match session.refresh() {
            Ok(rows) => json!({ "rows": rows }),
            Err(e) => error_reply(e),
        },
        IpcCommand::Render { screen, threshold, credit_filter, today } => {
            let threshold = match threshold.map(FraudThreshold::new).transpose() {
                Ok(t) => t.unwrap_or(defaults.threshold),
                Err(e) => return Some(error_reply(e)),
            };
            let request = RenderRequest {
                screen: screen.unwrap_or(defaults.screen),
                threshold,
                credit_filter: credit_filter.unwrap_or(defaults.credit_filter),
                today: today.unwrap_or(defaults.today),
            };
            match session.render(&request) {
                Ok(report) => serde_json::to_value(&report).unwrap_or_else(|e| error_reply(e)),
                Err(e) => {
                    log::error!("render aborted: {e}");
                    error_reply(e)
                }
            }
        }
    };
    Some(reply)
}

fn navigation(current: Screen, view_name: &str) -> String {
    let mut out = String::from("SEGUROPAR claims analytics\n");
    for screen in Screen::ALL {
        let marker = if screen == current { ">" } else { " " };
        out.push_str(&format!("  {marker} {:<16} (--screen {})\n", screen.label(), screen.slug()));
    }
    let filters: Vec<String> = CreditScoreFilter::ALL
        .iter()
        .map(|f| format!("{} = {}", serde_json::to_string(f).unwrap_or_default().trim_matches('"'), f.label()))
        .collect();
    out.push_str(&format!("  credit filters: {}\n", filters.join(", ")));
    out.push_str(&format!("  source view: {view_name}\n\n"));
    out
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| anyhow!("Invalid date {raw}: {e}"))
}

fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
