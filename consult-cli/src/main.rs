// consult-cli/src/main.rs
// Terminal front end for the consultation widgets

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use consult_sdk::{
    ClientBuilder, ConsultConfig, ConsultSession, LocalEnvironment, QueryResult, Rating,
    RatingDraft, Widget,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WidgetArg {
    Educational,
    RealEstate,
}

impl From<WidgetArg> for Widget {
    fn from(arg: WidgetArg) -> Self {
        match arg {
            WidgetArg::Educational => Widget::Educational,
            WidgetArg::RealEstate => Widget::RealEstate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RatingArg {
    #[value(alias = "up")]
    Positive,
    #[value(alias = "down")]
    Negative,
}

impl From<RatingArg> for Rating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Positive => Rating::Positive,
            RatingArg::Negative => Rating::Negative,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "consult",
    version,
    about = "Ask the consultation assistant and rate its answers",
    long_about = None
)]
struct Cli {
    /// Which widget to act as
    #[arg(long, short, value_enum, default_value = "real-estate")]
    widget: WidgetArg,

    /// Behave as if the device had no connectivity
    #[arg(long)]
    offline: bool,

    /// Fail instead of answering from the local keyword table
    #[arg(long)]
    no_fallback: bool,

    /// Check the webhook health endpoint
    #[arg(long)]
    health: bool,

    /// Print the session summary as JSON
    #[arg(long)]
    stats: bool,

    /// Rate the answer
    #[arg(long, value_enum)]
    rate: Option<RatingArg>,

    /// Comment sent with the rating
    #[arg(long, default_value = "")]
    comment: String,

    /// Directory for ratings that could not be delivered
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// The question to ask
    query: Vec<String>,
}

fn print_answer(result: &QueryResult) {
    println!("{}", result.data.answer);
    if !result.data.recommendations.is_empty() {
        println!();
        for recommendation in &result.data.recommendations {
            println!("  • {}", recommendation);
        }
    }
    println!();
    match &result.original_error {
        Some(reason) => println!(
            "[local answer, the assistant service was unavailable: {}] ({} ms)",
            reason,
            result.response_time.as_millis()
        ),
        None => println!(
            "[{} · confidence {:.0}%] ({} ms)",
            result.data.model,
            result.data.confidence * 100.0,
            result.response_time.as_millis()
        ),
    }
}

async fn run(session: &ConsultSession, cli: &Cli) -> anyhow::Result<bool> {
    let mut ok = true;

    if cli.health {
        let healthy = session.health_check().await;
        println!("webhook health: {}", if healthy { "up" } else { "down" });
    }

    let query = cli.query.join(" ");
    if !query.is_empty() {
        match session.ask(&query).await {
            Ok(result) => print_answer(&result),
            Err(e) => {
                log::debug!("Query failed: {}", e);
                eprintln!("{}", e.user_message(session.messages()));
                ok = false;
            }
        }
    }

    if let Some(rating) = cli.rate {
        let draft = RatingDraft::new()
            .select(rating.into())
            .comment(cli.comment.as_str());
        match session.rate(draft).await {
            Ok(outcome) => println!("rating saved ({})", outcome.source),
            Err(e) => {
                eprintln!("{}", e.user_message(session.messages()));
                ok = false;
            }
        }
    }

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&session.summary()?)?);
    }

    Ok(ok)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    if cli.query.is_empty() && cli.rate.is_none() && !cli.health && !cli.stats {
        bail!("nothing to do, pass a query or one of --rate, --health, --stats");
    }

    let widget = Widget::from(cli.widget);
    let mut config = ConsultConfig::from_env(widget)
        .with_context(|| format!("loading configuration for the {} widget", widget))?;
    if cli.no_fallback {
        config.enable_fallback = false;
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage_path = Some(dir.clone());
    }
    let config = config.with_default_storage();

    let environment = LocalEnvironment::detect().with_online(!cli.offline);
    log::info!("Consult {} widget, webhook {}", widget, config.webhook_url);

    let session = ClientBuilder::with_config(config)
        .environment(Arc::new(environment))
        .build()
        .context("building the consultation session")?;

    if !run(&session, &cli).await? {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_and_rating() {
        let cli = Cli::try_parse_from([
            "consult",
            "--widget",
            "educational",
            "--rate",
            "up",
            "--comment",
            "مفيد",
            "كيف",
            "أحسن",
            "الكتابة؟",
        ])
        .unwrap();

        assert_eq!(Widget::from(cli.widget), Widget::Educational);
        assert_eq!(cli.rate.map(Rating::from), Some(Rating::Positive));
        assert_eq!(cli.comment, "مفيد");
        assert_eq!(cli.query.join(" "), "كيف أحسن الكتابة؟");
        assert!(!cli.offline);
        assert!(cli.storage_dir.is_none());
    }

    #[test]
    fn test_defaults_and_rejections() {
        let cli = Cli::try_parse_from(["consult", "--offline", "--no-fallback", "سؤال"]).unwrap();
        assert_eq!(Widget::from(cli.widget), Widget::RealEstate);
        assert!(cli.offline && cli.no_fallback);
        assert!(cli.rate.is_none());

        assert!(Cli::try_parse_from(["consult", "--rate", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["consult", "--widget", "legal"]).is_err());
        assert!(Cli::try_parse_from(["consult", "--verbose"]).is_err());
    }
}
