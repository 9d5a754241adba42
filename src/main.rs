use anyhow::{bail, Context};
use clap::Parser;
use drawkill::{
    config::ConfigManager,
    data::{HistoryConnector, SyntheticHistory},
    DrawkillError, History, KillEngine,
};
use std::path::PathBuf;

/// Ranks the numbers least likely to appear in the next draw of a history file.
#[derive(Parser, Debug)]
#[command(name = "drawkill", version, long_about = None)]
struct Args {
    /// History file, one draw per line
    #[arg(required_unless_present_any = ["demo", "describe"], conflicts_with = "demo")]
    history: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print forward predictions instead of the kill report
    #[arg(long)]
    forward: bool,

    /// Print the strategy list and configuration manifests
    #[arg(long)]
    describe: bool,

    /// Run on a synthetic history of this many draws
    #[arg(long, value_name = "ROWS", num_args = 0..=1, default_missing_value = "60")]
    demo: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let manager = ConfigManager::new();
    if let Some(path) = &args.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    let config = manager.get();
    let engine = KillEngine::new(config.clone());

    if args.describe {
        let strategies: Vec<_> = engine
            .registry()
            .all()
            .iter()
            .map(|s| serde_json::json!({ "id": s.alias(), "name": s.ui_name(), "min_rows": s.min_rows() }))
            .collect();
        let description = serde_json::json!({
            "strategies": strategies,
            "config": config.manifests(),
        });
        println!("{}", serde_json::to_string_pretty(&description)?);
        if args.history.is_none() && args.demo.is_none() {
            return Ok(());
        }
    }

    let pool = config.pool.to_pool()?;
    let history: History = match (&args.history, args.demo) {
        (Some(path), _) => {
            let (history, summary) = HistoryConnector::load_with_summary(path, pool)
                .with_context(|| format!("Failed to load history from {}", path.display()))?;
            log::info!(
                "Loaded {} draws from {} ({} lines skipped)",
                summary.accepted,
                summary.file_path,
                summary.skipped_count()
            );
            history
        }
        (None, Some(rows)) => SyntheticHistory::new(pool, None).generate(rows)?,
        (None, None) => bail!("A history file or --demo is required"),
    };

    if args.forward {
        let forward = engine.predict_forward(&history);
        println!("{}", serde_json::to_string_pretty(&forward)?);
        return Ok(());
    }

    let report = engine.predict_kill(&history).ok_or(DrawkillError::InsufficientHistory {
        required: config.ensemble.simple_min_history,
        actual: history.len(),
    })?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["drawkill", "--config", "k.toml", "--forward", "draws.txt"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("k.toml")));
        assert_eq!(args.history, Some(PathBuf::from("draws.txt")));
        assert!(args.forward);
        assert!(!args.describe);

        assert_eq!(Args::try_parse_from(["drawkill", "--demo"]).unwrap().demo, Some(60));
        assert_eq!(Args::try_parse_from(["drawkill", "--demo", "25"]).unwrap().demo, Some(25));
        assert!(Args::try_parse_from(["drawkill", "--describe"]).unwrap().history.is_none());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Args::try_parse_from(["drawkill"]).is_err());
        assert!(Args::try_parse_from(["drawkill", "--bogus", "x"]).is_err());
        assert!(Args::try_parse_from(["drawkill", "--config"]).is_err());
        assert!(Args::try_parse_from(["drawkill", "--demo", "abc"]).is_err());
        assert!(Args::try_parse_from(["drawkill", "draws.txt", "--demo"]).is_err());
    }
}
