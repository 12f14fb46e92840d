//! hemp-etl: data preparation and headless dashboard runner for the HEMP
//! governance dashboard.
//!
//! Usage:
//!   hemp-etl chains [--source FILE] [--out FILE] [--logo-dir DIR] [--json]
//!   hemp-etl propositions [CSV_DIR] [OUT] [--dummy N]
//!   hemp-etl summary [--source FILE] [--csv-dir DIR] [--main ID]
//!   hemp-etl --ipc-mode [--source FILE] [--csv-dir DIR]
//!
//! Every form accepts `--config FILE` (JSON overrides of the defaults).

use anyhow::{Context, Result};
use chrono::Utc;
use hemp_core::{
    chain::load_chains,
    command::DashboardCommand,
    config::HempConfig,
    dashboard::{Dashboard, DashboardView},
    dummy::generate_propositions,
    event::SelectionEvent,
    export,
    logo::DirectoryLogos,
    proposition::{load_proposition_dir, resolve_csv_dir},
    rng::RngBank,
    source::{resolve_source, SheetFile},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Flags that consume the following argument.
const VALUE_FLAGS: [&str; 7] = [
    "--config", "--source", "--out", "--logo-dir", "--dummy", "--csv-dir", "--main",
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: DashboardCommand },
    ClickBubble { name: String },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse<'a> {
    events: &'a [SelectionEvent],
    view:   DashboardView,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = HempConfig::load_or_default(flag_value(&args, "--config"))?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    if ipc_mode {
        let mut dashboard = load_dashboard(&args, config)?;
        return run_ipc_loop(&mut dashboard);
    }

    let positional = positional_args(&args);
    match positional.first().map(String::as_str) {
        Some("chains") => {
            if let Some(dir) = flag_value(&args, "--logo-dir") {
                config.logos.dir = PathBuf::from(dir);
            }
            run_chains(&args, &config)
        }
        Some("propositions") => run_propositions(&args, &positional[1..], &config),
        Some("summary") => {
            let mut dashboard = load_dashboard(&args, config)?;
            if let Some(main) = flag_value(&args, "--main") {
                dashboard.handle(DashboardCommand::SelectChain { chain_id: main.to_string() })?;
            }
            print_summary(&dashboard);
            Ok(())
        }
        Some(other) => anyhow::bail!("unknown subcommand '{other}'"),
        None => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

const USAGE: &str = "hemp-etl: HEMP dashboard data preparation

  hemp-etl chains [--source FILE] [--out FILE] [--logo-dir DIR] [--json]
  hemp-etl propositions [CSV_DIR] [OUT] [--dummy N]
  hemp-etl summary [--source FILE] [--csv-dir DIR] [--main ID]
  hemp-etl --ipc-mode [--source FILE] [--csv-dir DIR]

  --config FILE   JSON overrides for search paths, thresholds and sizes";

fn run_chains(args: &[String], config: &HempConfig) -> Result<()> {
    let source = match flag_value(args, "--source") {
        Some(p) => resolve_source(&[PathBuf::from(p)])?,
        None => resolve_source(&config.chain_sources)?,
    };
    let logos = DirectoryLogos::new(&config.logos);
    let chains = load_chains(&mut SheetFile::new(&source), &logos)
        .with_context(|| format!("transforming {}", source.display()))?;

    let as_json = args.iter().any(|a| a == "--json");
    let content = if as_json {
        export::to_json(&chains)?
    } else {
        export::chains_module(&chains, Utc::now())?
    };

    let out = output_path(flag_value(args, "--out"), &config.chains_module_path, as_json);
    export::write_module(&out, &content)?;

    println!("=== CHAINS ===");
    println!("  source:  {}", source.display());
    println!("  output:  {}", out.display());
    println!("  chains:  {}", chains.len());
    for chain in chains.iter().take(3) {
        println!("  {:<20} score {:>6.2}  logo {}", chain.name, chain.score, chain.logo_url);
    }
    Ok(())
}

fn run_propositions(args: &[String], positional: &[String], config: &HempConfig) -> Result<()> {
    let explicit_dir = positional.first().map(Path::new);
    let dir = resolve_csv_dir(explicit_dir, &config.csv_dir_candidates)
        .context("no CSV directory found; pass one explicitly")?;
    let out = positional
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.propositions_module_path.clone());
    let dummy_count = parse_arg(args, "--dummy", config.dummy.fallback_count);

    let set = load_proposition_dir(&dir, config);
    let bank = RngBank::new(config.dummy.seed);
    let defaults = generate_propositions(&mut bank.for_default(), dummy_count);

    let content = export::propositions_module(&set, &defaults, Utc::now())?;
    export::write_module(&out, &content)?;

    println!("=== PROPOSITIONS ===");
    println!("  csv dir:  {}", dir.display());
    println!("  output:   {}", out.display());
    for (chain_id, propositions) in &set {
        println!("  {chain_id:<16} {:>5}", propositions.len());
    }
    println!("  total:    {}", set.values().map(Vec::len).sum::<usize>());
    println!("  fallback: {} generated", defaults.len());
    Ok(())
}

fn load_dashboard(args: &[String], config: HempConfig) -> Result<Dashboard> {
    let source = flag_value(args, "--source").map(Path::new);
    let csv_dir = flag_value(args, "--csv-dir").map(Path::new);
    Ok(Dashboard::load(config, source, csv_dir)?)
}

fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    log::info!("ipc mode: {} chain(s) loaded", dashboard.chains().len());
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

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(Vec::new()),
            IpcCommand::Command { command } => dashboard.handle(command),
            IpcCommand::ClickBubble { name } => dashboard.click_bubble(&name),
        };

        match events {
            Ok(events) => {
                let response = IpcResponse { events: &events, view: dashboard.view() };
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            }
            Err(e) => {
                log::warn!("ipc command rejected: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn print_summary(dashboard: &Dashboard) {
    let view = dashboard.view();

    println!("=== DASHBOARD SUMMARY ===");
    println!("  chains:        {}", dashboard.chains().len());
    println!("  main:          {}", view.slots.main.as_deref().unwrap_or("-"));
    println!("  sub1:          {}", view.slots.sub1.as_deref().unwrap_or("-"));
    println!("  sub2:          {}", view.slots.sub2.as_deref().unwrap_or("-"));

    println!();
    println!("=== RANKING (top 5) ===");
    for entry in view.ranking.iter().take(5) {
        println!("  {:>2}. {:<20} {:>6.2}", entry.rank, entry.name, entry.score);
    }

    if let Some(q) = view.hemp_map.proposal_quartiles {
        println!();
        println!("=== PROPOSAL QUARTILES ===");
        println!("  q1 {:.1} | q2 {:.1} | q3 {:.1}", q.q1, q.q2, q.q3);
    }

    if view.slots.main.is_some() {
        println!();
        println!("=== SANKEY ===");
        println!("  propositions:  {}", view.sankey.total);
        println!("  nodes:         {}", view.sankey.nodes.len());
        println!("  links:         {}", view.sankey.links.len());
        for link in view.sankey.links.iter().take(5) {
            println!("  {:<48} {:>4}", link.key.to_string(), link.value);
        }
        println!("  table rows:    {}", view.proposals.total);
    }
}

/// `--out` when given. Otherwise the configured module path, switched to
/// `.json` when plain JSON was requested.
fn output_path(explicit: Option<&str>, module_path: &Path, as_json: bool) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None if as_json => module_path.with_extension("json"),
        None => module_path.to_path_buf(),
    }
}

fn positional_args(args: &[String]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            positional.push(arg.clone());
        }
    }
    positional
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn positional_args_skip_flag_values() {
        let a = args("propositions --config cfg.json real_data out.js --dummy 50");
        assert_eq!(positional_args(&a), ["propositions", "real_data", "out.js"]);
        assert_eq!(parse_arg(&a, "--dummy", 100usize), 50);
        assert_eq!(flag_value(&a, "--config"), Some("cfg.json"));
    }

    #[test]
    fn ipc_lines_decode() {
        let cmd: IpcCommand = serde_json::from_str(
            r#"{"type":"command","command":{"cmd":"drop_on_slot","chain_id":"osmosis","slot":"sub1"}}"#,
        )
        .unwrap();
        assert!(matches!(cmd, IpcCommand::Command { command: DashboardCommand::DropOnSlot { .. } }));
        assert!(matches!(
            serde_json::from_str::<IpcCommand>(r#"{"type":"get_state"}"#).unwrap(),
            IpcCommand::GetState
        ));
    }

    #[test]
    fn json_output_defaults_next_to_the_module() {
        let module = Path::new("src/data/mockData.js");
        assert_eq!(output_path(None, module, true), PathBuf::from("src/data/mockData.json"));
        assert_eq!(output_path(Some("x.js"), module, true), PathBuf::from("x.js"));
    }
}
