use std::env;
use std::io::Write;
use std::path::PathBuf;

use catalog::{Catalog, CatalogSource};
use clap::Parser;
use formats::BoundaryCollection;
use foundation::NameMatching;
use layers::{render, MapView, ViewOptions};
use reqwest::Client;
use selector::{
    AliasTable, CountrySelector, InteractionEvent, SelectionOutcome, SelectionState,
    SelectorOptions,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod boundaries;
mod input;

use boundaries::{load_boundaries, BoundarySource, DEFAULT_BOUNDARIES_URL};
use input::{parse_command, Command};

const DEMO_ALIASES_JSON: &str = include_str!("../assets/demo_aliases.json");

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Blooming species map: click a country, get its endemic species"
)]
struct Args {
    /// Species catalog JSON (default: $BLOOM_CATALOG, else the bundled demo catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Alias table JSON mapping boundary names to catalog countries (default: $BLOOM_ALIASES)
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Boundary GeoJSON URL or path, or "none" (default: $BLOOM_BOUNDARIES, else world.geo.json)
    #[arg(long)]
    boundaries: Option<String>,

    /// Feature property holding the country name
    #[arg(long, default_value = "name")]
    name_property: String,

    /// Prefix shown on polygon tooltips and stripped from tooltip clicks
    #[arg(long, default_value = "Click to explore ")]
    tooltip_prefix: String,

    /// Compare names case-insensitively, ignoring surrounding whitespace
    #[arg(long)]
    fold_names: bool,

    /// Hide the all-species markers on the base map
    #[arg(long)]
    no_overview: bool,

    /// Hide the country flag overlays on the base map
    #[arg(long)]
    no_flags: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let selector = load_selector(&args)?;
    let catalog = selector.catalog();
    info!(
        countries = catalog.len(),
        species = catalog.species_count(),
        aliases = selector.aliases().len(),
        fingerprint = %catalog.fingerprint(),
        "catalog loaded"
    );

    let source = BoundarySource::parse(
        &args
            .boundaries
            .clone()
            .or_else(|| env::var("BLOOM_BOUNDARIES").ok())
            .unwrap_or_else(|| DEFAULT_BOUNDARIES_URL.to_string()),
    );
    let client = Client::new();
    let boundaries = match load_boundaries(&client, &source, &args.name_property).await {
        Ok(b) => {
            info!(features = b.len(), %source, "boundaries loaded");
            b
        }
        Err(err) => {
            error!(%source, "{err}; continuing without country polygons");
            BoundaryCollection::empty()
        }
    };
    if boundaries.skipped > 0 {
        warn!(
            skipped = boundaries.skipped,
            "boundary features without polygon geometry were skipped"
        );
    }

    let coverage = selector.coverage(boundaries.names());
    if !boundaries.is_empty() {
        for key in &coverage.unreached {
            warn!(country = %key, "no boundary feature selects this country; add an alias");
        }
    }
    debug!(
        direct = coverage.direct.len(),
        aliased = coverage.aliased.len(),
        unmatched = coverage.unmatched.len(),
        "boundary coverage"
    );

    let view_opts = ViewOptions {
        overview_markers: !args.no_overview,
        flags: !args.no_flags,
        ..ViewOptions::default()
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout().lock();
    session(&selector, &boundaries, &view_opts, stdin, &mut out).await
}

/// Drives one interaction session: an initial render, then one render per
/// line that changes the selection (or asks for `show`).
async fn session<R, W>(
    selector: &CountrySelector,
    boundaries: &BoundaryCollection,
    view_opts: &ViewOptions,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut state = SelectionState::new();
    emit(out, &render(selector, &state, boundaries, view_opts))?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!("ignoring input: {err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Show => {}
            Command::Event(event) => match selector.handle(&mut state, &event) {
                SelectionOutcome::Selected(key) => info!(country = %key, "selected"),
                SelectionOutcome::Cleared => info!("selection cleared"),
                SelectionOutcome::Unchanged if event == InteractionEvent::Cleared => {
                    debug!("nothing selected; clear ignored");
                    continue;
                }
                SelectionOutcome::Unchanged => {
                    info!(?event, "no matching country; view unchanged");
                    continue;
                }
            },
        }
        emit(out, &render(selector, &state, boundaries, view_opts))?;
    }

    Ok(())
}

fn load_selector(args: &Args) -> Result<CountrySelector, Box<dyn std::error::Error>> {
    let matching = if args.fold_names {
        NameMatching::Folded
    } else {
        NameMatching::Exact
    };

    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| env::var_os("BLOOM_CATALOG").map(PathBuf::from));
    let catalog = match &catalog_path {
        Some(path) => catalog::load(CatalogSource::Path(path))?,
        None => Catalog::demo()?,
    };

    let alias_path = args
        .aliases
        .clone()
        .or_else(|| env::var_os("BLOOM_ALIASES").map(PathBuf::from));
    let aliases = match (&alias_path, &catalog_path) {
        (Some(path), _) => AliasTable::from_path(path, &catalog, matching)?,
        (None, None) => AliasTable::from_json_str(DEMO_ALIASES_JSON, &catalog, matching)?,
        (None, Some(_)) => AliasTable::new(),
    };

    let options = SelectorOptions {
        matching,
        tooltip_prefix: Some(args.tooltip_prefix.clone()).filter(|p| !p.is_empty()),
    };
    Ok(CountrySelector::new(catalog, aliases, options)?)
}

/// Writes one render pass as a single JSON line.
fn emit<W: Write>(out: &mut W, view: &MapView) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, view)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["bloom", "--boundaries", "none"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn demo_selector_includes_bundled_aliases() {
        let selector = load_selector(&args(&[])).expect("demo selector");
        let mut state = SelectionState::new();
        let entry = selector
            .resolve(&mut state, "United States of America")
            .unwrap();
        assert_eq!(entry.key.as_str(), "United States");
        assert_eq!(
            selector.options().tooltip_prefix.as_deref(),
            Some("Click to explore ")
        );
    }

    #[test]
    fn fold_names_flag_switches_matching() {
        let selector = load_selector(&args(&["--fold-names"])).unwrap();
        assert_eq!(selector.options().matching, NameMatching::Folded);
        let mut state = SelectionState::new();
        assert!(selector.resolve(&mut state, "  peru").is_ok());
    }

    #[test]
    fn missing_catalog_file_is_fatal() {
        let err = load_selector(&args(&["--catalog", "/no/such/catalog.json"]))
            .err()
            .expect("load must fail");
        assert!(err.to_string().contains("catalog read error"));
    }

    #[test]
    fn empty_tooltip_prefix_disables_prefix() {
        let selector = load_selector(&args(&["--tooltip-prefix", ""])).unwrap();
        assert_eq!(selector.options().tooltip_prefix, None);
    }

    #[test]
    fn emit_writes_one_json_line() {
        let selector = load_selector(&args(&[])).unwrap();
        let view = render(
            &selector,
            &SelectionState::new(),
            &BoundaryCollection::empty(),
            &ViewOptions::default(),
        );
        let mut buf: Vec<u8> = Vec::new();
        emit(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed["zoom"], 3);
        assert_eq!(parsed["markers"].as_array().map(|m| m.len()), Some(8));
    }

    const SAMPLE: &str = include_str!("../../../formats/assets/sample_countries.geo.json");

    async fn run_session(script: &str) -> Vec<serde_json::Value> {
        let selector = load_selector(&args(&[])).unwrap();
        let boundaries = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        let mut buf: Vec<u8> = Vec::new();
        session(
            &selector,
            &boundaries,
            &ViewOptions::default(),
            script.as_bytes(),
            &mut buf,
        )
        .await
        .unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn session_renders_once_per_selection_change() {
        let views = run_session(
            "click Chile\n\
             tooltip Click to explore Peru\n\
             bogus input\n\
             \n\
             click Atlantis\n\
             click United States of America\n",
        )
        .await;

        assert_eq!(views.len(), 3);
        assert_eq!(views[0]["selected"], serde_json::Value::Null);
        assert_eq!(views[1]["selected"], "Peru");
        assert_eq!(views[1]["title"], "Endemic species in Peru");
        assert_eq!(views[2]["selected"], "United States");
    }

    #[tokio::test]
    async fn session_clear_show_and_quit() {
        let views = run_session("clear\npick Brazil\nclear\nclear\nshow\nquit\npick Peru\n").await;

        let selected: Vec<&serde_json::Value> = views.iter().map(|v| &v["selected"]).collect();
        assert_eq!(
            selected,
            vec![
                &serde_json::Value::Null,
                &serde_json::Value::from("Brazil"),
                &serde_json::Value::Null,
                &serde_json::Value::Null,
            ]
        );
    }
}
