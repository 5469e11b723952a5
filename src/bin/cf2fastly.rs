//! CLI tool for translating Cloudflare Page Rules to Fastly configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pagerule2fastly::advisor::{Advisor, AdvisorConfig, GeminiClient};
use pagerule2fastly::{
    compile_condition, load_rule, translate, ActionType, ConditionMatcher, Rule,
    TranslationResult,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cf2fastly")]
#[command(author, version, about = "Map Cloudflare Page Rules to Fastly CLI/VCL logic", long_about = None)]
struct Cli {
    /// Log level override (e.g. "warn", "debug"). Defaults to RUST_LOG, then "warn".
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Advisory service config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a rule into Fastly CLI commands and a VCL snippet
    Translate(TranslateArgs),
    /// Explain a VCL snippet using the advisory service
    Explain(ExplainArgs),
    /// Suggest Fastly practices for a rule's action
    Suggest(SuggestArgs),
}

/// Rule fields. Flags override values loaded from `--rule`.
#[derive(Args, Debug, Default)]
struct RuleArgs {
    /// Rule file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    rule: Option<PathBuf>,

    /// Cloudflare URL pattern (e.g. `*example.com/assets/*`)
    #[arg(short, long)]
    url_pattern: Option<String>,

    /// Action: cache, redirect, security or rewrite
    #[arg(short, long)]
    action: Option<String>,

    /// Edge cache TTL in seconds
    #[arg(long)]
    cache_ttl: Option<String>,

    /// Redirect destination URL
    #[arg(long)]
    redirect_url: Option<String>,

    /// Redirect status: 301 or 302
    #[arg(long)]
    redirect_type: Option<String>,

    /// Security header: hsts or cors
    #[arg(long)]
    security_header: Option<String>,

    /// Rewrite destination path
    #[arg(long)]
    rewrite_target: Option<String>,

    /// Header receiving the captured path
    #[arg(long)]
    capture_header: Option<String>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    rule: RuleArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sample host or URL to test against the compiled condition (repeatable)
    #[arg(long = "check-url", value_name = "URL")]
    check_urls: Vec<String>,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// VCL snippet file ("-" for stdin). Without it, the rule's snippet is explained.
    #[arg(long)]
    snippet: Option<PathBuf>,

    #[command(flatten)]
    rule: RuleArgs,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    #[command(flatten)]
    rule: RuleArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl RuleArgs {
    /// Build the rule from the file (or defaults) and the individual flags.
    fn resolve(&self) -> Result<Rule> {
        let mut rule = match &self.rule {
            Some(path) => load_rule(path)?,
            None => Rule::default(),
        };

        if let Some(action) = &self.action {
            rule.action_type = match action.parse::<ActionType>() {
                Ok(action) => Some(action),
                Err(e) => {
                    warn!(error = %e, "no action selected");
                    None
                }
            };
        }

        let overrides = [
            (&self.url_pattern, &mut rule.url_pattern),
            (&self.cache_ttl, &mut rule.cache_ttl),
            (&self.redirect_url, &mut rule.redirect_url),
            (&self.redirect_type, &mut rule.redirect_type),
            (&self.security_header, &mut rule.security_header),
            (&self.rewrite_target, &mut rule.rewrite_target),
            (&self.capture_header, &mut rule.capture_header),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        debug!(?rule, "resolved rule");
        Ok(rule)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Command::Translate(args) => run_translate(args),
        Command::Explain(args) => {
            let snippet = match &args.snippet {
                Some(path) => read_snippet(path)?,
                None => translate(&args.rule.resolve()?).vcl,
            };
            let advisor = build_advisor(&cli)?;
            let text = runtime()?.block_on(advisor.explain_snippet(&snippet));
            println!("{}", text);
            Ok(())
        }
        Command::Suggest(args) => {
            let rule = args.rule.resolve()?;
            let action = rule.action_type.map(|a| a.as_str()).unwrap_or_default();
            let advisor = build_advisor(&cli)?;
            let text = runtime()?.block_on(advisor.suggest_practices(action, &rule.url_pattern));
            println!("{}", text);
            Ok(())
        }
    }
}

fn run_translate(args: &TranslateArgs) -> Result<()> {
    let rule = args.rule.resolve()?;
    let result = translate(&rule);

    let mut output = match args.format {
        OutputFormat::Text => render_text(&result),
        OutputFormat::Json => serde_json::to_string_pretty(&result)? + "\n",
    };

    if !args.check_urls.is_empty() {
        output.push_str(&render_checks(&rule, &args.check_urls));
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✓ Fastly configuration written to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

fn render_text(result: &TranslationResult) -> String {
    let mut out = format!("== {} ==\n", result.title);
    if !result.description.is_empty() {
        out.push_str(&format!("{}\n", result.description));
    }

    out.push_str("\n-- Fastly CLI / API (Recommended) --\n");
    out.push_str(&result.cli);
    if !result.cli.ends_with('\n') {
        out.push('\n');
    }

    if !result.is_placeholder() {
        out.push_str("\n-- Raw VCL Snippet (Advanced) --\n");
        out.push_str(&result.vcl);
    }

    out.push_str(
        "\nRemember to replace `YOUR_SERVICE_ID` and `VERSION_NUMBER` with your actual Fastly details.\n",
    );
    out
}

/// Preview the emitted condition against sample hosts/URLs.
///
/// A condition the regex engine rejects is reported in this section only;
/// the translation above it is still emitted.
fn render_checks(rule: &Rule, samples: &[String]) -> String {
    let statement = compile_condition(&rule.url_pattern);
    let matcher = match ConditionMatcher::from_statement(&statement) {
        Ok(matcher) => matcher,
        Err(e) => {
            warn!(error = %e, condition = %statement, "condition preview unavailable");
            return format!(
                "\n-- Condition check --\n  ✗ Cannot preview `{}`: {}\n",
                statement, e
            );
        }
    };

    let mut out = format!("\n-- Condition check ({}) --\n", matcher.field());
    for sample in samples {
        match matcher.find(sample) {
            Some(found) => out.push_str(&format!(
                "  ✓ MATCHED '{}' at {}..{} (\"{}\")\n",
                sample, found.start, found.end, found.matched
            )),
            None => out.push_str(&format!("  ✗ No match '{}'\n", sample)),
        }
    }
    out
}

fn read_snippet(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn build_advisor(cli: &Cli) -> Result<Advisor<GeminiClient>> {
    let config = match &cli.config {
        Some(path) => AdvisorConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AdvisorConfig::default(),
    }
    .with_env_overrides();

    let client = GeminiClient::new(&config)?;
    Ok(Advisor::new(client, config.retry))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
