//! TagFlare command line
//!
//! ```text
//! tagflare [OPTIONS] [run [--json] | candidates [--json] | vocabulary [--json]]
//! ```
//!
//! Options are global: a TOML file given with `--config` is loaded first and
//! the remaining flags override it.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tagflare_core::{list_candidates, CategoryCandidates, TagflareConfig, TagflareError, Tagger};
use tagflare_suggest::OpenAiSuggester;
use tagflare_taxonomy::{Budget, Category, Vocabulary};
use tagflare_vault::VocabularyStore;

/// Build the command definition
#[must_use]
pub fn command() -> Command {
    let json = || {
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output as JSON")
    };

    Command::new("tagflare")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Label unlabelled vault documents from a shared vocabulary")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("vocabulary")
                .long("vocabulary")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Vocabulary file [default: tags.json]"),
        )
        .arg(
            Arg::new(Category::DigitalGarden.slug())
                .long(Category::DigitalGarden.slug())
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of Digital Garden documents"),
        )
        .arg(
            Arg::new(Category::VisualFiction.slug())
                .long(Category::VisualFiction.slug())
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of Visual Fiction documents"),
        )
        .arg(
            Arg::new("max-new-tags")
                .long("max-new-tags")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("New labels kept per document [default: 3]"),
        )
        .arg(
            Arg::new("max-total-tags")
                .long("max-total-tags")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Labels applied per document [default: 3]"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .global(true)
                .help("Chat-completion model"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("run")
                .about("Suggest, reconcile and write labels (default)")
                .arg(json()),
        )
        .subcommand(
            Command::new("candidates")
                .about("List unlabelled documents per category")
                .arg(json()),
        )
        .subcommand(
            Command::new("vocabulary")
                .about("Print the vocabulary")
                .arg(json()),
        )
}

/// What to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Label candidates
    Run,
    /// List candidates only
    Candidates,
    /// Print the vocabulary
    Vocabulary,
}

/// Parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Action; `run` when no subcommand is given
    pub action: Option<Action>,
    /// JSON output
    pub json: bool,
    /// Configuration file
    pub config: Option<PathBuf>,
    /// Vocabulary file override
    pub vocabulary: Option<PathBuf>,
    /// Directory overrides per category
    pub sources: Vec<(Category, PathBuf)>,
    /// New-label budget override
    pub max_new_tags: Option<usize>,
    /// Total-label budget override
    pub max_total_tags: Option<usize>,
    /// Model override
    pub model: Option<String>,
    /// Verbosity count
    pub verbose: u8,
    /// JSON logs
    pub log_json: bool,
}

impl CliOptions {
    /// Extract options from parsed arguments
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let (action, sub) = match matches.subcommand() {
            Some(("candidates", sub)) => (Action::Candidates, Some(sub)),
            Some(("vocabulary", sub)) => (Action::Vocabulary, Some(sub)),
            Some((_, sub)) => (Action::Run, Some(sub)),
            None => (Action::Run, None),
        };

        let sources = Category::ALL
            .into_iter()
            .filter_map(|category| {
                matches
                    .get_one::<PathBuf>(category.slug())
                    .map(|dir| (category, dir.clone()))
            })
            .collect();

        Self {
            action: Some(action),
            json: sub.is_some_and(|s| s.get_flag("json")),
            config: matches.get_one::<PathBuf>("config").cloned(),
            vocabulary: matches.get_one::<PathBuf>("vocabulary").cloned(),
            sources,
            max_new_tags: matches.get_one::<usize>("max-new-tags").copied(),
            max_total_tags: matches.get_one::<usize>("max-total-tags").copied(),
            model: matches.get_one::<String>("model").cloned(),
            verbose: matches.get_count("verbose"),
            log_json: matches.get_flag("log-json"),
        }
    }

    /// Apply flag overrides on top of `config`
    #[must_use]
    pub fn apply(&self, mut config: TagflareConfig) -> TagflareConfig {
        if let Some(path) = &self.vocabulary {
            config = config.with_vocabulary_path(path);
        }
        for (category, dir) in &self.sources {
            config = config.with_source(*category, dir);
        }
        let budget = Budget::new(
            self.max_new_tags.unwrap_or(config.max_new_tags),
            self.max_total_tags.unwrap_or(config.max_total_tags),
        );
        config = config.with_budget(budget);
        if let Some(model) = &self.model {
            let openai = config.openai.clone().with_model(model);
            config = config.with_openai(openai);
        }
        config
    }

    /// Load the configuration file, if any, and apply overrides
    ///
    /// # Errors
    /// Fails when the configuration file cannot be read or parsed.
    pub async fn resolve_config(&self) -> anyhow::Result<TagflareConfig> {
        let base = match &self.config {
            Some(path) => TagflareConfig::load(path)
                .await
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => TagflareConfig::default(),
        };
        Ok(self.apply(base))
    }
}

/// Load `.env` from the working directory or a parent
///
/// Variables already set in the process environment are kept. Returns the
/// file that was read, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load variables from a specific env file
///
/// # Errors
/// Fails when the file is missing or malformed.
pub fn load_dotenv_from(path: &Path) -> anyhow::Result<()> {
    dotenvy::from_path(path).with_context(|| format!("loading {}", path.display()))
}

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Execute the selected action, returning what to print
///
/// # Errors
/// Configuration, vault and suggestion failures, with context.
pub async fn execute(options: &CliOptions) -> anyhow::Result<String> {
    let config = options.resolve_config().await?;

    match options.action.unwrap_or(Action::Run) {
        Action::Run => {
            config.require_sources()?;
            let suggester = OpenAiSuggester::from_env(config.openai.clone())
                .map_err(TagflareError::from)
                .context("creating suggestion client")?;
            let report = Tagger::new(config, suggester).run().await?;
            if options.json {
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                Ok(report.generate_text())
            }
        }
        Action::Candidates => {
            let found = list_candidates(&config).await?;
            if options.json {
                Ok(serde_json::to_string_pretty(&candidates_json(&found))?)
            } else {
                Ok(candidates_text(&found))
            }
        }
        Action::Vocabulary => {
            let store = VocabularyStore::new(&config.vocabulary_path);
            let vocabulary = store
                .load()
                .await
                .with_context(|| format!("loading vocabulary {}", store.path().display()))?;
            if options.json {
                Ok(serde_json::to_string_pretty(&serde_json::json!({ "tags": vocabulary }))?)
            } else {
                Ok(vocabulary_text(&vocabulary))
            }
        }
    }
}

/// Exit code for a failed execution
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<TagflareError>())
        .map_or(1, |e| u8::try_from(e.exit_code()).unwrap_or(1))
}

fn candidates_text(found: &[CategoryCandidates]) -> String {
    let mut out = String::new();
    for entry in found {
        out.push_str(&format!(
            "[{}] {} ({} unlabelled)\n",
            entry.category,
            entry.directory.display(),
            entry.documents.len()
        ));
        for doc in &entry.documents {
            out.push_str(&format!(
                "  {}  uid={}  title={}\n",
                doc.file_name(),
                doc.uid.as_deref().unwrap_or("-"),
                doc.title.as_deref().unwrap_or("-")
            ));
        }
    }
    out
}

fn candidates_json(found: &[CategoryCandidates]) -> serde_json::Value {
    found
        .iter()
        .map(|entry| {
            serde_json::json!({
                "category": entry.category,
                "directory": entry.directory,
                "documents": entry.documents.iter().map(|doc| serde_json::json!({
                    "path": doc.path,
                    "uid": doc.uid,
                    "title": doc.title,
                })).collect::<Vec<_>>(),
            })
        })
        .collect()
}

fn vocabulary_text(vocabulary: &Vocabulary) -> String {
    let mut out = String::new();
    for label in vocabulary {
        out.push_str(label.as_str());
        out.push('\n');
    }
    out
}
