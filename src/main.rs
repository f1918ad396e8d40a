use clap::{Parser, Subcommand};
use pj_theme::config::{self, ThemeConfig};
use pj_theme::cv::{self, Aptitude, CvRecord, Event, Experience, SideProject, Timeline};
use pj_theme::language::Language;
use pj_theme::processor::{self, ResolveContext};
use pj_theme::types::{ContentKind, Order};
use pj_theme::{context, metadata, output, posts};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "pj-theme")]
#[command(about = "Blog and CV content directives for reStructuredText sites")]
#[command(long_about = "\
Blog and CV content directives for reStructuredText sites

Documents insert generated lists with directives; data sources are resolved
against the content root:

  docs/
  ├── config.toml                  # Theme config (optional)
  ├── index.rst                    # .. posts:: blog
  ├── cv.rst                       # :language: english
  │                                # .. cv-experiences:: data/cv.toml
  ├── blog/
  │   ├── hello.rst                # :date: 01-01-2021
  │   └── rust/ownership.rst       # group \"rust\"
  └── data/
      └── cv.toml                  # [[experience]], [[education]], ...

Directives:
  posts, cv-experiences, cv-educations, cv-certifications,
  cv-side-projects, cv-aptitudes

Add :reverse: (or :opposite:) below a directive to list oldest/lowest first.

Run 'pj-theme gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content root that directive sources are relative to
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Log resolution details (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve every directive in a document and print the result
    Render {
        /// Document path
        doc: PathBuf,
    },
    /// List the posts below a directory
    Posts {
        /// Directory relative to the content root
        dir: String,
        /// Oldest first
        #[arg(long)]
        oldest_first: bool,
        /// Print the rendered HTML list instead
        #[arg(long)]
        html: bool,
    },
    /// List one CV section of a data file
    Cv {
        /// Directive name, with or without the `cv-` prefix
        #[arg(value_parser = parse_cv_kind)]
        kind: ContentKind,
        /// Data file relative to the content root
        file: String,
        /// Label language (english, spanish)
        #[arg(long)]
        lang: Option<String>,
        /// Oldest/lowest first
        #[arg(long)]
        oldest_first: bool,
        /// Print the rendered HTML list instead
        #[arg(long)]
        html: bool,
    },
    /// Print a document's title and metadata as JSON
    Meta {
        /// Document path
        doc: PathBuf,
    },
    /// Print the page context as JSON
    Context,
    /// Resolve every document under the content root without writing anything.
    ///
    /// Documents are the files whose extension is listed in
    /// `posts.extensions` (default: rst).
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render { doc } => {
            let ctx = resolve_context(&cli.source)?;
            let (html, report) = processor::process_file(&doc, &ctx)?;
            print!("{html}");
            tracing::info!(
                placeholders = report.resolved,
                records = report.records,
                warnings = report.warnings.len(),
                "rendered {}",
                doc.display()
            );
        }
        Command::Posts {
            dir,
            oldest_first,
            html,
        } => {
            let config = config::load_config(&cli.source)?;
            let order = Order::flipped(oldest_first);
            let posts = posts::build_posts(&cli.source.join(&dir), &config.posts, order)?;
            if html {
                println!(
                    "{}",
                    posts::render_posts_list(&posts, &cli.source, &config.posts.date_format)
                );
            } else {
                output::print_posts(&posts, &dir, &cli.source, &config.posts.date_format);
            }
        }
        Command::Cv {
            kind,
            file,
            lang,
            oldest_first,
            html,
        } => {
            let config = config::load_config(&cli.source)?;
            let args = CvArgs {
                kind,
                path: cli.source.join(&file),
                source: file,
                lang: lang
                    .as_deref()
                    .map(Language::from_name)
                    .unwrap_or_else(|| config.cv.default_language()),
                order: Order::flipped(oldest_first),
                html,
                timeline: Timeline::new(&config.cv.ongoing),
            };
            match kind {
                ContentKind::Experiences => run_cv::<Experience>(&args)?,
                ContentKind::Educations | ContentKind::Certifications => run_cv::<Event>(&args)?,
                ContentKind::SideProjects => run_cv::<SideProject>(&args)?,
                ContentKind::Aptitudes => run_cv::<Aptitude>(&args)?,
                ContentKind::Posts => unreachable!("rejected by parse_cv_kind"),
            }
        }
        Command::Meta { doc } => {
            let text = std::fs::read_to_string(&doc)?;
            let title = metadata::parse_header(&text).ok().map(|h| h.title);
            let meta = metadata::parse_meta(&text);
            let json = serde_json::json!({ "title": title, "meta": meta });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Command::Context => {
            println!("{}", serde_json::to_string_pretty(&context::page_context())?);
        }
        Command::Check => {
            let ctx = resolve_context(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let results = processor::process_tree(&ctx)?;
            output::print_check(&results);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins unless `--verbose`; the default shows warnings.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_context(source: &Path) -> Result<ResolveContext, config::ConfigError> {
    let config: ThemeConfig = config::load_config(source)?;
    Ok(ResolveContext::new(source, config))
}

fn parse_cv_kind(name: &str) -> Result<ContentKind, String> {
    ContentKind::from_directive(name)
        .or_else(|| ContentKind::from_directive(&format!("cv-{name}")))
        .filter(|kind| kind.is_cv())
        .ok_or_else(|| {
            let known: Vec<_> = ContentKind::ALL
                .iter()
                .filter(|k| k.is_cv())
                .map(|k| k.directive_name())
                .collect();
            format!("unknown CV section '{name}' (expected one of: {})", known.join(", "))
        })
}

struct CvArgs {
    kind: ContentKind,
    path: PathBuf,
    source: String,
    lang: Language,
    order: Order,
    html: bool,
    timeline: Timeline,
}

fn run_cv<T: CvRecord>(args: &CvArgs) -> Result<(), cv::LoadError> {
    let section = args.kind.section().unwrap_or_default();
    let records = match cv::load_records::<T>(&args.path, section, args.order, &args.timeline)? {
        Some(records) => records,
        None => {
            tracing::warn!(section, path = %args.path.display(), "missing CV section");
            Vec::new()
        }
    };
    if args.html {
        println!("{}", cv::render_list(args.kind.css_class(), &records, args.lang));
    } else {
        output::print_cv(args.kind, &args.source, &records);
    }
    Ok(())
}
