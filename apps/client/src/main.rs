use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use herald_client::auth::validation::{Credentials, Registration};
use herald_client::auth::AuthClient;
use herald_client::config::Config;
use herald_client::cv::completeness::compute_completeness_report;
use herald_client::cv::models::CvDocument;
use herald_client::cv::validation::validate_document;
use herald_client::jobs::filter::LocalFilter;
use herald_client::jobs::models::JobSearchFilters;
use herald_client::jobs::paginate::Pager;
use herald_client::jobs::JobClient;
use herald_client::storage::FileStore;
use herald_client::theme::{ThemeManager, ThemeName};

#[derive(Parser)]
#[command(name = "herald", version, about = "Herald job dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List jobs, with backend filters and local narrowing/pagination
    Jobs {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Keyword filter applied to the fetched list before paging
        #[arg(long, default_value = "")]
        keywords: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        contract_type: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
    /// Scrape new postings for a query and location
    Scrape {
        query: String,
        location: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Keyword-targeted scrape across selected sites
    ScrapeEfficient {
        query: String,
        location: String,
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
        #[arg(long, default_value_t = 100)]
        max_jobs: u32,
        #[arg(long, value_delimiter = ',')]
        sites: Vec<String>,
    },
    /// Show aggregate statistics for the job corpus
    Stats,
    /// Delete mock rows from the backend
    ClearMock,
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and persist the session
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Drop the persisted session
    Logout,
    /// Show the signed-in user, if any
    Whoami,
    /// Show or change the UI theme preference
    Theme {
        /// "light" or "dark"; omit to show the current theme
        #[arg(long)]
        set: Option<String>,
        #[arg(long, conflicts_with = "set")]
        toggle: bool,
    },
    /// Validate a CV document file and print its completeness report
    CvReport { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting herald v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Jobs {
            search,
            company,
            location,
            source,
            skip,
            limit,
            keywords,
            category,
            contract_type,
            page,
            page_size,
        } => {
            let client = JobClient::new(config);
            let filters = JobSearchFilters {
                search,
                company,
                location,
                source,
                skip,
                limit,
            };
            let jobs = client.get_jobs(&filters).await?;

            let local = LocalFilter {
                keywords,
                location: String::new(),
                category,
                contract_type,
                salary_min: None,
                salary_max: None,
            };
            let mut pager = Pager::new(page_size);
            pager.set_jobs(local.apply(&jobs));
            pager.set_page(page);

            for job in pager.page() {
                println!("[{}] {} at {} ({})", job.id, job.title, job.company, job.location);
                println!("      {}", job.salary_display());
                if let Some(url) = job.posting_url() {
                    println!("      {url}");
                }
            }
            println!(
                "Page {} of {} ({} of {} fetched jobs match)",
                pager.current_page(),
                pager.total_pages(),
                pager.total_jobs(),
                jobs.len()
            );
        }
        Command::Scrape {
            query,
            location,
            limit,
        } => {
            let client = JobClient::new(config);
            let report = client.scrape_jobs(&query, &location, limit).await?;
            println!("{}", report.message);
            println!(
                "Scraped {} postings, saved {}",
                report.scraped_count, report.saved_count
            );
        }
        Command::ScrapeEfficient {
            query,
            location,
            keywords,
            max_jobs,
            sites,
        } => {
            let client = JobClient::new(config);
            let report = client
                .scrape_jobs_efficient(&query, &location, &keywords, max_jobs, &sites)
                .await?;
            println!("{}", report.message);
            println!(
                "Scraped {} postings, saved {}",
                report.scraped_count, report.saved_count
            );
            if let Some(sites) = report.sites_used {
                println!("Sites: {}", sites.join(", "));
            }
        }
        Command::Stats => {
            let client = JobClient::new(config);
            let stats = client.get_stats().await?;
            println!("Total jobs: {}", stats.total_jobs);
            println!("Added today: {}", stats.jobs_today);
            print_counts(
                "By company",
                stats
                    .jobs_per_company
                    .iter()
                    .map(|c| (c.company.as_str(), c.count)),
            );
            print_counts(
                "By source",
                stats
                    .jobs_per_source
                    .iter()
                    .map(|s| (s.source.as_str(), s.count)),
            );
            print_counts(
                "By level",
                stats
                    .jobs_per_level
                    .iter()
                    .map(|l| (l.level.as_str(), l.count)),
            );
        }
        Command::ClearMock => {
            let client = JobClient::new(config);
            let report = client.clear_mock_data().await?;
            println!("{} ({} rows)", report.message, report.deleted_count);
        }
        Command::Login { email, password } => {
            let store = Arc::new(FileStore::open(&config.session_file)?);
            let client = AuthClient::new(config, store);
            let session = client.login(&Credentials { email, password }).await?;
            println!(
                "Signed in as {} <{}>",
                session.user.full_name, session.user.email
            );
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            let store = Arc::new(FileStore::open(&config.session_file)?);
            let client = AuthClient::new(config, store);
            let session = client
                .register(&Registration {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                })
                .await?;
            println!(
                "Account created for {} <{}>",
                session.user.full_name, session.user.email
            );
        }
        Command::Logout => {
            let store = Arc::new(FileStore::open(&config.session_file)?);
            let client = AuthClient::new(config, store);
            client.logout();
            println!("Signed out");
        }
        Command::Whoami => {
            let store = Arc::new(FileStore::open(&config.session_file)?);
            let client = AuthClient::new(config, store);
            match client.current_user() {
                Some(user) => println!("{} <{}>", user.full_name, user.email),
                None => println!("Not signed in"),
            }
        }
        Command::Theme { set, toggle } => {
            let store = Arc::new(FileStore::open(&config.session_file)?);
            let manager = ThemeManager::new(store);
            let theme = if toggle {
                manager.toggle()
            } else if let Some(name) = set {
                manager.set(parse_theme_name(&name)?)
            } else {
                manager.current()
            };
            let label = match theme.name {
                ThemeName::Light => "light",
                ThemeName::Dark => "dark",
            };
            println!("Theme: {label}");
        }
        Command::CvReport { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Unable to read {}", file.display()))?;
            let document: CvDocument =
                serde_json::from_str(&raw).context("CV file is not valid JSON")?;

            match validate_document(&document) {
                Ok(()) => println!("Validation: ok"),
                Err(errors) => {
                    println!("Validation: {} problem(s)", errors.len());
                    for error in &errors {
                        println!("  {}: {}", error.field, error.message);
                    }
                }
            }

            let report = compute_completeness_report(&document);
            println!("Completeness: {:.0}%", report.overall_score * 100.0);
            for section in &report.sections {
                println!(
                    "  {:<14} {:>4.0}%  {:?}",
                    section.section,
                    section.score * 100.0,
                    section.status
                );
                for recommendation in &section.recommendations {
                    println!("      - {recommendation}");
                }
            }
        }
    }

    Ok(())
}

fn parse_theme_name(raw: &str) -> Result<ThemeName> {
    match raw {
        "light" => Ok(ThemeName::Light),
        "dark" => Ok(ThemeName::Dark),
        other => anyhow::bail!("Unknown theme '{other}', expected light or dark"),
    }
}

fn print_counts<'a>(title: &str, rows: impl Iterator<Item = (&'a str, u64)>) {
    println!("{title}:");
    for (name, count) in rows {
        println!("  {count:>6}  {name}");
    }
}
