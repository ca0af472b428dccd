// Command-line front end for the article admin client

use anyhow::{Context, Result};
use blog_admin::{
    init_tracing, validate_create_payload, validate_patch_payload, Article, ArticleApi,
    ArticleClient, ArticleForm, ArticlePatchForm, ClientError, Config, ListViewModel,
    PagePhase, SubmissionFeedback,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blog-admin")]
#[command(about = "Manage blog articles on a remote backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of articles
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = blog_admin::DEFAULT_LIMIT)]
        limit: u32,
        /// Only show published articles
        #[arg(long)]
        published_only: bool,
    },
    /// Show a single article
    Get { id: i64 },
    /// Create an article, published unless --draft is given
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        draft: bool,
    },
    /// Update some fields of an article
    Patch {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// publish, draft or trash
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete an article
    Delete { id: i64 },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(_) => (),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(1);
        }
    }
}

async fn run(Cli { command }: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let client = ArticleClient::new(&config);

    match command {
        Commands::List {
            page,
            limit,
            published_only,
        } => {
            let view = if published_only {
                ListViewModel::preview(client)
            } else {
                ListViewModel::new(client)
            };
            view.load_page(page, limit).await;
            match view.phase() {
                PagePhase::Loaded(articles) => {
                    if articles.items.is_empty() {
                        println!("No articles found");
                    }
                    for article in &articles.items {
                        print_summary(article);
                    }
                    println!("page {} of {}", page + 1, articles.page_count());
                }
                PagePhase::Errored(error) => anyhow::bail!("Could not load articles: {}", error),
                PagePhase::Unloaded | PagePhase::Loading => (),
            }
        }
        Commands::Get { id } => {
            let article = client
                .get_article(id)
                .await
                .with_context(|| format!("Could not fetch article {}", id))?;
            print_summary(&article);
            if let Some(updated) = article.updated_at() {
                println!("updated {}", updated);
            }
            println!();
            println!("{}", article.content);
        }
        Commands::Create {
            title,
            content,
            category,
            draft,
        } => {
            let form = ArticleForm {
                title,
                content,
                category,
                status: if draft { "draft" } else { "publish" }.to_string(),
            };
            let result = match validate_create_payload(&form) {
                Ok(payload) => client.create_article(&payload).await,
                Err(error) => Err(error.into()),
            };
            report_submission(result, "Article created")?;
        }
        Commands::Patch {
            id,
            title,
            content,
            category,
            status,
        } => {
            let form = ArticlePatchForm {
                title,
                content,
                category,
                status,
            };
            let result = match validate_patch_payload(&form) {
                Ok(payload) => client.patch_article(id, &payload).await,
                Err(error) => Err(error.into()),
            };
            report_submission(result, "Article updated")?;
        }
        Commands::Delete { id } => {
            client
                .delete_article(id)
                .await
                .with_context(|| format!("Could not delete article {}", id))?;
            println!("Article {} deleted", id);
        }
    }
    Ok(())
}

fn print_summary(article: &Article) {
    let badge = if article.is_draft() { " [draft]" } else { "" };
    println!(
        "#{} {}{} ({})",
        article.id, article.title, badge, article.category
    );
}

fn report_submission(result: Result<(), ClientError>, success: &str) -> Result<()> {
    let error = match result {
        Ok(()) => {
            println!("{}", success);
            return Ok(());
        }
        Err(error) => error,
    };
    match error.feedback() {
        SubmissionFeedback::Fields(fields) => {
            for (field, message) in fields {
                eprintln!("{}: {}", field, message);
            }
        }
        SubmissionFeedback::General(message) => eprintln!("{}", message),
    }
    Err(error).context("Submission failed")
}
