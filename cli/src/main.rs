mod render;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use wordnest::config::{ClientConfig, DEFAULT_API_URL};
use wordnest::net::posts::{self, DEFAULT_PAGE_SIZE};
use wordnest::net::types::User;
use wordnest::pages::PageOutcome;
use wordnest::pages::feed::FeedPage;
use wordnest::pages::login::{LoginForm, SignupForm};
use wordnest::pages::profile::ProfilePage;
use wordnest::state::post_editor::{PostComposer, PostEditor};
use wordnest::state::profile_editor::ProfileEditor;
use wordnest::storage::FileStore;
use wordnest::util::image::ImageFile;
use wordnest::{ApiClient, ApiError, ConfigError, Session, TokenStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `wordnest login` first")]
    NotLoggedIn,
    #[error("session expired; run `wordnest login` again")]
    SessionExpired,
    #[error("no config directory; pass --storage or set WORDNEST_STORAGE_PATH")]
    NoConfigDir,
    #[error("{0}")]
    Rejected(String),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "wordnest", about = "WordNest blog client")]
struct Cli {
    #[arg(long, env = "WORDNEST_API_URL", default_value = DEFAULT_API_URL)]
    base_url: String,

    #[arg(long, env = "WORDNEST_STORAGE_PATH", help = "Token storage file")]
    storage: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Print raw JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the backend's health endpoint.
    Health,
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "WORDNEST_PASSWORD")]
        password: String,
        #[arg(long, help = "Defaults to --password")]
        confirm: Option<String>,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "WORDNEST_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// List the public feed.
    Feed(PageArgs),
    Post(PostCommand),
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
}

#[derive(Args, Debug)]
struct PostCommand {
    #[command(subcommand)]
    command: PostSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostSubcommand {
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Send only the fields that differ from the stored post.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Profile, stats and the first page of own posts.
    Show,
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long, help = "Defaults to --new-password")]
        confirm_password: Option<String>,
    },
    Avatar(AvatarCommand),
    Posts(PageArgs),
    Stats,
}

#[derive(Args, Debug)]
struct AvatarCommand {
    #[command(subcommand)]
    command: AvatarSubcommand,
}

#[derive(Subcommand, Debug)]
enum AvatarSubcommand {
    Set { path: PathBuf },
    Remove,
}

struct CliContext {
    session: Session,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?.with_base_url(&cli.base_url)?;
    let storage = cli.storage.or_else(default_storage_path).ok_or(CliError::NoConfigDir)?;
    tracing::debug!(base_url = %config.base_url, storage = %storage.display(), "starting");

    let tokens = TokenStore::new(Arc::new(FileStore::open(storage)));
    let client = ApiClient::from_config(&config, tokens)?;
    let mut ctx = CliContext { session: Session::new(client), json: cli.json };

    match cli.command {
        Command::Health => run_health(&ctx).await,
        Command::Signup { username, email, password, confirm } => {
            let mut form = SignupForm::new();
            form.confirm_password = confirm.unwrap_or_else(|| password.clone());
            form.username = username;
            form.email = email;
            form.password = password;
            let ok = form.submit(&mut ctx.session).await;
            finish_auth(&ctx, ok, form.error())
        }
        Command::Login { email, password } => {
            let mut form = LoginForm::new();
            form.email = email;
            form.password = password;
            let ok = form.submit(&mut ctx.session).await;
            finish_auth(&ctx, ok, form.error())
        }
        Command::Logout => {
            ctx.session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = require_user(&mut ctx).await?;
            emit(&ctx, &user, render::user)
        }
        Command::Feed(args) => run_feed(&mut ctx, args).await,
        Command::Post(post) => run_post(&mut ctx, post).await,
        Command::Profile(profile) => run_profile(&mut ctx, profile).await,
    }
}

fn default_storage_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wordnest").join("storage.json"))
}

async fn run_health(ctx: &CliContext) -> Result<(), CliError> {
    let body = ctx.session.client().health().await?;
    if ctx.json {
        return print_json(&body);
    }
    println!("ok");
    Ok(())
}

fn finish_auth(ctx: &CliContext, ok: bool, error: Option<&str>) -> Result<(), CliError> {
    if !ok {
        return Err(CliError::Rejected(error.unwrap_or("authentication failed").to_owned()));
    }
    let user = ctx.session.user().ok_or(CliError::NotLoggedIn)?;
    emit(ctx, user, |user| format!("logged in as {}", user.username))
}

async fn require_user(ctx: &mut CliContext) -> Result<User, CliError> {
    ctx.session.init().await;
    ctx.session.user().cloned().ok_or(CliError::NotLoggedIn)
}

fn settle(outcome: PageOutcome, error: Option<&str>) -> Result<(), CliError> {
    match outcome {
        PageOutcome::Updated | PageOutcome::Ignored => Ok(()),
        PageOutcome::Failed => Err(CliError::Rejected(error.unwrap_or("request failed").to_owned())),
        PageOutcome::RedirectToLogin => Err(CliError::SessionExpired),
    }
}

/// Map a request failure, dropping the stored token on a 401.
fn api_failure(session: &mut Session, error: ApiError) -> CliError {
    if error.is_unauthorized() {
        tracing::info!("request unauthorized; clearing stored token");
        session.logout();
        return CliError::SessionExpired;
    }
    CliError::Api(error)
}

fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    ImageFile::from_path(path).map_err(|source| CliError::ReadFile { path: path.to_owned(), source })
}

async fn run_feed(ctx: &mut CliContext, args: PageArgs) -> Result<(), CliError> {
    ctx.session.init().await;
    let mut feed = FeedPage::new(args.limit);
    let outcome = feed.load_page(&mut ctx.session, args.page).await;
    settle(outcome, feed.error())?;
    if ctx.json {
        return print_json(&serde_json::json!({ "posts": feed.posts, "pagination": feed.pagination }));
    }
    println!("{}", render::listing(&feed.posts, feed.pagination.as_ref()));
    Ok(())
}

async fn run_post(ctx: &mut CliContext, post: PostCommand) -> Result<(), CliError> {
    match post.command {
        PostSubcommand::Show { id } => {
            let result = posts::get_by_id(ctx.session.client(), id).await;
            let post = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            emit(ctx, &post, render::post)
        }
        PostSubcommand::Create { title, content, image } => {
            require_user(ctx).await?;
            let mut composer = PostComposer::new();
            composer.title = title;
            composer.content = content;
            if let Some(path) = image {
                if !composer.select_image(read_image(&path)?) {
                    return Err(rejected(composer.error()));
                }
            }
            let result = composer.submit(ctx.session.client()).await;
            let created = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            emit(ctx, &created, render::post)
        }
        PostSubcommand::Edit { id, title, content, image } => {
            require_user(ctx).await?;
            let result = posts::get_by_id(ctx.session.client(), id).await;
            let current = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            let mut editor = PostEditor::new(&current);
            if let Some(title) = title {
                editor.title = title;
            }
            if let Some(content) = content {
                editor.content = content;
            }
            if let Some(path) = image {
                if !editor.select_image(read_image(&path)?) {
                    return Err(rejected(editor.error()));
                }
            }
            let result = editor.submit(ctx.session.client()).await;
            let updated = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            emit(ctx, &updated, render::post)
        }
        PostSubcommand::Delete { id } => {
            require_user(ctx).await?;
            let result = posts::delete(ctx.session.client(), id).await;
            let response = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            emit(ctx, &response, |response| {
                if response.message.is_empty() { format!("deleted post {id}") } else { response.message.clone() }
            })
        }
    }
}

async fn run_profile(ctx: &mut CliContext, profile: ProfileCommand) -> Result<(), CliError> {
    match profile.command {
        ProfileSubcommand::Show => {
            require_user(ctx).await?;
            let mut page = ProfilePage::default();
            let outcome = page.load(&mut ctx.session).await;
            settle(outcome, page.error())?;
            if ctx.json {
                return print_json(&serde_json::json!({
                    "user": page.user,
                    "stats": page.stats,
                    "posts": page.posts,
                    "pagination": page.pagination,
                }));
            }
            if let Some(user) = &page.user {
                println!("{}\n", render::user(user));
            }
            println!("{}\n", render::stats(&page.stats));
            println!("{}", render::listing(&page.posts, page.pagination.as_ref()));
            Ok(())
        }
        ProfileSubcommand::Update { username, email, bio, current_password, new_password, confirm_password } => {
            let user = require_user(ctx).await?;
            let mut editor = ProfileEditor::new(&user);
            if let Some(username) = username {
                editor.username = username;
            }
            if let Some(email) = email {
                editor.email = email;
            }
            if let Some(bio) = bio {
                editor.bio = bio;
            }
            editor.confirm_password = confirm_password.or_else(|| new_password.clone()).unwrap_or_default();
            editor.current_password = current_password.unwrap_or_default();
            editor.new_password = new_password.unwrap_or_default();
            let result = editor.submit(ctx.session.client()).await;
            let updated = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            ctx.session.update_user(updated.clone());
            emit(ctx, &updated, render::user)
        }
        ProfileSubcommand::Avatar(avatar) => {
            let user = require_user(ctx).await?;
            let mut editor = ProfileEditor::new(&user);
            let result = match avatar.command {
                AvatarSubcommand::Set { path } => {
                    if !editor.select_avatar(read_image(&path)?) {
                        return Err(rejected(editor.error()));
                    }
                    editor.upload_avatar(ctx.session.client()).await
                }
                AvatarSubcommand::Remove => editor.remove_avatar(ctx.session.client()).await,
            };
            let updated = result.map_err(|error| api_failure(&mut ctx.session, error))?;
            emit(ctx, &updated, render::user)
        }
        ProfileSubcommand::Posts(args) => {
            require_user(ctx).await?;
            let mut page = ProfilePage::new(args.limit);
            let outcome = page.load_posts(&mut ctx.session, args.page).await;
            settle(outcome, page.error())?;
            if ctx.json {
                return print_json(&serde_json::json!({ "posts": page.posts, "pagination": page.pagination }));
            }
            println!("{}", render::listing(&page.posts, page.pagination.as_ref()));
            Ok(())
        }
        ProfileSubcommand::Stats => {
            require_user(ctx).await?;
            let mut page = ProfilePage::default();
            let outcome = page.load_stats(&mut ctx.session).await;
            settle(outcome, page.error())?;
            emit(ctx, &page.stats, render::stats)
        }
    }
}

fn rejected(error: Option<&str>) -> CliError {
    CliError::Rejected(error.unwrap_or("invalid input").to_owned())
}

fn emit<T: serde::Serialize>(ctx: &CliContext, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), CliError> {
    if ctx.json {
        return print_json(&serde_json::to_value(value)?);
    }
    println!("{}", text(value));
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
