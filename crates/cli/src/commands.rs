use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use engine::{
    Category, ChangeFeed, Dashboard, EntryForm, History, Identity, Outcome, Profile, ReturnAction,
    SystemClock, Tab,
};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    local_state::{FileHistoryCache, LocalState},
    prompt::Prompter,
    render,
};

#[derive(Parser, Debug)]
#[command(name = "reeni")]
#[command(about = "Keep track of money lent to and borrowed from people")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (TOML); defaults to `config/reeni.toml`.
    #[arg(long, global = true)]
    pub config: Option<String>,
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[arg(long, global = true)]
    pub user_id: Option<String>,
    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one page of active records.
    List(ListArgs),
    Add(AddArgs),
    Edit(EditArgs),
    /// Mark a record returned and move it to history.
    Return(IdArg),
    Delete(IdArg),
    History(HistoryArgs),
    Profile(ProfileArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// `borrow` or `lent`.
    #[arg(long, default_value = "borrow")]
    pub tab: Category,
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// `lent` or `borrow`.
    #[arg(long)]
    pub mode: Category,
    #[arg(long)]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub person: String,
    /// Date the money changed hands; defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value = "")]
    pub return_date: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub person: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub return_date: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Delete an archived record for good.
    Delete(IdArg),
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    /// Save profile details on this device.
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

type ActiveView = Dashboard<Client, SystemClock>;
type HistoryView = History<Client, SystemClock, FileHistoryCache>;

struct Context {
    config: AppConfig,
    client: Client,
    feed: ChangeFeed,
    prompter: Prompter,
}

impl Context {
    fn dashboard(&self) -> ActiveView {
        Dashboard::new(
            self.client.clone(),
            SystemClock,
            self.config.user_id.clone(),
            &self.feed,
        )
        .with_page_size(self.config.page_size)
    }

    fn history(&self) -> Result<HistoryView> {
        let cache = FileHistoryCache::open(&self.config.state_path)?;
        Ok(History::new(
            self.client.clone(),
            SystemClock,
            cache,
            self.config.user_id.clone(),
            &self.feed,
        )
        .with_page_size(self.config.page_size))
    }

    async fn loaded_dashboard(&self) -> Result<ActiveView> {
        let mut dashboard = self.dashboard();
        dashboard.fetch().await?;
        Ok(dashboard)
    }

    fn identity(&self) -> Identity {
        let non_empty = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
        Identity {
            display_name: non_empty(&self.config.display_name),
            email: non_empty(&self.config.email),
            phone: None,
        }
    }

    fn require_user(&self) -> Result<&str> {
        if self.config.user_id.trim().is_empty() {
            return Err(AppError::Invalid(
                "user_id is not configured (use --user-id or REENI_USER_ID)".to_string(),
            ));
        }
        Ok(&self.config.user_id)
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let client = Client::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
    let ctx = Context {
        config,
        client,
        feed: ChangeFeed::new(),
        prompter: Prompter::new(cli.global.yes),
    };

    match cli.command {
        Command::List(args) => list(&ctx, &args).await,
        Command::Add(args) => add(&ctx, args).await,
        Command::Edit(args) => edit(&ctx, args).await,
        Command::Return(IdArg { id }) => {
            let mut dashboard = ctx.loaded_dashboard().await?;
            let outcome = dashboard
                .set_returned(&id, ReturnAction::MarkReturned, &ctx.prompter)
                .await?;
            report(outcome, &format!("moved {id} to history"));

            // Keep the local history snapshot in step with the archive.
            if outcome == Outcome::Declined {
                return Ok(());
            }
            let mut history = ctx.history()?;
            if let Err(err) = history.fetch().await {
                tracing::warn!("history refresh after archive failed: {err}");
            }
            Ok(())
        }
        Command::Delete(IdArg { id }) => {
            let mut dashboard = ctx.loaded_dashboard().await?;
            let outcome = dashboard.delete(&id, &ctx.prompter).await?;
            report(outcome, &format!("deleted {id}"));
            Ok(())
        }
        Command::History(HistoryArgs { command }) => history(&ctx, command).await,
        Command::Profile(ProfileArgs { command }) => profile(&ctx, command),
    }
}

async fn list(ctx: &Context, args: &ListArgs) -> Result<()> {
    let mut dashboard = ctx.loaded_dashboard().await?;
    dashboard.set_tab(Tab::from(args.tab).index());
    dashboard.set_page(args.page);

    print!(
        "{}",
        render::dashboard(
            dashboard.tab(),
            &dashboard.page_items(),
            dashboard.page(),
            dashboard.page_count()
        )
    );
    Ok(())
}

async fn add(ctx: &Context, args: AddArgs) -> Result<()> {
    let mut dashboard = ctx.dashboard();
    let mut form = EntryForm::new(&SystemClock);
    form.mode = Some(args.mode);
    form.amount = args.amount;
    form.person = args.person;
    if let Some(date) = args.date {
        form.given_date = date;
    }
    form.return_date = args.return_date;

    let record = dashboard.add(&form).await?;
    println!(
        "added {} {} ({})",
        record.category, record.amount, record.id
    );
    Ok(())
}

async fn edit(ctx: &Context, args: EditArgs) -> Result<()> {
    let mut dashboard = ctx.loaded_dashboard().await?;
    let form = dashboard.open_edit(&args.id)?;
    if let Some(amount) = args.amount {
        form.set_amount(amount);
    }
    if let Some(person) = args.person {
        form.set_person(person);
    }
    if let Some(date) = args.date {
        form.set_due_date(date);
    }
    if let Some(date) = args.return_date {
        form.set_return_date(date);
    }

    let outcome = dashboard.save_edit().await?;
    report(outcome, &format!("updated {}", args.id));
    Ok(())
}

async fn history(ctx: &Context, command: HistoryCommand) -> Result<()> {
    let mut history = ctx.history()?;
    match command {
        HistoryCommand::List { page } => {
            if let Err(err) = history.open().await {
                // A cached snapshot is still worth showing.
                if history.items().is_empty() {
                    return Err(err.into());
                }
                eprintln!("showing saved history: {err}");
            }
            history.set_page(page);
            print!(
                "{}",
                render::history(history.page_items(), history.page(), history.page_count())
            );
        }
        HistoryCommand::Delete(IdArg { id }) => {
            history.fetch().await?;
            let outcome = history.delete(&id, &ctx.prompter).await?;
            report(outcome, &format!("deleted {id} from history"));
        }
    }
    Ok(())
}

fn profile(ctx: &Context, command: ProfileCommand) -> Result<()> {
    let user_id = ctx.require_user()?;
    let path = &ctx.config.state_path;
    let mut state = LocalState::load(path)?;
    let current = Profile::resolve(state.profile_for(user_id), &ctx.identity());

    match command {
        ProfileCommand::Show => {
            print!("{}", render::profile(&current));
        }
        ProfileCommand::Set { name, email, phone } => {
            let updated = Profile {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
                phone: phone.unwrap_or(current.phone),
            };
            state.set_profile(user_id, updated.clone());
            state.save(path)?;
            tracing::info!("saved profile for {user_id}");
            print!("{}", render::profile(&updated));
        }
    }
    Ok(())
}

fn report(outcome: Outcome, done: &str) {
    match outcome {
        Outcome::Done => println!("{done}"),
        Outcome::Declined => println!("cancelled"),
    }
}
