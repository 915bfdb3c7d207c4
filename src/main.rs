/*!
# Happy Day - A Mood Journal Calendar

This file contains the binary entry point: it parses arguments, installs
logging, loads configuration and dispatches to the operations in
`happyday::ops`.

## Usage

```text
happyday [--verbose] [--log-format text|json] [--log-level LEVEL] <COMMAND>

Commands:
  login <USERNAME>           Log in (password prompted)
  register <USERNAME> <EMAIL>
  logout
  whoami
  passwd                     Change the password
  calendar [--month YYYY-MM] [--offset N] [--select DATE]
  list [--date DATE]
  add --title T [--date DATE] [--mood M] [--description D] [--image PATH]
  edit <ID> [--title T] [--date DATE] [--mood M] [--description D] [--image PATH | --remove-image]
  delete <ID>
```

## Configuration

- `HAPPYDAY_DIR`: Data directory (defaults to `~/.happyday`)
- `HAPPYDAY_STORAGE`: `sqlite` or `file`
- `HAPPYDAY_AUTH_LATENCY_MS`: Simulated login latency
- `HAPPYDAY_WEEK_START`: First day of the week in the grid
*/

use chrono::{Local, NaiveDate};
use happyday::cli::{CliArgs, Command};
use happyday::config::Config;
use happyday::constants::{
    DEFAULT_LOG_LEVEL, ENV_VAR_HAPPYDAY_TEST_NEW_PASSWORD, ENV_VAR_HAPPYDAY_TEST_PASSWORD,
    LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use happyday::errors::AppResult;
use happyday::journal::NewEntry;
use happyday::notify::{Notice, NoticeLevel, Notifier};
use happyday::ops;
use happyday::JournalApp;
use tracing::{debug, error, info, info_span, Instrument};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Prints notices to stderr so stdout only carries command output.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let mark = match notice.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
        };
        eprintln!("{} {}", mark, notice);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Obtain the current date once at the beginning
    let today = Local::now().date_naive();

    let args = CliArgs::parse();
    init_tracing(&args);

    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        invocation_id = %Uuid::new_v4()
    );

    if let Err(e) = run(args, today).instrument(span).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(args: &CliArgs) {
    let level = match (&args.log_level, args.verbose) {
        (Some(level), _) => level.clone(),
        (None, true) => "debug".to_string(),
        (None, false) => DEFAULT_LOG_LEVEL.to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if args.log_format == LOG_FORMAT_JSON {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: CliArgs, today: NaiveDate) -> AppResult<()> {
    info!("Starting happyday");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let mut app = JournalApp::open(&config, Box::new(ConsoleNotifier))?;

    let output = match args.command {
        Command::Login { username } => {
            let password = read_secret(ENV_VAR_HAPPYDAY_TEST_PASSWORD, "Password: ")?;
            ops::login(&mut app, &username, &password).await?
        }
        Command::Register { username, email } => {
            let password = read_secret(ENV_VAR_HAPPYDAY_TEST_PASSWORD, "Choose a password: ")?;
            ops::register(&mut app, &username, &email, &password).await?
        }
        Command::Logout => ops::logout(&mut app),
        Command::Whoami => ops::whoami(&app),
        Command::Passwd => {
            let current = read_secret(ENV_VAR_HAPPYDAY_TEST_PASSWORD, "Current password: ")?;
            let new = read_secret(ENV_VAR_HAPPYDAY_TEST_NEW_PASSWORD, "New password: ")?;
            ops::change_password(&mut app, &current, &new).await?
        }
        Command::Calendar(calendar) => {
            ops::show_calendar(&app, config.week_start, today, &calendar.into())?
        }
        Command::List { date } => ops::list_entries(&app, date.unwrap_or(today))?,
        Command::Add(add) => {
            let fields = NewEntry {
                date: add.date.unwrap_or(today),
                title: add.title,
                description: add.description,
                mood: add.mood,
                image_url: None,
            };
            ops::add_entry(&mut app, fields, add.image.as_deref())?
        }
        Command::Edit(edit) => {
            let id = edit.id.clone();
            ops::edit_entry(&mut app, &id, edit.into())?
        }
        Command::Delete { id } => ops::delete_entry(&mut app, &id)?,
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// Reads a password from `env_var` when set, otherwise prompts for it.
fn read_secret(env_var: &str, prompt: &str) -> AppResult<Zeroizing<String>> {
    if let Ok(value) = std::env::var(env_var) {
        debug!("Using {} for non-interactive input", env_var);
        return Ok(Zeroizing::new(value));
    }
    Ok(Zeroizing::new(rpassword::prompt_password(prompt)?))
}
