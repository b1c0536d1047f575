use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{get_styles, print_error, print_info, print_success, print_warning};

use share_trips_client::config::DEFAULT_REQUEST_TIMEOUT_SEC;
use share_trips_client::profile::{
    EditorError, EditorState, FetchFailurePolicy, FetchResolution, ProfileEditor, ProfileField,
    SaveOutcome, SocialIcon, UserProfile, PLATFORM_CHOICES,
};
use share_trips_client::{
    AppConfig, AppShell, CliConfig, FileConfig, Listing, ListingCard, PopupState, ToastKind,
};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to a TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Base URL of the Share Trips backend.
    #[clap(long)]
    pub api_url: Option<String>,

    /// File the session cookies are persisted to. Cookies stay in memory when omitted.
    #[clap(long, value_parser = parse_path)]
    pub cookie_file: Option<PathBuf>,

    /// Timeout of each backend request in seconds.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SEC)]
    pub timeout_sec: u64,

    /// Mark session cookies as Secure (production).
    #[clap(long)]
    pub secure_cookies: bool,

    /// What to do when a profile can't be fetched.
    #[clap(long, value_enum, default_value_t = FetchFailurePolicy::LogOnly)]
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            api_base_url: self.api_url.clone(),
            request_timeout_sec: self.timeout_sec,
            cookie_file: self.cookie_file.clone(),
            secure_cookies: self.secure_cookies,
            fetch_failure_policy: self.fetch_failure_policy,
        }
    }
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    Open,
    Close,
    Status,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Stores a session for the given user and checks whether the account is verified.
    Login {
        user_id: String,
        access_token: String,
        refresh_token: String,

        /// Verification hint stored until the backend answers.
        #[clap(long)]
        verified: bool,
    },

    /// Clears the session cookies.
    Logout,

    /// Shows the session cookies.
    Whoami,

    /// Exchanges the refresh token for a new access token.
    Refresh,

    /// Sets the account verification flag.
    Verified {
        #[clap(action = clap::ArgAction::Set, required = true)]
        is_verified: bool,
    },

    /// Loads the profile of the given user.
    Profile { user_id: String },

    /// Shows the current profile (the draft while editing).
    Show,

    /// Starts editing the current profile. Opens the login form when not allowed.
    Edit,

    /// Sets a profile field of the draft. Select fields take their label, empty clears them.
    Set {
        #[clap(value_enum)]
        field: ProfileField,
        #[clap(default_value = "")]
        value: String,
    },

    /// Adds an empty contact link and prints its placeholder label.
    AddLink,

    /// Renames the platform of a contact link.
    RenameLink {
        from: String,
        #[clap(value_parser = PossibleValuesParser::new(PLATFORM_CHOICES.iter().copied()))]
        to: String,
    },

    /// Sets the URL of a contact link.
    SetLink { platform: String, url: String },

    /// Removes a contact link.
    RemoveLink { platform: String },

    /// Submits the draft.
    Save,

    /// Drops the draft.
    Cancel,

    /// Shows the field errors of the last save.
    Errors,

    /// Prints the cards of the listings in a JSON file (one listing or an array).
    Card {
        #[clap(value_parser = parse_path)]
        path: PathBuf,

        /// Show the "posted by" badge.
        #[clap(long)]
        show_user: bool,
    },

    /// Opens, closes or shows the generic popup.
    Popup {
        #[clap(value_enum, default_value = "status")]
        action: Toggle,
    },

    /// Opens, closes or shows the login form.
    LoginForm {
        #[clap(value_enum, default_value = "status")]
        action: Toggle,

        /// Where to go after a successful login.
        redirect_url: Option<String>,
    },

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

struct Repl {
    runtime: Runtime,
    shell: AppShell,
    editor: Option<ProfileEditor>,
}

impl Repl {
    fn execute_command(&mut self, line: &str) -> CommandExecutionResult {
        if line.trim().is_empty() {
            return CommandExecutionResult::Ok;
        }

        let args =
            shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

        let cli =
            InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

        let result = match cli {
            Ok(cli) => {
                cli_style::print_list_item(line, 0);
                self.run(cli.command)
            }
            Err(e) => {
                if e.print().is_err() {
                    println!("{}", e);
                }
                CommandExecutionResult::Ok
            }
        };

        self.print_toasts();
        result
    }

    fn run(&mut self, command: InnerCommand) -> CommandExecutionResult {
        match self.try_run(command) {
            Ok(true) => CommandExecutionResult::Ok,
            Ok(false) => CommandExecutionResult::Exit,
            Err(err) => CommandExecutionResult::Error(format!("{:#}", err)),
        }
    }

    /// Returns `false` when the REPL should stop.
    fn try_run(&mut self, command: InnerCommand) -> Result<bool> {
        match command {
            InnerCommand::Login {
                user_id,
                access_token,
                refresh_token,
                verified,
            } => {
                let is_verified = self.runtime.block_on(self.shell.session().login(
                    &user_id,
                    &access_token,
                    &refresh_token,
                    verified,
                ))?;
                print_success(&format!("Logged in as {}", user_id));
                if !is_verified {
                    print_warning("Account is not verified");
                }
                let popup = self.shell.popup();
                let state = popup.state()?;
                if state.is_login_form_open {
                    popup.close_login_form()?;
                    print_info(&format!("Continue at {}", state.redirect_url));
                }
                self.refresh_viewer();
            }
            InnerCommand::Logout => {
                self.shell.session().logout()?;
                self.refresh_viewer();
                print_success("Logged out");
            }
            InnerCommand::Whoami => {
                let session = self.shell.cookies().snapshot();
                cli_style::print_section_header("Session");
                print_optional("User id", session.user_id.as_deref());
                print_optional("Access token", session.access_token.as_deref());
                print_optional("Refresh token", session.refresh_token.as_deref());
                print_optional("Verified", session.is_verified.as_deref());
                cli_style::print_section_footer();
            }
            InnerCommand::Refresh => {
                match self.runtime.block_on(self.shell.session().refresh())? {
                    Some(_) => print_success("Access token refreshed"),
                    None => print_warning("Refresh failed, session cleared"),
                }
                self.refresh_viewer();
            }
            InnerCommand::Verified { is_verified } => {
                self.shell.session().set_verified(is_verified)?;
                print_success(&format!("Verified flag set to {}", is_verified));
            }
            InnerCommand::Profile { user_id } => {
                let editor = self
                    .editor
                    .get_or_insert_with(|| self.shell.profile_editor(&user_id));
                let ticket = editor.set_profile_id(&user_id)?;
                let result = self.runtime.block_on(ticket.load(self.shell.api()));
                match editor.complete_fetch(ticket, result) {
                    FetchResolution::Loaded => print_profile(editor),
                    FetchResolution::Stale => debug!("Ignoring stale profile response"),
                    FetchResolution::Failed => print_editor_state(editor),
                }
            }
            InnerCommand::Show => print_profile(self.editor()?),
            InnerCommand::Edit => {
                let editor = self.editor.as_mut().context("No profile loaded")?;
                match editor.begin_edit() {
                    Ok(()) => print_success("Editing profile"),
                    Err(EditorError::NotAllowed) => {
                        let redirect = format!("/profile/{}", editor.user_id());
                        if self.shell.require_login(&redirect)? {
                            print_warning("Log in to edit this profile");
                        } else {
                            print_warning("Only the owner can edit this profile");
                        }
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            InnerCommand::Set { field, value } => {
                self.editor_mut()?.draft_mut()?.set_field(field, &value)?;
            }
            InnerCommand::AddLink => {
                let label = self.editor_mut()?.draft_mut()?.add_link();
                print_success(&format!("Added link {}", label));
            }
            InnerCommand::RenameLink { from, to } => {
                self.editor_mut()?.draft_mut()?.rename_link(&from, &to)?;
            }
            InnerCommand::SetLink { platform, url } => {
                self.editor_mut()?.draft_mut()?.set_link_url(&platform, &url)?;
            }
            InnerCommand::RemoveLink { platform } => {
                self.editor_mut()?.draft_mut()?.remove_link(&platform)?;
            }
            InnerCommand::Save => {
                let editor = self.editor.as_mut().context("No profile loaded")?;
                let outcome = self.runtime.block_on(editor.save(self.shell.api()))?;
                match outcome {
                    SaveOutcome::Saved => print_profile(editor),
                    SaveOutcome::Rejected(_) => print_field_errors(editor),
                    SaveOutcome::Failed => {}
                }
            }
            InnerCommand::Cancel => {
                let editor = self.editor_mut()?;
                editor.cancel_edit()?;
                print_profile(editor);
            }
            InnerCommand::Errors => print_field_errors(self.editor()?),
            InnerCommand::Card { path, show_user } => {
                for listing in load_listings(&path)? {
                    let card = ListingCard::new(&listing, show_user);
                    cli_style::print_block(&listing.title, &card.render());
                }
            }
            InnerCommand::Popup { action } => {
                let popup = self.shell.popup();
                match action {
                    Toggle::Open => popup.open_popup()?,
                    Toggle::Close => popup.close_popup()?,
                    Toggle::Status => {}
                }
                print_popup_state(&popup.state()?);
            }
            InnerCommand::LoginForm {
                action,
                redirect_url,
            } => {
                let popup = self.shell.popup();
                match (action, redirect_url) {
                    (Toggle::Open, Some(url)) => popup.open_login_form(&url)?,
                    (Toggle::Open, None) => popup.open_login_form_default()?,
                    (Toggle::Close, _) => popup.close_login_form()?,
                    (Toggle::Status, _) => {}
                }
                print_popup_state(&popup.state()?);
            }
            InnerCommand::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn editor(&self) -> Result<&ProfileEditor> {
        self.editor.as_ref().context("No profile loaded")
    }

    fn editor_mut(&mut self) -> Result<&mut ProfileEditor> {
        self.editor.as_mut().context("No profile loaded")
    }

    fn refresh_viewer(&mut self) {
        let viewer = self.shell.viewer();
        if let Some(editor) = self.editor.as_mut() {
            editor.set_viewer(viewer);
        }
    }

    fn print_toasts(&self) {
        for toast in self.shell.toaster().drain() {
            match toast.kind {
                ToastKind::Success => print_success(&toast.message),
                ToastKind::Error => print_error(&toast.message),
            }
        }
    }
}

fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read listings file: {:?}", path))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse listings file: {:?}", path))?;
    let listings = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(listings)
}

fn print_optional(key: &str, value: Option<&str>) {
    cli_style::print_key_value(key, value.unwrap_or("-"));
}

fn print_editor_state(editor: &ProfileEditor) {
    match editor.state() {
        EditorState::Loading => print_info("Loading..."),
        EditorState::FetchFailed { message } => print_error(message),
        state => print_info(&format!("{:?}", state)),
    }
}

fn print_profile(editor: &ProfileEditor) {
    let profile = match editor.displayed() {
        Some(profile) => profile,
        None => return print_editor_state(editor),
    };
    let title = match editor.state() {
        EditorState::Editing | EditorState::Saving => "Profile (editing)",
        _ => "Profile",
    };
    cli_style::print_section_header(title);
    print_profile_fields(profile);
    if editor.can_edit() && *editor.state() == EditorState::Viewing {
        print_info("Type 'edit' to change your profile");
    }
    cli_style::print_section_footer();
}

fn print_profile_fields(profile: &UserProfile) {
    use share_trips_client::profile::Choice;

    cli_style::print_key_value("Id", &profile.id);
    cli_style::print_key_value("Name", &profile.name);
    cli_style::print_key_value("Username", &profile.username);
    cli_style::print_key_value("Email", &profile.email);
    cli_style::print_key_value("Photo", &profile.photo);
    cli_style::print_key_value("About", &profile.about);
    cli_style::print_key_value("Coliver preferences", &profile.coliver_preferences);
    cli_style::print_key_value(
        "Language",
        profile.language.map(|l| l.label()).unwrap_or("-"),
    );
    cli_style::print_key_value(
        "Travel status",
        profile.travel_status.map(|s| s.label()).unwrap_or("-"),
    );
    if profile.social_media_links.is_empty() {
        cli_style::print_empty_list("No contact links");
    }
    for link in profile.social_media_links.iter() {
        let icon = SocialIcon::for_url(&link.url);
        cli_style::print_list_item(
            &format!("[{:?}] {}: {}", icon, link.platform, link.url),
            1,
        );
    }
}

fn print_field_errors(editor: &ProfileEditor) {
    let errors = editor.field_errors();
    if errors.is_empty() {
        cli_style::print_empty_list("No field errors");
        return;
    }
    for (field, messages) in errors {
        for message in messages {
            cli_style::print_list_item_styled(
                &format!("{}: {}", field, message),
                cli_style::colors::RED,
                0,
            );
        }
    }
}

fn print_popup_state(state: &PopupState) {
    cli_style::print_key_value("Popup open", &state.is_popup_open.to_string());
    cli_style::print_key_value("Login form open", &state.is_login_form_open.to_string());
    cli_style::print_key_value("Redirect", &state.redirect_url);
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    let cookie_location = config
        .cookie_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "in memory".to_string());

    let runtime = Runtime::new().context("Failed to start tokio runtime")?;
    let shell = AppShell::new(config)?;
    cli_style::print_welcome(shell.api().base_url(), &cookie_location);

    let mut repl = Repl {
        runtime,
        shell,
        editor: None,
    };

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(MyHelper::new()));

    let prompt = cli_style::get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match repl.execute_command(&line) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }

    cli_style::print_goodbye();
    Ok(())
}
