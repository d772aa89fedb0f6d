use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use courier::config::{ClientConfig, ConfigError};
use courier::firebase::{FirebaseAuth, google_authorize_url};
use courier::identity::{AuthError, GoogleCredential};
use courier::notice::{AuthAction, Notice, Notifier};
use courier::transport::TransportError;
use courier::{ClientError, GateState, IdentityProvider, SessionTracker, UploadCategory, submit};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uplink::store::DEFAULT_SESSION_FILE;
use uplink::{ConsoleNotifier, FileSessionStore, ReqwestTransport, read_selected_file};

type Auth = FirebaseAuth<ReqwestTransport, FileSessionStore>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("could not read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("GOOGLE_CLIENT_ID is not set")]
    MissingGoogleClientId,
    #[error("{0}")]
    GoogleUrl(AuthError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The action ran and failed; its notice has already been shown.
    #[error("{0}")]
    Action(ClientError),
}

#[derive(Parser, Debug)]
#[command(name = "uplink", about = "Sign in and upload files under your user id")]
struct Cli {
    #[arg(long, env = "UPLINK_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account with email and password.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UPLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with email and password.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UPLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with a Google ID token.
    SigninGoogle {
        #[arg(long, env = "GOOGLE_ID_TOKEN", hide_env_values = true)]
        id_token: String,
    },
    /// Print the Google consent URL that yields an ID token.
    GoogleUrl {
        #[arg(long)]
        nonce: Option<String>,
        /// Value Google echoes back in the redirect; compare it before using the token.
        #[arg(long)]
        state: Option<String>,
    },
    /// Sign out and forget the stored session.
    Signout,
    /// Show whether a user is signed in.
    Status {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Upload a file under the signed-in user's id.
    Upload {
        path: Option<PathBuf>,
        #[arg(long, default_value = "file")]
        kind: UploadCategory,
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    state: &'static str,
    uid: Option<&'a str>,
    email: Option<&'a str>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "could not load .env");
        }
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Action(e)) => {
            tracing::debug!(error = %e, "action failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let transport = ReqwestTransport::new(config.upload_timeout)?;
    let auth: Auth = FirebaseAuth::new(transport.clone(), FileSessionStore::new(&cli.session_file), config.firebase());

    let mut tracker = SessionTracker::start(&auth);
    auth.restore();
    let gate = tracker.resolve().await;
    tracing::debug!(%gate, "session resolved");

    let result = execute(cli.command, &config, &auth, &transport, &mut tracker).await;
    tracker.teardown();
    result
}

async fn execute(
    command: Command,
    config: &ClientConfig,
    auth: &Auth,
    transport: &ReqwestTransport,
    tracker: &mut SessionTracker,
) -> Result<(), CliError> {
    let notifier = ConsoleNotifier;
    match command {
        Command::Signup { email, password } => {
            report(&notifier, AuthAction::SignUp, auth.sign_up(&email, &password).await)
        }
        Command::Signin { email, password } => {
            report(&notifier, AuthAction::SignIn, auth.sign_in(&email, &password).await)
        }
        Command::SigninGoogle { id_token } => {
            let credential = GoogleCredential { id_token };
            let result = auth.sign_in_with_google(&credential).await;
            if let Ok(identity) = &result {
                println!("Signed in as {}", identity.display_name());
            }
            report(&notifier, AuthAction::GoogleSignIn, result)
        }
        Command::GoogleUrl { nonce, state } => {
            let client_id = config.google_client_id.as_deref().ok_or(CliError::MissingGoogleClientId)?;
            let nonce = nonce.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let state = state.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let url = google_authorize_url(client_id, &config.google_redirect_uri, &nonce, &state)
                .map_err(CliError::GoogleUrl)?;
            eprintln!("expected state: {state}");
            println!("{url}");
            Ok(())
        }
        Command::Signout => report(&notifier, AuthAction::SignOut, auth.sign_out().await),
        Command::Status { json } => {
            tracker.drain();
            print_status(tracker.gate(), json)
        }
        Command::Upload { path, kind, endpoint } => {
            let file = match path {
                Some(path) => {
                    let file = read_selected_file(&path).await.map_err(|source| CliError::ReadFile { path, source })?;
                    if !kind.accepts(&file) {
                        tracing::warn!(file = %file.name, accept = kind.accept(), "file does not match the {kind} filter");
                    }
                    Some(file)
                }
                None => None,
            };
            tracker.drain();
            let identity = tracker.identity().cloned();
            let endpoint = endpoint.unwrap_or_else(|| config.upload_endpoint.clone());

            let outcome = submit(transport, file.as_ref(), identity.as_ref(), &endpoint).await;
            notifier.notify(&Notice::for_upload(kind, &outcome));
            outcome.map(drop).map_err(CliError::Action)
        }
    }
}

fn report<T>(notifier: &impl Notifier, action: AuthAction, result: Result<T, AuthError>) -> Result<(), CliError> {
    let result = result.map_err(ClientError::from);
    if let Some(notice) = Notice::for_auth(action, &result) {
        notifier.notify(&notice);
    }
    result.map(drop).map_err(CliError::Action)
}

fn print_status(gate: &GateState, json: bool) -> Result<(), CliError> {
    let identity = gate.identity();
    if json {
        let report = StatusReport {
            state: gate.label(),
            uid: identity.map(|i| i.uid.as_str()),
            email: identity.and_then(|i| i.email.as_deref()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    match identity {
        Some(identity) => println!("{gate}: {} ({})", identity.display_name(), identity.uid),
        None => println!("{gate}"),
    }
    Ok(())
}
