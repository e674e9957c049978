//! Subcommand handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use sessiongate_application::ports::{LoginCredentials, Registration};
use sessiongate_application::{ApplicationError, Login, Logout, Register, Revalidation};
use sessiongate_domain::{Action, CapabilityContext, ResourceKind};
use sessiongate_infrastructure::to_json_stable;

use crate::bootstrap::Runtime;
use crate::cli::Commands;

/// Runs one subcommand against a bootstrapped runtime.
///
/// # Errors
///
/// Returns an error when the command fails; validation messages from the
/// server are included in the error text.
pub async fn run(runtime: &Runtime, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let session = Login::new(runtime.gateway.clone(), runtime.store.clone())
                .execute(&LoginCredentials::new(email, password))
                .await
                .map_err(describe)?;
            println!("logged in as {}", session.username());
        }
        Commands::Register { username, email, password } => {
            let registration = Registration { username, email, password };
            let session = Register::new(runtime.gateway.clone(), runtime.store.clone())
                .execute(&registration)
                .await
                .map_err(describe)?;
            println!("registered and logged in as {}", session.username());
        }
        Commands::Whoami => match runtime.store.get() {
            Some(session) => println!("{} <{}>", session.username(), session.email()),
            None => println!("not logged in"),
        },
        Commands::Logout => {
            let logout = Logout::new(runtime.store.clone(), Arc::new(runtime.cache.clone()));
            match logout.execute() {
                Some(previous) => println!("logged out {}", previous.username()),
                None => println!("not logged in"),
            }
        }
        Commands::Can { action, resource, author, owner, following } => {
            let action: Action = action.parse()?;
            let resource: ResourceKind = resource.parse()?;
            let mut context = CapabilityContext::new().following(following);
            if let Some(author) = author {
                context = context.article_author(author.clone()).comment_author(author);
            }
            if let Some(owner) = owner {
                context = context.profile_owner(owner);
            }
            let allowed = runtime.store.can_perform(action, resource, &context);
            println!("{}", if allowed { "allowed" } else { "denied" });
        }
        Commands::Get { path } => {
            let body = runtime
                .transport
                .get_json_cached(&path)
                .await
                .map_err(|e| describe(e.into()))?;
            print!("{}", to_json_stable(&body).context("failed to render response")?);
        }
        Commands::Status => {
            let report = StatusReport::from_runtime(runtime);
            print!("{}", to_json_stable(&report).context("failed to render status")?);
        }
    }
    Ok(())
}

/// Flattens server validation errors into one readable error.
fn describe(error: ApplicationError) -> anyhow::Error {
    let messages = match &error {
        ApplicationError::Transport(transport) => transport
            .response()
            .and_then(|response| response.validation())
            .map(sessiongate_domain::ValidationErrors::messages),
        _ => None,
    };

    match messages {
        Some(messages) if !messages.is_empty() => anyhow::anyhow!(messages.join("; ")),
        _ => anyhow::Error::new(error),
    }
}

const fn revalidation_label(revalidation: &Revalidation) -> &'static str {
    match revalidation {
        Revalidation::Skipped => "skipped",
        Revalidation::Refreshed(_) => "refreshed",
        Revalidation::Invalidated(_) => "invalidated",
        Revalidation::Inconclusive => "inconclusive",
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    api_base_url: String,
    gate: String,
    bootstrapped: bool,
    session: Option<SessionSummary>,
    auto_login: Option<String>,
    revalidation: String,
    current_path: String,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    username: String,
    email: String,
    token: String,
}

impl StatusReport {
    fn from_runtime(runtime: &Runtime) -> Self {
        use sessiongate_application::ports::Navigator;

        Self {
            api_base_url: runtime.config.api_base_url.clone(),
            gate: format!("{:?}", runtime.gate.state()).to_lowercase(),
            bootstrapped: runtime.store.is_bootstrapped(),
            session: runtime.store.get().map(|session| SessionSummary {
                username: session.username().to_string(),
                email: session.email().to_string(),
                token: session.token_preview(),
            }),
            auto_login: runtime
                .report
                .auto_login
                .as_ref()
                .map(|outcome| format!("{outcome:?}")),
            revalidation: revalidation_label(&runtime.report.revalidation).to_string(),
            current_path: runtime.navigator.current_path(),
        }
    }
}
