//! Command-line interface.
//!
//! Without a subcommand the terminal UI starts. The subcommands run one
//! server operation and print the result to stdout.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::{auth, ResumeClient, ResumeId};
use crate::config::{Config, Profile};
use crate::error::{AppError, Result};
use crate::resume::render_plain_text;

/// Profile name used when only `--url` is given.
const AD_HOC_PROFILE: &str = "cli";

#[derive(Debug, Parser)]
#[command(name = "resumedeck", version, about)]
pub struct Cli {
    /// Profile from config.toml to use instead of the default one.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Server URL, overriding the profile's.
    #[arg(long)]
    pub url: Option<String>,

    /// Login name, overriding the profile's.
    #[arg(long)]
    pub user: Option<String>,

    /// Write debug output to the log file.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print the stored resume ids.
    List,
    /// Print one resume as text.
    Show { id: ResumeId },
    /// Open the exported document of a resume in the browser.
    Export { id: ResumeId },
    /// Delete a resume.
    Delete {
        id: ResumeId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Store the profile's password in the OS keyring.
    SetPassword,
    /// Add a server profile to config.toml.
    AddProfile {
        name: String,
        url: String,
        /// Login name for the server.
        #[arg(long)]
        username: Option<String>,
        /// Make this the default profile.
        #[arg(long)]
        default: bool,
    },
}

impl Cli {
    /// Pick the profile to connect with and apply the command-line overrides.
    pub fn resolve_profile(&self, config: &Config) -> Result<Profile> {
        let mut profile = match (&self.profile, config.get_default_profile(), &self.url) {
            (Some(name), _, _) => config.profile(name)?.clone(),
            (None, Some(profile), _) => profile.clone(),
            (None, None, Some(url)) => Profile::new(AD_HOC_PROFILE.to_string(), url.clone(), None),
            (None, None, None) => {
                let path = Config::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string());
                return Err(AppError::other(format!(
                    "No server configured. Add a profile to {} or pass --url.",
                    path
                )));
            }
        };

        if let Some(url) = &self.url {
            profile.url = url.clone();
        }
        if let Some(user) = &self.user {
            profile.username = Some(user.clone());
        }
        profile.validate()?;
        Ok(profile)
    }
}

/// Run a one-shot subcommand.
pub async fn run_command(cli: &Cli, command: Command, config: Config) -> Result<()> {
    match command {
        Command::List => {
            let client = connect(cli, &config).await?;
            let summaries = client.list_resume_ids().await?;
            let mut out = io::stdout().lock();
            for summary in summaries {
                writeln!(out, "{}", summary.label())?;
            }
        }
        Command::Show { id } => {
            let client = connect(cli, &config).await?;
            let record = client.load_resume(&id).await?;
            print!("{}", render_plain_text(&record));
        }
        Command::Export { id } => {
            let client = connect(cli, &config).await?;
            let url = client.export_url(&id);
            info!(%url, "Opening export");
            open::that(&url)?;
            println!("Opened {}", url);
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete resume {}?", id))? {
                println!("Cancelled");
                return Ok(());
            }
            let client = connect(cli, &config).await?;
            let text = client.delete_resume(&id).await?;
            println!("Resume deleted successfully");
            if !text.trim().is_empty() {
                println!("{}", text.trim());
            }
        }
        Command::SetPassword => set_password(&cli.resolve_profile(&config)?)?,
        Command::AddProfile {
            name,
            url,
            username,
            default,
        } => {
            let mut updated = config.clone();
            updated.add_profile(Profile::new(name.clone(), url, username), default)?;
            updated.save()?;
            println!("Profile '{}' added to {}", name, Config::config_path()?.display());
        }
    }
    Ok(())
}

async fn connect(cli: &Cli, config: &Config) -> Result<ResumeClient> {
    let profile = cli.resolve_profile(config)?;
    info!(profile = %profile.name, url = %profile.url, "Using profile");
    Ok(ResumeClient::connect(&profile, &config.settings).await?)
}

fn set_password(profile: &Profile) -> Result<()> {
    if profile.username.is_none() {
        return Err(AppError::other(format!(
            "Profile '{}' has no username; set one with --user or in config.toml.",
            profile.name
        )));
    }
    let password = prompt(&format!("Password for profile '{}': ", profile.name))?;
    if password.is_empty() {
        return Err(AppError::other("Password cannot be empty."));
    }
    auth::store_password(&profile.name, &password)?;
    println!("Password stored for profile '{}'", profile.name);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", message)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, Settings};

    fn config_with(profiles: Vec<Profile>, default: Option<&str>) -> Config {
        Config {
            settings: Settings {
                default_profile: default.map(String::from),
                ..Settings::default()
            },
            profiles,
        }
    }

    fn profile(name: &str, url: &str) -> Profile {
        Profile::new(name.to_string(), url.to_string(), Some("ana".to_string()))
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["resumedeck", "delete", "12", "--yes"]);
        assert_eq!(
            cli.command,
            Some(Command::Delete {
                id: ResumeId::new("12"),
                yes: true
            })
        );

        let cli = Cli::parse_from(["resumedeck", "-v", "--profile", "work"]);
        assert!(cli.verbose);
        assert_eq!(cli.profile.as_deref(), Some("work"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_add_profile() {
        let cli = Cli::parse_from([
            "resumedeck",
            "add-profile",
            "home",
            "http://localhost:5000",
            "--username",
            "ana",
            "--default",
        ]);
        assert_eq!(
            cli.command,
            Some(Command::AddProfile {
                name: "home".to_string(),
                url: "http://localhost:5000".to_string(),
                username: Some("ana".to_string()),
                default: true,
            })
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(Cli::try_parse_from(["resumedeck", "show", " "]).is_err());
    }

    #[test]
    fn test_resolve_uses_default_profile() {
        let config = config_with(
            vec![profile("a", "http://a"), profile("b", "http://b")],
            Some("b"),
        );
        let cli = Cli::parse_from(["resumedeck"]);
        assert_eq!(cli.resolve_profile(&config).unwrap().name, "b");
    }

    #[test]
    fn test_resolve_named_profile_with_overrides() {
        let config = config_with(vec![profile("a", "http://a")], None);
        let cli = Cli::parse_from([
            "resumedeck",
            "-p",
            "a",
            "--url",
            "http://other:5000",
            "--user",
            "bo",
        ]);
        let resolved = cli.resolve_profile(&config).unwrap();
        assert_eq!(resolved.url, "http://other:5000");
        assert_eq!(resolved.username.as_deref(), Some("bo"));
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let config = config_with(vec![profile("a", "http://a")], None);
        let cli = Cli::parse_from(["resumedeck", "-p", "missing"]);
        assert!(matches!(
            cli.resolve_profile(&config),
            Err(AppError::Config(ConfigError::ProfileNotFound(_)))
        ));
    }

    #[test]
    fn test_resolve_url_without_config() {
        let cli = Cli::parse_from(["resumedeck", "--url", "http://localhost:5000"]);
        let resolved = cli.resolve_profile(&Config::default()).unwrap();
        assert_eq!(resolved.name, AD_HOC_PROFILE);
        assert!(resolved.username.is_none());
    }

    #[test]
    fn test_resolve_nothing_configured() {
        let cli = Cli::parse_from(["resumedeck"]);
        assert!(matches!(
            cli.resolve_profile(&Config::default()),
            Err(AppError::Other(_))
        ));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}
