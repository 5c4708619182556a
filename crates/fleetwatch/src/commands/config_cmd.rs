//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input};

use fleetwatch_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { name } => init(&name, global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, render_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg
                .default_profile
                .as_deref()
                .unwrap_or(config::DEFAULT_PROFILE);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fleetwatch config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

// ── Init ────────────────────────────────────────────────────────────

/// Write a profile. Prompts when attached to a terminal; otherwise takes
/// the URLs from `--api-url` / `--ws-url` or the hosted defaults.
fn init(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();
    let mut cfg = config::load_config_or_default();
    let base = cfg.profiles.get(name).cloned().unwrap_or_default();

    let seeded = Profile {
        api_url: global.api_url.clone().unwrap_or(base.api_url),
        ws_url: global.ws_url.clone().unwrap_or(base.ws_url),
        timeout: global.timeout.or(base.timeout),
        push: base.push,
    };

    let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
    let profile = if interactive {
        eprintln!("fleetwatch configuration");
        eprintln!("   Config path: {}\n", path.display());
        prompt_profile(seeded)?
    } else {
        seeded
    };

    // Reject bad URLs before anything touches disk.
    config::profile_to_fleet_config(&profile, &cfg.defaults)?;

    cfg.profiles.insert(name.to_owned(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(name.to_owned());
    }
    let written = config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("✓ Configuration written to {}", written.display());
        eprintln!("  Profile: {name}");
        eprintln!("\n  Test it: fleetwatch stats --profile {name}");
    }
    Ok(())
}

fn prompt_profile(seed: Profile) -> Result<Profile, CliError> {
    let api_url: String = Input::new()
        .with_prompt("REST API URL")
        .default(seed.api_url)
        .interact_text()
        .map_err(prompt_err)?;

    let ws_url: String = Input::new()
        .with_prompt("Push channel URL")
        .default(seed.ws_url)
        .interact_text()
        .map_err(prompt_err)?;

    let push = Confirm::new()
        .with_prompt("Open the push channel in live views?")
        .default(seed.push.unwrap_or(true))
        .interact()
        .map_err(prompt_err)?;

    Ok(Profile {
        api_url,
        ws_url,
        timeout: seed.timeout,
        push: Some(push),
    })
}

// ── Show ────────────────────────────────────────────────────────────

fn render_config(cfg: &Config) -> String {
    let default = cfg
        .default_profile
        .as_deref()
        .unwrap_or(config::DEFAULT_PROFILE);
    let mut lines = vec![
        format!("Config file:      {}", config::config_path().display()),
        format!("Default profile:  {default}"),
        format!("Output:           {}", cfg.defaults.output),
        format!("Color:            {}", cfg.defaults.color),
        format!("Timeout:          {}s", cfg.defaults.timeout),
        format!("Refresh interval: {}s", cfg.defaults.refresh_interval),
    ];

    if cfg.profiles.is_empty() {
        lines.push(String::new());
        lines.push("No profiles configured; using the hosted service.".into());
    }
    for (name, profile) in &cfg.profiles {
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  api_url: {}", profile.api_url));
        lines.push(format!("  ws_url:  {}", profile.ws_url));
        if let Some(t) = profile.timeout {
            lines.push(format!("  timeout: {t}s"));
        }
        if let Some(push) = profile.push {
            lines.push(format!("  push:    {push}"));
        }
    }
    lines.join("\n")
}
