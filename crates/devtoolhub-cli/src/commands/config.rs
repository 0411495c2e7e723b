use std::env;

use devtoolhub_core::config::{CONVERT_API_URL_ENV, SUPABASE_ANON_KEY_ENV, SUPABASE_URL_ENV};
use devtoolhub_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            convert_api_url,
            no_activate,
        } => run_config_init(
            global_profile,
            ProfileValues {
                supabase_url,
                supabase_anon_key,
                convert_api_url,
            },
            no_activate,
        ),
    }
}

/// Values passed on the command line; unset ones fall back to the environment.
#[derive(Debug, Default)]
pub struct ProfileValues {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub convert_api_url: Option<String>,
}

pub fn run_config_init(
    profile_name: Option<&str>,
    values: ProfileValues,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let path = crate::config_profiles::default_config_path().map_err(CliError::Config)?;

    apply_profile_values(&mut config, &profile_name, values, no_activate)?;
    config.save_to_path(&path).map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let profile = config
        .profile(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    let missing_fields = missing_sync_fields(profile);
    if missing_fields.is_empty() {
        println!(
            "Cloud sync profile '{profile_name}' is ready. Run `devtoolhub auth login --email <email> --password <password>`."
        );
    } else {
        println!(
            "Profile '{}' is missing: {} (cloud sync stays disabled)",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

/// Merge explicit values, then environment values, over the existing profile.
pub fn apply_profile_values(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    values: ProfileValues,
    no_activate: bool,
) -> Result<(), CliError> {
    let from_env = |name: &str| normalize_text_option(env::var(name).ok());
    let supabase_url = normalize_text_option(values.supabase_url).or_else(|| from_env(SUPABASE_URL_ENV));
    let supabase_anon_key =
        normalize_text_option(values.supabase_anon_key).or_else(|| from_env(SUPABASE_ANON_KEY_ENV));
    let convert_api_url =
        normalize_text_option(values.convert_api_url).or_else(|| from_env(CONVERT_API_URL_ENV));

    let mut profile = config.profile(profile_name).cloned().unwrap_or_default();
    if let Some(value) = supabase_url {
        profile.supabase_url = Some(value.trim_end_matches('/').to_string());
    }
    if let Some(value) = supabase_anon_key {
        profile.supabase_anon_key = Some(value);
    }
    if let Some(value) = convert_api_url {
        profile.convert_api_url = Some(value.trim_end_matches('/').to_string());
    }

    validate_profile(&profile)?;
    *config.profile_mut_or_default(profile_name) = profile;
    if !no_activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn missing_sync_fields(profile: &CliProfile) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if profile.supabase_url().is_none() {
        missing.push("supabase_url");
    }
    if profile.supabase_anon_key().is_none() {
        missing.push("supabase_anon_key");
    }
    missing
}

fn validate_profile(profile: &CliProfile) -> Result<(), CliError> {
    devtoolhub_core::config::BootstrapConfig {
        supabase_url: profile.supabase_url.clone(),
        supabase_anon_key: profile.supabase_anon_key.clone(),
        convert_api_url: profile.convert_api_url.clone(),
    }
    .validate()
    .map_err(CliError::Config)
}
