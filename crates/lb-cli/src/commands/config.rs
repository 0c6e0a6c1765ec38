use lb_core::config::Config;

/// Run the `config` subcommand: print the effective configuration.
pub fn run(config: &Config) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    if config.api.token().is_none() {
        eprintln!("# no token found in ${}", config.api.token_env);
    }
    Ok(())
}
