use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Environment-backed configuration. Variables carry the `APP` prefix with
/// `__` separating nested fields, e.g. `APP_DATABASE__URL`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        // A .env next to Cargo.toml wins over one in the working directory.
        let crate_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        if dotenvy::from_filename(&crate_env).is_err() {
            let _ = dotenvy::dotenv();
        }

        let source = config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true);

        let cfg: Self = config_rs::Config::builder()
            .add_source(source)
            .build()
            .context("reading environment for config")?
            .try_deserialize()
            .context("deserializing environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
