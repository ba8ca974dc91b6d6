use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::matrix::{FileMatrixSource, GeneratedMatrixSource, MatrixSource};
use crate::parallel::ExecutionBackend;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "DETSCALE_";
const ORDER_PLACEHOLDER: &str = "{n}";

/// Merged configuration for every detscale command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetscaleConfig {
    pub data: DataConfig,
    pub scaling: ScalingConfig,
    pub parallel: ParallelConfig,
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Matrix file path with `{n}` standing for the order
    pub matrix_path_template: String,
    pub results_dir: PathBuf,
}

/// Scaling experiment parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub strong_order: usize,
    /// 0 means "the matrix order"
    pub max_workers: usize,
    pub weak_orders: Vec<usize>,
    pub matrix_source: MatrixSourceKind,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    pub backend: ExecutionBackend,
}

/// Where experiment matrices come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatrixSourceKind {
    /// Seeded pseudo-random matrices
    #[default]
    Generated,
    /// Files found through `data.matrix_path_template`
    Files,
}

impl DetscaleConfig {
    /// Load defaults, config files and environment, then validate
    ///
    /// With `custom_config` only that file is read on top of the defaults; otherwise the
    /// user config and the working-directory `detscale.*` files are merged in that order.
    /// Environment variables always win.
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let config: Self = Self::figment(custom_config)
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded defaults alone
    pub fn defaults() -> Result<Self> {
        Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .context("Embedded default configuration is invalid")
    }

    pub fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            tracing::debug!("Using custom config file: {}", custom_path);
            figment = figment
                .merge(Toml::file(custom_path))
                .merge(Json::file(custom_path))
                .merge(Yaml::file(custom_path));
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user_config))
                .merge(Toml::file("detscale.toml"))
                .merge(Json::file("detscale.json"))
                .merge(Yaml::file("detscale.yaml"))
                .merge(Yaml::file("detscale.yml"));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.scaling.strong_order == 0 {
            bail!("scaling.strong_order must be at least 1");
        }
        if self.scaling.weak_orders.is_empty() {
            bail!("scaling.weak_orders must list at least one matrix order");
        }
        if self.scaling.weak_orders.contains(&0) {
            bail!("scaling.weak_orders must not contain 0");
        }
        if !self.data.matrix_path_template.contains(ORDER_PLACEHOLDER) {
            bail!(
                "data.matrix_path_template '{}' must contain {}",
                self.data.matrix_path_template,
                ORDER_PLACEHOLDER
            );
        }
        Ok(())
    }

    /// Largest strong scaling worker count for a matrix of `order`
    pub fn max_workers_for(&self, order: usize) -> usize {
        match self.scaling.max_workers {
            0 => order,
            workers => workers,
        }
    }

    /// Matrix source for experiments, `kind` overriding `scaling.matrix_source`
    pub fn matrix_source(&self, kind: Option<MatrixSourceKind>) -> Box<dyn MatrixSource> {
        match kind.unwrap_or(self.scaling.matrix_source) {
            MatrixSourceKind::Generated => Box::new(GeneratedMatrixSource::new(self.scaling.seed)),
            MatrixSourceKind::Files => {
                Box::new(FileMatrixSource::new(self.data.matrix_path_template.clone()))
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/detscale/config.toml"),
            Err(_) => "~/.config/detscale/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = DetscaleConfig::defaults().unwrap();

        assert_eq!(config.data.matrix_path_template, "test_data/matrica{n}x{n}.txt");
        assert_eq!(config.data.results_dir, PathBuf::from("results"));
        assert_eq!(config.scaling.strong_order, 10);
        assert_eq!(config.scaling.max_workers, 0);
        assert_eq!(config.scaling.weak_orders, vec![3, 5, 8, 9, 10, 11]);
        assert_eq!(config.scaling.matrix_source, MatrixSourceKind::Generated);
        assert_eq!(config.scaling.seed, 42);
        assert_eq!(config.parallel.backend, ExecutionBackend::ScopedThreads);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_repo_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "detscale.toml",
                r#"
                [scaling]
                strong_order = 6
                weak_orders = [2, 4]

                [parallel]
                backend = "pool"
                "#,
            )?;
            jail.set_env("DETSCALE_SCALING__SEED", "7");

            let config = DetscaleConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.scaling.strong_order, 6);
            assert_eq!(config.scaling.weak_orders, vec![2, 4]);
            assert_eq!(config.scaling.seed, 7);
            assert_eq!(config.parallel.backend, ExecutionBackend::ThreadPool);
            // Untouched keys keep their defaults
            assert_eq!(config.data.results_dir, PathBuf::from("results"));
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_replaces_repo_file() {
        Jail::expect_with(|jail| {
            jail.create_file("detscale.toml", "[scaling]\nstrong_order = 6\n")?;
            jail.create_file("custom.json", r#"{ "scaling": { "matrix_source": "files" } }"#)?;

            let config = DetscaleConfig::load(Some("custom.json")).map_err(|e| e.to_string())?;
            assert_eq!(config.scaling.strong_order, 10);
            assert_eq!(config.scaling.matrix_source, MatrixSourceKind::Files);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("detscale.toml", "[scaling]\nweak_orders = []\n")?;
            assert!(DetscaleConfig::load(None).is_err());
            Ok(())
        });

        let mut config = DetscaleConfig::defaults().unwrap();
        config.data.matrix_path_template = "matrix.txt".to_string();
        assert!(config.validate().is_err());

        let mut config = DetscaleConfig::defaults().unwrap();
        config.scaling.weak_orders = vec![3, 0];
        assert!(config.validate().is_err());

        let mut config = DetscaleConfig::defaults().unwrap();
        config.scaling.strong_order = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_workers_for() {
        let mut config = DetscaleConfig::defaults().unwrap();
        assert_eq!(config.max_workers_for(9), 9);
        config.scaling.max_workers = 4;
        assert_eq!(config.max_workers_for(9), 4);
    }

    #[test]
    fn test_generated_source_uses_seed() {
        let config = DetscaleConfig::defaults().unwrap();
        let source = config.matrix_source(None);
        let expected = GeneratedMatrixSource::new(42).matrix_of_order(4).unwrap();
        assert_eq!(source.matrix_of_order(4).unwrap(), expected);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DetscaleConfig::defaults().unwrap();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("backend = \"threads\""));
        assert!(rendered.contains("matrix_source = \"generated\""));

        let parsed: DetscaleConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
