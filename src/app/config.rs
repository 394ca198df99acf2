//! Configuration loading for a run.

use std::path::{Path, PathBuf};

use crate::domain::config::{CONFIG_FILE, parse_config_content};
use crate::domain::{AppError, GeneratorConfig};
use crate::ports::FileStore;

/// Root directories given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub templates: Option<PathBuf>,
    pub overrides: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Load `jobconf.toml` and merge in command-line and environment values.
///
/// An explicit `config_path` must exist. Without one, `<cwd>/jobconf.toml` is
/// used when present and built-in defaults otherwise. Relative roots in the
/// file resolve against the file's directory; relative roots given on the
/// command line resolve against `cwd`.
pub fn load_config<S: FileStore>(
    store: &S,
    cwd: &Path,
    config_path: Option<&Path>,
    paths: &PathOverrides,
    write_env: Option<String>,
) -> Result<GeneratorConfig, AppError> {
    let (mut config, base) = match config_path {
        Some(path) => {
            let path = cwd.join(path);
            let content = store.read_file(&path).map_err(|err| {
                if err.is_not_found() {
                    AppError::InvalidConfig(format!("config file not found: {}", path.display()))
                } else {
                    err
                }
            })?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
            (parse_config_content(&content)?, base)
        }
        None => match store.read_optional(&cwd.join(CONFIG_FILE))? {
            Some(content) => (parse_config_content(&content)?, cwd.to_path_buf()),
            None => (GeneratorConfig::default(), cwd.to_path_buf()),
        },
    };

    config.paths.resolve_against(&base);
    if let Some(templates) = &paths.templates {
        config.paths.templates = cwd.join(templates);
    }
    if let Some(overrides) = &paths.overrides {
        config.paths.overrides = cwd.join(overrides);
    }
    if let Some(output) = &paths.output {
        config.paths.output = cwd.join(output);
    }

    config.apply_write_env(write_env);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryFilesystem;

    #[test]
    fn defaults_resolve_against_cwd() {
        let store = MemoryFilesystem::new();
        let config =
            load_config(&store, Path::new("/work"), None, &PathOverrides::default(), None).unwrap();
        assert_eq!(config.paths.templates, PathBuf::from("/work/config-templates"));
        assert_eq!(config.paths.output, PathBuf::from("/work/configs"));
        assert_eq!(config.render.write_env, None);
    }

    #[test]
    fn explicit_file_anchors_its_own_paths() {
        let store = MemoryFilesystem::new()
            .with_file("/etc/jobs/custom.toml", "[paths]\noutput = \"rendered\"\n");
        let paths = PathOverrides { templates: Some(PathBuf::from("tpl")), ..Default::default() };
        let config = load_config(
            &store,
            Path::new("/work"),
            Some(Path::new("/etc/jobs/custom.toml")),
            &paths,
            Some("sandbox".to_string()),
        )
        .unwrap();

        assert_eq!(config.paths.output, PathBuf::from("/etc/jobs/rendered"));
        assert_eq!(config.paths.overrides, PathBuf::from("/etc/jobs/config-overrides"));
        assert_eq!(config.paths.templates, PathBuf::from("/work/tpl"));
        assert_eq!(config.render.write_env.as_deref(), Some("sandbox"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let store = MemoryFilesystem::new();
        let result = load_config(
            &store,
            Path::new("/work"),
            Some(Path::new("nope.toml")),
            &PathOverrides::default(),
            None,
        );
        assert!(matches!(
            result,
            Err(AppError::InvalidConfig(msg)) if msg.contains("/work/nope.toml")
        ));
    }

    #[test]
    fn cwd_config_file_is_picked_up() {
        let store = MemoryFilesystem::new()
            .with_file("/work/jobconf.toml", "[run]\nfail_on_job_errors = true\n");
        let config =
            load_config(&store, Path::new("/work"), None, &PathOverrides::default(), None).unwrap();
        assert!(config.run.fail_on_job_errors);
    }
}
