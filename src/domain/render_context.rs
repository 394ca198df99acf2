//! Render context: an override record plus injected defaults.

use serde_yaml::{Mapping, Value};

use crate::domain::EnvironmentPath;

pub const ENVIRONMENT_KEY: &str = "environment";
pub const EXPERIMENT_NAME_KEY: &str = "experimentName";
pub const DATA_NAMESPACE_KEY: &str = "data_namespace";
pub const WRITE_ENV_KEY: &str = "write_env";

/// Fully merged mapping fed into a template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderContext {
    values: Mapping,
}

impl RenderContext {
    /// Merge defaults into `record`. Explicit values in `record` always win,
    /// except `experimentName`, which is removed for kinds without experiments.
    ///
    /// `write_env` is the configured write-environment tag; the env kind is
    /// used when none is configured.
    pub fn build(record: Mapping, env_path: &EnvironmentPath, write_env: Option<&str>) -> Self {
        let mut values = record;
        let kind = env_path.kind().dir_name();

        set_if_absent(&mut values, ENVIRONMENT_KEY, kind);

        match env_path.experiment() {
            Some(experiment) if env_path.kind().requires_experiment() => {
                set_if_absent(&mut values, EXPERIMENT_NAME_KEY, experiment);
            }
            _ => {
                values.shift_remove(EXPERIMENT_NAME_KEY);
            }
        }

        set_if_absent(&mut values, DATA_NAMESPACE_KEY, &env_path.data_namespace());
        set_if_absent(&mut values, WRITE_ENV_KEY, write_env.unwrap_or(kind));

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.values
    }

    /// Convert into the templating engine's value type.
    pub fn to_template_value(&self) -> minijinja::Value {
        minijinja::Value::from_serialize(&self.values)
    }
}

fn set_if_absent(values: &mut Mapping, key: &str, default: &str) {
    if !values.contains_key(key) {
        values.insert(Value::from(key), Value::from(default));
    }
}
