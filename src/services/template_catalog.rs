//! Template discovery and rendering.
//!
//! Every file under the template root ending in the configured suffix is
//! compiled once into a shared environment, keyed by its `/`-separated path
//! relative to the root. Strict undefined handling is always on.
//!
//! Top-level lookups go through [`TrackedContext`], which records each name
//! the engine asks for. When rendering fails on an undefined value, the last
//! recorded lookup names the missing variable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use minijinja::value::{Object, from_args};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, State, UndefinedBehavior, Value};
use tracing::debug;

use crate::domain::{AppError, RenderContext, TemplatePath};
use crate::ports::FileStore;

const DATE_TIME_GLOBAL: &str = "date_time";
const VERSION_DATE_FORMAT_GLOBAL: &str = "audience_version_date_format";
const VERSION_DATE_FORMAT: &str = "%Y%m%d";

/// Names resolvable without a context entry: our globals plus engine builtins.
const NON_CONTEXT_NAMES: &[&str] = &[
    DATE_TIME_GLOBAL,
    VERSION_DATE_FORMAT_GLOBAL,
    "range",
    "dict",
    "namespace",
    "debug",
    "lipsum",
    "cycler",
    "joiner",
    "loop",
    "self",
];

/// Why a render failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    /// A top-level variable the template needs is absent from the context.
    Undefined { name: String },
    /// Any other engine failure, with the engine's message.
    Engine(String),
}

/// One top-level name lookup made while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lookup {
    name: String,
    found: bool,
}

/// Render context that records every top-level lookup, in order.
#[derive(Debug)]
struct TrackedContext {
    values: Value,
    lookups: Arc<Mutex<Vec<Lookup>>>,
}

impl Object for TrackedContext {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str()?;
        let value = self.values.get_attr(name).ok().filter(|value| !value.is_undefined());
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Lookup { name: name.to_string(), found: value.is_some() });
        value
    }
}

/// Leaves `date_time` unresolved so the consumer of the artifact can fill it in.
#[derive(Debug)]
struct DateTimePlaceholder;

impl Object for DateTimePlaceholder {
    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match method {
            "strftime" => {
                let (format,): (&str,) = from_args(args)?;
                Ok(Value::from(format!("{{{{ date_time.strftime('{}') }}}}", format)))
            }
            _ => Err(Error::from(ErrorKind::UnknownMethod)),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{{ date_time }}")
    }
}

/// All templates found under one root.
pub struct TemplateCatalog {
    env: Environment<'static>,
    templates: BTreeMap<String, TemplatePath>,
}

impl fmt::Debug for TemplateCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCatalog").field("templates", &self.templates).finish()
    }
}

impl TemplateCatalog {
    /// Walk `root` and compile every template ending in `suffix`.
    pub fn discover<S: FileStore>(
        store: &S,
        root: &Path,
        suffix: &str,
    ) -> Result<Self, AppError> {
        if !store.is_dir(root) {
            return Err(AppError::TemplateRootMissing(root.to_path_buf()));
        }

        let mut sources = Vec::new();
        collect_templates(store, root, "", suffix, &mut sources)?;

        let mut env = new_environment();
        let mut templates = BTreeMap::new();
        for (name, source) in sources {
            let path = TemplatePath::parse(&name, suffix)?;
            env.add_template_owned(name.clone(), source).map_err(|e| {
                AppError::TemplateCompile { name: name.clone(), details: e.to_string() }
            })?;
            debug!(template = %name, group = path.group(), job = path.job(), "registered template");
            templates.insert(name, path);
        }

        Ok(Self { env, templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TemplatePath> {
        self.templates.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplatePath> {
        self.templates.values()
    }

    /// Templates whose first path segment is `group`, in path order.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a TemplatePath> {
        self.templates.values().filter(move |t| t.group() == group)
    }

    pub fn groups(&self) -> BTreeSet<&str> {
        self.templates.values().map(TemplatePath::group).collect()
    }

    /// Render one template against a context.
    pub fn render(
        &self,
        template: &TemplatePath,
        context: &RenderContext,
    ) -> Result<String, RenderFailure> {
        let compiled = self
            .env
            .get_template(template.name())
            .map_err(|e| RenderFailure::Engine(e.to_string()))?;

        let lookups = Arc::new(Mutex::new(Vec::new()));
        let tracked =
            TrackedContext { values: context.to_template_value(), lookups: Arc::clone(&lookups) };

        match compiled.render(Value::from_object(tracked)) {
            Ok(rendered) => Ok(rendered),
            Err(err) if err.kind() == ErrorKind::UndefinedError => {
                let lookups = lookups.lock().unwrap_or_else(PoisonError::into_inner);
                match failed_lookup(&lookups) {
                    Some(name) => Err(RenderFailure::Undefined { name }),
                    None => Err(RenderFailure::Engine(err.to_string())),
                }
            }
            Err(err) => Err(RenderFailure::Engine(err.to_string())),
        }
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_global(DATE_TIME_GLOBAL, Value::from_object(DateTimePlaceholder));
    env.add_global(VERSION_DATE_FORMAT_GLOBAL, VERSION_DATE_FORMAT);
    env
}

fn collect_templates<S: FileStore>(
    store: &S,
    dir: &Path,
    prefix: &str,
    suffix: &str,
    sources: &mut Vec<(String, String)>,
) -> Result<(), AppError> {
    for entry in store.list_dir(dir)? {
        // Lookup keys always use '/', whatever the host separator.
        let name = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };
        if entry.is_dir() {
            collect_templates(store, &entry.path, &name, suffix, sources)?;
        } else if entry.name.ends_with(suffix) {
            let content = store.read_file(&entry.path)?;
            sources.push((name, content));
        }
    }
    Ok(())
}

/// The missing variable, when the engine's last top-level lookup was a miss
/// for a name the context is expected to provide. A failure that follows a
/// successful lookup (an undefined attribute) names nothing.
fn failed_lookup(lookups: &[Lookup]) -> Option<String> {
    lookups
        .last()
        .filter(|lookup| !lookup.found && !NON_CONTEXT_NAMES.contains(&lookup.name.as_str()))
        .map(|lookup| lookup.name.clone())
}
