use std::fmt;

/// Deployment environment kinds. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvKind {
    /// Production: a single target, never qualified by an experiment.
    Prod,
    /// Experiment runs, one target per experiment name.
    Experiment,
    /// Test runs, one target per experiment name.
    Test,
}

impl EnvKind {
    /// All env kinds in declaration order.
    pub const ALL: [EnvKind; 3] = [EnvKind::Prod, EnvKind::Experiment, EnvKind::Test];

    /// Directory name for this kind under the override and output roots.
    pub fn dir_name(&self) -> &'static str {
        match self {
            EnvKind::Prod => "prod",
            EnvKind::Experiment => "experiment",
            EnvKind::Test => "test",
        }
    }

    /// Parse a kind from its directory name.
    pub fn from_dir_name(name: &str) -> Option<EnvKind> {
        match name {
            "prod" => Some(EnvKind::Prod),
            "experiment" => Some(EnvKind::Experiment),
            "test" => Some(EnvKind::Test),
            _ => None,
        }
    }

    /// Whether targets of this kind carry an experiment segment.
    pub fn requires_experiment(&self) -> bool {
        !matches!(self, EnvKind::Prod)
    }

    pub fn names() -> String {
        EnvKind::ALL.iter().map(EnvKind::dir_name).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One deployment target: `<kind>` or `<kind>/<experiment>`.
///
/// Kinds that require an experiment always carry a non-empty one, and
/// `prod` never does. The constructors are the only way to build a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvironmentPath {
    kind: EnvKind,
    experiment: Option<String>,
}

impl EnvironmentPath {
    pub fn prod() -> Self {
        Self { kind: EnvKind::Prod, experiment: None }
    }

    /// Build a path for a kind that requires an experiment.
    ///
    /// Returns `None` for `prod`, for empty names, and for names containing a
    /// path separator.
    pub fn with_experiment(kind: EnvKind, experiment: &str) -> Option<Self> {
        if !kind.requires_experiment() || experiment.is_empty() || experiment.contains('/') {
            return None;
        }
        Some(Self { kind, experiment: Some(experiment.to_string()) })
    }

    /// Parse `prod` or `<kind>/<experiment>`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.split_once('/') {
            None => {
                let kind = EnvKind::from_dir_name(value)?;
                (!kind.requires_experiment()).then(Self::prod)
            }
            Some((kind, experiment)) => {
                Self::with_experiment(EnvKind::from_dir_name(kind)?, experiment)
            }
        }
    }

    pub fn kind(&self) -> EnvKind {
        self.kind
    }

    pub fn experiment(&self) -> Option<&str> {
        self.experiment.as_deref()
    }

    /// Path segments, used to build directory paths.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = vec![self.kind.dir_name()];
        if let Some(experiment) = &self.experiment {
            segments.push(experiment);
        }
        segments
    }

    /// Default data namespace: the path itself.
    pub fn data_namespace(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnvironmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.experiment {
            Some(experiment) => write!(f, "{}/{}", self.kind, experiment),
            None => write!(f, "{}", self.kind),
        }
    }
}
