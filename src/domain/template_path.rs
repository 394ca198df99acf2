use crate::domain::AppError;

/// Location of a template within the template root.
///
/// `groupA/job1/config.yml.j2` maps to group `groupA`, job `job1`, and
/// output filename `config.yml`. Jobs may be nested (`groupA/a/b/x.yml.j2`
/// gives job `a/b`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplatePath {
    name: String,
    group: String,
    job: String,
    filename: String,
}

impl TemplatePath {
    /// Parse a `/`-separated relative path ending in `suffix`.
    pub fn parse(name: &str, suffix: &str) -> Result<Self, AppError> {
        let layout_error = || AppError::TemplateLayout(name.to_string());

        let stem = name.strip_suffix(suffix).ok_or_else(layout_error)?;
        let segments: Vec<&str> = stem.split('/').collect();
        if segments.len() < 3 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(layout_error());
        }

        let group = segments[0];
        let filename = segments[segments.len() - 1];
        let job = segments[1..segments.len() - 1].join("/");

        Ok(Self {
            name: name.to_string(),
            group: group.to_string(),
            job,
            filename: filename.to_string(),
        })
    }

    /// Engine lookup key (the relative path including suffix).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}
