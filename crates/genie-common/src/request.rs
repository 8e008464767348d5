use thiserror::Error;

/// What the caller wants generated for a repository.
///
/// The wire form is a short string:
/// - `README` (any casing) → [`OutputSpec::Readme`]
/// - `B` followed by digits, e.g. `B5` → [`OutputSpec::Bullets`]
/// - anything else → [`OutputSpec::Custom`], used verbatim as the instruction
///
/// Surrounding whitespace is ignored when recognizing the first two forms
/// but kept in custom text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    Readme,
    Bullets(u32),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputSpecError {
    #[error("Output type cannot be empty")]
    Empty,

    #[error("Bullet count must be a positive integer, got '{0}'")]
    InvalidBulletCount(String),
}

impl OutputSpec {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OutputSpec::Readme => "readme",
            OutputSpec::Bullets(_) => "bullets",
            OutputSpec::Custom(_) => "custom",
        }
    }
}

impl std::str::FromStr for OutputSpec {
    type Err = OutputSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(OutputSpecError::Empty);
        }

        if trimmed.eq_ignore_ascii_case("readme") {
            return Ok(OutputSpec::Readme);
        }

        if let Some(digits) = trimmed.strip_prefix('B')
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            return match digits.parse::<u32>() {
                Ok(count) if count > 0 => Ok(OutputSpec::Bullets(count)),
                _ => Err(OutputSpecError::InvalidBulletCount(digits.to_string())),
            };
        }

        Ok(OutputSpec::Custom(s.to_string()))
    }
}

impl std::fmt::Display for OutputSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputSpec::Readme => write!(f, "README"),
            OutputSpec::Bullets(count) => write!(f, "B{}", count),
            OutputSpec::Custom(text) => write!(f, "{}", text),
        }
    }
}

/// A single generation request: which repository, and what to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub user: String,
    pub repository: String,
    pub output: OutputSpec,
}

impl GenerationRequest {
    pub fn new(user: impl Into<String>, repository: impl Into<String>, output: OutputSpec) -> Self {
        Self {
            user: user.into(),
            repository: repository.into(),
            output,
        }
    }
}
