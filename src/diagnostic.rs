use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Some fields were recovered but the case body holds constructs no idiom
    /// understands; the raw text needs a human look.
    Review,
    /// A field could not be recovered (unknown expression, missing function).
    Warning,
}

impl Severity {
    pub fn letter(&self) -> char {
        match self {
            Severity::Review => 'R',
            Severity::Warning => 'W',
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the C function being extracted.
    pub function: String,
    /// 1-indexed line of the first case label involved, if any.
    pub line: Option<usize>,
    /// Sprite identifiers of the case group the problem belongs to.
    pub ids: Vec<u32>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(function: &str, message: impl Into<String>) -> Self {
        Self {
            function: function.to_string(),
            line: None,
            ids: Vec::new(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn review(function: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Review,
            ..Self::warning(function, message)
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn for_ids(mut self, ids: &[u32]) -> Self {
        self.ids = ids.to_vec();
        self
    }

    pub fn sort_key(&self) -> (usize, &str) {
        (self.line.unwrap_or(0), &self.function)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": {}:", self.severity)?;
        if !self.ids.is_empty() {
            let ids: Vec<String> = self.ids.iter().map(|id| id.to_string()).collect();
            write!(f, " case {}:", ids.join(", "))?;
        }
        write!(f, " {}", self.message)
    }
}
