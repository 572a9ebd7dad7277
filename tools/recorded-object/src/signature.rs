use serde::{Deserialize, Serialize};

/// Parameter shape of one target operation, receiver excluded.
///
/// Defaults always belong to the trailing `num_defaults` named parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<String>,
    num_defaults: usize,
    varargs: bool,
    varkw: bool,
}

impl Signature {
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            num_defaults: 0,
            varargs: false,
            varkw: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn with_defaults(mut self, num_defaults: usize) -> Self {
        self.num_defaults = num_defaults;
        self
    }

    pub fn with_varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    pub fn with_varkw(mut self) -> Self {
        self.varkw = true;
        self
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn num_named(&self) -> usize {
        self.params.len()
    }

    pub fn num_defaults(&self) -> usize {
        self.num_defaults
    }

    pub fn accepts_varargs(&self) -> bool {
        self.varargs
    }

    pub fn accepts_varkw(&self) -> bool {
        self.varkw
    }

    /// Named parameters that must be supplied by the caller.
    pub fn num_required(&self) -> usize {
        self.params.len().saturating_sub(self.num_defaults)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|param| param == name)
    }

    /// No defaults and no extra positionals: only one argument count binds.
    pub fn is_exact(&self) -> bool {
        self.num_defaults == 0 && !self.varargs
    }

    pub fn is_consistent(&self) -> bool {
        self.num_defaults <= self.params.len()
    }
}
