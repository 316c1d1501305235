//! Subset selection.
//!
//! A request is an ordered list of tokens applied one after another to a
//! working set of subset names:
//!
//! | Token   | Effect                       |
//! |---------|------------------------------|
//! | `all`   | add every registered subset  |
//! | `name`  | add `name`                   |
//! | `!name` | remove `name`                |
//! | `!all`  | clear the working set        |
//!
//! A request made only of negations starts from the full set, so
//! `["!config"]` means "everything except config".

/// One token of a subset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetToken {
    All,
    ExcludeAll,
    Include(String),
    Exclude(String),
}

impl SubsetToken {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.strip_prefix('!') {
            Some("all") => SubsetToken::ExcludeAll,
            Some(name) => SubsetToken::Exclude(name.trim().to_string()),
            None if token == "all" => SubsetToken::All,
            None => SubsetToken::Include(token.to_string()),
        }
    }

    fn is_positive(&self) -> bool {
        matches!(self, SubsetToken::All | SubsetToken::Include(_))
    }
}

/// Ordered tokens naming which subsets to gather.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetRequest {
    tokens: Vec<SubsetToken>,
}

/// Result of resolving a request against the registered names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Selected names, in registry order.
    pub selected: Vec<&'static str>,

    /// Tokens that named no registered subset, as written.
    pub unknown: Vec<String>,
}

impl SubsetRequest {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| SubsetToken::parse(t.as_ref()))
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[SubsetToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Resolve against `valid`. An empty request selects nothing.
    pub fn resolve(&self, valid: &[&'static str]) -> Resolution {
        let seeded = !self.tokens.is_empty() && !self.tokens.iter().any(SubsetToken::is_positive);
        let mut chosen = vec![seeded; valid.len()];
        let mut unknown = Vec::new();

        for token in &self.tokens {
            match token {
                SubsetToken::All => chosen.fill(true),
                SubsetToken::ExcludeAll => chosen.fill(false),
                SubsetToken::Include(name) => match valid.iter().position(|v| v == name) {
                    Some(idx) => chosen[idx] = true,
                    None => unknown.push(name.clone()),
                },
                SubsetToken::Exclude(name) => match valid.iter().position(|v| v == name) {
                    Some(idx) => chosen[idx] = false,
                    None => unknown.push(format!("!{name}")),
                },
            }
        }

        Resolution {
            selected: valid
                .iter()
                .zip(&chosen)
                .filter_map(|(name, on)| on.then_some(*name))
                .collect(),
            unknown,
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for SubsetRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
