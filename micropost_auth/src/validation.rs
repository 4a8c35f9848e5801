use std::fmt;

/// Human-readable attribute errors collected while validating a form,
/// e.g. "Name can't be blank".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `Ok(())` when nothing was collected, the errors otherwise.
    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join(", "))
    }
}

pub(crate) fn check_presence(errors: &mut ValidationErrors, attribute: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(format!("{attribute} can't be blank"));
        false
    } else {
        true
    }
}

pub(crate) fn check_max_length(
    errors: &mut ValidationErrors,
    attribute: &str,
    value: &str,
    max: usize,
) {
    if value.chars().count() > max {
        errors.add(format!(
            "{attribute} is too long (maximum is {max} characters)"
        ));
    }
}
