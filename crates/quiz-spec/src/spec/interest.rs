use std::fmt;

/// Top-level branch picked at step 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interest {
    /// The training-course branch.
    Course,
    /// A studio service, keyed by its category name.
    Service(String),
}

impl Interest {
    pub fn is_course(&self) -> bool {
        matches!(self, Interest::Course)
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Interest::Course => None,
            Interest::Service(category) => Some(category),
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interest::Course => f.write_str("course"),
            Interest::Service(category) => write!(f, "service '{}'", category),
        }
    }
}

/// Step-2 answer for service categories: has the client had the procedure before?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceHistory {
    Returning,
    FirstTime,
    Unsure,
}

impl ServiceHistory {
    pub const ALL: [ServiceHistory; 3] = [
        ServiceHistory::Returning,
        ServiceHistory::FirstTime,
        ServiceHistory::Unsure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceHistory::Returning => "Yes",
            ServiceHistory::FirstTime => "No",
            ServiceHistory::Unsure => "Not sure",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|history| history.label() == label)
    }

    pub fn labels() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|history| history.label().to_string())
            .collect()
    }
}
