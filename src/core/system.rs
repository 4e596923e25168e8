use std::fmt;

/// One independently deployed part of the application.
///
/// `name` is what the user asked for (`studio`), `dir` is the directory
/// the system lives in (`cms`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    pub name: String,
    pub dir: String,
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.dir {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.dir)
        }
    }
}
