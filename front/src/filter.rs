use std::{fmt, str::FromStr};

use taskify_api::v1::{Priority, Task, TaskStatus};

/// The lists shown in the sidebar. A task's section is a plain label, so
/// `Today` and `Completed` say nothing about due date or status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Today,
    Inbox,
    Upcoming,
    Completed,
    Projects,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Today,
        Section::Inbox,
        Section::Upcoming,
        Section::Completed,
        Section::Projects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Today => "Today",
            Section::Inbox => "Inbox",
            Section::Upcoming => "Upcoming",
            Section::Completed => "Completed",
            Section::Projects => "Projects",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSection(String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section `{}`", self.0)
    }
}

impl std::error::Error for UnknownSection {}

/// What the list view shows. `None` for status or priority means "all".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub section: Section,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        task.section == self.section.as_str()
            && self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// The counters above the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |counts, task| Self {
            total: counts.total + 1,
            completed: counts.completed + usize::from(task.status == TaskStatus::Completed),
        })
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Tasks • {} Completed", self.total, self.completed)
    }
}
