use chrono::{NaiveDate, Utc};
use taskify_api::v1::{self, Priority, Task, TaskId};
use tracing::{debug, info, warn};

use crate::{
    cache::TaskCache,
    filter::{Counts, Filter},
};

/// Contents of the "new task" inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
}

/// The one task whose title is being edited, with the text typed so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Editing {
    pub id: TaskId,
    pub text: String,
}

/// The client's working copy of the task list.
///
/// Every mutation is applied locally first and then written through to the
/// cache. A failed write is returned, but the local change stays.
#[derive(Debug)]
pub struct Board<C> {
    tasks: Vec<Task>,
    cache: C,
    editing: Option<Editing>,
    pub filter: Filter,
    pub draft: Draft,
}

impl<C: TaskCache> Board<C> {
    /// Seeds the board from `cache`. An unreadable cache gives an empty board.
    pub fn open(cache: C) -> Self {
        let tasks = cache.load().unwrap_or_else(|err| {
            warn!("discarding unreadable task cache: {err}");
            Vec::new()
        });

        Self {
            tasks,
            cache,
            editing: None,
            filter: Filter::default(),
            draft: Draft::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    /// Tasks passing the current filter, in list order.
    pub fn visible(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    pub fn counts(&self) -> Counts {
        Counts::of(self.visible())
    }

    /// Turns the draft into a task in the active section. Does nothing when
    /// the draft title is blank.
    pub fn add_task(&mut self) -> eyre::Result<Option<TaskId>> {
        if self.draft.title.trim().is_empty() {
            return Ok(None);
        }

        let draft = std::mem::take(&mut self.draft);
        let task = Task {
            id: self.next_id(),
            title: draft.title,
            status: Default::default(),
            section: self.filter.section.to_string(),
            due: draft.due.unwrap_or_else(v1::today),
            priority: draft.priority,
        };
        let id = task.id.clone();

        info!(id = %id, title = %task.title, section = %task.section, "added task");

        self.tasks.push(task);
        self.save()?;

        Ok(Some(id))
    }

    /// Flips a task between pending and completed. Returns whether a task
    /// matched.
    pub fn toggle_status(&mut self, id: &TaskId) -> eyre::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return Ok(false);
        };

        task.status = task.status.toggled();
        info!(id = %id, status = %task.status, "toggled task");

        self.save()?;
        Ok(true)
    }

    /// Returns whether a task matched.
    pub fn delete_task(&mut self, id: &TaskId) -> eyre::Result<bool> {
        let Some(index) = self.tasks.iter().position(|task| &task.id == id) else {
            return Ok(false);
        };

        self.tasks.remove(index);
        if self.editing.as_ref().is_some_and(|editing| &editing.id == id) {
            self.editing = None;
        }

        info!(id = %id, "deleted task");

        self.save()?;
        Ok(true)
    }

    /// Enters edit mode for `id`, seeding the edit text with its title. Any
    /// other edit in progress is dropped.
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.task(id) else {
            return false;
        };

        self.editing = Some(Editing {
            id: task.id.clone(),
            text: task.title.clone(),
        });

        true
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(editing) = &mut self.editing {
            editing.text = text.into();
        }
    }

    /// Writes the edit text as the task's title and leaves edit mode.
    pub fn commit_edit(&mut self) -> eyre::Result<()> {
        let Some(Editing { id, text }) = self.editing.take() else {
            return Ok(());
        };

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id = %id, "edited task no longer exists");
            return Ok(());
        };

        task.title = text;
        info!(id = %id, title = %task.title, "renamed task");

        self.save()
    }

    fn save(&mut self) -> eyre::Result<()> {
        self.cache.save(&self.tasks)
    }

    // millisecond timestamp, bumped past any id already taken
    fn next_id(&self) -> TaskId {
        let mut millis = Utc::now().timestamp_millis();

        loop {
            let id = TaskId::from_millis(millis);
            if self.task(&id).is_none() {
                return id;
            }

            millis += 1;
        }
    }
}
