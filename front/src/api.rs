use taskify_api::v1::{NewTask, Task, TaskId, TaskPatch};

/// Typed client for the task store service.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tasks(&self) -> eyre::Result<Vec<Task>> {
        let response = self
            .client
            .get(format!("{}/tasks", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    pub async fn create_task(&self, task: &NewTask) -> eyre::Result<Task> {
        let response = self
            .client
            .post(format!("{}/tasks", self.base_url))
            .json(task)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> eyre::Result<()> {
        self.client
            .put(format!("{}/tasks/{}", self.base_url, id))
            .json(patch)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn delete_task(&self, id: &TaskId) -> eyre::Result<()> {
        self.client
            .delete(format!("{}/tasks/{}", self.base_url, id))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
