mod dto;

use async_trait::async_trait;
use groupbind_application::ProjectGroupApi;
use groupbind_core::{AppError, AppResult};
use groupbind_domain::{NormalizedRoleGrant, ObservedRoleGrant};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use dto::{GroupMembershipResponse, ProjectResponse, RolesRequest};

/// HTTP implementation of the management API port.
pub struct HttpProjectGroupApi {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl HttpProjectGroupApi {
    /// Creates an adapter for the API rooted at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        access_token: impl Into<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid management API base URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "management API base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            access_token: access_token.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal("management API base URL cannot carry a path".to_owned())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn group_endpoint(&self, project_slug: &str, group_slug: &str) -> AppResult<Url> {
        self.endpoint(&["api", "v2", "workspace", project_slug, "groups", group_slug])
    }

    async fn send(
        &self,
        action: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        let response = request
            .bearer_auth(self.access_token.as_str())
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call management API to {action}: {error}"))
            })?;

        let status = response.status();
        debug!(action, status = status.as_u16(), "management API responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        Err(error_for_status(action, status, body.as_str()))
    }

    async fn parse<T: DeserializeOwned>(action: &str, response: reqwest::Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse management API response to {action}: {error}"
            ))
        })
    }
}

fn error_for_status(action: &str, status: StatusCode, body: &str) -> AppError {
    let message = format!(
        "management API returned status {} to {action}: {body}",
        status.as_u16()
    );
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Remote(message),
    }
}

#[async_trait]
impl ProjectGroupApi for HttpProjectGroupApi {
    async fn resolve_project(&self, project_id: &str) -> AppResult<String> {
        let action = "fetch project details";
        let url = self.endpoint(&["api", "v1", "workspace", project_id])?;
        let response = self.send(action, self.http_client.get(url)).await?;

        Ok(Self::parse::<ProjectResponse>(action, response)
            .await?
            .workspace
            .slug)
    }

    async fn create_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<String> {
        let action = "create project group membership";
        let url = self.group_endpoint(project_slug, group_slug)?;
        let response = self
            .send(
                action,
                self.http_client.post(url).json(&RolesRequest::from_roles(roles)),
            )
            .await?;

        Ok(Self::parse::<GroupMembershipResponse>(action, response)
            .await?
            .group_membership
            .id)
    }

    async fn fetch_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
    ) -> AppResult<Vec<ObservedRoleGrant>> {
        let action = "read project group membership";
        let url = self.group_endpoint(project_slug, group_slug)?;
        let response = self.send(action, self.http_client.get(url)).await?;

        Ok(Self::parse::<GroupMembershipResponse>(action, response)
            .await?
            .into_observed_roles())
    }

    async fn update_binding(
        &self,
        project_slug: &str,
        group_slug: &str,
        roles: &[NormalizedRoleGrant],
    ) -> AppResult<()> {
        let url = self.group_endpoint(project_slug, group_slug)?;
        self.send(
            "update project group membership",
            self.http_client
                .patch(url)
                .json(&RolesRequest::from_roles(roles)),
        )
        .await?;
        Ok(())
    }

    async fn delete_binding(&self, project_slug: &str, group_slug: &str) -> AppResult<()> {
        let url = self.group_endpoint(project_slug, group_slug)?;
        self.send(
            "delete project group membership",
            self.http_client.delete(url),
        )
        .await?;
        Ok(())
    }
}
