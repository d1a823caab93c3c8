//! Authentication scope resolution
//!
//! Figures out which account an invocation acts as: the token's user, or the
//! active team when one is selected. The resulting context name labels
//! command output and error messages; authorization itself is enforced by
//! the platform on every request.

use serde::Deserialize;
use tracing::debug;

use super::client::ApiClient;
use crate::errors::ApiError;

/// Reported when the platform rejects the access token
pub const INVALID_TOKEN: &str =
    "The specified token is not valid. Provide a new one with --token or update ~/.deployctl/config.toml";

/// User owning the access token
#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

/// Team selected as the active scope
#[derive(Debug, Deserialize)]
struct Team {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

/// Resolved identity for one invocation
#[derive(Debug, Clone)]
pub struct Scope {
    /// Team slug when a team is active, the username otherwise
    pub context_name: String,
}

/// Resolve the scope the client's token and team select.
///
/// Fails with [`ApiError::NotAuthorized`] when the token is rejected or does
/// not grant access to the team, and [`ApiError::TeamDeleted`] when the team
/// no longer exists. Other failures are passed through unchanged.
pub async fn get_scope(client: &ApiClient) -> Result<Scope, ApiError> {
    let user = get_user(client).await?;

    let context_name = match client.current_team() {
        Some(team_id) => get_team(client, team_id).await?.slug,
        None => user.username,
    };

    debug!(context = %context_name, user_id = %user.id, "Resolved scope");

    Ok(Scope { context_name })
}

async fn get_user(client: &ApiClient) -> Result<User, ApiError> {
    match client.get_json::<UserResponse>("/v2/user").await {
        Ok(response) => Ok(response.user),
        Err(ApiError::Http { status: 401 | 403, .. }) => {
            Err(ApiError::not_authorized(INVALID_TOKEN))
        }
        Err(err) => Err(err),
    }
}

async fn get_team(client: &ApiClient, team_id: &str) -> Result<Team, ApiError> {
    let path = format!("/v1/teams/{}", team_id);
    match client.get_json::<Team>(&path).await {
        Ok(team) => Ok(team),
        Err(ApiError::Http { status: 401 | 403, .. }) => Err(ApiError::not_authorized(format!(
            "You do not have access to the team \"{}\"",
            team_id
        ))),
        Err(ApiError::Http { status: 404, .. }) => Err(ApiError::team_deleted(team_id)),
        Err(err) => Err(err),
    }
}
