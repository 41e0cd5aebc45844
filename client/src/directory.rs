//! Admin user directory endpoints under `/admin`.
//!
//! The list routes are per-role, the guide status move is a PUT with the
//! status in the query string, and the stats route answers a flat map of
//! counts.

use async_trait::async_trait;

use taroudant_domain::api::{DirectoryApi, UserGroup};
use taroudant_domain::error::Result;
use taroudant_domain::types::{AccountStatus, Identity, UserId, UserStats};

use crate::ApiClient;

const fn group_path(group: UserGroup) -> &'static str {
    match group {
        UserGroup::All => "/admin/users",
        UserGroup::Guides => "/admin/guides",
        UserGroup::Tourists => "/admin/tourists",
    }
}

#[async_trait]
impl DirectoryApi for ApiClient {
    async fn list_users(&self, group: UserGroup) -> Result<Vec<Identity>> {
        self.get_json(group_path(group)).await
    }

    async fn set_guide_status(&self, id: UserId, status: AccountStatus) -> Result<Identity> {
        let path = format!("/admin/guides/{id}/status?status={}", status.as_str());
        self.put_empty(&path).await
    }

    async fn delete_guide(&self, id: UserId) -> Result<()> {
        self.delete_path(&format!("/admin/guides/{id}")).await
    }

    async fn delete_tourist(&self, id: UserId) -> Result<()> {
        self.delete_path(&format!("/admin/tourists/{id}")).await
    }

    async fn user_stats(&self) -> Result<UserStats> {
        self.get_json("/admin/stats/users").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_group_has_its_own_route() {
        assert_eq!(group_path(UserGroup::All), "/admin/users");
        assert_eq!(group_path(UserGroup::Guides), "/admin/guides");
        assert_eq!(group_path(UserGroup::Tourists), "/admin/tourists");
    }

    #[test]
    fn status_move_spells_the_status_in_the_query() {
        let path = format!(
            "/admin/guides/{}/status?status={}",
            UserId::new(7),
            AccountStatus::Suspended.as_str()
        );
        assert_eq!(path, "/admin/guides/7/status?status=SUSPENDED");
    }
}
