//! Match-history endpoint builders.

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::url::inject;
use crate::error::Result;
use crate::region::MacroRegion;
use crate::transport::Transport;

/// Filters for match-id listings.
#[derive(Debug, Clone)]
pub struct MatchFilter {
    /// Start index into the match list
    pub start: u32,
    /// Number of ids to return
    pub count: u32,
    /// Restrict to a queue id
    pub queue: Option<u32>,
    /// Restrict to a match type
    pub match_type: Option<String>,
    /// Epoch-seconds lower bound
    pub start_time: Option<i64>,
    /// Epoch-seconds upper bound
    pub end_time: Option<i64>,
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self {
            start: 0,
            count: 20,
            queue: None,
            match_type: None,
            start_time: None,
            end_time: None,
        }
    }
}

/// Builders for the match endpoints.
pub struct MatchApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> MatchApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Ids of matches played on the account with `puuid`, newest first.
    pub async fn ids_by_puuid(
        &self,
        group: MacroRegion,
        puuid: &str,
        filter: &MatchFilter,
    ) -> Result<Vec<String>> {
        let path = inject("/match/v5/matches/by-puuid/{puuid}/ids", &[("puuid", puuid)]);
        self.client
            .get(
                group.into(),
                "match.ids_by_puuid",
                &path,
                &[
                    ("start", Some(filter.start.to_string())),
                    ("count", Some(filter.count.to_string())),
                    ("queue", filter.queue.map(|q| q.to_string())),
                    ("type", filter.match_type.clone()),
                    ("startTime", filter.start_time.map(|t| t.to_string())),
                    ("endTime", filter.end_time.map(|t| t.to_string())),
                ],
            )
            .await
    }

    /// The match with `match_id`, decoded into `D`.
    pub async fn by_id<D>(&self, group: MacroRegion, match_id: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject("/match/v5/matches/{matchId}", &[("matchId", match_id)]);
        self.client.get(group.into(), "match.by_id", &path, &[]).await
    }

    /// The timeline of the match with `match_id`, decoded into `D`.
    pub async fn timeline_by_id<D>(&self, group: MacroRegion, match_id: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject(
            "/match/v5/matches/{matchId}/timeline",
            &[("matchId", match_id)],
        );
        self.client
            .get(group.into(), "match.timeline_by_id", &path, &[])
            .await
    }
}
