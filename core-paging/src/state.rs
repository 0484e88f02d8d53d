//! Load-state snapshots and the refresh presentation reducer
//!
//! A remote-backed refresh goes through two phases: the coordinator
//! fetches and commits, then the local source reloads what was
//! committed. Consumers that want to react once per *presented* refresh
//! (scroll to top, hide a spinner) fold snapshots of both phases into a
//! [`RemotePresentationState`].

use futures::{future, stream, Stream, StreamExt};
use serde::{Deserialize, Serialize};

/// Whether one load axis is currently working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    NotLoading,
    Loading,
    Error,
}

/// Snapshot of the two load axes a refresh passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombinedLoadStates {
    /// The sync coordinator's refresh fetch
    pub remote_refresh: LoadState,
    /// The local source's reload of committed data
    pub source_refresh: LoadState,
}

impl CombinedLoadStates {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Where a remote-backed refresh currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemotePresentationState {
    /// Nothing has happened yet
    Initial,
    /// The coordinator is fetching and committing
    RemoteLoading,
    /// The local source is reloading the committed rows
    SourceLoading,
    /// The refreshed data is on screen
    Presented,
}

/// One reducer step.
///
/// The phases only move forward: a remote refresh arms the reducer, the
/// source reload completes it. Anything else, including errors on either
/// axis, leaves the state where it is so a retry can pick up mid-flight.
pub fn advance(
    state: RemotePresentationState,
    snapshot: CombinedLoadStates,
) -> RemotePresentationState {
    use RemotePresentationState::*;

    match state {
        Presented | Initial => match snapshot.remote_refresh {
            LoadState::Loading => RemoteLoading,
            _ => state,
        },
        RemoteLoading => match snapshot.source_refresh {
            LoadState::Loading => SourceLoading,
            _ => state,
        },
        SourceLoading => match snapshot.source_refresh {
            LoadState::NotLoading => Presented,
            _ => state,
        },
    }
}

/// Fold a stream of load-state snapshots into presentation states.
///
/// Emits [`RemotePresentationState::Initial`] up front, then one state
/// per snapshot with consecutive duplicates suppressed.
pub fn presentation_states<S>(snapshots: S) -> impl Stream<Item = RemotePresentationState>
where
    S: Stream<Item = CombinedLoadStates>,
{
    let folded = snapshots.scan(RemotePresentationState::Initial, |state, snapshot| {
        *state = advance(*state, snapshot);
        future::ready(Some(*state))
    });

    stream::once(future::ready(RemotePresentationState::Initial))
        .chain(folded)
        .scan(None, |last, state| {
            let emit = if Some(state) != *last {
                *last = Some(state);
                Some(state)
            } else {
                None
            };
            future::ready(Some(emit))
        })
        .filter_map(future::ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use RemotePresentationState::*;

    fn snapshot(remote_refresh: LoadState, source_refresh: LoadState) -> CombinedLoadStates {
        CombinedLoadStates {
            remote_refresh,
            source_refresh,
        }
    }

    #[test]
    fn test_initial_arms_on_remote_loading() {
        let next = advance(Initial, snapshot(LoadState::Loading, LoadState::NotLoading));
        assert_eq!(next, RemoteLoading);
    }

    #[test]
    fn test_initial_ignores_source_only_activity() {
        let next = advance(Initial, snapshot(LoadState::NotLoading, LoadState::Loading));
        assert_eq!(next, Initial);
    }

    #[test]
    fn test_remote_loading_waits_for_source() {
        let unchanged = advance(
            RemoteLoading,
            snapshot(LoadState::Loading, LoadState::NotLoading),
        );
        assert_eq!(unchanged, RemoteLoading);

        let advanced = advance(
            RemoteLoading,
            snapshot(LoadState::NotLoading, LoadState::Loading),
        );
        assert_eq!(advanced, SourceLoading);
    }

    #[test]
    fn test_source_loading_presents_on_not_loading() {
        let next = advance(
            SourceLoading,
            snapshot(LoadState::NotLoading, LoadState::NotLoading),
        );
        assert_eq!(next, Presented);
    }

    #[test]
    fn test_source_error_stalls_the_cycle() {
        let next = advance(
            SourceLoading,
            snapshot(LoadState::NotLoading, LoadState::Error),
        );
        assert_eq!(next, SourceLoading);
    }

    #[test]
    fn test_presented_rearms_on_next_remote_refresh() {
        let next = advance(Presented, snapshot(LoadState::Loading, LoadState::NotLoading));
        assert_eq!(next, RemoteLoading);
    }

    #[tokio::test]
    async fn test_stream_walks_full_refresh_cycle() {
        let snapshots = vec![
            snapshot(LoadState::Loading, LoadState::NotLoading),
            snapshot(LoadState::NotLoading, LoadState::Loading),
            snapshot(LoadState::NotLoading, LoadState::NotLoading),
        ];

        let states: Vec<_> = presentation_states(stream::iter(snapshots)).collect().await;
        assert_eq!(states, vec![Initial, RemoteLoading, SourceLoading, Presented]);
    }

    #[tokio::test]
    async fn test_stream_suppresses_consecutive_duplicates() {
        let snapshots = vec![
            snapshot(LoadState::Loading, LoadState::NotLoading),
            snapshot(LoadState::Loading, LoadState::NotLoading),
            snapshot(LoadState::Loading, LoadState::NotLoading),
        ];

        let states: Vec<_> = presentation_states(stream::iter(snapshots)).collect().await;
        assert_eq!(states, vec![Initial, RemoteLoading]);
    }

    #[tokio::test]
    async fn test_stream_emits_initial_even_when_empty() {
        let states: Vec<_> = presentation_states(stream::iter(Vec::<CombinedLoadStates>::new()))
            .collect()
            .await;
        assert_eq!(states, vec![Initial]);
    }

    #[tokio::test]
    async fn test_two_refresh_cycles_present_twice() {
        let cycle = [
            snapshot(LoadState::Loading, LoadState::NotLoading),
            snapshot(LoadState::NotLoading, LoadState::Loading),
            snapshot(LoadState::NotLoading, LoadState::NotLoading),
        ];
        let snapshots: Vec<_> = cycle.iter().chain(cycle.iter()).copied().collect();

        let states: Vec<_> = presentation_states(stream::iter(snapshots)).collect().await;
        assert_eq!(
            states,
            vec![
                Initial,
                RemoteLoading,
                SourceLoading,
                Presented,
                RemoteLoading,
                SourceLoading,
                Presented
            ]
        );
    }
}
