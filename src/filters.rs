use chrono::{DateTime, Duration, Utc};

use crate::types::Notification;

/// Keep notifications whose repository contains `scope`.
///
/// Matching is by substring so that `repo:acme/` scopes to every repository of
/// an owner.
pub fn by_repo(notifications: Vec<Notification>, scope: &str) -> Vec<Notification> {
    if scope.is_empty() {
        return notifications;
    }
    let before = notifications.len();
    let filtered: Vec<Notification> = notifications
        .into_iter()
        .filter(|n| n.repository.contains(scope))
        .collect();
    tracing::debug!(scope, before, after = filtered.len(), "repo filter");
    filtered
}

/// Drop notifications last updated `max_age_days` or more before `now`.
/// A ceiling of zero disables the filter, as does one reaching past the
/// earliest representable date.
pub fn by_age(
    notifications: Vec<Notification>,
    max_age_days: u32,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    if max_age_days == 0 {
        return notifications;
    }
    let Some(cutoff) = Duration::try_days(i64::from(max_age_days))
        .and_then(|age| now.checked_sub_signed(age))
    else {
        return notifications;
    };
    let before = notifications.len();
    let filtered: Vec<Notification> = notifications
        .into_iter()
        .filter(|n| n.updated_at > cutoff)
        .collect();
    tracing::debug!(max_age_days, before, after = filtered.len(), "age filter");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{base_time, notification};

    #[test]
    fn repo_filter_keeps_matching_repositories() {
        let input = vec![
            notification("1", "acme/widgets", "a", 0),
            notification("2", "acme/gears", "b", 0),
            notification("3", "other/widgets", "c", 0),
        ];
        let ids: Vec<String> = by_repo(input, "acme/widgets")
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn repo_filter_owner_prefix() {
        let input = vec![
            notification("1", "acme/widgets", "a", 0),
            notification("2", "acme/gears", "b", 0),
            notification("3", "other/widgets", "c", 0),
        ];
        assert_eq!(by_repo(input, "acme/").len(), 2);
    }

    #[test]
    fn repo_filter_empty_scope_is_identity() {
        let input = vec![notification("1", "acme/widgets", "a", 0)];
        assert_eq!(by_repo(input, "").len(), 1);
    }

    #[test]
    fn age_filter_drops_old_items() {
        let now = base_time();
        let input = vec![
            notification("fresh", "o/r", "a", -1),
            notification("edge", "o/r", "b", -48),
            notification("old", "o/r", "c", -24 * 10),
        ];
        let kept: Vec<String> = by_age(input, 2, now).into_iter().map(|n| n.id).collect();
        // exactly at the cutoff is not "newer than" the cutoff
        assert_eq!(kept, vec!["fresh"]);
    }

    #[test]
    fn age_filter_huge_ceiling_keeps_everything() {
        let input = vec![
            notification("1", "o/r", "a", 0),
            notification("2", "o/r", "b", -24 * 365 * 30),
        ];
        assert_eq!(by_age(input.clone(), 100_000_000, base_time()).len(), 2);
        assert_eq!(by_age(input, u32::MAX, base_time()).len(), 2);
    }

    #[test]
    fn age_filter_zero_disables() {
        let input = vec![notification("old", "o/r", "c", -24 * 365)];
        assert_eq!(by_age(input, 0, base_time()).len(), 1);
    }
}
