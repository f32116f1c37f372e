//! Abuse-pattern detectors
//!
//! Each detector is an independent function over the repository traits. It
//! scans one bounded window relative to `now` and returns zero or more alerts
//! stamped with `now`. Detectors share no state and never call each other.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

use shop_common::DetectionThresholds;
use shop_core::entities::{
    ActivityAction, ActivityEvent, AlertEvidence, AlertType, CustomerProfile, Order,
    SecurityAlert, Severity,
};
use shop_core::DomainError;
use shop_core::traits::{
    ActivityLogRepository, CountMode, EventQuery, GroupKey, OrderQuery, OrderRepository, RepoResult,
    TimeRange,
};

/// Repeated `LOGIN_FAILED` events for one user.
///
/// Only events strictly inside the window count; an event exactly at the
/// window edge is excluded.
#[instrument(skip(logs, thresholds))]
pub async fn detect_failed_logins(
    logs: &dyn ActivityLogRepository,
    thresholds: &DetectionThresholds,
    now: DateTime<Utc>,
) -> RepoResult<Vec<SecurityAlert>> {
    let window = thresholds.failed_login_window_minutes;
    let query = EventQuery::new()
        .action(ActivityAction::LoginFailed)
        .created(TimeRange::after(window_start(
            now,
            Duration::try_minutes(window),
            "failed_login_window_minutes",
        )?));

    let groups = logs
        .count_grouped(&query, GroupKey::UserId, CountMode::Rows, thresholds.failed_login_threshold)
        .await?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids = groups.iter().map(|g| g.key.clone()).collect();
    let events = logs.find_events(&query.user_ids(user_ids)).await?;

    let mut ips_by_user: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for event in &events {
        ips_by_user
            .entry(event.user_id.as_str())
            .or_default()
            .insert(event.ip_address.as_str());
    }

    let alerts = groups
        .iter()
        .map(|group| {
            let ip_addresses: Vec<String> = ips_by_user
                .get(group.key.as_str())
                .map(|ips| ips.iter().map(|ip| (*ip).to_string()).collect())
                .unwrap_or_default();

            let severity = if group.count >= thresholds.failed_login_high_threshold {
                Severity::High
            } else {
                Severity::Medium
            };

            SecurityAlert {
                alert_type: AlertType::FailedLogin,
                severity,
                user_id: Some(group.key.clone()),
                ip_address: None,
                count: Some(group.count),
                message: format!(
                    "{} failed login attempts in the last {window} minutes",
                    group.count
                ),
                evidence: AlertEvidence::FailedLogin {
                    time_window_minutes: window,
                    threshold: thresholds.failed_login_threshold,
                    actual_count: group.count,
                    ip_addresses,
                },
                timestamp: now,
            }
        })
        .collect();

    Ok(alerts)
}

/// A recent login from a country absent from the user's login history.
///
/// Users with no recorded history countries are never flagged.
#[instrument(skip(logs, thresholds))]
pub async fn detect_unusual_locations(
    logs: &dyn ActivityLogRepository,
    thresholds: &DetectionThresholds,
    now: DateTime<Utc>,
) -> RepoResult<Vec<SecurityAlert>> {
    let recent_start = window_start(
        now,
        Duration::try_hours(thresholds.location_recent_hours),
        "location_recent_hours",
    )?;
    let history_start = window_start(
        now,
        Duration::try_days(thresholds.location_history_days),
        "location_history_days",
    )?;

    let recent = logs
        .find_events(
            &EventQuery::new()
                .action(ActivityAction::Login)
                .created(TimeRange::since(recent_start)),
        )
        .await?;
    if recent.is_empty() {
        return Ok(Vec::new());
    }

    let mut latest: BTreeMap<&str, &ActivityEvent> = BTreeMap::new();
    for event in &recent {
        latest
            .entry(event.user_id.as_str())
            .and_modify(|current| {
                if event.created_at > current.created_at {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    let history_range = TimeRange::since(history_start).before(recent_start);
    let history = logs
        .find_events(
            &EventQuery::new()
                .action(ActivityAction::Login)
                .user_ids(latest.keys().map(|id| (*id).to_string()).collect())
                .created(history_range),
        )
        .await?;

    let mut known_countries: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for event in &history {
        if let Some(country) = event.country() {
            known_countries
                .entry(event.user_id.as_str())
                .or_default()
                .insert(country);
        }
    }

    let mut alerts = Vec::new();
    for (user_id, login) in latest {
        let Some(current) = login.country() else {
            continue;
        };
        let Some(known) = known_countries.get(user_id) else {
            continue;
        };
        if known.is_empty() || known.contains(current) {
            continue;
        }

        alerts.push(SecurityAlert {
            alert_type: AlertType::UnusualLocation,
            severity: Severity::High,
            user_id: Some(user_id.to_string()),
            ip_address: Some(login.ip_address.clone()),
            count: None,
            message: format!("Login from new country {current}"),
            evidence: AlertEvidence::UnusualLocation {
                current_country: current.to_string(),
                historical_countries: known.iter().map(|c| (*c).to_string()).collect(),
                ip_address: login.ip_address.clone(),
            },
            timestamp: now,
        });
    }

    Ok(alerts)
}

/// Many distinct accounts created from one source IP.
///
/// Repeated `USER_CREATED` rows for the same user count once.
#[instrument(skip(logs, thresholds))]
pub async fn detect_rapid_account_creation(
    logs: &dyn ActivityLogRepository,
    thresholds: &DetectionThresholds,
    now: DateTime<Utc>,
) -> RepoResult<Vec<SecurityAlert>> {
    let window = thresholds.account_creation_window_minutes;
    let query = EventQuery::new()
        .action(ActivityAction::UserCreated)
        .created(TimeRange::since(window_start(
            now,
            Duration::try_minutes(window),
            "account_creation_window_minutes",
        )?));

    let groups = logs
        .count_grouped(
            &query,
            GroupKey::IpAddress,
            CountMode::DistinctUsers,
            thresholds.account_creation_threshold,
        )
        .await?;

    let alerts = groups
        .into_iter()
        .map(|group| {
            let severity = if group.count >= thresholds.account_creation_high_threshold {
                Severity::High
            } else {
                Severity::Medium
            };

            SecurityAlert {
                alert_type: AlertType::RapidAccountCreation,
                severity,
                user_id: None,
                message: format!(
                    "{} accounts created from {} in the last {window} minutes",
                    group.count, group.key
                ),
                ip_address: Some(group.key),
                count: Some(group.count),
                evidence: AlertEvidence::RapidAccountCreation {
                    time_window_minutes: window,
                    threshold: thresholds.account_creation_threshold,
                    actual_count: group.count,
                },
                timestamp: now,
            }
        })
        .collect();

    Ok(alerts)
}

/// A large first order placed by a young account.
///
/// Both conditions must hold; an old account or a repeat customer never
/// triggers this.
#[instrument(skip(orders, thresholds))]
pub async fn detect_high_value_new_accounts(
    orders: &dyn OrderRepository,
    thresholds: &DetectionThresholds,
    now: DateTime<Utc>,
) -> RepoResult<Vec<SecurityAlert>> {
    let start = window_start(
        now,
        Duration::try_hours(thresholds.high_value_window_hours),
        "high_value_window_hours",
    )?;
    let query = OrderQuery::new(TimeRange::since(start)).total_gte(thresholds.high_value_min_total);

    let candidates = orders.find_orders(&query).await?;

    let mut profiles: HashMap<String, Option<CustomerProfile>> = HashMap::new();
    let mut alerts = Vec::new();

    for order in candidates {
        if !profiles.contains_key(&order.user_id) {
            let profile = orders.find_customer_profile(&order.user_id).await?;
            profiles.insert(order.user_id.clone(), profile);
        }
        let Some(Some(profile)) = profiles.get(&order.user_id) else {
            debug!(user_id = %order.user_id, "No customer record for order owner");
            continue;
        };

        let account_age_days = profile.account_age_days(now);
        let is_first_order = profile.is_first_order();
        if account_age_days > thresholds.high_value_max_account_age_days || !is_first_order {
            continue;
        }

        alerts.push(SecurityAlert {
            alert_type: AlertType::HighValueNewAccount,
            severity: Severity::High,
            user_id: Some(order.user_id.clone()),
            ip_address: None,
            count: None,
            message: format!(
                "First order of {} from an account {account_age_days} days old",
                format_minor_units(order.total)
            ),
            evidence: AlertEvidence::HighValueNewAccount {
                order_id: order.id,
                order_value: order.total,
                account_age_days,
                is_first_order,
            },
            timestamp: now,
        });
    }

    Ok(alerts)
}

/// A burst of orders from one user, typical of card testing.
///
/// Any qualifying burst is `CRITICAL`.
#[instrument(skip(orders, thresholds))]
pub async fn detect_rapid_orders(
    orders: &dyn OrderRepository,
    thresholds: &DetectionThresholds,
    now: DateTime<Utc>,
) -> RepoResult<Vec<SecurityAlert>> {
    let window = thresholds.rapid_orders_window_minutes;
    let start = window_start(
        now,
        Duration::try_minutes(window),
        "rapid_orders_window_minutes",
    )?;
    let recent = orders
        .find_orders(&OrderQuery::new(TimeRange::since(start)))
        .await?;

    let mut by_user: BTreeMap<String, Vec<Order>> = BTreeMap::new();
    for order in recent {
        by_user.entry(order.user_id.clone()).or_default().push(order);
    }

    let alerts = by_user
        .into_iter()
        .filter(|(_, orders)| orders.len() as i64 >= thresholds.rapid_orders_threshold)
        .map(|(user_id, orders)| {
            let order_count = orders.len() as i64;
            SecurityAlert {
                alert_type: AlertType::RapidOrders,
                severity: Severity::Critical,
                message: format!(
                    "{order_count} orders placed in the last {window} minutes"
                ),
                user_id: Some(user_id),
                ip_address: None,
                count: Some(order_count),
                evidence: AlertEvidence::RapidOrders {
                    time_window_minutes: window,
                    threshold: thresholds.rapid_orders_threshold,
                    order_count,
                    order_ids: orders.into_iter().map(|o| o.id).collect(),
                },
                timestamp: now,
            }
        })
        .collect();

    Ok(alerts)
}

/// `now - span`, or a validation error when the span or the result is out of range
fn window_start(
    now: DateTime<Utc>,
    span: Option<Duration>,
    setting: &str,
) -> RepoResult<DateTime<Utc>> {
    span.and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| DomainError::ValidationError(format!("{setting} is out of range")))
}

/// Render cents as a dollar amount, e.g. `50000` -> `$500.00`
fn format_minor_units(total: i64) -> String {
    let sign = if total < 0 { "-" } else { "" };
    let abs = total.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
